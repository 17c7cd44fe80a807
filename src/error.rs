// ABOUTME: Error types for evaluation failures in the Lisp interpreter

use thiserror::Error;

/// The three error categories surfaced to the interpreter's caller. Each
/// one only ever carries a human-readable message; callers distinguish
/// category via the variant itself, not by parsing the message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    /// Malformed token stream: unbalanced parens, a misplaced dot, a missing
    /// expression after `'`, extra tokens after the top-level expression, or
    /// bad arity for a syntactic primitive (`if`, `define`, `lambda`, `set!`,
    /// `set-car!`, `set-cdr!`).
    #[error("{0}")]
    SyntaxError(String),

    /// An unresolved symbol during `resolve` or `set!`.
    #[error("Undefined symbol: {0}")]
    NameError(String),

    /// Everything else: type mismatches, arity violations in non-syntactic
    /// primitives, improper lists where a proper one is required,
    /// out-of-range indices, applying a non-function, and so on.
    #[error("{0}")]
    RuntimeError(String),
}

impl EvalError {
    /// A malformed-input error raised by the tokenizer or parser.
    pub fn syntax(message: impl Into<String>) -> Self {
        EvalError::SyntaxError(message.into())
    }

    /// A bad-arity error for one of the syntactic primitives.
    pub fn syntax_arity(function: &str, expected: &str, actual: usize) -> Self {
        EvalError::SyntaxError(format!(
            "{function}: expected {expected} argument{}, got {actual}",
            plural_suffix(expected)
        ))
    }

    pub fn name_error(name: &str) -> Self {
        EvalError::NameError(name.to_string())
    }

    /// A type-mismatch error naming the offending function, the expected
    /// type, the actual value's type, and its position among the arguments.
    pub fn type_error(function: &str, expected: &str, actual_type: &str, position: usize) -> Self {
        EvalError::RuntimeError(format!(
            "{function}: expected {expected}, got {actual_type} at argument {position}"
        ))
    }

    /// An arity error for a non-syntactic primitive.
    pub fn arity_error(function: &str, expected: impl Into<String>, actual: usize) -> Self {
        let expected = expected.into();
        EvalError::RuntimeError(format!(
            "{function}: expected {expected} argument{}, got {actual}",
            plural_suffix(&expected)
        ))
    }

    /// A runtime error carrying free-form context, prefixed by the
    /// offending function's name.
    pub fn runtime(function: &str, message: impl Into<String>) -> Self {
        EvalError::RuntimeError(format!("{function}: {}", message.into()))
    }
}

fn plural_suffix(expected: &str) -> &'static str {
    if expected == "1" {
        ""
    } else {
        "s"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arity_error_pluralizes_correctly() {
        let single = EvalError::arity_error("abs", "1", 2);
        assert_eq!(single.to_string(), "abs: expected 1 argument, got 2");

        let multi = EvalError::arity_error("-", "at least 2", 1);
        assert_eq!(multi.to_string(), "-: expected at least 2 arguments, got 1");
    }

    #[test]
    fn syntax_arity_matches_runtime_arity_wording() {
        let err = EvalError::syntax_arity("if", "2-3", 4);
        assert_eq!(err.to_string(), "if: expected 2-3 arguments, got 4");
        assert!(matches!(err, EvalError::SyntaxError(_)));
    }

    #[test]
    fn name_error_reports_undefined_symbol() {
        let err = EvalError::name_error("undefined-name");
        assert_eq!(err.to_string(), "Undefined symbol: undefined-name");
    }
}
