// ABOUTME: Interpreter facade tying together parsing, evaluation, and collection

use crate::error::EvalError;
use crate::eval::{evaluate, serialize};
use crate::heap::{Handle, Heap};
use crate::parser::Parser;

/// Owns the heap and the persistent root environment. `interpret` is the
/// whole external interface: tokenize, parse one expression, evaluate
/// against the root environment, serialize, collect.
pub struct Interpreter {
    heap: Heap,
    root_env: Handle,
}

impl Interpreter {
    pub fn new() -> Self {
        let mut heap = Heap::new();
        let root_env = heap.new_root_env();
        crate::builtins::register_all(&mut heap, root_env);
        Interpreter { heap, root_env }
    }

    /// Parses and evaluates one line of source, returning its serialized
    /// result. Triggers collection after every top-level evaluation.
    ///
    /// Source that is empty (after trimming whitespace) or that parses to
    /// nil (a literal `()`) raises `RuntimeError("Unable to evaluate")`,
    /// matching the source this interpreter is modeled on.
    pub fn interpret(&mut self, source_line: &str) -> Result<String, EvalError> {
        if source_line.trim().is_empty() {
            return Err(EvalError::runtime("interpret", "Unable to evaluate"));
        }

        let mut parser = Parser::new(source_line);
        let expr = parser.read(&mut self.heap)?;
        if expr.is_none() {
            return Err(EvalError::runtime("interpret", "Unable to evaluate"));
        }

        let result = evaluate(&mut self.heap, self.root_env, expr)?;
        let text = serialize(&self.heap, result)?;
        self.heap.collect(self.root_env);
        Ok(text)
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Interpreter {
    fn drop(&mut self) {
        self.heap.destroy_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_arithmetic() {
        let mut interp = Interpreter::new();
        assert_eq!(interp.interpret("(+ 1 2 3)").unwrap(), "6");
    }

    #[test]
    fn recursive_factorial_across_two_top_level_forms() {
        let mut interp = Interpreter::new();
        interp
            .interpret("(define (fact n) (if (<= n 1) 1 (* n (fact (- n 1)))))")
            .unwrap();
        assert_eq!(interp.interpret("(fact 6)").unwrap(), "720");
    }

    #[test]
    fn lexical_capture_across_top_level_forms() {
        let mut interp = Interpreter::new();
        interp
            .interpret("(define (make-adder k) (lambda (x) (+ x k)))")
            .unwrap();
        interp.interpret("(define inc (make-adder 1))").unwrap();
        assert_eq!(interp.interpret("(inc 41)").unwrap(), "42");
    }

    #[test]
    fn closure_name_is_independent_of_outer_binding() {
        let mut interp = Interpreter::new();
        interp
            .interpret("(define (foo x) (define (bar) (set! x (+ (* x 2) 2)) x) bar)")
            .unwrap();
        interp.interpret("(define my-foo (foo 20))").unwrap();
        interp.interpret("(define foo 1543)").unwrap();
        assert_eq!(interp.interpret("(my-foo)").unwrap(), "42");
    }

    #[test]
    fn pair_mutation_scenario() {
        let mut interp = Interpreter::new();
        interp.interpret("(define p (cons 1 2))").unwrap();
        interp.interpret("(set-car! p 10)").unwrap();
        interp.interpret("(set-cdr! p '(20))").unwrap();
        assert_eq!(interp.interpret("p").unwrap(), "(10 20)");
    }

    #[test]
    fn empty_source_is_unable_to_evaluate() {
        let mut interp = Interpreter::new();
        let err = interp.interpret("").unwrap_err();
        assert_eq!(err.to_string(), "interpret: Unable to evaluate");
    }

    #[test]
    fn literal_empty_list_is_unable_to_evaluate() {
        let mut interp = Interpreter::new();
        let err = interp.interpret("()").unwrap_err();
        assert_eq!(err.to_string(), "interpret: Unable to evaluate");
    }

    #[test]
    fn negative_test_division_requires_two_args() {
        let mut interp = Interpreter::new();
        assert!(matches!(interp.interpret("(/ 1)"), Err(EvalError::RuntimeError(_))));
    }

    #[test]
    fn negative_test_arithmetic_type_mismatch() {
        let mut interp = Interpreter::new();
        assert!(matches!(
            interp.interpret("(+ 1 'a)"),
            Err(EvalError::RuntimeError(_))
        ));
    }

    #[test]
    fn negative_test_undefined_name() {
        let mut interp = Interpreter::new();
        assert!(matches!(
            interp.interpret("undefined-name"),
            Err(EvalError::NameError(_))
        ));
    }

    #[test]
    fn negative_test_define_bad_arity() {
        let mut interp = Interpreter::new();
        assert!(matches!(interp.interpret("(define)"), Err(EvalError::SyntaxError(_))));
    }

    #[test]
    fn negative_test_unbalanced_parens() {
        let mut interp = Interpreter::new();
        assert!(matches!(
            interp.interpret("(+ 1 2"),
            Err(EvalError::SyntaxError(_))
        ));
    }
}
