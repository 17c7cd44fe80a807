//! Logic operations: not, and, or
//!
//! `and` and `or` evaluate their operands lazily, left to right, stopping
//! as soon as the result is decided — so side effects past the decisive
//! operand must not occur.

use super::define_primitive;
use crate::error::EvalError;
use crate::eval::evaluate;
use crate::heap::{Handle, Heap, Ref};
use crate::value::is_truthy;

/// Returns `#t` if its single argument is `#f`, else `#f`.
fn builtin_not(heap: &mut Heap, env: Handle, operands: &[Ref]) -> Result<Ref, EvalError> {
    if operands.len() != 1 {
        return Err(EvalError::arity_error("not", "1", operands.len()));
    }
    let value = evaluate(heap, env, operands[0])?;
    Ok(heap.bool_ref(!is_truthy(heap, value)))
}

/// Evaluates operands left to right; returns the first falsy value, or the
/// last value if every operand is truthy. With no operands returns `#t`.
fn builtin_and(heap: &mut Heap, env: Handle, operands: &[Ref]) -> Result<Ref, EvalError> {
    if operands.is_empty() {
        return Ok(heap.bool_ref(true));
    }
    let mut result = heap.bool_ref(true);
    for operand in operands {
        result = evaluate(heap, env, *operand)?;
        if !is_truthy(heap, result) {
            return Ok(result);
        }
    }
    Ok(result)
}

/// Evaluates operands left to right; returns the first truthy value, or the
/// last value if every operand is falsy. With no operands returns `#f`.
fn builtin_or(heap: &mut Heap, env: Handle, operands: &[Ref]) -> Result<Ref, EvalError> {
    if operands.is_empty() {
        return Ok(heap.bool_ref(false));
    }
    let mut result = heap.bool_ref(false);
    for operand in operands {
        result = evaluate(heap, env, *operand)?;
        if is_truthy(heap, result) {
            return Ok(result);
        }
    }
    Ok(result)
}

pub fn register(heap: &mut Heap, env: Handle) {
    define_primitive(heap, env, "not", builtin_not);
    define_primitive(heap, env, "and", builtin_and);
    define_primitive(heap, env, "or", builtin_or);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::serialize;
    use crate::parser::Parser;

    fn eval(source: &str, heap: &mut Heap, env: Handle) -> String {
        let expr = Parser::new(source).read(heap).unwrap();
        let result = evaluate(heap, env, expr).unwrap();
        serialize(heap, result).unwrap()
    }

    #[test]
    fn and_short_circuits_without_evaluating_later_operands() {
        let mut heap = Heap::new();
        let env = heap.new_root_env();
        crate::builtins::register_all(&mut heap, env);
        eval("(define flag 0)", &mut heap, env);
        assert_eq!(eval("(and #f (set! flag 1))", &mut heap, env), "#f");
        assert_eq!(eval("flag", &mut heap, env), "0");
    }

    #[test]
    fn or_short_circuits_without_evaluating_later_operands() {
        let mut heap = Heap::new();
        let env = heap.new_root_env();
        crate::builtins::register_all(&mut heap, env);
        eval("(define flag 0)", &mut heap, env);
        assert_eq!(eval("(or #t (set! flag 1))", &mut heap, env), "#t");
        assert_eq!(eval("flag", &mut heap, env), "0");
    }

    #[test]
    fn and_or_empty_identities() {
        let mut heap = Heap::new();
        let env = heap.new_root_env();
        crate::builtins::register_all(&mut heap, env);
        assert_eq!(eval("(and)", &mut heap, env), "#t");
        assert_eq!(eval("(or)", &mut heap, env), "#f");
    }
}
