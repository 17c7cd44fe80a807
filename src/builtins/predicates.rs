//! Type predicates: number?, symbol?, pair?, list?, null?, boolean?
//!
//! Each evaluates its single argument and tests the result.

use super::define_primitive;
use crate::error::EvalError;
use crate::eval::{evaluate, proper_list};
use crate::heap::{Handle, Heap, Ref};
use crate::value::Value;

fn single_argument(heap: &mut Heap, env: Handle, name: &str, operands: &[Ref]) -> Result<Ref, EvalError> {
    if operands.len() != 1 {
        return Err(EvalError::arity_error(name, "1", operands.len()));
    }
    evaluate(heap, env, operands[0])
}

fn builtin_is_number(heap: &mut Heap, env: Handle, operands: &[Ref]) -> Result<Ref, EvalError> {
    let value = single_argument(heap, env, "number?", operands)?;
    let ok = matches!(value.map(|h| heap.get(h)), Some(Value::Number(_)));
    Ok(heap.bool_ref(ok))
}

fn builtin_is_symbol(heap: &mut Heap, env: Handle, operands: &[Ref]) -> Result<Ref, EvalError> {
    let value = single_argument(heap, env, "symbol?", operands)?;
    let ok = matches!(value.map(|h| heap.get(h)), Some(Value::Symbol(_)));
    Ok(heap.bool_ref(ok))
}

/// True for any non-nil Pair.
///
/// The source this interpreter is modeled on restricts `pair?` to raw-list
/// shapes of exactly "2 elements + non-nil tail" or "3 elements + nil
/// tail" — a latent defect fixed here rather than reproduced (see
/// DESIGN.md).
fn builtin_is_pair(heap: &mut Heap, env: Handle, operands: &[Ref]) -> Result<Ref, EvalError> {
    let value = single_argument(heap, env, "pair?", operands)?;
    let ok = matches!(value.map(|h| heap.get(h)), Some(Value::Pair(_)));
    Ok(heap.bool_ref(ok))
}

fn builtin_is_list(heap: &mut Heap, env: Handle, operands: &[Ref]) -> Result<Ref, EvalError> {
    let value = single_argument(heap, env, "list?", operands)?;
    let ok = value.is_none() || proper_list(heap, value).is_ok();
    Ok(heap.bool_ref(ok))
}

fn builtin_is_null(heap: &mut Heap, env: Handle, operands: &[Ref]) -> Result<Ref, EvalError> {
    let value = single_argument(heap, env, "null?", operands)?;
    Ok(heap.bool_ref(value.is_none()))
}

/// True iff the value is the symbol `#t` or `#f`. Preserved from the
/// source verbatim: there is no distinct boolean type, so this is purely a
/// test of the symbol's spelling (see DESIGN.md).
fn builtin_is_boolean(heap: &mut Heap, env: Handle, operands: &[Ref]) -> Result<Ref, EvalError> {
    let value = single_argument(heap, env, "boolean?", operands)?;
    let ok = matches!(value.map(|h| heap.get(h)), Some(Value::Symbol(s)) if s == "#t" || s == "#f");
    Ok(heap.bool_ref(ok))
}

pub fn register(heap: &mut Heap, env: Handle) {
    define_primitive(heap, env, "number?", builtin_is_number);
    define_primitive(heap, env, "symbol?", builtin_is_symbol);
    define_primitive(heap, env, "pair?", builtin_is_pair);
    define_primitive(heap, env, "list?", builtin_is_list);
    define_primitive(heap, env, "null?", builtin_is_null);
    define_primitive(heap, env, "boolean?", builtin_is_boolean);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::serialize;
    use crate::parser::Parser;

    fn eval(source: &str) -> String {
        let mut heap = Heap::new();
        let env = heap.new_root_env();
        crate::builtins::register_all(&mut heap, env);
        let expr = Parser::new(source).read(&mut heap).unwrap();
        let result = evaluate(&mut heap, env, expr).unwrap();
        serialize(&heap, result).unwrap()
    }

    #[test]
    fn list_predicate_distinguishes_proper_from_improper() {
        assert_eq!(eval("(list? '(1 2 . 3))"), "#f");
        assert_eq!(eval("(list? '(1 2 3))"), "#t");
        assert_eq!(eval("(list? '())"), "#t");
    }

    #[test]
    fn pair_predicate_is_true_for_any_non_nil_pair() {
        assert_eq!(eval("(pair? (cons 1 2))"), "#t");
        assert_eq!(eval("(pair? '(1 2 3 4 5))"), "#t");
        assert_eq!(eval("(pair? '())"), "#f");
    }

    #[test]
    fn boolean_predicate_matches_sharp_t_and_sharp_f_symbols() {
        assert_eq!(eval("(boolean? #t)"), "#t");
        assert_eq!(eval("(boolean? #f)"), "#t");
        assert_eq!(eval("(boolean? 'x)"), "#f");
    }

    #[test]
    fn null_predicate_only_matches_nil() {
        assert_eq!(eval("(null? '())"), "#t");
        assert_eq!(eval("(null? 0)"), "#f");
    }
}
