// ABOUTME: Evaluator module for executing parsed Lisp expressions

use crate::error::EvalError;
use crate::heap::{Handle, Heap, Ref};
use crate::value::{Closure, Pair, Value};

/// Evaluates `expr` against `env`, recursing on the host stack. There is no
/// tail-call optimization: deeply recursive Lisp programs will exhaust the
/// stack, which is an accepted limitation rather than a bug.
pub fn evaluate(heap: &mut Heap, env: Handle, expr: Ref) -> Result<Ref, EvalError> {
    let handle = match expr {
        None => return Ok(None),
        Some(h) => h,
    };

    match heap.get(handle) {
        Value::Number(_) => Ok(Some(handle)),
        Value::Symbol(name) => {
            if name == "#t" || name == "#f" {
                return Ok(Some(handle));
            }
            let name = name.clone();
            heap.env_resolve(env, &name)
        }
        Value::Pair(pair) => {
            let (head, rest) = (pair.car, pair.cdr);
            eval_application(heap, env, head, rest)
        }
        Value::Environment(_) | Value::Primitive(_) | Value::Closure(_) => Err(
            EvalError::runtime("evaluate", "cannot evaluate this value as an expression"),
        ),
    }
}

fn eval_application(heap: &mut Heap, env: Handle, head: Ref, rest: Ref) -> Result<Ref, EvalError> {
    let func = evaluate(heap, env, head)?;
    let func = func.ok_or_else(|| EvalError::runtime("apply", "cannot apply nil"))?;
    if !heap.get(func).is_callable() {
        return Err(EvalError::runtime(
            "apply",
            format!("cannot apply a {}", heap.type_name(func)),
        ));
    }

    let operands = proper_list(heap, rest)
        .map_err(|_| EvalError::runtime("apply", "improper argument list"))?;

    apply(heap, env, func, &operands)
}

/// Applies `func` (already evaluated) to unevaluated operand expressions,
/// in the calling environment `env`.
///
/// Each call allocates a fresh call-frame environment, so a recursive or
/// re-entrant call never clobbers an in-progress frame's bindings.
pub fn apply(
    heap: &mut Heap,
    env: Handle,
    func: Handle,
    operands: &[Ref],
) -> Result<Ref, EvalError> {
    match heap.get(func).clone() {
        Value::Primitive(primitive) => (primitive.func)(heap, env, operands),
        Value::Closure(closure) => apply_closure(heap, env, &closure, operands),
        _ => unreachable!("eval_application already verified this handle is callable"),
    }
}

fn apply_closure(
    heap: &mut Heap,
    calling_env: Handle,
    closure: &Closure,
    operands: &[Ref],
) -> Result<Ref, EvalError> {
    if operands.len() != closure.params.len() {
        return Err(EvalError::arity_error(
            "#<closure>",
            closure.params.len().to_string(),
            operands.len(),
        ));
    }

    let values = evaluate_all(heap, calling_env, operands)?;

    let call_env = heap.new_child_env(closure.env);
    for (param, value) in closure.params.iter().zip(values) {
        heap.env_define(call_env, param.clone(), value)?;
    }

    let mut result = None;
    for expr in &closure.body {
        result = evaluate(heap, call_env, *expr)?;
    }
    Ok(result)
}

/// Evaluates each expression in `exprs` left-to-right in `env`.
pub fn evaluate_all(heap: &mut Heap, env: Handle, exprs: &[Ref]) -> Result<Vec<Ref>, EvalError> {
    exprs.iter().map(|e| evaluate(heap, env, *e)).collect()
}

/// Walks a Pair chain collecting its elements and the final (non-Pair)
/// terminator. An empty input (nil) yields an empty element list and a nil
/// terminator.
pub fn raw_list(heap: &Heap, value: Ref) -> (Vec<Ref>, Ref) {
    let mut elements = Vec::new();
    let mut current = value;
    loop {
        match current {
            None => return (elements, None),
            Some(handle) => match heap.get(handle) {
                Value::Pair(Pair { car, cdr }) => {
                    elements.push(*car);
                    current = *cdr;
                }
                _ => return (elements, current),
            },
        }
    }
}

/// Like [`raw_list`], but fails if the chain does not terminate in nil.
pub fn proper_list(heap: &Heap, value: Ref) -> Result<Vec<Ref>, EvalError> {
    let (elements, terminator) = raw_list(heap, value);
    if terminator.is_some() {
        return Err(EvalError::runtime(
            "proper_list",
            "improper list where a proper one is required",
        ));
    }
    Ok(elements)
}

/// Renders `value` the way `display` would.
pub fn serialize(heap: &Heap, value: Ref) -> Result<String, EvalError> {
    match value {
        None => Ok("()".to_string()),
        Some(handle) => match heap.get(handle) {
            Value::Number(n) => Ok(n.to_string()),
            Value::Symbol(s) => Ok(s.clone()),
            Value::Pair(_) => serialize_pair(heap, handle),
            Value::Primitive(_) | Value::Closure(_) => Ok("Just a function".to_string()),
            Value::Environment(_) => Err(EvalError::runtime("serialize", "can't serialize")),
        },
    }
}

fn serialize_pair(heap: &Heap, handle: Handle) -> Result<String, EvalError> {
    let (elements, terminator) = raw_list(heap, Some(handle));
    let mut parts: Vec<String> = Vec::with_capacity(elements.len());
    for element in elements {
        parts.push(serialize(heap, element)?);
    }
    match terminator {
        None => Ok(format!("({})", parts.join(" "))),
        Some(tail) => {
            let tail_text = serialize(heap, Some(tail))?;
            Ok(format!("({} . {})", parts.join(" "), tail_text))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;

    fn eval_source(heap: &mut Heap, env: Handle, source: &str) -> Result<Ref, EvalError> {
        let expr = Parser::new(source).read(heap)?;
        evaluate(heap, env, expr)
    }

    fn fresh_env() -> (Heap, Handle) {
        let mut heap = Heap::new();
        let env = heap.new_root_env();
        crate::builtins::register_all(&mut heap, env);
        (heap, env)
    }

    #[test]
    fn numbers_and_nil_are_self_evaluating() {
        let (mut heap, env) = fresh_env();
        let result = eval_source(&mut heap, env, "42").unwrap();
        assert_eq!(serialize(&heap, result).unwrap(), "42");
    }

    #[test]
    fn undefined_symbol_is_a_name_error() {
        let (mut heap, env) = fresh_env();
        let err = eval_source(&mut heap, env, "undefined-name").unwrap_err();
        assert!(matches!(err, EvalError::NameError(_)));
    }

    #[test]
    fn quote_returns_its_argument_unevaluated() {
        let (mut heap, env) = fresh_env();
        let result = eval_source(&mut heap, env, "(quote (1 2 3))").unwrap();
        assert_eq!(serialize(&heap, result).unwrap(), "(1 2 3)");
    }

    #[test]
    fn arithmetic_and_if_compose() {
        let (mut heap, env) = fresh_env();
        let result = eval_source(&mut heap, env, "(if (< 1 2) (+ 1 2 3) 0)").unwrap();
        assert_eq!(serialize(&heap, result).unwrap(), "6");
    }

    #[test]
    fn lexical_capture_survives_after_defining_function_returns() {
        let (mut heap, env) = fresh_env();
        eval_source(
            &mut heap,
            env,
            "(define (make-adder k) (lambda (x) (+ x k)))",
        )
        .unwrap();
        eval_source(&mut heap, env, "(define inc (make-adder 1))").unwrap();
        let result = eval_source(&mut heap, env, "(inc 41)").unwrap();
        assert_eq!(serialize(&heap, result).unwrap(), "42");
    }

    #[test]
    fn closure_name_and_outer_binding_are_independent() {
        let (mut heap, env) = fresh_env();
        eval_source(
            &mut heap,
            env,
            "(define (foo x) (define (bar) (set! x (+ (* x 2) 2)) x) bar)",
        )
        .unwrap();
        eval_source(&mut heap, env, "(define my-foo (foo 20))").unwrap();
        eval_source(&mut heap, env, "(define foo 1543)").unwrap();
        let result = eval_source(&mut heap, env, "(my-foo)").unwrap();
        assert_eq!(serialize(&heap, result).unwrap(), "42");
    }

    #[test]
    fn applying_a_non_function_is_a_runtime_error() {
        let (mut heap, env) = fresh_env();
        let err = eval_source(&mut heap, env, "(1 2 3)").unwrap_err();
        assert!(matches!(err, EvalError::RuntimeError(_)));
    }

    #[test]
    fn collect_reclaims_garbage_after_a_top_level_evaluation() {
        let (mut heap, env) = fresh_env();
        eval_source(&mut heap, env, "(+ 1 2)").unwrap();
        heap.collect(env);
        let result = eval_source(&mut heap, env, "(+ 3 4)").unwrap();
        assert_eq!(serialize(&heap, result).unwrap(), "7");
    }
}
