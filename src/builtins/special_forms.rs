//! Special forms: quote, if, define, set!, set-car!, set-cdr!, lambda
//!
//! These are ordinary primitives — they receive unevaluated operands and
//! the calling environment like anything else — they simply choose to
//! control evaluation rather than hand it off uniformly. Bad arity in
//! `if`, `define`, `lambda`, `set!`, `set-car!`, and `set-cdr!` is a
//! syntax-error; `quote`'s arity check is a runtime-error, matching the
//! source this is modeled on.

use super::{define_primitive, expect_pair, expect_symbol_name};
use crate::error::EvalError;
use crate::eval::{evaluate, proper_list};
use crate::heap::{Handle, Heap, Ref};
use crate::value::{Closure, Pair, Value};

/// `(quote e)` returns `e` verbatim, without evaluating it.
fn builtin_quote(_heap: &mut Heap, _env: Handle, operands: &[Ref]) -> Result<Ref, EvalError> {
    if operands.len() != 1 {
        return Err(EvalError::arity_error("quote", "1", operands.len()));
    }
    Ok(operands[0])
}

/// `(if c t [e])`: evaluates `c`; if truthy, evaluates and returns `t`;
/// otherwise evaluates and returns `e`, or nil if absent.
fn builtin_if(heap: &mut Heap, env: Handle, operands: &[Ref]) -> Result<Ref, EvalError> {
    if operands.len() < 2 || operands.len() > 3 {
        return Err(EvalError::syntax_arity("if", "2-3", operands.len()));
    }
    let condition = evaluate(heap, env, operands[0])?;
    if crate::value::is_truthy(heap, condition) {
        evaluate(heap, env, operands[1])
    } else if let Some(alternative) = operands.get(2) {
        evaluate(heap, env, *alternative)
    } else {
        Ok(None)
    }
}

/// `(define name expr)` or `(define (name p1 .. pn) body..)`. Always
/// returns nil.
fn builtin_define(heap: &mut Heap, env: Handle, operands: &[Ref]) -> Result<Ref, EvalError> {
    if operands.len() < 2 {
        return Err(EvalError::syntax_arity("define", "at least 2", operands.len()));
    }

    let is_symbol_form = matches!(
        operands[0].map(|h| heap.get(h)),
        Some(Value::Symbol(_))
    );

    if is_symbol_form {
        if operands.len() != 2 {
            return Err(EvalError::syntax_arity("define", "2", operands.len()));
        }
        let name = expect_symbol_name(heap, "define", operands[0], 0)?;
        let value = evaluate(heap, env, operands[1])?;
        heap.env_define(env, name, value)?;
        return Ok(None);
    }

    // (define (name p1 .. pn) body..)
    let header = proper_list(heap, operands[0])
        .map_err(|_| EvalError::syntax("define: malformed function header"))?;
    let (name_expr, param_exprs) = header
        .split_first()
        .ok_or_else(|| EvalError::syntax("define: function header is missing a name"))?;
    let name = expect_symbol_name(heap, "define", *name_expr, 0)?;
    let params = symbol_names(heap, "define", param_exprs)?;

    let closure = heap.allocate(Value::Closure(Closure {
        params,
        body: operands[1..].to_vec(),
        env,
    }));
    heap.env_define(env, name, Some(closure))?;
    Ok(None)
}

/// `(set! name expr)`: updates `name`'s binding in the innermost
/// enclosing environment that defines it. Always returns nil.
fn builtin_set(heap: &mut Heap, env: Handle, operands: &[Ref]) -> Result<Ref, EvalError> {
    if operands.len() != 2 {
        return Err(EvalError::syntax_arity("set!", "2", operands.len()));
    }
    let name = expect_symbol_name(heap, "set!", operands[0], 0)?;
    let value = evaluate(heap, env, operands[1])?;
    heap.env_set(env, &name, value)?;
    Ok(None)
}

/// `(set-car! p v)`: mutates `p`'s car field after evaluating both
/// operands. Always returns nil.
fn builtin_set_car(heap: &mut Heap, env: Handle, operands: &[Ref]) -> Result<Ref, EvalError> {
    if operands.len() != 2 {
        return Err(EvalError::syntax_arity("set-car!", "2", operands.len()));
    }
    let pair_value = evaluate(heap, env, operands[0])?;
    let new_value = evaluate(heap, env, operands[1])?;
    let pair = expect_pair(heap, "set-car!", pair_value, 0)?;
    if let Value::Pair(p) = heap.get_mut(pair) {
        p.car = new_value;
    }
    Ok(None)
}

/// `(set-cdr! p v)`: mutates `p`'s cdr field after evaluating both
/// operands. Always returns nil.
fn builtin_set_cdr(heap: &mut Heap, env: Handle, operands: &[Ref]) -> Result<Ref, EvalError> {
    if operands.len() != 2 {
        return Err(EvalError::syntax_arity("set-cdr!", "2", operands.len()));
    }
    let pair_value = evaluate(heap, env, operands[0])?;
    let new_value = evaluate(heap, env, operands[1])?;
    let pair = expect_pair(heap, "set-cdr!", pair_value, 0)?;
    if let Value::Pair(p) = heap.get_mut(pair) {
        p.cdr = new_value;
    }
    Ok(None)
}

/// `(lambda (p1 .. pn) body..)` (at least 2 args): produces a Closure
/// capturing the defining environment, the parameter names, and the body.
fn builtin_lambda(heap: &mut Heap, env: Handle, operands: &[Ref]) -> Result<Ref, EvalError> {
    if operands.len() < 2 {
        return Err(EvalError::syntax_arity("lambda", "at least 2", operands.len()));
    }
    let param_exprs = proper_list(heap, operands[0])
        .map_err(|_| EvalError::syntax("lambda: malformed parameter list"))?;
    let params = symbol_names(heap, "lambda", &param_exprs)?;
    let closure = heap.allocate(Value::Closure(Closure {
        params,
        body: operands[1..].to_vec(),
        env,
    }));
    Ok(Some(closure))
}

fn symbol_names(heap: &Heap, function: &str, exprs: &[Ref]) -> Result<Vec<String>, EvalError> {
    exprs
        .iter()
        .enumerate()
        .map(|(i, e)| expect_symbol_name(heap, function, *e, i))
        .collect()
}

pub fn register(heap: &mut Heap, env: Handle) {
    define_primitive(heap, env, "quote", builtin_quote);
    define_primitive(heap, env, "if", builtin_if);
    define_primitive(heap, env, "define", builtin_define);
    define_primitive(heap, env, "set!", builtin_set);
    define_primitive(heap, env, "set-car!", builtin_set_car);
    define_primitive(heap, env, "set-cdr!", builtin_set_cdr);
    define_primitive(heap, env, "lambda", builtin_lambda);
}
