//! # Built-in Functions Module
//!
//! Primitive functions installed into the root environment, organized into
//! six categories totalling thirty-one primitives.
//!
//! ## Categories
//!
//! - **[arithmetic]**: `+`, `-`, `*`, `/`, `min`, `max`, `abs`
//! - **[comparison]**: `=`, `<`, `>`, `<=`, `>=`
//! - **[logic]**: `not`, `and`, `or`
//! - **[predicates]**: `number?`, `symbol?`, `pair?`, `list?`, `null?`, `boolean?`
//! - **[lists]**: `cons`, `car`, `cdr`, `list`, `list-ref`, `list-tail`
//! - **[special_forms]**: `quote`, `if`, `define`, `set!`, `set-car!`, `set-cdr!`, `lambda`
//!
//! Every primitive receives the unevaluated operand expressions plus the
//! calling environment; special forms are ordinary primitives that happen
//! to control evaluation of their own operands.

use crate::error::EvalError;
use crate::eval::evaluate_all;
use crate::heap::{Handle, Heap, Ref};
use crate::value::Value;

pub mod arithmetic;
pub mod comparison;
pub mod lists;
pub mod logic;
pub mod predicates;
pub mod special_forms;

/// Registers every primitive in `env`.
pub fn register_all(heap: &mut Heap, env: Handle) {
    arithmetic::register(heap, env);
    comparison::register(heap, env);
    logic::register(heap, env);
    predicates::register(heap, env);
    lists::register(heap, env);
    special_forms::register(heap, env);
}

fn define_primitive(
    heap: &mut Heap,
    env: Handle,
    name: &'static str,
    func: crate::value::PrimitiveFn,
) {
    let handle = heap.allocate(Value::Primitive(crate::value::Primitive { name, func }));
    heap.env_define(env, name.to_string(), Some(handle))
        .expect("env is always a valid environment handle");
}

/// Evaluates every operand left-to-right in the calling environment. Most
/// primitives (everything but the special forms and the lazily-evaluating
/// logic operators) use this to get ordinary function-call semantics.
fn eval_operands(heap: &mut Heap, env: Handle, operands: &[Ref]) -> Result<Vec<Ref>, EvalError> {
    evaluate_all(heap, env, operands)
}

fn expect_number(heap: &Heap, function: &str, value: Ref, position: usize) -> Result<i64, EvalError> {
    match value.map(|h| heap.get(h)) {
        Some(Value::Number(n)) => Ok(*n),
        _ => Err(EvalError::type_error(
            function,
            "number",
            heap.type_name_of(value),
            position,
        )),
    }
}

fn expect_symbol_name(heap: &Heap, function: &str, value: Ref, position: usize) -> Result<String, EvalError> {
    match value.map(|h| heap.get(h)) {
        Some(Value::Symbol(s)) => Ok(s.clone()),
        _ => Err(EvalError::type_error(
            function,
            "symbol",
            heap.type_name_of(value),
            position,
        )),
    }
}

fn expect_pair(heap: &Heap, function: &str, value: Ref, position: usize) -> Result<Handle, EvalError> {
    match value {
        Some(h) if matches!(heap.get(h), Value::Pair(_)) => Ok(h),
        _ => Err(EvalError::type_error(
            function,
            "pair",
            heap.type_name_of(value),
            position,
        )),
    }
}
