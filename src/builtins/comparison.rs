//! Numeric comparison operations: =, <, >, <=, >=
//!
//! Each is variadic and chained: every adjacent pair must satisfy the
//! relation. With zero or one argument there are no adjacent pairs to
//! fail, so the result is `#t`.

use super::{define_primitive, eval_operands, expect_number};
use crate::error::EvalError;
use crate::heap::{Handle, Heap, Ref};

fn chained(
    heap: &mut Heap,
    env: Handle,
    operands: &[Ref],
    name: &'static str,
    relation: fn(i64, i64) -> bool,
) -> Result<Ref, EvalError> {
    let values = eval_operands(heap, env, operands)?;
    let mut numbers = Vec::with_capacity(values.len());
    for (i, v) in values.iter().enumerate() {
        numbers.push(expect_number(heap, name, *v, i)?);
    }
    let ok = numbers.windows(2).all(|pair| relation(pair[0], pair[1]));
    Ok(heap.bool_ref(ok))
}

fn builtin_eq(heap: &mut Heap, env: Handle, operands: &[Ref]) -> Result<Ref, EvalError> {
    chained(heap, env, operands, "=", |a, b| a == b)
}

fn builtin_lt(heap: &mut Heap, env: Handle, operands: &[Ref]) -> Result<Ref, EvalError> {
    chained(heap, env, operands, "<", |a, b| a < b)
}

fn builtin_gt(heap: &mut Heap, env: Handle, operands: &[Ref]) -> Result<Ref, EvalError> {
    chained(heap, env, operands, ">", |a, b| a > b)
}

fn builtin_le(heap: &mut Heap, env: Handle, operands: &[Ref]) -> Result<Ref, EvalError> {
    chained(heap, env, operands, "<=", |a, b| a <= b)
}

fn builtin_ge(heap: &mut Heap, env: Handle, operands: &[Ref]) -> Result<Ref, EvalError> {
    chained(heap, env, operands, ">=", |a, b| a >= b)
}

pub fn register(heap: &mut Heap, env: Handle) {
    define_primitive(heap, env, "=", builtin_eq);
    define_primitive(heap, env, "<", builtin_lt);
    define_primitive(heap, env, ">", builtin_gt);
    define_primitive(heap, env, "<=", builtin_le);
    define_primitive(heap, env, ">=", builtin_ge);
}
