//! Arithmetic operations: +, -, *, /, min, max, abs
//!
//! All operate over `i64`. Overflow wraps; division by zero raises a
//! runtime-error.

use super::{define_primitive, eval_operands, expect_number};
use crate::error::EvalError;
use crate::heap::{Handle, Heap, Ref};
use crate::value::Value;

/// Returns the sum of all arguments; the identity with no arguments is 0.
///
/// # Examples
///
/// ```lisp
/// (+ 1 2 3) => 6
/// (+) => 0
/// ```
fn builtin_add(heap: &mut Heap, env: Handle, operands: &[Ref]) -> Result<Ref, EvalError> {
    let values = eval_operands(heap, env, operands)?;
    let mut sum: i64 = 0;
    for (i, v) in values.iter().enumerate() {
        sum = sum.wrapping_add(expect_number(heap, "+", *v, i)?);
    }
    Ok(Some(heap.allocate(Value::Number(sum))))
}

/// Subtracts every argument after the first from it. Requires at least two
/// arguments: `a - b - c - ...`.
///
/// # Examples
///
/// ```lisp
/// (- 10 3 2) => 5
/// ```
fn builtin_sub(heap: &mut Heap, env: Handle, operands: &[Ref]) -> Result<Ref, EvalError> {
    let values = eval_operands(heap, env, operands)?;
    if values.len() < 2 {
        return Err(EvalError::arity_error("-", "at least 2", values.len()));
    }
    let mut result = expect_number(heap, "-", values[0], 0)?;
    for (i, v) in values[1..].iter().enumerate() {
        result = result.wrapping_sub(expect_number(heap, "-", *v, i + 1)?);
    }
    Ok(Some(heap.allocate(Value::Number(result))))
}

/// Returns the product of all arguments; the identity with no arguments is 1.
///
/// # Examples
///
/// ```lisp
/// (* 2 3 4) => 24
/// (*) => 1
/// ```
fn builtin_mul(heap: &mut Heap, env: Handle, operands: &[Ref]) -> Result<Ref, EvalError> {
    let values = eval_operands(heap, env, operands)?;
    let mut product: i64 = 1;
    for (i, v) in values.iter().enumerate() {
        product = product.wrapping_mul(expect_number(heap, "*", *v, i)?);
    }
    Ok(Some(heap.allocate(Value::Number(product))))
}

/// Divides the first argument by every argument after it, using truncated
/// signed division. Requires at least two arguments.
///
/// # Examples
///
/// ```lisp
/// (/ 20 4) => 5
/// (/ 100 2 5) => 10
/// ```
fn builtin_div(heap: &mut Heap, env: Handle, operands: &[Ref]) -> Result<Ref, EvalError> {
    let values = eval_operands(heap, env, operands)?;
    if values.len() < 2 {
        return Err(EvalError::arity_error("/", "at least 2", values.len()));
    }
    let mut result = expect_number(heap, "/", values[0], 0)?;
    for (i, v) in values[1..].iter().enumerate() {
        let divisor = expect_number(heap, "/", *v, i + 1)?;
        if divisor == 0 {
            return Err(EvalError::runtime("/", "division by zero"));
        }
        result = result.wrapping_div(divisor);
    }
    Ok(Some(heap.allocate(Value::Number(result))))
}

/// Returns the smallest argument. Requires at least one argument.
fn builtin_min(heap: &mut Heap, env: Handle, operands: &[Ref]) -> Result<Ref, EvalError> {
    let values = eval_operands(heap, env, operands)?;
    if values.is_empty() {
        return Err(EvalError::arity_error("min", "at least 1", 0));
    }
    let mut best = expect_number(heap, "min", values[0], 0)?;
    for (i, v) in values[1..].iter().enumerate() {
        best = best.min(expect_number(heap, "min", *v, i + 1)?);
    }
    Ok(Some(heap.allocate(Value::Number(best))))
}

/// Returns the largest argument. Requires at least one argument.
fn builtin_max(heap: &mut Heap, env: Handle, operands: &[Ref]) -> Result<Ref, EvalError> {
    let values = eval_operands(heap, env, operands)?;
    if values.is_empty() {
        return Err(EvalError::arity_error("max", "at least 1", 0));
    }
    let mut best = expect_number(heap, "max", values[0], 0)?;
    for (i, v) in values[1..].iter().enumerate() {
        best = best.max(expect_number(heap, "max", *v, i + 1)?);
    }
    Ok(Some(heap.allocate(Value::Number(best))))
}

/// Returns the absolute value of its single argument.
fn builtin_abs(heap: &mut Heap, env: Handle, operands: &[Ref]) -> Result<Ref, EvalError> {
    let values = eval_operands(heap, env, operands)?;
    if values.len() != 1 {
        return Err(EvalError::arity_error("abs", "1", values.len()));
    }
    let n = expect_number(heap, "abs", values[0], 0)?;
    Ok(Some(heap.allocate(Value::Number(n.wrapping_abs()))))
}

pub fn register(heap: &mut Heap, env: Handle) {
    define_primitive(heap, env, "+", builtin_add);
    define_primitive(heap, env, "-", builtin_sub);
    define_primitive(heap, env, "*", builtin_mul);
    define_primitive(heap, env, "/", builtin_div);
    define_primitive(heap, env, "min", builtin_min);
    define_primitive(heap, env, "max", builtin_max);
    define_primitive(heap, env, "abs", builtin_abs);
}
