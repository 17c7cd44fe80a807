//! Pair and list operations: cons, car, cdr, list, list-ref, list-tail

use super::{define_primitive, eval_operands, expect_number, expect_pair};
use crate::error::EvalError;
use crate::eval::proper_list;
use crate::heap::{Handle, Heap, Ref};
use crate::value::{Pair, Value};

/// Constructs a new Pair from two evaluated arguments.
fn builtin_cons(heap: &mut Heap, env: Handle, operands: &[Ref]) -> Result<Ref, EvalError> {
    let values = eval_operands(heap, env, operands)?;
    if values.len() != 2 {
        return Err(EvalError::arity_error("cons", "2", values.len()));
    }
    Ok(Some(heap.allocate(Value::Pair(Pair {
        car: values[0],
        cdr: values[1],
    }))))
}

fn builtin_car(heap: &mut Heap, env: Handle, operands: &[Ref]) -> Result<Ref, EvalError> {
    let values = eval_operands(heap, env, operands)?;
    if values.len() != 1 {
        return Err(EvalError::arity_error("car", "1", values.len()));
    }
    let pair = expect_pair(heap, "car", values[0], 0)?;
    Ok(heap.get(pair).as_pair().unwrap().car)
}

fn builtin_cdr(heap: &mut Heap, env: Handle, operands: &[Ref]) -> Result<Ref, EvalError> {
    let values = eval_operands(heap, env, operands)?;
    if values.len() != 1 {
        return Err(EvalError::arity_error("cdr", "1", values.len()));
    }
    let pair = expect_pair(heap, "cdr", values[0], 0)?;
    Ok(heap.get(pair).as_pair().unwrap().cdr)
}

/// Builds an `n`-element proper list from evaluated arguments (nil if
/// `n = 0`).
fn builtin_list(heap: &mut Heap, env: Handle, operands: &[Ref]) -> Result<Ref, EvalError> {
    let values = eval_operands(heap, env, operands)?;
    let mut tail: Ref = None;
    for value in values.into_iter().rev() {
        tail = Some(heap.allocate(Value::Pair(Pair { car: value, cdr: tail })));
    }
    Ok(tail)
}

/// Returns the `k`th element (0-indexed) of a proper list; `k` must be in
/// `[0, length)`.
fn builtin_list_ref(heap: &mut Heap, env: Handle, operands: &[Ref]) -> Result<Ref, EvalError> {
    let values = eval_operands(heap, env, operands)?;
    if values.len() != 2 {
        return Err(EvalError::arity_error("list-ref", "2", values.len()));
    }
    let elements = proper_list(heap, values[0])
        .map_err(|_| EvalError::runtime("list-ref", "improper list where a proper one is required"))?;
    let index = expect_number(heap, "list-ref", values[1], 1)?;
    if index < 0 || index as usize >= elements.len() {
        return Err(EvalError::runtime("list-ref", "index out of range"));
    }
    Ok(elements[index as usize])
}

/// Returns the suffix of a proper list starting at index `k`; `k` must be
/// in `[0, length]`, and `k = length` returns nil.
fn builtin_list_tail(heap: &mut Heap, env: Handle, operands: &[Ref]) -> Result<Ref, EvalError> {
    let values = eval_operands(heap, env, operands)?;
    if values.len() != 2 {
        return Err(EvalError::arity_error("list-tail", "2", values.len()));
    }
    let k = expect_number(heap, "list-tail", values[1], 1)?;
    if k < 0 {
        return Err(EvalError::runtime("list-tail", "index out of range"));
    }
    let mut current = values[0];
    for _ in 0..k {
        match current {
            Some(handle) => match heap.get(handle) {
                Value::Pair(Pair { cdr, .. }) => current = *cdr,
                _ => return Err(EvalError::runtime("list-tail", "index out of range")),
            },
            None => return Err(EvalError::runtime("list-tail", "index out of range")),
        }
    }
    Ok(current)
}

pub fn register(heap: &mut Heap, env: Handle) {
    define_primitive(heap, env, "cons", builtin_cons);
    define_primitive(heap, env, "car", builtin_car);
    define_primitive(heap, env, "cdr", builtin_cdr);
    define_primitive(heap, env, "list", builtin_list);
    define_primitive(heap, env, "list-ref", builtin_list_ref);
    define_primitive(heap, env, "list-tail", builtin_list_tail);
}
