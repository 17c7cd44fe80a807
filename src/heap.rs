// ABOUTME: Heap module providing arena allocation and mark-and-sweep collection

use crate::error::EvalError;
use crate::value::{Closure, Environment, Pair, Primitive, Value};
use std::collections::HashMap;

/// A non-owning reference to a heap-allocated object. `None` represents `nil`.
pub type Ref = Option<Handle>;

/// A generational index into the heap's object table.
///
/// Using an arena with generational indices lets the collector reuse freed
/// slots without invalidating handles that were reclaimed in a prior
/// generation (a stale handle's generation simply won't match).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle {
    index: u32,
    generation: u32,
}

struct Slot {
    value: Option<Value>,
    generation: u32,
    marked: bool,
}

/// Owns every allocated [`Value`] and reclaims the ones no longer reachable
/// from a root environment.
pub struct Heap {
    slots: Vec<Slot>,
    free: Vec<u32>,
    true_handle: Handle,
    false_handle: Handle,
}

impl Heap {
    /// Creates an empty heap, pre-interning the `#t` and `#f` symbols so
    /// comparisons and predicates don't allocate a fresh symbol object on
    /// every result.
    pub fn new() -> Self {
        let mut heap = Heap {
            slots: Vec::new(),
            free: Vec::new(),
            true_handle: Handle { index: 0, generation: 0 },
            false_handle: Handle { index: 0, generation: 0 },
        };
        heap.true_handle = heap.allocate(Value::Symbol("#t".to_string()));
        heap.false_handle = heap.allocate(Value::Symbol("#f".to_string()));
        heap
    }

    pub fn bool_handle(&self, truthy: bool) -> Handle {
        if truthy {
            self.true_handle
        } else {
            self.false_handle
        }
    }

    pub fn bool_ref(&self, truthy: bool) -> Ref {
        Some(self.bool_handle(truthy))
    }

    /// Registers `value` in the object set and returns a handle to it.
    pub fn allocate(&mut self, value: Value) -> Handle {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.value = Some(value);
            Handle {
                index,
                generation: slot.generation,
            }
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Slot {
                value: Some(value),
                generation: 0,
                marked: false,
            });
            Handle { index, generation: 0 }
        }
    }

    fn slot(&self, handle: Handle) -> &Slot {
        &self.slots[handle.index as usize]
    }

    fn slot_mut(&mut self, handle: Handle) -> &mut Slot {
        &mut self.slots[handle.index as usize]
    }

    fn is_live(&self, handle: Handle) -> bool {
        let slot = self.slot(handle);
        slot.generation == handle.generation && slot.value.is_some()
    }

    /// Borrows the value a handle refers to.
    ///
    /// A handle is only ever obtained from this heap and only ever held
    /// while reachable from the root, so dereferencing it is expected to
    /// always succeed; this is an internal invariant, not a user-facing
    /// error condition. The generation check guards against a stale handle
    /// landing on a slot a later allocation has reused for something else.
    pub fn get(&self, handle: Handle) -> &Value {
        assert!(
            self.is_live(handle),
            "dereferenced a handle to a collected object"
        );
        self.slot(handle).value.as_ref().unwrap()
    }

    pub fn get_mut(&mut self, handle: Handle) -> &mut Value {
        assert!(
            self.is_live(handle),
            "dereferenced a handle to a collected object"
        );
        self.slot_mut(handle).value.as_mut().unwrap()
    }

    pub fn type_name(&self, handle: Handle) -> &'static str {
        self.get(handle).type_name()
    }

    /// Like [`Heap::type_name`], but accepts a `Ref` and reports `"nil"` for
    /// the empty list.
    pub fn type_name_of(&self, value: Ref) -> &'static str {
        match value {
            None => "nil",
            Some(handle) => self.type_name(handle),
        }
    }

    // -- Environment helpers -------------------------------------------------

    /// Allocates a fresh child environment whose parent is `parent`.
    pub fn new_child_env(&mut self, parent: Handle) -> Handle {
        self.allocate(Value::Environment(Environment {
            bindings: HashMap::new(),
            parent: Some(parent),
        }))
    }

    pub fn new_root_env(&mut self) -> Handle {
        self.allocate(Value::Environment(Environment {
            bindings: HashMap::new(),
            parent: None,
        }))
    }

    fn as_env(&self, handle: Handle) -> Result<&Environment, EvalError> {
        match self.get(handle) {
            Value::Environment(env) => Ok(env),
            other => Err(EvalError::runtime(
                "environment",
                format!("expected an environment, got {}", other.type_name()),
            )),
        }
    }

    /// Walks the parent chain looking for `name`, returning its binding.
    pub fn env_resolve(&self, env: Handle, name: &str) -> Result<Ref, EvalError> {
        let mut current = env;
        loop {
            let frame = self.as_env(current)?;
            if let Some(value) = frame.bindings.get(name) {
                return Ok(*value);
            }
            match frame.parent {
                Some(parent) => current = parent,
                None => return Err(EvalError::name_error(name)),
            }
        }
    }

    /// Binds `name` in `env`'s own frame, overwriting any prior binding.
    pub fn env_define(&mut self, env: Handle, name: String, value: Ref) -> Result<(), EvalError> {
        match self.get_mut(env) {
            Value::Environment(frame) => {
                frame.bindings.insert(name, value);
                Ok(())
            }
            other => Err(EvalError::runtime(
                "define",
                format!("expected an environment, got {}", other.type_name()),
            )),
        }
    }

    /// Walks the parent chain to find the frame that already binds `name`
    /// and updates the binding there.
    pub fn env_set(&mut self, env: Handle, name: &str, value: Ref) -> Result<(), EvalError> {
        let mut current = env;
        loop {
            let has_binding = self.as_env(current)?.bindings.contains_key(name);
            if has_binding {
                if let Value::Environment(frame) = self.get_mut(current) {
                    frame.bindings.insert(name.to_string(), value);
                }
                return Ok(());
            }
            match self.as_env(current)?.parent {
                Some(parent) => current = parent,
                None => return Err(EvalError::name_error(name)),
            }
        }
    }

    // -- Garbage collection ---------------------------------------------------

    /// Performs mark-and-sweep starting from `root`, reclaiming every object
    /// not reachable from it. Already-marked objects are never revisited, so
    /// the traversal tolerates the cycles closures create with their
    /// defining environments. The interned `#t`/`#f` symbols are additional
    /// permanent roots: they are never bound in any environment, so without
    /// this they would be reclaimed the first time `collect` runs.
    pub fn collect(&mut self, root: Handle) {
        for slot in &mut self.slots {
            slot.marked = false;
        }

        let mut worklist = vec![root, self.true_handle, self.false_handle];
        while let Some(handle) = worklist.pop() {
            if !self.is_live(handle) {
                continue;
            }
            let slot = self.slot_mut(handle);
            if slot.marked {
                continue;
            }
            slot.marked = true;

            match self.slot(handle).value.as_ref().unwrap() {
                Value::Number(_) | Value::Symbol(_) | Value::Primitive(_) => {}
                Value::Pair(Pair { car, cdr }) => {
                    worklist.extend(car.iter().copied());
                    worklist.extend(cdr.iter().copied());
                }
                Value::Environment(Environment { bindings, parent }) => {
                    worklist.extend(bindings.values().filter_map(|v| *v));
                    worklist.extend(parent.iter().copied());
                }
                Value::Closure(Closure { env, body, .. }) => {
                    worklist.push(*env);
                    worklist.extend(body.iter().filter_map(|v| *v));
                }
            }
        }

        for index in 0..self.slots.len() {
            let slot = &mut self.slots[index];
            if slot.value.is_some() && !slot.marked {
                slot.value = None;
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(index as u32);
            }
        }
    }

    /// Unconditionally reclaims every tracked object.
    pub fn destroy_all(&mut self) {
        self.slots.clear();
        self.free.clear();
    }
}

impl Default for Heap {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocate_and_read_back() {
        let mut heap = Heap::new();
        let handle = heap.allocate(Value::Number(42));
        assert!(matches!(heap.get(handle), Value::Number(42)));
    }

    #[test]
    fn collect_keeps_reachable_pair() {
        let mut heap = Heap::new();
        let root = heap.new_root_env();
        let num = heap.allocate(Value::Number(7));
        let pair = heap.allocate(Value::Pair(Pair {
            car: Some(num),
            cdr: None,
        }));
        heap.env_define(root, "p".to_string(), Some(pair)).unwrap();

        heap.collect(root);

        assert!(heap.is_live(pair));
        assert!(heap.is_live(num));
    }

    #[test]
    fn collect_reclaims_unreachable_objects() {
        let mut heap = Heap::new();
        let root = heap.new_root_env();
        let orphan = heap.allocate(Value::Number(99));

        heap.collect(root);

        assert!(!heap.is_live(orphan));
    }

    #[test]
    fn collect_tolerates_environment_closure_cycle() {
        let mut heap = Heap::new();
        let root = heap.new_root_env();
        let child = heap.new_child_env(root);
        let closure = heap.allocate(Value::Closure(Closure {
            params: vec![],
            body: vec![],
            env: child,
        }));
        // The environment binds back to the closure it is the parent of.
        heap.env_define(child, "self".to_string(), Some(closure))
            .unwrap();
        heap.env_define(root, "f".to_string(), Some(closure))
            .unwrap();

        heap.collect(root);

        assert!(heap.is_live(closure));
        assert!(heap.is_live(child));
    }

    #[test]
    fn bool_handles_are_interned() {
        let heap = Heap::new();
        assert_eq!(heap.bool_handle(true), heap.bool_handle(true));
        assert_ne!(heap.bool_handle(true), heap.bool_handle(false));
    }
}
