//! Nested variable environments.
//!
//! An environment is a stack of call frames; each frame is a stack of
//! scopes; each scope is an insertion-ordered map from case-folded name to a
//! shared slot. A scope entry is either owned (the slot was created here) or
//! aliased (the entry points at a slot owned by a caller's scope, which is
//! the mechanism behind `Ref` parameters). Lookups walk the current frame's
//! scopes innermost-out, then fall through to the globals; a called
//! subroutine therefore sees only its own locals, its parameters, and the
//! globals, never the caller's locals.

use gaddis_core::{DataType, Value};
use indexmap::IndexMap;
use std::cell::RefCell;
use std::rc::Rc;

/// A mutable cell holding a variable's value plus its declared type,
/// constness, and original-casing name for the debugger.
#[derive(Debug, Clone)]
pub struct Slot {
    pub value: Value,
    pub is_constant: bool,
    pub data_type: DataType,
    pub display_name: String,
}

pub type SlotRef = Rc<RefCell<Slot>>;

/// Name-resolution failures, mapped to line-carrying runtime errors by the
/// interpreter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvError {
    Undeclared(String),
    Duplicate(String),
    ConstantAssignment(String),
}

#[derive(Debug, Default)]
struct Scope {
    slots: IndexMap<String, SlotRef>,
}

#[derive(Debug)]
struct Frame {
    scopes: Vec<Scope>,
}

impl Frame {
    fn new() -> Self {
        Self {
            scopes: vec![Scope::default()],
        }
    }
}

#[derive(Debug)]
pub struct Environment {
    frames: Vec<Frame>,
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment {
    pub fn new() -> Self {
        Self {
            frames: vec![Frame::new()],
        }
    }

    /// Enter a nested block scope in the current frame.
    pub fn push_scope(&mut self) {
        self.current_frame_mut().scopes.push(Scope::default());
    }

    pub fn pop_scope(&mut self) {
        let frame = self.current_frame_mut();
        if frame.scopes.len() > 1 {
            frame.scopes.pop();
        }
    }

    /// Enter a subroutine call: a fresh frame whose only enclosing scope is
    /// the globals.
    pub fn push_frame(&mut self) {
        self.frames.push(Frame::new());
    }

    pub fn pop_frame(&mut self) {
        if self.frames.len() > 1 {
            self.frames.pop();
        }
    }

    fn current_frame(&self) -> &Frame {
        self.frames.last().expect("environment has a frame")
    }

    fn current_frame_mut(&mut self) -> &mut Frame {
        self.frames.last_mut().expect("environment has a frame")
    }

    fn current_scope_mut(&mut self) -> &mut Scope {
        self.current_frame_mut()
            .scopes
            .last_mut()
            .expect("frame has a scope")
    }

    fn lookup(&self, name: &str) -> Option<SlotRef> {
        let key = name.to_lowercase();
        for scope in self.current_frame().scopes.iter().rev() {
            if let Some(slot) = scope.slots.get(&key) {
                return Some(slot.clone());
            }
        }
        if self.frames.len() > 1 {
            if let Some(slot) = self.frames[0].scopes[0].slots.get(&key) {
                return Some(slot.clone());
            }
        }
        None
    }

    /// Create an owned slot in the current scope.
    pub fn define(
        &mut self,
        name: &str,
        is_constant: bool,
        data_type: DataType,
        value: Value,
    ) -> Result<(), EnvError> {
        let key = name.to_lowercase();
        let scope = self.current_scope_mut();
        if scope.slots.contains_key(&key) {
            return Err(EnvError::Duplicate(name.to_string()));
        }
        scope.slots.insert(
            key,
            Rc::new(RefCell::new(Slot {
                value,
                is_constant,
                data_type,
                display_name: name.to_string(),
            })),
        );
        Ok(())
    }

    /// Install an alias to a slot owned elsewhere; reads and writes through
    /// either name share the same storage.
    pub fn define_alias(&mut self, name: &str, slot: SlotRef) -> Result<(), EnvError> {
        let key = name.to_lowercase();
        let scope = self.current_scope_mut();
        if scope.slots.contains_key(&key) {
            return Err(EnvError::Duplicate(name.to_string()));
        }
        scope.slots.insert(key, slot);
        Ok(())
    }

    pub fn assign(&mut self, name: &str, value: Value) -> Result<(), EnvError> {
        let slot = self
            .lookup(name)
            .ok_or_else(|| EnvError::Undeclared(name.to_string()))?;
        if slot.borrow().is_constant {
            return Err(EnvError::ConstantAssignment(name.to_string()));
        }
        slot.borrow_mut().value = value;
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<Value, EnvError> {
        self.lookup(name)
            .map(|slot| slot.borrow().value.clone())
            .ok_or_else(|| EnvError::Undeclared(name.to_string()))
    }

    pub fn slot(&self, name: &str) -> Result<SlotRef, EnvError> {
        self.lookup(name)
            .ok_or_else(|| EnvError::Undeclared(name.to_string()))
    }

    /// Flatten the visible slots into a `displayName → value` view for the
    /// debugger: globals first, then the current frame's scopes outermost-in,
    /// inner shadowing outer. Aliased slots contribute their current value
    /// under the owning slot's display name.
    pub fn snapshot(&self) -> IndexMap<String, Value> {
        let mut folded: IndexMap<String, (String, Value)> = IndexMap::new();
        let mut absorb = |scope: &Scope| {
            for (key, slot) in &scope.slots {
                let slot = slot.borrow();
                folded.insert(
                    key.clone(),
                    (slot.display_name.clone(), slot.value.clone()),
                );
            }
        };
        absorb(&self.frames[0].scopes[0]);
        let visible = if self.frames.len() > 1 {
            self.current_frame().scopes.iter()
        } else {
            self.frames[0].scopes[1..].iter()
        };
        for scope in visible {
            absorb(scope);
        }
        folded
            .into_iter()
            .map(|(_, (display_name, value))| (display_name, value))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_fold_case_but_keep_display_casing() {
        let mut env = Environment::new();
        env.define("Total", false, DataType::Integer, Value::Integer(3))
            .unwrap();
        assert_eq!(env.get("total"), Ok(Value::Integer(3)));
        assert_eq!(env.get("TOTAL"), Ok(Value::Integer(3)));
        let snap = env.snapshot();
        assert!(snap.contains_key("Total"));
    }

    #[test]
    fn duplicate_in_same_scope_is_rejected() {
        let mut env = Environment::new();
        env.define("x", false, DataType::Integer, Value::Integer(1))
            .unwrap();
        assert_eq!(
            env.define("X", false, DataType::Integer, Value::Integer(2)),
            Err(EnvError::Duplicate("X".to_string()))
        );
    }

    #[test]
    fn inner_scope_shadows_then_pops() {
        let mut env = Environment::new();
        env.define("x", false, DataType::Integer, Value::Integer(1))
            .unwrap();
        env.push_scope();
        env.define("x", false, DataType::Integer, Value::Integer(2))
            .unwrap();
        assert_eq!(env.get("x"), Ok(Value::Integer(2)));
        env.pop_scope();
        assert_eq!(env.get("x"), Ok(Value::Integer(1)));
    }

    #[test]
    fn constants_reject_assignment() {
        let mut env = Environment::new();
        env.define("PI", true, DataType::Real, Value::Real(3.14))
            .unwrap();
        assert_eq!(
            env.assign("pi", Value::Real(3.0)),
            Err(EnvError::ConstantAssignment("pi".to_string()))
        );
    }

    #[test]
    fn frames_hide_caller_locals_but_expose_globals() {
        let mut env = Environment::new();
        env.define("g", false, DataType::Integer, Value::Integer(7))
            .unwrap();
        env.push_scope();
        env.define("local", false, DataType::Integer, Value::Integer(1))
            .unwrap();
        env.push_frame();
        assert_eq!(env.get("g"), Ok(Value::Integer(7)));
        assert!(env.get("local").is_err());
        env.pop_frame();
        assert_eq!(env.get("local"), Ok(Value::Integer(1)));
    }

    #[test]
    fn aliases_share_storage_both_ways() {
        let mut env = Environment::new();
        env.define("a", false, DataType::Integer, Value::Integer(1))
            .unwrap();
        let slot = env.slot("a").unwrap();
        env.push_frame();
        env.define_alias("x", slot).unwrap();
        env.assign("x", Value::Integer(99)).unwrap();
        env.pop_frame();
        assert_eq!(env.get("a"), Ok(Value::Integer(99)));
    }

    #[test]
    fn snapshot_orders_globals_before_locals() {
        let mut env = Environment::new();
        env.define("first", false, DataType::Integer, Value::Integer(1))
            .unwrap();
        env.push_scope();
        env.define("second", false, DataType::Integer, Value::Integer(2))
            .unwrap();
        let snapshot = env.snapshot();
        let keys: Vec<&String> = snapshot.keys().collect();
        assert_eq!(keys, vec!["first", "second"]);
    }
}
