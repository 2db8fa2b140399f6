//! Runtime value representation for the pseudocode language.

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;

/// Declared type of a variable, constant, or parameter.
///
/// `Auto` appears only on parameters declared without a type keyword; the
/// effective type is copied from the caller's argument at binding time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataType {
    Integer,
    Real,
    String,
    Auto,
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Integer => write!(f, "Integer"),
            DataType::Real => write!(f, "Real"),
            DataType::String => write!(f, "String"),
            DataType::Auto => write!(f, "Auto"),
        }
    }
}

/// Runtime values during interpretation.
///
/// `Array` is wrapped in `Rc<RefCell<…>>`: cloning an array value aliases the
/// same backing storage, giving arrays the reference semantics the language
/// defines (an element write through any copy is visible through all copies).
/// `Null` is only ever observable as an uninitialized variable or array slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Value {
    Integer(i64),
    Real(f64),
    String(String),
    Array(Rc<RefCell<Vec<Value>>>),
    Null,
}

impl Value {
    /// Allocate an array of `len` uninitialized (Null) slots.
    pub fn new_array(len: usize) -> Self {
        Value::Array(Rc::new(RefCell::new(vec![Value::Null; len])))
    }

    pub fn array_from(values: Vec<Value>) -> Self {
        Value::Array(Rc::new(RefCell::new(values)))
    }

    pub fn from_bool(b: bool) -> Self {
        Value::Integer(i64::from(b))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "Integer",
            Value::Real(_) => "Real",
            Value::String(_) => "String",
            Value::Array(_) => "Array",
            Value::Null => "Null",
        }
    }

    /// Falsy values are `0`, `0.0`, the empty string, and `Null`.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Integer(n) => *n != 0,
            Value::Real(r) => *r != 0.0,
            Value::String(s) => !s.is_empty(),
            Value::Array(_) => true,
            Value::Null => false,
        }
    }

    /// Numeric view of this value, widening Integer to Real.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Integer(n) => Some(*n as f64),
            Value::Real(r) => Some(*r),
            _ => None,
        }
    }

    pub fn as_string(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Loose equality: numerics compare after widening, strings compare by
    /// content, arrays by identity, `Null` only equals `Null`. Values of
    /// unrelated types are unequal rather than an error.
    pub fn loose_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => Rc::ptr_eq(a, b),
            (Value::Null, Value::Null) => true,
            _ => match (self.as_number(), other.as_number()) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
        }
    }

    /// Ordering for the relational operators. Numerics compare after
    /// widening, strings lexicographically; other pairings are not ordered.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
            _ => {
                let (a, b) = (self.as_number()?, other.as_number()?);
                a.partial_cmp(&b)
            }
        }
    }

    /// Render this value the way Display output shows it. Whole Reals drop
    /// their trailing `.0` so `Real` counters print like the original's
    /// numbers; anything richer is the driver's concern.
    pub fn to_display_string(&self) -> String {
        match self {
            Value::Integer(n) => n.to_string(),
            Value::Real(r) => {
                let s = r.to_string();
                match s.strip_suffix(".0") {
                    Some(trimmed) => trimmed.to_string(),
                    None => s,
                }
            }
            Value::String(s) => s.clone(),
            Value::Array(items) => {
                let parts: Vec<String> =
                    items.borrow().iter().map(Value::to_display_string).collect();
                format!("[{}]", parts.join(", "))
            }
            Value::Null => String::new(),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.loose_eq(other)
    }
}
