// Copyright 2025 the Alloy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Loosely-typed input values.
//!
//! [`Value`] is the shape every declarative spec takes before validation. It is
//! a superset of JSON: besides the usual scalars, arrays and objects it can carry
//! a [`Func`] (a function value whose return can be schema-checked) and a
//! [`Handle`] (an arbitrary typed host object, for example a callback closure).

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use crate::error::SchemaError;

/// Object map used by [`Value::Object`].
///
/// Keys are kept sorted so that dumps and error lists are deterministic.
pub type Object = BTreeMap<String, Value>;

/// Result of calling a [`Func`].
pub type FuncResult = Result<Value, Vec<SchemaError>>;

/// A function value.
///
/// Plain functions return `Ok`; functions wrapped by
/// [`func`](crate::func) validate their return value on every call and
/// report failures as an error list.
#[derive(Clone)]
pub struct Func(Rc<dyn Fn(&[Value]) -> FuncResult>);

impl Func {
    /// Wrap a closure as a function value.
    pub fn new(f: impl Fn(&[Value]) -> FuncResult + 'static) -> Self {
        Self(Rc::new(f))
    }

    /// Call the function with positional arguments.
    pub fn call(&self, args: &[Value]) -> FuncResult {
        (self.0)(args)
    }

    /// Returns true if both values point at the same closure.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Func {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<function>")
    }
}

/// An opaque, typed host object travelling through the untyped layer.
///
/// Handles are how callbacks and other Rust values reach behaviour
/// configuration: the schema only checks the type, the behaviour downcasts.
#[derive(Clone)]
pub struct Handle {
    inner: Rc<dyn Any>,
    type_name: &'static str,
}

impl Handle {
    /// Wrap a value.
    pub fn new<T: 'static>(value: T) -> Self {
        Self {
            inner: Rc::new(value),
            type_name: std::any::type_name::<T>(),
        }
    }

    /// Borrow the wrapped value if it has type `T`.
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        let any: &dyn Any = &*self.inner;
        any.downcast_ref::<T>()
    }

    /// Returns true if the wrapped value has type `T`.
    pub fn is<T: 'static>(&self) -> bool {
        self.downcast_ref::<T>().is_some()
    }

    /// Name of the wrapped type, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Returns true if both handles share the same allocation.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<handle: {}>", self.type_name)
    }
}

/// A loosely-typed value.
///
/// `Null` plays the role of "undefined": schema fields treat a `Null` entry
/// exactly like a missing key.
#[derive(Clone, Default)]
pub enum Value {
    /// Absent / undefined.
    #[default]
    Null,
    /// Boolean.
    Bool(bool),
    /// Number (always stored as `f64`).
    Number(f64),
    /// String.
    String(String),
    /// Ordered list.
    Array(Vec<Value>),
    /// Key/value map.
    Object(Object),
    /// Function value.
    Func(Func),
    /// Typed host object.
    Handle(Handle),
}

impl Value {
    /// Build an object from key/value pairs.
    pub fn object<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Self)>,
    {
        Self::Object(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// An empty object.
    pub fn empty_object() -> Self {
        Self::Object(Object::new())
    }

    /// Build an array of strings.
    pub fn strings<S, I>(items: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = S>,
    {
        Self::Array(items.into_iter().map(|s| Self::String(s.into())).collect())
    }

    /// Wrap a typed host object.
    pub fn handle<T: 'static>(value: T) -> Self {
        Self::Handle(Handle::new(value))
    }

    /// Wrap a closure as a function value.
    pub fn func(f: impl Fn(&[Self]) -> FuncResult + 'static) -> Self {
        Self::Func(Func::new(f))
    }

    /// Returns true for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Borrow as a string slice.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Read as a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Read as a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Read as a non-negative integer.
    pub fn as_usize(&self) -> Option<usize> {
        match self {
            Self::Number(n) if *n >= 0.0 && n.fract() == 0.0 && *n <= usize::MAX as f64 => {
                #[allow(
                    clippy::cast_possible_truncation,
                    clippy::cast_sign_loss,
                    reason = "range and integrality are checked above."
                )]
                Some(*n as usize)
            }
            _ => None,
        }
    }

    /// Borrow as an array.
    pub fn as_array(&self) -> Option<&[Self]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Borrow as an object.
    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Self::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Borrow as a function value.
    pub fn as_func(&self) -> Option<&Func> {
        match self {
            Self::Func(f) => Some(f),
            _ => None,
        }
    }

    /// Borrow as a handle.
    pub fn as_handle(&self) -> Option<&Handle> {
        match self {
            Self::Handle(h) => Some(h),
            _ => None,
        }
    }

    /// Look up a key when this value is an object.
    pub fn get(&self, key: &str) -> Option<&Self> {
        self.as_object()
            .and_then(|o| o.get(key))
            .filter(|v| !v.is_null())
    }

    /// Short name of the variant, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
            Self::Func(_) => "function",
            Self::Handle(_) => "handle",
        }
    }

    /// Convert to JSON for display. Functions and handles become marker strings.
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value as Json;
        match self {
            Self::Null => Json::Null,
            Self::Bool(b) => Json::Bool(*b),
            Self::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 9.0e15 {
                    #[allow(
                        clippy::cast_possible_truncation,
                        reason = "integral and within the exact f64 integer range."
                    )]
                    Json::from(*n as i64)
                } else {
                    serde_json::Number::from_f64(*n).map_or(Json::Null, Json::Number)
                }
            }
            Self::String(s) => Json::String(s.clone()),
            Self::Array(items) => Json::Array(items.iter().map(Self::to_json).collect()),
            Self::Object(o) => Json::Object(o.iter().map(|(k, v)| (k.clone(), v.to_json())).collect()),
            Self::Func(_) => Json::String(String::from("<function>")),
            Self::Handle(h) => Json::String(format!("<handle: {}>", h.type_name())),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("Null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::String(s) => write!(f, "{s:?}"),
            Self::Array(items) => f.debug_list().entries(items).finish(),
            Self::Object(o) => f.debug_map().entries(o).finish(),
            Self::Func(func) => func.fmt(f),
            Self::Handle(h) => h.fmt(f),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Array(a), Self::Array(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => a == b,
            (Self::Func(a), Self::Func(b)) => a.ptr_eq(b),
            (Self::Handle(a), Self::Handle(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        #[allow(clippy::cast_precision_loss, reason = "UI-scale counts are small.")]
        Self::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<Vec<Self>> for Value {
    fn from(items: Vec<Self>) -> Self {
        Self::Array(items)
    }
}

impl From<Object> for Value {
    fn from(o: Object) -> Self {
        Self::Object(o)
    }
}

impl From<Func> for Value {
    fn from(f: Func) -> Self {
        Self::Func(f)
    }
}

impl From<Handle> for Value {
    fn from(h: Handle) -> Self {
        Self::Handle(h)
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Self::Null, Into::into)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        use serde_json::Value as Json;
        match json {
            Json::Null => Self::Null,
            Json::Bool(b) => Self::Bool(b),
            Json::Number(n) => Self::Number(n.as_f64().unwrap_or_default()),
            Json::String(s) => Self::String(s),
            Json::Array(items) => Self::Array(items.into_iter().map(Self::from).collect()),
            Json::Object(map) => Self::Object(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_round_trip_keeps_integers_integral() {
        let v = Value::from(serde_json::json!({ "rows": 3, "ratio": 0.5, "tags": ["a"] }));
        assert_eq!(v.get("rows").and_then(Value::as_usize), Some(3));
        let back = v.to_json();
        assert_eq!(back["rows"], serde_json::json!(3));
        assert_eq!(back["ratio"], serde_json::json!(0.5));
    }

    #[test]
    fn handles_downcast_only_to_their_type() {
        let v = Value::handle(42_u8);
        let h = v.as_handle().unwrap();
        assert_eq!(h.downcast_ref::<u8>(), Some(&42));
        assert!(h.downcast_ref::<u16>().is_none());
        assert!(h.type_name().contains("u8"));
    }

    #[test]
    fn null_entries_read_as_missing() {
        let v = Value::object([("a", Value::Null), ("b", Value::from(1))]);
        assert!(v.get("a").is_none());
        assert!(v.get("b").is_some());
    }

    #[test]
    fn function_values_compare_by_identity() {
        let f = Func::new(|_| Ok(Value::Null));
        let g = Func::new(|_| Ok(Value::Null));
        assert_eq!(Value::Func(f.clone()), Value::Func(f));
        assert_ne!(Value::Func(g.clone()), Value::Func(Func::new(|_| Ok(Value::Null))));
        assert_eq!(g.call(&[]).unwrap(), Value::Null);
    }
}
