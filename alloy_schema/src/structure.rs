// Copyright 2025 the Alloy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Validated configuration and the top-level extraction entry points.

use std::rc::Rc;

use crate::error::{Path, SchemaError, ValidationError};
use crate::processor::Processor;
use crate::value::{Func, Handle, Object, Value};

/// A validated object with typed accessors.
///
/// Accessors return `None` (or the supplied default) for absent keys; the
/// schema that produced the struct decides which keys are guaranteed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Struct(Rc<Object>);

impl Struct {
    /// Wrap an already-validated object.
    pub fn new(object: Object) -> Self {
        Self(Rc::new(object))
    }

    /// Raw value at `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key).filter(|v| !v.is_null())
    }

    /// Returns true if `key` is present.
    pub fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// String at `key`.
    pub fn str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Boolean at `key`.
    pub fn bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }

    /// Boolean at `key`, or `default`.
    pub fn bool_or(&self, key: &str, default: bool) -> bool {
        self.bool(key).unwrap_or(default)
    }

    /// Number at `key`.
    pub fn number(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(Value::as_f64)
    }

    /// Non-negative integer at `key`.
    pub fn usize(&self, key: &str) -> Option<usize> {
        self.get(key).and_then(Value::as_usize)
    }

    /// Array at `key`.
    pub fn array(&self, key: &str) -> Option<&[Value]> {
        self.get(key).and_then(Value::as_array)
    }

    /// Object at `key`.
    pub fn object(&self, key: &str) -> Option<&Object> {
        self.get(key).and_then(Value::as_object)
    }

    /// Object at `key`, as a nested struct.
    pub fn child(&self, key: &str) -> Option<Self> {
        self.object(key).map(|o| Self::new(o.clone()))
    }

    /// Function value at `key`.
    pub fn func(&self, key: &str) -> Option<&Func> {
        self.get(key).and_then(Value::as_func)
    }

    /// Handle at `key`, downcast to `T`.
    pub fn handle<T: 'static>(&self, key: &str) -> Option<&T> {
        self.get(key)
            .and_then(Value::as_handle)
            .and_then(Handle::downcast_ref::<T>)
    }

    /// Array of strings at `key`; non-string items are skipped.
    pub fn strings(&self, key: &str) -> Vec<String> {
        self.array(key)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|v| v.as_str().map(str::to_owned))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Borrow the underlying object.
    pub fn as_object(&self) -> &Object {
        &self.0
    }

    /// Convert back into a [`Value`].
    pub fn to_value(&self) -> Value {
        Value::Object((*self.0).clone())
    }
}

/// Validate `input`, returning the raw output or every failure.
pub fn as_raw(label: &str, processor: &Processor, input: &Value) -> Result<Value, Vec<SchemaError>> {
    processor.extract(&Path::root(label), input)
}

/// Validate `input` into a [`Struct`], returning every failure.
///
/// A processor that does not produce an object yields an empty struct.
pub fn as_struct(
    label: &str,
    processor: &Processor,
    input: &Value,
) -> Result<Struct, Vec<SchemaError>> {
    as_raw(label, processor, input).map(|v| match v {
        Value::Object(o) => Struct::new(o),
        _ => Struct::default(),
    })
}

/// Like [`as_raw`], but failures become one [`ValidationError`].
pub fn extract_raw(label: &str, processor: &Processor, input: &Value) -> Result<Value, ValidationError> {
    as_raw(label, processor, input).map_err(|errors| ValidationError {
        label: label.to_owned(),
        errors,
        input: input.clone(),
    })
}

/// Like [`as_struct`], but failures become one [`ValidationError`].
pub fn extract_struct(
    label: &str,
    processor: &Processor,
    input: &Value,
) -> Result<Struct, ValidationError> {
    as_struct(label, processor, input).map_err(|errors| ValidationError {
        label: label.to_owned(),
        errors,
        input: input.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{defaulted_of, option_of, strict_of};
    use crate::processor::{boolean, handle_of, number, obj, string};

    fn schema() -> Processor {
        obj(vec![
            strict_of("name", string()),
            defaulted_of("count", Value::from(0), number()),
            option_of("flag", boolean()),
        ])
    }

    #[test]
    fn extraction_is_idempotent() {
        let input = Value::object([("name", Value::from("x")), ("flag", Value::Bool(false))]);
        let once = extract_raw("t", &schema(), &input).unwrap();
        let twice = extract_raw("t", &schema(), &once).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn struct_accessors_read_typed_values() {
        let s = extract_struct("t", &schema(), &Value::object([("name", Value::from("x"))])).unwrap();
        assert_eq!(s.str("name"), Some("x"));
        assert_eq!(s.usize("count"), Some(0));
        assert!(!s.has("flag"));
        assert!(s.bool_or("flag", true));
    }

    #[test]
    fn aggregated_failures_become_one_error() {
        let err = extract_struct(
            "label",
            &obj(vec![strict_of("a", string()), strict_of("b", string())]),
            &Value::empty_object(),
        )
        .unwrap_err();
        assert_eq!(err.failed_paths(), vec!["label > a", "label > b"]);
        assert!(err.to_string().starts_with("label"));
    }

    #[test]
    fn handles_are_downcast_through_struct() {
        let s = extract_struct(
            "t",
            &obj(vec![strict_of("h", handle_of::<String>())]),
            &Value::object([("h", Value::handle(String::from("inside")))]),
        )
        .unwrap();
        assert_eq!(s.handle::<String>("h").map(String::as_str), Some("inside"));
        let bad = extract_struct(
            "t",
            &obj(vec![strict_of("h", handle_of::<String>())]),
            &Value::object([("h", Value::handle(1_u8))]),
        );
        assert!(bad.is_err());
    }
}
