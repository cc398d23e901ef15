// Copyright 2025 the Alloy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Field constructors for object schemas.

use std::rc::Rc;

use crate::processor::{
    FieldProcessor, Presence, Processor, any_value, arr, func_value, obj, value,
};
use crate::value::{Object, Value};

/// The general form every other constructor reduces to.
pub fn field(
    key: impl Into<String>,
    output_key: impl Into<String>,
    presence: Presence,
    processor: Processor,
) -> FieldProcessor {
    FieldProcessor::Field {
        key: key.into(),
        output_key: output_key.into(),
        presence,
        processor,
    }
}

fn same_key(key: &str, presence: Presence, processor: Processor) -> FieldProcessor {
    field(key, key, presence, processor)
}

fn constant(v: Value) -> Rc<dyn Fn(&Object) -> Value> {
    Rc::new(move |_| v.clone())
}

/// Required key, any value.
pub fn strict(key: &str) -> FieldProcessor {
    same_key(key, Presence::Strict, any_value())
}

/// Required key validated by `processor`.
pub fn strict_of(key: &str, processor: Processor) -> FieldProcessor {
    same_key(key, Presence::Strict, processor)
}

/// Required object with the given fields.
pub fn strict_obj_of(key: &str, fields: Vec<FieldProcessor>) -> FieldProcessor {
    same_key(key, Presence::Strict, obj(fields))
}

/// Required array whose items satisfy `item`.
pub fn strict_array_of(key: &str, item: Processor) -> FieldProcessor {
    same_key(key, Presence::Strict, arr(item))
}

/// Required function value.
pub fn strict_function(key: &str) -> FieldProcessor {
    same_key(key, Presence::Strict, func_value())
}

/// Optional key with a constant default, any value.
pub fn defaulted(key: &str, fallback: Value) -> FieldProcessor {
    same_key(key, Presence::Defaulted(constant(fallback)), any_value())
}

/// Optional key with a constant default, validated by `processor`.
pub fn defaulted_of(key: &str, fallback: Value, processor: Processor) -> FieldProcessor {
    same_key(key, Presence::Defaulted(constant(fallback)), processor)
}

/// Optional key whose default is computed from the whole input object.
pub fn defaulted_with(
    key: &str,
    fallback: impl Fn(&Object) -> Value + 'static,
    processor: Processor,
) -> FieldProcessor {
    same_key(key, Presence::Defaulted(Rc::new(fallback)), processor)
}

/// Optional object; absent means an object of defaults.
pub fn defaulted_obj_of(key: &str, fields: Vec<FieldProcessor>) -> FieldProcessor {
    same_key(
        key,
        Presence::Defaulted(constant(Value::empty_object())),
        obj(fields),
    )
}

/// Optional key, any value; absent keys stay absent.
pub fn option(key: &str) -> FieldProcessor {
    same_key(key, Presence::AsOption, any_value())
}

/// Optional key validated by `processor`.
pub fn option_of(key: &str, processor: Processor) -> FieldProcessor {
    same_key(key, Presence::AsOption, processor)
}

/// Optional object with the given fields.
pub fn option_obj_of(key: &str, fields: Vec<FieldProcessor>) -> FieldProcessor {
    same_key(key, Presence::AsOption, obj(fields))
}

/// Optional key where a literal `true` selects `fallback`.
pub fn option_defaulted_of(key: &str, fallback: Value, processor: Processor) -> FieldProcessor {
    same_key(key, Presence::AsDefaultedOption(constant(fallback)), processor)
}

/// Deep-merge the caller's object over `base` before validating.
pub fn merge_with(key: &str, base: Value, processor: Processor) -> FieldProcessor {
    same_key(key, Presence::MergeWith(constant(base)), processor)
}

/// A key that must not be supplied.
pub fn forbid(key: &str, message: &str) -> FieldProcessor {
    let reason = format!("The field: {key} is forbidden. {message}");
    same_key(
        key,
        Presence::AsOption,
        value("nothing", move |_| Err(reason.clone())),
    )
}

/// An output-only entry computed from the input object.
pub fn state(output_key: &str, instantiator: impl Fn(&Object) -> Value + 'static) -> FieldProcessor {
    FieldProcessor::State {
        output_key: output_key.to_owned(),
        instantiator: Rc::new(instantiator),
    }
}

/// An output-only constant.
pub fn output(output_key: &str, v: Value) -> FieldProcessor {
    FieldProcessor::State {
        output_key: output_key.to_owned(),
        instantiator: constant(v),
    }
}

impl FieldProcessor {
    /// Replace the value validator, keeping key and presence.
    pub fn with_processor(self, processor: Processor) -> Self {
        match self {
            Self::Field {
                key,
                output_key,
                presence,
                ..
            } => Self::Field {
                key,
                output_key,
                presence,
                processor,
            },
            state @ Self::State { .. } => state,
        }
    }

    /// Write the result under a different key.
    pub fn renamed(self, new_output_key: &str) -> Self {
        match self {
            Self::Field {
                key,
                presence,
                processor,
                ..
            } => Self::Field {
                key,
                output_key: new_output_key.to_owned(),
                presence,
                processor,
            },
            Self::State { instantiator, .. } => Self::State {
                output_key: new_output_key.to_owned(),
                instantiator,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorKind, Path};
    use crate::processor::{number, string};

    fn extract(fields: Vec<FieldProcessor>, input: Value) -> Result<Value, Vec<crate::SchemaError>> {
        obj(fields).extract(&Path::root("fields"), &input)
    }

    #[test]
    fn defaulted_with_sees_whole_object() {
        let out = extract(
            vec![
                strict_of("base", number()),
                defaulted_with(
                    "double",
                    |o| Value::from(o.get("base").and_then(Value::as_f64).unwrap_or(0.0) * 2.0),
                    number(),
                ),
            ],
            Value::object([("base", Value::from(4))]),
        )
        .unwrap();
        assert_eq!(out.get("double"), Some(&Value::from(8)));
    }

    #[test]
    fn merge_with_overlays_caller_values() {
        let base = Value::from(serde_json::json!({ "row": ".row", "cell": ".cell" }));
        let out = extract(
            vec![merge_with("selectors", base, obj(vec![strict_of("row", string()), strict_of("cell", string())]))],
            Value::from(serde_json::json!({ "selectors": { "cell": "td" } })),
        )
        .unwrap();
        assert_eq!(
            out.get("selectors").unwrap().to_json(),
            serde_json::json!({ "row": ".row", "cell": "td" })
        );
    }

    #[test]
    fn forbidden_keys_fail_when_present() {
        let ok = extract(vec![forbid("dom", "use parts")], Value::empty_object());
        assert!(ok.is_ok());
        let errors = extract(
            vec![forbid("dom", "use parts")],
            Value::object([("dom", Value::from("x"))]),
        )
        .unwrap_err();
        assert!(matches!(&errors[0].kind, ErrorKind::Custom(m) if m.contains("forbidden")));
    }

    #[test]
    fn state_and_output_fill_computed_keys() {
        let out = extract(
            vec![
                option("a"),
                state("count", |o| Value::from(o.len())),
                output("fixed", Value::from(true)),
            ],
            Value::object([("a", Value::from(1)), ("b", Value::from(2))]),
        )
        .unwrap();
        assert_eq!(out.get("count"), Some(&Value::from(2)));
        assert_eq!(out.get("fixed"), Some(&Value::Bool(true)));
    }

    #[test]
    fn renamed_fields_write_output_key() {
        let out = extract(
            vec![strict("raw").renamed("cooked")],
            Value::object([("raw", Value::from(1))]),
        )
        .unwrap();
        assert!(out.get("raw").is_none());
        assert_eq!(out.get("cooked"), Some(&Value::from(1)));
    }
}
