// Copyright 2025 the Alloy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Value processors: the validator combinators behind every schema.

use std::cell::OnceCell;
use std::fmt;
use std::rc::Rc;

use crate::error::{ErrorKind, Path, SchemaError};
use crate::value::{Func, Object, Value};

/// Computes a fallback from the whole input object.
pub type Fallback = Rc<dyn Fn(&Object) -> Value>;

/// Validates (and possibly normalises) a single scalar value.
pub type Validator = Rc<dyn Fn(&Value) -> Result<Value, String>>;

/// How a field treats an absent key.
///
/// `Null` entries are absent for every presence.
#[derive(Clone)]
pub enum Presence {
    /// The key is required.
    Strict,
    /// The key falls back to a computed default.
    Defaulted(Fallback),
    /// The key is optional and is left out of the output when absent.
    AsOption,
    /// Optional; a literal `true` asks for the computed default.
    AsDefaultedOption(Fallback),
    /// The caller value is deep-merged over a computed base before validation.
    MergeWith(Fallback),
}

impl fmt::Debug for Presence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Strict => "Strict",
            Self::Defaulted(_) => "Defaulted",
            Self::AsOption => "AsOption",
            Self::AsDefaultedOption(_) => "AsDefaultedOption",
            Self::MergeWith(_) => "MergeWith",
        })
    }
}

/// One entry of an object schema.
#[derive(Clone)]
pub enum FieldProcessor {
    /// Reads `key` from the input, validates it and writes `output_key`.
    Field {
        /// Input key.
        key: String,
        /// Output key.
        output_key: String,
        /// Absent-key policy.
        presence: Presence,
        /// Validator for the value.
        processor: Processor,
    },
    /// Output-only entry computed from the whole input object.
    State {
        /// Output key.
        output_key: String,
        /// Computes the value.
        instantiator: Fallback,
    },
}

impl FieldProcessor {
    /// The input key this entry consumes, if any.
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::Field { key, .. } => Some(key),
            Self::State { .. } => None,
        }
    }

    /// The output key this entry produces.
    pub fn output_key(&self) -> &str {
        match self {
            Self::Field { output_key, .. } | Self::State { output_key, .. } => output_key,
        }
    }
}

impl fmt::Debug for FieldProcessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field {
                key,
                output_key,
                presence,
                processor,
            } => f
                .debug_struct("Field")
                .field("key", key)
                .field("output_key", output_key)
                .field("presence", presence)
                .field("processor", processor)
                .finish(),
            Self::State { output_key, .. } => f
                .debug_struct("State")
                .field("output_key", output_key)
                .finish_non_exhaustive(),
        }
    }
}

struct Thunk {
    description: String,
    make: Box<dyn Fn() -> Processor>,
    resolved: OnceCell<Processor>,
}

impl Thunk {
    fn get(&self) -> &Processor {
        self.resolved.get_or_init(|| (self.make)())
    }
}

enum Kind {
    Any,
    Value {
        expected: String,
        validator: Validator,
    },
    Obj(Vec<FieldProcessor>),
    ObjOnly(Vec<FieldProcessor>),
    Arr(Processor),
    SetOf {
        key: Validator,
        item: Processor,
    },
    Choose {
        key: String,
        branches: Vec<(String, Vec<FieldProcessor>)>,
    },
    Thunk(Thunk),
    Func {
        arity: usize,
        output: Processor,
    },
}

/// A validator over [`Value`]s.
///
/// Processors are cheap to clone and can be shared between schemas.
#[derive(Clone)]
pub struct Processor(Rc<Kind>);

impl fmt::Debug for Processor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &*self.0 {
            Kind::Any => f.write_str("any"),
            Kind::Value { expected, .. } => write!(f, "value({expected})"),
            Kind::Obj(fields) => f.debug_tuple("obj").field(fields).finish(),
            Kind::ObjOnly(fields) => f.debug_tuple("obj_only").field(fields).finish(),
            Kind::Arr(item) => f.debug_tuple("arr").field(item).finish(),
            Kind::SetOf { item, .. } => f.debug_tuple("set_of").field(item).finish(),
            Kind::Choose { key, branches } => {
                let names: Vec<&str> = branches.iter().map(|(n, _)| n.as_str()).collect();
                write!(f, "choose({key}, {names:?})")
            }
            Kind::Thunk(t) => write!(f, "thunk({})", t.description),
            Kind::Func { arity, output } => write!(f, "func({arity}) -> {output:?}"),
        }
    }
}

/// Accepts anything.
pub fn any_value() -> Processor {
    Processor(Rc::new(Kind::Any))
}

/// Validate with a custom function; `expected` names the accepted shape.
pub fn value(
    expected: impl Into<String>,
    validator: impl Fn(&Value) -> Result<Value, String> + 'static,
) -> Processor {
    Processor(Rc::new(Kind::Value {
        expected: expected.into(),
        validator: Rc::new(validator),
    }))
}

/// An object schema. Undeclared keys are ignored; all field failures are
/// reported together.
pub fn obj(fields: Vec<FieldProcessor>) -> Processor {
    Processor(Rc::new(Kind::Obj(fields)))
}

/// Like [`obj`], but undeclared keys are rejected.
pub fn obj_only(fields: Vec<FieldProcessor>) -> Processor {
    Processor(Rc::new(Kind::ObjOnly(fields)))
}

/// An array whose items all satisfy `item`.
pub fn arr(item: Processor) -> Processor {
    Processor(Rc::new(Kind::Arr(item)))
}

/// An array of objects with the given fields.
pub fn arr_of_obj(fields: Vec<FieldProcessor>) -> Processor {
    arr(obj(fields))
}

/// An object used as a set: every key must pass `key`, every value `item`.
pub fn set_of(
    key: impl Fn(&Value) -> Result<Value, String> + 'static,
    item: Processor,
) -> Processor {
    Processor(Rc::new(Kind::SetOf {
        key: Rc::new(key),
        item,
    }))
}

/// Pick a list of fields by the string found at `key`.
///
/// The discriminant itself is copied into the output.
pub fn choose<S: Into<String>>(
    key: impl Into<String>,
    branches: impl IntoIterator<Item = (S, Vec<FieldProcessor>)>,
) -> Processor {
    Processor(Rc::new(Kind::Choose {
        key: key.into(),
        branches: branches
            .into_iter()
            .map(|(name, fields)| (name.into(), fields))
            .collect(),
    }))
}

/// A lazily built processor, resolved once on first use.
///
/// Needed for recursive schemas.
pub fn thunk(
    description: impl Into<String>,
    make: impl Fn() -> Processor + 'static,
) -> Processor {
    Processor(Rc::new(Kind::Thunk(Thunk {
        description: description.into(),
        make: Box::new(make),
        resolved: OnceCell::new(),
    })))
}

/// A function value whose return value is checked by `output` on every call.
///
/// At most `arity` arguments are forwarded.
pub fn func(arity: usize, output: Processor) -> Processor {
    Processor(Rc::new(Kind::Func { arity, output }))
}

/// Any string.
pub fn string() -> Processor {
    value("string", |v| match v {
        Value::String(_) => Ok(v.clone()),
        other => Err(format!("Expected type: string but got: {}", other.type_name())),
    })
}

/// Any number.
pub fn number() -> Processor {
    value("number", |v| match v {
        Value::Number(_) => Ok(v.clone()),
        other => Err(format!("Expected type: number but got: {}", other.type_name())),
    })
}

/// Any boolean.
pub fn boolean() -> Processor {
    value("boolean", |v| match v {
        Value::Bool(_) => Ok(v.clone()),
        other => Err(format!("Expected type: boolean but got: {}", other.type_name())),
    })
}

/// One of a fixed set of strings.
pub fn one_of(allowed: &[&str]) -> Processor {
    let allowed: Vec<String> = allowed.iter().map(|s| (*s).to_owned()).collect();
    let expected = format!("one of [{}]", allowed.join(", "));
    value(expected, move |v| match v.as_str() {
        Some(s) if allowed.iter().any(|a| a == s) => Ok(v.clone()),
        _ => Err(format!(
            "Unsupported value: {:?}, choose one of [{}]",
            v,
            allowed.join(", ")
        )),
    })
}

/// Any function value, unchecked.
pub fn func_value() -> Processor {
    value("function", |v| match v {
        Value::Func(_) => Ok(v.clone()),
        other => Err(format!("Expected type: function but got: {}", other.type_name())),
    })
}

/// A handle wrapping a `T`.
pub fn handle_of<T: 'static>() -> Processor {
    let name = std::any::type_name::<T>();
    value(format!("handle<{name}>"), move |v| match v {
        Value::Handle(h) if h.is::<T>() => Ok(v.clone()),
        Value::Handle(h) => Err(format!("Expected handle of {name} but got {}", h.type_name())),
        other => Err(format!("Expected handle of {name} but got: {}", other.type_name())),
    })
}

/// Recursively merge objects; `over` wins on everything but nested objects.
///
/// `Null` in `over` leaves `base` untouched.
pub fn deep_merge(base: &Value, over: &Value) -> Value {
    match (base, over) {
        (_, Value::Null) => base.clone(),
        (Value::Object(b), Value::Object(o)) => {
            let mut merged = b.clone();
            for (k, v) in o {
                let next = match merged.get(k) {
                    Some(existing) => deep_merge(existing, v),
                    None => v.clone(),
                };
                merged.insert(k.clone(), next);
            }
            Value::Object(merged)
        }
        _ => over.clone(),
    }
}

type Extracted = Result<Value, Vec<SchemaError>>;

impl Processor {
    /// Validate `input`, reporting every failure found beneath `path`.
    pub fn extract(&self, path: &Path, input: &Value) -> Extracted {
        match &*self.0 {
            Kind::Any => Ok(input.clone()),
            Kind::Value { validator, .. } => {
                validator(input).map_err(|message| SchemaError::custom(path, message))
            }
            Kind::Obj(fields) => {
                let object = as_object(path, input)?;
                extract_fields(path, fields, &object)
            }
            Kind::ObjOnly(fields) => {
                let object = as_object(path, input)?;
                let unsupported: Vec<String> = object
                    .keys()
                    .filter(|k| !fields.iter().any(|f| f.key() == Some(k.as_str())))
                    .cloned()
                    .collect();
                if unsupported.is_empty() {
                    extract_fields(path, fields, &object)
                } else {
                    Err(vec![SchemaError::new(
                        path.clone(),
                        ErrorKind::UnsupportedFields {
                            fields: unsupported,
                        },
                    )])
                }
            }
            Kind::Arr(item) => match input {
                Value::Array(items) => {
                    let mut out = Vec::with_capacity(items.len());
                    let mut errors = Vec::new();
                    for (i, v) in items.iter().enumerate() {
                        match item.extract(&path.child(format!("[{i}]")), v) {
                            Ok(v) => out.push(v),
                            Err(mut e) => errors.append(&mut e),
                        }
                    }
                    if errors.is_empty() {
                        Ok(Value::Array(out))
                    } else {
                        Err(errors)
                    }
                }
                other => Err(SchemaError::custom(
                    path,
                    format!("Expected type: array but got: {}", other.type_name()),
                )),
            },
            Kind::SetOf { key, item } => {
                let object = as_object(path, input)?;
                let mut errors = Vec::new();
                for k in object.keys() {
                    if let Err(message) = key(&Value::String(k.clone())) {
                        errors.extend(SchemaError::custom(&path.child(k.clone()), message));
                    }
                }
                if !errors.is_empty() {
                    return Err(errors);
                }
                let derived: Vec<FieldProcessor> = object
                    .keys()
                    .map(|k| FieldProcessor::Field {
                        key: k.clone(),
                        output_key: k.clone(),
                        presence: Presence::Strict,
                        processor: item.clone(),
                    })
                    .collect();
                extract_fields(path, &derived, &object)
            }
            Kind::Choose { key, branches } => {
                let object = as_object(path, input)?;
                let Some(chosen) = object.get(key).and_then(Value::as_str) else {
                    return Err(vec![SchemaError::new(
                        path.clone(),
                        ErrorKind::MissingKey { key: key.clone() },
                    )]);
                };
                let Some((_, fields)) = branches.iter().find(|(name, _)| name == chosen) else {
                    return Err(vec![SchemaError::new(
                        path.clone(),
                        ErrorKind::MissingBranch {
                            branch: chosen.to_owned(),
                            branches: branches.iter().map(|(n, _)| n.clone()).collect(),
                        },
                    )]);
                };
                let branch_path = path.child(format!("branch: {chosen}"));
                let mut out = extract_fields(&branch_path, fields, &object)?;
                if let Value::Object(o) = &mut out {
                    o.insert(key.clone(), Value::String(chosen.to_owned()));
                }
                Ok(out)
            }
            Kind::Thunk(t) => t.get().extract(path, input),
            Kind::Func { arity, output } => match input {
                Value::Func(inner) => {
                    let inner = inner.clone();
                    let output = output.clone();
                    let arity = *arity;
                    let wrapped = Func::new(move |args| {
                        let forwarded = &args[..args.len().min(arity)];
                        let result = inner.call(forwarded)?;
                        output.extract(&Path::root("function output"), &result)
                    });
                    Ok(Value::Func(wrapped))
                }
                other => Err(SchemaError::custom(
                    path,
                    format!("Not a function: {}", other.type_name()),
                )),
            },
        }
    }
}

fn as_object(path: &Path, input: &Value) -> Result<Object, Vec<SchemaError>> {
    match input {
        Value::Object(o) => Ok(o.clone()),
        // `true`/`false`/absent configuration means "no explicit fields".
        Value::Null | Value::Bool(_) => Ok(Object::new()),
        other => Err(SchemaError::custom(
            path,
            format!("Expected type: object but got: {}", other.type_name()),
        )),
    }
}

fn extract_fields(path: &Path, fields: &[FieldProcessor], input: &Object) -> Extracted {
    let mut out = Object::new();
    let mut errors = Vec::new();
    for field in fields {
        match field {
            FieldProcessor::Field {
                key,
                output_key,
                presence,
                processor,
            } => {
                let field_path = path.child(key.clone());
                let present = input.get(key).filter(|v| !v.is_null());
                let result = match (presence, present) {
                    (Presence::Strict, Some(v)) => Some(processor.extract(&field_path, v)),
                    (Presence::Strict, None) => Some(Err(vec![SchemaError::new(
                        field_path.clone(),
                        ErrorKind::MissingStrict {
                            key: key.clone(),
                            input: Value::Object(input.clone()),
                        },
                    )])),
                    (Presence::Defaulted(_), Some(v)) => Some(processor.extract(&field_path, v)),
                    (Presence::Defaulted(fallback), None) => {
                        Some(processor.extract(&field_path, &fallback(input)))
                    }
                    (Presence::AsOption | Presence::AsDefaultedOption(_), None) => None,
                    (Presence::AsOption, Some(v)) => Some(processor.extract(&field_path, v)),
                    (Presence::AsDefaultedOption(fallback), Some(Value::Bool(true))) => {
                        Some(processor.extract(&field_path, &fallback(input)))
                    }
                    (Presence::AsDefaultedOption(_), Some(v)) => {
                        Some(processor.extract(&field_path, v))
                    }
                    (Presence::MergeWith(base), v) => {
                        let merged = deep_merge(&base(input), v.unwrap_or(&Value::Null));
                        Some(processor.extract(&field_path, &merged))
                    }
                };
                match result {
                    Some(Ok(v)) => {
                        out.insert(output_key.clone(), v);
                    }
                    Some(Err(mut e)) => errors.append(&mut e),
                    None => {}
                }
            }
            FieldProcessor::State {
                output_key,
                instantiator,
            } => {
                out.insert(output_key.clone(), instantiator(input));
            }
        }
    }
    if errors.is_empty() {
        Ok(Value::Object(out))
    } else {
        Err(errors)
    }
}
