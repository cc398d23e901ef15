// Copyright 2025 the Alloy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=alloy_schema --heading-base-level=0

//! Alloy Schema: validation of loosely-typed declarative configuration.
//!
//! Component specs and behaviour configurations arrive as [`Value`]s: JSON-like
//! trees that may also carry function values ([`Func`]) and typed host objects
//! ([`Handle`]). This crate turns them into verified configuration.
//!
//! - A [`Processor`] validates one value. Processors compose: [`obj`], [`obj_only`],
//!   [`arr`], [`set_of`], [`choose`], [`thunk`] and [`func`] build structure on
//!   top of scalar checks such as [`string`], [`number`] and [`one_of`].
//! - A [`FieldProcessor`] describes one key of an object schema together with
//!   its [`Presence`]: strict, defaulted, optional, optional-with-default or
//!   merged over a base.
//! - Failures never short-circuit inside an object. Every failing field is
//!   reported with its breadcrumb [`Path`].
//!
//! ## Entry points
//!
//! - [`as_raw`] / [`as_struct`] return the output or the full error list.
//! - [`extract_raw`] / [`extract_struct`] fold the list into a single
//!   [`ValidationError`] that prints every failure (capped at ten) and a dump of
//!   the input.
//!
//! ## Example
//!
//! ```rust
//! use alloy_schema::{Value, extract_struct, obj, field, number, string};
//!
//! let schema = obj(vec![
//!     field::strict_of("selector", string()),
//!     field::defaulted_of("first_tabstop", Value::from(0), number()),
//! ]);
//!
//! let config = extract_struct(
//!     "keying",
//!     &schema,
//!     &Value::object([("selector", Value::from(".item"))]),
//! )
//! .unwrap();
//! assert_eq!(config.str("selector"), Some(".item"));
//! assert_eq!(config.usize("first_tabstop"), Some(0));
//!
//! // Both missing keys are reported, not just the first.
//! let err = extract_struct(
//!     "keying",
//!     &obj(vec![field::strict("a"), field::strict("b")]),
//!     &Value::empty_object(),
//! )
//! .unwrap_err();
//! assert_eq!(err.errors.len(), 2);
//! ```

pub mod error;
pub mod field;
mod processor;
mod structure;
mod value;

pub use error::{ErrorKind, Path, SchemaError, ValidationError};
pub use processor::{
    Fallback, FieldProcessor, Presence, Processor, Validator, any_value, arr, arr_of_obj, boolean, choose,
    deep_merge, func, func_value, handle_of, number, obj, obj_only, one_of, set_of, string, thunk,
    value,
};
pub use structure::{Struct, as_raw, as_struct, extract_raw, extract_struct};
pub use value::{Func, FuncResult, Handle, Object, Value};
