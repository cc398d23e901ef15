// Copyright 2025 the Alloy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Validation errors: breadcrumb paths, per-field failures and the
//! aggregated report raised by the `extract_*` entry points.

use std::fmt;

use thiserror::Error;

use crate::value::Value;

/// Maximum number of individual failures rendered in a [`ValidationError`].
pub const MAX_REPORTED_ERRORS: usize = 10;

/// Objects with more keys than this are not dumped into error reports.
pub const MAX_DUMP_KEYS: usize = 100;

/// Breadcrumb of keys leading to a failing value.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Path(Vec<String>);

impl Path {
    /// A path with a single root segment (usually the label of the thing
    /// being validated).
    pub fn root(label: impl Into<String>) -> Self {
        Self(vec![label.into()])
    }

    /// Extend the path by one segment.
    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment.into());
        Self(segments)
    }

    /// The segments of this path, outermost first.
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// The innermost segment.
    pub fn last(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(" > "))
    }
}

/// Why a single value failed validation.
///
/// Messages are rendered on display, not when the error is recorded.
#[derive(Clone, Debug, Error)]
pub enum ErrorKind {
    /// A strict field was absent.
    #[error("Could not find valid *strict* value for \"{key}\" in {}", dump(.input))]
    MissingStrict {
        /// The missing key.
        key: String,
        /// The object the key was looked up in.
        input: Value,
    },
    /// A `choose` schema found no discriminant.
    #[error("Choice schema did not contain choice key: \"{key}\"")]
    MissingKey {
        /// The discriminant key.
        key: String,
    },
    /// A `choose` schema found a discriminant naming no branch.
    #[error("The chosen schema: \"{branch}\" did not exist in branches: [{}]", .branches.join(", "))]
    MissingBranch {
        /// The discriminant value.
        branch: String,
        /// The known branches.
        branches: Vec<String>,
    },
    /// An `obj_only` schema found keys it does not declare.
    #[error("There are unsupported fields: [{}] specified", .fields.join(", "))]
    UnsupportedFields {
        /// The undeclared keys.
        fields: Vec<String>,
    },
    /// Any other validator failure.
    #[error("{0}")]
    Custom(String),
}

/// A single validation failure at a path.
#[derive(Clone, Debug, Error)]
#[error("Failed path: ({path})\n{kind}")]
pub struct SchemaError {
    /// Where the failure happened.
    pub path: Path,
    /// What went wrong.
    pub kind: ErrorKind,
}

impl SchemaError {
    /// Build an error at `path`.
    pub fn new(path: Path, kind: ErrorKind) -> Self {
        Self { path, kind }
    }

    /// Shorthand for a single [`ErrorKind::Custom`] failure.
    pub fn custom(path: &Path, message: impl Into<String>) -> Vec<Self> {
        vec![Self::new(path.clone(), ErrorKind::Custom(message.into()))]
    }
}

/// Every failure of one validation run, raised as one error.
#[derive(Clone, Debug, Error)]
#[error("{}", render_report(.label, .errors, .input))]
pub struct ValidationError {
    /// What was being validated (behaviour name, part name, ...).
    pub label: String,
    /// All failures, in discovery order.
    pub errors: Vec<SchemaError>,
    /// The rejected input.
    pub input: Value,
}

impl ValidationError {
    /// Paths of all failures, rendered.
    pub fn failed_paths(&self) -> Vec<String> {
        self.errors.iter().map(|e| e.path.to_string()).collect()
    }
}

fn render_report(label: &str, errors: &[SchemaError], input: &Value) -> String {
    let mut shown: Vec<String> = errors
        .iter()
        .take(MAX_REPORTED_ERRORS)
        .map(ToString::to_string)
        .collect();
    if errors.len() > MAX_REPORTED_ERRORS {
        shown.push(String::from("... (only showing first ten failures)"));
    }
    format!(
        "{label}\nErrors:\n{}\n\nInput object: {}",
        shown.join("\n\n"),
        dump(input)
    )
}

/// Pretty-print an input for an error report, dropping oversized objects.
pub fn dump(input: &Value) -> String {
    match input {
        Value::Object(o) if o.len() > MAX_DUMP_KEYS => String::from(" removed due to size"),
        _ => serde_json::to_string_pretty(&input.to_json())
            .unwrap_or_else(|_| String::from("<unprintable>")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Object;

    fn failure(i: usize) -> SchemaError {
        SchemaError::new(
            Path::root("label").child(format!("f{i}")),
            ErrorKind::Custom(String::from("bad")),
        )
    }

    #[test]
    fn paths_render_as_breadcrumbs() {
        let p = Path::root("toggling").child("aria").child("mode");
        assert_eq!(p.to_string(), "toggling > aria > mode");
        assert_eq!(p.last(), Some("mode"));
    }

    #[test]
    fn report_caps_listed_failures() {
        let err = ValidationError {
            label: String::from("label"),
            errors: (0..12).map(failure).collect(),
            input: Value::empty_object(),
        };
        let text = err.to_string();
        assert!(text.contains("label > f9"), "tenth failure is listed");
        assert!(!text.contains("label > f10"), "eleventh failure is not");
        assert!(text.contains("only showing first ten failures"));
    }

    #[test]
    fn large_inputs_are_not_dumped() {
        let big: Object = (0..101).map(|i| (format!("k{i}"), Value::from(i))).collect();
        assert_eq!(dump(&Value::Object(big)), " removed due to size");
        assert!(dump(&Value::object([("a", Value::from(1))])).contains("\"a\": 1"));
    }

    #[test]
    fn missing_strict_message_names_key() {
        let kind = ErrorKind::MissingStrict {
            key: String::from("selector"),
            input: Value::empty_object(),
        };
        assert!(kind.to_string().contains("\"selector\""));
    }
}
