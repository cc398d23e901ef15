// Copyright 2025 the Alloy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=alloy_dom --heading-base-level=0

//! Alloy DOM: the element tree Alloy components render into.
//!
//! Alloy only needs a narrow slice of a DOM: create elements, get and set
//! attributes, classes and styles, walk parents and children, run simple
//! selector queries, track focus and resolve text direction. This crate
//! provides exactly that as an in-memory, generational arena.
//!
//! - [`Document`]: the element arena, rooted at [`Document::body`].
//! - [`ElementId`]: generational handle of an element.
//! - [`Selector`]: a parsed selector (type, class, id, attribute, `:not`,
//!   descendant and child combinators).
//! - [`DomDefinition`] + [`render`]: materialise an element exactly once.
//! - [`DomModification`] + [`combine`]: merge the per-aspect contributions of
//!   several behaviours, failing on conflicts.
//!
//! ## Combining contributions
//!
//! ```rust
//! use alloy_dom::{DomDefinition, DomModification, Document, combine, merge, render};
//!
//! let combined = combine(&[
//!     ("toggling".to_owned(), DomModification::default().with_attr("aria-pressed", "false")),
//!     ("focusing".to_owned(), DomModification::default().with_attr("tabindex", "-1")),
//! ])
//! .unwrap();
//!
//! let mut doc = Document::new();
//! let el = render(&mut doc, &merge(&DomDefinition::new("button"), &combined));
//! assert_eq!(doc.attr(el, "tabindex"), Some("-1"));
//!
//! // Two contributors claiming the same attribute is an error naming both.
//! let err = combine(&[
//!     ("a".to_owned(), DomModification::default().with_attr("role", "button")),
//!     ("b".to_owned(), DomModification::default().with_attr("role", "menu")),
//! ])
//! .unwrap_err();
//! assert_eq!(err.0.len(), 1);
//! ```
//!
//! Stale ids are tolerated everywhere: reads return `None` or empty slices and
//! writes are ignored.

mod definition;
mod document;
mod error;
pub mod modification;
mod selector;
mod types;

pub use definition::{DomDefinition, merge, render};
pub use document::{Document, TEXT_TAG};
pub use error::DomError;
pub use modification::{
    Aspect, BASE_MODIFICATION, DomModification, MergeConflict, MergeConflicts, combine,
};
pub use selector::Selector;
pub use types::{Direction, ElementId};
