// Copyright 2025 the Alloy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-aspect DOM contributions and their conflict-checked combination.
//!
//! Each contributor (a behaviour, or the spec's own base modification) yields a
//! [`DomModification`]. [`combine`] folds them aspect by aspect:
//!
//! | aspect | policy |
//! |---|---|
//! | `classes` | concatenated |
//! | `attributes`, `styles` | safe merge: a sub-key set twice is a conflict |
//! | `dom_children`, `def_children`, `inner_html`, `value` | one contributor at most |
//!
//! Every conflict is reported, not just the first.

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

use crate::definition::DomDefinition;
use crate::types::ElementId;

/// Contribution name used for a spec's own base modification.
pub const BASE_MODIFICATION: &str = "alloy.base.modification";

/// A partial change to an element.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DomModification {
    /// Classes to add.
    pub classes: Vec<String>,
    /// Attributes to set.
    pub attributes: BTreeMap<String, String>,
    /// Styles to set.
    pub styles: BTreeMap<String, String>,
    /// Existing elements to adopt as children.
    pub dom_children: Option<Vec<ElementId>>,
    /// Child definitions to render.
    pub def_children: Option<Vec<DomDefinition>>,
    /// Markup content.
    pub inner_html: Option<String>,
    /// Form value.
    pub value: Option<String>,
}

impl DomModification {
    /// Returns true if the modification changes nothing.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Add a class.
    pub fn with_class(mut self, class: &str) -> Self {
        self.classes.push(class.to_owned());
        self
    }

    /// Set an attribute.
    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_owned(), value.to_owned());
        self
    }

    /// Set a style.
    pub fn with_style(mut self, name: &str, value: &str) -> Self {
        self.styles.insert(name.to_owned(), value.to_owned());
        self
    }

    /// Set the markup content.
    pub fn with_inner_html(mut self, html: &str) -> Self {
        self.inner_html = Some(html.to_owned());
        self
    }

    /// Set the form value.
    pub fn with_value(mut self, value: &str) -> Self {
        self.value = Some(value.to_owned());
        self
    }

    /// Adopt existing elements as children.
    pub fn with_dom_children(mut self, children: Vec<ElementId>) -> Self {
        self.dom_children = Some(children);
        self
    }

    /// Render child definitions.
    pub fn with_def_children(mut self, children: Vec<DomDefinition>) -> Self {
        self.def_children = Some(children);
        self
    }
}

/// The aspects of a modification.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Aspect {
    /// `classes`
    Classes,
    /// `attributes`
    Attributes,
    /// `styles`
    Styles,
    /// `dom_children`
    DomChildren,
    /// `def_children`
    DefChildren,
    /// `inner_html`
    InnerHtml,
    /// `value`
    Value,
}

impl fmt::Display for Aspect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Classes => "classes",
            Self::Attributes => "attributes",
            Self::Styles => "styles",
            Self::DomChildren => "dom_children",
            Self::DefChildren => "def_children",
            Self::InnerHtml => "inner_html",
            Self::Value => "value",
        })
    }
}

/// One colliding aspect.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum MergeConflict {
    /// Two contributors set the same attribute or style.
    #[error("Cannot have {aspect} \"{key}\" set by both {first} and {second}")]
    DuplicateKey {
        /// `attributes` or `styles`.
        aspect: Aspect,
        /// The colliding sub-key.
        key: String,
        /// The contributor that set it first.
        first: String,
        /// The contributor that set it again.
        second: String,
    },
    /// More than one contributor supplied a single-winner aspect.
    #[error("Multiple behaviours have tried to change the {aspect}: [{}]", .contributors.join(", "))]
    MultipleWinners {
        /// The aspect.
        aspect: Aspect,
        /// Every contributor that supplied it.
        contributors: Vec<String>,
    },
}

/// All conflicts of one [`combine`] call.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("DOM modification conflicts:\n{}", render_conflicts(.0))]
pub struct MergeConflicts(pub Vec<MergeConflict>);

fn render_conflicts(conflicts: &[MergeConflict]) -> String {
    conflicts
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

fn safe_merge(
    aspect: Aspect,
    contributions: &[(&str, &BTreeMap<String, String>)],
    conflicts: &mut Vec<MergeConflict>,
) -> BTreeMap<String, String> {
    let mut out = BTreeMap::new();
    let mut owners: BTreeMap<&str, &str> = BTreeMap::new();
    for (name, map) in contributions {
        for (k, v) in *map {
            if let Some(first) = owners.get(k.as_str()) {
                conflicts.push(MergeConflict::DuplicateKey {
                    aspect,
                    key: k.clone(),
                    first: (*first).to_owned(),
                    second: (*name).to_owned(),
                });
            } else {
                owners.insert(k.as_str(), *name);
                out.insert(k.clone(), v.clone());
            }
        }
    }
    out
}

fn only_one<T: Clone>(
    aspect: Aspect,
    contributions: &[(&str, Option<&T>)],
    conflicts: &mut Vec<MergeConflict>,
) -> Option<T> {
    let supplied: Vec<(&str, &T)> = contributions
        .iter()
        .filter_map(|(name, v)| v.map(|v| (*name, v)))
        .collect();
    match supplied.as_slice() {
        [] => None,
        [(_, v)] => Some((*v).clone()),
        many => {
            conflicts.push(MergeConflict::MultipleWinners {
                aspect,
                contributors: many.iter().map(|(n, _)| (*n).to_owned()).collect(),
            });
            None
        }
    }
}

/// Combine named contributions into one modification.
pub fn combine(contributions: &[(String, DomModification)]) -> Result<DomModification, MergeConflicts> {
    let mut conflicts = Vec::new();

    let classes = contributions
        .iter()
        .flat_map(|(_, m)| m.classes.iter().cloned())
        .collect();
    let attrs: Vec<_> = contributions
        .iter()
        .map(|(n, m)| (n.as_str(), &m.attributes))
        .collect();
    let attributes = safe_merge(Aspect::Attributes, &attrs, &mut conflicts);
    let styles: Vec<_> = contributions
        .iter()
        .map(|(n, m)| (n.as_str(), &m.styles))
        .collect();
    let styles = safe_merge(Aspect::Styles, &styles, &mut conflicts);

    let dom_children = only_one(
        Aspect::DomChildren,
        &contributions
            .iter()
            .map(|(n, m)| (n.as_str(), m.dom_children.as_ref()))
            .collect::<Vec<_>>(),
        &mut conflicts,
    );
    let def_children = only_one(
        Aspect::DefChildren,
        &contributions
            .iter()
            .map(|(n, m)| (n.as_str(), m.def_children.as_ref()))
            .collect::<Vec<_>>(),
        &mut conflicts,
    );
    let inner_html = only_one(
        Aspect::InnerHtml,
        &contributions
            .iter()
            .map(|(n, m)| (n.as_str(), m.inner_html.as_ref()))
            .collect::<Vec<_>>(),
        &mut conflicts,
    );
    let value = only_one(
        Aspect::Value,
        &contributions
            .iter()
            .map(|(n, m)| (n.as_str(), m.value.as_ref()))
            .collect::<Vec<_>>(),
        &mut conflicts,
    );

    if conflicts.is_empty() {
        Ok(DomModification {
            classes,
            attributes,
            styles,
            dom_children,
            def_children,
            inner_html,
            value,
        })
    } else {
        Err(MergeConflicts(conflicts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str, m: DomModification) -> (String, DomModification) {
        (name.to_owned(), m)
    }

    #[test]
    fn classes_concatenate_and_styles_union() {
        let out = combine(&[
            named("a", DomModification::default().with_class("x").with_style("color", "red")),
            named("b", DomModification::default().with_class("y").with_style("width", "1px")),
        ])
        .unwrap();
        assert_eq!(out.classes, vec!["x", "y"]);
        assert_eq!(out.styles.len(), 2);
    }

    #[test]
    fn same_attribute_from_two_behaviours_conflicts() {
        let err = combine(&[
            named("toggling", DomModification::default().with_attr("role", "button")),
            named("focusing", DomModification::default().with_attr("role", "menuitem")),
        ])
        .unwrap_err();
        assert_eq!(
            err.0,
            vec![MergeConflict::DuplicateKey {
                aspect: Aspect::Attributes,
                key: String::from("role"),
                first: String::from("toggling"),
                second: String::from("focusing"),
            }]
        );
        assert!(err.to_string().contains("toggling and focusing"));
    }

    #[test]
    fn single_winner_aspects_and_aggregation() {
        let err = combine(&[
            named("a", DomModification::default().with_inner_html("1").with_value("v")),
            named(BASE_MODIFICATION, DomModification::default().with_inner_html("2")),
            named("c", DomModification::default().with_value("w").with_style("s", "1")),
            named("d", DomModification::default().with_style("s", "2")),
        ])
        .unwrap_err();
        assert_eq!(err.0.len(), 3, "styles, inner_html and value are all reported");
        assert!(err.0.iter().any(|c| matches!(
            c,
            MergeConflict::MultipleWinners { aspect: Aspect::InnerHtml, contributors }
                if contributors == &["a".to_owned(), BASE_MODIFICATION.to_owned()]
        )));
    }

    #[test]
    fn one_contributor_wins_unopposed() {
        let out = combine(&[
            named("a", DomModification::default()),
            named("b", DomModification::default().with_inner_html("<b>x</b>")),
        ])
        .unwrap();
        assert_eq!(out.inner_html.as_deref(), Some("<b>x</b>"));
        assert!(DomModification::default().is_empty());
    }
}
