// Copyright 2025 the Alloy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Element definitions and their one-shot materialisation.

use std::collections::BTreeMap;

use crate::document::Document;
use crate::modification::DomModification;
use crate::types::ElementId;

/// Everything needed to create one element (and optionally its subtree).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DomDefinition {
    /// Tag name.
    pub tag: String,
    /// Classes, in order.
    pub classes: Vec<String>,
    /// Attributes.
    pub attributes: BTreeMap<String, String>,
    /// Inline styles.
    pub styles: BTreeMap<String, String>,
    /// Form value.
    pub value: Option<String>,
    /// Markup content.
    pub inner_html: Option<String>,
    /// Existing elements to adopt as children. Takes precedence over `def_children`.
    pub dom_children: Vec<ElementId>,
    /// Child definitions rendered below this element.
    pub def_children: Vec<Self>,
}

impl DomDefinition {
    /// A bare element.
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_owned(),
            ..Self::default()
        }
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

    /// Set an inline style.
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

    /// Append a child definition.
    pub fn with_child(mut self, child: Self) -> Self {
        self.def_children.push(child);
        self
    }
}

/// Fold a combined modification into a definition. The modification wins on
/// every aspect it supplies; classes accumulate.
pub fn merge(definition: &DomDefinition, modification: &DomModification) -> DomDefinition {
    let mut out = definition.clone();
    for class in &modification.classes {
        if !out.classes.contains(class) {
            out.classes.push(class.clone());
        }
    }
    out.attributes.extend(
        modification
            .attributes
            .iter()
            .map(|(k, v)| (k.clone(), v.clone())),
    );
    out.styles.extend(
        modification
            .styles
            .iter()
            .map(|(k, v)| (k.clone(), v.clone())),
    );
    if let Some(v) = &modification.value {
        out.value = Some(v.clone());
    }
    if let Some(html) = &modification.inner_html {
        out.inner_html = Some(html.clone());
    }
    if let Some(children) = &modification.dom_children {
        out.dom_children = children.clone();
    }
    if let Some(children) = &modification.def_children {
        out.def_children = children.clone();
    }
    out
}

/// Create the element described by `definition`, detached.
pub fn render(doc: &mut Document, definition: &DomDefinition) -> ElementId {
    let el = doc.create_element(&definition.tag);
    for class in &definition.classes {
        doc.add_class(el, class);
    }
    for (k, v) in &definition.attributes {
        doc.set_attr(el, k, v);
    }
    for (k, v) in &definition.styles {
        doc.set_style(el, k, v);
    }
    if let Some(v) = &definition.value {
        doc.set_value(el, v);
    }
    if let Some(html) = &definition.inner_html {
        doc.set_inner_html(el, html);
    }
    if definition.dom_children.is_empty() {
        for child in &definition.def_children {
            let c = render(doc, child);
            doc.append_child(el, c);
        }
    } else {
        for &child in &definition.dom_children {
            doc.append_child(el, child);
        }
    }
    el
}
