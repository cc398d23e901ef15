// Copyright 2025 the Alloy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Composite components: named parts declared by a widget and supplied by
//! its caller.
//!
//! A composite lays out its components with [`Composite::placeholder`] slots.
//! [`Composite::substitute`] replaces each slot with the caller's part spec,
//! after validating the part's config and assigning the part's fixed uid, so
//! that handlers can later find the part with [`Composite::get_part`].

use std::fmt;
use std::rc::Rc;

use alloy_schema::{FieldProcessor, Struct, Value, extract_struct, obj};
use hashbrown::{HashMap, HashSet};

use crate::error::PartError;
use crate::spec::{ChildSpec, ComponentSpec};
use crate::system::{ComponentId, System};
use crate::uid::Uid;

type Overrides = Rc<dyn Fn(&Struct, ComponentSpec) -> ComponentSpec>;

/// A part a composite declares.
#[derive(Clone)]
pub struct PartType {
    name: String,
    required: bool,
    fields: Vec<FieldProcessor>,
    overrides: Option<Overrides>,
}

impl fmt::Debug for PartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PartType")
            .field("name", &self.name)
            .field("required", &self.required)
            .field("fields", &self.fields)
            .finish_non_exhaustive()
    }
}

impl PartType {
    /// A part the caller must supply.
    pub fn required(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            required: true,
            fields: Vec::new(),
            overrides: None,
        }
    }

    /// A part that is dropped when not supplied.
    pub fn optional(name: &str) -> Self {
        Self {
            required: false,
            ..Self::required(name)
        }
    }

    /// Fields of the part's own config.
    pub fn fields(mut self, fields: Vec<FieldProcessor>) -> Self {
        self.fields = fields;
        self
    }

    /// Adjust the supplied spec with the validated part config (add the
    /// behaviours the composite relies on, for example).
    pub fn overrides(mut self, f: impl Fn(&Struct, ComponentSpec) -> ComponentSpec + 'static) -> Self {
        self.overrides = Some(Rc::new(f));
        self
    }

    /// The part name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A caller-supplied part.
#[derive(Clone, Debug)]
pub struct PartSpec {
    /// The part's component.
    pub spec: ComponentSpec,
    /// The part's config, checked against the part type's fields.
    pub config: Value,
}

impl PartSpec {
    /// A part with an empty config.
    pub fn new(spec: ComponentSpec) -> Self {
        Self {
            spec,
            config: Value::empty_object(),
        }
    }

    /// Set the part config.
    pub fn with_config(mut self, config: Value) -> Self {
        self.config = config;
        self
    }
}

/// The declared parts of one composite instance and their uids.
#[derive(Debug)]
pub struct Composite {
    owner: String,
    part_types: Vec<PartType>,
    part_uids: HashMap<String, Uid>,
}

impl Composite {
    /// Declare the parts of a composite named `owner`. Each part gets a fresh
    /// uid.
    pub fn new(owner: &str, part_types: Vec<PartType>) -> Rc<Self> {
        let part_uids = part_types
            .iter()
            .map(|p| (p.name.clone(), Uid::generate(&format!("{owner}-{}", p.name))))
            .collect();
        Rc::new(Self {
            owner: owner.to_owned(),
            part_types,
            part_uids,
        })
    }

    /// The composite's name.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// A slot for part `name`.
    pub fn placeholder(&self, name: &str) -> ChildSpec {
        ChildSpec::Placeholder {
            owner: self.owner.clone(),
            name: name.to_owned(),
        }
    }

    /// Replace this composite's placeholders in `components` with `parts`.
    ///
    /// Fails if a required part is missing, a supplied part is undeclared, a
    /// required part has no placeholder or a part config is invalid.
    /// Placeholders of optional parts that were not supplied are removed.
    pub fn substitute(
        &self,
        components: Vec<ChildSpec>,
        parts: Vec<(&str, PartSpec)>,
    ) -> Result<Vec<ChildSpec>, PartError> {
        let undeclared: Vec<String> = parts
            .iter()
            .filter(|(name, _)| !self.part_uids.contains_key(*name))
            .map(|(name, _)| (*name).to_owned())
            .collect();
        if !undeclared.is_empty() {
            return Err(PartError::UndeclaredParts {
                owner: self.owner.clone(),
                names: undeclared,
            });
        }
        let mut supplied: HashMap<String, PartSpec> = HashMap::new();
        for (name, part) in parts {
            supplied.insert(name.to_owned(), part);
        }
        for pt in &self.part_types {
            if pt.required && !supplied.contains_key(&pt.name) {
                return Err(PartError::MissingPart {
                    owner: self.owner.clone(),
                    name: pt.name.clone(),
                });
            }
        }

        let mut resolved: HashMap<String, ComponentSpec> = HashMap::new();
        for pt in &self.part_types {
            let Some(part) = supplied.remove(&pt.name) else {
                continue;
            };
            let config = extract_struct(&pt.name, &obj(pt.fields.clone()), &part.config)?;
            let mut spec = match &pt.overrides {
                Some(f) => f(&config, part.spec),
                None => part.spec,
            };
            spec.uid = self.part_uids.get(&pt.name).cloned();
            resolved.insert(pt.name.clone(), spec);
        }

        let mut used = HashSet::new();
        let out = self.replace(components, &mut resolved, &mut used);
        let unused: Vec<String> = self
            .part_types
            .iter()
            .filter(|pt| pt.required && !used.contains(&pt.name))
            .map(|pt| pt.name.clone())
            .collect();
        if !unused.is_empty() {
            return Err(PartError::UnusedPlaceholders {
                owner: self.owner.clone(),
                names: unused,
            });
        }
        Ok(out)
    }

    fn replace(
        &self,
        components: Vec<ChildSpec>,
        resolved: &mut HashMap<String, ComponentSpec>,
        used: &mut HashSet<String>,
    ) -> Vec<ChildSpec> {
        let mut out = Vec::with_capacity(components.len());
        for child in components {
            match child {
                ChildSpec::Placeholder { owner, name } if owner == self.owner => {
                    if let Some(spec) = resolved.remove(&name) {
                        used.insert(name);
                        out.push(ChildSpec::from(spec));
                    }
                }
                ChildSpec::Spec(mut spec) => {
                    let inner = std::mem::take(&mut spec.components);
                    spec.components = self.replace(inner, resolved, used);
                    out.push(ChildSpec::Spec(spec));
                }
                other => out.push(other),
            }
        }
        out
    }

    /// The uid assigned to part `name`.
    pub fn part_uid(&self, name: &str) -> Option<&Uid> {
        self.part_uids.get(name)
    }

    /// The built part `name`, once registered. Undeclared names log a warning.
    pub fn get_part(&self, system: &System, name: &str) -> Option<ComponentId> {
        let Some(uid) = self.part_uids.get(name) else {
            tracing::warn!(owner = %self.owner, part = name, "asked for an undeclared part");
            return None;
        };
        system.get_by_uid(uid.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_schema::field::strict;

    fn slider() -> Rc<Composite> {
        Composite::new(
            "slider",
            vec![
                PartType::required("thumb"),
                PartType::required("spectrum").fields(vec![strict("steps")]),
                PartType::optional("label"),
            ],
        )
    }

    fn layout(c: &Composite) -> Vec<ChildSpec> {
        vec![
            c.placeholder("label"),
            ComponentSpec::new("div")
                .child(c.placeholder("spectrum"))
                .child(c.placeholder("thumb"))
                .into(),
        ]
    }

    #[test]
    fn parts_replace_placeholders_and_get_uids() {
        let c = slider();
        let children = c
            .substitute(
                layout(&c),
                vec![
                    ("thumb", PartSpec::new(ComponentSpec::new("span"))),
                    (
                        "spectrum",
                        PartSpec::new(ComponentSpec::new("div"))
                            .with_config(Value::object([("steps", Value::from(10))])),
                    ),
                ],
            )
            .unwrap();
        assert_eq!(children.len(), 1, "unsupplied optional part is dropped");

        let mut system = System::default();
        let root = system
            .build(ComponentSpec::new("div").children(children))
            .unwrap();
        system.attach_to_body(root).unwrap();
        let thumb = c.get_part(&system, "thumb").unwrap();
        assert_eq!(system.doc().tag(thumb.element()), Some("span"));
        assert!(c.get_part(&system, "label").is_none());
        assert!(c.get_part(&system, "nope").is_none());
    }

    #[test]
    fn part_errors() {
        let c = slider();
        let err = c
            .substitute(layout(&c), vec![("thumb", PartSpec::new(ComponentSpec::new("span")))])
            .unwrap_err();
        assert!(matches!(err, PartError::MissingPart { ref name, .. } if name == "spectrum"));

        let err = c
            .substitute(layout(&c), vec![("handle", PartSpec::new(ComponentSpec::new("span")))])
            .unwrap_err();
        assert!(matches!(err, PartError::UndeclaredParts { .. }));

        let err = c
            .substitute(
                layout(&c),
                vec![
                    ("thumb", PartSpec::new(ComponentSpec::new("span"))),
                    ("spectrum", PartSpec::new(ComponentSpec::new("div"))),
                ],
            )
            .unwrap_err();
        assert!(matches!(err, PartError::Config(ref e) if e.label == "spectrum"));

        let err = c
            .substitute(
                vec![c.placeholder("thumb")],
                vec![
                    ("thumb", PartSpec::new(ComponentSpec::new("span"))),
                    (
                        "spectrum",
                        PartSpec::new(ComponentSpec::new("div"))
                            .with_config(Value::object([("steps", Value::from(1))])),
                    ),
                ],
            )
            .unwrap_err();
        assert!(
            matches!(err, PartError::UnusedPlaceholders { ref names, .. } if names == &["spectrum".to_owned()])
        );
    }

    #[test]
    fn unsubstituted_placeholders_fail_the_build() {
        let c = slider();
        let mut system = System::default();
        let err = system
            .build(ComponentSpec::new("div").child(c.placeholder("thumb")))
            .unwrap_err();
        assert!(matches!(err, crate::BuildError::UnresolvedPlaceholder { .. }));
    }
}
