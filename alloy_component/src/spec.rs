// Copyright 2025 the Alloy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Declarative component specs.

use std::fmt;
use std::rc::Rc;

use alloy_dom::{DomDefinition, DomModification, ElementId};
use alloy_schema::{
    Processor, Struct, Value, any_value, arr, extract_struct, field, obj, set_of, string, thunk,
};
use hashbrown::HashMap;

use crate::behaviour::{Behaviour, BehaviourRegistry};
use crate::error::BuildError;
use crate::event::EventKind;
use crate::handler::{Binding, EventHandler};
use crate::system::{ComponentId, System};
use crate::uid::Uid;

/// A component API function. The component itself is injected.
pub type ApiFn = Rc<dyn Fn(&mut System, ComponentId, &[Value]) -> Value>;

/// One entry of a spec's `components`.
#[derive(Clone, Debug)]
pub enum ChildSpec {
    /// A component to build.
    Spec(Box<ComponentSpec>),
    /// An existing element adopted as a behaviour-less leaf.
    External(ElementId),
    /// An already built component.
    Premade(ComponentId),
    /// A named part slot, filled by [`Composite::substitute`](crate::Composite::substitute).
    Placeholder {
        /// The composite declaring the part.
        owner: String,
        /// The part name.
        name: String,
    },
}

impl From<ComponentSpec> for ChildSpec {
    fn from(spec: ComponentSpec) -> Self {
        Self::Spec(Box::new(spec))
    }
}

/// Declarative description of one component.
///
/// Consumed once by [`System::build`].
#[derive(Clone, Default)]
pub struct ComponentSpec {
    pub(crate) uid: Option<Uid>,
    pub(crate) dom: DomDefinition,
    pub(crate) components: Vec<ChildSpec>,
    /// `None` marks a revoked behaviour.
    pub(crate) behaviours: Vec<(Rc<Behaviour>, Option<Value>)>,
    pub(crate) events: Vec<Binding>,
    pub(crate) event_order: HashMap<EventKind, Vec<String>>,
    pub(crate) dom_modification: DomModification,
    pub(crate) apis: Vec<(String, ApiFn)>,
}

impl fmt::Debug for ComponentSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let behaviours: Vec<&str> = self
            .behaviours
            .iter()
            .filter(|(_, c)| c.is_some())
            .map(|(b, _)| b.name())
            .collect();
        f.debug_struct("ComponentSpec")
            .field("uid", &self.uid)
            .field("dom", &self.dom)
            .field("components", &self.components)
            .field("behaviours", &behaviours)
            .field("events", &self.events.iter().map(|(k, _)| *k).collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl ComponentSpec {
    /// A spec for a bare `tag` element.
    pub fn new(tag: &str) -> Self {
        Self {
            dom: DomDefinition::new(tag),
            ..Self::default()
        }
    }

    /// A spec around a full DOM definition.
    pub fn from_dom(dom: DomDefinition) -> Self {
        Self {
            dom,
            ..Self::default()
        }
    }

    /// Fix the component's uid.
    pub fn uid(mut self, uid: impl Into<Uid>) -> Self {
        self.uid = Some(uid.into());
        self
    }

    /// The fixed uid, if any.
    pub fn uid_ref(&self) -> Option<&Uid> {
        self.uid.as_ref()
    }

    /// The element tag.
    pub fn tag(&self) -> &str {
        &self.dom.tag
    }

    /// Add a class.
    pub fn class(mut self, class: &str) -> Self {
        self.dom.classes.push(class.to_owned());
        self
    }

    /// Set an attribute.
    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.dom.attributes.insert(name.to_owned(), value.to_owned());
        self
    }

    /// Set an inline style.
    pub fn style(mut self, name: &str, value: &str) -> Self {
        self.dom.styles.insert(name.to_owned(), value.to_owned());
        self
    }

    /// Set the markup content.
    pub fn inner_html(mut self, html: &str) -> Self {
        self.dom.inner_html = Some(html.to_owned());
        self
    }

    /// Set the form value.
    pub fn value(mut self, value: &str) -> Self {
        self.dom.value = Some(value.to_owned());
        self
    }

    /// Append a child component spec.
    pub fn child(mut self, child: impl Into<ChildSpec>) -> Self {
        self.components.push(child.into());
        self
    }

    /// Append several children.
    pub fn children<C: Into<ChildSpec>>(mut self, children: impl IntoIterator<Item = C>) -> Self {
        self.components.extend(children.into_iter().map(Into::into));
        self
    }

    /// Adopt an existing element as a child.
    pub fn external(self, element: ElementId) -> Self {
        self.child(ChildSpec::External(element))
    }

    /// Reuse a built component as a child.
    pub fn premade(self, component: ComponentId) -> Self {
        self.child(ChildSpec::Premade(component))
    }

    /// Configure `behaviour`. A later call for the same name replaces the
    /// earlier configuration in place.
    pub fn with(mut self, behaviour: &Rc<Behaviour>, config: impl Into<Value>) -> Self {
        self.set_behaviour(behaviour, Some(config.into()));
        self
    }

    /// Remove an inherited configuration of `behaviour`.
    pub fn revoke(mut self, behaviour: &Rc<Behaviour>) -> Self {
        self.set_behaviour(behaviour, None);
        self
    }

    fn set_behaviour(&mut self, behaviour: &Rc<Behaviour>, config: Option<Value>) {
        match self
            .behaviours
            .iter_mut()
            .find(|(b, _)| b.name() == behaviour.name())
        {
            Some(slot) => *slot = (behaviour.clone(), config),
            None => self.behaviours.push((behaviour.clone(), config)),
        }
    }

    /// Returns true if `name` is configured and not revoked.
    pub fn has_behaviour(&self, name: &str) -> bool {
        self.behaviours
            .iter()
            .any(|(b, c)| b.name() == name && c.is_some())
    }

    /// The raw configuration of `name`.
    pub fn behaviour_config(&self, name: &str) -> Option<&Value> {
        self.behaviours
            .iter()
            .find(|(b, _)| b.name() == name)
            .and_then(|(_, c)| c.as_ref())
    }

    /// Add a spec-level handler.
    pub fn on(mut self, binding: Binding) -> Self {
        self.events.push(binding);
        self
    }

    /// Add a spec-level handler from its parts.
    pub fn on_kind(self, kind: EventKind, handler: EventHandler) -> Self {
        self.on((kind, handler))
    }

    /// Order the behaviours handling `kind`.
    pub fn order(mut self, kind: EventKind, behaviours: &[&str]) -> Self {
        self.event_order
            .insert(kind, behaviours.iter().map(|b| (*b).to_owned()).collect());
        self
    }

    /// The spec's own DOM contribution, merged with the behaviours'.
    pub fn modification(mut self, modification: DomModification) -> Self {
        self.dom_modification = modification;
        self
    }

    /// Expose an API function on the built component.
    pub fn api(
        mut self,
        name: &str,
        f: impl Fn(&mut System, ComponentId, &[Value]) -> Value + 'static,
    ) -> Self {
        self.apis.push((name.to_owned(), Rc::new(f)));
        self
    }

    /// Load a spec from data.
    ///
    /// Accepted shape:
    ///
    /// ```text
    /// { dom: { tag, classes?, attributes?, styles?, value?, innerHtml? },
    ///   uid?, components?: [spec], behaviours?: { name: config | null },
    ///   eventOrder?: { event: [behaviour] } }
    /// ```
    ///
    /// A `null` behaviour config is a revocation.
    pub fn from_value(input: &Value, registry: &BehaviourRegistry) -> Result<Self, BuildError> {
        let config = extract_struct("component spec", &spec_schema(), input)?;
        from_struct(&config, registry)
    }

    /// Parse JSON text, then [`from_value`](Self::from_value).
    pub fn from_json(json: &str, registry: &BehaviourRegistry) -> Result<Self, BuildError> {
        let parsed: serde_json::Value = serde_json::from_str(json).map_err(|e| {
            BuildError::Config(alloy_schema::ValidationError {
                label: String::from("component spec"),
                errors: alloy_schema::SchemaError::custom(
                    &alloy_schema::Path::root("json"),
                    e.to_string(),
                ),
                input: Value::Null,
            })
        })?;
        Self::from_value(&Value::from(parsed), registry)
    }
}

fn string_map() -> Processor {
    set_of(|key| Ok(key.clone()), string())
}

fn spec_schema() -> Processor {
    thunk("component spec", || {
        obj(vec![
            field::strict_obj_of(
                "dom",
                vec![
                    field::strict_of("tag", string()),
                    field::defaulted_of("classes", Value::Array(Vec::new()), arr(string())),
                    field::defaulted_of("attributes", Value::empty_object(), string_map()),
                    field::defaulted_of("styles", Value::empty_object(), string_map()),
                    field::option_of("value", string()),
                    field::option_of("innerHtml", string()),
                ],
            ),
            field::option_of("uid", string()),
            field::defaulted_of("components", Value::Array(Vec::new()), arr(spec_schema())),
            field::defaulted_of("behaviours", Value::empty_object(), any_value()),
            field::defaulted_of(
                "eventOrder",
                Value::empty_object(),
                set_of(|key| Ok(key.clone()), arr(string())),
            ),
        ])
    })
}

fn from_struct(config: &Struct, registry: &BehaviourRegistry) -> Result<ComponentSpec, BuildError> {
    let dom = config.child("dom").unwrap_or_default();
    let mut def = DomDefinition::new(dom.str("tag").unwrap_or("div"));
    def.classes = dom.strings("classes");
    for (aspect, target) in [("attributes", &mut def.attributes), ("styles", &mut def.styles)] {
        if let Some(map) = dom.object(aspect) {
            for (k, v) in map {
                if let Some(v) = v.as_str() {
                    target.insert(k.clone(), v.to_owned());
                }
            }
        }
    }
    def.value = dom.str("value").map(str::to_owned);
    def.inner_html = dom.str("innerHtml").map(str::to_owned);

    let mut spec = ComponentSpec::from_dom(def);
    if let Some(uid) = config.str("uid") {
        spec = spec.uid(uid);
    }

    for child in config.array("components").unwrap_or_default() {
        if let Some(o) = child.as_object() {
            spec = spec.child(from_struct(&Struct::new(o.clone()), registry)?);
        }
    }

    if let Some(behaviours) = config.object("behaviours") {
        for (name, cfg) in behaviours {
            let behaviour = registry
                .get(name)
                .ok_or_else(|| BuildError::UnknownBehaviour(name.clone()))?;
            spec = if cfg.is_null() {
                spec.revoke(behaviour)
            } else {
                spec.with(behaviour, cfg.clone())
            };
        }
    }

    if let Some(order) = config.object("eventOrder") {
        for (event, names) in order {
            let kind =
                EventKind::from_name(event).ok_or_else(|| BuildError::UnknownEvent(event.clone()))?;
            let names: Vec<String> = names
                .as_array()
                .unwrap_or_default()
                .iter()
                .filter_map(|n| n.as_str().map(str::to_owned))
                .collect();
            spec.event_order.insert(kind, names);
        }
    }
    Ok(spec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_schema::field::defaulted;

    fn registry() -> BehaviourRegistry {
        BehaviourRegistry::new()
            .with(
                Behaviour::define("marking")
                    .fields(vec![defaulted("mark", Value::from("m"))])
                    .build(),
            )
    }

    #[test]
    fn later_configuration_replaces_earlier() {
        let b = Behaviour::define("b").build();
        let spec = ComponentSpec::new("div")
            .with(&b, Value::from(1))
            .with(&b, Value::from(2));
        assert_eq!(spec.behaviours.len(), 1);
        assert_eq!(spec.behaviour_config("b"), Some(&Value::from(2)));
        let spec = spec.revoke(&b);
        assert!(!spec.has_behaviour("b"));
    }

    #[test]
    fn loads_from_json() {
        let spec = ComponentSpec::from_json(
            r#"{
                "dom": { "tag": "ul", "classes": ["menu"], "attributes": { "role": "menu" } },
                "uid": "main-menu",
                "components": [ { "dom": { "tag": "li", "innerHtml": "One" } } ],
                "behaviours": { "marking": {} },
                "eventOrder": { "alloy.execute": ["marking"] }
            }"#,
            &registry(),
        )
        .unwrap();
        assert_eq!(spec.tag(), "ul");
        assert_eq!(spec.uid_ref().map(Uid::as_str), Some("main-menu"));
        assert_eq!(spec.dom.attributes.get("role").map(String::as_str), Some("menu"));
        assert_eq!(spec.components.len(), 1);
        assert!(spec.has_behaviour("marking"));
        assert_eq!(
            spec.event_order.get(&EventKind::Execute),
            Some(&vec![String::from("marking")])
        );
    }

    #[test]
    fn null_behaviour_revokes_and_unknown_names_fail() {
        let spec = ComponentSpec::from_json(
            r#"{ "dom": { "tag": "div" }, "behaviours": { "marking": null } }"#,
            &registry(),
        )
        .unwrap();
        assert!(!spec.has_behaviour("marking"));

        let err = ComponentSpec::from_json(
            r#"{ "dom": { "tag": "div" }, "behaviours": { "nope": {} } }"#,
            &registry(),
        )
        .unwrap_err();
        assert!(matches!(err, BuildError::UnknownBehaviour(name) if name == "nope"));

        let err = ComponentSpec::from_json(r#"{ "dom": {} }"#, &registry()).unwrap_err();
        assert!(matches!(err, BuildError::Config(_)));
    }
}
