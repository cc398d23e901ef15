// Copyright 2025 the Alloy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Behaviours: named units of configuration, state, DOM contribution and
//! event handlers.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use alloy_dom::DomModification;
use alloy_schema::{FieldProcessor, Processor, Struct, choose, obj};
use hashbrown::HashMap;

use crate::handler::Binding;
use crate::system::{ComponentId, System};

type StateFactory = Rc<dyn Fn(&Struct) -> Box<dyn Any>>;
type ExhibitFn = Rc<dyn Fn(&Struct, &dyn Any) -> DomModification>;
type EventsFn = Rc<dyn Fn(&Struct) -> Vec<Binding>>;

/// A reusable capability a component can be configured with.
///
/// A behaviour is immutable once built. Each component holds at most one
/// configuration per behaviour name; the config is validated against the
/// behaviour's schema at build time and the state factory runs once.
pub struct Behaviour {
    name: String,
    schema: Processor,
    state: StateFactory,
    exhibit: Option<ExhibitFn>,
    events: Option<EventsFn>,
}

impl fmt::Debug for Behaviour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Behaviour")
            .field("name", &self.name)
            .field("schema", &self.schema)
            .finish_non_exhaustive()
    }
}

impl Behaviour {
    /// Start a behaviour definition.
    pub fn define(name: &str) -> BehaviourBuilder {
        BehaviourBuilder {
            name: name.to_owned(),
            schema: obj(Vec::new()),
            state: Rc::new(|_| Box::new(())),
            exhibit: None,
            events: None,
        }
    }

    /// Start a behaviour whose schema is picked by the string at `key`.
    pub fn modal(name: &str, key: &str) -> ModalBuilder {
        ModalBuilder {
            inner: Self::define(name),
            key: key.to_owned(),
            branches: Vec::new(),
        }
    }

    /// The behaviour name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The configuration schema.
    pub fn schema(&self) -> &Processor {
        &self.schema
    }

    pub(crate) fn create_state(&self, config: &Struct) -> Box<dyn Any> {
        (self.state)(config)
    }

    pub(crate) fn exhibit(&self, config: &Struct, state: &dyn Any) -> DomModification {
        self.exhibit
            .as_ref()
            .map(|f| f(config, state))
            .unwrap_or_default()
    }

    pub(crate) fn handlers(&self, config: &Struct) -> Vec<Binding> {
        self.events.as_ref().map(|f| f(config)).unwrap_or_default()
    }

    /// Returns true if the component is configured with this behaviour.
    pub fn is_configured(&self, system: &System, component: ComponentId) -> bool {
        system.has_behaviour(component, &self.name)
    }

    /// The component's configuration, or `None` with a usage warning.
    pub fn config(&self, system: &System, component: ComponentId) -> Option<Struct> {
        let config = system.config_of(component, &self.name).cloned();
        if config.is_none() {
            self.warn_absent(system, component);
        }
        config
    }

    /// The component's state, or `None` with a usage warning.
    pub fn state<'a, S: 'static>(&self, system: &'a System, component: ComponentId) -> Option<&'a S> {
        if !self.is_configured(system, component) {
            self.warn_absent(system, component);
            return None;
        }
        system.state_of::<S>(component, &self.name)
    }

    /// Mutable access to the component's state, or `None` with a usage warning.
    pub fn state_mut<'a, S: 'static>(
        &self,
        system: &'a mut System,
        component: ComponentId,
    ) -> Option<&'a mut S> {
        if !self.is_configured(system, component) {
            self.warn_absent(system, component);
            return None;
        }
        system.state_of_mut::<S>(component, &self.name)
    }

    fn warn_absent(&self, system: &System, component: ComponentId) {
        tracing::warn!(
            behaviour = %self.name,
            component = %system.describe(component),
            "behaviour API called on a component without this behaviour"
        );
    }
}

/// Builder returned by [`Behaviour::define`].
pub struct BehaviourBuilder {
    name: String,
    schema: Processor,
    state: StateFactory,
    exhibit: Option<ExhibitFn>,
    events: Option<EventsFn>,
}

impl fmt::Debug for BehaviourBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BehaviourBuilder")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl BehaviourBuilder {
    /// Configuration fields; compiled to an object schema.
    pub fn fields(mut self, fields: Vec<FieldProcessor>) -> Self {
        self.schema = obj(fields);
        self
    }

    /// A complete configuration schema.
    pub fn schema(mut self, schema: Processor) -> Self {
        self.schema = schema;
        self
    }

    /// Per-component state, created once from the validated config.
    pub fn state<S: 'static>(mut self, f: impl Fn(&Struct) -> S + 'static) -> Self {
        self.state = Rc::new(move |config| Box::new(f(config)));
        self
    }

    /// DOM contribution computed from the config.
    pub fn exhibit(mut self, f: impl Fn(&Struct) -> DomModification + 'static) -> Self {
        self.exhibit = Some(Rc::new(move |config, _| f(config)));
        self
    }

    /// DOM contribution computed from the config and the initial state.
    pub fn exhibit_with_state<S: 'static>(
        mut self,
        f: impl Fn(&Struct, &S) -> DomModification + 'static,
    ) -> Self {
        self.exhibit = Some(Rc::new(move |config, state| {
            state
                .downcast_ref::<S>()
                .map(|s| f(config, s))
                .unwrap_or_default()
        }));
        self
    }

    /// Event handlers computed from the config.
    pub fn events(mut self, f: impl Fn(&Struct) -> Vec<Binding> + 'static) -> Self {
        self.events = Some(Rc::new(f));
        self
    }

    /// Finish the definition.
    pub fn build(self) -> Rc<Behaviour> {
        Rc::new(Behaviour {
            name: self.name,
            schema: self.schema,
            state: self.state,
            exhibit: self.exhibit,
            events: self.events,
        })
    }
}

/// Builder returned by [`Behaviour::modal`].
///
/// Each branch contributes the fields of one mode. The state, exhibit and
/// events closures read the discriminant back from the config to pick their
/// per-mode behaviour.
pub struct ModalBuilder {
    inner: BehaviourBuilder,
    key: String,
    branches: Vec<(String, Vec<FieldProcessor>)>,
}

impl fmt::Debug for ModalBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let modes: Vec<&str> = self.branches.iter().map(|(m, _)| m.as_str()).collect();
        f.debug_struct("ModalBuilder")
            .field("name", &self.inner.name)
            .field("key", &self.key)
            .field("modes", &modes)
            .finish()
    }
}

impl ModalBuilder {
    /// Declare a mode and its fields.
    pub fn branch(mut self, mode: &str, fields: Vec<FieldProcessor>) -> Self {
        self.branches.push((mode.to_owned(), fields));
        self
    }

    /// Per-component state.
    pub fn state<S: 'static>(mut self, f: impl Fn(&Struct) -> S + 'static) -> Self {
        self.inner = self.inner.state(f);
        self
    }

    /// DOM contribution.
    pub fn exhibit(mut self, f: impl Fn(&Struct) -> DomModification + 'static) -> Self {
        self.inner = self.inner.exhibit(f);
        self
    }

    /// Event handlers.
    pub fn events(mut self, f: impl Fn(&Struct) -> Vec<Binding> + 'static) -> Self {
        self.inner = self.inner.events(f);
        self
    }

    /// Finish the definition.
    pub fn build(self) -> Rc<Behaviour> {
        let schema = choose(self.key, self.branches);
        self.inner.schema(schema).build()
    }
}

/// Name to behaviour lookup, used when specs are loaded from data.
#[derive(Clone, Debug, Default)]
pub struct BehaviourRegistry {
    behaviours: HashMap<String, Rc<Behaviour>>,
}

impl BehaviourRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a behaviour under its own name, replacing any previous one.
    pub fn register(&mut self, behaviour: Rc<Behaviour>) {
        self.behaviours.insert(behaviour.name.clone(), behaviour);
    }

    /// Builder-style [`register`](Self::register).
    pub fn with(mut self, behaviour: Rc<Behaviour>) -> Self {
        self.register(behaviour);
        self
    }

    /// Look up a behaviour by name.
    pub fn get(&self, name: &str) -> Option<&Rc<Behaviour>> {
        self.behaviours.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ComponentSpec;
    use crate::event::EventKind;
    use crate::handler::run;
    use alloy_schema::{Value, field};
    use std::cell::RefCell;

    fn counting() -> Rc<Behaviour> {
        Behaviour::define("counting")
            .fields(vec![field::defaulted("start", Value::from(0))])
            .state(|config| config.usize("start").unwrap_or(0))
            .exhibit_with_state(|_, n: &usize| {
                DomModification::default().with_attr("data-count", &n.to_string())
            })
            .events(|_| {
                vec![run(EventKind::Execute, |system, component, _| {
                    if let Some(n) = counter().state_mut::<usize>(system, component) {
                        *n += 1;
                    }
                })]
            })
            .build()
    }

    thread_local! {
        static COUNTER: Rc<Behaviour> = counting();
    }

    fn counter() -> Rc<Behaviour> {
        COUNTER.with(Rc::clone)
    }

    #[test]
    fn state_is_created_from_config_and_mutated_by_handlers() {
        let mut system = System::default();
        let c = system
            .build(ComponentSpec::new("div").with(&counter(), Value::object([("start", Value::from(3))])))
            .unwrap();
        system.add_to_world(c).unwrap();
        assert_eq!(system.doc().attr(c.element(), "data-count"), Some("3"));
        system.emit_execute(c);
        system.emit_execute(c);
        assert_eq!(counter().state::<usize>(&system, c), Some(&5));
    }

    #[test]
    fn absent_behaviour_is_a_no_op() {
        let mut system = System::default();
        let c = system.build(ComponentSpec::new("div")).unwrap();
        assert!(!counter().is_configured(&system, c));
        assert!(counter().config(&system, c).is_none());
        assert!(counter().state_mut::<usize>(&mut system, c).is_none());
    }

    #[test]
    fn modal_schema_validates_per_mode() {
        let modal = Behaviour::modal("shape", "mode")
            .branch("circle", vec![field::strict("radius")])
            .branch("square", vec![field::strict("side")])
            .build();
        let mut system = System::default();
        let ok = system.build(
            ComponentSpec::new("div").with(
                &modal,
                Value::object([("mode", Value::from("circle")), ("radius", Value::from(2))]),
            ),
        );
        let c = ok.unwrap();
        assert_eq!(modal.config(&system, c).unwrap().str("mode"), Some("circle"));

        let bad = system.build(ComponentSpec::new("div").with(
            &modal,
            Value::object([("mode", Value::from("square")), ("radius", Value::from(2))]),
        ));
        assert!(bad.is_err());
    }

    #[test]
    fn repeated_kinds_in_one_behaviour_fuse_in_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let (l1, l2) = (log.clone(), log.clone());
        let b = Behaviour::define("twice")
            .events(move |_| {
                let (l1, l2) = (l1.clone(), l2.clone());
                vec![
                    run(EventKind::Execute, move |_, _, _| l1.borrow_mut().push(1)),
                    run(EventKind::Execute, move |_, _, _| l2.borrow_mut().push(2)),
                ]
            })
            .build();
        let mut system = System::default();
        let c = system
            .build(ComponentSpec::new("div").with(&b, Value::empty_object()))
            .unwrap();
        system.add_to_world(c).unwrap();
        system.emit_execute(c);
        assert_eq!(*log.borrow(), vec![1, 2]);
    }

    #[test]
    fn registry_lookup() {
        let reg = BehaviourRegistry::new().with(counter());
        assert!(reg.get("counting").is_some());
        assert!(reg.get("missing").is_none());
    }
}
