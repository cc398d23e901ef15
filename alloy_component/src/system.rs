// Copyright 2025 the Alloy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The component system: building, the world registry and the attach/detach
//! lifecycle.

use std::any::Any;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

use alloy_dom::{BASE_MODIFICATION, Document, ElementId, combine, merge, render};
use alloy_schema::{Struct, Value, extract_struct};
use hashbrown::HashMap;

use crate::behaviour::Behaviour;
use crate::config::SystemConfig;
use crate::error::{BuildError, RegistryError};
use crate::event::{EventKind, RawEvent};
use crate::handler::{BASE_BEHAVIOUR, EventHandler, combine_handlers, default_event_order};
use crate::monitor::EventMonitor;
use crate::registry::EventRegistry;
use crate::spec::{ApiFn, ChildSpec, ComponentSpec};
use crate::uid::{UID_ATTR, Uid};

/// Handle of a built component.
///
/// A component owns exactly one element for its whole life, so the handle is
/// that element's id.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(ElementId);

impl ComponentId {
    pub(crate) const fn new(element: ElementId) -> Self {
        Self(element)
    }

    /// The component's element.
    pub const fn element(self) -> ElementId {
        self.0
    }
}

pub(crate) struct Slot {
    pub(crate) behaviour: Rc<Behaviour>,
    pub(crate) config: Struct,
    pub(crate) state: Box<dyn Any>,
}

pub(crate) struct Component {
    pub(crate) uid: Uid,
    pub(crate) external: bool,
    pub(crate) slots: Vec<Slot>,
    pub(crate) children: Vec<ComponentId>,
    pub(crate) handlers: HashMap<EventKind, Rc<EventHandler>>,
    pub(crate) apis: HashMap<String, ApiFn>,
}

type Task = Box<dyn FnOnce(&mut System)>;

/// The explicit context every Alloy operation runs against.
///
/// A system owns the [`Document`], every built component, the world registry
/// (uid to component) and the event registry. Handlers receive `&mut System`
/// and may re-enter it.
pub struct System {
    pub(crate) doc: Document,
    pub(crate) config: SystemConfig,
    pub(crate) components: HashMap<ComponentId, Component>,
    pub(crate) world: HashMap<Uid, ComponentId>,
    pub(crate) registry: EventRegistry,
    pub(crate) monitor: Option<EventMonitor>,
    pub(crate) deferred: VecDeque<Task>,
}

impl fmt::Debug for System {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("System")
            .field("config", &self.config)
            .field("components", &self.components.len())
            .field("world", &self.world.len())
            .field("deferred", &self.deferred.len())
            .finish_non_exhaustive()
    }
}

impl Default for System {
    fn default() -> Self {
        Self::new(SystemConfig::default())
    }
}

impl System {
    /// A system over a fresh document.
    pub fn new(config: SystemConfig) -> Self {
        Self::with_document(Document::new(), config)
    }

    /// A system over an existing document.
    pub fn with_document(doc: Document, config: SystemConfig) -> Self {
        Self {
            doc,
            config,
            components: HashMap::new(),
            world: HashMap::new(),
            registry: EventRegistry::default(),
            monitor: config
                .monitor_events
                .then(|| EventMonitor::new(config.monitor_capacity)),
            deferred: VecDeque::new(),
        }
    }

    /// The document.
    pub fn doc(&self) -> &Document {
        &self.doc
    }

    /// Mutable access to the document.
    pub fn doc_mut(&mut self) -> &mut Document {
        &mut self.doc
    }

    /// The settings the system was created with.
    pub fn config(&self) -> &SystemConfig {
        &self.config
    }

    /// Resolve [`EventKind::Tap`] for this system.
    pub fn resolve_kind(&self, kind: EventKind) -> EventKind {
        match kind {
            EventKind::Tap if !self.config.touch => EventKind::Click,
            other => other,
        }
    }

    // --- building ---

    /// Build a component and its children.
    ///
    /// Every behaviour config is validated, every DOM contribution combined and
    /// every event ordering checked before the element is rendered. On error
    /// nothing built by this call survives; premade and external children are
    /// left detached.
    pub fn build(&mut self, spec: ComponentSpec) -> Result<ComponentId, BuildError> {
        let mut created = Vec::new();
        let result = self.build_spec(spec, &mut created);
        if let Err(err) = &result {
            tracing::debug!(%err, discarded = created.len(), "build failed");
            self.discard(&created);
        }
        result
    }

    fn build_spec(
        &mut self,
        spec: ComponentSpec,
        created: &mut Vec<ComponentId>,
    ) -> Result<ComponentId, BuildError> {
        let ComponentSpec {
            uid,
            dom,
            components,
            behaviours,
            events,
            event_order,
            dom_modification,
            apis,
        } = spec;

        let mut children = Vec::with_capacity(components.len());
        for child in components {
            let id = match child {
                ChildSpec::Spec(s) => self.build_spec(*s, created)?,
                ChildSpec::External(element) => self.adopt(element, created),
                ChildSpec::Premade(component) => component,
                ChildSpec::Placeholder { owner, name } => {
                    return Err(BuildError::UnresolvedPlaceholder { owner, name });
                }
            };
            children.push(id);
        }

        let mut slots = Vec::new();
        let mut contributions = vec![(BASE_MODIFICATION.to_owned(), dom_modification)];
        let mut bindings: Vec<(String, EventKind, EventHandler)> = events
            .into_iter()
            .map(|(kind, h)| (BASE_BEHAVIOUR.to_owned(), self.resolve_kind(kind), h))
            .collect();
        for (behaviour, input) in behaviours {
            let Some(input) = input else {
                continue;
            };
            let config = extract_struct(behaviour.name(), behaviour.schema(), &input)?;
            let state = behaviour.create_state(&config);
            contributions.push((
                behaviour.name().to_owned(),
                behaviour.exhibit(&config, &*state),
            ));
            for (kind, handler) in behaviour.handlers(&config) {
                bindings.push((behaviour.name().to_owned(), self.resolve_kind(kind), handler));
            }
            slots.push(Slot {
                behaviour,
                config,
                state,
            });
        }

        let modification = combine(&contributions)?;
        let mut order = default_event_order();
        order.extend(event_order);
        let handlers = combine_handlers(bindings, &order)?;

        let mut definition = merge(&dom, &modification);
        if modification.dom_children.is_none() && !children.is_empty() {
            definition.dom_children = children.iter().map(|c| c.element()).collect();
        }
        let uid = uid.unwrap_or_else(|| Uid::generate("uid"));
        definition
            .attributes
            .insert(UID_ATTR.to_owned(), uid.to_string());

        let element = render(&mut self.doc, &definition);
        let id = ComponentId::new(element);
        tracing::debug!(component = %self.doc.describe(element), "built");
        self.components.insert(
            id,
            Component {
                uid,
                external: false,
                slots,
                children,
                handlers,
                apis: apis.into_iter().collect(),
            },
        );
        created.push(id);
        Ok(id)
    }

    fn adopt(&mut self, element: ElementId, created: &mut Vec<ComponentId>) -> ComponentId {
        let uid = Uid::generate("external");
        self.doc.set_attr(element, UID_ATTR, uid.as_str());
        let id = ComponentId::new(element);
        self.components.insert(
            id,
            Component {
                uid,
                external: true,
                slots: Vec::new(),
                children: Vec::new(),
                handlers: HashMap::new(),
                apis: HashMap::new(),
            },
        );
        created.push(id);
        id
    }

    fn discard(&mut self, created: &[ComponentId]) {
        // Children this build does not own are unhooked before any subtree is freed.
        for id in created {
            let Some(c) = self.components.get(id) else {
                continue;
            };
            let foreign: Vec<ComponentId> = c
                .children
                .iter()
                .copied()
                .filter(|child| {
                    !created.contains(child)
                        || self.components.get(child).is_some_and(|c| c.external)
                })
                .collect();
            for child in foreign {
                if self.doc.parent_of(child.element()) == Some(id.element()) {
                    self.doc.remove(child.element());
                }
            }
        }
        for id in created.iter().rev() {
            if let Some(c) = self.components.remove(id) {
                if c.external {
                    self.doc.remove_attr(id.element(), UID_ATTR);
                } else {
                    self.doc.destroy(id.element());
                }
            }
        }
    }

    // --- world ---

    /// Register a component and its children, then fire
    /// [`EventKind::SystemInit`] on it.
    ///
    /// Adding a component that is already registered is a no-op. Every uid
    /// in the tree is checked before anything is registered, so a
    /// [`RegistryError::DuplicateUid`] leaves the world unchanged.
    pub fn add_to_world(&mut self, component: ComponentId) -> Result<(), RegistryError> {
        if !self.components.contains_key(&component) {
            tracing::warn!(?component, "cannot add an unknown component to the world");
            return Ok(());
        }
        self.check_uids(component, &mut HashMap::new())?;
        self.register_tree(component);
        Ok(())
    }

    fn check_uids(
        &self,
        component: ComponentId,
        claimed: &mut HashMap<Uid, ComponentId>,
    ) -> Result<(), RegistryError> {
        let Some(c) = self.components.get(&component) else {
            return Ok(());
        };
        let holder = self.world.get(&c.uid).or_else(|| claimed.get(&c.uid));
        if let Some(&existing) = holder
            && existing != component
        {
            return Err(RegistryError::DuplicateUid {
                uid: c.uid.to_string(),
                existing: self.doc.describe(existing.element()),
                incoming: self.doc.describe(component.element()),
                existing_in_dom: self.doc.in_body(existing.element()),
            });
        }
        claimed.insert(c.uid.clone(), component);
        for &child in &c.children {
            self.check_uids(child, claimed)?;
        }
        Ok(())
    }

    fn register_tree(&mut self, component: ComponentId) {
        let Some(c) = self.components.get(&component) else {
            return;
        };
        let uid = c.uid.clone();
        if self.world.contains_key(&uid) {
            return;
        }
        self.world.insert(uid.clone(), component);
        self.registry.register(&uid, component, &c.handlers);
        for child in c.children.clone() {
            self.register_tree(child);
        }
        self.trigger(EventKind::SystemInit, RawEvent::None, component.element());
    }

    /// Unregister a component and its children.
    pub fn remove_from_world(&mut self, component: ComponentId) {
        let Some(c) = self.components.get(&component) else {
            return;
        };
        let uid = c.uid.clone();
        for child in c.children.clone() {
            self.remove_from_world(child);
        }
        if self.world.get(&uid) == Some(&component) {
            self.world.remove(&uid);
            self.registry.unregister(&uid);
        }
    }

    /// Returns true if the component is registered.
    pub fn is_in_world(&self, component: ComponentId) -> bool {
        self.components
            .get(&component)
            .is_some_and(|c| self.world.get(&c.uid) == Some(&component))
    }

    /// The registered component with `uid`.
    pub fn get_by_uid(&self, uid: &str) -> Option<ComponentId> {
        self.world.get(uid).copied()
    }

    /// The registered component owning `element`.
    pub fn get_by_dom(&self, element: ElementId) -> Option<ComponentId> {
        let uid = self.doc.attr(element, UID_ATTR)?;
        self.world
            .get(uid)
            .copied()
            .filter(|c| c.element() == element)
    }

    // --- lifecycle ---

    /// Add `child` to the world and append it to `parent`.
    ///
    /// When `parent` is connected, [`EventKind::Attached`] fires post-order
    /// (children before their parent).
    pub fn attach(&mut self, parent: ComponentId, child: ComponentId) -> Result<(), RegistryError> {
        self.attach_with(parent, child, None)
    }

    /// Like [`attach`](Self::attach), inserting at `index` among the parent's
    /// element children.
    pub fn attach_at(
        &mut self,
        parent: ComponentId,
        index: usize,
        child: ComponentId,
    ) -> Result<(), RegistryError> {
        self.attach_with(parent, child, Some(index))
    }

    fn attach_with(
        &mut self,
        parent: ComponentId,
        child: ComponentId,
        index: Option<usize>,
    ) -> Result<(), RegistryError> {
        self.add_to_world(child)?;
        match index {
            Some(i) => self.doc.insert_child(parent.element(), i, child.element()),
            None => self.doc.append_child(parent.element(), child.element()),
        }
        if self.doc.in_body(parent.element()) {
            self.fire_attaching(child);
        }
        self.sync_components(parent);
        Ok(())
    }

    /// Add a root component to the world and connect it under the body.
    pub fn attach_to_body(&mut self, component: ComponentId) -> Result<(), RegistryError> {
        self.add_to_world(component)?;
        let body = self.doc.body();
        self.doc.append_child(body, component.element());
        self.fire_attaching(component);
        Ok(())
    }

    fn fire_attaching(&mut self, component: ComponentId) {
        for child in self.children(component).to_vec() {
            self.fire_attaching(child);
        }
        self.emit(component, EventKind::Attached);
    }

    fn fire_detaching(&mut self, component: ComponentId) {
        self.emit(component, EventKind::Detached);
        for child in self.children(component).to_vec() {
            self.fire_detaching(child);
        }
    }

    fn do_detach(&mut self, component: ComponentId) {
        self.fire_detaching(component);
        self.doc.remove(component.element());
        self.remove_from_world(component);
    }

    /// Detach a component: [`EventKind::Detached`] fires pre-order (parent
    /// before children), then the element is removed and the subtree leaves
    /// the world.
    pub fn detach(&mut self, component: ComponentId) {
        let parent = self
            .doc
            .parent_of(component.element())
            .and_then(|p| self.component_at(p));
        self.do_detach(component);
        if let Some(p) = parent {
            self.sync_components(p);
        }
    }

    /// Detach every child of `component` and empty its element.
    pub fn detach_children(&mut self, component: ComponentId) {
        for child in self.children(component).to_vec() {
            self.do_detach(child);
        }
        self.doc.clear_children(component.element());
        self.sync_components(component);
    }

    /// Detach a component and free it and its element subtree.
    pub fn destroy(&mut self, component: ComponentId) {
        self.detach(component);
        self.forget(component);
        self.doc.destroy(component.element());
    }

    fn forget(&mut self, component: ComponentId) {
        if let Some(c) = self.components.remove(&component) {
            for child in c.children {
                self.forget(child);
            }
        }
    }

    /// Recompute a component's children from its element's children.
    pub fn sync_components(&mut self, component: ComponentId) {
        let children: Vec<ComponentId> = self
            .doc
            .children_of(component.element())
            .iter()
            .filter_map(|&el| self.component_at(el))
            .collect();
        if let Some(c) = self.components.get_mut(&component) {
            c.children = children;
        }
    }

    fn component_at(&self, element: ElementId) -> Option<ComponentId> {
        let id = ComponentId::new(element);
        self.components.contains_key(&id).then_some(id)
    }

    // --- introspection ---

    /// Returns true if the component exists (registered or not).
    pub fn contains(&self, component: ComponentId) -> bool {
        self.components.contains_key(&component)
    }

    /// Number of live components.
    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// The component's uid.
    pub fn uid_of(&self, component: ComponentId) -> Option<&Uid> {
        self.components.get(&component).map(|c| &c.uid)
    }

    /// The component's child components.
    pub fn children(&self, component: ComponentId) -> &[ComponentId] {
        self.components
            .get(&component)
            .map(|c| c.children.as_slice())
            .unwrap_or_default()
    }

    /// The nearest component above this one.
    pub fn parent(&self, component: ComponentId) -> Option<ComponentId> {
        self.doc
            .ancestors(component.element())
            .into_iter()
            .find_map(|el| self.component_at(el))
    }

    /// Diagnostic description of the component's element.
    pub fn describe(&self, component: ComponentId) -> String {
        self.doc.describe(component.element())
    }

    /// Returns true if `name` is configured on the component.
    pub fn has_behaviour(&self, component: ComponentId, name: &str) -> bool {
        self.slot(component, name).is_some()
    }

    /// Names of the behaviours configured on the component, in spec order.
    pub fn behaviours_of(&self, component: ComponentId) -> Vec<&str> {
        self.components
            .get(&component)
            .map(|c| c.slots.iter().map(|s| s.behaviour.name()).collect())
            .unwrap_or_default()
    }

    /// The validated config of behaviour `name`.
    pub fn config_of(&self, component: ComponentId, name: &str) -> Option<&Struct> {
        self.slot(component, name).map(|s| &s.config)
    }

    /// The state of behaviour `name`.
    pub fn state_of<S: 'static>(&self, component: ComponentId, name: &str) -> Option<&S> {
        self.slot(component, name)?.state.downcast_ref::<S>()
    }

    /// Mutable state of behaviour `name`.
    pub fn state_of_mut<S: 'static>(&mut self, component: ComponentId, name: &str) -> Option<&mut S> {
        self.components
            .get_mut(&component)?
            .slots
            .iter_mut()
            .find(|s| s.behaviour.name() == name)?
            .state
            .downcast_mut::<S>()
    }

    fn slot(&self, component: ComponentId, name: &str) -> Option<&Slot> {
        self.components
            .get(&component)?
            .slots
            .iter()
            .find(|s| s.behaviour.name() == name)
    }

    /// An API function exposed by the component's spec.
    pub fn api(&self, component: ComponentId, name: &str) -> Option<ApiFn> {
        self.components.get(&component)?.apis.get(name).cloned()
    }

    /// Call an API function exposed by the component's spec.
    pub fn call_api(&mut self, component: ComponentId, name: &str, args: &[Value]) -> Option<Value> {
        let f = self.api(component, name)?;
        Some(f(self, component, args))
    }

    // --- diagnostics ---

    /// Start recording dispatch traces, keeping at most `capacity`.
    pub fn enable_monitor(&mut self, capacity: usize) {
        self.monitor = Some(EventMonitor::new(capacity));
    }

    /// Stop recording dispatch traces.
    pub fn disable_monitor(&mut self) {
        self.monitor = None;
    }

    /// The dispatch monitor, when enabled.
    pub fn monitor(&self) -> Option<&EventMonitor> {
        self.monitor.as_ref()
    }

    /// Mutable access to the dispatch monitor.
    pub fn monitor_mut(&mut self) -> Option<&mut EventMonitor> {
        self.monitor.as_mut()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::handler::{run, run_on_attached, run_on_detached, run_on_init};
    use alloy_dom::DomModification;
    use alloy_schema::field::strict;
    use std::cell::RefCell;

    pub(crate) fn plain(system: &mut System) -> ComponentId {
        system.build(ComponentSpec::new("div")).unwrap()
    }

    type Log = Rc<RefCell<Vec<String>>>;

    fn logged(tag: &str, log: &Log) -> ComponentSpec {
        let (a, d, i) = (log.clone(), log.clone(), log.clone());
        let (ta, td, ti) = (tag.to_owned(), tag.to_owned(), tag.to_owned());
        ComponentSpec::new("div")
            .uid(tag)
            .on(run_on_attached(move |_, _| a.borrow_mut().push(format!("attached {ta}"))))
            .on(run_on_detached(move |_, _| d.borrow_mut().push(format!("detached {td}"))))
            .on(run_on_init(move |_, _| i.borrow_mut().push(format!("init {ti}"))))
    }

    #[test]
    fn build_renders_children_and_tags_uid() {
        let mut system = System::default();
        let c = system
            .build(
                ComponentSpec::new("ul")
                    .uid("list")
                    .class("menu")
                    .modification(DomModification::default().with_attr("role", "menu"))
                    .child(ComponentSpec::new("li"))
                    .child(ComponentSpec::new("li")),
            )
            .unwrap();
        let doc = system.doc();
        assert_eq!(doc.attr(c.element(), UID_ATTR), Some("list"));
        assert_eq!(doc.attr(c.element(), "role"), Some("menu"));
        assert!(doc.has_class(c.element(), "menu"));
        assert_eq!(system.children(c).len(), 2);
        assert_eq!(doc.children_of(c.element()).len(), 2);
        assert!(!system.is_in_world(c), "build does not register");
    }

    #[test]
    fn failed_build_discards_partial_children() {
        let mut system = System::default();
        let premade = plain(&mut system);
        let strict_behaviour = Behaviour::define("needy").fields(vec![strict("x")]).build();
        let before = system.component_count();
        let err = system
            .build(
                ComponentSpec::new("div")
                    .child(ComponentSpec::new("span").child(ComponentSpec::new("b")))
                    .premade(premade)
                    .with(&strict_behaviour, Value::empty_object()),
            )
            .unwrap_err();
        assert!(matches!(err, BuildError::Config(ref e) if e.label == "needy"));
        assert_eq!(system.component_count(), before);
        assert!(system.contains(premade));
        assert!(system.doc().is_alive(premade.element()));
        assert_eq!(system.doc().parent_of(premade.element()), None);
    }

    #[test]
    fn conflicting_modifications_fail_the_build() {
        let a = Behaviour::define("a")
            .exhibit(|_| DomModification::default().with_attr("role", "x"))
            .build();
        let b = Behaviour::define("b")
            .exhibit(|_| DomModification::default().with_attr("role", "y"))
            .build();
        let mut system = System::default();
        let err = system
            .build(
                ComponentSpec::new("div")
                    .with(&a, Value::empty_object())
                    .with(&b, Value::empty_object()),
            )
            .unwrap_err();
        assert!(matches!(err, BuildError::DomConflict(_)));
        assert_eq!(system.component_count(), 0);
    }

    #[test]
    fn duplicate_uid_names_both_elements() {
        let mut system = System::default();
        let a = system.build(ComponentSpec::new("div").uid("same")).unwrap();
        let b = system.build(ComponentSpec::new("span").uid("same")).unwrap();
        system.attach_to_body(a).unwrap();
        system.add_to_world(a).unwrap();
        let err = system.add_to_world(b).unwrap_err();
        let RegistryError::DuplicateUid {
            existing,
            incoming,
            existing_in_dom,
            ..
        } = err;
        assert!(existing.starts_with("<div"));
        assert!(incoming.starts_with("<span"));
        assert!(existing_in_dom);
    }

    #[test]
    fn duplicate_uid_in_a_subtree_registers_nothing() {
        let mut system = System::default();
        let taken = system.build(ComponentSpec::new("div").uid("dup")).unwrap();
        system.attach_to_body(taken).unwrap();
        let parent = system
            .build(
                ComponentSpec::new("div")
                    .uid("p")
                    .child(ComponentSpec::new("span").uid("ok"))
                    .child(ComponentSpec::new("span").uid("dup")),
            )
            .unwrap();

        let err = system.attach_to_body(parent).unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateUid { ref uid, .. } if uid == "dup"));
        assert!(!system.is_in_world(parent));
        assert!(system.get_by_uid("p").is_none());
        assert!(system.get_by_uid("ok").is_none());
        assert_eq!(system.get_by_uid("dup"), Some(taken));
        assert!(!system.doc().in_body(parent.element()));
    }

    #[test]
    fn attach_is_post_order_and_detach_is_pre_order() {
        let log: Log = Rc::default();
        let mut system = System::default();
        let root = system.build(logged("root", &log)).unwrap();
        system.attach_to_body(root).unwrap();
        let parent = system
            .build(
                logged("parent", &log)
                    .child(logged("child-a", &log))
                    .child(logged("child-b", &log)),
            )
            .unwrap();
        log.borrow_mut().clear();

        system.attach(root, parent).unwrap();
        assert_eq!(
            *log.borrow(),
            vec![
                "init child-a",
                "init child-b",
                "init parent",
                "attached child-a",
                "attached child-b",
                "attached parent",
            ]
        );
        assert_eq!(system.children(root), &[parent]);

        log.borrow_mut().clear();
        system.detach(parent);
        assert_eq!(
            *log.borrow(),
            vec!["detached parent", "detached child-a", "detached child-b"]
        );
        assert!(system.children(root).is_empty());
        assert!(system.get_by_uid("child-a").is_none());
        assert!(system.contains(parent), "detached components can be reattached");
    }

    #[test]
    fn attaching_to_a_disconnected_parent_fires_no_attached() {
        let log: Log = Rc::default();
        let mut system = System::default();
        let parent = plain(&mut system);
        let child = system.build(logged("c", &log)).unwrap();
        system.attach(parent, child).unwrap();
        assert_eq!(*log.borrow(), vec!["init c"]);
    }

    #[test]
    fn lookups_follow_the_world() {
        let mut system = System::default();
        let c = system.build(ComponentSpec::new("div").uid("x")).unwrap();
        assert_eq!(system.get_by_dom(c.element()), None);
        system.add_to_world(c).unwrap();
        assert_eq!(system.get_by_uid("x"), Some(c));
        assert_eq!(system.get_by_dom(c.element()), Some(c));
        system.remove_from_world(c);
        assert_eq!(system.get_by_uid("x"), None);
    }

    #[test]
    fn external_and_premade_children() {
        let mut system = System::default();
        let existing = system.doc_mut().create_element("canvas");
        let premade = plain(&mut system);
        let c = system
            .build(ComponentSpec::new("div").external(existing).premade(premade))
            .unwrap();
        assert_eq!(system.doc().children_of(c.element()), &[existing, premade.element()]);
        assert!(system.behaviours_of(ComponentId(existing)).is_empty());
        system.attach_to_body(c).unwrap();
        assert!(system.get_by_dom(existing).is_some());
    }

    #[test]
    fn destroy_frees_the_subtree() {
        let mut system = System::default();
        let c = system
            .build(ComponentSpec::new("div").child(ComponentSpec::new("span")))
            .unwrap();
        let child = system.children(c)[0];
        system.attach_to_body(c).unwrap();
        system.destroy(c);
        assert!(!system.contains(c));
        assert!(!system.contains(child));
        assert!(!system.doc().is_alive(child.element()));
    }

    #[test]
    fn detach_children_empties_the_element() {
        let mut system = System::default();
        let c = system
            .build(
                ComponentSpec::new("div")
                    .child(ComponentSpec::new("span"))
                    .child(ComponentSpec::new("span")),
            )
            .unwrap();
        system.attach_to_body(c).unwrap();
        system.detach_children(c);
        assert!(system.children(c).is_empty());
        assert!(system.doc().children_of(c.element()).is_empty());
    }

    #[test]
    fn apis_receive_their_component() {
        let mut system = System::default();
        let c = system
            .build(ComponentSpec::new("div").api("tag", |system, me, _| {
                Value::from(system.doc().tag(me.element()).unwrap_or_default())
            }))
            .unwrap();
        assert_eq!(system.call_api(c, "tag", &[]), Some(Value::from("div")));
        assert_eq!(system.call_api(c, "missing", &[]), None);
    }

    #[test]
    fn tap_is_click_without_touch() {
        let hits = Rc::new(RefCell::new(0));
        let h = hits.clone();
        let mut system = System::default();
        let c = system
            .build(ComponentSpec::new("button").on(run(EventKind::Tap, move |_, _, _| {
                *h.borrow_mut() += 1;
            })))
            .unwrap();
        system.attach_to_body(c).unwrap();
        system.trigger(EventKind::Click, RawEvent::None, c.element());
        system.trigger(EventKind::Tap, RawEvent::None, c.element());
        assert_eq!(*hits.borrow(), 2);

        let mut touch = System::new(SystemConfig {
            touch: true,
            ..SystemConfig::default()
        });
        assert_eq!(touch.resolve_kind(EventKind::Tap), EventKind::Tap);
        let c = touch.build(ComponentSpec::new("button")).unwrap();
        touch.attach_to_body(c).unwrap();
    }
}
