// Copyright 2025 the Alloy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Event handlers, handler fusion and per-event behaviour ordering.
//!
//! A component may receive handlers for the same [`EventKind`] from several
//! behaviours. They are fused into one [`EventHandler`] at build time:
//!
//! - `can` is the AND of every `can` guard,
//! - `abort` is the OR of every `abort` guard,
//! - `run` calls every `run` in order.
//!
//! The order comes from the spec's event ordering (falling back to
//! [`default_event_order`]). Two or more behaviours on one kind without an
//! ordering entry is a build error.

use std::fmt;
use std::rc::Rc;

use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::composite::Composite;
use crate::error::BuildError;
use crate::event::{EventKind, SimulatedEvent};
use crate::system::{ComponentId, System};
use crate::uid::Uid;

/// Name under which a spec's own `events` take part in ordering.
pub const BASE_BEHAVIOUR: &str = "alloy.base.behaviour";

/// Handler body.
pub type RunFn = Rc<dyn Fn(&mut System, ComponentId, &mut SimulatedEvent)>;

/// Handler guard.
pub type GuardFn = Rc<dyn Fn(&System, ComponentId, &SimulatedEvent) -> bool>;

/// A guarded event handler.
#[derive(Clone, Default)]
pub struct EventHandler {
    can: SmallVec<[GuardFn; 1]>,
    abort: SmallVec<[GuardFn; 1]>,
    run: SmallVec<[RunFn; 2]>,
}

impl fmt::Debug for EventHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventHandler")
            .field("can", &self.can.len())
            .field("abort", &self.abort.len())
            .field("run", &self.run.len())
            .finish()
    }
}

impl EventHandler {
    /// A handler that runs `f`.
    pub fn run(f: impl Fn(&mut System, ComponentId, &mut SimulatedEvent) + 'static) -> Self {
        let mut h = Self::default();
        h.run.push(Rc::new(f));
        h
    }

    /// A handler that runs `f` only when the event was dispatched at the
    /// component's own element.
    pub fn run_on_source(
        f: impl Fn(&mut System, ComponentId, &mut SimulatedEvent) + 'static,
    ) -> Self {
        Self::run(f).with_can(|_, component, event| event.target() == component.element())
    }

    /// A handler that cuts the event.
    pub fn cutter() -> Self {
        Self::run(|_, _, event| event.cut())
    }

    /// A handler that stops the event.
    pub fn stopper() -> Self {
        Self::run(|_, _, event| event.stop())
    }

    /// Add a `can` guard: the run step is skipped when it returns false.
    pub fn with_can(
        mut self,
        guard: impl Fn(&System, ComponentId, &SimulatedEvent) -> bool + 'static,
    ) -> Self {
        self.can.push(Rc::new(guard));
        self
    }

    /// Add an `abort` guard: the event is stopped instead of run when it
    /// returns true.
    pub fn with_abort(
        mut self,
        guard: impl Fn(&System, ComponentId, &SimulatedEvent) -> bool + 'static,
    ) -> Self {
        self.abort.push(Rc::new(guard));
        self
    }

    /// Returns true if every `can` guard passes.
    pub fn can(&self, system: &System, component: ComponentId, event: &SimulatedEvent) -> bool {
        self.can.iter().all(|g| g(system, component, event))
    }

    /// Returns true if any `abort` guard fires.
    pub fn abort(&self, system: &System, component: ComponentId, event: &SimulatedEvent) -> bool {
        self.abort.iter().any(|g| g(system, component, event))
    }

    /// Apply the handler: abort stops, otherwise `can` gates the runs.
    pub fn invoke(&self, system: &mut System, component: ComponentId, event: &mut SimulatedEvent) {
        if self.abort(system, component, event) {
            event.stop();
        } else if self.can(system, component, event) {
            for run in &self.run {
                run(system, component, event);
            }
        }
    }

    /// Fuse handlers in order.
    pub fn fuse(handlers: impl IntoIterator<Item = Self>) -> Self {
        let mut out = Self::default();
        for h in handlers {
            out.can.extend(h.can);
            out.abort.extend(h.abort);
            out.run.extend(h.run);
        }
        out
    }
}

/// A handler bound to an event kind.
pub type Binding = (EventKind, EventHandler);

/// Run `f` on every `kind` event reaching the component.
pub fn run(
    kind: EventKind,
    f: impl Fn(&mut System, ComponentId, &mut SimulatedEvent) + 'static,
) -> Binding {
    (kind, EventHandler::run(f))
}

/// Run `f` when the component is attached to the document.
pub fn run_on_attached(f: impl Fn(&mut System, ComponentId) + 'static) -> Binding {
    (
        EventKind::Attached,
        EventHandler::run_on_source(move |system, component, _| f(system, component)),
    )
}

/// Run `f` when the component is detached from the document.
pub fn run_on_detached(f: impl Fn(&mut System, ComponentId) + 'static) -> Binding {
    (
        EventKind::Detached,
        EventHandler::run_on_source(move |system, component, _| f(system, component)),
    )
}

/// Run `f` when the component is added to a system.
pub fn run_on_init(f: impl Fn(&mut System, ComponentId) + 'static) -> Binding {
    (
        EventKind::SystemInit,
        EventHandler::run_on_source(move |system, component, _| f(system, component)),
    )
}

/// Run `f` on `alloy.execute`.
pub fn run_on_execute(f: impl Fn(&mut System, ComponentId, &mut SimulatedEvent) + 'static) -> Binding {
    (EventKind::Execute, EventHandler::run(f))
}

/// Cut every `kind` event reaching the component.
pub fn cutter(kind: EventKind) -> Binding {
    (kind, EventHandler::cutter())
}

/// Stop every `kind` event reaching the component.
pub fn stopper(kind: EventKind) -> Binding {
    (kind, EventHandler::stopper())
}

/// Re-dispatch `kind` at the component registered under `uid`.
pub fn redirect_to_uid(kind: EventKind, uid: Uid) -> Binding {
    (
        kind,
        EventHandler::run(move |system, _, event| {
            if let Some(target) = system.get_by_uid(uid.as_str()) {
                let raw = event.raw().clone();
                system.dispatch_with(target, target.element(), kind, raw);
            }
        }),
    )
}

/// Re-dispatch `kind` at a named part of a composite.
pub fn redirect_to_part(kind: EventKind, composite: Rc<Composite>, part: &str) -> Binding {
    let part = part.to_owned();
    (
        kind,
        EventHandler::run(move |system, _, event| {
            if let Some(target) = composite.get_part(system, &part) {
                let raw = event.raw().clone();
                system.dispatch_with(target, target.element(), kind, raw);
            }
        }),
    )
}

/// Built-in orderings used when a spec does not give its own.
pub fn default_event_order() -> HashMap<EventKind, Vec<String>> {
    let order = |names: &[&str]| names.iter().map(|n| (*n).to_owned()).collect::<Vec<_>>();
    let mut m = HashMap::new();
    m.insert(
        EventKind::Focus,
        order(&[BASE_BEHAVIOUR, "focusing", "keying"]),
    );
    m.insert(EventKind::Execute, order(&[BASE_BEHAVIOUR, "toggling"]));
    m.insert(
        EventKind::SystemInit,
        order(&[BASE_BEHAVIOUR, "toggling", "representing"]),
    );
    m.insert(
        EventKind::Detached,
        order(&[BASE_BEHAVIOUR, "representing"]),
    );
    m
}

/// Group `(behaviour, kind, handler)` triples by kind and fuse each group
/// according to `order`. Repeated kinds from one behaviour fuse in
/// declaration order first.
pub(crate) fn combine_handlers(
    bindings: Vec<(String, EventKind, EventHandler)>,
    order: &HashMap<EventKind, Vec<String>>,
) -> Result<HashMap<EventKind, Rc<EventHandler>>, BuildError> {
    let mut groups: Vec<(EventKind, Vec<(String, EventHandler)>)> = Vec::new();
    for (name, kind, handler) in bindings {
        match groups.iter_mut().find(|(k, _)| *k == kind) {
            Some((_, group)) => match group.iter_mut().find(|(n, _)| *n == name) {
                Some((_, existing)) => {
                    let first = std::mem::take(existing);
                    *existing = EventHandler::fuse([first, handler]);
                }
                None => group.push((name, handler)),
            },
            None => groups.push((kind, vec![(name, handler)])),
        }
    }

    let mut out = HashMap::new();
    for (kind, mut group) in groups {
        if group.len() == 1 {
            let (_, handler) = group.remove(0);
            out.insert(kind, Rc::new(handler));
            continue;
        }
        let names: Vec<String> = group.iter().map(|(n, _)| n.clone()).collect();
        let Some(ordering) = order.get(&kind) else {
            return Err(BuildError::MissingEventOrder {
                kind,
                behaviours: names,
            });
        };
        let missing: Vec<String> = names
            .iter()
            .filter(|n| !ordering.contains(n))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(BuildError::IncompleteEventOrder { kind, missing });
        }
        let mut ordered = Vec::with_capacity(group.len());
        for name in ordering {
            if let Some(pos) = group.iter().position(|(n, _)| n == name) {
                ordered.push(group.remove(pos).1);
            }
        }
        out.insert(kind, Rc::new(EventHandler::fuse(ordered)));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::RawEvent;
    use crate::system::{System, tests::plain};
    use std::cell::RefCell;

    fn recorder(log: &Rc<RefCell<Vec<&'static str>>>, tag: &'static str) -> EventHandler {
        let log = log.clone();
        EventHandler::run(move |_, _, _| log.borrow_mut().push(tag))
    }

    #[test]
    fn abort_stops_and_skips_run() {
        let mut system = System::default();
        let c = plain(&mut system);
        let log = Rc::new(RefCell::new(Vec::new()));
        let h = EventHandler::fuse([
            recorder(&log, "a"),
            recorder(&log, "b").with_abort(|_, _, _| true),
        ]);
        let mut ev = SimulatedEvent::new(EventKind::Execute, RawEvent::None, c.element());
        h.invoke(&mut system, c, &mut ev);
        assert!(ev.is_stopped());
        assert!(log.borrow().is_empty(), "no run after abort");
    }

    #[test]
    fn can_is_the_and_of_guards() {
        let mut system = System::default();
        let c = plain(&mut system);
        let log = Rc::new(RefCell::new(Vec::new()));
        let h = EventHandler::fuse([
            recorder(&log, "a").with_can(|_, _, _| true),
            recorder(&log, "b").with_can(|_, _, _| false),
        ]);
        let mut ev = SimulatedEvent::new(EventKind::Execute, RawEvent::None, c.element());
        h.invoke(&mut system, c, &mut ev);
        assert!(!ev.is_stopped());
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn ordering_controls_run_sequence() {
        let mut system = System::default();
        let c = plain(&mut system);
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut order = HashMap::new();
        order.insert(EventKind::Execute, vec!["b".to_owned(), "a".to_owned()]);
        let fused = combine_handlers(
            vec![
                ("a".to_owned(), EventKind::Execute, recorder(&log, "a")),
                ("b".to_owned(), EventKind::Execute, recorder(&log, "b")),
            ],
            &order,
        )
        .unwrap();
        let mut ev = SimulatedEvent::new(EventKind::Execute, RawEvent::None, c.element());
        fused[&EventKind::Execute].invoke(&mut system, c, &mut ev);
        assert_eq!(*log.borrow(), vec!["b", "a"]);
    }

    #[test]
    fn unordered_duplicates_fail_to_build() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let err = combine_handlers(
            vec![
                ("a".to_owned(), EventKind::Click, recorder(&log, "a")),
                ("b".to_owned(), EventKind::Click, recorder(&log, "b")),
            ],
            &default_event_order(),
        )
        .unwrap_err();
        assert!(matches!(err, BuildError::MissingEventOrder { kind: EventKind::Click, .. }));

        let mut order = HashMap::new();
        order.insert(EventKind::Click, vec!["a".to_owned()]);
        let err = combine_handlers(
            vec![
                ("a".to_owned(), EventKind::Click, recorder(&log, "a")),
                ("b".to_owned(), EventKind::Click, recorder(&log, "b")),
            ],
            &order,
        )
        .unwrap_err();
        assert!(
            matches!(err, BuildError::IncompleteEventOrder { ref missing, .. } if missing == &["b".to_owned()])
        );
    }
}
