// Copyright 2025 the Alloy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bubbling dispatch, broadcast and deferred tasks.
//!
//! Dispatch starts at the target element and looks for the nearest element
//! (inclusive) whose component handles the event. After the handler runs:
//!
//! - `stop()` ends the dispatch and reports it handled,
//! - `cut()` ends it silently,
//! - otherwise dispatch resumes from the parent of the *handling* element.
//!
//! Finding no handler at all is not an error.

use alloy_dom::ElementId;
use alloy_schema::Value;

use crate::event::{EventKind, Message, RawEvent, SimulatedEvent};
use crate::monitor::{TraceOutcome, Tracer};
use crate::registry::Registered;
use crate::system::{ComponentId, System};
use crate::uid::UID_ATTR;

/// How a dispatch ended.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DispatchOutcome {
    /// A handler stopped the event.
    Stopped,
    /// A handler cut the event.
    Cut,
    /// The event ran out of handlers or parents.
    Complete,
}

impl DispatchOutcome {
    /// Only a stopped event counts as handled.
    pub fn is_handled(self) -> bool {
        self == Self::Stopped
    }
}

impl System {
    /// Dispatch `kind` at `target`. Returns true if a handler stopped it.
    pub fn trigger(&mut self, kind: EventKind, raw: RawEvent, target: ElementId) -> bool {
        self.route(SimulatedEvent::new(self.resolve_kind(kind), raw, target))
            .is_handled()
    }

    /// Dispatch an event, reporting how it ended.
    pub fn route(&mut self, mut event: SimulatedEvent) -> DispatchOutcome {
        let kind = event.kind();
        let mut tracer = Tracer::new(kind, event.target(), self.monitor.is_some());
        let mut from = Some(event.target());
        let outcome = loop {
            let Some((element, found)) = from.and_then(|el| self.find_handler(kind, el)) else {
                tracer.step(from.unwrap_or(event.target()), TraceOutcome::NoHandlers);
                break DispatchOutcome::Complete;
            };
            found.handler.invoke(self, found.component, &mut event);
            if event.is_stopped() {
                tracer.step(element, TraceOutcome::Stopped);
                break DispatchOutcome::Stopped;
            }
            if event.is_cut() {
                tracer.step(element, TraceOutcome::Cut);
                break DispatchOutcome::Cut;
            }
            match self.doc.parent_of(element) {
                Some(parent) => {
                    tracer.step(element, TraceOutcome::Response);
                    from = Some(parent);
                }
                None => {
                    tracer.step(element, TraceOutcome::NoParent);
                    break DispatchOutcome::Complete;
                }
            }
        };
        if let (Some(trace), Some(monitor)) = (tracer.finish(), self.monitor.as_mut()) {
            monitor.record(trace);
        }
        outcome
    }

    fn find_handler(&self, kind: EventKind, start: ElementId) -> Option<(ElementId, Registered)> {
        let mut cur = Some(start);
        while let Some(el) = cur {
            if !self.doc.is_alive(el) {
                return None;
            }
            if let Some(found) = self
                .doc
                .attr(el, UID_ATTR)
                .and_then(|uid| self.registry.find(kind, uid))
            {
                return Some((el, found.clone()));
            }
            cur = self.doc.parent_of(el);
        }
        None
    }

    /// Dispatch `kind` at the component's own element.
    pub fn emit(&mut self, component: ComponentId, kind: EventKind) -> bool {
        self.trigger(kind, RawEvent::None, component.element())
    }

    /// Dispatch `kind` with a payload at the component's own element.
    pub fn emit_with(&mut self, component: ComponentId, kind: EventKind, raw: RawEvent) -> bool {
        self.trigger(kind, raw, component.element())
    }

    /// Dispatch [`EventKind::Execute`] at the component.
    pub fn emit_execute(&mut self, component: ComponentId) -> bool {
        self.emit(component, EventKind::Execute)
    }

    /// Dispatch `kind` at `target` on behalf of `component`.
    pub fn dispatch(&mut self, component: ComponentId, target: ElementId, kind: EventKind) -> bool {
        self.dispatch_with(component, target, kind, RawEvent::None)
    }

    /// Dispatch `kind` with a payload at `target` on behalf of `component`.
    ///
    /// The event's source is the component's element.
    pub fn dispatch_with(
        &mut self,
        component: ComponentId,
        target: ElementId,
        kind: EventKind,
        raw: RawEvent,
    ) -> bool {
        let mut event = SimulatedEvent::new(self.resolve_kind(kind), raw, target);
        event.set_source(component.element());
        self.route(event).is_handled()
    }

    /// Ask `target` to take focus.
    ///
    /// Components receive [`EventKind::Focus`]; if no handler stops it the
    /// element is focused natively. Plain elements are focused directly.
    pub fn trigger_focus(&mut self, target: ElementId, originator: Option<ElementId>) {
        if self.get_by_dom(target).is_none()
            || !self.trigger(EventKind::Focus, RawEvent::Focus { originator }, target)
        {
            self.doc.focus(target);
        }
    }

    /// Ask a component to take focus.
    pub fn dispatch_focus(&mut self, component: ComponentId) {
        self.trigger_focus(component.element(), None);
    }

    /// Deliver `data` to every receiver on every channel.
    pub fn broadcast(&mut self, data: Value) {
        self.deliver(Message {
            universal: true,
            channels: Vec::new(),
            data,
        });
    }

    /// Deliver `data` to receivers subscribed to any of `channels`.
    pub fn broadcast_on(&mut self, channels: &[&str], data: Value) {
        self.deliver(Message {
            universal: false,
            channels: channels.iter().map(|c| (*c).to_owned()).collect(),
            data,
        });
    }

    fn deliver(&mut self, message: Message) {
        let receivers = self.registry.filter(EventKind::Receive);
        tracing::trace!(receivers = receivers.len(), channels = ?message.channels, "broadcast");
        for r in receivers {
            let mut event = SimulatedEvent::new(
                EventKind::Receive,
                RawEvent::Message(message.clone()),
                r.component.element(),
            );
            r.handler.invoke(self, r.component, &mut event);
        }
    }

    /// Queue a task to run after the current dispatch settles.
    pub fn defer(&mut self, task: impl FnOnce(&mut Self) + 'static) {
        self.deferred.push_back(Box::new(task));
    }

    /// Run queued tasks, including ones queued while running. Returns how
    /// many ran.
    pub fn run_deferred(&mut self) -> usize {
        let mut ran = 0;
        while let Some(task) = self.deferred.pop_front() {
            task(self);
            ran += 1;
        }
        ran
    }

    /// A native focus-in on `element`.
    pub fn native_focus_in(&mut self, element: ElementId) {
        self.doc.focus(element);
        self.trigger(EventKind::FocusIn, RawEvent::Focus { originator: None }, element);
    }

    /// A native focus-out on `element`. [`EventKind::PostBlur`] follows as a
    /// deferred task, once the next focus target is known.
    pub fn native_focus_out(&mut self, element: ElementId) {
        self.doc.blur(element);
        self.trigger(EventKind::FocusOut, RawEvent::Focus { originator: None }, element);
        self.defer(move |system| {
            let originator = system.doc.focused();
            system.trigger(EventKind::PostBlur, RawEvent::Focus { originator }, element);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::{EventHandler, cutter, redirect_to_uid, run, stopper};
    use crate::spec::ComponentSpec;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<&'static str>>>;

    fn noting(log: &Log, tag: &'static str) -> EventHandler {
        let log = log.clone();
        EventHandler::run(move |_, _, _| log.borrow_mut().push(tag))
    }

    /// `outer > inner`, both attached.
    fn pair(system: &mut System, outer: ComponentSpec, inner: ComponentSpec) -> (ComponentId, ComponentId) {
        let outer = system.build(outer.child(inner)).unwrap();
        system.attach_to_body(outer).unwrap();
        let inner = system.children(outer)[0];
        (outer, inner)
    }

    #[test]
    fn stop_is_handled_and_cut_is_not() {
        let log: Log = Rc::default();
        let mut system = System::default();
        let (_, stopping) = pair(
            &mut system,
            ComponentSpec::new("div").on_kind(EventKind::Click, noting(&log, "outer")),
            ComponentSpec::new("div").on(stopper(EventKind::Click)),
        );
        assert!(system.trigger(EventKind::Click, RawEvent::None, stopping.element()));
        assert!(log.borrow().is_empty());

        let (_, cutting) = pair(
            &mut system,
            ComponentSpec::new("div").on_kind(EventKind::Click, noting(&log, "outer")),
            ComponentSpec::new("div").on(cutter(EventKind::Click)),
        );
        assert!(!system.trigger(EventKind::Click, RawEvent::None, cutting.element()));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn unhandled_responses_bubble_from_the_handler() {
        let log: Log = Rc::default();
        let mut system = System::default();
        let (_, inner) = pair(
            &mut system,
            ComponentSpec::new("div").on_kind(EventKind::Click, noting(&log, "outer")),
            ComponentSpec::new("div").on_kind(EventKind::Click, noting(&log, "inner")),
        );
        let leaf = system.doc_mut().create_element("span");
        system.doc_mut().append_child(inner.element(), leaf);
        assert!(!system.trigger(EventKind::Click, RawEvent::None, leaf));
        assert_eq!(*log.borrow(), vec!["inner", "outer"]);
    }

    #[test]
    fn monitor_records_outcomes() {
        let mut system = System::default();
        system.enable_monitor(8);
        let (_, inner) = pair(
            &mut system,
            ComponentSpec::new("div").on(stopper(EventKind::Click)),
            ComponentSpec::new("div").on(run(EventKind::Click, |_, _, _| {})),
        );
        system.trigger(EventKind::Click, RawEvent::None, inner.element());
        let trace = system.monitor().unwrap().last().unwrap();
        assert_eq!(trace.outcomes(), vec![TraceOutcome::Response, TraceOutcome::Stopped]);

        system.trigger(EventKind::KeyUp, RawEvent::None, inner.element());
        let trace = system.monitor().unwrap().last().unwrap();
        assert_eq!(trace.outcomes(), vec![TraceOutcome::NoHandlers]);
    }

    #[test]
    fn broadcast_reaches_every_receiver() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut system = System::default();
        for name in ["a", "b"] {
            let seen = seen.clone();
            let c = system
                .build(ComponentSpec::new("div").on(run(EventKind::Receive, move |_, _, event| {
                    let m = event.message().unwrap();
                    seen.borrow_mut().push((name, m.universal, m.channels.clone()));
                })))
                .unwrap();
            system.attach_to_body(c).unwrap();
        }
        system.broadcast(Value::from(1));
        system.broadcast_on(&["dismiss"], Value::Null);
        assert_eq!(
            *seen.borrow(),
            vec![
                ("a", true, vec![]),
                ("b", true, vec![]),
                ("a", false, vec![String::from("dismiss")]),
                ("b", false, vec![String::from("dismiss")]),
            ]
        );
    }

    #[test]
    fn redirect_dispatches_at_the_named_component() {
        let log: Log = Rc::default();
        let mut system = System::default();
        let target = system
            .build(
                ComponentSpec::new("div")
                    .uid("target")
                    .on_kind(EventKind::Execute, noting(&log, "target")),
            )
            .unwrap();
        system.attach_to_body(target).unwrap();
        let source = system
            .build(ComponentSpec::new("div").on(redirect_to_uid(EventKind::Execute, "target".into())))
            .unwrap();
        system.attach_to_body(source).unwrap();
        system.emit_execute(source);
        assert_eq!(*log.borrow(), vec!["target"]);
    }

    #[test]
    fn post_blur_is_deferred() {
        let log: Log = Rc::default();
        let mut system = System::default();
        let c = system
            .build(
                ComponentSpec::new("input")
                    .on_kind(EventKind::FocusOut, noting(&log, "focusout"))
                    .on_kind(EventKind::PostBlur, noting(&log, "postblur")),
            )
            .unwrap();
        system.attach_to_body(c).unwrap();
        system.native_focus_in(c.element());
        assert_eq!(system.doc().focused(), Some(c.element()));
        system.native_focus_out(c.element());
        assert_eq!(*log.borrow(), vec!["focusout"]);
        assert_eq!(system.run_deferred(), 1);
        assert_eq!(*log.borrow(), vec!["focusout", "postblur"]);
    }

    #[test]
    fn focus_on_plain_elements_is_native() {
        let mut system = System::default();
        let el = system.doc_mut().create_element("input");
        let body = system.doc().body();
        system.doc_mut().append_child(body, el);
        system.trigger_focus(el, None);
        assert_eq!(system.doc().focused(), Some(el));
    }

    #[test]
    fn unhandled_component_focus_falls_back_to_native() {
        let mut system = System::default();
        let c = system.build(ComponentSpec::new("button")).unwrap();
        system.attach_to_body(c).unwrap();
        system.dispatch_focus(c);
        assert_eq!(system.doc().focused(), Some(c.element()));

        let claimed = system
            .build(ComponentSpec::new("div").on(stopper(EventKind::Focus)))
            .unwrap();
        system.attach_to_body(claimed).unwrap();
        system.dispatch_focus(claimed);
        assert_eq!(system.doc().focused(), Some(c.element()));
    }
}
