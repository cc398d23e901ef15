// Copyright 2025 the Alloy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dispatch diagnostics.

use std::collections::VecDeque;

use alloy_dom::ElementId;

use crate::event::EventKind;

/// What happened at one step of a dispatch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TraceOutcome {
    /// A handler cut the event.
    Cut,
    /// A handler stopped the event.
    Stopped,
    /// No element up the chain handles the event.
    NoHandlers,
    /// A handler ran without ending propagation; dispatch climbs on.
    Response,
    /// The handling element has no parent to climb to.
    NoParent,
}

/// One step of a dispatch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TraceStep {
    /// The element the step concerns.
    pub element: ElementId,
    /// Its outcome.
    pub outcome: TraceOutcome,
}

/// The full record of one dispatch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DispatchTrace {
    /// The event.
    pub kind: EventKind,
    /// Where it was dispatched.
    pub target: ElementId,
    /// Every step, in order.
    pub steps: Vec<TraceStep>,
}

impl DispatchTrace {
    /// The outcomes only.
    pub fn outcomes(&self) -> Vec<TraceOutcome> {
        self.steps.iter().map(|s| s.outcome).collect()
    }
}

/// Bounded ring of the most recent dispatch traces.
#[derive(Clone, Debug)]
pub struct EventMonitor {
    capacity: usize,
    traces: VecDeque<DispatchTrace>,
}

impl EventMonitor {
    /// A monitor keeping at most `capacity` traces.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            traces: VecDeque::new(),
        }
    }

    pub(crate) fn record(&mut self, trace: DispatchTrace) {
        if self.traces.len() == self.capacity {
            self.traces.pop_front();
        }
        self.traces.push_back(trace);
    }

    /// The recorded traces, oldest first.
    pub fn traces(&self) -> impl Iterator<Item = &DispatchTrace> {
        self.traces.iter()
    }

    /// The most recent trace.
    pub fn last(&self) -> Option<&DispatchTrace> {
        self.traces.back()
    }

    /// Drop every trace.
    pub fn clear(&mut self) {
        self.traces.clear();
    }
}

/// Collects the steps of one dispatch and mirrors them to `tracing`.
#[derive(Debug)]
pub(crate) struct Tracer {
    kind: EventKind,
    target: ElementId,
    steps: Option<Vec<TraceStep>>,
}

impl Tracer {
    pub(crate) fn new(kind: EventKind, target: ElementId, recording: bool) -> Self {
        Self {
            kind,
            target,
            steps: recording.then(Vec::new),
        }
    }

    pub(crate) fn step(&mut self, element: ElementId, outcome: TraceOutcome) {
        tracing::trace!(event = self.kind.name(), ?element, ?outcome, "dispatch step");
        if let Some(steps) = &mut self.steps {
            steps.push(TraceStep { element, outcome });
        }
    }

    pub(crate) fn finish(self) -> Option<DispatchTrace> {
        self.steps.map(|steps| DispatchTrace {
            kind: self.kind,
            target: self.target,
            steps,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_dom::Document;

    #[test]
    fn ring_drops_oldest() {
        let mut doc = Document::new();
        let el = doc.create_element("div");
        let mut monitor = EventMonitor::new(2);
        for kind in [EventKind::Click, EventKind::KeyDown, EventKind::Execute] {
            let mut t = Tracer::new(kind, el, true);
            t.step(el, TraceOutcome::NoHandlers);
            monitor.record(t.finish().unwrap());
        }
        let kinds: Vec<_> = monitor.traces().map(|t| t.kind).collect();
        assert_eq!(kinds, vec![EventKind::KeyDown, EventKind::Execute]);
        assert_eq!(monitor.last().unwrap().outcomes(), vec![TraceOutcome::NoHandlers]);
    }

    #[test]
    fn tracer_without_recording_yields_nothing() {
        let mut doc = Document::new();
        let el = doc.create_element("div");
        let mut t = Tracer::new(EventKind::Click, el, false);
        t.step(el, TraceOutcome::Response);
        assert!(t.finish().is_none());
    }
}
