// Copyright 2025 the Alloy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ordered key rule tables.

use std::fmt;
use std::rc::Rc;

use alloy_component::{ComponentId, KeyEvent, SimulatedEvent, System};

use crate::keys::KeyMatcher;

/// What a rule does. `Some(_)` consumes the key and stops the event; `None`
/// lets it through.
pub type KeyAction = Rc<dyn Fn(&mut System, ComponentId, &SimulatedEvent) -> Option<bool>>;

/// A matcher and the action it triggers.
#[derive(Clone)]
pub struct Rule {
    matcher: KeyMatcher,
    action: KeyAction,
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("matcher", &self.matcher)
            .finish_non_exhaustive()
    }
}

impl Rule {
    /// A rule running `action` on keys matching `matcher`.
    pub fn new(
        matcher: KeyMatcher,
        action: impl Fn(&mut System, ComponentId, &SimulatedEvent) -> Option<bool> + 'static,
    ) -> Self {
        Self {
            matcher,
            action: Rc::new(action),
        }
    }

    /// The matcher.
    pub fn matcher(&self) -> &KeyMatcher {
        &self.matcher
    }
}

/// The first rule matching `key`.
pub fn choose(rules: &[Rule], key: KeyEvent) -> Option<&Rule> {
    rules.iter().find(|r| r.matcher.matches(key))
}

/// Run the first rule matching the event's key; stop the event if the rule
/// consumed it.
pub(crate) fn handle(
    rules: &[Rule],
    system: &mut System,
    component: ComponentId,
    event: &mut SimulatedEvent,
) {
    let Some(key) = event.key() else {
        return;
    };
    let Some(rule) = choose(rules, key) else {
        return;
    };
    let consumed = (rule.action)(system, component, event);
    tracing::trace!(key = key.key_code, ?consumed, "key rule");
    if consumed.is_some() {
        event.stop();
    }
}
