// Copyright 2025 the Alloy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! One module per keying mode. Each provides its config fields, a typed
//! config, its rule tables and, where it has one, a focus-in step.

pub(crate) mod execution;
pub(crate) mod flatgrid;
pub(crate) mod flow;
pub(crate) mod matrix;
pub(crate) mod menu;
pub(crate) mod special;
pub(crate) mod tabbing;

use std::rc::Rc;

use alloy_component::{ComponentId, SimulatedEvent, System};
use alloy_dom::{Direction, ElementId};
use alloy_schema::{FieldProcessor, Struct, handle_of};
use alloy_schema::field::option_of;

use crate::callbacks::{Executor, KeyHandler, execute_focused};
use crate::focus_manager::FocusManager;
use crate::keys::{KeyMatcher, SPACE};
use crate::navigation::Step;
use crate::rules::Rule;

/// Arrow-key heading, before text direction is applied.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Heading {
    West,
    East,
    Up,
    Down,
}

impl Heading {
    pub(crate) fn step(self, direction: Direction) -> Step {
        match self {
            Self::West => Step::west(direction),
            Self::East => Step::east(direction),
            Self::Up => Step::Backward,
            Self::Down => Step::Forward,
        }
    }

    pub(crate) fn is_horizontal(self) -> bool {
        matches!(self, Self::West | Self::East)
    }
}

pub(crate) fn key_handler_field(key: &str) -> FieldProcessor {
    option_of(key, handle_of::<KeyHandler>())
}

pub(crate) fn executor_field() -> FieldProcessor {
    option_of("execute", handle_of::<Executor>())
}

pub(crate) fn key_handler(config: &Struct, key: &str) -> Option<KeyHandler> {
    config.handle::<KeyHandler>(key).cloned()
}

pub(crate) fn executor(config: &Struct) -> Executor {
    config
        .handle::<Executor>("execute")
        .cloned()
        .unwrap_or_else(|| Executor::new(execute_focused))
}

/// Forward the key to an optional user handler.
pub(crate) fn delegate(
    handler: Option<KeyHandler>,
) -> impl Fn(&mut System, ComponentId, &SimulatedEvent) -> Option<bool> + 'static {
    move |system, component, event| handler.as_ref()?.call(system, component, event)
}

/// Run `execute` on the current item.
pub(crate) fn execute_current(
    execute: Executor,
    focus: Rc<dyn FocusManager>,
) -> impl Fn(&mut System, ComponentId, &SimulatedEvent) -> Option<bool> + 'static {
    move |system, component, event| {
        let current = focus.get(system, component)?;
        execute.call(system, component, event, current)
    }
}

/// Make `target` current, reporting the key as consumed.
pub(crate) fn move_to(
    focus: &dyn FocusManager,
    system: &mut System,
    component: ComponentId,
    target: ElementId,
) -> Option<bool> {
    focus.set(system, component, target);
    Some(true)
}

/// Swallow the space key-up that follows an activation.
pub(crate) fn space_keyup() -> Vec<Rule> {
    vec![Rule::new(KeyMatcher::in_set(&[SPACE]), |_, _, _| Some(true))]
}

/// The first descendant of the component matching `selector`, made current.
pub(crate) fn focus_first(
    focus: &dyn FocusManager,
    system: &mut System,
    component: ComponentId,
    selector: &str,
) {
    if let Some(first) = system.doc().descendant(component.element(), selector) {
        focus.set(system, component, first);
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use alloy_component::{ComponentId, ComponentSpec, EventKind, KeyEvent, Modifiers, RawEvent, System};
    use alloy_dom::ElementId;
    use alloy_schema::Value;

    use crate::keying::keying;

    /// A container with `n` `<span class="item">` children, configured with
    /// `config` and attached.
    pub(crate) fn container(system: &mut System, n: usize, config: Value) -> (ComponentId, Vec<ElementId>) {
        let c = system
            .build(ComponentSpec::new("div").with(&keying(), config))
            .unwrap();
        system.attach_to_body(c).unwrap();
        let items = (0..n)
            .map(|_| {
                let doc = system.doc_mut();
                let item = doc.create_element("span");
                doc.add_class(item, "item");
                doc.append_child(c.element(), item);
                item
            })
            .collect();
        (c, items)
    }

    pub(crate) fn press(system: &mut System, code: u32) -> bool {
        press_with(system, code, Modifiers::empty())
    }

    pub(crate) fn press_with(system: &mut System, code: u32, modifiers: Modifiers) -> bool {
        let Some(target) = system.doc().focused() else {
            return false;
        };
        system.trigger(
            EventKind::KeyDown,
            RawEvent::Key(KeyEvent::new(code).with(modifiers)),
            target,
        )
    }
}
