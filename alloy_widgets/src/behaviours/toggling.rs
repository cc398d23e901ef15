// Copyright 2025 the Alloy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `toggling`: an on/off state mirrored as a class and, optionally, an ARIA
//! attribute.

use std::rc::Rc;

use alloy_component::{Behaviour, ComponentId, System, handler};
use alloy_schema::field::{defaulted, defaulted_of, option_of, strict_of};
use alloy_schema::{Struct, Value, handle_of, one_of, string};

use crate::hooks::ToggleHook;

/// Behaviour name.
pub const TOGGLING: &str = "toggling";

/// Whether a toggling component is on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ToggleState {
    on: bool,
}

impl ToggleState {
    /// Returns true when on.
    pub fn is_on(self) -> bool {
        self.on
    }
}

fn aria_attr(config: &Struct) -> Option<&'static str> {
    match config.str("aria")? {
        "pressed" => Some("aria-pressed"),
        "checked" => Some("aria-checked"),
        "expanded" => Some("aria-expanded"),
        "selected" => Some("aria-selected"),
        _ => None,
    }
}

fn define() -> Rc<Behaviour> {
    Behaviour::define(TOGGLING)
        .fields(vec![
            strict_of("toggle_class", string()),
            defaulted("selected", Value::Bool(false)),
            defaulted("toggle_on_execute", Value::Bool(true)),
            defaulted_of(
                "aria",
                Value::from("none"),
                one_of(&["none", "pressed", "checked", "expanded", "selected"]),
            ),
            option_of("on_toggled", handle_of::<ToggleHook>()),
        ])
        .state(|config| ToggleState {
            on: config.bool_or("selected", false),
        })
        .events(|config| {
            let mut bindings = vec![handler::run_on_init(|system, me| {
                let on = is_on(system, me);
                apply(system, me, on);
            })];
            if config.bool_or("toggle_on_execute", true) {
                bindings.push(handler::run_on_execute(|system, me, _| toggle(system, me)));
            }
            bindings
        })
        .build()
}

thread_local! {
    static BEHAVIOUR: Rc<Behaviour> = define();
}

/// The toggling behaviour.
///
/// Config: `toggle_class`, `selected` (initial state), `toggle_on_execute`
/// (default true), `aria` (`none`, `pressed`, `checked`, `expanded` or
/// `selected`) and `on_toggled` ([`ToggleHook`]).
pub fn toggling() -> Rc<Behaviour> {
    BEHAVIOUR.with(Rc::clone)
}

fn apply(system: &mut System, component: ComponentId, on: bool) {
    let Some(config) = toggling().config(system, component) else {
        return;
    };
    let class = config.str("toggle_class").unwrap_or_default();
    let doc = system.doc_mut();
    if on {
        doc.add_class(component.element(), class);
    } else {
        doc.remove_class(component.element(), class);
    }
    if let Some(attr) = aria_attr(&config) {
        doc.set_attr(component.element(), attr, if on { "true" } else { "false" });
    }
}

/// Set the state, run `on_toggled` when it changes.
pub fn set(system: &mut System, component: ComponentId, on: bool) {
    let Some(state) = toggling().state_mut::<ToggleState>(system, component) else {
        return;
    };
    let changed = state.on != on;
    state.on = on;
    apply(system, component, on);
    if changed
        && let Some(hook) = toggling()
            .config(system, component)
            .and_then(|c| c.handle::<ToggleHook>("on_toggled").cloned())
    {
        hook.call(system, component, on);
    }
}

/// Flip the state.
pub fn toggle(system: &mut System, component: ComponentId) {
    let on = is_on(system, component);
    set(system, component, !on);
}

/// Switch on.
pub fn on(system: &mut System, component: ComponentId) {
    set(system, component, true);
}

/// Switch off.
pub fn off(system: &mut System, component: ComponentId) {
    set(system, component, false);
}

/// Returns true when on.
pub fn is_on(system: &System, component: ComponentId) -> bool {
    toggling()
        .state::<ToggleState>(system, component)
        .is_some_and(|s| s.is_on())
}
