// Copyright 2025 the Alloy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `focusing`: the component can hold document focus.

use std::rc::Rc;

use alloy_component::{Behaviour, ComponentId, EventHandler, EventKind, System, handler};
use alloy_dom::DomModification;
use alloy_schema::field::{defaulted, option_of};
use alloy_schema::{Value, handle_of};

use crate::hooks::ComponentHook;

/// Behaviour name.
pub const FOCUSING: &str = "focusing";

fn define() -> Rc<Behaviour> {
    Behaviour::define(FOCUSING)
        .fields(vec![
            option_of("on_focus", handle_of::<ComponentHook>()),
            defaulted("stop_mousedown", Value::Bool(false)),
            defaulted("ignore", Value::Bool(false)),
        ])
        .exhibit(|config| {
            if config.bool_or("ignore", false) {
                DomModification::default()
            } else {
                DomModification::default().with_attr("tabindex", "-1")
            }
        })
        .events(|config| {
            let mut bindings = vec![(
                EventKind::Focus,
                EventHandler::run_on_source(|system, me, event| {
                    focus(system, me);
                    event.stop();
                }),
            )];
            if config.bool_or("stop_mousedown", false) {
                bindings.push(handler::stopper(EventKind::MouseDown));
            }
            bindings
        })
        .build()
}

thread_local! {
    static BEHAVIOUR: Rc<Behaviour> = define();
}

/// The focusing behaviour.
///
/// Config: `on_focus` ([`ComponentHook`]), `stop_mousedown` (default false)
/// and `ignore` (default false: the element gets `tabindex="-1"`).
pub fn focusing() -> Rc<Behaviour> {
    BEHAVIOUR.with(Rc::clone)
}

/// Focus the component's element and run `on_focus`.
///
/// An ignoring component is left alone.
pub fn focus(system: &mut System, component: ComponentId) {
    let Some(config) = focusing().config(system, component) else {
        return;
    };
    if config.bool_or("ignore", false) {
        return;
    }
    system.doc_mut().focus(component.element());
    if let Some(hook) = config.handle::<ComponentHook>("on_focus") {
        hook.call(system, component);
    }
}

/// Returns true if the component's element holds document focus.
pub fn is_focused(system: &System, component: ComponentId) -> bool {
    system.doc().focused() == Some(component.element())
}
