// Copyright 2025 the Alloy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `transitioning`: named states with animated routes between them.
//!
//! The current state lives in `state_attr`. [`progress_to`] follows a route
//! with a `transition_class`: it adds the class, records the destination in
//! `destination_attr`, and waits for [`EventKind::TransitionEnd`] to land.
//! Routes without a class, and [`jump_to`], land immediately.

use std::rc::Rc;

use alloy_component::{Behaviour, ComponentId, EventHandler, EventKind, System, handler};
use alloy_schema::field::{defaulted_of, option, option_of, strict_of};
use alloy_schema::{Struct, Value, arr_of_obj, handle_of, string};

use crate::hooks::StateHook;

/// Behaviour name.
pub const TRANSITIONING: &str = "transitioning";

/// A move from one state to another.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Route {
    /// Starting state.
    pub from: String,
    /// Destination state.
    pub to: String,
}

struct Settings {
    state_attr: String,
    destination_attr: String,
    routes: Vec<(Route, Option<String>)>,
    on_transition: Option<StateHook>,
    on_finish: Option<StateHook>,
}

impl Settings {
    fn from_struct(config: &Struct) -> Self {
        let routes = config
            .array("routes")
            .unwrap_or_default()
            .iter()
            .filter_map(|r| {
                let route = Route {
                    from: r.get("from")?.as_str()?.to_owned(),
                    to: r.get("to")?.as_str()?.to_owned(),
                };
                let class = r
                    .get("transition_class")
                    .and_then(Value::as_str)
                    .map(str::to_owned);
                Some((route, class))
            })
            .collect();
        Self {
            state_attr: config.str("state_attr").unwrap_or_default().to_owned(),
            destination_attr: config.str("destination_attr").unwrap_or_default().to_owned(),
            routes,
            on_transition: config.handle::<StateHook>("on_transition").cloned(),
            on_finish: config.handle::<StateHook>("on_finish").cloned(),
        }
    }

    fn of(system: &System, component: ComponentId) -> Option<Self> {
        transitioning()
            .config(system, component)
            .map(|c| Self::from_struct(&c))
    }

    fn transition_class(&self, route: &Route) -> Option<&str> {
        self.routes
            .iter()
            .find(|(r, _)| r == route)
            .and_then(|(_, class)| class.as_deref())
    }

    fn current_route(&self, system: &System, component: ComponentId) -> Option<Route> {
        let doc = system.doc();
        Some(Route {
            from: doc.attr(component.element(), &self.state_attr)?.to_owned(),
            to: doc.attr(component.element(), &self.destination_attr)?.to_owned(),
        })
    }

    /// Drop any transition in flight without landing it.
    fn disable_transition(&self, system: &mut System, component: ComponentId) {
        if let Some(route) = self.current_route(system, component)
            && let Some(class) = self.transition_class(&route)
        {
            system.doc_mut().remove_class(component.element(), class);
        }
        system
            .doc_mut()
            .remove_attr(component.element(), &self.destination_attr);
    }

    fn jump(&self, system: &mut System, component: ComponentId, state: &str) {
        self.disable_transition(system, component);
        system
            .doc_mut()
            .set_attr(component.element(), &self.state_attr, state);
        if let Some(hook) = &self.on_finish {
            hook.call(system, component, state);
        }
    }
}

fn define() -> Rc<Behaviour> {
    Behaviour::define(TRANSITIONING)
        .fields(vec![
            defaulted_of(
                "state_attr",
                Value::from("data-transitioning-state"),
                string(),
            ),
            defaulted_of(
                "destination_attr",
                Value::from("data-transitioning-destination"),
                string(),
            ),
            option_of("initial_state", string()),
            strict_of(
                "routes",
                arr_of_obj(vec![
                    strict_of("from", string()),
                    strict_of("to", string()),
                    option("transition_class"),
                ]),
            ),
            option_of("on_transition", handle_of::<StateHook>()),
            option_of("on_finish", handle_of::<StateHook>()),
        ])
        .events(|config| {
            let mut bindings = vec![(
                EventKind::TransitionEnd,
                EventHandler::run_on_source(|system, me, _| {
                    finish(system, me);
                }),
            )];
            if let Some(initial) = config.str("initial_state") {
                let initial = initial.to_owned();
                bindings.push(handler::run_on_init(move |system, me| {
                    jump_to(system, me, &initial);
                }));
            }
            bindings
        })
        .build()
}

thread_local! {
    static BEHAVIOUR: Rc<Behaviour> = define();
}

/// The transitioning behaviour.
///
/// Config: `routes` (`[{from, to, transition_class?}]`), `initial_state`,
/// `state_attr`, `destination_attr`, and optional `on_transition` and
/// `on_finish` ([`StateHook`]s).
pub fn transitioning() -> Rc<Behaviour> {
    BEHAVIOUR.with(Rc::clone)
}

/// Routes between every pair of three states, all animated with
/// `transition_class`.
pub fn tristate(first: &str, second: &str, third: &str, transition_class: &str) -> Value {
    let states = [first, second, third];
    let routes = states
        .iter()
        .flat_map(|from| states.iter().map(move |to| (*from, *to)))
        .filter(|(from, to)| from != to)
        .map(|(from, to)| {
            Value::object([
                ("from", Value::from(from)),
                ("to", Value::from(to)),
                ("transition_class", Value::from(transition_class)),
            ])
        })
        .collect::<Vec<_>>();
    Value::Array(routes)
}

/// Land in `state` at once, dropping any transition in flight.
pub fn jump_to(system: &mut System, component: ComponentId, state: &str) {
    if let Some(settings) = Settings::of(system, component) {
        settings.jump(system, component, state);
    }
}

/// Move towards `destination`, animated when the route has a transition.
pub fn progress_to(system: &mut System, component: ComponentId, destination: &str) {
    let Some(settings) = Settings::of(system, component) else {
        return;
    };
    settings.disable_transition(system, component);
    let Some(from) = get_state(system, component) else {
        settings.jump(system, component, destination);
        return;
    };
    let route = Route {
        from,
        to: destination.to_owned(),
    };
    match settings.transition_class(&route) {
        Some(class) if route.from != route.to => {
            let doc = system.doc_mut();
            doc.add_class(component.element(), class);
            doc.set_attr(component.element(), &settings.destination_attr, destination);
        }
        _ => settings.jump(system, component, destination),
    }
}

/// Land the transition in flight, if any. Returns true if one landed.
pub fn finish(system: &mut System, component: ComponentId) -> bool {
    let Some(settings) = Settings::of(system, component) else {
        return false;
    };
    let Some(route) = settings.current_route(system, component) else {
        return false;
    };
    settings.jump(system, component, &route.to);
    if let Some(hook) = &settings.on_transition {
        hook.call(system, component, &route.to);
    }
    true
}

/// The current state.
pub fn get_state(system: &System, component: ComponentId) -> Option<String> {
    let settings = Settings::of(system, component)?;
    system
        .doc()
        .attr(component.element(), &settings.state_attr)
        .map(str::to_owned)
}

/// The route in flight.
pub fn get_current_route(system: &System, component: ComponentId) -> Option<Route> {
    Settings::of(system, component)?.current_route(system, component)
}

/// Returns true while a transition is in flight.
pub fn is_transitioning(system: &System, component: ComponentId) -> bool {
    get_current_route(system, component).is_some()
}
