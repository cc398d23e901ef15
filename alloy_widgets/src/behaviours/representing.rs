// Copyright 2025 the Alloy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `representing`: the component stands for a value.
//!
//! The `store` picks where the value lives: `memory` keeps it in the
//! component state, `manual` goes through a getter and a setter.

use std::rc::Rc;

use alloy_component::{Behaviour, Binding, ComponentId, System, handler};
use alloy_schema::field::{defaulted, option, option_of, strict_of};
use alloy_schema::{FieldProcessor, Struct, Value, handle_of};

use crate::hooks::{ValueGetter, ValueSetter};

/// Behaviour name.
pub const REPRESENTING: &str = "representing";

/// The value of a `memory` store.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MemoryState {
    value: Value,
}

impl MemoryState {
    fn from_config(config: &Struct) -> Self {
        Self {
            value: initial(config),
        }
    }

    /// The stored value.
    pub fn value(&self) -> &Value {
        &self.value
    }
}

fn initial(config: &Struct) -> Value {
    config.get("initial_value").cloned().unwrap_or_default()
}

fn common(mut fields: Vec<FieldProcessor>) -> Vec<FieldProcessor> {
    fields.push(option("initial_value"));
    fields.push(defaulted("reset_on_dom", Value::Bool(false)));
    fields.push(option_of("on_set_value", handle_of::<ValueSetter>()));
    fields
}

fn events(config: &Struct) -> Vec<Binding> {
    let mut bindings = Vec::new();
    let manual = config.str("store") == Some("manual");
    if manual && config.has("initial_value") {
        bindings.push(handler::run_on_init(|system, me| reset(system, me)));
    }
    if config.bool_or("reset_on_dom", false) {
        bindings.push(handler::run_on_detached(|system, me| reset(system, me)));
    }
    bindings
}

fn define() -> Rc<Behaviour> {
    Behaviour::modal(REPRESENTING, "store")
        .branch("memory", common(Vec::new()))
        .branch(
            "manual",
            common(vec![
                strict_of("get_value", handle_of::<ValueGetter>()),
                strict_of("set_value", handle_of::<ValueSetter>()),
            ]),
        )
        .state(MemoryState::from_config)
        .events(events)
        .build()
}

thread_local! {
    static BEHAVIOUR: Rc<Behaviour> = define();
}

/// The representing behaviour.
///
/// Config: `{ "store": "memory" | "manual", "initial_value"?, "reset_on_dom"?,
/// "on_set_value"? }`; `manual` also takes `get_value` and `set_value`.
pub fn representing() -> Rc<Behaviour> {
    BEHAVIOUR.with(Rc::clone)
}

/// A `memory` store config starting at `initial`.
pub fn memory(initial: impl Into<Value>) -> Value {
    Value::object([
        ("store", Value::from("memory")),
        ("initial_value", initial.into()),
    ])
}

fn reset(system: &mut System, component: ComponentId) {
    let Some(config) = representing().config(system, component) else {
        return;
    };
    set_value(system, component, initial(&config));
}

/// The component's value.
pub fn get_value(system: &System, component: ComponentId) -> Option<Value> {
    let config = representing().config(system, component)?;
    match config.str("store") {
        Some("manual") => config
            .handle::<ValueGetter>("get_value")
            .map(|get| get.call(system, component)),
        _ => representing()
            .state::<MemoryState>(system, component)
            .map(|s| s.value.clone()),
    }
}

/// Store a new value and run `on_set_value`.
pub fn set_value(system: &mut System, component: ComponentId, value: Value) {
    let Some(config) = representing().config(system, component) else {
        return;
    };
    match config.str("store") {
        Some("manual") => {
            if let Some(set) = config.handle::<ValueSetter>("set_value") {
                set.call(system, component, &value);
            }
        }
        _ => {
            if let Some(state) = representing().state_mut::<MemoryState>(system, component) {
                state.value = value.clone();
            }
        }
    }
    if let Some(hook) = config.handle::<ValueSetter>("on_set_value") {
        hook.call(system, component, &value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_component::ComponentSpec;
    use std::cell::RefCell;

    #[test]
    fn memory_store_holds_the_value() {
        let mut system = System::default();
        let c = system
            .build(ComponentSpec::new("input").with(&representing(), memory(3)))
            .unwrap();
        assert_eq!(get_value(&system, c), Some(Value::from(3)));
        set_value(&mut system, c, Value::from("x"));
        assert_eq!(get_value(&system, c), Some(Value::from("x")));
    }

    #[test]
    fn manual_store_goes_through_the_element() {
        let mut system = System::default();
        let config = Value::object([
            ("store", Value::from("manual")),
            ("initial_value", Value::from("hello")),
            (
                "get_value",
                ValueGetter::value(|system, me| {
                    Value::from(system.doc().value(me.element()).unwrap_or_default())
                }),
            ),
            (
                "set_value",
                ValueSetter::value(|system, me, value| {
                    let text = value.as_str().unwrap_or_default().to_owned();
                    system.doc_mut().set_value(me.element(), &text);
                }),
            ),
        ]);
        let c = system
            .build(ComponentSpec::new("input").with(&representing(), config))
            .unwrap();
        system.attach_to_body(c).unwrap();
        assert_eq!(system.doc().value(c.element()), Some("hello"));

        system.doc_mut().set_value(c.element(), "typed");
        assert_eq!(get_value(&system, c), Some(Value::from("typed")));
    }

    #[test]
    fn reset_on_dom_and_on_set_value() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = seen.clone();
        let config = Value::object([
            ("store", Value::from("memory")),
            ("initial_value", Value::from(0)),
            ("reset_on_dom", Value::Bool(true)),
            (
                "on_set_value",
                ValueSetter::value(move |_, _, v| s.borrow_mut().push(v.clone())),
            ),
        ]);
        let mut system = System::default();
        let c = system
            .build(ComponentSpec::new("div").with(&representing(), config))
            .unwrap();
        system.attach_to_body(c).unwrap();
        set_value(&mut system, c, Value::from(5));
        system.detach(c);
        assert_eq!(get_value(&system, c), Some(Value::from(0)));
        assert_eq!(*seen.borrow(), vec![Value::from(5), Value::from(0)]);
    }

    #[test]
    fn manual_store_needs_accessors() {
        let mut system = System::default();
        let config = Value::object([("store", Value::from("manual"))]);
        assert!(system
            .build(ComponentSpec::new("div").with(&representing(), config))
            .is_err());
    }
}
