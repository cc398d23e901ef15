// Copyright 2025 the Alloy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `execution`: activation keys run the component itself.

use std::rc::Rc;

use alloy_component::{ComponentId, SimulatedEvent, System};
use alloy_schema::field::defaulted;
use alloy_schema::{FieldProcessor, Struct, Value};

use super::{executor, executor_field, space_keyup};
use crate::callbacks::Executor;
use crate::keys::{DOWN, ENTER, KeyMatcher, SPACE};
use crate::rules::Rule;

pub(crate) fn fields() -> Vec<FieldProcessor> {
    vec![
        executor_field(),
        defaulted("use_space", Value::Bool(false)),
        defaulted("use_enter", Value::Bool(true)),
        defaulted("use_control_enter", Value::Bool(false)),
        defaulted("use_down", Value::Bool(false)),
    ]
}

/// Config of the `execution` mode.
#[derive(Clone, Debug)]
pub struct ExecutionConfig {
    /// Runs the component; called with the component's own element.
    pub execute: Executor,
    /// Space executes.
    pub use_space: bool,
    /// Enter executes.
    pub use_enter: bool,
    /// Ctrl+Enter executes.
    pub use_control_enter: bool,
    /// Down executes.
    pub use_down: bool,
}

impl ExecutionConfig {
    pub(crate) fn from_struct(config: &Struct) -> Self {
        Self {
            execute: executor(config),
            use_space: config.bool_or("use_space", false),
            use_enter: config.bool_or("use_enter", true),
            use_control_enter: config.bool_or("use_control_enter", false),
            use_down: config.bool_or("use_down", false),
        }
    }
}

fn execute(
    config: &ExecutionConfig,
) -> impl Fn(&mut System, ComponentId, &SimulatedEvent) -> Option<bool> + 'static {
    let execute = config.execute.clone();
    move |system, component, event| execute.call(system, component, event, component.element())
}

pub(crate) fn rules(config: &Rc<ExecutionConfig>) -> Vec<Rule> {
    let mut matchers = Vec::new();
    if config.use_control_enter {
        matchers.push(KeyMatcher::in_set(&[ENTER]).with_ctrl());
    }
    if config.use_enter {
        matchers.push(KeyMatcher::in_set(&[ENTER]));
    }
    if config.use_space {
        matchers.push(KeyMatcher::in_set(&[SPACE]));
    }
    if config.use_down {
        matchers.push(KeyMatcher::in_set(&[DOWN]));
    }
    matchers
        .into_iter()
        .map(|m| Rule::new(m, execute(config)))
        .collect()
}

pub(crate) fn keyup_rules(config: &ExecutionConfig) -> Vec<Rule> {
    if config.use_space {
        space_keyup()
    } else {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keying::keying;
    use crate::modes::testing::{press, press_with};
    use alloy_component::{ComponentSpec, Modifiers, handler};
    use std::cell::Cell;

    fn button(system: &mut System, config: Value, hits: &Rc<Cell<u32>>) -> ComponentId {
        let h = hits.clone();
        let c = system
            .build(
                ComponentSpec::new("button")
                    .with(&keying(), config)
                    .on(handler::run_on_execute(move |_, _, event| {
                        h.set(h.get() + 1);
                        event.stop();
                    })),
            )
            .unwrap();
        system.attach_to_body(c).unwrap();
        system.doc_mut().focus(c.element());
        c
    }

    #[test]
    fn enter_executes_by_default() {
        let hits = Rc::new(Cell::new(0));
        let mut system = System::default();
        button(&mut system, Value::object([("mode", Value::from("execution"))]), &hits);
        assert!(press(&mut system, ENTER));
        assert!(!press(&mut system, SPACE));
        assert!(!press(&mut system, DOWN));
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn optional_keys() {
        let hits = Rc::new(Cell::new(0));
        let mut system = System::default();
        let config = Value::object([
            ("mode", Value::from("execution")),
            ("use_enter", Value::Bool(false)),
            ("use_control_enter", Value::Bool(true)),
            ("use_space", Value::Bool(true)),
            ("use_down", Value::Bool(true)),
        ]);
        button(&mut system, config, &hits);
        assert!(!press(&mut system, ENTER));
        assert!(press_with(&mut system, ENTER, Modifiers::CTRL));
        assert!(press(&mut system, SPACE));
        assert!(press(&mut system, DOWN));
        assert_eq!(hits.get(), 3);
    }

    #[test]
    fn custom_executor_sees_the_component() {
        let mut system = System::default();
        let seen = Rc::new(Cell::new(None));
        let s = seen.clone();
        let config = Value::object([
            ("mode", Value::from("execution")),
            (
                "execute",
                Executor::value(move |_, _, _, element| {
                    s.set(Some(element));
                    Some(true)
                }),
            ),
        ]);
        let c = system
            .build(ComponentSpec::new("button").with(&keying(), config))
            .unwrap();
        system.attach_to_body(c).unwrap();
        system.doc_mut().focus(c.element());
        assert!(press(&mut system, ENTER));
        assert_eq!(seen.get(), Some(c.element()));
    }
}
