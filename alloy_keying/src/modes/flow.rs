// Copyright 2025 the Alloy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `flow`: arrow keys cycle through a one-dimensional run of items, such as
//! a toolbar.

use std::rc::Rc;

use alloy_component::{ComponentId, SimulatedEvent, System};
use alloy_schema::field::{defaulted, option_of, strict};
use alloy_schema::{FieldProcessor, Struct, Value, handle_of};

use super::{
    Heading, delegate, execute_current, executor, executor_field, focus_first, key_handler,
    key_handler_field, move_to, space_keyup,
};
use crate::callbacks::{ElementFinder, Executor, KeyHandler};
use crate::focus_manager::FocusManager;
use crate::keys::{DOWN, ENTER, ESCAPE, KeyMatcher, LEFT, RIGHT, SPACE, UP};
use crate::navigation::{WrapMode, locate_visible, next_index};
use crate::rules::Rule;

pub(crate) fn fields() -> Vec<FieldProcessor> {
    vec![
        strict("selector"),
        executor_field(),
        defaulted("execute_on_move", Value::Bool(false)),
        defaulted("allow_vertical", Value::Bool(true)),
        key_handler_field("on_escape"),
        option_of("get_initial", handle_of::<ElementFinder>()),
    ]
}

/// Config of the `flow` mode.
#[derive(Clone, Debug)]
pub struct FlowConfig {
    /// Selects the items.
    pub selector: String,
    /// Runs the current item on Enter and Space.
    pub execute: Executor,
    /// Also execute every item moved to.
    pub execute_on_move: bool,
    /// Up and Down move as well as Left and Right.
    pub allow_vertical: bool,
    /// Escape.
    pub on_escape: Option<KeyHandler>,
    /// The item to focus on focus-in; defaults to the first.
    pub get_initial: Option<ElementFinder>,
}

impl FlowConfig {
    pub(crate) fn from_struct(config: &Struct) -> Self {
        Self {
            selector: config.str("selector").unwrap_or_default().to_owned(),
            execute: executor(config),
            execute_on_move: config.bool_or("execute_on_move", false),
            allow_vertical: config.bool_or("allow_vertical", true),
            on_escape: key_handler(config, "on_escape"),
            get_initial: config.handle::<ElementFinder>("get_initial").cloned(),
        }
    }
}

pub(crate) fn focus_in(
    config: &FlowConfig,
    focus: &dyn FocusManager,
    system: &mut System,
    component: ComponentId,
) {
    match config.get_initial.as_ref().and_then(|f| f.call(system, component)) {
        Some(initial) => focus.set(system, component, initial),
        None => focus_first(focus, system, component, &config.selector),
    }
}

fn go(
    config: Rc<FlowConfig>,
    focus: Rc<dyn FocusManager>,
    heading: Heading,
) -> impl Fn(&mut System, ComponentId, &SimulatedEvent) -> Option<bool> + 'static {
    move |system, component, event| {
        let focused = focus.get(system, component)?;
        let doc = system.doc();
        let step = heading.step(doc.direction(focused));
        let found = locate_visible(doc, component.element(), &config.selector, focused)?;
        let next = next_index(found.candidates.len(), found.index, WrapMode::Cycle, step)?;
        let target = found.candidates[next];
        move_to(&*focus, system, component, target)?;
        if config.execute_on_move {
            config.execute.call(system, component, event, target);
        }
        Some(true)
    }
}

pub(crate) fn rules(config: &Rc<FlowConfig>, focus: &Rc<dyn FocusManager>) -> Vec<Rule> {
    let mut rules = vec![
        Rule::new(
            KeyMatcher::in_set(&[LEFT]),
            go(config.clone(), focus.clone(), Heading::West),
        ),
        Rule::new(
            KeyMatcher::in_set(&[RIGHT]),
            go(config.clone(), focus.clone(), Heading::East),
        ),
    ];
    if config.allow_vertical {
        rules.push(Rule::new(
            KeyMatcher::in_set(&[UP]),
            go(config.clone(), focus.clone(), Heading::Up),
        ));
        rules.push(Rule::new(
            KeyMatcher::in_set(&[DOWN]),
            go(config.clone(), focus.clone(), Heading::Down),
        ));
    }
    rules.push(Rule::new(
        KeyMatcher::in_set(&[ENTER, SPACE]),
        execute_current(config.execute.clone(), focus.clone()),
    ));
    rules.push(Rule::new(
        KeyMatcher::in_set(&[ESCAPE]),
        delegate(config.on_escape.clone()),
    ));
    rules
}

pub(crate) fn keyup_rules() -> Vec<Rule> {
    space_keyup()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modes::testing::{container, press};
    use alloy_component::{ComponentSpec, EventKind, handler};
    use std::cell::RefCell;

    fn flow() -> Value {
        Value::object([("mode", Value::from("flow")), ("selector", Value::from(".item"))])
    }

    #[test]
    fn arrows_cycle_and_mirror_in_rtl() {
        let mut system = System::default();
        let (c, items) = container(&mut system, 3, flow());
        crate::focus_in(&mut system, c);
        assert_eq!(system.doc().focused(), Some(items[0]));
        assert!(press(&mut system, LEFT));
        assert_eq!(system.doc().focused(), Some(items[2]));
        assert!(press(&mut system, DOWN));
        assert_eq!(system.doc().focused(), Some(items[0]));

        system.doc_mut().set_style(c.element(), "direction", "rtl");
        assert!(press(&mut system, LEFT));
        assert_eq!(system.doc().focused(), Some(items[1]));
        assert!(press(&mut system, RIGHT));
        assert_eq!(system.doc().focused(), Some(items[0]));
    }

    #[test]
    fn vertical_can_be_disabled() {
        let mut system = System::default();
        let config = Value::object([
            ("mode", Value::from("flow")),
            ("selector", Value::from(".item")),
            ("allow_vertical", Value::Bool(false)),
        ]);
        let (c, items) = container(&mut system, 2, config);
        crate::focus_in(&mut system, c);
        assert!(!press(&mut system, DOWN));
        assert_eq!(system.doc().focused(), Some(items[0]));
    }

    #[test]
    fn enter_executes_the_focused_item() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let l = log.clone();
        let mut system = System::default();
        let (c, _) = container(&mut system, 0, flow());
        let item = system
            .build(
                ComponentSpec::new("button")
                    .class("item")
                    .on(handler::run(EventKind::Execute, move |_, me, event| {
                        l.borrow_mut().push(me);
                        event.stop();
                    })),
            )
            .unwrap();
        system.attach(c, item).unwrap();
        crate::focus_in(&mut system, c);
        assert_eq!(system.doc().focused(), Some(item.element()));
        assert!(press(&mut system, ENTER));
        assert_eq!(*log.borrow(), vec![item]);
    }
}
