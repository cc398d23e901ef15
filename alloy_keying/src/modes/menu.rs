// Copyright 2025 the Alloy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `menu`: Up and Down cycle through menu items.

use std::rc::Rc;

use alloy_component::{ComponentId, SimulatedEvent, System};
use alloy_schema::field::{defaulted, strict};
use alloy_schema::{FieldProcessor, Struct, Value};

use super::{execute_current, executor, executor_field, focus_first, move_to, space_keyup};
use crate::callbacks::Executor;
use crate::focus_manager::FocusManager;
use crate::keys::{DOWN, ENTER, KeyMatcher, SPACE, TAB, UP};
use crate::navigation::{Step, WrapMode, locate_visible, next_index};
use crate::rules::Rule;

pub(crate) fn fields() -> Vec<FieldProcessor> {
    vec![
        strict("selector"),
        executor_field(),
        defaulted("move_on_tab", Value::Bool(false)),
    ]
}

/// Config of the `menu` mode.
#[derive(Clone, Debug)]
pub struct MenuConfig {
    /// Selects the items.
    pub selector: String,
    /// Runs the current item on Enter and Space.
    pub execute: Executor,
    /// Tab and Shift+Tab move like Down and Up.
    pub move_on_tab: bool,
}

impl MenuConfig {
    pub(crate) fn from_struct(config: &Struct) -> Self {
        Self {
            selector: config.str("selector").unwrap_or_default().to_owned(),
            execute: executor(config),
            move_on_tab: config.bool_or("move_on_tab", false),
        }
    }
}

pub(crate) fn focus_in(
    config: &MenuConfig,
    focus: &dyn FocusManager,
    system: &mut System,
    component: ComponentId,
) {
    focus_first(focus, system, component, &config.selector);
}

fn go(
    config: Rc<MenuConfig>,
    focus: Rc<dyn FocusManager>,
    step: Step,
) -> impl Fn(&mut System, ComponentId, &SimulatedEvent) -> Option<bool> + 'static {
    move |system, component, _| {
        let current = focus.get(system, component)?;
        let found = locate_visible(system.doc(), component.element(), &config.selector, current)?;
        let next = next_index(found.candidates.len(), found.index, WrapMode::Cycle, step)?;
        move_to(&*focus, system, component, found.candidates[next])
    }
}

pub(crate) fn rules(config: &Rc<MenuConfig>, focus: &Rc<dyn FocusManager>) -> Vec<Rule> {
    let mut rules = vec![
        Rule::new(
            KeyMatcher::in_set(&[UP]),
            go(config.clone(), focus.clone(), Step::Backward),
        ),
        Rule::new(
            KeyMatcher::in_set(&[DOWN]),
            go(config.clone(), focus.clone(), Step::Forward),
        ),
    ];
    if config.move_on_tab {
        rules.push(Rule::new(
            KeyMatcher::in_set(&[TAB]).shifted(),
            go(config.clone(), focus.clone(), Step::Backward),
        ));
        rules.push(Rule::new(
            KeyMatcher::in_set(&[TAB]),
            go(config.clone(), focus.clone(), Step::Forward),
        ));
    }
    rules.push(Rule::new(
        KeyMatcher::in_set(&[ENTER, SPACE]),
        execute_current(config.execute.clone(), focus.clone()),
    ));
    rules
}

pub(crate) fn keyup_rules() -> Vec<Rule> {
    space_keyup()
}
