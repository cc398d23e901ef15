// Copyright 2025 the Alloy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `special`: every key goes to its own user handler.

use std::rc::Rc;

use alloy_component::{ComponentId, System};
use alloy_schema::field::option_of;
use alloy_schema::{FieldProcessor, Struct, handle_of};

use super::{delegate, key_handler, key_handler_field};
use crate::callbacks::{FocusHook, KeyHandler};
use crate::keys::{DOWN, ENTER, ESCAPE, KeyMatcher, LEFT, RIGHT, SPACE, TAB, UP};
use crate::rules::Rule;

const KEYS: [&str; 10] = [
    "on_space",
    "on_enter",
    "on_shift_enter",
    "on_left",
    "on_right",
    "on_tab",
    "on_shift_tab",
    "on_up",
    "on_down",
    "on_escape",
];

pub(crate) fn fields() -> Vec<FieldProcessor> {
    let mut fields: Vec<FieldProcessor> = KEYS.iter().map(|k| key_handler_field(k)).collect();
    fields.push(option_of("focus_in", handle_of::<FocusHook>()));
    fields
}

/// Config of the `special` mode. Absent handlers let their key through.
#[derive(Clone, Debug, Default)]
pub struct SpecialConfig {
    /// Space.
    pub on_space: Option<KeyHandler>,
    /// Enter without Shift.
    pub on_enter: Option<KeyHandler>,
    /// Shift+Enter.
    pub on_shift_enter: Option<KeyHandler>,
    /// Left arrow.
    pub on_left: Option<KeyHandler>,
    /// Right arrow.
    pub on_right: Option<KeyHandler>,
    /// Tab without Shift.
    pub on_tab: Option<KeyHandler>,
    /// Shift+Tab.
    pub on_shift_tab: Option<KeyHandler>,
    /// Up arrow.
    pub on_up: Option<KeyHandler>,
    /// Down arrow.
    pub on_down: Option<KeyHandler>,
    /// Escape.
    pub on_escape: Option<KeyHandler>,
    /// Runs on focus-in.
    pub focus_in: Option<FocusHook>,
}

impl SpecialConfig {
    pub(crate) fn from_struct(config: &Struct) -> Self {
        Self {
            on_space: key_handler(config, "on_space"),
            on_enter: key_handler(config, "on_enter"),
            on_shift_enter: key_handler(config, "on_shift_enter"),
            on_left: key_handler(config, "on_left"),
            on_right: key_handler(config, "on_right"),
            on_tab: key_handler(config, "on_tab"),
            on_shift_tab: key_handler(config, "on_shift_tab"),
            on_up: key_handler(config, "on_up"),
            on_down: key_handler(config, "on_down"),
            on_escape: key_handler(config, "on_escape"),
            focus_in: config.handle::<FocusHook>("focus_in").cloned(),
        }
    }
}

/// Returns true if the hook placed the focus.
pub(crate) fn focus_in(config: &SpecialConfig, system: &mut System, component: ComponentId) -> bool {
    config
        .focus_in
        .as_ref()
        .is_some_and(|hook| hook.call(system, component))
}

pub(crate) fn rules(config: &Rc<SpecialConfig>) -> Vec<Rule> {
    let c = config;
    vec![
        Rule::new(KeyMatcher::in_set(&[SPACE]), delegate(c.on_space.clone())),
        Rule::new(
            KeyMatcher::in_set(&[ENTER]).unshifted(),
            delegate(c.on_enter.clone()),
        ),
        Rule::new(
            KeyMatcher::in_set(&[ENTER]).shifted(),
            delegate(c.on_shift_enter.clone()),
        ),
        Rule::new(
            KeyMatcher::in_set(&[TAB]).shifted(),
            delegate(c.on_shift_tab.clone()),
        ),
        Rule::new(
            KeyMatcher::in_set(&[TAB]).unshifted(),
            delegate(c.on_tab.clone()),
        ),
        Rule::new(KeyMatcher::in_set(&[UP]), delegate(c.on_up.clone())),
        Rule::new(KeyMatcher::in_set(&[DOWN]), delegate(c.on_down.clone())),
        Rule::new(KeyMatcher::in_set(&[LEFT]), delegate(c.on_left.clone())),
        Rule::new(KeyMatcher::in_set(&[RIGHT]), delegate(c.on_right.clone())),
        Rule::new(KeyMatcher::in_set(&[ESCAPE]), delegate(c.on_escape.clone())),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keying::keying;
    use crate::modes::testing::{press, press_with};
    use alloy_component::{ComponentSpec, Modifiers};
    use alloy_schema::Value;
    use std::cell::RefCell;

    #[test]
    fn each_key_reaches_its_handler() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let note = |name: &'static str| {
            let log = log.clone();
            KeyHandler::value(move |_, _, _| {
                log.borrow_mut().push(name);
                Some(true)
            })
        };
        let config = Value::object([
            ("mode", Value::from("special")),
            ("on_left", note("left")),
            ("on_shift_enter", note("shift-enter")),
            ("on_escape", note("escape")),
        ]);
        let mut system = System::default();
        let c = system
            .build(ComponentSpec::new("div").with(&keying(), config))
            .unwrap();
        system.attach_to_body(c).unwrap();
        system.doc_mut().focus(c.element());

        assert!(press(&mut system, LEFT));
        assert!(!press(&mut system, RIGHT));
        assert!(!press(&mut system, ENTER));
        assert!(press_with(&mut system, ENTER, Modifiers::SHIFT));
        assert!(press(&mut system, ESCAPE));
        assert_eq!(*log.borrow(), vec!["left", "shift-enter", "escape"]);
    }
}
