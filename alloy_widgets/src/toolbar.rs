// Copyright 2025 the Alloy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A toolbar: groups of buttons.
//!
//! Tab and Shift+Tab cycle between groups; arrow keys move between the
//! buttons of a group. Entering a group focuses its first button.

use alloy_component::ComponentSpec;
use alloy_keying::keying;
use alloy_schema::Value;

use crate::behaviours::tabstopping::tabstopping;
use crate::button::{BUTTON_CLASS, ButtonSpec, button};

/// Class of the toolbar element.
pub const TOOLBAR_CLASS: &str = "alloy-toolbar";
/// Class of every group element.
pub const GROUP_CLASS: &str = "alloy-toolbar-group";

/// A group of buttons, reached as one tab-stop.
pub fn toolbar_group(items: impl IntoIterator<Item = ButtonSpec>) -> ComponentSpec {
    ComponentSpec::new("div")
        .class(GROUP_CLASS)
        .attr("role", "group")
        .with(&tabstopping(), Value::empty_object())
        .with(
            &keying(),
            Value::object([
                ("mode", Value::from("flow")),
                ("selector", Value::from(format!(".{BUTTON_CLASS}"))),
            ]),
        )
        .children(items.into_iter().map(button))
}

/// A toolbar holding `groups` built with [`toolbar_group`].
pub fn toolbar(groups: impl IntoIterator<Item = ComponentSpec>) -> ComponentSpec {
    ComponentSpec::new("div")
        .class(TOOLBAR_CLASS)
        .attr("role", "toolbar")
        .with(&keying(), Value::object([("mode", Value::from("cyclic"))]))
        .children(groups)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_component::{ComponentId, EventKind, KeyEvent, Modifiers, RawEvent, System};
    use alloy_dom::ElementId;
    use alloy_keying::{ENTER, RIGHT, TAB, focus_in};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn press(system: &mut System, key: KeyEvent) -> bool {
        let Some(focused) = system.doc().focused() else {
            return false;
        };
        system.trigger(EventKind::KeyDown, RawEvent::Key(key), focused)
    }

    fn label(system: &System) -> Option<String> {
        let focused: ElementId = system.doc().focused()?;
        system.doc().inner_html(focused).map(str::to_owned)
    }

    fn editor(log: &Rc<RefCell<Vec<&'static str>>>) -> ComponentSpec {
        let action = |name: &'static str| {
            let log = log.clone();
            ButtonSpec::new(name).action(move |_, _| log.borrow_mut().push(name))
        };
        toolbar([
            toolbar_group([action("Bold"), action("Italic")]),
            toolbar_group([action("Left"), action("Right")]),
        ])
    }

    fn attached(system: &mut System, spec: ComponentSpec) -> ComponentId {
        let c = system.build(spec).unwrap();
        system.attach_to_body(c).unwrap();
        c
    }

    #[test]
    fn tab_moves_between_groups() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut system = System::default();
        let bar = attached(&mut system, editor(&log));

        focus_in(&mut system, bar);
        assert_eq!(label(&system).as_deref(), Some("Bold"));
        assert!(press(&mut system, KeyEvent::new(TAB)));
        assert_eq!(label(&system).as_deref(), Some("Left"));
        assert!(press(&mut system, KeyEvent::new(TAB)));
        assert_eq!(label(&system).as_deref(), Some("Bold"));
        assert!(press(&mut system, KeyEvent::new(TAB).with(Modifiers::SHIFT)));
        assert_eq!(label(&system).as_deref(), Some("Left"));
    }

    #[test]
    fn arrows_move_within_a_group_and_enter_executes() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut system = System::default();
        let bar = attached(&mut system, editor(&log));

        focus_in(&mut system, bar);
        assert!(press(&mut system, KeyEvent::new(RIGHT)));
        assert_eq!(label(&system).as_deref(), Some("Italic"));
        assert!(press(&mut system, KeyEvent::new(RIGHT)));
        assert_eq!(label(&system).as_deref(), Some("Bold"));
        assert!(press(&mut system, KeyEvent::new(ENTER)));
        assert_eq!(*log.borrow(), vec!["Bold"]);
    }
}
