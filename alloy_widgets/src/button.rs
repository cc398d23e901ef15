// Copyright 2025 the Alloy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A button: focusable, executed by Enter, Space or a tap.

use alloy_component::{ComponentId, ComponentSpec, EventKind, System, Uid, handler};
use alloy_keying::keying;
use alloy_schema::Value;

use crate::behaviours::focusing::focusing;
use crate::behaviours::toggling::toggling;
use crate::hooks::ComponentHook;

/// Class of every button element.
pub const BUTTON_CLASS: &str = "alloy-button";

/// What to build with [`button`].
#[derive(Clone, Debug, Default)]
pub struct ButtonSpec {
    uid: Option<Uid>,
    text: String,
    action: Option<ComponentHook>,
    toggle_class: Option<String>,
}

impl ButtonSpec {
    /// A button labelled `text`.
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_owned(),
            ..Self::default()
        }
    }

    /// Give the button a fixed uid.
    pub fn uid(mut self, uid: impl Into<Uid>) -> Self {
        self.uid = Some(uid.into());
        self
    }

    /// Run `action` on execute.
    pub fn action(mut self, action: impl Fn(&mut System, ComponentId) + 'static) -> Self {
        self.action = Some(ComponentHook::new(action));
        self
    }

    /// Make it a toggle button showing `class` while on.
    pub fn toggle(mut self, class: &str) -> Self {
        self.toggle_class = Some(class.to_owned());
        self
    }
}

/// Build a button.
///
/// A tap (a click without touch support) executes the button. With an
/// action, execute runs it and stops; a toggle button also flips its state.
pub fn button(spec: ButtonSpec) -> ComponentSpec {
    let mut out = ComponentSpec::new("button")
        .class(BUTTON_CLASS)
        .attr("role", "button")
        .inner_html(&spec.text)
        .with(&focusing(), Value::empty_object())
        .with(
            &keying(),
            Value::object([
                ("mode", Value::from("execution")),
                ("use_space", Value::Bool(true)),
            ]),
        )
        .on(handler::run(EventKind::Tap, |system, me, event| {
            system.emit_execute(me);
            event.stop();
        }));
    if let Some(uid) = spec.uid {
        out = out.uid(uid);
    }
    if let Some(action) = spec.action {
        out = out.on(handler::run_on_execute(move |system, me, event| {
            action.call(system, me);
            event.stop();
        }));
    }
    if let Some(class) = spec.toggle_class {
        out = out.with(
            &toggling(),
            Value::object([
                ("toggle_class", Value::from(class)),
                ("aria", Value::from("pressed")),
            ]),
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behaviours::toggling;
    use alloy_component::{KeyEvent, RawEvent};
    use alloy_keying::{ENTER, SPACE};
    use std::cell::Cell;
    use std::rc::Rc;

    fn counting(system: &mut System, spec: ButtonSpec) -> (ComponentId, Rc<Cell<u32>>) {
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        let c = system
            .build(button(spec.action(move |_, _| h.set(h.get() + 1))))
            .unwrap();
        system.attach_to_body(c).unwrap();
        (c, hits)
    }

    #[test]
    fn keys_and_taps_execute() {
        let mut system = System::default();
        let (c, hits) = counting(&mut system, ButtonSpec::new("Bold"));
        assert_eq!(system.doc().inner_html(c.element()), Some("Bold"));

        system.dispatch_focus(c);
        assert_eq!(system.doc().focused(), Some(c.element()));
        for code in [ENTER, SPACE] {
            let key = RawEvent::Key(KeyEvent::new(code));
            assert!(system.trigger(EventKind::KeyDown, key, c.element()));
        }
        let click = RawEvent::Pointer { x: 1.0, y: 1.0 };
        assert!(system.trigger(EventKind::Click, click, c.element()));
        assert_eq!(hits.get(), 3);
    }

    #[test]
    fn toggle_buttons_flip_and_act() {
        let mut system = System::default();
        let (c, hits) = counting(&mut system, ButtonSpec::new("Italic").uid("italic").toggle("on"));
        assert_eq!(system.get_by_uid("italic"), Some(c));
        assert!(system.emit_execute(c));
        assert!(toggling::is_on(&system, c));
        assert_eq!(system.doc().attr(c.element(), "aria-pressed"), Some("true"));
        assert_eq!(hits.get(), 1);
    }
}
