// Copyright 2025 the Alloy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A menu: a list of items navigated by highlight.
//!
//! Document focus stays on the menu element; Up and Down move the highlight
//! and Enter or Space dispatch [`EventKind::Execute`] at the highlighted item.

use alloy_component::{ComponentSpec, EventKind, handler};
use alloy_dom::{Document, ElementId};
use alloy_keying::keying;
use alloy_schema::Value;

use crate::behaviours::focusing::focusing;
use crate::behaviours::highlighting::{self, highlight_focus, highlighting};

/// Class of every menu element.
pub const MENU_CLASS: &str = "alloy-menu";
/// Class of every menu item element.
pub const ITEM_CLASS: &str = "alloy-item";
/// Class of the highlighted item.
pub const SELECTED_ITEM_CLASS: &str = "alloy-selected-item";

const VALUE_ATTR: &str = "data-value";
const MENU_ATTR: &str = "data-menu";

/// One menu entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MenuItem {
    /// Identifies the item; tiered menus key expansions on it.
    pub value: String,
    /// Label.
    pub text: String,
}

impl MenuItem {
    /// An item with a value and a label.
    pub fn new(value: &str, text: &str) -> Self {
        Self {
            value: value.to_owned(),
            text: text.to_owned(),
        }
    }
}

fn item(item: &MenuItem) -> ComponentSpec {
    ComponentSpec::new("div")
        .class(ITEM_CLASS)
        .attr("role", "menuitem")
        .attr(VALUE_ATTR, &item.value)
        .inner_html(&item.text)
}

/// Build a menu named `value` holding `items`.
pub fn menu(value: &str, items: &[MenuItem]) -> ComponentSpec {
    ComponentSpec::new("div")
        .class(MENU_CLASS)
        .attr("role", "menu")
        .attr(MENU_ATTR, value)
        .with(
            &highlighting(),
            Value::object([
                ("highlight_class", Value::from(SELECTED_ITEM_CLASS)),
                ("item_class", Value::from(ITEM_CLASS)),
            ]),
        )
        .with(
            &keying(),
            Value::object([
                ("mode", Value::from("menu")),
                ("selector", Value::from(format!(".{ITEM_CLASS}"))),
                ("focus_manager", highlight_focus()),
            ]),
        )
        .with(&focusing(), Value::empty_object())
        .on(handler::run(EventKind::MouseOver, |system, me, event| {
            let item = system
                .doc()
                .closest(event.target(), &format!(".{ITEM_CLASS}"), Some(me.element()));
            if let Some(item) = item {
                highlighting::highlight(system, me, item);
                event.stop();
            }
        }))
        .children(items.iter().map(item))
}

/// The value of a menu item element.
pub fn item_value(doc: &Document, item: ElementId) -> Option<&str> {
    doc.attr(item, VALUE_ATTR)
}

/// The name of a menu element.
pub fn menu_value(doc: &Document, menu: ElementId) -> Option<&str> {
    doc.attr(menu, MENU_ATTR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_component::{ComponentId, KeyEvent, RawEvent, System};
    use alloy_keying::{DOWN, ENTER, UP};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn items() -> Vec<MenuItem> {
        vec![
            MenuItem::new("cut", "Cut"),
            MenuItem::new("copy", "Copy"),
            MenuItem::new("paste", "Paste"),
        ]
    }

    fn press(system: &mut System, menu: ComponentId, code: u32) -> bool {
        system.trigger(EventKind::KeyDown, RawEvent::Key(KeyEvent::new(code)), menu.element())
    }

    fn highlighted(system: &System, menu: ComponentId) -> Option<String> {
        let item = highlighting::get_highlighted(system, menu)?;
        item_value(system.doc(), item).map(str::to_owned)
    }

    #[test]
    fn focus_highlights_and_keys_move() {
        let mut system = System::default();
        let m = system.build(menu("edit", &items())).unwrap();
        system.attach_to_body(m).unwrap();
        assert_eq!(menu_value(system.doc(), m.element()), Some("edit"));

        system.dispatch_focus(m);
        assert_eq!(system.doc().focused(), Some(m.element()));
        assert_eq!(highlighted(&system, m).as_deref(), Some("cut"));

        assert!(press(&mut system, m, UP));
        assert_eq!(highlighted(&system, m).as_deref(), Some("paste"));
        assert!(press(&mut system, m, DOWN));
        assert_eq!(highlighted(&system, m).as_deref(), Some("cut"));
        assert_eq!(system.doc().focused(), Some(m.element()));
    }

    #[test]
    fn enter_executes_the_highlighted_item() {
        let executed = Rc::new(RefCell::new(Vec::new()));
        let e = executed.clone();
        let mut system = System::default();
        let m = system
            .build(
                ComponentSpec::new("div")
                    .on(handler::run_on_execute(move |system, _, event| {
                        let value = item_value(system.doc(), event.target()).map(str::to_owned);
                        e.borrow_mut().push(value);
                        event.stop();
                    }))
                    .child(menu("edit", &items())),
            )
            .unwrap();
        system.attach_to_body(m).unwrap();
        let inner = system.children(m)[0];
        system.dispatch_focus(inner);
        press(&mut system, inner, DOWN);
        assert!(press(&mut system, inner, ENTER));
        assert_eq!(*executed.borrow(), vec![Some("copy".to_owned())]);
    }

    #[test]
    fn hover_highlights() {
        let mut system = System::default();
        let m = system.build(menu("edit", &items())).unwrap();
        system.attach_to_body(m).unwrap();
        let third = system.doc().children_of(m.element())[2];
        let pointer = RawEvent::Pointer { x: 0.0, y: 0.0 };
        assert!(system.trigger(EventKind::MouseOver, pointer, third));
        assert_eq!(highlighted(&system, m).as_deref(), Some("paste"));
    }
}
