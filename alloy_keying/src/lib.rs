// Copyright 2025 the Alloy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=alloy_keying --heading-base-level=0

//! Alloy Keying: keyboard navigation for Alloy components.
//!
//! ## Overview
//!
//! [`keying`] is a modal behaviour. Its `mode` picks how keys move the
//! current item inside a component:
//!
//! - `acyclic` and `cyclic`: Tab and Shift+Tab through tab-stops. Cyclic
//!   wraps at the ends; acyclic lets the key through instead.
//! - `flow`: arrow keys through a one-dimensional run, always wrapping.
//! - `flatgrid`: arrow keys through a flat run laid out in rows; the grid
//!   size lives in the component state ([`set_grid_size`]).
//! - `matrix`: arrow keys through explicit rows of cells; vertical moves
//!   clamp the column to the new row.
//! - `menu`: Up and Down through menu items.
//! - `execution`: activation keys execute the component.
//! - `special`: each key goes to its own handler.
//!
//! ## Rules
//!
//! Every mode is an ordered table of [`Rule`]s. The first rule whose
//! [`KeyMatcher`] accepts a key runs; if its action returns `Some(_)` the
//! key event is stopped, otherwise it keeps bubbling.
//!
//! ## Focus
//!
//! A mode moves "focus" through a [`FocusManager`]. [`DomFocus`], the
//! default, uses document focus; widgets that keep DOM focus on a container
//! (menus, for one) plug in a manager of their own under `focus_manager`.
//! Horizontal moves follow the text direction: Left moves forward in a
//! right-to-left layout.
//!
//! ```rust
//! use alloy_component::{ComponentSpec, EventKind, KeyEvent, RawEvent, System};
//! use alloy_keying::{DOWN, keying};
//! use alloy_schema::Value;
//!
//! let mut system = System::default();
//! let config = Value::object([("mode", Value::from("menu")), ("selector", Value::from(".item"))]);
//! let menu = system.build(ComponentSpec::new("ul").with(&keying(), config)).unwrap();
//! system.attach_to_body(menu).unwrap();
//!
//! let mut items = Vec::new();
//! for _ in 0..2 {
//!     let doc = system.doc_mut();
//!     let item = doc.create_element("li");
//!     doc.add_class(item, "item");
//!     doc.append_child(menu.element(), item);
//!     items.push(item);
//! }
//!
//! alloy_keying::focus_in(&mut system, menu);
//! assert_eq!(system.doc().focused(), Some(items[0]));
//!
//! let down = RawEvent::Key(KeyEvent::new(DOWN));
//! assert!(system.trigger(EventKind::KeyDown, down, items[0]));
//! assert_eq!(system.doc().focused(), Some(items[1]));
//! ```

mod callbacks;
mod focus_manager;
mod keying;
mod keys;
mod modes;
pub mod navigation;
mod rules;

pub use callbacks::{ElementFinder, Executor, FocusHook, KeyHandler, TabstopFilter, execute_focused};
pub use focus_manager::{DomFocus, FocusManager, FocusManagerHandle, focus_manager};
pub use keying::{
    KEYING, KeyingConfig, KeyingState, focus_in, grid_size, keying, keying_config, set_grid_size,
};
pub use keys::{
    BACKSPACE, CTRL, DOWN, ENTER, ESCAPE, KeyMatcher, LEFT, RIGHT, SHIFT, SPACE, TAB, UP,
};
pub use modes::execution::ExecutionConfig;
pub use modes::flatgrid::{FlatGridConfig, GridSize};
pub use modes::flow::FlowConfig;
pub use modes::matrix::MatrixConfig;
pub use modes::menu::MenuConfig;
pub use modes::special::SpecialConfig;
pub use modes::tabbing::{DEFAULT_TABSTOP_SELECTOR, TabbingConfig};
pub use rules::{KeyAction, Rule, choose};
