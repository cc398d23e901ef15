// Copyright 2025 the Alloy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=alloy_widgets --heading-base-level=0

//! Alloy Widgets: supporting behaviours and the widgets built from them.
//!
//! ## Behaviours
//!
//! Each module under [`behaviours`] exports a behaviour singleton and the
//! functions that make up its API:
//!
//! - `focusing`: the component takes document focus.
//! - `highlighting`: one item at a time carries a highlight class.
//! - `receiving`: the component handles broadcast channels.
//! - `replacing`: child components are swapped at runtime.
//! - `representing`: the component stands for a value.
//! - `tabstopping`: the component is a keying tab-stop.
//! - `toggling`: an on/off state shown by a class and an aria attribute.
//! - `transitioning`: named states with animated routes between them.
//!
//! [`behaviours::registry`] resolves all of them, and `keying`, by name for
//! specs read from JSON.
//!
//! ## Widgets
//!
//! [`button()`], [`menu()`], [`toolbar()`], [`slider()`] and
//! [`tiered_menu()`] return [`ComponentSpec`](alloy_component::ComponentSpec)s
//! ready to build. Callbacks travel in configs as the typed [`hooks`].
//!
//! ```rust
//! use alloy_component::{EventKind, KeyEvent, RawEvent, System};
//! use alloy_keying::DOWN;
//! use alloy_widgets::behaviours::highlighting;
//! use alloy_widgets::{MenuItem, item_value, menu};
//!
//! let mut system = System::default();
//! let items = [MenuItem::new("cut", "Cut"), MenuItem::new("copy", "Copy")];
//! let edit = system.build(menu("edit", &items)).unwrap();
//! system.attach_to_body(edit).unwrap();
//!
//! system.dispatch_focus(edit);
//! let down = RawEvent::Key(KeyEvent::new(DOWN));
//! assert!(system.trigger(EventKind::KeyDown, down, edit.element()));
//!
//! let item = highlighting::get_highlighted(&system, edit).unwrap();
//! assert_eq!(item_value(system.doc(), item), Some("copy"));
//! ```

pub mod behaviours;
mod button;
pub mod hooks;
mod menu;
mod slider;
pub mod tiered_menu;
mod toolbar;

pub use button::{BUTTON_CLASS, ButtonSpec, button};
pub use menu::{ITEM_CLASS, MENU_CLASS, MenuItem, SELECTED_ITEM_CLASS, item_value, menu, menu_value};
pub use slider::{
    SLIDER, SLIDER_CLASS, SPECTRUM_CLASS, SliderConfig, THUMB_CLASS, set_value as set_slider_value,
    slider, value as slider_value,
};
pub use tiered_menu::{TieredData, TieredHooks, TieredMenuSpec, sliding_hooks, tiered_menu};
pub use toolbar::{GROUP_CLASS, TOOLBAR_CLASS, toolbar, toolbar_group};
