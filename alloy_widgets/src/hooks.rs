// Copyright 2025 the Alloy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Typed callbacks carried in behaviour configs as [`Value::Handle`]s.

use std::fmt;
use std::rc::Rc;

use alloy_component::{ComponentId, System};
use alloy_dom::ElementId;
use alloy_schema::Value;

macro_rules! hook {
    ($(#[$meta:meta])* $name:ident, ($($arg:ident: $ty:ty),*) $(-> $ret:ty)?) => {
        $(#[$meta])*
        #[derive(Clone)]
        pub struct $name(Rc<dyn Fn($($ty),*) $(-> $ret)?>);

        impl $name {
            /// Wrap a closure.
            pub fn new(f: impl Fn($($ty),*) $(-> $ret)? + 'static) -> Self {
                Self(Rc::new(f))
            }

            /// Wrap a closure into a config value.
            pub fn value(f: impl Fn($($ty),*) $(-> $ret)? + 'static) -> Value {
                Value::handle(Self::new(f))
            }

            /// Call the closure.
            pub fn call(&self, $($arg: $ty),*) $(-> $ret)? {
                (self.0)($($arg),*)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(concat!(stringify!($name), "(..)"))
            }
        }

        impl From<$name> for Value {
            fn from(hook: $name) -> Self {
                Self::handle(hook)
            }
        }
    };
}

hook!(
    /// Runs with the component alone (`on_focus`).
    ComponentHook,
    (system: &mut System, component: ComponentId)
);

hook!(
    /// Runs with one of the component's items (`on_highlight`, `on_dehighlight`).
    ItemHook,
    (system: &mut System, component: ComponentId, item: ElementId)
);

hook!(
    /// Handles the validated data of a broadcast channel.
    ReceiveHandler,
    (system: &mut System, component: ComponentId, data: &Value)
);

hook!(
    /// Reads a manually stored value.
    ValueGetter,
    (system: &System, component: ComponentId) -> Value
);

hook!(
    /// Writes a manually stored value.
    ValueSetter,
    (system: &mut System, component: ComponentId, value: &Value)
);

hook!(
    /// Runs with a transition state name (`on_transition`, `on_finish`).
    StateHook,
    (system: &mut System, component: ComponentId, state: &str)
);

hook!(
    /// Runs after a toggle with the new state.
    ToggleHook,
    (system: &mut System, component: ComponentId, on: bool)
);

hook!(
    /// Acts on a tiered-menu item (`on_execute`, `on_escape`). Returns true
    /// if it handled the item.
    ItemAction,
    (system: &mut System, container: ComponentId, item: ComponentId) -> bool
);

hook!(
    /// Runs when a tiered menu opens its primary menu.
    MenuHook,
    (system: &mut System, container: ComponentId, menu: ComponentId)
);

hook!(
    /// Runs when a tiered menu moves between an item and a menu
    /// (`on_open_submenu`, `on_collapse_menu`).
    SubmenuHook,
    (system: &mut System, container: ComponentId, item: ComponentId, menu: ComponentId)
);
