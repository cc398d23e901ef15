// Copyright 2025 the Alloy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Typed callbacks carried in keying configs as [`Value::Handle`]s.
//!
//! Each wrapper is its own type so that the schema can tell them apart with
//! [`handle_of`](alloy_schema::handle_of).

use std::fmt;
use std::rc::Rc;

use alloy_component::{ComponentId, SimulatedEvent, System};
use alloy_dom::{Document, ElementId};
use alloy_schema::Value;

macro_rules! callback {
    ($(#[$meta:meta])* $name:ident, ($($arg:ident: $ty:ty),*) -> $ret:ty) => {
        $(#[$meta])*
        #[derive(Clone)]
        pub struct $name(Rc<dyn Fn($($ty),*) -> $ret>);

        impl $name {
            /// Wrap a closure.
            pub fn new(f: impl Fn($($ty),*) -> $ret + 'static) -> Self {
                Self(Rc::new(f))
            }

            /// Wrap a closure into a config value.
            pub fn value(f: impl Fn($($ty),*) -> $ret + 'static) -> Value {
                Value::handle(Self::new(f))
            }

            /// Call the closure.
            pub fn call(&self, $($arg: $ty),*) -> $ret {
                (self.0)($($arg),*)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(concat!(stringify!($name), "(..)"))
            }
        }

        impl From<$name> for Value {
            fn from(cb: $name) -> Self {
                Self::handle(cb)
            }
        }
    };
}

callback!(
    /// A key handler (`on_enter`, `on_escape`, `on_left` and friends).
    ///
    /// `Some(_)` consumes the key; `None` lets it through.
    KeyHandler,
    (system: &mut System, component: ComponentId, event: &SimulatedEvent) -> Option<bool>
);

callback!(
    /// Runs the focused item (`execute`).
    Executor,
    (system: &mut System, component: ComponentId, event: &SimulatedEvent, focused: ElementId) -> Option<bool>
);

callback!(
    /// Decides whether an element may be a tab-stop (`use_tabstop_at`).
    TabstopFilter,
    (doc: &Document, element: ElementId) -> bool
);

callback!(
    /// Finds an element inside the component (`get_initial`, `previous_selector`).
    ElementFinder,
    (system: &System, component: ComponentId) -> Option<ElementId>
);

callback!(
    /// A custom focus-in hook (`focus_in` of the special mode). Returns true
    /// if it placed the focus.
    FocusHook,
    (system: &mut System, component: ComponentId) -> bool
);

/// Dispatch [`EventKind::Execute`](alloy_component::EventKind::Execute) at
/// the focused item. The default [`Executor`].
pub fn execute_focused(
    system: &mut System,
    component: ComponentId,
    _event: &SimulatedEvent,
    focused: ElementId,
) -> Option<bool> {
    system.dispatch(component, focused, alloy_component::EventKind::Execute);
    Some(true)
}
