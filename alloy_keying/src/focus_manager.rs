// Copyright 2025 the Alloy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Where a keying component keeps its notion of "the current item".

use std::fmt;
use std::rc::Rc;

use alloy_component::{ComponentId, System};
use alloy_dom::ElementId;
use alloy_schema::{Struct, Value};

/// Reads and moves the current item of a keying component.
///
/// The default, [`DomFocus`], uses real document focus. Menus plug in a
/// highlight-based manager instead so that the DOM focus can stay put.
pub trait FocusManager {
    /// The current item inside `component`.
    fn get(&self, system: &System, component: ComponentId) -> Option<ElementId>;

    /// Make `target` the current item.
    fn set(&self, system: &mut System, component: ComponentId, target: ElementId);
}

/// Document focus. Components are asked to focus through
/// [`System::trigger_focus`], plain elements are focused directly.
#[derive(Clone, Copy, Debug, Default)]
pub struct DomFocus;

impl FocusManager for DomFocus {
    fn get(&self, system: &System, component: ComponentId) -> Option<ElementId> {
        let focused = system.doc().focused()?;
        system
            .doc()
            .has_focus_within(component.element())
            .then_some(focused)
    }

    fn set(&self, system: &mut System, component: ComponentId, target: ElementId) {
        system.trigger_focus(target, Some(component.element()));
    }
}

/// Shared handle stored in a keying config under `focus_manager`.
#[derive(Clone)]
pub struct FocusManagerHandle(pub Rc<dyn FocusManager>);

impl fmt::Debug for FocusManagerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FocusManagerHandle(..)")
    }
}

/// Wrap a focus manager into a config value.
pub fn focus_manager(manager: impl FocusManager + 'static) -> Value {
    Value::handle(FocusManagerHandle(Rc::new(manager)))
}

/// The configured focus manager, or [`DomFocus`].
pub(crate) fn from_config(config: &Struct) -> Rc<dyn FocusManager> {
    config
        .handle::<FocusManagerHandle>("focus_manager")
        .map(|h| h.0.clone())
        .unwrap_or_else(|| Rc::new(DomFocus))
}
