// Copyright 2025 the Alloy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `highlighting`: at most one item of the component carries a highlight
//! class.
//!
//! Items are the descendants with `item_class`. Highlighting an item
//! dehighlights every other one first, runs `on_highlight` and dispatches
//! [`EventKind::Highlight`] at the item; dehighlighting mirrors that with
//! `on_dehighlight` and [`EventKind::Dehighlight`].

use std::rc::Rc;

use alloy_component::{Behaviour, ComponentId, EventKind, System};
use alloy_dom::{Document, ElementId};
use alloy_keying::{FocusManager, focus_manager};
use alloy_schema::field::{option_of, strict_of};
use alloy_schema::{Struct, Value, handle_of, string};

use crate::hooks::ItemHook;

/// Behaviour name.
pub const HIGHLIGHTING: &str = "highlighting";

struct Settings {
    highlight_class: String,
    item_class: String,
    on_highlight: Option<ItemHook>,
    on_dehighlight: Option<ItemHook>,
}

impl Settings {
    fn from_struct(config: &Struct) -> Self {
        Self {
            highlight_class: config.str("highlight_class").unwrap_or_default().to_owned(),
            item_class: config.str("item_class").unwrap_or_default().to_owned(),
            on_highlight: config.handle::<ItemHook>("on_highlight").cloned(),
            on_dehighlight: config.handle::<ItemHook>("on_dehighlight").cloned(),
        }
    }

    fn of(system: &System, component: ComponentId) -> Option<Self> {
        highlighting()
            .config(system, component)
            .map(|c| Self::from_struct(&c))
    }

    fn candidates(&self, doc: &Document, component: ComponentId) -> Vec<ElementId> {
        doc.descendants(component.element(), &format!(".{}", self.item_class))
    }
}

fn define() -> Rc<Behaviour> {
    Behaviour::define(HIGHLIGHTING)
        .fields(vec![
            strict_of("highlight_class", string()),
            strict_of("item_class", string()),
            option_of("on_highlight", handle_of::<ItemHook>()),
            option_of("on_dehighlight", handle_of::<ItemHook>()),
        ])
        .build()
}

thread_local! {
    static BEHAVIOUR: Rc<Behaviour> = define();
}

/// The highlighting behaviour.
///
/// Config: `highlight_class`, `item_class`, and optional `on_highlight` and
/// `on_dehighlight` ([`ItemHook`]s).
pub fn highlighting() -> Rc<Behaviour> {
    BEHAVIOUR.with(Rc::clone)
}

fn dehighlight_with(settings: &Settings, system: &mut System, component: ComponentId, item: ElementId) {
    if !system.doc().has_class(item, &settings.highlight_class) {
        return;
    }
    system.doc_mut().remove_class(item, &settings.highlight_class);
    if let Some(hook) = &settings.on_dehighlight {
        hook.call(system, component, item);
    }
    system.dispatch(component, item, EventKind::Dehighlight);
}

/// Highlight `item`, dehighlighting every other item.
pub fn highlight(system: &mut System, component: ComponentId, item: ElementId) {
    let Some(settings) = Settings::of(system, component) else {
        return;
    };
    for other in settings.candidates(system.doc(), component) {
        if other != item {
            dehighlight_with(&settings, system, component, other);
        }
    }
    if system.doc().has_class(item, &settings.highlight_class) {
        return;
    }
    system.doc_mut().add_class(item, &settings.highlight_class);
    if let Some(hook) = &settings.on_highlight {
        hook.call(system, component, item);
    }
    system.dispatch(component, item, EventKind::Highlight);
}

/// Remove the highlight from `item`.
pub fn dehighlight(system: &mut System, component: ComponentId, item: ElementId) {
    if let Some(settings) = Settings::of(system, component) {
        dehighlight_with(&settings, system, component, item);
    }
}

/// Remove every highlight.
pub fn dehighlight_all(system: &mut System, component: ComponentId) {
    let Some(settings) = Settings::of(system, component) else {
        return;
    };
    for item in settings.candidates(system.doc(), component) {
        dehighlight_with(&settings, system, component, item);
    }
}

/// Returns true if `item` is highlighted.
pub fn is_highlighted(system: &System, component: ComponentId, item: ElementId) -> bool {
    Settings::of(system, component).is_some_and(|s| system.doc().has_class(item, &s.highlight_class))
}

/// The highlighted item.
pub fn get_highlighted(system: &System, component: ComponentId) -> Option<ElementId> {
    let settings = Settings::of(system, component)?;
    let doc = system.doc();
    settings
        .candidates(doc, component)
        .into_iter()
        .find(|&item| doc.has_class(item, &settings.highlight_class))
}

/// Every item, in document order.
pub fn get_candidates(system: &System, component: ComponentId) -> Vec<ElementId> {
    Settings::of(system, component)
        .map(|s| s.candidates(system.doc(), component))
        .unwrap_or_default()
}

/// The first item.
pub fn get_first(system: &System, component: ComponentId) -> Option<ElementId> {
    get_candidates(system, component).first().copied()
}

/// The last item.
pub fn get_last(system: &System, component: ComponentId) -> Option<ElementId> {
    get_candidates(system, component).last().copied()
}

/// Highlight the first item.
pub fn highlight_first(system: &mut System, component: ComponentId) {
    if let Some(first) = get_first(system, component) {
        highlight(system, component, first);
    }
}

/// Highlight the last item.
pub fn highlight_last(system: &mut System, component: ComponentId) {
    if let Some(last) = get_last(system, component) {
        highlight(system, component, last);
    }
}

/// Highlight the item at `index`. Out of range logs a warning.
pub fn highlight_at(system: &mut System, component: ComponentId, index: usize) {
    match get_candidates(system, component).get(index) {
        Some(&item) => highlight(system, component, item),
        None => tracing::warn!(
            index,
            component = %system.describe(component),
            "no item to highlight at index"
        ),
    }
}

/// Highlight the first item accepted by `accept`, returning it.
pub fn highlight_by(
    system: &mut System,
    component: ComponentId,
    accept: impl Fn(&Document, ElementId) -> bool,
) -> Option<ElementId> {
    let found = get_candidates(system, component)
        .into_iter()
        .find(|&item| accept(system.doc(), item))?;
    highlight(system, component, found);
    Some(found)
}

/// A [`FocusManager`] that moves the highlight instead of document focus.
///
/// Keying modes configured with it leave document focus on the container.
#[derive(Clone, Copy, Debug, Default)]
pub struct HighlightFocus;

impl FocusManager for HighlightFocus {
    fn get(&self, system: &System, component: ComponentId) -> Option<ElementId> {
        get_highlighted(system, component)
    }

    fn set(&self, system: &mut System, component: ComponentId, target: ElementId) {
        highlight(system, component, target);
    }
}

/// [`HighlightFocus`] as a keying `focus_manager` value.
pub fn highlight_focus() -> Value {
    focus_manager(HighlightFocus)
}
