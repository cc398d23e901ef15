// Copyright 2025 the Alloy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `acyclic` and `cyclic`: Tab and Shift+Tab through a sequence of tab-stops.

use std::rc::Rc;

use alloy_component::{ComponentId, System};
use alloy_dom::{Document, ElementId};
use alloy_schema::field::{defaulted, option_of};
use alloy_schema::{FieldProcessor, Struct, Value, handle_of};

use super::{delegate, key_handler, key_handler_field, move_to};
use crate::callbacks::{KeyHandler, TabstopFilter};
use crate::focus_manager::FocusManager;
use crate::keys::{ENTER, ESCAPE, KeyMatcher, TAB};
use crate::navigation::{Step, WrapMode, next_matching};
use crate::rules::Rule;

/// Tab-stops unless configured otherwise.
pub const DEFAULT_TABSTOP_SELECTOR: &str = r#"[data-alloy-tabstop="true"]"#;

pub(crate) fn fields() -> Vec<FieldProcessor> {
    vec![
        defaulted("selector", Value::from(DEFAULT_TABSTOP_SELECTOR)),
        defaulted("first_tabstop", Value::from(0)),
        key_handler_field("on_enter"),
        key_handler_field("on_escape"),
        option_of("use_tabstop_at", handle_of::<TabstopFilter>()),
    ]
}

/// Config of the `acyclic` and `cyclic` modes.
#[derive(Clone, Debug)]
pub struct TabbingConfig {
    /// [`WrapMode::Cycle`] for `cyclic`.
    pub wrap: WrapMode,
    /// Selects the tab-stops.
    pub selector: String,
    /// Which visible tab-stop takes focus on focus-in.
    pub first_tabstop: usize,
    /// Enter without Shift.
    pub on_enter: Option<KeyHandler>,
    /// Escape.
    pub on_escape: Option<KeyHandler>,
    /// Extra filter on tab-stops.
    pub use_tabstop_at: Option<TabstopFilter>,
}

impl TabbingConfig {
    pub(crate) fn from_struct(config: &Struct, wrap: WrapMode) -> Self {
        Self {
            wrap,
            selector: config
                .str("selector")
                .unwrap_or(DEFAULT_TABSTOP_SELECTOR)
                .to_owned(),
            first_tabstop: config.usize("first_tabstop").unwrap_or(0),
            on_enter: key_handler(config, "on_enter"),
            on_escape: key_handler(config, "on_escape"),
            use_tabstop_at: config.handle::<TabstopFilter>("use_tabstop_at").cloned(),
        }
    }

    fn is_tabstop(&self, doc: &Document, element: ElementId) -> bool {
        doc.is_visible(element)
            && self
                .use_tabstop_at
                .as_ref()
                .is_none_or(|f| f.call(doc, element))
    }
}

pub(crate) fn focus_in(
    config: &TabbingConfig,
    focus: &dyn FocusManager,
    system: &mut System,
    component: ComponentId,
) {
    let doc = system.doc();
    let initial = doc
        .descendants(component.element(), &config.selector)
        .into_iter()
        .filter(|t| config.is_tabstop(doc, *t))
        .nth(config.first_tabstop);
    if let Some(tabstop) = initial {
        focus.set(system, component, tabstop);
    }
}

fn go(
    config: Rc<TabbingConfig>,
    focus: Rc<dyn FocusManager>,
    step: Step,
) -> impl Fn(&mut System, ComponentId, &alloy_component::SimulatedEvent) -> Option<bool> + 'static {
    move |system, component, _| {
        let focused = focus.get(system, component)?;
        let doc = system.doc();
        let current = doc.closest(focused, &config.selector, Some(component.element()))?;
        let tabstops = doc.descendants(component.element(), &config.selector);
        let index = tabstops.iter().position(|t| *t == current)?;
        let next = next_matching(tabstops.len(), index, config.wrap, step, |i| {
            config.is_tabstop(doc, tabstops[i])
        })?;
        let target = tabstops[next];
        move_to(&*focus, system, component, target)
    }
}

pub(crate) fn rules(config: &Rc<TabbingConfig>, focus: &Rc<dyn FocusManager>) -> Vec<Rule> {
    vec![
        Rule::new(
            KeyMatcher::in_set(&[TAB]).shifted(),
            go(config.clone(), focus.clone(), Step::Backward),
        ),
        Rule::new(
            KeyMatcher::in_set(&[TAB]),
            go(config.clone(), focus.clone(), Step::Forward),
        ),
        Rule::new(KeyMatcher::in_set(&[ESCAPE]), delegate(config.on_escape.clone())),
        Rule::new(
            KeyMatcher::in_set(&[ENTER]).unshifted(),
            delegate(config.on_enter.clone()),
        ),
    ]
}
