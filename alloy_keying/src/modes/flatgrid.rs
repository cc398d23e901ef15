// Copyright 2025 the Alloy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `flatgrid`: a flat run of items laid out in rows of a known width.
//!
//! The grid size lives in the keying state. It starts from `init_size` and
//! is updated with [`set_grid_size`](crate::set_grid_size) whenever the
//! layout reflows.

use std::rc::Rc;

use alloy_component::{ComponentId, SimulatedEvent, System};
use alloy_schema::field::{defaulted, option_obj_of, strict};
use alloy_schema::{FieldProcessor, Struct, Value};

use super::{
    Heading, delegate, execute_current, executor, executor_field, focus_first, key_handler,
    key_handler_field, move_to, space_keyup,
};
use crate::callbacks::{Executor, KeyHandler};
use crate::focus_manager::FocusManager;
use crate::keying::{KEYING, KeyingState};
use crate::keys::{DOWN, ENTER, ESCAPE, KeyMatcher, LEFT, RIGHT, SPACE, TAB, UP};
use crate::navigation::{WrapMode, grid_horizontal, grid_vertical, locate_visible};
use crate::rules::Rule;

/// Rows and columns of a flat grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GridSize {
    /// Number of rows.
    pub rows: usize,
    /// Number of columns.
    pub columns: usize,
}

impl GridSize {
    pub(crate) fn from_struct(config: &Struct) -> Option<Self> {
        let size = config.child("init_size")?;
        Some(Self {
            rows: size.usize("rows")?,
            columns: size.usize("columns")?,
        })
    }
}

pub(crate) fn fields() -> Vec<FieldProcessor> {
    vec![
        strict("selector"),
        executor_field(),
        key_handler_field("on_escape"),
        defaulted("cycles", Value::Bool(true)),
        defaulted("capture_tab", Value::Bool(false)),
        option_obj_of("init_size", vec![strict("rows"), strict("columns")]),
    ]
}

/// Config of the `flatgrid` mode.
#[derive(Clone, Debug)]
pub struct FlatGridConfig {
    /// Selects the cells.
    pub selector: String,
    /// Runs the current cell on Enter and Space.
    pub execute: Executor,
    /// Escape.
    pub on_escape: Option<KeyHandler>,
    /// Wrap at the grid edges.
    pub wrap: WrapMode,
    /// Swallow Tab so focus stays in the grid.
    pub capture_tab: bool,
}

impl FlatGridConfig {
    pub(crate) fn from_struct(config: &Struct) -> Self {
        Self {
            selector: config.str("selector").unwrap_or_default().to_owned(),
            execute: executor(config),
            on_escape: key_handler(config, "on_escape"),
            wrap: WrapMode::from_cycles(config.bool_or("cycles", true)),
            capture_tab: config.bool_or("capture_tab", false),
        }
    }
}

pub(crate) fn focus_in(
    config: &FlatGridConfig,
    focus: &dyn FocusManager,
    system: &mut System,
    component: ComponentId,
) {
    focus_first(focus, system, component, &config.selector);
}

fn go(
    config: Rc<FlatGridConfig>,
    focus: Rc<dyn FocusManager>,
    heading: Heading,
) -> impl Fn(&mut System, ComponentId, &SimulatedEvent) -> Option<bool> + 'static {
    move |system, component, _| {
        let size = system.state_of::<KeyingState>(component, KEYING)?.grid_size()?;
        let focused = focus.get(system, component)?;
        let doc = system.doc();
        let found = locate_visible(doc, component.element(), &config.selector, focused)?;
        let len = found.candidates.len().min(size.rows * size.columns);
        let step = heading.step(doc.direction(focused));
        let next = if heading.is_horizontal() {
            grid_horizontal(len, size.columns, found.index, config.wrap, step)
        } else {
            grid_vertical(len, size.columns, found.index, config.wrap, step)
        }?;
        let target = found.candidates[next];
        move_to(&*focus, system, component, target)
    }
}

pub(crate) fn rules(config: &Rc<FlatGridConfig>, focus: &Rc<dyn FocusManager>) -> Vec<Rule> {
    let mut rules = vec![
        Rule::new(
            KeyMatcher::in_set(&[LEFT]),
            go(config.clone(), focus.clone(), Heading::West),
        ),
        Rule::new(
            KeyMatcher::in_set(&[RIGHT]),
            go(config.clone(), focus.clone(), Heading::East),
        ),
        Rule::new(
            KeyMatcher::in_set(&[UP]),
            go(config.clone(), focus.clone(), Heading::Up),
        ),
        Rule::new(
            KeyMatcher::in_set(&[DOWN]),
            go(config.clone(), focus.clone(), Heading::Down),
        ),
        Rule::new(
            KeyMatcher::in_set(&[SPACE, ENTER]),
            execute_current(config.execute.clone(), focus.clone()),
        ),
        Rule::new(
            KeyMatcher::in_set(&[ESCAPE]),
            delegate(config.on_escape.clone()),
        ),
    ];
    if config.capture_tab {
        rules.push(Rule::new(KeyMatcher::in_set(&[TAB]), |_, _, _| Some(true)));
    }
    rules
}

pub(crate) fn keyup_rules() -> Vec<Rule> {
    space_keyup()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modes::testing::{container, press};

    fn grid(cycles: bool, init: Option<(usize, usize)>) -> Value {
        let mut entries = vec![
            ("mode", Value::from("flatgrid")),
            ("selector", Value::from(".item")),
            ("cycles", Value::Bool(cycles)),
            ("capture_tab", Value::Bool(true)),
        ];
        if let Some((rows, columns)) = init {
            entries.push((
                "init_size",
                Value::object([("rows", Value::from(rows)), ("columns", Value::from(columns))]),
            ));
        }
        Value::object(entries)
    }

    #[test]
    fn moves_need_a_grid_size() {
        let mut system = System::default();
        let (c, items) = container(&mut system, 6, grid(true, None));
        crate::focus_in(&mut system, c);
        assert!(!press(&mut system, RIGHT));
        crate::set_grid_size(&mut system, c, 2, 3);
        assert_eq!(crate::grid_size(&system, c), Some(GridSize { rows: 2, columns: 3 }));
        assert!(press(&mut system, DOWN));
        assert_eq!(system.doc().focused(), Some(items[3]));
        assert!(press(&mut system, LEFT));
        assert_eq!(system.doc().focused(), Some(items[5]));
        assert!(press(&mut system, TAB), "tab is captured");
    }

    #[test]
    fn edges_fail_without_cycling() {
        let mut system = System::default();
        let (c, items) = container(&mut system, 4, grid(false, Some((2, 2))));
        crate::focus_in(&mut system, c);
        assert!(!press(&mut system, UP));
        assert!(!press(&mut system, LEFT));
        assert!(press(&mut system, RIGHT));
        assert!(press(&mut system, DOWN));
        assert_eq!(system.doc().focused(), Some(items[3]));
        assert!(!press(&mut system, DOWN));
        assert_eq!(system.doc().focused(), Some(items[3]));
    }
}
