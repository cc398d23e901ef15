// Copyright 2025 the Alloy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `matrix`: explicit rows of cells, which need not be the same length.

use std::rc::Rc;

use alloy_component::{ComponentId, SimulatedEvent, System};
use alloy_dom::ElementId;
use alloy_schema::field::{defaulted, option_of, strict, strict_obj_of};
use alloy_schema::{FieldProcessor, Struct, Value, handle_of};

use super::{Heading, execute_current, executor, executor_field, move_to};
use crate::callbacks::{ElementFinder, Executor};
use crate::focus_manager::FocusManager;
use crate::keys::{DOWN, ENTER, KeyMatcher, LEFT, RIGHT, SPACE, UP};
use crate::navigation::{WrapMode, matrix_horizontal, matrix_vertical};
use crate::rules::Rule;

pub(crate) fn fields() -> Vec<FieldProcessor> {
    vec![
        strict_obj_of("selectors", vec![strict("row"), strict("cell")]),
        defaulted("cycles", Value::Bool(true)),
        option_of("previous_selector", handle_of::<ElementFinder>()),
        executor_field(),
    ]
}

/// Config of the `matrix` mode.
#[derive(Clone, Debug)]
pub struct MatrixConfig {
    /// Selects the rows inside the component.
    pub row: String,
    /// Selects the cells inside a row.
    pub cell: String,
    /// Wrap at the edges. Vertical moves clamp the column either way.
    pub wrap: WrapMode,
    /// The cell to restore on focus-in; defaults to the first cell.
    pub previous_selector: Option<ElementFinder>,
    /// Runs the current cell on Enter and Space.
    pub execute: Executor,
}

impl MatrixConfig {
    pub(crate) fn from_struct(config: &Struct) -> Self {
        let selectors = config.child("selectors");
        let selector = |key| {
            selectors
                .as_ref()
                .and_then(|s| s.str(key))
                .unwrap_or_default()
                .to_owned()
        };
        Self {
            row: selector("row"),
            cell: selector("cell"),
            wrap: WrapMode::from_cycles(config.bool_or("cycles", true)),
            previous_selector: config.handle::<ElementFinder>("previous_selector").cloned(),
            execute: executor(config),
        }
    }

    fn cells(&self, system: &System, component: ComponentId) -> Vec<Vec<ElementId>> {
        let doc = system.doc();
        doc.descendants(component.element(), &self.row)
            .into_iter()
            .map(|row| doc.descendants(row, &self.cell))
            .collect()
    }
}

pub(crate) fn focus_in(
    config: &MatrixConfig,
    focus: &dyn FocusManager,
    system: &mut System,
    component: ComponentId,
) {
    let target = config
        .previous_selector
        .as_ref()
        .and_then(|f| f.call(system, component))
        .or_else(|| system.doc().descendant(component.element(), &config.cell));
    if let Some(cell) = target {
        focus.set(system, component, cell);
    }
}

fn go(
    config: Rc<MatrixConfig>,
    focus: Rc<dyn FocusManager>,
    heading: Heading,
) -> impl Fn(&mut System, ComponentId, &SimulatedEvent) -> Option<bool> + 'static {
    move |system, component, _| {
        let focused = focus.get(system, component)?;
        let matrix = config.cells(system, component);
        let position = matrix.iter().enumerate().find_map(|(r, row)| {
            row.iter()
                .position(|cell| *cell == focused || system.doc().is_ancestor(*cell, focused))
                .map(|c| (r, c))
        })?;
        let lens: Vec<usize> = matrix.iter().map(Vec::len).collect();
        let step = heading.step(system.doc().direction(focused));
        let (r, c) = if heading.is_horizontal() {
            matrix_horizontal(&lens, position, config.wrap, step)
        } else {
            matrix_vertical(&lens, position, config.wrap, step)
        }?;
        let target = matrix[r][c];
        move_to(&*focus, system, component, target)
    }
}

pub(crate) fn rules(config: &Rc<MatrixConfig>, focus: &Rc<dyn FocusManager>) -> Vec<Rule> {
    vec![
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
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keying::keying;
    use crate::modes::testing::press;
    use alloy_component::ComponentSpec;

    /// Rows of 3, 1 and 2 cells.
    fn table(system: &mut System, cycles: bool) -> (ComponentId, Vec<Vec<ElementId>>) {
        let config = Value::object([
            ("mode", Value::from("matrix")),
            (
                "selectors",
                Value::object([("row", Value::from(".row")), ("cell", Value::from(".cell"))]),
            ),
            ("cycles", Value::Bool(cycles)),
        ]);
        let c = system
            .build(ComponentSpec::new("table").with(&keying(), config))
            .unwrap();
        system.attach_to_body(c).unwrap();
        let doc = system.doc_mut();
        let cells = [3, 1, 2]
            .into_iter()
            .map(|n| {
                let row = doc.create_element("tr");
                doc.add_class(row, "row");
                doc.append_child(c.element(), row);
                (0..n)
                    .map(|_| {
                        let cell = doc.create_element("td");
                        doc.add_class(cell, "cell");
                        doc.append_child(row, cell);
                        cell
                    })
                    .collect::<Vec<_>>()
            })
            .collect();
        (c, cells)
    }

    #[test]
    fn vertical_moves_clamp_to_shorter_rows() {
        let mut system = System::default();
        let (c, cells) = table(&mut system, false);
        crate::focus_in(&mut system, c);
        assert_eq!(system.doc().focused(), Some(cells[0][0]));
        press(&mut system, RIGHT);
        press(&mut system, RIGHT);
        assert!(!press(&mut system, RIGHT));
        assert!(press(&mut system, DOWN));
        assert_eq!(system.doc().focused(), Some(cells[1][0]));
        assert!(press(&mut system, DOWN));
        assert_eq!(system.doc().focused(), Some(cells[2][0]));
        assert!(!press(&mut system, DOWN));
    }

    #[test]
    fn cycling_wraps_rows_and_cells() {
        let mut system = System::default();
        let (c, cells) = table(&mut system, true);
        crate::focus_in(&mut system, c);
        assert!(press(&mut system, UP));
        assert_eq!(system.doc().focused(), Some(cells[2][0]));
        assert!(press(&mut system, LEFT));
        assert_eq!(system.doc().focused(), Some(cells[2][1]));
    }
}
