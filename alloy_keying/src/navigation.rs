// Copyright 2025 the Alloy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Index arithmetic for moving through sequences, flat grids and ragged
//! matrices, plus the DOM lookup that turns a focused element into an index.

use alloy_dom::{Direction, Document, ElementId};

/// Behaviour at the edge of a sequence.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum WrapMode {
    /// Wrap around to the other end.
    #[default]
    Cycle,
    /// Stay put; moving past the edge yields no candidate.
    Never,
}

impl WrapMode {
    /// [`Cycle`](Self::Cycle) if `cycles`, else [`Never`](Self::Never).
    pub fn from_cycles(cycles: bool) -> Self {
        if cycles { Self::Cycle } else { Self::Never }
    }
}

/// Direction of travel along a sequence.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Step {
    /// Towards higher indices.
    Forward,
    /// Towards lower indices.
    Backward,
}

impl Step {
    /// The step that moves visually left in `direction`.
    pub fn west(direction: Direction) -> Self {
        match direction {
            Direction::Ltr => Self::Backward,
            Direction::Rtl => Self::Forward,
        }
    }

    /// The step that moves visually right in `direction`.
    pub fn east(direction: Direction) -> Self {
        match direction {
            Direction::Ltr => Self::Forward,
            Direction::Rtl => Self::Backward,
        }
    }
}

/// The index after `origin` in a sequence of `len` items.
pub fn next_index(len: usize, origin: usize, wrap: WrapMode, step: Step) -> Option<usize> {
    if origin >= len {
        return None;
    }
    match step {
        Step::Forward if origin + 1 < len => Some(origin + 1),
        Step::Backward if origin > 0 => Some(origin - 1),
        _ if wrap == WrapMode::Never => None,
        Step::Forward => Some(0),
        Step::Backward => Some(len - 1),
    }
}

/// Like [`next_index`], skipping indices `accept` rejects. Never returns
/// `origin` itself.
pub fn next_matching(
    len: usize,
    origin: usize,
    wrap: WrapMode,
    step: Step,
    accept: impl Fn(usize) -> bool,
) -> Option<usize> {
    let mut i = origin;
    for _ in 1..len {
        i = next_index(len, i, wrap, step)?;
        if i == origin {
            return None;
        }
        if accept(i) {
            return Some(i);
        }
    }
    None
}

/// Move along the row of a row-major grid of `len` items, `columns` wide.
/// The last row may be short.
pub fn grid_horizontal(
    len: usize,
    columns: usize,
    origin: usize,
    wrap: WrapMode,
    step: Step,
) -> Option<usize> {
    if columns == 0 || origin >= len {
        return None;
    }
    let row_start = origin / columns * columns;
    let row_len = columns.min(len - row_start);
    next_index(row_len, origin - row_start, wrap, step).map(|c| row_start + c)
}

/// Move along the column of a row-major grid of `len` items, `columns` wide.
/// Columns past the end of a short last row have one row fewer.
pub fn grid_vertical(
    len: usize,
    columns: usize,
    origin: usize,
    wrap: WrapMode,
    step: Step,
) -> Option<usize> {
    if columns == 0 || origin >= len {
        return None;
    }
    let column = origin % columns;
    let rows_in_column = (len - column).div_ceil(columns);
    next_index(rows_in_column, origin / columns, wrap, step).map(|r| r * columns + column)
}

/// Move within a row of a ragged matrix whose rows have `row_lens` cells.
pub fn matrix_horizontal(
    row_lens: &[usize],
    (row, column): (usize, usize),
    wrap: WrapMode,
    step: Step,
) -> Option<(usize, usize)> {
    let len = *row_lens.get(row)?;
    next_index(len, column, wrap, step).map(|c| (row, c))
}

/// Move to the previous or next row of a ragged matrix. The column is clamped
/// to the length of the new row.
pub fn matrix_vertical(
    row_lens: &[usize],
    (row, column): (usize, usize),
    wrap: WrapMode,
    step: Step,
) -> Option<(usize, usize)> {
    let next_row = next_index(row_lens.len(), row, wrap, step)?;
    let len = row_lens[next_row];
    (len > 0).then(|| (next_row, column.min(len - 1)))
}

/// The visible candidates matching `selector` inside `container`, and the
/// position of the candidate holding `focused`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Located {
    /// Visible candidates in document order.
    pub candidates: Vec<ElementId>,
    /// Index of the current candidate.
    pub index: usize,
}

/// Find the candidate `focused` sits in.
pub fn locate_visible(
    doc: &Document,
    container: ElementId,
    selector: &str,
    focused: ElementId,
) -> Option<Located> {
    let current = doc.closest(focused, selector, Some(container))?;
    let candidates: Vec<ElementId> = doc
        .descendants(container, selector)
        .into_iter()
        .filter(|c| doc.is_visible(*c))
        .collect();
    let index = candidates.iter().position(|c| *c == current)?;
    Some(Located { candidates, index })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_wraps_only_when_cycling() {
        assert_eq!(next_index(3, 2, WrapMode::Cycle, Step::Forward), Some(0));
        assert_eq!(next_index(3, 0, WrapMode::Cycle, Step::Backward), Some(2));
        assert_eq!(next_index(3, 2, WrapMode::Never, Step::Forward), None);
        assert_eq!(next_index(3, 0, WrapMode::Never, Step::Backward), None);
        assert_eq!(next_index(3, 1, WrapMode::Never, Step::Forward), Some(2));
        assert_eq!(next_index(0, 0, WrapMode::Cycle, Step::Forward), None);
    }

    #[test]
    fn matching_skips_rejected_and_never_returns_origin() {
        let accept = |i: usize| i != 1;
        assert_eq!(next_matching(4, 0, WrapMode::Cycle, Step::Forward, accept), Some(2));
        assert_eq!(next_matching(4, 2, WrapMode::Cycle, Step::Backward, accept), Some(0));
        assert_eq!(next_matching(2, 0, WrapMode::Never, Step::Forward, accept), None);
        assert_eq!(next_matching(3, 0, WrapMode::Cycle, Step::Forward, |_| false), None);
        assert_eq!(next_matching(1, 0, WrapMode::Cycle, Step::Forward, |_| true), None);
    }

    #[test]
    fn ragged_grid() {
        // 0 1 2
        // 3 4
        assert_eq!(grid_horizontal(5, 3, 4, WrapMode::Cycle, Step::Forward), Some(3));
        assert_eq!(grid_horizontal(5, 3, 2, WrapMode::Never, Step::Forward), None);
        assert_eq!(grid_vertical(5, 3, 1, WrapMode::Cycle, Step::Forward), Some(4));
        assert_eq!(grid_vertical(5, 3, 2, WrapMode::Cycle, Step::Forward), Some(2));
        assert_eq!(grid_vertical(5, 3, 4, WrapMode::Never, Step::Forward), None);
        assert_eq!(grid_vertical(5, 3, 0, WrapMode::Cycle, Step::Backward), Some(3));
    }

    #[test]
    fn matrix_clamps_column() {
        let rows = [3, 1, 2];
        assert_eq!(matrix_vertical(&rows, (0, 2), WrapMode::Never, Step::Forward), Some((1, 0)));
        assert_eq!(matrix_vertical(&rows, (2, 1), WrapMode::Cycle, Step::Forward), Some((0, 1)));
        assert_eq!(matrix_vertical(&rows, (0, 0), WrapMode::Never, Step::Backward), None);
        assert_eq!(matrix_horizontal(&rows, (2, 1), WrapMode::Cycle, Step::Forward), Some((2, 0)));
    }

    #[test]
    fn west_and_east_mirror_in_rtl() {
        assert_eq!(Step::west(Direction::Ltr), Step::Backward);
        assert_eq!(Step::west(Direction::Rtl), Step::Forward);
        assert_eq!(Step::east(Direction::Rtl), Step::Backward);
    }

    #[test]
    fn locate_skips_hidden_candidates() {
        let mut doc = Document::new();
        let list = doc.create_element("ul");
        doc.append_child(doc.body(), list);
        let mut items = Vec::new();
        for _ in 0..3 {
            let li = doc.create_element("li");
            doc.add_class(li, "item");
            doc.append_child(list, li);
            items.push(li);
        }
        doc.set_style(items[0], "display", "none");
        let inner = doc.create_element("span");
        doc.append_child(items[2], inner);

        let found = locate_visible(&doc, list, ".item", inner).unwrap();
        assert_eq!(found.candidates, vec![items[1], items[2]]);
        assert_eq!(found.index, 1);
        assert!(locate_visible(&doc, list, ".item", list).is_none());
    }
}
