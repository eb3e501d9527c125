//! Structural table editing over a virtual grid.
//!
//! Row and column spans make the real cell lists of a table lie about
//! its geometry, so every edit first expands the table into a logical
//! grid: one entry per (row, column) coordinate, with spanned
//! coordinates filled by *virtual* entries pointing back at their real
//! base cell. The grid then yields an ordered action list (one action
//! per swept coordinate) that the edit applies to the real tree.
//!
//! All entry points resolve their target cell from a [`Range`]; a range
//! that is not inside a table cell makes the operation a no-op.

use std::collections::HashMap;

use crate::dom::{Dom, NodeId};
use crate::editing::range::Range;

/// Sweep axis of a table edit: `Row` edits sweep the columns of the
/// target row, `Column` edits sweep the rows of the target column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridAxis {
    Row,
    Column,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridRequest {
    Add,
    Delete,
}

/// Per-cell action computed from the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellAction {
    /// Nothing to do at this coordinate.
    Ignore,
    /// Shrink the base cell's span by one.
    SubtractSpanCount,
    /// Remove the base cell from its row.
    RemoveCell,
    /// Materialize a new cell (or, for delete-row, relocate the base
    /// cell into the next row).
    AddCell,
    /// Grow the base cell's span by one.
    SumSpanCount,
}

#[derive(Debug, Clone, Copy)]
struct GridCell {
    base_cell: NodeId,
    is_row_span: bool,
    is_col_span: bool,
    is_virtual: bool,
}

/// One entry of the ordered action list.
#[derive(Debug, Clone, Copy)]
pub struct ActionCell {
    pub base_cell: NodeId,
    pub action: CellAction,
    pub row: usize,
    pub col: usize,
}

/// Logical grid of a table with spans expanded.
pub struct VirtualTable {
    grid: HashMap<(usize, usize), GridCell>,
    start_row: usize,
    start_col: usize,
    axis: GridAxis,
    request: GridRequest,
}

impl VirtualTable {
    /// Expands `table` into a grid, tracking the grid coordinate of
    /// `start_cell` as span expansion shifts it to the right.
    pub fn build(
        dom: &Dom,
        start_cell: NodeId,
        axis: GridAxis,
        request: GridRequest,
        table: NodeId,
    ) -> Self {
        let rows = table_rows(dom, table);
        let mut vt = VirtualTable {
            grid: HashMap::new(),
            start_row: 0,
            start_col: 0,
            axis,
            request,
        };
        if dom.is_cell(start_cell) {
            vt.start_col = cell_index(dom, start_cell);
            if let Some(row) = dom.parent(start_cell) {
                vt.start_row = rows.iter().position(|&r| r == row).unwrap_or(0);
            }
        }
        for (row_index, &row) in rows.iter().enumerate() {
            let cells: Vec<NodeId> = dom
                .children(row)
                .iter()
                .copied()
                .filter(|&c| dom.is_cell(c))
                .collect();
            for (real_index, &cell) in cells.iter().enumerate() {
                vt.add_cell(dom, row_index, cell, real_index);
            }
        }
        vt
    }

    /// Grid coordinate of the start cell after span adjustment.
    pub fn start_point(&self) -> (usize, usize) {
        (self.start_row, self.start_col)
    }

    /// First free column at or after `col` in `row`.
    fn recover_cell_index(&self, row: usize, mut col: usize) -> usize {
        while self.grid.contains_key(&(row, col)) {
            col += 1;
        }
        col
    }

    /// Bump the tracked start column when a span expansion occupies a
    /// coordinate at or left of it on the start row.
    fn adjust_start_point(&mut self, row: usize, col: usize, real_index: usize, is_selected: bool) {
        if row == self.start_row && self.start_col >= col && real_index <= col && !is_selected {
            self.start_col += 1;
        }
    }

    fn add_cell(&mut self, dom: &Dom, row_index: usize, cell: NodeId, real_index: usize) {
        let col = self.recover_cell_index(row_index, real_index);
        let rowspan = span(dom, cell, "rowspan");
        let colspan = span(dom, cell, "colspan");
        let is_selected = row_index == self.start_row && real_index == self.start_col;

        self.grid.insert(
            (row_index, col),
            GridCell {
                base_cell: cell,
                is_row_span: rowspan > 1,
                is_col_span: colspan > 1,
                is_virtual: false,
            },
        );
        for rp in 1..rowspan {
            let r = row_index + rp;
            self.adjust_start_point(r, col, real_index, is_selected);
            self.grid.insert(
                (r, col),
                GridCell {
                    base_cell: cell,
                    is_row_span: true,
                    is_col_span: colspan > 1,
                    is_virtual: true,
                },
            );
        }
        for cp in 1..colspan {
            let c = self.recover_cell_index(row_index, col + cp);
            self.adjust_start_point(row_index, c, real_index, is_selected);
            self.grid.insert(
                (row_index, c),
                GridCell {
                    base_cell: cell,
                    is_row_span: rowspan > 1,
                    is_col_span: true,
                    is_virtual: true,
                },
            );
        }
    }

    /// Sweeps the grid along the request axis from the start coordinate
    /// and classifies each touched cell. The sweep stops at the first
    /// missing coordinate.
    pub fn action_list(&self) -> Vec<ActionCell> {
        let mut list = Vec::new();
        let mut pos = 0;
        loop {
            let row = if self.axis == GridAxis::Row {
                self.start_row
            } else {
                pos
            };
            let col = if self.axis == GridAxis::Column {
                self.start_col
            } else {
                pos
            };
            let Some(cell) = self.grid.get(&(row, col)) else {
                return list;
            };
            let action = match self.request {
                GridRequest::Add => self.add_action(cell),
                GridRequest::Delete => self.delete_action(cell),
            };
            list.push(ActionCell {
                base_cell: cell.base_cell,
                action,
                row,
                col,
            });
            pos += 1;
        }
    }

    fn add_action(&self, cell: &GridCell) -> CellAction {
        match self.axis {
            GridAxis::Column => {
                if cell.is_col_span {
                    return CellAction::SumSpanCount;
                }
                if cell.is_row_span && cell.is_virtual {
                    return CellAction::Ignore;
                }
            }
            GridAxis::Row => {
                if cell.is_row_span {
                    return CellAction::SumSpanCount;
                }
                if cell.is_col_span && cell.is_virtual {
                    return CellAction::Ignore;
                }
            }
        }
        CellAction::AddCell
    }

    fn delete_action(&self, cell: &GridCell) -> CellAction {
        match self.axis {
            GridAxis::Column => {
                if cell.is_col_span {
                    return CellAction::SubtractSpanCount;
                }
            }
            GridAxis::Row => {
                if !cell.is_virtual && cell.is_row_span {
                    return CellAction::AddCell;
                }
                if cell.is_row_span {
                    return CellAction::SubtractSpanCount;
                }
            }
        }
        CellAction::RemoveCell
    }

    /// Number of real cells of `row` anchored left of grid column `col`.
    fn real_cell_position(&self, row: usize, col: usize) -> usize {
        (0..col)
            .filter(|&c| self.grid.get(&(row, c)).is_some_and(|gc| !gc.is_virtual))
            .count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowPos {
    Top,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColPos {
    Left,
    Right,
}

/// Inserts a row above or below the row holding the range.
pub fn add_row(dom: &mut Dom, rng: &Range, position: RowPos) {
    let Some((cell, tr, table)) = target_cell(dom, rng) else {
        log::debug!("add_row: range is not inside a table cell");
        return;
    };
    let vt = VirtualTable::build(dom, cell, GridAxis::Row, GridRequest::Add, table);
    let actions = vt.action_list();

    let rows = table_rows(dom, table);
    let current_row_index = rows.iter().position(|&r| r == tr).unwrap_or(0);

    let new_tr = dom.clone_shallow(tr);
    dom.remove_attr(new_tr, "id");

    for action in &actions {
        match action.action {
            CellAction::AddCell => {
                let new_cell = blank_cell_like(dom, action.base_cell);
                dom.append_child(new_tr, new_cell).ok();
            }
            CellAction::SumSpanCount => {
                if position == RowPos::Top {
                    let base_row = dom.ancestor(action.base_cell, |d, n| d.is_row(n));
                    let base_row_index = base_row
                        .and_then(|r| rows.iter().position(|&x| x == r))
                        .unwrap_or(0);
                    if base_row_index <= current_row_index {
                        let new_cell = blank_cell_like(dom, action.base_cell);
                        dom.remove_attr(new_cell, "rowspan");
                        dom.append_child(new_tr, new_cell).ok();
                        continue;
                    }
                }
                let rowspan = span(dom, action.base_cell, "rowspan") + 1;
                set_span(dom, action.base_cell, "rowspan", rowspan);
            }
            _ => {}
        }
    }

    match position {
        RowPos::Top => {
            dom.insert_before(new_tr, tr).ok();
        }
        RowPos::Bottom => {
            // a rowspanned target covers later rows: the new row goes
            // after the last covered one (the span was already grown)
            let rowspan = span(dom, cell, "rowspan");
            let after = if rowspan > 1 {
                rows.get(current_row_index + rowspan - 2).copied().unwrap_or(tr)
            } else {
                tr
            };
            dom.insert_after(new_tr, after).ok();
        }
    }
    log::debug!("add_row: {position:?} of row {current_row_index}");
}

/// Inserts a column left or right of the column holding the range.
pub fn add_col(dom: &mut Dom, rng: &Range, position: ColPos) {
    let Some((cell, _, table)) = target_cell(dom, rng) else {
        log::debug!("add_col: range is not inside a table cell");
        return;
    };
    let vt = VirtualTable::build(dom, cell, GridAxis::Column, GridRequest::Add, table);

    for action in vt.action_list() {
        match action.action {
            CellAction::AddCell => {
                let new_cell = blank_cell_like(dom, action.base_cell);
                match position {
                    ColPos::Right => dom.insert_after(new_cell, action.base_cell).ok(),
                    ColPos::Left => dom.insert_before(new_cell, action.base_cell).ok(),
                };
            }
            CellAction::SumSpanCount => match position {
                ColPos::Right => {
                    let colspan = span(dom, action.base_cell, "colspan") + 1;
                    set_span(dom, action.base_cell, "colspan", colspan);
                }
                ColPos::Left => {
                    let new_cell = blank_cell_like(dom, action.base_cell);
                    dom.insert_before(new_cell, action.base_cell).ok();
                }
            },
            _ => {}
        }
    }
    log::debug!("add_col: {position:?} of column {}", vt.start_point().1);
}

/// Removes the row holding the range. Cells anchored in the removed row
/// that span further down are relocated into the next row with their
/// content intact and their span shrunk; spans reaching into the row
/// from above are shrunk in place.
pub fn delete_row(dom: &mut Dom, rng: &Range) {
    let Some((cell, tr, table)) = target_cell(dom, rng) else {
        log::debug!("delete_row: range is not inside a table cell");
        return;
    };
    let rows = table_rows(dom, table);
    let row_pos = rows.iter().position(|&r| r == tr).unwrap_or(0);
    let next_row = rows.get(row_pos + 1).copied();

    let vt = VirtualTable::build(dom, cell, GridAxis::Row, GridRequest::Delete, table);
    for action in vt.action_list() {
        let base = action.base_cell;
        let rowspan = span(dom, base, "rowspan");
        match action.action {
            CellAction::AddCell => {
                let Some(next) = next_row else {
                    continue;
                };
                if rowspan > 1 {
                    let insert_at = vt.real_cell_position(row_pos + 1, action.col);
                    let next_cells: Vec<NodeId> = dom
                        .children(next)
                        .iter()
                        .copied()
                        .filter(|&c| dom.is_cell(c))
                        .collect();
                    match next_cells.get(insert_at) {
                        Some(&reference) => {
                            dom.insert_before(base, reference).ok();
                        }
                        None => {
                            dom.append_child(next, base).ok();
                        }
                    }
                    set_span(dom, base, "rowspan", rowspan - 1);
                }
            }
            CellAction::SubtractSpanCount => {
                if rowspan > 1 {
                    set_span(dom, base, "rowspan", rowspan - 1);
                }
            }
            _ => {}
        }
    }
    dom.remove(tr, true);
    log::debug!("delete_row: row {row_pos}");
}

/// Removes the column holding the range. Colspans across it shrink by
/// one; other cells in the column are removed outright.
pub fn delete_col(dom: &mut Dom, rng: &Range) {
    let Some((cell, _, table)) = target_cell(dom, rng) else {
        log::debug!("delete_col: range is not inside a table cell");
        return;
    };
    let vt = VirtualTable::build(dom, cell, GridAxis::Column, GridRequest::Delete, table);
    for action in vt.action_list() {
        match action.action {
            CellAction::SubtractSpanCount => {
                let colspan = span(dom, action.base_cell, "colspan");
                if colspan > 1 {
                    set_span(dom, action.base_cell, "colspan", colspan - 1);
                }
            }
            CellAction::RemoveCell => {
                dom.remove(action.base_cell, true);
            }
            _ => {}
        }
    }
    log::debug!("delete_col: column {}", vt.start_point().1);
}

/// Removes the whole table holding the range.
pub fn delete_table(dom: &mut Dom, rng: &Range) {
    let Some((_, _, table)) = target_cell(dom, rng) else {
        log::debug!("delete_table: range is not inside a table cell");
        return;
    };
    dom.remove(table, true);
    log::debug!("delete_table: removed");
}

fn target_cell(dom: &Dom, rng: &Range) -> Option<(NodeId, NodeId, NodeId)> {
    let anchor = rng.common_ancestor(dom).unwrap_or(rng.start.node);
    let cell = dom.ancestor(anchor, |d, n| d.is_cell(n))?;
    let tr = dom.ancestor(cell, |d, n| d.is_row(n))?;
    let table = dom.ancestor(tr, |d, n| d.is_table(n))?;
    Some((cell, tr, table))
}

/// The `tr` rows of a table in document order, looking through the
/// section wrappers.
fn table_rows(dom: &Dom, table: NodeId) -> Vec<NodeId> {
    let mut rows = Vec::new();
    for &child in dom.children(table) {
        if dom.is_row(child) {
            rows.push(child);
        } else if matches!(dom.tag(child), Some("thead") | Some("tbody") | Some("tfoot")) {
            rows.extend(dom.children(child).iter().copied().filter(|&c| dom.is_row(c)));
        }
    }
    rows
}

/// Real index of `cell` among the cell children of its row.
fn cell_index(dom: &Dom, cell: NodeId) -> usize {
    let Some(row) = dom.parent(cell) else {
        return 0;
    };
    dom.children(row)
        .iter()
        .copied()
        .filter(|&c| dom.is_cell(c))
        .position(|c| c == cell)
        .unwrap_or(0)
}

/// Span attribute value, defaulting to 1 for absent or unparsable input.
fn span(dom: &Dom, cell: NodeId, name: &str) -> usize {
    dom.attr(cell, name)
        .and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|&n| n >= 1)
        .unwrap_or(1)
}

/// A span of 1 carries no attribute.
fn set_span(dom: &mut Dom, cell: NodeId, name: &str, value: usize) {
    if value >= 2 {
        dom.set_attr(cell, name, &value.to_string());
    } else {
        dom.remove_attr(cell, name);
    }
}

/// New blank cell modeled on `base`: same tag and attributes (minus
/// `id`), padded so it stays cursor-addressable.
fn blank_cell_like(dom: &mut Dom, base: NodeId) -> NodeId {
    let cell = dom.clone_shallow(base);
    dom.clear_children(cell);
    dom.remove_attr(cell, "id");
    dom.pad_blank_html(cell);
    cell
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::point::Point;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn cell_range(dom: &Dom, table_path: &[usize]) -> Range {
        let mut node = dom.root();
        for &i in table_path {
            node = dom.child(node, i).unwrap();
        }
        Range::collapsed(Point::new(node, 0))
    }

    #[test]
    fn grid_expands_spans_and_bumps_the_start_cell() {
        // A spans two rows; C is the only real cell of row 1
        let dom = Dom::from_html(
            "<table><tr><td rowspan=\"2\">A</td><td>B</td></tr><tr><td>C</td></tr></table>",
        );
        let table = dom.first_child(dom.root()).unwrap();
        let tr2 = dom.last_child(table).unwrap();
        let c = dom.first_child(tr2).unwrap();
        let vt = VirtualTable::build(&dom, c, GridAxis::Row, GridRequest::Add, table);
        // C's real index is 0, but its grid column is 1
        assert_eq!(vt.start_point(), (1, 1));
        let actions = vt.action_list();
        let kinds: Vec<CellAction> = actions.iter().map(|a| a.action).collect();
        assert_eq!(kinds, vec![CellAction::SumSpanCount, CellAction::AddCell]);
    }

    #[test]
    fn add_row_bottom_grows_spans_and_adds_one_cell() {
        let mut dom = Dom::from_html(
            "<table><tr><td rowspan=\"2\">A</td><td>B</td></tr><tr><td>C</td></tr></table>",
        );
        // caret inside C
        let rng = cell_range(&dom, &[0, 1, 0]);
        add_row(&mut dom, &rng, RowPos::Bottom);
        assert_eq!(
            dom.inner_html(dom.root()),
            "<table><tr><td rowspan=\"3\">A</td><td>B</td></tr><tr><td>C</td></tr>\
             <tr><td><br></td></tr></table>"
        );
    }

    #[test]
    fn add_row_bottom_of_a_spanned_target_lands_after_its_extent() {
        let mut dom = Dom::from_html(
            "<table><tr><td rowspan=\"2\">A</td><td>B</td></tr><tr><td>C</td></tr></table>",
        );
        // caret inside A: its span grows over the new row, which lands
        // after the last covered row and needs only one cell
        let rng = cell_range(&dom, &[0, 0, 0]);
        add_row(&mut dom, &rng, RowPos::Bottom);
        assert_eq!(
            dom.inner_html(dom.root()),
            "<table><tr><td rowspan=\"3\">A</td><td>B</td></tr><tr><td>C</td></tr>\
             <tr><td><br></td></tr></table>"
        );
    }

    #[test]
    fn add_row_top_inserts_plain_cells() {
        let mut dom = Dom::from_html(
            "<table><tr><td rowspan=\"2\">A</td><td>B</td></tr><tr><td>C</td></tr></table>",
        );
        let rng = cell_range(&dom, &[0, 1, 0]);
        add_row(&mut dom, &rng, RowPos::Top);
        assert_eq!(
            dom.inner_html(dom.root()),
            "<table><tr><td rowspan=\"2\">A</td><td>B</td></tr>\
             <tr><td><br></td><td><br></td></tr><tr><td>C</td></tr></table>"
        );
    }

    #[rstest]
    #[case(ColPos::Right, "<table><tr><td>A</td><td><br></td><td>B</td></tr></table>")]
    #[case(ColPos::Left, "<table><tr><td><br></td><td>A</td><td>B</td></tr></table>")]
    fn add_col_inserts_next_to_the_target(#[case] position: ColPos, #[case] expected: &str) {
        let mut dom = Dom::from_html("<table><tr><td>A</td><td>B</td></tr></table>");
        let rng = cell_range(&dom, &[0, 0, 0]);
        add_col(&mut dom, &rng, position);
        assert_eq!(dom.inner_html(dom.root()), expected);
    }

    #[test]
    fn add_col_right_grows_a_colspan() {
        let mut dom = Dom::from_html(
            "<table><tr><td colspan=\"2\">A</td></tr><tr><td>B</td><td>C</td></tr></table>",
        );
        // caret inside A; adding right of its first covered column
        let rng = cell_range(&dom, &[0, 0, 0]);
        add_col(&mut dom, &rng, ColPos::Right);
        assert_eq!(
            dom.inner_html(dom.root()),
            "<table><tr><td colspan=\"3\">A</td></tr>\
             <tr><td>B</td><td><br></td><td>C</td></tr></table>"
        );
    }

    #[test]
    fn delete_row_relocates_spanned_cells_with_content() {
        let mut dom = Dom::from_html(
            "<table><tr><td rowspan=\"2\">A</td><td>B</td></tr><tr><td>C</td></tr></table>",
        );
        // caret inside A; deleting its anchor row
        let rng = cell_range(&dom, &[0, 0, 0]);
        delete_row(&mut dom, &rng);
        assert_eq!(
            dom.inner_html(dom.root()),
            "<table><tr><td>A</td><td>C</td></tr></table>"
        );
    }

    #[test]
    fn delete_row_shrinks_spans_reaching_into_it() {
        let mut dom = Dom::from_html(
            "<table><tr><td rowspan=\"2\">A</td><td>B</td></tr><tr><td>C</td></tr></table>",
        );
        // caret inside C: the deleted row only receives A's span
        let rng = cell_range(&dom, &[0, 1, 0]);
        delete_row(&mut dom, &rng);
        assert_eq!(
            dom.inner_html(dom.root()),
            "<table><tr><td>A</td><td>B</td></tr></table>"
        );
    }

    #[test]
    fn delete_col_shrinks_colspans_and_removes_cells() {
        let mut dom = Dom::from_html(
            "<table><tr><td colspan=\"2\">A</td></tr><tr><td>B</td><td>C</td></tr></table>",
        );
        // caret inside B: first column
        let rng = cell_range(&dom, &[0, 1, 0]);
        delete_col(&mut dom, &rng);
        assert_eq!(
            dom.inner_html(dom.root()),
            "<table><tr><td>A</td></tr><tr><td>C</td></tr></table>"
        );
    }

    #[test]
    fn delete_table_removes_the_whole_table() {
        let mut dom = Dom::from_html("<p>x</p><table><tr><td>A</td></tr></table>");
        let rng = cell_range(&dom, &[1, 0, 0]);
        delete_table(&mut dom, &rng);
        assert_eq!(dom.inner_html(dom.root()), "<p>x</p>");
    }

    #[test]
    fn table_ops_outside_a_cell_are_no_ops() {
        let mut dom = Dom::from_html("<p>x</p>");
        let p = dom.first_child(dom.root()).unwrap();
        let rng = Range::collapsed(Point::new(p, 0));
        add_row(&mut dom, &rng, RowPos::Bottom);
        delete_col(&mut dom, &rng);
        assert_eq!(dom.inner_html(dom.root()), "<p>x</p>");
    }
}
