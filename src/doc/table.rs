//! Table grid engine.
//!
//! Row/column edits, rectangular cell selection, cell merge/unmerge, and
//! per-cell presentation attributes. Merged regions are tracked with one
//! anchor cell carrying the combined spans and text, and covered cells that
//! back-reference the anchor's coordinates and render nothing.
//!
//! Invalid geometry requests (removing the last row or column, merging a
//! single cell, out-of-range indices) are no-ops rather than errors: there is
//! no caller-side recovery path that would make an error useful.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::Text;

/// Grid coordinates of a cell, also used as a merge anchor back-reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellRef {
    pub row: usize,
    pub col: usize,
}

impl CellRef {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// A normalized rectangle over the table's row/column index space:
/// `start_row <= end_row` and `start_col <= end_col`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellSelection {
    pub start_row: usize,
    pub start_col: usize,
    pub end_row: usize,
    pub end_col: usize,
}

impl CellSelection {
    /// Normalizes two arbitrary corner points into a rectangle.
    pub fn from_points(a: CellRef, b: CellRef) -> Self {
        Self {
            start_row: a.row.min(b.row),
            start_col: a.col.min(b.col),
            end_row: a.row.max(b.row),
            end_col: a.col.max(b.col),
        }
    }

    /// A selection is merge-eligible only when it spans more than one cell.
    pub fn is_multi_cell(&self) -> bool {
        self.start_row != self.end_row || self.start_col != self.end_col
    }

    pub fn contains(&self, row: usize, col: usize) -> bool {
        (self.start_row..=self.end_row).contains(&row)
            && (self.start_col..=self.end_col).contains(&col)
    }
}

fn default_span() -> usize {
    1
}

fn is_default_span(span: &usize) -> bool {
    *span == 1
}

fn is_false(flag: &bool) -> bool {
    !*flag
}

/// A single grid cell: text content plus presentation and merge bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableCell {
    #[serde(default)]
    pub children: Vec<Text>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align: Option<super::Align>,
    #[serde(default = "default_span", skip_serializing_if = "is_default_span")]
    pub col_span: usize,
    #[serde(default = "default_span", skip_serializing_if = "is_default_span")]
    pub row_span: usize,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_merged: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub merged_cells: Vec<CellRef>,
}

impl TableCell {
    pub fn empty() -> Self {
        Self {
            children: vec![Text::new("")],
            background_color: None,
            align: None,
            col_span: 1,
            row_span: 1,
            is_merged: false,
            merged_cells: Vec::new(),
        }
    }

    /// The cell's plain text, concatenated across its leaves.
    pub fn text(&self) -> String {
        self.children
            .iter()
            .map(|leaf| leaf.text.as_str())
            .collect()
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.children = vec![Text::new(text)];
    }

    /// An anchor carries the combined spans of a merged region.
    pub fn is_merge_anchor(&self) -> bool {
        !self.is_merged && (self.col_span > 1 || self.row_span > 1)
    }
}

impl Default for TableCell {
    fn default() -> Self {
        Self::empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRow {
    pub children: Vec<TableCell>,
}

impl TableRow {
    pub fn blank(cols: usize) -> Self {
        Self {
            children: (0..cols).map(|_| TableCell::empty()).collect(),
        }
    }
}

/// Where to insert a new row relative to the reference index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowPosition {
    Above,
    Below,
}

/// Where to insert a new column relative to the reference index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnPosition {
    Left,
    Right,
}

/// The table grid. Prior to any merge every row has the same cell count;
/// merging never removes cells, so the grid stays rectangular throughout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    pub rows: Vec<TableRow>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
}

impl Table {
    /// Builds a `rows x cols` grid of blank, non-merged cells.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows: (0..rows).map(|_| TableRow::blank(cols)).collect(),
            width: None,
            height: None,
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn col_count(&self) -> usize {
        self.rows.first().map(|row| row.children.len()).unwrap_or(0)
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&TableCell> {
        self.rows.get(row)?.children.get(col)
    }

    fn cell_mut(&mut self, row: usize, col: usize) -> Option<&mut TableCell> {
        self.rows.get_mut(row)?.children.get_mut(col)
    }

    pub fn is_rectangular(&self) -> bool {
        let Some(first) = self.rows.first() else {
            return false;
        };
        let cols = first.children.len();
        self.rows.iter().all(|row| row.children.len() == cols)
    }

    /// Inserts one full row of blank cells at `index`. Every other cell's
    /// content and attributes are left untouched; in particular, existing
    /// `merged_cells` anchor coordinates are NOT rekeyed, so merged regions
    /// below the insertion point keep referencing their pre-edit coordinates.
    pub fn add_row(&mut self, index: usize, position: RowPosition) {
        if index >= self.rows.len() {
            return;
        }
        let insert_index = match position {
            RowPosition::Above => index,
            RowPosition::Below => index + 1,
        };
        let cols = self.col_count();
        self.rows.insert(insert_index, TableRow::blank(cols));
        debug!(index = insert_index, "inserted table row");
    }

    /// Removes the row at `index`. Refuses to remove the last row.
    pub fn remove_row(&mut self, index: usize) {
        if self.rows.len() <= 1 || index >= self.rows.len() {
            return;
        }
        self.rows.remove(index);
        debug!(index, "removed table row");
    }

    /// Inserts one blank cell into every row at `index`. As with `add_row`,
    /// merge back-references are left pointing at their pre-edit coordinates.
    pub fn add_column(&mut self, index: usize, position: ColumnPosition) {
        if index >= self.col_count() {
            return;
        }
        let insert_index = match position {
            ColumnPosition::Left => index,
            ColumnPosition::Right => index + 1,
        };
        for row in &mut self.rows {
            row.children.insert(insert_index, TableCell::empty());
        }
        debug!(index = insert_index, "inserted table column");
    }

    /// Removes the column at `index`. Refuses to remove the last column.
    pub fn remove_column(&mut self, index: usize) {
        if self.col_count() <= 1 || index >= self.col_count() {
            return;
        }
        for row in &mut self.rows {
            row.children.remove(index);
        }
        debug!(index, "removed table column");
    }

    /// Merges the rectangle into a single rendered cell. The cell at
    /// `(start_row, start_col)` becomes the anchor: it takes the combined
    /// spans and the space-joined concatenation of every non-empty covered
    /// text (row-major order, its own included). Every other cell in the
    /// rectangle is marked covered, back-references the anchor, and has its
    /// text cleared.
    pub fn merge_cells(&mut self, selection: CellSelection) {
        if !selection.is_multi_cell() {
            return;
        }
        if selection.end_row >= self.row_count() || selection.end_col >= self.col_count() {
            return;
        }

        let mut merged_text = String::new();
        for row in selection.start_row..=selection.end_row {
            for col in selection.start_col..=selection.end_col {
                let text = self.rows[row].children[col].text();
                if !text.trim().is_empty() {
                    if !merged_text.is_empty() {
                        merged_text.push(' ');
                    }
                    merged_text.push_str(&text);
                }
            }
        }

        let anchor_row = selection.start_row;
        let anchor_col = selection.start_col;

        let anchor = &mut self.rows[anchor_row].children[anchor_col];
        anchor.col_span = selection.end_col - selection.start_col + 1;
        anchor.row_span = selection.end_row - selection.start_row + 1;
        anchor.is_merged = false;
        anchor.merged_cells.clear();
        anchor.set_text(merged_text);

        for row in selection.start_row..=selection.end_row {
            for col in selection.start_col..=selection.end_col {
                if row == anchor_row && col == anchor_col {
                    continue;
                }
                let covered = &mut self.rows[row].children[col];
                covered.is_merged = true;
                covered.merged_cells = vec![CellRef::new(anchor_row, anchor_col)];
                covered.set_text("");
            }
        }
        debug!(
            anchor_row,
            anchor_col,
            rows = selection.end_row - selection.start_row + 1,
            cols = selection.end_col - selection.start_col + 1,
            "merged table cells"
        );
    }

    /// Dissolves the merged region anchored at `(row, col)`. Valid only on an
    /// anchor cell; any other target is a no-op. This is lossy and
    /// one-directional: covered cells regained here stay empty, because their
    /// text was absorbed into the anchor at merge time.
    pub fn unmerge_cells(&mut self, row: usize, col: usize) {
        let Some(cell) = self.cell(row, col) else {
            return;
        };
        if !cell.is_merge_anchor() {
            return;
        }

        if let Some(anchor) = self.cell_mut(row, col) {
            anchor.col_span = 1;
            anchor.row_span = 1;
            anchor.is_merged = false;
        }

        for grid_row in &mut self.rows {
            for cell in &mut grid_row.children {
                if cell
                    .merged_cells
                    .iter()
                    .any(|anchor| anchor.row == row && anchor.col == col)
                {
                    cell.is_merged = false;
                    cell.merged_cells.clear();
                }
            }
        }
        debug!(row, col, "unmerged table cells");
    }

    /// Sets the cell's background color. The sentinel `"transparent"` clears
    /// the background instead of being stored literally.
    pub fn set_cell_background(&mut self, row: usize, col: usize, color: &str) {
        if let Some(cell) = self.cell_mut(row, col) {
            cell.background_color = if color == "transparent" {
                None
            } else {
                Some(color.to_string())
            };
        }
    }

    pub fn set_cell_alignment(&mut self, row: usize, col: usize, align: super::Align) {
        if let Some(cell) = self.cell_mut(row, col) {
            cell.align = Some(align);
        }
    }
}
