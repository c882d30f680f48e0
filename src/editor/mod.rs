//! Editor context.
//!
//! An explicit value holding the current tree snapshot and the active
//! selection. Methods delegate to the pure operations in [`crate::doc::ops`]
//! and swap in the returned tree, so a single tree has exactly one owner and
//! one active selection at a time.

use tracing::debug;

use crate::doc::ops;
use crate::doc::table::{CellSelection, ColumnPosition, RowPosition};
use crate::doc::{Align, BlockFormat, Document, Mark, MarkValue, Selection};
use crate::html;

/// The editing context: one tree, one selection.
#[derive(Debug, Clone, PartialEq)]
pub struct Editor {
    doc: Document,
    selection: Option<Selection>,
}

impl Editor {
    /// Starts from the supplied tree, or the welcome document when none is
    /// given.
    pub fn new(initial: Option<Document>) -> Self {
        let mut doc = initial.unwrap_or_else(Document::welcome);
        doc.normalize();
        Self {
            doc,
            selection: None,
        }
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn select(&mut self, selection: Option<Selection>) {
        self.selection = selection;
    }

    /// Replaces the whole tree from a hand-edited JSON representation.
    /// Invalid input is rejected and the prior tree retained; returns whether
    /// the replacement happened.
    pub fn replace_from_json(&mut self, json: &str) -> bool {
        match Document::from_json(json) {
            Ok(doc) => {
                self.doc = doc;
                self.selection = None;
                true
            }
            Err(err) => {
                debug!(%err, "rejected document replacement");
                false
            }
        }
    }

    pub fn mark_active(&self, mark: Mark) -> bool {
        self.selection
            .as_ref()
            .map(|selection| ops::mark_active(&self.doc, selection, mark))
            .unwrap_or(false)
    }

    pub fn toggle_mark(&mut self, mark: Mark) {
        if let Some(selection) = &self.selection {
            self.doc = ops::toggle_mark(&self.doc, selection, mark);
        }
    }

    pub fn add_mark(&mut self, mark: Mark, value: MarkValue) {
        if let Some(selection) = &self.selection {
            self.doc = ops::add_mark(&self.doc, selection, mark, value);
        }
    }

    pub fn block_active(&self, format: BlockFormat) -> bool {
        self.selection
            .as_ref()
            .map(|selection| ops::block_active(&self.doc, selection, format))
            .unwrap_or(false)
    }

    pub fn toggle_block(&mut self, format: BlockFormat) {
        if let Some(selection) = &self.selection {
            self.doc = ops::toggle_block(&self.doc, selection, format);
            // Block structure may have changed under the selection's paths.
            self.selection = None;
        }
    }

    pub fn insert_image(&mut self, url: &str, alt: &str) {
        self.doc = ops::insert_image(&self.doc, self.selection.as_ref(), url, alt);
    }

    pub fn insert_link(&mut self, url: &str, text: &str) {
        self.doc = ops::insert_link(&self.doc, self.selection.as_ref(), url, text);
    }

    pub fn insert_anchor(&mut self, id: &str) {
        self.doc = ops::insert_anchor(&self.doc, self.selection.as_ref(), id);
    }

    pub fn insert_hover_area(&mut self, text: &str, hover_content: &str) {
        self.doc = ops::insert_hover_area(&self.doc, self.selection.as_ref(), text, hover_content);
    }

    pub fn create_table(&mut self, rows: usize, cols: usize) {
        self.doc = ops::insert_table(&self.doc, self.selection.as_ref(), rows, cols);
    }

    pub fn add_table_row(&mut self, block_index: usize, index: usize, position: RowPosition) {
        self.doc = ops::with_table(&self.doc, block_index, |table| table.add_row(index, position));
    }

    pub fn remove_table_row(&mut self, block_index: usize, index: usize) {
        self.doc = ops::with_table(&self.doc, block_index, |table| table.remove_row(index));
    }

    pub fn add_table_column(&mut self, block_index: usize, index: usize, position: ColumnPosition) {
        self.doc = ops::with_table(&self.doc, block_index, |table| {
            table.add_column(index, position)
        });
    }

    pub fn remove_table_column(&mut self, block_index: usize, index: usize) {
        self.doc = ops::with_table(&self.doc, block_index, |table| table.remove_column(index));
    }

    pub fn merge_table_cells(&mut self, block_index: usize, selection: CellSelection) {
        self.doc = ops::with_table(&self.doc, block_index, |table| table.merge_cells(selection));
    }

    pub fn unmerge_table_cells(&mut self, block_index: usize, row: usize, col: usize) {
        self.doc = ops::with_table(&self.doc, block_index, |table| table.unmerge_cells(row, col));
    }

    pub fn set_cell_background_color(
        &mut self,
        block_index: usize,
        row: usize,
        col: usize,
        color: &str,
    ) {
        self.doc = ops::with_table(&self.doc, block_index, |table| {
            table.set_cell_background(row, col, color)
        });
    }

    pub fn set_cell_alignment(&mut self, block_index: usize, row: usize, col: usize, align: Align) {
        self.doc = ops::with_table(&self.doc, block_index, |table| {
            table.set_cell_alignment(row, col, align)
        });
    }

    /// The serialized HTML fragment for the current tree.
    pub fn html(&self) -> String {
        html::to_html(&self.doc)
    }

    /// The current tree wrapped in a standalone HTML document.
    pub fn export_html(&self) -> String {
        html::to_html_document(&self.doc)
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(None)
    }
}
