//! View adapter boundary.
//!
//! An external editable view delegates exactly two structural edits to the
//! core: break-insertion and backward-deletion near atomic elements (tables,
//! images, hover areas). Everything else is the view's own business; when the
//! core is not responsible it answers [`ViewEdit::Unhandled`] and the view
//! falls through to its default behavior.

use tracing::debug;

use crate::doc::{Document, Element, Point, Selection};

/// Outcome of delegating a structural edit to the core.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewEdit {
    /// The core produced a new tree and the selection to move to.
    Handled {
        doc: Document,
        selection: Selection,
    },
    /// Not the core's concern; the view applies its default behavior.
    Unhandled,
}

/// A line-break request with a collapsed selection at or adjacent to an
/// atomic element inserts a fresh empty paragraph immediately after it and
/// moves the selection there. Atomic elements are never split.
pub fn insert_break(doc: &Document, selection: &Selection) -> ViewEdit {
    if !selection.is_collapsed() {
        return ViewEdit::Unhandled;
    }
    let Some(block_index) = atomic_block_at(doc, selection) else {
        return ViewEdit::Unhandled;
    };

    let mut next = doc.clone();
    next.blocks.insert(block_index + 1, Element::empty_paragraph());
    debug!(block_index, "inserted paragraph after atomic element");
    ViewEdit::Handled {
        doc: next,
        selection: Selection::collapsed(Point::new(vec![block_index + 1, 0], 0)),
    }
}

/// A backward-delete request with a collapsed selection at the very start of
/// an atomic element's content deletes the entire element, never merging
/// content into it.
pub fn delete_backward(doc: &Document, selection: &Selection) -> ViewEdit {
    if !selection.is_collapsed() {
        return ViewEdit::Unhandled;
    }
    let Some(block_index) = atomic_block_at(doc, selection) else {
        return ViewEdit::Unhandled;
    };
    if !at_block_start(selection, block_index) {
        return ViewEdit::Unhandled;
    }

    let mut next = doc.clone();
    next.blocks.remove(block_index);
    next.normalize();
    debug!(block_index, "deleted atomic element");
    let target = block_index.min(next.blocks.len() - 1);
    ViewEdit::Handled {
        doc: next,
        selection: Selection::collapsed(Point::new(vec![target, 0], 0)),
    }
}

/// The top-level index of the atomic block the selection sits in, if any.
fn atomic_block_at(doc: &Document, selection: &Selection) -> Option<usize> {
    let block_index = *selection.anchor.path.first()?;
    let block = doc.block_at(block_index)?;
    block.kind.is_atomic().then_some(block_index)
}

/// Whether the collapsed selection sits at the first position of the block's
/// content.
fn at_block_start(selection: &Selection, block_index: usize) -> bool {
    selection.anchor.offset == 0
        && selection.anchor.path.first() == Some(&block_index)
        && selection.anchor.path.iter().skip(1).all(|&index| index == 0)
}
