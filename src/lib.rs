//! richdoc: A structured rich-text editing core with deterministic HTML export.
//!
//! This crate provides the document engine behind a rich-text editor: a typed
//! block tree, pure mutation operations, a table grid with cell merging, and a
//! serializer that turns any tree into stable HTML. It includes:
//!
//! - **Document model** - Block elements, text leaves with formatting marks,
//!   and a JSON representation for round-tripping hand-edited trees
//! - **Mutation operations** - Mark and block toggling, element insertion,
//!   all pure functions from tree to tree
//! - **Table grid engine** - Row/column edits and rectangular cell merging
//!   with anchor/covered bookkeeping
//! - **HTML serializer** - Deterministic fragment and standalone-document
//!   output with sanitization of script content
//! - **View adapter** - The narrow boundary an editable view delegates
//!   break-insertion and backward-deletion through near atomic elements
//!
//! # Quick Start
//!
//! ```rust
//! use richdoc::{Editor, Mark, Point, Selection};
//!
//! // Start from the built-in welcome document
//! let mut editor = Editor::new(None);
//!
//! // Bold the first word of the first paragraph
//! editor.select(Some(Selection::new(
//!     Point::new(vec![0, 0], 0),
//!     Point::new(vec![0, 0], 7),
//! )));
//! editor.toggle_mark(Mark::Bold);
//!
//! // Export deterministic HTML
//! let html = editor.html();
//! assert!(html.contains("<strong>"));
//! ```

// Document model, selection, and mutation operations
pub mod doc;

// Editing context holding one tree and one selection
pub mod editor;

// Deterministic HTML serializer
pub mod html;

// Structural-edit boundary for an external editable view
pub mod view;

// Re-export document types
pub use doc::{
    Align, BlockFormat, BlockType, DocError, Document, Element, ElementKind, Mark, MarkValue,
    Marks, Node, Path, Point, Selection, Text,
};

// Re-export table types
pub use doc::table::{
    CellRef, CellSelection, ColumnPosition, RowPosition, Table, TableCell, TableRow,
};

// Re-export the pure mutation operations
pub use doc::ops;

// Re-export the editing context
pub use editor::Editor;

// Re-export the view boundary
pub use view::ViewEdit;
