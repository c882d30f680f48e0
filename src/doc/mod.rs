//! Rich-text document tree model.
//!
//! This module provides the canonical nested data structure for structured
//! rich-text editing: formatted blocks, inline text with marks, tables,
//! images, links, anchors, and hover areas. The tree is mutated only through
//! the operations in [`crate::doc::ops`] and the table engine in
//! [`crate::doc::table`]; serialization to HTML lives in [`crate::html`].

use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

pub mod ops;
pub mod table;

pub use table::{CellRef, CellSelection, Table, TableCell, TableRow};

/// A node in the document tree: either a block/inline element or a text leaf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Node {
    Element(Element),
    Text(Text),
}

impl Node {
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text(Text::new(text))
    }

    pub fn as_text(&self) -> Option<&Text> {
        match self {
            Node::Text(text) => Some(text),
            Node::Element(_) => None,
        }
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        }
    }
}

/// A text leaf: a string plus independently togglable marks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Text {
    pub text: String,
    #[serde(flatten)]
    pub marks: Marks,
}

impl Text {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            marks: Marks::default(),
        }
    }

    pub fn grapheme_len(&self) -> usize {
        self.text.graphemes(true).count()
    }
}

fn is_false(flag: &bool) -> bool {
    !*flag
}

/// The full set of inline marks a text leaf can carry. Marks are orthogonal:
/// any subset may be active simultaneously.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Marks {
    #[serde(default, skip_serializing_if = "is_false")]
    pub bold: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub italic: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub underline: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub strikethrough: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub superscript: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub subscript: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub code: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<String>,
}

impl Marks {
    pub fn is_active(&self, mark: Mark) -> bool {
        match mark {
            Mark::Bold => self.bold,
            Mark::Italic => self.italic,
            Mark::Underline => self.underline,
            Mark::Strikethrough => self.strikethrough,
            Mark::Superscript => self.superscript,
            Mark::Subscript => self.subscript,
            Mark::Code => self.code,
            Mark::Color => self.color.is_some(),
            Mark::BackgroundColor => self.background_color.is_some(),
            Mark::FontSize => self.font_size.is_some(),
        }
    }

    pub fn apply(&mut self, mark: Mark, value: &MarkValue) {
        match (mark, value) {
            (Mark::Bold, MarkValue::Bool(flag)) => self.bold = *flag,
            (Mark::Italic, MarkValue::Bool(flag)) => self.italic = *flag,
            (Mark::Underline, MarkValue::Bool(flag)) => self.underline = *flag,
            (Mark::Strikethrough, MarkValue::Bool(flag)) => self.strikethrough = *flag,
            (Mark::Superscript, MarkValue::Bool(flag)) => self.superscript = *flag,
            (Mark::Subscript, MarkValue::Bool(flag)) => self.subscript = *flag,
            (Mark::Code, MarkValue::Bool(flag)) => self.code = *flag,
            (Mark::Color, MarkValue::String(value)) => self.color = Some(value.clone()),
            (Mark::BackgroundColor, MarkValue::String(value)) => {
                self.background_color = Some(value.clone());
            }
            (Mark::FontSize, MarkValue::String(value)) => self.font_size = Some(value.clone()),
            // Type mismatch between the mark and the supplied value
            _ => {}
        }
    }

    pub fn clear(&mut self, mark: Mark) {
        match mark {
            Mark::Bold => self.bold = false,
            Mark::Italic => self.italic = false,
            Mark::Underline => self.underline = false,
            Mark::Strikethrough => self.strikethrough = false,
            Mark::Superscript => self.superscript = false,
            Mark::Subscript => self.subscript = false,
            Mark::Code => self.code = false,
            Mark::Color => self.color = None,
            Mark::BackgroundColor => self.background_color = None,
            Mark::FontSize => self.font_size = None,
        }
    }
}

/// An inline mark identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mark {
    Bold,
    Italic,
    Underline,
    Strikethrough,
    Superscript,
    Subscript,
    Code,
    Color,
    BackgroundColor,
    FontSize,
}

impl Mark {
    /// Marks that toggle between on and off, as opposed to carrying a value.
    pub fn is_boolean(self) -> bool {
        !matches!(self, Mark::Color | Mark::BackgroundColor | Mark::FontSize)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mark::Bold => "bold",
            Mark::Italic => "italic",
            Mark::Underline => "underline",
            Mark::Strikethrough => "strikethrough",
            Mark::Superscript => "superscript",
            Mark::Subscript => "subscript",
            Mark::Code => "code",
            Mark::Color => "color",
            Mark::BackgroundColor => "backgroundColor",
            Mark::FontSize => "fontSize",
        }
    }
}

/// A mark value: boolean for toggles, string for colors and font sizes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkValue {
    Bool(bool),
    String(String),
}

/// Block alignment. Independent from the element's type: toggling one never
/// resets the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    Left,
    Center,
    Right,
    Justify,
}

impl Align {
    pub fn as_css(self) -> &'static str {
        match self {
            Align::Left => "left",
            Align::Center => "center",
            Align::Right => "right",
            Align::Justify => "justify",
        }
    }
}

/// An element node: a tagged kind plus independent alignment and font size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    #[serde(flatten)]
    pub kind: ElementKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align: Option<Align>,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "fontSize")]
    pub font_size: Option<String>,
    #[serde(default)]
    pub children: Vec<Node>,
}

impl Element {
    /// A new element with the minimal valid children sequence.
    pub fn new(kind: ElementKind) -> Self {
        Self {
            kind,
            align: None,
            font_size: None,
            children: vec![Node::text("")],
        }
    }

    pub fn with_children(kind: ElementKind, children: Vec<Node>) -> Self {
        let mut element = Self::new(kind);
        element.children = children;
        element
    }

    pub fn paragraph(text: impl Into<String>) -> Self {
        Self::with_children(ElementKind::Paragraph, vec![Node::text(text)])
    }

    pub fn empty_paragraph() -> Self {
        Self::new(ElementKind::Paragraph)
    }

    pub fn list_item(text: impl Into<String>) -> Self {
        Self::with_children(ElementKind::ListItem, vec![Node::text(text)])
    }
}

/// The element kind, carrying any type-specific attributes. Serialized with a
/// `type` discriminant so the tree round-trips through the hand-editable JSON
/// view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ElementKind {
    Paragraph,
    HeadingOne,
    HeadingTwo,
    HeadingThree,
    BlockQuote,
    BulletedList,
    NumberedList,
    ListItem,
    Image {
        url: String,
        #[serde(default)]
        alt: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        width: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        height: Option<String>,
    },
    Table(Table),
    Link {
        href: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target: Option<String>,
    },
    Anchor {
        id: String,
    },
    Abbr {
        definition: String,
    },
    HoverArea {
        #[serde(rename = "hoverContent")]
        hover_content: String,
    },
}

impl ElementKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            ElementKind::Paragraph => "paragraph",
            ElementKind::HeadingOne => "heading-one",
            ElementKind::HeadingTwo => "heading-two",
            ElementKind::HeadingThree => "heading-three",
            ElementKind::BlockQuote => "block-quote",
            ElementKind::BulletedList => "bulleted-list",
            ElementKind::NumberedList => "numbered-list",
            ElementKind::ListItem => "list-item",
            ElementKind::Image { .. } => "image",
            ElementKind::Table(_) => "table",
            ElementKind::Link { .. } => "link",
            ElementKind::Anchor { .. } => "anchor",
            ElementKind::Abbr { .. } => "abbr",
            ElementKind::HoverArea { .. } => "hover-area",
        }
    }

    /// Atomic elements are never split by a line break and are deleted
    /// wholesale from their boundary.
    pub fn is_atomic(&self) -> bool {
        matches!(
            self,
            ElementKind::Table(_) | ElementKind::Image { .. } | ElementKind::HoverArea { .. }
        )
    }

    pub fn is_list_container(&self) -> bool {
        matches!(self, ElementKind::BulletedList | ElementKind::NumberedList)
    }
}

/// Retaggable block types, the targets of [`ops::toggle_block`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockType {
    Paragraph,
    HeadingOne,
    HeadingTwo,
    HeadingThree,
    BlockQuote,
    BulletedList,
    NumberedList,
    ListItem,
}

impl BlockType {
    pub fn element_kind(self) -> ElementKind {
        match self {
            BlockType::Paragraph => ElementKind::Paragraph,
            BlockType::HeadingOne => ElementKind::HeadingOne,
            BlockType::HeadingTwo => ElementKind::HeadingTwo,
            BlockType::HeadingThree => ElementKind::HeadingThree,
            BlockType::BlockQuote => ElementKind::BlockQuote,
            BlockType::BulletedList => ElementKind::BulletedList,
            BlockType::NumberedList => ElementKind::NumberedList,
            BlockType::ListItem => ElementKind::ListItem,
        }
    }

    pub fn is_list(self) -> bool {
        matches!(self, BlockType::BulletedList | BlockType::NumberedList)
    }

    pub fn matches(self, kind: &ElementKind) -> bool {
        self.element_kind().type_name() == kind.type_name()
    }
}

/// A block format on one of the two independent axes: element type or
/// alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockFormat {
    Type(BlockType),
    Align(Align),
}

/// A path from the document root to a node: the first index addresses a
/// top-level block, the rest descend through `children`.
pub type Path = Vec<usize>;

/// A position inside a text leaf, in grapheme clusters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Point {
    pub path: Path,
    pub offset: usize,
}

impl Point {
    pub fn new(path: Path, offset: usize) -> Self {
        Self { path, offset }
    }
}

/// A selection between two points. `anchor` and `focus` may be in any order;
/// [`Selection::start`] and [`Selection::end`] normalize to document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub anchor: Point,
    pub focus: Point,
}

impl Selection {
    pub fn new(anchor: Point, focus: Point) -> Self {
        Self { anchor, focus }
    }

    pub fn collapsed(point: Point) -> Self {
        Self {
            anchor: point.clone(),
            focus: point,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }

    pub fn start(&self) -> &Point {
        if point_le(&self.anchor, &self.focus) {
            &self.anchor
        } else {
            &self.focus
        }
    }

    pub fn end(&self) -> &Point {
        if point_le(&self.anchor, &self.focus) {
            &self.focus
        } else {
            &self.anchor
        }
    }
}

fn point_le(a: &Point, b: &Point) -> bool {
    (&a.path, a.offset) <= (&b.path, b.offset)
}

/// Errors surfaced by explicit validation entry points. The mutation operation
/// boundary never propagates these; invalid requests degrade to no-ops.
#[derive(Debug, thiserror::Error)]
pub enum DocError {
    #[error("invalid document JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("table in block {block} is not rectangular")]
    RaggedTable { block: usize },
    #[error("covered cell ({row}, {col}) references an out-of-range anchor")]
    DanglingMergeRef { row: usize, col: usize },
}

/// The document: an ordered forest of top-level blocks. Serializes as a plain
/// JSON array of elements, the same shape the hand-editable code view shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    pub blocks: Vec<Element>,
}

impl Document {
    pub fn new() -> Self {
        Self {
            blocks: vec![Element::empty_paragraph()],
        }
    }

    pub fn from_blocks(blocks: Vec<Element>) -> Self {
        let mut doc = Self { blocks };
        doc.normalize();
        doc
    }

    /// The canned document shown when the editor starts without content.
    pub fn welcome() -> Self {
        let tips = [
            "Right-click tables for editing options",
            "Resize images and tables by dragging corners",
            "Create anchor links that scroll smoothly",
            "Use color pickers for text and background",
        ];
        let list = Element::with_children(
            ElementKind::BulletedList,
            tips.iter()
                .map(|tip| Node::Element(Element::list_item(*tip)))
                .collect(),
        );
        Self {
            blocks: vec![
                Element::paragraph(
                    "Welcome to the enhanced rich text editor! Try all the features:",
                ),
                list,
                Element::paragraph("Start editing below..."),
            ],
        }
    }

    /// Parses a document from its JSON representation, normalizing and
    /// validating the result. This is the only entry point for full-tree
    /// replacement.
    pub fn from_json(json: &str) -> Result<Self, DocError> {
        let mut doc: Document = serde_json::from_str(json)?;
        doc.normalize();
        doc.validate()?;
        Ok(doc)
    }

    pub fn to_json(&self) -> Result<String, DocError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Restores the tree invariants that editing can't violate but arbitrary
    /// input can: every element carries at least one child, every table cell
    /// carries at least one text leaf, and the document itself is non-empty.
    pub fn normalize(&mut self) {
        if self.blocks.is_empty() {
            self.blocks.push(Element::empty_paragraph());
        }
        for block in &mut self.blocks {
            normalize_element(block);
        }
    }

    /// Checks the structural invariants that normalization cannot repair.
    pub fn validate(&self) -> Result<(), DocError> {
        for (index, block) in self.blocks.iter().enumerate() {
            if let ElementKind::Table(table) = &block.kind {
                if !table.is_rectangular() {
                    return Err(DocError::RaggedTable { block: index });
                }
                for (row_index, row) in table.rows.iter().enumerate() {
                    for (col_index, cell) in row.children.iter().enumerate() {
                        for anchor in &cell.merged_cells {
                            if table.cell(anchor.row, anchor.col).is_none() {
                                return Err(DocError::DanglingMergeRef {
                                    row: row_index,
                                    col: col_index,
                                });
                            }
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// The node at `path`. Paths of length one address top-level blocks, which
    /// are elements rather than nodes; use [`Document::block_at`] for those.
    pub fn node_at(&self, path: &[usize]) -> Option<&Node> {
        let (&block_index, rest) = path.split_first()?;
        let block = self.blocks.get(block_index)?;
        let (&child_index, rest) = rest.split_first()?;
        let mut node = block.children.get(child_index)?;
        for &index in rest {
            node = node.as_element()?.children.get(index)?;
        }
        Some(node)
    }

    pub fn block_at(&self, index: usize) -> Option<&Element> {
        self.blocks.get(index)
    }

    /// The text leaf at `path`, if the path points at one.
    pub fn text_at(&self, path: &[usize]) -> Option<&Text> {
        self.node_at(path)?.as_text()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

fn normalize_element(element: &mut Element) {
    if let ElementKind::Table(table) = &mut element.kind {
        for row in &mut table.rows {
            for cell in &mut row.children {
                if cell.children.is_empty() {
                    cell.children.push(Text::new(""));
                }
            }
        }
    }
    for child in &mut element.children {
        if let Node::Element(child) = child {
            normalize_element(child);
        }
    }
    if element.children.is_empty() {
        element.children.push(Node::text(""));
    }
}

/// Byte offset of the `grapheme_offset`-th grapheme cluster, or `None` when
/// the offset is past the end of the string.
pub(crate) fn grapheme_offset_to_byte(text: &str, grapheme_offset: usize) -> Option<usize> {
    if grapheme_offset == 0 {
        return Some(0);
    }

    let mut count = 0;
    for (byte_index, _) in text.grapheme_indices(true) {
        if count == grapheme_offset {
            return Some(byte_index);
        }
        count += 1;
    }
    if count == grapheme_offset {
        Some(text.len())
    } else {
        None
    }
}
