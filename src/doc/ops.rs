//! Mutation operations.
//!
//! Pure, stateless transforms over the document tree: every operation takes
//! the current tree plus a selection and produces a new tree, leaving the
//! input untouched. Invalid requests (no selection, empty prompt input,
//! unresolvable paths) return the tree unchanged; the operation boundary
//! never propagates errors.

use tracing::debug;

use super::table::Table;
use super::{
    grapheme_offset_to_byte, BlockFormat, BlockType, Document, Element, ElementKind, Mark,
    MarkValue, Marks, Node, Point, Selection, Text,
};

/// Reports whether `mark` is active at the selection. Mirrors the editor
/// convention of reading the marks at the selection's first text leaf.
pub fn mark_active(doc: &Document, selection: &Selection, mark: Mark) -> bool {
    first_leaf_in_selection(doc, selection)
        .map(|leaf| leaf.marks.is_active(mark))
        .unwrap_or(false)
}

/// Adds a boolean mark with value `true` if absent, removes it if present,
/// scoped to the selection. Value-carrying marks are not toggles; use
/// [`add_mark`] for those.
pub fn toggle_mark(doc: &Document, selection: &Selection, mark: Mark) -> Document {
    if !mark.is_boolean() {
        debug!(mark = mark.as_str(), "toggle requested for value mark");
        return doc.clone();
    }
    let active = mark_active(doc, selection, mark);
    apply_to_selection(doc, selection, |marks| {
        if active {
            marks.clear(mark);
        } else {
            marks.apply(mark, &MarkValue::Bool(true));
        }
    })
}

/// Sets an arbitrary mark value (a color, a font size) over the selection.
pub fn add_mark(doc: &Document, selection: &Selection, mark: Mark, value: MarkValue) -> Document {
    apply_to_selection(doc, selection, |marks| marks.apply(mark, &value))
}

/// Removes a mark over the selection without toggling.
pub fn remove_mark(doc: &Document, selection: &Selection, mark: Mark) -> Document {
    apply_to_selection(doc, selection, |marks| marks.clear(mark))
}

/// Reports whether any element intersecting the selection matches `format`.
/// The type and align axes are checked independently.
pub fn block_active(doc: &Document, selection: &Selection, format: BlockFormat) -> bool {
    let Some((first, last)) = top_range(doc, selection) else {
        return false;
    };
    doc.blocks[first..=last]
        .iter()
        .any(|block| element_matches(block, format))
}

fn element_matches(element: &Element, format: BlockFormat) -> bool {
    let own = match format {
        BlockFormat::Type(block_type) => block_type.matches(&element.kind),
        BlockFormat::Align(align) => element.align == Some(align),
    };
    own || element
        .children
        .iter()
        .filter_map(Node::as_element)
        .any(|child| element_matches(child, format))
}

/// Toggles a block format over the selection.
///
/// Alignment formats only ever mutate the `align` attribute; type formats only
/// ever mutate the element type. List formats run the two-phase transform:
/// intersecting list containers are unwrapped (splitting at the selection
/// boundaries), affected nodes are retagged `list-item`, and when enabling the
/// affected run is wrapped in a fresh container of the requested list type.
pub fn toggle_block(doc: &Document, selection: &Selection, format: BlockFormat) -> Document {
    let Some((first, last)) = top_range(doc, selection) else {
        return doc.clone();
    };
    let active = block_active(doc, selection, format);

    // Phase 1: unwrap any list container intersecting the selection. Items
    // outside the selection stay wrapped in containers of the original type.
    let mut blocks: Vec<Element> = Vec::with_capacity(doc.blocks.len());
    let mut affected: Vec<usize> = Vec::new();
    for (index, block) in doc.blocks.iter().enumerate() {
        if index < first || index > last {
            blocks.push(block.clone());
            continue;
        }
        if block.kind.is_list_container() {
            let items = &block.children;
            let (item_first, item_last) = selected_items(selection, index, items.len());
            push_wrapped_run(&mut blocks, block, 0, item_first);
            for item in items
                .iter()
                .take(item_last + 1)
                .skip(item_first)
                .filter_map(Node::as_element)
            {
                affected.push(blocks.len());
                blocks.push(item.clone());
            }
            push_wrapped_run(&mut blocks, block, item_last + 1, items.len());
        } else {
            affected.push(blocks.len());
            blocks.push(block.clone());
        }
    }

    // Phase 2: apply the new properties along exactly one axis.
    match format {
        BlockFormat::Align(align) => {
            for &index in &affected {
                blocks[index].align = if active { None } else { Some(align) };
            }
        }
        BlockFormat::Type(block_type) => {
            let target = if active {
                BlockType::Paragraph
            } else if block_type.is_list() {
                BlockType::ListItem
            } else {
                block_type
            };
            for &index in &affected {
                if retaggable(&blocks[index].kind) {
                    blocks[index].kind = target.element_kind();
                }
            }
        }
    }

    // Phase 3: when enabling a list, wrap the affected run in a container.
    if let BlockFormat::Type(block_type) = format {
        if block_type.is_list() && !active && !affected.is_empty() {
            let start = affected[0];
            let end = affected[affected.len() - 1];
            let items: Vec<Node> = blocks
                .drain(start..=end)
                .map(Node::Element)
                .collect();
            blocks.insert(
                start,
                Element::with_children(block_type.element_kind(), items),
            );
        }
    }

    debug!(
        format = ?format,
        enabled = !active,
        blocks = blocks.len(),
        "toggled block format"
    );
    Document::from_blocks(blocks)
}

/// Only payload-free block kinds can be retagged; retagging an image or a
/// table would orphan its attributes.
fn retaggable(kind: &ElementKind) -> bool {
    matches!(
        kind,
        ElementKind::Paragraph
            | ElementKind::HeadingOne
            | ElementKind::HeadingTwo
            | ElementKind::HeadingThree
            | ElementKind::BlockQuote
            | ElementKind::ListItem
    )
}

/// Inserts an image block followed by an empty paragraph, so there is always
/// an editable position past the image. An empty url aborts the insertion.
pub fn insert_image(doc: &Document, selection: Option<&Selection>, url: &str, alt: &str) -> Document {
    if url.is_empty() {
        return doc.clone();
    }
    let image = Element::with_children(
        ElementKind::Image {
            url: url.to_string(),
            alt: alt.to_string(),
            title: None,
            width: Some("300px".to_string()),
            height: Some("auto".to_string()),
        },
        vec![Node::text("")],
    );
    insert_block(doc, selection, image, true)
}

/// Inserts a `rows x cols` table followed by an empty paragraph.
pub fn insert_table(
    doc: &Document,
    selection: Option<&Selection>,
    rows: usize,
    cols: usize,
) -> Document {
    if rows == 0 || cols == 0 {
        return doc.clone();
    }
    let table = Element::with_children(
        ElementKind::Table(Table::new(rows, cols)),
        vec![Node::text("")],
    );
    insert_block(doc, selection, table, true)
}

/// Inserts a hover area followed by an empty paragraph. Empty display text
/// aborts the insertion.
pub fn insert_hover_area(
    doc: &Document,
    selection: Option<&Selection>,
    text: &str,
    hover_content: &str,
) -> Document {
    if text.is_empty() {
        return doc.clone();
    }
    let hover = Element::with_children(
        ElementKind::HoverArea {
            hover_content: hover_content.to_string(),
        },
        vec![Node::text(text)],
    );
    insert_block(doc, selection, hover, true)
}

/// Splices a link into the text at the cursor. The link text defaults to the
/// url; an empty url aborts the insertion.
pub fn insert_link(doc: &Document, selection: Option<&Selection>, url: &str, text: &str) -> Document {
    if url.is_empty() {
        return doc.clone();
    }
    let label = if text.is_empty() { url } else { text };
    let link = Element::with_children(
        ElementKind::Link {
            href: url.to_string(),
            target: Some("_blank".to_string()),
        },
        vec![Node::text(label)],
    );
    insert_inline(doc, selection, link)
}

/// Splices an anchor span (`[id]`) into the text at the cursor. An empty id
/// aborts the insertion.
pub fn insert_anchor(doc: &Document, selection: Option<&Selection>, id: &str) -> Document {
    if id.is_empty() {
        return doc.clone();
    }
    let anchor = Element::with_children(
        ElementKind::Anchor { id: id.to_string() },
        vec![Node::text(format!("[{id}]"))],
    );
    insert_inline(doc, selection, anchor)
}

/// Applies a grid edit to the table block at `block_index`, returning the new
/// tree. A non-table target leaves the tree unchanged.
pub fn with_table(
    doc: &Document,
    block_index: usize,
    edit: impl FnOnce(&mut Table),
) -> Document {
    let mut next = doc.clone();
    match next.blocks.get_mut(block_index).map(|block| &mut block.kind) {
        Some(ElementKind::Table(table)) => edit(table),
        _ => debug!(block_index, "table edit targeted a non-table block"),
    }
    next
}

fn insert_block(
    doc: &Document,
    selection: Option<&Selection>,
    element: Element,
    trailing_paragraph: bool,
) -> Document {
    let mut next = doc.clone();
    let index = selection
        .and_then(|sel| sel.end().path.first().copied())
        .map(|block| (block + 1).min(next.blocks.len()))
        .unwrap_or(next.blocks.len());
    debug!(kind = element.kind.type_name(), index, "inserted block");
    next.blocks.insert(index, element);
    if trailing_paragraph {
        next.blocks.insert(index + 1, Element::empty_paragraph());
    }
    next
}

fn insert_inline(doc: &Document, selection: Option<&Selection>, element: Element) -> Document {
    let mut next = doc.clone();
    let point = selection.map(|sel| sel.start().clone());

    if let Some(point) = point {
        if let Some(done) = splice_inline_at(&mut next, &point, &element) {
            debug!(kind = element.kind.type_name(), "inserted inline element");
            return done;
        }
    }

    // No usable cursor: append to the last block.
    if let Some(last) = next.blocks.last_mut() {
        last.children.push(Node::Element(element));
    }
    next
}

/// Splits the text leaf at `point` and splices `element` between the halves.
/// Returns `None` when the point does not resolve to a text leaf.
fn splice_inline_at(doc: &mut Document, point: &Point, element: &Element) -> Option<Document> {
    let leaf = doc.text_at(&point.path)?.clone();
    let byte = grapheme_offset_to_byte(&leaf.text, point.offset.min(leaf.grapheme_len()))?;

    let (parent_path, leaf_index) = point.path.split_at(point.path.len() - 1);
    let leaf_index = leaf_index[0];
    let children = children_mut(doc, parent_path)?;

    let mut head = leaf.clone();
    head.text = leaf.text[..byte].to_string();
    let mut tail = leaf;
    tail.text = tail.text[byte..].to_string();

    children.splice(
        leaf_index..=leaf_index,
        [
            Node::Text(head),
            Node::Element(element.clone()),
            Node::Text(tail),
        ],
    );
    Some(doc.clone())
}

/// Mutable access to the children of the element addressed by `path`.
fn children_mut<'doc>(doc: &'doc mut Document, path: &[usize]) -> Option<&'doc mut Vec<Node>> {
    let (&block_index, rest) = path.split_first()?;
    let mut element = doc.blocks.get_mut(block_index)?;
    for &index in rest {
        element = match element.children.get_mut(index)? {
            Node::Element(child) => child,
            Node::Text(_) => return None,
        };
    }
    Some(&mut element.children)
}

/// The inclusive top-level block range the selection touches.
fn top_range(doc: &Document, selection: &Selection) -> Option<(usize, usize)> {
    let first = *selection.start().path.first()?;
    let last = *selection.end().path.first()?;
    if first >= doc.blocks.len() {
        return None;
    }
    Some((first, last.min(doc.blocks.len() - 1)))
}

/// For a list container at `block_index`, the inclusive item range the
/// selection covers.
fn selected_items(selection: &Selection, block_index: usize, item_count: usize) -> (usize, usize) {
    let last_item = item_count.saturating_sub(1);
    let start = selection.start();
    let end = selection.end();
    let first = if start.path.first() == Some(&block_index) {
        start.path.get(1).copied().unwrap_or(0).min(last_item)
    } else {
        0
    };
    let last = if end.path.first() == Some(&block_index) {
        end.path.get(1).copied().unwrap_or(last_item).min(last_item)
    } else {
        last_item
    };
    (first, last)
}

/// Re-wraps the items of `container` in `range` into a container of the same
/// type, dropping the wrapper when the run is empty.
fn push_wrapped_run(blocks: &mut Vec<Element>, container: &Element, from: usize, to: usize) {
    if from >= to {
        return;
    }
    let mut wrapper = container.clone();
    wrapper.children = container.children[from..to].to_vec();
    blocks.push(wrapper);
}

fn first_leaf_in_selection<'doc>(doc: &'doc Document, selection: &Selection) -> Option<&'doc Text> {
    let start = selection.start();
    let end = selection.end();
    let mut found: Option<&Text> = None;
    let mut path: Vec<usize> = Vec::new();
    for (index, block) in doc.blocks.iter().enumerate() {
        if found.is_some() {
            break;
        }
        path.push(index);
        visit_first_leaf(&block.children, &mut path, start, end, &mut found);
        path.pop();
    }
    found
}

fn visit_first_leaf<'doc>(
    children: &'doc [Node],
    path: &mut Vec<usize>,
    start: &Point,
    end: &Point,
    found: &mut Option<&'doc Text>,
) {
    for (index, node) in children.iter().enumerate() {
        if found.is_some() {
            return;
        }
        path.push(index);
        match node {
            Node::Element(element) => visit_first_leaf(&element.children, path, start, end, found),
            Node::Text(text) => {
                if path.as_slice() >= start.path.as_slice() && path.as_slice() <= end.path.as_slice()
                {
                    *found = Some(text);
                }
            }
        }
        path.pop();
    }
}

/// Rebuilds the tree, applying `edit` to every span of text the selection
/// covers. Boundary leaves are split at the selection's grapheme offsets so
/// the mark change never bleeds outside the selection.
fn apply_to_selection(
    doc: &Document,
    selection: &Selection,
    edit: impl Fn(&mut Marks) + Copy,
) -> Document {
    if selection.is_collapsed() {
        return doc.clone();
    }
    let start = selection.start();
    let end = selection.end();
    let blocks = doc
        .blocks
        .iter()
        .enumerate()
        .map(|(index, block)| {
            let mut next = block.clone();
            let mut path = vec![index];
            next.children = mark_children(&block.children, &mut path, start, end, edit);
            next
        })
        .collect();
    Document { blocks }
}

fn mark_children(
    children: &[Node],
    path: &mut Vec<usize>,
    start: &Point,
    end: &Point,
    edit: impl Fn(&mut Marks) + Copy,
) -> Vec<Node> {
    let mut out = Vec::with_capacity(children.len());
    for (index, node) in children.iter().enumerate() {
        path.push(index);
        match node {
            Node::Element(element) => {
                let mut next = element.clone();
                next.children = mark_children(&element.children, path, start, end, edit);
                out.push(Node::Element(next));
            }
            Node::Text(text) => {
                for piece in mark_leaf(text, path, start, end, edit) {
                    push_leaf(&mut out, piece);
                }
            }
        }
        path.pop();
    }
    out
}

/// Adjacent leaves with identical marks collapse into one, so removing a mark
/// undoes the split that adding it introduced.
fn push_leaf(out: &mut Vec<Node>, leaf: Text) {
    if let Some(Node::Text(last)) = out.last_mut() {
        if last.marks == leaf.marks {
            last.text.push_str(&leaf.text);
            return;
        }
    }
    out.push(Node::Text(leaf));
}

fn mark_leaf(
    leaf: &Text,
    path: &[usize],
    start: &Point,
    end: &Point,
    edit: impl Fn(&mut Marks),
) -> Vec<Text> {
    if path < start.path.as_slice() || path > end.path.as_slice() {
        return vec![leaf.clone()];
    }

    let len = leaf.grapheme_len();
    let from = if path == start.path.as_slice() {
        start.offset.min(len)
    } else {
        0
    };
    let to = if path == end.path.as_slice() {
        end.offset.min(len)
    } else {
        len
    };
    if from >= to && len > 0 {
        return vec![leaf.clone()];
    }

    if from == 0 && to == len {
        let mut next = leaf.clone();
        edit(&mut next.marks);
        return vec![next];
    }

    // Split at the selection boundaries; only the covered span is edited.
    let from_byte = grapheme_offset_to_byte(&leaf.text, from).unwrap_or(0);
    let to_byte = grapheme_offset_to_byte(&leaf.text, to).unwrap_or(leaf.text.len());

    let mut pieces = Vec::with_capacity(3);
    if from > 0 {
        let mut head = leaf.clone();
        head.text = leaf.text[..from_byte].to_string();
        pieces.push(head);
    }
    let mut middle = leaf.clone();
    middle.text = leaf.text[from_byte..to_byte].to_string();
    edit(&mut middle.marks);
    pieces.push(middle);
    if to < len {
        let mut tail = leaf.clone();
        tail.text = leaf.text[to_byte..].to_string();
        pieces.push(tail);
    }
    pieces
}
