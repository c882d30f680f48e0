use richdoc::{
    html, ops, Align, CellRef, CellSelection, Document, Element, ElementKind, Mark, MarkValue,
    Node, Point, Selection, Table,
};

fn doc_of(blocks: Vec<Element>) -> Document {
    Document::from_blocks(blocks)
}

#[test]
fn bold_paragraph_renders_strong() {
    let doc = doc_of(vec![Element::paragraph("Hi")]);
    let selection = Selection::new(Point::new(vec![0, 0], 0), Point::new(vec![0, 0], 2));
    let bolded = ops::toggle_mark(&doc, &selection, Mark::Bold);
    assert_eq!(html::to_html(&bolded), "<p><strong>Hi</strong></p>");
}

#[test]
fn mark_nesting_order_is_fixed() {
    let doc = doc_of(vec![Element::paragraph("x")]);
    let selection = Selection::new(Point::new(vec![0, 0], 0), Point::new(vec![0, 0], 1));
    let mut next = ops::toggle_mark(&doc, &selection, Mark::Bold);
    next = ops::toggle_mark(&next, &selection, Mark::Italic);
    next = ops::add_mark(
        &next,
        &selection,
        Mark::Color,
        MarkValue::String("#336699".into()),
    );

    // Bold innermost, then italic, value spans outermost; insertion order of
    // the marks never changes the output.
    assert_eq!(
        html::to_html(&next),
        "<p><span style=\"color: #336699\"><em><strong>x</strong></em></span></p>"
    );
}

#[test]
fn block_styles_only_render_when_present() {
    let mut heading = Element::with_children(ElementKind::HeadingTwo, vec![Node::text("Title")]);
    heading.align = Some(Align::Center);
    let plain = Element::paragraph("body");
    let doc = doc_of(vec![heading, plain]);

    assert_eq!(
        html::to_html(&doc),
        "<h2 style=\"text-align: center\">Title</h2><p>body</p>"
    );
}

#[test]
fn image_renders_dimensions_and_alt() {
    let doc = doc_of(vec![Element::paragraph("x")]);
    let next = ops::insert_image(&doc, None, "photo.png", "a photo");
    let rendered = html::to_html(&next);
    assert!(rendered.contains(
        "<img src=\"photo.png\" alt=\"a photo\" title=\"\" style=\"width: 300px; height: auto\" />"
    ));
}

#[test]
fn link_target_defaults_to_blank() {
    let doc = doc_of(vec![Element::paragraph("go")]);
    let selection = Selection::collapsed(Point::new(vec![0, 0], 2));
    let next = ops::insert_link(&doc, Some(&selection), "#top", "up");
    assert!(html::to_html(&next).contains("<a href=\"#top\" target=\"_blank\">up</a>"));
}

#[test]
fn merged_cells_render_spans_and_skip_covered() {
    let mut table = Table::new(2, 2);
    table.rows[0].children[0].set_text("a");
    table.rows[0].children[1].set_text("b");
    table.rows[1].children[0].set_text("c");
    table.rows[1].children[1].set_text("d");
    table.merge_cells(CellSelection::from_points(
        CellRef::new(0, 0),
        CellRef::new(0, 1),
    ));
    let doc = doc_of(vec![Element::with_children(
        ElementKind::Table(table),
        vec![Node::text("")],
    )]);

    let rendered = html::to_html(&doc);
    let row_markup: Vec<&str> = rendered.matches("<tr>").collect();
    assert_eq!(row_markup.len(), 2);
    // Row 0 renders exactly one td, spanning both columns.
    assert!(rendered.contains("colspan=\"2\">a b</td>"));
    assert_eq!(rendered.matches("<td").count(), 3);
    // The covered cell's empty content never shows up as its own cell.
    assert!(!rendered.contains("rowspan"));
}

#[test]
fn table_style_merges_dimensions_with_baseline() {
    let mut table = Table::new(1, 1);
    table.width = Some("80%".to_string());
    let doc = doc_of(vec![Element::with_children(
        ElementKind::Table(table),
        vec![Node::text("")],
    )]);

    let rendered = html::to_html(&doc);
    assert!(rendered.contains(
        "style=\"width: 80%; border-collapse: collapse; width: 100%; border: 2px solid #4a5568; box-shadow: 0 4px 6px -1px rgba(0, 0, 0, 0.1);\""
    ));
    // Exactly one style attribute on the table element itself.
    let table_tag = &rendered[rendered.find("<table").unwrap()..rendered.find('>').unwrap()];
    assert_eq!(table_tag.matches("style=").count(), 1);
}

#[test]
fn cell_background_and_alignment_styles() {
    let mut table = Table::new(1, 1);
    table.set_cell_background(0, 0, "#ffcc00");
    table.set_cell_alignment(0, 0, Align::Right);
    let doc = doc_of(vec![Element::with_children(
        ElementKind::Table(table),
        vec![Node::text("")],
    )]);

    assert!(html::to_html(&doc).contains(
        "<td style=\"background-color: #ffcc00; text-align: right; border: 1px solid #4a5568; padding: 12px\">"
    ));
}

#[test]
fn output_is_deterministic() {
    let mut doc = Document::welcome();
    let selection = Selection::new(Point::new(vec![0, 0], 0), Point::new(vec![0, 0], 7));
    doc = ops::toggle_mark(&doc, &selection, Mark::Bold);
    doc = ops::insert_table(&doc, None, 2, 3);

    let first = html::to_html(&doc);
    for _ in 0..10 {
        assert_eq!(html::to_html(&doc), first);
    }
}

#[test]
fn standalone_document_embeds_fragment() {
    let doc = doc_of(vec![Element::paragraph("content here")]);
    let page = html::to_html_document(&doc);
    assert!(page.starts_with("\n<!DOCTYPE html>"));
    assert!(page.contains("<p>content here</p>"));
    assert!(page.contains("</html>"));
}

#[test]
fn sanitize_strips_active_content() {
    let dirty = "<p>ok</p><script>alert(1)</script><iframe src=\"x\"></iframe>\
                 <a href=\"javascript:alert(2)\">x</a>";
    let clean = html::sanitize(dirty);
    assert!(!clean.contains("<script"));
    assert!(!clean.contains("<iframe"));
    assert!(!clean.to_lowercase().contains("javascript:"));
    assert!(clean.contains("<p>ok</p>"));
}

#[test]
fn sanitize_is_case_insensitive() {
    let dirty = "<SCRIPT>bad()</SCRIPT><p>fine</p>";
    let clean = html::sanitize(dirty);
    assert!(!clean.to_lowercase().contains("script"));
    assert!(clean.contains("<p>fine</p>"));
}

#[test]
fn contrast_color_tracks_brightness() {
    assert_eq!(html::contrast_color("#ffffff"), "#000000");
    assert_eq!(html::contrast_color("#000000"), "#ffffff");
    assert_eq!(html::contrast_color("#ffee00"), "#000000");
    // Unparseable input falls back to white text.
    assert_eq!(html::contrast_color("bogus"), "#ffffff");
}
