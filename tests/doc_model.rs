use richdoc::{DocError, Document, ElementKind, Mark};

#[test]
fn parses_paragraph_with_marks_from_json() {
    let json = r##"[
        {
            "type": "paragraph",
            "children": [
                {"text": "plain "},
                {"text": "bold", "bold": true},
                {"text": " and ", "italic": true, "color": "#ff0000"}
            ]
        }
    ]"##;

    let doc = Document::from_json(json).unwrap();
    assert_eq!(doc.blocks.len(), 1);
    assert_eq!(doc.blocks[0].kind, ElementKind::Paragraph);

    let leaf = doc.text_at(&[0, 1]).unwrap();
    assert_eq!(leaf.text, "bold");
    assert!(leaf.marks.is_active(Mark::Bold));

    let colored = doc.text_at(&[0, 2]).unwrap();
    assert!(colored.marks.is_active(Mark::Italic));
    assert_eq!(colored.marks.color.as_deref(), Some("#ff0000"));
}

#[test]
fn json_round_trip_is_stable() {
    let doc = Document::welcome();
    let json = doc.to_json().unwrap();
    let reparsed = Document::from_json(&json).unwrap();
    assert_eq!(reparsed, doc);
    assert_eq!(reparsed.to_json().unwrap(), json);
}

#[test]
fn default_marks_are_omitted_from_json() {
    let doc = Document::from_blocks(vec![richdoc::Element::paragraph("hi")]);
    let json = doc.to_json().unwrap();
    assert!(!json.contains("\"bold\""));
    assert!(!json.contains("\"color\""));
}

#[test]
fn from_json_rejects_malformed_input() {
    assert!(matches!(
        Document::from_json("{not json"),
        Err(DocError::Json(_))
    ));
    assert!(matches!(
        Document::from_json(r#"{"type": "paragraph"}"#),
        Err(DocError::Json(_))
    ));
}

#[test]
fn from_json_rejects_ragged_table() {
    let json = r#"[
        {
            "type": "table",
            "rows": [
                {"children": [{"children": [{"text": "a"}]}, {"children": [{"text": "b"}]}]},
                {"children": [{"children": [{"text": "c"}]}]}
            ],
            "children": [{"text": ""}]
        }
    ]"#;
    assert!(matches!(
        Document::from_json(json),
        Err(DocError::RaggedTable { block: 0 })
    ));
}

#[test]
fn from_json_rejects_dangling_merge_reference() {
    let json = r#"[
        {
            "type": "table",
            "rows": [
                {"children": [
                    {"children": [{"text": "a"}]},
                    {"children": [{"text": ""}], "isMerged": true, "mergedCells": [{"row": 9, "col": 9}]}
                ]}
            ],
            "children": [{"text": ""}]
        }
    ]"#;
    assert!(matches!(
        Document::from_json(json),
        Err(DocError::DanglingMergeRef { row: 0, col: 1 })
    ));
}

#[test]
fn empty_document_normalizes_to_one_paragraph() {
    let doc = Document::from_json("[]").unwrap();
    assert_eq!(doc.blocks.len(), 1);
    assert_eq!(doc.blocks[0].kind, ElementKind::Paragraph);
    assert_eq!(doc.text_at(&[0, 0]).unwrap().text, "");
}

#[test]
fn childless_element_gains_empty_text_leaf() {
    let json = r#"[{"type": "heading-one", "children": []}]"#;
    let doc = Document::from_json(json).unwrap();
    assert_eq!(doc.text_at(&[0, 0]).unwrap().text, "");
}

#[test]
fn node_at_resolves_nested_paths() {
    let doc = Document::welcome();
    // Second block is the tip list; its first item holds a text leaf.
    assert_eq!(doc.blocks[1].kind, ElementKind::BulletedList);
    let leaf = doc.text_at(&[1, 0, 0]).unwrap();
    assert_eq!(leaf.text, "Right-click tables for editing options");
    assert!(doc.text_at(&[1, 99, 0]).is_none());
    assert!(doc.node_at(&[99]).is_none());
}

#[test]
fn welcome_document_shape() {
    let doc = Document::welcome();
    assert_eq!(doc.blocks.len(), 3);
    assert_eq!(doc.blocks[0].kind, ElementKind::Paragraph);
    assert_eq!(doc.blocks[1].kind, ElementKind::BulletedList);
    assert_eq!(doc.blocks[1].children.len(), 4);
    assert_eq!(doc.blocks[2].kind, ElementKind::Paragraph);
}
