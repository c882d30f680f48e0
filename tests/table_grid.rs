use richdoc::{
    Align, CellRef, CellSelection, ColumnPosition, RowPosition, Table,
};

fn labeled_table(rows: usize, cols: usize) -> Table {
    let mut table = Table::new(rows, cols);
    for row in 0..rows {
        for col in 0..cols {
            table.rows[row].children[col].set_text(format!("r{row}c{col}"));
        }
    }
    table
}

#[test]
fn grid_stays_rectangular_through_edits() {
    let mut table = labeled_table(2, 3);
    table.add_row(0, RowPosition::Below);
    table.add_column(2, ColumnPosition::Right);
    table.remove_row(1);
    table.remove_column(0);
    assert!(table.is_rectangular());
    assert_eq!(table.row_count(), 2);
    assert_eq!(table.col_count(), 3);
}

#[test]
fn add_row_above_and_below() {
    let mut table = labeled_table(2, 2);
    table.add_row(0, RowPosition::Above);
    assert_eq!(table.row_count(), 3);
    assert_eq!(table.cell(0, 0).unwrap().text(), "");
    assert_eq!(table.cell(1, 0).unwrap().text(), "r0c0");

    table.add_row(2, RowPosition::Below);
    assert_eq!(table.row_count(), 4);
    assert_eq!(table.cell(3, 0).unwrap().text(), "");
}

#[test]
fn add_row_out_of_range_is_noop() {
    let mut table = labeled_table(2, 2);
    table.add_row(5, RowPosition::Below);
    assert_eq!(table.row_count(), 2);
}

#[test]
fn last_row_and_column_cannot_be_removed() {
    let mut table = labeled_table(1, 1);
    table.remove_row(0);
    table.remove_column(0);
    assert_eq!(table.row_count(), 1);
    assert_eq!(table.col_count(), 1);
}

#[test]
fn add_column_left_shifts_content() {
    let mut table = labeled_table(2, 2);
    table.add_column(0, ColumnPosition::Left);
    assert_eq!(table.col_count(), 3);
    assert_eq!(table.cell(0, 0).unwrap().text(), "");
    assert_eq!(table.cell(0, 1).unwrap().text(), "r0c0");
    assert_eq!(table.cell(1, 2).unwrap().text(), "r1c1");
}

#[test]
fn merge_joins_nonempty_texts_row_major() {
    let mut table = labeled_table(2, 2);
    table.rows[0].children[1].set_text("   ");
    table.merge_cells(CellSelection::from_points(
        CellRef::new(0, 0),
        CellRef::new(1, 1),
    ));

    let anchor = table.cell(0, 0).unwrap();
    assert!(anchor.is_merge_anchor());
    assert_eq!(anchor.col_span, 2);
    assert_eq!(anchor.row_span, 2);
    // Whitespace-only cells contribute nothing.
    assert_eq!(anchor.text(), "r0c0 r1c0 r1c1");

    for (row, col) in [(0, 1), (1, 0), (1, 1)] {
        let covered = table.cell(row, col).unwrap();
        assert!(covered.is_merged);
        assert_eq!(covered.merged_cells, vec![CellRef::new(0, 0)]);
        assert_eq!(covered.text(), "");
    }
}

#[test]
fn merge_normalizes_reversed_corners() {
    let mut table = labeled_table(3, 3);
    table.merge_cells(CellSelection::from_points(
        CellRef::new(2, 2),
        CellRef::new(1, 1),
    ));
    // The top-left corner of the rectangle anchors the merge.
    assert!(table.cell(1, 1).unwrap().is_merge_anchor());
    assert!(table.cell(2, 2).unwrap().is_merged);
    assert!(!table.cell(0, 0).unwrap().is_merged);
}

#[test]
fn single_cell_or_out_of_range_merge_is_noop() {
    let mut table = labeled_table(2, 2);
    let before = table.clone();

    table.merge_cells(CellSelection::from_points(
        CellRef::new(0, 0),
        CellRef::new(0, 0),
    ));
    assert_eq!(table, before);

    table.merge_cells(CellSelection::from_points(
        CellRef::new(0, 0),
        CellRef::new(0, 5),
    ));
    assert_eq!(table, before);
}

#[test]
fn unmerge_restores_grid_but_not_text() {
    let mut table = labeled_table(1, 3);
    table.merge_cells(CellSelection::from_points(
        CellRef::new(0, 0),
        CellRef::new(0, 2),
    ));
    table.unmerge_cells(0, 0);

    let anchor = table.cell(0, 0).unwrap();
    assert!(!anchor.is_merge_anchor());
    assert_eq!(anchor.col_span, 1);
    // The joined text stays with the anchor; covered cells come back empty.
    assert_eq!(anchor.text(), "r0c0 r0c1 r0c2");
    for col in 1..3 {
        let cell = table.cell(0, col).unwrap();
        assert!(!cell.is_merged);
        assert!(cell.merged_cells.is_empty());
        assert_eq!(cell.text(), "");
    }
}

#[test]
fn unmerge_on_covered_cell_is_noop() {
    let mut table = labeled_table(1, 2);
    table.merge_cells(CellSelection::from_points(
        CellRef::new(0, 0),
        CellRef::new(0, 1),
    ));
    let before = table.clone();
    table.unmerge_cells(0, 1);
    assert_eq!(table, before);
    table.unmerge_cells(5, 0);
    assert_eq!(table, before);
}

#[test]
fn row_insertion_does_not_rekey_merge_references() {
    let mut table = labeled_table(3, 3);
    table.merge_cells(CellSelection::from_points(
        CellRef::new(1, 1),
        CellRef::new(2, 2),
    ));

    table.add_row(0, RowPosition::Above);

    // The merged region shifted down one row, but covered cells still
    // back-reference the anchor's pre-insertion coordinates.
    assert!(table.cell(2, 1).unwrap().is_merge_anchor());
    let covered = table.cell(3, 2).unwrap();
    assert!(covered.is_merged);
    assert_eq!(covered.merged_cells, vec![CellRef::new(1, 1)]);
}

#[test]
fn background_transparent_clears_color() {
    let mut table = labeled_table(1, 1);
    table.set_cell_background(0, 0, "#ffee00");
    assert_eq!(
        table.cell(0, 0).unwrap().background_color.as_deref(),
        Some("#ffee00")
    );
    table.set_cell_background(0, 0, "transparent");
    assert_eq!(table.cell(0, 0).unwrap().background_color, None);
}

#[test]
fn cell_alignment_is_per_cell() {
    let mut table = labeled_table(1, 2);
    table.set_cell_alignment(0, 1, Align::Center);
    assert_eq!(table.cell(0, 0).unwrap().align, None);
    assert_eq!(table.cell(0, 1).unwrap().align, Some(Align::Center));
}
