use std::collections::BTreeSet;
use std::io::Write;

use baca::{
    storage::{
        btree::BTreeWalker,
        cell::{LeafCellContext, RowFilter},
        pager::Pager,
    },
    types::{value::Value, RowId},
    utils::fixture::{schema_row, DatabaseBuilder},
};
use tempfile::NamedTempFile;

fn company(row_id: RowId, name: &str, country: &str) -> (RowId, Vec<Value>) {
    (
        row_id,
        vec![
            Value::Null, // id aliases the row ID
            Value::Text(name.to_string()),
            Value::Text(country.to_string()),
        ],
    )
}

/// Two-level table tree plus a two-level index tree with duplicate keys:
///
///   page 2: interior table  [child 3 up to rowid 3] -> right-most 4
///   page 3: rows 1..3       page 4: rows 4..5
///   page 5: interior index  [child 6, key "eritrea", rowid 3] -> right-most 7
///   page 6: albania:1, eritrea:2    page 7: eritrea:4, france:5
fn companies_database() -> Vec<u8> {
    let mut builder = DatabaseBuilder::new(4096);
    builder.push_leaf_table_page(&[
        (
            1,
            schema_row(
                "table",
                "companies",
                "companies",
                2,
                "CREATE TABLE companies (id integer primary key, name text, country text)",
            ),
        ),
        (
            2,
            schema_row(
                "index",
                "idx_companies_country",
                "companies",
                5,
                "CREATE INDEX idx_companies_country on companies (country)",
            ),
        ),
    ]);
    builder.push_interior_table_page(&[(3, 3)], 4);
    builder.push_leaf_table_page(&[
        company(1, "Acme", "albania"),
        company(2, "Eri Co", "eritrea"),
        company(3, "Desert Works", "eritrea"),
    ]);
    builder.push_leaf_table_page(&[
        company(4, "Red Sea Lines", "eritrea"),
        company(5, "Paris Goods", "france"),
    ]);
    builder.push_interior_index_page(&[(6, Value::Text("eritrea".to_string()), 3)], 7);
    builder.push_leaf_index_page(&[
        (Value::Text("albania".to_string()), 1),
        (Value::Text("eritrea".to_string()), 2),
    ]);
    builder.push_leaf_index_page(&[
        (Value::Text("eritrea".to_string()), 4),
        (Value::Text("france".to_string()), 5),
    ]);
    builder.build()
}

fn open_pager(image: &[u8]) -> (NamedTempFile, Pager) {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(image).unwrap();
    file.flush().unwrap();
    let pager = Pager::open(file.path()).unwrap();
    (file, pager)
}

#[test]
fn test_table_walk_visits_every_leaf_in_rowid_order() {
    let image = companies_database();
    let (_file, pager) = open_pager(&image);
    let walker = BTreeWalker::new(&pager);

    let ctx = LeafCellContext {
        rowid_alias_positions: &[0],
        ..Default::default()
    };
    let mut cells = Vec::new();
    walker.walk_table(2, &ctx, &mut cells).unwrap();

    let row_ids: Vec<RowId> = cells.iter().map(|c| c.row_id).collect();
    assert_eq!(row_ids, vec![1, 2, 3, 4, 5]);
    // the alias column materializes as the row ID
    assert_eq!(cells[0].values[0], Value::Integer(1));
    assert_eq!(cells[4].values[0], Value::Integer(5));
}

#[test]
fn test_count_rows_spans_all_leaves() {
    let image = companies_database();
    let (_file, pager) = open_pager(&image);
    let walker = BTreeWalker::new(&pager);

    assert_eq!(walker.count_rows(2).unwrap(), 5);
    assert_eq!(walker.count_rows(3).unwrap(), 3);
}

#[test]
fn test_leaf_filter_runs_before_projection() {
    let image = companies_database();
    let (_file, pager) = open_pager(&image);
    let walker = BTreeWalker::new(&pager);

    let filter = RowFilter {
        column_pos: 2,
        value: "eritrea".to_string(),
    };
    let projection = [1usize];
    let ctx = LeafCellContext {
        projection: Some(&projection),
        rowid_alias_positions: &[0],
        filter: Some(&filter),
    };
    let mut cells = Vec::new();
    walker.walk_table(2, &ctx, &mut cells).unwrap();

    let names: Vec<&Value> = cells.iter().map(|c| &c.values[0]).collect();
    assert_eq!(
        names,
        vec![
            &Value::Text("Eri Co".to_string()),
            &Value::Text("Desert Works".to_string()),
            &Value::Text("Red Sea Lines".to_string()),
        ]
    );
    // subset projection carries only the requested column
    assert!(cells.iter().all(|c| c.values.len() == 1));
}

#[test]
fn test_index_walk_finds_duplicates_exactly_once() {
    let image = companies_database();
    let (_file, pager) = open_pager(&image);
    let walker = BTreeWalker::new(&pager);

    // duplicates live on the interior page, its left subtree and the
    // right-most subtree
    let mut row_ids = BTreeSet::new();
    walker.walk_index(5, "eritrea", &mut row_ids).unwrap();
    assert_eq!(row_ids.into_iter().collect::<Vec<_>>(), vec![2, 3, 4]);

    let mut row_ids = BTreeSet::new();
    walker.walk_index(5, "albania", &mut row_ids).unwrap();
    assert_eq!(row_ids.into_iter().collect::<Vec<_>>(), vec![1]);

    let mut row_ids = BTreeSet::new();
    walker.walk_index(5, "zimbabwe", &mut row_ids).unwrap();
    assert!(row_ids.is_empty());
}

#[test]
fn test_rowid_restricted_walk_matches_the_full_scan() {
    let image = companies_database();
    let (_file, pager) = open_pager(&image);
    let walker = BTreeWalker::new(&pager);

    let ctx = LeafCellContext {
        rowid_alias_positions: &[0],
        ..Default::default()
    };

    let targets: BTreeSet<RowId> = [2, 4].into_iter().collect();
    let mut restricted = Vec::new();
    walker
        .walk_table_by_row_ids(2, &targets, &ctx, &mut restricted)
        .unwrap();

    let mut full = Vec::new();
    walker.walk_table(2, &ctx, &mut full).unwrap();
    full.retain(|c| targets.contains(&c.row_id));

    assert_eq!(restricted.len(), 2);
    for (a, b) in restricted.iter().zip(full.iter()) {
        assert_eq!(a.row_id, b.row_id);
        assert_eq!(a.values, b.values);
    }
}

#[test]
fn test_rowid_restricted_walk_with_an_empty_set() {
    let image = companies_database();
    let (_file, pager) = open_pager(&image);
    let walker = BTreeWalker::new(&pager);

    let ctx = LeafCellContext::default();
    let mut cells = Vec::new();
    walker
        .walk_table_by_row_ids(2, &BTreeSet::new(), &ctx, &mut cells)
        .unwrap();
    assert!(cells.is_empty());
}

#[test]
fn test_walking_an_index_root_as_a_table_is_rejected() {
    let image = companies_database();
    let (_file, pager) = open_pager(&image);
    let walker = BTreeWalker::new(&pager);

    let mut cells = Vec::new();
    assert!(walker
        .walk_table(5, &LeafCellContext::default(), &mut cells)
        .is_err());

    let mut row_ids = BTreeSet::new();
    assert!(walker.walk_index(2, "x", &mut row_ids).is_err());
}
