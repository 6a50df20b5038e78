use baca::planner::{
    parser::SqlParser,
    select::{EqualityFilter, Projection},
};

#[test]
fn test_select_star() {
    let stmt = SqlParser::new()
        .parse_select("SELECT * FROM apples")
        .unwrap();
    assert_eq!(stmt.table, "apples");
    assert_eq!(stmt.projection, Projection::All);
    assert!(stmt.filter.is_none());
}

#[test]
fn test_select_named_columns() {
    let stmt = SqlParser::new()
        .parse_select("SELECT name, color FROM apples")
        .unwrap();
    assert_eq!(
        stmt.projection,
        Projection::Columns(vec!["name".to_string(), "color".to_string()])
    );
}

#[test]
fn test_select_count_star_is_case_insensitive() {
    for sql in [
        "SELECT COUNT(*) FROM apples",
        "select count(*) from apples",
        "SeLeCt CoUnT(*) FrOm apples",
    ] {
        let stmt = SqlParser::new().parse_select(sql).unwrap();
        assert_eq!(stmt.projection, Projection::Count, "for {}", sql);
    }
}

#[test]
fn test_where_equality_with_a_string_literal() {
    let stmt = SqlParser::new()
        .parse_select("SELECT name FROM apples WHERE color = 'Yellow'")
        .unwrap();
    assert_eq!(
        stmt.filter,
        Some(EqualityFilter {
            column: "color".to_string(),
            value: "Yellow".to_string(),
        })
    );
}

#[test]
fn test_where_equality_with_a_number_literal() {
    let stmt = SqlParser::new()
        .parse_select("SELECT name FROM apples WHERE id = 3")
        .unwrap();
    assert_eq!(
        stmt.filter,
        Some(EqualityFilter {
            column: "id".to_string(),
            value: "3".to_string(),
        })
    );
}

#[test]
fn test_quoted_identifiers() {
    let stmt = SqlParser::new()
        .parse_select(r#"SELECT "name" FROM "apples" WHERE "color" = 'Red'"#)
        .unwrap();
    assert_eq!(stmt.table, "apples");
    assert_eq!(
        stmt.projection,
        Projection::Columns(vec!["name".to_string()])
    );
    assert_eq!(stmt.filter.unwrap().column, "color");
}

#[test]
fn test_non_select_statements_are_rejected() {
    let parser = SqlParser::new();
    assert!(parser.parse_select("INSERT INTO apples VALUES (1)").is_err());
    assert!(parser.parse_select("DROP TABLE apples").is_err());
    assert!(parser
        .parse_select("UPDATE apples SET color = 'Red'")
        .is_err());
}

#[test]
fn test_unsupported_select_shapes_are_rejected() {
    let parser = SqlParser::new();
    // joins
    assert!(parser
        .parse_select("SELECT * FROM apples JOIN oranges ON 1 = 1")
        .is_err());
    // multi-clause WHERE
    assert!(parser
        .parse_select("SELECT * FROM apples WHERE a = 1 AND b = 2")
        .is_err());
    // inequality
    assert!(parser.parse_select("SELECT * FROM apples WHERE id > 3").is_err());
    // aggregate other than COUNT(*)
    assert!(parser.parse_select("SELECT SUM(id) FROM apples").is_err());
    // garbage
    assert!(parser.parse_select("SELEKT blorp").is_err());
}
