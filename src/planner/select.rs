/// The restricted `SELECT` shape the engine executes: one table, a
/// projection, and at most one equality condition.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectStatement {
    pub table: String,
    pub projection: Projection,
    pub filter: Option<EqualityFilter>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Projection {
    /// `SELECT *`
    All,
    /// `SELECT COUNT(*)`
    Count,
    /// `SELECT a, b, c`
    Columns(Vec<String>),
}

/// `WHERE column = literal`. The literal is kept in its textual form; the
/// cell readers compare it against decoded column values.
#[derive(Debug, Clone, PartialEq)]
pub struct EqualityFilter {
    pub column: String,
    pub value: String,
}
