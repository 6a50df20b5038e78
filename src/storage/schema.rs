use serde::{Deserialize, Serialize};
use sqlparser::{
    ast::{ColumnOption, CreateIndex, CreateTable, DataType, Expr, Statement},
    dialect::SQLiteDialect,
    parser::Parser,
};
use tracing::debug;

use crate::{
    planner::error::PlannerError,
    storage::{
        btree::BTreeWalker,
        cell::{LeafCellContext, LeafTableCell},
        pager::Pager,
    },
    types::{error::DatabaseError, value::Value, PageId, RowId},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectType {
    Table,
    Index,
    Trigger,
    View,
}

impl ObjectType {
    fn parse(s: &str) -> Result<Self, DatabaseError> {
        match s {
            "table" => Ok(ObjectType::Table),
            "index" => Ok(ObjectType::Index),
            "trigger" => Ok(ObjectType::Trigger),
            "view" => Ok(ObjectType::View),
            other => Err(DatabaseError::MalformedRecord {
                reason: format!("invalid schema object type: {}", other),
            }),
        }
    }
}

/// One row of sqlite_master, the schema table stored as a B-tree rooted at
/// page 1. Triggers and views are carried but never executed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaRow {
    pub row_id: RowId,
    pub object_type: ObjectType,
    pub name: String,
    pub table_name: String,
    pub root_page: PageId,
    pub sql: String,
}

#[derive(Debug, Clone)]
pub struct ColumnInfo {
    pub name: String,
    /// Declared INTEGER PRIMARY KEY: the on-disk slot is NULL and the row
    /// ID stands in for the value.
    pub rowid_alias: bool,
}

#[derive(Debug, Clone)]
pub struct IndexInfo {
    pub name: String,
    pub root_page: PageId,
    pub columns: Vec<String>,
}

/// The schema catalog: every sqlite_master row, decoded once at open.
/// Column layouts are derived from the stored `CREATE ...` text on demand.
pub struct Catalog {
    rows: Vec<SchemaRow>,
}

impl Catalog {
    pub fn load(pager: &Pager) -> Result<Self, DatabaseError> {
        let walker = BTreeWalker::new(pager);
        let mut cells = Vec::new();
        walker.walk_table(1, &LeafCellContext::default(), &mut cells)?;

        let rows = cells
            .iter()
            .map(schema_row_from_cell)
            .collect::<Result<Vec<_>, _>>()?;
        debug!(objects = rows.len(), "loaded schema catalog");
        Ok(Self { rows })
    }

    pub fn rows(&self) -> &[SchemaRow] {
        &self.rows
    }

    /// Count of sqlite_master rows, the figure `.dbinfo` reports.
    pub fn object_count(&self) -> usize {
        self.rows.len()
    }

    /// Table names in sqlite_master order.
    pub fn table_names(&self) -> Vec<&str> {
        self.rows
            .iter()
            .filter(|r| r.object_type == ObjectType::Table)
            .map(|r| r.table_name.as_str())
            .collect()
    }

    fn table_row(&self, table: &str) -> Result<&SchemaRow, DatabaseError> {
        self.rows
            .iter()
            .find(|r| r.object_type == ObjectType::Table && r.table_name == table)
            .ok_or_else(|| DatabaseError::TableNotFound {
                name: table.to_string(),
            })
    }

    pub fn table_root_page(&self, table: &str) -> Result<PageId, DatabaseError> {
        Ok(self.table_row(table)?.root_page)
    }

    /// All `CREATE INDEX` indices on `table`, in sqlite_master order.
    /// Auto-created indices carry no SQL and are skipped.
    pub fn indices_for(&self, table: &str) -> Result<Vec<IndexInfo>, DatabaseError> {
        self.rows
            .iter()
            .filter(|r| {
                r.object_type == ObjectType::Index && r.table_name == table && !r.sql.is_empty()
            })
            .map(|r| {
                let columns = parse_index_columns(&r.sql)?;
                Ok(IndexInfo {
                    name: r.name.clone(),
                    root_page: r.root_page,
                    columns,
                })
            })
            .collect()
    }

    /// Column layout of `table`, parsed from its `CREATE TABLE` text.
    pub fn columns(&self, table: &str) -> Result<Vec<ColumnInfo>, DatabaseError> {
        parse_table_columns(&self.table_row(table)?.sql)
    }

    /// Positions of `names` within the table's column order, in the order
    /// the names were requested.
    pub fn column_positions(
        &self,
        table: &str,
        names: &[String],
    ) -> Result<Vec<usize>, DatabaseError> {
        let columns = self.columns(table)?;
        names
            .iter()
            .map(|name| {
                columns
                    .iter()
                    .position(|c| &c.name == name)
                    .ok_or_else(|| DatabaseError::ColumnNotFound {
                        name: name.clone(),
                        table: table.to_string(),
                    })
            })
            .collect()
    }

    pub fn all_column_positions(&self, table: &str) -> Result<Vec<usize>, DatabaseError> {
        Ok((0..self.columns(table)?.len()).collect())
    }

    /// Positions of columns whose NULL slots alias the row ID.
    pub fn rowid_alias_positions(&self, table: &str) -> Result<Vec<usize>, DatabaseError> {
        Ok(self
            .columns(table)?
            .iter()
            .enumerate()
            .filter(|(_, c)| c.rowid_alias)
            .map(|(i, _)| i)
            .collect())
    }
}

fn schema_row_from_cell(cell: &LeafTableCell) -> Result<SchemaRow, DatabaseError> {
    if cell.values.len() < 5 {
        return Err(DatabaseError::MalformedRecord {
            reason: format!(
                "schema row has {} columns, expected 5",
                cell.values.len()
            ),
        });
    }

    let text = |index: usize, what: &str| -> Result<String, DatabaseError> {
        match &cell.values[index] {
            Value::Text(s) => Ok(s.clone()),
            other => Err(DatabaseError::MalformedRecord {
                reason: format!("schema row {} is not text: {:?}", what, other),
            }),
        }
    };

    let object_type = ObjectType::parse(&text(0, "type")?)?;
    let name = text(1, "name")?;
    let table_name = text(2, "tbl_name")?;
    // views and triggers carry no B-tree; their rootpage is 0 or NULL
    let root_page = match &cell.values[3] {
        Value::Integer(n) if *n >= 0 => *n as PageId,
        Value::Null => 0,
        other => {
            return Err(DatabaseError::MalformedRecord {
                reason: format!("schema row rootpage is not an integer: {:?}", other),
            })
        }
    };
    // auto-created indices store NULL here
    let sql = match &cell.values[4] {
        Value::Null => String::new(),
        _ => text(4, "sql")?,
    };

    Ok(SchemaRow {
        row_id: cell.row_id,
        object_type,
        name,
        table_name,
        root_page,
        sql,
    })
}

fn parse_one_statement(sql: &str) -> Result<Statement, DatabaseError> {
    let dialect = SQLiteDialect {};
    let mut statements = Parser::parse_sql(&dialect, sql).map_err(PlannerError::from)?;
    if statements.len() != 1 {
        return Err(DatabaseError::Sql(PlannerError::InvalidQuery(format!(
            "expected exactly one statement in schema SQL: {}",
            sql
        ))));
    }
    Ok(statements.remove(0))
}

fn parse_table_columns(sql: &str) -> Result<Vec<ColumnInfo>, DatabaseError> {
    match parse_one_statement(sql)? {
        Statement::CreateTable(CreateTable { columns, .. }) => Ok(columns
            .iter()
            .map(|c| {
                let is_integer = matches!(c.data_type, DataType::Integer(_) | DataType::Int(_));
                let is_primary_key = c.options.iter().any(|o| {
                    matches!(o.option, ColumnOption::Unique { is_primary: true, .. })
                });
                ColumnInfo {
                    name: c.name.value.clone(),
                    rowid_alias: is_integer && is_primary_key,
                }
            })
            .collect()),
        other => Err(DatabaseError::Sql(PlannerError::UnsupportedStatement(
            format!("schema SQL is not CREATE TABLE: {}", other),
        ))),
    }
}

fn parse_index_columns(sql: &str) -> Result<Vec<String>, DatabaseError> {
    match parse_one_statement(sql)? {
        Statement::CreateIndex(CreateIndex { columns, .. }) => columns
            .iter()
            .map(|c| match &c.expr {
                Expr::Identifier(ident) => Ok(ident.value.clone()),
                other => Err(DatabaseError::Sql(PlannerError::UnsupportedExpression(
                    format!("index expression is not a plain column: {}", other),
                ))),
            })
            .collect(),
        other => Err(DatabaseError::Sql(PlannerError::UnsupportedStatement(
            format!("schema SQL is not CREATE INDEX: {}", other),
        ))),
    }
}
