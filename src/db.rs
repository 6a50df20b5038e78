use std::path::Path;

use crate::{
    executor::{
        query::{QueryExecutor, QueryOutput},
        scan::{PlanScanner, ScanIterator},
    },
    planner::{
        parser::SqlParser,
        plan::Planner,
        select::{Projection, SelectStatement},
    },
    storage::{pager::Pager, schema::Catalog},
    types::error::DatabaseError,
};

/// One open database: a read-only pager plus the schema catalog decoded
/// from page 1. Queries are parsed, planned and executed against it; the
/// file is never written.
pub struct Database {
    pager: Pager,
    catalog: Catalog,
}

impl Database {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, DatabaseError> {
        let pager = Pager::open(path)?;
        let catalog = Catalog::load(&pager)?;
        Ok(Self { pager, catalog })
    }

    pub fn pager(&self) -> &Pager {
        &self.pager
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn page_size(&self) -> u32 {
        self.pager.page_size()
    }

    /// The figure `.dbinfo` reports as "number of tables".
    pub fn object_count(&self) -> usize {
        self.catalog.object_count()
    }

    pub fn table_names(&self) -> Vec<&str> {
        self.catalog.table_names()
    }

    pub fn parse(&self, sql: &str) -> Result<SelectStatement, DatabaseError> {
        Ok(SqlParser::new().parse_select(sql)?)
    }

    /// Plan and run a statement, materializing the full result.
    pub fn execute(&self, stmt: &SelectStatement) -> Result<QueryOutput, DatabaseError> {
        let plan = Planner::new(&self.catalog).plan(stmt)?;
        let output = QueryExecutor::new(&self.pager).execute(&plan)?;
        // a filtered COUNT runs as a table scan; collapse it here
        match (&stmt.projection, output) {
            (Projection::Count, QueryOutput::Rows(rows)) => {
                Ok(QueryOutput::Count(rows.len() as u64))
            }
            (_, output) => Ok(output),
        }
    }

    pub fn execute_sql(&self, sql: &str) -> Result<QueryOutput, DatabaseError> {
        let stmt = self.parse(sql)?;
        self.execute(&stmt)
    }

    /// Plan a statement and return a row stream over the result. Dropping
    /// the iterator abandons the scan.
    pub fn scan(
        &self,
        stmt: &SelectStatement,
    ) -> Result<ScanIterator<PlanScanner<'_>>, DatabaseError> {
        let plan = Planner::new(&self.catalog).plan(stmt)?;
        Ok(ScanIterator::new(PlanScanner::new(&self.pager, plan)))
    }
}
