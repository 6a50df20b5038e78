use std::collections::BTreeSet;

use tracing::debug;

use crate::{
    planner::plan::QueryPlan,
    storage::{btree::BTreeWalker, cell::LeafCellContext, pager::Pager},
    types::{error::DatabaseError, row::Row},
};

#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutput {
    Count(u64),
    Rows(Vec<Row>),
}

/// Executes a resolved plan against the pager. Rows come back in row-ID
/// order, the natural order of the table walk.
pub struct QueryExecutor<'a> {
    pager: &'a Pager,
}

impl<'a> QueryExecutor<'a> {
    pub fn new(pager: &'a Pager) -> Self {
        Self { pager }
    }

    pub fn execute(&self, plan: &QueryPlan) -> Result<QueryOutput, DatabaseError> {
        let walker = BTreeWalker::new(self.pager);

        match plan {
            QueryPlan::CountScan { table_root } => {
                Ok(QueryOutput::Count(walker.count_rows(*table_root)?))
            }

            QueryPlan::TableScan {
                table_root,
                projection,
                rowid_alias,
                filter,
            } => {
                let ctx = LeafCellContext {
                    projection: projection.as_deref(),
                    rowid_alias_positions: rowid_alias,
                    filter: filter.as_ref(),
                };
                let mut cells = Vec::new();
                walker.walk_table(*table_root, &ctx, &mut cells)?;
                Ok(QueryOutput::Rows(
                    cells
                        .into_iter()
                        .map(|c| Row::new(c.row_id, c.values))
                        .collect(),
                ))
            }

            QueryPlan::IndexSeek {
                index_root,
                table_root,
                key,
                projection,
                rowid_alias,
            } => {
                let mut row_ids = BTreeSet::new();
                walker.walk_index(*index_root, key, &mut row_ids)?;
                debug!(key = %key, matches = row_ids.len(), "index walk finished");

                let ctx = LeafCellContext {
                    projection: projection.as_deref(),
                    rowid_alias_positions: rowid_alias,
                    filter: None,
                };
                let mut cells = Vec::new();
                walker.walk_table_by_row_ids(*table_root, &row_ids, &ctx, &mut cells)?;
                Ok(QueryOutput::Rows(
                    cells
                        .into_iter()
                        .map(|c| Row::new(c.row_id, c.values))
                        .collect(),
                ))
            }
        }
    }
}
