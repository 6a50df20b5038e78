use tracing::debug;

use crate::{
    planner::select::{Projection, SelectStatement},
    storage::{
        cell::RowFilter,
        schema::{Catalog, IndexInfo},
    },
    types::{error::DatabaseError, PageId},
};

/// A resolved traversal plan: which B-tree to start from and how leaf
/// cells are filtered and projected. `projection: None` materializes every
/// column; `Some` materializes exactly those positions in order.
#[derive(Debug, Clone)]
pub enum QueryPlan {
    /// `COUNT(*)` without a condition: count leaf cells, parse no record.
    CountScan { table_root: PageId },
    /// Walk the table tree, filtering at the leaves.
    TableScan {
        table_root: PageId,
        projection: Option<Vec<usize>>,
        rowid_alias: Vec<usize>,
        filter: Option<RowFilter>,
    },
    /// Walk an index tree for the key, then re-enter the table tree
    /// restricted to the matching row IDs.
    IndexSeek {
        index_root: PageId,
        table_root: PageId,
        key: String,
        projection: Option<Vec<usize>>,
        rowid_alias: Vec<usize>,
    },
}

pub struct Planner<'a> {
    catalog: &'a Catalog,
}

impl<'a> Planner<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    pub fn plan(&self, stmt: &SelectStatement) -> Result<QueryPlan, DatabaseError> {
        let table_root = self.catalog.table_root_page(&stmt.table)?;

        if let (Projection::Count, None) = (&stmt.projection, &stmt.filter) {
            return Ok(QueryPlan::CountScan { table_root });
        }

        let rowid_alias = self.catalog.rowid_alias_positions(&stmt.table)?;
        let projection = match &stmt.projection {
            Projection::All => None,
            // a filtered COUNT materializes no columns, only surviving rows
            Projection::Count => Some(Vec::new()),
            Projection::Columns(names) => {
                Some(self.catalog.column_positions(&stmt.table, names)?)
            }
        };

        let Some(filter) = &stmt.filter else {
            return Ok(QueryPlan::TableScan {
                table_root,
                projection,
                rowid_alias,
                filter: None,
            });
        };

        if let Some(index) = self.matching_index(&stmt.table, &filter.column)? {
            debug!(index = %index.name, root = index.root_page, "using index");
            return Ok(QueryPlan::IndexSeek {
                index_root: index.root_page,
                table_root,
                key: filter.value.clone(),
                projection,
                rowid_alias,
            });
        }

        let column_pos = self
            .catalog
            .column_positions(&stmt.table, std::slice::from_ref(&filter.column))?[0];
        Ok(QueryPlan::TableScan {
            table_root,
            projection,
            rowid_alias,
            filter: Some(RowFilter {
                column_pos,
                value: filter.value.clone(),
            }),
        })
    }

    fn matching_index(
        &self,
        table: &str,
        column: &str,
    ) -> Result<Option<IndexInfo>, DatabaseError> {
        Ok(self
            .catalog
            .indices_for(table)?
            .into_iter()
            .find(|index| index.columns.iter().any(|c| c == column)))
    }
}
