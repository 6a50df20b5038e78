use std::collections::VecDeque;

use crate::{
    executor::query::{QueryExecutor, QueryOutput},
    planner::plan::QueryPlan,
    storage::pager::Pager,
    types::{error::DatabaseError, row::Row, value::Value},
};

pub trait Scanner {
    fn scan(&mut self) -> Result<Option<Row>, DatabaseError>;
    fn scan_batch(&mut self, batch_size: usize) -> Result<Vec<Row>, DatabaseError>;
    fn reset(&mut self) -> Result<(), DatabaseError>;
}

/// Scanner over one query plan. The plan runs on the first `scan` call;
/// rows are then handed out one at a time. A `COUNT` plan yields a single
/// one-column row carrying the count.
pub struct PlanScanner<'a> {
    pager: &'a Pager,
    plan: QueryPlan,
    buffer: Option<VecDeque<Row>>,
}

impl<'a> PlanScanner<'a> {
    pub fn new(pager: &'a Pager, plan: QueryPlan) -> Self {
        Self {
            pager,
            plan,
            buffer: None,
        }
    }

    fn fill(&mut self) -> Result<&mut VecDeque<Row>, DatabaseError> {
        if self.buffer.is_none() {
            let executor = QueryExecutor::new(self.pager);
            let rows = match executor.execute(&self.plan)? {
                QueryOutput::Rows(rows) => rows,
                QueryOutput::Count(n) => vec![Row::new(0, vec![Value::Integer(n as i64)])],
            };
            self.buffer = Some(VecDeque::from(rows));
        }
        Ok(self.buffer.get_or_insert_with(VecDeque::new))
    }
}

impl Scanner for PlanScanner<'_> {
    fn scan(&mut self) -> Result<Option<Row>, DatabaseError> {
        Ok(self.fill()?.pop_front())
    }

    fn scan_batch(&mut self, batch_size: usize) -> Result<Vec<Row>, DatabaseError> {
        let buffer = self.fill()?;
        let take = batch_size.min(buffer.len());
        Ok(buffer.drain(..take).collect())
    }

    fn reset(&mut self) -> Result<(), DatabaseError> {
        self.buffer = None;
        Ok(())
    }
}

pub struct ScanIterator<S: Scanner> {
    scanner: S,
}

impl<S: Scanner> ScanIterator<S> {
    pub fn new(scanner: S) -> Self {
        Self { scanner }
    }
}

impl<S: Scanner> Iterator for ScanIterator<S> {
    type Item = Result<Row, DatabaseError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.scanner.scan() {
            Ok(Some(row)) => Some(Ok(row)),
            Ok(None) => None,
            Err(e) => Some(Err(e)),
        }
    }
}
