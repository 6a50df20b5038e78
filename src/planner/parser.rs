use sqlparser::{
    ast::{
        BinaryOperator, Expr, FunctionArg, FunctionArgExpr, FunctionArguments, Query, Select,
        SelectItem, SetExpr, Statement, TableFactor, Value as AstValue,
    },
    dialect::SQLiteDialect,
    parser::Parser,
};

use crate::planner::{
    error::PlannerError,
    select::{EqualityFilter, Projection, SelectStatement},
};

pub struct SqlParser;

impl SqlParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse a SQL string and reduce it to the restricted `SELECT` shape.
    pub fn parse_select(&self, sql: &str) -> Result<SelectStatement, PlannerError> {
        let dialect = SQLiteDialect {};
        let statements = Parser::parse_sql(&dialect, sql)?;

        if statements.len() != 1 {
            return Err(PlannerError::InvalidQuery(
                "expected exactly one statement".to_string(),
            ));
        }

        match &statements[0] {
            Statement::Query(query) => self.reduce_query(query),
            other => Err(PlannerError::UnsupportedStatement(other.to_string())),
        }
    }

    fn reduce_query(&self, query: &Query) -> Result<SelectStatement, PlannerError> {
        let select = match query.body.as_ref() {
            SetExpr::Select(select) => select,
            other => return Err(PlannerError::UnsupportedStatement(other.to_string())),
        };

        Ok(SelectStatement {
            table: self.source_table(select)?,
            projection: self.reduce_projection(select)?,
            filter: self.reduce_filter(select.selection.as_ref())?,
        })
    }

    fn source_table(&self, select: &Select) -> Result<String, PlannerError> {
        if select.from.len() != 1 || !select.from[0].joins.is_empty() {
            return Err(PlannerError::InvalidQuery(
                "queries read from exactly one table".to_string(),
            ));
        }
        match &select.from[0].relation {
            TableFactor::Table { name, .. } => match name.0.last() {
                Some(ident) => Ok(ident.value.clone()),
                None => Err(PlannerError::InvalidQuery("empty table name".to_string())),
            },
            other => Err(PlannerError::UnsupportedExpression(other.to_string())),
        }
    }

    fn reduce_projection(&self, select: &Select) -> Result<Projection, PlannerError> {
        if select.projection.len() == 1 {
            match &select.projection[0] {
                SelectItem::Wildcard(_) => return Ok(Projection::All),
                SelectItem::UnnamedExpr(Expr::Function(f)) => {
                    if !f.name.to_string().eq_ignore_ascii_case("count") {
                        return Err(PlannerError::UnsupportedExpression(f.to_string()));
                    }
                    let is_star = matches!(
                        &f.args,
                        FunctionArguments::List(list)
                            if list.args.len() == 1
                                && matches!(
                                    &list.args[0],
                                    FunctionArg::Unnamed(FunctionArgExpr::Wildcard)
                                )
                    );
                    if !is_star {
                        return Err(PlannerError::UnsupportedExpression(f.to_string()));
                    }
                    return Ok(Projection::Count);
                }
                _ => {}
            }
        }

        let columns = select
            .projection
            .iter()
            .map(|item| match item {
                SelectItem::UnnamedExpr(Expr::Identifier(ident)) => Ok(ident.value.clone()),
                other => Err(PlannerError::UnsupportedExpression(other.to_string())),
            })
            .collect::<Result<Vec<_>, _>>()?;

        if columns.is_empty() {
            return Err(PlannerError::InvalidQuery("no columns selected".to_string()));
        }
        Ok(Projection::Columns(columns))
    }

    fn reduce_filter(
        &self,
        selection: Option<&Expr>,
    ) -> Result<Option<EqualityFilter>, PlannerError> {
        let Some(expr) = selection else {
            return Ok(None);
        };

        match expr {
            Expr::BinaryOp { left, op, right } if *op == BinaryOperator::Eq => {
                let column = match left.as_ref() {
                    Expr::Identifier(ident) => ident.value.clone(),
                    other => {
                        return Err(PlannerError::UnsupportedExpression(format!(
                            "WHERE key must be a column name, got {}",
                            other
                        )))
                    }
                };
                let value = match right.as_ref() {
                    Expr::Value(AstValue::SingleQuotedString(s)) => s.clone(),
                    Expr::Value(AstValue::Number(n, _)) => n.clone(),
                    other => {
                        return Err(PlannerError::UnsupportedExpression(format!(
                            "WHERE value must be a literal, got {}",
                            other
                        )))
                    }
                };
                Ok(Some(EqualityFilter { column, value }))
            }
            other => Err(PlannerError::UnsupportedExpression(format!(
                "only a single equality WHERE is supported, got {}",
                other
            ))),
        }
    }
}

impl Default for SqlParser {
    fn default() -> Self {
        Self::new()
    }
}
