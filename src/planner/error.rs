use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlannerError {
    #[error("SQL parsing error: {0}")]
    SqlParse(#[from] sqlparser::parser::ParserError),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Unsupported statement: {0}")]
    UnsupportedStatement(String),

    #[error("Unsupported expression: {0}")]
    UnsupportedExpression(String),
}
