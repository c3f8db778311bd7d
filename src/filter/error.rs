use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum FilterError {
    #[error("Invalid sort column: {0}")]
    InvalidColumn(String),

    #[error("Invalid page: {0}")]
    InvalidPage(i64),

    #[error("Invalid limit: {0}")]
    InvalidLimit(i64),
}
