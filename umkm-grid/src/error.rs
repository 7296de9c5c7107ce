//! Error type shared by the table and tree engines.

use thiserror::Error;

/// Rejected caller input.
///
/// Every variant describes something the caller asked for that the current
/// state cannot honour. None of them leave the engine in a modified state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("page size {0} is not one of 5, 10, 25, 50, 100")]
    InvalidPageSize(usize),
    #[error("no column at index {0}")]
    UnknownColumn(usize),
    #[error("column `{0}` is not orderable")]
    NotOrderable(String),
    #[error("page {page} is outside 1..={total_pages}")]
    PageOutOfRange { page: usize, total_pages: usize },
    #[error("no row at index {0}")]
    UnknownRow(usize),
    #[error("no tree node with id {0}")]
    UnknownNode(i64),
    #[error("operation is only available in {0} mode")]
    WrongMode(&'static str),
}
