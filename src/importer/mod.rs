//! Bulk teacher import from `.xlsx` files.
//!
//! Flow: bytes → [`workbook::read_sheets`] (rows come from the first sheet)
//! → row ceiling check → [`collector::collect`] (one
//! [`mapper::RowMapper::map`] per row) → either
//! [`persister::TeacherSink::persist`] when every row is valid, or
//! [`annotator::annotate`] when any row is not. The two outcomes never mix.

pub mod annotator;
pub mod cells;
pub mod collector;
pub mod columns;
pub mod mapper;
pub mod persister;
pub mod service;
pub mod template;
pub mod text;
pub mod username;
pub mod workbook;

use thiserror::Error;

use crate::auth::PasswordError;
use crate::database::DatabaseError;

pub use collector::ImportError;
pub use mapper::{MappedRow, RowError, RowMapper, TeacherCandidate};
pub use persister::{PgTeacherStore, TeacherSink};
pub use service::{ImportOutcome, TeacherImporter};
pub use username::UsernameDirectory;

/// File name of the annotated workbook returned on rejection
pub const ERROR_FILE_NAME: &str = "danh_sach_gv_loi.xlsx";

/// Conditions that abort an import as a whole
#[derive(Debug, Error)]
pub enum ImportFailure {
    #[error("File vượt quá {max} dòng, vui lòng chia nhỏ để import")]
    TooManyRows { rows: usize, max: usize },

    #[error("File Excel không hợp lệ: {0}")]
    UnreadableWorkbook(String),

    #[error("File Excel không có trang tính nào")]
    EmptyWorkbook,

    #[error(transparent)]
    Storage(#[from] DatabaseError),

    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error("Không thể tạo file Excel: {0}")]
    Writer(#[from] rust_xlsxwriter::XlsxError),
}
