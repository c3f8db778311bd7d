use serde::Serialize;
use std::collections::HashSet;
use tracing::warn;

use super::cells::{ImportRow, SheetGrid};
use super::columns::error_column;
use super::mapper::{MappedRow, RowMapper, TeacherCandidate};
use super::ImportFailure;

/// A rejected row: sheet line number, 0-based column and reason.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportError {
    pub row: usize,
    pub col: usize,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct ImportBatch {
    pub candidates: Vec<TeacherCandidate>,
    pub errors: Vec<ImportError>,
    pub skipped: usize,
}

impl ImportBatch {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Map every data row of `grid` (header excluded), in order, without
/// stopping at the first rejection. Rows are reported by their sheet line
/// number, so the first data row is 2.
pub async fn collect(mapper: &RowMapper<'_>, grid: &SheetGrid) -> Result<ImportBatch, ImportFailure> {
    let mut batch = ImportBatch::default();
    let mut reserved: HashSet<String> = HashSet::new();

    for (position, cells) in grid.rows.iter().enumerate().skip(1) {
        let row_index = position + 1;
        let row = ImportRow::new(cells);

        if row.is_blank() {
            warn!(row = row_index, "Bỏ qua dòng trống");
            batch.skipped += 1;
            continue;
        }

        match mapper.map(&row, row_index, &reserved).await? {
            MappedRow::Valid(candidate) => {
                reserved.insert(candidate.user.user_name.clone());
                batch.candidates.push(candidate);
            }
            MappedRow::Invalid(err) => {
                warn!(row = err.row, "{}", err.message);
                batch.errors.push(ImportError {
                    row: err.row,
                    col: error_column(&err.message),
                    message: err.message,
                });
            }
        }
    }

    Ok(batch)
}
