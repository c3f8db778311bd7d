use tracing::{info, warn};

use super::annotator::annotate;
use super::cells::SheetGrid;
use super::collector::{collect, ImportError};
use super::mapper::RowMapper;
use super::persister::TeacherSink;
use super::username::UsernameDirectory;
use super::workbook::read_sheets;
use super::ImportFailure;
use crate::auth::PasswordHasher;
use crate::config::ImportConfig;

/// Terminal state of one import request.
#[derive(Debug)]
pub enum ImportOutcome {
    /// Every row was valid and stored.
    Committed { imported: usize },
    /// Nothing was stored; `workbook` is the annotated upload.
    Rejected {
        errors: Vec<ImportError>,
        workbook: Vec<u8>,
    },
}

impl ImportOutcome {
    pub fn message(&self) -> String {
        match self {
            ImportOutcome::Committed { imported } => {
                format!("Tải lên thành công, đã thêm vào hệ thống {} giáo viên.", imported)
            }
            ImportOutcome::Rejected { errors, .. } => format!(
                "Tải lên thành công, nhưng có {} giáo viên lỗi. Kiểm tra file để cập nhật lại.",
                errors.len()
            ),
        }
    }
}

/// Bulk teacher import: parse, validate every row, then either commit all
/// rows or hand back an annotated copy of the file.
pub struct TeacherImporter<'a> {
    directory: &'a dyn UsernameDirectory,
    sink: &'a dyn TeacherSink,
    hasher: PasswordHasher,
    settings: ImportConfig,
}

impl<'a> TeacherImporter<'a> {
    pub fn new(
        directory: &'a dyn UsernameDirectory,
        sink: &'a dyn TeacherSink,
        hasher: PasswordHasher,
        settings: ImportConfig,
    ) -> Self {
        Self {
            directory,
            sink,
            hasher,
            settings,
        }
    }

    pub async fn import_bytes(&self, bytes: &[u8]) -> Result<ImportOutcome, ImportFailure> {
        let sheets = read_sheets(bytes)?;
        let (grid, others) = sheets.split_first().ok_or(ImportFailure::EmptyWorkbook)?;
        self.import_sheets(grid, others).await
    }

    /// Import the rows of `grid`. `others` are the remaining sheets of the
    /// upload, only used to rebuild the annotated workbook.
    pub async fn import_sheets(&self, grid: &SheetGrid, others: &[SheetGrid]) -> Result<ImportOutcome, ImportFailure> {
        let rows = grid.data_rows();
        if rows > self.settings.max_rows {
            return Err(ImportFailure::TooManyRows {
                rows,
                max: self.settings.max_rows,
            });
        }
        info!(rows, "Bắt đầu import {} giáo viên từ file Excel", rows);

        let mapper = RowMapper::new(self.directory, self.hasher);
        let batch = collect(&mapper, grid).await?;

        if !batch.is_clean() {
            warn!(errors = batch.errors.len(), "Import bị từ chối, trả về file lỗi");
            let workbook = annotate(grid, others, &batch.errors)?;
            return Ok(ImportOutcome::Rejected {
                errors: batch.errors,
                workbook,
            });
        }

        let imported = self.sink.persist(&batch.candidates, self.settings.batch_size).await?;
        info!(imported, "Import giáo viên hoàn tất");
        Ok(ImportOutcome::Committed { imported })
    }
}
