use super::columns::ImportColumn;

/// Raw cell content as read from the uploaded sheet.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
}

static EMPTY: CellValue = CellValue::Empty;

impl CellValue {
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            CellValue::Number(_) => false,
        }
    }

    /// Trimmed text rendering; `None` for blank cells. Whole numbers lose
    /// their fractional part so `12.0` reads as `"12"`.
    pub fn as_text(&self) -> Option<String> {
        match self {
            CellValue::Empty => None,
            CellValue::Text(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
            CellValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => Some(format!("{}", *n as i64)),
            CellValue::Number(n) => Some(n.to_string()),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            CellValue::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            CellValue::Empty => None,
        }
    }
}

/// Every cell of the first sheet, row-major, indexed by 0-based sheet position.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetGrid {
    pub name: String,
    pub rows: Vec<Vec<CellValue>>,
}

impl SheetGrid {
    /// Lines after the header
    pub fn data_rows(&self) -> usize {
        self.rows.len().saturating_sub(1)
    }

    pub fn cell(&self, row: usize, col: usize) -> &CellValue {
        self.rows.get(row).and_then(|r| r.get(col)).unwrap_or(&EMPTY)
    }
}

/// One data line seen through the import schema.
#[derive(Debug, Clone, Copy)]
pub struct ImportRow<'a> {
    cells: &'a [CellValue],
}

impl<'a> ImportRow<'a> {
    pub fn new(cells: &'a [CellValue]) -> Self {
        Self { cells }
    }

    pub fn cell(&self, column: ImportColumn) -> &'a CellValue {
        self.cells.get(column.index()).unwrap_or(&EMPTY)
    }

    pub fn text(&self, column: ImportColumn) -> Option<String> {
        self.cell(column).as_text()
    }

    /// True when none of the schema columns hold a value
    pub fn is_blank(&self) -> bool {
        ImportColumn::ALL.iter().all(|c| self.cell(*c).is_blank())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_cells_as_text() {
        assert_eq!(CellValue::Number(12.0).as_text(), Some("12".to_string()));
        assert_eq!(CellValue::Number(1.5).as_text(), Some("1.5".to_string()));
        assert_eq!(CellValue::Text("  Quận 1 ".into()).as_text(), Some("Quận 1".to_string()));
        assert_eq!(CellValue::Text("   ".into()).as_text(), None);
        assert_eq!(CellValue::Empty.as_text(), None);
    }

    #[test]
    fn reads_numbers_from_text() {
        assert_eq!(CellValue::Text(" 1 ".into()).as_number(), Some(1.0));
        assert_eq!(CellValue::Text("một".into()).as_number(), None);
        assert_eq!(CellValue::Text("NaN".into()).as_number(), None);
        assert_eq!(CellValue::Number(3.0).as_number(), Some(3.0));
    }

    #[test]
    fn short_rows_read_as_empty() {
        let cells = vec![CellValue::Text("gv01".into())];
        let row = ImportRow::new(&cells);
        assert_eq!(row.text(ImportColumn::UserName), Some("gv01".to_string()));
        assert_eq!(row.cell(ImportColumn::IcdlCertificate), &CellValue::Empty);
        assert!(!row.is_blank());
        assert!(ImportRow::new(&[CellValue::Text(" ".into())]).is_blank());
    }
}
