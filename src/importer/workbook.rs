use calamine::{Data, Range, Reader, Xlsx};
use chrono::NaiveDate;
use std::io::Cursor;

use super::cells::{CellValue, SheetGrid};
use super::ImportFailure;

/// Parse the first worksheet of an `.xlsx` upload into a cell grid whose
/// indexes match sheet positions, even when the used range does not start
/// at A1.
pub fn read_first_sheet(bytes: &[u8]) -> Result<SheetGrid, ImportFailure> {
    read_sheets(bytes)?.into_iter().next().ok_or(ImportFailure::EmptyWorkbook)
}

/// Every worksheet of the upload, in workbook order.
pub fn read_sheets(bytes: &[u8]) -> Result<Vec<SheetGrid>, ImportFailure> {
    let mut workbook: Xlsx<_> =
        Xlsx::new(Cursor::new(bytes)).map_err(|e| ImportFailure::UnreadableWorkbook(e.to_string()))?;

    let names = workbook.sheet_names();
    if names.is_empty() {
        return Err(ImportFailure::EmptyWorkbook);
    }

    let mut sheets = Vec::with_capacity(names.len());
    for name in names {
        let range = workbook
            .worksheet_range(&name)
            .map_err(|e| ImportFailure::UnreadableWorkbook(e.to_string()))?;
        sheets.push(grid_from_range(name, &range));
    }
    Ok(sheets)
}

fn grid_from_range(name: String, range: &Range<Data>) -> SheetGrid {
    if range.is_empty() {
        return SheetGrid { name, rows: Vec::new() };
    }

    let (first_row, first_col) = range.start().unwrap_or((0, 0));
    let mut rows: Vec<Vec<CellValue>> = vec![Vec::new(); first_row as usize];
    for row in range.rows() {
        let mut cells = vec![CellValue::Empty; first_col as usize];
        cells.extend(row.iter().map(cell_value));
        rows.push(cells);
    }
    SheetGrid { name, rows }
}

fn cell_value(data: &Data) -> CellValue {
    match data {
        Data::Empty | Data::Error(_) => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Number(if *b { 1.0 } else { 0.0 }),
        // Date-formatted cells are normalised to the DD/MM/YYYY import format
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(value) => CellValue::Text(value.format("%d/%m/%Y").to_string()),
            None => CellValue::Number(dt.as_f64()),
        },
        Data::DateTimeIso(s) => match NaiveDate::parse_from_str(s.get(..10).unwrap_or(s.as_str()), "%Y-%m-%d") {
            Ok(date) => CellValue::Text(date.format("%d/%m/%Y").to_string()),
            Err(_) => CellValue::Text(s.clone()),
        },
        Data::DurationIso(s) => CellValue::Text(s.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};

    #[test]
    fn reads_values_and_dates() {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.set_name("GV").unwrap();
        sheet.write_string(0, 0, "Tên người dùng").unwrap();
        sheet.write_string(1, 1, "Nguyễn Văn An").unwrap();
        let date = ExcelDateTime::from_ymd(1990, 8, 15).unwrap();
        let date_format = Format::new().set_num_format("dd/mm/yyyy");
        sheet.write_datetime_with_format(1, 2, &date, &date_format).unwrap();
        sheet.write_number(1, 3, 1.0).unwrap();
        let bytes = workbook.save_to_buffer().unwrap();

        let grid = read_first_sheet(&bytes).unwrap();
        assert_eq!(grid.name, "GV");
        assert_eq!(grid.data_rows(), 1);
        assert_eq!(grid.cell(1, 1), &CellValue::Text("Nguyễn Văn An".into()));
        assert_eq!(grid.cell(1, 2), &CellValue::Text("15/08/1990".into()));
        assert_eq!(grid.cell(1, 3), &CellValue::Number(1.0));
        assert_eq!(grid.cell(1, 0), &CellValue::Empty);
    }

    #[test]
    fn keeps_positions_when_range_is_offset() {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(2, 1, "x").unwrap();
        let bytes = workbook.save_to_buffer().unwrap();

        let grid = read_first_sheet(&bytes).unwrap();
        assert_eq!(grid.rows.len(), 3);
        assert_eq!(grid.cell(2, 1), &CellValue::Text("x".into()));
    }

    #[test]
    fn reads_every_sheet_in_order() {
        let mut workbook = Workbook::new();
        workbook.add_worksheet().set_name("GV").unwrap().write_string(1, 1, "An").unwrap();
        workbook
            .add_worksheet()
            .set_name("Hướng dẫn")
            .unwrap()
            .write_string(0, 0, "Điền mỗi giáo viên một dòng")
            .unwrap();
        workbook.add_worksheet().set_name("Trống").unwrap();
        let bytes = workbook.save_to_buffer().unwrap();

        let sheets = read_sheets(&bytes).unwrap();
        let names: Vec<&str> = sheets.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["GV", "Hướng dẫn", "Trống"]);
        assert_eq!(sheets[1].cell(0, 0), &CellValue::Text("Điền mỗi giáo viên một dòng".into()));
        assert!(sheets[2].rows.is_empty());
        assert_eq!(read_first_sheet(&bytes).unwrap().cell(1, 1), &CellValue::Text("An".into()));
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            read_first_sheet(b"definitely not a zip file"),
            Err(ImportFailure::UnreadableWorkbook(_))
        ));
    }
}
