use rust_xlsxwriter::{Color, Format, FormatPattern, Workbook, Worksheet, XlsxError};

use super::cells::{CellValue, SheetGrid};
use super::collector::ImportError;
use super::columns::NOTE_COLUMN;

pub const ERROR_FILL: u32 = 0xFF7474;
pub const NOTE_FILL: u32 = 0xFFFF99;
pub const NOTE_HEADER: &str = "Ghi chú lỗi";

fn fill(rgb: u32) -> Format {
    Format::new()
        .set_pattern(FormatPattern::Solid)
        .set_background_color(Color::RGB(rgb))
}

fn write_cell(
    sheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: &CellValue,
    format: Option<&Format>,
) -> Result<(), XlsxError> {
    match (value, format) {
        (CellValue::Empty, Some(format)) => {
            sheet.write_blank(row, col, format)?;
        }
        (CellValue::Empty, None) => {}
        (CellValue::Text(text), Some(format)) => {
            sheet.write_string_with_format(row, col, text, format)?;
        }
        (CellValue::Text(text), None) => {
            sheet.write_string(row, col, text)?;
        }
        (CellValue::Number(n), Some(format)) => {
            sheet.write_number_with_format(row, col, *n, format)?;
        }
        (CellValue::Number(n), None) => {
            sheet.write_number(row, col, *n)?;
        }
    }
    Ok(())
}

/// Rebuild the uploaded workbook. The first sheet gets every offending cell
/// filled red and the error message written into the note column of its
/// row; `others` are copied through after it in their original order.
pub fn annotate(grid: &SheetGrid, others: &[SheetGrid], errors: &[ImportError]) -> Result<Vec<u8>, XlsxError> {
    let error_format = fill(ERROR_FILL);
    let note_format = fill(NOTE_FILL);

    let mut workbook = Workbook::new();
    let sheet = copy_sheet(&mut workbook, grid)?;

    // The uploader's own header text in the note column wins
    if grid.cell(0, NOTE_COLUMN as usize).is_blank() {
        sheet.write_string_with_format(0, NOTE_COLUMN, NOTE_HEADER, &Format::new().set_bold())?;
    }
    sheet.set_column_width(NOTE_COLUMN, 60)?;

    for error in errors {
        let row = error.row.saturating_sub(1);
        let value = grid.cell(row, error.col);
        write_cell(sheet, row as u32, error.col as u16, value, Some(&error_format))?;
        sheet.write_string_with_format(row as u32, NOTE_COLUMN, &error.message, &note_format)?;
    }

    for other in others {
        copy_sheet(&mut workbook, other)?;
    }

    workbook.save_to_buffer()
}

fn copy_sheet<'a>(workbook: &'a mut Workbook, grid: &SheetGrid) -> Result<&'a mut Worksheet, XlsxError> {
    let sheet = workbook.add_worksheet();
    if !grid.name.is_empty() {
        sheet.set_name(&grid.name)?;
    }
    for (r, row) in grid.rows.iter().enumerate() {
        for (c, value) in row.iter().enumerate() {
            write_cell(sheet, r as u32, c as u16, value, None)?;
        }
    }
    Ok(sheet)
}
