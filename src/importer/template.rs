use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook, XlsxError};

use super::columns::ImportColumn;

pub const TEMPLATE_FILE_NAME: &str = "danh_sach_GV_mau_import.xlsx";

/// Example line shown under the headers
const SAMPLE: [&str; 15] = [
    "",
    "Nguyễn Văn An",
    "15/08/1990",
    "1",
    "0",
    "an.nguyen@example.com",
    "0901234567",
    "12 Lê Lợi",
    "Quận 1",
    "HCM",
    "2",
    "1",
    "2",
    "1",
    "0",
];

/// Blank import workbook: the fifteen positional headers and one sample row.
pub fn import_template() -> Result<Vec<u8>, XlsxError> {
    let header = Format::new()
        .set_bold()
        .set_background_color(Color::RGB(0xCCE5FF))
        .set_align(FormatAlign::Center)
        .set_border(FormatBorder::Thin);

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Danh sách giáo viên")?;

    for column in ImportColumn::ALL {
        let col = column.index() as u16;
        sheet.write_string_with_format(0, col, column.header(), &header)?;
        let sample = SAMPLE[column.index()];
        match sample.parse::<f64>() {
            // Only code columns hold numbers; phone stays text to keep the leading zero
            Ok(n) if column != ImportColumn::PhoneNumber => sheet.write_number(1, col, n)?,
            _ => sheet.write_string(1, col, sample)?,
        };
    }
    sheet.autofit();

    workbook.save_to_buffer()
}
