//! Teacher list export workbook.

use rust_xlsxwriter::{Color, Format, FormatAlign, Workbook, XlsxError};

use crate::database::models::TeacherRecord;
use crate::options::{self, label_for, text_label};

pub const EXPORT_FILE_NAME: &str = "danh_sach_giao_vien.xlsx";
pub const EXPORT_SHEET_NAME: &str = "Danh sách giáo viên";

pub const EXPORT_HEADERS: [&str; 17] = [
    "Tên tài khoản",
    "Họ & chữ đệm",
    "Tên",
    "Giới tính",
    "Ngày sinh",
    "Số điện thoại",
    "Email",
    "Địa chỉ",
    "Quận/Huyện",
    "Tỉnh/Thành phố",
    "Đơn vị",
    "Trình độ học vấn",
    "Ngành tin học",
    "C/chỉ NVSP",
    "C/chỉ IC3",
    "C/chỉ ICDL",
    "Ngày tạo",
];

fn code_label(table: &'static [(i16, &'static str)], value: Option<i16>) -> String {
    value.and_then(|v| label_for(table, v)).unwrap_or_default().to_string()
}

fn row_values(record: &TeacherRecord) -> [String; 17] {
    let user = &record.user;
    let profile = &record.profile;
    [
        user.user_name.clone(),
        user.first_name.clone(),
        user.last_name.clone(),
        code_label(options::GENDER, user.gender),
        user.dob.map(|d| d.format("%d/%m/%Y").to_string()).unwrap_or_default(),
        user.phone_number.clone().unwrap_or_default(),
        user.email.clone().unwrap_or_default(),
        user.address.clone().unwrap_or_default(),
        user.district
            .as_deref()
            .and_then(|d| text_label(options::DISTRICT, d))
            .unwrap_or_default()
            .to_string(),
        user.province
            .as_deref()
            .and_then(|p| text_label(options::PROVINCE, p))
            .unwrap_or_default()
            .to_string(),
        // Teachers are not attached to a school yet
        String::new(),
        code_label(options::EDUCATION_LEVEL, profile.education_level),
        code_label(options::INFORMATIC_RELATION, profile.informatic_relation),
        code_label(options::NVSP, profile.nvsp),
        code_label(options::CERTIFICATE, profile.ic3_certificate),
        code_label(options::CERTIFICATE, profile.icdl_certificate),
        user.created_at.format("%d/%m/%Y").to_string(),
    ]
}

/// Render teachers into the export workbook, one row per teacher.
pub fn export_teachers(records: &[TeacherRecord]) -> Result<Vec<u8>, XlsxError> {
    let header = Format::new()
        .set_bold()
        .set_background_color(Color::RGB(0xCCE5FF))
        .set_align(FormatAlign::Center);

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(EXPORT_SHEET_NAME)?;

    for (col, title) in EXPORT_HEADERS.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *title, &header)?;
    }
    for (i, record) in records.iter().enumerate() {
        let row = i as u32 + 1;
        for (col, value) in row_values(record).iter().enumerate() {
            if !value.is_empty() {
                sheet.write_string(row, col as u16, value)?;
            }
        }
    }
    sheet.autofit();

    workbook.save_to_buffer()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::{TeacherProfileFields, User};
    use crate::types::Role;
    use calamine::{Data, Reader, Xlsx};
    use chrono::{NaiveDate, TimeZone, Utc};
    use std::io::Cursor;

    fn teacher() -> TeacherRecord {
        let created = Utc.with_ymd_and_hms(2024, 9, 5, 8, 0, 0).unwrap();
        TeacherRecord {
            user: User {
                id: 7,
                user_name: "nguyenvanan1508".into(),
                password: "hash".into(),
                role: Role::Teacher,
                first_name: "Nguyễn Văn".into(),
                last_name: "An".into(),
                gender: Some(0),
                dob: NaiveDate::from_ymd_opt(1990, 8, 15),
                phone_number: Some("0901234567".into()),
                email: None,
                address: None,
                district: Some("GVAP".into()),
                province: Some("HCM".into()),
                status: true,
                created_at: created,
                updated_at: created,
            },
            profile: TeacherProfileFields {
                gems_employee: Some(1),
                education_level: Some(2),
                informatic_relation: Some(1),
                nvsp: Some(3),
                ic3_certificate: Some(1),
                icdl_certificate: None,
            },
        }
    }

    #[test]
    fn renders_codes_through_labels() {
        let bytes = export_teachers(&[teacher()]).unwrap();
        let mut book: Xlsx<_> = Xlsx::new(Cursor::new(bytes)).unwrap();
        assert_eq!(book.sheet_names(), vec![EXPORT_SHEET_NAME.to_string()]);

        let range = book.worksheet_range(EXPORT_SHEET_NAME).unwrap();
        let cell = |r: u32, c: u32| range.get_value((r, c)).cloned().unwrap_or(Data::Empty);

        assert_eq!(cell(0, 0), Data::String("Tên tài khoản".into()));
        assert_eq!(cell(0, 16), Data::String("Ngày tạo".into()));
        assert_eq!(cell(1, 0), Data::String("nguyenvanan1508".into()));
        assert_eq!(cell(1, 3), Data::String("Nam".into()));
        assert_eq!(cell(1, 4), Data::String("15/08/1990".into()));
        assert_eq!(cell(1, 8), Data::String("Quận Gò Vấp".into()));
        assert_eq!(cell(1, 9), Data::String("Hồ Chí Minh".into()));
        assert_eq!(cell(1, 11), Data::String("Đại học".into()));
        assert_eq!(cell(1, 13), Data::String("Có NVSP cả 2 cấp học".into()));
        assert_eq!(cell(1, 14), Data::String("Đã có".into()));
        assert_eq!(cell(1, 15), Data::Empty);
        assert_eq!(cell(1, 16), Data::String("05/09/2024".into()));
    }

    #[test]
    fn empty_export_has_only_headers() {
        let bytes = export_teachers(&[]).unwrap();
        let mut book: Xlsx<_> = Xlsx::new(Cursor::new(bytes)).unwrap();
        let range = book.worksheet_range(EXPORT_SHEET_NAME).unwrap();
        assert_eq!(range.height(), 1);
        assert_eq!(range.width(), 17);
    }
}
