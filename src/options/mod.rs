//! Fixed lookup tables: the option lists served to clients, the labels used
//! in exports, and the codes accepted on input.

pub mod districts;

use serde::Serialize;
use serde_json::{json, Value};
use std::str::FromStr;

pub const EMPTY_LABEL: &str = "Bỏ trống";

pub const GENDER: &[(i16, &str)] = &[(0, "Nam"), (1, "Nữ")];

pub const PROVINCE: &[(&str, &str)] = &[("HCM", "Hồ Chí Minh"), ("TDUC", "Thủ Đức"), ("LA", "Long An")];

pub const DISTRICT: &[(&str, &str)] = &[
    ("1", "Quận 1"),
    ("2", "Quận 2 (Cũ)"),
    ("3", "Quận 3"),
    ("4", "Quận 4"),
    ("5", "Quận 5"),
    ("6", "Quận 6"),
    ("7", "Quận 7"),
    ("8", "Quận 8"),
    ("9", "Quận 9 (Cũ)"),
    ("10", "Quận 10"),
    ("11", "Quận 11"),
    ("12", "Quận 12"),
    ("GVAP", "Quận Gò Vấp"),
    ("PNHUAN", "Quận Phú Nhuận"),
    ("TDUC", "Quận Thủ Đức (Cũ)"),
    ("BTHANH", "Quận Bình Thạnh"),
    ("BTAN", "Quận Bình Tân"),
    ("TBINH", "Quận Tân Bình"),
    ("TPHU", "Quận Tân Phú"),
    ("BCHANH", "Huyện Bình Chánh"),
    ("CGIO", "Huyện Cần Giờ"),
    ("CCHI", "Huyện Củ Chi"),
    ("HMON", "Huyện Hóc Môn"),
    ("NBE", "Huyện Nhà Bè"),
    ("CGIUOC", "Huyện Cần Giuộc"),
    ("DHOA", "Huyện Đức Hòa"),
    ("BLUC", "Huyện Bến Lức"),
];

pub const GEMS_EMPLOYEE: &[(i16, &str)] = &[(0, "Giáo viên trường"), (1, "Giáo viên GEMS")];

pub const EDUCATION_LEVEL: &[(i16, &str)] = &[(0, "Trung cấp"), (1, "Cao đẳng"), (2, "Đại học"), (3, "Sau Đại học")];

pub const INFORMATIC_RELATION: &[(i16, &str)] = &[(0, "Không"), (1, "Có")];

pub const NVSP: &[(i16, &str)] = &[
    (0, "Chưa có NVSP"),
    (1, "Có NVSP Tiểu học"),
    (2, "Có NVSP THCS"),
    (3, "Có NVSP cả 2 cấp học"),
];

pub const CERTIFICATE: &[(i16, &str)] = &[(0, "Chưa có"), (1, "Đã có")];

/// Option lists exposed at `/api/options/:type`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionType {
    Gender,
    Province,
    District,
    GemsEmployee,
    EducationLevel,
    InformaticRelation,
    Nvsp,
    Ic3Certificate,
    IcdlCertificate,
}

impl FromStr for OptionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "gender" => OptionType::Gender,
            "province" => OptionType::Province,
            "district" => OptionType::District,
            "gems_employee" => OptionType::GemsEmployee,
            "education_level" => OptionType::EducationLevel,
            "informatic_relation" => OptionType::InformaticRelation,
            "nvsp" => OptionType::Nvsp,
            "ic3_certificate" => OptionType::Ic3Certificate,
            "icdl_certificate" => OptionType::IcdlCertificate,
            other => return Err(format!("Loại tùy chọn không hợp lệ: {}", other)),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptionItem {
    pub value: Value,
    pub label: &'static str,
}

impl OptionType {
    /// Option list with the leading "empty" entry
    pub fn items(self) -> Vec<OptionItem> {
        let mut items = vec![OptionItem { value: Value::Null, label: EMPTY_LABEL }];
        match self {
            OptionType::Province => items.extend(text_items(PROVINCE)),
            OptionType::District => items.extend(text_items(DISTRICT)),
            OptionType::Gender => items.extend(code_items(GENDER)),
            OptionType::GemsEmployee => items.extend(code_items(GEMS_EMPLOYEE)),
            OptionType::EducationLevel => items.extend(code_items(EDUCATION_LEVEL)),
            OptionType::InformaticRelation => items.extend(code_items(INFORMATIC_RELATION)),
            OptionType::Nvsp => items.extend(code_items(NVSP)),
            OptionType::Ic3Certificate | OptionType::IcdlCertificate => items.extend(code_items(CERTIFICATE)),
        }
        items
    }
}

fn text_items(table: &'static [(&'static str, &'static str)]) -> impl Iterator<Item = OptionItem> {
    table.iter().map(|&(value, label)| OptionItem { value: json!(value), label })
}

fn code_items(table: &'static [(i16, &'static str)]) -> impl Iterator<Item = OptionItem> {
    table.iter().map(|&(value, label)| OptionItem { value: json!(value), label })
}

pub fn label_for<K: PartialEq + Copy>(table: &'static [(K, &'static str)], key: K) -> Option<&'static str> {
    table.iter().find(|(k, _)| *k == key).map(|(_, label)| *label)
}

pub fn text_label(table: &'static [(&'static str, &'static str)], key: &str) -> Option<&'static str> {
    table.iter().find(|(k, _)| *k == key).map(|(_, label)| *label)
}

pub fn is_district_code(code: &str) -> bool {
    text_label(DISTRICT, code).is_some()
}

pub fn is_province_code(code: &str) -> bool {
    text_label(PROVINCE, code).is_some()
}
