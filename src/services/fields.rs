//! Input normalisation shared by the create and update endpoints.

use chrono::NaiveDate;

use crate::error::ApiError;
use crate::filter::Nullable;
use crate::options::{self, label_for};

/// Trimmed text, or `None` when blank
pub fn clean(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Like [`clean`], keeping the absent / explicit-null distinction. A blank
/// string clears the column.
pub fn clean_nullable(value: Nullable<String>) -> Nullable<String> {
    value.map(clean)
}

pub fn required(field: &str, value: Option<String>, message: &str) -> Result<String, ApiError> {
    clean(value).ok_or_else(|| ApiError::invalid_field(field, message))
}

/// Lower-cased with every whitespace character removed
pub fn normalize_email(email: &str) -> String {
    email.chars().filter(|c| !c.is_whitespace()).collect::<String>().to_lowercase()
}

/// Accepts `DD/MM/YYYY` or ISO `YYYY-MM-DD`
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%d/%m/%Y")
        .or_else(|_| NaiveDate::parse_from_str(value, "%Y-%m-%d"))
        .ok()
}

pub fn date_field(field: &str, label: &str, value: Option<String>) -> Result<Option<NaiveDate>, ApiError> {
    match clean(value) {
        None => Ok(None),
        Some(text) => parse_date(&text)
            .map(Some)
            .ok_or_else(|| ApiError::invalid_field(field, format!("{} không hợp lệ: {}", label, text))),
    }
}

pub fn nullable_date_field(field: &str, label: &str, value: Nullable<String>) -> Result<Nullable<NaiveDate>, ApiError> {
    match value {
        None => Ok(None),
        Some(inner) => date_field(field, label, inner).map(Some),
    }
}

/// Reject a code missing from its option table
pub fn check_code(
    field: &str,
    label: &str,
    table: &'static [(i16, &'static str)],
    value: Option<i16>,
) -> Result<(), ApiError> {
    match value {
        Some(v) if label_for(table, v).is_none() => {
            Err(ApiError::invalid_field(field, format!("{} không hợp lệ: {}", label, v)))
        }
        _ => Ok(()),
    }
}

pub fn check_district(value: Option<&str>) -> Result<(), ApiError> {
    match value {
        Some(code) if !options::is_district_code(code) => Err(ApiError::invalid_field(
            "district",
            format!("Quận/Huyện không hợp lệ: {}", code),
        )),
        _ => Ok(()),
    }
}

pub fn check_province(value: Option<&str>) -> Result<(), ApiError> {
    match value {
        Some(code) if !options::is_province_code(code) => Err(ApiError::invalid_field(
            "province",
            format!("Tỉnh/Thành phố không hợp lệ: {}", code),
        )),
        _ => Ok(()),
    }
}

pub fn require_ids(ids: &[i64]) -> Result<(), ApiError> {
    if ids.is_empty() {
        return Err(ApiError::invalid_field("ids", "Danh sách id không được để trống"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_both_date_layouts() {
        assert_eq!(parse_date("15/08/1990"), NaiveDate::from_ymd_opt(1990, 8, 15));
        assert_eq!(parse_date("1990-08-15"), NaiveDate::from_ymd_opt(1990, 8, 15));
        assert_eq!(parse_date("31/02/2020"), None);
        assert!(date_field("dob", "Ngày sinh", Some("ngày mai".into())).is_err());
        assert_eq!(date_field("dob", "Ngày sinh", Some("  ".into())).unwrap(), None);
    }

    #[test]
    fn blank_text_clears_nullable_columns() {
        assert_eq!(clean_nullable(Some(Some("  ".into()))), Some(None));
        assert_eq!(clean_nullable(Some(Some(" x ".into()))), Some(Some("x".into())));
        assert_eq!(clean_nullable(None), None);
    }

    #[test]
    fn validates_codes_against_tables() {
        assert!(check_code("nvsp", "Chứng chỉ NVSP", options::NVSP, Some(3)).is_ok());
        assert!(check_code("nvsp", "Chứng chỉ NVSP", options::NVSP, Some(4)).is_err());
        assert!(check_district(Some("GVAP")).is_ok());
        assert!(check_district(Some("Gò Vấp")).is_err());
        assert!(check_province(None).is_ok());
        assert_eq!(normalize_email(" An.Nguyen @Example.com "), "an.nguyen@example.com");
    }
}
