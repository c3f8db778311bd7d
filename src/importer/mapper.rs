use chrono::NaiveDate;
use std::collections::HashSet;
use std::fmt::Display;

use super::cells::{CellValue, ImportRow};
use super::columns::ImportColumn;
use super::text::split_full_name;
use super::username::{generate_username, UsernameDirectory};
use super::ImportFailure;
use crate::auth::password::{default_password, PasswordHasher};
use crate::auth::PasswordError;
use crate::database::models::{NewUser, TeacherProfileFields};
use crate::database::DatabaseError;
use crate::options::districts;
use crate::types::Role;

/// A validated, not yet persisted teacher: user row plus its profile.
#[derive(Debug, Clone, PartialEq)]
pub struct TeacherCandidate {
    pub user: NewUser,
    pub profile: TeacherProfileFields,
}

/// First rule a row broke. The message starts with the column label.
#[derive(Debug, Clone, PartialEq)]
pub struct RowError {
    pub row: usize,
    pub message: String,
}

impl RowError {
    fn new(column: ImportColumn, row: usize, detail: impl Display) -> Self {
        Self {
            row,
            message: format!("{} (dòng {}) {}", column.label(), row, detail),
        }
    }
}

/// Result of mapping one row: a candidate or the reason it was rejected.
#[derive(Debug, Clone, PartialEq)]
pub enum MappedRow {
    Valid(TeacherCandidate),
    Invalid(RowError),
}

enum MapError {
    Row(RowError),
    Fatal(ImportFailure),
}

impl From<RowError> for MapError {
    fn from(err: RowError) -> Self {
        MapError::Row(err)
    }
}

impl From<DatabaseError> for MapError {
    fn from(err: DatabaseError) -> Self {
        MapError::Fatal(ImportFailure::Storage(err))
    }
}

impl From<PasswordError> for MapError {
    fn from(err: PasswordError) -> Self {
        MapError::Fatal(ImportFailure::Password(err))
    }
}

/// Numeric code cell read against an allowed range `0..=max`.
enum Code {
    Blank,
    NotANumber,
    OutOfRange,
    Value(i16),
}

fn read_code(cell: &CellValue, max: i16) -> Code {
    if cell.is_blank() {
        return Code::Blank;
    }
    match cell.as_number() {
        None => Code::NotANumber,
        Some(n) if n.fract() == 0.0 && n >= 0.0 && n <= max as f64 => Code::Value(n as i16),
        Some(_) => Code::OutOfRange,
    }
}

/// Optional code column: blank is allowed, anything else must be in range.
fn optional_code(
    row: &ImportRow<'_>,
    column: ImportColumn,
    max: i16,
    row_index: usize,
    detail: &str,
) -> Result<Option<i16>, RowError> {
    match read_code(row.cell(column), max) {
        Code::Blank => Ok(None),
        Code::Value(v) => Ok(Some(v)),
        Code::NotANumber | Code::OutOfRange => Err(RowError::new(column, row_index, detail)),
    }
}

/// `DD/MM/YYYY`, two-digit day and month, and a real calendar date.
fn parse_dob(text: &str) -> Option<NaiveDate> {
    let bytes = text.as_bytes();
    let shaped = bytes.len() == 10
        && bytes[2] == b'/'
        && bytes[5] == b'/'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 2 || i == 5 || b.is_ascii_digit());
    if !shaped {
        return None;
    }
    NaiveDate::parse_from_str(text, "%d/%m/%Y").ok()
}

fn normalize_email(raw: String) -> String {
    raw.chars().filter(|c| !c.is_whitespace()).collect::<String>().to_lowercase()
}

/// Turns spreadsheet rows into teacher candidates.
pub struct RowMapper<'a> {
    directory: &'a dyn UsernameDirectory,
    hasher: PasswordHasher,
}

impl<'a> RowMapper<'a> {
    pub fn new(directory: &'a dyn UsernameDirectory, hasher: PasswordHasher) -> Self {
        Self { directory, hasher }
    }

    /// Validate one row. `reserved` holds the handles already claimed by
    /// earlier rows of the same file. Only storage or hashing failures are
    /// returned as `Err`; rule violations come back as `MappedRow::Invalid`.
    pub async fn map(
        &self,
        row: &ImportRow<'_>,
        row_index: usize,
        reserved: &HashSet<String>,
    ) -> Result<MappedRow, ImportFailure> {
        match self.try_map(row, row_index, reserved).await {
            Ok(candidate) => Ok(MappedRow::Valid(candidate)),
            Err(MapError::Row(err)) => Ok(MappedRow::Invalid(err)),
            Err(MapError::Fatal(err)) => Err(err),
        }
    }

    async fn try_map(
        &self,
        row: &ImportRow<'_>,
        row_index: usize,
        reserved: &HashSet<String>,
    ) -> Result<TeacherCandidate, MapError> {
        let full_name = row
            .text(ImportColumn::FullName)
            .ok_or_else(|| RowError::new(ImportColumn::FullName, row_index, "không được để trống"))?;

        let dob = row
            .text(ImportColumn::DateOfBirth)
            .as_deref()
            .and_then(parse_dob)
            .ok_or_else(|| RowError::new(ImportColumn::DateOfBirth, row_index, "phải có định dạng DD/MM/YYYY"))?;

        let gems_employee = match read_code(row.cell(ImportColumn::GemsEmployee), 1) {
            Code::Value(v) => v,
            Code::Blank | Code::NotANumber => {
                return Err(RowError::new(
                    ImportColumn::GemsEmployee,
                    row_index,
                    "không được để trống và phải là 0 hoặc 1",
                )
                .into())
            }
            Code::OutOfRange => {
                return Err(RowError::new(ImportColumn::GemsEmployee, row_index, "phải là 0 hoặc 1").into())
            }
        };

        let user_name = match row.text(ImportColumn::UserName) {
            Some(explicit) => {
                if reserved.contains(&explicit) || self.directory.username_exists(&explicit).await? {
                    return Err(RowError::new(
                        ImportColumn::UserName,
                        row_index,
                        format!("đã tồn tại: {}", explicit),
                    )
                    .into());
                }
                explicit
            }
            None => generate_username(self.directory, reserved, &full_name, dob).await?,
        };

        let district = match row.text(ImportColumn::District) {
            Some(label) => Some(
                districts::resolve(&label)
                    .ok_or_else(|| RowError::new(ImportColumn::District, row_index, format!("không hợp lệ: {}", label)))?
                    .to_string(),
            ),
            None => None,
        };

        let gender = optional_code(row, ImportColumn::Gender, 1, row_index, "phải là 0 (Nam) hoặc 1 (Nữ)")?;
        let education_level = optional_code(row, ImportColumn::EducationLevel, 3, row_index, "phải từ 0-3")?;
        let informatic_relation =
            optional_code(row, ImportColumn::InformaticRelation, 1, row_index, "phải là 0 hoặc 1")?;
        let nvsp = optional_code(row, ImportColumn::Nvsp, 3, row_index, "phải từ 0-3")?;
        let ic3_certificate = optional_code(row, ImportColumn::Ic3Certificate, 1, row_index, "phải là 0 hoặc 1")?;
        let icdl_certificate = optional_code(row, ImportColumn::IcdlCertificate, 1, row_index, "phải là 0 hoặc 1")?;

        let (first_name, last_name) = split_full_name(&full_name);
        let password = self.hasher.hash(default_password(&user_name)).await?;

        Ok(TeacherCandidate {
            user: NewUser {
                user_name,
                password,
                role: Role::Teacher,
                first_name,
                last_name,
                gender,
                dob: Some(dob),
                phone_number: row.text(ImportColumn::PhoneNumber),
                email: row.text(ImportColumn::Email).map(normalize_email),
                address: row.text(ImportColumn::Address),
                district,
                province: row.text(ImportColumn::Province),
                status: true,
            },
            profile: TeacherProfileFields {
                gems_employee: Some(gems_employee),
                education_level,
                informatic_relation,
                nvsp,
                ic3_certificate,
                icdl_certificate,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{row_cells, MemoryTeacherStore};

    const VALID: [&str; 15] = [
        "", "nguyễn văn an", "15/08/1990", "1", "0", " An.Nguyen @Example.com ", "0901234567",
        "12 Lê Lợi", "Quận 1", "HCM", "2", "1", "3", "0", "1",
    ];

    async fn map_one(store: &MemoryTeacherStore, values: &[&str], reserved: &HashSet<String>) -> MappedRow {
        let cells = row_cells(values);
        RowMapper::new(store, PasswordHasher::new(4))
            .map(&ImportRow::new(&cells), 2, reserved)
            .await
            .unwrap()
    }

    fn with(column: ImportColumn, value: &str) -> Vec<&str> {
        let mut values = VALID.to_vec();
        values[column.index()] = value;
        values
    }

    async fn message_for(column: ImportColumn, value: &str) -> String {
        let store = MemoryTeacherStore::new();
        match map_one(&store, &with(column, value), &HashSet::new()).await {
            MappedRow::Invalid(err) => err.message,
            MappedRow::Valid(c) => panic!("expected rejection, got {:?}", c.user.user_name),
        }
    }

    #[tokio::test]
    async fn maps_a_complete_row() {
        let store = MemoryTeacherStore::new();
        let candidate = match map_one(&store, &VALID, &HashSet::new()).await {
            MappedRow::Valid(c) => c,
            MappedRow::Invalid(e) => panic!("unexpected error: {}", e.message),
        };

        assert_eq!(candidate.user.user_name, "nguyenvanan1508");
        assert_eq!(candidate.user.first_name, "Nguyễn Văn");
        assert_eq!(candidate.user.last_name, "An");
        assert_eq!(candidate.user.role, Role::Teacher);
        assert_eq!(candidate.user.dob, NaiveDate::from_ymd_opt(1990, 8, 15));
        assert_eq!(candidate.user.email.as_deref(), Some("an.nguyen@example.com"));
        assert_eq!(candidate.user.district.as_deref(), Some("1"));
        assert_eq!(candidate.user.province.as_deref(), Some("HCM"));
        assert_eq!(candidate.user.gender, Some(0));
        assert!(bcrypt::verify("nguyenvanan1508@", &candidate.user.password).unwrap());
        assert_eq!(
            candidate.profile,
            TeacherProfileFields {
                gems_employee: Some(1),
                education_level: Some(2),
                informatic_relation: Some(1),
                nvsp: Some(3),
                ic3_certificate: Some(0),
                icdl_certificate: Some(1),
            }
        );
    }

    #[tokio::test]
    async fn optional_columns_may_be_blank() {
        let store = MemoryTeacherStore::new();
        let mut values = vec![""; 15];
        values[0] = "gv.an";
        values[1] = "An";
        values[2] = "01/01/2000";
        values[3] = "0";
        match map_one(&store, &values, &HashSet::new()).await {
            MappedRow::Valid(c) => {
                assert_eq!(c.user.user_name, "gv.an");
                assert_eq!(c.user.first_name, "");
                assert_eq!(c.user.district, None);
                assert_eq!(c.user.email, None);
                assert_eq!(c.profile.nvsp, None);
            }
            MappedRow::Invalid(e) => panic!("unexpected error: {}", e.message),
        }
    }

    #[tokio::test]
    async fn reports_each_rule_with_its_label() {
        assert_eq!(message_for(ImportColumn::FullName, "  ").await, "Họ và Tên (dòng 2) không được để trống");
        assert_eq!(
            message_for(ImportColumn::DateOfBirth, "31-02-2020").await,
            "Ngày sinh (dòng 2) phải có định dạng DD/MM/YYYY"
        );
        assert_eq!(
            message_for(ImportColumn::DateOfBirth, "31/02/2020").await,
            "Ngày sinh (dòng 2) phải có định dạng DD/MM/YYYY"
        );
        assert_eq!(
            message_for(ImportColumn::DateOfBirth, "1/8/1990").await,
            "Ngày sinh (dòng 2) phải có định dạng DD/MM/YYYY"
        );
        assert_eq!(
            message_for(ImportColumn::GemsEmployee, "").await,
            "GV GEMS (dòng 2) không được để trống và phải là 0 hoặc 1"
        );
        assert_eq!(
            message_for(ImportColumn::GemsEmployee, "có").await,
            "GV GEMS (dòng 2) không được để trống và phải là 0 hoặc 1"
        );
        assert_eq!(message_for(ImportColumn::GemsEmployee, "2").await, "GV GEMS (dòng 2) phải là 0 hoặc 1");
        assert_eq!(
            message_for(ImportColumn::District, "Quận 99").await,
            "Quận/Huyện (dòng 2) không hợp lệ: Quận 99"
        );
        assert_eq!(
            message_for(ImportColumn::Gender, "2").await,
            "Giới tính (dòng 2) phải là 0 (Nam) hoặc 1 (Nữ)"
        );
        assert_eq!(message_for(ImportColumn::EducationLevel, "4").await, "Trình độ học vấn (dòng 2) phải từ 0-3");
        assert_eq!(message_for(ImportColumn::InformaticRelation, "x").await, "Ngành tin học (dòng 2) phải là 0 hoặc 1");
        assert_eq!(message_for(ImportColumn::Nvsp, "1.5").await, "Chứng chỉ NVSP (dòng 2) phải từ 0-3");
        assert_eq!(message_for(ImportColumn::Ic3Certificate, "-1").await, "Chứng chỉ IC3 (dòng 2) phải là 0 hoặc 1");
        assert_eq!(message_for(ImportColumn::IcdlCertificate, "9").await, "Chứng chỉ ICDL (dòng 2) phải là 0 hoặc 1");
    }

    #[tokio::test]
    async fn first_broken_rule_wins() {
        let store = MemoryTeacherStore::new();
        let mut values = VALID.to_vec();
        values[ImportColumn::DateOfBirth.index()] = "bad";
        values[ImportColumn::Gender.index()] = "7";
        match map_one(&store, &values, &HashSet::new()).await {
            MappedRow::Invalid(e) => assert!(e.message.starts_with("Ngày sinh"), "{}", e.message),
            MappedRow::Valid(_) => panic!("expected rejection"),
        }
    }

    #[tokio::test]
    async fn rejects_taken_and_reserved_usernames() {
        let store = MemoryTeacherStore::with_usernames(["gv.an"]);
        let taken = with(ImportColumn::UserName, "gv.an");
        match map_one(&store, &taken, &HashSet::new()).await {
            MappedRow::Invalid(e) => assert_eq!(e.message, "Tên người dùng (dòng 2) đã tồn tại: gv.an"),
            MappedRow::Valid(_) => panic!("expected rejection"),
        }

        let reserved: HashSet<String> = ["gv.binh".to_string()].into_iter().collect();
        let clash = with(ImportColumn::UserName, "gv.binh");
        assert!(matches!(map_one(&store, &clash, &reserved).await, MappedRow::Invalid(_)));
    }

    #[tokio::test]
    async fn storage_failures_are_fatal() {
        let store = MemoryTeacherStore::new();
        store.fail_lookups();
        let cells = row_cells(&VALID);
        let result = RowMapper::new(&store, PasswordHasher::new(4))
            .map(&ImportRow::new(&cells), 2, &HashSet::new())
            .await;
        assert!(matches!(result, Err(ImportFailure::Storage(_))));
    }
}
