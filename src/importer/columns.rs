/// Positional schema of the teacher import sheet.
///
/// Every column binding lives here: its index, the label that prefixes
/// validation messages, and the header written into the template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImportColumn {
    UserName,
    FullName,
    DateOfBirth,
    GemsEmployee,
    Gender,
    Email,
    PhoneNumber,
    Address,
    District,
    Province,
    EducationLevel,
    InformaticRelation,
    Nvsp,
    Ic3Certificate,
    IcdlCertificate,
}

/// Number of data columns read from each row
pub const COLUMN_COUNT: usize = 15;

/// Side column that receives error notes in an annotated workbook
pub const NOTE_COLUMN: u16 = 15;

impl ImportColumn {
    pub const ALL: [ImportColumn; COLUMN_COUNT] = [
        ImportColumn::UserName,
        ImportColumn::FullName,
        ImportColumn::DateOfBirth,
        ImportColumn::GemsEmployee,
        ImportColumn::Gender,
        ImportColumn::Email,
        ImportColumn::PhoneNumber,
        ImportColumn::Address,
        ImportColumn::District,
        ImportColumn::Province,
        ImportColumn::EducationLevel,
        ImportColumn::InformaticRelation,
        ImportColumn::Nvsp,
        ImportColumn::Ic3Certificate,
        ImportColumn::IcdlCertificate,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn label(self) -> &'static str {
        match self {
            ImportColumn::UserName => "Tên người dùng",
            ImportColumn::FullName => "Họ và Tên",
            ImportColumn::DateOfBirth => "Ngày sinh",
            ImportColumn::GemsEmployee => "GV GEMS",
            ImportColumn::Gender => "Giới tính",
            ImportColumn::Email => "Email",
            ImportColumn::PhoneNumber => "Số điện thoại",
            ImportColumn::Address => "Địa chỉ",
            ImportColumn::District => "Quận/Huyện",
            ImportColumn::Province => "Thành Phố",
            ImportColumn::EducationLevel => "Trình độ học vấn",
            ImportColumn::InformaticRelation => "Ngành tin học",
            ImportColumn::Nvsp => "Chứng chỉ NVSP",
            ImportColumn::Ic3Certificate => "Chứng chỉ IC3",
            ImportColumn::IcdlCertificate => "Chứng chỉ ICDL",
        }
    }

    pub const fn header(self) -> &'static str {
        match self {
            ImportColumn::UserName => "Tên người dùng (bỏ trống để tự tạo)",
            ImportColumn::FullName => "Họ và Tên",
            ImportColumn::DateOfBirth => "Ngày sinh (DD/MM/YYYY)",
            ImportColumn::GemsEmployee => "GV GEMS (0/1)",
            ImportColumn::Gender => "Giới tính (0: Nam, 1: Nữ)",
            ImportColumn::Email => "Email",
            ImportColumn::PhoneNumber => "Số điện thoại",
            ImportColumn::Address => "Địa chỉ",
            ImportColumn::District => "Quận/Huyện",
            ImportColumn::Province => "Thành Phố",
            ImportColumn::EducationLevel => "Trình độ học vấn (0-3)",
            ImportColumn::InformaticRelation => "Ngành tin học (0/1)",
            ImportColumn::Nvsp => "Chứng chỉ NVSP (0-3)",
            ImportColumn::Ic3Certificate => "Chứng chỉ IC3 (0/1)",
            ImportColumn::IcdlCertificate => "Chứng chỉ ICDL (0/1)",
        }
    }
}

/// Column an error message refers to, found by the field label it starts
/// with. Unrecognised messages point at column 0.
pub fn error_column(message: &str) -> usize {
    ImportColumn::ALL
        .iter()
        .find(|column| message.starts_with(column.label()))
        .map(|column| column.index())
        .unwrap_or(0)
}
