use serde::Deserialize;
use sqlx::PgPool;
use tracing::info;

use super::fields::{
    check_district, check_province, clean, clean_nullable, date_field, nullable_date_field, require_ids, required,
};
use crate::database::models::School;
use crate::database::school_repository::SCHOOL_ORDER;
use crate::database::{NewSchool, SchoolChanges, SchoolRepository, UserRepository};
use crate::error::ApiError;
use crate::filter::{nullable, LimitBounds, Nullable, Page, Pagination, SchoolListQuery};
use crate::types::Role;

const MAX_NAME_LEN: usize = 255;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSchoolRequest {
    pub name: Option<String>,
    pub education_level: Option<i16>,
    pub address: Option<String>,
    pub district: Option<String>,
    pub province: Option<String>,
    pub total_students: Option<i32>,
    pub start_date: Option<String>,
    pub academic_manager_id: Option<i64>,
    pub technical_manager_id: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSchoolRequest {
    pub name: Option<String>,
    pub education_level: Option<i16>,
    #[serde(default, deserialize_with = "nullable")]
    pub address: Nullable<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub district: Nullable<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub province: Nullable<String>,
    pub total_students: Option<i32>,
    #[serde(default, deserialize_with = "nullable")]
    pub start_date: Nullable<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub academic_manager_id: Nullable<i64>,
    #[serde(default, deserialize_with = "nullable")]
    pub technical_manager_id: Nullable<i64>,
}

pub struct SchoolService {
    schools: SchoolRepository,
    users: UserRepository,
}

impl SchoolService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            schools: SchoolRepository::new(pool.clone()),
            users: UserRepository::new(pool),
        }
    }

    pub async fn list(&self, query: &SchoolListQuery) -> Result<Page<School>, ApiError> {
        let page = Pagination::resolve(query.page, query.limit, LimitBounds::paged())?;
        let order = SCHOOL_ORDER.generate(query.sort_by.as_deref(), query.sort_order.unwrap_or_default())?;
        Ok(self.schools.list(query, &order, page).await?)
    }

    pub async fn get(&self, id: i64) -> Result<School, ApiError> {
        self.schools
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApiError::not_found("Không tìm thấy trường học"))
    }

    pub async fn create(&self, request: CreateSchoolRequest) -> Result<School, ApiError> {
        let name = required("name", request.name, "Tên trường không được để trống")?;
        check_name(&name)?;
        let education_level = request
            .education_level
            .ok_or_else(|| ApiError::invalid_field("educationLevel", "Cấp học không được để trống"))?;
        check_level(education_level)?;
        let district = clean(request.district);
        check_district(district.as_deref())?;
        let province = clean(request.province);
        check_province(province.as_deref())?;
        let total_students = request.total_students.unwrap_or(0);
        check_total(total_students)?;

        self.check_manager(request.academic_manager_id).await?;
        self.check_manager(request.technical_manager_id).await?;

        let school = NewSchool {
            name,
            education_level,
            address: clean(request.address),
            district,
            province,
            total_students,
            start_date: date_field("startDate", "Ngày bắt đầu", request.start_date)?,
            academic_manager_id: request.academic_manager_id,
            technical_manager_id: request.technical_manager_id,
        };
        let created = self.schools.create(&school).await?;
        info!(school_id = created.id, "School created");
        Ok(created)
    }

    pub async fn update(&self, id: i64, request: UpdateSchoolRequest) -> Result<School, ApiError> {
        let name = clean(request.name);
        if let Some(name) = &name {
            check_name(name)?;
        }
        if let Some(level) = request.education_level {
            check_level(level)?;
        }
        let district = clean_nullable(request.district);
        check_district(district.as_ref().and_then(|d| d.as_deref()))?;
        let province = clean_nullable(request.province);
        check_province(province.as_ref().and_then(|p| p.as_deref()))?;
        if let Some(total) = request.total_students {
            check_total(total)?;
        }
        self.check_manager(request.academic_manager_id.flatten()).await?;
        self.check_manager(request.technical_manager_id.flatten()).await?;

        let changes = SchoolChanges {
            name,
            education_level: request.education_level,
            address: clean_nullable(request.address),
            district,
            province,
            total_students: request.total_students,
            start_date: nullable_date_field("startDate", "Ngày bắt đầu", request.start_date)?,
            academic_manager_id: request.academic_manager_id,
            technical_manager_id: request.technical_manager_id,
        };

        let updated = self
            .schools
            .update(id, changes)
            .await?
            .ok_or_else(|| ApiError::not_found("Không tìm thấy trường học"))?;
        info!(school_id = id, "School updated");
        Ok(updated)
    }

    pub async fn delete(&self, ids: &[i64]) -> Result<String, ApiError> {
        require_ids(ids)?;
        let deleted = self.schools.delete(ids).await?;
        if deleted == 0 {
            return Err(ApiError::not_found("Không tìm thấy trường học để xóa"));
        }
        info!(deleted, "Schools deleted");
        Ok(format!("Đã xóa thành công {} trường học", deleted))
    }

    /// Managers of a school must be admin or manager accounts
    async fn check_manager(&self, id: Option<i64>) -> Result<(), ApiError> {
        let Some(id) = id else {
            return Ok(());
        };
        match self.users.find_by_id(id).await? {
            Some(user) if matches!(user.role, Role::Admin | Role::Manager) => Ok(()),
            _ => Err(ApiError::not_found(format!("Không tìm thấy quản lý với id {}", id))),
        }
    }
}

fn check_name(name: &str) -> Result<(), ApiError> {
    if name.chars().count() > MAX_NAME_LEN {
        return Err(ApiError::invalid_field("name", "Tên trường không được vượt quá 255 ký tự"));
    }
    Ok(())
}

fn check_level(level: i16) -> Result<(), ApiError> {
    if !matches!(level, 1 | 2) {
        return Err(ApiError::invalid_field(
            "educationLevel",
            "Cấp học phải là 1 (Tiểu học) hoặc 2 (THCS)",
        ));
    }
    Ok(())
}

fn check_total(total: i32) -> Result<(), ApiError> {
    if total < 0 {
        return Err(ApiError::invalid_field("totalStudents", "Sĩ số không được âm"));
    }
    Ok(())
}
