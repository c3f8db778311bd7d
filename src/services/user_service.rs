use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::info;

use super::auth_service::MIN_PASSWORD_LEN;
use super::fields::{
    check_code, check_district, check_province, clean, clean_nullable, date_field, normalize_email,
    nullable_date_field, require_ids, required,
};
use crate::auth::password::default_password;
use crate::auth::{is_super_admin, AuthUser, PasswordHasher};
use crate::database::models::{NewUser, TeacherProfileFields, TeacherRecord, User};
use crate::database::user_repository::USER_ORDER;
use crate::database::{DatabaseError, ProfileChanges, UserChanges, UserRepository};
use crate::error::ApiError;
use crate::filter::{nullable, LimitBounds, Nullable, Page, Pagination, UserListQuery};
use crate::options;
use crate::types::Role;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub user_name: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<i16>,
    pub dob: Option<String>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub district: Option<String>,
    pub province: Option<String>,
    #[serde(flatten)]
    pub profile: TeacherProfileFields,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub user_name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub gender: Nullable<i16>,
    #[serde(default, deserialize_with = "nullable")]
    pub dob: Nullable<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub phone_number: Nullable<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub email: Nullable<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub address: Nullable<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub district: Nullable<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub province: Nullable<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub gems_employee: Nullable<i16>,
    #[serde(default, deserialize_with = "nullable")]
    pub education_level: Nullable<i16>,
    #[serde(default, deserialize_with = "nullable")]
    pub informatic_relation: Nullable<i16>,
    #[serde(default, deserialize_with = "nullable")]
    pub nvsp: Nullable<i16>,
    #[serde(default, deserialize_with = "nullable")]
    pub ic3_certificate: Nullable<i16>,
    #[serde(default, deserialize_with = "nullable")]
    pub icdl_certificate: Nullable<i16>,
}

/// A user as returned by the management endpoints; teachers carry their profile.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum UserView {
    Teacher(TeacherRecord),
    User(User),
}

/// Account management for one role. Admins, managers and teachers share
/// every operation; only the route guard and the wording differ.
pub struct UserService {
    users: UserRepository,
    hasher: PasswordHasher,
    role: Role,
}

impl UserService {
    pub fn new(pool: PgPool, hasher: PasswordHasher, role: Role) -> Self {
        Self {
            users: UserRepository::new(pool),
            hasher,
            role,
        }
    }

    fn bounds(&self) -> LimitBounds {
        match self.role {
            Role::Teacher => LimitBounds::with_all(),
            _ => LimitBounds::paged(),
        }
    }

    pub async fn list(&self, query: &UserListQuery) -> Result<Page<UserView>, ApiError> {
        let page = Pagination::resolve(query.page, query.limit, self.bounds())?;
        let order = USER_ORDER.generate(query.sort_by.as_deref(), query.sort_order.unwrap_or_default())?;

        if self.role == Role::Teacher {
            let page = self.users.list_teachers(query, &order, page).await?;
            Ok(Page {
                data: page.data.into_iter().map(UserView::Teacher).collect(),
                meta: page.meta,
            })
        } else {
            let page = self.users.list(self.role, query, &order, page).await?;
            Ok(Page {
                data: page.data.into_iter().map(UserView::User).collect(),
                meta: page.meta,
            })
        }
    }

    /// Every teacher matching the filters, for the spreadsheet export
    pub async fn export_teachers(&self, query: &UserListQuery) -> Result<Vec<TeacherRecord>, ApiError> {
        let order = USER_ORDER.generate(query.sort_by.as_deref(), query.sort_order.unwrap_or_default())?;
        let page = self.users.list_teachers(query, &order, Pagination::all()).await?;
        info!(rows = page.data.len(), "Exporting teachers");
        Ok(page.data)
    }

    pub async fn create(&self, request: CreateUserRequest) -> Result<UserView, ApiError> {
        let user_name = required("userName", request.user_name, "Tên người dùng không được để trống")?;
        let first_name = required("firstName", request.first_name, "Họ và chữ đệm không được để trống")?;
        let last_name = required("lastName", request.last_name, "Tên không được để trống")?;

        let password = match clean(request.password) {
            Some(p) if p.chars().count() < MIN_PASSWORD_LEN => {
                return Err(ApiError::invalid_field("password", "Mật khẩu phải có ít nhất 6 ký tự"));
            }
            Some(p) => p,
            None => default_password(&user_name),
        };

        check_code("gender", "Giới tính", options::GENDER, request.gender)?;
        let dob = date_field("dob", "Ngày sinh", request.dob)?;
        let district = clean(request.district);
        check_district(district.as_deref())?;
        let province = clean(request.province);
        check_province(province.as_deref())?;

        let profile = if self.role == Role::Teacher {
            validate_profile(&request.profile)?;
            Some(request.profile)
        } else {
            None
        };

        if self.users.user_name_taken(&user_name, None).await? {
            return Err(ApiError::conflict("Tên người dùng đã tồn tại"));
        }

        let new_user = NewUser {
            user_name,
            password: self.hasher.hash(password).await?,
            role: self.role,
            first_name,
            last_name,
            gender: request.gender,
            dob,
            phone_number: clean(request.phone_number),
            email: clean(request.email).map(|e| normalize_email(&e)),
            address: clean(request.address),
            district,
            province,
            status: true,
        };

        let created = self
            .users
            .create(&new_user, profile.as_ref())
            .await
            .map_err(duplicate_user_name)?;
        info!(user_name = %created.user_name, role = ?self.role, "User created");

        Ok(match profile {
            Some(profile) => UserView::Teacher(TeacherRecord { user: created, profile }),
            None => UserView::User(created),
        })
    }

    pub fn created_message(&self, view: &UserView) -> String {
        let user_name = match view {
            UserView::Teacher(t) => &t.user.user_name,
            UserView::User(u) => &u.user_name,
        };
        format!("{} {} đã được tạo thành công", self.role.title(), user_name)
    }

    pub async fn update(&self, id: i64, request: UpdateUserRequest) -> Result<UserView, ApiError> {
        let user_name = clean(request.user_name);
        if let Some(name) = &user_name {
            if self.users.user_name_taken(name, Some(id)).await? {
                return Err(ApiError::conflict("Tên người dùng đã tồn tại"));
            }
        }

        check_code("gender", "Giới tính", options::GENDER, request.gender.flatten())?;
        let district = clean_nullable(request.district);
        check_district(district.as_ref().and_then(|d| d.as_deref()))?;
        let province = clean_nullable(request.province);
        check_province(province.as_ref().and_then(|p| p.as_deref()))?;

        let changes = UserChanges {
            user_name,
            first_name: clean(request.first_name),
            last_name: clean(request.last_name),
            gender: request.gender,
            dob: nullable_date_field("dob", "Ngày sinh", request.dob)?,
            phone_number: clean_nullable(request.phone_number),
            email: clean_nullable(request.email).map(|e| e.map(|e| normalize_email(&e))),
            address: clean_nullable(request.address),
            district,
            province,
        };

        let profile = if self.role == Role::Teacher {
            let profile = ProfileChanges {
                gems_employee: request.gems_employee,
                education_level: request.education_level,
                informatic_relation: request.informatic_relation,
                nvsp: request.nvsp,
                ic3_certificate: request.ic3_certificate,
                icdl_certificate: request.icdl_certificate,
            };
            validate_profile(&TeacherProfileFields {
                gems_employee: profile.gems_employee.flatten(),
                education_level: profile.education_level.flatten(),
                informatic_relation: profile.informatic_relation.flatten(),
                nvsp: profile.nvsp.flatten(),
                ic3_certificate: profile.ic3_certificate.flatten(),
                icdl_certificate: profile.icdl_certificate.flatten(),
            })?;
            Some(profile)
        } else {
            None
        };

        let updated = self
            .users
            .update(id, self.role, changes, profile)
            .await
            .map_err(duplicate_user_name)?
            .ok_or_else(|| self.not_found())?;
        info!(user_name = %updated.user_name, role = ?self.role, "User updated");

        if self.role == Role::Teacher {
            let teacher = self.users.find_teacher(id).await?.ok_or_else(|| self.not_found())?;
            return Ok(UserView::Teacher(teacher));
        }
        Ok(UserView::User(updated))
    }

    pub fn updated_message(&self) -> String {
        format!("Cập nhật {} thành công", self.role.label())
    }

    pub async fn delete(&self, actor: &AuthUser, ids: &[i64]) -> Result<String, ApiError> {
        let targets = self.targets(ids).await?;

        if self.role == Role::Admin {
            if targets.iter().any(|u| u.id == actor.id) {
                return Err(ApiError::bad_request("Không thể tự xóa chính mình"));
            }
            if targets.iter().any(|u| is_super_admin(&u.user_name)) {
                return Err(ApiError::forbidden("Không thể xóa SUPER ADMIN"));
            }
        }

        let ids: Vec<i64> = targets.iter().map(|u| u.id).collect();
        let deleted = self.users.delete(self.role, &ids).await?;
        info!(deleted, role = ?self.role, "Users deleted");
        Ok(format!("Đã xóa thành công {} {}", deleted, self.role.label()))
    }

    pub async fn set_status(&self, actor: &AuthUser, ids: &[i64], status: bool) -> Result<String, ApiError> {
        self.guard_admin_accounts(actor)?;
        let targets = self.targets(ids).await?;
        self.protect_super_admin(&targets)?;

        let ids: Vec<i64> = targets.iter().map(|u| u.id).collect();
        let changed = self.users.set_status(self.role, &ids, status).await?;
        info!(changed, status, role = ?self.role, "User status changed");

        let verb = if status { "kích hoạt" } else { "hủy kích hoạt" };
        Ok(format!("Đã {} thành công {} {}", verb, changed, self.role.label()))
    }

    /// Reset each password back to `<userName>@`
    pub async fn reset_passwords(&self, actor: &AuthUser, ids: &[i64]) -> Result<String, ApiError> {
        self.guard_admin_accounts(actor)?;
        let targets = self.targets(ids).await?;
        self.protect_super_admin(&targets)?;

        let mut hashes = Vec::with_capacity(targets.len());
        for user in &targets {
            let hashed = self.hasher.hash(default_password(&user.user_name)).await?;
            hashes.push((user.id, hashed));
        }
        let changed = self.users.set_passwords(&hashes).await?;
        info!(changed, role = ?self.role, "Passwords reset");
        Ok(format!("Đã đặt lại mật khẩu cho {} {}", changed, self.role.label()))
    }

    async fn targets(&self, ids: &[i64]) -> Result<Vec<User>, ApiError> {
        require_ids(ids)?;
        let targets = self.users.find_many(self.role, ids).await?;
        if targets.is_empty() {
            return Err(ApiError::not_found(format!("Không tìm thấy {} nào", self.role.label())));
        }
        Ok(targets)
    }

    fn guard_admin_accounts(&self, actor: &AuthUser) -> Result<(), ApiError> {
        if self.role == Role::Admin && !actor.is_super_admin() {
            return Err(ApiError::forbidden("Chỉ SUPER ADMIN mới có quyền này"));
        }
        Ok(())
    }

    fn protect_super_admin(&self, targets: &[User]) -> Result<(), ApiError> {
        if self.role == Role::Admin && targets.iter().any(|u| is_super_admin(&u.user_name)) {
            return Err(ApiError::forbidden("Không thể thay đổi trạng thái SUPER ADMIN"));
        }
        Ok(())
    }

    fn not_found(&self) -> ApiError {
        ApiError::not_found(format!("Không tìm thấy {}", self.role.label()))
    }
}

fn validate_profile(profile: &TeacherProfileFields) -> Result<(), ApiError> {
    check_code("gemsEmployee", "GV GEMS", options::GEMS_EMPLOYEE, profile.gems_employee)?;
    check_code("educationLevel", "Trình độ học vấn", options::EDUCATION_LEVEL, profile.education_level)?;
    check_code(
        "informaticRelation",
        "Ngành tin học",
        options::INFORMATIC_RELATION,
        profile.informatic_relation,
    )?;
    check_code("nvsp", "Chứng chỉ NVSP", options::NVSP, profile.nvsp)?;
    check_code("ic3Certificate", "Chứng chỉ IC3", options::CERTIFICATE, profile.ic3_certificate)?;
    check_code("icdlCertificate", "Chứng chỉ ICDL", options::CERTIFICATE, profile.icdl_certificate)?;
    Ok(())
}

/// A concurrent insert can still hit the unique index after the pre-check
fn duplicate_user_name(err: DatabaseError) -> ApiError {
    match err {
        DatabaseError::Conflict(_) => ApiError::conflict("Tên người dùng đã tồn tại"),
        other if other.is_unique_violation() => ApiError::conflict("Tên người dùng đã tồn tại"),
        other => other.into(),
    }
}
