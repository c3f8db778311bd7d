use chrono::NaiveDate;
use sqlx::{postgres::PgRow, Encode, FromRow, PgConnection, PgPool, Postgres, QueryBuilder, Type};

use super::manager::DatabaseError;
use super::models::{NewUser, TeacherProfileFields, TeacherRecord, User};
use crate::filter::{FilterOrder, FilterWhere, Nullable, Page, Pagination, UserListQuery};
use crate::types::Role;

/// Sortable fields of the user listings
pub const USER_ORDER: FilterOrder = FilterOrder::new(
    &[
        ("id", "u.id"),
        ("userName", "u.user_name"),
        ("firstName", "u.first_name"),
        ("lastName", "u.last_name"),
        ("status", "u.status"),
        ("dob", "u.dob"),
        ("gender", "u.gender"),
        ("district", "u.district"),
        ("province", "u.province"),
        ("createdAt", "u.created_at"),
    ],
    "createdAt",
);

const FROM_USERS: &str = " FROM users u LEFT JOIN teacher_profiles p ON p.user_id = u.id";

const TEACHER_COLUMNS: &str = "SELECT u.*, p.gems_employee, p.education_level, p.informatic_relation, \
     p.nvsp, p.ic3_certificate, p.icdl_certificate";

/// Partial update of a user row. `None` leaves a column untouched; for
/// nullable columns `Some(None)` clears it.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub user_name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Nullable<i16>,
    pub dob: Nullable<NaiveDate>,
    pub phone_number: Nullable<String>,
    pub email: Nullable<String>,
    pub address: Nullable<String>,
    pub district: Nullable<String>,
    pub province: Nullable<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub gems_employee: Nullable<i16>,
    pub education_level: Nullable<i16>,
    pub informatic_relation: Nullable<i16>,
    pub nvsp: Nullable<i16>,
    pub ic3_certificate: Nullable<i16>,
    pub icdl_certificate: Nullable<i16>,
}

impl ProfileChanges {
    fn is_empty(&self) -> bool {
        self.gems_employee.is_none()
            && self.education_level.is_none()
            && self.informatic_relation.is_none()
            && self.nvsp.is_none()
            && self.ic3_certificate.is_none()
            && self.icdl_certificate.is_none()
    }
}

/// Storage access for the `users` table and the teacher profiles hanging off it
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<User>, DatabaseError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    pub async fn find_by_user_name(&self, user_name: &str) -> Result<Option<User>, DatabaseError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE user_name = $1")
            .bind(user_name)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    /// Users of `role` among `ids`
    pub async fn find_many(&self, role: Role, ids: &[i64]) -> Result<Vec<User>, DatabaseError> {
        let users = sqlx::query_as::<_, User>("SELECT * FROM users WHERE role = $1 AND id = ANY($2) ORDER BY id")
            .bind(role)
            .bind(ids.to_vec())
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    pub async fn find_teacher(&self, id: i64) -> Result<Option<TeacherRecord>, DatabaseError> {
        let sql = format!("{}{} WHERE u.id = $1 AND u.role = $2", TEACHER_COLUMNS, FROM_USERS);
        let teacher = sqlx::query_as::<_, TeacherRecord>(&sql)
            .bind(id)
            .bind(Role::Teacher)
            .fetch_optional(&self.pool)
            .await?;
        Ok(teacher)
    }

    /// True when another account already uses `user_name`
    pub async fn user_name_taken(&self, user_name: &str, except: Option<i64>) -> Result<bool, DatabaseError> {
        let taken: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE user_name = $1 AND id <> COALESCE($2, -1))")
                .bind(user_name)
                .bind(except)
                .fetch_one(&self.pool)
                .await?;
        Ok(taken)
    }

    pub async fn role_exists(&self, role: Role) -> Result<bool, DatabaseError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE role = $1)")
            .bind(role)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    /// Admin and manager listings
    pub async fn list(
        &self,
        role: Role,
        query: &UserListQuery,
        order: &str,
        page: Pagination,
    ) -> Result<Page<User>, DatabaseError> {
        self.fetch_page("SELECT u.*", role, query, order, page).await
    }

    /// Teacher listing, each row joined with its profile
    pub async fn list_teachers(
        &self,
        query: &UserListQuery,
        order: &str,
        page: Pagination,
    ) -> Result<Page<TeacherRecord>, DatabaseError> {
        self.fetch_page(TEACHER_COLUMNS, Role::Teacher, query, order, page).await
    }

    async fn fetch_page<T>(
        &self,
        select: &str,
        role: Role,
        query: &UserListQuery,
        order: &str,
        page: Pagination,
    ) -> Result<Page<T>, DatabaseError>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*)");
        count.push(FROM_USERS);
        push_filters(&mut count, role, query);
        let total: i64 = count.build_query_scalar().fetch_one(&self.pool).await?;

        let mut rows = QueryBuilder::<Postgres>::new(select);
        rows.push(FROM_USERS);
        push_filters(&mut rows, role, query);
        rows.push(" ").push(order);
        if page.limit > 0 {
            rows.push(" LIMIT ").push_bind(page.limit);
            rows.push(" OFFSET ").push_bind(page.offset());
        }
        let data = rows.build_query_as::<T>().fetch_all(&self.pool).await?;

        Ok(Page { data, meta: page.meta(total) })
    }

    /// Insert a user, and its profile when one is given, in one transaction.
    pub async fn create(&self, user: &NewUser, profile: Option<&TeacherProfileFields>) -> Result<User, DatabaseError> {
        let mut tx = self.pool.begin().await?;
        let created = insert_user(&mut *tx, user).await?;
        if let Some(profile) = profile {
            insert_profile(&mut *tx, created.id, profile).await?;
        }
        tx.commit().await?;
        Ok(created)
    }

    /// Apply a partial update to the user `id` of `role`. Returns `None`
    /// when no such user exists.
    pub async fn update(
        &self,
        id: i64,
        role: Role,
        changes: UserChanges,
        profile: Option<ProfileChanges>,
    ) -> Result<Option<User>, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let mut qb = QueryBuilder::<Postgres>::new("UPDATE users SET updated_at = now()");
        set(&mut qb, "user_name", changes.user_name);
        set(&mut qb, "first_name", changes.first_name);
        set(&mut qb, "last_name", changes.last_name);
        set(&mut qb, "gender", changes.gender);
        set(&mut qb, "dob", changes.dob);
        set(&mut qb, "phone_number", changes.phone_number);
        set(&mut qb, "email", changes.email);
        set(&mut qb, "address", changes.address);
        set(&mut qb, "district", changes.district);
        set(&mut qb, "province", changes.province);
        qb.push(" WHERE id = ").push_bind(id);
        qb.push(" AND role = ").push_bind(role);
        qb.push(" RETURNING *");

        let updated = match qb.build_query_as::<User>().fetch_optional(&mut *tx).await? {
            Some(user) => user,
            None => return Ok(None),
        };

        if let Some(profile) = profile.filter(|p| !p.is_empty()) {
            sqlx::query("INSERT INTO teacher_profiles (user_id) VALUES ($1) ON CONFLICT (user_id) DO NOTHING")
                .bind(id)
                .execute(&mut *tx)
                .await?;

            let mut qb = QueryBuilder::<Postgres>::new("UPDATE teacher_profiles SET user_id = user_id");
            set(&mut qb, "gems_employee", profile.gems_employee);
            set(&mut qb, "education_level", profile.education_level);
            set(&mut qb, "informatic_relation", profile.informatic_relation);
            set(&mut qb, "nvsp", profile.nvsp);
            set(&mut qb, "ic3_certificate", profile.ic3_certificate);
            set(&mut qb, "icdl_certificate", profile.icdl_certificate);
            qb.push(" WHERE user_id = ").push_bind(id);
            qb.build().execute(&mut *tx).await?;
        }

        tx.commit().await?;
        Ok(Some(updated))
    }

    /// Delete users of `role` among `ids`; profiles cascade.
    pub async fn delete(&self, role: Role, ids: &[i64]) -> Result<u64, DatabaseError> {
        let result = sqlx::query("DELETE FROM users WHERE role = $1 AND id = ANY($2)")
            .bind(role)
            .bind(ids.to_vec())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn set_status(&self, role: Role, ids: &[i64], status: bool) -> Result<u64, DatabaseError> {
        let result =
            sqlx::query("UPDATE users SET status = $1, updated_at = now() WHERE role = $2 AND id = ANY($3)")
                .bind(status)
                .bind(role)
                .bind(ids.to_vec())
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected())
    }

    /// Store new password hashes, all or none
    pub async fn set_passwords(&self, hashes: &[(i64, String)]) -> Result<u64, DatabaseError> {
        let mut tx = self.pool.begin().await?;
        let mut changed = 0;
        for (id, hash) in hashes {
            changed += sqlx::query("UPDATE users SET password = $1, updated_at = now() WHERE id = $2")
                .bind(hash)
                .bind(id)
                .execute(&mut *tx)
                .await?
                .rows_affected();
        }
        tx.commit().await?;
        Ok(changed)
    }
}

async fn insert_user(conn: &mut PgConnection, user: &NewUser) -> Result<User, DatabaseError> {
    let created = sqlx::query_as::<_, User>(
        "INSERT INTO users (user_name, password, role, first_name, last_name, gender, dob, phone_number, \
         email, address, district, province, status) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13) RETURNING *",
    )
    .bind(&user.user_name)
    .bind(&user.password)
    .bind(user.role)
    .bind(&user.first_name)
    .bind(&user.last_name)
    .bind(user.gender)
    .bind(user.dob)
    .bind(&user.phone_number)
    .bind(&user.email)
    .bind(&user.address)
    .bind(&user.district)
    .bind(&user.province)
    .bind(user.status)
    .fetch_one(&mut *conn)
    .await
    .map_err(|e| conflict_on_duplicate(e, &user.user_name))?;
    Ok(created)
}

async fn insert_profile(conn: &mut PgConnection, user_id: i64, profile: &TeacherProfileFields) -> Result<(), DatabaseError> {
    sqlx::query(
        "INSERT INTO teacher_profiles (user_id, gems_employee, education_level, informatic_relation, nvsp, \
         ic3_certificate, icdl_certificate) VALUES ($1, $2, $3, $4, $5, $6, $7)",
    )
    .bind(user_id)
    .bind(profile.gems_employee)
    .bind(profile.education_level)
    .bind(profile.informatic_relation)
    .bind(profile.nvsp)
    .bind(profile.ic3_certificate)
    .bind(profile.icdl_certificate)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

fn conflict_on_duplicate(err: sqlx::Error, user_name: &str) -> DatabaseError {
    let err = DatabaseError::from(err);
    if err.is_unique_violation() {
        DatabaseError::Conflict(format!("user_name {} already exists", user_name))
    } else {
        err
    }
}

fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, role: Role, query: &UserListQuery) {
    let mut filter = FilterWhere::new(qb);
    filter
        .eq("u.role", role)
        .search(&["u.user_name", "u.first_name", "u.last_name"], query.search.as_deref())
        .nullable_eq("u.gender", query.gender)
        .nullable_eq("u.district", query.district.clone())
        .nullable_eq("u.province", query.province.clone());

    if role == Role::Teacher {
        filter
            .nullable_eq("p.gems_employee", query.gems_employee)
            .nullable_eq("p.education_level", query.education_level)
            .nullable_eq("p.informatic_relation", query.informatic_relation)
            .nullable_eq("p.nvsp", query.nvsp)
            .nullable_eq("p.ic3_certificate", query.ic3_certificate)
            .nullable_eq("p.icdl_certificate", query.icdl_certificate);
    }
}

/// Append `, column = $n` when a value is present
pub(crate) fn set<'args, T>(qb: &mut QueryBuilder<'args, Postgres>, column: &str, value: Option<T>)
where
    T: 'args + Encode<'args, Postgres> + Type<Postgres> + Send,
{
    if let Some(value) = value {
        qb.push(", ").push(column).push(" = ").push_bind(value);
    }
}
