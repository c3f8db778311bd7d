use chrono::NaiveDate;
use sqlx::{PgPool, Postgres, QueryBuilder};

use super::manager::DatabaseError;
use super::models::School;
use super::user_repository::set;
use crate::filter::{FilterOrder, FilterWhere, Nullable, Page, Pagination, SchoolListQuery};

pub const SCHOOL_ORDER: FilterOrder = FilterOrder::new(
    &[
        ("id", "s.id"),
        ("name", "s.name"),
        ("educationLevel", "s.education_level"),
        ("totalStudents", "s.total_students"),
        ("startDate", "s.start_date"),
        ("createdAt", "s.created_at"),
    ],
    "createdAt",
);

#[derive(Debug, Clone)]
pub struct NewSchool {
    pub name: String,
    pub education_level: i16,
    pub address: Option<String>,
    pub district: Option<String>,
    pub province: Option<String>,
    pub total_students: i32,
    pub start_date: Option<NaiveDate>,
    pub academic_manager_id: Option<i64>,
    pub technical_manager_id: Option<i64>,
}

#[derive(Debug, Clone, Default)]
pub struct SchoolChanges {
    pub name: Option<String>,
    pub education_level: Option<i16>,
    pub address: Nullable<String>,
    pub district: Nullable<String>,
    pub province: Nullable<String>,
    pub total_students: Option<i32>,
    pub start_date: Nullable<NaiveDate>,
    pub academic_manager_id: Nullable<i64>,
    pub technical_manager_id: Nullable<i64>,
}

#[derive(Clone)]
pub struct SchoolRepository {
    pool: PgPool,
}

impl SchoolRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<School>, DatabaseError> {
        let school = sqlx::query_as::<_, School>("SELECT * FROM schools WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(school)
    }

    pub async fn list(&self, query: &SchoolListQuery, order: &str, page: Pagination) -> Result<Page<School>, DatabaseError> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM schools s");
        push_filters(&mut count, query);
        let total: i64 = count.build_query_scalar().fetch_one(&self.pool).await?;

        let mut rows = QueryBuilder::<Postgres>::new("SELECT s.* FROM schools s");
        push_filters(&mut rows, query);
        rows.push(" ").push(order);
        rows.push(" LIMIT ").push_bind(page.limit);
        rows.push(" OFFSET ").push_bind(page.offset());
        let data = rows.build_query_as::<School>().fetch_all(&self.pool).await?;

        Ok(Page { data, meta: page.meta(total) })
    }

    pub async fn create(&self, school: &NewSchool) -> Result<School, DatabaseError> {
        let created = sqlx::query_as::<_, School>(
            "INSERT INTO schools (name, education_level, address, district, province, total_students, \
             start_date, academic_manager_id, technical_manager_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING *",
        )
        .bind(&school.name)
        .bind(school.education_level)
        .bind(&school.address)
        .bind(&school.district)
        .bind(&school.province)
        .bind(school.total_students)
        .bind(school.start_date)
        .bind(school.academic_manager_id)
        .bind(school.technical_manager_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    pub async fn update(&self, id: i64, changes: SchoolChanges) -> Result<Option<School>, DatabaseError> {
        let mut qb = QueryBuilder::<Postgres>::new("UPDATE schools SET updated_at = now()");
        set(&mut qb, "name", changes.name);
        set(&mut qb, "education_level", changes.education_level);
        set(&mut qb, "address", changes.address);
        set(&mut qb, "district", changes.district);
        set(&mut qb, "province", changes.province);
        set(&mut qb, "total_students", changes.total_students);
        set(&mut qb, "start_date", changes.start_date);
        set(&mut qb, "academic_manager_id", changes.academic_manager_id);
        set(&mut qb, "technical_manager_id", changes.technical_manager_id);
        qb.push(" WHERE id = ").push_bind(id);
        qb.push(" RETURNING *");

        let school = qb.build_query_as::<School>().fetch_optional(&self.pool).await?;
        Ok(school)
    }

    pub async fn delete(&self, ids: &[i64]) -> Result<u64, DatabaseError> {
        let result = sqlx::query("DELETE FROM schools WHERE id = ANY($1)")
            .bind(ids.to_vec())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, query: &SchoolListQuery) {
    let mut filter = FilterWhere::new(qb);
    filter
        .search(&["s.name", "s.address"], query.search.as_deref())
        .nullable_eq("s.education_level", query.education_level.map(Some))
        .nullable_eq("s.district", query.district.clone())
        .nullable_eq("s.province", query.province.clone());
}
