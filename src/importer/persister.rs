use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};
use std::collections::HashMap;
use tracing::{info, warn};

use super::mapper::TeacherCandidate;
use super::username::UsernameDirectory;
use crate::database::DatabaseError;

/// Destination for validated teachers.
#[async_trait]
pub trait TeacherSink: Send + Sync {
    /// Store every candidate, `batch_size` rows per statement, inside a
    /// single transaction. Either all rows are committed or none are.
    async fn persist(&self, candidates: &[TeacherCandidate], batch_size: usize) -> Result<usize, DatabaseError>;
}

/// PostgreSQL-backed teacher storage used by the import pipeline
#[derive(Clone)]
pub struct PgTeacherStore {
    pool: PgPool,
}

impl PgTeacherStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UsernameDirectory for PgTeacherStore {
    async fn username_exists(&self, user_name: &str) -> Result<bool, DatabaseError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE user_name = $1)")
            .bind(user_name)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }
}

#[async_trait]
impl TeacherSink for PgTeacherStore {
    async fn persist(&self, candidates: &[TeacherCandidate], batch_size: usize) -> Result<usize, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        match insert_batches(&mut tx, candidates, batch_size).await {
            Ok(count) => {
                tx.commit().await?;
                Ok(count)
            }
            Err(err) => {
                if let Err(rollback) = tx.rollback().await {
                    warn!("Rollback after failed import also failed: {}", rollback);
                }
                Err(err)
            }
        }
    }
}

async fn insert_batches(
    tx: &mut Transaction<'_, Postgres>,
    candidates: &[TeacherCandidate],
    batch_size: usize,
) -> Result<usize, DatabaseError> {
    let mut saved = 0;

    for (index, chunk) in candidates.chunks(batch_size.max(1)).enumerate() {
        let mut users = QueryBuilder::<Postgres>::new(
            "INSERT INTO users (user_name, password, role, first_name, last_name, gender, dob, \
             phone_number, email, address, district, province, status) ",
        );
        users.push_values(chunk, |mut row, candidate| {
            let user = &candidate.user;
            row.push_bind(user.user_name.clone())
                .push_bind(user.password.clone())
                .push_bind(user.role)
                .push_bind(user.first_name.clone())
                .push_bind(user.last_name.clone())
                .push_bind(user.gender)
                .push_bind(user.dob)
                .push_bind(user.phone_number.clone())
                .push_bind(user.email.clone())
                .push_bind(user.address.clone())
                .push_bind(user.district.clone())
                .push_bind(user.province.clone())
                .push_bind(user.status);
        });
        users.push(" RETURNING id, user_name");

        let inserted: Vec<(i64, String)> = users.build_query_as().fetch_all(&mut **tx).await?;
        let ids: HashMap<String, i64> = inserted.into_iter().map(|(id, name)| (name, id)).collect();

        let mut linked = Vec::with_capacity(chunk.len());
        for candidate in chunk {
            let user_id = ids.get(&candidate.user.user_name).copied().ok_or_else(|| {
                DatabaseError::QueryError(format!("no id returned for {}", candidate.user.user_name))
            })?;
            linked.push((user_id, &candidate.profile));
        }

        let mut profiles = QueryBuilder::<Postgres>::new(
            "INSERT INTO teacher_profiles (user_id, gems_employee, education_level, informatic_relation, \
             nvsp, ic3_certificate, icdl_certificate) ",
        );
        profiles.push_values(linked, |mut row, (user_id, profile)| {
            row.push_bind(user_id)
                .push_bind(profile.gems_employee)
                .push_bind(profile.education_level)
                .push_bind(profile.informatic_relation)
                .push_bind(profile.nvsp)
                .push_bind(profile.ic3_certificate)
                .push_bind(profile.icdl_certificate);
        });
        profiles.build().execute(&mut **tx).await?;

        saved += chunk.len();
        info!(batch = index + 1, size = chunk.len(), "Đã lưu batch {}: {} giáo viên", index + 1, chunk.len());
    }

    Ok(saved)
}
