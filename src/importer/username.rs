use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashSet;

use super::text::fold_diacritics;
use crate::database::DatabaseError;

/// Uniqueness lookup for login handles
#[async_trait]
pub trait UsernameDirectory: Send + Sync {
    async fn username_exists(&self, user_name: &str) -> Result<bool, DatabaseError>;
}

/// Handle stem for a teacher: folded full name followed by day and month
/// of birth, e.g. "Nguyễn Văn An" born 15/08/1990 → `nguyenvanan1508`.
pub fn username_base(full_name: &str, dob: NaiveDate) -> String {
    let name: String = fold_diacritics(full_name)
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    format!("{}{}", name, dob.format("%d%m"))
}

/// First free handle among `base`, `base1`, `base2`, ... A handle is taken
/// when storage holds it or an earlier row of the same file reserved it.
pub async fn generate_username(
    directory: &dyn UsernameDirectory,
    reserved: &HashSet<String>,
    full_name: &str,
    dob: NaiveDate,
) -> Result<String, DatabaseError> {
    let base = username_base(full_name, dob);
    let mut candidate = base.clone();
    let mut counter = 1u32;

    while reserved.contains(&candidate) || directory.username_exists(&candidate).await? {
        candidate = format!("{}{}", base, counter);
        counter += 1;
    }

    Ok(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryTeacherStore;

    fn dob() -> NaiveDate {
        NaiveDate::from_ymd_opt(1990, 8, 15).unwrap()
    }

    #[test]
    fn builds_base_from_name_and_birthday() {
        assert_eq!(username_base("Nguyễn Văn An", dob()), "nguyenvanan1508");
        assert_eq!(username_base("  ĐỖ  thị   Hồng ", dob()), "dothihong1508");
        assert_eq!(username_base("José Müller", dob()), "josemuller1508");
    }

    #[tokio::test]
    async fn returns_base_when_free() {
        let store = MemoryTeacherStore::new();
        let name = generate_username(&store, &HashSet::new(), "Nguyễn Văn An", dob()).await.unwrap();
        assert_eq!(name, "nguyenvanan1508");
    }

    #[tokio::test]
    async fn appends_counter_on_collision() {
        let store = MemoryTeacherStore::with_usernames(["nguyenvanan1508", "nguyenvanan15081"]);
        let reserved: HashSet<String> = ["nguyenvanan15082".to_string()].into_iter().collect();
        let name = generate_username(&store, &reserved, "Nguyễn Văn An", dob()).await.unwrap();
        assert_eq!(name, "nguyenvanan15083");
    }
}
