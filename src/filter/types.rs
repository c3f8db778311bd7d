use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum SortDirection {
    #[serde(rename = "ASC", alias = "asc")]
    Asc,
    #[default]
    #[serde(rename = "DESC", alias = "desc")]
    Desc,
}

impl SortDirection {
    pub fn to_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// Three-state filter value: absent key, explicit `null` (match `IS NULL`),
/// or a concrete value.
pub type Nullable<T> = Option<Option<T>>;

/// `deserialize_with` hook that keeps an explicit `null` distinct from a
/// missing key. Pair it with `#[serde(default)]`.
pub fn nullable<'de, D, T>(deserializer: D) -> Result<Nullable<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// List request body shared by the admin, manager and teacher listings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub sort_by: Option<String>,
    pub sort_order: Option<SortDirection>,
    pub search: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub gender: Nullable<i16>,
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

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchoolListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub sort_by: Option<String>,
    pub sort_order: Option<SortDirection>,
    pub search: Option<String>,
    pub education_level: Option<i16>,
    #[serde(default, deserialize_with = "nullable")]
    pub district: Nullable<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub province: Nullable<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub meta: PageMeta,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn distinguishes_null_from_missing() {
        let q: UserListQuery = serde_json::from_value(json!({
            "gender": null,
            "district": "GVAP",
            "sortOrder": "asc"
        }))
        .unwrap();
        assert_eq!(q.gender, Some(None));
        assert_eq!(q.district, Some(Some("GVAP".to_string())));
        assert_eq!(q.province, None);
        assert_eq!(q.sort_order, Some(SortDirection::Asc));
    }
}
