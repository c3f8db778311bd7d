use super::error::FilterError;
use super::types::SortDirection;

/// Whitelisted ORDER BY builder: maps API field names onto SQL columns.
pub struct FilterOrder {
    columns: &'static [(&'static str, &'static str)],
    default: &'static str,
}

impl FilterOrder {
    pub const fn new(columns: &'static [(&'static str, &'static str)], default: &'static str) -> Self {
        Self { columns, default }
    }

    pub fn generate(&self, sort_by: Option<&str>, direction: SortDirection) -> Result<String, FilterError> {
        let field = sort_by.map(str::trim).filter(|s| !s.is_empty()).unwrap_or(self.default);
        let column = self
            .columns
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, column)| *column)
            .ok_or_else(|| FilterError::InvalidColumn(field.to_string()))?;

        // Stable paging when the sort key has ties
        Ok(format!("ORDER BY {} {}, {} {}", column, direction.to_sql(), self.tiebreaker(), direction.to_sql()))
    }

    fn tiebreaker(&self) -> &'static str {
        self.columns
            .iter()
            .find(|(name, _)| *name == "id")
            .map(|(_, column)| *column)
            .unwrap_or("id")
    }
}
