use sqlx::{Encode, Postgres, QueryBuilder, Type};

/// Appends AND-joined conditions to a `QueryBuilder`, binding every value.
pub struct FilterWhere<'b, 'args> {
    builder: &'b mut QueryBuilder<'args, Postgres>,
    has_clause: bool,
}

impl<'b, 'args> FilterWhere<'b, 'args> {
    pub fn new(builder: &'b mut QueryBuilder<'args, Postgres>) -> Self {
        Self { builder, has_clause: false }
    }

    fn clause(&mut self) -> &mut QueryBuilder<'args, Postgres> {
        self.builder.push(if self.has_clause { " AND " } else { " WHERE " });
        self.has_clause = true;
        &mut *self.builder
    }

    pub fn eq<T>(&mut self, column: &str, value: T) -> &mut Self
    where
        T: 'args + Encode<'args, Postgres> + Type<Postgres> + Send,
    {
        self.clause().push(column).push(" = ").push_bind(value);
        self
    }

    /// `Some(Some(v))` binds `column = v`, `Some(None)` emits `column IS NULL`,
    /// `None` adds nothing.
    pub fn nullable_eq<T>(&mut self, column: &str, value: Option<Option<T>>) -> &mut Self
    where
        T: 'args + Encode<'args, Postgres> + Type<Postgres> + Send,
    {
        match value {
            Some(Some(v)) => self.eq(column, v),
            Some(None) => {
                self.clause().push(column).push(" IS NULL");
                self
            }
            None => self,
        }
    }

    /// Accent-insensitive substring match over several columns.
    pub fn search(&mut self, columns: &[&str], term: Option<&str>) -> &mut Self {
        let term = match term.map(str::trim).filter(|t| !t.is_empty()) {
            Some(t) => t,
            None => return self,
        };
        let pattern = format!("%{}%", escape_like(term));

        let builder = self.clause();
        builder.push("(");
        for (i, column) in columns.iter().enumerate() {
            if i > 0 {
                builder.push(" OR ");
            }
            builder
                .push("unaccent(")
                .push(*column)
                .push(") ILIKE unaccent(")
                .push_bind(pattern.clone())
                .push(")");
        }
        builder.push(")");
        self
    }
}

fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_bound_conditions() {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM users u");
        FilterWhere::new(&mut qb)
            .eq("u.role", 2i16)
            .nullable_eq::<i16>("u.gender", Some(None))
            .nullable_eq::<String>("u.district", None)
            .nullable_eq("u.province", Some(Some("HCM".to_string())))
            .search(&["u.user_name", "u.last_name"], Some(" an "));
        assert_eq!(
            qb.sql(),
            "SELECT * FROM users u WHERE u.role = $1 AND u.gender IS NULL AND u.province = $2 \
             AND (unaccent(u.user_name) ILIKE unaccent($3) OR unaccent(u.last_name) ILIKE unaccent($4))"
        );
    }

    #[test]
    fn escapes_like_wildcards() {
        assert_eq!(escape_like("50%_a\\b"), "50\\%\\_a\\\\b");
    }
}
