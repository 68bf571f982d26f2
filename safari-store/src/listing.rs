use safari_core::{ListQuery, RepositoryResult};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};

use crate::database::db_error;

/// `%term%` with the term's own wildcards matched literally.
fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Describes how one admin table is searched, filtered and sorted.
pub(crate) struct ListSpec {
    pub table: &'static str,
    pub columns: &'static str,
    pub search_columns: &'static [&'static str],
    pub status_column: Option<&'static str>,
    pub role_column: Option<&'static str>,
    pub sortable: &'static [&'static str],
    pub default_sort: &'static str,
}

impl ListSpec {
    fn push_filters(&self, qb: &mut QueryBuilder<'_, Postgres>, query: &ListQuery) {
        let mut separator = " WHERE ";

        if let Some(term) = query.search_term() {
            if !self.search_columns.is_empty() {
                qb.push(separator).push("(");
                for (i, column) in self.search_columns.iter().enumerate() {
                    if i > 0 {
                        qb.push(" OR ");
                    }
                    qb.push(format!("LOWER({}) LIKE ", column))
                        .push_bind(contains_pattern(&term))
                        .push(" ESCAPE '\\'");
                }
                qb.push(")");
                separator = " AND ";
            }
        }

        if let (Some(column), Some(status)) = (self.status_column, query.status_filter()) {
            qb.push(separator)
                .push(format!("{} = ", column))
                .push_bind(status.to_ascii_lowercase());
            separator = " AND ";
        }

        if let (Some(column), Some(role)) = (self.role_column, query.role_filter()) {
            qb.push(separator)
                .push(format!("{} = ", column))
                .push_bind(role.to_ascii_lowercase());
        }
    }

    /// Runs the count and the page query with identical filters.
    pub async fn fetch_page<R>(&self, pool: &PgPool, query: &ListQuery) -> RepositoryResult<(Vec<R>, u64)>
    where
        R: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        let mut count = QueryBuilder::new(format!("SELECT COUNT(*) FROM {}", self.table));
        self.push_filters(&mut count, query);
        let total: i64 = count
            .build_query_scalar()
            .fetch_one(pool)
            .await
            .map_err(db_error)?;

        let mut select = QueryBuilder::new(format!("SELECT {} FROM {}", self.columns, self.table));
        self.push_filters(&mut select, query);
        select.push(format!(
            " ORDER BY {} {}, id",
            query.sort_field(self.sortable, self.default_sort),
            query.sort_order().as_sql()
        ));
        select
            .push(" LIMIT ")
            .push_bind(i64::from(query.limit()))
            .push(" OFFSET ")
            .push_bind(query.offset() as i64);

        let rows = select
            .build_query_as::<R>()
            .fetch_all(pool)
            .await
            .map_err(db_error)?;

        Ok((rows, total.max(0) as u64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPEC: ListSpec = ListSpec {
        table: "comments",
        columns: "*",
        search_columns: &["author_name", "body"],
        status_column: Some("status"),
        role_column: None,
        sortable: &["created_at", "author_name"],
        default_sort: "created_at",
    };

    #[test]
    fn test_filters_render_in_order() {
        let query = ListQuery {
            search: Some(" Trek ".to_string()),
            status: Some("Pending".to_string()),
            role: Some("admin".to_string()),
            ..Default::default()
        };
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM comments");
        SPEC.push_filters(&mut qb, &query);
        assert_eq!(
            qb.sql(),
            "SELECT * FROM comments WHERE (LOWER(author_name) LIKE $1 ESCAPE '\\' OR LOWER(body) LIKE $2 ESCAPE '\\') AND status = $3"
        );
    }

    #[test]
    fn test_search_wildcards_are_literal() {
        assert_eq!(contains_pattern("trek"), "%trek%");
        assert_eq!(contains_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(contains_pattern("a\\b"), "%a\\\\b%");
    }

    #[test]
    fn test_all_status_adds_no_filter() {
        let query = ListQuery {
            status: Some("all".to_string()),
            ..Default::default()
        };
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM comments");
        SPEC.push_filters(&mut qb, &query);
        assert_eq!(qb.sql(), "SELECT * FROM comments");
    }
}
