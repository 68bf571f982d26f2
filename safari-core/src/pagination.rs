use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Query parameters shared by every admin list endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub search: Option<String>,
    pub status: Option<String>,
    pub role: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<SortOrder>,
}

impl ListQuery {
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn limit(&self) -> u32 {
        self.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page() - 1) * u64::from(self.limit())
    }

    /// Trimmed, lowercased search term; `None` when blank.
    pub fn search_term(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
    }

    /// Status filter; `None` when blank or `all`.
    pub fn status_filter(&self) -> Option<&str> {
        Self::filter_value(self.status.as_deref())
    }

    pub fn role_filter(&self) -> Option<&str> {
        Self::filter_value(self.role.as_deref())
    }

    fn filter_value(raw: Option<&str>) -> Option<&str> {
        raw.map(str::trim)
            .filter(|s| !s.is_empty() && !s.eq_ignore_ascii_case("all"))
    }

    /// The requested sort column if it is one of `allowed`, else `default`.
    /// Only ever returns entries of `allowed`, so the result is safe to splice
    /// into SQL.
    pub fn sort_field<'a>(&self, allowed: &[&'a str], default: &'a str) -> &'a str {
        self.sort_by
            .as_deref()
            .and_then(|requested| allowed.iter().copied().find(|a| *a == requested))
            .unwrap_or(default)
    }

    pub fn sort_order(&self) -> SortOrder {
        self.sort_order.unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u32,
}

impl Pagination {
    pub fn new(page: u32, limit: u32, total: u64) -> Self {
        let limit = limit.max(1);
        let total_pages = total.div_ceil(u64::from(limit)) as u32;
        Self {
            page,
            limit,
            total,
            total_pages,
        }
    }
}

/// `{items, pagination}` envelope returned by list endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, query: &ListQuery, total: u64) -> Self {
        Self {
            items,
            pagination: Pagination::new(query.page(), query.limit(), total),
        }
    }

    /// Cuts the requested page out of an already filtered and sorted list.
    pub fn from_sorted(all: Vec<T>, query: &ListQuery) -> Self {
        let total = all.len() as u64;
        let items = all
            .into_iter()
            .skip(query.offset() as usize)
            .take(query.limit() as usize)
            .collect();
        Self::new(items, query, total)
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            pagination: self.pagination,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_and_clamping() {
        let q = ListQuery::default();
        assert_eq!((q.page(), q.limit(), q.offset()), (1, 10, 0));

        let q = ListQuery { page: Some(0), limit: Some(1000), ..Default::default() };
        assert_eq!((q.page(), q.limit()), (1, 100));

        let q = ListQuery { page: Some(3), limit: Some(20), ..Default::default() };
        assert_eq!(q.offset(), 40);
    }

    #[test]
    fn test_total_pages_rounds_up() {
        assert_eq!(Pagination::new(1, 10, 0).total_pages, 0);
        assert_eq!(Pagination::new(1, 10, 10).total_pages, 1);
        assert_eq!(Pagination::new(1, 10, 11).total_pages, 2);
    }

    #[test]
    fn test_page_from_sorted() {
        let q = ListQuery { page: Some(2), limit: Some(2), ..Default::default() };
        let page = Page::from_sorted(vec![1, 2, 3, 4, 5], &q);
        assert_eq!(page.items, vec![3, 4]);
        assert_eq!(page.pagination, Pagination { page: 2, limit: 2, total: 5, total_pages: 3 });
    }

    #[test]
    fn test_filters_ignore_all_and_blank() {
        let q = ListQuery {
            search: Some("  Gorilla ".to_string()),
            status: Some("all".to_string()),
            role: Some("admin".to_string()),
            ..Default::default()
        };
        assert_eq!(q.search_term().as_deref(), Some("gorilla"));
        assert_eq!(q.status_filter(), None);
        assert_eq!(q.role_filter(), Some("admin"));
    }

    #[test]
    fn test_sort_field_whitelist() {
        let q = ListQuery { sort_by: Some("created_at; DROP TABLE".to_string()), ..Default::default() };
        assert_eq!(q.sort_field(&["created_at", "name"], "created_at"), "created_at");

        let q = ListQuery { sort_by: Some("name".to_string()), sort_order: Some(SortOrder::Asc), ..Default::default() };
        assert_eq!(q.sort_field(&["created_at", "name"], "created_at"), "name");
        assert_eq!(q.sort_order().as_sql(), "ASC");
    }

    #[test]
    fn test_query_deserializes_camel_case() {
        let q: ListQuery = serde_json::from_value(serde_json::json!({
            "page": 2, "limit": 25, "sortBy": "name", "sortOrder": "asc"
        }))
        .unwrap();
        assert_eq!(q.sort_by.as_deref(), Some("name"));
        assert_eq!(q.sort_order(), SortOrder::Asc);
    }
}
