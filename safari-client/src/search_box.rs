use safari_catalog::TourSearch;
use safari_core::Tour;

/// Header search: query text, matching tours and whether the results panel
/// is open. Recomputed on every keystroke.
#[derive(Debug, Clone)]
pub struct SearchBox {
    search: TourSearch,
    query: String,
    results: Vec<Tour>,
}

impl SearchBox {
    pub fn new(search: TourSearch) -> Self {
        Self {
            search,
            query: String::new(),
            results: Vec::new(),
        }
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.results = self.search.filter(&self.query).into_iter().cloned().collect();
    }

    pub fn clear(&mut self) {
        self.set_query("");
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn results(&self) -> &[Tour] {
        &self.results
    }

    pub fn is_open(&self) -> bool {
        !self.query.trim().is_empty()
    }
}
