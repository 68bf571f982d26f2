use safari_core::Tour;

/// Header search shows at most this many matches.
pub const DEFAULT_RESULT_LIMIT: usize = 5;

/// Case-insensitive substring filter over an in-memory tour list.
///
/// Matches against title, location, description, short description and every
/// highlight. Results keep catalogue order. A blank query matches nothing.
#[derive(Debug, Clone)]
pub struct TourSearch {
    tours: Vec<Tour>,
    limit: usize,
}

impl TourSearch {
    pub fn new(tours: Vec<Tour>) -> Self {
        Self::with_limit(tours, DEFAULT_RESULT_LIMIT)
    }

    pub fn with_limit(tours: Vec<Tour>, limit: usize) -> Self {
        Self { tours, limit }
    }

    pub fn tours(&self) -> &[Tour] {
        &self.tours
    }

    pub fn filter(&self, query: &str) -> Vec<&Tour> {
        filter_tours(&self.tours, query, self.limit)
    }
}

pub fn filter_tours<'a>(tours: &'a [Tour], query: &str, limit: usize) -> Vec<&'a Tour> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    tours
        .iter()
        .filter(|tour| matches(tour, &needle))
        .take(limit)
        .collect()
}

fn matches(tour: &Tour, needle: &str) -> bool {
    let contains = |field: &str| field.to_lowercase().contains(needle);

    contains(&tour.title)
        || contains(&tour.location)
        || contains(&tour.description)
        || contains(&tour.short_description)
        || tour.highlights.iter().any(|h| contains(h))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use uuid::Uuid;

    fn tour(title: &str, location: &str, highlights: &[&str]) -> Tour {
        Tour {
            id: Uuid::new_v4(),
            slug: title.to_lowercase().replace(' ', "-"),
            title: title.to_string(),
            location: location.to_string(),
            description: format!("{} in {}", title, location),
            short_description: String::new(),
            highlights: highlights.iter().map(|h| h.to_string()).collect(),
            price: Decimal::from(100),
            duration_days: 3,
            image: String::new(),
            is_active: true,
        }
    }

    fn catalogue() -> Vec<Tour> {
        vec![
            tour("Bwindi Gorilla Trek", "Bwindi", &[]),
            tour("Chimp Tracking", "Kibale", &["See GORILLAS nearby"]),
            tour("Nile Rafting", "Jinja", &["Grade 5 rapids"]),
            tour("Mountain Gorilla Lodge", "Mgahinga", &[]),
            tour("Queen Elizabeth Safari", "Kasese", &[]),
            tour("Gorilla Habituation", "Rushaga", &[]),
            tour("Gorilla Photography", "Nkuringo", &[]),
            tour("Gorilla & Golden Monkey", "Mgahinga", &[]),
        ]
    }

    #[test]
    fn test_gorilla_query_is_case_insensitive_and_capped() {
        let search = TourSearch::new(catalogue());
        let results = search.filter("GoRiLLa");

        assert_eq!(results.len(), 5);
        for t in &results {
            let haystack = format!(
                "{} {} {} {} {}",
                t.title, t.location, t.description, t.short_description, t.highlights.join(" ")
            )
            .to_lowercase();
            assert!(haystack.contains("gorilla"));
        }
        assert_eq!(results[0].title, "Bwindi Gorilla Trek");
        assert_eq!(results[1].title, "Chimp Tracking");
    }

    #[test]
    fn test_empty_query_yields_nothing() {
        let search = TourSearch::new(catalogue());
        assert!(search.filter("").is_empty());
        assert!(search.filter("   ").is_empty());
    }

    #[test]
    fn test_matches_location_only() {
        let search = TourSearch::new(catalogue());
        let results = search.filter("jinja");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "Nile Rafting");
    }

    #[test]
    fn test_no_match() {
        let search = TourSearch::with_limit(catalogue(), 10);
        assert!(search.filter("kilimanjaro").is_empty());
    }
}
