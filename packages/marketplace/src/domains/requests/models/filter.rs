use crate::domains::catalog::{Category, ALL_CATEGORIES, ALL_CITIES};

use super::Request;

/// Browse filter for the request feed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestFilter {
    /// `None` shows every category.
    pub category: Option<Category>,
    /// `None` shows every city. A concrete city still shows requests that
    /// have no city set.
    pub city: Option<String>,
    /// Case-insensitive substring over title and description.
    pub search: String,
}

impl RequestFilter {
    /// Build from picker labels. "Все" / "Россия, все города" and unknown
    /// category labels mean "no restriction".
    pub fn from_labels(category: &str, city: &str, search: &str) -> Self {
        let category = match category.trim() {
            "" | ALL_CATEGORIES => None,
            label => label.parse().ok(),
        };
        let city = match city.trim() {
            "" | ALL_CITIES => None,
            name => Some(name.to_string()),
        };

        Self {
            category,
            city,
            search: search.trim().to_string(),
        }
    }

    pub fn matches(&self, request: &Request) -> bool {
        let category_ok = self.category.map_or(true, |c| request.category == c);

        let city_ok = match (&self.city, &request.city) {
            (None, _) | (_, None) => true,
            (Some(wanted), Some(city)) => wanted == city,
        };

        let search_ok = self.search.is_empty() || {
            let needle = self.search.to_lowercase();
            request.title.to_lowercase().contains(&needle)
                || request.description.to_lowercase().contains(&needle)
        };

        category_ok && city_ok && search_ok
    }

    pub fn apply(&self, requests: Vec<Request>) -> Vec<Request> {
        requests.into_iter().filter(|r| self.matches(r)).collect()
    }
}
