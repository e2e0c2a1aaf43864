//! Discovery session: owns the filter criteria, the loaded catalog and the
//! page's query string.
//!
//! The query string is read once when the session starts. `search` is
//! applied straight away; `category` waits until categories are loaded and
//! is applied only if it names a known category and the user has not
//! picked one in the meantime. After that, only [`ServiceDiscovery::set_search_query`]
//! writes back to the query string.

use crate::core::filter::{self, FilterCriteria, SortOrder};
use crate::core::query::{QueryParams, CATEGORY_PARAM, SEARCH_PARAM};
use crate::domain::model::{Catalog, Category, Service};
use crate::domain::ports::{CatalogSource, Notification, Notifier};
use std::ops::RangeInclusive;

const RATING_RANGE: RangeInclusive<u8> = 1..=5;

/// Fetches categories and services concurrently. A failed fetch is reported
/// once, categories first, and leaves that collection empty.
pub async fn fetch_catalog<S, N>(source: &S, notifier: &N) -> Catalog
where
    S: CatalogSource + ?Sized,
    N: Notifier + ?Sized,
{
    let (categories, services) = tokio::join!(source.fetch_categories(), source.fetch_services());

    let categories = match categories {
        Ok(categories) => categories,
        Err(e) => {
            tracing::warn!("Category fetch failed, continuing without categories: {}", e);
            notifier.notify(Notification::error(
                "Failed to load categories",
                "An error occurred while loading categories. Please try again.",
            ));
            Vec::new()
        }
    };

    let services = match services {
        Ok(services) => services,
        Err(e) => {
            tracing::warn!("Service fetch failed, continuing without services: {}", e);
            notifier.notify(Notification::error(
                "Failed to load services",
                "An error occurred while loading services. Please try again.",
            ));
            Vec::new()
        }
    };

    Catalog {
        services,
        categories,
    }
}

pub struct ServiceDiscovery<N: Notifier> {
    catalog: Catalog,
    criteria: FilterCriteria,
    query: QueryParams,
    pending_category: Option<String>,
    notifier: N,
}

impl<N: Notifier> ServiceDiscovery<N> {
    pub fn new(query_string: &str, notifier: N) -> Self {
        let query = QueryParams::parse(query_string);
        let mut criteria = FilterCriteria::default();

        if let Some(search) = query.get(SEARCH_PARAM).filter(|s| !s.is_empty()) {
            tracing::debug!("Seeding search query from URL: {}", search);
            criteria.search_query = search.to_string();
        }
        let pending_category = query
            .get(CATEGORY_PARAM)
            .filter(|c| !c.is_empty())
            .map(str::to_string);

        Self {
            catalog: Catalog::default(),
            criteria,
            query,
            pending_category,
            notifier,
        }
    }

    /// Fetches both collections; see [`fetch_catalog`].
    pub async fn load<S: CatalogSource + ?Sized>(&mut self, source: &S) {
        let catalog = fetch_catalog(source, &self.notifier).await;
        self.set_categories(catalog.categories);
        self.set_services(catalog.services);
    }

    pub fn set_services(&mut self, services: Vec<Service>) {
        tracing::debug!("Loaded {} services", services.len());
        self.catalog.services = services;
    }

    pub fn set_categories(&mut self, categories: Vec<Category>) {
        tracing::debug!("Loaded {} categories", categories.len());
        self.catalog.categories = categories;
        self.apply_category_seed();
    }

    fn apply_category_seed(&mut self) {
        if self.catalog.categories.is_empty() {
            return;
        }
        let Some(candidate) = self.pending_category.take() else {
            return;
        };
        let known = self
            .catalog
            .categories
            .iter()
            .any(|category| category.id.to_string() == candidate);
        if known {
            tracing::debug!("Seeding category from URL: {}", candidate);
            self.criteria.selected_category = candidate;
        } else {
            tracing::debug!("Ignoring unknown category from URL: {}", candidate);
        }
    }

    pub fn set_selected_category(&mut self, category: impl Into<String>) {
        // an explicit choice wins over a URL seed that has not landed yet
        self.pending_category = None;
        self.criteria.selected_category = category.into();
    }

    /// Updates the query and writes it through to the `search` parameter.
    pub fn set_search_query(&mut self, value: impl Into<String>) {
        let value = value.into();
        if value.is_empty() {
            self.query.delete(SEARCH_PARAM);
        } else {
            self.query.set(SEARCH_PARAM, &value);
        }
        self.criteria.search_query = value;
    }

    pub fn set_governorate(&mut self, governorate: impl Into<String>) {
        self.criteria.selected_governorate = governorate.into();
    }

    pub fn set_min_price(&mut self, raw: impl Into<String>) {
        self.criteria.min_price = raw.into();
    }

    pub fn set_max_price(&mut self, raw: impl Into<String>) {
        self.criteria.max_price = raw.into();
    }

    /// Ratings outside 1..=5 are ignored.
    pub fn toggle_rating(&mut self, rating: u8) {
        if !RATING_RANGE.contains(&rating) {
            tracing::debug!("Ignoring out-of-range rating {}", rating);
            return;
        }
        if !self.criteria.selected_ratings.remove(&rating) {
            self.criteria.selected_ratings.insert(rating);
        }
    }

    pub fn set_ratings(&mut self, ratings: impl IntoIterator<Item = u8>) {
        self.criteria.selected_ratings = ratings
            .into_iter()
            .filter(|rating| RATING_RANGE.contains(rating))
            .collect();
    }

    pub fn set_sort(&mut self, sort: SortOrder) {
        self.criteria.selected_sort = sort;
    }

    pub fn visible_services(&self) -> Vec<Service> {
        filter::compute_visible(&self.catalog.services, &self.criteria)
    }

    pub fn category_count(&self, category_id: u64) -> usize {
        filter::category_count(&self.catalog.services, category_id)
    }

    /// Badge for the "all services" entry.
    pub fn total_count(&self) -> usize {
        self.catalog.services.len()
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn categories(&self) -> &[Category] {
        &self.catalog.categories
    }

    pub fn query_string(&self) -> String {
        self.query.to_query_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::notify::InMemoryNotifier;

    fn categories() -> Vec<Category> {
        vec![
            Category { id: 3, name: "Cleaning".to_string() },
            Category { id: 5, name: "Plumbing".to_string() },
        ]
    }

    #[test]
    fn test_search_param_seeds_query() {
        let discovery = ServiceDiscovery::new("?search=plumber", InMemoryNotifier::default());
        assert_eq!(discovery.criteria().search_query, "plumber");
    }

    #[test]
    fn test_category_param_waits_for_categories() {
        let mut discovery = ServiceDiscovery::new("category=5", InMemoryNotifier::default());
        assert_eq!(discovery.criteria().selected_category, "all");

        discovery.set_categories(Vec::new());
        assert_eq!(discovery.criteria().selected_category, "all");

        discovery.set_categories(categories());
        assert_eq!(discovery.criteria().selected_category, "5");
    }

    #[test]
    fn test_unknown_category_param_is_ignored() {
        let mut discovery = ServiceDiscovery::new("category=42", InMemoryNotifier::default());
        discovery.set_categories(categories());
        assert_eq!(discovery.criteria().selected_category, "all");
    }

    #[test]
    fn test_category_seed_applies_at_most_once() {
        let mut discovery = ServiceDiscovery::new("category=3", InMemoryNotifier::default());
        discovery.set_categories(categories());
        assert_eq!(discovery.criteria().selected_category, "3");

        discovery.set_selected_category("5");
        discovery.set_categories(categories());
        assert_eq!(discovery.criteria().selected_category, "5");
    }

    #[test]
    fn test_user_choice_beats_late_categories() {
        let mut discovery = ServiceDiscovery::new("category=3", InMemoryNotifier::default());
        discovery.set_selected_category("all");
        discovery.set_categories(categories());
        assert_eq!(discovery.criteria().selected_category, "all");
    }

    #[test]
    fn test_toggle_rating() {
        let mut discovery = ServiceDiscovery::new("", InMemoryNotifier::default());
        discovery.toggle_rating(4);
        discovery.toggle_rating(2);
        assert_eq!(
            discovery.criteria().selected_ratings.iter().copied().collect::<Vec<_>>(),
            vec![2, 4]
        );
        discovery.toggle_rating(4);
        assert_eq!(
            discovery.criteria().selected_ratings.iter().copied().collect::<Vec<_>>(),
            vec![2]
        );
    }

    struct SlowCatalog {
        delay: std::time::Duration,
    }

    #[async_trait::async_trait]
    impl CatalogSource for SlowCatalog {
        async fn fetch_services(&self) -> crate::utils::error::Result<Vec<Service>> {
            tokio::time::sleep(self.delay).await;
            Err(crate::utils::error::MarketError::FetchError {
                resource: "services".to_string(),
                status: 502,
            })
        }

        async fn fetch_categories(&self) -> crate::utils::error::Result<Vec<Category>> {
            tokio::time::sleep(self.delay * 2).await;
            Ok(categories())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_catalog_runs_both_fetches_concurrently() {
        let notifier = InMemoryNotifier::default();
        let source = SlowCatalog {
            delay: std::time::Duration::from_secs(1),
        };
        let started = tokio::time::Instant::now();

        let catalog = fetch_catalog(&source, &notifier).await;

        let elapsed = started.elapsed();
        assert!(elapsed >= std::time::Duration::from_secs(2));
        assert!(elapsed < std::time::Duration::from_secs(3));
        assert_eq!(catalog.categories.len(), 2);
        assert!(catalog.services.is_empty());
        assert_eq!(notifier.titles(), vec!["Failed to load services".to_string()]);
    }

    #[test]
    fn test_out_of_range_ratings_are_ignored() {
        let mut discovery = ServiceDiscovery::new("", InMemoryNotifier::default());
        discovery.toggle_rating(0);
        discovery.toggle_rating(6);
        assert!(discovery.criteria().selected_ratings.is_empty());

        discovery.set_ratings([0, 3, 9, 5]);
        assert_eq!(
            discovery.criteria().selected_ratings.iter().copied().collect::<Vec<_>>(),
            vec![3, 5]
        );
    }
}
