//! Faceted filtering and ordering of service listings.
//!
//! [`compute_visible`] is a pure function of the catalog and a
//! [`FilterCriteria`] value. Stages run in a fixed order: category,
//! text search, sort, region, price range, rating. Invalid numeric input
//! never fails a stage; it just imposes no constraint.

use crate::domain::model::{Service, ALL_GOVERNORATES};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;

pub const ALL_CATEGORIES: &str = "all";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Newest,
    TopRated,
    PriceHighLow,
    PriceLowHigh,
}

impl SortOrder {
    pub const ALL: [SortOrder; 4] = [
        SortOrder::Newest,
        SortOrder::TopRated,
        SortOrder::PriceHighLow,
        SortOrder::PriceLowHigh,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Newest => "newest",
            SortOrder::TopRated => "top-rated",
            SortOrder::PriceHighLow => "price-high-low",
            SortOrder::PriceLowHigh => "price-low-high",
        }
    }

    /// Exact match on the wire name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|order| order.as_str() == name)
    }

    /// Unrecognized names sort by recency.
    pub fn from_name_or_default(name: &str) -> Self {
        Self::from_name(name).unwrap_or_default()
    }

    fn compare(&self, a: &Service, b: &Service) -> Ordering {
        match self {
            SortOrder::Newest => b.created_at.cmp(&a.created_at),
            SortOrder::TopRated => b.mean_rating().total_cmp(&a.mean_rating()),
            SortOrder::PriceHighLow => b.price.total_cmp(&a.price),
            SortOrder::PriceLowHigh => a.price.total_cmp(&b.price),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCriteria {
    /// Category id, or `"all"`.
    pub selected_category: String,
    pub search_query: String,
    /// Governorate id, or `"all"`.
    pub selected_governorate: String,
    /// Raw text of the price inputs; see [`parse_price_bound`].
    pub min_price: String,
    pub max_price: String,
    /// Minimum mean ratings, any one of which admits a service.
    pub selected_ratings: BTreeSet<u8>,
    pub selected_sort: SortOrder,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            selected_category: ALL_CATEGORIES.to_string(),
            search_query: String::new(),
            selected_governorate: ALL_GOVERNORATES.to_string(),
            min_price: String::new(),
            max_price: String::new(),
            selected_ratings: BTreeSet::new(),
            selected_sort: SortOrder::default(),
        }
    }
}

/// Reads a price bound the way a lenient integer parse does: optional
/// leading whitespace and sign, then the leading run of digits. `"120"`,
/// `" 120"` and `"120.5"` all give 120; `""` and `"abc"` give `None`.
pub fn parse_price_bound(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return None;
    }
    // digits only, so the parse can fail only by overflowing
    let magnitude: i64 = rest[..digits_len].parse().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

pub fn narrow_by_category<'a>(services: &'a [Service], selected_category: &str) -> Vec<&'a Service> {
    if selected_category == ALL_CATEGORIES {
        return services.iter().collect();
    }
    services
        .iter()
        .filter(|service| service.category_id.to_string() == selected_category)
        .collect()
}

pub fn narrow_by_search<'a>(services: Vec<&'a Service>, query: &str) -> Vec<&'a Service> {
    if query.is_empty() {
        return services;
    }
    let needle = query.to_lowercase();
    services
        .into_iter()
        .filter(|service| {
            service.title.to_lowercase().contains(&needle)
                || service.desc.to_lowercase().contains(&needle)
        })
        .collect()
}

fn passes_refinements(
    service: &Service,
    criteria: &FilterCriteria,
    min_price: Option<i64>,
    max_price: Option<i64>,
) -> bool {
    if criteria.selected_governorate != ALL_GOVERNORATES
        && service.region_id().to_string() != criteria.selected_governorate
    {
        return false;
    }

    if let Some(min) = min_price {
        if service.price < min as f64 {
            return false;
        }
    }

    if let Some(max) = max_price {
        if service.price > max as f64 {
            return false;
        }
    }

    if !criteria.selected_ratings.is_empty() {
        let mean = service.mean_rating();
        if !criteria
            .selected_ratings
            .iter()
            .any(|&threshold| mean >= f64::from(threshold))
        {
            return false;
        }
    }

    true
}

/// The services to show for `criteria`, in display order.
pub fn compute_visible(services: &[Service], criteria: &FilterCriteria) -> Vec<Service> {
    let by_category = narrow_by_category(services, &criteria.selected_category);
    let mut matched = narrow_by_search(by_category, &criteria.search_query);

    // stable: equal keys keep catalog order
    matched.sort_by(|a, b| criteria.selected_sort.compare(a, b));

    let min_price = parse_price_bound(&criteria.min_price);
    let max_price = parse_price_bound(&criteria.max_price);

    let visible: Vec<Service> = matched
        .into_iter()
        .filter(|service| passes_refinements(service, criteria, min_price, max_price))
        .cloned()
        .collect();

    tracing::debug!(
        "Derived {} of {} services (sort: {})",
        visible.len(),
        services.len(),
        criteria.selected_sort
    );
    visible
}

/// Services in `category_id` across the whole catalog, regardless of any
/// active filter.
pub fn category_count(services: &[Service], category_id: u64) -> usize {
    services
        .iter()
        .filter(|service| service.category_id == category_id)
        .count()
}
