#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::core::discovery::ServiceDiscovery;
use crate::core::filter::SortOrder;
use crate::core::{ConfigProvider, Notifier};
use crate::domain::model::{ALL_GOVERNORATES, GOVERNORATES};
use crate::utils::error::{MarketError, Result};
use crate::utils::validation::{self, Validate};

#[cfg(feature = "cli")]
pub use cli::CliConfig;

pub const OUTPUT_FORMATS: [&str; 2] = ["csv", "json"];

/// Settings for one discovery run, after merging file and flags.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscoveryConfig {
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub output_path: String,
    pub output_format: String,
    /// Page query string, e.g. `category=3&search=plumber`.
    pub query: String,
    pub governorate: String,
    pub min_price: String,
    pub max_price: String,
    pub ratings: Vec<u8>,
    pub sort: String,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000/api".to_string(),
            request_timeout_secs: 30,
            output_path: "./output".to_string(),
            output_format: "csv".to_string(),
            query: String::new(),
            governorate: ALL_GOVERNORATES.to_string(),
            min_price: String::new(),
            max_price: String::new(),
            ratings: Vec::new(),
            sort: SortOrder::default().as_str().to_string(),
        }
    }
}

impl DiscoveryConfig {
    pub fn sort_order(&self) -> SortOrder {
        SortOrder::from_name_or_default(&self.sort)
    }

    /// Sets the criteria the query string does not carry.
    pub fn apply_refinements<N: Notifier>(&self, discovery: &mut ServiceDiscovery<N>) {
        discovery.set_governorate(self.governorate.as_str());
        discovery.set_min_price(self.min_price.as_str());
        discovery.set_max_price(self.max_price.as_str());
        discovery.set_ratings(self.ratings.iter().copied());
        discovery.set_sort(self.sort_order());
    }
}

impl ConfigProvider for DiscoveryConfig {
    fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn request_timeout_secs(&self) -> u64 {
        self.request_timeout_secs
    }

    fn output_format(&self) -> &str {
        &self.output_format
    }
}

impl Validate for DiscoveryConfig {
    fn validate(&self) -> Result<()> {
        if self.api_base_url.trim().is_empty() {
            return Err(MarketError::MissingConfigError {
                field: "api.base_url".to_string(),
            });
        }
        validation::validate_url("api.base_url", &self.api_base_url)?;
        validation::validate_positive_number("api.timeout_seconds", self.request_timeout_secs, 1)?;
        validation::validate_path("output.path", &self.output_path)?;
        validation::validate_one_of("output.format", &self.output_format, &OUTPUT_FORMATS)?;

        let sort_names: Vec<&str> = SortOrder::ALL.iter().map(SortOrder::as_str).collect();
        validation::validate_one_of("discovery.sort", &self.sort, &sort_names)?;

        let governorate_ids: Vec<&str> = GOVERNORATES.iter().map(|gov| gov.id).collect();
        validation::validate_one_of("discovery.governorate", &self.governorate, &governorate_ids)?;

        for &rating in &self.ratings {
            validation::validate_range("discovery.rating", rating, 1, 5)?;
        }
        Ok(())
    }
}
