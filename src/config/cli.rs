use crate::config::toml_config::TomlConfig;
use crate::config::DiscoveryConfig;
use crate::utils::error::Result;
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "service-market")]
#[command(about = "Filter, search and sort marketplace service listings")]
pub struct CliConfig {
    /// TOML file with API and output settings; flags override it
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(long)]
    pub api_base_url: Option<String>,

    #[arg(long)]
    pub timeout: Option<u64>,

    /// Page query string, e.g. "category=3&search=plumber"
    #[arg(long, default_value = "")]
    pub query: String,

    /// Governorate id, or "all"
    #[arg(long)]
    pub governorate: Option<String>,

    #[arg(long, default_value = "")]
    pub min_price: String,

    #[arg(long, default_value = "")]
    pub max_price: String,

    /// Minimum mean rating; repeat to admit several floors
    #[arg(long = "rating", value_parser = clap::value_parser!(u8).range(1..=5))]
    pub ratings: Vec<u8>,

    /// newest, top-rated, price-high-low or price-low-high
    #[arg(long)]
    pub sort: Option<String>,

    #[arg(long)]
    pub output_path: Option<String>,

    /// csv or json
    #[arg(long)]
    pub format: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log as JSON lines")]
    pub json_logs: bool,
}

impl CliConfig {
    pub fn into_discovery_config(self) -> Result<DiscoveryConfig> {
        let mut config = match &self.config {
            Some(path) => TomlConfig::from_file(path)?.into_discovery_config(),
            None => DiscoveryConfig::default(),
        };

        if let Some(api_base_url) = self.api_base_url {
            config.api_base_url = api_base_url;
        }
        if let Some(timeout) = self.timeout {
            config.request_timeout_secs = timeout;
        }
        if let Some(governorate) = self.governorate {
            config.governorate = governorate;
        }
        if let Some(sort) = self.sort {
            config.sort = sort;
        }
        if let Some(output_path) = self.output_path {
            config.output_path = output_path;
        }
        if let Some(format) = self.format {
            config.output_format = format;
        }
        config.query = self.query;
        config.min_price = self.min_price;
        config.max_price = self.max_price;
        config.ratings = self.ratings;

        Ok(config)
    }
}
