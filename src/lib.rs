pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{ApiClient, LocalStorage};
pub use app::pipelines::DiscoveryPipeline;
pub use config::DiscoveryConfig;
pub use core::discovery::ServiceDiscovery;
pub use core::engine::Engine;
pub use core::filter::{compute_visible, FilterCriteria, SortOrder};
pub use core::wizard::{RegistrationWizard, SubmitOutcome, WizardStep};
pub use utils::error::{MarketError, Result};
