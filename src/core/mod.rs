pub mod discovery;
pub mod engine;
pub mod filter;
pub mod image;
pub mod query;
pub mod wizard;

pub use crate::domain::model::{Catalog, Category, RegistrationFormData, Service};
pub use crate::domain::ports::{
    AccountGateway, CatalogSource, ConfigProvider, Navigator, Notifier, Pipeline, Storage,
};
pub use crate::utils::error::Result;
