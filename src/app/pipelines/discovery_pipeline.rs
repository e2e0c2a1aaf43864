use crate::config::DiscoveryConfig;
use crate::core::discovery::{fetch_catalog, ServiceDiscovery};
use crate::core::{Catalog, CatalogSource, ConfigProvider, Notifier, Pipeline, Service, Storage};
use crate::utils::error::{MarketError, Result};
use serde::Serialize;

/// One CSV line per visible service.
#[derive(Debug, Serialize)]
struct ServiceRow<'a> {
    id: u64,
    category_id: u64,
    title: &'a str,
    price: f64,
    mean_rating: f64,
    rating_count: usize,
    region_id: u32,
    created_at: String,
}

impl<'a> From<&'a Service> for ServiceRow<'a> {
    fn from(service: &'a Service) -> Self {
        Self {
            id: service.id,
            category_id: service.category_id,
            title: &service.title,
            price: service.price,
            mean_rating: service.mean_rating(),
            rating_count: service.rates.len(),
            region_id: service.region_id(),
            created_at: service.created_at.to_rfc3339(),
        }
    }
}

pub struct DiscoveryPipeline<S: Storage, Src: CatalogSource, N: Notifier + Clone> {
    storage: S,
    source: Src,
    config: DiscoveryConfig,
    notifier: N,
}

impl<S: Storage, Src: CatalogSource, N: Notifier + Clone> DiscoveryPipeline<S, Src, N> {
    pub fn new(storage: S, source: Src, config: DiscoveryConfig, notifier: N) -> Self {
        Self {
            storage,
            source,
            config,
            notifier,
        }
    }

    fn output_file_name(&self) -> String {
        format!("visible_services.{}", self.config.output_format())
    }

    fn render(&self, visible: &[Service]) -> Result<Vec<u8>> {
        match self.config.output_format() {
            "json" => Ok(serde_json::to_vec_pretty(visible)?),
            "csv" => {
                let mut writer = csv::Writer::from_writer(Vec::new());
                for service in visible {
                    writer.serialize(ServiceRow::from(service))?;
                }
                writer.into_inner().map_err(|e| MarketError::IoError(e.into_error()))
            }
            other => Err(MarketError::InvalidConfigValueError {
                field: "output.format".to_string(),
                value: other.to_string(),
                reason: "Unsupported format".to_string(),
            }),
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, Src: CatalogSource, N: Notifier + Clone> Pipeline for DiscoveryPipeline<S, Src, N> {
    async fn extract(&self) -> Result<Catalog> {
        tracing::debug!("Fetching catalog from {}", self.config.api_base_url());
        Ok(fetch_catalog(&self.source, &self.notifier).await)
    }

    async fn transform(&self, catalog: Catalog) -> Result<Vec<Service>> {
        let mut discovery = ServiceDiscovery::new(&self.config.query, self.notifier.clone());
        discovery.set_categories(catalog.categories);
        discovery.set_services(catalog.services);
        self.config.apply_refinements(&mut discovery);

        for category in discovery.categories() {
            tracing::debug!(
                "Category {} ({}): {} services",
                category.id,
                category.name,
                discovery.category_count(category.id)
            );
        }
        tracing::debug!("Criteria: {:?}", discovery.criteria());

        Ok(discovery.visible_services())
    }

    async fn load(&self, visible: Vec<Service>) -> Result<String> {
        let file_name = self.output_file_name();
        let data = self.render(&visible)?;

        tracing::debug!("Writing {} ({} bytes) to storage", file_name, data.len());
        self.storage.write_file(&file_name, &data).await?;

        Ok(format!("{}/{}", self.config.output_path(), file_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryNotifier;
    use crate::domain::model::{Category, Rate, ServiceOwner, ServiceProfile};
    use chrono::{TimeZone, Utc};
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone, Default)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            self.files.lock().await.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            self.files.lock().await.get(path).cloned().ok_or_else(|| {
                MarketError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            self.files.lock().await.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    struct StaticCatalog {
        services: Vec<Service>,
        categories: Vec<Category>,
        fail_services: bool,
    }

    #[async_trait::async_trait]
    impl CatalogSource for StaticCatalog {
        async fn fetch_services(&self) -> Result<Vec<Service>> {
            if self.fail_services {
                return Err(MarketError::FetchError {
                    resource: "services".to_string(),
                    status: 500,
                });
            }
            Ok(self.services.clone())
        }

        async fn fetch_categories(&self) -> Result<Vec<Category>> {
            Ok(self.categories.clone())
        }
    }

    fn service(id: u64, category_id: u64, price: f64, day: u32) -> Service {
        Service {
            id,
            category_id,
            title: format!("Service {}", id),
            desc: "desc".to_string(),
            price,
            created_at: Utc.with_ymd_and_hms(2024, 3, day, 9, 0, 0).unwrap(),
            rates: vec![Rate { num_star: 4 }],
            profile: ServiceProfile {
                user: ServiceOwner { region_id: 1 },
            },
        }
    }

    fn source(fail_services: bool) -> StaticCatalog {
        StaticCatalog {
            services: vec![service(1, 3, 40.0, 1), service(2, 3, 15.0, 2), service(3, 4, 90.0, 3)],
            categories: vec![
                Category { id: 3, name: "Cleaning".to_string() },
                Category { id: 4, name: "Moving".to_string() },
            ],
            fail_services,
        }
    }

    #[tokio::test]
    async fn test_transform_applies_query_and_refinements() {
        let config = DiscoveryConfig {
            query: "category=3".to_string(),
            sort: "price-low-high".to_string(),
            ..Default::default()
        };
        let pipeline = DiscoveryPipeline::new(
            MockStorage::default(),
            source(false),
            config,
            InMemoryNotifier::default(),
        );

        let catalog = pipeline.extract().await.unwrap();
        let visible = pipeline.transform(catalog).await.unwrap();

        let ids: Vec<u64> = visible.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[tokio::test]
    async fn test_extract_degrades_to_empty_services_and_notifies() {
        let notifier = InMemoryNotifier::default();
        let pipeline = DiscoveryPipeline::new(
            MockStorage::default(),
            source(true),
            DiscoveryConfig::default(),
            notifier.clone(),
        );

        let catalog = pipeline.extract().await.unwrap();

        assert!(catalog.services.is_empty());
        assert_eq!(catalog.categories.len(), 2);
        assert_eq!(notifier.titles(), vec!["Failed to load services".to_string()]);
    }

    #[tokio::test]
    async fn test_load_writes_csv() {
        let storage = MockStorage::default();
        let pipeline = DiscoveryPipeline::new(
            storage.clone(),
            source(false),
            DiscoveryConfig::default(),
            InMemoryNotifier::default(),
        );

        let path = pipeline.load(vec![service(2, 3, 15.0, 2)]).await.unwrap();
        assert_eq!(path, "./output/visible_services.csv");

        let csv = String::from_utf8(storage.get_file("visible_services.csv").await.unwrap()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(
            lines[0],
            "id,category_id,title,price,mean_rating,rating_count,region_id,created_at"
        );
        assert!(lines[1].starts_with("2,3,Service 2,15.0,4.0,1,1,2024-03-02T09:00:00"));
    }

    #[tokio::test]
    async fn test_load_writes_json() {
        let storage = MockStorage::default();
        let config = DiscoveryConfig {
            output_format: "json".to_string(),
            ..Default::default()
        };
        let pipeline =
            DiscoveryPipeline::new(storage.clone(), source(false), config, InMemoryNotifier::default());

        pipeline.load(vec![service(1, 3, 40.0, 1)]).await.unwrap();

        let data = storage.get_file("visible_services.json").await.unwrap();
        let parsed: Vec<Service> = serde_json::from_slice(&data).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].id, 1);
    }
}
