use crate::core::Pipeline;
use crate::utils::error::Result;

/// Runs a [`Pipeline`]: fetch the catalog, derive the visible listings,
/// write them out.
pub struct Engine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> Engine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<String> {
        tracing::info!("Starting service discovery run");

        let catalog = self.pipeline.extract().await?;
        tracing::info!(
            "Fetched {} services in {} categories",
            catalog.services.len(),
            catalog.categories.len()
        );

        let visible = self.pipeline.transform(catalog).await?;
        tracing::info!("{} services match the current filters", visible.len());

        let output_path = self.pipeline.load(visible).await?;
        tracing::info!("Output saved to: {}", output_path);

        Ok(output_path)
    }
}
