use clap::Parser;
use service_market::adapters::TracingNotifier;
use service_market::core::ConfigProvider;
use service_market::utils::error::ErrorSeverity;
use service_market::utils::logger::{self, LogFormat};
use service_market::utils::validation::Validate;
use service_market::{ApiClient, CliConfig, DiscoveryPipeline, Engine, LocalStorage};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let format = if cli.json_logs {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };
    logger::init_logger(cli.verbose, format);

    tracing::info!("Starting service-market CLI");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let config = match cli.into_discovery_config().and_then(|config| {
        config.validate()?;
        Ok(config)
    }) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Configuration validation failed: {}", e);
            tracing::error!("Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    let source = ApiClient::new(config.api_base_url(), config.request_timeout_secs())?;
    let storage = LocalStorage::new(config.output_path());
    let pipeline = DiscoveryPipeline::new(storage, source, config, TracingNotifier);
    let engine = Engine::new(pipeline);

    match engine.run().await {
        Ok(output_path) => {
            println!("✅ Visible services written to: {}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "Discovery run failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}
