use clap::Parser;
use service_market::adapters::{ApiClient, InMemoryNavigator, SimulatedAccountGateway, TracingNotifier};
use service_market::core::wizard::SubmissionBlocked;
use service_market::core::AccountGateway;
use service_market::domain::model::{RegistrationFormData, REGISTRATION_GOVERNORATES};
use service_market::utils::logger;
use service_market::utils::validation::validate_url;
use service_market::{RegistrationWizard, SubmitOutcome};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "register")]
#[command(about = "Walk the registration wizard with a prepared form and submit it")]
struct Args {
    /// JSON file with the form fields (camelCase names)
    #[arg(short, long)]
    form: PathBuf,

    /// Profile picture to attach on the address step
    #[arg(long)]
    image: Option<PathBuf>,

    /// Submit to this API; without it the submission is simulated
    #[arg(long)]
    api_base_url: Option<String>,

    #[arg(long, default_value = "30")]
    timeout: u64,

    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logger::init_cli_logger(args.verbose);

    let raw = tokio::fs::read(&args.form).await?;
    let form: RegistrationFormData = serde_json::from_slice(&raw)?;
    if !form.governorate.is_empty()
        && !REGISTRATION_GOVERNORATES
            .iter()
            .any(|gov| gov.id == form.governorate)
    {
        tracing::warn!("Governorate '{}' is not one of the listed options", form.governorate);
    }

    let gateway: Box<dyn AccountGateway> = match &args.api_base_url {
        Some(url) => {
            validate_url("api_base_url", url)?;
            Box::new(ApiClient::new(url.as_str(), args.timeout)?)
        }
        None => {
            tracing::info!("No API configured, simulating account creation");
            Box::new(SimulatedAccountGateway::default())
        }
    };

    let mut wizard = RegistrationWizard::with_form(form, TracingNotifier);
    while wizard.next() {
        tracing::info!("Reached step {}", wizard.step().number());
    }
    wizard.attach_profile_image(args.image.as_deref()).await?;
    if wizard.form().profile_image.is_none() {
        if let Some(initials) = wizard.form().initials() {
            tracing::info!("No profile picture, avatar shows {}", initials);
        }
    }

    let navigator = InMemoryNavigator::default();
    match wizard.submit(gateway.as_ref(), &navigator).await {
        Ok(SubmitOutcome::Created) => {
            println!("✅ Account created, continue at {}", navigator.visited().join(", "));
            Ok(())
        }
        Ok(SubmitOutcome::Blocked(SubmissionBlocked::Invalid(violation))) => {
            eprintln!("❌ {}", violation);
            std::process::exit(1);
        }
        Ok(SubmitOutcome::Blocked(blocked)) => {
            eprintln!(
                "❌ Registration stopped on step {} ({:?})",
                wizard.step().number(),
                blocked
            );
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(2);
        }
    }
}
