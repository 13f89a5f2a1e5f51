use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

use steelbazaar_leads::{
    cli::{load_draft, Cli, Commands},
    config::Config,
    controller::FormController,
    errors::LeadError,
    intake::{JsonLinesIntake, LogIntake},
    lead_tui,
    models::LeadDraft,
    schema,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Set default log level to INFO if not specified
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "steelbazaar_leads=info");
    }

    let cli = Cli::parse();
    let command = cli.command();

    let config = Config::from_env()?;
    config.validate()?;

    // The form owns the terminal, so it only logs to file
    init_logging(&config, command != Commands::Form);

    match command {
        Commands::Form => {
            info!("Launching lead form");

            match lead_tui::run_tui(config, Box::new(LogIntake)).await {
                Ok(_) => info!("Lead form exited successfully"),
                Err(e) => {
                    error!("Lead form failed: {}", e);
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            }
        }

        Commands::Validate { input, attach } => {
            info!("Validating draft: {}", input.display());

            let draft = load_draft(&input, attach.as_deref())?;
            match schema::validate_lead(&draft, &config.policy) {
                Ok(submission) => println!("{}", serde_json::to_string_pretty(&submission)?),
                Err(errors) => {
                    eprintln!("{}", LeadError::Validation(errors.clone()));
                    eprintln!("{}", errors);
                    std::process::exit(1);
                }
            }
        }

        Commands::Submit { input, attach } => {
            info!("Submitting draft: {}", input.display());

            let draft = load_draft(&input, attach.as_deref())?;
            let mut controller = FormController::with_draft(config.policy, draft);
            let intake = JsonLinesIntake::new(std::io::stdout());

            match controller.submit_to(&intake).await {
                Ok(receipt) => eprintln!("{}", serde_json::to_string_pretty(&receipt)?),
                Err(LeadError::Validation(errors)) => {
                    eprintln!("{}", LeadError::Validation(errors.clone()));
                    eprintln!("{}", errors);
                    std::process::exit(1);
                }
                Err(e) => return Err(e.into()),
            }
        }

        Commands::Template => {
            println!("{}", serde_json::to_string_pretty(&LeadDraft::default())?);
        }
    }

    Ok(())
}

/// Log to the configured file, and to stderr unless the terminal form is running
fn init_logging(config: &Config, to_stderr: bool) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

    let file_appender = tracing_appender::rolling::never(config.log_dir(), config.log_file_name());

    let stderr_layer = to_stderr.then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_filter(EnvFilter::from_default_env())
    });

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_filter(EnvFilter::from_default_env()),
        )
        .init();
}
