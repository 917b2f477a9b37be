use clap::Parser;
use coffee_architect::adapters::{InProcessProxy, ProxyClient};
use coffee_architect::app::{OutputFormat, Shell};
use coffee_architect::config::Command;
use coffee_architect::core::assistant::AssistantSession;
use coffee_architect::core::prompts::{AiAction, ShopLocation};
use coffee_architect::domain::ports::CompletionBackend;
use coffee_architect::proxy::{EnvCredentials, ProxyHandler};
use coffee_architect::utils::error::ErrorSeverity;
use coffee_architect::utils::{logger, validation::Validate};
use coffee_architect::{ArchitectConfig, CliConfig, Result};

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    logger::init_cli_logger(cli.verbose);
    tracing::debug!("CLI config: {:?}", cli);

    if let Err(e) = run(cli).await {
        tracing::error!(
            "❌ {} (Category: {:?}, Severity: {:?})",
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
        std::process::exit(exit_code);
    }
}

async fn run(cli: CliConfig) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            ArchitectConfig::from_file(path)?
        }
        None => ArchitectConfig::default(),
    };
    if let Some(url) = &cli.proxy_url {
        config.proxy.url = Some(url.clone());
    }
    config.validate()?;

    let mut shell = Shell::new(config.load_catalog()?, config.vessel()?)?;
    shell.apply(&cli.selection_flags())?;

    let action = match &cli.command {
        Command::Show { format } => {
            let format: OutputFormat = format.parse()?;
            print!("{}", shell.show(format)?);
            return Ok(());
        }
        Command::Catalog => {
            print!("{}", shell.catalog_listing());
            return Ok(());
        }
        Command::Flavor => AiAction::FlavorAnalysis,
        Command::Guide => AiAction::BrewGuide,
        Command::Shops {
            city,
            current_location,
        } => AiAction::ShopSearch(ShopLocation::from_input(city.as_deref(), *current_location)?),
    };

    let session = AssistantSession::new(backend(&config)?, config.ticker());

    // Loading lines go to stderr so stdout only carries the answer.
    let mut updates = session.subscribe();
    let ticker = tokio::spawn(async move {
        let mut shown: Option<String> = None;
        while updates.changed().await.is_ok() {
            let text = updates.borrow_and_update().loading_text.clone();
            if let Some(text) = text {
                if shown.as_ref() != Some(&text) {
                    eprintln!("{}", text);
                    shown = Some(text);
                }
            }
        }
    });

    let answer = shell.ask(&session, &action).await?;
    drop(session);
    let _ = ticker.await;

    println!("{}", answer);
    Ok(())
}

fn backend(config: &ArchitectConfig) -> Result<Box<dyn CompletionBackend>> {
    match &config.proxy.url {
        Some(url) => {
            tracing::info!("Using proxy at {}", url);
            Ok(Box::new(ProxyClient::new(url.clone(), config.proxy_timeout())?))
        }
        None => {
            tracing::info!(
                "No proxy URL configured; calling {} in-process",
                config.upstream.endpoint
            );
            let credentials = EnvCredentials::new(config.upstream.api_key_env.clone());
            let handler = ProxyHandler::new(config.upstream.clone(), credentials)?;
            Ok(Box::new(InProcessProxy::new(handler)))
        }
    }
}
