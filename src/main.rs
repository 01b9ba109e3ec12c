//! Parlor - Interactive chat session CLI
//!
#![doc = "Main entry point for the Parlor chat application."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use parlor::cli::{Cli, Commands};
use parlor::config::Config;
use parlor::repl::Repl;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    init_tracing(cli.verbose);

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/parlor.yaml");
    let config = Config::load(config_path)?;

    // Validate configuration
    config.validate()?;

    // Execute command
    match cli.command {
        Commands::Chat { email } => {
            tracing::info!("Starting interactive chat");
            let repl = Repl::new(config);
            if let Some(email) = email {
                tracing::debug!("Signing in as {}", email);
                repl.sign_in(&email, "password").await?;
            }
            repl.run().await
        }
        Commands::Config => {
            println!("{}", serde_yaml::to_string(&config)?);
            Ok(())
        }
    }
}

/// Initialize tracing subscriber with environment filter
fn init_tracing(verbose: bool) {
    let default_directive = if verbose { "parlor=debug" } else { "parlor=info" };
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
