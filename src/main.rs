//! Lamad - session shell
//!
//! Drives one `SessionController` from stdin, standing in for the rendering
//! layer: onboarding, sign-in, navigation and language changes.

mod shell;

use clap::Parser;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lamad_client::{Args, CredentialResolver, ProfileStore, SessionController};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    // Logs go to stderr; stdout belongs to the shell
    let log_level = args.log_level.clone();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("lamad_client={0},lamad={0},warn", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = args.validate() {
        error!("Configuration error: {}", e);
        std::process::exit(1);
    }

    info!("======================================");
    info!("  Lamad - learning client");
    info!("======================================");
    info!("Auth service: {}", args.auth_url.as_deref().unwrap_or("(offline)"));
    info!("Profile store: {}", args.store_path().display());
    info!("Request timeout: {}ms", args.request_timeout_ms);
    info!("======================================");

    let store = ProfileStore::open(args.store_path())?;
    let service = args.auth_service()?;
    let resolver = CredentialResolver::new(
        Arc::clone(&service),
        args.demo_roster()?,
        store.clone(),
        args.resolver_config(),
    );
    let mut controller = SessionController::new(store, resolver, service, args.router()?);

    controller.restore()?;

    shell::run(&mut controller).await
}
