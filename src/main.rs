use std::sync::Arc;

use tracing::{error, info};

use etsin::datetime::resolve_timezone;
use etsin::web::{AppState, WebServer};
use etsin::{Config, MetaxClient, RemsClient};

#[tokio::main]
async fn main() {
    // Load configuration
    let config = match Config::load_with_env("config.toml") {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config.toml: {e}");
            eprintln!("Using default configuration.");
            let mut config = Config::default();
            config.apply_env_overrides();
            config
        }
    };

    // Falls back to console-only logging on failure
    if let Err(e) = etsin::logging::init(&config.logging) {
        eprintln!("Failed to initialize file logging: {e}");
    }

    info!("Etsin - research dataset discovery");

    if let Err(e) = run(config).await {
        error!("{e}");
        std::process::exit(1);
    }
}

async fn run(config: Config) -> etsin::Result<()> {
    config.validate()?;

    let metax = MetaxClient::new(&config.metax)?;
    info!("Metax configured at {}", config.metax.base_url);

    let mut app_state = AppState::new(Arc::new(metax))
        .with_locale(
            &config.locale.language,
            resolve_timezone(&config.locale.timezone),
        )
        .with_download_base_url(&config.download.base_url);

    if config.rems.enabled {
        app_state = app_state.with_permits(Arc::new(RemsClient::new(&config.rems)?));
        info!("REMS permit lookups enabled");
    }

    WebServer::new(&config.web, app_state)?.run().await
}
