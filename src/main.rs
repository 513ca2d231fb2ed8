// src/main.rs

use std::error::Error;

use dotenvy::dotenv;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use verse_forum::config::Config;
use verse_forum::routes;
use verse_forum::state::AppState;
use verse_forum::supabase::DataAccess;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Load .env file (if present)
    dotenv().ok();

    // Load configuration from environment
    let config = Config::from_env()?;

    let file_appender = tracing_appender::rolling::daily(&config.log_dir, "forum.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::new(&config.rust_log);
    let stdout_layer = fmt::layer().with_writer(std::io::stdout).with_target(false);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    // Initialize Tracing (Logging)
    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    // Build the data-access handle once; screens only read it.
    let data = DataAccess::from_config(&config)?;
    if data.is_configured() {
        tracing::info!("Data service configured.");
    } else {
        tracing::warn!(
            "SUPABASE_URL / SUPABASE_ANON_KEY missing or placeholders; serving setup screens only."
        );
    }

    let addr = config.bind_addr;
    let state = AppState { data, config };

    // Create the Axum application router
    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on {}", addr);

    // Start the server
    axum::serve(listener, app).await?;
    Ok(())
}
