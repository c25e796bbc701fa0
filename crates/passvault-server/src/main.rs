mod config;

use std::net::SocketAddr;
use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use passvault_api::{AppState, AppStateInner, TokenIssuer};

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "passvault=debug,passvault_api=debug,passvault_db=info,tower_http=debug".into()
            }),
        )
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("FATAL: {}", e);
            eprintln!("       Set it in your environment or .env file and restart.");
            std::process::exit(1);
        }
    };

    // Init database
    let db = passvault_db::Database::open(&config.db_path)?;

    let tokens = TokenIssuer::new(&config.jwt_secret, config.token_lifetime());
    info!(
        "Tokens valid for {} seconds, history limited to {} entries",
        tokens.lifetime().num_seconds(),
        config.history_limit
    );

    let state: AppState = Arc::new(AppStateInner {
        db,
        tokens,
        history_limit: config.history_limit,
    });

    let app = passvault_api::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("Passvault listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
