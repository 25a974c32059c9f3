use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use housecall_booking::config::AppConfig;
use housecall_booking::handlers;
use housecall_booking::services::geocoding::{AcceptAnyAddress, AddressVerifier, NominatimGeocoder};
use housecall_booking::services::provider::housecall::HousecallProvider;
use housecall_booking::services::sessions::SessionStore;
use housecall_booking::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();
    config.validate()?;
    let window = config.slot_window()?;

    let verifier: Box<dyn AddressVerifier> = match &config.geocoder_url {
        Some(url) => {
            tracing::info!("verifying addresses with geocoder at {url}");
            Box::new(NominatimGeocoder::new(url.clone()))
        }
        None => {
            tracing::warn!("GEOCODER_URL not set, accepting any non-blank address");
            Box::new(AcceptAnyAddress)
        }
    };

    tracing::info!(
        base_url = %config.housecall_base_url,
        lookahead_days = window.lookahead_days,
        work_start_hour = window.work_start_hour,
        work_end_hour = window.work_end_hour,
        "using Housecall provider"
    );

    let state = Arc::new(AppState {
        provider: Box::new(HousecallProvider::from_config(&config)),
        verifier,
        window,
        sessions: SessionStore::new(config.session_idle_timeout()),
        config: config.clone(),
    });

    let app = handlers::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
