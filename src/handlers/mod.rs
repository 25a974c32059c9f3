pub mod flow;
pub mod health;
pub mod page;
pub mod relay;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/", get(page::booking_page))
        .route("/api/config", get(page::page_config))
        .route("/api/get-customers", get(relay::get_customers))
        .route("/api/add-customer", post(relay::add_customer))
        .route("/api/fetch-slots", get(relay::fetch_slots))
        .route("/api/free-slots", get(relay::free_slots))
        .route("/api/create-job", post(relay::create_job))
        .route("/api/flow", post(flow::start))
        .route("/api/flow/:id", get(flow::get).delete(flow::end))
        .route("/api/flow/:id/generate", post(flow::generate))
        .route("/api/flow/:id/capture", post(flow::capture))
        .route("/api/flow/:id/use-customer", post(flow::use_customer))
        .route("/api/flow/:id/back", post(flow::back))
        .route("/api/flow/:id/continue", post(flow::continue_existing))
        .route("/api/flow/:id/add-customer", post(flow::add_customer))
        .route("/api/flow/:id/slots", post(flow::refresh_slots))
        .route("/api/flow/:id/select", post(flow::select_slot))
        .route("/api/flow/:id/schedule", post(flow::schedule))
        .with_state(state)
}
