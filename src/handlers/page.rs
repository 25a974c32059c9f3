use std::sync::Arc;

use axum::extract::State;
use axum::response::Html;
use axum::Json;
use chrono::{NaiveDate, Utc};
use serde::Serialize;

use crate::state::AppState;

static BOOKING_HTML: &str = include_str!("../web/booking.html");

pub async fn booking_page() -> Html<&'static str> {
    Html(BOOKING_HTML)
}

#[derive(Serialize)]
pub struct PageConfig {
    lookahead_days: u32,
    work_start_hour: u32,
    work_end_hour: u32,
    days: Vec<NaiveDate>,
}

// GET /api/config
pub async fn page_config(State(state): State<Arc<AppState>>) -> Json<PageConfig> {
    Json(PageConfig {
        lookahead_days: state.window.lookahead_days,
        work_start_hour: state.window.work_start_hour,
        work_end_hour: state.window.work_end_hour,
        days: state.window.days(Utc::now()),
    })
}
