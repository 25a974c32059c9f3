use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{CustomerDraft, FlowStage};
use crate::services::booking::{self, FlowOutcome, Notification};
use crate::state::AppState;

#[derive(Serialize)]
pub struct FlowResponse {
    pub id: Uuid,
    pub loading: bool,
    pub stage: FlowStage,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notifications: Vec<Notification>,
}

impl FlowResponse {
    fn from_outcome(id: Uuid, outcome: FlowOutcome) -> Self {
        Self {
            id,
            loading: outcome.stage.is_loading(),
            stage: outcome.stage,
            notifications: outcome.notifications,
        }
    }

    fn from_stage(id: Uuid, stage: FlowStage) -> Self {
        Self {
            id,
            loading: stage.is_loading(),
            stage,
            notifications: Vec::new(),
        }
    }
}

// POST /api/flow
pub async fn start(
    State(state): State<Arc<AppState>>,
) -> Result<(StatusCode, Json<FlowResponse>), AppError> {
    let (id, stage) = booking::start_session(&state)?;
    Ok((StatusCode::CREATED, Json(FlowResponse::from_stage(id, stage))))
}

// GET /api/flow/:id
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<FlowResponse>, AppError> {
    let stage = booking::current_stage(&state, id)?;
    Ok(Json(FlowResponse::from_stage(id, stage)))
}

// DELETE /api/flow/:id
pub async fn end(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    booking::end_session(&state, id)?;
    Ok(StatusCode::NO_CONTENT)
}

// POST /api/flow/:id/generate
pub async fn generate(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<FlowResponse>, AppError> {
    let outcome = booking::generate(&state, id)?;
    Ok(Json(FlowResponse::from_outcome(id, outcome)))
}

// POST /api/flow/:id/capture
pub async fn capture(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    payload: Result<Json<CustomerDraft>, JsonRejection>,
) -> Result<Json<FlowResponse>, AppError> {
    let Json(draft) = payload?;
    let outcome = booking::capture(&state, id, draft)?;
    Ok(Json(FlowResponse::from_outcome(id, outcome)))
}

// POST /api/flow/:id/use-customer
pub async fn use_customer(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<FlowResponse>, AppError> {
    let outcome = booking::use_customer(&state, id).await?;
    Ok(Json(FlowResponse::from_outcome(id, outcome)))
}

// POST /api/flow/:id/back
pub async fn back(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<FlowResponse>, AppError> {
    let outcome = booking::back(&state, id)?;
    Ok(Json(FlowResponse::from_outcome(id, outcome)))
}

// POST /api/flow/:id/continue
pub async fn continue_existing(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<FlowResponse>, AppError> {
    let outcome = booking::continue_existing(&state, id, Utc::now()).await?;
    Ok(Json(FlowResponse::from_outcome(id, outcome)))
}

// POST /api/flow/:id/add-customer
pub async fn add_customer(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<FlowResponse>, AppError> {
    let outcome = booking::add_customer(&state, id, Utc::now()).await?;
    Ok(Json(FlowResponse::from_outcome(id, outcome)))
}

// POST /api/flow/:id/slots
pub async fn refresh_slots(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<FlowResponse>, AppError> {
    let outcome = booking::refresh_slots(&state, id, Utc::now()).await?;
    Ok(Json(FlowResponse::from_outcome(id, outcome)))
}

#[derive(Deserialize)]
pub struct SelectSlot {
    pub start: DateTime<Utc>,
}

// POST /api/flow/:id/select
pub async fn select_slot(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    payload: Result<Json<SelectSlot>, JsonRejection>,
) -> Result<Json<FlowResponse>, AppError> {
    let Json(payload) = payload?;
    let outcome = booking::select_slot(&state, id, payload.start)?;
    Ok(Json(FlowResponse::from_outcome(id, outcome)))
}

// POST /api/flow/:id/schedule
pub async fn schedule(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<FlowResponse>, AppError> {
    let outcome = booking::schedule(&state, id).await?;
    Ok(Json(FlowResponse::from_outcome(id, outcome)))
}
