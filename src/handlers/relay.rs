//! Relay endpoints. Each forwards one request to the provider; any failure
//! becomes a 500 with a generic message.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::Serialize;

use crate::errors::AppError;
use crate::models::{BookedInterval, Customer, CustomerPage, FreeSlot, Job, NewCustomer, NewJob};
use crate::services::provider::list_booked_intervals;
use crate::services::slots::{compute_free_slots, SlotWindow};
use crate::state::AppState;

// GET /api/get-customers
pub async fn get_customers(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CustomerPage>, AppError> {
    let page = state.provider.list_customers().await.map_err(|e| {
        tracing::error!(error = %e, "error fetching customers");
        AppError::Upstream("Failed to fetch customers")
    })?;
    Ok(Json(page))
}

// POST /api/add-customer
pub async fn add_customer(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewCustomer>, JsonRejection>,
) -> Result<Json<Customer>, AppError> {
    let Json(customer) = payload?;
    let created = state
        .provider
        .create_customer(&customer)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "error adding customer");
            AppError::Upstream("Failed to add customer")
        })?;
    tracing::info!(customer_id = ?created.id, "customer added");
    Ok(Json(created))
}

// POST /api/create-job
pub async fn create_job(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewJob>, JsonRejection>,
) -> Result<Json<Job>, AppError> {
    let Json(job) = payload?;
    let created = state.provider.create_job(&job).await.map_err(|e| {
        tracing::error!(error = %e, customer_id = %job.customer_id, "error creating job");
        AppError::Upstream("Failed to create job")
    })?;
    tracing::info!(job_id = ?created.id, customer_id = %job.customer_id, "job created");
    Ok(Json(created))
}

#[derive(Serialize)]
pub struct BookedSlotsResponse {
    #[serde(rename = "bookedSlots")]
    pub booked_slots: Vec<BookedInterval>,
}

// GET /api/fetch-slots
pub async fn fetch_slots(
    State(state): State<Arc<AppState>>,
) -> Result<Json<BookedSlotsResponse>, AppError> {
    let booked_slots = list_booked_intervals(state.provider.as_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "error fetching slots");
            AppError::Upstream("Failed to fetch slots")
        })?;
    Ok(Json(BookedSlotsResponse { booked_slots }))
}

#[derive(Serialize)]
pub struct FreeSlotsResponse {
    pub window: SlotWindow,
    #[serde(rename = "freeSlots")]
    pub free_slots: Vec<FreeSlot>,
}

// GET /api/free-slots
pub async fn free_slots(
    State(state): State<Arc<AppState>>,
) -> Result<Json<FreeSlotsResponse>, AppError> {
    let booked = list_booked_intervals(state.provider.as_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "error fetching slots");
            AppError::Upstream("Failed to fetch slots")
        })?;
    Ok(Json(FreeSlotsResponse {
        window: state.window,
        free_slots: compute_free_slots(&booked, Utc::now(), &state.window),
    }))
}
