//! Booking flow orchestration.
//!
//! Each action claims its stage with an event before calling the provider,
//! then applies the result through [`reduce`]. A claimed stage is loading and
//! rejects competing actions, so a provider result always lands on the stage
//! that asked for it. The session lock is never held across an await.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{reduce, CustomerDraft, FlowError, FlowEvent, FlowStage, FreeSlot, NewJob};
use crate::services::generator::random_customer;
use crate::services::provider::list_booked_intervals;
use crate::services::slots::compute_free_slots;
use crate::services::validation::{check_fields, validate_customer};
use crate::state::AppState;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    fn info(message: &str) -> Self {
        Self {
            level: NotificationLevel::Info,
            message: message.to_string(),
        }
    }

    fn success(message: &str) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.to_string(),
        }
    }

    fn error(message: &str) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FlowOutcome {
    pub stage: FlowStage,
    pub notifications: Vec<Notification>,
}

impl FlowOutcome {
    fn new(stage: FlowStage, notification: Notification) -> Self {
        Self {
            stage,
            notifications: vec![notification],
        }
    }
}

pub fn start_session(state: &AppState) -> Result<(Uuid, FlowStage), AppError> {
    let (id, stage) = state.sessions.start()?;
    tracing::info!(session = %id, active = state.sessions.len(), "booking session started");
    Ok((id, stage))
}

pub fn current_stage(state: &AppState, id: Uuid) -> Result<FlowStage, AppError> {
    state.sessions.get(id)
}

pub fn end_session(state: &AppState, id: Uuid) -> Result<(), AppError> {
    state.sessions.remove(id)
}

/// Reduces `event` against the stored stage and stores the result.
fn apply(state: &AppState, id: Uuid, event: FlowEvent) -> Result<FlowStage, AppError> {
    let event_name = event.name();
    let (previous, next) = state.sessions.update(id, |current| reduce(current, event))?;
    tracing::debug!(
        session = %id,
        event = event_name,
        from = previous.name(),
        to = next.name(),
        "flow transition"
    );
    Ok(next)
}

pub fn generate(state: &AppState, id: Uuid) -> Result<FlowOutcome, AppError> {
    let draft = random_customer(&mut rand::thread_rng());
    let stage = apply(state, id, FlowEvent::Generated(draft))?;
    Ok(FlowOutcome::new(stage, Notification::info("Customer generated")))
}

pub fn capture(
    state: &AppState,
    id: Uuid,
    draft: CustomerDraft,
) -> Result<FlowOutcome, AppError> {
    check_fields(&draft)?;
    let stage = apply(state, id, FlowEvent::Captured(draft))?;
    Ok(FlowOutcome::new(stage, Notification::info("Customer captured")))
}

/// Validates the captured customer, then checks whether the provider already
/// knows its email.
pub async fn use_customer(state: &AppState, id: Uuid) -> Result<FlowOutcome, AppError> {
    let draft = match current_stage(state, id)? {
        FlowStage::Default { draft: Some(draft) } => draft,
        other => {
            return Err(FlowError::InvalidTransition {
                stage: other.name(),
                event: "use_customer",
            }
            .into())
        }
    };

    validate_customer(&draft, state.verifier.as_ref()).await?;
    // Rejected if the draft was replaced while the address was being checked
    apply(state, id, FlowEvent::UseCustomer(draft.clone()))?;

    match state.provider.list_customers().await {
        Ok(page) => {
            let email = draft.email.trim();
            let found = page.find_by_email(email).and_then(|c| c.id.clone());
            tracing::info!(session = %id, existing = found.is_some(), "customer lookup finished");

            let notification = if found.is_some() {
                Notification::info("This is an existing customer")
            } else {
                Notification::info("This is a new customer")
            };
            let stage = apply(state, id, FlowEvent::LookupCompleted(found))?;
            Ok(FlowOutcome::new(stage, notification))
        }
        Err(e) => {
            tracing::error!(session = %id, error = %e, "failed to fetch customers");
            let stage = apply(state, id, FlowEvent::LookupFailed)?;
            Ok(FlowOutcome::new(
                stage,
                Notification::error("Failed to fetch customers."),
            ))
        }
    }
}

pub fn back(state: &AppState, id: Uuid) -> Result<FlowOutcome, AppError> {
    let stage = apply(state, id, FlowEvent::Back)?;
    Ok(FlowOutcome::new(stage, Notification::info("Back to customer")))
}

/// Existing customer: move to scheduling and load slots.
pub async fn continue_existing(
    state: &AppState,
    id: Uuid,
    now: DateTime<Utc>,
) -> Result<FlowOutcome, AppError> {
    apply(state, id, FlowEvent::Continue)?;
    refresh_slots(state, id, now).await
}

/// New customer: create it at the provider, then load slots.
pub async fn add_customer(
    state: &AppState,
    id: Uuid,
    now: DateTime<Utc>,
) -> Result<FlowOutcome, AppError> {
    let customer = match apply(state, id, FlowEvent::CustomerRequested)? {
        FlowStage::Customers { customer, .. } => customer,
        other => {
            return Err(FlowError::InvalidTransition {
                stage: other.name(),
                event: "add_customer",
            }
            .into())
        }
    };

    let created = state
        .provider
        .create_customer(&customer.to_new_customer())
        .await
        .and_then(|c| {
            c.id.ok_or_else(|| anyhow::anyhow!("provider returned a customer without an id"))
        });

    match created {
        Ok(customer_id) => {
            tracing::info!(session = %id, customer_id = %customer_id, "customer created");
            apply(state, id, FlowEvent::CustomerCreated(customer_id))?;
            let mut outcome = refresh_slots(state, id, now).await?;
            outcome
                .notifications
                .insert(0, Notification::success("Customer added successfully"));
            Ok(outcome)
        }
        Err(e) => {
            tracing::error!(session = %id, error = %e, "failed to add customer");
            let stage = apply(state, id, FlowEvent::CustomerCreateFailed)?;
            Ok(FlowOutcome::new(
                stage,
                Notification::error("Failed to add customer"),
            ))
        }
    }
}

/// Fetches the current booked intervals and recomputes free slots from `now`.
pub async fn refresh_slots(
    state: &AppState,
    id: Uuid,
    now: DateTime<Utc>,
) -> Result<FlowOutcome, AppError> {
    apply(state, id, FlowEvent::SlotsRequested)?;

    match list_booked_intervals(state.provider.as_ref()).await {
        Ok(booked) => {
            let slots = compute_free_slots(&booked, now, &state.window);
            tracing::info!(
                session = %id,
                booked = booked.len(),
                free = slots.len(),
                "free slots computed"
            );
            let stage = apply(state, id, FlowEvent::SlotsLoaded(slots))?;
            Ok(FlowOutcome::new(
                stage,
                Notification::success("Slots calculated successfully"),
            ))
        }
        Err(e) => {
            tracing::error!(session = %id, error = %e, "failed to fetch slots");
            let stage = apply(state, id, FlowEvent::SlotsFailed)?;
            Ok(FlowOutcome::new(
                stage,
                Notification::error("Failed to fetch slots"),
            ))
        }
    }
}

/// Selects the offered slot starting at `start`.
pub fn select_slot(
    state: &AppState,
    id: Uuid,
    start: DateTime<Utc>,
) -> Result<FlowOutcome, AppError> {
    let slot = FreeSlot {
        start,
        end: start + Duration::hours(1),
    };
    let stage = apply(state, id, FlowEvent::SlotSelected(slot))?;
    Ok(FlowOutcome::new(
        stage,
        Notification::info(&format!("Selected {} {}", slot.date(), slot.label())),
    ))
}

/// Submits the selected slot as a job. The flow stays in the schedule stage
/// whatever the outcome; once a job is booked no further job is accepted.
pub async fn schedule(state: &AppState, id: Uuid) -> Result<FlowOutcome, AppError> {
    let stage = apply(state, id, FlowEvent::JobRequested)?;
    let job = match stage.pending_job() {
        Some((customer_id, slot)) => NewJob::new(customer_id, slot.to_schedule()),
        None => {
            return Err(FlowError::InvalidTransition {
                stage: stage.name(),
                event: "schedule",
            }
            .into())
        }
    };

    match state.provider.create_job(&job).await {
        Ok(created) => {
            tracing::info!(session = %id, job_id = ?created.id, "job scheduled");
            let stage = apply(state, id, FlowEvent::JobCreated(created.id))?;
            Ok(FlowOutcome::new(
                stage,
                Notification::success("Job scheduled successfully"),
            ))
        }
        Err(e) => {
            tracing::error!(session = %id, error = %e, "failed to schedule job");
            let stage = apply(state, id, FlowEvent::JobFailed)?;
            Ok(FlowOutcome::new(
                stage,
                Notification::error("Failed to schedule job"),
            ))
        }
    }
}
