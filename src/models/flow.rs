use serde::{Deserialize, Serialize};

use super::customer::CustomerDraft;
use super::slot::FreeSlot;

/// Outcome of the existence check against the provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Lookup {
    Pending,
    Existing { customer_id: String },
    New,
    /// The customer is being created at the provider.
    Creating,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Slots {
    Pending,
    Ready { slots: Vec<FreeSlot> },
    Failed,
}

/// Job submission state within the schedule stage. A flow books at most one
/// job.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Booking {
    #[default]
    Open,
    Submitting,
    Booked { job_id: Option<String> },
}

/// Stage of a booking flow. Each variant carries only the data that is valid
/// while the flow is in it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "stage", rename_all = "snake_case")]
pub enum FlowStage {
    Default {
        draft: Option<CustomerDraft>,
    },
    Customers {
        customer: CustomerDraft,
        lookup: Lookup,
    },
    Schedule {
        customer: CustomerDraft,
        customer_id: String,
        slots: Slots,
        selected: Option<FreeSlot>,
        booking: Booking,
    },
}

impl Default for FlowStage {
    fn default() -> Self {
        FlowStage::Default { draft: None }
    }
}

impl FlowStage {
    pub fn name(&self) -> &'static str {
        match self {
            FlowStage::Default { .. } => "default",
            FlowStage::Customers { .. } => "customers",
            FlowStage::Schedule { .. } => "schedule",
        }
    }

    /// True while a provider call for this stage is outstanding.
    pub fn is_loading(&self) -> bool {
        matches!(
            self,
            FlowStage::Customers {
                lookup: Lookup::Pending | Lookup::Creating,
                ..
            } | FlowStage::Schedule {
                slots: Slots::Pending,
                ..
            } | FlowStage::Schedule {
                booking: Booking::Submitting,
                ..
            }
        )
    }

    pub fn draft(&self) -> Option<&CustomerDraft> {
        match self {
            FlowStage::Default { draft } => draft.as_ref(),
            FlowStage::Customers { customer, .. } | FlowStage::Schedule { customer, .. } => {
                Some(customer)
            }
        }
    }

    pub fn customer_id(&self) -> Option<&str> {
        match self {
            FlowStage::Customers {
                lookup: Lookup::Existing { customer_id },
                ..
            }
            | FlowStage::Schedule { customer_id, .. } => Some(customer_id),
            _ => None,
        }
    }

    pub fn free_slots(&self) -> &[FreeSlot] {
        match self {
            FlowStage::Schedule {
                slots: Slots::Ready { slots },
                ..
            } => slots,
            _ => &[],
        }
    }

    /// Customer id and chosen slot, once both are known and no job has been
    /// booked yet.
    pub fn pending_job(&self) -> Option<(&str, FreeSlot)> {
        match self {
            FlowStage::Schedule {
                customer_id,
                selected: Some(slot),
                booking: Booking::Open | Booking::Submitting,
                ..
            } => Some((customer_id, *slot)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FlowEvent {
    Captured(CustomerDraft),
    Generated(CustomerDraft),
    /// Carries the draft that was validated; it must still be the stored one.
    UseCustomer(CustomerDraft),
    LookupCompleted(Option<String>),
    LookupFailed,
    Back,
    Continue,
    CustomerRequested,
    CustomerCreated(String),
    CustomerCreateFailed,
    SlotsRequested,
    SlotsLoaded(Vec<FreeSlot>),
    SlotsFailed,
    SlotSelected(FreeSlot),
    JobRequested,
    JobCreated(Option<String>),
    JobFailed,
}

impl FlowEvent {
    pub fn name(&self) -> &'static str {
        match self {
            FlowEvent::Captured(_) => "capture",
            FlowEvent::Generated(_) => "generate",
            FlowEvent::UseCustomer(_) => "use_customer",
            FlowEvent::LookupCompleted(_) => "lookup_completed",
            FlowEvent::LookupFailed => "lookup_failed",
            FlowEvent::Back => "back",
            FlowEvent::Continue => "continue",
            FlowEvent::CustomerRequested => "add_customer",
            FlowEvent::CustomerCreated(_) => "customer_created",
            FlowEvent::CustomerCreateFailed => "customer_create_failed",
            FlowEvent::SlotsRequested => "slots_requested",
            FlowEvent::SlotsLoaded(_) => "slots_loaded",
            FlowEvent::SlotsFailed => "slots_failed",
            FlowEvent::SlotSelected(_) => "select_slot",
            FlowEvent::JobRequested => "schedule",
            FlowEvent::JobCreated(_) => "job_created",
            FlowEvent::JobFailed => "job_failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FlowError {
    #[error("cannot {event} while in the {stage} stage")]
    InvalidTransition {
        stage: &'static str,
        event: &'static str,
    },
    #[error("the customer changed while it was being checked")]
    DraftChanged,
}

/// Applies `event` to `stage`, returning the next stage. `stage` is never
/// modified; a rejected event leaves the caller holding the old stage.
pub fn reduce(stage: &FlowStage, event: FlowEvent) -> Result<FlowStage, FlowError> {
    use FlowEvent as E;
    use FlowStage as S;

    match (stage, event) {
        (S::Default { .. }, E::Captured(draft) | E::Generated(draft)) => {
            Ok(S::Default { draft: Some(draft) })
        }
        (S::Default { draft: Some(draft) }, E::UseCustomer(checked)) => {
            if *draft != checked {
                return Err(FlowError::DraftChanged);
            }
            Ok(S::Customers {
                customer: checked,
                lookup: Lookup::Pending,
            })
        }

        (
            S::Customers {
                customer,
                lookup: Lookup::Pending,
            },
            E::LookupCompleted(found),
        ) => Ok(S::Customers {
            customer: customer.clone(),
            lookup: match found {
                Some(customer_id) => Lookup::Existing { customer_id },
                None => Lookup::New,
            },
        }),
        (
            S::Customers {
                customer,
                lookup: Lookup::Pending,
            },
            E::LookupFailed,
        ) => Ok(S::Customers {
            customer: customer.clone(),
            lookup: Lookup::New,
        }),
        (
            S::Customers {
                customer,
                lookup: Lookup::Existing { .. } | Lookup::New,
            },
            E::Back,
        ) => Ok(S::Default {
            draft: Some(customer.clone()),
        }),
        (
            S::Customers {
                customer,
                lookup: Lookup::Existing { customer_id },
            },
            E::Continue,
        ) => Ok(S::schedule(customer.clone(), customer_id.clone())),
        (
            S::Customers {
                customer,
                lookup: Lookup::New,
            },
            E::CustomerRequested,
        ) => Ok(S::Customers {
            customer: customer.clone(),
            lookup: Lookup::Creating,
        }),
        (
            S::Customers {
                customer,
                lookup: Lookup::Creating,
            },
            E::CustomerCreated(customer_id),
        ) => Ok(S::schedule(customer.clone(), customer_id)),
        (
            S::Customers {
                customer,
                lookup: Lookup::Creating,
            },
            E::CustomerCreateFailed,
        ) => Ok(S::Customers {
            customer: customer.clone(),
            lookup: Lookup::New,
        }),

        (
            S::Schedule {
                customer,
                customer_id,
                booking: Booking::Open,
                ..
            },
            E::SlotsRequested,
        ) => Ok(S::schedule(customer.clone(), customer_id.clone())),
        (
            S::Schedule {
                customer,
                customer_id,
                slots: Slots::Pending,
                ..
            },
            E::SlotsFailed,
        ) => Ok(S::Schedule {
            customer: customer.clone(),
            customer_id: customer_id.clone(),
            slots: Slots::Failed,
            selected: None,
            booking: Booking::Open,
        }),
        (
            S::Schedule {
                customer,
                customer_id,
                slots: Slots::Pending,
                ..
            },
            E::SlotsLoaded(slots),
        ) => Ok(S::Schedule {
            customer: customer.clone(),
            customer_id: customer_id.clone(),
            slots: Slots::Ready { slots },
            selected: None,
            booking: Booking::Open,
        }),
        (
            S::Schedule {
                customer,
                customer_id,
                slots: Slots::Ready { slots },
                booking: Booking::Open,
                ..
            },
            E::SlotSelected(slot),
        ) if slots.contains(&slot) => Ok(S::Schedule {
            customer: customer.clone(),
            customer_id: customer_id.clone(),
            slots: Slots::Ready {
                slots: slots.clone(),
            },
            selected: Some(slot),
            booking: Booking::Open,
        }),
        (
            S::Schedule {
                selected: Some(_),
                booking: Booking::Open,
                ..
            },
            E::JobRequested,
        ) => Ok(stage.with_booking(Booking::Submitting)),
        (
            S::Schedule {
                booking: Booking::Submitting,
                ..
            },
            E::JobCreated(job_id),
        ) => Ok(stage.with_booking(Booking::Booked { job_id })),
        (
            S::Schedule {
                booking: Booking::Submitting,
                ..
            },
            E::JobFailed,
        ) => Ok(stage.with_booking(Booking::Open)),

        (stage, event) => Err(FlowError::InvalidTransition {
            stage: stage.name(),
            event: event.name(),
        }),
    }
}

impl FlowStage {
    /// Fresh schedule stage with slots still to be fetched.
    fn schedule(customer: CustomerDraft, customer_id: String) -> Self {
        FlowStage::Schedule {
            customer,
            customer_id,
            slots: Slots::Pending,
            selected: None,
            booking: Booking::Open,
        }
    }

    fn with_booking(&self, booking: Booking) -> Self {
        match self {
            FlowStage::Schedule {
                customer,
                customer_id,
                slots,
                selected,
                ..
            } => FlowStage::Schedule {
                customer: customer.clone(),
                customer_id: customer_id.clone(),
                slots: slots.clone(),
                selected: *selected,
                booking,
            },
            other => other.clone(),
        }
    }
}
