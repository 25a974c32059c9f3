pub mod customer;
pub mod flow;
pub mod job;
pub mod slot;

pub use customer::{Customer, CustomerDraft, CustomerPage, NewCustomer};
pub use flow::{reduce, Booking, FlowError, FlowEvent, FlowStage, Lookup, Slots};
pub use job::{BookedInterval, Job, JobPage, JobSchedule, NewJob, Schedule};
pub use slot::FreeSlot;
