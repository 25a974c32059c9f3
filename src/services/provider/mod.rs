pub mod housecall;

use async_trait::async_trait;

use crate::models::{BookedInterval, Customer, CustomerPage, Job, JobPage, NewCustomer, NewJob};

/// System of record for customers and jobs.
///
/// Every call is a single request/response. Transport failures, non-2xx
/// statuses and undecodable bodies all come back as one error.
#[async_trait]
pub trait FieldServiceProvider: Send + Sync {
    async fn list_customers(&self) -> anyhow::Result<CustomerPage>;
    async fn create_customer(&self, customer: &NewCustomer) -> anyhow::Result<Customer>;
    async fn list_jobs(&self) -> anyhow::Result<JobPage>;
    async fn create_job(&self, job: &NewJob) -> anyhow::Result<Job>;
}

/// Booked intervals of the provider's current jobs. Jobs without a usable
/// schedule are left out.
pub async fn list_booked_intervals(
    provider: &dyn FieldServiceProvider,
) -> anyhow::Result<Vec<BookedInterval>> {
    let page = provider.list_jobs().await?;
    let intervals = page.booked_intervals();
    tracing::debug!(
        jobs = page.jobs.len(),
        booked = intervals.len(),
        "derived booked intervals"
    );
    Ok(intervals)
}
