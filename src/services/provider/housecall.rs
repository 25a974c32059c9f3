use anyhow::Context;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde::de::DeserializeOwned;
use serde_json::json;

use super::FieldServiceProvider;
use crate::config::AppConfig;
use crate::models::{Customer, CustomerPage, Job, JobPage, NewCustomer, NewJob};

pub struct HousecallProvider {
    base_url: String,
    customers_token: String,
    slots_token: String,
    organization_tag: String,
    page_size: u32,
    client: reqwest::Client,
}

impl HousecallProvider {
    pub fn new(
        base_url: String,
        customers_token: String,
        slots_token: String,
        organization_tag: String,
        page_size: u32,
    ) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            customers_token,
            slots_token,
            organization_tag,
            page_size,
            client: reqwest::Client::new(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            config.housecall_base_url.clone(),
            config.housecall_api_token.clone(),
            config.housecall_slots_token.clone(),
            config.organization_tag.clone(),
            config.provider_page_size,
        )
    }

    fn get(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.client
            .get(format!("{}{path}", self.base_url))
            .query(&[("page_size", self.page_size)])
            .header(ACCEPT, "application/json")
            .header(AUTHORIZATION, format!("Token {token}"))
    }

    fn post(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.client
            .post(format!("{}{path}", self.base_url))
            .header(ACCEPT, "application/json")
            .header(AUTHORIZATION, format!("Token {token}"))
    }
}

async fn send_json<T: DeserializeOwned>(
    request: reqwest::RequestBuilder,
    what: &str,
) -> anyhow::Result<T> {
    let resp = request
        .send()
        .await
        .with_context(|| format!("failed to call Housecall API ({what})"))?;

    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        anyhow::bail!("Housecall API error ({what}, {status}): {body}");
    }

    resp.json()
        .await
        .with_context(|| format!("failed to parse Housecall response ({what})"))
}

#[async_trait]
impl FieldServiceProvider for HousecallProvider {
    async fn list_customers(&self) -> anyhow::Result<CustomerPage> {
        send_json(self.get("/customers", &self.customers_token), "list customers").await
    }

    async fn create_customer(&self, customer: &NewCustomer) -> anyhow::Result<Customer> {
        let body = json!({
            "first_name": customer.first_name,
            "last_name": customer.last_name,
            "email": customer.email,
            "company": self.organization_tag,
            "notifications_enabled": false,
            "mobile_number": customer.phone,
        });

        send_json(
            self.post("/customers", &self.customers_token).json(&body),
            "create customer",
        )
        .await
    }

    async fn list_jobs(&self) -> anyhow::Result<JobPage> {
        send_json(self.get("/jobs", &self.slots_token), "list jobs").await
    }

    async fn create_job(&self, job: &NewJob) -> anyhow::Result<Job> {
        send_json(
            self.post("/jobs", &self.customers_token).json(job),
            "create job",
        )
        .await
    }
}
