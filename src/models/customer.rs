use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Customer record as the provider returns it.
///
/// Only the fields the booking flow reads are typed; everything else is kept
/// in `extra` so relay responses echo the provider payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Customer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub mobile_number: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CustomerPage {
    #[serde(default)]
    pub customers: Vec<Customer>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CustomerPage {
    /// Exact, case-sensitive match on email.
    pub fn find_by_email(&self, email: &str) -> Option<&Customer> {
        self.customers
            .iter()
            .find(|c| c.email.as_deref() == Some(email))
    }
}

/// Body accepted by the add-customer relay.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewCustomer {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
}

/// Customer captured locally before it is checked against the provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct CustomerDraft {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
}

impl CustomerDraft {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }

    pub fn to_new_customer(&self) -> NewCustomer {
        NewCustomer {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
        }
    }
}
