use std::sync::OnceLock;

use regex::Regex;

use crate::models::CustomerDraft;
use crate::services::geocoding::AddressVerifier;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please enter the customer's name")]
    MissingName,
    #[error("Please enter an email address")]
    MissingEmail,
    #[error("Please enter a valid email address")]
    InvalidEmail,
    #[error("Phone number must be exactly 10 digits")]
    InvalidPhone,
    #[error("Please select a verified address")]
    UnverifiedAddress,
}

impl ValidationError {
    /// Draft field the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::MissingName => "name",
            ValidationError::MissingEmail | ValidationError::InvalidEmail => "email",
            ValidationError::InvalidPhone => "phone",
            ValidationError::UnverifiedAddress => "address",
        }
    }
}

const EMAIL_PATTERN: &str = r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)+$";

fn email_regex() -> Option<&'static Regex> {
    static EMAIL: OnceLock<Option<Regex>> = OnceLock::new();
    EMAIL
        .get_or_init(|| match Regex::new(EMAIL_PATTERN) {
            Ok(re) => Some(re),
            Err(e) => {
                tracing::error!(error = %e, "email pattern failed to compile, using structural check");
                None
            }
        })
        .as_ref()
}

/// `local@domain.tld` with no whitespace.
fn looks_like_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.split('.').count() > 1
        && domain.split('.').all(|label| !label.is_empty())
        && !email.chars().any(char::is_whitespace)
}

pub fn is_valid_email(email: &str) -> bool {
    match email_regex() {
        Some(re) => re.is_match(email),
        None => looks_like_email(email),
    }
}

/// Exactly ten digits once spaces, dashes, dots and parentheses are removed.
pub fn is_valid_phone(phone: &str) -> bool {
    let digits: String = phone
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '.' | '(' | ')'))
        .collect();
    digits.len() == 10 && digits.chars().all(|c| c.is_ascii_digit())
}

/// Field checks that need no network: name, email presence, email format,
/// phone format, in that order.
pub fn check_fields(draft: &CustomerDraft) -> Result<(), ValidationError> {
    if draft.first_name.trim().is_empty() || draft.last_name.trim().is_empty() {
        return Err(ValidationError::MissingName);
    }
    let email = draft.email.trim();
    if email.is_empty() {
        return Err(ValidationError::MissingEmail);
    }
    if !is_valid_email(email) {
        return Err(ValidationError::InvalidEmail);
    }
    if !is_valid_phone(draft.phone.trim()) {
        return Err(ValidationError::InvalidPhone);
    }
    Ok(())
}

/// Full validation: the field checks, then address verification.
///
/// A verifier failure counts as an unverified address.
pub async fn validate_customer(
    draft: &CustomerDraft,
    verifier: &dyn AddressVerifier,
) -> Result<(), ValidationError> {
    check_fields(draft)?;

    let address = draft.address.trim();
    if address.is_empty() {
        return Err(ValidationError::UnverifiedAddress);
    }
    match verifier.verify(address).await {
        Ok(true) => Ok(()),
        Ok(false) => Err(ValidationError::UnverifiedAddress),
        Err(e) => {
            tracing::warn!(error = %e, "address verification failed");
            Err(ValidationError::UnverifiedAddress)
        }
    }
}
