use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::services::slots::{SlotWindow, SlotWindowError};

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub housecall_base_url: String,
    pub housecall_api_token: String,
    pub housecall_slots_token: String,
    pub organization_tag: String,
    pub provider_page_size: u32,
    pub lookahead_days: u32,
    pub working_hours_start: u32,
    pub working_hours_end: u32,
    pub geocoder_url: Option<String>,
    pub session_idle_minutes: u64,
}

fn parsed<T: FromStr>(key: &str, default: T) -> T {
    parse_or(key, env::var(key).ok().as_deref(), default)
}

/// Parses `raw`, falling back to `default` when it is unset. A value that is
/// set but malformed also falls back, with a warning.
fn parse_or<T: FromStr>(key: &str, raw: Option<&str>, default: T) -> T {
    let Some(raw) = raw.map(str::trim).filter(|v| !v.is_empty()) else {
        return default;
    };
    match raw.parse() {
        Ok(value) => value,
        Err(_) => {
            tracing::warn!(key, value = raw, "ignoring malformed setting, using default");
            default
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let housecall_api_token = env::var("HOUSECALL_API_TOKEN").unwrap_or_default();
        Self {
            port: parsed("PORT", 3000),
            housecall_base_url: env::var("HOUSECALL_BASE_URL")
                .unwrap_or_else(|_| "https://api.housecallpro.com".to_string()),
            housecall_slots_token: env::var("HOUSECALL_SLOTS_TOKEN")
                .ok()
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| housecall_api_token.clone()),
            housecall_api_token,
            organization_tag: env::var("ORGANIZATION_TAG").unwrap_or_else(|_| "Avoca".to_string()),
            provider_page_size: parsed("PROVIDER_PAGE_SIZE", 100),
            lookahead_days: parsed("LOOKAHEAD_DAYS", 3),
            working_hours_start: parsed("WORKING_HOURS_START", 10),
            working_hours_end: parsed("WORKING_HOURS_END", 18),
            geocoder_url: env::var("GEOCODER_URL").ok().filter(|u| !u.is_empty()),
            session_idle_minutes: parsed("SESSION_IDLE_MINUTES", 30),
        }
    }

    pub fn slot_window(&self) -> Result<SlotWindow, SlotWindowError> {
        SlotWindow::new(
            self.lookahead_days,
            self.working_hours_start,
            self.working_hours_end,
        )
    }

    pub fn session_idle_timeout(&self) -> Duration {
        Duration::from_secs(self.session_idle_minutes.saturating_mul(60))
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            !self.housecall_api_token.is_empty(),
            "HOUSECALL_API_TOKEN must be set"
        );
        anyhow::ensure!(self.provider_page_size > 0, "PROVIDER_PAGE_SIZE must be positive");
        anyhow::ensure!(
            self.session_idle_minutes > 0,
            "SESSION_IDLE_MINUTES must be positive"
        );
        self.slot_window()?;
        Ok(())
    }
}
