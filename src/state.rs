use crate::config::AppConfig;
use crate::services::geocoding::AddressVerifier;
use crate::services::provider::FieldServiceProvider;
use crate::services::sessions::SessionStore;
use crate::services::slots::SlotWindow;

pub struct AppState {
    pub config: AppConfig,
    pub window: SlotWindow,
    pub provider: Box<dyn FieldServiceProvider>,
    pub verifier: Box<dyn AddressVerifier>,
    pub sessions: SessionStore,
}
