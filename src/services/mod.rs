pub mod booking;
pub mod generator;
pub mod geocoding;
pub mod provider;
pub mod sessions;
pub mod slots;
pub mod validation;
