//! Configuration module
//!
//! Handles CLI configuration including the engine URL and other settings.

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// URL of the engine service
    pub server_url: String,
}
