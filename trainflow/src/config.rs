//! Process configuration.
//!
//! Everything here is read once at startup and immutable afterwards.

use crate::errors::ConfigError;

/// Environment variable holding the webhook shared secret.
pub const SERVICE_SECRET_VAR: &str = "SERVICE_SECRET";
/// Environment variable holding the listen port.
pub const PORT_VAR: &str = "PORT";
/// Environment variable holding the training platform base URL.
pub const PLATFORM_BASE_URL_VAR: &str = "PLATFORM_BASE_URL";
/// Environment variable holding the staging bucket for ETL output.
pub const GCS_BUCKET_VAR: &str = "GCS_BUCKET";

/// Coordinator process configuration.
#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    /// Port the HTTP surface listens on.
    pub port: u16,
    /// Shared secret for webhook signatures.
    pub service_secret: String,
    /// Base URL of the external training platform.
    pub platform_base_url: String,
    /// Bucket ETL stages write training data to.
    pub gcs_bucket: String,
}

impl CoordinatorConfig {
    /// Loads configuration from the environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a required variable is unset or the port
    /// fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = match std::env::var(PORT_VAR) {
            Ok(value) => value.parse::<u16>().map_err(|err| ConfigError::InvalidVar {
                var: PORT_VAR,
                message: err.to_string(),
            })?,
            Err(_) => 8080,
        };

        Ok(Self {
            port,
            service_secret: require(SERVICE_SECRET_VAR)?,
            platform_base_url: require(PLATFORM_BASE_URL_VAR)?,
            gcs_bucket: require(GCS_BUCKET_VAR)?,
        })
    }
}

fn require(var: &'static str) -> Result<String, ConfigError> {
    std::env::var(var).map_err(|_| ConfigError::MissingVar(var))
}

#[cfg(test)]
mod tests {
    use super::*;

    // Environment-variable tests mutate process state, so each one uses a
    // distinct variable set or asserts on the pure pieces only.

    #[test]
    fn test_missing_secret_is_reported() {
        std::env::remove_var(SERVICE_SECRET_VAR);
        let err = require(SERVICE_SECRET_VAR).unwrap_err();
        assert!(err.to_string().contains(SERVICE_SECRET_VAR));
    }

    #[test]
    fn test_require_reads_value() {
        std::env::set_var("TRAINFLOW_TEST_REQUIRE", "value");
        assert_eq!(require("TRAINFLOW_TEST_REQUIRE").unwrap(), "value");
        std::env::remove_var("TRAINFLOW_TEST_REQUIRE");
    }
}
