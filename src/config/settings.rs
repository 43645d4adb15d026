use crate::utils::error::{ProvisionError, Result};
use crate::utils::validation::{validate_range, Validate};
use std::time::Duration;

pub const TRACE_ENV: &str = "K5_DEBUG";
pub const TIMEOUT_ENV: &str = "K5_TIMEOUT_SECONDS";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionerSettings {
    /// Attach the request trace to the module result.
    pub trace: bool,
    /// Per-request deadline for calls to the networking service.
    pub timeout_seconds: u64,
}

impl Default for ProvisionerSettings {
    fn default() -> Self {
        Self {
            trace: false,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }
}

impl ProvisionerSettings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var_os(key).map(|v| v.to_string_lossy().into_owned()))
    }

    /// `K5_DEBUG` enables the trace whenever it is set, whatever its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let timeout_seconds = match lookup(TIMEOUT_ENV) {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|e: std::num::ParseIntError| ProvisionError::InvalidConfig {
                    field: TIMEOUT_ENV.to_string(),
                    value: raw.clone(),
                    reason: e.to_string(),
                })?,
            None => DEFAULT_TIMEOUT_SECONDS,
        };

        Ok(Self {
            trace: lookup(TRACE_ENV).is_some(),
            timeout_seconds,
        })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Validate for ProvisionerSettings {
    fn validate(&self) -> Result<()> {
        validate_range("timeout_seconds", self.timeout_seconds, 1, 600)
    }
}
