use crate::adapters::http::K5NetworkClient;
use crate::config::{ModuleArgs, ProvisionerSettings};
use crate::core::provisioner::PortProvisioner;
use crate::core::trace::Trace;
use crate::domain::model::{Outcome, PortResult};
use crate::utils::error::{ProvisionError, Result};
use crate::utils::validation::validate_url;
use serde::Serialize;
use std::path::Path;

/// The JSON object a module prints on stdout for Ansible.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModuleResult {
    pub changed: bool,
    pub msg: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub failed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub k5_port_facts: Option<PortResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<Vec<String>>,
}

impl ModuleResult {
    pub fn from_outcome(outcome: Outcome, debug: Option<Vec<String>>) -> Self {
        let changed = outcome.changed();
        let msg = outcome.message();
        let k5_port_facts = match outcome {
            Outcome::Created(port) => Some(port),
            _ => None,
        };
        Self {
            changed,
            msg,
            failed: false,
            k5_port_facts,
            debug,
        }
    }

    pub fn from_error(err: &ProvisionError, debug: Option<Vec<String>>) -> Self {
        Self {
            changed: false,
            msg: err.to_string(),
            failed: true,
            k5_port_facts: None,
            debug,
        }
    }

    /// Exit status Ansible expects alongside the printed result.
    pub fn exit_code(&self) -> i32 {
        if self.failed {
            1
        } else {
            0
        }
    }
}

/// Entry point used by the binary: parse the arguments file and provision.
pub async fn run_from_file<P: AsRef<Path>>(path: P, settings: &ProvisionerSettings) -> ModuleResult {
    match ModuleArgs::from_file(path) {
        Ok(args) => run_module(args, settings).await,
        Err(e) => fail(e, Trace::new(settings.trace)),
    }
}

pub async fn run_module(args: ModuleArgs, settings: &ProvisionerSettings) -> ModuleResult {
    let mut trace = Trace::new(settings.trace);
    match provision(&args, settings, &mut trace).await {
        Ok(outcome) => {
            tracing::info!("✅ {} (changed: {})", outcome.message(), outcome.changed());
            ModuleResult::from_outcome(outcome, trace.into_entries())
        }
        Err(e) => fail(e, trace),
    }
}

fn fail(err: ProvisionError, trace: Trace) -> ModuleResult {
    tracing::error!("❌ Port provisioning failed: {}", err);
    tracing::error!("💡 Recovery suggestion: {}", err.recovery_suggestion());
    ModuleResult::from_error(&err, trace.into_entries())
}

async fn provision(
    args: &ModuleArgs,
    settings: &ProvisionerSettings,
    trace: &mut Trace,
) -> Result<Outcome> {
    let auth = &args.k5_auth;
    if !auth.is_authenticated() {
        return Err(ProvisionError::MissingAuth);
    }
    validate_url("k5_auth.endpoints.networking", auth.networking_endpoint()?)?;

    let client = K5NetworkClient::new(settings.timeout())?;
    PortProvisioner::new(client)
        .with_check_mode(args.check_mode)
        .provision_port(auth, &args.port_spec(), trace)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_created_envelope_shape() {
        let result = ModuleResult::from_outcome(
            Outcome::Created(json!({"id": "P1", "name": "port-01"})),
            None,
        );
        assert_eq!(result.exit_code(), 0);
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({
                "changed": true,
                "msg": "Port Creation Successful",
                "k5_port_facts": {"id": "P1", "name": "port-01"}
            })
        );
    }

    #[test]
    fn test_noop_envelope_carries_debug_when_enabled() {
        let result = ModuleResult::from_outcome(
            Outcome::NetworkNotFound {
                name: "net-01".to_string(),
            },
            Some(vec!["REQ: x".to_string()]),
        );
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({
                "changed": false,
                "msg": "Network net-01 not found",
                "debug": ["REQ: x"]
            })
        );
    }

    #[test]
    fn test_failure_envelope() {
        let result = ModuleResult::from_error(&ProvisionError::MissingAuth, None);
        assert_eq!(result.exit_code(), 1);
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({
                "changed": false,
                "msg": "k5_auth_facts not found, have you run k5_auth?",
                "failed": true
            })
        );
    }
}
