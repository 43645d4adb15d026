use crate::domain::model::{AuthContext, PortSpec};
use crate::utils::error::{ProvisionError, Result};
use crate::utils::validation::{validate_non_empty_string, Validate};
use serde::{Deserialize, Deserializer};
use std::path::Path;

pub const SUPPORTED_STATE: &str = "present";

/// Parameters Ansible writes to the arguments file of a binary module.
///
/// Keys not listed here, such as the other `_ansible_*` internals, are
/// ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct ModuleArgs {
    pub name: String,
    pub state: String,
    pub subnet_name: String,
    pub network_name: String,
    pub fixed_ip: String,
    #[serde(deserialize_with = "list_or_csv")]
    pub security_groups: Vec<String>,
    pub availability_zone: String,
    pub k5_auth: AuthContext,
    #[serde(rename = "_ansible_check_mode", default)]
    pub check_mode: bool,
}

/// Ansible's `list` type also accepts a comma separated string.
fn list_or_csv<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum ListOrCsv {
        List(Vec<String>),
        Csv(String),
    }

    Ok(match ListOrCsv::deserialize(deserializer)? {
        ListOrCsv::List(items) => items,
        ListOrCsv::Csv(s) => s
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect(),
    })
}

impl ModuleArgs {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        let value: serde_json::Value =
            serde_json::from_str(&content).map_err(|e| ProvisionError::InvalidArgs {
                message: format!("arguments file is not valid JSON: {}", e),
            })?;
        Self::from_value(value)
    }

    /// Rejects an unsupported `state` before looking at any other field.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        // Ansible coerces `state` to a string, so `1` or `false` are unsupported states too.
        match value.get("state") {
            None => {}
            Some(serde_json::Value::String(state)) if state == SUPPORTED_STATE => {}
            Some(serde_json::Value::String(state)) => {
                return Err(ProvisionError::UnsupportedState {
                    state: state.clone(),
                });
            }
            Some(other) => {
                return Err(ProvisionError::UnsupportedState {
                    state: other.to_string(),
                });
            }
        }

        let args: ModuleArgs =
            serde_json::from_value(value).map_err(|e| ProvisionError::InvalidArgs {
                message: e.to_string(),
            })?;
        args.validate()?;
        Ok(args)
    }

    pub fn port_spec(&self) -> PortSpec {
        PortSpec {
            name: self.name.clone(),
            subnet_name: self.subnet_name.clone(),
            network_name: self.network_name.clone(),
            fixed_ip: self.fixed_ip.clone(),
            security_groups: self.security_groups.clone(),
            availability_zone: self.availability_zone.clone(),
        }
    }
}

impl Validate for ModuleArgs {
    fn validate(&self) -> Result<()> {
        if self.state != SUPPORTED_STATE {
            return Err(ProvisionError::UnsupportedState {
                state: self.state.clone(),
            });
        }

        validate_non_empty_string("name", &self.name)?;
        validate_non_empty_string("network_name", &self.network_name)?;
        validate_non_empty_string("subnet_name", &self.subnet_name)?;
        validate_non_empty_string("availability_zone", &self.availability_zone)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args_json() -> serde_json::Value {
        json!({
            "name": "port-01",
            "state": "present",
            "subnet_name": "sub-01",
            "network_name": "net-01",
            "fixed_ip": "10.0.0.5",
            "security_groups": ["default", "web"],
            "availability_zone": "uk-1a",
            "k5_auth": {
                "auth_token": "tok",
                "endpoints": {"networking": "https://networking.uk-1.cloud.global.fujitsu.com"},
                "auth_spec": {"os_project_id": "p1"}
            },
            "_ansible_check_mode": false,
            "_ansible_verbosity": 0
        })
    }

    #[test]
    fn test_parses_full_arguments() {
        let args = ModuleArgs::from_value(args_json()).unwrap();
        assert_eq!(args.name, "port-01");
        assert!(!args.check_mode);
        assert!(args.k5_auth.is_authenticated());

        let spec = args.port_spec();
        assert_eq!(spec.security_groups, vec!["default", "web"]);
        assert_eq!(spec.availability_zone, "uk-1a");
    }

    #[test]
    fn test_security_groups_as_csv_string() {
        let mut value = args_json();
        value["security_groups"] = json!("default, web,");
        let args = ModuleArgs::from_value(value).unwrap();
        assert_eq!(args.security_groups, vec!["default", "web"]);
    }

    #[test]
    fn test_unsupported_state_wins_over_missing_fields() {
        let err = ModuleArgs::from_value(json!({"state": "absent"})).unwrap_err();
        assert!(matches!(err, ProvisionError::UnsupportedState { ref state } if state == "absent"));
    }

    #[test]
    fn test_non_string_state_is_unsupported() {
        let err = ModuleArgs::from_value(json!({"state": 1})).unwrap_err();
        assert!(matches!(err, ProvisionError::UnsupportedState { ref state } if state == "1"));
        assert_eq!(
            err.to_string(),
            "No '1' function in this module, use os_port module instead"
        );

        let mut value = args_json();
        value["state"] = json!(false);
        assert!(matches!(
            ModuleArgs::from_value(value),
            Err(ProvisionError::UnsupportedState { ref state }) if state == "false"
        ));

        let mut value = args_json();
        value["state"] = serde_json::Value::Null;
        assert!(matches!(
            ModuleArgs::from_value(value),
            Err(ProvisionError::UnsupportedState { .. })
        ));
    }

    #[test]
    fn test_missing_required_field() {
        let mut value = args_json();
        value.as_object_mut().unwrap().remove("fixed_ip");
        let err = ModuleArgs::from_value(value).unwrap_err();
        assert!(matches!(err, ProvisionError::InvalidArgs { .. }));
        assert!(err.to_string().contains("fixed_ip"));
    }

    #[test]
    fn test_blank_name_rejected() {
        let mut value = args_json();
        value["name"] = json!("  ");
        assert!(matches!(
            ModuleArgs::from_value(value),
            Err(ProvisionError::InvalidArgs { .. })
        ));
    }

    #[test]
    fn test_reads_arguments_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("args");
        std::fs::write(&path, args_json().to_string()).unwrap();

        let args = ModuleArgs::from_file(&path).unwrap();
        assert_eq!(args.network_name, "net-01");

        std::fs::write(&path, "name=port-01 state=present").unwrap();
        assert!(matches!(
            ModuleArgs::from_file(&path),
            Err(ProvisionError::InvalidArgs { .. })
        ));
    }
}
