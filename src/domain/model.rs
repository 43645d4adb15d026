use crate::utils::error::{ProvisionError, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// Facts produced by the `k5_auth` module.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthContext {
    #[serde(default)]
    pub endpoints: HashMap<String, String>,
    #[serde(default)]
    pub auth_token: Option<String>,
    /// Marker left by a successful authentication; a JSON `null` still counts.
    #[serde(default, deserialize_with = "present_value")]
    pub auth_spec: Option<serde_json::Value>,
}

fn present_value<'de, D>(deserializer: D) -> std::result::Result<Option<serde_json::Value>, D::Error>
where
    D: Deserializer<'de>,
{
    serde_json::Value::deserialize(deserializer).map(Some)
}

impl AuthContext {
    pub fn is_authenticated(&self) -> bool {
        self.auth_spec.is_some()
    }

    pub fn networking_endpoint(&self) -> Result<&str> {
        self.endpoints
            .get("networking")
            .map(|e| e.trim_end_matches('/'))
            .filter(|e| !e.is_empty())
            .ok_or_else(|| ProvisionError::IncompleteAuth {
                field: "endpoints.networking".to_string(),
            })
    }

    pub fn token(&self) -> Result<&str> {
        self.auth_token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ProvisionError::IncompleteAuth {
                field: "auth_token".to_string(),
            })
    }
}

/// The port requested by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortSpec {
    pub name: String,
    pub subnet_name: String,
    pub network_name: String,
    pub fixed_ip: String,
    pub security_groups: Vec<String>,
    pub availability_zone: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedIds {
    pub network_id: String,
    pub subnet_id: String,
    pub security_group_ids: Vec<String>,
}

/// Created port exactly as the networking service returned it.
pub type PortResult = serde_json::Value;

/// One entry of a networking collection listing; other fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NamedResource {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

impl NamedResource {
    pub fn is_named(&self, name: &str) -> bool {
        self.name.as_deref() == Some(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreatePortRequest {
    pub port: NewPort,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewPort {
    pub network_id: String,
    pub name: String,
    pub availability_zone: String,
    pub fixed_ips: Vec<FixedIp>,
    pub security_groups: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FixedIp {
    pub subnet_id: String,
    pub ip_address: String,
}

impl CreatePortRequest {
    pub fn new(spec: &PortSpec, ids: &ResolvedIds) -> Self {
        Self {
            port: NewPort {
                network_id: ids.network_id.clone(),
                name: spec.name.clone(),
                availability_zone: spec.availability_zone.clone(),
                fixed_ips: vec![FixedIp {
                    subnet_id: ids.subnet_id.clone(),
                    ip_address: spec.fixed_ip.clone(),
                }],
                security_groups: ids.security_group_ids.clone(),
            },
        }
    }
}

/// Non-failing end states of a provisioning run.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    AlreadyExists { name: String },
    NetworkNotFound { name: String },
    SubnetNotFound { name: String },
    WouldCreate { name: String },
    Created(PortResult),
}

impl Outcome {
    pub fn changed(&self) -> bool {
        matches!(self, Outcome::Created(_) | Outcome::WouldCreate { .. })
    }

    pub fn message(&self) -> String {
        match self {
            Outcome::AlreadyExists { name } => format!("Port {} already exists", name),
            Outcome::NetworkNotFound { name } => format!("Network {} not found", name),
            Outcome::SubnetNotFound { name } => format!("Subnet {} not found", name),
            Outcome::WouldCreate { name } => format!("Port {} would be created", name),
            Outcome::Created(_) => "Port Creation Successful".to_string(),
        }
    }
}
