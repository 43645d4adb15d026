use crate::core::trace::Trace;
use crate::domain::model::{
    AuthContext, CreatePortRequest, NamedResource, Outcome, PortResult, PortSpec, ResolvedIds,
};
use crate::domain::ports::{Collection, NetworkingApi};
use crate::utils::error::{ProvisionError, Result};
use std::collections::HashMap;

/// Resolves names to ids and creates the port.
///
/// Steps run strictly one after another:
/// existence check, network, subnet, security groups, then creation.
/// A missing network or subnet ends the run as a no-op. A missing security
/// group is a failure. No step is retried.
pub struct PortProvisioner<A: NetworkingApi> {
    api: A,
    check_mode: bool,
}

impl<A: NetworkingApi> PortProvisioner<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            check_mode: false,
        }
    }

    /// In check mode every lookup still runs but the port is not created.
    pub fn with_check_mode(mut self, check_mode: bool) -> Self {
        self.check_mode = check_mode;
        self
    }

    pub async fn check_port_exists(
        &self,
        auth: &AuthContext,
        name: &str,
        trace: &mut Trace,
    ) -> Result<bool> {
        let ports = self.api.list(auth, Collection::Ports, trace).await?;
        Ok(ports.iter().any(|p| p.is_named(name)))
    }

    pub async fn resolve_network_id(
        &self,
        auth: &AuthContext,
        name: &str,
        trace: &mut Trace,
    ) -> Result<Option<String>> {
        let networks = self.api.list(auth, Collection::Networks, trace).await?;
        Ok(first_id_named(networks, name))
    }

    pub async fn resolve_subnet_id(
        &self,
        auth: &AuthContext,
        name: &str,
        trace: &mut Trace,
    ) -> Result<Option<String>> {
        let subnets = self.api.list(auth, Collection::Subnets, trace).await?;
        Ok(first_id_named(subnets, name))
    }

    /// Ids come back in the order the names were given.
    pub async fn resolve_security_group_ids(
        &self,
        auth: &AuthContext,
        names: &[String],
        trace: &mut Trace,
    ) -> Result<Vec<String>> {
        let groups = self.api.list(auth, Collection::SecurityGroups, trace).await?;

        let mut ids_by_name: HashMap<String, String> = HashMap::new();
        for group in groups {
            if let Some(name) = group.name {
                ids_by_name.entry(name).or_insert(group.id);
            }
        }

        let ids = names
            .iter()
            .map(|name| {
                ids_by_name
                    .get(name)
                    .cloned()
                    .ok_or_else(|| ProvisionError::SecurityGroupNotFound { name: name.clone() })
            })
            .collect::<Result<Vec<_>>>()?;

        trace.record(format!("security group ids: {:?}", ids));
        Ok(ids)
    }

    pub async fn create_port(
        &self,
        auth: &AuthContext,
        spec: &PortSpec,
        ids: &ResolvedIds,
        trace: &mut Trace,
    ) -> Result<PortResult> {
        let request = CreatePortRequest::new(spec, ids);
        self.api.create_port(auth, &request, trace).await
    }

    pub async fn provision_port(
        &self,
        auth: &AuthContext,
        spec: &PortSpec,
        trace: &mut Trace,
    ) -> Result<Outcome> {
        if !auth.is_authenticated() {
            return Err(ProvisionError::MissingAuth);
        }

        if self.check_port_exists(auth, &spec.name, trace).await? {
            tracing::info!("📦 Port {} already exists", spec.name);
            return Ok(Outcome::AlreadyExists {
                name: spec.name.clone(),
            });
        }

        let Some(network_id) = self
            .resolve_network_id(auth, &spec.network_name, trace)
            .await?
        else {
            tracing::warn!("⚠️ Network {} not found", spec.network_name);
            return Ok(Outcome::NetworkNotFound {
                name: spec.network_name.clone(),
            });
        };

        let Some(subnet_id) = self
            .resolve_subnet_id(auth, &spec.subnet_name, trace)
            .await?
        else {
            tracing::warn!("⚠️ Subnet {} not found", spec.subnet_name);
            return Ok(Outcome::SubnetNotFound {
                name: spec.subnet_name.clone(),
            });
        };

        let security_group_ids = self
            .resolve_security_group_ids(auth, &spec.security_groups, trace)
            .await?;

        trace.record(format!("port_name: {}", spec.name));
        trace.record(format!("subnet_name: {} {}", spec.subnet_name, subnet_id));
        trace.record(format!("network_name: {} {}", spec.network_name, network_id));
        trace.record(format!("fixed_ip: {}", spec.fixed_ip));
        trace.record(format!("security_groups: {:?}", spec.security_groups));
        trace.record(format!("az: {}", spec.availability_zone));

        if self.check_mode {
            tracing::info!("🔍 Check mode, skipping creation of port {}", spec.name);
            return Ok(Outcome::WouldCreate {
                name: spec.name.clone(),
            });
        }

        let ids = ResolvedIds {
            network_id,
            subnet_id,
            security_group_ids,
        };
        let port = self.create_port(auth, spec, &ids, trace).await?;
        tracing::info!("✅ Port {} created", spec.name);
        Ok(Outcome::Created(port))
    }
}

fn first_id_named(resources: Vec<NamedResource>, name: &str) -> Option<String> {
    resources.into_iter().find(|r| r.is_named(name)).map(|r| r.id)
}
