use crate::core::trace::Trace;
use crate::domain::model::{AuthContext, CreatePortRequest, NamedResource, PortResult};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Networking collections the provisioner reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Ports,
    Networks,
    Subnets,
    SecurityGroups,
}

impl Collection {
    pub fn path(&self) -> &'static str {
        match self {
            Collection::Ports => "/v2.0/ports",
            Collection::Networks => "/v2.0/networks",
            Collection::Subnets => "/v2.0/subnets",
            Collection::SecurityGroups => "/v2.0/security-groups",
        }
    }

    /// Top-level key holding the entries in a listing response.
    pub fn key(&self) -> &'static str {
        match self {
            Collection::Ports => "ports",
            Collection::Networks => "networks",
            Collection::Subnets => "subnets",
            Collection::SecurityGroups => "security_groups",
        }
    }
}

#[async_trait]
pub trait NetworkingApi: Send + Sync {
    /// Lists a whole collection. Anything but 200 is an error.
    async fn list(
        &self,
        auth: &AuthContext,
        collection: Collection,
        trace: &mut Trace,
    ) -> Result<Vec<NamedResource>>;

    /// Creates a port. Anything but 201 is an error.
    async fn create_port(
        &self,
        auth: &AuthContext,
        request: &CreatePortRequest,
        trace: &mut Trace,
    ) -> Result<PortResult>;
}
