pub mod module;
pub mod provisioner;
pub mod trace;

pub use crate::domain::model::{AuthContext, Outcome, PortResult, PortSpec, ResolvedIds};
pub use crate::domain::ports::{Collection, NetworkingApi};
pub use crate::utils::error::Result;
