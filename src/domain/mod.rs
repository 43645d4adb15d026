// Domain layer: request-scoped models and the networking seam.

pub mod model;
pub mod ports;
