//! Driven ports the host application must implement.

mod outbound;

pub use outbound::{BusGateway, GatewayError, NetworkGateway, TimeSource};
