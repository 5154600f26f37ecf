//! # api-adapters
//!
//! Concrete transports for the `ResourceGateway` port.

pub mod wire;

#[cfg(feature = "http-reqwest")]
pub mod http;

#[cfg(feature = "http-reqwest")]
pub use http::{GatewayBuildError, HttpGateway};
