//! grapevine/crates/domains/src/lib.rs
//!
//! Domain models, error taxonomy and port traits for the Grapevine client.
//! Nothing in this crate performs I/O; transports live in `api-adapters`.

pub mod errors;
pub mod models;
pub mod ports;
pub mod validation;

// Re-exporting for easier access in other crates
pub use errors::*;
pub use models::*;
pub use ports::*;
