//! # Errors
//!
//! Centralized error handling for the Grapevine client.
//! Validation failures never touch the network; gateway failures are whatever
//! went wrong on the wire; partial creation is a gateway failure that happened
//! after a write had already committed.

use std::fmt;

use thiserror::Error;

use crate::models::EntityKind;

/// Client-side field or search-term violation. Raised before any remote call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: &'static str },

    #[error("{field} must be at most {max} characters (got {actual})")]
    TooLong {
        field: &'static str,
        max: usize,
        actual: usize,
    },

    #[error("search term must be at least {min} characters")]
    SearchTermTooShort { min: usize },
}

/// Failure of a single call through the remote resource gateway.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// Connection refused, DNS failure, broken body stream, ...
    #[error("transport failure: {0}")]
    Transport(String),

    #[error("request timed out")]
    Timeout,

    /// Non-2xx response.
    #[error("backend responded with status {status}: {body}")]
    Status { status: u16, body: String },

    /// 2xx response whose body lacks the expected shape or field.
    #[error("malformed response: {0}")]
    Malformed(String),

    /// The request could not be addressed; nothing was sent.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl GatewayError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, GatewayError::Status { status: 404, .. })
    }
}

/// One step of a creation pipeline, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CreationStep {
    PrimaryIdentifier,
    /// Identifiers beyond the primary one (the community key).
    ExtraIdentifiers,
    EntityWrite,
    LinkIdentifier,
    LinkWrite,
}

impl CreationStep {
    /// Whether completing this step leaves a record on the server.
    pub fn is_write(&self) -> bool {
        matches!(self, CreationStep::EntityWrite | CreationStep::LinkWrite)
    }
}

impl fmt::Display for CreationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CreationStep::PrimaryIdentifier => "primary identifier",
            CreationStep::ExtraIdentifiers => "extra identifiers",
            CreationStep::EntityWrite => "entity write",
            CreationStep::LinkIdentifier => "link identifier",
            CreationStep::LinkWrite => "link write",
        };
        f.write_str(name)
    }
}

/// A gateway failure after at least one write committed.
///
/// Carries enough to build reconciliation tooling: the entity's primary
/// identifier and every step that completed. Nothing is rolled back.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{entity} {entity_id} partially created: {failed_at} failed after {committed:?}")]
pub struct PartialCreation {
    pub entity: EntityKind,
    pub entity_id: String,
    pub committed: Vec<CreationStep>,
    pub failed_at: CreationStep,
    #[source]
    pub source: GatewayError,
}

/// Tagged result of a creation attempt that did not produce an entity.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CreationError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Another attempt from the same surface has not resolved yet.
    #[error("a {0} creation is already in flight")]
    InFlight(EntityKind),

    /// Failed before anything was written; nothing to reconcile.
    #[error("{entity} creation failed at {step}: {source}")]
    Gateway {
        entity: EntityKind,
        step: CreationStep,
        #[source]
        source: GatewayError,
    },

    #[error(transparent)]
    Partial(#[from] PartialCreation),
}

impl CreationError {
    pub fn is_partial(&self) -> bool {
        matches!(self, CreationError::Partial(_))
    }

    /// Steps that committed before the failure, empty unless partial.
    pub fn committed_steps(&self) -> &[CreationStep] {
        match self {
            CreationError::Partial(partial) => &partial.committed,
            _ => &[],
        }
    }
}

/// The primary error type for list, search and session operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    /// Resource not found (e.g. a username with no user record)
    #[error("{0} not found: {1}")]
    NotFound(String, String),

    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// No signed-in user where one is required.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("creation failed: {0}")]
    Creation(#[from] CreationError),
}

/// A specialized Result type for Grapevine client logic.
pub type Result<T> = std::result::Result<T, AppError>;
