//! Identifier acquisition: one fresh server-minted token per logical need.
//!
//! No caching or pooling. A token obtained here is consumed by exactly one
//! write; a failed attempt's tokens are dropped with the attempt.

use std::sync::Arc;

use domains::{GatewayError, IdentifierKind, ResourceGateway};

#[derive(Clone)]
pub struct IdentifierSource {
    gateway: Arc<dyn ResourceGateway>,
}

impl IdentifierSource {
    pub fn new(gateway: Arc<dyn ResourceGateway>) -> Self {
        Self { gateway }
    }

    pub async fn acquire(&self, kind: IdentifierKind) -> Result<String, GatewayError> {
        let token = self.gateway.acquire_identifier(kind).await?;
        let token = non_empty(token, kind.as_str())?;
        tracing::debug!(kind = %kind, token = %token, "acquired identifier");
        Ok(token)
    }

    pub async fn acquire_community_key(&self) -> Result<String, GatewayError> {
        let key = self.gateway.acquire_community_key().await?;
        let key = non_empty(key, "community key")?;
        tracing::debug!(key = %key, "acquired community key");
        Ok(key)
    }
}

fn non_empty(token: String, what: &str) -> Result<String, GatewayError> {
    if token.trim().is_empty() {
        return Err(GatewayError::Malformed(format!("empty {what} token")));
    }
    Ok(token)
}
