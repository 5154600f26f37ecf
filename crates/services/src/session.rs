//! Resolves the signed-in username to an [`Identity`].

use std::sync::Arc;

use domains::{AppError, Identity, ResourceGateway, Result, SessionProvider};

pub struct SessionResolver {
    gateway: Arc<dyn ResourceGateway>,
}

impl SessionResolver {
    pub fn new(gateway: Arc<dyn ResourceGateway>) -> Self {
        Self { gateway }
    }

    /// `Ok(None)` when nobody is signed in.
    #[tracing::instrument(skip_all)]
    pub async fn resolve(&self, session: &dyn SessionProvider) -> Result<Option<Identity>> {
        let Some(username) = session.current_username() else {
            return Ok(None);
        };

        match self.gateway.lookup_user(&username).await {
            Ok(Some(user_id)) => {
                tracing::debug!(user_id = %user_id, "resolved current user");
                Ok(Some(Identity { user_id, username }))
            }
            Ok(None) => Err(AppError::NotFound("user".into(), username)),
            Err(err) => {
                tracing::error!("error fetching current user ID: {}", err);
                Err(err.into())
            }
        }
    }

    /// Like [`resolve`](Self::resolve) but a missing session is an error.
    pub async fn require(&self, session: &dyn SessionProvider) -> Result<Identity> {
        self.resolve(session)
            .await?
            .ok_or_else(|| AppError::Unauthorized("no user is signed in".into()))
    }
}
