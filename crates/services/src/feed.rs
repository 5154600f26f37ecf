//! Post feed view-model: the user's post listing and the "new post" dialog.

use std::sync::Arc;

use domains::{CreationError, FeedScope, Navigator, Post, ResourceGateway, Result, UserId};

use crate::listing::{ListStore, Listing};
use crate::pipeline::CreationSurface;
use crate::recipes::PostRecipe;

pub struct PostFeed {
    gateway: Arc<dyn ResourceGateway>,
    scope: FeedScope,
    posts: ListStore<Post>,
    creation: CreationSurface<PostRecipe>,
}

impl PostFeed {
    pub fn new(
        gateway: Arc<dyn ResourceGateway>,
        navigator: Arc<dyn Navigator>,
        scope: FeedScope,
    ) -> Self {
        Self::with_recipe(gateway, navigator, PostRecipe::new(scope))
    }

    pub fn with_recipe(
        gateway: Arc<dyn ResourceGateway>,
        navigator: Arc<dyn Navigator>,
        recipe: PostRecipe,
    ) -> Self {
        Self {
            scope: recipe.scope(),
            creation: CreationSurface::new(recipe, Arc::clone(&gateway), navigator),
            gateway,
            posts: ListStore::new(),
        }
    }

    pub fn scope(&self) -> FeedScope {
        self.scope
    }

    /// Refresh and create controls only belong to the shared feed.
    pub fn shows_controls(&self) -> bool {
        self.scope == FeedScope::All
    }

    pub fn creation(&self) -> &CreationSurface<PostRecipe> {
        &self.creation
    }

    pub async fn posts(&self) -> Listing<Post> {
        self.posts.snapshot().await
    }

    /// Fetches the listing and replaces local state. On failure the previous
    /// listing stays.
    #[tracing::instrument(skip(self), fields(scope = self.scope.as_str()))]
    pub async fn load(&self, user: &UserId) -> Result<usize> {
        match self.gateway.list_posts(user, self.scope).await {
            Ok(posts) => {
                let count = posts.len();
                self.posts.replace(posts).await;
                Ok(count)
            }
            Err(err) => {
                tracing::error!("error fetching user posts: {}", err);
                Err(err.into())
            }
        }
    }

    pub async fn refresh(&self, user: &UserId) -> Result<usize> {
        self.load(user).await
    }

    /// Submits the dialog's draft. See [`CreationSurface::submit`].
    pub async fn create_post(&self, user: &UserId) -> std::result::Result<Post, CreationError> {
        self.creation.submit(user, &self.posts).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domains::{GatewayError, MockNavigator, MockResourceGateway};
    use tokio_test::{assert_err, assert_ok};

    fn post(id: &str) -> Post {
        Post {
            post_id: id.into(),
            description: "d".into(),
            image_link: "http://i".into(),
            author_user_id: None,
            username: Some("ana".into()),
            created_at: None,
        }
    }

    #[tokio::test]
    async fn failed_load_keeps_previous_listing() {
        let mut gateway = MockResourceGateway::new();
        let mut calls = 0;
        gateway.expect_list_posts().times(2).returning(move |_, _| {
            calls += 1;
            if calls == 1 {
                Ok(vec![post("P1")])
            } else {
                Err(GatewayError::Timeout)
            }
        });

        let feed = PostFeed::new(Arc::new(gateway), Arc::new(MockNavigator::new()), FeedScope::All);
        let user = UserId::from("7");
        assert_eq!(assert_ok!(feed.load(&user).await), 1);
        assert_err!(feed.refresh(&user).await);
        assert_eq!(feed.posts().await.len(), 1);
    }

    #[test]
    fn controls_only_on_shared_feed() {
        let all = PostFeed::new(
            Arc::new(MockResourceGateway::new()),
            Arc::new(MockNavigator::new()),
            FeedScope::All,
        );
        let own = PostFeed::new(
            Arc::new(MockResourceGateway::new()),
            Arc::new(MockNavigator::new()),
            FeedScope::User,
        );
        assert!(all.shows_controls());
        assert!(!own.shows_controls());
    }
}
