//! Community directory view-model.
//!
//! Holds two independent collections: the user's communities and the current
//! search results. Search results are replaced wholesale on every search and
//! never merged with the user's communities.

use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};

use domains::validation::validate_search_term;
use domains::{
    Community, CreationError, GatewayError, Navigator, ResourceGateway, Result, UserId,
};

use crate::listing::{ListStore, Listing};
use crate::pipeline::CreationSurface;
use crate::recipes::CommunityRecipe;

/// Route segment that shows the overview instead of one community.
pub const OVERVIEW_KEY: &str = "overview";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchMode {
    #[default]
    Name,
    Key,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchForm {
    pub mode: SearchMode,
    pub term: String,
    pub key: String,
}

pub struct CommunityDirectory {
    gateway: Arc<dyn ResourceGateway>,
    mine: ListStore<Community>,
    results: ListStore<Community>,
    current: RwLock<Option<Community>>,
    status: RwLock<Option<String>>,
    search: Mutex<SearchForm>,
    creation: CreationSurface<CommunityRecipe>,
}

impl CommunityDirectory {
    pub fn new(gateway: Arc<dyn ResourceGateway>, navigator: Arc<dyn Navigator>) -> Self {
        Self::with_recipe(gateway, navigator, CommunityRecipe::new())
    }

    pub fn with_recipe(
        gateway: Arc<dyn ResourceGateway>,
        navigator: Arc<dyn Navigator>,
        recipe: CommunityRecipe,
    ) -> Self {
        Self {
            creation: CreationSurface::new(recipe, Arc::clone(&gateway), navigator),
            gateway,
            mine: ListStore::new(),
            results: ListStore::new(),
            current: RwLock::new(None),
            status: RwLock::new(None),
            search: Mutex::new(SearchForm::default()),
        }
    }

    pub fn creation(&self) -> &CreationSurface<CommunityRecipe> {
        &self.creation
    }

    pub async fn communities(&self) -> Listing<Community> {
        self.mine.snapshot().await
    }

    pub async fn search_results(&self) -> Listing<Community> {
        self.results.snapshot().await
    }

    pub async fn current(&self) -> Option<Community> {
        self.current.read().await.clone()
    }

    pub async fn status(&self) -> Option<String> {
        self.status.read().await.clone()
    }

    pub async fn search_form(&self) -> SearchForm {
        self.search.lock().await.clone()
    }

    pub async fn edit_search(&self, change: impl FnOnce(&mut SearchForm)) {
        change(&mut *self.search.lock().await);
    }

    /// Fetches the user's communities and replaces local state.
    #[tracing::instrument(skip(self))]
    pub async fn load(&self, user: &UserId) -> Result<usize> {
        match self.gateway.list_communities(user).await {
            Ok(communities) => {
                let count = communities.len();
                self.mine.replace(communities).await;
                Ok(count)
            }
            Err(err) => {
                tracing::error!("error fetching communities: {}", err);
                Err(err.into())
            }
        }
    }

    /// Searches by name. Terms shorter than two characters are rejected
    /// before any remote call and leave the results untouched.
    #[tracing::instrument(skip(self))]
    pub async fn search(&self, term: &str) -> Result<Listing<Community>> {
        let term = validate_search_term(term)?;
        match self.gateway.search_communities(term).await {
            Ok(found) => {
                self.results.replace(found).await;
                Ok(self.results.snapshot().await)
            }
            Err(err) => {
                tracing::error!("error searching communities: {}", err);
                Err(err.into())
            }
        }
    }

    /// Looks a community up by its shareable key. An unknown key, or one no
    /// community could have, yields an empty result set rather than an error.
    #[tracing::instrument(skip(self))]
    pub async fn search_by_key(&self, key: &str) -> Result<Listing<Community>> {
        let key = validate_search_term(key)?;
        match self.gateway.community_details(key).await {
            Ok(found) => self.results.replace(vec![found]).await,
            Err(err) if err.is_not_found() || matches!(err, GatewayError::InvalidRequest(_)) => {
                self.results.replace(Vec::new()).await
            }
            Err(err) => {
                tracing::error!("error searching communities by key: {}", err);
                return Err(err.into());
            }
        }
        Ok(self.results.snapshot().await)
    }

    /// Runs the search selected in the search form.
    pub async fn submit_search(&self) -> Result<Listing<Community>> {
        let form = self.search_form().await;
        match form.mode {
            SearchMode::Name => self.search(&form.term).await,
            SearchMode::Key => self.search_by_key(&form.key).await,
        }
    }

    /// Removes the membership, then refetches the user's communities. No
    /// optimistic removal: if the refetch fails the listing stays stale.
    #[tracing::instrument(skip(self, community), fields(community = %community.community_id))]
    pub async fn leave(&self, community: &Community, user: &UserId) -> Result<()> {
        if let Err(err) = self
            .gateway
            .leave_community(user, &community.community_id)
            .await
        {
            tracing::error!("error leaving community: {}", err);
            return Err(err.into());
        }

        *self.status.write().await = Some(format!("You have left {}.", community.name));

        if let Err(err) = self.load(user).await {
            tracing::warn!("listing is stale after leaving: {}", err);
        }
        Ok(())
    }

    /// Shows one community's details, or the overview for `"overview"`.
    #[tracing::instrument(skip(self))]
    pub async fn open(&self, key: &str) -> Result<Option<Community>> {
        if key.is_empty() || key == OVERVIEW_KEY {
            *self.current.write().await = None;
            return Ok(None);
        }

        match self.gateway.community_details(key).await {
            Ok(community) => {
                *self.current.write().await = Some(community.clone());
                Ok(Some(community))
            }
            Err(err) => {
                tracing::error!("error fetching community details: {}", err);
                Err(err.into())
            }
        }
    }

    /// Submits the creation dialog's draft. See [`CreationSurface::submit`].
    pub async fn create_community(
        &self,
        user: &UserId,
    ) -> std::result::Result<Community, CreationError> {
        self.creation.submit(user, &self.mine).await
    }

    /// Closes the dialog and clears the draft, the search inputs and results.
    pub async fn cancel_dialog(&self) {
        self.creation.cancel().await;
        *self.search.lock().await = SearchForm::default();
        self.results.reset().await;
    }
}
