//! # Entity Creation Pipeline
//!
//! The backend has no atomic "create" endpoint. Minting an entity is a chain
//! of dependent calls, each starting only after the previous one resolved:
//!
//! 1. validate the draft (no network)
//! 2. acquire the primary identifier
//! 3. acquire any extra identifiers, then persist the entity record
//! 4. acquire the link identifier
//! 5. persist the link record
//!
//! Any failure aborts the rest. Committed writes stay where they are; the
//! error says which steps completed. Local state is only touched once step 5
//! succeeded (see [`CreationSurface::submit`]).

use std::fmt::Debug;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use domains::{
    CreationError, CreationStep, EntityKind, GatewayError, IdentifierKind, Navigator,
    PartialCreation, ResourceGateway, UserId, ValidationError,
};

use crate::form::DraftForm;
use crate::guard::InFlight;
use crate::identifiers::IdentifierSource;
use crate::listing::ListStore;

/// What happens to the "my entities" listing after a successful creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResyncPolicy {
    /// Merge the new record, then replace the listing with a fresh fetch.
    Refetch,
    /// Merge the new record and keep it as the listing's state.
    TrustLocal,
}

/// Per-entity configuration of the pipeline: identifier kinds, payloads,
/// endpoints and post-creation behaviour.
#[async_trait]
pub trait EntityRecipe: Send + Sync + 'static {
    type Draft: Clone + Default + Debug + Send + Sync + 'static;
    /// Identifiers acquired between the primary one and the entity write.
    type Extras: Send;
    type Entity: Clone + Debug + Send + Sync + 'static;
    type Link: Debug + Send + Sync;

    const KIND: EntityKind;
    const PRIMARY_ID: IdentifierKind;
    const LINK_ID: IdentifierKind;
    /// Whether `acquire_extras` makes a remote call, and so whether the
    /// extra-identifier step is reported among committed steps.
    const EXTRA_IDENTIFIERS: bool;

    fn validate(&self, draft: &Self::Draft) -> Result<(), ValidationError>;

    async fn acquire_extras(&self, ids: &IdentifierSource) -> Result<Self::Extras, GatewayError>;

    fn build_entity(
        &self,
        primary_id: String,
        extras: Self::Extras,
        draft: &Self::Draft,
        owner: &UserId,
    ) -> Self::Entity;

    /// Persists the record; `Some` when the backend echoed what it stored.
    async fn write_entity(
        &self,
        gateway: &dyn ResourceGateway,
        entity: &Self::Entity,
    ) -> Result<Option<Self::Entity>, GatewayError>;

    fn build_link(&self, link_id: String, owner: &UserId, entity: &Self::Entity) -> Self::Link;

    async fn write_link(
        &self,
        gateway: &dyn ResourceGateway,
        link: &Self::Link,
    ) -> Result<(), GatewayError>;

    /// Fetches the owner's listing from the backend.
    async fn refetch(
        &self,
        gateway: &dyn ResourceGateway,
        owner: &UserId,
    ) -> Result<Vec<Self::Entity>, GatewayError>;

    fn resync(&self) -> ResyncPolicy;

    /// Route to navigate to once the entity exists.
    fn redirect(&self, _entity: &Self::Entity) -> Option<String> {
        None
    }
}

/// Steps completed so far in one attempt.
struct Progress {
    entity: EntityKind,
    entity_id: Option<String>,
    completed: Vec<CreationStep>,
}

impl Progress {
    fn new(entity: EntityKind) -> Self {
        Self {
            entity,
            entity_id: None,
            completed: Vec::new(),
        }
    }

    async fn step<T>(
        &mut self,
        step: CreationStep,
        call: impl Future<Output = Result<T, GatewayError>>,
    ) -> Result<T, CreationError> {
        self.step_recorded(true, step, call).await
    }

    /// Runs `call` as `step`; it only counts as completed when `record` is set.
    async fn step_recorded<T>(
        &mut self,
        record: bool,
        step: CreationStep,
        call: impl Future<Output = Result<T, GatewayError>>,
    ) -> Result<T, CreationError> {
        match call.await {
            Ok(value) => {
                if record {
                    self.completed.push(step);
                }
                Ok(value)
            }
            Err(source) => Err(self.fail(step, source)),
        }
    }

    fn fail(&self, step: CreationStep, source: GatewayError) -> CreationError {
        if !self.completed.iter().any(CreationStep::is_write) {
            return CreationError::Gateway {
                entity: self.entity,
                step,
                source,
            };
        }
        PartialCreation {
            entity: self.entity,
            entity_id: self.entity_id.clone().unwrap_or_default(),
            committed: self.completed.clone(),
            failed_at: step,
            source,
        }
        .into()
    }
}

pub struct CreationPipeline<R: EntityRecipe> {
    recipe: R,
    gateway: Arc<dyn ResourceGateway>,
    identifiers: IdentifierSource,
    in_flight: InFlight,
}

impl<R: EntityRecipe> CreationPipeline<R> {
    pub fn new(recipe: R, gateway: Arc<dyn ResourceGateway>) -> Self {
        Self {
            recipe,
            identifiers: IdentifierSource::new(Arc::clone(&gateway)),
            gateway,
            in_flight: InFlight::new(),
        }
    }

    pub fn recipe(&self) -> &R {
        &self.recipe
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.is_busy()
    }

    /// Runs steps 1-5. Does not touch any local state.
    #[tracing::instrument(skip_all, fields(entity = %R::KIND, owner = %owner))]
    pub async fn create(&self, draft: &R::Draft, owner: &UserId) -> Result<R::Entity, CreationError> {
        self.recipe.validate(draft)?;
        let _guard = self
            .in_flight
            .try_begin()
            .ok_or(CreationError::InFlight(R::KIND))?;

        let mut progress = Progress::new(R::KIND);

        let primary_id = progress
            .step(
                CreationStep::PrimaryIdentifier,
                self.identifiers.acquire(R::PRIMARY_ID),
            )
            .await?;
        progress.entity_id = Some(primary_id.clone());

        let extras = progress
            .step_recorded(
                R::EXTRA_IDENTIFIERS,
                CreationStep::ExtraIdentifiers,
                self.recipe.acquire_extras(&self.identifiers),
            )
            .await?;

        let pending = self.recipe.build_entity(primary_id, extras, draft, owner);
        let echoed = progress
            .step(
                CreationStep::EntityWrite,
                self.recipe.write_entity(self.gateway.as_ref(), &pending),
            )
            .await?;

        let link_id = progress
            .step(
                CreationStep::LinkIdentifier,
                self.identifiers.acquire(R::LINK_ID),
            )
            .await?;
        let link = self.recipe.build_link(link_id, owner, &pending);
        progress
            .step(
                CreationStep::LinkWrite,
                self.recipe.write_link(self.gateway.as_ref(), &link),
            )
            .await?;

        tracing::info!(link = ?link, "created {}", R::KIND);
        Ok(echoed.unwrap_or(pending))
    }
}

/// A creation dialog bound to its pipeline: form state plus the
/// reconciliation done after a successful run.
pub struct CreationSurface<R: EntityRecipe> {
    pipeline: CreationPipeline<R>,
    form: Mutex<DraftForm<R::Draft>>,
    navigator: Arc<dyn Navigator>,
}

impl<R: EntityRecipe> CreationSurface<R> {
    pub fn new(recipe: R, gateway: Arc<dyn ResourceGateway>, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            pipeline: CreationPipeline::new(recipe, gateway),
            form: Mutex::new(DraftForm::default()),
            navigator,
        }
    }

    pub fn pipeline(&self) -> &CreationPipeline<R> {
        &self.pipeline
    }

    /// True while a submission is running; the submit control should be disabled.
    pub fn is_submitting(&self) -> bool {
        self.pipeline.is_in_flight()
    }

    pub async fn form(&self) -> DraftForm<R::Draft> {
        self.form.lock().await.clone()
    }

    pub async fn open(&self) {
        self.form.lock().await.open();
    }

    pub async fn toggle(&self) {
        self.form.lock().await.toggle();
    }

    pub async fn edit(&self, change: impl FnOnce(&mut R::Draft)) {
        change(self.form.lock().await.draft_mut());
    }

    /// Clears the draft and closes the dialog.
    pub async fn cancel(&self) {
        self.form.lock().await.reset();
    }

    /// Runs the pipeline on the current draft and reconciles `listing`.
    ///
    /// On success: append the entity, reset the form, resync per the recipe,
    /// redirect. On failure: log, leave the form open and the listing as is.
    pub async fn submit(
        &self,
        owner: &UserId,
        listing: &ListStore<R::Entity>,
    ) -> Result<R::Entity, CreationError> {
        let draft = self.form.lock().await.draft().clone();

        let entity = match self.pipeline.create(&draft, owner).await {
            Ok(entity) => entity,
            Err(err) => {
                tracing::error!(
                    entity = %R::KIND,
                    committed = ?err.committed_steps(),
                    "error creating {}: {}",
                    R::KIND,
                    err
                );
                return Err(err);
            }
        };

        listing.append(entity.clone()).await;
        self.form.lock().await.reset();

        let recipe = self.pipeline.recipe();
        if recipe.resync() == ResyncPolicy::Refetch {
            match recipe.refetch(self.pipeline.gateway.as_ref(), owner).await {
                Ok(items) => listing.replace(items).await,
                Err(err) => tracing::warn!(
                    entity = %R::KIND,
                    "resync after creation failed, keeping merged listing: {}",
                    err
                ),
            }
        }

        if let Some(route) = recipe.redirect(&entity) {
            self.navigator.navigate(&route);
        }
        Ok(entity)
    }
}
