//! grapevine/crates/services/src/lib.rs
//!
//! Client-side orchestration: identifier acquisition, the entity creation
//! pipeline and the per-view list/search state it reconciles.

pub mod directory;
pub mod feed;
pub mod form;
pub mod guard;
pub mod identifiers;
pub mod listing;
pub mod pipeline;
pub mod recipes;
pub mod session;

pub use directory::{CommunityDirectory, SearchForm, SearchMode, OVERVIEW_KEY};
pub use feed::PostFeed;
pub use form::DraftForm;
pub use identifiers::IdentifierSource;
pub use listing::{ListStore, Listing};
pub use pipeline::{CreationPipeline, CreationSurface, EntityRecipe, ResyncPolicy};
pub use recipes::{CommunityRecipe, PostRecipe};
pub use session::SessionResolver;
