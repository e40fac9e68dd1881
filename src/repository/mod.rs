//! Repository layer for database reads

pub mod festivals;

pub use festivals::FestivalsRepository;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        festival::{Festival, FestivalSlug, ProgramItem},
        filter::Filter,
    },
};

/// Read API over the published festival catalogue.
///
/// Implementations own visibility (only verified festivals), predicate
/// evaluation for every [`Filter`] field, and ordering.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FestivalStore: Send + Sync {
    /// One page of matching festivals plus the total match count
    async fn list(&self, filter: &Filter, page: i64, per_page: i64) -> AppResult<(Vec<Festival>, i64)>;

    /// All matching festivals, capped at `limit`
    async fn list_all(&self, filter: &Filter, limit: i64) -> AppResult<Vec<Festival>>;

    async fn get_by_slug(&self, slug: &str) -> AppResult<Festival>;

    async fn list_program(&self, festival_id: Uuid) -> AppResult<Vec<ProgramItem>>;

    async fn list_slugs(&self) -> AppResult<Vec<FestivalSlug>>;

    /// Cheap connectivity check for readiness probes
    async fn ping(&self) -> AppResult<()>;
}
