//! Data-access seam for the analytics engines.
//!
//! All storage goes through these traits; engines never issue queries
//! directly. The Postgres implementations back the deployed services and
//! the in-memory implementation backs tests.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::{PostgresCatalogStore, PostgresInteractionStore, PostgresPriceHistoryStore};

use crate::error::CommerceInsightError;
use crate::types::{InteractionCounts, InteractionEvent, PriceHistorySample, Product};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

pub type StoreResult<T> = Result<T, CommerceInsightError>;

/// Read access to the append-only interaction log
#[async_trait]
pub trait InteractionStore: Send + Sync {
    /// All events created at or after `since`, in no particular order.
    async fn events_since(&self, since: DateTime<Utc>) -> StoreResult<Vec<InteractionEvent>>;

    /// A user's most recent events, newest first, up to `limit`.
    async fn events_for_user(
        &self,
        user_id: Uuid,
        limit: usize,
    ) -> StoreResult<Vec<InteractionEvent>>;

    /// A session's most recent events, newest first, up to `limit`.
    async fn events_for_session(
        &self,
        session_id: &str,
        limit: usize,
    ) -> StoreResult<Vec<InteractionEvent>>;

    /// All purchase events for a product.
    async fn purchase_events_for_product(
        &self,
        product_id: Uuid,
    ) -> StoreResult<Vec<InteractionEvent>>;

    /// All purchase events belonging to any of the given orders.
    async fn purchases_in_orders(
        &self,
        order_ids: &[Uuid],
    ) -> StoreResult<Vec<InteractionEvent>>;

    /// Per-type counts for one product since the given instant.
    async fn product_counts_since(
        &self,
        product_id: Uuid,
        since: DateTime<Utc>,
    ) -> StoreResult<InteractionCounts>;
}

/// Read access to catalog products
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn product(&self, id: Uuid) -> StoreResult<Option<Product>>;

    async fn products_in_category(&self, category: &str) -> StoreResult<Vec<Product>>;

    async fn active_products(&self) -> StoreResult<Vec<Product>>;
}

/// Price history snapshots: the sampler writes, the estimators read
#[async_trait]
pub trait PriceHistoryStore: Send + Sync {
    /// Append one snapshot. Appends are idempotent per (product, sampling
    /// day); returns whether a row was actually written.
    async fn append_sample(&self, sample: PriceHistorySample) -> StoreResult<bool>;

    /// Samples at or after `since`, oldest first.
    async fn samples_since(
        &self,
        product_id: Uuid,
        since: DateTime<Utc>,
    ) -> StoreResult<Vec<PriceHistorySample>>;

    /// Most recent samples, newest first, up to `limit`.
    async fn recent_samples(
        &self,
        product_id: Uuid,
        limit: usize,
    ) -> StoreResult<Vec<PriceHistorySample>>;
}
