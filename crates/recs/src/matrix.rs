//! User-item matrix construction from the interaction log.
//!
//! Folds a lookback window of events into per-user weighted product
//! vectors. Weights are additive, unbounded, and not normalized per user;
//! cart removals subtract.

use chrono::{Duration, Utc};
use commerce_insight_core::{InteractionStore, InteractionType, Result};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Weighted product affinities for one user
pub type UserVector = HashMap<Uuid, f64>;

/// Fixed affinity weight per interaction kind
pub fn interaction_weight(interaction_type: InteractionType) -> f64 {
    match interaction_type {
        InteractionType::Purchase => 5.0,
        InteractionType::Favorite => 2.0,
        InteractionType::CartAdd => 1.5,
        InteractionType::View => 0.5,
        InteractionType::CartRemove => -0.5,
    }
}

/// Builds the user-item matrix fresh on every call.
///
/// No caching: the matrix is recomputed per request so it is always
/// consistent with a concurrently written interaction log.
pub struct UserItemMatrixBuilder {
    interactions: Arc<dyn InteractionStore>,
    lookback_days: i64,
}

impl UserItemMatrixBuilder {
    pub fn new(interactions: Arc<dyn InteractionStore>, lookback_days: i64) -> Self {
        Self {
            interactions,
            lookback_days,
        }
    }

    /// Fold the lookback window into per-user vectors. Events without a
    /// user id (anonymous sessions) are skipped.
    pub async fn build(&self) -> Result<HashMap<Uuid, UserVector>> {
        let since = Utc::now() - Duration::days(self.lookback_days);
        let events = self.interactions.events_since(since).await?;

        let mut vectors: HashMap<Uuid, UserVector> = HashMap::new();

        for event in &events {
            let Some(user_id) = event.user_id else {
                continue;
            };

            let weight = interaction_weight(event.interaction_type());
            *vectors
                .entry(user_id)
                .or_default()
                .entry(event.product_id)
                .or_insert(0.0) += weight;
        }

        debug!(
            events = events.len(),
            users = vectors.len(),
            "Built user-item matrix"
        );
        Ok(vectors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use commerce_insight_core::{InteractionDetail, MemoryStore};

    #[test]
    fn test_interaction_weights() {
        assert_eq!(interaction_weight(InteractionType::Purchase), 5.0);
        assert_eq!(interaction_weight(InteractionType::Favorite), 2.0);
        assert_eq!(interaction_weight(InteractionType::CartAdd), 1.5);
        assert_eq!(interaction_weight(InteractionType::View), 0.5);
        assert_eq!(interaction_weight(InteractionType::CartRemove), -0.5);
    }

    #[tokio::test]
    async fn test_build_accumulates_weights_per_product() {
        let store = Arc::new(MemoryStore::new());
        let user = Uuid::new_v4();
        let product = Uuid::new_v4();
        let now = Utc::now();

        store.add_event(MemoryStore::event(
            Some(user),
            None,
            product,
            InteractionDetail::View,
            now,
        ));
        store.add_event(MemoryStore::event(
            Some(user),
            None,
            product,
            InteractionDetail::CartAdd,
            now,
        ));
        store.add_event(MemoryStore::event(
            Some(user),
            None,
            product,
            InteractionDetail::CartRemove,
            now,
        ));

        let builder = UserItemMatrixBuilder::new(store, 90);
        let matrix = builder.build().await.unwrap();

        // 0.5 + 1.5 - 0.5
        assert_eq!(matrix[&user][&product], 1.5);
    }

    #[tokio::test]
    async fn test_build_skips_anonymous_events() {
        let store = Arc::new(MemoryStore::new());
        let product = Uuid::new_v4();

        store.add_event(MemoryStore::event(
            None,
            Some("session-1"),
            product,
            InteractionDetail::View,
            Utc::now(),
        ));

        let builder = UserItemMatrixBuilder::new(store, 90);
        let matrix = builder.build().await.unwrap();
        assert!(matrix.is_empty());
    }

    #[tokio::test]
    async fn test_build_ignores_events_outside_window() {
        let store = Arc::new(MemoryStore::new());
        let user = Uuid::new_v4();
        let product = Uuid::new_v4();

        store.add_event(MemoryStore::event(
            Some(user),
            None,
            product,
            InteractionDetail::Purchase {
                order_id: Uuid::new_v4(),
            },
            Utc::now() - Duration::days(120),
        ));

        let builder = UserItemMatrixBuilder::new(store, 90);
        let matrix = builder.build().await.unwrap();
        assert!(matrix.is_empty());
    }
}
