//! Trending-product fallback for users and sessions with no usable
//! history.
//!
//! Scores products by raw interaction counts over a trailing window:
//! `views * 0.5 + purchases * 5`. Deterministic for a fixed dataset and
//! window; score ties are broken by product id.

use chrono::{Duration, Utc};
use commerce_insight_core::{InteractionStore, InteractionType, Result};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

const VIEW_SCORE: f64 = 0.5;
const PURCHASE_SCORE: f64 = 5.0;

/// Cold-start recommender over trending interaction counts
pub struct TrendingRecommender {
    interactions: Arc<dyn InteractionStore>,
    lookback_days: i64,
}

impl TrendingRecommender {
    pub fn new(interactions: Arc<dyn InteractionStore>, lookback_days: i64) -> Self {
        Self {
            interactions,
            lookback_days,
        }
    }

    /// Top trending products, excluding `exclude`, at most `limit`.
    pub async fn recommend(&self, limit: usize, exclude: &[Uuid]) -> Result<Vec<Uuid>> {
        let since = Utc::now() - Duration::days(self.lookback_days);
        let events = self.interactions.events_since(since).await?;

        let mut scores: HashMap<Uuid, f64> = HashMap::new();
        for event in &events {
            if exclude.contains(&event.product_id) {
                continue;
            }
            match event.interaction_type() {
                InteractionType::View => {
                    *scores.entry(event.product_id).or_insert(0.0) += VIEW_SCORE;
                }
                InteractionType::Purchase => {
                    *scores.entry(event.product_id).or_insert(0.0) += PURCHASE_SCORE;
                }
                _ => {}
            }
        }

        let mut ranked: Vec<(Uuid, f64)> = scores.into_iter().collect();
        ranked.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        ranked.truncate(limit);

        debug!(count = ranked.len(), "Generated trending recommendations");
        Ok(ranked.into_iter().map(|(id, _)| id).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use commerce_insight_core::{InteractionDetail, MemoryStore};

    fn purchase() -> InteractionDetail {
        InteractionDetail::Purchase {
            order_id: Uuid::new_v4(),
        }
    }

    async fn seeded_store() -> (Arc<MemoryStore>, Uuid, Uuid) {
        let store = Arc::new(MemoryStore::new());
        let popular = Uuid::new_v4();
        let niche = Uuid::new_v4();
        let now = Utc::now();

        // popular: 1 purchase + 2 views = 6.0
        store.add_event(MemoryStore::event(None, Some("s1"), popular, purchase(), now));
        store.add_event(MemoryStore::event(
            None,
            Some("s1"),
            popular,
            InteractionDetail::View,
            now,
        ));
        store.add_event(MemoryStore::event(
            None,
            Some("s2"),
            popular,
            InteractionDetail::View,
            now,
        ));
        // niche: 3 views = 1.5
        for _ in 0..3 {
            store.add_event(MemoryStore::event(
                None,
                Some("s3"),
                niche,
                InteractionDetail::View,
                now,
            ));
        }

        (store, popular, niche)
    }

    #[tokio::test]
    async fn test_ranks_purchases_above_views() {
        let (store, popular, niche) = seeded_store().await;
        let recommender = TrendingRecommender::new(store, 30);

        let recs = recommender.recommend(10, &[]).await.unwrap();
        assert_eq!(recs, vec![popular, niche]);
    }

    #[tokio::test]
    async fn test_honors_exclusions_and_limit() {
        let (store, popular, niche) = seeded_store().await;
        let recommender = TrendingRecommender::new(store, 30);

        let recs = recommender.recommend(10, &[popular]).await.unwrap();
        assert_eq!(recs, vec![niche]);

        let recommender_limited = recommender.recommend(1, &[]).await.unwrap();
        assert_eq!(recommender_limited.len(), 1);
    }

    #[tokio::test]
    async fn test_deterministic_for_fixed_dataset() {
        let (store, _, _) = seeded_store().await;
        let recommender = TrendingRecommender::new(store, 30);

        let first = recommender.recommend(10, &[]).await.unwrap();
        let second = recommender.recommend(10, &[]).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_empty_log_yields_empty_list() {
        let store = Arc::new(MemoryStore::new());
        let recommender = TrendingRecommender::new(store, 30);
        assert!(recommender.recommend(5, &[]).await.unwrap().is_empty());
    }
}
