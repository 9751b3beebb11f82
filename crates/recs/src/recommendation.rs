//! Personalized and session-level recommendation facades.
//!
//! Orchestrates the collaborative, content-based, and trending recommenders
//! into the two lists the storefront actually renders: a hybrid
//! personalized list for signed-in users and a session list for anonymous
//! visitors. Each request degrades through progressively weaker strategies
//! rather than failing: collaborative, then content, then trending, then
//! empty.

use crate::cold_start::TrendingRecommender;
use crate::collaborative::CollaborativeRecommender;
use crate::content_based::{FrequentlyBoughtTogether, SimilarProducts};
use crate::RecsConfig;
use commerce_insight_core::{
    CatalogStore, InteractionStore, InteractionType, RecommendationMethod, RecommendationResult,
    Result,
};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Stateless facade over the recommendation engines
pub struct RecommendationService {
    interactions: Arc<dyn InteractionStore>,
    collaborative: CollaborativeRecommender,
    similar: SimilarProducts,
    frequently_bought: FrequentlyBoughtTogether,
    trending: TrendingRecommender,
    config: RecsConfig,
}

impl RecommendationService {
    pub fn new(
        interactions: Arc<dyn InteractionStore>,
        catalog: Arc<dyn CatalogStore>,
        config: RecsConfig,
    ) -> Self {
        Self {
            collaborative: CollaborativeRecommender::new(
                Arc::clone(&interactions),
                config.clone(),
            ),
            similar: SimilarProducts::new(catalog, config.price_band),
            frequently_bought: FrequentlyBoughtTogether::new(Arc::clone(&interactions)),
            trending: TrendingRecommender::new(
                Arc::clone(&interactions),
                config.trending_lookback_days,
            ),
            interactions,
            config,
        }
    }

    /// Hybrid personalized list: a collaborative quota topped up with
    /// content matches seeded by the user's most recent view, then with
    /// trending products. Nothing the user already interacted with is
    /// returned.
    pub async fn personalized(&self, user_id: Uuid, limit: usize) -> Result<RecommendationResult> {
        let history = self
            .interactions
            .events_for_user(user_id, self.config.user_history_limit)
            .await?;

        let mut interacted: Vec<Uuid> = Vec::new();
        for event in &history {
            if !interacted.contains(&event.product_id) {
                interacted.push(event.product_id);
            }
        }

        let collaborative_quota =
            (limit as f64 * self.config.collaborative_share).ceil() as usize;
        let content_quota = limit.saturating_sub(collaborative_quota);

        let collaborative = self
            .collaborative
            .recommend(user_id, collaborative_quota, &interacted)
            .await?;

        let mut chosen = collaborative.clone();

        // Seed content matches from the most recent view, if any
        if content_quota > 0 {
            let last_viewed = history
                .iter()
                .find(|e| e.interaction_type() == InteractionType::View);
            if let Some(view) = last_viewed {
                let content = self.similar.recommend(view.product_id, content_quota).await?;
                for id in content {
                    if !chosen.contains(&id) && !interacted.contains(&id) {
                        chosen.push(id);
                    }
                }
            }
        }
        chosen.truncate(limit);

        if chosen.len() < limit {
            let mut exclude = interacted.clone();
            exclude.extend(&chosen);
            let top_up = self
                .trending
                .recommend(limit - chosen.len(), &exclude)
                .await?;
            chosen.extend(top_up);
        }

        let method = if collaborative.is_empty() {
            RecommendationMethod::ColdStart
        } else {
            RecommendationMethod::Hybrid
        };

        info!(
            %user_id,
            count = chosen.len(),
            method = ?method,
            "Generated personalized recommendations"
        );
        Ok(RecommendationResult {
            product_ids: chosen,
            method,
        })
    }

    /// Anonymous-session list: content matches seeded by the most recently
    /// viewed product, topped up with trending. Sessions without history
    /// get the trending list directly.
    pub async fn session_based(&self, session_id: &str, limit: usize) -> Result<Vec<Uuid>> {
        let history = self
            .interactions
            .events_for_session(session_id, self.config.session_history_limit)
            .await?;

        if history.is_empty() {
            info!(session_id, "New session, serving trending products");
            return self.trending.recommend(limit, &[]).await;
        }

        let mut viewed: Vec<Uuid> = Vec::new();
        for event in &history {
            if event.interaction_type() == InteractionType::View
                && !viewed.contains(&event.product_id)
            {
                viewed.push(event.product_id);
            }
        }

        let Some(&last_viewed) = viewed.first() else {
            return self.trending.recommend(limit, &viewed).await;
        };

        let mut chosen: Vec<Uuid> = self
            .similar
            .recommend(last_viewed, limit)
            .await?
            .into_iter()
            .filter(|id| !viewed.contains(id))
            .collect();

        if chosen.len() < limit {
            let mut exclude = viewed.clone();
            exclude.extend(&chosen);
            let top_up = self
                .trending
                .recommend(limit - chosen.len(), &exclude)
                .await?;
            chosen.extend(top_up);
        }
        chosen.truncate(limit);

        info!(session_id, count = chosen.len(), "Generated session recommendations");
        Ok(chosen)
    }

    /// Catalog entries similar to the given product.
    pub async fn similar_products(&self, product_id: Uuid, limit: usize) -> Result<Vec<Uuid>> {
        self.similar.recommend(product_id, limit).await
    }

    /// Products repeatedly purchased together with the given product.
    pub async fn frequently_bought_together(
        &self,
        product_id: Uuid,
        limit: usize,
    ) -> Result<Vec<Uuid>> {
        self.frequently_bought.recommend(product_id, limit).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use commerce_insight_core::{InteractionDetail, MemoryStore, Product};

    fn product(category: &str, price: f64) -> Product {
        Product {
            id: Uuid::new_v4(),
            name: format!("{} item", category),
            category: category.to_string(),
            brand: None,
            price,
            stock: 10,
            rating: None,
            is_active: true,
        }
    }

    fn purchase() -> InteractionDetail {
        InteractionDetail::Purchase {
            order_id: Uuid::new_v4(),
        }
    }

    fn service(store: Arc<MemoryStore>) -> RecommendationService {
        RecommendationService::new(
            Arc::clone(&store) as Arc<dyn InteractionStore>,
            store as Arc<dyn CatalogStore>,
            RecsConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_personalized_tags_cold_start_on_empty_catalog() {
        let store = Arc::new(MemoryStore::new());

        let result = service(store)
            .personalized(Uuid::new_v4(), 5)
            .await
            .unwrap();

        assert_eq!(result.method, RecommendationMethod::ColdStart);
        assert!(result.product_ids.is_empty());
    }

    #[tokio::test]
    async fn test_new_user_gets_trending_fallback() {
        let store = Arc::new(MemoryStore::new());
        let trending_product = Uuid::new_v4();
        store.add_event(MemoryStore::event(
            None,
            Some("s1"),
            trending_product,
            purchase(),
            Utc::now(),
        ));

        let result = service(store)
            .personalized(Uuid::new_v4(), 5)
            .await
            .unwrap();

        // The collaborative stage fell back to trending, so the list is
        // non-empty and tagged hybrid
        assert_eq!(result.method, RecommendationMethod::Hybrid);
        assert_eq!(result.product_ids, vec![trending_product]);
    }

    #[tokio::test]
    async fn test_personalized_respects_limit_and_excludes_history() {
        let store = Arc::new(MemoryStore::new());
        let user = Uuid::new_v4();
        let neighbor = Uuid::new_v4();
        let shared = Uuid::new_v4();
        let now = Utc::now();

        store.add_event(MemoryStore::event(Some(user), None, shared, purchase(), now));
        store.add_event(MemoryStore::event(Some(neighbor), None, shared, purchase(), now));
        for _ in 0..5 {
            let candidate = Uuid::new_v4();
            store.add_event(MemoryStore::event(
                Some(neighbor),
                None,
                candidate,
                purchase(),
                now,
            ));
        }

        let result = service(store).personalized(user, 3).await.unwrap();

        assert!(result.product_ids.len() <= 3);
        assert!(!result.product_ids.contains(&shared));
        let mut deduped = result.product_ids.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(deduped.len(), result.product_ids.len());
    }

    #[tokio::test]
    async fn test_personalized_tags_hybrid_when_collaborative_hits() {
        let store = Arc::new(MemoryStore::new());
        let user = Uuid::new_v4();
        let neighbor = Uuid::new_v4();
        let shared = Uuid::new_v4();
        let candidate = Uuid::new_v4();
        let now = Utc::now();

        store.add_event(MemoryStore::event(Some(user), None, shared, purchase(), now));
        store.add_event(MemoryStore::event(Some(neighbor), None, shared, purchase(), now));
        store.add_event(MemoryStore::event(Some(neighbor), None, candidate, purchase(), now));

        let result = service(store).personalized(user, 5).await.unwrap();
        assert_eq!(result.method, RecommendationMethod::Hybrid);
        assert!(result.product_ids.contains(&candidate));
    }

    #[tokio::test]
    async fn test_session_without_history_serves_trending() {
        let store = Arc::new(MemoryStore::new());
        let trending_product = Uuid::new_v4();
        store.add_event(MemoryStore::event(
            None,
            Some("other-session"),
            trending_product,
            purchase(),
            Utc::now(),
        ));

        let recs = service(store).session_based("fresh", 5).await.unwrap();
        assert_eq!(recs, vec![trending_product]);
    }

    #[tokio::test]
    async fn test_session_seeds_from_most_recent_view() {
        let store = Arc::new(MemoryStore::new());
        let viewed = product("heaters", 100.0);
        let similar = product("heaters", 110.0);
        let viewed_id = viewed.id;
        let similar_id = similar.id;
        store.add_product(viewed);
        store.add_product(similar);

        let now = Utc::now();
        store.add_event(MemoryStore::event(
            None,
            Some("s1"),
            viewed_id,
            InteractionDetail::View,
            now,
        ));
        // An older view of another product must not win the seed
        store.add_event(MemoryStore::event(
            None,
            Some("s1"),
            similar_id,
            InteractionDetail::View,
            now - Duration::hours(1),
        ));

        let recs = service(store).session_based("s1", 5).await.unwrap();
        // similar was already viewed in the session, so it is excluded
        assert!(!recs.contains(&similar_id));
        assert!(!recs.contains(&viewed_id));
    }
}
