//! In-memory store used by tests and local experimentation.
//!
//! Implements all three store traits over locked vectors so engines can be
//! exercised without a database.

use super::{CatalogStore, InteractionStore, PriceHistoryStore, StoreResult};
use crate::types::{
    InteractionCounts, InteractionDetail, InteractionEvent, InteractionType, PriceHistorySample,
    Product,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::RwLock;
use uuid::Uuid;

/// Single in-memory backend implementing every store trait
#[derive(Default)]
pub struct MemoryStore {
    events: RwLock<Vec<InteractionEvent>>,
    products: RwLock<Vec<Product>>,
    samples: RwLock<Vec<PriceHistorySample>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_event(&self, event: InteractionEvent) {
        self.events.write().unwrap().push(event);
    }

    pub fn add_product(&self, product: Product) {
        self.products.write().unwrap().push(product);
    }

    pub fn add_sample(&self, sample: PriceHistorySample) {
        self.samples.write().unwrap().push(sample);
    }

    pub fn sample_count(&self) -> usize {
        self.samples.read().unwrap().len()
    }

    /// Convenience constructor for an event in tests
    pub fn event(
        user_id: Option<Uuid>,
        session_id: Option<&str>,
        product_id: Uuid,
        detail: InteractionDetail,
        created_at: DateTime<Utc>,
    ) -> InteractionEvent {
        InteractionEvent {
            id: Uuid::new_v4(),
            user_id,
            session_id: session_id.map(|s| s.to_string()),
            product_id,
            detail,
            created_at,
        }
    }
}

#[async_trait]
impl InteractionStore for MemoryStore {
    async fn events_since(&self, since: DateTime<Utc>) -> StoreResult<Vec<InteractionEvent>> {
        let events = self.events.read().unwrap();
        Ok(events
            .iter()
            .filter(|e| e.created_at >= since)
            .cloned()
            .collect())
    }

    async fn events_for_user(
        &self,
        user_id: Uuid,
        limit: usize,
    ) -> StoreResult<Vec<InteractionEvent>> {
        let events = self.events.read().unwrap();
        let mut matched: Vec<InteractionEvent> = events
            .iter()
            .filter(|e| e.user_id == Some(user_id))
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        matched.truncate(limit);
        Ok(matched)
    }

    async fn events_for_session(
        &self,
        session_id: &str,
        limit: usize,
    ) -> StoreResult<Vec<InteractionEvent>> {
        let events = self.events.read().unwrap();
        let mut matched: Vec<InteractionEvent> = events
            .iter()
            .filter(|e| e.session_id.as_deref() == Some(session_id))
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        matched.truncate(limit);
        Ok(matched)
    }

    async fn purchase_events_for_product(
        &self,
        product_id: Uuid,
    ) -> StoreResult<Vec<InteractionEvent>> {
        let events = self.events.read().unwrap();
        Ok(events
            .iter()
            .filter(|e| {
                e.product_id == product_id
                    && e.interaction_type() == InteractionType::Purchase
            })
            .cloned()
            .collect())
    }

    async fn purchases_in_orders(
        &self,
        order_ids: &[Uuid],
    ) -> StoreResult<Vec<InteractionEvent>> {
        let events = self.events.read().unwrap();
        Ok(events
            .iter()
            .filter(|e| {
                e.detail
                    .order_id()
                    .map(|id| order_ids.contains(&id))
                    .unwrap_or(false)
            })
            .cloned()
            .collect())
    }

    async fn product_counts_since(
        &self,
        product_id: Uuid,
        since: DateTime<Utc>,
    ) -> StoreResult<InteractionCounts> {
        let events = self.events.read().unwrap();
        let mut counts = InteractionCounts::default();
        for event in events
            .iter()
            .filter(|e| e.product_id == product_id && e.created_at >= since)
        {
            match event.interaction_type() {
                InteractionType::View => counts.views += 1,
                InteractionType::CartAdd => counts.cart_adds += 1,
                InteractionType::Purchase => counts.purchases += 1,
                _ => {}
            }
        }
        Ok(counts)
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn product(&self, id: Uuid) -> StoreResult<Option<Product>> {
        let products = self.products.read().unwrap();
        Ok(products.iter().find(|p| p.id == id).cloned())
    }

    async fn products_in_category(&self, category: &str) -> StoreResult<Vec<Product>> {
        let products = self.products.read().unwrap();
        Ok(products
            .iter()
            .filter(|p| p.category == category)
            .cloned()
            .collect())
    }

    async fn active_products(&self) -> StoreResult<Vec<Product>> {
        let products = self.products.read().unwrap();
        Ok(products.iter().filter(|p| p.is_active).cloned().collect())
    }
}

#[async_trait]
impl PriceHistoryStore for MemoryStore {
    async fn append_sample(&self, sample: PriceHistorySample) -> StoreResult<bool> {
        let mut samples = self.samples.write().unwrap();
        let duplicate = samples.iter().any(|s| {
            s.product_id == sample.product_id
                && s.sampled_at.date_naive() == sample.sampled_at.date_naive()
        });
        if duplicate {
            return Ok(false);
        }
        samples.push(sample);
        Ok(true)
    }

    async fn samples_since(
        &self,
        product_id: Uuid,
        since: DateTime<Utc>,
    ) -> StoreResult<Vec<PriceHistorySample>> {
        let samples = self.samples.read().unwrap();
        let mut matched: Vec<PriceHistorySample> = samples
            .iter()
            .filter(|s| s.product_id == product_id && s.sampled_at >= since)
            .cloned()
            .collect();
        matched.sort_by(|a, b| a.sampled_at.cmp(&b.sampled_at));
        Ok(matched)
    }

    async fn recent_samples(
        &self,
        product_id: Uuid,
        limit: usize,
    ) -> StoreResult<Vec<PriceHistorySample>> {
        let samples = self.samples.read().unwrap();
        let mut matched: Vec<PriceHistorySample> = samples
            .iter()
            .filter(|s| s.product_id == product_id)
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.sampled_at.cmp(&a.sampled_at));
        matched.truncate(limit);
        Ok(matched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[tokio::test]
    async fn test_events_for_user_newest_first() {
        let store = MemoryStore::new();
        let user = Uuid::new_v4();
        let older = Uuid::new_v4();
        let newer = Uuid::new_v4();
        let now = Utc::now();

        store.add_event(MemoryStore::event(
            Some(user),
            None,
            older,
            InteractionDetail::View,
            now - Duration::hours(2),
        ));
        store.add_event(MemoryStore::event(
            Some(user),
            None,
            newer,
            InteractionDetail::View,
            now - Duration::hours(1),
        ));

        let events = store.events_for_user(user, 10).await.unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].product_id, newer);
        assert_eq!(events[1].product_id, older);
    }

    #[tokio::test]
    async fn test_append_sample_is_idempotent_per_day() {
        let store = MemoryStore::new();
        let product_id = Uuid::new_v4();
        let sample = PriceHistorySample {
            product_id,
            price: 100.0,
            stock: 5,
            sales_velocity: 2,
            demand_score: 40,
            sampled_at: Utc::now(),
        };

        assert!(store.append_sample(sample.clone()).await.unwrap());
        assert!(!store.append_sample(sample).await.unwrap());
        assert_eq!(store.sample_count(), 1);
    }

    #[tokio::test]
    async fn test_product_counts_since() {
        let store = MemoryStore::new();
        let product_id = Uuid::new_v4();
        let now = Utc::now();

        store.add_event(MemoryStore::event(
            None,
            Some("s1"),
            product_id,
            InteractionDetail::View,
            now,
        ));
        store.add_event(MemoryStore::event(
            None,
            Some("s1"),
            product_id,
            InteractionDetail::CartAdd,
            now,
        ));
        store.add_event(MemoryStore::event(
            Some(Uuid::new_v4()),
            None,
            product_id,
            InteractionDetail::Purchase {
                order_id: Uuid::new_v4(),
            },
            now,
        ));
        // Outside the window
        store.add_event(MemoryStore::event(
            None,
            Some("s1"),
            product_id,
            InteractionDetail::View,
            now - Duration::days(3),
        ));

        let counts = store
            .product_counts_since(product_id, now - Duration::hours(24))
            .await
            .unwrap();
        assert_eq!(counts.views, 1);
        assert_eq!(counts.cart_adds, 1);
        assert_eq!(counts.purchases, 1);
    }
}
