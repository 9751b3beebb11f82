//! Content-based matching against the catalog.
//!
//! Similar products are catalog entries in the same category priced within
//! a band of the source product. Ranking beyond the category + price-band
//! match is deliberately not attempted. Frequently-bought-together is
//! derived from the typed order ids carried by purchase events.

use commerce_insight_core::{CatalogStore, InteractionStore, Result};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Minimum number of shared orders for a co-purchase pairing to qualify
const MIN_CO_OCCURRENCES: usize = 2;

/// Category and price-band similar-product matcher
pub struct SimilarProducts {
    catalog: Arc<dyn CatalogStore>,
    price_band: f64,
}

impl SimilarProducts {
    pub fn new(catalog: Arc<dyn CatalogStore>, price_band: f64) -> Self {
        Self { catalog, price_band }
    }

    /// Up to `limit` products in the source's category priced within the
    /// band. Unknown product ids yield an empty list.
    pub async fn recommend(&self, product_id: Uuid, limit: usize) -> Result<Vec<Uuid>> {
        let Some(source) = self.catalog.product(product_id).await? else {
            debug!(%product_id, "Similar-products lookup for unknown product");
            return Ok(Vec::new());
        };

        let min_price = source.price * (1.0 - self.price_band);
        let max_price = source.price * (1.0 + self.price_band);

        let mut matches: Vec<Uuid> = self
            .catalog
            .products_in_category(&source.category)
            .await?
            .into_iter()
            .filter(|p| p.id != product_id && p.price >= min_price && p.price <= max_price)
            .map(|p| p.id)
            .collect();
        matches.truncate(limit);

        debug!(
            %product_id,
            category = %source.category,
            count = matches.len(),
            "Found similar products"
        );
        Ok(matches)
    }
}

/// Co-purchase recommender over order-level purchase groupings
pub struct FrequentlyBoughtTogether {
    interactions: Arc<dyn InteractionStore>,
}

impl FrequentlyBoughtTogether {
    pub fn new(interactions: Arc<dyn InteractionStore>) -> Self {
        Self { interactions }
    }

    /// Products purchased alongside `product_id` in at least two distinct
    /// orders, most frequent first.
    pub async fn recommend(&self, product_id: Uuid, limit: usize) -> Result<Vec<Uuid>> {
        let purchases = self
            .interactions
            .purchase_events_for_product(product_id)
            .await?;

        let order_ids: Vec<Uuid> = purchases
            .iter()
            .filter_map(|e| e.detail.order_id())
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();

        if order_ids.is_empty() {
            return Ok(Vec::new());
        }

        // Distinct orders each co-purchased product appears in
        let co_purchases = self.interactions.purchases_in_orders(&order_ids).await?;
        let mut order_sets: HashMap<Uuid, HashSet<Uuid>> = HashMap::new();
        for event in &co_purchases {
            if event.product_id == product_id {
                continue;
            }
            if let Some(order_id) = event.detail.order_id() {
                order_sets.entry(event.product_id).or_default().insert(order_id);
            }
        }

        let mut ranked: Vec<(Uuid, usize)> = order_sets
            .into_iter()
            .map(|(id, orders)| (id, orders.len()))
            .filter(|(_, count)| *count >= MIN_CO_OCCURRENCES)
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked.truncate(limit);

        debug!(%product_id, count = ranked.len(), "Found co-purchased products");
        Ok(ranked.into_iter().map(|(id, _)| id).collect())
    }
}
