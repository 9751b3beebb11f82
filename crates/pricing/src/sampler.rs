//! Periodic price/stock/demand snapshot job.
//!
//! Runs over every active product, folds the trailing interaction window
//! into a sales velocity and a bounded demand score, and appends one
//! snapshot per product. Appends are idempotent per (product, day), so a
//! rerun within the same day writes nothing.

use chrono::{DateTime, Duration, Utc};
use commerce_insight_core::{
    CatalogStore, InteractionStore, PriceHistorySample, PriceHistoryStore, Result,
};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

const DEMAND_SCORE_CAP: i64 = 100;
const VIEW_POINTS: i64 = 1;
const CART_ADD_POINTS: i64 = 5;
const PURCHASE_POINTS: i64 = 10;

pub struct PriceHistorySampler {
    catalog: Arc<dyn CatalogStore>,
    interactions: Arc<dyn InteractionStore>,
    history: Arc<dyn PriceHistoryStore>,
    window_hours: i64,
}

impl PriceHistorySampler {
    pub fn new(
        catalog: Arc<dyn CatalogStore>,
        interactions: Arc<dyn InteractionStore>,
        history: Arc<dyn PriceHistoryStore>,
        window_hours: i64,
    ) -> Self {
        Self {
            catalog,
            interactions,
            history,
            window_hours,
        }
    }

    /// Snapshot every active product. Returns the number of rows actually
    /// written.
    pub async fn run(&self) -> Result<usize> {
        let products = self.catalog.active_products().await?;
        let sampled_at = Utc::now();
        let mut written = 0;

        for product in &products {
            let sample = self
                .snapshot(product.id, product.price, product.stock, sampled_at)
                .await?;
            if self.history.append_sample(sample).await? {
                written += 1;
            } else {
                debug!(product_id = %product.id, "snapshot already taken today");
            }
        }

        info!(
            products = products.len(),
            written, "price history sampling complete"
        );
        Ok(written)
    }

    async fn snapshot(
        &self,
        product_id: Uuid,
        price: f64,
        stock: i32,
        sampled_at: DateTime<Utc>,
    ) -> Result<PriceHistorySample> {
        let since = sampled_at - Duration::hours(self.window_hours);
        let counts = self.interactions.product_counts_since(product_id, since).await?;

        let raw_score = counts.views * VIEW_POINTS
            + counts.cart_adds * CART_ADD_POINTS
            + counts.purchases * PURCHASE_POINTS;

        Ok(PriceHistorySample {
            product_id,
            price,
            stock,
            sales_velocity: counts.purchases,
            demand_score: raw_score.min(DEMAND_SCORE_CAP),
            sampled_at,
        })
    }
}
