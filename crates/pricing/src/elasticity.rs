//! Demand elasticity estimation from price history snapshots.
//!
//! Splits the snapshot window into an older and a newer half and compares
//! average price against average sales velocity across the two halves.
//! Negative values mean demand falls when price rises, which is the
//! ordinary case for catalog goods.

use chrono::{Duration, Utc};
use commerce_insight_core::{math, PriceHistoryStore, Result};
use std::sync::Arc;
use uuid::Uuid;

/// Two-halves elasticity estimator over stored snapshots
pub struct ElasticityEstimator {
    history: Arc<dyn PriceHistoryStore>,
    window_days: i64,
    min_samples: usize,
}

impl ElasticityEstimator {
    pub fn new(history: Arc<dyn PriceHistoryStore>, window_days: i64, min_samples: usize) -> Self {
        Self {
            history,
            window_days,
            min_samples,
        }
    }

    /// Estimate price elasticity of demand for one product.
    ///
    /// Returns `Ok(None)` when the window holds too few snapshots or the
    /// older half is degenerate (zero average price or sales, or no price
    /// movement between halves).
    pub async fn estimate(&self, product_id: Uuid) -> Result<Option<f64>> {
        let since = Utc::now() - Duration::days(self.window_days);
        let samples = self.history.samples_since(product_id, since).await?;

        if samples.len() < self.min_samples {
            return Ok(None);
        }

        let midpoint = samples.len() / 2;
        let (older, newer) = samples.split_at(midpoint);

        let avg_price_older = math::mean(&older.iter().map(|s| s.price).collect::<Vec<_>>());
        let avg_sales_older =
            math::mean(&older.iter().map(|s| s.sales_velocity as f64).collect::<Vec<_>>());
        let avg_price_newer = math::mean(&newer.iter().map(|s| s.price).collect::<Vec<_>>());
        let avg_sales_newer =
            math::mean(&newer.iter().map(|s| s.sales_velocity as f64).collect::<Vec<_>>());

        if avg_price_older == 0.0 || avg_sales_older == 0.0 {
            return Ok(None);
        }

        let price_change = (avg_price_newer - avg_price_older) / avg_price_older;
        if price_change == 0.0 {
            return Ok(None);
        }
        let sales_change = (avg_sales_newer - avg_sales_older) / avg_sales_older;

        Ok(Some(sales_change / price_change))
    }
}
