//! Price trend analysis over stored snapshots.
//!
//! Fits an ordinary least squares line through the price series (oldest
//! first) and classifies the slope relative to the average price.

use chrono::{Duration, Utc};
use commerce_insight_core::{math, PriceHistoryStore, PriceTrend, Result, TrendAnalysis};
use std::sync::Arc;
use uuid::Uuid;

/// Slope-per-average-price beyond which a series counts as moving, in
/// percent per snapshot.
const SLOPE_THRESHOLD_PERCENT: f64 = 0.05;

/// Slope percent at which trend strength saturates at 1.0
const STRENGTH_SATURATION_PERCENT: f64 = 5.0;

pub struct TrendAnalyzer {
    history: Arc<dyn PriceHistoryStore>,
    min_samples: usize,
}

impl TrendAnalyzer {
    pub fn new(history: Arc<dyn PriceHistoryStore>, min_samples: usize) -> Self {
        Self {
            history,
            min_samples,
        }
    }

    /// Analyze the price trend over the trailing `days`.
    ///
    /// Returns `Ok(None)` when the window holds too few snapshots for a
    /// verdict.
    pub async fn analyze(&self, product_id: Uuid, days: i64) -> Result<Option<TrendAnalysis>> {
        let since = Utc::now() - Duration::days(days);
        let samples = self.history.samples_since(product_id, since).await?;

        if samples.len() < self.min_samples {
            return Ok(None);
        }

        let prices: Vec<f64> = samples.iter().map(|s| s.price).collect();
        let avg_price = math::mean(&prices);
        if avg_price == 0.0 {
            return Ok(None);
        }
        let min_price = prices.iter().cloned().fold(f64::INFINITY, f64::min);
        let max_price = prices.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

        let slope = math::ols_slope(&prices).unwrap_or(0.0);
        let slope_percent = slope / avg_price * 100.0;

        let trend = if slope_percent > SLOPE_THRESHOLD_PERCENT {
            PriceTrend::Up
        } else if slope_percent < -SLOPE_THRESHOLD_PERCENT {
            PriceTrend::Down
        } else {
            PriceTrend::Stable
        };

        Ok(Some(TrendAnalysis {
            trend,
            trend_strength: math::round_to(
                (slope_percent.abs() / STRENGTH_SATURATION_PERCENT).min(1.0),
                2,
            ),
            avg_price: avg_price.round(),
            min_price: min_price.round(),
            max_price: max_price.round(),
            volatility: math::round_to(math::population_std_dev(&prices) / avg_price, 3),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use commerce_insight_core::{MemoryStore, PriceHistorySample};

    fn seed_prices(store: &MemoryStore, product_id: Uuid, prices: &[f64]) {
        let now = Utc::now();
        for (i, price) in prices.iter().enumerate() {
            store.add_sample(PriceHistorySample {
                product_id,
                price: *price,
                stock: 10,
                sales_velocity: 1,
                demand_score: 50,
                sampled_at: now - Duration::days((prices.len() - i) as i64),
            });
        }
    }

    fn analyzer(store: &Arc<MemoryStore>) -> TrendAnalyzer {
        TrendAnalyzer::new(Arc::clone(store) as Arc<dyn PriceHistoryStore>, 5)
    }

    #[tokio::test]
    async fn test_rising_series_trends_up() {
        let store = Arc::new(MemoryStore::new());
        let product_id = Uuid::new_v4();
        let prices: Vec<f64> = (0..10).map(|i| 100.0 + i as f64 * 3.0).collect();
        seed_prices(&store, product_id, &prices);

        let analysis = analyzer(&store).analyze(product_id, 30).await.unwrap().unwrap();
        assert_eq!(analysis.trend, PriceTrend::Up);
        assert!(analysis.trend_strength > 0.0);
        assert_eq!(analysis.min_price, 100.0);
        assert_eq!(analysis.max_price, 127.0);
    }

    #[tokio::test]
    async fn test_flat_series_is_stable_with_zero_volatility() {
        let store = Arc::new(MemoryStore::new());
        let product_id = Uuid::new_v4();
        seed_prices(&store, product_id, &[80.0; 8]);

        let analysis = analyzer(&store).analyze(product_id, 30).await.unwrap().unwrap();
        assert_eq!(analysis.trend, PriceTrend::Stable);
        assert_eq!(analysis.trend_strength, 0.0);
        assert_eq!(analysis.volatility, 0.0);
        assert_eq!(analysis.avg_price, 80.0);
    }

    #[tokio::test]
    async fn test_falling_series_trends_down() {
        let store = Arc::new(MemoryStore::new());
        let product_id = Uuid::new_v4();
        let prices: Vec<f64> = (0..10).map(|i| 200.0 - i as f64 * 4.0).collect();
        seed_prices(&store, product_id, &prices);

        let analysis = analyzer(&store).analyze(product_id, 30).await.unwrap().unwrap();
        assert_eq!(analysis.trend, PriceTrend::Down);
    }

    #[tokio::test]
    async fn test_too_few_samples_yields_none() {
        let store = Arc::new(MemoryStore::new());
        let product_id = Uuid::new_v4();
        seed_prices(&store, product_id, &[100.0, 101.0, 102.0, 103.0]);

        assert!(analyzer(&store).analyze(product_id, 30).await.unwrap().is_none());
    }
}
