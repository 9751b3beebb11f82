//! Commerce Insight Pricing Engine
//!
//! Dynamic price advice over periodic price/stock/demand snapshots:
//! demand elasticity estimation, seasonal category factors, OLS trend
//! analysis, and a fixed-priority rule policy that turns them into one
//! advisory suggestion per product. The engine never writes prices; the
//! catalog applies or ignores suggestions.

pub mod elasticity;
pub mod sampler;
pub mod seasonal;
pub mod suggest;
pub mod trend;

// Re-export key types
pub use elasticity::ElasticityEstimator;
pub use sampler::PriceHistorySampler;
pub use seasonal::{seasonal_factor, seasonal_factor_for_month};
pub use suggest::PricingService;
pub use trend::TrendAnalyzer;

/// Pricing engine configuration
#[derive(Debug, Clone)]
pub struct PricingConfig {
    /// Interaction window folded into each snapshot, in hours (default: 24)
    pub sampling_window_hours: i64,
    /// Snapshot window for elasticity estimation, in days (default: 60)
    pub elasticity_window_days: i64,
    /// Minimum snapshots required for an elasticity estimate (default: 10)
    pub min_elasticity_samples: usize,
    /// Default snapshot window for trend analysis, in days (default: 30)
    pub trend_window_days: i64,
    /// Minimum snapshots required for a trend verdict (default: 5)
    pub min_trend_samples: usize,
    /// Most recent snapshots consulted by the rule policy (default: 30)
    pub history_limit: usize,
    /// Minimum |change percent| kept by the bulk filter (default: 2.0)
    pub bulk_change_threshold: f64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            sampling_window_hours: 24,
            elasticity_window_days: 60,
            min_elasticity_samples: 10,
            trend_window_days: 30,
            min_trend_samples: 5,
            history_limit: 30,
            bulk_change_threshold: 2.0,
        }
    }
}
