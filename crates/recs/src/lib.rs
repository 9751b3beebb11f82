//! Commerce Insight Recommendation Engine
//!
//! Hybrid product recommendations over the interaction log: user-user
//! collaborative filtering with a trending-product cold-start fallback,
//! category/price-band content matching, co-purchase analysis, and the
//! personalized and session-level facades the storefront consumes.
//!
//! Every engine is stateless: it takes its store handles at construction
//! and recomputes from fresh data on every call, so results always reflect
//! the latest interactions.

pub mod cold_start;
pub mod collaborative;
pub mod content_based;
pub mod matrix;
pub mod recommendation;

// Re-export key types
pub use cold_start::TrendingRecommender;
pub use collaborative::CollaborativeRecommender;
pub use content_based::{FrequentlyBoughtTogether, SimilarProducts};
pub use matrix::{interaction_weight, UserItemMatrixBuilder, UserVector};
pub use recommendation::RecommendationService;

/// Recommendation engine configuration
#[derive(Debug, Clone)]
pub struct RecsConfig {
    /// Event window for the user-item matrix, in days (default: 90)
    pub matrix_lookback_days: i64,
    /// Event window for trending products, in days (default: 30)
    pub trending_lookback_days: i64,
    /// Minimum user-user similarity for a neighbor to count (default: 0.1)
    pub similarity_threshold: f64,
    /// Neighbors aggregated per collaborative request (default: 10)
    pub neighbor_count: usize,
    /// Recent events considered per user for exclusion (default: 50)
    pub user_history_limit: usize,
    /// Recent events considered per anonymous session (default: 20)
    pub session_history_limit: usize,
    /// Fraction of a hybrid request served collaboratively (default: 0.7)
    pub collaborative_share: f64,
    /// Price band for content matches, as a fraction (default: 0.3 = ±30%)
    pub price_band: f64,
}

impl Default for RecsConfig {
    fn default() -> Self {
        Self {
            matrix_lookback_days: 90,
            trending_lookback_days: 30,
            similarity_threshold: 0.1,
            neighbor_count: 10,
            user_history_limit: 50,
            session_history_limit: 20,
            collaborative_share: 0.7,
            price_band: 0.3,
        }
    }
}
