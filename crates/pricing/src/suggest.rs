//! Rule-based price suggestion policy.
//!
//! Produces one advisory suggestion per product from its recent snapshots,
//! stock level, and seasonal factor. Rules fire in a fixed priority order:
//! scarcity beats overstock beats seasonality beats hold. Products without
//! any snapshot history get a low-confidence stock-only fallback.

use crate::elasticity::ElasticityEstimator;
use crate::sampler::PriceHistorySampler;
use crate::seasonal::seasonal_factor_for_month;
use crate::trend::TrendAnalyzer;
use crate::PricingConfig;
use chrono::{Datelike, Utc};
use commerce_insight_core::{
    math, CatalogStore, ExpectedImpact, InteractionStore, PriceHistoryStore, PriceSuggestion,
    Product, Result, SuggestionAction, TrendAnalysis,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

pub struct PricingService {
    catalog: Arc<dyn CatalogStore>,
    history: Arc<dyn PriceHistoryStore>,
    elasticity: ElasticityEstimator,
    trend: TrendAnalyzer,
    sampler: PriceHistorySampler,
    config: PricingConfig,
}

impl PricingService {
    pub fn new(
        catalog: Arc<dyn CatalogStore>,
        interactions: Arc<dyn InteractionStore>,
        history: Arc<dyn PriceHistoryStore>,
        config: PricingConfig,
    ) -> Self {
        let elasticity = ElasticityEstimator::new(
            Arc::clone(&history),
            config.elasticity_window_days,
            config.min_elasticity_samples,
        );
        let trend = TrendAnalyzer::new(Arc::clone(&history), config.min_trend_samples);
        let sampler = PriceHistorySampler::new(
            Arc::clone(&catalog),
            interactions,
            Arc::clone(&history),
            config.sampling_window_hours,
        );
        Self {
            catalog,
            history,
            elasticity,
            trend,
            sampler,
            config,
        }
    }

    /// Suggest a price for one product. `Ok(None)` for unknown products.
    pub async fn suggest_optimal_price(&self, product_id: Uuid) -> Result<Option<PriceSuggestion>> {
        self.suggest_for_month(product_id, Utc::now().month()).await
    }

    /// Same as [`suggest_optimal_price`](Self::suggest_optimal_price) but
    /// evaluated against an explicit calendar month (1-12).
    pub async fn suggest_for_month(
        &self,
        product_id: Uuid,
        month: u32,
    ) -> Result<Option<PriceSuggestion>> {
        let Some(product) = self.catalog.product(product_id).await? else {
            debug!(product_id = %product_id, "no such product, skipping suggestion");
            return Ok(None);
        };

        let samples = self
            .history
            .recent_samples(product_id, self.config.history_limit)
            .await?;
        if samples.is_empty() {
            return Ok(Some(self.stock_only_suggestion(&product)));
        }

        let avg_sales = math::mean(
            &samples
                .iter()
                .map(|s| s.sales_velocity as f64)
                .collect::<Vec<_>>(),
        );
        let avg_demand = math::mean(
            &samples
                .iter()
                .map(|s| s.demand_score as f64)
                .collect::<Vec<_>>(),
        );
        let factor = seasonal_factor_for_month(&product.category, month);

        let price = product.price;
        let stock = product.stock;

        let (suggested, reason, action, confidence) = if stock < 10 && avg_demand > 70.0 {
            // 5-15% depending on how hot demand is
            let increase = 0.05 + (avg_demand / 100.0) * 0.1;
            (
                price * (1.0 + increase),
                format!(
                    "Low stock ({}) with high demand ({}%), raising price to capture demand",
                    stock,
                    avg_demand.round()
                ),
                SuggestionAction::Increase,
                0.8,
            )
        } else if stock > 50 && avg_sales < 2.0 {
            // 10-20% depending on how deep the overstock is
            let decrease = 0.10 + (stock as f64 / 100.0) * 0.1;
            (
                price * (1.0 - decrease),
                format!(
                    "Overstocked ({}) with slow sales ({:.1}/day), lowering price to clear inventory",
                    stock, avg_sales
                ),
                SuggestionAction::Decrease,
                0.75,
            )
        } else if factor != 1.0 {
            if factor > 1.1 {
                (
                    price * factor.min(1.3),
                    format!(
                        "Peak season for \"{}\", raising price by {}%",
                        product.category,
                        ((factor - 1.0) * 100.0).round()
                    ),
                    SuggestionAction::Increase,
                    0.7,
                )
            } else if factor < 0.9 {
                (
                    price * factor.max(0.8),
                    format!(
                        "Off season for \"{}\", lowering price by {}%",
                        product.category,
                        ((1.0 - factor) * 100.0).round()
                    ),
                    SuggestionAction::Decrease,
                    0.7,
                )
            } else {
                (
                    price,
                    "Mild seasonal signal, holding current price".to_string(),
                    SuggestionAction::Maintain,
                    0.5,
                )
            }
        } else {
            (
                price,
                "Demand and stock are balanced, holding current price".to_string(),
                SuggestionAction::Maintain,
                0.6,
            )
        };

        let change = suggested - price;
        let change_percent = if price == 0.0 {
            0.0
        } else {
            change / price * 100.0
        };

        let expected_impact = if change_percent != 0.0 {
            match self.elasticity.estimate(product_id).await? {
                Some(elasticity) => {
                    let sales_change = elasticity * change_percent;
                    ExpectedImpact {
                        sales_change_percent: Some(math::round_to(sales_change, 1)),
                        revenue_change_percent: Some(math::round_to(
                            change_percent + sales_change,
                            1,
                        )),
                    }
                }
                None => ExpectedImpact::default(),
            }
        } else {
            ExpectedImpact::default()
        };

        Ok(Some(PriceSuggestion {
            product_id,
            current_price: price,
            suggested_price: suggested.round().max(0.0),
            change: change.round(),
            change_percent: math::round_to(change_percent, 1),
            reason,
            action,
            confidence: math::round_to(confidence, 2),
            expected_impact,
        }))
    }

    /// Fallback for products with no snapshot history yet
    fn stock_only_suggestion(&self, product: &Product) -> PriceSuggestion {
        let price = product.price;
        let (suggested, reason, action) = if product.stock < 5 {
            (
                price * 1.1,
                "Very low stock, raising price by 10%".to_string(),
                SuggestionAction::Increase,
            )
        } else if product.stock > 80 {
            (
                price * 0.9,
                "Overstocked, lowering price by 10% to clear inventory".to_string(),
                SuggestionAction::Decrease,
            )
        } else {
            (
                price,
                "Not enough price history, holding current price".to_string(),
                SuggestionAction::Maintain,
            )
        };

        let change = suggested - price;
        let change_percent = if price == 0.0 {
            0.0
        } else {
            change / price * 100.0
        };

        PriceSuggestion {
            product_id: product.id,
            current_price: price,
            suggested_price: suggested.round().max(0.0),
            change: change.round(),
            change_percent: math::round_to(change_percent, 1),
            reason,
            action,
            confidence: 0.3,
            expected_impact: ExpectedImpact::default(),
        }
    }

    /// Suggestions for many products, keyed by product id, keeping only
    /// those whose change magnitude clears the bulk threshold.
    pub async fn bulk_suggestions(
        &self,
        product_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, PriceSuggestion>> {
        let mut suggestions = HashMap::new();
        for product_id in product_ids {
            if let Some(suggestion) = self.suggest_optimal_price(*product_id).await? {
                if suggestion.change_percent.abs() >= self.config.bulk_change_threshold {
                    suggestions.insert(*product_id, suggestion);
                }
            }
        }
        Ok(suggestions)
    }

    /// Price trend over the configured trend window.
    pub async fn analyze_trend(&self, product_id: Uuid) -> Result<Option<TrendAnalysis>> {
        self.trend.analyze(product_id, self.config.trend_window_days).await
    }

    /// Demand elasticity over the configured elasticity window.
    pub async fn estimate_elasticity(&self, product_id: Uuid) -> Result<Option<f64>> {
        self.elasticity.estimate(product_id).await
    }

    /// Run the snapshot sampler over every active product. Returns the
    /// number of rows actually written.
    pub async fn update_price_history(&self) -> Result<usize> {
        self.sampler.run().await
    }
}
