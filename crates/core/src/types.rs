//! Core domain types shared by the recommendation and pricing services.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of customer action recorded against a product
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionType {
    View,
    CartAdd,
    CartRemove,
    Favorite,
    Purchase,
}

impl InteractionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InteractionType::View => "view",
            InteractionType::CartAdd => "cart_add",
            InteractionType::CartRemove => "cart_remove",
            InteractionType::Favorite => "favorite",
            InteractionType::Purchase => "purchase",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "view" => Some(InteractionType::View),
            "cart_add" => Some(InteractionType::CartAdd),
            "cart_remove" => Some(InteractionType::CartRemove),
            "favorite" => Some(InteractionType::Favorite),
            "purchase" => Some(InteractionType::Purchase),
            _ => None,
        }
    }
}

/// Typed per-interaction payload, keyed by the interaction kind.
///
/// Purchases always carry the order they belong to; the remaining kinds
/// carry nothing. This replaces a free-form metadata bag so co-purchase
/// analysis never has to guess at the order id shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InteractionDetail {
    View,
    CartAdd,
    CartRemove,
    Favorite,
    Purchase { order_id: Uuid },
}

impl InteractionDetail {
    pub fn interaction_type(&self) -> InteractionType {
        match self {
            InteractionDetail::View => InteractionType::View,
            InteractionDetail::CartAdd => InteractionType::CartAdd,
            InteractionDetail::CartRemove => InteractionType::CartRemove,
            InteractionDetail::Favorite => InteractionType::Favorite,
            InteractionDetail::Purchase { .. } => InteractionType::Purchase,
        }
    }

    pub fn order_id(&self) -> Option<Uuid> {
        match self {
            InteractionDetail::Purchase { order_id } => Some(*order_id),
            _ => None,
        }
    }
}

/// Append-only record of a user or session action on a product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractionEvent {
    pub id: Uuid,
    /// Absent for anonymous visitors
    pub user_id: Option<Uuid>,
    /// Absent for authenticated requests without a session cookie
    pub session_id: Option<String>,
    pub product_id: Uuid,
    pub detail: InteractionDetail,
    pub created_at: DateTime<Utc>,
}

impl InteractionEvent {
    pub fn interaction_type(&self) -> InteractionType {
        self.detail.interaction_type()
    }
}

/// Catalog product record, read-only to the analytics core
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub brand: Option<String>,
    pub price: f64,
    pub stock: i32,
    pub rating: Option<f64>,
    pub is_active: bool,
}

/// One price/stock/demand snapshot per product per sampler run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceHistorySample {
    pub product_id: Uuid,
    pub price: f64,
    pub stock: i32,
    /// Purchases counted over the sampling window
    pub sales_velocity: i64,
    /// Bounded demand proxy, always within [0, 100]
    pub demand_score: i64,
    pub sampled_at: DateTime<Utc>,
}

/// Per-product interaction counts over a time window
#[derive(Debug, Clone, Copy, Default)]
pub struct InteractionCounts {
    pub views: i64,
    pub cart_adds: i64,
    pub purchases: i64,
}

/// Strategy that produced a recommendation list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationMethod {
    Collaborative,
    Hybrid,
    ContentBased,
    ColdStart,
    Session,
}

/// Ordered, duplicate-free recommendation list plus its method tag
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationResult {
    pub product_ids: Vec<Uuid>,
    pub method: RecommendationMethod,
}

/// Direction of a price suggestion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionAction {
    Increase,
    Decrease,
    Maintain,
}

/// Projected effect of applying a suggestion; `None` means undetermined
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ExpectedImpact {
    pub sales_change_percent: Option<f64>,
    pub revenue_change_percent: Option<f64>,
}

/// Advisory price suggestion; the catalog decides whether to apply it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceSuggestion {
    pub product_id: Uuid,
    pub current_price: f64,
    /// Rounded to the nearest integer currency unit, never negative
    pub suggested_price: f64,
    pub change: f64,
    /// Rounded to one decimal
    pub change_percent: f64,
    pub reason: String,
    pub action: SuggestionAction,
    /// Rounded to two decimals, within [0, 1]
    pub confidence: f64,
    pub expected_impact: ExpectedImpact,
}

/// Direction of a price series over the analysis window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceTrend {
    Up,
    Down,
    Stable,
}

/// Summary statistics of a product's price series
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendAnalysis {
    pub trend: PriceTrend,
    /// Normalized slope magnitude in [0, 1]
    pub trend_strength: f64,
    pub avg_price: f64,
    pub min_price: f64,
    pub max_price: f64,
    /// Population standard deviation over the mean price
    pub volatility: f64,
}
