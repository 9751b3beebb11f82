//! PostgreSQL-backed store implementations.
//!
//! Expected tables:
//!
//! - `interactions(id, user_id, session_id, product_id, interaction_type,
//!   order_id, created_at)` — append-only event log; `order_id` is set for
//!   purchases and NULL otherwise.
//! - `products(id, name, category, brand, price, stock, rating, is_active)`
//! - `price_history(product_id, price, stock, sales_velocity, demand_score,
//!   sampled_at)` with a unique index on `(product_id, (sampled_at::date))`
//!   so repeated sampler runs within one day cannot duplicate rows.

use super::{CatalogStore, InteractionStore, PriceHistoryStore, StoreResult};
use crate::types::{
    InteractionCounts, InteractionDetail, InteractionEvent, InteractionType, PriceHistorySample,
    Product,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use tracing::warn;
use uuid::Uuid;

const EVENT_COLUMNS: &str =
    "id, user_id, session_id, product_id, interaction_type, order_id, created_at";

fn event_from_row(row: &sqlx::postgres::PgRow) -> Option<InteractionEvent> {
    let interaction_type_str: String = row.get("interaction_type");
    let order_id: Option<Uuid> = row.get("order_id");

    let detail = match InteractionType::parse(&interaction_type_str)? {
        InteractionType::View => InteractionDetail::View,
        InteractionType::CartAdd => InteractionDetail::CartAdd,
        InteractionType::CartRemove => InteractionDetail::CartRemove,
        InteractionType::Favorite => InteractionDetail::Favorite,
        InteractionType::Purchase => {
            // A purchase row without an order reference is malformed;
            // drop it rather than poison co-purchase analysis.
            let order_id = order_id?;
            InteractionDetail::Purchase { order_id }
        }
    };

    Some(InteractionEvent {
        id: row.get("id"),
        user_id: row.get("user_id"),
        session_id: row.get("session_id"),
        product_id: row.get("product_id"),
        detail,
        created_at: row.get("created_at"),
    })
}

fn events_from_rows(rows: Vec<sqlx::postgres::PgRow>) -> Vec<InteractionEvent> {
    let total = rows.len();
    let events: Vec<InteractionEvent> = rows.iter().filter_map(event_from_row).collect();
    if events.len() < total {
        warn!(
            dropped = total - events.len(),
            "Dropped malformed interaction rows"
        );
    }
    events
}

fn product_from_row(row: &sqlx::postgres::PgRow) -> Product {
    Product {
        id: row.get("id"),
        name: row.get("name"),
        category: row.get("category"),
        brand: row.get("brand"),
        price: row.get("price"),
        stock: row.get("stock"),
        rating: row.get("rating"),
        is_active: row.get("is_active"),
    }
}

fn sample_from_row(row: &sqlx::postgres::PgRow) -> PriceHistorySample {
    PriceHistorySample {
        product_id: row.get("product_id"),
        price: row.get("price"),
        stock: row.get("stock"),
        sales_velocity: row.get("sales_velocity"),
        demand_score: row.get("demand_score"),
        sampled_at: row.get("sampled_at"),
    }
}

/// Interaction log backed by the `interactions` table
#[derive(Clone)]
pub struct PostgresInteractionStore {
    pool: PgPool,
}

impl PostgresInteractionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InteractionStore for PostgresInteractionStore {
    async fn events_since(&self, since: DateTime<Utc>) -> StoreResult<Vec<InteractionEvent>> {
        let rows = sqlx::query(&format!(
            "SELECT {EVENT_COLUMNS} FROM interactions WHERE created_at >= $1"
        ))
        .bind(since)
        .fetch_all(&self.pool)
        .await?;

        Ok(events_from_rows(rows))
    }

    async fn events_for_user(
        &self,
        user_id: Uuid,
        limit: usize,
    ) -> StoreResult<Vec<InteractionEvent>> {
        let rows = sqlx::query(&format!(
            "SELECT {EVENT_COLUMNS} FROM interactions \
             WHERE user_id = $1 ORDER BY created_at DESC LIMIT $2"
        ))
        .bind(user_id)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(events_from_rows(rows))
    }

    async fn events_for_session(
        &self,
        session_id: &str,
        limit: usize,
    ) -> StoreResult<Vec<InteractionEvent>> {
        let rows = sqlx::query(&format!(
            "SELECT {EVENT_COLUMNS} FROM interactions \
             WHERE session_id = $1 ORDER BY created_at DESC LIMIT $2"
        ))
        .bind(session_id)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(events_from_rows(rows))
    }

    async fn purchase_events_for_product(
        &self,
        product_id: Uuid,
    ) -> StoreResult<Vec<InteractionEvent>> {
        let rows = sqlx::query(&format!(
            "SELECT {EVENT_COLUMNS} FROM interactions \
             WHERE product_id = $1 AND interaction_type = 'purchase'"
        ))
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(events_from_rows(rows))
    }

    async fn purchases_in_orders(
        &self,
        order_ids: &[Uuid],
    ) -> StoreResult<Vec<InteractionEvent>> {
        if order_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query(&format!(
            "SELECT {EVENT_COLUMNS} FROM interactions \
             WHERE interaction_type = 'purchase' AND order_id = ANY($1)"
        ))
        .bind(order_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(events_from_rows(rows))
    }

    async fn product_counts_since(
        &self,
        product_id: Uuid,
        since: DateTime<Utc>,
    ) -> StoreResult<InteractionCounts> {
        let row = sqlx::query(
            r#"
            SELECT
                COUNT(*) FILTER (WHERE interaction_type = 'view') AS views,
                COUNT(*) FILTER (WHERE interaction_type = 'cart_add') AS cart_adds,
                COUNT(*) FILTER (WHERE interaction_type = 'purchase') AS purchases
            FROM interactions
            WHERE product_id = $1 AND created_at >= $2
            "#,
        )
        .bind(product_id)
        .bind(since)
        .fetch_one(&self.pool)
        .await?;

        Ok(InteractionCounts {
            views: row.get("views"),
            cart_adds: row.get("cart_adds"),
            purchases: row.get("purchases"),
        })
    }
}

/// Catalog reader backed by the `products` table
#[derive(Clone)]
pub struct PostgresCatalogStore {
    pool: PgPool,
}

impl PostgresCatalogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogStore for PostgresCatalogStore {
    async fn product(&self, id: Uuid) -> StoreResult<Option<Product>> {
        let row = sqlx::query(
            "SELECT id, name, category, brand, price, stock, rating, is_active \
             FROM products WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(product_from_row))
    }

    async fn products_in_category(&self, category: &str) -> StoreResult<Vec<Product>> {
        let rows = sqlx::query(
            "SELECT id, name, category, brand, price, stock, rating, is_active \
             FROM products WHERE category = $1",
        )
        .bind(category)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(product_from_row).collect())
    }

    async fn active_products(&self) -> StoreResult<Vec<Product>> {
        let rows = sqlx::query(
            "SELECT id, name, category, brand, price, stock, rating, is_active \
             FROM products WHERE is_active",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(product_from_row).collect())
    }
}

/// Price history backed by the `price_history` table
#[derive(Clone)]
pub struct PostgresPriceHistoryStore {
    pool: PgPool,
}

impl PostgresPriceHistoryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PriceHistoryStore for PostgresPriceHistoryStore {
    async fn append_sample(&self, sample: PriceHistorySample) -> StoreResult<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO price_history
                (product_id, price, stock, sales_velocity, demand_score, sampled_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (product_id, (sampled_at::date)) DO NOTHING
            "#,
        )
        .bind(sample.product_id)
        .bind(sample.price)
        .bind(sample.stock)
        .bind(sample.sales_velocity)
        .bind(sample.demand_score)
        .bind(sample.sampled_at)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn samples_since(
        &self,
        product_id: Uuid,
        since: DateTime<Utc>,
    ) -> StoreResult<Vec<PriceHistorySample>> {
        let rows = sqlx::query(
            "SELECT product_id, price, stock, sales_velocity, demand_score, sampled_at \
             FROM price_history \
             WHERE product_id = $1 AND sampled_at >= $2 \
             ORDER BY sampled_at ASC",
        )
        .bind(product_id)
        .bind(since)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(sample_from_row).collect())
    }

    async fn recent_samples(
        &self,
        product_id: Uuid,
        limit: usize,
    ) -> StoreResult<Vec<PriceHistorySample>> {
        let rows = sqlx::query(
            "SELECT product_id, price, stock, sales_velocity, demand_score, sampled_at \
             FROM price_history \
             WHERE product_id = $1 \
             ORDER BY sampled_at DESC LIMIT $2",
        )
        .bind(product_id)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(sample_from_row).collect())
    }
}
