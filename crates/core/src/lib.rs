//! # Commerce Insight Core
//!
//! Shared building blocks for the catalog analytics services: domain types,
//! error handling, configuration, the PostgreSQL pool, math utilities, and
//! the store traits the engines are built against.
//!
//! ## Modules
//!
//! - `types`: domain model (interaction events, products, price snapshots,
//!   recommendation and suggestion results)
//! - `error`: workspace error type
//! - `config`: configuration loading and validation
//! - `database`: shared PostgreSQL connection pool
//! - `math`: sparse cosine similarity and time-series statistics
//! - `store`: data-access traits plus Postgres and in-memory backends

pub mod config;
pub mod database;
pub mod error;
pub mod math;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use config::{load_dotenv, ConfigLoader, DatabaseConfig, ServiceConfig};
pub use database::{DatabasePool, PoolStats};
pub use error::CommerceInsightError;
pub use math::{mean, ols_slope, population_std_dev, round_to, sparse_cosine_similarity};
pub use store::{
    CatalogStore, InteractionStore, MemoryStore, PostgresCatalogStore, PostgresInteractionStore,
    PostgresPriceHistoryStore, PriceHistoryStore,
};
pub use types::*;

/// Result type alias for Commerce Insight operations
pub type Result<T> = std::result::Result<T, CommerceInsightError>;
