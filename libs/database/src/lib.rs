//! Database connection helpers for the marketplace services.
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │ database                                 │
//! │                                          │
//! │  common/   retry with backoff, errors    │
//! │  mongodb/  config, connect, ping health  │
//! └──────────────────────────────────────────┘
//! ```
//!
//! The `mongodb` feature is enabled by default. Enable `config` to load
//! [`mongodb::MongoConfig`] from environment variables via `core_config::FromEnv`.
//!
//! ```ignore
//! use core_config::FromEnv;
//! use database::mongodb::{MongoConfig, connect_from_config_with_retry};
//!
//! let config = MongoConfig::from_env()?;
//! let client = connect_from_config_with_retry(&config, None).await?;
//! let db = client.database(config.database());
//! ```

pub mod common;

#[cfg(feature = "mongodb")]
pub mod mongodb;

pub use common::{DatabaseError, DatabaseResult, RetryConfig, retry, retry_with_backoff};
