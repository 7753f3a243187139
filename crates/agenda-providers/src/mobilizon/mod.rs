//! Mobilizon GraphQL source.
//!
//! Two query shapes are used: the total number of events a group
//! organizes, and one page of those events starting after a given instant.
//!
//! ```ignore
//! use agenda_providers::mobilizon::{MobilizonClient, MobilizonConfig};
//!
//! let client = MobilizonClient::new(MobilizonConfig::new("https://mobilizon.fr")?)?;
//! let total = client.count_events("my_group").await?;
//! ```

#[cfg(feature = "http")]
mod client;
mod config;
pub mod query;

#[cfg(feature = "http")]
pub use client::MobilizonClient;
pub use config::{MobilizonConfig, api_url, default_user_agent};
