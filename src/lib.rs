// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Wellness Tracker
//!
//! Core of a personal wellness app: daily goals, progress statistics and a
//! rule-based estimate of lifestyle health risks.
//!
//! ## Features
//!
//! - **Goal tracking**: default goals scaled to the user's activity level,
//!   custom goals, quick logging and activity shortcuts
//! - **Progress analytics**: today/week/month completion, plan adherence
//!   and completion streaks over a rolling 90-day history
//! - **Risk estimation**: a fixed catalog of nine risks derived from age,
//!   activity level and goal compliance, aggregated per body system
//! - **Persistence**: the state tree saved as one versioned JSON document
//!   to a file or a SQLite database
//!
//! ## Architecture
//!
//! - **Models**: shared data types
//! - **Intelligence**: pure calculators (risk engine, progress aggregator, goal catalog)
//! - **Store**: the single-writer state tree and its actions
//! - **Storage**: async persistence backends
//! - **Config**: configuration loading and validation
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use chrono::Utc;
//! use wellness_tracker::config::Config;
//! use wellness_tracker::store::Store;
//! use wellness_tracker::storage::create_persistor;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load(None)?;
//!     let persistor = create_persistor(&config.storage).await?;
//!
//!     let state = persistor.rehydrate().await?;
//!     let mut store = Store::from_state(state, config.tracking.clone());
//!
//!     let now = Utc::now();
//!     store.sync(now);
//!     let stats = store.progress_stats(now.date_naive());
//!     println!("Today: {:.0}%", stats.today.percentage);
//!
//!     persistor.persist(store.state()).await?;
//!     Ok(())
//! }
//! ```

/// Common data models
pub mod models;

/// Configuration management and persistence
pub mod config;

/// Domain constants and environment lookups
pub mod constants;

/// Risk estimation, progress statistics and the goal catalog
pub mod intelligence;

/// Onboarding form validation
pub mod validation;

/// Application state tree and actions
pub mod store;

/// State persistence backends
pub mod storage;

/// Structured logging setup
pub mod logging;
