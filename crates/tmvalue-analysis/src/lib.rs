//! Derivation of valuation baselines from raw data.
//!
//! The valuation engine only consumes summarized, immutable baselines. This
//! crate produces them:
//!
//! - [`game_log`]: rows of the historical games table and the filter that
//!   selects comparable games (base game on Tharsis by default)
//! - [`game_length`]: mean final generation per player count, turned into
//!   [`GameStatistics`](tmvalue_engine::GameStatistics)
//! - [`tag_stats`]: tag frequencies of a card table, turned into
//!   [`TagStatistics`](tmvalue_engine::TagStatistics)
//!
//! # Example
//!
//! ```
//! use tmvalue_analysis::{
//!     game_length::game_statistics,
//!     game_log::{GameFilter, GameRecord},
//! };
//!
//! let games = [
//!     GameRecord::base(2, 12),
//!     GameRecord::base(2, 14),
//!     GameRecord::base(3, 11),
//! ];
//! let stats = game_statistics(&games, &GameFilter::default()).unwrap();
//! assert_eq!(stats.last_generation(2).unwrap(), 13);
//! assert_eq!(stats.last_generation(3).unwrap(), 11);
//! assert!(stats.last_generation(4).is_err());
//! ```

pub mod game_length;
pub mod game_log;
pub mod tag_stats;
