//! Economic model behind card valuation.
//!
//! This crate holds everything the valuation engine treats as read-only
//! baseline data:
//!
//! - [`resource`] - credit conversion rates for resources, productions and tile bonuses
//! - [`statistics`] - mean final generation per player count and game quarters
//! - [`victory_point`] - the credits-per-victory-point curve
//! - [`context`] - per-generation derived values (remaining income, VP and TR worth)
//! - [`tag`] - tag frequencies used to estimate tag-triggered effects
//! - [`card`] - the card table row
//!
//! The [`Baselines`] bundle ties them together. It is built once and then
//! shared immutably by every evaluation.
//!
//! # Example
//!
//! ```
//! use tmvalue_engine::Baselines;
//!
//! let baselines = Baselines::default();
//! let context = baselines.context(2, 2).unwrap();
//!
//! assert_eq!(context.last_generation(), 13);
//! assert_eq!(context.remaining_generations(), 11);
//! assert!(context.credits_per_vp() > 0.0);
//! ```

pub use self::{
    baselines::Baselines,
    card::{CardField, CardRecord},
    context::GenerationContext,
    resource::{Production, Quantity, Resource, ResourceModel},
    statistics::{GameStatistics, Quarter},
    tag::{Tag, TagFrequency, TagStatistics},
};

mod baselines;
pub mod card;
pub mod context;
pub mod resource;
pub mod statistics;
pub mod tag;
pub mod victory_point;

/// Error raised when a (generation, player count) pair cannot be turned into a context.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum ContextError {
    #[display("no statistics for {player_count}-player games")]
    UnsupportedPlayerCount { player_count: u8 },
    #[display(
        "invalid generation {generation} for {player_count}-player games ({remaining_generations} generations remaining)"
    )]
    InvalidGeneration {
        generation: u32,
        player_count: u8,
        remaining_generations: i64,
    },
}

/// Error raised when game statistics are built from invalid data.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum StatisticsError {
    #[display("player count {player_count} is outside {min}..={max}")]
    PlayerCountOutOfRange { player_count: u8, min: u8, max: u8 },
    #[display("last generation for {player_count}-player games must be positive")]
    NonPositiveLastGeneration { player_count: u8 },
}
