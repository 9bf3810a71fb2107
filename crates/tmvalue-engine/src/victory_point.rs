//! Credits-per-victory-point curve.
//!
//! A victory point is priced through the three terraforming standard
//! projects. Each raises the terraforming rating (TR), which scores one
//! point but also pays one credit per remaining generation, so that income
//! is deducted from the project cost first. The tile placed by an ocean or a
//! greenery also refunds its expected placement bonus, and a greenery scores
//! twice (TR plus the tile itself).
//!
//! ```text
//! temp_ppc     = 1 / (14 - income)
//! ocean_ppc    = 1 / (18 - income - tile_ocean)
//! greenery_ppc = 2 / (23 - income - tile_land)
//! ppc          = (temp_ppc + ocean_ppc + greenery_ppc) / 4
//! credits_per_vp = 1 / ppc
//! ```
//!
//! The sum is divided by four, not three. This weighting is part of the
//! calibrated model and must be kept.
//!
//! The value of a VP therefore changes over time: late in the game TR income
//! is worth little, projects cost more per point, and so do points.

use crate::{
    ContextError, GameStatistics,
    resource::{GREENERY, OCEAN, ResourceModel, TEMP},
};

/// Computes credits per VP for a number of remaining generations.
///
/// Returns `None` when any standard project would cost nothing or less after
/// deducting income, which makes the curve meaningless.
#[must_use]
pub fn credits_per_vp_for_income(resources: &ResourceModel, income: f64) -> Option<f64> {
    let temp_cost = TEMP - income;
    let ocean_cost = OCEAN - income - resources.tile_ocean();
    let greenery_cost = GREENERY - income - resources.tile_land();
    if temp_cost <= 0.0 || ocean_cost <= 0.0 || greenery_cost <= 0.0 {
        return None;
    }

    let temp_ppc = 1.0 / temp_cost;
    let ocean_ppc = 1.0 / ocean_cost;
    let greenery_ppc = 2.0 / greenery_cost;
    let ppc = (temp_ppc + ocean_ppc + greenery_ppc) / 4.0;
    Some(1.0 / ppc)
}

/// Computes credits per VP when playing at `generation` in a `player_count` game.
///
/// # Example
///
/// ```
/// use tmvalue_engine::{GameStatistics, ResourceModel, victory_point::credits_per_vp};
///
/// let stats = GameStatistics::tharsis_base();
/// let resources = ResourceModel::default();
/// let early = credits_per_vp(&stats, &resources, 2, 2).unwrap();
/// let late = credits_per_vp(&stats, &resources, 11, 2).unwrap();
/// assert!(early < late);
/// ```
pub fn credits_per_vp(
    statistics: &GameStatistics,
    resources: &ResourceModel,
    generation: u32,
    player_count: u8,
) -> Result<f64, ContextError> {
    let last_generation = statistics.last_generation(player_count)?;
    let remaining_generations = i64::from(last_generation) - i64::from(generation);
    let income = f64::from(last_generation) - f64::from(generation);
    if generation == 0 {
        return Err(ContextError::InvalidGeneration {
            generation,
            player_count,
            remaining_generations,
        });
    }
    credits_per_vp_for_income(resources, income).ok_or(ContextError::InvalidGeneration {
        generation,
        player_count,
        remaining_generations,
    })
}
