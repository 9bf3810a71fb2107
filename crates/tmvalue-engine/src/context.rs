//! Per-generation derived values.

use crate::{ContextError, GameStatistics, ResourceModel, victory_point};

/// Values derived from a `(generation, player count)` pair.
///
/// Every field evaluator receives one of these. A context describes exactly
/// one generation; loops over several generations build a fresh context for
/// each step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationContext {
    generation: u32,
    player_count: u8,
    last_generation: u32,
    remaining_generations: i64,
    credits_per_vp: f64,
    terraforming_rating_value: f64,
}

impl GenerationContext {
    pub fn new(
        statistics: &GameStatistics,
        resources: &ResourceModel,
        generation: u32,
        player_count: u8,
    ) -> Result<Self, ContextError> {
        let last_generation = statistics.last_generation(player_count)?;
        let credits_per_vp =
            victory_point::credits_per_vp(statistics, resources, generation, player_count)?;
        let income = f64::from(last_generation) - f64::from(generation);
        Ok(Self {
            generation,
            player_count,
            last_generation,
            remaining_generations: i64::from(last_generation) - i64::from(generation),
            credits_per_vp,
            terraforming_rating_value: credits_per_vp + income,
        })
    }

    #[must_use]
    pub const fn generation(&self) -> u32 {
        self.generation
    }

    #[must_use]
    pub const fn player_count(&self) -> u8 {
        self.player_count
    }

    #[must_use]
    pub const fn last_generation(&self) -> u32 {
        self.last_generation
    }

    /// Generations left after this one. Negative past the average game end.
    #[must_use]
    pub const fn remaining_generations(&self) -> i64 {
        self.remaining_generations
    }

    /// Remaining generations as a multiplier for production values.
    #[must_use]
    pub fn income(&self) -> f64 {
        f64::from(self.last_generation) - f64::from(self.generation)
    }

    #[must_use]
    pub const fn credits_per_vp(&self) -> f64 {
        self.credits_per_vp
    }

    /// Worth of one TR step: a victory point plus one credit per remaining generation.
    #[must_use]
    pub const fn terraforming_rating_value(&self) -> f64 {
        self.terraforming_rating_value
    }

    #[must_use]
    pub const fn is_last_generation(&self) -> bool {
        self.generation == self.last_generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_values() {
        let stats = GameStatistics::tharsis_base();
        let resources = ResourceModel::default();
        let context = GenerationContext::new(&stats, &resources, 4, 3).unwrap();

        assert_eq!(context.generation(), 4);
        assert_eq!(context.player_count(), 3);
        assert_eq!(context.last_generation(), 11);
        assert_eq!(context.remaining_generations(), 7);
        assert_eq!(context.income(), 7.0);
        assert_eq!(
            context.terraforming_rating_value(),
            context.credits_per_vp() + 7.0
        );
        assert!(!context.is_last_generation());
    }

    #[test]
    fn test_past_last_generation_has_negative_income() {
        let stats = GameStatistics::tharsis_base();
        let resources = ResourceModel::default();
        let context = GenerationContext::new(&stats, &resources, 12, 4).unwrap();
        assert_eq!(context.remaining_generations(), -2);
        assert!(context.credits_per_vp().is_finite());
    }

    #[test]
    fn test_unsupported_player_count_is_reported() {
        let stats = GameStatistics::tharsis_base();
        let resources = ResourceModel::default();
        assert_eq!(
            GenerationContext::new(&stats, &resources, 1, 7),
            Err(ContextError::UnsupportedPlayerCount { player_count: 7 })
        );
    }
}
