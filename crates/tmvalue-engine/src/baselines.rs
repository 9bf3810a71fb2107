use crate::{ContextError, GameStatistics, GenerationContext, ResourceModel, TagStatistics};

/// Read-only data every valuation depends on.
///
/// Built once before any evaluation starts and never mutated afterwards, so
/// it can be shared freely between threads.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Baselines {
    statistics: GameStatistics,
    resources: ResourceModel,
    tags: TagStatistics,
}

impl Baselines {
    #[must_use]
    pub fn new(statistics: GameStatistics, resources: ResourceModel, tags: TagStatistics) -> Self {
        Self {
            statistics,
            resources,
            tags,
        }
    }

    #[must_use]
    pub fn with_tags(self, tags: TagStatistics) -> Self {
        Self { tags, ..self }
    }

    #[must_use]
    pub fn statistics(&self) -> &GameStatistics {
        &self.statistics
    }

    #[must_use]
    pub fn resources(&self) -> &ResourceModel {
        &self.resources
    }

    #[must_use]
    pub fn tags(&self) -> &TagStatistics {
        &self.tags
    }

    /// Builds the context for playing at `generation` in a `player_count` game.
    pub fn context(
        &self,
        generation: u32,
        player_count: u8,
    ) -> Result<GenerationContext, ContextError> {
        GenerationContext::new(&self.statistics, &self.resources, generation, player_count)
    }
}
