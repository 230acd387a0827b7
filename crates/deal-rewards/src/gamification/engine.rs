use std::sync::Arc;

use super::achievements::{find_newly_unlocked, AchievementDefinition, UnlockLedger};
use super::awards::{ConfigurationError, PointAction, PointAward};
use super::catalog::GamificationCatalog;
use super::levels::{LevelProgressView, LevelTier};
use super::stats::UserStatsSnapshot;

/// Stateless facade over an immutable catalog.
///
/// Every method is a pure read; callers own the point totals and unlock ledgers
/// they pass in and are responsible for persisting any change.
#[derive(Debug, Clone)]
pub struct GamificationEngine {
    catalog: Arc<GamificationCatalog>,
}

impl GamificationEngine {
    pub fn new(catalog: Arc<GamificationCatalog>) -> Self {
        Self { catalog }
    }

    pub fn standard() -> Self {
        Self::new(GamificationCatalog::standard())
    }

    pub fn catalog(&self) -> &GamificationCatalog {
        &self.catalog
    }

    pub fn resolve_level(&self, points: u64) -> &LevelTier {
        self.catalog.levels.resolve(points)
    }

    pub fn next_tier(&self, level: u32) -> Option<&LevelTier> {
        self.catalog.levels.next_after(level)
    }

    pub fn points_to_next_tier(&self, points: u64) -> u64 {
        self.catalog.levels.points_to_next(points)
    }

    pub fn progress_percentage(&self, points: u64) -> f64 {
        self.catalog.levels.progress_percentage(points)
    }

    pub fn level_progress(&self, points: u64) -> LevelProgressView {
        LevelProgressView::build(&self.catalog.levels, points)
    }

    pub fn award(&self, action: PointAction) -> Result<&PointAward, ConfigurationError> {
        self.catalog.awards.award(action)
    }

    pub fn award_for(&self, action_id: &str) -> Result<&PointAward, ConfigurationError> {
        self.catalog.awards.award_for(action_id)
    }

    pub fn find_newly_unlocked(
        &self,
        snapshot: &UserStatsSnapshot,
        ledger: &UnlockLedger,
    ) -> Vec<&AchievementDefinition> {
        find_newly_unlocked(snapshot, &self.catalog.achievements, ledger)
    }
}

impl Default for GamificationEngine {
    fn default() -> Self {
        Self::standard()
    }
}
