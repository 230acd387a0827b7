//! Points, level tiers and achievements.
//!
//! Everything here is a pure computation over a [`GamificationCatalog`]; unlock
//! state and point totals belong to the caller.

pub mod achievements;
pub mod awards;
pub mod catalog;
mod engine;
pub mod levels;
pub mod router;
pub mod stats;

#[cfg(test)]
mod tests;

pub use achievements::{
    find_newly_unlocked, AchievementCategory, AchievementDefinition, AchievementId,
    AchievementReward, AchievementStatus, Requirement, RequirementKind, UnlockLedger,
};
pub use awards::{AwardTable, ConfigurationError, PointAction, PointAward};
pub use catalog::{CatalogError, GamificationCatalog};
pub use engine::GamificationEngine;
pub use levels::{LevelProgressView, LevelTable, LevelTier, NextLevelPreview};
pub use router::gamification_router;
pub use stats::UserStatsSnapshot;
