//! Member profiles and the service that feeds them through the gamification engine.

pub mod domain;
pub mod leaderboard;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{ActionOutcome, ProfileView, UnlockedAchievement, UserId, UserProfile};
pub use leaderboard::{rank, LeaderboardEntry, LeaderboardMetric};
pub use repository::{
    NotificationError, NotificationPublisher, ProfileRepository, RepositoryError,
    RewardNotification,
};
pub use router::rewards_router;
pub use service::{RewardsService, RewardsServiceError};
