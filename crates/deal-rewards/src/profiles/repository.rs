use serde::{Deserialize, Serialize};

use super::domain::{UnlockedAchievement, UserId, UserProfile};
use crate::gamification::PointAction;

/// Storage abstraction so the service can be exercised without a database.
pub trait ProfileRepository: Send + Sync {
    fn insert(&self, profile: UserProfile) -> Result<UserProfile, RepositoryError>;
    fn update(&self, profile: UserProfile) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &UserId) -> Result<Option<UserProfile>, RepositoryError>;
    fn list(&self) -> Result<Vec<UserProfile>, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("profile already exists")]
    Conflict,
    #[error("profile not found")]
    NotFound,
    #[error("profile store unavailable: {0}")]
    Unavailable(String),
}

/// Outbound hook for the toast/notification surface.
pub trait NotificationPublisher: Send + Sync {
    fn publish(&self, notification: RewardNotification) -> Result<(), NotificationError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RewardNotification {
    PointsAwarded {
        user_id: UserId,
        action: PointAction,
        points: u64,
        description: String,
    },
    AchievementUnlocked {
        user_id: UserId,
        achievement: UnlockedAchievement,
    },
    LevelUp {
        user_id: UserId,
        from: u32,
        to: u32,
        name: String,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}
