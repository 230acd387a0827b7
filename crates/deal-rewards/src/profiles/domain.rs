use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::gamification::{
    AchievementId, AchievementReward, AchievementStatus, LevelProgressView, PointAction,
    PointAward, UnlockLedger, UserStatsSnapshot,
};

/// Identifier wrapper for community members.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Stored counters and unlock state for one member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub display_name: String,
    pub points: u64,
    pub level: u32,
    pub deals_posted: u64,
    pub likes_received: u64,
    pub comments_count: u64,
    pub joined_on: NaiveDate,
    #[serde(default)]
    pub achievements: UnlockLedger,
}

impl UserProfile {
    pub fn new(id: UserId, display_name: impl Into<String>, joined_on: NaiveDate) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            points: 0,
            level: 1,
            deals_posted: 0,
            likes_received: 0,
            comments_count: 0,
            joined_on,
            achievements: UnlockLedger::default(),
        }
    }

    /// Whole days since joining, clamped at zero for future join dates.
    pub fn days_active(&self, today: NaiveDate) -> u64 {
        (today - self.joined_on).num_days().max(0) as u64
    }

    pub fn snapshot(&self, today: NaiveDate) -> UserStatsSnapshot {
        UserStatsSnapshot {
            deals_posted: self.deals_posted,
            likes_received: self.likes_received,
            comments_made: self.comments_count,
            days_active: self.days_active(today),
            points: self.points,
            level: u64::from(self.level),
        }
    }

    /// Bump the activity counter an action implies.
    pub(crate) fn record_activity(&mut self, action: PointAction) {
        match action {
            PointAction::PostDeal | PointAction::FirstDeal => {
                self.deals_posted = self.deals_posted.saturating_add(1);
            }
            PointAction::ReceiveLike => {
                self.likes_received = self.likes_received.saturating_add(1);
            }
            PointAction::MakeComment => {
                self.comments_count = self.comments_count.saturating_add(1);
            }
            PointAction::DealMarkedHot | PointAction::DailyLogin => {}
        }
    }
}

/// Achievement unlocked during a service call, ready for a notification surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnlockedAchievement {
    pub id: AchievementId,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub reward: AchievementReward,
    pub unlocked_at: DateTime<Utc>,
}

/// Result of recording one point-earning action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionOutcome {
    pub user_id: UserId,
    pub requested_action: PointAction,
    pub award: PointAward,
    pub points_before: u64,
    pub points_after: u64,
    pub level_before: u32,
    pub level_after: u32,
    pub unlocked: Vec<UnlockedAchievement>,
}

impl ActionOutcome {
    pub fn leveled_up(&self) -> bool {
        self.level_after > self.level_before
    }
}

/// Everything a profile page renders about a member's progress.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileView {
    pub user_id: UserId,
    pub display_name: String,
    pub stats: UserStatsSnapshot,
    pub level: LevelProgressView,
    pub achievements: Vec<AchievementStatus>,
}
