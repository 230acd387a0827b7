use serde::{Deserialize, Serialize};

use super::achievements::RequirementKind;

/// Point-in-time read of a user's activity counters.
///
/// Fields absent from a payload deserialize to zero so a partial snapshot
/// never unlocks anything it should not.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserStatsSnapshot {
    pub deals_posted: u64,
    pub likes_received: u64,
    pub comments_made: u64,
    pub days_active: u64,
    pub points: u64,
    pub level: u64,
}

impl UserStatsSnapshot {
    /// Counter a requirement is measured against; `None` for kinds this build does not know.
    pub fn value_for(&self, kind: RequirementKind) -> Option<u64> {
        match kind {
            RequirementKind::DealsPosted => Some(self.deals_posted),
            RequirementKind::LikesReceived => Some(self.likes_received),
            RequirementKind::CommentsMade => Some(self.comments_made),
            RequirementKind::DaysActive => Some(self.days_active),
            RequirementKind::PointsEarned => Some(self.points),
            RequirementKind::LevelReached => Some(self.level),
            RequirementKind::Unrecognized => None,
        }
    }
}
