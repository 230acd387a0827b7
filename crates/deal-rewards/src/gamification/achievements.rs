use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::stats::UserStatsSnapshot;

/// Identifier wrapper for achievement definitions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AchievementId(pub String);

impl AchievementId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AchievementId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementCategory {
    Posting,
    Engagement,
    Community,
    Milestone,
}

impl AchievementCategory {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Posting => "Posting",
            Self::Engagement => "Engagement",
            Self::Community => "Community",
            Self::Milestone => "Milestone",
        }
    }
}

/// Statistic a requirement is measured against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequirementKind {
    DealsPosted,
    LikesReceived,
    CommentsMade,
    DaysActive,
    PointsEarned,
    LevelReached,
    /// Tag from a newer catalog; never satisfiable.
    #[serde(other)]
    Unrecognized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirement {
    pub kind: RequirementKind,
    pub threshold: u64,
}

impl Requirement {
    pub fn is_met_by(&self, snapshot: &UserStatsSnapshot) -> bool {
        snapshot
            .value_for(self.kind)
            .map_or(false, |value| value >= self.threshold)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchievementReward {
    pub points: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// Immutable description of an unlockable milestone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchievementDefinition {
    pub id: AchievementId,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub category: AchievementCategory,
    pub requirement: Requirement,
    pub reward: AchievementReward,
}

/// Unlock state owned by whoever persists the user profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnlockLedger {
    unlocked: BTreeMap<AchievementId, DateTime<Utc>>,
}

impl UnlockLedger {
    pub fn is_unlocked(&self, id: &AchievementId) -> bool {
        self.unlocked.contains_key(id)
    }

    pub fn unlocked_at(&self, id: &AchievementId) -> Option<DateTime<Utc>> {
        self.unlocked.get(id).copied()
    }

    /// Record an unlock. Returns `false` and keeps the first timestamp when
    /// the achievement was already unlocked.
    pub fn unlock(&mut self, id: AchievementId, at: DateTime<Utc>) -> bool {
        if self.unlocked.contains_key(&id) {
            return false;
        }
        self.unlocked.insert(id, at);
        true
    }

    pub fn len(&self) -> usize {
        self.unlocked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.unlocked.is_empty()
    }
}

/// Definitions that are still locked and whose requirement the snapshot meets,
/// in catalog order.
pub fn find_newly_unlocked<'a>(
    snapshot: &UserStatsSnapshot,
    achievements: &'a [AchievementDefinition],
    ledger: &UnlockLedger,
) -> Vec<&'a AchievementDefinition> {
    achievements
        .iter()
        .filter(|achievement| !ledger.is_unlocked(&achievement.id))
        .filter(|achievement| achievement.requirement.is_met_by(snapshot))
        .collect()
}

/// Definition joined with the caller's unlock state, for rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AchievementStatus {
    #[serde(flatten)]
    pub definition: AchievementDefinition,
    pub unlocked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unlocked_at: Option<DateTime<Utc>>,
}

impl AchievementStatus {
    pub fn collect(achievements: &[AchievementDefinition], ledger: &UnlockLedger) -> Vec<Self> {
        achievements
            .iter()
            .map(|definition| {
                let unlocked_at = ledger.unlocked_at(&definition.id);
                Self {
                    definition: definition.clone(),
                    unlocked: unlocked_at.is_some(),
                    unlocked_at,
                }
            })
            .collect()
    }
}
