use serde::{Deserialize, Serialize};

use super::domain::{UserId, UserProfile};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaderboardMetric {
    #[default]
    Points,
    DealsPosted,
    LikesReceived,
    Comments,
}

impl LeaderboardMetric {
    pub fn value_of(self, profile: &UserProfile) -> u64 {
        match self {
            Self::Points => profile.points,
            Self::DealsPosted => profile.deals_posted,
            Self::LikesReceived => profile.likes_received,
            Self::Comments => profile.comments_count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaderboardEntry {
    pub position: usize,
    pub user_id: UserId,
    pub display_name: String,
    pub level: u32,
    pub value: u64,
}

/// Rank profiles by `metric`, highest first. Ties keep user-id order so the
/// board is stable between requests.
pub fn rank(
    mut profiles: Vec<UserProfile>,
    metric: LeaderboardMetric,
    limit: usize,
) -> Vec<LeaderboardEntry> {
    profiles.sort_by(|a, b| {
        metric
            .value_of(b)
            .cmp(&metric.value_of(a))
            .then_with(|| a.id.cmp(&b.id))
    });

    profiles
        .into_iter()
        .take(limit)
        .enumerate()
        .map(|(index, profile)| LeaderboardEntry {
            position: index + 1,
            value: metric.value_of(&profile),
            level: profile.level,
            user_id: profile.id,
            display_name: profile.display_name,
        })
        .collect()
}
