use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, NaiveDate, Utc};
use tracing::{debug, info, warn};

use super::domain::{ActionOutcome, ProfileView, UnlockedAchievement, UserId, UserProfile};
use super::leaderboard::{rank, LeaderboardEntry, LeaderboardMetric};
use super::repository::{
    NotificationPublisher, ProfileRepository, RepositoryError, RewardNotification,
};
use crate::gamification::{
    AchievementStatus, ConfigurationError, GamificationEngine, PointAction,
};

/// Service applying engine results to stored profiles.
///
/// The engine is pure; this is the caller that owns the read-modify-write of
/// point totals and unlock ledgers, so every mutation runs under one lock.
pub struct RewardsService<R, N> {
    engine: Arc<GamificationEngine>,
    repository: Arc<R>,
    notifications: Arc<N>,
    clock: fn() -> DateTime<Utc>,
    write_lock: Mutex<()>,
}

impl<R, N> RewardsService<R, N>
where
    R: ProfileRepository + 'static,
    N: NotificationPublisher + 'static,
{
    pub fn new(engine: Arc<GamificationEngine>, repository: Arc<R>, notifications: Arc<N>) -> Self {
        Self {
            engine,
            repository,
            notifications,
            clock: Utc::now,
            write_lock: Mutex::new(()),
        }
    }

    /// Replace the wall clock the HTTP handlers read.
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    pub fn engine(&self) -> &GamificationEngine {
        &self.engine
    }

    pub fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }

    /// Store a new profile with its level derived from its points.
    pub fn register(&self, mut profile: UserProfile) -> Result<UserProfile, RewardsServiceError> {
        profile.level = self.engine.resolve_level(profile.points).level;
        let stored = self.repository.insert(profile)?;
        info!(user_id = %stored.id.0, level = stored.level, "registered rewards profile");
        Ok(stored)
    }

    /// Award points for `action`, unlock whatever now qualifies, and persist.
    ///
    /// A `post_deal` from a member with no deals yet is recorded as `first_deal`.
    pub fn record_action(
        &self,
        user_id: &UserId,
        action: PointAction,
        at: DateTime<Utc>,
    ) -> Result<ActionOutcome, RewardsServiceError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut profile = self
            .repository
            .fetch(user_id)?
            .ok_or(RepositoryError::NotFound)?;

        let effective = if action == PointAction::PostDeal && profile.deals_posted == 0 {
            PointAction::FirstDeal
        } else {
            action
        };
        let award = self.engine.award(effective)?.clone();

        let points_before = profile.points;
        let level_before = profile.level;

        profile.points = profile.points.saturating_add(award.points);
        profile.record_activity(effective);
        let unlocked = self.unlock_qualifying(&mut profile, at);

        self.repository.update(profile.clone())?;

        info!(
            user_id = %user_id.0,
            action = %effective,
            points = award.points,
            total = profile.points,
            level = profile.level,
            unlocked = unlocked.len(),
            "recorded rewards action"
        );

        self.notify(RewardNotification::PointsAwarded {
            user_id: user_id.clone(),
            action: effective,
            points: award.points,
            description: award.description.clone(),
        });
        self.notify_progress(&profile, level_before, &unlocked);

        Ok(ActionOutcome {
            user_id: user_id.clone(),
            requested_action: action,
            award,
            points_before,
            points_after: profile.points,
            level_before,
            level_after: profile.level,
            unlocked,
        })
    }

    /// Re-check achievements without awarding points, e.g. once days active ticks over.
    pub fn evaluate_achievements(
        &self,
        user_id: &UserId,
        at: DateTime<Utc>,
    ) -> Result<Vec<UnlockedAchievement>, RewardsServiceError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut profile = self
            .repository
            .fetch(user_id)?
            .ok_or(RepositoryError::NotFound)?;

        let level_before = profile.level;
        let unlocked = self.unlock_qualifying(&mut profile, at);
        if unlocked.is_empty() && profile.level == level_before {
            debug!(user_id = %user_id.0, "no new achievements");
            return Ok(unlocked);
        }

        self.repository.update(profile.clone())?;
        self.notify_progress(&profile, level_before, &unlocked);

        Ok(unlocked)
    }

    pub fn profile_view(
        &self,
        user_id: &UserId,
        today: NaiveDate,
    ) -> Result<ProfileView, RewardsServiceError> {
        let profile = self
            .repository
            .fetch(user_id)?
            .ok_or(RepositoryError::NotFound)?;

        Ok(ProfileView {
            user_id: profile.id.clone(),
            display_name: profile.display_name.clone(),
            stats: profile.snapshot(today),
            level: self.engine.level_progress(profile.points),
            achievements: AchievementStatus::collect(
                &self.engine.catalog().achievements,
                &profile.achievements,
            ),
        })
    }

    pub fn leaderboard(
        &self,
        metric: LeaderboardMetric,
        limit: usize,
    ) -> Result<Vec<LeaderboardEntry>, RewardsServiceError> {
        let profiles = self.repository.list()?;
        Ok(rank(profiles, metric, limit))
    }

    /// Unlock every qualifying achievement, crediting its bonus, until a pass
    /// finds nothing new. Each pass unlocks at least one entry, so this stops
    /// after at most one pass per achievement.
    fn unlock_qualifying(
        &self,
        profile: &mut UserProfile,
        at: DateTime<Utc>,
    ) -> Vec<UnlockedAchievement> {
        let today = at.date_naive();
        let mut unlocked = Vec::new();

        loop {
            profile.level = self.engine.resolve_level(profile.points).level;
            let snapshot = profile.snapshot(today);
            let qualifying: Vec<_> = self
                .engine
                .find_newly_unlocked(&snapshot, &profile.achievements)
                .into_iter()
                .cloned()
                .collect();
            if qualifying.is_empty() {
                break;
            }

            for definition in qualifying {
                if !profile.achievements.unlock(definition.id.clone(), at) {
                    continue;
                }
                profile.points = profile.points.saturating_add(definition.reward.points);
                unlocked.push(UnlockedAchievement {
                    id: definition.id,
                    name: definition.name,
                    description: definition.description,
                    icon: definition.icon,
                    reward: definition.reward,
                    unlocked_at: at,
                });
            }
        }

        unlocked
    }

    fn notify_progress(
        &self,
        profile: &UserProfile,
        level_before: u32,
        unlocked: &[UnlockedAchievement],
    ) {
        for achievement in unlocked {
            self.notify(RewardNotification::AchievementUnlocked {
                user_id: profile.id.clone(),
                achievement: achievement.clone(),
            });
        }

        if profile.level > level_before {
            let name = self.engine.resolve_level(profile.points).name.clone();
            self.notify(RewardNotification::LevelUp {
                user_id: profile.id.clone(),
                from: level_before,
                to: profile.level,
                name,
            });
        }
    }

    /// Notifications are best effort; the profile is already persisted.
    fn notify(&self, notification: RewardNotification) {
        if let Err(err) = self.notifications.publish(notification) {
            warn!(error = %err, "failed to publish rewards notification");
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RewardsServiceError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
