use chrono::NaiveDate;
use deal_rewards::config::RewardsConfig;
use deal_rewards::error::AppError;
use deal_rewards::gamification::{GamificationCatalog, GamificationEngine};
use deal_rewards::profiles::{
    NotificationError, NotificationPublisher, ProfileRepository, RepositoryError,
    RewardNotification, RewardsService, UserId, UserProfile,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryProfileRepository {
    profiles: Arc<Mutex<HashMap<UserId, UserProfile>>>,
}

impl InMemoryProfileRepository {
    fn lock(&self) -> Result<MutexGuard<'_, HashMap<UserId, UserProfile>>, RepositoryError> {
        self.profiles
            .lock()
            .map_err(|_| RepositoryError::Unavailable("profile store lock poisoned".to_string()))
    }
}

impl ProfileRepository for InMemoryProfileRepository {
    fn insert(&self, profile: UserProfile) -> Result<UserProfile, RepositoryError> {
        let mut guard = self.lock()?;
        if guard.contains_key(&profile.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(profile.id.clone(), profile.clone());
        Ok(profile)
    }

    fn update(&self, profile: UserProfile) -> Result<(), RepositoryError> {
        let mut guard = self.lock()?;
        if guard.contains_key(&profile.id) {
            guard.insert(profile.id.clone(), profile);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: &UserId) -> Result<Option<UserProfile>, RepositoryError> {
        Ok(self.lock()?.get(id).cloned())
    }

    fn list(&self) -> Result<Vec<UserProfile>, RepositoryError> {
        Ok(self.lock()?.values().cloned().collect())
    }
}

/// Toast feed kept in memory; each notification is also logged.
#[derive(Default, Clone)]
pub(crate) struct InMemoryNotificationPublisher {
    events: Arc<Mutex<Vec<RewardNotification>>>,
}

impl NotificationPublisher for InMemoryNotificationPublisher {
    fn publish(&self, notification: RewardNotification) -> Result<(), NotificationError> {
        match &notification {
            RewardNotification::PointsAwarded {
                user_id, points, ..
            } => info!(user_id = %user_id.0, points, "points awarded"),
            RewardNotification::AchievementUnlocked {
                user_id,
                achievement,
            } => info!(user_id = %user_id.0, achievement = %achievement.id.as_str(), "achievement unlocked"),
            RewardNotification::LevelUp { user_id, to, .. } => {
                info!(user_id = %user_id.0, level = to, "level up")
            }
        }

        let mut guard = self
            .events
            .lock()
            .map_err(|_| NotificationError::Transport("toast feed lock poisoned".to_string()))?;
        guard.push(notification);
        Ok(())
    }
}

impl InMemoryNotificationPublisher {
    pub(crate) fn events(&self) -> Vec<RewardNotification> {
        self.events
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

pub(crate) type InMemoryRewardsService =
    RewardsService<InMemoryProfileRepository, InMemoryNotificationPublisher>;

/// Engine over the configured JSON catalog, or the built-in tables.
pub(crate) fn load_engine(config: &RewardsConfig) -> Result<GamificationEngine, AppError> {
    match &config.catalog_path {
        Some(path) => {
            let catalog = GamificationCatalog::from_path(path)?;
            info!(path = %path.display(), "loaded rewards catalog");
            Ok(GamificationEngine::new(Arc::new(catalog)))
        }
        None => Ok(GamificationEngine::standard()),
    }
}

struct SeedMember {
    id: &'static str,
    name: &'static str,
    points: u64,
    deals_posted: u64,
    likes_received: u64,
    comments_count: u64,
    joined_on: (i32, u32, u32),
}

const SEED_MEMBERS: &[SeedMember] = &[
    SeedMember {
        id: "1",
        name: "Ana Paula Vieira",
        points: 12_450,
        deals_posted: 89,
        likes_received: 2_340,
        comments_count: 456,
        joined_on: (2023, 1, 15),
    },
    SeedMember {
        id: "2",
        name: "Carlos Silva",
        points: 9_870,
        deals_posted: 67,
        likes_received: 1_890,
        comments_count: 234,
        joined_on: (2023, 4, 2),
    },
    SeedMember {
        id: "3",
        name: "Maria Santos",
        points: 8_340,
        deals_posted: 45,
        likes_received: 1_560,
        comments_count: 189,
        joined_on: (2023, 8, 21),
    },
    SeedMember {
        id: "4",
        name: "João Oliveira",
        points: 7_890,
        deals_posted: 56,
        likes_received: 1_234,
        comments_count: 167,
        joined_on: (2024, 2, 10),
    },
    SeedMember {
        id: "5",
        name: "Fernanda Costa",
        points: 6_540,
        deals_posted: 34,
        likes_received: 987,
        comments_count: 145,
        joined_on: (2024, 6, 30),
    },
];

/// Register the community's sample members so the leaderboard is not empty.
pub(crate) fn seed_profiles<R, N>(service: &RewardsService<R, N>) -> Result<usize, AppError>
where
    R: ProfileRepository + 'static,
    N: NotificationPublisher + 'static,
{
    let mut seeded = 0;
    for member in SEED_MEMBERS {
        let (year, month, day) = member.joined_on;
        let Some(joined_on) = NaiveDate::from_ymd_opt(year, month, day) else {
            continue;
        };
        let mut profile = UserProfile::new(UserId::from(member.id), member.name, joined_on);
        profile.points = member.points;
        profile.deals_posted = member.deals_posted;
        profile.likes_received = member.likes_received;
        profile.comments_count = member.comments_count;

        service.register(profile)?;
        seeded += 1;
    }
    Ok(seeded)
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
