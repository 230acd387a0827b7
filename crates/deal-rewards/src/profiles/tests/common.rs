use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde_json::Value;

use crate::gamification::GamificationEngine;
use crate::profiles::domain::{UserId, UserProfile};
use crate::profiles::repository::{
    NotificationError, NotificationPublisher, ProfileRepository, RepositoryError,
    RewardNotification,
};
use crate::profiles::service::RewardsService;

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    profiles: Arc<Mutex<HashMap<UserId, UserProfile>>>,
}

impl ProfileRepository for MemoryRepository {
    fn insert(&self, profile: UserProfile) -> Result<UserProfile, RepositoryError> {
        let mut guard = self.profiles.lock().expect("repository mutex poisoned");
        if guard.contains_key(&profile.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(profile.id.clone(), profile.clone());
        Ok(profile)
    }

    fn update(&self, profile: UserProfile) -> Result<(), RepositoryError> {
        let mut guard = self.profiles.lock().expect("repository mutex poisoned");
        match guard.get_mut(&profile.id) {
            Some(stored) => {
                *stored = profile;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn fetch(&self, id: &UserId) -> Result<Option<UserProfile>, RepositoryError> {
        let guard = self.profiles.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn list(&self) -> Result<Vec<UserProfile>, RepositoryError> {
        let guard = self.profiles.lock().expect("repository mutex poisoned");
        Ok(guard.values().cloned().collect())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryNotifications {
    events: Arc<Mutex<Vec<RewardNotification>>>,
}

impl MemoryNotifications {
    pub(super) fn events(&self) -> Vec<RewardNotification> {
        self.events.lock().expect("notification mutex poisoned").clone()
    }
}

impl NotificationPublisher for MemoryNotifications {
    fn publish(&self, notification: RewardNotification) -> Result<(), NotificationError> {
        self.events
            .lock()
            .expect("notification mutex poisoned")
            .push(notification);
        Ok(())
    }
}

pub(super) struct FailingNotifications;

impl NotificationPublisher for FailingNotifications {
    fn publish(&self, _notification: RewardNotification) -> Result<(), NotificationError> {
        Err(NotificationError::Transport("toast queue offline".to_string()))
    }
}

pub(super) struct UnavailableRepository;

impl ProfileRepository for UnavailableRepository {
    fn insert(&self, _profile: UserProfile) -> Result<UserProfile, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _profile: UserProfile) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &UserId) -> Result<Option<UserProfile>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list(&self) -> Result<Vec<UserProfile>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) type MemoryService = RewardsService<MemoryRepository, MemoryNotifications>;

pub(super) fn build_service() -> (MemoryService, MemoryRepository, MemoryNotifications) {
    let repository = MemoryRepository::default();
    let notifications = MemoryNotifications::default();
    let service = RewardsService::new(
        Arc::new(GamificationEngine::standard()),
        Arc::new(repository.clone()),
        Arc::new(notifications.clone()),
    );
    (service, repository, notifications)
}

pub(super) fn joined_on() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 15).expect("valid date")
}

pub(super) fn action_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 18, 30, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn newcomer(id: &str) -> UserProfile {
    UserProfile::new(UserId::from(id), format!("Member {id}"), joined_on())
}

pub(super) fn member(id: &str, points: u64, deals: u64, likes: u64, comments: u64) -> UserProfile {
    let mut profile = newcomer(id);
    profile.points = points;
    profile.deals_posted = deals;
    profile.likes_received = likes;
    profile.comments_count = comments;
    profile
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
