use std::sync::Arc;

use axum::response::Response;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use crate::gamification::{
    AchievementCategory, AchievementDefinition, AchievementId, AchievementReward,
    GamificationCatalog, GamificationEngine, LevelTable, LevelTier, Requirement, RequirementKind,
};

pub(super) fn engine() -> GamificationEngine {
    GamificationEngine::standard()
}

pub(super) fn unlock_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 14, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn tier(level: u32, min_points: u64, max_points: Option<u64>) -> LevelTier {
    LevelTier {
        level,
        name: format!("Tier {level}"),
        min_points,
        max_points,
        accent: "bg-gray-500".to_string(),
        benefits: vec!["Postar promoções".to_string()],
    }
}

/// Tiers 0..=99 and 200..; points 100..=199 land in no tier.
pub(super) fn gapped_table() -> LevelTable {
    LevelTable::new(vec![tier(1, 0, Some(99)), tier(2, 200, None)]).expect("non-empty table")
}

pub(super) fn definition(id: &str, kind: RequirementKind, threshold: u64) -> AchievementDefinition {
    AchievementDefinition {
        id: AchievementId::from(id),
        name: id.replace('_', " "),
        description: format!("{id} milestone"),
        icon: "🏅".to_string(),
        category: AchievementCategory::Milestone,
        requirement: Requirement { kind, threshold },
        reward: AchievementReward {
            points: 10,
            badge: None,
            title: None,
        },
    }
}

pub(super) fn catalog_json() -> String {
    let catalog = GamificationCatalog::standard();
    serde_json::to_string(&*catalog).expect("catalog serializes")
}

pub(super) fn engine_with(catalog: GamificationCatalog) -> GamificationEngine {
    GamificationEngine::new(Arc::new(catalog))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
