use super::common::*;
use crate::gamification::{
    find_newly_unlocked, AchievementDefinition, AchievementId, AchievementStatus,
    RequirementKind, UnlockLedger, UserStatsSnapshot,
};

fn ids<'a>(achievements: impl IntoIterator<Item = &'a AchievementDefinition>) -> Vec<&'a str> {
    achievements
        .into_iter()
        .map(|achievement| achievement.id.as_str())
        .collect()
}

#[test]
fn empty_snapshot_unlocks_nothing() {
    let engine = engine();

    let unlocked =
        engine.find_newly_unlocked(&UserStatsSnapshot::default(), &UnlockLedger::default());
    assert!(unlocked.is_empty());
}

#[test]
fn threshold_is_inclusive() {
    let engine = engine();
    let mut ledger = UnlockLedger::default();
    ledger.unlock(AchievementId::from("first_deal"), unlock_time());

    let below = UserStatsSnapshot {
        deals_posted: 49,
        ..UserStatsSnapshot::default()
    };
    assert!(!ids(engine.find_newly_unlocked(&below, &ledger)).contains(&"deal_master"));

    let at = UserStatsSnapshot {
        deals_posted: 50,
        ..UserStatsSnapshot::default()
    };
    assert_eq!(ids(engine.find_newly_unlocked(&at, &ledger)), vec!["deal_master"]);
}

#[test]
fn unlocked_achievements_never_fire_again() {
    let engine = engine();
    let maxed = UserStatsSnapshot {
        deals_posted: u64::MAX,
        likes_received: u64::MAX,
        comments_made: u64::MAX,
        days_active: u64::MAX,
        points: u64::MAX,
        level: u64::MAX,
    };

    let mut ledger = UnlockLedger::default();
    let first_pass: Vec<AchievementId> = engine
        .find_newly_unlocked(&maxed, &ledger)
        .into_iter()
        .map(|achievement| achievement.id.clone())
        .collect();
    assert_eq!(first_pass.len(), engine.catalog().achievements.len());

    for id in first_pass {
        assert!(ledger.unlock(id, unlock_time()));
    }
    assert!(engine.find_newly_unlocked(&maxed, &ledger).is_empty());
}

#[test]
fn results_keep_catalog_order() {
    let engine = engine();
    let snapshot = UserStatsSnapshot {
        deals_posted: 60,
        likes_received: 150,
        comments_made: 120,
        days_active: 400,
        points: 500,
        level: 4,
    };

    let unlocked = ids(engine.find_newly_unlocked(&snapshot, &UnlockLedger::default()));
    assert_eq!(
        unlocked,
        vec![
            "first_deal",
            "deal_master",
            "hundred_likes",
            "active_commenter",
            "veteran"
        ]
    );
}

#[test]
fn each_requirement_kind_reads_its_own_counter() {
    let definitions = vec![
        definition("posts", RequirementKind::DealsPosted, 3),
        definition("likes", RequirementKind::LikesReceived, 3),
        definition("comments", RequirementKind::CommentsMade, 3),
        definition("days", RequirementKind::DaysActive, 3),
        definition("points", RequirementKind::PointsEarned, 3),
        definition("level", RequirementKind::LevelReached, 3),
    ];
    let ledger = UnlockLedger::default();

    let snapshot = UserStatsSnapshot {
        comments_made: 3,
        level: 3,
        ..UserStatsSnapshot::default()
    };
    assert_eq!(
        ids(find_newly_unlocked(&snapshot, &definitions, &ledger)),
        vec!["comments", "level"]
    );

    let snapshot = UserStatsSnapshot {
        deals_posted: 3,
        likes_received: 3,
        days_active: 3,
        points: 3,
        ..UserStatsSnapshot::default()
    };
    assert_eq!(
        ids(find_newly_unlocked(&snapshot, &definitions, &ledger)),
        vec!["posts", "likes", "days", "points"]
    );
}

#[test]
fn unrecognized_requirement_is_never_met() {
    let definitions = vec![definition("mystery", RequirementKind::Unrecognized, 0)];
    let snapshot = UserStatsSnapshot {
        deals_posted: 1000,
        ..UserStatsSnapshot::default()
    };

    assert!(find_newly_unlocked(&snapshot, &definitions, &UnlockLedger::default()).is_empty());
}

#[test]
fn unknown_requirement_tags_deserialize_as_unrecognized() {
    let kind: RequirementKind =
        serde_json::from_str("\"coupons_redeemed\"").expect("unknown tag accepted");
    assert_eq!(kind, RequirementKind::Unrecognized);

    let kind: RequirementKind = serde_json::from_str("\"days_active\"").expect("known tag");
    assert_eq!(kind, RequirementKind::DaysActive);
}

#[test]
fn partial_snapshot_defaults_missing_counters_to_zero() {
    let snapshot: UserStatsSnapshot =
        serde_json::from_str(r#"{"deals_posted": 1}"#).expect("partial snapshot parses");
    assert_eq!(snapshot.deals_posted, 1);
    assert_eq!(snapshot.likes_received, 0);
    assert_eq!(snapshot.level, 0);

    let engine = engine();
    let unlocked = ids(engine.find_newly_unlocked(&snapshot, &UnlockLedger::default()));
    assert_eq!(unlocked, vec!["first_deal"]);
}

#[test]
fn ledger_keeps_the_first_unlock_time() {
    let mut ledger = UnlockLedger::default();
    let id = AchievementId::from("veteran");
    let first = unlock_time();
    let later = first + chrono::Duration::days(3);

    assert!(ledger.unlock(id.clone(), first));
    assert!(!ledger.unlock(id.clone(), later));
    assert_eq!(ledger.unlocked_at(&id), Some(first));
    assert_eq!(ledger.len(), 1);
}

#[test]
fn status_view_joins_definitions_with_the_ledger() {
    let engine = engine();
    let mut ledger = UnlockLedger::default();
    ledger.unlock(AchievementId::from("hundred_likes"), unlock_time());

    let statuses = AchievementStatus::collect(&engine.catalog().achievements, &ledger);
    assert_eq!(statuses.len(), engine.catalog().achievements.len());

    let unlocked: Vec<_> = statuses.iter().filter(|status| status.unlocked).collect();
    assert_eq!(unlocked.len(), 1);
    assert_eq!(unlocked[0].definition.name, "100 Curtidas");
    assert_eq!(unlocked[0].unlocked_at, Some(unlock_time()));

    let json = serde_json::to_value(&statuses[0]).expect("status serializes");
    assert_eq!(json["id"], "first_deal");
    assert_eq!(json["unlocked"], false);
    assert!(json.get("unlocked_at").is_none());
}

#[test]
fn standard_categories_have_display_labels() {
    let engine = engine();
    let labels: Vec<_> = engine
        .catalog()
        .achievements
        .iter()
        .map(|definition| definition.category.label())
        .collect();

    assert_eq!(
        labels,
        vec![
            "Posting",
            "Posting",
            "Engagement",
            "Engagement",
            "Community",
            "Milestone",
            "Milestone",
            "Milestone",
        ]
    );
}
