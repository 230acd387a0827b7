//! Properties of the standard level, award and achievement tables, exercised
//! through the public engine facade only.

use std::path::PathBuf;

use deal_rewards::gamification::{
    AchievementId, ConfigurationError, GamificationCatalog, GamificationEngine, PointAction,
    UnlockLedger, UserStatsSnapshot,
};

fn engine() -> GamificationEngine {
    GamificationEngine::standard()
}

#[test]
fn every_point_total_resolves_to_exactly_one_tier() {
    let engine = engine();
    let tiers = engine.catalog().levels.tiers();

    for points in (0..=100_000u64).step_by(7).chain([99, 100, 31_999, 32_000]) {
        let matching = tiers.iter().filter(|tier| tier.contains(points)).count();
        assert_eq!(matching, 1, "points {points} matched {matching} tiers");
        assert!(engine.resolve_level(points).contains(points));
    }
}

#[test]
fn levels_never_decrease_as_points_grow() {
    let engine = engine();
    let mut previous = engine.resolve_level(0).level;

    for points in 1..=40_000u64 {
        let level = engine.resolve_level(points).level;
        assert!(level >= previous, "level dropped at {points} points");
        previous = level;
    }
    assert_eq!(previous, 10);
}

#[test]
fn progress_runs_from_zero_to_one_hundred_inside_bounded_tiers() {
    let engine = engine();

    for tier in engine
        .catalog()
        .levels
        .tiers()
        .iter()
        .filter(|tier| !tier.is_unbounded())
    {
        let max = tier.max_points.expect("bounded tier");
        assert_eq!(engine.progress_percentage(tier.min_points), 0.0);
        assert_eq!(engine.progress_percentage(max), 100.0);
    }
}

#[test]
fn top_tier_is_complete_with_no_successor() {
    let engine = engine();

    for points in [32_000, 50_000, 1_000_000, u64::MAX] {
        let tier = engine.resolve_level(points);
        assert_eq!(tier.level, 10);
        assert_eq!(tier.name, "Lenda");
        assert_eq!(engine.progress_percentage(points), 100.0);
        assert_eq!(engine.points_to_next_tier(points), 0);
        assert!(engine.next_tier(tier.level).is_none());
    }
}

#[test]
fn points_to_next_tier_counts_down_within_a_tier() {
    let engine = engine();

    let mut previous = engine.points_to_next_tier(500);
    for points in 501..=999 {
        let remaining = engine.points_to_next_tier(points);
        assert!(remaining < previous);
        previous = remaining;
    }
    assert_eq!(engine.points_to_next_tier(999), 1);
    assert_eq!(engine.resolve_level(1000).level, 5);
    assert_eq!(engine.points_to_next_tier(1000), 1000);
}

#[test]
fn award_lookup_is_stable_and_rejects_unknown_actions() {
    let engine = engine();

    for _ in 0..3 {
        let award = engine.award_for("post_deal").expect("known action");
        assert_eq!(award.points, 50);
        assert_eq!(award.action, PointAction::PostDeal);
    }

    let err = engine
        .award_for("nonexistent_action")
        .expect_err("unknown action");
    assert_eq!(
        err,
        ConfigurationError::UnknownAction("nonexistent_action".to_string())
    );
}

#[test]
fn unlocked_achievements_are_not_reported_again() {
    let engine = engine();
    let snapshot = UserStatsSnapshot {
        deals_posted: 75,
        likes_received: 150,
        ..UserStatsSnapshot::default()
    };

    let mut ledger = UnlockLedger::default();
    let first: Vec<_> = engine
        .find_newly_unlocked(&snapshot, &ledger)
        .into_iter()
        .map(|definition| definition.id.clone())
        .collect();
    assert_eq!(
        first,
        vec![
            AchievementId::from("first_deal"),
            AchievementId::from("deal_master"),
            AchievementId::from("hundred_likes"),
        ]
    );

    let now = chrono::Utc::now();
    for id in first {
        ledger.unlock(id, now);
    }
    assert!(engine.find_newly_unlocked(&snapshot, &ledger).is_empty());
}

#[test]
fn deal_threshold_is_inclusive() {
    let engine = engine();
    let ledger = UnlockLedger::default();
    let ids = |deals_posted| -> Vec<String> {
        let snapshot = UserStatsSnapshot {
            deals_posted,
            ..UserStatsSnapshot::default()
        };
        engine
            .find_newly_unlocked(&snapshot, &ledger)
            .into_iter()
            .map(|definition| definition.id.as_str().to_string())
            .collect()
    };

    assert!(!ids(49).contains(&"deal_master".to_string()));
    assert!(ids(50).contains(&"deal_master".to_string()));
}

#[test]
fn a_newcomers_first_deal_reaches_level_two() {
    let engine = engine();

    let award = engine.award(PointAction::FirstDeal).expect("award exists");
    let points = award.points;
    assert_eq!(points, 100);

    let tier = engine.resolve_level(points);
    assert_eq!(tier.level, 2);
    assert_eq!(tier.name, "Iniciante");

    let snapshot = UserStatsSnapshot {
        deals_posted: 1,
        points,
        level: u64::from(tier.level),
        ..UserStatsSnapshot::default()
    };
    let names: Vec<_> = engine
        .find_newly_unlocked(&snapshot, &UnlockLedger::default())
        .into_iter()
        .map(|definition| definition.name.as_str())
        .collect();
    assert_eq!(names, vec!["Primeira Promoção"]);
}

#[test]
fn a_like_can_cross_into_the_next_tier() {
    let engine = engine();
    let like = engine.award(PointAction::ReceiveLike).expect("award exists");
    let points = 1999 + like.points;
    assert_eq!(points, 2004);

    let tier = engine.resolve_level(points);
    assert_eq!(tier.level, 6);
    assert_eq!(tier.name, "Avançado");
    assert_eq!((tier.min_points, tier.max_points), (2000, Some(3999)));
    assert_eq!(engine.points_to_next_tier(points), 1996);
}

#[test]
fn bundled_catalog_file_matches_the_standard_tables() {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../config/rewards-catalog.json");

    let loaded = GamificationCatalog::from_path(&path).expect("bundled catalog loads");
    assert_eq!(&loaded, &*GamificationCatalog::standard());
}
