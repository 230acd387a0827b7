use crate::infra::{
    load_engine, parse_date, seed_profiles, InMemoryNotificationPublisher,
    InMemoryProfileRepository, InMemoryRewardsService,
};
use chrono::{Duration, Local, NaiveDate, NaiveTime, TimeZone, Utc};
use clap::Args;
use deal_rewards::config::AppConfig;
use deal_rewards::error::AppError;
use deal_rewards::gamification::{GamificationEngine, LevelProgressView, PointAction};
use deal_rewards::profiles::{
    ActionOutcome, LeaderboardMetric, RewardNotification, RewardsService, UserId, UserProfile,
};
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct ProgressArgs {
    /// Cumulative point total to place on the level table
    #[arg(long)]
    pub(crate) points: u64,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Date the demo session runs on (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Leaderboard ranking used in the summary.
    #[arg(long, value_enum, default_value_t = DemoMetric::Points)]
    pub(crate) metric: DemoMetric,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum DemoMetric {
    #[default]
    Points,
    Deals,
    Likes,
    Comments,
}

impl From<DemoMetric> for LeaderboardMetric {
    fn from(value: DemoMetric) -> Self {
        match value {
            DemoMetric::Points => LeaderboardMetric::Points,
            DemoMetric::Deals => LeaderboardMetric::DealsPosted,
            DemoMetric::Likes => LeaderboardMetric::LikesReceived,
            DemoMetric::Comments => LeaderboardMetric::Comments,
        }
    }
}

const DEMO_USER: &str = "demo";

const DEMO_ACTIONS: &[PointAction] = &[
    PointAction::DailyLogin,
    PointAction::PostDeal,
    PointAction::ReceiveLike,
    PointAction::ReceiveLike,
    PointAction::MakeComment,
    PointAction::DealMarkedHot,
    PointAction::PostDeal,
];

fn configured_engine() -> Result<GamificationEngine, AppError> {
    let config = AppConfig::load()?;
    load_engine(&config.rewards)
}

pub(crate) fn run_levels() -> Result<(), AppError> {
    let engine = configured_engine()?;

    println!("Level table");
    for tier in engine.catalog().levels.tiers() {
        let range = match tier.max_points {
            Some(max) => format!("{}-{}", tier.min_points, max),
            None => format!("{}+", tier.min_points),
        };
        println!("- Level {:>2} {:<14} {:>12} pts", tier.level, tier.name, range);
        println!("  Benefits: {}", tier.benefits.join(", "));
    }

    println!("\nAchievements");
    for achievement in &engine.catalog().achievements {
        println!(
            "- {} {:<22} [{}] {} (+{})",
            achievement.icon,
            achievement.name,
            achievement.category.label(),
            achievement.description,
            achievement.reward.points
        );
    }

    println!("\nPoint awards");
    for award in engine.catalog().awards.awards() {
        println!(
            "- {:<16} +{:<4} {}",
            award.action.as_str(),
            award.points,
            award.description
        );
    }

    Ok(())
}

pub(crate) fn run_progress(args: ProgressArgs) -> Result<(), AppError> {
    let engine = configured_engine()?;
    render_progress(&engine.level_progress(args.points));
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let engine = configured_engine()?;
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());

    println!("Deal rewards demo ({today})");
    let (service, notifications) = run_session(engine, today)?;

    let metric = LeaderboardMetric::from(args.metric);
    let board = service.leaderboard(metric, 6)?;
    println!("\nLeaderboard ({:?})", metric);
    for entry in board {
        println!(
            "  #{} {} (level {}) - {}",
            entry.position, entry.display_name, entry.level, entry.value
        );
    }

    let events = notifications.events();
    println!("\nToasts dispatched: {}", events.len());
    for event in events {
        match event {
            RewardNotification::PointsAwarded {
                points,
                description,
                ..
            } => println!("  - +{points} pontos: {description}"),
            RewardNotification::AchievementUnlocked { achievement, .. } => println!(
                "  - {} Conquista desbloqueada: {}",
                achievement.icon, achievement.name
            ),
            RewardNotification::LevelUp { to, name, .. } => {
                println!("  - Subiu para o nível {to} ({name})")
            }
        }
    }

    Ok(())
}

/// Seed the community, then walk a member through a day of activity and the
/// tenure check on their first anniversary.
fn run_session(
    engine: GamificationEngine,
    today: NaiveDate,
) -> Result<(InMemoryRewardsService, InMemoryNotificationPublisher), AppError> {
    let notifications = InMemoryNotificationPublisher::default();
    let service = RewardsService::new(
        Arc::new(engine),
        Arc::new(InMemoryProfileRepository::default()),
        Arc::new(notifications.clone()),
    );
    seed_profiles(&service)?;

    let user = UserId::from(DEMO_USER);
    let joined_on = today - Duration::days(364);
    service.register(UserProfile::new(user.clone(), "Você", joined_on))?;

    let start = Utc.from_utc_datetime(&today.and_time(NaiveTime::MIN));
    println!("\nActivity for member '{DEMO_USER}' (joined {joined_on})");
    for (offset, action) in DEMO_ACTIONS.iter().enumerate() {
        let at = start + Duration::minutes(15 * offset as i64);
        let outcome = service.record_action(&user, *action, at)?;
        render_outcome(&outcome);
    }

    let anniversary = start + Duration::days(1);
    let unlocked = service.evaluate_achievements(&user, anniversary)?;
    for achievement in &unlocked {
        println!(
            "- Tenure check unlocked {} {} (+{})",
            achievement.icon, achievement.name, achievement.reward.points
        );
    }

    let view = service.profile_view(&user, anniversary.date_naive())?;
    println!(
        "\nProfile: {} | {} deals | {} likes | {} comments | {} days active",
        view.display_name,
        view.stats.deals_posted,
        view.stats.likes_received,
        view.stats.comments_made,
        view.stats.days_active
    );
    render_progress(&view.level);
    let unlocked_count = view
        .achievements
        .iter()
        .filter(|status| status.unlocked)
        .count();
    println!(
        "Achievements: {unlocked_count}/{} unlocked",
        view.achievements.len()
    );

    Ok((service, notifications))
}

fn render_outcome(outcome: &ActionOutcome) {
    let recorded_as = if outcome.award.action != outcome.requested_action {
        format!(" (recorded as {})", outcome.award.action)
    } else {
        String::new()
    };
    println!(
        "- {}{}: +{} -> {} pts, level {}",
        outcome.requested_action,
        recorded_as,
        outcome.award.points,
        outcome.points_after,
        outcome.level_after
    );
    for achievement in &outcome.unlocked {
        println!(
            "  Unlocked {} {} (+{})",
            achievement.icon, achievement.name, achievement.reward.points
        );
    }
    if outcome.leveled_up() {
        println!(
            "  Level up: {} -> {}",
            outcome.level_before, outcome.level_after
        );
    }
}

fn render_progress(view: &LevelProgressView) {
    println!(
        "Level {} {} at {} pts ({:.0}% through tier)",
        view.level, view.name, view.points, view.progress_percentage
    );
    match &view.next_level {
        Some(next) => println!(
            "  {} pts to level {} {} (starts at {})",
            view.points_to_next, next.level, next.name, next.min_points
        ),
        None => println!("  Top level reached"),
    }
    if !view.benefits.is_empty() {
        println!("  Benefits: {}", view.benefits.join(", "));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_walks_the_demo_member_up_the_table() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 1).expect("valid date");
        let (service, notifications) =
            run_session(GamificationEngine::standard(), today).expect("session runs");

        let view = service
            .profile_view(&UserId::from(DEMO_USER), today)
            .expect("demo profile");
        // login 10, first deal 100 + 100 bonus, likes 10, comment 10, hot 100,
        // second deal 50, veteran bonus 500.
        assert_eq!(view.stats.points, 880);
        assert_eq!(view.stats.deals_posted, 2);
        assert_eq!(view.level.level, 4);

        let unlocked: Vec<_> = view
            .achievements
            .iter()
            .filter(|status| status.unlocked)
            .map(|status| status.definition.id.as_str())
            .collect();
        assert_eq!(unlocked, vec!["first_deal", "veteran"]);
        assert!(!notifications.events().is_empty());
    }

    #[test]
    fn demo_metric_maps_to_leaderboard_metric() {
        assert_eq!(
            LeaderboardMetric::from(DemoMetric::Likes),
            LeaderboardMetric::LikesReceived
        );
        assert_eq!(DemoMetric::default(), DemoMetric::Points);
    }
}
