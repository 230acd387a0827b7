use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::sync::{Arc, OnceLock};

use serde::{Deserialize, Serialize};

use super::achievements::{
    AchievementCategory, AchievementDefinition, AchievementId, AchievementReward, Requirement,
    RequirementKind,
};
use super::awards::{AwardTable, PointAction, PointAward};
use super::levels::{LevelTable, LevelTier};

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read rewards catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid rewards catalog JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("level table is empty")]
    EmptyLevels,
    #[error("level table must start at 0 points, first tier starts at {min_points}")]
    LevelsStartAbove { min_points: u64 },
    #[error("level ordinals must run 1..N, expected {expected} but found {found}")]
    LevelOrdinal { expected: u32, found: u32 },
    #[error("level {level} ends before it starts")]
    InvertedLevel { level: u32 },
    #[error("gap after level {after}: tier ends at {max_points}, next starts at {next_min}")]
    LevelGap {
        after: u32,
        max_points: u64,
        next_min: u64,
    },
    #[error("overlap after level {after}: tier ends at {max_points}, next starts at {next_min}")]
    LevelOverlap {
        after: u32,
        max_points: u64,
        next_min: u64,
    },
    #[error("level {level} is unbounded but is not the top tier")]
    UnboundedBeforeLast { level: u32 },
    #[error("top level {level} must have no upper bound")]
    BoundedTopLevel { level: u32 },
    #[error("action '{0}' has more than one award")]
    DuplicateAward(PointAction),
    #[error("action '{0}' must award a positive number of points")]
    ZeroAward(PointAction),
    #[error("achievement '{0}' is defined more than once")]
    DuplicateAchievement(String),
}

/// Level, award and achievement tables consumed by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GamificationCatalog {
    pub levels: LevelTable,
    pub awards: AwardTable,
    pub achievements: Vec<AchievementDefinition>,
}

impl GamificationCatalog {
    /// Built-in tables, constructed once per process.
    pub fn standard() -> Arc<Self> {
        static STANDARD: OnceLock<Arc<GamificationCatalog>> = OnceLock::new();
        STANDARD
            .get_or_init(|| {
                Arc::new(Self {
                    levels: LevelTable::from_trusted(standard_level_tiers()),
                    awards: AwardTable::from_trusted(standard_point_awards()),
                    achievements: standard_achievements(),
                })
            })
            .clone()
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Parse a JSON catalog and reject any table that breaks the level or id invariants.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let catalog: Self = serde_json::from_reader(reader)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        self.levels.validate()?;

        for (index, achievement) in self.achievements.iter().enumerate() {
            if self.achievements[..index]
                .iter()
                .any(|seen| seen.id == achievement.id)
            {
                return Err(CatalogError::DuplicateAchievement(
                    achievement.id.0.clone(),
                ));
            }
        }

        Ok(())
    }

    pub fn achievement(&self, id: &AchievementId) -> Option<&AchievementDefinition> {
        self.achievements.iter().find(|achievement| &achievement.id == id)
    }
}

fn tier(
    level: u32,
    name: &str,
    min_points: u64,
    max_points: Option<u64>,
    accent: &str,
    benefits: &[&str],
) -> LevelTier {
    LevelTier {
        level,
        name: name.to_string(),
        min_points,
        max_points,
        accent: accent.to_string(),
        benefits: benefits.iter().map(|benefit| benefit.to_string()).collect(),
    }
}

fn standard_level_tiers() -> Vec<LevelTier> {
    const NEWCOMER: &[&str] = &["Postar promoções", "Curtir e comentar"];
    const INTERMEDIATE: &[&str] = &["Destacar promoções", "Criar alertas personalizados"];
    const ADVANCED: &[&str] = &["Moderação básica", "Badge especial", "Prioridade no suporte"];
    const EXPERT: &[&str] = &["Moderação avançada", "Acesso antecipado", "Cupons exclusivos"];
    const LEGEND: &[&str] = &["Todos os privilégios", "Badge dourado", "Programa VIP"];

    vec![
        tier(1, "Iniciante", 0, Some(99), "bg-gray-500", NEWCOMER),
        tier(2, "Iniciante", 100, Some(249), "bg-gray-500", NEWCOMER),
        tier(3, "Intermediário", 250, Some(499), "bg-green-500", INTERMEDIATE),
        tier(4, "Intermediário", 500, Some(999), "bg-green-500", INTERMEDIATE),
        tier(5, "Avançado", 1000, Some(1999), "bg-blue-500", ADVANCED),
        tier(6, "Avançado", 2000, Some(3999), "bg-blue-500", ADVANCED),
        tier(7, "Avançado", 4000, Some(7999), "bg-blue-500", ADVANCED),
        tier(8, "Expert", 8000, Some(15999), "bg-purple-500", EXPERT),
        tier(9, "Expert", 16000, Some(31999), "bg-purple-500", EXPERT),
        tier(10, "Lenda", 32000, None, "bg-yellow-500", LEGEND),
    ]
}

fn standard_point_awards() -> Vec<PointAward> {
    let award = |action, points, description: &str| PointAward {
        action,
        points,
        description: description.to_string(),
    };

    vec![
        award(PointAction::PostDeal, 50, "Postou uma nova promoção"),
        award(PointAction::ReceiveLike, 5, "Recebeu uma curtida"),
        award(PointAction::MakeComment, 10, "Fez um comentário"),
        award(
            PointAction::DealMarkedHot,
            100,
            "Promoção marcada como \"Em Alta\"",
        ),
        award(PointAction::FirstDeal, 100, "Primeira promoção postada"),
        award(PointAction::DailyLogin, 10, "Login diário"),
    ]
}

#[allow(clippy::too_many_arguments)]
fn achievement(
    id: &str,
    name: &str,
    description: &str,
    icon: &str,
    category: AchievementCategory,
    requirement: (RequirementKind, u64),
    points: u64,
    badge: &str,
    title: Option<&str>,
) -> AchievementDefinition {
    AchievementDefinition {
        id: AchievementId::from(id),
        name: name.to_string(),
        description: description.to_string(),
        icon: icon.to_string(),
        category,
        requirement: Requirement {
            kind: requirement.0,
            threshold: requirement.1,
        },
        reward: AchievementReward {
            points,
            badge: Some(badge.to_string()),
            title: title.map(str::to_string),
        },
    }
}

fn standard_achievements() -> Vec<AchievementDefinition> {
    use AchievementCategory::{Community, Engagement, Milestone, Posting};
    use RequirementKind::{
        CommentsMade, DaysActive, DealsPosted, LevelReached, LikesReceived, PointsEarned,
    };

    vec![
        achievement(
            "first_deal",
            "Primeira Promoção",
            "Postou sua primeira oferta",
            "🎯",
            Posting,
            (DealsPosted, 1),
            100,
            "Estreante",
            None,
        ),
        achievement(
            "deal_master",
            "Mestre das Promoções",
            "Postou 50 promoções",
            "🏆",
            Posting,
            (DealsPosted, 50),
            500,
            "Mestre",
            Some("Caçador de Ofertas"),
        ),
        achievement(
            "hundred_likes",
            "100 Curtidas",
            "Recebeu 100+ curtidas",
            "❤️",
            Engagement,
            (LikesReceived, 100),
            200,
            "Popular",
            None,
        ),
        achievement(
            "thousand_likes",
            "Mil Curtidas",
            "Recebeu 1000+ curtidas",
            "💖",
            Engagement,
            (LikesReceived, 1000),
            1000,
            "Influencer",
            Some("Queridinho da Comunidade"),
        ),
        achievement(
            "active_commenter",
            "Comentarista",
            "Fez 100+ comentários",
            "💬",
            Community,
            (CommentsMade, 100),
            300,
            "Comunicativo",
            None,
        ),
        achievement(
            "veteran",
            "Veterano",
            "Membro há mais de 365 dias",
            "🎖️",
            Milestone,
            (DaysActive, 365),
            500,
            "Veterano",
            Some("Membro Fundador"),
        ),
        achievement(
            "point_collector",
            "Colecionador",
            "Acumulou 10.000 pontos",
            "💎",
            Milestone,
            (PointsEarned, 10_000),
            1000,
            "Colecionador",
            Some("Rei dos Pontos"),
        ),
        achievement(
            "level_master",
            "Nível Máximo",
            "Alcançou o nível 10",
            "👑",
            Milestone,
            (LevelReached, 10),
            2000,
            "Lenda",
            Some("Lenda do Pechinchou"),
        ),
    ]
}
