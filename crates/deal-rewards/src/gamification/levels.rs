use serde::{Deserialize, Serialize};
use tracing::warn;

use super::catalog::CatalogError;

/// A named band of cumulative points.
///
/// `max_points` is inclusive; `None` marks the unbounded top tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelTier {
    pub level: u32,
    pub name: String,
    pub min_points: u64,
    pub max_points: Option<u64>,
    pub accent: String,
    pub benefits: Vec<String>,
}

impl LevelTier {
    pub fn contains(&self, points: u64) -> bool {
        points >= self.min_points && self.max_points.map_or(true, |max| points <= max)
    }

    pub fn is_unbounded(&self) -> bool {
        self.max_points.is_none()
    }
}

/// Ordered, non-empty sequence of tiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<LevelTier>", into = "Vec<LevelTier>")]
pub struct LevelTable {
    tiers: Vec<LevelTier>,
}

impl LevelTable {
    /// Build a table without checking contiguity; see [`LevelTable::validate`].
    pub fn new(tiers: Vec<LevelTier>) -> Result<Self, CatalogError> {
        if tiers.is_empty() {
            return Err(CatalogError::EmptyLevels);
        }
        Ok(Self { tiers })
    }

    /// Tables compiled into the binary, already known to be non-empty.
    pub(crate) fn from_trusted(tiers: Vec<LevelTier>) -> Self {
        debug_assert!(!tiers.is_empty());
        Self { tiers }
    }

    pub fn tiers(&self) -> &[LevelTier] {
        &self.tiers
    }

    pub fn first(&self) -> &LevelTier {
        &self.tiers[0]
    }

    pub fn last(&self) -> &LevelTier {
        &self.tiers[self.tiers.len() - 1]
    }

    /// Tier containing `points`. A table with a gap falls back to the first tier.
    pub fn resolve(&self, points: u64) -> &LevelTier {
        match self.tiers.iter().find(|tier| tier.contains(points)) {
            Some(tier) => tier,
            None => {
                warn!(points, "no level tier covers points, falling back to first tier");
                self.first()
            }
        }
    }

    pub fn next_after(&self, level: u32) -> Option<&LevelTier> {
        let wanted = level.checked_add(1)?;
        self.tiers.iter().find(|tier| tier.level == wanted)
    }

    pub fn points_to_next(&self, points: u64) -> u64 {
        let current = self.resolve(points);
        match self.next_after(current.level) {
            Some(next) => next.min_points.saturating_sub(points),
            None => 0,
        }
    }

    /// Progress through the current tier, in `[0, 100]`.
    pub fn progress_percentage(&self, points: u64) -> f64 {
        let tier = self.resolve(points);
        let Some(max) = tier.max_points else {
            return 100.0;
        };
        let span = max.saturating_sub(tier.min_points);
        if span == 0 {
            return 100.0;
        }
        let progress = points.saturating_sub(tier.min_points);
        (progress as f64 / span as f64 * 100.0).min(100.0)
    }

    /// Check that the tiers cover `[0, ∞)` exactly once, in ordinal order.
    pub fn validate(&self) -> Result<(), CatalogError> {
        let first = self.first();
        if first.min_points != 0 {
            return Err(CatalogError::LevelsStartAbove {
                min_points: first.min_points,
            });
        }

        for (index, tier) in self.tiers.iter().enumerate() {
            let expected = index as u32 + 1;
            if tier.level != expected {
                return Err(CatalogError::LevelOrdinal {
                    expected,
                    found: tier.level,
                });
            }
            if let Some(max) = tier.max_points {
                if max < tier.min_points {
                    return Err(CatalogError::InvertedLevel { level: tier.level });
                }
            }
        }

        for pair in self.tiers.windows(2) {
            let (current, next) = (&pair[0], &pair[1]);
            let Some(max) = current.max_points else {
                return Err(CatalogError::UnboundedBeforeLast {
                    level: current.level,
                });
            };
            let boundary = max.checked_add(1);
            if boundary != Some(next.min_points) {
                return Err(if next.min_points > max {
                    CatalogError::LevelGap {
                        after: current.level,
                        max_points: max,
                        next_min: next.min_points,
                    }
                } else {
                    CatalogError::LevelOverlap {
                        after: current.level,
                        max_points: max,
                        next_min: next.min_points,
                    }
                });
            }
        }

        if !self.last().is_unbounded() {
            return Err(CatalogError::BoundedTopLevel {
                level: self.last().level,
            });
        }

        Ok(())
    }
}

impl TryFrom<Vec<LevelTier>> for LevelTable {
    type Error = CatalogError;

    fn try_from(tiers: Vec<LevelTier>) -> Result<Self, Self::Error> {
        Self::new(tiers)
    }
}

impl From<LevelTable> for Vec<LevelTier> {
    fn from(table: LevelTable) -> Self {
        table.tiers
    }
}

/// What a level badge and progress bar need to render.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LevelProgressView {
    pub points: u64,
    pub level: u32,
    pub name: String,
    pub accent: String,
    pub benefits: Vec<String>,
    pub progress_percentage: f64,
    pub points_to_next: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_level: Option<NextLevelPreview>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NextLevelPreview {
    pub level: u32,
    pub name: String,
    pub min_points: u64,
    pub benefits: Vec<String>,
}

impl LevelProgressView {
    pub(crate) fn build(table: &LevelTable, points: u64) -> Self {
        let tier = table.resolve(points);
        let next_level = table.next_after(tier.level).map(|next| NextLevelPreview {
            level: next.level,
            name: next.name.clone(),
            min_points: next.min_points,
            benefits: next.benefits.clone(),
        });

        Self {
            points,
            level: tier.level,
            name: tier.name.clone(),
            accent: tier.accent.clone(),
            benefits: tier.benefits.clone(),
            progress_percentage: table.progress_percentage(points),
            points_to_next: table.points_to_next(points),
            next_level,
        }
    }

    pub fn is_max_level(&self) -> bool {
        self.next_level.is_none()
    }
}
