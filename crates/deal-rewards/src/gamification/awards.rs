use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::catalog::CatalogError;

/// Closed set of actions that earn points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointAction {
    PostDeal,
    ReceiveLike,
    MakeComment,
    DealMarkedHot,
    FirstDeal,
    DailyLogin,
}

impl PointAction {
    pub const fn ordered() -> [Self; 6] {
        [
            Self::PostDeal,
            Self::ReceiveLike,
            Self::MakeComment,
            Self::DealMarkedHot,
            Self::FirstDeal,
            Self::DailyLogin,
        ]
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PostDeal => "post_deal",
            Self::ReceiveLike => "receive_like",
            Self::MakeComment => "make_comment",
            Self::DealMarkedHot => "deal_marked_hot",
            Self::FirstDeal => "first_deal",
            Self::DailyLogin => "daily_login",
        }
    }
}

impl fmt::Display for PointAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PointAction {
    type Err = ConfigurationError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::ordered()
            .into_iter()
            .find(|action| action.as_str() == raw)
            .ok_or_else(|| ConfigurationError::UnknownAction(raw.to_string()))
    }
}

/// Fixed point value granted for an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointAward {
    pub action: PointAction,
    pub points: u64,
    pub description: String,
}

/// Lookup failures that indicate a miswired call site or table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("unknown point action '{0}'")]
    UnknownAction(String),
    #[error("no award configured for action '{0}'")]
    MissingAward(PointAction),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<PointAward>", into = "Vec<PointAward>")]
pub struct AwardTable {
    awards: Vec<PointAward>,
}

impl AwardTable {
    pub fn new(awards: Vec<PointAward>) -> Result<Self, CatalogError> {
        for (index, award) in awards.iter().enumerate() {
            if award.points == 0 {
                return Err(CatalogError::ZeroAward(award.action));
            }
            if awards[..index].iter().any(|seen| seen.action == award.action) {
                return Err(CatalogError::DuplicateAward(award.action));
            }
        }
        Ok(Self { awards })
    }

    pub(crate) fn from_trusted(awards: Vec<PointAward>) -> Self {
        Self { awards }
    }

    pub fn awards(&self) -> &[PointAward] {
        &self.awards
    }

    pub fn award(&self, action: PointAction) -> Result<&PointAward, ConfigurationError> {
        self.awards
            .iter()
            .find(|award| award.action == action)
            .ok_or(ConfigurationError::MissingAward(action))
    }

    pub fn award_for(&self, action_id: &str) -> Result<&PointAward, ConfigurationError> {
        let action = action_id.parse::<PointAction>()?;
        self.award(action)
    }
}

impl TryFrom<Vec<PointAward>> for AwardTable {
    type Error = CatalogError;

    fn try_from(awards: Vec<PointAward>) -> Result<Self, Self::Error> {
        Self::new(awards)
    }
}

impl From<AwardTable> for Vec<PointAward> {
    fn from(table: AwardTable) -> Self {
        table.awards
    }
}
