use serde::{Deserialize, Serialize};
use std::fmt::Display;

use crate::error::{RecommendError, RecommendResult};

/// Default number of recommendations per call
pub const DEFAULT_TOP_N: usize = 3;

/// Day-of-week and hour-of-day an order was placed at
///
/// Day 0 is Sunday, hour 0 is midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeContext {
    day_of_week: u8,
    hour_of_day: u8,
}

impl TimeContext {
    pub fn new(day_of_week: u8, hour_of_day: u8) -> RecommendResult<Self> {
        if day_of_week > 6 {
            return Err(RecommendError::InvalidInput(format!(
                "day_of_week must be 0-6, got {}",
                day_of_week
            )));
        }
        if hour_of_day > 23 {
            return Err(RecommendError::InvalidInput(format!(
                "hour_of_day must be 0-23, got {}",
                hour_of_day
            )));
        }

        Ok(Self {
            day_of_week,
            hour_of_day,
        })
    }

    pub fn day_of_week(&self) -> u8 {
        self.day_of_week
    }

    pub fn hour_of_day(&self) -> u8 {
        self.hour_of_day
    }
}

impl Display for TimeContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "day: {} hour: {}", self.day_of_week, self.hour_of_day)
    }
}

/// How candidates are ordered before truncation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingMode {
    /// Raw co-occurrence count, highest first
    Raw,
    /// Co-occurrence count divided by the product's overall count, lowest first
    #[default]
    Proportional,
}

impl RankingMode {
    pub fn from_proportional(proportional: bool) -> Self {
        if proportional {
            RankingMode::Proportional
        } else {
            RankingMode::Raw
        }
    }
}

/// Which orders feed the candidate counts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderFilter {
    /// Orders containing a product whose name contains the target
    CoOccurrence { target: String },
    /// Orders placed at the given day and hour
    TimeOfDay { time: TimeContext },
    /// Union of the two above
    CoOccurrenceOrTime { target: String, time: TimeContext },
}

/// The three public recommenders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommenderKind {
    Combo,
    Similarity,
    Time,
}

impl Display for RecommenderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecommenderKind::Combo => write!(f, "combo"),
            RecommenderKind::Similarity => write!(f, "similarity"),
            RecommenderKind::Time => write!(f, "time"),
        }
    }
}

/// Fully resolved parameters for one recommendation call
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationQuery {
    pub kind: RecommenderKind,
    pub product_name: String,
    pub time: Option<TimeContext>,
    pub top_n: usize,
    pub ranking: RankingMode,
}

impl RecommendationQuery {
    pub fn combo(
        product_name: impl Into<String>,
        time: TimeContext,
        top_n: usize,
        ranking: RankingMode,
    ) -> Self {
        Self {
            kind: RecommenderKind::Combo,
            product_name: product_name.into(),
            time: Some(time),
            top_n,
            ranking,
        }
    }

    /// Similarity recommendations always rank by raw count
    pub fn similarity(product_name: impl Into<String>, top_n: usize) -> Self {
        Self {
            kind: RecommenderKind::Similarity,
            product_name: product_name.into(),
            time: None,
            top_n,
            ranking: RankingMode::Raw,
        }
    }

    pub fn time(
        product_name: impl Into<String>,
        time: TimeContext,
        top_n: usize,
        ranking: RankingMode,
    ) -> Self {
        Self {
            kind: RecommenderKind::Time,
            product_name: product_name.into(),
            time: Some(time),
            top_n,
            ranking,
        }
    }

    /// Builds the order-set filter for this query
    pub fn filter(&self) -> RecommendResult<OrderFilter> {
        let require_time = || {
            self.time.ok_or_else(|| {
                RecommendError::InvalidInput(format!("{} recommendations need a time context", self.kind))
            })
        };

        Ok(match self.kind {
            RecommenderKind::Similarity => OrderFilter::CoOccurrence {
                target: self.product_name.clone(),
            },
            RecommenderKind::Time => OrderFilter::TimeOfDay {
                time: require_time()?,
            },
            RecommenderKind::Combo => OrderFilter::CoOccurrenceOrTime {
                target: self.product_name.clone(),
                time: require_time()?,
            },
        })
    }
}
