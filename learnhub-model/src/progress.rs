use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use uuid::Uuid;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Completion state of one user's engagement with one content item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "progress_status", rename_all = "snake_case")
)]
pub enum ProgressStatus {
    #[default]
    NotStarted,
    InProgress,
    Completed,
}

impl ProgressStatus {
    pub const ALL: [ProgressStatus; 3] = [
        ProgressStatus::NotStarted,
        ProgressStatus::InProgress,
        ProgressStatus::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProgressStatus::NotStarted => "not_started",
            ProgressStatus::InProgress => "in_progress",
            ProgressStatus::Completed => "completed",
        }
    }
}

impl Display for ProgressStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProgressStatus {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ModelError::UnknownVariant {
                kind: "progress status",
                value: s.to_string(),
            })
    }
}

/// Completion percentage, guaranteed to be within `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "i64", into = "i32"))]
pub struct ProgressPercentage(u8);

impl ProgressPercentage {
    pub const COMPLETE: ProgressPercentage = ProgressPercentage(100);

    pub fn new(value: i64) -> Result<Self, ModelError> {
        if (0..=100).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(ModelError::PercentageOutOfRange(value))
        }
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for ProgressPercentage {
    type Error = ModelError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ProgressPercentage> for i32 {
    fn from(value: ProgressPercentage) -> Self {
        i32::from(value.0)
    }
}

/// Stored progress row.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Progress {
    pub id: Uuid,
    pub user_id: Uuid,
    pub content_id: Uuid,
    pub status: ProgressStatus,
    pub progress_percentage: ProgressPercentage,
    pub last_updated: DateTime<Utc>,
}

/// Aggregate dashboard numbers for one user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ProgressStats {
    pub completed: u64,
    pub in_progress: u64,
    pub saved: u64,
    /// Mean percentage across all progress rows, rounded half away from zero.
    pub total_progress: u8,
}

impl ProgressStats {
    pub fn from_progress(progress: &[Progress], saved: u64) -> Self {
        let completed = progress
            .iter()
            .filter(|p| p.status == ProgressStatus::Completed)
            .count() as u64;
        let in_progress = progress
            .iter()
            .filter(|p| p.status == ProgressStatus::InProgress)
            .count() as u64;
        let total_progress = if progress.is_empty() {
            0
        } else {
            let sum: u64 = progress
                .iter()
                .map(|p| u64::from(p.progress_percentage.value()))
                .sum();
            (sum as f64 / progress.len() as f64).round() as u8
        };

        Self {
            completed,
            in_progress,
            saved,
            total_progress,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(status: ProgressStatus, pct: i64) -> Progress {
        Progress {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            content_id: Uuid::new_v4(),
            status,
            progress_percentage: ProgressPercentage::new(pct).unwrap(),
            last_updated: Utc::now(),
        }
    }

    #[test]
    fn percentage_bounds_are_inclusive() {
        assert!(ProgressPercentage::new(0).is_ok());
        assert!(ProgressPercentage::new(100).is_ok());
        assert_eq!(
            ProgressPercentage::new(101),
            Err(ModelError::PercentageOutOfRange(101))
        );
        assert!(ProgressPercentage::new(-1).is_err());
    }

    #[test]
    fn stats_average_is_rounded() {
        let rows = vec![
            row(ProgressStatus::Completed, 100),
            row(ProgressStatus::InProgress, 25),
            row(ProgressStatus::InProgress, 50),
            row(ProgressStatus::NotStarted, 0),
        ];
        let stats = ProgressStats::from_progress(&rows, 7);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.in_progress, 2);
        assert_eq!(stats.saved, 7);
        // 175 / 4 = 43.75
        assert_eq!(stats.total_progress, 44);
    }

    #[test]
    fn stats_for_empty_progress_are_zero() {
        let stats = ProgressStats::from_progress(&[], 3);
        assert_eq!(stats, ProgressStats {
            completed: 0,
            in_progress: 0,
            saved: 3,
            total_progress: 0,
        });
    }

    #[cfg(feature = "serde")]
    #[test]
    fn percentage_rejects_out_of_range_json() {
        assert!(serde_json::from_str::<ProgressPercentage>("150").is_err());
        let pct: ProgressPercentage = serde_json::from_str("75").unwrap();
        assert_eq!(pct.value(), 75);
        assert_eq!(
            serde_json::to_value(ProgressStatus::InProgress).unwrap(),
            "in_progress"
        );
    }
}
