// Survey profile and recommendation domain models
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

pub const MAX_WASTE_SCORE: u8 = 5;
pub const MAX_ATTITUDE_SCORE: u8 = 10;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ProfileError {
    #[error("{field} must be between 1 and {max}, got {value}")]
    ScoreOutOfRange {
        field: &'static str,
        value: u8,
        max: u8,
    },

    #[error("electricity_usage must be a non-negative number, got {0}")]
    InvalidElectricity(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TransportMode {
    #[serde(rename = "자가용")]
    Car,
    #[serde(rename = "대중교통")]
    PublicTransit,
    #[serde(rename = "자전거")]
    Bicycle,
    #[serde(rename = "도보")]
    Walking,
}

/// Answers submitted through the self-check survey.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub age: u32,
    pub region: String,
    /// Selected modes; a repeated mode counts once.
    #[serde(default)]
    pub transport: BTreeSet<TransportMode>,
    /// Monthly household usage in kWh.
    pub electricity_usage: f64,
    /// Waste sorting habit, 1 (never) to 5 (always).
    pub waste_score: u8,
    pub concern_score: u8,
    pub future_anxiety_score: u8,
    pub willingness_score: u8,
}

impl UserProfile {
    pub fn uses_car(&self) -> bool {
        self.transport.contains(&TransportMode::Car)
    }

    pub fn validate(&self) -> Result<(), ProfileError> {
        let scores = [
            ("waste_score", self.waste_score, MAX_WASTE_SCORE),
            ("concern_score", self.concern_score, MAX_ATTITUDE_SCORE),
            ("future_anxiety_score", self.future_anxiety_score, MAX_ATTITUDE_SCORE),
            ("willingness_score", self.willingness_score, MAX_ATTITUDE_SCORE),
        ];
        for (field, value, max) in scores {
            if !(1..=max).contains(&value) {
                return Err(ProfileError::ScoreOutOfRange { field, value, max });
            }
        }
        if !self.electricity_usage.is_finite() || self.electricity_usage < 0.0 {
            return Err(ProfileError::InvalidElectricity(self.electricity_usage));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub action: String,
    pub impact: String,
    pub difficulty: Difficulty,
    pub detail: String,
    pub priority: Priority,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketCounts {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationReport {
    pub recommendations: Vec<Recommendation>,
    pub carbon_estimate_kg: f64,
    pub stress_index: f64,
    pub action_gap: f64,
    pub counts: BucketCounts,
}

impl RecommendationReport {
    pub fn by_priority(&self, priority: Priority) -> impl Iterator<Item = &Recommendation> {
        self.recommendations
            .iter()
            .filter(move |r| r.priority == priority)
    }
}
