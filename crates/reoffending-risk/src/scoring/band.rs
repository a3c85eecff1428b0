use serde::{Deserialize, Serialize};

use super::numeric::{MAX_SANITIZED_PERCENTAGE, MIN_SANITIZED_PERCENTAGE};

/// Ordered risk categories shared by every banded instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskBand {
    Low,
    Medium,
    High,
    VeryHigh,
}

impl RiskBand {
    /// Highest of two bands under `Low < Medium < High < VeryHigh`.
    pub fn highest(self, other: RiskBand) -> RiskBand {
        self.max(other)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BandingError {
    #[error("percentage {0} is outside the banded range 1-99")]
    OutOfRange(i32),
    #[error("band cut points must satisfy 1 < medium ({medium_from}) < high ({high_from}) < very high ({very_high_from}) <= 99")]
    InvalidCutPoints {
        medium_from: u8,
        high_from: u8,
        very_high_from: u8,
    },
}

/// Lower bounds (inclusive) of the upper three bands; everything below
/// `medium_from` is `Low`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandCutPoints {
    pub medium_from: u8,
    pub high_from: u8,
    pub very_high_from: u8,
}

impl BandCutPoints {
    pub fn new(medium_from: u8, high_from: u8, very_high_from: u8) -> Result<Self, BandingError> {
        let cut_points = Self {
            medium_from,
            high_from,
            very_high_from,
        };
        cut_points.validate()?;
        Ok(cut_points)
    }

    pub fn validate(&self) -> Result<(), BandingError> {
        let ordered = MIN_SANITIZED_PERCENTAGE < self.medium_from
            && self.medium_from < self.high_from
            && self.high_from < self.very_high_from
            && self.very_high_from <= MAX_SANITIZED_PERCENTAGE;

        if ordered {
            Ok(())
        } else {
            Err(BandingError::InvalidCutPoints {
                medium_from: self.medium_from,
                high_from: self.high_from,
                very_high_from: self.very_high_from,
            })
        }
    }

    /// Bands an already-sanitized percentage.
    pub fn band(&self, percentage: i32) -> Result<RiskBand, BandingError> {
        let in_range = (i32::from(MIN_SANITIZED_PERCENTAGE)..=i32::from(MAX_SANITIZED_PERCENTAGE))
            .contains(&percentage);
        if !in_range {
            return Err(BandingError::OutOfRange(percentage));
        }

        Ok(self.locate(percentage as u32))
    }

    /// Bands an unbounded points total (points instruments have no clamp).
    pub fn band_points(&self, points: u32) -> RiskBand {
        self.locate(points)
    }

    fn locate(&self, value: u32) -> RiskBand {
        if value >= u32::from(self.very_high_from) {
            RiskBand::VeryHigh
        } else if value >= u32::from(self.high_from) {
            RiskBand::High
        } else if value >= u32::from(self.medium_from) {
            RiskBand::Medium
        } else {
            RiskBand::Low
        }
    }
}
