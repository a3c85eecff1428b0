use crate::scoring::{Gender, RiskBand};
use serde::{Deserialize, Serialize};

/// Weight applied to subjects of `gender` whose age falls in
/// `from_age..=to_age` (`to_age` absent means no upper limit).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgeGenderWeight {
    pub gender: Gender,
    pub from_age: u32,
    #[serde(default)]
    pub to_age: Option<u32>,
    pub weight: f64,
}

impl AgeGenderWeight {
    fn covers(&self, gender: Gender, age: u32) -> bool {
        self.gender == gender
            && age >= self.from_age
            && self.to_age.map_or(true, |to_age| age <= to_age)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgeGenderWeights(pub Vec<AgeGenderWeight>);

impl AgeGenderWeights {
    /// First entry covering the subject, in table order.
    pub fn weight(&self, gender: Gender, age: u32) -> Option<f64> {
        self.0
            .iter()
            .find(|entry| entry.covers(gender, age))
            .map(|entry| entry.weight)
    }

    pub(crate) fn validate(&self) -> Result<(), String> {
        for gender in [Gender::Male, Gender::Female] {
            if !self.0.iter().any(|entry| entry.gender == gender) {
                return Err(format!("no age/gender weights for {gender:?}"));
            }
        }

        for entry in &self.0 {
            if !entry.weight.is_finite() {
                return Err(format!("non-finite weight from age {}", entry.from_age));
            }
            if entry.to_age.is_some_and(|to_age| to_age < entry.from_age) {
                return Err(format!("age range starting at {} ends before it starts", entry.from_age));
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointsStep {
    pub from: u32,
    pub points: u32,
}

/// Step function from a count (or age) to points: the last step whose `from`
/// does not exceed the value applies; values below the first step score 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PointsScale(pub Vec<PointsStep>);

impl PointsScale {
    pub fn points_for(&self, value: u32) -> u32 {
        self.0
            .iter()
            .take_while(|step| step.from <= value)
            .last()
            .map_or(0, |step| step.points)
    }

    pub(crate) fn validate(&self) -> Result<(), String> {
        if self.0.windows(2).all(|pair| pair[0].from < pair[1].from) {
            Ok(())
        } else {
            Err("points steps must be listed in strictly increasing order".to_string())
        }
    }
}

/// Additive contribution attached to each band of a sexual-offending
/// instrument.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandContributions {
    pub low: f64,
    pub medium: f64,
    pub high: f64,
    pub very_high: f64,
}

impl BandContributions {
    pub fn for_band(&self, band: RiskBand) -> f64 {
        match band {
            RiskBand::Low => self.low,
            RiskBand::Medium => self.medium,
            RiskBand::High => self.high,
            RiskBand::VeryHigh => self.very_high,
        }
    }

    pub(crate) fn validate(&self) -> Result<(), String> {
        let values = [self.low, self.medium, self.high, self.very_high];
        if values.iter().all(|value| value.is_finite() && *value >= 0.0) {
            Ok(())
        } else {
            Err("band contributions must be finite and non-negative".to_string())
        }
    }
}
