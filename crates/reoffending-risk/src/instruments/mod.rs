//! Per-instrument scoring engines. Every engine is a pure function of its
//! validated input, its parameter block and (where needed) one offence table
//! snapshot.

pub mod general;
pub mod learning_needs;
pub mod maturity;
pub mod parameters;
pub mod pathway;
pub mod personality_disorder;
pub mod sexual_contact;
pub mod sexual_image;
pub mod violent;
mod weights;

pub use parameters::{ModelParameters, ParameterError};
pub use weights::{AgeGenderWeight, AgeGenderWeights, BandContributions, PointsScale, PointsStep};

use crate::scoring::{BandCutPoints, RiskBand, ScoreResult, ValidationErrors};
use serde::{Deserialize, Serialize};

/// Identity of each instrument, used when reporting missing upstream results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Instrument {
    General,
    Violent,
    SexualContact,
    SexualImage,
    PersonalityDisorder,
    Maturity,
    LearningNeeds,
    Pathway,
}

impl Instrument {
    pub fn name(self) -> &'static str {
        match self {
            Instrument::General => "general",
            Instrument::Violent => "violent",
            Instrument::SexualContact => "sexual_contact",
            Instrument::SexualImage => "sexual_image",
            Instrument::PersonalityDisorder => "personality_disorder",
            Instrument::Maturity => "maturity",
            Instrument::LearningNeeds => "learning_needs",
            Instrument::Pathway => "pathway",
        }
    }
}

/// Bands a sanitized percentage, reporting the (unreachable in normal flow)
/// out-of-range case as a validation error on `field`.
pub(crate) fn band_for(
    bands: &BandCutPoints,
    percentage: u8,
    field: &'static str,
) -> ScoreResult<RiskBand> {
    bands
        .band(i32::from(percentage))
        .map_err(|err| ValidationErrors::single(field, err.to_string()))
}
