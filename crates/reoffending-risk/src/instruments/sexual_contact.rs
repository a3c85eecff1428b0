//! Contact sexual reoffending: points from sexual sanction history, victim
//! profile and age, banded and turned into an additive contribution.

use super::{BandContributions, PointsScale};
use crate::scoring::numeric::round_to_5_decimals;
use crate::scoring::subject::whole_years_between;
use crate::scoring::{BandCutPoints, Gender, RiskBand, ScoreResult, ValidationErrors};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SexualContactInput {
    pub gender: Gender,
    pub date_of_birth: NaiveDate,
    pub assessment_date: NaiveDate,
    pub contact_adult_sanctions: u32,
    pub contact_child_sanctions: u32,
    pub non_contact_sanctions: u32,
    /// Required once any contact sanction is recorded.
    #[serde(default)]
    pub stranger_victim: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SexualContactParameters {
    pub contact_adult_points: PointsScale,
    pub contact_child_points: PointsScale,
    pub non_contact_points: PointsScale,
    pub stranger_victim_points: u32,
    /// Keyed by age in whole years at the assessment date.
    pub age_points: PointsScale,
    pub bands: BandCutPoints,
    pub contributions: BandContributions,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SexualContactScore {
    pub points: u32,
    pub band: RiskBand,
    pub contribution: f64,
}

pub fn score(
    input: &SexualContactInput,
    parameters: &SexualContactParameters,
) -> ScoreResult<SexualContactScore> {
    let mut errors = ValidationErrors::new();

    if input.gender != Gender::Male {
        errors.push("gender", "contact sexual reoffending applies to male subjects only");
    }

    let age = whole_years_between(input.date_of_birth, input.assessment_date);
    if age.is_none() {
        errors.push("date_of_birth", "must precede the assessment date");
    }

    let contact_history = input.contact_adult_sanctions > 0 || input.contact_child_sanctions > 0;
    let stranger_victim = match input.stranger_victim {
        Some(flag) => flag,
        None if contact_history => {
            errors.push(
                "stranger_victim",
                "required when contact sexual sanctions are recorded",
            );
            false
        }
        None => false,
    };

    let Some(age) = age else {
        return Err(errors);
    };
    if !errors.is_empty() {
        return Err(errors);
    }

    let mut points = parameters
        .contact_adult_points
        .points_for(input.contact_adult_sanctions)
        + parameters
            .contact_child_points
            .points_for(input.contact_child_sanctions)
        + parameters
            .non_contact_points
            .points_for(input.non_contact_sanctions)
        + parameters.age_points.points_for(age);
    if stranger_victim {
        points += parameters.stranger_victim_points;
    }

    let band = parameters.bands.band_points(points);
    Ok(SexualContactScore {
        points,
        band,
        contribution: round_to_5_decimals(parameters.contributions.for_band(band)),
    })
}
