//! General reoffending: one- and two-year proven reoffending likelihood from
//! static offence-history factors.

use super::{band_for, AgeGenderWeights};
use crate::offences::{OffenceTable, WeightingKind, WeightingLookup};
use crate::scoring::numeric::{predictor_to_percentage, round_to_5_decimals};
use crate::scoring::subject::whole_years_between;
use crate::scoring::{BandCutPoints, Gender, RiskBand, ScoreResult, ValidationErrors};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Youngest age at which a sanction can have been received.
pub const MINIMUM_AGE_OF_CRIMINAL_RESPONSIBILITY: u32 = 10;

/// Constant added to the career length inside the Copas rate.
const COPAS_CAREER_OFFSET: f64 = 10.0;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneralReoffendingInput {
    pub gender: Gender,
    pub date_of_birth: NaiveDate,
    pub date_of_current_conviction: NaiveDate,
    pub date_of_first_sanction: NaiveDate,
    /// Sanctions to date, including the current one.
    pub total_sanctions: u32,
    pub current_offence_code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneralParameters {
    pub one_year_intercept: f64,
    pub two_year_intercept: f64,
    pub copas_coefficient: f64,
    /// Applied only when the current sanction is the first one.
    pub first_sanction_coefficient: f64,
    pub age_gender: AgeGenderWeights,
    pub bands: BandCutPoints,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneralScore {
    pub one_year_percentage: u8,
    pub two_year_percentage: u8,
    pub band: RiskBand,
}

pub fn score(
    input: &GeneralReoffendingInput,
    parameters: &GeneralParameters,
    offences: &OffenceTable,
) -> ScoreResult<GeneralScore> {
    let mut errors = ValidationErrors::new();

    let age = whole_years_between(input.date_of_birth, input.date_of_current_conviction);
    if age.is_none() {
        errors.push(
            "date_of_birth",
            "must precede the date of the current conviction",
        );
    }

    let career_years =
        whole_years_between(input.date_of_first_sanction, input.date_of_current_conviction);
    if career_years.is_none() {
        errors.push(
            "date_of_first_sanction",
            "must not be after the date of the current conviction",
        );
    }

    match whole_years_between(input.date_of_birth, input.date_of_first_sanction) {
        None => errors.push("date_of_birth", "must precede the date of the first sanction"),
        Some(age_at_first) if age_at_first < MINIMUM_AGE_OF_CRIMINAL_RESPONSIBILITY => errors.push(
            "date_of_first_sanction",
            format!(
                "subject was {age_at_first}, below the minimum age of criminal responsibility ({MINIMUM_AGE_OF_CRIMINAL_RESPONSIBILITY})"
            ),
        ),
        Some(_) => {}
    }

    if input.total_sanctions == 0 {
        errors.push("total_sanctions", "must include the current sanction");
    }

    let offence_weight = match offences.weighting(&input.current_offence_code, WeightingKind::General)
    {
        WeightingLookup::Found(weight) => Some(weight),
        WeightingLookup::NotWeighted => {
            errors.push(
                "current_offence_code",
                format!(
                    "offence {} has no general reoffending weighting",
                    input.current_offence_code
                ),
            );
            None
        }
        WeightingLookup::UnknownCode => {
            errors.push(
                "current_offence_code",
                format!("offence code {} is not recognised", input.current_offence_code),
            );
            None
        }
    };

    let age_weight = age.and_then(|age| {
        let weight = parameters.age_gender.weight(input.gender, age);
        if weight.is_none() {
            errors.push(
                "date_of_birth",
                format!("no age/gender weighting covers age {age}"),
            );
        }
        weight
    });

    let (Some(career_years), Some(offence_weight), Some(age_weight)) =
        (career_years, offence_weight, age_weight)
    else {
        return Err(errors);
    };
    if !errors.is_empty() {
        return Err(errors);
    }

    let copas_rate = copas_rate(input.total_sanctions, career_years);
    let first_sanction = if input.total_sanctions == 1 {
        parameters.first_sanction_coefficient
    } else {
        0.0
    };
    let linear_predictor = round_to_5_decimals(
        age_weight
            + offence_weight
            + round_to_5_decimals(parameters.copas_coefficient * copas_rate)
            + first_sanction,
    );

    let one_year_percentage =
        predictor_to_percentage(linear_predictor + parameters.one_year_intercept);
    let two_year_percentage =
        predictor_to_percentage(linear_predictor + parameters.two_year_intercept);
    let band = band_for(&parameters.bands, two_year_percentage, "two_year_percentage")?;

    Ok(GeneralScore {
        one_year_percentage,
        two_year_percentage,
        band,
    })
}

/// `ln(sanctions / (10 + career years))`, rounded to five places.
pub fn copas_rate(total_sanctions: u32, career_years: u32) -> f64 {
    let rate = f64::from(total_sanctions) / (COPAS_CAREER_OFFSET + f64::from(career_years));
    round_to_5_decimals(rate.ln())
}
