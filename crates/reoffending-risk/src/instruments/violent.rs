//! Violent reoffending: one- and two-year likelihood of a proven violent
//! reoffence from sanction history and dynamic need ratings.

use super::{band_for, AgeGenderWeights};
use crate::offences::{OffenceTable, WeightingKind, WeightingLookup};
use crate::scoring::numeric::{predictor_to_percentage, round_to_5_decimals};
use crate::scoring::subject::whole_years_between;
use crate::scoring::{
    BandCutPoints, Gender, Ordinal, ProblemLevel, RiskBand, ScoreResult, ValidationErrors,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViolentReoffendingInput {
    pub gender: Gender,
    pub date_of_birth: NaiveDate,
    pub assessment_date: NaiveDate,
    pub violent_sanctions: u32,
    pub non_violent_sanctions: u32,
    pub current_offence_code: String,
    #[serde(default)]
    pub accommodation: Option<ProblemLevel>,
    #[serde(default)]
    pub employment: Option<ProblemLevel>,
    #[serde(default)]
    pub alcohol_misuse: Option<ProblemLevel>,
    #[serde(default)]
    pub temper_control: Option<ProblemLevel>,
    #[serde(default)]
    pub pro_criminal_attitudes: Option<ProblemLevel>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViolentNeedCoefficients {
    pub accommodation: f64,
    pub employment: f64,
    pub alcohol_misuse: f64,
    pub temper_control: f64,
    pub pro_criminal_attitudes: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViolentParameters {
    pub one_year_intercept: f64,
    pub two_year_intercept: f64,
    /// Multiplies `ln(1 + violent sanctions)`.
    pub violent_sanctions_coefficient: f64,
    /// Multiplies `ln(1 + non-violent sanctions)`.
    pub non_violent_sanctions_coefficient: f64,
    pub needs: ViolentNeedCoefficients,
    pub age_gender: AgeGenderWeights,
    pub bands: BandCutPoints,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViolentScore {
    pub one_year_percentage: u8,
    pub two_year_percentage: u8,
    pub band: RiskBand,
}

pub fn score(
    input: &ViolentReoffendingInput,
    parameters: &ViolentParameters,
    offences: &OffenceTable,
) -> ScoreResult<ViolentScore> {
    let mut errors = ValidationErrors::new();

    let age_weight = match whole_years_between(input.date_of_birth, input.assessment_date) {
        None => {
            errors.push("date_of_birth", "must precede the assessment date");
            None
        }
        Some(age) => {
            let weight = parameters.age_gender.weight(input.gender, age);
            if weight.is_none() {
                errors.push(
                    "date_of_birth",
                    format!("no age/gender weighting covers age {age}"),
                );
            }
            weight
        }
    };

    // Offences outside the violent weighting contribute nothing.
    let offence_weight = match offences.weighting(&input.current_offence_code, WeightingKind::Violent)
    {
        WeightingLookup::Found(weight) => weight,
        WeightingLookup::NotWeighted => 0.0,
        WeightingLookup::UnknownCode => {
            errors.push(
                "current_offence_code",
                format!("offence code {} is not recognised", input.current_offence_code),
            );
            0.0
        }
    };

    let coefficients = &parameters.needs;
    let needs = [
        ("accommodation", input.accommodation, coefficients.accommodation),
        ("employment", input.employment, coefficients.employment),
        ("alcohol_misuse", input.alcohol_misuse, coefficients.alcohol_misuse),
        ("temper_control", input.temper_control, coefficients.temper_control),
        (
            "pro_criminal_attitudes",
            input.pro_criminal_attitudes,
            coefficients.pro_criminal_attitudes,
        ),
    ];

    let mut need_term = 0.0;
    for (field, rating, coefficient) in needs {
        match rating {
            Some(level) => {
                need_term += round_to_5_decimals(f64::from(level.magnitude()) * coefficient)
            }
            None => errors.push(field, "required for the violent reoffending score"),
        }
    }

    let Some(age_weight) = age_weight else {
        return Err(errors);
    };
    if !errors.is_empty() {
        return Err(errors);
    }

    let history_term = round_to_5_decimals(
        parameters.violent_sanctions_coefficient * log_count(input.violent_sanctions),
    ) + round_to_5_decimals(
        parameters.non_violent_sanctions_coefficient * log_count(input.non_violent_sanctions),
    );
    let linear_predictor =
        round_to_5_decimals(age_weight + history_term + need_term + offence_weight);

    let one_year_percentage =
        predictor_to_percentage(linear_predictor + parameters.one_year_intercept);
    let two_year_percentage =
        predictor_to_percentage(linear_predictor + parameters.two_year_intercept);
    let band = band_for(&parameters.bands, two_year_percentage, "two_year_percentage")?;

    Ok(ViolentScore {
        one_year_percentage,
        two_year_percentage,
        band,
    })
}

fn log_count(count: u32) -> f64 {
    round_to_5_decimals(f64::from(count).ln_1p())
}
