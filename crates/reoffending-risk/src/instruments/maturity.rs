//! Maturity screening for young adults.

use crate::scoring::checklist::{tally, ChecklistItem};
use crate::scoring::subject::whole_years_between;
use crate::scoring::{ProblemLevel, ScoreResult, ValidationErrors, YesSometimesNo};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaturityInput {
    pub date_of_birth: NaiveDate,
    pub assessment_date: NaiveDate,
    #[serde(default)]
    pub impulsivity: Option<ProblemLevel>,
    #[serde(default)]
    pub temper_control: Option<ProblemLevel>,
    #[serde(default)]
    pub problem_solving: Option<ProblemLevel>,
    #[serde(default)]
    pub awareness_of_consequences: Option<ProblemLevel>,
    #[serde(default)]
    pub peer_influence: Option<ProblemLevel>,
    #[serde(default)]
    pub understands_other_views: Option<YesSometimesNo>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaturityWeights {
    pub impulsivity: u32,
    pub temper_control: u32,
    pub problem_solving: u32,
    pub awareness_of_consequences: u32,
    pub peer_influence: u32,
    pub understands_other_views: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaturityParameters {
    pub min_age: u32,
    pub max_age: u32,
    pub weights: MaturityWeights,
    pub threshold: u32,
    pub max_missing_items: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaturityScore {
    pub score: u32,
    pub concerns_identified: bool,
}

pub fn score(input: &MaturityInput, parameters: &MaturityParameters) -> ScoreResult<MaturityScore> {
    let Some(age) = whole_years_between(input.date_of_birth, input.assessment_date) else {
        return Err(ValidationErrors::single(
            "date_of_birth",
            "must precede the assessment date",
        ));
    };
    if !(parameters.min_age..=parameters.max_age).contains(&age) {
        return Err(ValidationErrors::single(
            "date_of_birth",
            format!(
                "maturity screening applies to ages {} to {}, subject is {age}",
                parameters.min_age, parameters.max_age
            ),
        ));
    }

    let weights = &parameters.weights;
    let items = [
        ChecklistItem::graded("impulsivity", input.impulsivity, weights.impulsivity),
        ChecklistItem::graded("temper_control", input.temper_control, weights.temper_control),
        ChecklistItem::graded("problem_solving", input.problem_solving, weights.problem_solving),
        ChecklistItem::graded(
            "awareness_of_consequences",
            input.awareness_of_consequences,
            weights.awareness_of_consequences,
        ),
        ChecklistItem::graded("peer_influence", input.peer_influence, weights.peer_influence),
        ChecklistItem::graded(
            "understands_other_views",
            input.understands_other_views,
            weights.understands_other_views,
        ),
    ];

    let score = tally(&items, parameters.max_missing_items)?;
    Ok(MaturityScore {
        score,
        concerns_identified: score >= parameters.threshold,
    })
}
