//! Screening for eligibility for the personality-disorder offender pathway.

use crate::offences::OffenceTable;
use crate::scoring::checklist::{tally, ChecklistItem};
use crate::scoring::{Gender, ProblemLevel, ScoreResult};
use serde::{Deserialize, Serialize};

/// Checklist answers may be omitted; gender and offence code may not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalityDisorderInput {
    pub gender: Gender,
    /// Looked up in the offence table for the violent/sexual item.
    pub current_offence_code: String,
    pub childhood_behaviour_problems: Option<bool>,
    pub psychiatric_treatment_history: Option<bool>,
    pub self_harm_or_suicide_attempt: Option<bool>,
    pub impulsivity: Option<ProblemLevel>,
    pub temper_control: Option<ProblemLevel>,
    pub pro_criminal_attitudes: Option<ProblemLevel>,
    pub hostile_orientation: Option<ProblemLevel>,
    pub manipulative_behaviour: Option<ProblemLevel>,
    pub childhood_relationship_difficulties: Option<ProblemLevel>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalityDisorderWeights {
    pub childhood_behaviour_problems: u32,
    pub psychiatric_treatment_history: u32,
    pub self_harm_or_suicide_attempt: u32,
    pub violent_or_sexual_offence: u32,
    pub impulsivity: u32,
    pub temper_control: u32,
    pub pro_criminal_attitudes: u32,
    pub hostile_orientation: u32,
    pub manipulative_behaviour: u32,
    pub childhood_relationship_difficulties: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalityDisorderParameters {
    pub weights: PersonalityDisorderWeights,
    pub male_threshold: u32,
    pub female_threshold: u32,
    pub max_missing_items: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalityDisorderScore {
    pub score: u32,
    pub eligible: bool,
}

pub fn score(
    input: &PersonalityDisorderInput,
    parameters: &PersonalityDisorderParameters,
    offences: &OffenceTable,
) -> ScoreResult<PersonalityDisorderScore> {
    // An unrecognised code leaves the item uncollected rather than false.
    let violent_or_sexual = offences
        .lookup(&input.current_offence_code)
        .map(|offence| offence.is_violent_or_sexual());

    let weights = &parameters.weights;
    let items = [
        ChecklistItem::graded(
            "childhood_behaviour_problems",
            input.childhood_behaviour_problems,
            weights.childhood_behaviour_problems,
        ),
        ChecklistItem::graded(
            "psychiatric_treatment_history",
            input.psychiatric_treatment_history,
            weights.psychiatric_treatment_history,
        ),
        ChecklistItem::graded(
            "self_harm_or_suicide_attempt",
            input.self_harm_or_suicide_attempt,
            weights.self_harm_or_suicide_attempt,
        ),
        ChecklistItem::graded(
            "current_offence_code",
            violent_or_sexual,
            weights.violent_or_sexual_offence,
        ),
        ChecklistItem::graded("impulsivity", input.impulsivity, weights.impulsivity),
        ChecklistItem::graded("temper_control", input.temper_control, weights.temper_control),
        ChecklistItem::graded(
            "pro_criminal_attitudes",
            input.pro_criminal_attitudes,
            weights.pro_criminal_attitudes,
        ),
        ChecklistItem::graded(
            "hostile_orientation",
            input.hostile_orientation,
            weights.hostile_orientation,
        ),
        ChecklistItem::graded(
            "manipulative_behaviour",
            input.manipulative_behaviour,
            weights.manipulative_behaviour,
        ),
        ChecklistItem::graded(
            "childhood_relationship_difficulties",
            input.childhood_relationship_difficulties,
            weights.childhood_relationship_difficulties,
        ),
    ];

    let score = tally(&items, parameters.max_missing_items)?;
    let threshold = match input.gender {
        Gender::Male => parameters.male_threshold,
        Gender::Female => parameters.female_threshold,
    };

    Ok(PersonalityDisorderScore {
        score,
        eligible: score >= threshold,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::offences::{OffenceCode, OffenceFlags};

    fn parameters() -> PersonalityDisorderParameters {
        PersonalityDisorderParameters {
            weights: PersonalityDisorderWeights {
                childhood_behaviour_problems: 1,
                psychiatric_treatment_history: 1,
                self_harm_or_suicide_attempt: 1,
                violent_or_sexual_offence: 2,
                impulsivity: 1,
                temper_control: 1,
                pro_criminal_attitudes: 1,
                hostile_orientation: 1,
                manipulative_behaviour: 1,
                childhood_relationship_difficulties: 1,
            },
            male_threshold: 7,
            female_threshold: 5,
            max_missing_items: 2,
        }
    }

    fn offences() -> OffenceTable {
        OffenceTable::from_offences(vec![
            OffenceCode::new("00501", "Violence", "Wounding", OffenceFlags {
                violent: true,
                ..OffenceFlags::default()
            }),
            OffenceCode::new("02801", "Theft", "Shoplifting", OffenceFlags::default()),
        ])
    }

    fn input() -> PersonalityDisorderInput {
        PersonalityDisorderInput {
            gender: Gender::Male,
            current_offence_code: "00501".to_string(),
            childhood_behaviour_problems: Some(true),
            psychiatric_treatment_history: Some(false),
            self_harm_or_suicide_attempt: Some(true),
            impulsivity: Some(ProblemLevel::SignificantProblems),
            temper_control: Some(ProblemLevel::SomeProblems),
            pro_criminal_attitudes: Some(ProblemLevel::NoProblems),
            hostile_orientation: Some(ProblemLevel::NoProblems),
            manipulative_behaviour: Some(ProblemLevel::NoProblems),
            childhood_relationship_difficulties: Some(ProblemLevel::NoProblems),
        }
    }

    #[test]
    fn threshold_depends_on_gender() {
        // 1 + 0 + 1 + 2 (violent offence) + 2 + 1 = 7
        let male = score(&input(), &parameters(), &offences()).expect("scores");
        assert_eq!(male.score, 7);
        assert!(male.eligible);

        let mut female = input();
        female.gender = Gender::Female;
        female.current_offence_code = "02801".to_string();
        let result = score(&female, &parameters(), &offences()).expect("scores");
        assert_eq!(result.score, 5);
        assert!(result.eligible);
    }

    #[test]
    fn unknown_offence_code_counts_as_missing_item() {
        let mut unknown = input();
        unknown.current_offence_code = "99999".to_string();
        let result = score(&unknown, &parameters(), &offences()).expect("within tolerance");
        assert_eq!(result.score, 5);
        assert!(!result.eligible);

        unknown.impulsivity = None;
        unknown.temper_control = None;
        let errors = score(&unknown, &parameters(), &offences()).expect_err("too many missing");
        assert_eq!(
            errors.fields(),
            vec!["current_offence_code", "impulsivity", "temper_control"]
        );
    }

    #[test]
    fn gender_and_offence_code_are_required_but_items_are_not() {
        let anonymous = serde_json::json!({ "current_offence_code": "00501" });
        assert!(serde_json::from_value::<PersonalityDisorderInput>(anonymous).is_err());

        let uncoded = serde_json::json!({ "gender": "MALE" });
        assert!(serde_json::from_value::<PersonalityDisorderInput>(uncoded).is_err());

        let sparse = serde_json::json!({ "gender": "MALE", "current_offence_code": "00501" });
        let input: PersonalityDisorderInput =
            serde_json::from_value(sparse).expect("checklist items may be omitted");
        assert_eq!(input.impulsivity, None);
        assert_eq!(input.childhood_behaviour_problems, None);
    }
}
