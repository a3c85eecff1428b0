//! Learning-needs screening; a positive outcome means programme delivery
//! should be adapted.

use crate::scoring::checklist::{tally, ChecklistItem};
use crate::scoring::{Motivation, ProblemLevel, ScoreResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LearningNeedsInput {
    pub reading: Option<ProblemLevel>,
    pub writing: Option<ProblemLevel>,
    pub numeracy: Option<ProblemLevel>,
    pub learning_difficulties: Option<ProblemLevel>,
    pub no_qualifications: Option<bool>,
    pub attended_special_school: Option<bool>,
    pub motivation_to_learn: Option<Motivation>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearningNeedsWeights {
    pub reading: u32,
    pub writing: u32,
    pub numeracy: u32,
    pub learning_difficulties: u32,
    pub no_qualifications: u32,
    pub attended_special_school: u32,
    pub motivation_to_learn: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearningNeedsParameters {
    pub weights: LearningNeedsWeights,
    pub threshold: u32,
    pub max_missing_items: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearningNeedsScore {
    pub score: u32,
    pub needs_identified: bool,
}

pub fn score(
    input: &LearningNeedsInput,
    parameters: &LearningNeedsParameters,
) -> ScoreResult<LearningNeedsScore> {
    let weights = &parameters.weights;
    let items = [
        ChecklistItem::graded("reading", input.reading, weights.reading),
        ChecklistItem::graded("writing", input.writing, weights.writing),
        ChecklistItem::graded("numeracy", input.numeracy, weights.numeracy),
        ChecklistItem::graded(
            "learning_difficulties",
            input.learning_difficulties,
            weights.learning_difficulties,
        ),
        ChecklistItem::graded(
            "no_qualifications",
            input.no_qualifications,
            weights.no_qualifications,
        ),
        ChecklistItem::graded(
            "attended_special_school",
            input.attended_special_school,
            weights.attended_special_school,
        ),
        ChecklistItem::graded(
            "motivation_to_learn",
            input.motivation_to_learn,
            weights.motivation_to_learn,
        ),
    ];

    let score = tally(&items, parameters.max_missing_items)?;
    Ok(LearningNeedsScore {
        score,
        needs_identified: score >= parameters.threshold,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parameters() -> LearningNeedsParameters {
        LearningNeedsParameters {
            weights: LearningNeedsWeights {
                reading: 2,
                writing: 2,
                numeracy: 1,
                learning_difficulties: 2,
                no_qualifications: 1,
                attended_special_school: 2,
                motivation_to_learn: 0,
            },
            threshold: 6,
            max_missing_items: 0,
        }
    }

    #[test]
    fn weighted_items_identify_needs() {
        let input = LearningNeedsInput {
            reading: Some(ProblemLevel::SomeProblems),
            writing: Some(ProblemLevel::SignificantProblems),
            numeracy: Some(ProblemLevel::NoProblems),
            learning_difficulties: Some(ProblemLevel::NoProblems),
            no_qualifications: Some(true),
            attended_special_school: Some(false),
            motivation_to_learn: Some(Motivation::NoMotivation),
        };
        // 2 + 4 + 0 + 0 + 1 + 0 + 0
        let result = score(&input, &parameters()).expect("scores");
        assert_eq!(result.score, 7);
        assert!(result.needs_identified);
    }

    #[test]
    fn absent_items_are_never_scored_as_zero() {
        let input = LearningNeedsInput {
            reading: Some(ProblemLevel::NoProblems),
            ..LearningNeedsInput::default()
        };
        let errors = score(&input, &parameters()).expect_err("nothing else collected");
        assert_eq!(errors.len(), 6);
        assert!(!errors.fields().contains(&"reading"));
    }
}
