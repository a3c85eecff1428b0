//! Indecent-image and non-contact sexual reoffending.
//!
//! Unlike the other instruments this one is a fixed decision table: rules are
//! evaluated in order and the first whose predicate holds decides both the
//! band and the additive contribution.

use crate::scoring::{Gender, RiskBand, ScoreResult, ValidationErrors};
use serde::{Deserialize, Serialize};

/// The three independent history counts the table reads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageOffenceHistory {
    pub indecent_image_sanctions: u32,
    pub contact_child_sanctions: u32,
    /// Sexual sanctions of any kind.
    pub sexual_sanctions: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassifierOutcome {
    pub band: RiskBand,
    pub contribution: f64,
}

pub struct ClassifierRule {
    pub name: &'static str,
    pub applies: fn(&ImageOffenceHistory) -> bool,
    pub outcome: ClassifierOutcome,
}

impl std::fmt::Debug for ClassifierRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassifierRule")
            .field("name", &self.name)
            .field("outcome", &self.outcome)
            .finish()
    }
}

const fn outcome(band: RiskBand, contribution: f64) -> ClassifierOutcome {
    ClassifierOutcome { band, contribution }
}

fn multiple_images(history: &ImageOffenceHistory) -> bool {
    history.indecent_image_sanctions >= 2
}

fn single_image(history: &ImageOffenceHistory) -> bool {
    history.indecent_image_sanctions == 1
}

fn multiple_child_contact(history: &ImageOffenceHistory) -> bool {
    history.contact_child_sanctions >= 2
}

fn single_child_contact(history: &ImageOffenceHistory) -> bool {
    history.contact_child_sanctions == 1
}

fn no_sexual_history(history: &ImageOffenceHistory) -> bool {
    history.sexual_sanctions == 0
}

fn any_history(_: &ImageOffenceHistory) -> bool {
    true
}

/// Evaluated top to bottom; the last rule always matches.
pub const IMAGE_HIERARCHY: &[ClassifierRule] = &[
    ClassifierRule {
        name: "multiple_indecent_images",
        applies: multiple_images,
        outcome: outcome(RiskBand::VeryHigh, 0.10310),
    },
    ClassifierRule {
        name: "single_indecent_image",
        applies: single_image,
        outcome: outcome(RiskBand::High, 0.03328),
    },
    ClassifierRule {
        name: "multiple_child_contact",
        applies: multiple_child_contact,
        outcome: outcome(RiskBand::Medium, 0.00926),
    },
    ClassifierRule {
        name: "single_child_contact",
        applies: single_child_contact,
        outcome: outcome(RiskBand::Low, 0.00634),
    },
    ClassifierRule {
        name: "no_sexual_history",
        applies: no_sexual_history,
        outcome: outcome(RiskBand::Low, 0.00062),
    },
    ClassifierRule {
        name: "other_sexual_history",
        applies: any_history,
        outcome: outcome(RiskBand::Low, 0.00281),
    },
];

/// First matching rule of `rules`, if any.
pub fn classify<'a>(
    rules: &'a [ClassifierRule],
    history: &ImageOffenceHistory,
) -> Option<&'a ClassifierRule> {
    rules.iter().find(|rule| (rule.applies)(history))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SexualImageInput {
    pub gender: Gender,
    #[serde(flatten)]
    pub history: ImageOffenceHistory,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SexualImageScore {
    pub band: RiskBand,
    pub contribution: f64,
    pub matched_rule: String,
}

pub fn score(input: &SexualImageInput) -> ScoreResult<SexualImageScore> {
    if input.gender != Gender::Male {
        return Err(ValidationErrors::single(
            "gender",
            "indecent-image reoffending applies to male subjects only",
        ));
    }

    let rule = classify(IMAGE_HIERARCHY, &input.history).ok_or_else(|| {
        ValidationErrors::single("history", "no classification rule matched")
    })?;

    Ok(SexualImageScore {
        band: rule.outcome.band,
        contribution: rule.outcome.contribution,
        matched_rule: rule.name.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history(images: u32, child_contact: u32, sexual: u32) -> ImageOffenceHistory {
        ImageOffenceHistory {
            indecent_image_sanctions: images,
            contact_child_sanctions: child_contact,
            sexual_sanctions: sexual,
        }
    }

    fn outcome_of(history: ImageOffenceHistory) -> ClassifierOutcome {
        classify(IMAGE_HIERARCHY, &history)
            .expect("catch-all matches")
            .outcome
    }

    #[test]
    fn image_count_outranks_empty_sexual_history() {
        // Both "two or more images" and "no sexual sanctions" hold; the
        // earlier rule wins.
        let outcome = outcome_of(history(2, 0, 0));
        assert_eq!(outcome.band, RiskBand::VeryHigh);
        assert_eq!(outcome.contribution, 0.10310);
    }

    #[test]
    fn each_rule_is_reachable() {
        assert_eq!(outcome_of(history(1, 3, 4)), outcome(RiskBand::High, 0.03328));
        assert_eq!(outcome_of(history(0, 2, 2)), outcome(RiskBand::Medium, 0.00926));
        assert_eq!(outcome_of(history(0, 1, 1)), outcome(RiskBand::Low, 0.00634));
        assert_eq!(outcome_of(history(0, 0, 0)), outcome(RiskBand::Low, 0.00062));
        assert_eq!(outcome_of(history(0, 0, 3)), outcome(RiskBand::Low, 0.00281));
    }

    #[test]
    fn rule_order_is_the_table_order() {
        let names: Vec<_> = IMAGE_HIERARCHY.iter().map(|rule| rule.name).collect();
        assert_eq!(names.first(), Some(&"multiple_indecent_images"));
        assert_eq!(names.last(), Some(&"other_sexual_history"));
        assert_eq!(names.len(), 6);
    }

    #[test]
    fn engine_reports_matched_rule_for_male_subjects() {
        let input = SexualImageInput {
            gender: Gender::Male,
            history: history(1, 0, 1),
        };
        let scored = score(&input).expect("scores");
        assert_eq!(scored.band, RiskBand::High);
        assert_eq!(scored.matched_rule, "single_indecent_image");

        let female = SexualImageInput {
            gender: Gender::Female,
            ..input
        };
        let errors = score(&female).expect_err("male only");
        assert_eq!(errors.fields(), vec!["gender"]);
    }
}
