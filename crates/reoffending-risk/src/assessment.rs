//! Runs any subset of the instruments for one subject against a single offence
//! table snapshot.
//!
//! Evaluation is two-phase: every independent instrument first, then the
//! composite pathway over their results.

use crate::instruments::general::{self, GeneralReoffendingInput, GeneralScore};
use crate::instruments::learning_needs::{self, LearningNeedsInput, LearningNeedsScore};
use crate::instruments::maturity::{self, MaturityInput, MaturityScore};
use crate::instruments::pathway::{self, PathwayInput, PathwayOutcome, UpstreamScores};
use crate::instruments::personality_disorder::{
    self, PersonalityDisorderInput, PersonalityDisorderScore,
};
use crate::instruments::sexual_contact::{self, SexualContactInput, SexualContactScore};
use crate::instruments::sexual_image::{self, SexualImageInput, SexualImageScore};
use crate::instruments::violent::{self, ViolentReoffendingInput, ViolentScore};
use crate::instruments::ModelParameters;
use crate::offences::OffenceRegistry;
use crate::scoring::{round_to_5_decimals, InstrumentOutcome, ScoreResult};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssessmentRequest {
    pub general: Option<GeneralReoffendingInput>,
    pub violent: Option<ViolentReoffendingInput>,
    pub sexual_contact: Option<SexualContactInput>,
    pub sexual_image: Option<SexualImageInput>,
    pub personality_disorder: Option<PersonalityDisorderInput>,
    pub maturity: Option<MaturityInput>,
    pub learning_needs: Option<LearningNeedsInput>,
    pub pathway: Option<PathwayInput>,
}

/// One entry per requested instrument; instruments that were not requested
/// are omitted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssessmentOutcome {
    pub offence_table_generation: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub general: Option<InstrumentOutcome<GeneralScore>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub violent: Option<InstrumentOutcome<ViolentScore>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sexual_contact: Option<InstrumentOutcome<SexualContactScore>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sexual_image: Option<InstrumentOutcome<SexualImageScore>>,
    /// Sum of both sexual contributions, present only when both scored.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub combined_sexual_contribution: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub personality_disorder: Option<InstrumentOutcome<PersonalityDisorderScore>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maturity: Option<InstrumentOutcome<MaturityScore>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub learning_needs: Option<InstrumentOutcome<LearningNeedsScore>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pathway: Option<InstrumentOutcome<PathwayOutcome>>,
}

#[derive(Debug, Clone)]
pub struct RiskEngine {
    parameters: Arc<ModelParameters>,
    offences: Arc<OffenceRegistry>,
}

impl RiskEngine {
    pub fn new(parameters: Arc<ModelParameters>, offences: Arc<OffenceRegistry>) -> Self {
        Self {
            parameters,
            offences,
        }
    }

    pub fn offences(&self) -> &Arc<OffenceRegistry> {
        &self.offences
    }

    pub fn assess(&self, request: &AssessmentRequest) -> AssessmentOutcome {
        // A reload during the assessment must not mix generations.
        let table = self.offences.snapshot();
        let parameters = &*self.parameters;

        let general = request
            .general
            .as_ref()
            .map(|input| general::score(input, &parameters.general, &table));
        let violent = request
            .violent
            .as_ref()
            .map(|input| violent::score(input, &parameters.violent, &table));
        let sexual_contact = request
            .sexual_contact
            .as_ref()
            .map(|input| sexual_contact::score(input, &parameters.sexual_contact));
        let sexual_image = request.sexual_image.as_ref().map(sexual_image::score);
        let personality_disorder = request.personality_disorder.as_ref().map(|input| {
            personality_disorder::score(input, &parameters.personality_disorder, &table)
        });
        let maturity = request
            .maturity
            .as_ref()
            .map(|input| maturity::score(input, &parameters.maturity));
        let learning_needs = request
            .learning_needs
            .as_ref()
            .map(|input| learning_needs::score(input, &parameters.learning_needs));

        let combined_sexual_contribution = match (scored(&sexual_contact), scored(&sexual_image)) {
            (Some(contact), Some(image)) => {
                Some(round_to_5_decimals(contact.contribution + image.contribution))
            }
            _ => None,
        };

        let pathway = request.pathway.as_ref().map(|input| {
            let upstream = UpstreamScores {
                general: scored(&general),
                violent: scored(&violent),
                sexual_contact: scored(&sexual_contact),
                sexual_image: scored(&sexual_image),
                learning_needs: scored(&learning_needs),
            };
            pathway::classify(input, &upstream, &parameters.pathway)
        });

        debug!(
            offence_table_generation = table.generation(),
            general = outcome_label(&general),
            violent = outcome_label(&violent),
            sexual_contact = outcome_label(&sexual_contact),
            sexual_image = outcome_label(&sexual_image),
            personality_disorder = outcome_label(&personality_disorder),
            maturity = outcome_label(&maturity),
            learning_needs = outcome_label(&learning_needs),
            pathway = outcome_label(&pathway),
            "assessment evaluated"
        );

        AssessmentOutcome {
            offence_table_generation: table.generation(),
            general: general.map(InstrumentOutcome::from),
            violent: violent.map(InstrumentOutcome::from),
            sexual_contact: sexual_contact.map(InstrumentOutcome::from),
            sexual_image: sexual_image.map(InstrumentOutcome::from),
            combined_sexual_contribution,
            personality_disorder: personality_disorder.map(InstrumentOutcome::from),
            maturity: maturity.map(InstrumentOutcome::from),
            learning_needs: learning_needs.map(InstrumentOutcome::from),
            pathway: pathway.map(InstrumentOutcome::from),
        }
    }
}

fn scored<T>(result: &Option<ScoreResult<T>>) -> Option<&T> {
    result.as_ref().and_then(|result| result.as_ref().ok())
}

fn outcome_label<T>(result: &Option<ScoreResult<T>>) -> &'static str {
    match result {
        None => "not_requested",
        Some(Ok(_)) => "scored",
        Some(Err(_)) => "invalid",
    }
}
