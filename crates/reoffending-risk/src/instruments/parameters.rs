use super::general::GeneralParameters;
use super::learning_needs::LearningNeedsParameters;
use super::maturity::MaturityParameters;
use super::pathway::PathwayParameters;
use super::personality_disorder::PersonalityDisorderParameters;
use super::sexual_contact::SexualContactParameters;
use super::violent::ViolentParameters;
use super::Instrument;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum ParameterError {
    #[error("failed to read model parameters: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed model parameters: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid {} parameters: {message}", instrument.name())]
    Invalid {
        instrument: Instrument,
        message: String,
    },
}

/// Every model constant the engines use: coefficients, weights, cut points,
/// points scales, thresholds and the pathway decision table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelParameters {
    pub general: GeneralParameters,
    pub violent: ViolentParameters,
    pub sexual_contact: SexualContactParameters,
    pub personality_disorder: PersonalityDisorderParameters,
    pub maturity: MaturityParameters,
    pub learning_needs: LearningNeedsParameters,
    pub pathway: PathwayParameters,
}

impl ModelParameters {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ParameterError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Parses and validates a parameter document.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ParameterError> {
        let parameters: Self = serde_json::from_reader(reader)?;
        parameters.validate()?;
        Ok(parameters)
    }

    pub fn validate(&self) -> Result<(), ParameterError> {
        let general = &self.general;
        check(Instrument::General, || {
            finite(&[
                general.one_year_intercept,
                general.two_year_intercept,
                general.copas_coefficient,
                general.first_sanction_coefficient,
            ])?;
            general.age_gender.validate()?;
            general.bands.validate().map_err(|err| err.to_string())
        })?;

        let violent = &self.violent;
        check(Instrument::Violent, || {
            let needs = &violent.needs;
            finite(&[
                violent.one_year_intercept,
                violent.two_year_intercept,
                violent.violent_sanctions_coefficient,
                violent.non_violent_sanctions_coefficient,
                needs.accommodation,
                needs.employment,
                needs.alcohol_misuse,
                needs.temper_control,
                needs.pro_criminal_attitudes,
            ])?;
            violent.age_gender.validate()?;
            violent.bands.validate().map_err(|err| err.to_string())
        })?;

        let contact = &self.sexual_contact;
        check(Instrument::SexualContact, || {
            contact.contact_adult_points.validate()?;
            contact.contact_child_points.validate()?;
            contact.non_contact_points.validate()?;
            contact.age_points.validate()?;
            contact.contributions.validate()?;
            contact.bands.validate().map_err(|err| err.to_string())
        })?;

        let personality = &self.personality_disorder;
        check(Instrument::PersonalityDisorder, || {
            if personality.male_threshold == 0 || personality.female_threshold == 0 {
                return Err("eligibility thresholds must be positive".to_string());
            }
            Ok(())
        })?;

        let maturity = &self.maturity;
        check(Instrument::Maturity, || {
            if maturity.min_age > maturity.max_age {
                return Err(format!(
                    "min_age {} exceeds max_age {}",
                    maturity.min_age, maturity.max_age
                ));
            }
            Ok(())
        })?;

        check(Instrument::Pathway, || self.pathway.validate())
    }
}

fn check(instrument: Instrument, rule: impl FnOnce() -> Result<(), String>) -> Result<(), ParameterError> {
    rule().map_err(|message| ParameterError::Invalid {
        instrument,
        message,
    })
}

fn finite(values: &[f64]) -> Result<(), String> {
    if values.iter().all(|value| value.is_finite()) {
        Ok(())
    } else {
        Err("coefficients must be finite".to_string())
    }
}
