use serde::{Deserialize, Serialize};
use std::fmt;

/// A single business-rule problem attached to one input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Ordered, accumulate-all collection of validation errors for one
/// instrument.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self(vec![ValidationError::new(field, message)])
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.push(ValidationError::new(field, message));
    }

    pub fn extend(&mut self, other: ValidationErrors) {
        self.0.extend(other.0);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.iter()
    }

    pub fn fields(&self) -> Vec<&str> {
        self.0.iter().map(|error| error.field.as_str()).collect()
    }

    pub fn into_vec(self) -> Vec<ValidationError> {
        self.0
    }

    /// Produces the score only when no error was recorded.
    pub fn into_result<T>(self, score: impl FnOnce() -> T) -> ScoreResult<T> {
        if self.is_empty() {
            Ok(score())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self
            .0
            .iter()
            .map(|error| format!("{}: {}", error.field, error.message))
            .collect();
        write!(f, "{}", rendered.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Either the complete score of an instrument or the reasons it could not be
/// produced.
pub type ScoreResult<T> = Result<T, ValidationErrors>;

/// Wire shape of one instrument's result: the score fields are flattened in
/// and are absent whenever `errors` is non-empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstrumentOutcome<T> {
    #[serde(flatten)]
    pub score: Option<T>,
    pub errors: Vec<ValidationError>,
}

impl<T> InstrumentOutcome<T> {
    pub fn is_scored(&self) -> bool {
        self.score.is_some()
    }
}

impl<T> From<ScoreResult<T>> for InstrumentOutcome<T> {
    fn from(result: ScoreResult<T>) -> Self {
        match result {
            Ok(score) => Self {
                score: Some(score),
                errors: Vec::new(),
            },
            Err(errors) => Self {
                score: None,
                errors: errors.into_vec(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq, Serialize)]
    struct Sample {
        percentage: u8,
    }

    #[test]
    fn into_result_only_scores_without_errors() {
        let clean = ValidationErrors::new().into_result(|| 42);
        assert_eq!(clean, Ok(42));

        let mut errors = ValidationErrors::new();
        errors.push("dateOfBirth", "must precede the conviction date");
        errors.push("totalSanctions", "must be at least 1");
        let failed = errors.into_result(|| 42);
        let errors = failed.expect_err("errors recorded");
        assert_eq!(errors.fields(), vec!["dateOfBirth", "totalSanctions"]);
    }

    #[test]
    fn outcome_serializes_score_or_errors() {
        let scored: InstrumentOutcome<Sample> = Ok(Sample { percentage: 40 }).into();
        assert_eq!(
            serde_json::to_value(&scored).expect("serialize"),
            json!({ "percentage": 40, "errors": [] })
        );

        let failed: InstrumentOutcome<Sample> =
            Err(ValidationErrors::single("gender", "not applicable")).into();
        assert!(!failed.is_scored());
        assert_eq!(
            serde_json::to_value(&failed).expect("serialize"),
            json!({ "errors": [{ "field": "gender", "message": "not applicable" }] })
        );
    }

    #[test]
    fn display_joins_errors() {
        let mut errors = ValidationErrors::single("a", "first");
        errors.push("b", "second");
        assert_eq!(errors.to_string(), "a: first; b: second");
    }
}
