//! Actuarial reoffending-risk scoring: offence reference data, the per-instrument
//! engines and the assessment pipeline that runs them.

pub mod assessment;
pub mod config;
pub mod error;
pub mod instruments;
pub mod offences;
pub mod scoring;
pub mod telemetry;

pub use assessment::{AssessmentOutcome, AssessmentRequest, RiskEngine};
