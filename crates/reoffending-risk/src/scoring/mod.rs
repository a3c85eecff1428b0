//! Numeric discipline, grades and result types shared by every instrument.

pub mod band;
pub(crate) mod checklist;
pub mod grade;
pub mod numeric;
pub mod result;
pub mod subject;

pub use band::{BandCutPoints, BandingError, RiskBand};
pub use grade::{Motivation, Ordinal, ProblemLevel, YesSometimesNo};
pub use numeric::{as_percentage, logistic, round_to_5_decimals, sanitize_percentage};
pub use result::{InstrumentOutcome, ScoreResult, ValidationError, ValidationErrors};
pub use subject::{Gender, SupervisionStatus};
