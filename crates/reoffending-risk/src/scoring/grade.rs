use serde::{Deserialize, Serialize};

/// Graded answer that contributes an ordinal magnitude (0, 1 or 2) to a
/// weighted sum.
pub trait Ordinal: Copy {
    fn magnitude(self) -> u32;
}

impl Ordinal for bool {
    fn magnitude(self) -> u32 {
        u32::from(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProblemLevel {
    NoProblems,
    SomeProblems,
    SignificantProblems,
}

impl Ordinal for ProblemLevel {
    fn magnitude(self) -> u32 {
        match self {
            ProblemLevel::NoProblems => 0,
            ProblemLevel::SomeProblems => 1,
            ProblemLevel::SignificantProblems => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum YesSometimesNo {
    Yes,
    Sometimes,
    No,
}

impl Ordinal for YesSometimesNo {
    fn magnitude(self) -> u32 {
        match self {
            YesSometimesNo::Yes => 0,
            YesSometimesNo::Sometimes => 1,
            YesSometimesNo::No => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Motivation {
    Full,
    Partial,
    NoMotivation,
}

impl Ordinal for Motivation {
    fn magnitude(self) -> u32 {
        match self {
            Motivation::Full => 0,
            Motivation::Partial => 1,
            Motivation::NoMotivation => 2,
        }
    }
}

/// Magnitude of an optional grade; `None` stays `None` so that an uncollected
/// answer is never mistaken for a zero grade.
pub fn magnitude_of<T: Ordinal>(grade: Option<T>) -> Option<u32> {
    grade.map(Ordinal::magnitude)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn magnitudes_follow_declared_order() {
        assert_eq!(ProblemLevel::NoProblems.magnitude(), 0);
        assert_eq!(ProblemLevel::SomeProblems.magnitude(), 1);
        assert_eq!(ProblemLevel::SignificantProblems.magnitude(), 2);
        assert_eq!(YesSometimesNo::Yes.magnitude(), 0);
        assert_eq!(YesSometimesNo::No.magnitude(), 2);
        assert_eq!(Motivation::Partial.magnitude(), 1);
        assert_eq!(true.magnitude(), 1);
        assert_eq!(false.magnitude(), 0);
    }

    #[test]
    fn ordering_matches_magnitude() {
        assert!(ProblemLevel::NoProblems < ProblemLevel::SomeProblems);
        assert!(ProblemLevel::SomeProblems < ProblemLevel::SignificantProblems);
        assert!(Motivation::Full < Motivation::NoMotivation);
    }

    #[test]
    fn absent_grade_has_no_magnitude() {
        assert_eq!(magnitude_of::<ProblemLevel>(None), None);
        assert_eq!(magnitude_of(Some(ProblemLevel::NoProblems)), Some(0));
    }

    #[test]
    fn grades_use_screaming_snake_case_on_the_wire() {
        let json = serde_json::to_string(&ProblemLevel::SignificantProblems).expect("serialize");
        assert_eq!(json, "\"SIGNIFICANT_PROBLEMS\"");
        let parsed: Motivation = serde_json::from_str("\"NO_MOTIVATION\"").expect("parse");
        assert_eq!(parsed, Motivation::NoMotivation);
    }
}
