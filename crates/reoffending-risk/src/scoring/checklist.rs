use super::grade::{magnitude_of, Ordinal};
use super::result::{ScoreResult, ValidationErrors};

/// One weighted checklist answer. `magnitude` is `None` when the answer was
/// not collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChecklistItem {
    pub field: &'static str,
    pub magnitude: Option<u32>,
    pub weight: u32,
}

impl ChecklistItem {
    pub fn graded<T: Ordinal>(field: &'static str, grade: Option<T>, weight: u32) -> Self {
        Self {
            field,
            magnitude: magnitude_of(grade),
            weight,
        }
    }
}

/// Sums the present items. Absent items are excluded from the total; when
/// more than `max_missing` are absent, every absent item is reported instead.
pub fn tally(items: &[ChecklistItem], max_missing: u32) -> ScoreResult<u32> {
    let missing: Vec<&ChecklistItem> = items
        .iter()
        .filter(|item| item.magnitude.is_none())
        .collect();

    if missing.len() > max_missing as usize {
        let mut errors = ValidationErrors::new();
        for item in missing {
            errors.push(
                item.field,
                format!("not collected ({max_missing} missing item(s) tolerated)"),
            );
        }
        return Err(errors);
    }

    Ok(items
        .iter()
        .filter_map(|item| item.magnitude.map(|magnitude| magnitude * item.weight))
        .sum())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::grade::ProblemLevel;

    fn items(third: Option<ProblemLevel>, fourth: Option<bool>) -> Vec<ChecklistItem> {
        vec![
            ChecklistItem::graded("impulsivity", Some(ProblemLevel::SignificantProblems), 2),
            ChecklistItem::graded("temper_control", Some(ProblemLevel::SomeProblems), 1),
            ChecklistItem::graded("problem_solving", third, 3),
            ChecklistItem::graded("self_harm", fourth, 4),
        ]
    }

    #[test]
    fn sums_weighted_magnitudes() {
        let score = tally(&items(Some(ProblemLevel::SomeProblems), Some(true)), 0).expect("score");
        assert_eq!(score, 2 * 2 + 1 + 3 + 4);
    }

    #[test]
    fn absent_items_are_excluded_within_tolerance() {
        let score = tally(&items(None, Some(false)), 1).expect("score");
        assert_eq!(score, 5);
    }

    #[test]
    fn reports_every_absent_item_beyond_tolerance() {
        let errors = tally(&items(None, None), 1).expect_err("too many missing");
        assert_eq!(errors.fields(), vec!["problem_solving", "self_harm"]);
    }
}
