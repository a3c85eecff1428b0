use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Gender {
    Male,
    Female,
}

/// Where the subject is being managed at the time of assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SupervisionStatus {
    Community,
    Custody,
}

/// Completed whole years from `from` to `to`, or `None` when `to` precedes
/// `from`.
pub fn whole_years_between(from: NaiveDate, to: NaiveDate) -> Option<u32> {
    if to < from {
        return None;
    }

    let mut years = to.year() - from.year();
    if (to.month(), to.day()) < (from.month(), from.day()) {
        years -= 1;
    }

    u32::try_from(years).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
    }

    #[test]
    fn counts_completed_years_only() {
        assert_eq!(whole_years_between(date(1990, 6, 15), date(2020, 6, 14)), Some(29));
        assert_eq!(whole_years_between(date(1990, 6, 15), date(2020, 6, 15)), Some(30));
        assert_eq!(whole_years_between(date(2020, 1, 1), date(2020, 12, 31)), Some(0));
    }

    #[test]
    fn handles_leap_day_birthdays() {
        assert_eq!(whole_years_between(date(2000, 2, 29), date(2021, 2, 28)), Some(20));
        assert_eq!(whole_years_between(date(2000, 2, 29), date(2021, 3, 1)), Some(21));
    }

    #[test]
    fn reversed_dates_have_no_span() {
        assert_eq!(whole_years_between(date(2020, 1, 2), date(2020, 1, 1)), None);
    }
}
