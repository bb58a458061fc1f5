//! Calendar age computation.

use chrono::{Datelike, NaiveDate};

/// Age in whole years on `today` for someone born on `born`.
///
/// Calendar-year difference, decremented by one when `today`'s (month, day)
/// precedes the birthday's (month, day). The birthday itself counts as the
/// new age. Time of day never matters.
#[must_use]
pub fn age_on(born: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - born.year();
    if (today.month(), today.day()) < (born.month(), born.day()) {
        age -= 1;
    }
    age
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn day_before_birthday_still_previous_age() {
        assert_eq!(age_on(date(1997, 8, 9), date(2024, 8, 8)), 26);
    }

    #[test]
    fn birthday_itself_bumps_age() {
        assert_eq!(age_on(date(1997, 8, 9), date(2024, 8, 9)), 27);
    }

    #[test]
    fn earlier_month_is_previous_age() {
        assert_eq!(age_on(date(1998, 8, 4), date(2024, 2, 1)), 25);
    }

    #[test]
    fn later_month_is_current_age() {
        assert_eq!(age_on(date(1998, 8, 4), date(2024, 12, 31)), 26);
    }
}
