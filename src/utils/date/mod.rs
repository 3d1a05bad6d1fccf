// Date utility functions
// Month navigation, weekday snapping and query-input cleaning

use chrono::{DateTime, Datelike, Duration, Local, NaiveDate};

/// Years accepted either side of "today" by the cleaning functions.
pub const YEAR_WINDOW: i32 = 50;

/// Message returned alongside the fallback date when input is rejected.
pub const INVALID_DATE_MSG: &str = "The date given was invalid.";

/// Increment the month and, if necessary, the year.
pub fn inc_month(month: u32, year: i32) -> (u32, i32) {
    if month >= 12 {
        (1, year + 1)
    } else {
        (month + 1, year)
    }
}

/// Step backward `num` months, wrapping the year as needed.
///
/// Uses plain modulo arithmetic over months-since-epoch, so any `num` is
/// well-defined: `num = 12` gives the same month one year earlier, `num = 25`
/// gives the previous month two years earlier.
pub fn dec_month(month: u32, year: i32, num: u32) -> (i32, u32) {
    let months = i64::from(year) * 12 + i64::from(month) - 1 - i64::from(num);
    (
        months.div_euclid(12) as i32,
        (months.rem_euclid(12) + 1) as u32,
    )
}

/// Number of days in the given month, or 0 if the month is invalid.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    if NaiveDate::from_ymd_opt(year, month, 1).is_none() {
        return 0;
    }
    let (next_month, next_year) = inc_month(month, year);
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .map_or(0, |d| d.day())
}

/// First instant of the given month.
pub fn month_start(year: i32, month: u32) -> Option<DateTime<Local>> {
    NaiveDate::from_ymd_opt(year, month, 1)?
        .and_hms_opt(0, 0, 0)?
        .and_local_timezone(Local)
        .earliest()
}

/// Last instant of the given month (second resolution).
pub fn month_end(year: i32, month: u32) -> Option<DateTime<Local>> {
    NaiveDate::from_ymd_opt(year, month, days_in_month(year, month))?
        .and_hms_opt(23, 59, 59)?
        .and_local_timezone(Local)
        .earliest()
}

pub fn is_weekend(date: NaiveDate) -> bool {
    date.weekday().num_days_from_monday() > 4
}

/// Step the date one day at a time (forward by default, backward if asked)
/// until it lands on a Monday-Friday.
pub fn advance_to_weekday(date: NaiveDate, backward: bool) -> NaiveDate {
    let step = if backward {
        Duration::days(-1)
    } else {
        Duration::days(1)
    };
    let mut d = date;
    while is_weekend(d) {
        d += step;
    }
    d
}

/// Normalize a year/month pair coming from navigation input.
///
/// `month_orig` is the month before any next/prev offsets were applied; if it
/// is present and out of range the whole input is rejected. An offset-shifted
/// `month` outside 1..=12 is carried into the year. A year outside the
/// [`YEAR_WINDOW`] around `today` is rejected. Rejected input falls back to
/// today's year and month alongside the error message.
pub fn clean_year_month(
    today: NaiveDate,
    year: i32,
    month: i32,
    month_orig: Option<i32>,
) -> (i32, u32, Option<&'static str>) {
    let mut error = None;
    let mut year = year;
    let mut month = month;
    if let Some(orig) = month_orig {
        if !(1..=12).contains(&orig) {
            month = today.month() as i32;
            error = Some(INVALID_DATE_MSG);
        }
    }
    // next offsets can push month past 12, prev offsets below 1
    while month > 12 {
        month -= 12;
        year += 1;
    }
    while month < 1 {
        month += 12;
        year -= 1;
    }
    check_year(today, year, month as u32, error)
}

/// Normalize a year/month/day triple and apply a signed day offset.
///
/// Same error contract as [`clean_year_month`]: out-of-range input falls back
/// to today's month (and day 1 for a bad day) with an error message; otherwise
/// the offset is applied through calendar arithmetic and the resulting year is
/// checked against the window.
pub fn clean_year_month_day(
    today: NaiveDate,
    year: i32,
    month: u32,
    day: u32,
    day_delta: i64,
) -> (i32, u32, u32, Option<&'static str>) {
    let mut error = None;
    let mut year = year;
    let mut month = month;
    let mut day = day;
    if !(1..=12).contains(&month) {
        month = today.month();
        error = Some(INVALID_DATE_MSG);
    }
    if day < 1 || day > days_in_month(year, month) {
        day = 1;
        error = Some(INVALID_DATE_MSG);
    }
    if error.is_none() {
        if let Some(d) = NaiveDate::from_ymd_opt(year, month, day) {
            let shifted = d + Duration::days(day_delta);
            year = shifted.year();
            month = shifted.month();
            day = shifted.day();
        }
        let (checked_year, checked_month, checked_error) = check_year(today, year, month, error);
        year = checked_year;
        month = checked_month;
        error = checked_error;
    }
    (year, month, day, error)
}

/// Next and prev navigation offsets for a running net offset.
pub fn nav_next_prev(net: i32) -> (i32, i32) {
    if net == 0 {
        (1, 1)
    } else if net > 0 {
        (net + 1, -(net - 1))
    } else {
        (net + 1, net.abs() + 1)
    }
}

fn check_year(
    today: NaiveDate,
    year: i32,
    month: u32,
    error: Option<&'static str>,
) -> (i32, u32, Option<&'static str>) {
    if (year - today.year()).abs() > YEAR_WINDOW {
        log::warn!("rejecting out-of-window year {year}, falling back to current month");
        return (today.year(), today.month(), Some(INVALID_DATE_MSG));
    }
    (year, month, error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn today() -> NaiveDate {
        date(2014, 6, 15)
    }

    #[test]
    fn test_inc_month() {
        assert_eq!(inc_month(4, 2014), (5, 2014));
        assert_eq!(inc_month(12, 2014), (1, 2015));
    }

    #[test_case(4, 2014, 1, 2014, 3; "single step")]
    #[test_case(1, 2014, 1, 2013, 12; "wraps year")]
    #[test_case(4, 2014, 12, 2013, 4; "full year")]
    #[test_case(4, 2014, 25, 2012, 3; "more than two years")]
    fn test_dec_month(month: u32, year: i32, num: u32, exp_year: i32, exp_month: u32) {
        assert_eq!(dec_month(month, year, num), (exp_year, exp_month));
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2014, 1), 31);
        assert_eq!(days_in_month(2014, 2), 28);
        assert_eq!(days_in_month(2016, 2), 29);
        assert_eq!(days_in_month(2014, 4), 30);
        assert_eq!(days_in_month(2014, 13), 0);
    }

    #[test]
    fn test_month_bounds() {
        let start = month_start(2014, 2).unwrap();
        let end = month_end(2014, 2).unwrap();
        assert_eq!(start.date_naive(), date(2014, 2, 1));
        assert_eq!(end.date_naive(), date(2014, 2, 28));
        assert!(start < end);
        assert!(month_start(2014, 0).is_none());
    }

    #[test]
    fn test_advance_to_weekday() {
        // 2014-06-07 is a Saturday
        assert_eq!(advance_to_weekday(date(2014, 6, 7), false), date(2014, 6, 9));
        assert_eq!(advance_to_weekday(date(2014, 6, 7), true), date(2014, 6, 6));
        // weekdays pass through untouched
        assert_eq!(advance_to_weekday(date(2014, 6, 9), false), date(2014, 6, 9));
    }

    #[test]
    fn test_clean_year_month_valid() {
        assert_eq!(clean_year_month(today(), 2014, 3, Some(3)), (2014, 3, None));
    }

    #[test]
    fn test_clean_year_month_carries_overflow() {
        assert_eq!(
            clean_year_month(today(), 2014, 13, Some(10)),
            (2015, 1, None)
        );
        assert_eq!(
            clean_year_month(today(), 2014, 23, Some(10)),
            (2015, 11, None)
        );
        assert_eq!(
            clean_year_month(today(), 2014, -6, Some(10)),
            (2013, 6, None)
        );
    }

    #[test]
    fn test_clean_year_month_invalid_original_month() {
        let (year, month, error) = clean_year_month(today(), 2014, 3, Some(13));
        assert_eq!((year, month), (2014, today().month()));
        assert_eq!(error, Some(INVALID_DATE_MSG));
    }

    #[test]
    fn test_clean_year_month_out_of_window_year() {
        let (year, month, error) = clean_year_month(today(), 2014, 100_000, Some(1));
        assert_eq!((year, month), (today().year(), today().month()));
        assert_eq!(error, Some(INVALID_DATE_MSG));
    }

    #[test]
    fn test_clean_year_month_day_applies_delta() {
        assert_eq!(
            clean_year_month_day(today(), 2014, 3, 31, 1),
            (2014, 4, 1, None)
        );
        assert_eq!(
            clean_year_month_day(today(), 2014, 3, 1, -1),
            (2014, 2, 28, None)
        );
        assert_eq!(
            clean_year_month_day(today(), 2014, 12, 31, 1),
            (2015, 1, 1, None)
        );
    }

    #[test]
    fn test_clean_year_month_day_invalid_day() {
        let (_, _, day, error) = clean_year_month_day(today(), 2014, 3, 32, 0);
        assert_eq!(day, 1);
        assert_eq!(error, Some(INVALID_DATE_MSG));
    }

    #[test]
    fn test_clean_year_month_day_invalid_month() {
        let (_, month, _, error) = clean_year_month_day(today(), 2014, 30, 3, 0);
        assert_eq!(month, today().month());
        assert_eq!(error, Some(INVALID_DATE_MSG));
    }

    #[test]
    fn test_clean_year_month_day_out_of_window_year() {
        let (year, month, day, error) = clean_year_month_day(today(), 2244, 3, 3, 0);
        assert_eq!((year, month), (today().year(), today().month()));
        // the day survives the year fallback untouched
        assert_eq!(day, 3);
        assert_eq!(error, Some(INVALID_DATE_MSG));
    }

    #[test]
    fn test_nav_next_prev() {
        assert_eq!(nav_next_prev(0), (1, 1));
        assert_eq!(nav_next_prev(3), (4, -2));
        assert_eq!(nav_next_prev(-3), (-2, 4));
    }
}
