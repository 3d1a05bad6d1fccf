// Monthly counting
// Occurrences are anchored to the start's day of the month; a chunk that
// wraps past the month end fills to the boundary and back-fills the head of
// the following month.

use chrono::{Datelike, NaiveDate};

use super::walker::{record_day, repeat_until, Walker};
use super::OccurrenceMap;
use crate::models::event::Event;

pub(super) fn count(count: &mut OccurrenceMap, year: i32, month: u32, event: &Event) {
    if !event.starts_in_year_month(year, month) {
        // in the start month itself the day was already counted
        record_day(
            count,
            year,
            month,
            event.start.day(),
            repeat_until(event),
            event,
        );
    }
    if event.is_chunk() {
        count_chunk(count, year, month, event);
    }
}

fn count_chunk(count: &mut OccurrenceMap, year: i32, month: u32, event: &Event) {
    if event.starts_in_year_month(year, month) {
        return;
    }
    let start_day = event.start.day();
    let mut walker = Walker::new(count, year, month, event);
    walker.step = 1;

    if event.starts_ends_same_month() {
        // span sits inside a single month: fill start+1 ..= end downward
        walker.walk_reverse(event.end.day(), start_day + 1);
        return;
    }

    // the span wraps past month end: run the head out to the month boundary
    walker.walk();
    // and, when the anchor day exists in the previous month, this month's
    // head carries the tail of that cycle
    let last_day_previous_month = NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|d| d.pred_opt())
        .map_or(0, |d| d.day());
    if start_day <= last_day_previous_month {
        walker.walk_reverse(event.end.day(), 1);
    }
}
