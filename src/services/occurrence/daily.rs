// Daily and every-weekday counting

use chrono::Datelike;

use super::walker::Walker;
use super::OccurrenceMap;
use crate::models::event::{Event, RepeatRule};

pub(super) fn count(count: &mut OccurrenceMap, year: i32, month: u32, event: &Event) {
    let mut walker = Walker::new(count, year, month, event);
    if event.starts_in_year_month(year, month) {
        // the month-event pass already counted the start day
        walker.day = event.start.day();
    } else {
        // repetition reaches into this month from an earlier one, so the
        // 1st has not been counted yet
        walker.day = 1;
        walker.count_first = true;
    }
    if event.repeats(RepeatRule::Daily) {
        walker.step = 1;
        walker.walk();
    } else {
        walker.walk_weekdays();
    }
}
