// Bounded day-walk primitives shared by the per-rule counters

use chrono::{Datelike, Duration, NaiveDate};

use super::OccurrenceMap;
use crate::models::event::Event;
use crate::utils::date::is_weekend;

/// Stand-in end date for events that repeat without end.
pub(super) fn repeat_forever() -> NaiveDate {
    NaiveDate::from_ymd_opt(2200, 3, 3).expect("sentinel date is valid")
}

/// The effective last date the event may occur.
pub(super) fn repeat_until(event: &Event) -> NaiveDate {
    event.end_repeat.unwrap_or_else(repeat_forever)
}

/// Append the event to `day`'s entry list, provided the day exists in the
/// given month and falls on or before `end_repeat`. Days that don't exist
/// (say, the 31st of a 30-day month) are silently skipped.
pub(super) fn record_day(
    count: &mut OccurrenceMap,
    year: i32,
    month: u32,
    day: u32,
    end_repeat: NaiveDate,
    event: &Event,
) {
    if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
        if date <= end_repeat {
            count
                .entry(day)
                .or_default()
                .push((event.title.clone(), event.id));
        }
    }
}

/// Walks a month's days in fixed steps, recording each day that is still
/// inside the month, on or before `end_repeat` and (when `end_on` is set) on
/// or before that day of the month.
pub(super) struct Walker<'a> {
    pub count: &'a mut OccurrenceMap,
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub step: i64,
    pub end_repeat: NaiveDate,
    pub count_first: bool,
    pub end_on: Option<u32>,
    pub event: &'a Event,
}

impl<'a> Walker<'a> {
    pub(super) fn new(
        count: &'a mut OccurrenceMap,
        year: i32,
        month: u32,
        event: &'a Event,
    ) -> Self {
        Walker {
            count,
            year,
            month,
            day: event.start.day(),
            step: 7,
            end_repeat: repeat_until(event),
            count_first: false,
            end_on: None,
            event,
        }
    }

    fn record(&mut self, day: u32) {
        record_day(
            self.count, self.year, self.month, day, self.end_repeat, self.event,
        );
    }

    /// Walk forward from the configured day.
    pub(super) fn walk(&mut self) {
        self.walk_from(self.day);
    }

    /// Walk forward from `day`, stepping `step` days at a time until the walk
    /// leaves the month, passes `end_repeat` or passes `end_on`. A `day` that
    /// doesn't exist in this month ends the walk before it starts.
    pub(super) fn walk_from(&mut self, day: u32) {
        let Some(mut d) = NaiveDate::from_ymd_opt(self.year, self.month, day) else {
            return;
        };
        if self.count_first && d <= self.end_repeat {
            self.record(d.day());
        }
        d += Duration::days(self.step);
        while d.month() == self.month && d <= self.end_repeat {
            if self.end_on.is_some_and(|end_on| d.day() > end_on) {
                break;
            }
            self.record(d.day());
            d += Duration::days(self.step);
        }
    }

    /// Like [`walk_from`], but one day at a time with weekend days skipped
    /// rather than counted.
    pub(super) fn walk_weekdays(&mut self) {
        let Some(mut d) = NaiveDate::from_ymd_opt(self.year, self.month, self.day) else {
            return;
        };
        if self.count_first && d <= self.end_repeat && !is_weekend(d) {
            self.record(d.day());
        }
        d += Duration::days(1);
        while d.month() == self.month && d <= self.end_repeat {
            if !is_weekend(d) {
                self.record(d.day());
            }
            d += Duration::days(1);
        }
    }

    /// Count one day at a time from `start` down to `end` inclusive. Used to
    /// back-fill the head of a month with the tail of a chunk that began in
    /// the previous month. Days past the end of the month don't exist and are
    /// skipped; `start` should be >= `end`.
    pub(super) fn walk_reverse(&mut self, start: u32, end: u32) {
        let mut day = start;
        self.record(day);
        for _ in 0..start.saturating_sub(end) {
            day -= 1;
            self.record(day);
        }
    }

    /// Repeat the walk for each remaining day of a chunk: the `span` days
    /// after the configured start day each get their own stepped walk.
    pub(super) fn walk_chunk(&mut self, span: u32) {
        for offset in 1..=span {
            self.walk_from(self.day + offset);
        }
    }
}
