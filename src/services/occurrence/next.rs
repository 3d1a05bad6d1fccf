// Next-occurrence lookup
// Reuses the month expander, scanning forward month by month when needed

use chrono::{DateTime, Datelike, Local, NaiveDate};

use super::walker::repeat_until;
use super::month_occurrences;
use crate::models::event::{Event, RepeatRule};
use crate::utils::date::{advance_to_weekday, inc_month};

/// The next calendar date on or after `now` on which the event occurs, or
/// `None` if the event will not occur again.
pub fn next_occurrence(event: &Event, now: DateTime<Local>) -> Option<NaiveDate> {
    if !event.will_occur(now) {
        return None;
    }

    let mut year = now.year();
    let mut month = now.month();
    let day;
    let start_day = event.start.day();
    let end_day = event.end.day();
    // has the event's start time already gone by today?
    let good_today = event.start.time() >= now.time();

    if event.starts_in_year_month(year, month)
        && start_day <= now.day()
        && now.day() <= end_day
    {
        // inside the event's own span this month: the nearest remaining day
        day = occurrence_days(year, month, event)
            .into_iter()
            .filter(|&d| d >= now.day())
            .min_by_key(|&d| d.abs_diff(now.day()))?;
    } else if event.start.date_naive() > now.date_naive() {
        // hasn't started yet, so the next occurrence is the start itself
        return Some(event.start.date_naive());
    } else {
        let mut future: Vec<u32> = occurrence_days(year, month, event)
            .into_iter()
            .filter(|&d| d >= now.day())
            .collect();
        if future.first() == Some(&now.day()) && !good_today {
            future.remove(0);
        }
        let end_month = event.end.month();
        let until = repeat_until(event);
        while future.is_empty() {
            let (next_month, next_year) = inc_month(month, year);
            month = next_month;
            year = next_year;
            let month_first = NaiveDate::from_ymd_opt(year, month, 1)?;
            if month_first > until {
                // repetition ends before another occurrence can happen
                return None;
            }
            // yearly events can only occur in their start (or, for chunks,
            // end) month; scanning every other month would be wasted work
            if event.repeats(RepeatRule::Yearly)
                && month != event.start.month()
                && month != end_month
            {
                continue;
            }
            future = occurrence_days(year, month, event);
        }
        day = future.into_iter().min()?;
    }

    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    if event.repeats(RepeatRule::Weekday) {
        return Some(advance_to_weekday(date, false));
    }
    Some(date)
}

fn occurrence_days(year: i32, month: u32, event: &Event) -> Vec<u32> {
    month_occurrences(year, month, std::slice::from_ref(event))
        .into_keys()
        .collect()
}
