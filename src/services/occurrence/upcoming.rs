// Upcoming-occurrence feed
// Direct per-rule computation of the next `num` firings of an event

use chrono::{DateTime, Datelike, Duration, Local};

use crate::models::event::{Event, RepeatRule};
use crate::utils::date::{inc_month, is_weekend};

/// Up to `num` future firings of the event, each as `(start instant, event)`.
///
/// Collection stops at whichever bound is hit first: `finish` (inclusive,
/// an instant) or the event's `end_repeat` (inclusive, a date). All returned
/// instants fall between `now` and `finish`.
pub fn upcoming_occurrences<'a>(
    event: &'a Event,
    now: DateTime<Local>,
    finish: DateTime<Local>,
    num: usize,
) -> Vec<(DateTime<Local>, &'a Event)> {
    let mut found = Vec::new();
    if num == 0 {
        return found;
    }
    match event.repeat {
        RepeatRule::Never => single(event, now, finish, &mut found),
        RepeatRule::Weekday => weekdays(event, now, finish, num, &mut found),
        RepeatRule::Monthly => monthly(event, now, finish, num, &mut found),
        RepeatRule::Yearly => yearly(event, now, finish, num, &mut found),
        RepeatRule::Daily | RepeatRule::Weekly | RepeatRule::Biweekly => {
            stepped(event, now, finish, num, &mut found)
        }
    }
    found
}

/// True once `start` passes the finish horizon or the end of repetition.
fn should_stop(event: &Event, finish: DateTime<Local>, start: DateTime<Local>) -> bool {
    start > finish
        || event
            .end_repeat
            .is_some_and(|end_repeat| start.date_naive() > end_repeat)
}

fn single<'a>(
    event: &'a Event,
    now: DateTime<Local>,
    finish: DateTime<Local>,
    found: &mut Vec<(DateTime<Local>, &'a Event)>,
) {
    let has_ended = now > event.start || now > event.end;
    let has_not_started = event.start > finish;
    if has_ended || has_not_started {
        return;
    }
    found.push((event.start, event));
}

/// Daily, weekly and biweekly feeds share one loop: slide the start/end
/// window forward by the rule's step until it clears `now`, then emit.
fn stepped<'a>(
    event: &'a Event,
    now: DateTime<Local>,
    finish: DateTime<Local>,
    num: usize,
    found: &mut Vec<(DateTime<Local>, &'a Event)>,
) {
    let step = Duration::days(event.repeat.step_days().unwrap_or(1));
    let mut start = event.start;
    let mut end = event.end;
    while start < now || end <= now {
        start += step;
        end += step;
    }
    for _ in 0..num {
        if should_stop(event, finish, start) {
            return;
        }
        found.push((start, event));
        start += step;
    }
}

fn weekdays<'a>(
    event: &'a Event,
    now: DateTime<Local>,
    finish: DateTime<Local>,
    num: usize,
    found: &mut Vec<(DateTime<Local>, &'a Event)>,
) {
    let mut start = event.start;
    if start <= now {
        // re-anchor to today, keeping the event's start time
        let Some(today) = now
            .date_naive()
            .and_time(event.start.time())
            .and_local_timezone(Local)
            .single()
        else {
            return;
        };
        start = today;
    }
    while is_weekend(start.date_naive()) {
        start += Duration::days(1);
    }
    if start < now {
        start += Duration::days(1);
        while is_weekend(start.date_naive()) {
            start += Duration::days(1);
        }
    }
    for _ in 0..num {
        if should_stop(event, finish, start) {
            return;
        }
        while is_weekend(start.date_naive()) {
            start += Duration::days(1);
        }
        found.push((start, event));
        start += Duration::days(1);
    }
}

fn monthly<'a>(
    event: &'a Event,
    now: DateTime<Local>,
    finish: DateTime<Local>,
    num: usize,
    found: &mut Vec<(DateTime<Local>, &'a Event)>,
) {
    let (mut year, mut month) = if event.start > now {
        (event.start.year(), event.start.month())
    } else {
        (now.year(), now.month())
    };
    let mut remaining = num;
    while remaining > 0 {
        // keep the start's day of month; months without it are skipped
        let occurrence = event
            .start
            .with_month(month)
            .and_then(|start| start.with_year(year));
        let Some(start) = occurrence else {
            let (next_month, next_year) = inc_month(month, year);
            month = next_month;
            year = next_year;
            continue;
        };
        if now > start {
            let (next_month, next_year) = inc_month(month, year);
            month = next_month;
            year = next_year;
            continue;
        }
        if should_stop(event, finish, start) {
            return;
        }
        found.push((start, event));
        let (next_month, next_year) = inc_month(month, year);
        month = next_month;
        year = next_year;
        remaining -= 1;
    }
}

fn yearly<'a>(
    event: &'a Event,
    now: DateTime<Local>,
    finish: DateTime<Local>,
    num: usize,
    found: &mut Vec<(DateTime<Local>, &'a Event)>,
) {
    let mut year = now.year();
    if event.start > now {
        year = event.start.year();
    } else if now.month() > event.start.month()
        || (now.month() == event.start.month()
            && (now.day() > event.start.day()
                || (now.day() == event.start.day() && now.time() > event.start.time())))
    {
        // this year's occurrence has already gone by
        year += 1;
    }
    let mut remaining = num;
    while remaining > 0 {
        // years where the date doesn't exist (Feb 29th) are skipped
        let Some(start) = event.start.with_year(year) else {
            year += 1;
            continue;
        };
        if should_stop(event, finish, start) {
            return;
        }
        found.push((start, event));
        year += 1;
        remaining -= 1;
    }
}
