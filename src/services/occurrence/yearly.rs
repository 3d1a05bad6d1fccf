// Yearly counting
// Occurrences recur on the start's month and day; chunks fill their span in
// the start month and back-fill the end month when the span wraps.

use chrono::Datelike;

use super::walker::{record_day, repeat_until, Walker};
use super::OccurrenceMap;
use crate::models::event::Event;

pub(super) fn count(count: &mut OccurrenceMap, year: i32, month: u32, event: &Event) {
    // the start day is only counted outside the start year; inside it the
    // month-event pass already did
    if event.start.month() == month && event.start.year() != year {
        record_day(
            count,
            year,
            month,
            event.start.day(),
            repeat_until(event),
            event,
        );
    }
    if event.is_chunk() && !event.starts_in_year_month(year, month) {
        count_chunk(count, year, month, event);
    }
}

fn count_chunk(count: &mut OccurrenceMap, year: i32, month: u32, event: &Event) {
    let mut walker = Walker::new(count, year, month, event);
    walker.step = 1;
    if event.starts_in_month(month) {
        if event.starts_ends_same_month() {
            walker.end_on = Some(event.end.day());
        }
        walker.walk();
    } else if event.ends_in_month(month) && !event.starts_ends_same_month() {
        walker.walk_reverse(event.end.day(), 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::event::RepeatRule;
    use chrono::{Local, TimeZone};

    fn yearly_event(start: (i32, u32, u32), end: (i32, u32, u32)) -> Event {
        let mut event = Event::new(
            "event",
            Local
                .with_ymd_and_hms(start.0, start.1, start.2, 12, 0, 0)
                .unwrap(),
            Local.with_ymd_and_hms(end.0, end.1, end.2, 12, 0, 0).unwrap(),
        )
        .unwrap();
        event.id = 1;
        event.repeat = RepeatRule::Yearly;
        event
    }

    fn days(count: &OccurrenceMap) -> Vec<u32> {
        count.keys().copied().collect()
    }

    #[test]
    fn test_recurs_only_in_start_month() {
        let event = yearly_event((2014, 3, 15), (2014, 3, 15));
        let mut count = OccurrenceMap::new();
        super::count(&mut count, 2015, 3, &event);
        assert_eq!(days(&count), vec![15]);

        let mut other = OccurrenceMap::new();
        super::count(&mut other, 2015, 6, &event);
        assert!(other.is_empty());
    }

    #[test]
    fn test_start_year_is_left_to_month_pass() {
        let event = yearly_event((2014, 3, 15), (2014, 3, 15));
        let mut count = OccurrenceMap::new();
        super::count(&mut count, 2014, 3, &event);
        assert!(count.is_empty());
    }

    #[test]
    fn test_leap_day_skips_common_years() {
        let event = yearly_event((2012, 2, 29), (2012, 2, 29));
        let mut count = OccurrenceMap::new();
        super::count(&mut count, 2015, 2, &event);
        assert!(count.is_empty());

        let mut leap = OccurrenceMap::new();
        super::count(&mut leap, 2016, 2, &event);
        assert_eq!(days(&leap), vec![29]);
    }

    #[test]
    fn test_wrapping_chunk_back_fills_end_month() {
        let event = yearly_event((2014, 3, 31), (2014, 4, 1));
        let mut march = OccurrenceMap::new();
        super::count(&mut march, 2015, 3, &event);
        assert_eq!(days(&march), vec![31]);

        let mut april = OccurrenceMap::new();
        super::count(&mut april, 2015, 4, &event);
        assert_eq!(days(&april), vec![1]);
    }

    #[test]
    fn test_same_month_chunk_fills_span() {
        let event = yearly_event((2014, 5, 3), (2014, 5, 6));
        let mut count = OccurrenceMap::new();
        super::count(&mut count, 2016, 5, &event);
        assert_eq!(days(&count), vec![3, 4, 5, 6]);
    }
}
