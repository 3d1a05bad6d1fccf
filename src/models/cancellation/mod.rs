// Cancellation module
// Per-date cancellation records and title annotation

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::event::Event;

/// Marker appended to the title of a cancelled occurrence.
pub const CANCELLED_TITLE_SUFFIX: &str = " (CANCELLED)";

/// A cancellation of one occurrence of an event on one calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cancellation {
    pub event_id: i64,
    pub date: NaiveDate,
    pub reason: String,
}

/// True if the event's occurrence on `date` was cancelled.
pub fn is_cancelled_on(cancellations: &[Cancellation], event_id: i64, date: NaiveDate) -> bool {
    cancellations
        .iter()
        .any(|c| c.event_id == event_id && c.date == date)
}

/// Display titles keyed by event id for the given date, with the
/// cancellation marker applied where a matching record exists. Kept as a
/// separate map so event records stay untouched.
pub fn annotated_titles(
    events: &[Event],
    cancellations: &[Cancellation],
    date: NaiveDate,
) -> HashMap<i64, String> {
    events
        .iter()
        .map(|event| {
            let mut title = event.title.clone();
            if is_cancelled_on(cancellations, event.id, date) {
                title.push_str(CANCELLED_TITLE_SUFFIX);
            }
            (event.id, title)
        })
        .collect()
}
