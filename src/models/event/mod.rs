// Event module
// Calendar event model with recurrence predicates

use chrono::{DateTime, Datelike, Duration, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::utils::date::is_weekend;

/// Longest span an event may cover, in days. Anything longer must be
/// modeled as several events.
pub const MAX_SPAN_DAYS: i64 = 7;

/// How often an event repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RepeatRule {
    #[default]
    Never,
    Daily,
    Weekday,
    Weekly,
    Biweekly,
    Monthly,
    Yearly,
}

impl RepeatRule {
    /// Day step for the rules that advance by a fixed number of days.
    pub fn step_days(self) -> Option<i64> {
        match self {
            RepeatRule::Daily => Some(1),
            RepeatRule::Weekly => Some(7),
            RepeatRule::Biweekly => Some(14),
            _ => None,
        }
    }
}

/// Validation failures for event invariants.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EventError {
    #[error("event title cannot be empty")]
    EmptyTitle,
    #[error("event start and end times are required")]
    MissingTimes,
    #[error("event end time cannot be before start time")]
    EndBeforeStart,
    #[error("event cannot span more than 7 days")]
    SpanTooLong,
}

/// Calendar event as supplied by the event store. The recurrence engine only
/// ever reads these; creation-time validation keeps the invariants it relies
/// on (start <= end, span of at most seven days).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: i64,
    pub title: String,
    pub start: DateTime<Local>,
    pub end: DateTime<Local>,
    pub all_day: bool,
    pub repeat: RepeatRule,
    /// Last date (inclusive) the event may occur. Absent means it repeats
    /// without end.
    pub end_repeat: Option<NaiveDate>,
}

impl Event {
    /// Create a new event with required fields
    ///
    /// # Arguments
    /// * `title` - Event title (required, non-empty)
    /// * `start` - Event start time
    /// * `end` - Event end time
    pub fn new(
        title: impl Into<String>,
        start: DateTime<Local>,
        end: DateTime<Local>,
    ) -> Result<Self, EventError> {
        let event = Self {
            id: 0,
            title: title.into(),
            start,
            end,
            all_day: false,
            repeat: RepeatRule::Never,
            end_repeat: None,
        };
        event.validate()?;
        Ok(event)
    }

    /// Create a builder for constructing events with optional fields
    pub fn builder() -> EventBuilder {
        EventBuilder::new()
    }

    /// Validate the event invariants
    pub fn validate(&self) -> Result<(), EventError> {
        if self.title.trim().is_empty() {
            return Err(EventError::EmptyTitle);
        }
        if self.end < self.start {
            return Err(EventError::EndBeforeStart);
        }
        if self.end - self.start > Duration::days(MAX_SPAN_DAYS) {
            return Err(EventError::SpanTooLong);
        }
        Ok(())
    }

    /// Check whether the event repeats with the given rule
    pub fn repeats(&self, rule: RepeatRule) -> bool {
        self.repeat == rule
    }

    /// A "chunk" is an event whose start and end fall on different calendar
    /// days.
    pub fn is_chunk(&self) -> bool {
        self.start.day() != self.end.day()
    }

    /// Number of calendar days between the start and end dates.
    pub fn span_days(&self) -> u32 {
        (self.end.date_naive() - self.start.date_naive())
            .num_days()
            .unsigned_abs() as u32
    }

    pub fn starts_in_month(&self, month: u32) -> bool {
        self.start.month() == month
    }

    pub fn ends_in_month(&self, month: u32) -> bool {
        self.end.month() == month
    }

    pub fn starts_in_year_month(&self, year: i32, month: u32) -> bool {
        self.start.year() == year && self.start.month() == month
    }

    pub fn starts_in_month_different_year(&self, month: u32, year: i32) -> bool {
        self.start.year() != year && self.start.month() == month
    }

    pub fn starts_ends_same_month(&self) -> bool {
        self.start.month() == self.end.month()
    }

    /// Fast pre-filter for the month-event pass: the event's start or end
    /// date falls in the given year and month.
    pub fn starts_or_ends_in_year_month(&self, year: i32, month: u32) -> bool {
        self.starts_in_year_month(year, month)
            || (self.end.year() == year && self.end.month() == month)
    }

    /// True if the event can still occur on or after `after`.
    pub fn will_occur(&self, after: DateTime<Local>) -> bool {
        self.end_repeat.is_none()
            || self.end_repeat >= Some(after.date_naive())
            || self.start >= after
            || self.end >= after
    }

    /// True if an occurrence of the event is in progress at `now`.
    pub fn is_happening(&self, now: DateTime<Local>) -> bool {
        if now < self.start || now.time() < self.start.time() || now.time() > self.end.time() {
            return false;
        }
        match self.repeat {
            RepeatRule::Weekday => !is_weekend(now.date_naive()),
            RepeatRule::Daily | RepeatRule::Never => true,
            RepeatRule::Monthly => self.start.day() <= now.day() && now.day() <= self.end.day(),
            RepeatRule::Yearly => {
                self.start.month() <= now.month()
                    && now.month() <= self.end.month()
                    && self.start.day() <= now.day()
                    && now.day() <= self.end.day()
            }
            RepeatRule::Weekly | RepeatRule::Biweekly => {
                let step = Duration::days(self.repeat.step_days().unwrap_or(7));
                let mut start = self.start;
                let mut end = self.end;
                while end <= now {
                    start += step;
                    end += step;
                }
                start <= now && now <= end
            }
        }
    }
}

/// Builder for creating events with optional fields
pub struct EventBuilder {
    id: i64,
    title: Option<String>,
    start: Option<DateTime<Local>>,
    end: Option<DateTime<Local>>,
    all_day: bool,
    repeat: RepeatRule,
    end_repeat: Option<NaiveDate>,
}

impl EventBuilder {
    pub fn new() -> Self {
        Self {
            id: 0,
            title: None,
            start: None,
            end: None,
            all_day: false,
            repeat: RepeatRule::Never,
            end_repeat: None,
        }
    }

    pub fn id(mut self, id: i64) -> Self {
        self.id = id;
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn start(mut self, start: DateTime<Local>) -> Self {
        self.start = Some(start);
        self
    }

    pub fn end(mut self, end: DateTime<Local>) -> Self {
        self.end = Some(end);
        self
    }

    pub fn all_day(mut self, all_day: bool) -> Self {
        self.all_day = all_day;
        self
    }

    pub fn repeat(mut self, repeat: RepeatRule) -> Self {
        self.repeat = repeat;
        self
    }

    /// Set the last date (inclusive) on which the event may occur
    pub fn end_repeat(mut self, end_repeat: NaiveDate) -> Self {
        self.end_repeat = Some(end_repeat);
        self
    }

    /// Build the event
    pub fn build(self) -> Result<Event, EventError> {
        let event = Event {
            id: self.id,
            title: self.title.ok_or(EventError::EmptyTitle)?,
            start: self.start.ok_or(EventError::MissingTimes)?,
            end: self.end.ok_or(EventError::MissingTimes)?,
            all_day: self.all_day,
            repeat: self.repeat,
            end_repeat: self.end_repeat,
        };
        event.validate()?;
        Ok(event)
    }
}

impl Default for EventBuilder {
    fn default() -> Self {
        Self::new()
    }
}
