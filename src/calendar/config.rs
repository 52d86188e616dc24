use super::labels::DEFAULT_WEEKDAY_LABELS;
use super::window::{ExtensionPolicy, OutOfTimeError};
use super::WeekStart;
use thiserror::Error;
use time::{Date, OffsetDateTime, UtcOffset};

/// How dates are reckoned: which weekday starts the week, and the UTC offset
/// in which instants are reduced to calendar days
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) struct CalendarSettings {
    pub(crate) week_start: WeekStart,
    pub(crate) utc_offset: UtcOffset,
}

impl CalendarSettings {
    /// The calendar day on which `instant` falls in the configured offset
    pub(crate) fn local_date(&self, instant: OffsetDateTime) -> Date {
        instant.to_offset(self.utc_offset).date()
    }
}

/// Everything a `CompactCalendar` is configured with
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Configuration {
    selected: OffsetDateTime,
    today: OffsetDateTime,
    weekday_labels: Vec<String>,
    settings: CalendarSettings,
    policy: ExtensionPolicy,
}

impl Configuration {
    /// A configuration in which `now` is both today and the selected date
    pub(crate) fn new(now: OffsetDateTime) -> Configuration {
        Configuration {
            selected: now,
            today: now,
            weekday_labels: DEFAULT_WEEKDAY_LABELS.map(String::from).to_vec(),
            settings: CalendarSettings {
                week_start: WeekStart::default(),
                utc_offset: now.offset(),
            },
            policy: ExtensionPolicy::default(),
        }
    }

    pub(crate) fn selected(mut self, selected: OffsetDateTime) -> Self {
        self.selected = selected;
        self
    }

    pub(crate) fn today(mut self, today: OffsetDateTime) -> Self {
        self.today = today;
        self
    }

    /// Header labels for the days of the week, Sunday first.  Exactly seven
    /// are required; any other number is reported when configuring.
    pub(crate) fn weekday_labels(mut self, labels: Vec<String>) -> Self {
        self.weekday_labels = labels;
        self
    }

    pub(crate) fn week_start(mut self, week_start: WeekStart) -> Self {
        self.settings.week_start = week_start;
        self
    }

    pub(crate) fn utc_offset(mut self, offset: UtcOffset) -> Self {
        self.settings.utc_offset = offset;
        self
    }

    pub(crate) fn extension_policy(mut self, policy: ExtensionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub(crate) fn settings(&self) -> CalendarSettings {
        self.settings
    }

    pub(crate) fn policy(&self) -> ExtensionPolicy {
        self.policy
    }

    pub(crate) fn labels(&self) -> &[String] {
        &self.weekday_labels
    }

    pub(crate) fn selected_date(&self) -> Date {
        self.settings.local_date(self.selected)
    }

    pub(crate) fn today_date(&self) -> Date {
        self.settings.local_date(self.today)
    }
}

#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub(crate) enum ConfigError {
    #[error("expected {expected} weekday labels, got {actual}")]
    LabelCount { expected: usize, actual: usize },
    #[error(transparent)]
    OutOfTime(#[from] OutOfTimeError),
}
