mod config;
mod labels;
mod layout;
mod strip;
mod util;
mod widget;
mod window;
pub(crate) use self::config::Configuration;
pub(crate) use self::labels::LabelFormat;
pub(crate) use self::strip::{CellKind, CompactCalendar, Hit};
pub(crate) use self::widget::{CompactCalendarWidget, CALENDAR_HEIGHT};
pub(crate) use self::window::ExtensionPolicy;
use time::Date;

/// Receives the notifications a `CompactCalendar` pushes to its host
pub(crate) trait CalendarDelegate {
    /// Called whenever a date is selected.  `already_selected` is true if the
    /// date's cell was the selected one before the call.
    fn did_select(&mut self, date: Date, already_selected: bool);

    /// Called when the calendar moves to the next page.  `weeks_ahead` is the
    /// signed number of weeks between the new page and the page containing
    /// today.
    fn did_go_to_next_page(&mut self, weeks_ahead: isize);

    /// Called when the calendar moves to the previous page
    fn did_go_to_previous_page(&mut self, weeks_ahead: isize);
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum CalendarEvent {
    Selected { date: Date, already_selected: bool },
    NextPage { weeks_ahead: isize },
    PreviousPage { weeks_ahead: isize },
}

impl CalendarDelegate for Vec<CalendarEvent> {
    fn did_select(&mut self, date: Date, already_selected: bool) {
        self.push(CalendarEvent::Selected {
            date,
            already_selected,
        });
    }

    fn did_go_to_next_page(&mut self, weeks_ahead: isize) {
        self.push(CalendarEvent::NextPage { weeks_ahead });
    }

    fn did_go_to_previous_page(&mut self, weeks_ahead: isize) {
        self.push(CalendarEvent::PreviousPage { weeks_ahead });
    }
}

/// The day of the week shown in the leftmost column
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub(crate) enum WeekStart {
    #[default]
    Sunday,
    Monday,
}

impl WeekStart {
    /// Number of days the first column is shifted past Sunday
    pub(crate) fn offset(self) -> usize {
        match self {
            WeekStart::Sunday => 0,
            WeekStart::Monday => 1,
        }
    }
}
