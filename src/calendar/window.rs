use super::util::{iter_days_after, iter_days_before, WeekdayExt};
use super::WeekStart;
use log::{debug, warn};
use std::collections::VecDeque;
use std::ops::RangeInclusive;
use thiserror::Error;
use time::Date;

/// Number of days in one page of the calendar: two rows of seven
pub(crate) const PAGE_SIZE: usize = 14;

pub(crate) const DAYS_IN_WEEK: usize = 7;

/// Number of pages loaded on top of those needed to reach the initial
/// selection
const INITIAL_PAGES: usize = 2;

/// Thresholds deciding when a paging request grows the window
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) struct ExtensionPolicy {
    /// The window is extended forwards only if no more than this many items
    /// exist from the first visible item onwards
    pub(crate) lookahead: usize,

    /// The window is extended backwards only if the first visible item is at
    /// this index
    pub(crate) leading_edge: usize,
}

impl Default for ExtensionPolicy {
    fn default() -> ExtensionPolicy {
        ExtensionPolicy {
            lookahead: PAGE_SIZE,
            leading_edge: 0,
        }
    }
}

/// A contiguous, growable run of calendar days
///
/// The window always holds a whole number of pages.  `today` is located at
/// index `past_days`, and the date that was selected when the window was
/// loaded is located at index `previous_days`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct DateWindow {
    dates: VecDeque<Date>,
    today: Date,
    initially_selected: Date,
    past_days: usize,
    previous_days: usize,
    week_start: WeekStart,
    policy: ExtensionPolicy,
}

impl DateWindow {
    /// Load enough dates to show the week containing `today` at the start of
    /// the window plus the page containing `initially_selected`, followed by
    /// one more page.
    pub(crate) fn load(
        today: Date,
        initially_selected: Date,
        week_start: WeekStart,
        policy: ExtensionPolicy,
    ) -> Result<DateWindow, OutOfTimeError> {
        // A selection before today needs no extra pages after today; pages
        // before the window are prepended further down.
        let extra_pages =
            usize::try_from((initially_selected - today).whole_days()).map_or(0, |d| d / PAGE_SIZE);
        let days_to_populate = (extra_pages + INITIAL_PAGES) * PAGE_SIZE;
        let past_days = today
            .weekday()
            .index1(week_start)
            .saturating_sub(1 + week_start.offset());
        let mut dates = VecDeque::with_capacity(days_to_populate + PAGE_SIZE);
        for d in iter_days_before(today).take(past_days) {
            dates.push_front(d);
        }
        if dates.len() < past_days {
            warn!("cannot load the week containing {today}: reached the start of time");
            return Err(OutOfTimeError);
        }
        dates.push_back(today);
        dates.extend(iter_days_after(today).take(days_to_populate - dates.len()));
        if dates.len() < days_to_populate {
            warn!("cannot load {days_to_populate} days around {today}: reached the end of time");
            return Err(OutOfTimeError);
        }
        let mut window = DateWindow {
            dates,
            today,
            initially_selected,
            past_days,
            previous_days: 0,
            week_start,
            policy,
        };
        while window
            .dates
            .front()
            .is_some_and(|&first| first > initially_selected)
        {
            window.prepend_page()?;
        }
        window.previous_days = window
            .dates
            .iter()
            .take_while(|&&d| d < initially_selected)
            .count();
        debug!(
            "loaded {} days from {:?} to {:?} (past_days = {}, previous_days = {})",
            window.len(),
            window.dates.front(),
            window.dates.back(),
            window.past_days,
            window.previous_days,
        );
        Ok(window)
    }

    /// Append one page of dates if the first visible item, at index `from`,
    /// is within `lookahead` items of the end of the window.
    ///
    /// Returns the index range of the appended items, or `None` if the window
    /// already extends far enough.
    pub(crate) fn generate_future_dates(
        &mut self,
        from: usize,
    ) -> Result<Option<RangeInclusive<usize>>, OutOfTimeError> {
        let Some(&last) = self.dates.back() else {
            return Ok(None);
        };
        if self.dates.len() > from.saturating_add(self.policy.lookahead) {
            debug!(
                "not extending forwards from {from}: {} days already loaded",
                self.len()
            );
            return Ok(None);
        }
        let page = iter_days_after(last).take(PAGE_SIZE).collect::<Vec<_>>();
        if page.len() < PAGE_SIZE {
            warn!("cannot extend past {last}: reached the end of time");
            return Err(OutOfTimeError);
        }
        self.dates.extend(page);
        let end = self.dates.len() - 1;
        let start = end + 1 - PAGE_SIZE;
        debug!("extended forwards from {from}; new items {start}..={end}");
        Ok(Some(start..=end))
    }

    /// Prepend one page of dates if the first visible item, at index `from`,
    /// is at the leading edge of the window.
    ///
    /// Returns the index range of the prepended items, or `None` if `from` is
    /// not at the leading edge.
    pub(crate) fn generate_past_dates(
        &mut self,
        from: usize,
    ) -> Result<Option<RangeInclusive<usize>>, OutOfTimeError> {
        if self.dates.is_empty() || from != self.policy.leading_edge {
            debug!("not extending backwards from {from}");
            return Ok(None);
        }
        self.prepend_page()?;
        let end = PAGE_SIZE - 1;
        debug!("extended backwards from {from}; past_days = {}", self.past_days);
        Ok(Some(0..=end))
    }

    fn prepend_page(&mut self) -> Result<(), OutOfTimeError> {
        let Some(&first) = self.dates.front() else {
            return Ok(());
        };
        let page = iter_days_before(first).take(PAGE_SIZE).collect::<Vec<_>>();
        if page.len() < PAGE_SIZE {
            warn!("cannot extend before {first}: reached the start of time");
            return Err(OutOfTimeError);
        }
        for d in page {
            self.dates.push_front(d);
        }
        self.past_days += PAGE_SIZE;
        self.previous_days += PAGE_SIZE;
        Ok(())
    }

    pub(crate) fn week_starts_on_monday(&self) -> bool {
        self.week_start == WeekStart::Monday
    }

    pub(crate) fn today(&self) -> Date {
        self.today
    }

    pub(crate) fn initially_selected(&self) -> Date {
        self.initially_selected
    }

    /// Number of dates in the window strictly before today
    pub(crate) fn past_days(&self) -> usize {
        self.past_days
    }

    /// Number of dates in the window strictly before the initial selection
    pub(crate) fn previous_days(&self) -> usize {
        self.previous_days
    }

    pub(crate) fn today_index(&self) -> usize {
        self.past_days
    }

    pub(crate) fn initial_selection_index(&self) -> usize {
        self.previous_days
    }

    pub(crate) fn date_at(&self, index: usize) -> Option<Date> {
        self.dates.get(index).copied()
    }

    pub(crate) fn len(&self) -> usize {
        self.dates.len()
    }

    pub(crate) fn pages(&self) -> usize {
        self.dates.len() / PAGE_SIZE
    }

    /// The page on which the date at `index` is shown
    pub(crate) fn page_of(&self, index: usize) -> usize {
        index / PAGE_SIZE
    }
}

#[derive(Copy, Clone, Debug, Eq, Error, PartialEq)]
#[error("reached the end of time")]
pub(crate) struct OutOfTimeError;
