use super::config::{ConfigError, Configuration};
use super::labels::{EnglishLabels, LabelFormat, WeekdayLabels};
use super::layout::{grid_position, PagedLayout, Region, Size};
use super::window::{DateWindow, OutOfTimeError, DAYS_IN_WEEK, PAGE_SIZE};
use super::CalendarDelegate;
use crate::theme::{ConfigurableRegion, Theme};
use log::{debug, info, warn};
use ratatui::layout::{Position, Rect};
use ratatui::style::{Color, Modifier};
use std::ops::Range;
use time::Date;

/// How a date cell is drawn
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) enum CellKind {
    Past,
    Today,
    Normal,
    Selected,
}

/// What lies under a screen position
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) enum Hit {
    PreviousPage,
    NextPage,
    Date(usize),
}

/// Screen areas of the most recent render
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(super) struct Geometry {
    pub(super) previous_button: Rect,
    pub(super) next_button: Rect,
    pub(super) grid: Rect,
}

/// State of a two-week calendar strip: the loaded dates, which page of them
/// is scrolled into view, and which date is selected
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct CompactCalendar<D, F = EnglishLabels> {
    window: DateWindow,
    layout: Option<PagedLayout>,
    current_page: usize,
    selected: Option<usize>,
    weeks_ahead: isize,
    // Set by `configure()`; the first render or navigation scrolls to and
    // re-selects the initial selection.
    pending_setup: bool,
    month_label: String,
    weekday_labels: WeekdayLabels,
    theme: Theme,
    redraw_requested: bool,
    geometry: Option<Geometry>,
    delegate: D,
    format: F,
}

impl<D: CalendarDelegate> CompactCalendar<D> {
    pub(crate) fn new(delegate: D, config: &Configuration) -> Result<Self, ConfigError> {
        CompactCalendar::with_format(delegate, EnglishLabels, config)
    }
}

impl<D: CalendarDelegate, F: LabelFormat> CompactCalendar<D, F> {
    pub(crate) fn with_format(
        delegate: D,
        format: F,
        config: &Configuration,
    ) -> Result<Self, ConfigError> {
        let (weekday_labels, window) = load(config)?;
        let mut calendar = CompactCalendar {
            window,
            layout: None,
            current_page: 0,
            selected: None,
            weeks_ahead: 0,
            pending_setup: false,
            month_label: String::new(),
            weekday_labels,
            theme: Theme::default(),
            redraw_requested: false,
            geometry: None,
            delegate,
            format,
        };
        calendar.reset_view();
        Ok(calendar)
    }

    /// Replace the loaded dates, labels, and selection.  On error, the
    /// calendar is left as it was.
    pub(crate) fn configure(&mut self, config: &Configuration) -> Result<(), ConfigError> {
        let (weekday_labels, window) = load(config).inspect_err(|e| {
            warn!("rejected calendar configuration: {e}");
        })?;
        self.window = window;
        self.weekday_labels = weekday_labels;
        self.reset_view();
        Ok(())
    }

    fn reset_view(&mut self) {
        info!(
            "configured calendar: today {}, selected {}, {} days loaded ({} before the selection)",
            self.window.today(),
            self.window.initially_selected(),
            self.window.len(),
            self.window.previous_days()
        );
        self.invalidate_layout();
        self.current_page = 0;
        self.weeks_ahead = 0;
        self.selected = Some(self.window.initial_selection_index());
        self.month_label = self.format.month_year(self.window.initially_selected());
        self.pending_setup = true;
        self.redraw_requested = true;
        self.delegate
            .did_select(self.window.initially_selected(), false);
    }

    /// Perform the setup deferred by `configure()`, if still pending
    pub(crate) fn ensure_setup(&mut self) {
        if !std::mem::replace(&mut self.pending_setup, false) {
            return;
        }
        if let Some(index) = self.selected {
            self.current_page = grid_position(index).page;
            debug!("scrolled to page {} of initial selection", self.current_page);
            self.select(index);
        }
        self.refresh_month_label();
    }

    /// Scroll one page forwards, loading more dates if the window is about to
    /// run out.  Returns `false` if the last loaded page is already shown.
    pub(crate) fn next_page(&mut self) -> Result<bool, OutOfTimeError> {
        self.ensure_setup();
        let first = self.first_visible_index();
        if self.window.generate_future_dates(first)?.is_some() {
            self.invalidate_layout();
        }
        if self.current_page + 1 >= self.page_count() {
            debug!("not scrolling forwards: page {} is the last", self.current_page);
            return Ok(false);
        }
        self.weeks_ahead = week_number(first) - week_number(self.window.past_days()) + 2;
        self.delegate.did_go_to_next_page(self.weeks_ahead);
        self.current_page += 1;
        self.refresh_month_label();
        Ok(true)
    }

    /// Scroll one page backwards, loading more dates if the first loaded page
    /// is in view.  Returns `false` if the first loaded page is already shown
    /// and no more dates were loaded.
    pub(crate) fn previous_page(&mut self) -> Result<bool, OutOfTimeError> {
        self.ensure_setup();
        let first = self.first_visible_index();
        let offset = week_number(first) - week_number(self.window.past_days());
        if let Some(inserted) = self.window.generate_past_dates(first)? {
            debug!("inserted {inserted:?} before page {}", self.current_page);
            self.invalidate_layout();
            // Keep the same dates selected and in view
            self.selected = self.selected.map(|i| i + PAGE_SIZE);
            self.current_page += 1;
            self.weeks_ahead = week_number(first) - week_number(self.window.past_days());
        } else if self.current_page == 0 {
            debug!("not scrolling backwards: page 0 is the first");
            return Ok(false);
        } else {
            self.weeks_ahead = offset - 2;
        }
        self.delegate.did_go_to_previous_page(self.weeks_ahead);
        self.current_page -= 1;
        self.refresh_month_label();
        Ok(true)
    }

    /// Select the date at `index` as if its cell had been tapped.  Returns
    /// `false` if the date is already selected or not loaded.
    pub(crate) fn select_index(&mut self, index: usize) -> bool {
        self.ensure_setup();
        if self.selected == Some(index) {
            return false;
        }
        self.select(index)
    }

    /// Move the selection `delta` days, staying within the visible page.  If
    /// the selected date isn't visible, the first visible date is selected
    /// instead.
    pub(crate) fn move_selection(&mut self, delta: isize) -> bool {
        self.ensure_setup();
        let visible = self.visible_range();
        let target = match self.selected.filter(|i| visible.contains(i)) {
            Some(i) => i.checked_add_signed(delta),
            None => Some(visible.start),
        };
        match target.filter(|i| visible.contains(i)) {
            Some(i) => self.select_index(i),
            None => false,
        }
    }

    /// Scroll to the page containing today, then select it
    pub(crate) fn jump_to_today(&mut self) {
        self.ensure_setup();
        let page = self.window.page_of(self.window.today_index());
        if self.current_page != page {
            debug!("scrolling from page {} to today's page {page}", self.current_page);
            self.current_page = page;
            self.refresh_month_label();
        }
        self.select(self.window.today_index());
    }

    fn select(&mut self, index: usize) -> bool {
        let Some(date) = self.window.date_at(index) else {
            return false;
        };
        let already_selected = self.selected == Some(index);
        self.selected = Some(index);
        self.delegate.did_select(date, already_selected);
        true
    }

    fn refresh_month_label(&mut self) {
        let visible = self.visible_range();
        let first = self.window.date_at(visible.start);
        let last = visible.end.checked_sub(1).and_then(|i| self.window.date_at(i));
        if let (Some(first), Some(last)) = (first, last) {
            self.month_label = self.format.month_span(first, last);
        }
    }

    /// Number of pages available to scroll through, as laid out if a layout
    /// is cached
    fn page_count(&self) -> usize {
        self.layout
            .as_ref()
            .map_or_else(|| self.window.pages(), PagedLayout::pages)
    }

    fn first_visible_index(&self) -> usize {
        self.current_page * PAGE_SIZE
    }

    pub(crate) fn visible_range(&self) -> Range<usize> {
        let start = self.first_visible_index();
        start..(start + PAGE_SIZE).min(self.window.len())
    }

    pub(crate) fn cell_kind(&self, index: usize) -> CellKind {
        if self.selected == Some(index) {
            CellKind::Selected
        } else if index < self.window.past_days() {
            CellKind::Past
        } else if index == self.window.today_index() {
            CellKind::Today
        } else {
            CellKind::Normal
        }
    }

    fn invalidate_layout(&mut self) {
        self.layout = None;
    }

    /// The layout of all loaded dates within a viewport of the given size,
    /// prepared anew if the dates or the viewport have changed
    pub(crate) fn layout_for(&mut self, viewport: Size) -> &PagedLayout {
        let item_count = self.window.len();
        if self
            .layout
            .as_ref()
            .is_some_and(|layout| !layout.is_valid_for(item_count, viewport))
        {
            self.invalidate_layout();
        }
        self.layout.get_or_insert_with(|| {
            let layout = PagedLayout::prepare(item_count, viewport);
            debug!(
                "laid out {item_count} dates in {viewport:?}; content size {:?}",
                layout.content_size()
            );
            layout
        })
    }

    pub(super) fn set_geometry(&mut self, geometry: Geometry) {
        self.geometry = Some(geometry);
    }

    /// Find what was drawn at a screen position in the most recent render
    pub(crate) fn hit_test(&self, column: u16, row: u16) -> Option<Hit> {
        let geometry = self.geometry?;
        let pos = Position::new(column, row);
        if geometry.previous_button.contains(pos) {
            return Some(Hit::PreviousPage);
        }
        if geometry.next_button.contains(pos) {
            return Some(Hit::NextPage);
        }
        if !geometry.grid.contains(pos) {
            return None;
        }
        let layout = self.layout.as_ref()?;
        let visible = layout.page_region(self.current_page);
        let point = Region::new(
            visible.x + usize::from(column - geometry.grid.x),
            usize::from(row - geometry.grid.y),
            1,
            1,
        );
        layout.items_in(point).map(|(i, _)| i).next().map(Hit::Date)
    }

    pub(crate) fn set_background(&mut self, region: ConfigurableRegion, color: Color) {
        if self.theme.set_background(region, color) {
            self.redraw_requested = true;
        }
    }

    pub(crate) fn set_foreground(&mut self, region: ConfigurableRegion, color: Color) {
        if self.theme.set_foreground(region, color) {
            self.redraw_requested = true;
        }
    }

    pub(crate) fn set_font(&mut self, region: ConfigurableRegion, font: Modifier) {
        if self.theme.set_font(region, font) {
            self.redraw_requested = true;
        }
    }

    /// Returns `true` once after any change that requires every visible date
    /// cell to be redrawn
    pub(crate) fn take_redraw_request(&mut self) -> bool {
        std::mem::replace(&mut self.redraw_requested, false)
    }

    pub(crate) fn theme(&self) -> &Theme {
        &self.theme
    }

    pub(crate) fn window(&self) -> &DateWindow {
        &self.window
    }

    pub(crate) fn date_at(&self, index: usize) -> Option<Date> {
        self.window.date_at(index)
    }

    pub(crate) fn selected_date(&self) -> Option<Date> {
        self.selected.and_then(|i| self.window.date_at(i))
    }

    pub(crate) fn current_page(&self) -> usize {
        self.current_page
    }

    pub(crate) fn weeks_ahead(&self) -> isize {
        self.weeks_ahead
    }

    pub(crate) fn month_label(&self) -> &str {
        &self.month_label
    }

    /// Weekday header labels in display order
    pub(crate) fn weekday_headers(&self) -> impl Iterator<Item = &str> + '_ {
        self.weekday_labels.ordered(self.window.week_starts_on_monday())
    }

    pub(crate) fn format(&self) -> &F {
        &self.format
    }

    pub(crate) fn delegate_mut(&mut self) -> &mut D {
        &mut self.delegate
    }
}

fn load(config: &Configuration) -> Result<(WeekdayLabels, DateWindow), ConfigError> {
    let labels = WeekdayLabels::try_from(config.labels().to_vec())?;
    let window = DateWindow::load(
        config.today_date(),
        config.selected_date(),
        config.settings().week_start,
        config.policy(),
    )?;
    Ok((labels, window))
}

fn week_number(index: usize) -> isize {
    isize::try_from(index / DAYS_IN_WEEK).unwrap_or(isize::MAX)
}
