use super::labels::LabelFormat;
use super::layout::{Region, Size};
use super::strip::{CompactCalendar, Geometry};
use super::util::show_day;
use super::CalendarDelegate;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{StatefulWidget, Widget},
};
use std::marker::PhantomData;

/// Number of columns per day of week
const DAY_WIDTH: u16 = 6;

/// Width of the calendar in columns
pub(crate) const CALENDAR_WIDTH: u16 = DAY_WIDTH * 7;

/// Number of lines taken up by each row of dates
const ROW_LINES: u16 = 2;

/// Number of lines taken up by the month bar, the days-of-the-week bar, and
/// both rows of dates
pub(crate) const CALENDAR_HEIGHT: u16 = 2 + ROW_LINES * 2;

/// Width of each of the page buttons at either end of the month bar
const BUTTON_WIDTH: u16 = 3;

const PREVIOUS_BUTTON: &str = " ‹ ";
const NEXT_BUTTON: &str = " › ";

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) struct CompactCalendarWidget<D, F> {
    _data: PhantomData<(D, F)>,
}

impl<D, F> CompactCalendarWidget<D, F> {
    pub(crate) fn new() -> CompactCalendarWidget<D, F> {
        CompactCalendarWidget { _data: PhantomData }
    }
}

impl<D: CalendarDelegate, F: LabelFormat> StatefulWidget for CompactCalendarWidget<D, F> {
    type State = CompactCalendar<D, F>;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        state.ensure_setup();
        let [area] = Layout::horizontal([Constraint::Length(CALENDAR_WIDTH)])
            .flex(Flex::Center)
            .areas(area);
        let [month_bar, weekday_bar, grid] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(ROW_LINES * 2),
        ])
        .areas(area);
        let theme = *state.theme();
        let mut canvas = BufferCanvas::new(buf);

        canvas.fill(month_bar, theme.month_bar);
        let button_width = BUTTON_WIDTH.min(month_bar.width / 2);
        let previous_button = Rect {
            width: button_width,
            ..month_bar
        };
        let next_button = Rect {
            x: month_bar.right() - button_width,
            width: button_width,
            ..month_bar
        };
        canvas.print(previous_button, PREVIOUS_BUTTON, theme.month_bar_buttons);
        canvas.print(next_button, NEXT_BUTTON, theme.month_bar_buttons);
        let label_area = Rect {
            x: previous_button.right(),
            width: next_button.x - previous_button.right(),
            ..month_bar
        };
        canvas.print_centered(label_area, state.month_label(), Style::new());

        canvas.fill(weekday_bar, theme.days_of_the_week_bar);
        for (column, label) in (0u16..).zip(state.weekday_headers()) {
            let cell = Rect {
                x: weekday_bar.x + column * DAY_WIDTH,
                width: DAY_WIDTH,
                ..weekday_bar
            }
            .intersection(weekday_bar);
            canvas.print_centered(cell, label, Style::new());
        }

        canvas.fill(grid, theme.dates_view);
        let current_page = state.current_page();
        let on_page = state.visible_range();
        let layout = state.layout_for(Size::new(grid.width.into(), grid.height.into()));
        let cell = layout.cell_size();
        let visible = layout.page_region(current_page);
        let frames = on_page
            .filter_map(|index| Some((index, layout.frame(index)?)))
            .collect::<Vec<_>>();
        let today = state.window().today_index();
        if cell.width > 0 && cell.height > 0 {
            for (index, frame) in frames {
                let (Some(date), Some(rect)) =
                    (state.date_at(index), to_screen(frame, visible, grid))
                else {
                    continue;
                };
                let kind = state.cell_kind(index);
                let text = show_day(date, index == today);
                // Only the date text is highlighted, not the rest of its cell
                let line = Rect {
                    y: rect.y + rect.height.saturating_sub(1) / 2,
                    height: 1,
                    ..rect
                };
                canvas.print_centered(line, &text, theme.cell_style(kind));
            }
        }

        state.set_geometry(Geometry {
            previous_button,
            next_button,
            grid,
        });
    }
}

/// Convert a frame in content coordinates to the screen, given the region of
/// content currently shown in `grid`
fn to_screen(frame: Region, visible: Region, grid: Rect) -> Option<Rect> {
    let x = u16::try_from(frame.x.checked_sub(visible.x)?).ok()?;
    let y = u16::try_from(frame.y).ok()?;
    let rect = Rect {
        x: grid.x.checked_add(x)?,
        y: grid.y.checked_add(y)?,
        width: u16::try_from(frame.width).ok()?,
        height: u16::try_from(frame.height).ok()?,
    };
    Some(rect.intersection(grid)).filter(|r| !r.is_empty())
}

#[derive(Debug, Eq, PartialEq)]
struct BufferCanvas<'a> {
    buf: &'a mut Buffer,
}

impl<'a> BufferCanvas<'a> {
    fn new(buf: &'a mut Buffer) -> Self {
        Self { buf }
    }

    fn fill(&mut self, area: Rect, style: Style) {
        let area = area.intersection(self.buf.area);
        self.buf.set_style(area, style);
    }

    // Text that doesn't fit in `area` is truncated.
    fn print(&mut self, area: Rect, s: &str, style: Style) {
        let area = area.intersection(self.buf.area);
        if !area.is_empty() {
            Line::from(Span::styled(s, style)).render(area, self.buf);
        }
    }

    fn print_centered(&mut self, area: Rect, s: &str, style: Style) {
        let area = area.intersection(self.buf.area);
        if !area.is_empty() {
            Line::from(Span::styled(s, style))
                .centered()
                .render(area, self.buf);
        }
    }
}
