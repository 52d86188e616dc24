use crate::calendar::{
    CalendarEvent, CompactCalendar, CompactCalendarWidget, Configuration, Hit, LabelFormat,
    CALENDAR_HEIGHT,
};
use crate::help::Help;
use crate::jumpto::{JumpTo, JumpToInput, JumpToOutput, JumpToState};
use crate::theme::Palette;
use crossterm::event::{
    read, Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use log::{debug, info};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    text::Line,
    widgets::{StatefulWidget, Widget},
    DefaultTerminal,
};
use std::cmp::Ordering;
use std::io::{self, Write};
use time::Date;

type Calendar = CompactCalendar<Vec<CalendarEvent>>;

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct App {
    calendar: Calendar,
    config: Configuration,
    state: AppState,
    palette: Palette,
    selected: Option<Date>,
    weeks_ahead: isize,
}

impl App {
    /// `config` must be the configuration `calendar` was created with
    pub(crate) fn new(calendar: Calendar, config: Configuration) -> App {
        let mut app = App {
            calendar,
            config,
            state: AppState::Calendar,
            palette: Palette::default(),
            selected: None,
            weeks_ahead: 0,
        };
        app.process_events();
        app
    }

    pub(crate) fn run(mut self, mut terminal: DefaultTerminal) -> io::Result<()> {
        while !self.quitting() {
            if self.calendar.take_redraw_request() {
                terminal.clear()?;
            }
            self.draw(&mut terminal)?;
            self.handle_event(read()?)?;
        }
        info!("quitting with {:?} selected", self.calendar.selected_date());
        Ok(())
    }

    fn draw(&mut self, terminal: &mut DefaultTerminal) -> io::Result<()> {
        terminal.draw(|frame| frame.render_widget(self, frame.area()))?;
        Ok(())
    }

    fn handle_event(&mut self, event: Event) -> io::Result<()> {
        let normal_modifiers = KeyModifiers::NONE | KeyModifiers::SHIFT;
        if let Some(KeyEvent {
            code, modifiers, ..
        }) = event.as_key_press_event()
        {
            if modifiers == KeyModifiers::CONTROL && code == KeyCode::Char('c') {
                self.state = AppState::Quitting;
            } else if !normal_modifiers.contains(modifiers) || !self.handle_key(code) {
                self.beep()?;
            }
        } else if let Event::Mouse(MouseEvent {
            kind, column, row, ..
        }) = event
        {
            self.handle_mouse(kind, column, row);
        }
        // else: Redraw on resize, and we might as well redraw on other stuff
        // too
        self.process_events();
        Ok(())
    }

    // Returns `false` if the user pressed an invalid key
    fn handle_key(&mut self, key: KeyCode) -> bool {
        match &mut self.state {
            AppState::Calendar => match key {
                KeyCode::Char('h') | KeyCode::Left => self.calendar.move_selection(-1),
                KeyCode::Char('l') | KeyCode::Right => self.calendar.move_selection(1),
                KeyCode::Char('k') | KeyCode::Up => self.calendar.move_selection(-7),
                KeyCode::Char('j') | KeyCode::Down => self.calendar.move_selection(7),
                KeyCode::Char('n' | '>') | KeyCode::PageDown => self.page_forwards(),
                KeyCode::Char('p' | '<') | KeyCode::PageUp => self.page_backwards(),
                KeyCode::Char('t') | KeyCode::Home => {
                    self.calendar.jump_to_today();
                    true
                }
                KeyCode::Char('c') => {
                    self.cycle_palette();
                    true
                }
                KeyCode::Char('g') => {
                    self.state = AppState::Jumping(JumpToState::new());
                    true
                }
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.state = AppState::Quitting;
                    true
                }
                KeyCode::Char('?') => {
                    self.state = AppState::Helping;
                    true
                }
                _ => false,
            },
            AppState::Helping => {
                self.state = AppState::Calendar;
                true
            }
            AppState::Jumping(state) => {
                if matches!(key, KeyCode::Char('q' | 'g') | KeyCode::Esc) {
                    self.state = AppState::Calendar;
                    return true;
                }
                let output = match key {
                    KeyCode::Char(c) => c
                        .to_digit(10)
                        .and_then(|d| u8::try_from(d).ok())
                        .map_or(JumpToOutput::Invalid, |d| {
                            state.handle_input(JumpToInput::Digit(d))
                        }),
                    KeyCode::Backspace | KeyCode::Delete => {
                        state.handle_input(JumpToInput::Backspace)
                    }
                    KeyCode::Enter => state.handle_input(JumpToInput::Enter),
                    _ => JumpToOutput::Invalid,
                };
                match output {
                    JumpToOutput::Ok => true,
                    JumpToOutput::Invalid => false,
                    JumpToOutput::Jump(date) => {
                        self.state = AppState::Calendar;
                        self.jump_to(date)
                    }
                }
            }
            AppState::Quitting => false,
        }
    }

    fn handle_mouse(&mut self, kind: MouseEventKind, column: u16, row: u16) {
        if self.state != AppState::Calendar {
            return;
        }
        match kind {
            MouseEventKind::Down(MouseButton::Left) => match self.calendar.hit_test(column, row) {
                Some(Hit::PreviousPage) => {
                    self.page_backwards();
                }
                Some(Hit::NextPage) => {
                    self.page_forwards();
                }
                Some(Hit::Date(index)) => {
                    self.calendar.select_index(index);
                }
                None => (),
            },
            MouseEventKind::ScrollDown => {
                self.page_forwards();
            }
            MouseEventKind::ScrollUp => {
                self.page_backwards();
            }
            _ => (),
        }
    }

    fn beep(&self) -> io::Result<()> {
        io::stdout().write_all(b"\x07")
    }

    fn quitting(&self) -> bool {
        self.state == AppState::Quitting
    }

    fn page_forwards(&mut self) -> bool {
        matches!(self.calendar.next_page(), Ok(true))
    }

    fn page_backwards(&mut self) -> bool {
        matches!(self.calendar.previous_page(), Ok(true))
    }

    /// Reconfigure the calendar with `date` as the selection
    fn jump_to(&mut self, date: Date) -> bool {
        let offset = self.config.settings().utc_offset;
        let config = self
            .config
            .clone()
            .selected(date.midnight().assume_offset(offset));
        if self.calendar.configure(&config).is_err() {
            return false;
        }
        self.config = config;
        self.weeks_ahead = self.calendar.weeks_ahead();
        true
    }

    fn cycle_palette(&mut self) {
        self.palette = self.palette.next();
        debug!("switching to {:?} palette", self.palette);
        for (region, background, foreground) in self.palette.assignments() {
            self.calendar.set_background(region, background);
            self.calendar.set_foreground(region, foreground);
        }
        for (region, font) in self.palette.fonts() {
            self.calendar.set_font(region, font);
        }
    }

    /// Apply the notifications queued up by the calendar to the status line
    fn process_events(&mut self) {
        for event in std::mem::take(self.calendar.delegate_mut()) {
            debug!("calendar event: {event:?}");
            match event {
                CalendarEvent::Selected { date, .. } => self.selected = Some(date),
                CalendarEvent::NextPage { weeks_ahead }
                | CalendarEvent::PreviousPage { weeks_ahead } => self.weeks_ahead = weeks_ahead,
            }
        }
    }

    fn status(&self) -> String {
        let offset = match self.weeks_ahead.cmp(&0) {
            Ordering::Equal => String::from("this fortnight"),
            Ordering::Greater => format!("{} weeks ahead", self.weeks_ahead),
            Ordering::Less => format!("{} weeks back", self.weeks_ahead.unsigned_abs()),
        };
        match self.selected {
            Some(date) => format!("{} \u{b7} {offset}", self.calendar.format().long_date(date)),
            None => offset,
        }
    }
}

impl Widget for &mut App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let theme = *self.calendar.theme();
        buf.set_style(area, theme.dates_view);
        let [calendar_area, _, status_area] = Layout::vertical([
            Constraint::Length(CALENDAR_HEIGHT),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .flex(Flex::Center)
        .areas(area);
        CompactCalendarWidget::new().render(calendar_area, buf, &mut self.calendar);
        Line::styled(self.status(), theme.days_of_the_week_bar)
            .centered()
            .render(status_area, buf);
        if self.state == AppState::Helping {
            Help(theme.dates_view).render(area, buf);
        } else if let AppState::Jumping(ref mut state) = self.state {
            JumpTo(theme.dates_view).render(area, buf, state);
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum AppState {
    Calendar,
    Helping,
    Jumping(JumpToState),
    Quitting,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::ExtensionPolicy;
    use ratatui::style::{Color, Modifier};
    use time::macros::{date, datetime};

    fn app() -> App {
        let config = Configuration::new(datetime!(2024-06-12 09:00 UTC));
        App::new(CompactCalendar::new(Vec::new(), &config).unwrap(), config)
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_event(Event::Key(KeyEvent::new(code, KeyModifiers::NONE)))
            .unwrap();
    }

    fn click(app: &mut App, column: u16, row: u16) {
        app.handle_event(Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }))
        .unwrap();
    }

    fn render(app: &mut App) -> Vec<String> {
        let area = Rect::new(0, 0, 80, 24);
        let mut buffer = Buffer::empty(area);
        app.render(area, &mut buffer);
        (0..area.height)
            .map(|y| (0..area.width).map(|x| buffer[(x, y)].symbol()).collect())
            .collect()
    }

    #[test]
    fn test_render() {
        let mut app = app();
        let lines = render(&mut app);
        assert_eq!(lines[7].trim(), "");
        assert_eq!(
            lines[8],
            format!("{0} ‹              June 2024               › {0}", " ".repeat(19))
        );
        assert_eq!(
            lines[10],
            format!("{0}   9    10    11   [12]   13    14    15  {0}", " ".repeat(19))
        );
        assert_eq!(
            lines[15].trim(),
            "Wednesday, June 12, 2024 \u{b7} this fortnight"
        );
    }

    #[test]
    fn test_keyboard_selection() {
        let mut app = app();
        press(&mut app, KeyCode::Char('l'));
        assert_eq!(app.selected, Some(date!(2024 - 06 - 13)));
        press(&mut app, KeyCode::Down);
        assert_eq!(app.selected, Some(date!(2024 - 06 - 20)));
        press(&mut app, KeyCode::Char('h'));
        assert_eq!(app.selected, Some(date!(2024 - 06 - 19)));
        // Moving off the visible page is refused
        assert!(!app.handle_key(KeyCode::Down));
        assert_eq!(app.calendar.selected_date(), Some(date!(2024 - 06 - 19)));
    }

    #[test]
    fn test_paging_and_today() {
        let mut app = app();
        press(&mut app, KeyCode::Char('>'));
        assert_eq!(app.calendar.current_page(), 1);
        assert_eq!(app.weeks_ahead, 2);
        press(&mut app, KeyCode::PageDown);
        assert_eq!(app.weeks_ahead, 4);
        assert!(app.status().ends_with("4 weeks ahead"));
        press(&mut app, KeyCode::Char('p'));
        assert_eq!(app.calendar.current_page(), 1);
        press(&mut app, KeyCode::Char('l'));
        assert_eq!(app.selected, Some(date!(2024 - 06 - 23)));
        press(&mut app, KeyCode::Home);
        assert_eq!(app.calendar.current_page(), 0);
        assert_eq!(app.selected, Some(date!(2024 - 06 - 12)));
    }

    #[test]
    fn test_mouse() {
        let mut app = app();
        render(&mut app);
        // The calendar starts at column 19, its grid at row 10
        click(&mut app, 19 + 6 * 5 + 2, 10);
        assert_eq!(app.selected, Some(date!(2024 - 06 - 14)));
        click(&mut app, 19 + 40, 8);
        assert_eq!(app.calendar.current_page(), 1);
        app.handle_event(Event::Mouse(MouseEvent {
            kind: MouseEventKind::ScrollUp,
            column: 0,
            row: 0,
            modifiers: KeyModifiers::NONE,
        }))
        .unwrap();
        assert_eq!(app.calendar.current_page(), 0);
        click(&mut app, 0, 0);
        assert_eq!(app.selected, Some(date!(2024 - 06 - 14)));
    }

    #[test]
    fn test_help_and_quit() {
        let mut app = app();
        press(&mut app, KeyCode::Char('?'));
        assert_eq!(app.state, AppState::Helping);
        assert!(render(&mut app).iter().any(|l| l.contains(" Commands ")));
        press(&mut app, KeyCode::Char('x'));
        assert_eq!(app.state, AppState::Calendar);
        assert!(!app.handle_key(KeyCode::Char('x')));
        press(&mut app, KeyCode::Esc);
        assert!(app.quitting());
    }

    #[test]
    fn test_ctrl_c_quits() {
        let mut app = app();
        app.handle_event(Event::Key(KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL,
        )))
        .unwrap();
        assert!(app.quitting());
    }

    #[test]
    fn test_cycle_palette() {
        let mut app = app();
        assert!(app.calendar.take_redraw_request());
        press(&mut app, KeyCode::Char('c'));
        assert_eq!(app.palette, Palette::Light);
        assert_eq!(app.calendar.theme().dates_view.bg, Some(Color::White));
        assert_eq!(app.calendar.theme().selected_date.bg, Some(Color::Blue));
        assert!(app.calendar.take_redraw_request());
        press(&mut app, KeyCode::Char('c'));
        assert_eq!(app.palette, Palette::Dark);
        assert_eq!(app.calendar.theme().dates_view.bg, Some(Color::Black));
    }

    #[test]
    fn test_palette_fonts() {
        let mut app = app();
        press(&mut app, KeyCode::Char('c'));
        let theme = *app.calendar.theme();
        assert!(theme.month_bar.add_modifier.contains(Modifier::ITALIC));
        assert!(theme.days_of_the_week_bar.add_modifier.contains(Modifier::ITALIC));
        assert_eq!(theme.days_of_the_week_bar.bg, Some(Color::Gray));
        press(&mut app, KeyCode::Char('c'));
        let theme = *app.calendar.theme();
        assert!(!theme.month_bar.add_modifier.contains(Modifier::ITALIC));
        assert!(theme.month_bar.add_modifier.contains(Modifier::BOLD));
        assert!(theme.days_of_the_week_bar.add_modifier.is_empty());
    }

    #[test]
    fn test_paging_stops_at_last_page() {
        let config = Configuration::new(datetime!(2024-06-12 09:00 UTC)).extension_policy(
            ExtensionPolicy {
                lookahead: 7,
                leading_edge: 0,
            },
        );
        let mut app = App::new(CompactCalendar::new(Vec::new(), &config).unwrap(), config);
        assert!(app.handle_key(KeyCode::Char('n')));
        app.process_events();
        assert!(!app.handle_key(KeyCode::Char('n')));
        app.process_events();
        assert_eq!(app.weeks_ahead, 2);
        assert_eq!(app.calendar.current_page(), 1);
    }

    #[test]
    fn test_jump_to_date() {
        let mut app = app();
        press(&mut app, KeyCode::Char('g'));
        assert!(render(&mut app).iter().any(|l| l.contains("YYYY-MM-DD")));
        for c in "20240815".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        assert!(!app.handle_key(KeyCode::Char('x')));
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.state, AppState::Calendar);
        assert_eq!(app.selected, Some(date!(2024 - 08 - 15)));
        assert_eq!(app.calendar.window().today(), date!(2024 - 06 - 12));
        assert_eq!(app.weeks_ahead, 0);
        let lines = render(&mut app);
        assert_eq!(app.calendar.current_page(), 4);
        assert!(lines[8].contains("August 2024"));
        press(&mut app, KeyCode::Char('t'));
        assert_eq!(app.selected, Some(date!(2024 - 06 - 12)));
    }

    #[test]
    fn test_jump_cancelled() {
        let mut app = app();
        press(&mut app, KeyCode::Char('g'));
        press(&mut app, KeyCode::Char('2'));
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.state, AppState::Calendar);
        assert!(!app.quitting());
        assert_eq!(app.selected, Some(date!(2024 - 06 - 12)));
    }
}
