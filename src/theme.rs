use crate::calendar::CellKind;
use ratatui::style::{Color, Modifier, Style};

pub(crate) const BASE_STYLE: Style = Style::new().fg(Color::White).bg(Color::Black);

/// Default highlight color for the selected date and today's marker
pub(crate) const SELECTED_COLOR: Color = Color::Rgb(255, 59, 48);

/// Unfilled positions of the jump-to-date prompt
pub(crate) const PLACEHOLDER_STYLE: Style = Style::new().add_modifier(Modifier::DIM);

/// The parts of the calendar whose colors and fonts can be changed
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) enum ConfigurableRegion {
    MonthBar,
    DaysOfTheWeekBar,
    DatesView,
    SelectedDateView,
    MonthBarButtons,
    All,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Theme {
    pub(crate) month_bar: Style,
    pub(crate) month_bar_buttons: Style,
    pub(crate) days_of_the_week_bar: Style,
    pub(crate) dates_view: Style,
    pub(crate) selected_date: Style,
}

impl Default for Theme {
    fn default() -> Theme {
        Theme {
            month_bar: BASE_STYLE.add_modifier(Modifier::BOLD),
            month_bar_buttons: Style::new().fg(Color::Gray),
            days_of_the_week_bar: BASE_STYLE.fg(Color::Gray),
            dates_view: BASE_STYLE,
            selected_date: Style::new()
                .fg(Color::White)
                .bg(SELECTED_COLOR)
                .add_modifier(Modifier::BOLD),
        }
    }
}

// Each setter returns `true` if every visible date cell needs to be redrawn.
impl Theme {
    pub(crate) fn set_background(&mut self, region: ConfigurableRegion, color: Color) -> bool {
        match region {
            ConfigurableRegion::MonthBar => {
                self.month_bar = self.month_bar.bg(color);
                false
            }
            ConfigurableRegion::MonthBarButtons => {
                self.month_bar_buttons = self.month_bar_buttons.bg(color);
                false
            }
            ConfigurableRegion::DaysOfTheWeekBar => {
                self.days_of_the_week_bar = self.days_of_the_week_bar.bg(color);
                false
            }
            ConfigurableRegion::DatesView => {
                self.dates_view = self.dates_view.bg(color);
                true
            }
            ConfigurableRegion::SelectedDateView => {
                self.selected_date = self.selected_date.bg(color);
                true
            }
            ConfigurableRegion::All => {
                self.month_bar = self.month_bar.bg(color);
                self.days_of_the_week_bar = self.days_of_the_week_bar.bg(color);
                self.dates_view = self.dates_view.bg(color);
                // Buttons show the month bar through them
                self.month_bar_buttons.bg = None;
                true
            }
        }
    }

    pub(crate) fn set_foreground(&mut self, region: ConfigurableRegion, color: Color) -> bool {
        match region {
            ConfigurableRegion::MonthBar => {
                self.month_bar = self.month_bar.fg(color);
                false
            }
            ConfigurableRegion::MonthBarButtons => {
                self.month_bar_buttons = self.month_bar_buttons.fg(color);
                false
            }
            ConfigurableRegion::DaysOfTheWeekBar => {
                self.days_of_the_week_bar = self.days_of_the_week_bar.fg(color);
                false
            }
            ConfigurableRegion::DatesView => {
                self.dates_view = self.dates_view.fg(color);
                true
            }
            ConfigurableRegion::SelectedDateView => {
                self.selected_date = self.selected_date.fg(color);
                true
            }
            ConfigurableRegion::All => {
                self.month_bar = self.month_bar.fg(color);
                self.days_of_the_week_bar = self.days_of_the_week_bar.fg(color);
                self.dates_view = self.dates_view.fg(color);
                true
            }
        }
    }

    /// Replace the text modifiers of a region.  Button glyphs and the
    /// selection highlight have no font of their own.
    pub(crate) fn set_font(&mut self, region: ConfigurableRegion, font: Modifier) -> bool {
        match region {
            ConfigurableRegion::MonthBar => {
                self.month_bar = with_font(self.month_bar, font);
                false
            }
            ConfigurableRegion::DaysOfTheWeekBar => {
                self.days_of_the_week_bar = with_font(self.days_of_the_week_bar, font);
                false
            }
            ConfigurableRegion::DatesView => {
                self.dates_view = with_font(self.dates_view, font);
                true
            }
            ConfigurableRegion::All => {
                self.month_bar = with_font(self.month_bar, font);
                self.days_of_the_week_bar = with_font(self.days_of_the_week_bar, font);
                self.dates_view = with_font(self.dates_view, font);
                true
            }
            ConfigurableRegion::SelectedDateView | ConfigurableRegion::MonthBarButtons => false,
        }
    }

    pub(crate) fn cell_style(&self, kind: CellKind) -> Style {
        match kind {
            CellKind::Normal => self.dates_view,
            CellKind::Past => self.dates_view.add_modifier(Modifier::DIM),
            CellKind::Today => self
                .dates_view
                .fg(self.selected_date.bg.unwrap_or(SELECTED_COLOR)),
            CellKind::Selected => self.dates_view.patch(self.selected_date),
        }
    }
}

fn with_font(style: Style, font: Modifier) -> Style {
    style.remove_modifier(Modifier::all()).add_modifier(font)
}

/// Color schemes the application can cycle through
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) enum Palette {
    #[default]
    Dark,
    Light,
}

impl Palette {
    pub(crate) fn next(self) -> Palette {
        match self {
            Palette::Dark => Palette::Light,
            Palette::Light => Palette::Dark,
        }
    }

    /// The (region, background, foreground) assignments making up the
    /// palette, in the order they are applied
    pub(crate) fn assignments(self) -> [(ConfigurableRegion, Color, Color); 4] {
        match self {
            Palette::Dark => [
                (ConfigurableRegion::All, Color::Black, Color::White),
                (ConfigurableRegion::DaysOfTheWeekBar, Color::Black, Color::Gray),
                (ConfigurableRegion::SelectedDateView, SELECTED_COLOR, Color::White),
                (ConfigurableRegion::MonthBarButtons, Color::Black, Color::Gray),
            ],
            Palette::Light => [
                (ConfigurableRegion::All, Color::White, Color::Black),
                (ConfigurableRegion::DaysOfTheWeekBar, Color::Gray, Color::Black),
                (ConfigurableRegion::SelectedDateView, Color::Blue, Color::White),
                (ConfigurableRegion::MonthBarButtons, Color::White, Color::Blue),
            ],
        }
    }

    /// Text modifiers applied along with the palette's colors
    pub(crate) fn fonts(self) -> [(ConfigurableRegion, Modifier); 3] {
        match self {
            Palette::Dark => [
                (ConfigurableRegion::MonthBar, Modifier::BOLD),
                (ConfigurableRegion::DaysOfTheWeekBar, Modifier::empty()),
                (ConfigurableRegion::DatesView, Modifier::empty()),
            ],
            Palette::Light => [
                (ConfigurableRegion::MonthBar, Modifier::BOLD | Modifier::ITALIC),
                (ConfigurableRegion::DaysOfTheWeekBar, Modifier::ITALIC),
                (ConfigurableRegion::DatesView, Modifier::empty()),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_background_redraw_regions() {
        let mut theme = Theme::default();
        assert!(!theme.set_background(ConfigurableRegion::MonthBar, Color::Blue));
        assert_eq!(theme.month_bar.bg, Some(Color::Blue));
        assert!(theme.set_background(ConfigurableRegion::DatesView, Color::Blue));
        assert!(theme.set_background(ConfigurableRegion::SelectedDateView, Color::Green));
        assert_eq!(theme.selected_date.bg, Some(Color::Green));
    }

    #[test]
    fn test_background_all() {
        let mut theme = Theme::default();
        theme.set_background(ConfigurableRegion::MonthBarButtons, Color::Red);
        assert!(theme.set_background(ConfigurableRegion::All, Color::White));
        assert_eq!(theme.month_bar.bg, Some(Color::White));
        assert_eq!(theme.days_of_the_week_bar.bg, Some(Color::White));
        assert_eq!(theme.dates_view.bg, Some(Color::White));
        assert_eq!(theme.month_bar_buttons.bg, None);
        assert_eq!(theme.selected_date.bg, Some(SELECTED_COLOR));
    }

    #[test]
    fn test_font() {
        let mut theme = Theme::default();
        assert!(!theme.set_font(ConfigurableRegion::MonthBar, Modifier::ITALIC));
        assert!(theme.month_bar.add_modifier.contains(Modifier::ITALIC));
        assert!(!theme.month_bar.add_modifier.contains(Modifier::BOLD));
        assert!(!theme.set_font(ConfigurableRegion::SelectedDateView, Modifier::ITALIC));
        assert!(theme.set_font(ConfigurableRegion::DatesView, Modifier::BOLD));
    }

    #[test]
    fn test_cell_styles() {
        let mut theme = Theme::default();
        assert_eq!(theme.cell_style(CellKind::Today).fg, Some(SELECTED_COLOR));
        assert_eq!(theme.cell_style(CellKind::Selected).bg, Some(SELECTED_COLOR));
        theme.set_background(ConfigurableRegion::SelectedDateView, Color::Blue);
        assert_eq!(theme.cell_style(CellKind::Today).fg, Some(Color::Blue));
        assert!(theme
            .cell_style(CellKind::Past)
            .add_modifier
            .contains(Modifier::DIM));
    }
}
