use crate::theme::PLACEHOLDER_STYLE;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Flex, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Clear, Paragraph, StatefulWidget, Widget},
};
use time::{format_description::FormatItem, macros::format_description, Date};

pub(crate) static YMD_FMT: &[FormatItem<'_>] = format_description!("[year]-[month]-[day]");

const TEMPLATE: &str = "YYYY-MM-DD";

/// Where each typed digit goes in `TEMPLATE`
const DIGIT_POSITIONS: [usize; 8] = [0, 1, 2, 3, 5, 6, 8, 9];

const OUTER_WIDTH: u16 = 16;
const OUTER_HEIGHT: u16 = 3;

/// Popup prompting for a date to select
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct JumpTo(pub(crate) Style);

impl StatefulWidget for JumpTo {
    type State = JumpToState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let [outer_area] = Layout::horizontal([OUTER_WIDTH])
            .flex(Flex::Center)
            .areas(area);
        let [outer_area] = Layout::vertical([OUTER_HEIGHT])
            .flex(Flex::Center)
            .areas(outer_area);
        Clear.render(outer_area, buf);
        Paragraph::new(state.to_line(self.0))
            .alignment(Alignment::Center)
            .style(self.0)
            .block(
                Block::bordered()
                    .title(" Jump To… ")
                    .title_alignment(Alignment::Center),
            )
            .render(outer_area, buf);
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct JumpToState {
    digits: [u8; 8],
    len: usize,
}

impl JumpToState {
    pub(crate) fn new() -> JumpToState {
        JumpToState::default()
    }

    /// The template with every digit typed so far filled in
    fn text(&self) -> String {
        let mut text = String::from(TEMPLATE);
        for (&pos, d) in DIGIT_POSITIONS.iter().zip(self.digits.iter().take(self.len)) {
            text.replace_range(pos..=pos, &d.to_string());
        }
        text
    }

    fn to_line(self, style: Style) -> Line<'static> {
        let mut text = self.text();
        let filled = self
            .len
            .checked_sub(1)
            .and_then(|i| DIGIT_POSITIONS.get(i))
            .map_or(0, |&pos| pos + 1);
        let rest = text.split_off(filled);
        Line::from_iter([
            Span::styled(text, style),
            Span::styled(rest, style.patch(PLACEHOLDER_STYLE)),
        ])
    }

    pub(crate) fn handle_input(&mut self, input: JumpToInput) -> JumpToOutput {
        match input {
            JumpToInput::Digit(d) if d < 10 && self.len < DIGIT_POSITIONS.len() => {
                self.digits[self.len] = d;
                self.len += 1;
                JumpToOutput::Ok
            }
            JumpToInput::Backspace if self.len > 0 => {
                self.len -= 1;
                JumpToOutput::Ok
            }
            JumpToInput::Enter if self.len == DIGIT_POSITIONS.len() => {
                // Digits for a nonexistent date such as 2023-02-29 are kept so
                // they can be corrected.
                Date::parse(&self.text(), &YMD_FMT)
                    .map_or(JumpToOutput::Invalid, JumpToOutput::Jump)
            }
            _ => JumpToOutput::Invalid,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum JumpToInput {
    Digit(u8),
    Backspace,
    Enter,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum JumpToOutput {
    Ok,
    Invalid,
    Jump(Date),
}
