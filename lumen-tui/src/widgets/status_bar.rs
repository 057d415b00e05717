//! Status bar widget - stream info and messages

use crate::app::{AppState, MessageType};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

/// Widget for the one-line status bar under the spectrum
pub struct StatusBarWidget<'a> {
    state: &'a AppState,
}

impl<'a> StatusBarWidget<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    fn info_line(&self) -> Line<'a> {
        let state = self.state;
        let theme = &state.theme;
        let mut spans = vec![
            Span::styled(state.device_name.clone(), theme.accent()),
            Span::styled(
                format!(
                    " {:.1}kHz {} ",
                    state.sample_rate as f32 / 1000.0,
                    state.block_size
                ),
                theme.dim(),
            ),
            Span::styled(format!("[{}]", state.preset.name()), theme.title()),
            Span::styled(format!(" {} ", state.theme.name), theme.dim()),
            Span::styled(format!("peak {:.2}", state.peak), theme.dim()),
        ];
        if state.frozen {
            spans.push(Span::styled(" FROZEN", theme.danger()));
        }
        Line::from(spans)
    }
}

impl Widget for StatusBarWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 1 {
            return;
        }

        let chunks = Layout::horizontal([
            Constraint::Min(20),    // Stream info
            Constraint::Length(40), // Message or help hint
        ])
        .split(area);

        Paragraph::new(self.info_line()).render(chunks[0], buf);

        let theme = &self.state.theme;
        let hint = match &self.state.message {
            Some((msg, MessageType::Info)) => Line::from(Span::styled(msg.as_str(), theme.accent())),
            Some((msg, MessageType::Error)) => Line::from(Span::styled(msg.as_str(), theme.danger())),
            None => Line::from(Span::styled(
                "q quit  t theme  p preset  space freeze",
                theme.dim(),
            )),
        };
        Paragraph::new(hint).render(chunks[1], buf);
    }
}
