use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::ui::theme::Theme;

pub struct Menu<'a> {
    pub level_seconds: u32,
    pub online: bool,
    pub theme: &'a Theme,
}

impl<'a> Menu<'a> {
    pub fn new(level_seconds: u32, online: bool, theme: &'a Theme) -> Self {
        Self {
            level_seconds,
            online,
            theme,
        }
    }
}

impl Widget for &Menu<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let key = Style::default().fg(colors.accent()).add_modifier(Modifier::BOLD);
        let text = Style::default().fg(colors.fg());
        let muted = Style::default().fg(colors.muted());

        let source = if self.online {
            "Items: generative source with local fallback"
        } else {
            "Items: local catalog (offline)"
        };

        let lines = vec![
            Line::from(""),
            Line::from(Span::styled("returnsleuth", key)),
            Line::from(Span::styled("Return inspection challenge", text)),
            Line::from(""),
            Line::from(Span::styled(
                format!(
                    "Returned items keep coming. You have {}s per level to judge each one by its looks.",
                    self.level_seconds
                ),
                text,
            )),
            Line::from(""),
            Line::from(vec![Span::styled("[a] ", key), Span::styled("Accept: item is flawless", text)]),
            Line::from(vec![Span::styled("[d] ", key), Span::styled("Reject: stain, tear, broken tag or seal, missing part", text)]),
            Line::from(vec![
                Span::styled("[i] ", key),
                Span::styled("Inspect  ", text),
                Span::styled("[1] ", key),
                Span::styled("X-ray  ", text),
                Span::styled("[2] ", key),
                Span::styled("+15s", text),
            ]),
            Line::from(""),
            Line::from(Span::styled("Streaks add a bonus; mistakes cost 50 points.", muted)),
            Line::from(Span::styled("Clear a level with a positive score and no more misses than hits.", muted)),
            Line::from(""),
            Line::from(vec![Span::styled("[Enter] ", key), Span::styled("Start", text)]),
            Line::from(vec![Span::styled("[q] ", key), Span::styled("Quit", text)]),
            Line::from(""),
            Line::from(Span::styled(source, muted)),
        ];

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(inner, buf);
    }
}
