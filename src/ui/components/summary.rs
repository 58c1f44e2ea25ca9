use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Bar, BarChart, BarGroup, Block, Paragraph, Widget};

use returnsleuth::session::summary::LevelSummary;

use crate::ui::theme::Theme;

pub struct SummaryPanel<'a> {
    summary: &'a LevelSummary,
    theme: &'a Theme,
}

impl<'a> SummaryPanel<'a> {
    pub fn new(summary: &'a LevelSummary, theme: &'a Theme) -> Self {
        Self { summary, theme }
    }
}

impl Widget for SummaryPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let s = self.summary;

        let (headline, color) = if s.passed {
            (format!("Level {} cleared!", s.level), colors.accept())
        } else {
            (format!("Level {} failed", s.level), colors.reject())
        };

        let block = Block::bordered()
            .title(format!(" {headline} "))
            .border_style(Style::default().fg(color))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5),
                Constraint::Min(4),
                Constraint::Length(1),
            ])
            .split(inner);

        let mut score_line = vec![Span::styled(
            format!("Score {}", s.score),
            Style::default().fg(colors.accent()).add_modifier(Modifier::BOLD),
        )];
        if s.high_score {
            score_line.push(Span::styled("  ★ high score", Style::default().fg(colors.accent())));
        }
        let stats = vec![
            Line::from(""),
            Line::from(score_line),
            Line::from(Span::styled(
                format!(
                    "Accuracy {:.0}%  |  Best streak {}",
                    s.accuracy(),
                    s.max_streak
                ),
                Style::default().fg(colors.fg()),
            )),
            Line::from(Span::styled(
                if s.passed {
                    "Sharp eyes. The warehouse is impressed."
                } else {
                    "Too many slipped through. Try again?"
                },
                Style::default().fg(colors.muted()),
            )),
        ];
        Paragraph::new(stats)
            .alignment(Alignment::Center)
            .render(rows[0], buf);

        let bars = [
            Bar::default()
                .label(Line::from("Correct"))
                .value(s.correct as u64)
                .style(Style::default().fg(colors.accept())),
            Bar::default()
                .label(Line::from("Missed"))
                .value(s.mistakes as u64)
                .style(Style::default().fg(colors.reject())),
        ];
        let chart_area = Rect {
            x: rows[1].x + rows[1].width.saturating_sub(25) / 2,
            width: rows[1].width.min(25),
            ..rows[1]
        };
        BarChart::default()
            .data(BarGroup::default().bars(&bars))
            .bar_width(9)
            .bar_gap(3)
            .render(chart_area, buf);

        let hint = if s.passed {
            " [n] Next level  [r] Retry  [Esc] Menu "
        } else {
            " [r] Retry  [Esc] Menu "
        };
        Paragraph::new(Line::from(Span::styled(hint, Style::default().fg(colors.muted()))))
            .alignment(Alignment::Center)
            .render(rows[2], buf);
    }
}
