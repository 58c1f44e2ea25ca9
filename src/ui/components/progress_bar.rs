use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::{Block, Widget};

use crate::ui::theme::Theme;

const LOW_TIME: u32 = 10;

/// Countdown bar. Extra seconds from a time power-up can push it past full.
pub struct TimeBar<'a> {
    pub remaining: u32,
    pub total: u32,
    pub theme: &'a Theme,
}

impl<'a> TimeBar<'a> {
    pub fn new(remaining: u32, total: u32, theme: &'a Theme) -> Self {
        Self {
            remaining,
            total: total.max(1),
            theme,
        }
    }

    fn ratio(&self) -> f64 {
        (self.remaining as f64 / self.total as f64).clamp(0.0, 1.0)
    }
}

impl Widget for TimeBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let low = self.remaining <= LOW_TIME;

        let block = Block::bordered()
            .title(" Time ")
            .border_style(Style::default().fg(if low { colors.timer_low() } else { colors.border() }));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let filled_width = (self.ratio() * inner.width as f64) as u16;
        let fill = if low { colors.timer_low() } else { colors.timer() };
        for x in inner.x..inner.x + inner.width {
            let style = if x < inner.x + filled_width {
                Style::default().fg(colors.bg()).bg(fill)
            } else {
                Style::default().fg(colors.fg()).bg(colors.timer_track())
            };
            buf[(x, inner.y)].set_style(style);
        }

        let label = format!("{}s", self.remaining);
        let label_x = inner.x + (inner.width.saturating_sub(label.len() as u16)) / 2;
        buf.set_string(label_x, inner.y, &label, Style::default().fg(colors.fg()));
    }
}
