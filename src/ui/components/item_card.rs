use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Paragraph, Widget};

use returnsleuth::model::item::{ItemType, ReturnItem, VisualDefect};
use returnsleuth::render::{self, Anchor, Distractor, ItemRenderer};
use returnsleuth::session::decision::Outcome;

use crate::ui::layout::percent_cell;
use crate::ui::theme::{Theme, ThemeColors};

fn silhouette(item_type: ItemType) -> &'static [&'static str] {
    match item_type {
        ItemType::ClothingTop => &[
            " __/‾‾\\__ ",
            "/  |  |  \\",
            "‾‾|    |‾‾",
            "  |    |  ",
            "  ‾‾‾‾‾‾  ",
        ],
        ItemType::ClothingDress => &[
            "  /‾‾\\  ",
            "  |  |  ",
            " /    \\ ",
            "/      \\",
            "‾‾‾‾‾‾‾‾",
        ],
        ItemType::Shoe => &[
            "   ___     ",
            "  |   \\___ ",
            "  |       \\",
            "  ‾‾‾‾‾‾‾‾‾",
        ],
        ItemType::Electronics => &[
            "┌────────┐",
            "│        │",
            "│        │",
            "└──┬──┬──┘",
            "  ‾‾‾‾‾‾  ",
        ],
        ItemType::Bag => &[
            "   ╭──╮   ",
            "┌──┴──┴──┐",
            "│        │",
            "│        │",
            "└────────┘",
        ],
    }
}

fn defect_glyph(defect: VisualDefect) -> (&'static str, Color) {
    match defect {
        VisualDefect::Stain => ("●", Color::Rgb(180, 83, 9)),
        VisualDefect::Tear => ("✂", Color::Rgb(30, 41, 59)),
        VisualDefect::BrokenTag => ("⊘", Color::Rgb(239, 68, 68)),
        VisualDefect::MissingComponent => ("⬚", Color::Rgb(100, 116, 139)),
        VisualDefect::BrokenSeal => ("!", Color::Rgb(202, 138, 4)),
        VisualDefect::None => (" ", Color::Reset),
    }
}

struct BufferPainter<'b> {
    area: Rect,
    buf: &'b mut Buffer,
    bg: Color,
}

impl ItemRenderer for BufferPainter<'_> {
    fn draw_base(&mut self, item: &ReturnItem) {
        let color = ThemeColors::parse_color(&item.color);
        let art = silhouette(item.item_type);
        let height = art.len() as u16;
        let top = self.area.y + self.area.height.saturating_sub(height) / 2;
        for (i, row) in art.iter().enumerate() {
            let width = row.chars().count() as u16;
            let left = self.area.x + self.area.width.saturating_sub(width) / 2;
            let y = top + i as u16;
            if y < self.area.y + self.area.height {
                self.buf
                    .set_string(left, y, row, Style::default().fg(color).bg(self.bg));
            }
        }
    }

    fn draw_defect(&mut self, defect: VisualDefect, anchor: Anchor) {
        let (glyph, color) = defect_glyph(defect);
        let (x, y) = percent_cell(self.area, anchor.top, anchor.left);
        self.buf.set_string(
            x,
            y,
            glyph,
            Style::default().fg(color).bg(self.bg).add_modifier(Modifier::BOLD),
        );
    }

    fn draw_distractor(&mut self, d: &Distractor) {
        let (x, y) = percent_cell(self.area, d.top, d.left);
        let color = if d.dark { Color::Rgb(30, 41, 59) } else { Color::White };
        self.buf
            .set_string(x, y, "·", Style::default().fg(color).bg(self.bg));
    }
}

pub struct ItemCard<'a> {
    item: Option<&'a ReturnItem>,
    noise: &'a [Distractor],
    feedback: Option<&'a Outcome>,
    revealed: Option<bool>,
    theme: &'a Theme,
}

impl<'a> ItemCard<'a> {
    pub fn new(
        item: Option<&'a ReturnItem>,
        noise: &'a [Distractor],
        feedback: Option<&'a Outcome>,
        revealed: Option<bool>,
        theme: &'a Theme,
    ) -> Self {
        Self {
            item,
            noise,
            feedback,
            revealed,
            theme,
        }
    }
}

impl Widget for ItemCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let border = match self.feedback {
            Some(o) if o.correct => colors.accept(),
            Some(_) => colors.reject(),
            None => colors.card_border(),
        };
        let title = self
            .item
            .map(|i| format!(" {} ", i.name))
            .unwrap_or_else(|| " Loading ".to_string());
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .title(title)
            .border_style(Style::default().fg(border))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let Some(item) = self.item else {
            Paragraph::new(Line::from(Span::styled(
                "Fetching returned items...",
                Style::default().fg(colors.muted()),
            )))
            .alignment(Alignment::Center)
            .render(inner, buf);
            return;
        };

        if inner.height < 3 {
            return;
        }
        let canvas = Rect::new(inner.x, inner.y, inner.width, inner.height - 2);
        let mut painter = BufferPainter {
            area: canvas,
            buf: &mut *buf,
            bg: colors.bg(),
        };
        render::render_item(&mut painter, item, self.noise);

        let status_area = Rect::new(inner.x, inner.y + inner.height - 2, inner.width, 2);
        let status = match (self.feedback, self.revealed) {
            (Some(outcome), _) => {
                let (verdict, color) = if outcome.correct {
                    (format!("Correct! {:+}", outcome.score_delta), colors.accept())
                } else {
                    (format!("Missed! {:+}", outcome.score_delta), colors.reject())
                };
                vec![
                    Line::from(Span::styled(
                        verdict,
                        Style::default().fg(color).add_modifier(Modifier::BOLD),
                    )),
                    Line::from(Span::styled(
                        outcome.explanation.clone(),
                        Style::default().fg(colors.fg()),
                    )),
                ]
            }
            (None, Some(true)) => vec![Line::from(Span::styled(
                "X-ray: flaw detected!",
                Style::default().fg(colors.xray()),
            ))],
            (None, Some(false)) => vec![Line::from(Span::styled(
                "X-ray: looks flawless!",
                Style::default().fg(colors.accept()),
            ))],
            (None, None) => Vec::new(),
        };
        Paragraph::new(status)
            .alignment(Alignment::Center)
            .render(status_area, buf);
    }
}
