use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use returnsleuth::model::item::{Category, ReturnItem};

use crate::ui::theme::Theme;

/// Side panel with the item's tag text. Material and description only show
/// once the player inspects the item.
pub struct ItemDetails<'a> {
    item: Option<&'a ReturnItem>,
    open: bool,
    reveal_uses: u32,
    time_uses: u32,
    theme: &'a Theme,
}

impl<'a> ItemDetails<'a> {
    pub fn new(
        item: Option<&'a ReturnItem>,
        open: bool,
        reveal_uses: u32,
        time_uses: u32,
        theme: &'a Theme,
    ) -> Self {
        Self {
            item,
            open,
            reveal_uses,
            time_uses,
            theme,
        }
    }
}

/// One-row stand-in for the panel when there is no room for a sidebar.
pub fn label_line(item: &ReturnItem, open: bool, theme: &Theme) -> Line<'static> {
    let colors = &theme.colors;
    let label = Style::default().fg(colors.muted());
    if !open {
        return Line::from(Span::styled("[i] inspect label", label));
    }
    Line::from(vec![
        Span::styled("Material ", label),
        Span::styled(item.material.clone(), Style::default().fg(colors.accent())),
        Span::styled(" | ", label),
        Span::styled(item.description.clone(), Style::default().fg(colors.fg())),
    ])
}

impl Widget for ItemDetails<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let block = Block::bordered()
            .title(" Details ")
            .border_style(Style::default().fg(colors.border()));
        let inner = block.inner(area);
        block.render(area, buf);

        let label = Style::default().fg(colors.muted());
        let value = Style::default().fg(colors.fg());
        let mut lines = Vec::new();

        if let Some(item) = self.item {
            let section = match item.category {
                Category::Female => "Womenswear",
                Category::Male => "Menswear",
            };
            lines.push(Line::from(Span::styled(
                item.name.clone(),
                Style::default().fg(colors.accent()).add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(vec![
                Span::styled("Section  ", label),
                Span::styled(section, value),
            ]));
            if self.open {
                lines.push(Line::from(vec![
                    Span::styled("Material ", label),
                    Span::styled(item.material.clone(), value),
                ]));
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(item.description.clone(), value)));
            } else {
                lines.push(Line::from(Span::styled("[i] inspect label", label)));
            }
        }

        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("Power-ups", label)));
        lines.push(Line::from(vec![
            Span::styled("[1] X-Ray Eyes   ", value),
            Span::styled(format!("x{}", self.reveal_uses), Style::default().fg(colors.xray())),
        ]));
        lines.push(Line::from(vec![
            Span::styled("[2] Time Freeze  ", value),
            Span::styled(format!("x{}", self.time_uses), Style::default().fg(colors.accent())),
        ]));

        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use returnsleuth::model::item::{ItemType, VisualDefect};

    use super::*;

    fn item() -> ReturnItem {
        ReturnItem {
            id: ReturnItem::new_id(),
            name: "Leather Tote".to_string(),
            category: Category::Female,
            item_type: ItemType::Bag,
            material: "Leather".to_string(),
            description: "Roomy shoulder bag.".to_string(),
            visual_defects: vec![VisualDefect::None],
            is_fraud: false,
            color: "#92400E".to_string(),
            explanation: "Clean.".to_string(),
        }
    }

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn label_line_hides_tag_until_inspected() {
        let theme = Theme::default();
        let closed = text(&label_line(&item(), false, &theme));
        assert!(!closed.contains("Leather"));

        let open = text(&label_line(&item(), true, &theme));
        assert!(open.contains("Leather"));
        assert!(open.contains("Roomy shoulder bag."));
    }
}
