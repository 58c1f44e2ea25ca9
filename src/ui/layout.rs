use ratatui::layout::{Constraint, Direction, Layout, Rect};

pub struct GameLayout {
    pub header: Rect,
    pub timer: Rect,
    pub card: Rect,
    pub sidebar: Option<Rect>,
    pub footer: Rect,
}

impl GameLayout {
    pub fn new(area: Rect) -> Self {
        let vertical = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(3),
                Constraint::Min(10),
                Constraint::Length(1),
            ])
            .split(area);

        // Narrow terminals drop the item details sidebar.
        if area.width >= 80 {
            let horizontal = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
                .split(vertical[2]);
            Self {
                header: vertical[0],
                timer: vertical[1],
                card: horizontal[0],
                sidebar: Some(horizontal[1]),
                footer: vertical[3],
            }
        } else {
            Self {
                header: vertical[0],
                timer: vertical[1],
                card: vertical[2],
                sidebar: None,
                footer: vertical[3],
            }
        }
    }
}

pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    const MIN_POPUP_WIDTH: u16 = 48;
    const MIN_POPUP_HEIGHT: u16 = 14;

    let requested_w = area.width.saturating_mul(percent_x.min(100)) / 100;
    let requested_h = area.height.saturating_mul(percent_y.min(100)) / 100;

    let target_w = requested_w.max(MIN_POPUP_WIDTH).min(area.width);
    let target_h = requested_h.max(MIN_POPUP_HEIGHT).min(area.height);

    let left = area
        .x
        .saturating_add((area.width.saturating_sub(target_w)) / 2);
    let top = area
        .y
        .saturating_add((area.height.saturating_sub(target_h)) / 2);

    Rect::new(left, top, target_w, target_h)
}

/// Map a 0..=100 percentage onto a cell inside `area`.
pub fn percent_cell(area: Rect, top: u8, left: u8) -> (u16, u16) {
    let span = |len: u16, pct: u8| -> u16 {
        if len == 0 {
            return 0;
        }
        ((len - 1) as u32 * pct.min(100) as u32 / 100) as u16
    };
    (area.x + span(area.width, left), area.y + span(area.height, top))
}
