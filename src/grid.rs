use std::time::Instant;

use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::{Clear, Paragraph};
use ratatui::Frame;

use crate::card::{CARD_HEIGHT, CARD_MIN_HEIGHT, CARD_WIDTH, TeamCard};
use crate::state::{AppState, BoardState};

/// Where each visible card goes: `(index into view.order, area)`.
pub fn card_slots(area: Rect, total: usize, selected: usize) -> Vec<(usize, Rect)> {
    if total == 0 || area.width == 0 || area.height < CARD_MIN_HEIGHT {
        return Vec::new();
    }
    let per_row = usize::from((area.width / CARD_WIDTH).max(1));
    let card_height = CARD_HEIGHT.min(area.height);
    let visible_rows = usize::from((area.height / card_height).max(1));
    let total_rows = total.div_ceil(per_row);

    let (start_row, end_row) = visible_range(selected / per_row, total_rows, visible_rows);
    let card_width = CARD_WIDTH.min(area.width);

    let mut slots = Vec::new();
    for (screen_row, row) in (start_row..end_row).enumerate() {
        for col in 0..per_row {
            let idx = row * per_row + col;
            if idx >= total {
                break;
            }
            slots.push((
                idx,
                Rect {
                    x: area.x + col as u16 * CARD_WIDTH,
                    y: area.y + screen_row as u16 * card_height,
                    width: card_width,
                    height: card_height,
                },
            ));
        }
    }
    slots
}

/// Clears `area` and draws one card per team in the view's order.
pub fn render_grid(
    frame: &mut Frame,
    area: Rect,
    board: &BoardState,
    view: &AppState,
    now: Instant,
) {
    frame.render_widget(Clear, area);

    if board.teams.is_empty() {
        let empty = Paragraph::new("Inga lag ännu. Tryck a för att lägga till ett lag.")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, area);
        return;
    }
    if area.height < CARD_MIN_HEIGHT {
        let empty = Paragraph::new("Fönstret är för lågt för korten")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, area);
        return;
    }

    for (idx, slot) in card_slots(area, view.order.len(), view.selected) {
        let Some(team) = view.order.get(idx).and_then(|id| board.team(id)) else {
            continue;
        };
        let card = TeamCard::new(team, board.max_score)
            .selected(idx == view.selected)
            .flow(view.flow_progress(&team.id, now));
        frame.render_widget(card, slot);
    }
}

fn visible_range(selected: usize, total: usize, visible: usize) -> (usize, usize) {
    if total == 0 {
        return (0, 0);
    }
    if total <= visible {
        return (0, total);
    }

    let mut start = selected.saturating_sub(visible / 2);
    if start + visible > total {
        start = total - visible;
    }
    (start, start + visible)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slots_wrap_into_rows() {
        let area = Rect::new(0, 0, CARD_WIDTH * 2 + 3, CARD_HEIGHT * 2);
        let slots = card_slots(area, 3, 0);
        assert_eq!(slots.len(), 3);
        assert_eq!(slots[1].1.x, CARD_WIDTH);
        assert_eq!(slots[2].1.y, CARD_HEIGHT);
        assert_eq!(slots[2].1.x, 0);
    }

    #[test]
    fn slots_scroll_to_selected_row() {
        let area = Rect::new(0, 0, CARD_WIDTH, CARD_HEIGHT);
        let slots = card_slots(area, 5, 4);
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].0, 4);
    }
}
