use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Widget};

use crate::score::{self, Preset};
use crate::state::{HexColor, NEW_TEAM_COLOR, Team};

pub const CARD_WIDTH: u16 = 24;
pub const CARD_HEIGHT: u16 = 17;
pub const CARD_MIN_HEIGHT: u16 = 10;

const TUBE_WIDTH: u16 = 8;
// Top of the sand is the team color blended this far toward white.
const GRADIENT_TOP_MIX: f64 = 0.8;
const EIGHTHS: [&str; 8] = [" ", "▁", "▂", "▃", "▄", "▅", "▆", "▇"];

/// One team as a bordered card: readout, hourglass tube, color and controls.
#[derive(Debug, Clone)]
pub struct TeamCard<'a> {
    team: &'a Team,
    max_score: u32,
    selected: bool,
    flow: Option<f64>,
}

impl<'a> TeamCard<'a> {
    pub fn new(team: &'a Team, max_score: u32) -> Self {
        Self {
            team,
            max_score,
            selected: false,
            flow: None,
        }
    }

    pub fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    /// Progress of the running flow animation, if any.
    pub fn flow(mut self, progress: Option<f64>) -> Self {
        self.flow = progress;
        self
    }

    pub fn fill_percent(&self) -> f64 {
        score::fill_percent(self.team.score, self.max_score)
    }
}

impl Widget for TeamCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.selected {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let block = Block::default()
            .title(Span::styled(
                format!(" {} ", self.team.name),
                Style::default().add_modifier(Modifier::BOLD),
            ))
            .borders(Borders::ALL)
            .border_style(border_style);
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height < 5 || inner.width == 0 {
            return;
        }

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(2),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(inner);

        Paragraph::new(score_readout(self.team.score))
            .alignment(ratatui::layout::Alignment::Center)
            .render(rows[0], buf);

        let base = team_color(self.team);
        let tube_area = centered_columns(rows[1], TUBE_WIDTH);
        render_tube(tube_area, buf, base, self.fill_percent(), self.flow);

        Paragraph::new(color_line(&self.team.color, base)).render(rows[2], buf);
        Paragraph::new(controls_line()).render(rows[3], buf);
        Paragraph::new(remove_hint()).render(rows[4], buf);
    }
}

pub fn score_readout(score: u32) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            score.to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(" poäng"),
    ])
}

fn color_line(raw: &str, base: HexColor) -> Line<'static> {
    Line::from(vec![
        Span::raw("Färg: "),
        Span::styled("■", Style::default().fg(to_color(base))),
        Span::raw(format!(" {raw}")),
    ])
}

fn controls_line() -> Line<'static> {
    let mut spans = Vec::with_capacity(Preset::ALL.len() * 2);
    for preset in Preset::ALL {
        let style = if preset.is_destructive() {
            Style::default().fg(Color::Red)
        } else {
            Style::default().fg(Color::Green)
        };
        spans.push(Span::styled(preset.label(), style));
        spans.push(Span::raw(" "));
    }
    Line::from(spans)
}

fn remove_hint() -> Line<'static> {
    Line::from(vec![
        Span::styled("x", Style::default().fg(Color::Red)),
        Span::raw(" Ta bort"),
    ])
}

/// Team color, falling back to the new-team color when the stored value is not a hex color.
pub fn team_color(team: &Team) -> HexColor {
    HexColor::parse(&team.color)
        .or_else(|| HexColor::parse(NEW_TEAM_COLOR))
        .unwrap_or(HexColor::WHITE)
}

pub fn to_color(c: HexColor) -> Color {
    Color::Rgb(c.r, c.g, c.b)
}

/// Color of the sand at `row` counted from the bottom of a sand column `height` rows tall.
pub fn gradient_color(base: HexColor, row: u16, height: u16) -> HexColor {
    if height <= 1 {
        return base;
    }
    let t = f64::from(row) / f64::from(height - 1);
    base.mix(HexColor::WHITE, t * GRADIENT_TOP_MIX)
}

/// Number of fully filled rows and the eighths of the partial row above them.
pub fn fill_rows(percent: f64, height: u16) -> (u16, usize) {
    let eighths = (percent.clamp(0.0, 100.0) / 100.0 * f64::from(height) * 8.0).round() as u32;
    let full = (eighths / 8) as u16;
    if full >= height {
        return (height, 0);
    }
    (full, (eighths % 8) as usize)
}

fn centered_columns(area: Rect, width: u16) -> Rect {
    let width = width.min(area.width);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y,
        width,
        height: area.height,
    }
}

fn render_tube(area: Rect, buf: &mut Buffer, base: HexColor, percent: f64, flow: Option<f64>) {
    if area.width < 3 || area.height < 2 {
        return;
    }
    let glass = Style::default().fg(Color::Gray);
    let left = area.x;
    let right = area.x + area.width - 1;
    let bottom = area.y + area.height - 1;

    for y in area.y..bottom {
        buf.get_mut(left, y).set_symbol("│").set_style(glass);
        buf.get_mut(right, y).set_symbol("│").set_style(glass);
    }
    buf.get_mut(left, bottom).set_symbol("╰").set_style(glass);
    buf.get_mut(right, bottom).set_symbol("╯").set_style(glass);
    for x in (left + 1)..right {
        buf.get_mut(x, bottom).set_symbol("─").set_style(glass);
    }

    let sand_height = area.height - 1;
    let (full, partial) = fill_rows(percent, sand_height);
    // Gradient spans the sand, not the tube.
    let filled = full + u16::from(partial > 0);
    for row in 0..sand_height {
        let y = bottom - 1 - row;
        let color = to_color(gradient_color(base, row, filled));
        let symbol = if row < full {
            "█"
        } else if row == full && partial > 0 {
            EIGHTHS[partial]
        } else {
            continue;
        };
        for x in (left + 1)..right {
            buf.get_mut(x, y).set_symbol(symbol).set_fg(color);
        }
    }

    // Falling stream from the top of the tube to the sand surface.
    if let Some(progress) = flow {
        let empty = sand_height.saturating_sub(full);
        if empty == 0 {
            return;
        }
        let head = ((progress.clamp(0.0, 1.0) * f64::from(empty)).ceil() as u16).clamp(1, empty);
        let x = left + area.width / 2;
        let stream = Style::default().fg(to_color(base));
        for i in 0..head {
            let y = area.y + i;
            if y >= bottom - full {
                break;
            }
            buf.get_mut(x, y).set_symbol("┊").set_style(stream);
        }
    }
}
