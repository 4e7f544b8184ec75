use std::io;
use std::time::Instant;

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use timglas_terminal::app::{App, DynStore};
use timglas_terminal::config::Config;
use timglas_terminal::grid;
use timglas_terminal::state::{AddField, AppState, BoardState, Mode, PendingAction};

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let config = Config::from_env();
    let mut app = App::open(&config);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app, &config);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    for line in app.state.logs.iter().filter(|l| !l.starts_with("[INFO]")) {
        eprintln!("{line}");
    }
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App<DynStore>,
    config: &Config,
) -> io::Result<()> {
    loop {
        let now = Instant::now();
        app.state.expire_flows(now);
        terminal.draw(|f| ui(f, app, now))?;

        if event::poll(config.tick_rate)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App<DynStore>, now: Instant) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(5),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(app.board.state()))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    grid::render_grid(frame, chunks[1], app.board.state(), &app.state, now);

    let console = Paragraph::new(console_text(&app.state))
        .block(Block::default().title("Konsol").borders(Borders::ALL));
    frame.render_widget(console, chunks[2]);

    let footer =
        Paragraph::new(footer_text(&app.state.mode)).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, chunks[3]);

    match &app.state.mode {
        Mode::Normal => {}
        Mode::EditName { buffer, .. } => {
            render_prompt(frame, "Byt namn", &[("Namn", buffer, true)])
        }
        Mode::EditColor { buffer, .. } => {
            render_prompt(frame, "Byt färg", &[("Färg", buffer, true)])
        }
        Mode::AddTeam { name, color, field } => render_prompt(
            frame,
            "Lägg till lag",
            &[
                ("Namn", name, *field == AddField::Name),
                ("Färg", color, *field == AddField::Color),
            ],
        ),
        Mode::Confirm(action) => render_confirm(frame, action),
    }

    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(board: &BoardState) -> String {
    let line1 = format!(
        "  ╲▁╱  TIMGLAS | {} lag | Skala: {} poäng",
        board.teams.len(),
        board.max_score
    );
    let line2 = "  ╱▔╲".to_string();
    format!("{line1}\n{line2}")
}

fn footer_text(mode: &Mode) -> String {
    match mode {
        Mode::Normal => {
            concat!(
                "←/→ Välj | t +10 | f +5 | + +1 | - -1 | z 0 | r Namn | c/C Färg | ",
                "a Nytt lag | x Ta bort | R Nollställ | ? Hjälp | q Avsluta"
            )
            .to_string()
        }
        Mode::EditName { .. } | Mode::EditColor { .. } => "Enter Spara | Esc Avbryt".to_string(),
        Mode::AddTeam { .. } => "Tab Byt fält | Enter Lägg till | Esc Avbryt".to_string(),
        Mode::Confirm(_) => "y Ja | n Nej".to_string(),
    }
}

fn console_text(state: &AppState) -> String {
    if state.logs.is_empty() {
        return "Inga meddelanden".to_string();
    }
    let start = state.logs.len().saturating_sub(3);
    state
        .logs
        .iter()
        .skip(start)
        .cloned()
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_prompt(frame: &mut Frame, title: &str, fields: &[(&str, &String, bool)]) {
    let area = centered_rect(50, 30, frame.size());
    frame.render_widget(Clear, area);

    let lines: Vec<Line> = fields
        .iter()
        .map(|(label, value, active)| {
            let style = if *active {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            let cursor = if *active { "▏" } else { "" };
            Line::from(vec![
                Span::styled(format!("{label}: "), style),
                Span::raw(format!("{value}{cursor}")),
            ])
        })
        .collect();

    let prompt = Paragraph::new(lines)
        .block(Block::default().title(title.to_string()).borders(Borders::ALL));
    frame.render_widget(prompt, area);
}

fn render_confirm(frame: &mut Frame, action: &PendingAction) {
    let area = centered_rect(50, 20, frame.size());
    frame.render_widget(Clear, area);
    let question = match action {
        PendingAction::RemoveTeam { name, .. } => format!("Ta bort \"{name}\"?"),
        PendingAction::ResetAll => "Nollställ poängen för alla lag?".to_string(),
    };
    let dialog = Paragraph::new(format!("{question}\n\ny Ja   n Nej"))
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().title("Bekräfta").borders(Borders::ALL));
    frame.render_widget(dialog, area);
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 70, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "Timglas - Hjälp",
        "",
        "Välj lag:",
        "  j/k, ←/→, ↑/↓   Nästa / föregående",
        "",
        "Poäng:",
        "  t   +10",
        "  f   +5",
        "  +   +1",
        "  -   -1",
        "  z   Nollställ laget",
        "",
        "Lag:",
        "  r         Byt namn",
        "  c         Nästa färg",
        "  C         Skriv färg (#rrggbb)",
        "  a         Lägg till lag (Tab byter fält)",
        "  x / Del   Ta bort lag",
        "  R         Nollställ alla poäng",
        "",
        "  ?   Hjälp",
        "  q   Avsluta",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Hjälp").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
