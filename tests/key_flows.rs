use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use timglas_terminal::app::App;
use timglas_terminal::board::Board;
use timglas_terminal::state::{AppState, BoardState, Mode, PendingAction};
use timglas_terminal::storage::{KeyValueStore, MemoryStore};

fn seeded_app() -> App<MemoryStore> {
    let mut state = BoardState::seeded();
    for (score, team) in state.teams.values_mut().enumerate() {
        team.score = 10 * (score as u32 + 1);
    }
    state.recalc_max_score();
    App::with_state(Board::from_parts(state, MemoryStore::new()), AppState::default())
}

fn press(app: &mut App<MemoryStore>, code: KeyCode) {
    app.on_key(KeyEvent::new(code, KeyModifiers::NONE));
}

fn type_text(app: &mut App<MemoryStore>, text: &str) {
    for c in text.chars() {
        press(app, KeyCode::Char(c));
    }
}

fn total_score(app: &App<MemoryStore>) -> u32 {
    app.board.state().teams.values().map(|t| t.score).sum()
}

#[test]
fn remove_waits_for_confirmation_and_n_cancels() {
    let mut app = seeded_app();
    let selected = app.state.selected_id().unwrap().to_string();

    press(&mut app, KeyCode::Char('x'));
    assert!(matches!(app.state.mode, Mode::Confirm(PendingAction::RemoveTeam { .. })));
    assert_eq!(app.board.state().teams.len(), 4);

    press(&mut app, KeyCode::Char('n'));
    assert_eq!(app.state.mode, Mode::Normal);
    assert!(app.board.state().team(&selected).is_some());
    assert_eq!(app.board.store().revision(), 0);
}

#[test]
fn remove_confirmed_with_y() {
    let mut app = seeded_app();
    let selected = app.state.selected_id().unwrap().to_string();

    press(&mut app, KeyCode::Delete);
    press(&mut app, KeyCode::Char('y'));
    assert_eq!(app.state.mode, Mode::Normal);
    assert!(app.board.state().team(&selected).is_none());
    assert_eq!(app.board.state().teams.len(), 3);
    assert_eq!(app.state.order.len(), 3);
    assert_eq!(app.board.store().revision(), 1);
}

#[test]
fn reset_all_cancelled_with_esc_keeps_scores() {
    let mut app = seeded_app();
    let before = total_score(&app);

    press(&mut app, KeyCode::Char('R'));
    assert_eq!(app.state.mode, Mode::Confirm(PendingAction::ResetAll));
    press(&mut app, KeyCode::Esc);

    assert_eq!(app.state.mode, Mode::Normal);
    assert_eq!(total_score(&app), before);
    assert_eq!(app.board.store().revision(), 0);
    assert!(!app.should_quit);
}

#[test]
fn reset_all_confirmed_with_enter() {
    let mut app = seeded_app();
    press(&mut app, KeyCode::Char('R'));
    press(&mut app, KeyCode::Enter);

    assert_eq!(total_score(&app), 0);
    assert_eq!(app.board.state().teams.len(), 4);
    assert_eq!(app.board.state().max_score, 50);
    assert_eq!(app.board.store().revision(), 1);
}

#[test]
fn enter_in_name_field_adds_team_with_default_color() {
    let mut app = seeded_app();
    press(&mut app, KeyCode::Char('a'));
    type_text(&mut app, "Lodjuren");
    press(&mut app, KeyCode::Enter);

    assert_eq!(app.state.mode, Mode::Normal);
    assert_eq!(app.board.state().teams.len(), 5);
    let id = app.state.selected_id().unwrap().to_string();
    let team = app.board.state().team(&id).unwrap();
    assert_eq!(team.name, "Lodjuren");
    assert_eq!(team.color, "#f39c12");
    assert_eq!(team.score, 0);
    assert_eq!(app.board.store().revision(), 1);
}

#[test]
fn invalid_add_color_falls_back_with_warning() {
    let mut app = seeded_app();
    press(&mut app, KeyCode::Char('a'));
    type_text(&mut app, "Vargar");
    press(&mut app, KeyCode::Tab);
    for _ in 0.."#f39c12".len() {
        press(&mut app, KeyCode::Backspace);
    }
    type_text(&mut app, "grön");
    press(&mut app, KeyCode::Enter);

    let id = app.state.selected_id().unwrap().to_string();
    let team = app.board.state().team(&id).unwrap();
    assert_eq!(team.name, "Vargar");
    assert_eq!(team.color, "#f39c12");
    assert!(app.state.logs.iter().any(|l| l.starts_with("[WARN]")));
}

#[test]
fn valid_add_color_is_used() {
    let mut app = seeded_app();
    press(&mut app, KeyCode::Char('a'));
    press(&mut app, KeyCode::Tab);
    for _ in 0.."#f39c12".len() {
        press(&mut app, KeyCode::Backspace);
    }
    type_text(&mut app, "#123abc");
    press(&mut app, KeyCode::Tab);
    type_text(&mut app, "Ekorrar");
    press(&mut app, KeyCode::Enter);

    let id = app.state.selected_id().unwrap().to_string();
    let team = app.board.state().team(&id).unwrap();
    assert_eq!(team.name, "Ekorrar");
    assert_eq!(team.color, "#123abc");
}

#[test]
fn escape_abandons_add_team() {
    let mut app = seeded_app();
    press(&mut app, KeyCode::Char('a'));
    type_text(&mut app, "Spöken");
    press(&mut app, KeyCode::Esc);

    assert_eq!(app.state.mode, Mode::Normal);
    assert_eq!(app.board.state().teams.len(), 4);
    assert_eq!(app.board.store().revision(), 0);
}

#[test]
fn preset_keys_change_selected_score() {
    let mut app = seeded_app();
    let id = app.state.selected_id().unwrap().to_string();
    let before = app.board.state().team(&id).unwrap().score;

    press(&mut app, KeyCode::Char('t'));
    press(&mut app, KeyCode::Char('-'));
    assert_eq!(app.board.state().team(&id).unwrap().score, before + 9);

    press(&mut app, KeyCode::Char('z'));
    assert_eq!(app.board.state().team(&id).unwrap().score, 0);
    assert_eq!(app.board.store().revision(), 3);
}

#[test]
fn help_overlay_swallows_next_key() {
    let mut app = seeded_app();
    press(&mut app, KeyCode::Char('?'));
    assert!(app.state.help_overlay);

    press(&mut app, KeyCode::Char('q'));
    assert!(!app.state.help_overlay);
    assert!(!app.should_quit);

    press(&mut app, KeyCode::Char('q'));
    assert!(app.should_quit);
}
