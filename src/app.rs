//! Key handling for the scoreboard: one `App` owning the board and the view.

use std::time::Instant;

use anyhow::Result;
use chrono::Utc;
use crossterm::event::{KeyCode, KeyEvent};

use crate::board::Board;
use crate::config::Config;
use crate::persist::LoadOutcome;
use crate::score::Preset;
use crate::state::{
    AddField, AppState, BoardState, HexColor, Mode, NEW_TEAM_COLOR, PendingAction, Refresh,
    Team, next_palette_color,
};
use crate::storage::{KeyValueStore, MemoryStore};

pub type DynStore = Box<dyn KeyValueStore>;

pub struct App<S> {
    pub board: Board<S>,
    pub state: AppState,
    pub should_quit: bool,
}

impl App<DynStore> {
    /// Opens the configured store, falling back to memory when it cannot be used.
    pub fn open(config: &Config) -> Self {
        let mut state = AppState::new(config.flow_duration);
        let store = match config.open_store() {
            Ok(store) => store,
            Err(err) => {
                state.push_log(format!("[WARN] Store unavailable, using memory: {err:#}"));
                Box::new(MemoryStore::new()) as DynStore
            }
        };
        let location = store.describe();

        let board = match Board::load(store) {
            Ok((board, outcome)) => {
                match outcome {
                    LoadOutcome::Fresh => {
                        state.push_log(format!("[INFO] New board in {location}"));
                    }
                    LoadOutcome::Restored => {
                        state.push_log(format!("[INFO] Board restored from {location}"));
                    }
                    LoadOutcome::Recovered(err) => {
                        state.push_log(format!("[WARN] Could not read board, resetting: {err}"));
                    }
                }
                board
            }
            Err(err) => {
                state.push_log(format!("[WARN] Board read failed, using memory: {err:#}"));
                Board::from_parts(BoardState::seeded(), Box::new(MemoryStore::new()) as DynStore)
            }
        };

        Self::with_state(board, state)
    }
}

impl<S: KeyValueStore> App<S> {
    pub fn with_state(board: Board<S>, mut state: AppState) -> Self {
        state.rebuild_order(board.state());
        Self {
            board,
            state,
            should_quit: false,
        }
    }

    pub fn on_key(&mut self, key: KeyEvent) {
        if self.state.help_overlay {
            self.state.help_overlay = false;
            return;
        }
        match self.state.mode.clone() {
            Mode::Normal => self.on_key_normal(key),
            Mode::EditName { team_id, mut buffer } => match key.code {
                KeyCode::Esc => self.state.mode = Mode::Normal,
                KeyCode::Enter => {
                    self.state.mode = Mode::Normal;
                    let result = self.board.rename(&team_id, &buffer);
                    self.finish(result);
                }
                code => {
                    if edit_buffer(&mut buffer, code) {
                        self.state.mode = Mode::EditName { team_id, buffer };
                    }
                }
            },
            Mode::EditColor { team_id, mut buffer } => match key.code {
                KeyCode::Esc => self.state.mode = Mode::Normal,
                KeyCode::Enter => {
                    self.state.mode = Mode::Normal;
                    match HexColor::parse(&buffer) {
                        Some(color) => {
                            let result = self.board.recolor(&team_id, color);
                            self.finish(result);
                        }
                        None => self
                            .state
                            .push_log(format!("[WARN] Not a color: {buffer:?}")),
                    }
                }
                code => {
                    if edit_buffer(&mut buffer, code) {
                        self.state.mode = Mode::EditColor { team_id, buffer };
                    }
                }
            },
            Mode::AddTeam {
                mut name,
                mut color,
                field,
            } => match key.code {
                KeyCode::Esc => self.state.mode = Mode::Normal,
                KeyCode::Tab | KeyCode::BackTab => {
                    let field = match field {
                        AddField::Name => AddField::Color,
                        AddField::Color => AddField::Name,
                    };
                    self.state.mode = Mode::AddTeam { name, color, field };
                }
                KeyCode::Enter => {
                    self.state.mode = Mode::Normal;
                    self.add_team(&name, &color);
                }
                code => {
                    let target = match field {
                        AddField::Name => &mut name,
                        AddField::Color => &mut color,
                    };
                    if edit_buffer(target, code) {
                        self.state.mode = Mode::AddTeam { name, color, field };
                    }
                }
            },
            Mode::Confirm(action) => match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Char('j') | KeyCode::Enter => {
                    self.state.mode = Mode::Normal;
                    self.run_confirmed(action);
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    self.state.mode = Mode::Normal;
                }
                _ => {}
            },
        }
    }

    fn on_key_normal(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('j') | KeyCode::Char('l') | KeyCode::Down | KeyCode::Right => {
                self.state.select_next()
            }
            KeyCode::Char('k') | KeyCode::Char('h') | KeyCode::Up | KeyCode::Left => {
                self.state.select_prev()
            }
            KeyCode::Char('t') => self.press(Preset::PlusTen),
            KeyCode::Char('f') => self.press(Preset::PlusFive),
            KeyCode::Char('+') | KeyCode::Char('=') => self.press(Preset::PlusOne),
            KeyCode::Char('-') => self.press(Preset::MinusOne),
            KeyCode::Char('z') => self.press(Preset::Zero),
            KeyCode::Char('r') => {
                if let Some(team) = self.selected_team() {
                    self.state.mode = Mode::EditName {
                        team_id: team.id.clone(),
                        buffer: team.name.clone(),
                    };
                }
            }
            KeyCode::Char('c') => {
                if let Some(team) = self.selected_team() {
                    let id = team.id.clone();
                    let next = next_palette_color(&team.color);
                    if let Some(color) = HexColor::parse(next) {
                        let result = self.board.recolor(&id, color);
                        self.finish(result);
                    }
                }
            }
            KeyCode::Char('C') => {
                if let Some(team) = self.selected_team() {
                    self.state.mode = Mode::EditColor {
                        team_id: team.id.clone(),
                        buffer: team.color.clone(),
                    };
                }
            }
            KeyCode::Char('a') => {
                self.state.mode = Mode::AddTeam {
                    name: String::new(),
                    color: NEW_TEAM_COLOR.to_string(),
                    field: AddField::Name,
                };
            }
            KeyCode::Char('x') | KeyCode::Delete => {
                if let Some(team) = self.selected_team() {
                    self.state.mode = Mode::Confirm(PendingAction::RemoveTeam {
                        team_id: team.id.clone(),
                        name: team.name.clone(),
                    });
                }
            }
            KeyCode::Char('R') => self.state.mode = Mode::Confirm(PendingAction::ResetAll),
            KeyCode::Char('?') => self.state.help_overlay = true,
            _ => {}
        }
    }

    fn selected_team(&self) -> Option<&Team> {
        let id = self.state.selected_id()?;
        self.board.state().team(id)
    }

    fn press(&mut self, preset: Preset) {
        let Some(id) = self.state.selected_id().map(str::to_string) else {
            return;
        };
        let result = self.board.apply_preset(&id, preset);
        self.finish(result);
    }

    fn add_team(&mut self, name: &str, color: &str) {
        let parsed = match color.trim() {
            "" => None,
            raw => {
                let parsed = HexColor::parse(raw);
                if parsed.is_none() {
                    self.state
                        .push_log(format!("[WARN] Not a color: {raw:?}, using {NEW_TEAM_COLOR}"));
                }
                parsed
            }
        };
        let (id, result) = self
            .board
            .add_team(name, parsed, Utc::now().timestamp_millis());
        self.finish(result);
        self.state.select_id(&id);
        if let Some(team) = self.board.state().team(&id) {
            let msg = format!("[INFO] Added {}", team.name);
            self.state.push_log(msg);
        }
    }

    fn run_confirmed(&mut self, action: PendingAction) {
        match action {
            PendingAction::RemoveTeam { team_id, name } => {
                let result = self.board.remove_team(&team_id);
                self.finish(result);
                self.state.push_log(format!("[INFO] Removed {name}"));
            }
            PendingAction::ResetAll => {
                let result = self.board.reset_scores();
                self.finish(result);
                self.state.push_log("[INFO] All scores reset");
            }
        }
    }

    fn finish(&mut self, result: Result<Refresh>) {
        match result {
            Ok(refresh) => {
                self.state
                    .apply_refresh(&refresh, self.board.state(), Instant::now());
            }
            Err(err) => {
                self.state.push_log(format!("[ERROR] Save failed: {err:#}"));
                self.state.rebuild_order(self.board.state());
            }
        }
    }
}

/// Applies a text-editing key to `buffer`. Returns false for keys it ignores.
fn edit_buffer(buffer: &mut String, code: KeyCode) -> bool {
    match code {
        KeyCode::Char(c) => {
            buffer.push(c);
            true
        }
        KeyCode::Backspace => {
            buffer.pop();
            true
        }
        _ => false,
    }
}
