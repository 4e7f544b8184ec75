use std::collections::{BTreeMap, HashMap, VecDeque};
use std::fmt;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::collate;
use crate::score::{self, SCORE_FLOOR};

pub type TeamId = String;

pub const RENAME_FALLBACK: &str = "Namnlöst lag";
pub const NEW_TEAM_FALLBACK: &str = "Nytt lag";
pub const NEW_TEAM_COLOR: &str = "#f39c12";
pub const NEW_TEAM_ID_PREFIX: &str = "team_";

/// Colors offered when cycling a card's color with a single key.
pub const PALETTE: [&str; 8] = [
    "#e74c3c", "#3498db", "#f1c40f", "#2ecc71", "#f39c12", "#9b59b6", "#1abc9c", "#e67e22",
];

const SEED_TEAMS: [(&str, &str, &str); 4] = [
    ("house1", "Lag 1", "#e74c3c"),
    ("house2", "Lag 2", "#3498db"),
    ("house3", "Lag 3", "#f1c40f"),
    ("house4", "Lag 4", "#2ecc71"),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub color: String,
    pub score: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardState {
    pub teams: BTreeMap<TeamId, Team>,
    #[serde(rename = "maxScore")]
    pub max_score: u32,
}

impl Default for BoardState {
    fn default() -> Self {
        Self::seeded()
    }
}

impl BoardState {
    pub fn empty() -> Self {
        Self {
            teams: BTreeMap::new(),
            max_score: SCORE_FLOOR,
        }
    }

    /// The four starter teams, all at zero.
    pub fn seeded() -> Self {
        let teams = SEED_TEAMS
            .iter()
            .map(|(id, name, color)| {
                (
                    id.to_string(),
                    Team {
                        id: id.to_string(),
                        name: name.to_string(),
                        color: color.to_string(),
                        score: 0,
                    },
                )
            })
            .collect();
        Self {
            teams,
            max_score: SCORE_FLOOR,
        }
    }

    pub fn recalc_max_score(&mut self) {
        self.max_score = score::display_max(self.teams.values().map(|t| t.score));
    }

    pub fn team(&self, id: &str) -> Option<&Team> {
        self.teams.get(id)
    }

    /// Teams in display order (Swedish name collation).
    pub fn sorted_teams(&self) -> Vec<&Team> {
        let mut teams: Vec<&Team> = self.teams.values().collect();
        teams.sort_by(|a, b| collate::compare_sv(&a.name, &b.name).then_with(|| a.id.cmp(&b.id)));
        teams
    }

    pub fn sorted_ids(&self) -> Vec<TeamId> {
        self.sorted_teams().into_iter().map(|t| t.id.clone()).collect()
    }

    pub fn fill_percent(&self, id: &str) -> Option<f64> {
        self.teams
            .get(id)
            .map(|t| score::fill_percent(t.score, self.max_score))
    }

    /// `team_<millis>`, suffixed with `_N` when that id is already taken.
    pub fn next_team_id(&self, millis: i64) -> TeamId {
        let base = format!("{NEW_TEAM_ID_PREFIX}{millis}");
        if !self.teams.contains_key(&base) {
            return base;
        }
        let mut n = 1u32;
        loop {
            let candidate = format!("{base}_{n}");
            if !self.teams.contains_key(&candidate) {
                return candidate;
            }
            n += 1;
        }
    }
}

/// A validated `#rrggbb` color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HexColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl HexColor {
    /// Accepts `#rgb` and `#rrggbb`, with or without the leading `#`.
    pub fn parse(raw: &str) -> Option<Self> {
        let hex = raw.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        match hex.len() {
            3 => {
                let mut parts = hex.chars().map(|c| c.to_digit(16).unwrap_or(0) as u8 * 17);
                Some(Self {
                    r: parts.next()?,
                    g: parts.next()?,
                    b: parts.next()?,
                })
            }
            6 => Some(Self {
                r: u8::from_str_radix(&hex[0..2], 16).ok()?,
                g: u8::from_str_radix(&hex[2..4], 16).ok()?,
                b: u8::from_str_radix(&hex[4..6], 16).ok()?,
            }),
            _ => None,
        }
    }

    /// Linear blend toward `other`; `t = 0` is `self`, `t = 1` is `other`.
    pub fn mix(self, other: HexColor, t: f64) -> HexColor {
        let t = t.clamp(0.0, 1.0);
        let lerp = |a: u8, b: u8| (f64::from(a) + (f64::from(b) - f64::from(a)) * t).round() as u8;
        HexColor {
            r: lerp(self.r, other.r),
            g: lerp(self.g, other.g),
            b: lerp(self.b, other.b),
        }
    }

    pub const WHITE: HexColor = HexColor {
        r: 0xff,
        g: 0xff,
        b: 0xff,
    };
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// The palette entry after `current`, or the first one if `current` is not in it.
pub fn next_palette_color(current: &str) -> &'static str {
    let pos = PALETTE
        .iter()
        .position(|c| c.eq_ignore_ascii_case(current.trim()));
    match pos {
        Some(idx) => PALETTE[(idx + 1) % PALETTE.len()],
        None => PALETTE[0],
    }
}

/// How much of the screen must be rebuilt after a board operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Refresh {
    /// Nothing changed.
    None,
    /// Readout for one team changed; all fill levels may have moved, card order did not.
    Scores { team_id: TeamId },
    /// A card's name or color changed in place.
    Card { team_id: TeamId },
    /// Team set changed: rebuild and re-sort every card.
    Full,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddField {
    Name,
    Color,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingAction {
    RemoveTeam { team_id: TeamId, name: String },
    ResetAll,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Normal,
    EditName { team_id: TeamId, buffer: String },
    EditColor { team_id: TeamId, buffer: String },
    AddTeam {
        name: String,
        color: String,
        field: AddField,
    },
    Confirm(PendingAction),
}

/// View state of the terminal: what is selected, in which order cards are
/// shown, running animations and the console log.
#[derive(Debug, Clone)]
pub struct AppState {
    pub mode: Mode,
    pub selected: usize,
    pub order: Vec<TeamId>,
    pub flows: HashMap<TeamId, Instant>,
    pub flow_duration: Duration,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Duration::from_millis(600))
    }
}

impl AppState {
    pub fn new(flow_duration: Duration) -> Self {
        Self {
            mode: Mode::Normal,
            selected: 0,
            order: Vec::new(),
            flows: HashMap::new(),
            flow_duration,
            logs: VecDeque::with_capacity(200),
            help_overlay: false,
        }
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        const MAX_LOGS: usize = 200;
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    /// Recompute card order from the board. Keeps the same team selected
    /// when it still exists.
    pub fn rebuild_order(&mut self, board: &BoardState) {
        let selected_id = self.selected_id().map(str::to_string);
        self.order = board.sorted_ids();
        self.flows.retain(|id, _| board.teams.contains_key(id));
        self.selected = selected_id
            .and_then(|id| self.order.iter().position(|o| *o == id))
            .unwrap_or_else(|| self.selected.min(self.order.len().saturating_sub(1)));
    }

    pub fn apply_refresh(&mut self, refresh: &Refresh, board: &BoardState, now: Instant) {
        match refresh {
            Refresh::None | Refresh::Card { .. } => {}
            Refresh::Scores { team_id } => self.restart_flow(team_id, now),
            Refresh::Full => self.rebuild_order(board),
        }
    }

    pub fn select_id(&mut self, id: &str) {
        if let Some(pos) = self.order.iter().position(|o| o == id) {
            self.selected = pos;
        }
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.order.get(self.selected).map(String::as_str)
    }

    pub fn select_next(&mut self) {
        let total = self.order.len();
        if total == 0 {
            self.selected = 0;
            return;
        }
        self.selected = (self.selected + 1) % total;
    }

    pub fn select_prev(&mut self) {
        let total = self.order.len();
        if total == 0 {
            self.selected = 0;
            return;
        }
        if self.selected == 0 {
            self.selected = total - 1;
        } else {
            self.selected -= 1;
        }
    }

    /// Start the flow animation for a team, replaying it if it is already running.
    pub fn restart_flow(&mut self, team_id: &str, now: Instant) {
        self.flows.remove(team_id);
        self.flows.insert(team_id.to_string(), now);
    }

    /// Progress of a running flow animation in `[0, 1)`, or `None` when idle.
    pub fn flow_progress(&self, team_id: &str, now: Instant) -> Option<f64> {
        let started = self.flows.get(team_id)?;
        let elapsed = now.saturating_duration_since(*started);
        if elapsed >= self.flow_duration || self.flow_duration.is_zero() {
            return None;
        }
        Some(elapsed.as_secs_f64() / self.flow_duration.as_secs_f64())
    }

    pub fn expire_flows(&mut self, now: Instant) {
        let duration = self.flow_duration;
        self.flows
            .retain(|_, started| now.saturating_duration_since(*started) < duration);
    }
}
