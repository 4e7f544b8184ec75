use anyhow::Result;

use crate::persist::{self, LoadOutcome};
use crate::score::{self, Preset};
use crate::state::{
    BoardState, HexColor, NEW_TEAM_COLOR, NEW_TEAM_FALLBACK, RENAME_FALLBACK, Refresh, Team,
    TeamId,
};
use crate::storage::KeyValueStore;

/// Owns the board and the store it is persisted to. Every mutation that
/// changes the board writes the whole document back before returning.
///
/// When a write fails the in-memory board keeps the mutation and the error
/// is returned; the next successful write catches the store up.
#[derive(Debug)]
pub struct Board<S> {
    state: BoardState,
    store: S,
}

impl<S: KeyValueStore> Board<S> {
    /// Load from `store` and recompute the maximum.
    pub fn load(store: S) -> Result<(Self, LoadOutcome)> {
        let (mut state, outcome) = persist::load_state(&store)?;
        state.recalc_max_score();
        Ok((Self { state, store }, outcome))
    }

    pub fn from_parts(mut state: BoardState, store: S) -> Self {
        state.recalc_max_score();
        Self { state, store }
    }

    pub fn state(&self) -> &BoardState {
        &self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn save(&mut self) -> Result<()> {
        persist::save_state(&mut self.store, &self.state)
    }

    /// Add `delta` to a team's score, clamped at zero. Unknown teams and
    /// deltas that leave the score unchanged do nothing, not even a write.
    pub fn apply_delta(&mut self, team_id: &str, delta: i64) -> Result<Refresh> {
        let Some(team) = self.state.teams.get_mut(team_id) else {
            return Ok(Refresh::None);
        };
        let next = score::next_score(team.score, delta);
        if next == team.score {
            return Ok(Refresh::None);
        }
        team.score = next;
        self.state.recalc_max_score();
        self.save()?;
        Ok(Refresh::Scores {
            team_id: team_id.to_string(),
        })
    }

    pub fn apply_preset(&mut self, team_id: &str, preset: Preset) -> Result<Refresh> {
        let Some(current) = self.state.team(team_id).map(|t| t.score) else {
            return Ok(Refresh::None);
        };
        self.apply_delta(team_id, preset.delta(current))
    }

    /// Blank names become the unnamed-team label.
    pub fn rename(&mut self, team_id: &str, name: &str) -> Result<Refresh> {
        let Some(team) = self.state.teams.get_mut(team_id) else {
            return Ok(Refresh::None);
        };
        team.name = match name.trim() {
            "" => RENAME_FALLBACK.to_string(),
            trimmed => trimmed.to_string(),
        };
        self.save()?;
        Ok(Refresh::Card {
            team_id: team_id.to_string(),
        })
    }

    pub fn recolor(&mut self, team_id: &str, color: HexColor) -> Result<Refresh> {
        let Some(team) = self.state.teams.get_mut(team_id) else {
            return Ok(Refresh::None);
        };
        team.color = color.to_string();
        self.save()?;
        Ok(Refresh::Card {
            team_id: team_id.to_string(),
        })
    }

    /// Insert a zero-score team. Returns the new id; the team is in the
    /// board even if the write fails.
    pub fn add_team(
        &mut self,
        name: &str,
        color: Option<HexColor>,
        now_millis: i64,
    ) -> (TeamId, Result<Refresh>) {
        let name = match name.trim() {
            "" => NEW_TEAM_FALLBACK.to_string(),
            trimmed => trimmed.to_string(),
        };
        let color = color
            .map(|c| c.to_string())
            .unwrap_or_else(|| NEW_TEAM_COLOR.to_string());
        let id = self.state.next_team_id(now_millis);

        self.state.teams.insert(
            id.clone(),
            Team {
                id: id.clone(),
                name,
                color,
                score: 0,
            },
        );
        self.state.recalc_max_score();
        let saved = self.save().map(|_| Refresh::Full);
        (id, saved)
    }

    pub fn remove_team(&mut self, team_id: &str) -> Result<Refresh> {
        if self.state.teams.remove(team_id).is_none() {
            return Ok(Refresh::None);
        }
        self.state.recalc_max_score();
        self.save()?;
        Ok(Refresh::Full)
    }

    /// Zero every score; teams, names and colors stay.
    pub fn reset_scores(&mut self) -> Result<Refresh> {
        for team in self.state.teams.values_mut() {
            team.score = 0;
        }
        self.state.recalc_max_score();
        self.save()?;
        Ok(Refresh::Full)
    }
}
