use std::collections::BTreeMap;

use anyhow::{Context, Result};
use serde::Deserialize;
use thiserror::Error;

use crate::state::{BoardState, NEW_TEAM_COLOR, RENAME_FALLBACK, Team};
use crate::storage::KeyValueStore;

pub const STORAGE_KEY: &str = "klass_timglas_state_v1";

/// Why a stored document was rejected.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("stored state is not valid: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("stored state has no teams")]
    MissingTeams,
}

#[derive(Debug)]
pub enum LoadOutcome {
    /// Nothing stored yet; seeded teams.
    Fresh,
    Restored,
    /// Stored document was discarded and replaced by the seeded teams.
    Recovered(StateError),
}

// Stored shape. `maxScore` is ignored on read and recomputed.
#[derive(Debug, Deserialize)]
struct StoredBoard {
    #[serde(default)]
    teams: Option<BTreeMap<String, StoredTeam>>,
}

// Missing fields take the same fallbacks the editors use; only a wrong type
// rejects the document.
#[derive(Debug, Deserialize)]
struct StoredTeam {
    #[serde(default)]
    id: Option<String>,
    #[serde(default = "default_name")]
    name: String,
    #[serde(default = "default_color")]
    color: String,
    #[serde(default)]
    score: f64,
}

fn default_name() -> String {
    RENAME_FALLBACK.to_string()
}

fn default_color() -> String {
    NEW_TEAM_COLOR.to_string()
}

/// Stored scores may be fractional or negative; keep the whole, non-negative part.
fn stored_score(raw: f64) -> u32 {
    if raw.is_finite() {
        raw.clamp(0.0, f64::from(u32::MAX)).floor() as u32
    } else {
        0
    }
}

/// Parse and validate a stored document. `max_score` is always recomputed.
pub fn parse_state(raw: &str) -> Result<BoardState, StateError> {
    let stored: StoredBoard = serde_json::from_str(raw)?;
    let Some(stored_teams) = stored.teams else {
        return Err(StateError::MissingTeams);
    };

    let mut teams = BTreeMap::new();
    for (key, team) in stored_teams {
        let id = team
            .id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or(key);
        let score = stored_score(team.score);
        teams.insert(
            id.clone(),
            Team {
                id,
                name: team.name,
                color: team.color,
                score,
            },
        );
    }

    let mut state = BoardState {
        teams,
        max_score: 0,
    };
    state.recalc_max_score();
    Ok(state)
}

/// Read the board from `store`. Absent or invalid documents yield the
/// seeded board; only store I/O failures are errors.
pub fn load_state<S: KeyValueStore + ?Sized>(store: &S) -> Result<(BoardState, LoadOutcome)> {
    let raw = store
        .get_item(STORAGE_KEY)
        .context("read stored board")?;
    let Some(raw) = raw else {
        return Ok((BoardState::seeded(), LoadOutcome::Fresh));
    };
    match parse_state(&raw) {
        Ok(state) => Ok((state, LoadOutcome::Restored)),
        Err(err) => Ok((BoardState::seeded(), LoadOutcome::Recovered(err))),
    }
}

pub fn save_state<S: KeyValueStore + ?Sized>(store: &mut S, state: &BoardState) -> Result<()> {
    let json = serde_json::to_string(state).context("serialize board")?;
    store
        .set_item(STORAGE_KEY, &json)
        .context("write stored board")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_stored_score_clamps_to_zero() {
        let raw =
            r##"{"teams":{"a":{"id":"a","name":"A","color":"#000000","score":-4}},"maxScore":50}"##;
        let state = parse_state(raw).expect("valid document");
        assert_eq!(state.teams["a"].score, 0);
    }

    #[test]
    fn map_key_used_when_id_missing() {
        let raw = r##"{"teams":{"k1":{"name":"A","color":"#000000","score":3}}}"##;
        let state = parse_state(raw).expect("valid document");
        assert_eq!(state.teams["k1"].id, "k1");
    }

    #[test]
    fn fractional_score_keeps_whole_part() {
        assert_eq!(stored_score(12.9), 12);
        assert_eq!(stored_score(-0.5), 0);
        assert_eq!(stored_score(f64::NAN), 0);
    }

    #[test]
    fn null_teams_is_missing() {
        let err = parse_state(r#"{"teams":null,"maxScore":50}"#).unwrap_err();
        assert!(matches!(err, StateError::MissingTeams));
    }
}
