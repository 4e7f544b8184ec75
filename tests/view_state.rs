use std::time::{Duration, Instant};

use timglas_terminal::state::{AppState, BoardState, Refresh, Team};

fn board(names: &[(&str, &str)]) -> BoardState {
    let mut state = BoardState::empty();
    for (id, name) in names {
        state.teams.insert(
            id.to_string(),
            Team {
                id: id.to_string(),
                name: name.to_string(),
                color: "#2ecc71".to_string(),
                score: 0,
            },
        );
    }
    state.recalc_max_score();
    state
}

#[test]
fn rebuild_keeps_selected_team() {
    let mut b = board(&[("x", "Beta"), ("y", "Gamma")]);
    let mut view = AppState::default();
    view.rebuild_order(&b);
    view.select_id("y");
    assert_eq!(view.selected_id(), Some("y"));

    b.teams.insert(
        "w".to_string(),
        Team {
            id: "w".to_string(),
            name: "Alfa".to_string(),
            color: "#000000".to_string(),
            score: 0,
        },
    );
    view.apply_refresh(&Refresh::Full, &b, Instant::now());
    assert_eq!(view.order, ["w", "x", "y"]);
    assert_eq!(view.selected_id(), Some("y"));
}

#[test]
fn rebuild_clamps_selection_after_removal() {
    let mut b = board(&[("x", "Alfa"), ("y", "Beta")]);
    let mut view = AppState::default();
    view.rebuild_order(&b);
    view.select_id("y");
    b.teams.remove("y");
    view.rebuild_order(&b);
    assert_eq!(view.selected_id(), Some("x"));

    b.teams.clear();
    view.rebuild_order(&b);
    assert_eq!(view.selected_id(), None);
    view.select_next();
    view.select_prev();
    assert_eq!(view.selected, 0);
}

#[test]
fn score_refresh_does_not_reorder() {
    let b = board(&[("x", "Beta"), ("y", "Alfa")]);
    let mut view = AppState::default();
    view.rebuild_order(&b);
    let before = view.order.clone();
    view.apply_refresh(
        &Refresh::Scores {
            team_id: "x".to_string(),
        },
        &b,
        Instant::now(),
    );
    assert_eq!(view.order, before);
}

#[test]
fn selection_wraps() {
    let b = board(&[("x", "A"), ("y", "B"), ("z", "C")]);
    let mut view = AppState::default();
    view.rebuild_order(&b);
    view.select_prev();
    assert_eq!(view.selected_id(), Some("z"));
    view.select_next();
    assert_eq!(view.selected_id(), Some("x"));
}

#[test]
fn flow_restarts_and_expires() {
    let mut view = AppState::new(Duration::from_millis(600));
    let t0 = Instant::now();
    assert_eq!(view.flow_progress("x", t0), None);

    view.apply_refresh(
        &Refresh::Scores {
            team_id: "x".to_string(),
        },
        &BoardState::empty(),
        t0,
    );
    assert_eq!(view.flow_progress("x", t0), Some(0.0));
    let mid = view.flow_progress("x", t0 + Duration::from_millis(300)).unwrap();
    assert!((mid - 0.5).abs() < 1e-9);

    // A second change mid-animation replays it from the start.
    let t1 = t0 + Duration::from_millis(500);
    view.restart_flow("x", t1);
    assert_eq!(view.flow_progress("x", t1), Some(0.0));
    assert!(view.flow_progress("x", t1 + Duration::from_millis(200)).is_some());

    view.expire_flows(t1 + Duration::from_millis(600));
    assert!(view.flows.is_empty());
}

#[test]
fn console_log_is_bounded() {
    let mut view = AppState::default();
    for i in 0..250 {
        view.push_log(format!("[INFO] line {i}"));
    }
    assert_eq!(view.logs.len(), 200);
    assert_eq!(view.logs.front().map(String::as_str), Some("[INFO] line 50"));
}
