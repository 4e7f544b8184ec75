use std::cmp::Ordering;

use timglas_terminal::collate::compare_sv;
use timglas_terminal::state::{BoardState, Team};

fn sorted(names: &[&str]) -> Vec<String> {
    let mut names: Vec<String> = names.iter().map(|n| n.to_string()).collect();
    names.sort_by(|a, b| compare_sv(a, b));
    names
}

#[test]
fn swedish_letters_follow_z() {
    assert_eq!(compare_sv("Älg", "Zebra"), Ordering::Greater);
    assert_eq!(
        sorted(&["Öland", "Ärla", "Åsa", "Zeta", "Anna"]),
        ["Anna", "Zeta", "Åsa", "Ärla", "Öland"]
    );
}

#[test]
fn case_does_not_split_alphabet() {
    assert_eq!(sorted(&["beta", "Alfa", "Cesar"]), ["Alfa", "beta", "Cesar"]);
}

#[test]
fn variant_letters_sort_with_swedish_equivalents() {
    assert_eq!(compare_sv("Ærø", "Ära"), Ordering::Greater);
    assert_eq!(compare_sv("Müller", "Myller"), Ordering::Greater);
    assert_eq!(compare_sv("Müller", "Mz"), Ordering::Less);
    assert_eq!(compare_sv("Øst", "Öst"), Ordering::Greater);
}

#[test]
fn digits_sort_before_letters_char_by_char() {
    assert_eq!(
        sorted(&["Lag 2", "Lag 10", "Lag 1", "Laget"]),
        ["Lag 1", "Lag 10", "Lag 2", "Laget"]
    );
}

#[test]
fn foreign_letters_sort_with_their_base_letter() {
    assert_eq!(compare_sv("Łukasz", "Öberg"), Ordering::Less);
    assert_eq!(compare_sv("Łukasz", "Lund"), Ordering::Less);
    assert_eq!(compare_sv("Świątek", "Tor"), Ordering::Less);
    assert_eq!(compare_sv("Đorđe", "Erik"), Ordering::Less);
    assert_eq!(compare_sv("Ńina", "Nova"), Ordering::Less);
    assert_eq!(compare_sv("Strauß", "Strausz"), Ordering::Less);
    assert_eq!(
        sorted(&["Żaneta", "Ćwik", "Öst", "Ąnka", "Zorro"]),
        ["Ąnka", "Ćwik", "Żaneta", "Zorro", "Öst"]
    );
}

#[test]
fn swedish_variant_letters_from_other_alphabets() {
    assert_eq!(compare_sv("Œuvre", "Zebra"), Ordering::Greater);
    assert_eq!(compare_sv("Erdős", "Erdz"), Ordering::Greater);
    assert_eq!(compare_sv("Szűcs", "Szyd"), Ordering::Less);
}

#[test]
fn decomposed_accents_sort_like_composed_ones() {
    assert_eq!(compare_sv("Re\u{301}ne", "Renf"), Ordering::Less);
    assert_eq!(compare_sv("O\u{308}rnar", "Zebror"), Ordering::Greater);
    assert_eq!(compare_sv("A\u{30a}sa", "Ärla"), Ordering::Less);
}

#[test]
fn unicode_punctuation_sorts_before_letters() {
    assert_eq!(compare_sv("«Ugglor»", "Anna"), Ordering::Less);
    assert_eq!(compare_sv("–Lag", "1 Lag"), Ordering::Less);
    assert_eq!(compare_sv("★Stjärnor", "Anna"), Ordering::Less);
}

#[test]
fn board_order_is_by_name_then_id() {
    let mut state = BoardState::empty();
    for (id, name) in [("z1", "Ödlor"), ("a9", "Björnar"), ("b2", "Älgar"), ("a1", "Björnar")] {
        state.teams.insert(
            id.to_string(),
            Team {
                id: id.to_string(),
                name: name.to_string(),
                color: "#000000".to_string(),
                score: 0,
            },
        );
    }
    assert_eq!(state.sorted_ids(), ["a1", "a9", "b2", "z1"]);
}
