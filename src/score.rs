/// The scale never shrinks below this, even when every team is at zero.
pub const SCORE_FLOOR: u32 = 50;

/// Score buttons shown on every card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    PlusTen,
    PlusFive,
    PlusOne,
    MinusOne,
    Zero,
}

impl Preset {
    pub const ALL: [Preset; 5] = [
        Preset::PlusTen,
        Preset::PlusFive,
        Preset::PlusOne,
        Preset::MinusOne,
        Preset::Zero,
    ];

    /// Delta this preset applies to a team currently at `current`.
    ///
    /// "Zero" is expressed as the negation of the current score so it goes
    /// through the same clamping path as every other button.
    pub fn delta(self, current: u32) -> i64 {
        match self {
            Preset::PlusTen => 10,
            Preset::PlusFive => 5,
            Preset::PlusOne => 1,
            Preset::MinusOne => -1,
            Preset::Zero => -i64::from(current),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Preset::PlusTen => "+10",
            Preset::PlusFive => "+5",
            Preset::PlusOne => "+1",
            Preset::MinusOne => "-1",
            Preset::Zero => "0",
        }
    }

    pub fn is_destructive(self) -> bool {
        matches!(self, Preset::MinusOne | Preset::Zero)
    }
}

/// `max(0, current + delta)`, saturating at `u32::MAX`.
pub fn next_score(current: u32, delta: i64) -> u32 {
    let raw = i64::from(current).saturating_add(delta);
    raw.clamp(0, i64::from(u32::MAX)) as u32
}

/// Display maximum for a set of scores: `max(50, highest, 1)`.
pub fn display_max<I>(scores: I) -> u32
where
    I: IntoIterator<Item = u32>,
{
    let highest = scores.into_iter().max().unwrap_or(0);
    SCORE_FLOOR.max(highest).max(1)
}

/// Fill level of a card in percent, always within `[0, 100]`.
pub fn fill_percent(score: u32, max_score: u32) -> f64 {
    let max_score = max_score.max(1);
    let pct = f64::from(score) / f64::from(max_score) * 100.0;
    pct.clamp(0.0, 100.0)
}
