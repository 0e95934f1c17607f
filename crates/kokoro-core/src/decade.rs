//! Decade cycle (大運): a coarse ten-year narrative pillar derived from birth
//! year/month and current age. Presentational only — the pillar comes from
//! simple modular arithmetic, not from a precise luni-solar computation.

use serde::{Deserialize, Serialize};

use crate::hints::PhrasePicker;
use crate::pillars::{Branch, Pillar, Stem};

/// One decade-cycle entry: the decade's opening age, its pillar, and a short
/// narrative phrase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecadeCycle {
    /// Current age floored to the decade (0, 10, 20, ...).
    pub age: u32,
    /// Two-character pillar text.
    pub pillar: String,
    pub description: String,
}

// Eight narrative buckets indexed by decade mod 8. Phrases within a bucket
// are interchangeable.
const NARRATIVES: [&[&str]; 8] = [
    &["土台を育てる十年", "基礎を固める時期"],
    &["外へ広がる十年", "行動範囲が開ける時期", "出会いが増える十年"],
    &["実力を試される十年", "挑戦の時期"],
    &["実りを収穫する十年", "積み重ねが形になる時期"],
    &["流れが変わる十年", "転機の時期", "方向転換の十年"],
    &["深めて磨く十年", "専門性が育つ時期"],
    &["人に還す十年", "支える側に回る時期"],
    &["静かに整える十年", "内面が充実する時期"],
];

/// Derives the decade cycle. Pure: identical inputs always give the same
/// pillar and the same narrative bucket (wording floats with the picker).
pub fn compute_decade_cycle(
    birth_month: u32,
    current_age: u32,
    picker: &dyn PhrasePicker,
) -> DecadeCycle {
    let decade = i64::from(current_age / 10);
    let month = i64::from(birth_month);

    let pillar = Pillar {
        stem: Stem::from_index(decade + month),
        branch: Branch::from_index(decade + month),
    };

    let bucket = NARRATIVES[(decade % 8) as usize];
    DecadeCycle {
        age: (current_age / 10) * 10,
        pillar: pillar.text(),
        description: picker.pick(bucket).to_string(),
    }
}
