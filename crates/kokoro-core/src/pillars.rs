//! Four-pillar calendar symbols: stems, branches, elements, and affinity.
//!
//! A pillar is one stem (10-cycle) plus one branch (12-cycle). Stems map to
//! one of five elements, two stems per element. Affinity between two elements
//! is a fixed asymmetric table encoding the generative/destructive cycle —
//! it is *not* a symmetric similarity measure.

use serde::{Deserialize, Serialize};

/// The ten heavenly stems, in cycle order (甲 = 0 .. 癸 = 9).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stem {
    Jia,
    Yi,
    Bing,
    Ding,
    Wu,
    Ji,
    Geng,
    Xin,
    Ren,
    Gui,
}

const STEMS: [Stem; 10] = [
    Stem::Jia,
    Stem::Yi,
    Stem::Bing,
    Stem::Ding,
    Stem::Wu,
    Stem::Ji,
    Stem::Geng,
    Stem::Xin,
    Stem::Ren,
    Stem::Gui,
];

const STEM_CHARS: [char; 10] = ['甲', '乙', '丙', '丁', '戊', '己', '庚', '辛', '壬', '癸'];

impl Stem {
    /// Stem at `index mod 10`.
    pub fn from_index(index: i64) -> Self {
        STEMS[index.rem_euclid(10) as usize]
    }

    pub fn index(&self) -> usize {
        STEMS.iter().position(|s| s == self).unwrap_or(0)
    }

    pub fn character(&self) -> char {
        STEM_CHARS[self.index()]
    }

    pub fn from_char(c: char) -> Option<Self> {
        STEM_CHARS.iter().position(|&sc| sc == c).map(|i| STEMS[i])
    }

    /// Every stem maps to exactly one element (two stems per element).
    pub fn element(&self) -> Element {
        match self {
            Stem::Jia | Stem::Yi => Element::Wood,
            Stem::Bing | Stem::Ding => Element::Fire,
            Stem::Wu | Stem::Ji => Element::Earth,
            Stem::Geng | Stem::Xin => Element::Metal,
            Stem::Ren | Stem::Gui => Element::Water,
        }
    }
}

/// The twelve earthly branches, in cycle order (子 = 0 .. 亥 = 11).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Branch {
    Zi,
    Chou,
    Yin,
    Mao,
    Chen,
    Si,
    Wu,
    Wei,
    Shen,
    You,
    Xu,
    Hai,
}

const BRANCHES: [Branch; 12] = [
    Branch::Zi,
    Branch::Chou,
    Branch::Yin,
    Branch::Mao,
    Branch::Chen,
    Branch::Si,
    Branch::Wu,
    Branch::Wei,
    Branch::Shen,
    Branch::You,
    Branch::Xu,
    Branch::Hai,
];

const BRANCH_CHARS: [char; 12] = [
    '子', '丑', '寅', '卯', '辰', '巳', '午', '未', '申', '酉', '戌', '亥',
];

const ZODIAC_ANIMALS: [&str; 12] = [
    "Rat", "Ox", "Tiger", "Rabbit", "Dragon", "Snake", "Horse", "Goat", "Monkey", "Rooster",
    "Dog", "Pig",
];

impl Branch {
    /// Branch at `index mod 12`.
    pub fn from_index(index: i64) -> Self {
        BRANCHES[index.rem_euclid(12) as usize]
    }

    pub fn index(&self) -> usize {
        BRANCHES.iter().position(|b| b == self).unwrap_or(0)
    }

    pub fn character(&self) -> char {
        BRANCH_CHARS[self.index()]
    }

    pub fn from_char(c: char) -> Option<Self> {
        BRANCH_CHARS
            .iter()
            .position(|&bc| bc == c)
            .map(|i| BRANCHES[i])
    }

    /// Zodiac animal for a year ending on this branch.
    pub fn zodiac_animal(&self) -> &'static str {
        ZODIAC_ANIMALS[self.index()]
    }
}

/// The five elements derived from stems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Element {
    Wood,
    Fire,
    Earth,
    Metal,
    Water,
}

impl Element {
    pub fn as_str(&self) -> &'static str {
        match self {
            Element::Wood => "wood",
            Element::Fire => "fire",
            Element::Earth => "earth",
            Element::Metal => "metal",
            Element::Water => "water",
        }
    }

    /// Kanji label for prompt/UI display (木火土金水).
    pub fn kanji(&self) -> char {
        match self {
            Element::Wood => '木',
            Element::Fire => '火',
            Element::Earth => '土',
            Element::Metal => '金',
            Element::Water => '水',
        }
    }

    fn table_index(&self) -> usize {
        match self {
            Element::Wood => 0,
            Element::Fire => 1,
            Element::Earth => 2,
            Element::Metal => 3,
            Element::Water => 4,
        }
    }
}

/// One calendar pillar: stem + branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pillar {
    pub stem: Stem,
    pub branch: Branch,
}

impl Pillar {
    /// Pillar at `index mod 60` of the sexagenary cycle (甲子 = 0).
    pub fn from_cycle_index(index: i64) -> Self {
        Self {
            stem: Stem::from_index(index),
            branch: Branch::from_index(index),
        }
    }

    /// Parses a two-character pillar string (e.g. "庚午"). Returns `None` for
    /// absent, short, or unrecognized input — never an error.
    pub fn parse(text: &str) -> Option<Self> {
        let mut chars = text.chars();
        let stem = Stem::from_char(chars.next()?)?;
        let branch = Branch::from_char(chars.next()?)?;
        Some(Self { stem, branch })
    }

    /// Two-character display form (e.g. "庚午").
    pub fn text(&self) -> String {
        let mut s = String::with_capacity(8);
        s.push(self.stem.character());
        s.push(self.branch.character());
        s
    }

    pub fn element(&self) -> Element {
        self.stem.element()
    }
}

/// The four pillar slots for one moment in time. The hour pillar is present
/// only when the time of day is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FourPillars {
    pub year: Pillar,
    pub month: Pillar,
    pub day: Pillar,
    pub hour: Option<Pillar>,
}

impl FourPillars {
    pub fn zodiac_animal(&self) -> &'static str {
        self.year.branch.zodiac_animal()
    }

    pub fn day_element(&self) -> Option<Element> {
        Some(self.day.element())
    }

    pub fn hour_element(&self) -> Option<Element> {
        self.hour.map(|p| p.element())
    }
}

/// Neutral affinity used when either side has no element.
pub const NEUTRAL_AFFINITY: f64 = 0.5;

// Rows = from, columns = to, order wood/fire/earth/metal/water.
// Generative neighbor 0.9, generated-by 0.8, self 0.7, overcoming 0.3,
// overcome-by 0.2. Asymmetric on purpose (wood→fire 0.9 but fire→wood 0.8).
const AFFINITY: [[f64; 5]; 5] = [
    [0.7, 0.9, 0.3, 0.2, 0.8], // wood
    [0.8, 0.7, 0.9, 0.3, 0.2], // fire
    [0.2, 0.8, 0.7, 0.9, 0.3], // earth
    [0.3, 0.2, 0.8, 0.7, 0.9], // metal
    [0.9, 0.3, 0.2, 0.8, 0.7], // water
];

/// Ordered affinity between two optional elements. Total: any `None` side
/// yields the neutral 0.5.
pub fn element_affinity(from: Option<Element>, to: Option<Element>) -> f64 {
    match (from, to) {
        (Some(a), Some(b)) => AFFINITY[a.table_index()][b.table_index()],
        _ => NEUTRAL_AFFINITY,
    }
}
