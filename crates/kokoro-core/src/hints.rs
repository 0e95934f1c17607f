//! Today hints: color, lucky number, compass direction, and a relational-
//! distance phrase, derived from the day's element and the averaged scores.
//!
//! Literal wording is picked from small phrase lists through a `PhrasePicker`
//! so production stays varied while tests inject a deterministic picker. The
//! semantic bucket (tier, band, base direction) is always reproducible from
//! the numeric inputs; only the wording floats.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::biorhythm::Biorhythm;
use crate::pillars::{Branch, Element};

/// Selection seam for phrase lists. Production uses `RandomPicker`; tests use
/// `FirstPicker` to pin wording.
pub trait PhrasePicker {
    fn pick<'a>(&self, phrases: &'a [&'a str]) -> &'a str;
}

/// Uniform random selection (unseeded by design; buckets stay deterministic).
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomPicker;

impl PhrasePicker for RandomPicker {
    fn pick<'a>(&self, phrases: &'a [&'a str]) -> &'a str {
        if phrases.is_empty() {
            return "";
        }
        phrases[rand::thread_rng().gen_range(0..phrases.len())]
    }
}

/// Always the first phrase. Test fixture.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstPicker;

impl PhrasePicker for FirstPicker {
    fn pick<'a>(&self, phrases: &'a [&'a str]) -> &'a str {
        phrases.first().copied().unwrap_or("")
    }
}

/// Brightness tier for the color hint, keyed by the biorhythm average.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorTier {
    Bright,
    Mid,
    Dark,
}

impl ColorTier {
    fn from_bio_avg(avg: f64) -> Self {
        if avg > 40.0 {
            ColorTier::Bright
        } else if avg < -40.0 {
            ColorTier::Dark
        } else {
            ColorTier::Mid
        }
    }
}

/// Eight compass points plus center.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    North,
    Northeast,
    East,
    Southeast,
    South,
    Southwest,
    West,
    Northwest,
    Center,
}

impl Direction {
    pub fn label(&self) -> &'static str {
        match self {
            Direction::North => "北",
            Direction::Northeast => "北東",
            Direction::East => "東",
            Direction::Southeast => "南東",
            Direction::South => "南",
            Direction::Southwest => "南西",
            Direction::West => "西",
            Direction::Northwest => "北西",
            Direction::Center => "中央",
        }
    }
}

/// Color hint: a named shade plus fixed display classes for the UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorHint {
    pub name: String,
    pub tier: ColorTier,
    pub bg_class: String,
    pub text_class: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberHint {
    pub value: u8,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectionHint {
    pub compass: Direction,
    pub label: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistanceHint {
    pub phrase: String,
    pub message: String,
}

/// The four presentational hints for today.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodayHints {
    pub color: ColorHint,
    pub number: NumberHint,
    pub direction: DirectionHint,
    pub distance: DistanceHint,
}

// Color shade names per element and tier. Near-synonymous within a tier; the
// pick is cosmetic.
fn color_shades(element: Element, tier: ColorTier) -> &'static [&'static str] {
    match (element, tier) {
        (Element::Wood, ColorTier::Bright) => &["若葉色", "新緑グリーン", "エメラルド", "ライム"],
        (Element::Wood, ColorTier::Mid) => &["緑", "モスグリーン", "オリーブ"],
        (Element::Wood, ColorTier::Dark) => &["深緑", "フォレストグリーン", "松葉色"],
        (Element::Fire, ColorTier::Bright) => &["朱色", "コーラルレッド", "サンセットオレンジ"],
        (Element::Fire, ColorTier::Mid) => &["赤", "レンガ色", "ワインレッド", "茜色"],
        (Element::Fire, ColorTier::Dark) => &["深紅", "ボルドー", "えんじ色"],
        (Element::Earth, ColorTier::Bright) => &["山吹色", "ハニーイエロー", "マリーゴールド"],
        (Element::Earth, ColorTier::Mid) => &["黄土色", "キャメル", "ベージュ", "琥珀色"],
        (Element::Earth, ColorTier::Dark) => &["焦茶", "チョコレート", "セピア"],
        (Element::Metal, ColorTier::Bright) => &["白銀", "パールホワイト", "プラチナ"],
        (Element::Metal, ColorTier::Mid) => &["シルバーグレー", "アイボリー", "白"],
        (Element::Metal, ColorTier::Dark) => &["チャコールグレー", "鈍色", "スレート"],
        (Element::Water, ColorTier::Bright) => &["空色", "アクアブルー", "ターコイズ"],
        (Element::Water, ColorTier::Mid) => &["青", "藍色", "マリンブルー", "瑠璃色"],
        (Element::Water, ColorTier::Dark) => &["紺", "ミッドナイトブルー", "濃藍"],
    }
}

// Display classes are keyed by element only, never by tier.
fn color_classes(element: Element) -> (&'static str, &'static str) {
    match element {
        Element::Wood => ("bg-green-500", "text-green-50"),
        Element::Fire => ("bg-red-500", "text-red-50"),
        Element::Earth => ("bg-amber-500", "text-amber-50"),
        Element::Metal => ("bg-slate-400", "text-slate-900"),
        Element::Water => ("bg-blue-500", "text-blue-50"),
    }
}

const COLOR_TEMPLATES: [&str; 3] = [
    "今日のラッキーカラーは{}。身につけると流れが整います。",
    "{}があなたの今日を支える色です。",
    "迷ったら{}を選んでみてください。",
];

const NUMBER_TEMPLATES: [&str; 3] = [
    "今日のラッキーナンバーは{}です。",
    "{}という数字が今日の鍵になります。",
    "選択に迷ったら{}を目印に。",
];

const DIRECTION_TEMPLATES: [&str; 3] = [
    "今日の吉方位は{}です。",
    "{}の方角に良い流れがあります。",
    "出かけるなら{}方面がおすすめです。",
];

const DISTANCE_TEMPLATES: [&str; 2] = [
    "今日の人との距離感：{}",
    "対人運のヒント：{}",
];

// Branch index folds into 1–9; collisions past 申 are intentional.
fn branch_digit(branch: Branch) -> u8 {
    (branch.index() % 9) as u8 + 1
}

// Largest-magnitude axis decides the nudge; ties resolve p, then e, then i.
fn dominant_axis(bio: &Biorhythm) -> i32 {
    let mut best = bio.p;
    for v in [bio.e, bio.i] {
        if v.abs() > best.abs() {
            best = v;
        }
    }
    best
}

fn lucky_number(branch: Branch, bio: &Biorhythm) -> u8 {
    let base = branch_digit(branch);
    let dominant = dominant_axis(bio);
    let shifted = i16::from(base)
        + if dominant > 0 {
            1
        } else if dominant < 0 {
            -1
        } else {
            0
        };
    // Wrap into [1, 9]: 9+1 -> 1, 1-1 -> 9.
    ((shifted - 1).rem_euclid(9) + 1) as u8
}

fn base_direction(element: Option<Element>) -> Direction {
    match element {
        Some(Element::Wood) | None => Direction::East,
        Some(Element::Fire) => Direction::South,
        Some(Element::Earth) => Direction::Center,
        Some(Element::Metal) => Direction::West,
        Some(Element::Water) => Direction::North,
    }
}

// One nudge rule per base direction; Center has no adjacent intercardinal
// and stays fixed.
fn nudge_direction(base: Direction, bio: &Biorhythm) -> Direction {
    match base {
        Direction::East if bio.i > 30 => Direction::Southeast,
        Direction::South if bio.p > 30 => Direction::Southwest,
        Direction::West if bio.e < -30 => Direction::Northwest,
        Direction::North if bio.e > 30 => Direction::Northeast,
        other => other,
    }
}

fn distance_phrases(theme_avg: f64) -> &'static [&'static str] {
    if theme_avg >= 75.0 {
        &["大切な人とぐっと近くに", "積極的に会いに行って吉", "距離を縮める絶好の日"]
    } else if theme_avg >= 55.0 {
        &["いつもより一歩近づいて", "誘いには乗ってみて", "軽い声かけが実る日"]
    } else if theme_avg >= 40.0 {
        &["普段どおりの距離感で", "無理せず自然体で", "流れに任せて"]
    } else if theme_avg >= 25.0 {
        &["少し距離を置いて観察を", "聞き役に回ると安全", "約束は最小限に"]
    } else {
        &["今日はひとりの時間を大切に", "休息と内省にあてて", "静かに充電する日"]
    }
}

/// Derives the four hints. Elementless days fall back to Water for color and
/// East for direction; every output bucket is a pure function of the inputs.
pub fn compute_today_hints(
    today_element: Option<Element>,
    day_branch: Branch,
    biorhythm: &Biorhythm,
    theme_avg: f64,
    picker: &dyn PhrasePicker,
) -> TodayHints {
    let color_element = today_element.unwrap_or(Element::Water);
    let tier = ColorTier::from_bio_avg(biorhythm.average());
    let shade = picker.pick(color_shades(color_element, tier));
    let (bg_class, text_class) = color_classes(color_element);
    let color = ColorHint {
        name: shade.to_string(),
        tier,
        bg_class: bg_class.to_string(),
        text_class: text_class.to_string(),
        message: picker.pick(&COLOR_TEMPLATES).replace("{}", shade),
    };

    let value = lucky_number(day_branch, biorhythm);
    let number = NumberHint {
        value,
        message: picker
            .pick(&NUMBER_TEMPLATES)
            .replace("{}", &value.to_string()),
    };

    let compass = nudge_direction(base_direction(today_element), biorhythm);
    let direction = DirectionHint {
        compass,
        label: compass.label().to_string(),
        message: picker
            .pick(&DIRECTION_TEMPLATES)
            .replace("{}", compass.label()),
    };

    let phrase = picker.pick(distance_phrases(theme_avg));
    let distance = DistanceHint {
        phrase: phrase.to_string(),
        message: picker.pick(&DISTANCE_TEMPLATES).replace("{}", phrase),
    };

    TodayHints {
        color,
        number,
        direction,
        distance,
    }
}
