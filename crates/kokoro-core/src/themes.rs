//! Theme scores: four bounded 0–100 ratings (love, money, work, health)
//! blended from day-pillar affinity, one biorhythm axis, the mood bonus, and
//! an optional hour-pillar adjustment.
//!
//! The weights are heuristic policy, not astrology: 40% affinity, 30% axis,
//! 30% mood, plus a flat +0.25 so a fully neutral day lands in the 50s.
//! Clamping (never renormalization) resolves overflow.

use serde::{Deserialize, Serialize};

use crate::biorhythm::Biorhythm;
use crate::pillars::{element_affinity, FourPillars};

const AFFINITY_WEIGHT: f64 = 0.4;
const BIORHYTHM_WEIGHT: f64 = 0.3;
const MOOD_WEIGHT: f64 = 0.3;
const HOUR_SPREAD: f64 = 0.2;
const RECENTER: f64 = 0.25;

/// Mood buckets with their signed bonus weights. Unrecognized tokens are
/// always `Neutral` — classification never fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoodBucket {
    Joy,
    Calm,
    Energy,
    Tired,
    Anxious,
    Sad,
    Angry,
    Neutral,
}

impl MoodBucket {
    pub fn bonus(&self) -> f64 {
        match self {
            MoodBucket::Joy => 0.20,
            MoodBucket::Calm => 0.12,
            MoodBucket::Energy => 0.08,
            MoodBucket::Tired => -0.05,
            MoodBucket::Anxious => -0.12,
            MoodBucket::Sad => -0.18,
            MoodBucket::Angry => -0.15,
            MoodBucket::Neutral => 0.0,
        }
    }

    /// Classifies a mood token: the diary's emoji palette plus a few plain
    /// word aliases. Anything else is neutral.
    pub fn classify(token: &str) -> Self {
        match token.trim() {
            "😊" | "😆" | "✨" | "🌈" | "happy" | "joy" | "嬉しい" | "楽しい" => MoodBucket::Joy,
            "😌" | "🤔" | "calm" | "hope" | "穏やか" => MoodBucket::Calm,
            "💪" | "energetic" | "元気" => MoodBucket::Energy,
            "😴" | "💤" | "😓" | "tired" | "疲れた" => MoodBucket::Tired,
            "😰" | "🥺" | "anxious" | "不安" => MoodBucket::Anxious,
            "😢" | "sad" | "悲しい" => MoodBucket::Sad,
            "😡" | "😤" | "angry" | "怒り" => MoodBucket::Angry,
            _ => MoodBucket::Neutral,
        }
    }
}

/// The four theme scores, each an integer in [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeScores {
    pub love: u8,
    pub money: u8,
    pub work: u8,
    pub health: u8,
}

impl ThemeScores {
    pub fn average(&self) -> f64 {
        f64::from(u16::from(self.love) + u16::from(self.money) + u16::from(self.work) + u16::from(self.health))
            / 4.0
    }
}

fn blend(affinity: f64, axis: f64, mood_bonus: f64, hour_bonus: f64) -> u8 {
    let raw = affinity * AFFINITY_WEIGHT
        + (axis / 100.0) * BIORHYTHM_WEIGHT
        + mood_bonus * MOOD_WEIGHT
        + hour_bonus
        + RECENTER;
    (raw.clamp(0.0, 1.0) * 100.0).round() as u8
}

/// Computes the four theme scores. Total: unknown elements degrade to the
/// neutral affinity, a missing hour pillar on either side zeroes the hour
/// bonus, and an unrecognized mood token is neutral.
pub fn compute_theme_scores(
    birth: &FourPillars,
    today: &FourPillars,
    biorhythm: &Biorhythm,
    mood_token: &str,
) -> ThemeScores {
    let base = element_affinity(birth.day_element(), today.day_element());
    let mood_bonus = MoodBucket::classify(mood_token).bonus();

    let hour_bonus = match (birth.hour, today.hour) {
        (Some(bh), Some(th)) => {
            (element_affinity(Some(bh.element()), Some(th.element())) - 0.5) * HOUR_SPREAD
        }
        _ => 0.0,
    };

    let p = f64::from(biorhythm.p);
    let e = f64::from(biorhythm.e);
    let i = f64::from(biorhythm.i);

    ThemeScores {
        love: blend(base, e, mood_bonus, hour_bonus),
        money: blend(base, i, mood_bonus, hour_bonus),
        work: blend(base, (p + i) / 2.0, mood_bonus, hour_bonus),
        health: blend(base, p, mood_bonus, hour_bonus),
    }
}
