//! Three-wave biorhythm: physical / emotional / intellectual sinusoids over
//! whole days elapsed since birth.
//!
//! The day count uses a euclidean floor on elapsed milliseconds, so a birth
//! date in the future produces a negative count that feeds straight into the
//! sine — mathematically valid, deliberately not special-cased.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

pub const PHYSICAL_PERIOD_DAYS: f64 = 23.0;
pub const EMOTIONAL_PERIOD_DAYS: f64 = 28.0;
pub const INTELLECTUAL_PERIOD_DAYS: f64 = 33.0;

const MS_PER_DAY: i64 = 86_400_000;

/// One biorhythm reading; each axis is an integer in [-100, 100].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Biorhythm {
    /// Physical (23-day wave).
    pub p: i32,
    /// Emotional (28-day wave).
    pub e: i32,
    /// Intellectual (33-day wave).
    pub i: i32,
}

impl Biorhythm {
    pub fn average(&self) -> f64 {
        f64::from(self.p + self.e + self.i) / 3.0
    }
}

fn wave(days: i64, period: f64) -> i32 {
    ((2.0 * PI * days as f64 / period).sin() * 100.0).round() as i32
}

/// Biorhythm for `now`, given the birth instant. Pure and deterministic.
pub fn compute_biorhythm(birth: DateTime<FixedOffset>, now: DateTime<FixedOffset>) -> Biorhythm {
    let days = (now - birth).num_milliseconds().div_euclid(MS_PER_DAY);
    Biorhythm {
        p: wave(days, PHYSICAL_PERIOD_DAYS),
        e: wave(days, EMOTIONAL_PERIOD_DAYS),
        i: wave(days, INTELLECTUAL_PERIOD_DAYS),
    }
}
