//! kokoro-core: spiritual diary core library.
//!
//! The deterministic feature pipeline — four-pillar calendar symbols,
//! biorhythm, theme scores, today hints, decade cycle — plus the calendar
//! adapter contract, prompt template, and service config. Everything is pure
//! given its inputs; the gateway owns the clock and the LLM call.

mod biorhythm;
mod calendar;
mod config;
mod decade;
mod hints;
mod pillars;
mod reading;
pub mod prompt;
mod themes;

pub use biorhythm::{compute_biorhythm, Biorhythm};
pub use calendar::{CalendarAdapter, SexagenaryCalendar};
pub use config::CoreConfig;
pub use decade::{compute_decade_cycle, DecadeCycle};
pub use hints::{
    compute_today_hints, ColorHint, ColorTier, Direction, DirectionHint, DistanceHint, FirstPicker,
    NumberHint, PhrasePicker, RandomPicker, TodayHints,
};
pub use pillars::{element_affinity, Branch, Element, FourPillars, Pillar, Stem};
pub use reading::{
    analyze, EntryKind, JournalEntry, PillarSet, Reading, ReadingError, UserProfile,
};
pub use themes::{compute_theme_scores, MoodBucket, ThemeScores};
