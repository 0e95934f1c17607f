//! Deterministic reading: one injected evaluation instant, one pass through
//! pillars, biorhythm, theme scores, hints, and the decade cycle.
//!
//! All of this is computable without the language model and is what the
//! gateway merges with the generated text. Nothing here touches the clock or
//! retries the adapter — callers supply the instant and the adapter.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::biorhythm::{compute_biorhythm, Biorhythm};
use crate::calendar::CalendarAdapter;
use crate::decade::{compute_decade_cycle, DecadeCycle};
use crate::hints::{compute_today_hints, PhrasePicker, TodayHints};
use crate::themes::{compute_theme_scores, ThemeScores};

/// Birth profile from the inbound request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// "YYYY-MM-DD", required.
    pub birth_date: String,
    /// "HH:MM", optional; anything malformed silently falls back to 12:00.
    #[serde(default)]
    pub birth_time: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub nickname: Option<String>,
}

/// Whether the journal entry describes the day that happened or the day ahead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Past,
    Future,
}

/// One journal entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    pub emoji: String,
    #[serde(default)]
    pub mood: Option<String>,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub event: String,
    #[serde(default)]
    pub intuition: Option<String>,
}

/// One pillar set rendered for the response (two-character strings).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PillarSet {
    pub year: String,
    pub month: String,
    pub day: String,
    /// Absent when the birth time is unknown.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hour: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zodiac: Option<String>,
}

/// The full deterministic reading, independent of the language model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reading {
    pub birth: PillarSet,
    pub today: PillarSet,
    pub biorhythm: Biorhythm,
    pub theme_scores: ThemeScores,
    pub today_hints: TodayHints,
    pub taiun: DecadeCycle,
    /// Explains the 12:00 fallback when the birth time is unknown.
    pub note: String,
}

#[derive(Debug, Error)]
pub enum ReadingError {
    #[error("userProfile.birthDate is not a valid YYYY-MM-DD date: {0}")]
    InvalidBirthDate(String),
}

const NOTE_WITH_TIME: &str = "出生時刻あり（時柱も反映）";
const NOTE_FALLBACK: &str = "出生時刻未入力のため 12:00 で概算（時柱は参考値）";

fn parse_birth_time(raw: Option<&str>) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(raw?.trim(), "%H:%M").ok()
}

/// Computes the whole deterministic reading for one request.
///
/// `now` is the single evaluation instant: pillars, biorhythm, and hints all
/// observe it, so the process clock advancing mid-request cannot skew them.
pub fn analyze(
    profile: &UserProfile,
    entry: &JournalEntry,
    now: DateTime<FixedOffset>,
    adapter: &dyn CalendarAdapter,
    picker: &dyn PhrasePicker,
) -> Result<Reading, ReadingError> {
    let birth_date = NaiveDate::parse_from_str(profile.birth_date.trim(), "%Y-%m-%d")
        .map_err(|_| ReadingError::InvalidBirthDate(profile.birth_date.clone()))?;

    let birth_time = parse_birth_time(profile.birth_time.as_deref());
    let has_birth_time = birth_time.is_some();
    let time_for_calc = birth_time.unwrap_or_else(|| {
        NaiveTime::from_hms_opt(12, 0, 0).expect("noon is a valid time")
    });

    let birth_instant = birth_date
        .and_time(time_for_calc)
        .and_local_timezone(now.timezone())
        .single()
        .unwrap_or_else(|| {
            // Fixed offsets have no DST gaps; this arm is unreachable in
            // practice but keeps the call total.
            now
        });

    let mut birth_pillars = adapter.four_pillars(birth_instant);
    if !has_birth_time {
        birth_pillars.hour = None;
    }
    let today_pillars = adapter.four_pillars(now);

    let biorhythm = compute_biorhythm(birth_instant, now);

    // The palette emoji is the mood token; the free-text mood is only
    // consulted when the emoji is outside the palette.
    let mood_token = if crate::themes::MoodBucket::classify(&entry.emoji)
        == crate::themes::MoodBucket::Neutral
    {
        entry.mood.as_deref().unwrap_or(&entry.emoji)
    } else {
        &entry.emoji
    };
    let theme_scores = compute_theme_scores(&birth_pillars, &today_pillars, &biorhythm, mood_token);

    let today_hints = compute_today_hints(
        today_pillars.day_element(),
        today_pillars.day.branch,
        &biorhythm,
        theme_scores.average(),
        picker,
    );

    let age = current_age(birth_date, now);
    let taiun = compute_decade_cycle(birth_date.month(), age, picker);

    let note = if has_birth_time {
        NOTE_WITH_TIME.to_string()
    } else {
        NOTE_FALLBACK.to_string()
    };

    tracing::debug!(
        target: "kokoro::reading",
        birth_day = %birth_pillars.day.text(),
        today_day = %today_pillars.day.text(),
        "deterministic reading computed"
    );

    Ok(Reading {
        birth: PillarSet {
            year: birth_pillars.year.text(),
            month: birth_pillars.month.text(),
            day: birth_pillars.day.text(),
            hour: birth_pillars.hour.map(|p| p.text()),
            zodiac: Some(birth_pillars.zodiac_animal().to_string()),
        },
        today: PillarSet {
            year: today_pillars.year.text(),
            month: today_pillars.month.text(),
            day: today_pillars.day.text(),
            hour: today_pillars.hour.map(|p| p.text()),
            zodiac: None,
        },
        biorhythm,
        theme_scores,
        today_hints,
        taiun,
        note,
    })
}

fn current_age(birth: NaiveDate, now: DateTime<FixedOffset>) -> u32 {
    let today = now.date_naive();
    let mut age = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    age.max(0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::SexagenaryCalendar;
    use crate::hints::FirstPicker;
    use chrono::TimeZone;

    fn jst() -> FixedOffset {
        FixedOffset::east_opt(9 * 3600).expect("JST offset is valid")
    }

    fn profile(date: &str, time: Option<&str>) -> UserProfile {
        UserProfile {
            birth_date: date.to_string(),
            birth_time: time.map(|t| t.to_string()),
            gender: None,
            nickname: None,
        }
    }

    fn entry(emoji: &str) -> JournalEntry {
        JournalEntry {
            emoji: emoji.to_string(),
            mood: None,
            kind: EntryKind::Past,
            event: "静かな一日だった".to_string(),
            intuition: None,
        }
    }

    #[test]
    fn test_invalid_birth_date_is_an_error() {
        let now = jst().with_ymd_and_hms(2024, 6, 1, 12, 0, 0).single().unwrap();
        let result = analyze(
            &profile("not-a-date", None),
            &entry("😊"),
            now,
            &SexagenaryCalendar,
            &FirstPicker,
        );
        assert!(matches!(result, Err(ReadingError::InvalidBirthDate(_))));
    }

    #[test]
    fn test_missing_birth_time_drops_hour_and_notes_fallback() {
        let now = jst().with_ymd_and_hms(2024, 6, 1, 12, 0, 0).single().unwrap();
        let reading = analyze(
            &profile("1990-05-15", None),
            &entry("😊"),
            now,
            &SexagenaryCalendar,
            &FirstPicker,
        )
        .unwrap();
        assert!(reading.birth.hour.is_none());
        assert!(reading.today.hour.is_some());
        assert!(reading.note.contains("12:00"));
    }

    #[test]
    fn test_malformed_birth_time_falls_back_silently() {
        let now = jst().with_ymd_and_hms(2024, 6, 1, 12, 0, 0).single().unwrap();
        let reading = analyze(
            &profile("1990-05-15", Some("25:99")),
            &entry("😊"),
            now,
            &SexagenaryCalendar,
            &FirstPicker,
        )
        .unwrap();
        assert!(reading.birth.hour.is_none());
        assert!(reading.note.contains("12:00"));
    }

    #[test]
    fn test_birth_time_present_keeps_hour_pillar() {
        let now = jst().with_ymd_and_hms(2024, 6, 1, 12, 0, 0).single().unwrap();
        let reading = analyze(
            &profile("1990-05-15", Some("07:30")),
            &entry("😊"),
            now,
            &SexagenaryCalendar,
            &FirstPicker,
        )
        .unwrap();
        assert!(reading.birth.hour.is_some());
        assert_eq!(reading.note, NOTE_WITH_TIME);
    }

    #[test]
    fn test_current_age_respects_birthday() {
        let before = jst().with_ymd_and_hms(2024, 5, 14, 12, 0, 0).single().unwrap();
        let after = jst().with_ymd_and_hms(2024, 5, 15, 12, 0, 0).single().unwrap();
        let birth = NaiveDate::from_ymd_opt(1990, 5, 15).unwrap();
        assert_eq!(current_age(birth, before), 33);
        assert_eq!(current_age(birth, after), 34);
    }
}
