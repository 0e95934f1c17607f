//! Calendar adapter: civil instant → four pillars.
//!
//! The core never builds pillars on its own; it consumes whatever an adapter
//! produces. A missing hour pillar means "feature unavailable" — downstream
//! scoring degrades to its neutral defaults and never retries the adapter.
//!
//! `SexagenaryCalendar` is the built-in adapter: classical cycle arithmetic
//! with an approximate Feb 4 year boundary and a day-6 month cutoff. It is a
//! civil approximation, not a solar-term ephemeris; swap the trait impl for
//! an exact one if pillar-level precision ever matters.

use chrono::{DateTime, Datelike, FixedOffset, Timelike};

use crate::pillars::{Branch, FourPillars, Pillar, Stem};

/// Conversion contract between a civil instant and the four pillars.
pub trait CalendarAdapter {
    /// All four pillars for the instant. The hour pillar is always resolvable
    /// here because an instant carries a time of day.
    fn four_pillars(&self, instant: DateTime<FixedOffset>) -> FourPillars;

    /// Hour pillar alone, or `None` when the adapter cannot resolve one.
    fn resolve_hour_pillar(&self, instant: DateTime<FixedOffset>) -> Option<Pillar>;
}

/// Built-in adapter using sexagenary cycle arithmetic.
#[derive(Debug, Clone, Copy, Default)]
pub struct SexagenaryCalendar;

// JDN of 2000-01-01, a 戊午 day (cycle index 54); hence the +49 offset below.
const JDN_EPOCH_OFFSET: i64 = 1_721_425;

impl SexagenaryCalendar {
    /// Solar year for pillar purposes: years roll over near lichun (Feb 4).
    fn solar_year(instant: DateTime<FixedOffset>) -> i32 {
        let (m, d) = (instant.month(), instant.day());
        if m < 2 || (m == 2 && d < 4) {
            instant.year() - 1
        } else {
            instant.year()
        }
    }

    fn year_pillar(instant: DateTime<FixedOffset>) -> Pillar {
        let y = Self::solar_year(instant) as i64;
        Pillar {
            stem: Stem::from_index(y - 4),
            branch: Branch::from_index(y - 4),
        }
    }

    fn month_pillar(instant: DateTime<FixedOffset>) -> Pillar {
        // Solar months open near day 6; the 寅 month (branch index 2) opens
        // the solar year in February.
        let mut msi = instant.month() as i64;
        if instant.day() < 6 {
            msi -= 1;
        }
        let branch = Branch::from_index(msi);
        let months_since_yin = (branch.index() as i64 - 2).rem_euclid(12);

        // Five-tigers rule: the first month stem follows the year stem.
        let year_stem = Self::year_pillar(instant).stem.index() as i64;
        let stem = Stem::from_index(year_stem * 2 + 2 + months_since_yin);
        Pillar { stem, branch }
    }

    fn day_pillar(instant: DateTime<FixedOffset>) -> Pillar {
        let jdn = i64::from(instant.date_naive().num_days_from_ce()) + JDN_EPOCH_OFFSET;
        Pillar::from_cycle_index(jdn + 49)
    }

    fn hour_pillar(instant: DateTime<FixedOffset>) -> Pillar {
        // Two-hour slots; 23:00 opens the 子 slot of the next cycle.
        let branch_index = ((instant.hour() as i64 + 1) / 2) % 12;
        let branch = Branch::from_index(branch_index);

        // Five-rats rule: the 子 hour stem follows the day stem.
        let day_stem = Self::day_pillar(instant).stem.index() as i64;
        let stem = Stem::from_index(day_stem * 2 + branch_index);
        Pillar { stem, branch }
    }
}

impl CalendarAdapter for SexagenaryCalendar {
    fn four_pillars(&self, instant: DateTime<FixedOffset>) -> FourPillars {
        FourPillars {
            year: Self::year_pillar(instant),
            month: Self::month_pillar(instant),
            day: Self::day_pillar(instant),
            hour: Some(Self::hour_pillar(instant)),
        }
    }

    fn resolve_hour_pillar(&self, instant: DateTime<FixedOffset>) -> Option<Pillar> {
        Some(Self::hour_pillar(instant))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn jst() -> FixedOffset {
        FixedOffset::east_opt(9 * 3600).expect("JST offset is valid")
    }

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<FixedOffset> {
        jst().with_ymd_and_hms(y, m, d, h, 0, 0).single().unwrap()
    }

    #[test]
    fn test_year_pillar_known_anchors() {
        // 1984 opened a cycle: 甲子.
        assert_eq!(SexagenaryCalendar::year_pillar(at(1984, 6, 1, 12)).text(), "甲子");
        // 1990 was a 庚午 (Metal Horse) year.
        assert_eq!(SexagenaryCalendar::year_pillar(at(1990, 5, 15, 12)).text(), "庚午");
        // January belongs to the previous solar year.
        assert_eq!(SexagenaryCalendar::year_pillar(at(1991, 1, 15, 12)).text(), "庚午");
    }

    #[test]
    fn test_day_pillar_known_anchor() {
        // 2000-01-01 was a 戊午 day.
        assert_eq!(SexagenaryCalendar::day_pillar(at(2000, 1, 1, 12)).text(), "戊午");
        // Cycle advances by one per civil day.
        assert_eq!(SexagenaryCalendar::day_pillar(at(2000, 1, 2, 12)).text(), "己未");
    }

    #[test]
    fn test_month_pillar_five_tigers() {
        // 甲 years open with 丙寅; 1984-02 (after day 6) is such a month.
        assert_eq!(SexagenaryCalendar::month_pillar(at(1984, 2, 10, 12)).text(), "丙寅");
    }

    #[test]
    fn test_hour_branch_slots() {
        assert_eq!(SexagenaryCalendar::hour_pillar(at(2024, 3, 10, 0)).branch, Branch::Zi);
        assert_eq!(SexagenaryCalendar::hour_pillar(at(2024, 3, 10, 23)).branch, Branch::Zi);
        assert_eq!(SexagenaryCalendar::hour_pillar(at(2024, 3, 10, 12)).branch, Branch::Wu);
    }

    #[test]
    fn test_adapter_hour_always_resolves() {
        let adapter = SexagenaryCalendar;
        let pillars = adapter.four_pillars(at(2024, 3, 10, 7));
        assert!(pillars.hour.is_some());
        assert_eq!(pillars.hour, adapter.resolve_hour_pillar(at(2024, 3, 10, 7)));
    }
}
