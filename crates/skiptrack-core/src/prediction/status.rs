//! Where a given day falls within the current cycle.

use chrono::{NaiveDate, TimeDelta};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse phase of the menstrual cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CyclePhase {
    Menstruation,
    Follicular,
    Ovulation,
    Luteal,
}

impl CyclePhase {
    /// Phase for a 1-based cycle day given the typical period duration.
    pub fn for_day(day_in_cycle: i64, period_duration: i64) -> Self {
        if day_in_cycle <= period_duration {
            Self::Menstruation
        } else if day_in_cycle <= period_duration + 9 {
            Self::Follicular
        } else if day_in_cycle <= period_duration + 11 {
            Self::Ovulation
        } else {
            Self::Luteal
        }
    }
}

impl fmt::Display for CyclePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Menstruation => "Menstruation",
            Self::Follicular => "Follicular",
            Self::Ovulation => "Ovulation",
            Self::Luteal => "Luteal",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleStatus {
    pub phase: CyclePhase,
    /// 1-based
    pub day_in_cycle: i64,
    pub days_until_period: i64,
    pub next_period_start: Option<NaiveDate>,
}

/// Position of `today` in a cycle that started on `last_period_start`.
///
/// Cycles are assumed to repeat every `cycle_length` days (at least one).
/// A `last_period_start` in the future reports a full cycle until the next
/// period.
pub fn cycle_status(
    last_period_start: NaiveDate,
    cycle_length: i64,
    period_duration: i64,
    today: NaiveDate,
) -> CycleStatus {
    let cycle_length = cycle_length.max(1);
    let days_elapsed = (today - last_period_start).num_days();

    let day_in_cycle = days_elapsed.rem_euclid(cycle_length) + 1;
    let days_until_period = if days_elapsed < 0 {
        cycle_length
    } else {
        cycle_length - day_in_cycle + 1
    };

    let cycles_ahead = days_elapsed.div_euclid(cycle_length) + 1;
    let next_period_start = cycles_ahead
        .checked_mul(cycle_length)
        .and_then(TimeDelta::try_days)
        .and_then(|delta| last_period_start.checked_add_signed(delta));

    CycleStatus {
        phase: CyclePhase::for_day(day_in_cycle, period_duration),
        day_in_cycle,
        days_until_period,
        next_period_start,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_first_day_is_menstruation() {
        let status = cycle_status(day("2024-03-01"), 28, 5, day("2024-03-01"));
        assert_eq!(status.phase, CyclePhase::Menstruation);
        assert_eq!(status.day_in_cycle, 1);
        assert_eq!(status.days_until_period, 28);
        assert_eq!(status.next_period_start, Some(day("2024-03-29")));
    }

    #[test]
    fn test_phase_boundaries() {
        assert_eq!(CyclePhase::for_day(5, 5), CyclePhase::Menstruation);
        assert_eq!(CyclePhase::for_day(6, 5), CyclePhase::Follicular);
        assert_eq!(CyclePhase::for_day(14, 5), CyclePhase::Follicular);
        assert_eq!(CyclePhase::for_day(15, 5), CyclePhase::Ovulation);
        assert_eq!(CyclePhase::for_day(16, 5), CyclePhase::Ovulation);
        assert_eq!(CyclePhase::for_day(17, 5), CyclePhase::Luteal);
    }

    #[test]
    fn test_last_day_of_cycle() {
        let status = cycle_status(day("2024-03-01"), 28, 5, day("2024-03-28"));
        assert_eq!(status.day_in_cycle, 28);
        assert_eq!(status.days_until_period, 1);
        assert_eq!(status.phase, CyclePhase::Luteal);
    }

    #[test]
    fn test_wraps_into_later_cycles() {
        let status = cycle_status(day("2024-03-01"), 28, 5, day("2024-04-01"));
        // 31 days elapsed: day 4 of the second cycle
        assert_eq!(status.day_in_cycle, 4);
        assert_eq!(status.phase, CyclePhase::Menstruation);
        assert_eq!(status.next_period_start, Some(day("2024-04-26")));
    }

    #[test]
    fn test_future_last_period() {
        let status = cycle_status(day("2024-03-10"), 28, 5, day("2024-03-08"));
        assert_eq!(status.days_until_period, 28);
        assert_eq!(status.next_period_start, Some(day("2024-03-10")));
    }

    #[test]
    fn test_zero_cycle_length_is_clamped() {
        let status = cycle_status(day("2024-03-01"), 0, 5, day("2024-03-03"));
        assert_eq!(status.day_in_cycle, 1);
        assert_eq!(status.days_until_period, 1);
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(CyclePhase::Ovulation.to_string(), "Ovulation");
    }
}
