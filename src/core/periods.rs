//! Bell schedule and period overlap computation.
//!
//! The school day is divided into nine fixed periods (ordinals 0-8). Sessions
//! are matched against the schedule with half-open interval intersection:
//! a period is affected iff `period.start < to && period.end > from`. A session
//! ending exactly at a period's start does not touch that period, and a
//! zero-duration range affects nothing.
//!
//! Bell schedule:
//! - Period 0: 07:30-08:15
//! - Period 1: 08:25-09:10
//! - Period 2: 09:20-10:05
//! - Period 3: 10:20-11:05
//! - Period 4: 11:15-12:00
//! - Period 5: 12:20-13:05
//! - Period 6: 13:25-14:10
//! - Period 7: 14:20-15:05
//! - Period 8: 15:15-16:00

use chrono::NaiveTime;

/// Number of periods in the daily schedule
pub const PERIOD_COUNT: usize = 9;

/// Bell schedule as (`start_hour`, `start_min`, `end_hour`, `end_min`) per ordinal
const PERIOD_TIMES: [(u32, u32, u32, u32); PERIOD_COUNT] = [
    (7, 30, 8, 15),
    (8, 25, 9, 10),
    (9, 20, 10, 5),
    (10, 20, 11, 5),
    (11, 15, 12, 0),
    (12, 20, 13, 5),
    (13, 25, 14, 10),
    (14, 20, 15, 5),
    (15, 15, 16, 0),
];

/// One fixed class period of the daily schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Period {
    /// Ordinal index of the period (0-8)
    pub ordinal: u8,
    /// Start of the period's half-open interval
    pub start: NaiveTime,
    /// End of the period's half-open interval
    pub end: NaiveTime,
}

/// Returns the full bell schedule in ordinal order.
#[must_use]
pub fn periods() -> [Period; PERIOD_COUNT] {
    // The schedule constants are static and in range, so construction is infallible
    let make = |h, m| NaiveTime::from_hms_opt(h, m, 0).unwrap_or(NaiveTime::MIN);
    let mut out = [Period {
        ordinal: 0,
        start: NaiveTime::MIN,
        end: NaiveTime::MIN,
    }; PERIOD_COUNT];
    for (i, &(sh, sm, eh, em)) in PERIOD_TIMES.iter().enumerate() {
        out[i] = Period {
            ordinal: i as u8,
            start: make(sh, sm),
            end: make(eh, em),
        };
    }
    out
}

/// Returns the ordered ordinals of periods overlapping the half-open range
/// `[from, to)`.
///
/// A zero-duration (or inverted) range affects nothing, and ranges extending
/// past the last period simply stop matching; there are no failure modes.
#[must_use]
pub fn affected_periods(from: NaiveTime, to: NaiveTime) -> Vec<u8> {
    if from >= to {
        return Vec::new();
    }
    periods()
        .iter()
        .filter(|p| p.start < to && p.end > from)
        .map(|p| p.ordinal)
        .collect()
}

/// Encodes period ordinals into the `affected_periods` column format ("6,7,8").
#[must_use]
pub fn encode_periods(ordinals: &[u8]) -> String {
    ordinals
        .iter()
        .map(u8::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// Decodes the `affected_periods` column format back into ordinals.
///
/// Unparseable fragments are dropped; an empty string decodes to no periods.
#[must_use]
pub fn decode_periods(encoded: &str) -> Vec<u8> {
    encoded
        .split(',')
        .filter_map(|part| part.trim().parse().ok())
        .collect()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_schedule_shape() {
        let schedule = periods();
        assert_eq!(schedule.len(), 9);
        for (i, period) in schedule.iter().enumerate() {
            assert_eq!(period.ordinal as usize, i);
            assert!(period.start < period.end);
        }
        // Periods do not overlap each other
        for pair in schedule.windows(2) {
            assert!(pair[0].end <= pair[1].start);
        }
        assert_eq!(schedule[0].start, t(7, 30));
        assert_eq!(schedule[8].end, t(16, 0));
    }

    #[test]
    fn test_afternoon_shoot_overlap() {
        // 14:00-16:00 runs into the tail of period 6 (13:25-14:10) and
        // covers periods 7 and 8 entirely
        assert_eq!(affected_periods(t(14, 0), t(16, 0)), vec![6, 7, 8]);
    }

    #[test]
    fn test_retimed_shoot_overlap() {
        // 15:00-17:00 clips period 7 and covers period 8; period 6 ended at 14:10
        assert_eq!(affected_periods(t(15, 0), t(17, 0)), vec![7, 8]);
    }

    #[test]
    fn test_zero_duration_affects_nothing() {
        assert_eq!(affected_periods(t(14, 30), t(14, 30)), Vec::<u8>::new());
        // Zero duration exactly on a period boundary
        assert_eq!(affected_periods(t(14, 20), t(14, 20)), Vec::<u8>::new());
    }

    #[test]
    fn test_inverted_range_affects_nothing() {
        assert_eq!(affected_periods(t(15, 0), t(14, 0)), Vec::<u8>::new());
    }

    #[test]
    fn test_end_at_period_start_excluded() {
        // Ending exactly when period 7 starts (14:20) does not include period 7
        assert_eq!(affected_periods(t(14, 0), t(14, 20)), vec![6]);
    }

    #[test]
    fn test_start_at_period_end_excluded() {
        // Starting exactly when period 6 ends (14:10) does not include period 6
        assert_eq!(affected_periods(t(14, 10), t(15, 0)), vec![7]);
    }

    #[test]
    fn test_one_minute_past_period_end() {
        // 16:00-16:01 is entirely after the schedule
        assert_eq!(affected_periods(t(16, 0), t(16, 1)), Vec::<u8>::new());
        // 15:59-16:01 still clips period 8
        assert_eq!(affected_periods(t(15, 59), t(16, 1)), vec![8]);
    }

    #[test]
    fn test_before_schedule_and_gaps() {
        // Entirely before period 0
        assert_eq!(affected_periods(t(6, 0), t(7, 30)), Vec::<u8>::new());
        // Entirely inside the 14:10-14:20 break
        assert_eq!(affected_periods(t(14, 11), t(14, 19)), Vec::<u8>::new());
    }

    #[test]
    fn test_whole_day_covers_everything() {
        assert_eq!(
            affected_periods(t(7, 0), t(17, 0)),
            vec![0, 1, 2, 3, 4, 5, 6, 7, 8]
        );
    }

    #[test]
    fn test_half_open_property_against_definition() {
        // Cross-check the filter against the definition for a grid of ranges
        for from_min in (6 * 60..17 * 60).step_by(17) {
            let from = t(from_min / 60, from_min % 60);
            let to = t((from_min + 90) / 60, (from_min + 90) % 60);
            let result = affected_periods(from, to);
            for period in periods() {
                let expected = period.start < to && period.end > from;
                assert_eq!(result.contains(&period.ordinal), expected);
            }
        }
    }

    #[test]
    fn test_encode_decode_periods() {
        assert_eq!(encode_periods(&[6, 7, 8]), "6,7,8");
        assert_eq!(encode_periods(&[]), "");
        assert_eq!(decode_periods("6,7,8"), vec![6, 7, 8]);
        assert_eq!(decode_periods(""), Vec::<u8>::new());
        assert_eq!(decode_periods("3"), vec![3]);
    }
}
