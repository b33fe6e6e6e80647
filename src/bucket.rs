//! Time-bucket keys for the step rollup aggregates.
//!
//! A raw step log belongs to exactly one daily bucket (UTC midnight) and
//! one periodic bucket (the start of its 7-day week). Both keys depend
//! only on the log's own timestamp, so out-of-order arrivals land in the
//! same buckets as in-order ones.

use crate::prelude::*;

/// ISO weekday of the first day of a periodic bucket, 1 = Monday.
/// See https://en.wikipedia.org/wiki/ISO_week_date
pub const START_OF_WEEK: u8 = 1;

pub const PERIODIC_DURATION_IN_DAYS: i64 = 7;

/// Truncates to UTC midnight.
pub fn day_start(at: DateTime) -> DateTime {
  at.date().and_time(NaiveTime::MIN)
}

/// Start of the periodic bucket owning `at`, for a week beginning on
/// ISO weekday `start_of_week` (1..=7). When the weekday is before the
/// configured start the key wraps to the previous week, never forward.
pub fn week_start(at: DateTime, start_of_week: u8) -> DateTime {
  debug_assert!((1..=7).contains(&start_of_week));

  let weekday = at.weekday().number_from_monday() as i64;
  let delta = (weekday + 7 - start_of_week as i64) % 7;

  day_start(at) - TimeDelta::days(delta)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn at(value: &str) -> DateTime {
    utils::parse_timestamp(value).unwrap()
  }

  #[test]
  fn day_start_truncates_time() {
    assert_eq!(at("2026-03-02"), day_start(at("2026-03-02T23:59:59Z")));
    assert_eq!(at("2026-03-02"), day_start(at("2026-03-02")));
  }

  #[test]
  fn iso_week_starts_on_monday() {
    // 2026-03-02 is a Monday
    for day in ["2026-03-02", "2026-03-04", "2026-03-08"] {
      assert_eq!(at("2026-03-02"), week_start(at(day), START_OF_WEEK));
    }
    // the next Monday opens a new bucket
    assert_eq!(at("2026-03-09"), week_start(at("2026-03-09"), START_OF_WEEK));
  }

  #[test]
  fn week_start_ignores_time_of_day() {
    assert_eq!(
      week_start(at("2026-03-04"), START_OF_WEEK),
      week_start(at("2026-03-04T18:45:00Z"), START_OF_WEEK),
    );
  }

  #[test]
  fn weekday_before_start_wraps_to_previous_week() {
    // week starting on Wednesday (3): Monday 2026-03-02 belongs to the
    // week opened on Wednesday 2026-02-25, not a future one
    assert_eq!(at("2026-02-25"), week_start(at("2026-03-02"), 3));
    assert_eq!(at("2026-03-04"), week_start(at("2026-03-04"), 3));
    assert_eq!(at("2026-03-04"), week_start(at("2026-03-06"), 3));
  }

  #[test]
  fn sunday_start_weeks() {
    // 2026-03-01 is a Sunday
    assert_eq!(at("2026-03-01"), week_start(at("2026-03-01"), 7));
    assert_eq!(at("2026-03-01"), week_start(at("2026-03-07"), 7));
    assert_eq!(at("2026-03-08"), week_start(at("2026-03-08"), 7));
  }
}
