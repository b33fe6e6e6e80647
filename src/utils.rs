use std::sync::{
  OnceLock,
  atomic::{AtomicU64, Ordering},
};

use uuid::Uuid;

use crate::prelude::*;

static COUNTER: AtomicU64 = AtomicU64::new(0);
static PROCESS: OnceLock<String> = OnceLock::new();

/// 24-hex-character identifier: 4 bytes of unix seconds, 3 bytes of
/// per-process entropy, 5 bytes of a process-monotonic counter.
/// Lexicographic order matches creation order within a process, which
/// the `>=`-cursor pagination and the recent-list probes rely on.
pub fn object_id() -> String {
  let seconds = Utc::now().timestamp() as u32;
  let process = PROCESS.get_or_init(|| {
    let entropy = Uuid::new_v4();
    let bytes = entropy.as_bytes();
    format!("{:02x}{:02x}{:02x}", bytes[0], bytes[1], bytes[2])
  });
  let count = COUNTER.fetch_add(1, Ordering::Relaxed) & 0xff_ffff_ffff;

  format!("{seconds:08x}{process}{count:010x}")
}

/// Accepts an RFC 3339 timestamp or a plain `YYYY-MM-DD` date,
/// normalized to naive UTC.
pub fn parse_timestamp(value: &str) -> Result<DateTime> {
  if let Ok(timestamp) = chrono::DateTime::parse_from_rfc3339(value) {
    return Ok(timestamp.naive_utc());
  }

  if let Ok(date) = chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d") {
    return Ok(date.and_time(NaiveTime::MIN));
  }

  Err(Error::InvalidParameter(format!("invalid timestamp: {value}")))
}

/// Bounded append: push, then evict from the front until `cap` holds.
/// Every embedded recent-list (point logs, device logs, daily log uids)
/// goes through here so the eviction order is oldest-first everywhere.
pub fn push_capped<T>(items: &mut Vec<T>, item: T, cap: usize) {
  items.push(item);
  if items.len() > cap {
    let overflow = items.len() - cap;
    items.drain(..overflow);
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn object_id_shape() {
    let id = object_id();
    assert_eq!(id.len(), 24);
    assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
  }

  #[test]
  fn object_id_is_monotonic() {
    let ids: Vec<_> = (0..100).map(|_| object_id()).collect();
    let mut sorted = ids.clone();
    sorted.sort();
    assert_eq!(ids, sorted);
    assert_eq!(
      ids.iter().collect::<std::collections::HashSet<_>>().len(),
      ids.len()
    );
  }

  #[test]
  fn parse_rfc3339_and_date() {
    let full = parse_timestamp("2026-03-02T12:30:00Z").unwrap();
    assert_eq!(full.to_string(), "2026-03-02 12:30:00");

    let day = parse_timestamp("2026-03-02").unwrap();
    assert_eq!(day.to_string(), "2026-03-02 00:00:00");

    assert!(matches!(
      parse_timestamp("yesterday"),
      Err(Error::InvalidParameter(_))
    ));
  }

  #[test]
  fn push_capped_evicts_oldest() {
    let mut items = vec![1, 2, 3];
    push_capped(&mut items, 4, 3);
    assert_eq!(items, vec![2, 3, 4]);

    push_capped(&mut items, 5, 10);
    assert_eq!(items, vec![2, 3, 4, 5]);
  }

  #[test]
  fn push_capped_exactly_at_capacity() {
    let mut items = vec![1, 2];
    push_capped(&mut items, 3, 3);
    assert_eq!(items, vec![1, 2, 3]);
  }
}
