//! Generic cursor pagination shared by every list query.
//!
//! `FindMany` mirrors the query surface of the HTTP layer: an optional
//! cursor, an amount (with a `"max"` sentinel), and an ordering map
//! restricted to a per-entity allow-list enum. `Recent` is the tagged
//! result for bounded embedded lists backed by an unbounded sibling
//! collection.

use sea_orm::{Order, Select};
use serde::{Deserialize, Serialize};

use crate::prelude::*;

/// Upper bound for every list query. The original service defines this
/// per entity, but all of them share the same value.
pub const MAX_SEARCH_LENGTH: u64 = 1000;

/// How a list query continues: from the top, or from a previously
/// returned identifier. The cursor filter is inclusive (`uid >=`), so a
/// caller continuing a page already holds the cursor record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SearchOption {
  #[default]
  Plain,
  Cursor(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Amount {
  /// The `'max'` sentinel: use the defined maximum explicitly.
  #[default]
  Max,
  Exact(u64),
}

impl Amount {
  pub fn limit(self, max: u64) -> u64 {
    match self {
      Amount::Max => max,
      Amount::Exact(amount) => amount.clamp(1, max),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
  #[serde(rename = "ASC")]
  Asc,
  #[serde(rename = "DESC")]
  Desc,
}

impl From<Direction> for Order {
  fn from(direction: Direction) -> Self {
    match direction {
      Direction::Asc => Order::Asc,
      Direction::Desc => Order::Desc,
    }
  }
}

/// Per-entity allow-list of sortable fields. Deserializing the key enum
/// is the allow-list check; arbitrary field names never reach SQL.
pub trait SortKey {
  type Entity: EntityTrait;

  fn column(&self) -> <Self::Entity as EntityTrait>::Column;
}

#[derive(Debug, Clone)]
pub struct FindMany<K> {
  pub search: SearchOption,
  pub amount: Amount,
  pub order: HashMap<K, Direction>,
}

impl<K> Default for FindMany<K> {
  fn default() -> Self {
    Self {
      search: SearchOption::default(),
      amount: Amount::default(),
      order: HashMap::new(),
    }
  }
}

impl<K> FindMany<K> {
  pub fn cursor(cursor: impl Into<String>) -> Self {
    Self { search: SearchOption::Cursor(cursor.into()), ..Self::default() }
  }

  pub fn amount(amount: u64) -> Self {
    Self { amount: Amount::Exact(amount), ..Self::default() }
  }
}

/// Applies the cursor filter, the explicit orders, an identity-ascending
/// tiebreak and the limit to a select.
pub fn paginate<K: SortKey>(
  mut query: Select<K::Entity>,
  uid: <K::Entity as EntityTrait>::Column,
  options: &FindMany<K>,
) -> Select<K::Entity> {
  match &options.search {
    SearchOption::Plain => {}
    SearchOption::Cursor(cursor) => {
      query = query.filter(uid.gte(cursor.as_str()));
    }
  }

  for (key, direction) in &options.order {
    query = query.order_by(key.column(), (*direction).into());
  }

  query.order_by_asc(uid).limit(options.amount.limit(MAX_SEARCH_LENGTH))
}

/// Bounded embedded list read result. `Sized` means the embedded copy is
/// the whole history; `Expendable` carries a cursor into the unbounded
/// sibling collection for the part the cap evicted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Recent<T> {
  Sized { array: Vec<T> },
  Expendable { array: Vec<T>, next: String },
}

impl<T> Recent<T> {
  pub fn new(array: Vec<T>, next: Option<String>) -> Self {
    match next {
      None => Recent::Sized { array },
      Some(next) => Recent::Expendable { array, next },
    }
  }

  pub fn array(&self) -> &[T] {
    match self {
      Recent::Sized { array } | Recent::Expendable { array, .. } => array,
    }
  }

  pub fn next(&self) -> Option<&str> {
    match self {
      Recent::Sized { .. } => None,
      Recent::Expendable { next, .. } => Some(next),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn amount_limits() {
    assert_eq!(Amount::Max.limit(MAX_SEARCH_LENGTH), 1000);
    assert_eq!(Amount::Exact(10).limit(1000), 10);
    assert_eq!(Amount::Exact(5000).limit(1000), 1000);
    assert_eq!(Amount::Exact(0).limit(1000), 1);
  }

  #[test]
  fn direction_parses_from_wire_names() {
    assert_eq!(json::from_str::<Direction>("\"ASC\"").unwrap(), Direction::Asc);
    assert_eq!(json::from_str::<Direction>("\"DESC\"").unwrap(), Direction::Desc);
    assert!(json::from_str::<Direction>("\"sideways\"").is_err());
  }

  #[test]
  fn recent_tags_by_continuation() {
    let sized = Recent::new(vec![1, 2], None);
    assert_eq!(sized.array(), &[1, 2]);
    assert_eq!(sized.next(), None);

    let expendable = Recent::new(vec![1, 2], Some("abc".into()));
    assert_eq!(expendable.next(), Some("abc"));
  }
}
