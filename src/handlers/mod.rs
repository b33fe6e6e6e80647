//! HTTP handlers. Thin: parse query/body, call the service layer, let
//! `Error`'s `IntoResponse` shape every failure.

pub mod devices;
pub mod pedometers;
pub mod stores;
pub mod users;

use std::hash::Hash;

use axum::Json;
use serde::Deserialize;

use crate::{
  find::{self, Amount, FindMany, SearchOption},
  prelude::*,
};

pub async fn health() -> Json<json::Value> {
  Json(json::json!({
    "success": true,
    "version": env!("CARGO_PKG_VERSION"),
  }))
}

/// The raw list-query surface. `order` arrives as a JSON-encoded map
/// from sortable field to `"ASC"`/`"DESC"`; deserializing it against
/// the per-entity key enum is the allow-list check.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FindManyParams {
  pub search_option: Option<String>,
  pub cursor: Option<String>,
  pub amount: Option<String>,
  pub order: Option<String>,
}

impl FindManyParams {
  pub fn parse<K>(&self) -> Result<FindMany<K>>
  where
    K: Eq + Hash + for<'de> Deserialize<'de>,
  {
    let search = match (self.search_option.as_deref(), self.cursor.as_deref())
    {
      (None | Some("plain"), _) => SearchOption::Plain,
      (Some("cursor"), Some(cursor)) => {
        SearchOption::Cursor(cursor.to_string())
      }
      (Some("cursor"), None) => {
        return Err(Error::InvalidParameter(
          "searchOption=cursor requires a cursor".into(),
        ));
      }
      (Some(other), _) => {
        return Err(Error::InvalidParameter(format!(
          "unknown searchOption `{other}`"
        )));
      }
    };

    let amount = match self.amount.as_deref() {
      None | Some("max") => Amount::Max,
      Some(raw) => {
        let exact = raw.parse::<u64>().map_err(|_| {
          Error::InvalidParameter(format!("invalid amount `{raw}`"))
        })?;
        if !(1..=find::MAX_SEARCH_LENGTH).contains(&exact) {
          return Err(Error::InvalidParameter(format!(
            "amount must be 1..={} or `max`",
            find::MAX_SEARCH_LENGTH
          )));
        }
        Amount::Exact(exact)
      }
    };

    let order = match self.order.as_deref() {
      None => HashMap::new(),
      Some(raw) => json::from_str(raw).map_err(|_| {
        Error::InvalidParameter(format!("invalid order `{raw}`"))
      })?,
    };

    Ok(FindMany { search, amount, order })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{find::Direction, sv::UserSort};

  #[test]
  fn defaults_to_plain_and_max() {
    let params = FindManyParams::default();
    let options = params.parse::<UserSort>().unwrap();

    assert_eq!(options.search, SearchOption::Plain);
    assert_eq!(options.amount, Amount::Max);
    assert!(options.order.is_empty());
  }

  #[test]
  fn cursor_mode_requires_the_cursor() {
    let params = FindManyParams {
      search_option: Some("cursor".into()),
      ..Default::default()
    };
    assert!(matches!(
      params.parse::<UserSort>(),
      Err(Error::InvalidParameter(_))
    ));

    let params = FindManyParams {
      search_option: Some("cursor".into()),
      cursor: Some("65a000000000000000000001".into()),
      ..Default::default()
    };
    let options = params.parse::<UserSort>().unwrap();
    assert_eq!(
      options.search,
      SearchOption::Cursor("65a000000000000000000001".into())
    );
  }

  #[test]
  fn rejects_unknown_search_option_and_bad_amounts() {
    let params = FindManyParams {
      search_option: Some("fuzzy".into()),
      ..Default::default()
    };
    assert!(params.parse::<UserSort>().is_err());

    for raw in ["0", "1001", "-3", "many"] {
      let params =
        FindManyParams { amount: Some(raw.into()), ..Default::default() };
      assert!(params.parse::<UserSort>().is_err(), "amount `{raw}`");
    }

    let params =
      FindManyParams { amount: Some("max".into()), ..Default::default() };
    assert_eq!(params.parse::<UserSort>().unwrap().amount, Amount::Max);
  }

  #[test]
  fn order_map_is_checked_against_the_allow_list() {
    let params = FindManyParams {
      order: Some(r#"{"nickname":"DESC"}"#.into()),
      ..Default::default()
    };
    let options = params.parse::<UserSort>().unwrap();
    assert_eq!(options.order[&UserSort::Nickname], Direction::Desc);

    let params = FindManyParams {
      order: Some(r#"{"password":"ASC"}"#.into()),
      ..Default::default()
    };
    assert!(params.parse::<UserSort>().is_err());
  }
}
