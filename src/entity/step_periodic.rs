//! Weekly (periodic) step aggregate, keyed like the daily one but on the
//! configured week start.

use json as serde_json;
use sea_orm::{FromJsonQueryResult, entity::prelude::*};
use serde::{Deserialize, Serialize};

#[derive(
  Clone, Debug, Default, PartialEq, Serialize, Deserialize, FromJsonQueryResult,
)]
pub struct DailyUids(pub Vec<String>);

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "step_periodic")]
pub struct Model {
  #[sea_orm(primary_key, auto_increment = false)]
  pub user_uid: String,
  /// UTC midnight of the first day of the period.
  #[sea_orm(primary_key, auto_increment = false)]
  pub base_date: DateTime,
  pub uid: String,
  pub count: i64,
  /// At most `bucket::PERIODIC_DURATION_IN_DAYS` entries.
  #[sea_orm(column_type = "Json")]
  pub daily_uids: DailyUids,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
