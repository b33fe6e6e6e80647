//! Daily step aggregate. The composite primary key (user_uid, base_date)
//! is the conflict target of the atomic upsert-with-increment, so two
//! concurrent inserts for the same day can never create two rows.

use json as serde_json;
use sea_orm::{FromJsonQueryResult, entity::prelude::*};
use serde::{Deserialize, Serialize};

/// A client reports at most one log per 5 seconds.
pub const MIN_DELAY_BETWEEN_LOGS_IN_SECONDS: usize = 5;
/// Theoretical max log count for one day at that rate.
pub const MAX_LENGTH_DAILY_LOG: usize =
  60 / MIN_DELAY_BETWEEN_LOGS_IN_SECONDS * 60 * 24;

#[derive(
  Clone, Debug, Default, PartialEq, Serialize, Deserialize, FromJsonQueryResult,
)]
pub struct LogUids(pub Vec<String>);

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "step_daily")]
pub struct Model {
  #[sea_orm(primary_key, auto_increment = false)]
  pub user_uid: String,
  /// UTC midnight of the owned day.
  #[sea_orm(primary_key, auto_increment = false)]
  pub base_date: DateTime,
  /// Identifier referenced by the periodic aggregate's daily_uids.
  pub uid: String,
  pub count: i64,
  #[sea_orm(column_type = "Json")]
  pub log_uids: LogUids,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
