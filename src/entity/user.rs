//! User account - authoritative point balance plus a bounded embedded
//! copy of the most recent ledger entries.

use json as serde_json;
use sea_orm::{FromJsonQueryResult, entity::prelude::*};
use serde::{Deserialize, Serialize};

use super::point_log::PointKind;

/// Cap of the embedded recent-list; the full history lives in the
/// `point_logs` collection.
pub const MAX_LENGTH_POINT_LOG: usize = 1000;

#[derive(
  Clone, Debug, PartialEq, Serialize, Deserialize, FromJsonQueryResult,
)]
pub struct EmbeddedPointLog {
  pub uid: String,
  pub kind: PointKind,
  pub amount: i64,
  pub reason: String,
  pub created_at: DateTime,
}

#[derive(
  Clone, Debug, Default, PartialEq, Serialize, Deserialize, FromJsonQueryResult,
)]
pub struct PointLogs(pub Vec<EmbeddedPointLog>);

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
  #[sea_orm(primary_key, auto_increment = false)]
  pub uid: String,
  pub nickname: String,
  pub point_balance: i64,
  #[sea_orm(column_type = "Json")]
  pub point_logs: PointLogs,
  pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
