//! Device account with a bounded embedded copy of recent state logs.

use json as serde_json;
use sea_orm::{FromJsonQueryResult, entity::prelude::*};
use serde::{Deserialize, Serialize};

use super::device_log::DeviceState;

/// Cap of the embedded recent-list; the full history lives in the
/// `device_logs` collection.
pub const MAX_LENGTH_DEVICE_LOG: usize = 1000;

#[derive(
  Clone, Debug, PartialEq, Serialize, Deserialize, FromJsonQueryResult,
)]
pub struct EmbeddedStateLog {
  pub uid: String,
  pub state: DeviceState,
  pub created_at: DateTime,
}

#[derive(
  Clone, Debug, Default, PartialEq, Serialize, Deserialize, FromJsonQueryResult,
)]
pub struct StateLogs(pub Vec<EmbeddedStateLog>);

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "devices")]
pub struct Model {
  #[sea_orm(primary_key, auto_increment = false)]
  pub uid: String,
  pub name: String,
  #[sea_orm(unique)]
  pub mac_address: String,
  #[sea_orm(column_type = "Json")]
  pub recent_logs: StateLogs,
  pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
