//! Device state log - unbounded connect/disconnect history. The mac
//! address is denormalized from the device at insert time.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(
  Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum DeviceState {
  #[sea_orm(string_value = "connected")]
  Connected,
  #[sea_orm(string_value = "disconnected")]
  Disconnected,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "device_logs")]
pub struct Model {
  #[sea_orm(primary_key, auto_increment = false)]
  pub uid: String,
  pub device_uid: String,
  pub state: DeviceState,
  pub mac_address: String,
  pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
