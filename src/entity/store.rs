//! Store location - a named point tied to a device, searched by radius
//! and bounding box.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "stores")]
pub struct Model {
  #[sea_orm(primary_key, auto_increment = false)]
  pub uid: String,
  pub name: String,
  pub description: String,
  pub device_uid: String,
  pub lon: f64,
  pub lat: f64,
  pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
