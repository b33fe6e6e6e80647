//! Raw pedometer log - immutable, one row per reported step count.
//! `created_at` is the occurrence time and may be backdated.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "step_logs")]
pub struct Model {
  #[sea_orm(primary_key, auto_increment = false)]
  pub uid: String,
  pub user_uid: String,
  pub count: i64,
  pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
