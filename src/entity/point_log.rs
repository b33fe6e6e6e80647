//! Point ledger entry - immutable deposit/withdraw history.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(
  Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum PointKind {
  #[sea_orm(string_value = "deposit")]
  Deposit,
  #[sea_orm(string_value = "withdraw")]
  Withdraw,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "point_logs")]
pub struct Model {
  #[sea_orm(primary_key, auto_increment = false)]
  pub uid: String,
  pub user_uid: String,
  pub kind: PointKind,
  pub amount: i64,
  pub reason: String,
  pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
