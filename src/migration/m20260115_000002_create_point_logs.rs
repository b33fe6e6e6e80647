use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
  async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .create_table(
        Table::create()
          .table(PointLogs::Table)
          .if_not_exists()
          .col(ColumnDef::new(PointLogs::Uid).string().not_null().primary_key())
          .col(ColumnDef::new(PointLogs::UserUid).string().not_null())
          .col(ColumnDef::new(PointLogs::Kind).string().not_null())
          .col(ColumnDef::new(PointLogs::Amount).big_integer().not_null())
          .col(ColumnDef::new(PointLogs::Reason).string().not_null())
          .col(ColumnDef::new(PointLogs::CreatedAt).date_time().not_null())
          .to_owned(),
      )
      .await?;

    manager
      .create_index(
        Index::create()
          .name("idx_point_logs_user")
          .table(PointLogs::Table)
          .col(PointLogs::UserUid)
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager.drop_table(Table::drop().table(PointLogs::Table).to_owned()).await
  }
}

#[derive(DeriveIden)]
pub enum PointLogs {
  Table,
  Uid,
  UserUid,
  Kind,
  Amount,
  Reason,
  CreatedAt,
}
