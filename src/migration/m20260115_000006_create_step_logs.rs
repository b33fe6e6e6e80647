use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
  async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .create_table(
        Table::create()
          .table(StepLogs::Table)
          .if_not_exists()
          .col(ColumnDef::new(StepLogs::Uid).string().not_null().primary_key())
          .col(ColumnDef::new(StepLogs::UserUid).string().not_null())
          .col(ColumnDef::new(StepLogs::Count).big_integer().not_null())
          .col(ColumnDef::new(StepLogs::CreatedAt).date_time().not_null())
          .to_owned(),
      )
      .await?;

    manager
      .create_index(
        Index::create()
          .name("idx_step_logs_user")
          .table(StepLogs::Table)
          .col(StepLogs::UserUid)
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager.drop_table(Table::drop().table(StepLogs::Table).to_owned()).await
  }
}

#[derive(DeriveIden)]
pub enum StepLogs {
  Table,
  Uid,
  UserUid,
  Count,
  CreatedAt,
}
