use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
  async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .create_table(
        Table::create()
          .table(DeviceLogs::Table)
          .if_not_exists()
          .col(
            ColumnDef::new(DeviceLogs::Uid).string().not_null().primary_key(),
          )
          .col(ColumnDef::new(DeviceLogs::DeviceUid).string().not_null())
          .col(ColumnDef::new(DeviceLogs::State).string().not_null())
          .col(ColumnDef::new(DeviceLogs::MacAddress).string().not_null())
          .col(ColumnDef::new(DeviceLogs::CreatedAt).date_time().not_null())
          .to_owned(),
      )
      .await?;

    manager
      .create_index(
        Index::create()
          .name("idx_device_logs_device")
          .table(DeviceLogs::Table)
          .col(DeviceLogs::DeviceUid)
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager.drop_table(Table::drop().table(DeviceLogs::Table).to_owned()).await
  }
}

#[derive(DeriveIden)]
pub enum DeviceLogs {
  Table,
  Uid,
  DeviceUid,
  State,
  MacAddress,
  CreatedAt,
}
