use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
  async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .create_table(
        Table::create()
          .table(Devices::Table)
          .if_not_exists()
          .col(ColumnDef::new(Devices::Uid).string().not_null().primary_key())
          .col(ColumnDef::new(Devices::Name).string().not_null())
          .col(
            ColumnDef::new(Devices::MacAddress)
              .string()
              .not_null()
              .unique_key(),
          )
          .col(ColumnDef::new(Devices::RecentLogs).json().not_null())
          .col(ColumnDef::new(Devices::CreatedAt).date_time().not_null())
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager.drop_table(Table::drop().table(Devices::Table).to_owned()).await
  }
}

#[derive(DeriveIden)]
pub enum Devices {
  Table,
  Uid,
  Name,
  MacAddress,
  RecentLogs,
  CreatedAt,
}
