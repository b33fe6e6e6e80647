use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
  async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .create_table(
        Table::create()
          .table(Stores::Table)
          .if_not_exists()
          .col(ColumnDef::new(Stores::Uid).string().not_null().primary_key())
          .col(ColumnDef::new(Stores::Name).string().not_null())
          .col(ColumnDef::new(Stores::Description).string().not_null())
          .col(ColumnDef::new(Stores::DeviceUid).string().not_null())
          .col(ColumnDef::new(Stores::Lon).double().not_null())
          .col(ColumnDef::new(Stores::Lat).double().not_null())
          .col(ColumnDef::new(Stores::CreatedAt).date_time().not_null())
          .to_owned(),
      )
      .await?;

    manager
      .create_index(
        Index::create()
          .name("idx_stores_device")
          .table(Stores::Table)
          .col(Stores::DeviceUid)
          .to_owned(),
      )
      .await?;

    // range scans for the bounding-box prefilter
    manager
      .create_index(
        Index::create()
          .name("idx_stores_location")
          .table(Stores::Table)
          .col(Stores::Lon)
          .col(Stores::Lat)
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager.drop_table(Table::drop().table(Stores::Table).to_owned()).await
  }
}

#[derive(DeriveIden)]
pub enum Stores {
  Table,
  Uid,
  Name,
  Description,
  DeviceUid,
  Lon,
  Lat,
  CreatedAt,
}
