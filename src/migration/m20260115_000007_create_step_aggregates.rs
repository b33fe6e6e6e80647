use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
  async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    // (user_uid, base_date) is the upsert conflict target for the
    // rollup increments, so it has to be the primary key.
    manager
      .create_table(
        Table::create()
          .table(StepDaily::Table)
          .if_not_exists()
          .col(ColumnDef::new(StepDaily::UserUid).string().not_null())
          .col(ColumnDef::new(StepDaily::BaseDate).date_time().not_null())
          .col(ColumnDef::new(StepDaily::Uid).string().not_null())
          .col(ColumnDef::new(StepDaily::Count).big_integer().not_null())
          .col(ColumnDef::new(StepDaily::LogUids).json().not_null())
          .primary_key(
            Index::create().col(StepDaily::UserUid).col(StepDaily::BaseDate),
          )
          .to_owned(),
      )
      .await?;

    manager
      .create_table(
        Table::create()
          .table(StepPeriodic::Table)
          .if_not_exists()
          .col(ColumnDef::new(StepPeriodic::UserUid).string().not_null())
          .col(ColumnDef::new(StepPeriodic::BaseDate).date_time().not_null())
          .col(ColumnDef::new(StepPeriodic::Uid).string().not_null())
          .col(ColumnDef::new(StepPeriodic::Count).big_integer().not_null())
          .col(ColumnDef::new(StepPeriodic::DailyUids).json().not_null())
          .primary_key(
            Index::create()
              .col(StepPeriodic::UserUid)
              .col(StepPeriodic::BaseDate),
          )
          .to_owned(),
      )
      .await?;

    manager
      .create_table(
        Table::create()
          .table(StepTotal::Table)
          .if_not_exists()
          .col(
            ColumnDef::new(StepTotal::UserUid)
              .string()
              .not_null()
              .primary_key(),
          )
          .col(ColumnDef::new(StepTotal::Count).big_integer().not_null())
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .drop_table(Table::drop().table(StepDaily::Table).to_owned())
      .await?;
    manager
      .drop_table(Table::drop().table(StepPeriodic::Table).to_owned())
      .await?;
    manager.drop_table(Table::drop().table(StepTotal::Table).to_owned()).await
  }
}

#[derive(DeriveIden)]
pub enum StepDaily {
  Table,
  UserUid,
  BaseDate,
  Uid,
  Count,
  LogUids,
}

#[derive(DeriveIden)]
pub enum StepPeriodic {
  Table,
  UserUid,
  BaseDate,
  Uid,
  Count,
  DailyUids,
}

#[derive(DeriveIden)]
pub enum StepTotal {
  Table,
  UserUid,
  Count,
}
