//! Database migrations using SeaORM

use sea_orm_migration::prelude::*;

mod m20260115_000001_create_users;
mod m20260115_000002_create_point_logs;
mod m20260115_000003_create_devices;
mod m20260115_000004_create_device_logs;
mod m20260115_000005_create_stores;
mod m20260115_000006_create_step_logs;
mod m20260115_000007_create_step_aggregates;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
  fn migrations() -> Vec<Box<dyn MigrationTrait>> {
    vec![
      Box::new(m20260115_000001_create_users::Migration),
      Box::new(m20260115_000002_create_point_logs::Migration),
      Box::new(m20260115_000003_create_devices::Migration),
      Box::new(m20260115_000004_create_device_logs::Migration),
      Box::new(m20260115_000005_create_stores::Migration),
      Box::new(m20260115_000006_create_step_logs::Migration),
      Box::new(m20260115_000007_create_step_aggregates::Migration),
    ]
  }
}
