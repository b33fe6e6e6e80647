use sea_orm::ConnectOptions;

use crate::{bucket, migration::Migrator, prelude::*, sv};

#[derive(Debug, Clone)]
pub struct Config {
  /// ISO weekday (1 = Monday .. 7 = Sunday) opening the periodic bucket.
  pub start_of_week: u8,
}

impl Default for Config {
  fn default() -> Self {
    Self { start_of_week: bucket::START_OF_WEEK }
  }
}

pub struct Services<'a> {
  pub user: sv::User<'a>,
  pub point: sv::Point<'a>,
  pub device: sv::Device<'a>,
  pub store: sv::Store<'a>,
  pub pedometer: sv::Pedometer<'a>,
}

pub struct AppState {
  pub db: DatabaseConnection,
  pub config: Config,
}

impl AppState {
  pub async fn new(db_url: &str) -> Self {
    Self::with_config(db_url, Config::default()).await
  }

  pub async fn with_config(db_url: &str, config: Config) -> Self {
    info!("Connecting to database...");
    let mut options = ConnectOptions::new(db_url);
    options.sqlx_logging(false);
    let db =
      Database::connect(options).await.expect("Failed to connect to database");

    info!("Running migrations...");
    Migrator::up(&db, None).await.expect("Failed to run migrations");

    Self { db, config }
  }

  pub fn sv(&self) -> Services<'_> {
    Services {
      user: sv::User::new(&self.db),
      point: sv::Point::new(&self.db),
      device: sv::Device::new(&self.db),
      store: sv::Store::new(&self.db),
      pedometer: sv::Pedometer::with_start_of_week(
        &self.db,
        self.config.start_of_week,
      ),
    }
  }
}
