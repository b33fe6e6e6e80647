//! Step rollup pipeline: every raw log insert maintains the daily,
//! periodic and all-time aggregates inside one transaction.

use sea_orm::sea_query::{Expr, OnConflict};
use serde::Serialize;

use crate::{
  bucket,
  entity::{
    step_daily::{self, MAX_LENGTH_DAILY_LOG},
    step_log, step_periodic, step_total, user,
  },
  prelude::*,
};

/// Result of a period-aligned range query: the matched dailies ascending
/// plus their summed count over the expanded `[start, end)` window.
#[derive(Debug, Serialize)]
pub struct PeriodicReport {
  pub user_uid: String,
  pub daily_list: Vec<step_daily::Model>,
  pub total_count: i64,
  pub start: DateTime,
  pub end: DateTime,
}

pub struct Pedometer<'a> {
  db: &'a DatabaseConnection,
  start_of_week: u8,
}

impl<'a> Pedometer<'a> {
  pub fn new(db: &'a DatabaseConnection) -> Self {
    Self::with_start_of_week(db, bucket::START_OF_WEEK)
  }

  pub fn with_start_of_week(db: &'a DatabaseConnection, day: u8) -> Self {
    Self { db, start_of_week: day }
  }

  /// Inserts a raw log and rolls its count into all three aggregates.
  ///
  /// The count increments are `ON CONFLICT .. count = count + ?`
  /// upserts against the (user_uid, base_date) primary keys, so two
  /// concurrent writers to the same bucket serialize on the row instead
  /// of overwriting each other with stale in-memory copies. The
  /// periodic aggregate grows by this call's `count` only; the daily's
  /// full total would double-add on repeated same-day calls. The user
  /// must exist; logs for unknown users are refused.
  pub async fn record(
    &self,
    user_uid: &str,
    count: i64,
    occurred_at: DateTime,
  ) -> Result<step_log::Model> {
    if count < 0 {
      return Err(Error::InvalidParameter("count must not be negative".into()));
    }

    let txn = self.db.begin().await?;

    let users = user::Entity::find_by_id(user_uid).count(&txn).await?;
    if users == 0 {
      return Err(Error::UserNotFound);
    }

    let log = step_log::ActiveModel {
      uid: Set(utils::object_id()),
      user_uid: Set(user_uid.to_string()),
      count: Set(count),
      created_at: Set(occurred_at),
    }
    .insert(&txn)
    .await?;

    let day = bucket::day_start(occurred_at);
    let period = bucket::week_start(occurred_at, self.start_of_week);

    step_daily::Entity::insert(step_daily::ActiveModel {
      user_uid: Set(user_uid.to_string()),
      base_date: Set(day),
      uid: Set(utils::object_id()),
      count: Set(count),
      log_uids: Set(step_daily::LogUids(vec![log.uid.clone()])),
    })
    .on_conflict(
      OnConflict::columns([
        step_daily::Column::UserUid,
        step_daily::Column::BaseDate,
      ])
      .value(
        step_daily::Column::Count,
        Expr::col(step_daily::Column::Count).add(count),
      )
      .to_owned(),
    )
    .exec_without_returning(&txn)
    .await?;

    let daily = step_daily::Entity::find_by_id((user_uid.to_string(), day))
      .one(&txn)
      .await?
      .ok_or_else(|| {
        Error::Internal("daily aggregate missing after upsert".into())
      })?;

    // conflict path: the freshly inserted log is not in the row yet
    if !daily.log_uids.0.contains(&log.uid) {
      let mut log_uids = daily.log_uids.clone();
      utils::push_capped(&mut log_uids.0, log.uid.clone(), MAX_LENGTH_DAILY_LOG);

      step_daily::ActiveModel { log_uids: Set(log_uids), ..daily.clone().into() }
        .update(&txn)
        .await?;
    }

    step_periodic::Entity::insert(step_periodic::ActiveModel {
      user_uid: Set(user_uid.to_string()),
      base_date: Set(period),
      uid: Set(utils::object_id()),
      count: Set(count),
      daily_uids: Set(step_periodic::DailyUids(vec![daily.uid.clone()])),
    })
    .on_conflict(
      OnConflict::columns([
        step_periodic::Column::UserUid,
        step_periodic::Column::BaseDate,
      ])
      .value(
        step_periodic::Column::Count,
        Expr::col(step_periodic::Column::Count).add(count),
      )
      .to_owned(),
    )
    .exec_without_returning(&txn)
    .await?;

    let periodic =
      step_periodic::Entity::find_by_id((user_uid.to_string(), period))
        .one(&txn)
        .await?
        .ok_or_else(|| {
          Error::Internal("periodic aggregate missing after upsert".into())
        })?;

    if !periodic.daily_uids.0.contains(&daily.uid) {
      let mut daily_uids = periodic.daily_uids.clone();
      utils::push_capped(
        &mut daily_uids.0,
        daily.uid.clone(),
        bucket::PERIODIC_DURATION_IN_DAYS as usize,
      );

      step_periodic::ActiveModel {
        daily_uids: Set(daily_uids),
        ..periodic.into()
      }
      .update(&txn)
      .await?;
    }

    step_total::Entity::insert(step_total::ActiveModel {
      user_uid: Set(user_uid.to_string()),
      count: Set(count),
    })
    .on_conflict(
      OnConflict::column(step_total::Column::UserUid)
        .value(
          step_total::Column::Count,
          Expr::col(step_total::Column::Count).add(count),
        )
        .to_owned(),
    )
    .exec_without_returning(&txn)
    .await?;

    txn.commit().await?;
    Ok(log)
  }

  pub async fn find_in_day(
    &self,
    user_uid: &str,
    date: DateTime,
  ) -> Result<Option<step_daily::Model>> {
    let day = bucket::day_start(date);
    let daily = step_daily::Entity::find_by_id((user_uid.to_string(), day))
      .one(self.db)
      .await?;

    Ok(daily)
  }

  /// Periodic aggregates overlapping `[start, end]`, expanded to whole
  /// periods: start rounds down to its period start, end rounds up to
  /// the next period boundary (exclusive).
  pub async fn find_between(
    &self,
    user_uid: &str,
    start: DateTime,
    end: DateTime,
  ) -> Result<Option<PeriodicReport>> {
    let start = bucket::week_start(start, self.start_of_week);
    let end = bucket::week_start(end, self.start_of_week)
      + TimeDelta::days(bucket::PERIODIC_DURATION_IN_DAYS);

    let periodic_list = step_periodic::Entity::find()
      .filter(step_periodic::Column::UserUid.eq(user_uid))
      .filter(step_periodic::Column::BaseDate.gte(start))
      .filter(step_periodic::Column::BaseDate.lt(end))
      .order_by_asc(step_periodic::Column::BaseDate)
      .all(self.db)
      .await?;

    if periodic_list.is_empty() {
      return Ok(None);
    }

    let daily_uids: Vec<String> = periodic_list
      .iter()
      .flat_map(|periodic| periodic.daily_uids.0.iter().cloned())
      .collect();

    let daily_list = step_daily::Entity::find()
      .filter(step_daily::Column::Uid.is_in(daily_uids))
      .order_by_asc(step_daily::Column::BaseDate)
      .all(self.db)
      .await?;

    let total_count = daily_list.iter().map(|daily| daily.count).sum();

    Ok(Some(PeriodicReport {
      user_uid: user_uid.to_string(),
      daily_list,
      total_count,
      start,
      end,
    }))
  }

  /// Never "not found": a user with no logs has a zero total.
  pub async fn find_total(&self, user_uid: &str) -> Result<step_total::Model> {
    let total = step_total::Entity::find_by_id(user_uid).one(self.db).await?;

    Ok(total.unwrap_or(step_total::Model {
      user_uid: user_uid.to_string(),
      count: 0,
    }))
  }
}
