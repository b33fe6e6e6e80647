use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
};
use serde::Deserialize;

use crate::{
  entity::{step_daily, step_log, step_total},
  prelude::*,
  state::AppState,
  sv::PeriodicReport,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordStepReq {
  pub count: i64,
  /// RFC3339 or `YYYY-MM-DD`; defaults to now.
  pub created_at: Option<String>,
}

pub async fn record(
  State(app): State<Arc<AppState>>,
  Path(user_uid): Path<String>,
  Json(req): Json<RecordStepReq>,
) -> Result<(StatusCode, Json<step_log::Model>)> {
  let occurred_at = match req.created_at.as_deref() {
    Some(raw) => utils::parse_timestamp(raw)?,
    None => Utc::now().naive_utc(),
  };

  let log = app.sv().pedometer.record(&user_uid, req.count, occurred_at).await?;
  Ok((StatusCode::CREATED, Json(log)))
}

#[derive(Debug, Deserialize)]
pub struct DailyQuery {
  pub date: String,
}

pub async fn daily(
  State(app): State<Arc<AppState>>,
  Path(user_uid): Path<String>,
  Query(query): Query<DailyQuery>,
) -> Result<Json<step_daily::Model>> {
  let date = utils::parse_timestamp(&query.date)?;
  let daily = app
    .sv()
    .pedometer
    .find_in_day(&user_uid, date)
    .await?
    .ok_or(Error::LogNotFound)?;
  Ok(Json(daily))
}

#[derive(Debug, Deserialize)]
pub struct PeriodicQuery {
  pub start: String,
  pub end: String,
}

pub async fn periodic(
  State(app): State<Arc<AppState>>,
  Path(user_uid): Path<String>,
  Query(query): Query<PeriodicQuery>,
) -> Result<Json<PeriodicReport>> {
  let start = utils::parse_timestamp(&query.start)?;
  let end = utils::parse_timestamp(&query.end)?;

  let report = app
    .sv()
    .pedometer
    .find_between(&user_uid, start, end)
    .await?
    .ok_or(Error::LogNotFound)?;
  Ok(Json(report))
}

pub async fn total(
  State(app): State<Arc<AppState>>,
  Path(user_uid): Path<String>,
) -> Result<Json<step_total::Model>> {
  let total = app.sv().pedometer.find_total(&user_uid).await?;
  Ok(Json(total))
}
