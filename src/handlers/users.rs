use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
};
use serde::Deserialize;

use super::FindManyParams;
use crate::{
  entity::{point_log, user},
  prelude::*,
  state::AppState,
  sv::{PointLogSort, UserSort, UserView},
};

#[derive(Debug, Deserialize)]
pub struct CreateUserReq {
  pub nickname: String,
}

pub async fn create(
  State(app): State<Arc<AppState>>,
  Json(req): Json<CreateUserReq>,
) -> Result<(StatusCode, Json<user::Model>)> {
  let user = app.sv().user.create(&req.nickname).await?;
  Ok((StatusCode::CREATED, Json(user)))
}

pub async fn find_many(
  State(app): State<Arc<AppState>>,
  Query(params): Query<FindManyParams>,
) -> Result<Json<Vec<UserView>>> {
  let options = params.parse::<UserSort>()?;
  let users = app.sv().user.find_many(&options).await?;
  Ok(Json(users))
}

pub async fn find_one(
  State(app): State<Arc<AppState>>,
  Path(uid): Path<String>,
) -> Result<Json<UserView>> {
  let user = app.sv().user.by_uid(&uid).await?.ok_or(Error::UserNotFound)?;
  Ok(Json(user))
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserReq {
  pub nickname: String,
}

pub async fn update(
  State(app): State<Arc<AppState>>,
  Path(uid): Path<String>,
  Json(req): Json<UpdateUserReq>,
) -> Result<Json<json::Value>> {
  app.sv().user.update(&uid, &req.nickname).await?;
  Ok(Json(json::json!({ "success": true })))
}

pub async fn remove(
  State(app): State<Arc<AppState>>,
  Path(uid): Path<String>,
) -> Result<Json<json::Value>> {
  app.sv().user.remove(&uid).await?;
  Ok(Json(json::json!({ "success": true })))
}

#[derive(Debug, Deserialize)]
pub struct RecordPointsReq {
  pub kind: point_log::PointKind,
  pub amount: i64,
  pub reason: String,
}

/// The ledger entry is the only writer of a user's balance.
pub async fn record_points(
  State(app): State<Arc<AppState>>,
  Path(uid): Path<String>,
  Json(req): Json<RecordPointsReq>,
) -> Result<(StatusCode, Json<point_log::Model>)> {
  let log =
    app.sv().point.record(&uid, req.kind, req.amount, &req.reason).await?;
  Ok((StatusCode::CREATED, Json(log)))
}

pub async fn point_history(
  State(app): State<Arc<AppState>>,
  Path(uid): Path<String>,
  Query(params): Query<FindManyParams>,
) -> Result<Json<Vec<point_log::Model>>> {
  let options = params.parse::<PointLogSort>()?;
  let logs = app.sv().point.find_many(Some(&uid), &options).await?;
  Ok(Json(logs))
}

pub async fn point_log(
  State(app): State<Arc<AppState>>,
  Path(uid): Path<String>,
) -> Result<Json<point_log::Model>> {
  let log = app.sv().point.find_one(&uid).await?.ok_or(Error::LogNotFound)?;
  Ok(Json(log))
}
