use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
};
use serde::Deserialize;

use super::FindManyParams;
use crate::{
  entity::{device, device_log},
  prelude::*,
  state::AppState,
  sv::{DeviceLogSort, DeviceSort, DeviceView},
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDeviceReq {
  pub name: String,
  pub mac_address: String,
}

pub async fn create(
  State(app): State<Arc<AppState>>,
  Json(req): Json<CreateDeviceReq>,
) -> Result<(StatusCode, Json<device::Model>)> {
  let device = app.sv().device.create(&req.name, &req.mac_address).await?;
  Ok((StatusCode::CREATED, Json(device)))
}

pub async fn find_many(
  State(app): State<Arc<AppState>>,
  Query(params): Query<FindManyParams>,
) -> Result<Json<Vec<DeviceView>>> {
  let options = params.parse::<DeviceSort>()?;
  let devices = app.sv().device.find_many(&options).await?;
  Ok(Json(devices))
}

pub async fn find_one(
  State(app): State<Arc<AppState>>,
  Path(uid): Path<String>,
) -> Result<Json<DeviceView>> {
  let device =
    app.sv().device.by_uid(&uid).await?.ok_or(Error::DeviceNotFound)?;
  Ok(Json(device))
}

#[derive(Debug, Deserialize)]
pub struct UpdateDeviceReq {
  pub name: String,
}

pub async fn update(
  State(app): State<Arc<AppState>>,
  Path(uid): Path<String>,
  Json(req): Json<UpdateDeviceReq>,
) -> Result<Json<json::Value>> {
  app.sv().device.update(&uid, &req.name).await?;
  Ok(Json(json::json!({ "success": true })))
}

pub async fn remove(
  State(app): State<Arc<AppState>>,
  Path(uid): Path<String>,
) -> Result<Json<json::Value>> {
  app.sv().device.remove(&uid).await?;
  Ok(Json(json::json!({ "success": true })))
}

#[derive(Debug, Deserialize)]
pub struct RecordStateReq {
  pub state: device_log::DeviceState,
}

pub async fn record_state(
  State(app): State<Arc<AppState>>,
  Path(uid): Path<String>,
  Json(req): Json<RecordStateReq>,
) -> Result<(StatusCode, Json<device_log::Model>)> {
  let log = app.sv().device.record_state(&uid, req.state).await?;
  Ok((StatusCode::CREATED, Json(log)))
}

pub async fn log_history(
  State(app): State<Arc<AppState>>,
  Path(uid): Path<String>,
  Query(params): Query<FindManyParams>,
) -> Result<Json<Vec<device_log::Model>>> {
  let options = params.parse::<DeviceLogSort>()?;
  let logs = app.sv().device.logs(&uid, &options).await?;
  Ok(Json(logs))
}

pub async fn log(
  State(app): State<Arc<AppState>>,
  Path(uid): Path<String>,
) -> Result<Json<device_log::Model>> {
  let log =
    app.sv().device.log_by_uid(&uid).await?.ok_or(Error::LogNotFound)?;
  Ok(Json(log))
}
