use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
};
use serde::Deserialize;

use super::FindManyParams;
use crate::{
  entity::store,
  geo::{Area, Coordinates},
  prelude::*,
  state::AppState,
  sv::StoreSort,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateStoreReq {
  pub name: String,
  #[serde(default)]
  pub description: String,
  pub device_uid: String,
  /// `[lon, lat]`
  pub location: Coordinates,
}

pub async fn create(
  State(app): State<Arc<AppState>>,
  Json(req): Json<CreateStoreReq>,
) -> Result<(StatusCode, Json<store::Model>)> {
  let store = app
    .sv()
    .store
    .create(&req.name, &req.description, &req.device_uid, req.location)
    .await?;
  Ok((StatusCode::CREATED, Json(store)))
}

pub async fn find_many(
  State(app): State<Arc<AppState>>,
  Query(params): Query<FindManyParams>,
) -> Result<Json<Vec<store::Model>>> {
  let options = params.parse::<StoreSort>()?;
  let stores = app.sv().store.find_many(&options).await?;
  Ok(Json(stores))
}

pub async fn find_one(
  State(app): State<Arc<AppState>>,
  Path(uid): Path<String>,
) -> Result<Json<store::Model>> {
  let store = app.sv().store.by_uid(&uid).await?.ok_or(Error::StoreNotFound)?;
  Ok(Json(store))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbyQuery {
  pub lon: f64,
  pub lat: f64,
  pub max_distance: f64,
  pub min_distance: Option<f64>,
}

pub async fn nearby(
  State(app): State<Arc<AppState>>,
  Query(query): Query<NearbyQuery>,
  Query(params): Query<FindManyParams>,
) -> Result<Json<Vec<store::Model>>> {
  let options = params.parse::<StoreSort>()?;
  let stores = app
    .sv()
    .store
    .find_nearby(
      Coordinates(query.lon, query.lat),
      query.max_distance,
      query.min_distance,
      &options,
    )
    .await?;
  Ok(Json(stores))
}

/// Rectangle corners in query params; any two opposite corners work,
/// the bounds are normalized downstream.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaQuery {
  pub lon1: f64,
  pub lat1: f64,
  pub lon2: f64,
  pub lat2: f64,
}

pub async fn in_area(
  State(app): State<Arc<AppState>>,
  Query(query): Query<AreaQuery>,
  Query(params): Query<FindManyParams>,
) -> Result<Json<Vec<store::Model>>> {
  let options = params.parse::<StoreSort>()?;
  let area = Area(
    Coordinates(query.lon1, query.lat1),
    Coordinates(query.lon2, query.lat2),
  );
  let stores = app.sv().store.find_in_area(area, &options).await?;
  Ok(Json(stores))
}

#[derive(Debug, Deserialize)]
pub struct UpdateStoreReq {
  pub name: Option<String>,
  pub description: Option<String>,
  pub location: Option<Coordinates>,
}

pub async fn update(
  State(app): State<Arc<AppState>>,
  Path(uid): Path<String>,
  Json(req): Json<UpdateStoreReq>,
) -> Result<Json<json::Value>> {
  app
    .sv()
    .store
    .update(&uid, req.name.as_deref(), req.description.as_deref(), req.location)
    .await?;
  Ok(Json(json::json!({ "success": true })))
}

pub async fn remove(
  State(app): State<Arc<AppState>>,
  Path(uid): Path<String>,
) -> Result<Json<json::Value>> {
  app.sv().store.remove(&uid).await?;
  Ok(Json(json::json!({ "success": true })))
}
