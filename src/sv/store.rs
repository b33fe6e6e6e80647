//! Store locations with radius and bounding-box search. SQLite carries
//! no geospatial index, so the SQL side only prefilters lon/lat ranges
//! and exact distances are resolved with the haversine formula.

use std::cmp::Ordering;

use serde::Deserialize;

use crate::{
  entity::{device, store},
  find::{self, FindMany, SearchOption, SortKey},
  geo::{Area, Coordinates, Radius, haversine_meters},
  prelude::*,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StoreSort {
  Uid,
  Name,
  CreatedAt,
}

impl SortKey for StoreSort {
  type Entity = store::Entity;

  fn column(&self) -> store::Column {
    match self {
      StoreSort::Uid => store::Column::Uid,
      StoreSort::Name => store::Column::Name,
      StoreSort::CreatedAt => store::Column::CreatedAt,
    }
  }
}

pub struct Store<'a> {
  db: &'a DatabaseConnection,
}

impl<'a> Store<'a> {
  pub fn new(db: &'a DatabaseConnection) -> Self {
    Self { db }
  }

  pub async fn create(
    &self,
    name: &str,
    description: &str,
    device_uid: &str,
    location: Coordinates,
  ) -> Result<store::Model> {
    let device = device::Entity::find_by_id(device_uid).one(self.db).await?;
    if device.is_none() {
      return Err(Error::DeviceNotFound);
    }

    let store = store::ActiveModel {
      uid: Set(utils::object_id()),
      name: Set(name.to_string()),
      description: Set(description.to_string()),
      device_uid: Set(device_uid.to_string()),
      lon: Set(location.lon()),
      lat: Set(location.lat()),
      created_at: Set(Utc::now().naive_utc()),
    };

    Ok(store.insert(self.db).await?)
  }

  pub async fn by_uid(&self, uid: &str) -> Result<Option<store::Model>> {
    let store = store::Entity::find_by_id(uid).one(self.db).await?;
    Ok(store)
  }

  pub async fn find_many(
    &self,
    options: &FindMany<StoreSort>,
  ) -> Result<Vec<store::Model>> {
    let stores =
      find::paginate(store::Entity::find(), store::Column::Uid, options)
        .all(self.db)
        .await?;
    Ok(stores)
  }

  /// Stores with `min <= distance(center) <= max`, nearest first unless
  /// an explicit order overrides. Inverted bounds fail before the store
  /// is touched.
  pub async fn find_nearby(
    &self,
    center: Coordinates,
    max_meters: f64,
    min_meters: Option<f64>,
    options: &FindMany<StoreSort>,
  ) -> Result<Vec<store::Model>> {
    let radius = Radius::new(center, max_meters, min_meters)?;
    let bounds = radius.bounding_box();

    let mut matched: Vec<_> = self
      .in_bounds(&bounds, options)
      .await?
      .into_iter()
      .filter(|store| radius.contains(Coordinates(store.lon, store.lat)))
      .collect();

    if options.order.is_empty() {
      matched.sort_by(|a, b| {
        let a = haversine_meters(center, Coordinates(a.lon, a.lat));
        let b = haversine_meters(center, Coordinates(b.lon, b.lat));
        a.partial_cmp(&b).unwrap_or(Ordering::Equal)
      });
    }

    matched.truncate(options.amount.limit(find::MAX_SEARCH_LENGTH) as usize);
    Ok(matched)
  }

  /// Stores inside the axis-aligned rectangle. No implicit distance
  /// order; identity order unless the options say otherwise.
  pub async fn find_in_area(
    &self,
    area: Area,
    options: &FindMany<StoreSort>,
  ) -> Result<Vec<store::Model>> {
    let (lon_min, lon_max) = area.lon_bounds();
    let (lat_min, lat_max) = area.lat_bounds();

    let query = store::Entity::find()
      .filter(store::Column::Lon.between(lon_min, lon_max))
      .filter(store::Column::Lat.between(lat_min, lat_max));

    let stores = find::paginate(query, store::Column::Uid, options)
      .all(self.db)
      .await?;
    Ok(stores)
  }

  pub async fn update(
    &self,
    uid: &str,
    name: Option<&str>,
    description: Option<&str>,
    location: Option<Coordinates>,
  ) -> Result<()> {
    let store = store::Entity::find_by_id(uid)
      .one(self.db)
      .await?
      .ok_or(Error::StoreNotFound)?;

    if name.is_none() && description.is_none() && location.is_none() {
      return Ok(());
    }

    let mut active: store::ActiveModel = store.into();
    if let Some(name) = name {
      active.name = Set(name.to_string());
    }
    if let Some(description) = description {
      active.description = Set(description.to_string());
    }
    if let Some(location) = location {
      active.lon = Set(location.lon());
      active.lat = Set(location.lat());
    }

    active.update(self.db).await?;
    Ok(())
  }

  pub async fn remove(&self, uid: &str) -> Result<()> {
    let result = store::Entity::delete_by_id(uid).exec(self.db).await?;
    if result.rows_affected == 0 {
      return Err(Error::StoreNotFound);
    }

    Ok(())
  }

  /// The shared prefilter: rectangle bounds plus the cursor filter and
  /// explicit orders. The limit is NOT applied here; radius search
  /// still has to drop the box corners first.
  async fn in_bounds(
    &self,
    bounds: &Area,
    options: &FindMany<StoreSort>,
  ) -> Result<Vec<store::Model>> {
    let (lon_min, lon_max) = bounds.lon_bounds();
    let (lat_min, lat_max) = bounds.lat_bounds();

    let mut query = store::Entity::find()
      .filter(store::Column::Lon.between(lon_min, lon_max))
      .filter(store::Column::Lat.between(lat_min, lat_max));

    match &options.search {
      SearchOption::Plain => {}
      SearchOption::Cursor(cursor) => {
        query = query.filter(store::Column::Uid.gte(cursor.as_str()));
      }
    }

    for (key, direction) in &options.order {
      query = query.order_by(key.column(), (*direction).into());
    }

    Ok(query.all(self.db).await?)
  }
}
