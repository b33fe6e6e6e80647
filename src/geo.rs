//! Planar query shapes over (longitude, latitude) points.
//!
//! SQLite has no geospatial index, so these types only describe the
//! shapes; `sv::Store` prefilters with plain lon/lat ranges in SQL and
//! resolves exact distances here.

use serde::{Deserialize, Serialize};

use crate::prelude::*;

const EARTH_RADIUS_METERS: f64 = 6_371_000.0;
const METERS_PER_DEGREE_LAT: f64 = 111_320.0;

/// `[longitude, latitude]`, the GeoJSON axis order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates(pub f64, pub f64);

impl Coordinates {
  pub fn lon(&self) -> f64 {
    self.0
  }

  pub fn lat(&self) -> f64 {
    self.1
  }
}

/// Great-circle distance in meters.
pub fn haversine_meters(a: Coordinates, b: Coordinates) -> f64 {
  let lat_a = a.lat().to_radians();
  let lat_b = b.lat().to_radians();
  let d_lat = (b.lat() - a.lat()).to_radians();
  let d_lon = (b.lon() - a.lon()).to_radians();

  let h = (d_lat / 2.0).sin().powi(2)
    + lat_a.cos() * lat_b.cos() * (d_lon / 2.0).sin().powi(2);

  2.0 * EARTH_RADIUS_METERS * h.sqrt().asin()
}

/// Axis-aligned rectangle given as `[top_left, bottom_right]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Area(pub Coordinates, pub Coordinates);

impl Area {
  /// The closed 5-point ring TL, TR, BR, BL, TL.
  pub fn ring(&self) -> [[f64; 2]; 5] {
    let Area(top_left, bottom_right) = *self;
    [
      [top_left.lon(), top_left.lat()],
      [bottom_right.lon(), top_left.lat()],
      [bottom_right.lon(), bottom_right.lat()],
      [top_left.lon(), bottom_right.lat()],
      [top_left.lon(), top_left.lat()],
    ]
  }

  pub fn lon_bounds(&self) -> (f64, f64) {
    let (a, b) = (self.0.lon(), self.1.lon());
    (a.min(b), a.max(b))
  }

  pub fn lat_bounds(&self) -> (f64, f64) {
    let (a, b) = (self.0.lat(), self.1.lat());
    (a.min(b), a.max(b))
  }

  pub fn contains(&self, point: Coordinates) -> bool {
    let (lon_min, lon_max) = self.lon_bounds();
    let (lat_min, lat_max) = self.lat_bounds();

    (lon_min..=lon_max).contains(&point.lon())
      && (lat_min..=lat_max).contains(&point.lat())
  }
}

/// Ring search around a center: `min_meters <= distance <= max_meters`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Radius {
  pub center: Coordinates,
  pub min_meters: f64,
  pub max_meters: f64,
}

impl Radius {
  pub fn new(
    center: Coordinates,
    max_meters: f64,
    min_meters: Option<f64>,
  ) -> Result<Self> {
    let min_meters = min_meters.unwrap_or(0.0);
    if min_meters > max_meters {
      return Err(Error::InvalidParameter(format!(
        "min distance {min_meters} exceeds max distance {max_meters}"
      )));
    }
    if max_meters < 0.0 || min_meters < 0.0 {
      return Err(Error::InvalidParameter("distance must not be negative".into()));
    }

    Ok(Self { center, min_meters, max_meters })
  }

  pub fn contains(&self, point: Coordinates) -> bool {
    let distance = haversine_meters(self.center, point);
    distance >= self.min_meters && distance <= self.max_meters
  }

  /// Degree rectangle that covers the outer circle, used as the SQL
  /// prefilter. Longitude degrees shrink with latitude; the cosine is
  /// clamped away from zero so polar centers degrade to a wide box
  /// instead of dividing by zero.
  pub fn bounding_box(&self) -> Area {
    let d_lat = self.max_meters / METERS_PER_DEGREE_LAT;
    let shrink = self.center.lat().to_radians().cos().abs().max(1e-6);
    let d_lon = self.max_meters / (METERS_PER_DEGREE_LAT * shrink);

    Area(
      Coordinates(self.center.lon() - d_lon, self.center.lat() + d_lat),
      Coordinates(self.center.lon() + d_lon, self.center.lat() - d_lat),
    )
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const SEOUL: Coordinates = Coordinates(126.9780, 37.5665);
  const BUSAN: Coordinates = Coordinates(129.0756, 35.1796);

  #[test]
  fn haversine_known_distance() {
    // Seoul to Busan is roughly 325 km
    let distance = haversine_meters(SEOUL, BUSAN);
    assert!((310_000.0..340_000.0).contains(&distance), "{distance}");

    assert_eq!(haversine_meters(SEOUL, SEOUL), 0.0);
  }

  #[test]
  fn ring_is_closed_and_rectangular() {
    let area = Area(Coordinates(126.0, 38.0), Coordinates(128.0, 36.0));
    let ring = area.ring();

    assert_eq!(ring[0], ring[4]);
    assert_eq!(ring[1], [128.0, 38.0]);
    assert_eq!(ring[3], [126.0, 36.0]);
  }

  #[test]
  fn area_contains_normalizes_corners() {
    // same rectangle with swapped corners
    let a = Area(Coordinates(126.0, 38.0), Coordinates(128.0, 36.0));
    let b = Area(Coordinates(128.0, 36.0), Coordinates(126.0, 38.0));

    for area in [a, b] {
      assert!(area.contains(SEOUL));
      assert!(!area.contains(BUSAN));
    }
  }

  #[test]
  fn radius_rejects_inverted_bounds() {
    assert!(matches!(
      Radius::new(SEOUL, 100.0, Some(500.0)),
      Err(Error::InvalidParameter(_))
    ));
    assert!(Radius::new(SEOUL, 500.0, Some(100.0)).is_ok());
    assert!(Radius::new(SEOUL, 500.0, None).is_ok());
  }

  #[test]
  fn bounding_box_covers_radius() {
    let radius = Radius::new(SEOUL, 355_000.0, None).unwrap();
    let bounds = radius.bounding_box();

    assert!(bounds.contains(BUSAN));
    assert!(radius.contains(BUSAN));
    // Tokyo is outside both
    assert!(!radius.contains(Coordinates(139.6917, 35.6895)));
  }
}
