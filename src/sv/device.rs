//! Devices and their connect/disconnect history. The device row carries
//! the bounded recent copy; `device_logs` keeps everything.

use serde::{Deserialize, Serialize};

use crate::{
  entity::{
    device::{self, EmbeddedStateLog, MAX_LENGTH_DEVICE_LOG},
    device_log::{self, DeviceState},
  },
  find::{self, FindMany, Recent, SortKey},
  prelude::*,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DeviceSort {
  Uid,
  Name,
  MacAddress,
  CreatedAt,
}

impl SortKey for DeviceSort {
  type Entity = device::Entity;

  fn column(&self) -> device::Column {
    match self {
      DeviceSort::Uid => device::Column::Uid,
      DeviceSort::Name => device::Column::Name,
      DeviceSort::MacAddress => device::Column::MacAddress,
      DeviceSort::CreatedAt => device::Column::CreatedAt,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DeviceLogSort {
  Uid,
  State,
  CreatedAt,
}

impl SortKey for DeviceLogSort {
  type Entity = device_log::Entity;

  fn column(&self) -> device_log::Column {
    match self {
      DeviceLogSort::Uid => device_log::Column::Uid,
      DeviceLogSort::State => device_log::Column::State,
      DeviceLogSort::CreatedAt => device_log::Column::CreatedAt,
    }
  }
}

#[derive(Debug, Serialize)]
pub struct DeviceView {
  pub uid: String,
  pub name: String,
  pub mac_address: String,
  pub recent_logs: Recent<EmbeddedStateLog>,
  pub created_at: DateTime,
}

impl DeviceView {
  fn new(model: device::Model, next: Option<String>) -> Self {
    Self {
      uid: model.uid,
      name: model.name,
      mac_address: model.mac_address,
      recent_logs: Recent::new(model.recent_logs.0, next),
      created_at: model.created_at,
    }
  }
}

pub struct Device<'a> {
  db: &'a DatabaseConnection,
}

impl<'a> Device<'a> {
  pub fn new(db: &'a DatabaseConnection) -> Self {
    Self { db }
  }

  /// A duplicate mac address surfaces as `Error::Conflict` through the
  /// unique constraint.
  pub async fn create(&self, name: &str, mac_address: &str) -> Result<device::Model> {
    let device = device::ActiveModel {
      uid: Set(utils::object_id()),
      name: Set(name.to_string()),
      mac_address: Set(mac_address.to_string()),
      recent_logs: Set(device::StateLogs::default()),
      created_at: Set(Utc::now().naive_utc()),
    };

    Ok(device.insert(self.db).await?)
  }

  /// Transactional state-change insert: unbounded history row plus the
  /// bounded embedded copy, with the mac address denormalized from the
  /// device at insert time.
  pub async fn record_state(
    &self,
    device_uid: &str,
    state: DeviceState,
  ) -> Result<device_log::Model> {
    let txn = self.db.begin().await?;

    let device = device::Entity::find_by_id(device_uid)
      .one(&txn)
      .await?
      .ok_or(Error::DeviceNotFound)?;

    let log = device_log::ActiveModel {
      uid: Set(utils::object_id()),
      device_uid: Set(device_uid.to_string()),
      state: Set(state.clone()),
      mac_address: Set(device.mac_address.clone()),
      created_at: Set(Utc::now().naive_utc()),
    }
    .insert(&txn)
    .await?;

    let mut recent_logs = device.recent_logs.clone();
    utils::push_capped(
      &mut recent_logs.0,
      EmbeddedStateLog {
        uid: log.uid.clone(),
        state: log.state.clone(),
        created_at: log.created_at,
      },
      MAX_LENGTH_DEVICE_LOG,
    );

    device::ActiveModel { recent_logs: Set(recent_logs), ..device.into() }
      .update(&txn)
      .await?;

    txn.commit().await?;
    Ok(log)
  }

  pub async fn by_uid(&self, uid: &str) -> Result<Option<DeviceView>> {
    let Some(device) = device::Entity::find_by_id(uid).one(self.db).await?
    else {
      return Ok(None);
    };

    let next = self.continuation(&device.uid).await?;
    Ok(Some(DeviceView::new(device, next)))
  }

  pub async fn find_many(
    &self,
    options: &FindMany<DeviceSort>,
  ) -> Result<Vec<DeviceView>> {
    let devices =
      find::paginate(device::Entity::find(), device::Column::Uid, options)
        .all(self.db)
        .await?;

    let mut views = Vec::with_capacity(devices.len());
    for device in devices {
      let next = self.continuation(&device.uid).await?;
      views.push(DeviceView::new(device, next));
    }

    Ok(views)
  }

  pub async fn update(&self, uid: &str, name: &str) -> Result<()> {
    let device = device::Entity::find_by_id(uid)
      .one(self.db)
      .await?
      .ok_or(Error::DeviceNotFound)?;

    device::ActiveModel { name: Set(name.to_string()), ..device.into() }
      .update(self.db)
      .await?;

    Ok(())
  }

  pub async fn remove(&self, uid: &str) -> Result<()> {
    let result = device::Entity::delete_by_id(uid).exec(self.db).await?;
    if result.rows_affected == 0 {
      return Err(Error::DeviceNotFound);
    }

    Ok(())
  }

  pub async fn log_by_uid(&self, uid: &str) -> Result<Option<device_log::Model>> {
    let log = device_log::Entity::find_by_id(uid).one(self.db).await?;
    Ok(log)
  }

  pub async fn logs(
    &self,
    device_uid: &str,
    options: &FindMany<DeviceLogSort>,
  ) -> Result<Vec<device_log::Model>> {
    let query = device_log::Entity::find()
      .filter(device_log::Column::DeviceUid.eq(device_uid));

    let logs = find::paginate(query, device_log::Column::Uid, options)
      .all(self.db)
      .await?;
    Ok(logs)
  }

  /// Same probe as the user ledger, against the unbounded log history.
  async fn continuation(&self, device_uid: &str) -> Result<Option<String>> {
    let probe = device_log::Entity::find()
      .filter(device_log::Column::DeviceUid.eq(device_uid))
      .order_by_desc(device_log::Column::Uid)
      .offset(MAX_LENGTH_DEVICE_LOG as u64 - 1)
      .limit(2)
      .all(self.db)
      .await?;

    Ok((probe.len() == 2).then(|| probe[0].uid.clone()))
  }
}

#[cfg(test)]
mod tests {
  use sea_orm::{ConnectOptions, DbBackend, Schema};

  use super::*;

  async fn setup_test_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1);
    let db = Database::connect(options).await.unwrap();

    let schema = Schema::new(DbBackend::Sqlite);

    let stmt = schema.create_table_from_entity(device::Entity);
    db.execute(db.get_database_backend().build(&stmt)).await.unwrap();

    let stmt = schema.create_table_from_entity(device_log::Entity);
    db.execute(db.get_database_backend().build(&stmt)).await.unwrap();

    db
  }

  #[tokio::test]
  async fn duplicate_mac_conflicts() {
    let db = setup_test_db().await;
    let sv = Device::new(&db);

    sv.create("kiosk-1", "aa:bb:cc:dd:ee:01").await.unwrap();
    assert!(matches!(
      sv.create("kiosk-2", "aa:bb:cc:dd:ee:01").await,
      Err(Error::Conflict)
    ));
  }

  #[tokio::test]
  async fn state_logs_record_into_both_collections() {
    let db = setup_test_db().await;
    let sv = Device::new(&db);

    let device = sv.create("kiosk-1", "aa:bb:cc:dd:ee:01").await.unwrap();

    let log =
      sv.record_state(&device.uid, DeviceState::Connected).await.unwrap();
    assert_eq!(log.mac_address, device.mac_address);
    sv.record_state(&device.uid, DeviceState::Disconnected).await.unwrap();

    let view = sv.by_uid(&device.uid).await.unwrap().unwrap();
    assert_eq!(view.recent_logs.array().len(), 2);
    assert_eq!(view.recent_logs.array()[0].state, DeviceState::Connected);
    assert_eq!(view.recent_logs.next(), None);

    let history = sv.logs(&device.uid, &FindMany::default()).await.unwrap();
    assert_eq!(history.len(), 2);

    let found = sv.log_by_uid(&history[0].uid).await.unwrap().unwrap();
    assert_eq!(found.uid, history[0].uid);
  }

  #[tokio::test]
  async fn unknown_device_rejects_logs() {
    let db = setup_test_db().await;
    let sv = Device::new(&db);

    assert!(matches!(
      sv.record_state("65a000000000000000000001", DeviceState::Connected).await,
      Err(Error::DeviceNotFound)
    ));
    assert_eq!(device_log::Entity::find().count(&db).await.unwrap(), 0);
  }

  #[tokio::test]
  async fn log_listing_paginates_per_device() {
    let db = setup_test_db().await;
    let sv = Device::new(&db);

    let a = sv.create("kiosk-1", "aa:bb:cc:dd:ee:01").await.unwrap();
    let b = sv.create("kiosk-2", "aa:bb:cc:dd:ee:02").await.unwrap();

    for _ in 0..3 {
      sv.record_state(&a.uid, DeviceState::Connected).await.unwrap();
    }
    sv.record_state(&b.uid, DeviceState::Connected).await.unwrap();

    let logs = sv.logs(&a.uid, &FindMany::default()).await.unwrap();
    assert_eq!(logs.len(), 3);

    let page =
      sv.logs(&a.uid, &FindMany::cursor(logs[2].uid.clone())).await.unwrap();
    assert_eq!(page.len(), 1);

    let capped = sv.logs(&a.uid, &FindMany::amount(2)).await.unwrap();
    assert_eq!(capped.len(), 2);
  }

  #[tokio::test]
  async fn update_and_remove() {
    let db = setup_test_db().await;
    let sv = Device::new(&db);

    let device = sv.create("kiosk-1", "aa:bb:cc:dd:ee:01").await.unwrap();
    sv.update(&device.uid, "lobby kiosk").await.unwrap();

    let view = sv.by_uid(&device.uid).await.unwrap().unwrap();
    assert_eq!(view.name, "lobby kiosk");

    sv.remove(&device.uid).await.unwrap();
    assert!(matches!(sv.remove(&device.uid).await, Err(Error::DeviceNotFound)));
  }
}
