//! User accounts. Reads return the bounded embedded ledger copy tagged
//! with a continuation cursor into the unbounded history when entries
//! have been evicted.

use serde::{Deserialize, Serialize};

use crate::{
  entity::{
    point_log,
    user::{self, EmbeddedPointLog, MAX_LENGTH_POINT_LOG},
  },
  find::{self, FindMany, Recent, SortKey},
  prelude::*,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UserSort {
  Uid,
  Nickname,
  PointBalance,
  CreatedAt,
}

impl SortKey for UserSort {
  type Entity = user::Entity;

  fn column(&self) -> user::Column {
    match self {
      UserSort::Uid => user::Column::Uid,
      UserSort::Nickname => user::Column::Nickname,
      UserSort::PointBalance => user::Column::PointBalance,
      UserSort::CreatedAt => user::Column::CreatedAt,
    }
  }
}

#[derive(Debug, Serialize)]
pub struct UserView {
  pub uid: String,
  pub nickname: String,
  pub point_balance: i64,
  pub point_logs: Recent<EmbeddedPointLog>,
  pub created_at: DateTime,
}

impl UserView {
  fn new(model: user::Model, next: Option<String>) -> Self {
    Self {
      uid: model.uid,
      nickname: model.nickname,
      point_balance: model.point_balance,
      point_logs: Recent::new(model.point_logs.0, next),
      created_at: model.created_at,
    }
  }
}

pub struct User<'a> {
  db: &'a DatabaseConnection,
}

impl<'a> User<'a> {
  pub fn new(db: &'a DatabaseConnection) -> Self {
    Self { db }
  }

  pub async fn create(&self, nickname: &str) -> Result<user::Model> {
    let user = user::ActiveModel {
      uid: Set(utils::object_id()),
      nickname: Set(nickname.to_string()),
      point_balance: Set(0),
      point_logs: Set(user::PointLogs::default()),
      created_at: Set(Utc::now().naive_utc()),
    };

    Ok(user.insert(self.db).await?)
  }

  pub async fn exists(&self, uid: &str) -> Result<bool> {
    let count = user::Entity::find_by_id(uid).count(self.db).await?;
    Ok(count > 0)
  }

  pub async fn by_uid(&self, uid: &str) -> Result<Option<UserView>> {
    let Some(user) = user::Entity::find_by_id(uid).one(self.db).await? else {
      return Ok(None);
    };

    let next = self.continuation(&user.uid).await?;
    Ok(Some(UserView::new(user, next)))
  }

  pub async fn find_many(
    &self,
    options: &FindMany<UserSort>,
  ) -> Result<Vec<UserView>> {
    let users =
      find::paginate(user::Entity::find(), user::Column::Uid, options)
        .all(self.db)
        .await?;

    let mut views = Vec::with_capacity(users.len());
    for user in users {
      let next = self.continuation(&user.uid).await?;
      views.push(UserView::new(user, next));
    }

    Ok(views)
  }

  pub async fn update(&self, uid: &str, nickname: &str) -> Result<()> {
    let user = user::Entity::find_by_id(uid)
      .one(self.db)
      .await?
      .ok_or(Error::UserNotFound)?;

    user::ActiveModel { nickname: Set(nickname.to_string()), ..user.into() }
      .update(self.db)
      .await?;

    Ok(())
  }

  pub async fn remove(&self, uid: &str) -> Result<()> {
    let result = user::Entity::delete_by_id(uid).exec(self.db).await?;
    if result.rows_affected == 0 {
      return Err(Error::UserNotFound);
    }

    Ok(())
  }

  /// Probe of the unbounded ledger: reading descending past `cap - 1`
  /// yields two rows exactly when the history outgrew the embedded
  /// copy; the first of them is the successor of the newest evicted
  /// entry, which becomes the continuation cursor.
  async fn continuation(&self, user_uid: &str) -> Result<Option<String>> {
    let probe = point_log::Entity::find()
      .filter(point_log::Column::UserUid.eq(user_uid))
      .order_by_desc(point_log::Column::Uid)
      .offset(MAX_LENGTH_POINT_LOG as u64 - 1)
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
  use crate::{entity::point_log::PointKind, sv};

  async fn setup_test_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1);
    let db = Database::connect(options).await.unwrap();

    let schema = Schema::new(DbBackend::Sqlite);

    let stmt = schema.create_table_from_entity(user::Entity);
    db.execute(db.get_database_backend().build(&stmt)).await.unwrap();

    let stmt = schema.create_table_from_entity(point_log::Entity);
    db.execute(db.get_database_backend().build(&stmt)).await.unwrap();

    db
  }

  #[tokio::test]
  async fn create_and_read_back() {
    let db = setup_test_db().await;
    let sv = User::new(&db);

    let user = sv.create("walker").await.unwrap();
    assert_eq!(user.uid.len(), 24);
    assert_eq!(user.point_balance, 0);

    let view = sv.by_uid(&user.uid).await.unwrap().unwrap();
    assert_eq!(view.nickname, "walker");
    assert!(view.point_logs.array().is_empty());
    assert_eq!(view.point_logs.next(), None);

    assert!(sv.exists(&user.uid).await.unwrap());
    assert!(sv.by_uid("65a000000000000000000001").await.unwrap().is_none());
  }

  #[tokio::test]
  async fn update_and_remove() {
    let db = setup_test_db().await;
    let sv = User::new(&db);

    let user = sv.create("walker").await.unwrap();
    sv.update(&user.uid, "runner").await.unwrap();

    let view = sv.by_uid(&user.uid).await.unwrap().unwrap();
    assert_eq!(view.nickname, "runner");

    sv.remove(&user.uid).await.unwrap();
    assert!(matches!(sv.remove(&user.uid).await, Err(Error::UserNotFound)));
    assert!(matches!(
      sv.update(&user.uid, "ghost").await,
      Err(Error::UserNotFound)
    ));
  }

  #[tokio::test]
  async fn find_many_orders_and_pages() {
    let db = setup_test_db().await;
    let sv = User::new(&db);

    for nickname in ["carol", "alice", "bob"] {
      sv.create(nickname).await.unwrap();
    }

    let mut options = FindMany::default();
    options.order.insert(UserSort::Nickname, find::Direction::Desc);
    let views = sv.find_many(&options).await.unwrap();
    let nicknames: Vec<_> =
      views.iter().map(|view| view.nickname.as_str()).collect();
    assert_eq!(nicknames, ["carol", "bob", "alice"]);

    let all = sv.find_many(&FindMany::default()).await.unwrap();
    let page = sv.find_many(&FindMany::cursor(all[1].uid.clone())).await.unwrap();
    assert_eq!(page.len(), 2);
    assert_eq!(page[0].uid, all[1].uid);
  }

  #[tokio::test]
  async fn embedded_ledger_evicts_past_capacity() {
    let db = setup_test_db().await;
    let sv = User::new(&db);
    let points = sv::Point::new(&db);

    let user = sv.create("walker").await.unwrap();

    let mut uids = Vec::new();
    for _ in 0..MAX_LENGTH_POINT_LOG {
      let log =
        points.record(&user.uid, PointKind::Deposit, 1, "admin").await.unwrap();
      uids.push(log.uid);
    }

    // exactly at capacity: everything embedded, no continuation
    let view = sv.by_uid(&user.uid).await.unwrap().unwrap();
    assert_eq!(view.point_logs.array().len(), MAX_LENGTH_POINT_LOG);
    assert_eq!(view.point_logs.next(), None);

    // one past capacity: the oldest entry is evicted and the cursor
    // points at its successor
    points.record(&user.uid, PointKind::Deposit, 1, "admin").await.unwrap();

    let view = sv.by_uid(&user.uid).await.unwrap().unwrap();
    assert_eq!(view.point_logs.array().len(), MAX_LENGTH_POINT_LOG);
    assert_eq!(view.point_logs.array()[0].uid, uids[1]);
    assert_eq!(view.point_logs.next(), Some(uids[1].as_str()));
  }
}
