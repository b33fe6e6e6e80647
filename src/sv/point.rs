//! Point ledger: balance-checked deposits and withdrawals against the
//! user's authoritative balance, with a bounded embedded recent-list.

use serde::Deserialize;

use crate::{
  entity::{
    point_log::{self, PointKind},
    user::{self, EmbeddedPointLog, MAX_LENGTH_POINT_LOG},
  },
  find::{self, FindMany, SortKey},
  prelude::*,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PointLogSort {
  Uid,
  Kind,
  Amount,
  CreatedAt,
}

impl SortKey for PointLogSort {
  type Entity = point_log::Entity;

  fn column(&self) -> point_log::Column {
    match self {
      PointLogSort::Uid => point_log::Column::Uid,
      PointLogSort::Kind => point_log::Column::Kind,
      PointLogSort::Amount => point_log::Column::Amount,
      PointLogSort::CreatedAt => point_log::Column::CreatedAt,
    }
  }
}

pub struct Point<'a> {
  db: &'a DatabaseConnection,
}

impl<'a> Point<'a> {
  pub fn new(db: &'a DatabaseConnection) -> Self {
    Self { db }
  }

  /// Applies one ledger entry in a single transaction: balance check,
  /// immutable insert, embedded append with oldest-first eviction,
  /// balance update. An overdraft is rejected before any write; the
  /// dropped transaction rolls back whatever did not commit.
  pub async fn record(
    &self,
    user_uid: &str,
    kind: PointKind,
    amount: i64,
    reason: &str,
  ) -> Result<point_log::Model> {
    if amount <= 0 {
      return Err(Error::InvalidParameter("amount must be positive".into()));
    }

    let txn = self.db.begin().await?;

    let user = user::Entity::find_by_id(user_uid)
      .one(&txn)
      .await?
      .ok_or(Error::UserNotFound)?;

    let point_balance = match kind {
      PointKind::Deposit => user.point_balance + amount,
      PointKind::Withdraw => {
        if user.point_balance < amount {
          return Err(Error::InsufficientPoints);
        }
        user.point_balance - amount
      }
    };

    let log = point_log::ActiveModel {
      uid: Set(utils::object_id()),
      user_uid: Set(user_uid.to_string()),
      kind: Set(kind.clone()),
      amount: Set(amount),
      reason: Set(reason.to_string()),
      created_at: Set(Utc::now().naive_utc()),
    }
    .insert(&txn)
    .await?;

    let mut point_logs = user.point_logs.clone();
    utils::push_capped(
      &mut point_logs.0,
      EmbeddedPointLog {
        uid: log.uid.clone(),
        kind: log.kind.clone(),
        amount: log.amount,
        reason: log.reason.clone(),
        created_at: log.created_at,
      },
      MAX_LENGTH_POINT_LOG,
    );

    user::ActiveModel {
      point_balance: Set(point_balance),
      point_logs: Set(point_logs),
      ..user.into()
    }
    .update(&txn)
    .await?;

    txn.commit().await?;
    Ok(log)
  }

  pub async fn find_one(&self, uid: &str) -> Result<Option<point_log::Model>> {
    let log = point_log::Entity::find_by_id(uid).one(self.db).await?;
    Ok(log)
  }

  pub async fn find_many(
    &self,
    user_uid: Option<&str>,
    options: &FindMany<PointLogSort>,
  ) -> Result<Vec<point_log::Model>> {
    let mut query = point_log::Entity::find();
    if let Some(user_uid) = user_uid {
      query = query.filter(point_log::Column::UserUid.eq(user_uid));
    }

    let logs = find::paginate(query, point_log::Column::Uid, options)
      .all(self.db)
      .await?;
    Ok(logs)
  }
}

#[cfg(test)]
mod tests {
  use sea_orm::{ConnectOptions, DbBackend, Schema};

  use super::*;
  use crate::sv;

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
  async fn deposits_and_guarded_withdrawals() {
    let db = setup_test_db().await;
    let sv = Point::new(&db);

    let user = sv::User::new(&db).create("walker").await.unwrap();
    sv.record(&user.uid, PointKind::Deposit, 100, "admin").await.unwrap();
    sv.record(&user.uid, PointKind::Deposit, 50, "admin").await.unwrap();

    let err = sv.record(&user.uid, PointKind::Withdraw, 200, "admin").await;
    assert!(matches!(err, Err(Error::InsufficientPoints)));

    let user = user::Entity::find_by_id(&user.uid)
      .one(&db)
      .await
      .unwrap()
      .unwrap();
    assert_eq!(user.point_balance, 150);
    assert_eq!(user.point_logs.0.len(), 2);

    // the rejected withdrawal left no ledger row behind
    let rows = point_log::Entity::find().count(&db).await.unwrap();
    assert_eq!(rows, 2);
  }

  #[tokio::test]
  async fn withdraw_to_exactly_zero() {
    let db = setup_test_db().await;
    let sv = Point::new(&db);

    let user = sv::User::new(&db).create("walker").await.unwrap();
    sv.record(&user.uid, PointKind::Deposit, 30, "admin").await.unwrap();
    sv.record(&user.uid, PointKind::Withdraw, 30, "admin").await.unwrap();

    let user = user::Entity::find_by_id(&user.uid)
      .one(&db)
      .await
      .unwrap()
      .unwrap();
    assert_eq!(user.point_balance, 0);
  }

  #[tokio::test]
  async fn unknown_user_is_not_found() {
    let db = setup_test_db().await;
    let sv = Point::new(&db);

    assert!(matches!(
      sv.record("65a000000000000000000001", PointKind::Deposit, 1, "admin")
        .await,
      Err(Error::UserNotFound)
    ));
  }

  #[tokio::test]
  async fn non_positive_amounts_are_rejected() {
    let db = setup_test_db().await;
    let sv = Point::new(&db);

    let user = sv::User::new(&db).create("walker").await.unwrap();
    for amount in [0, -5] {
      assert!(matches!(
        sv.record(&user.uid, PointKind::Deposit, amount, "admin").await,
        Err(Error::InvalidParameter(_))
      ));
    }
  }

  #[tokio::test]
  async fn history_filters_by_user_and_paginates() {
    let db = setup_test_db().await;
    let sv = Point::new(&db);
    let users = sv::User::new(&db);

    let a = users.create("a").await.unwrap();
    let b = users.create("b").await.unwrap();

    for _ in 0..3 {
      sv.record(&a.uid, PointKind::Deposit, 10, "admin").await.unwrap();
    }
    sv.record(&b.uid, PointKind::Deposit, 10, "admin").await.unwrap();

    let all = sv.find_many(Some(&a.uid), &FindMany::default()).await.unwrap();
    assert_eq!(all.len(), 3);

    // inclusive cursor from the second entry
    let page = sv
      .find_many(Some(&a.uid), &FindMany::cursor(all[1].uid.clone()))
      .await
      .unwrap();
    assert_eq!(page.len(), 2);
    assert_eq!(page[0].uid, all[1].uid);

    let capped = sv.find_many(None, &FindMany::amount(2)).await.unwrap();
    assert_eq!(capped.len(), 2);
  }
}
