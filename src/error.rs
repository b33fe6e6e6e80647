//! Error types for the pacer server

use axum::{
  http::StatusCode,
  response::{IntoResponse, Response},
};
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(DbErr),

  #[error("user not found")]
  UserNotFound,

  #[error("device not found")]
  DeviceNotFound,

  #[error("store not found")]
  StoreNotFound,

  #[error("log not found")]
  LogNotFound,

  #[error("invalid parameter: {0}")]
  InvalidParameter(String),

  #[error("insufficient points")]
  InsufficientPoints,

  /// Unique-key race or a transaction the store refused to commit.
  /// Retryable by the caller; never retried here.
  #[error("write conflict")]
  Conflict,

  #[error("internal error: {0}")]
  Internal(String),
}

impl From<DbErr> for Error {
  fn from(err: DbErr) -> Self {
    if let Some(SqlErr::UniqueConstraintViolation(_)) = err.sql_err() {
      return Error::Conflict;
    }

    // sqlite reports an aborted transaction as a plain execution error
    // with a busy/locked message, not as a SqlErr
    let message = err.to_string();
    if message.contains("database is locked")
      || message.contains("database table is locked")
    {
      return Error::Conflict;
    }

    Error::Database(err)
  }
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    if let Error::Database(err) = &self {
      tracing::error!("database error: {err}");
    }

    let (status, message) = match &self {
      Error::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Database error".into()),
      Error::UserNotFound => (StatusCode::NOT_FOUND, "User not found".into()),
      Error::DeviceNotFound => (StatusCode::NOT_FOUND, "Device not found".into()),
      Error::StoreNotFound => (StatusCode::NOT_FOUND, "Store not found".into()),
      Error::LogNotFound => (StatusCode::NOT_FOUND, "Log not found".into()),
      Error::InvalidParameter(message) => {
        (StatusCode::UNPROCESSABLE_ENTITY, message.clone())
      }
      Error::InsufficientPoints => {
        (StatusCode::UNPROCESSABLE_ENTITY, "Insufficient points".into())
      }
      Error::Conflict => (StatusCode::CONFLICT, "Write conflict, retry".into()),
      Error::Internal(_) => {
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".into())
      }
    };

    let body = json::json!({
      "success": false,
      "error": message,
    });

    (status, axum::Json(body)).into_response()
  }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
  use sea_orm::RuntimeErr;

  use super::*;

  #[test]
  fn locked_database_maps_to_retryable_conflict() {
    for message in ["database is locked", "database table is locked"] {
      let err = DbErr::Exec(RuntimeErr::Internal(message.into()));
      assert!(matches!(Error::from(err), Error::Conflict), "{message}");
    }

    let err = DbErr::Custom("no such table: users".into());
    assert!(matches!(Error::from(err), Error::Database(_)));
  }
}
