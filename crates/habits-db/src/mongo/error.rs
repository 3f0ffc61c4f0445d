//! Error mapping and deadlines for MongoDB calls

use std::future::IntoFuture;
use std::time::Duration;

use mongodb::bson::oid::ObjectId;
use mongodb::error::{Error as MongoError, ErrorKind, WriteFailure};

use habits_core::error::DomainError;
use habits_core::traits::RepoResult;

/// Deadline for a single store call
pub(crate) const OP_TIMEOUT: Duration = Duration::from_secs(30);

/// Deadline for multi-document operations
pub(crate) const BULK_TIMEOUT: Duration = Duration::from_secs(60);

const DUPLICATE_KEY: i32 = 11000;

/// Convert a driver error to DomainError
pub(crate) fn map_mongo_error(e: MongoError) -> DomainError {
    match e.kind.as_ref() {
        ErrorKind::ServerSelection { .. } | ErrorKind::Io(_) => {
            DomainError::ConnectionError(e.to_string())
        }
        _ => DomainError::DatabaseError(e.to_string()),
    }
}

/// Check for a unique index violation and return the caller's error, or fall back
pub(crate) fn map_unique_violation<F>(e: MongoError, on_unique: F) -> DomainError
where
    F: FnOnce() -> DomainError,
{
    if let ErrorKind::Write(WriteFailure::WriteError(write_error)) = e.kind.as_ref() {
        if write_error.code == DUPLICATE_KEY {
            return on_unique();
        }
    }
    map_mongo_error(e)
}

/// Resolve a user id to its ObjectId
pub(crate) fn user_object_id(id: &str) -> RepoResult<ObjectId> {
    ObjectId::parse_str(id).map_err(|_| DomainError::InvalidId(id.to_string()))
}

/// Resolve a habit id; an id that is not an ObjectId cannot name any habit
pub(crate) fn habit_object_id(id: &str) -> Option<ObjectId> {
    ObjectId::parse_str(id).ok()
}

/// Await `fut`, failing with `Timeout` after `limit`
pub(crate) async fn within<T, F>(op: &'static str, limit: Duration, fut: F) -> RepoResult<T>
where
    F: IntoFuture<Output = RepoResult<T>>,
{
    tokio::time::timeout(limit, fut)
        .await
        .map_err(|_| DomainError::Timeout(op))?
}

/// Await a driver call under the standard deadline
pub(crate) async fn run<T, F>(op: &'static str, fut: F) -> RepoResult<T>
where
    F: IntoFuture<Output = mongodb::error::Result<T>>,
{
    within(op, OP_TIMEOUT, async move { fut.await.map_err(map_mongo_error) }).await
}
