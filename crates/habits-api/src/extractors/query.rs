//! Habit id query parameter extractor

use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use serde::Deserialize;

use crate::response::ApiError;

#[derive(Debug, Deserialize)]
struct IdQuery {
    id: Option<String>,
}

/// Non-empty `id` query parameter
#[derive(Debug, Clone)]
pub struct HabitId(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for HabitId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Query(query) = Query::<IdQuery>::try_from_uri(&parts.uri)
            .map_err(|e| ApiError::invalid_query(e.body_text()))?;

        query
            .id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .map(HabitId)
            .ok_or(ApiError::MissingId)
    }
}
