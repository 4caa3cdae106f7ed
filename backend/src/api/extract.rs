//! Request extractors

use crate::error::AppError;
use crate::models::ObjectId;
use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Path, Query},
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::convert::Infallible;

/// Message returned when an `:id` path segment is not an object identifier
pub const INVALID_ID_MESSAGE: &str = "Invalid ID.";

/// An `:id` path parameter that parsed as an [`ObjectId`]
///
/// Rejects with `400 Invalid ID.` before the handler runs, so malformed
/// identifiers never reach the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidId(pub ObjectId);

#[async_trait]
impl<S> FromRequestParts<S> for ValidId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;

        raw.parse::<ObjectId>()
            .map(ValidId)
            .map_err(|_| AppError::BadRequest(INVALID_ID_MESSAGE.to_string()))
    }
}

/// Query-string parameters that never reject a request
///
/// Only the first value of a repeated key is kept. A query string that does
/// not decode into `T` yields `T::default()`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LenientQuery<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for LenientQuery<T>
where
    T: DeserializeOwned + Default,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let pairs = Query::<Vec<(String, String)>>::try_from_uri(&parts.uri)
            .map(|Query(pairs)| pairs)
            .unwrap_or_default();
        Ok(LenientQuery(first_values(pairs)))
    }
}

fn first_values<T: DeserializeOwned + Default>(pairs: Vec<(String, String)>) -> T {
    let mut fields = Map::new();
    for (key, value) in pairs {
        fields.entry(key).or_insert(Value::String(value));
    }
    serde_json::from_value(Value::Object(fields)).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ListParams, SearchParams};
    use axum::http::Request;

    async fn extract<T: DeserializeOwned + Default>(uri: &str) -> T {
        let (mut parts, _) = Request::builder().uri(uri).body(()).unwrap().into_parts();
        let LenientQuery(params) = LenientQuery::<T>::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        params
    }

    #[tokio::test]
    async fn test_repeated_keys_keep_first_value() {
        let params: ListParams = extract("/api/bookings?limit=5&limit=abc&sort=patientName").await;
        assert_eq!(params.limit.as_deref(), Some("5"));
        assert_eq!(params.sort.as_deref(), Some("patientName"));

        let params: SearchParams = extract("/api/bookings/search?patient=a&patient=b").await;
        assert_eq!(params.patient.as_deref(), Some("a"));
        assert!(params.service.is_none());
    }

    #[tokio::test]
    async fn test_missing_query_gives_defaults() {
        let params: ListParams = extract("/api/bookings").await;
        assert!(params.limit.is_none());
        assert!(params.page.is_none());
    }

    #[tokio::test]
    async fn test_unknown_keys_are_ignored() {
        let params: ListParams = extract("/api/bookings?foo=bar&page=2").await;
        assert_eq!(params.page.as_deref(), Some("2"));
    }
}
