use std::convert::Infallible;
use std::future::Future;
use std::sync::Arc;

use bytes::Bytes;
use hyper::{Body, Response, StatusCode};
use serde::Serialize;
use serde_json::json;
use warp::Reply;

use crate::errors::{error_body, ApiError};
use crate::models::AppState;
use crate::services::{cache_response, get_cached_response, json_response};

pub mod bookstack;
pub mod manyfold;
pub mod racknerd;


pub async fn racknerd(cache_key: String, state: Arc<AppState>) -> Result<Response<Body>, Infallible> {
    serve_cached(&state, &cache_key, "racknerd", || racknerd::fetch(&state)).await
}

pub async fn manyfold(cache_key: String, state: Arc<AppState>) -> Result<Response<Body>, Infallible> {
    serve_cached(&state, &cache_key, "manyfold", || manyfold::fetch(&state)).await
}

pub async fn bookstack(cache_key: String, state: Arc<AppState>) -> Result<Response<Body>, Infallible> {
    serve_cached(&state, &cache_key, "bookstack", || bookstack::fetch(&state)).await
}

pub fn health() -> impl Reply {
    warp::reply::json(&json!({ "status": "healthy" }))
}

/// Serves `cache_key` from the cache, or runs `fetch` and stores whatever it
/// produced, errors included unless `cache_errors` is off.
///
/// Concurrent misses on the same key each run `fetch`; the last write wins.
pub async fn serve_cached<T, F, Fut>(
    state: &AppState,
    cache_key: &str,
    route: &'static str,
    fetch: F,
) -> Result<Response<Body>, Infallible>
where
    T: Serialize,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
{
    if let Some(response) = get_cached_response(&state.cache, cache_key).await {
        tracing::debug!(route, cache_key, "Cache hit");
        return Ok(response);
    }
    tracing::debug!(route, cache_key, "Cache miss");

    let (status, body) = match fetch().await.and_then(|stats| {
        serde_json::to_vec(&stats).map_err(|e| ApiError::Internal(e.to_string()))
    }) {
        Ok(body) => {
            tracing::info!(route, "Successfully fetched {route} data");
            (StatusCode::OK, Bytes::from(body))
        }
        Err(err) => {
            tracing::error!(route, error = %err, "Request to {route} failed");
            (err.status_code(), err.to_body())
        }
    };

    if status.is_success() || state.settings.cache_errors {
        cache_response(&state.cache, cache_key, status, body.clone()).await;
    }

    Ok(json_response(status, body))
}

pub async fn handle_rejection(err: warp::Rejection) -> Result<impl Reply, Infallible> {
    let (code, message) = if err.is_not_found() {
        (StatusCode::NOT_FOUND, "Not Found")
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed")
    } else {
        tracing::error!(rejection = ?err, "Unhandled rejection");
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    };

    Ok(json_response(code, error_body(message)))
}
