use std::convert::Infallible;
use std::sync::Arc;

use warp::path::FullPath;
use warp::{Filter, Reply};

use crate::handlers;
use crate::middleware::access_log;
use crate::models::AppState;

/// The full API: `/racknerd`, `/manyfold`, `/bookstack` behind the response
/// cache, plus an uncached `/health`.
pub fn routes(
    state: Arc<AppState>,
) -> impl Filter<Extract = (impl Reply,), Error = Infallible> + Clone {
    let health = warp::path("health")
        .and(warp::path::end())
        .and(warp::get())
        .map(handlers::health);

    let racknerd = warp::path("racknerd")
        .and(warp::path::end())
        .and(warp::get())
        .and(cache_key())
        .and(with_state(state.clone()))
        .and_then(handlers::racknerd);

    let manyfold = warp::path("manyfold")
        .and(warp::path::end())
        .and(warp::get())
        .and(cache_key())
        .and(with_state(state.clone()))
        .and_then(handlers::manyfold);

    let bookstack = warp::path("bookstack")
        .and(warp::path::end())
        .and(warp::get())
        .and(cache_key())
        .and(with_state(state))
        .and_then(handlers::bookstack);

    health
        .or(racknerd)
        .or(manyfold)
        .or(bookstack)
        .recover(handlers::handle_rejection)
        .with(access_log())
}

fn with_state(
    state: Arc<AppState>,
) -> impl Filter<Extract = (Arc<AppState>,), Error = Infallible> + Clone {
    warp::any().map(move || state.clone())
}

/// Request path plus `?query` when one is present.
fn cache_key() -> impl Filter<Extract = (String,), Error = Infallible> + Clone {
    warp::path::full()
        .and(
            warp::query::raw()
                .or_else(|_| async { Ok::<(String,), Infallible>((String::new(),)) }),
        )
        .map(|path: FullPath, query: String| {
            if query.is_empty() {
                path.as_str().to_string()
            } else {
                format!("{}?{}", path.as_str(), query)
            }
        })
}
