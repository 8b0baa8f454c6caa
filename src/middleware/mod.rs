use warp::log::{Info, Log};


/// Access log: one line per request with method, path, status and latency.
pub fn access_log() -> Log<impl Fn(Info<'_>) + Copy> {
    warp::log::custom(|info: Info<'_>| {
        tracing::info!(
            target: "homepage_api::access",
            method = %info.method(),
            path = info.path(),
            status = info.status().as_u16(),
            elapsed_ms = info.elapsed().as_millis() as u64,
            "{} {} {}",
            info.method(),
            info.path(),
            info.status().as_u16(),
        );
    })
}
