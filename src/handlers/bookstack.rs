use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::Deserialize;

use crate::errors::{ApiError, ParseError};
use crate::models::{AppState, BookStackStats};

#[derive(Debug, Deserialize)]
struct Listing {
    total: Option<u64>,
}

pub async fn fetch(state: &AppState) -> Result<BookStackStats, ApiError> {
    let config = state.settings.bookstack.clone()?;

    tracing::info!("Fetching BookStack data");
    let mut headers = HeaderMap::new();
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Token {}", config.api_token))
            .map_err(|e| ApiError::Internal(format!("invalid BookStack token: {e}")))?,
    );

    let count = |listing: &'static str, stage: &'static str| {
        let url = format!("{}/api/{listing}", config.base_url);
        let headers = headers.clone();
        async move {
            let raw = state
                .client
                .get(&url, headers)
                .await
                .map_err(ApiError::fetch(stage))?;
            total(&raw).map_err(ApiError::parse(stage))
        }
    };

    let (total_books, total_pages) = futures::try_join!(
        count("books", "BookStack books"),
        count("pages", "BookStack pages"),
    )?;

    Ok(BookStackStats {
        total_books,
        total_pages,
    })
}

/// `total` from a BookStack listing response, 0 when absent.
pub fn total(raw: &[u8]) -> Result<u64, ParseError> {
    let listing: Listing = serde_json::from_slice(raw)?;
    Ok(listing.total.unwrap_or(0))
}
