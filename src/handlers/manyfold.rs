//! Collection counts from a Manyfold instance, via OAuth client credentials.

use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use serde::Deserialize;

use crate::config::MANYFOLD_ACCEPT;
use crate::errors::{ApiError, ParseError};
use crate::models::{AppState, ManyfoldStats};

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CollectionPage {
    #[serde(rename = "totalItems")]
    total_items: Option<u64>,
}

pub async fn fetch(state: &AppState) -> Result<ManyfoldStats, ApiError> {
    let config = state.settings.manyfold.clone()?;

    tracing::info!("Fetching Manyfold OAuth token");
    let form = [
        ("grant_type", "client_credentials"),
        ("client_id", config.client_id.as_str()),
        ("client_secret", config.client_secret.as_str()),
        ("scope", config.scopes.as_str()),
    ];
    let raw = state
        .client
        .post_form(&format!("{}/oauth/token", config.base_url), &form)
        .await
        .map_err(ApiError::fetch("Manyfold token"))?;
    let token = access_token(&raw).map_err(ApiError::parse("Manyfold token"))?;
    let Some(token) = token else {
        tracing::error!("Failed to obtain access token from Manyfold");
        return Err(ApiError::MissingAccessToken);
    };
    tracing::info!("Successfully obtained Manyfold OAuth token");

    let mut headers = HeaderMap::new();
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|e| ApiError::Internal(format!("invalid access token: {e}")))?,
    );
    headers.insert(ACCEPT, HeaderValue::from_static(MANYFOLD_ACCEPT));

    let count = |collection: &'static str, stage: &'static str| {
        let url = format!("{}/{collection}", config.base_url);
        let headers = headers.clone();
        async move {
            let raw = state
                .client
                .get(&url, headers)
                .await
                .map_err(ApiError::fetch(stage))?;
            let total = total_items(&raw).map_err(ApiError::parse(stage))?;
            tracing::info!(stage, total, "Successfully fetched {stage}");
            Ok::<_, ApiError>(total)
        }
    };

    let (models, creators, collections) = futures::try_join!(
        count("models", "Manyfold models"),
        count("creators", "Manyfold creators"),
        count("collections", "Manyfold collections"),
    )?;

    Ok(ManyfoldStats {
        models,
        creators,
        collections,
    })
}

fn access_token(raw: &Bytes) -> Result<Option<String>, ParseError> {
    let response: TokenResponse = serde_json::from_slice(raw)?;
    Ok(response.access_token.filter(|t| !t.is_empty()))
}

/// `totalItems` from a Hydra-style collection page, 0 when absent.
pub fn total_items(raw: &[u8]) -> Result<u64, ParseError> {
    let page: CollectionPage = serde_json::from_slice(raw)?;
    Ok(page.total_items.unwrap_or(0))
}
