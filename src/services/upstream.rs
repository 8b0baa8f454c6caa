use std::time::Duration;

use bytes::Bytes;
use reqwest::header::HeaderMap;
use reqwest::RequestBuilder;
use serde::Serialize;
use tokio::time::timeout;

use crate::errors::UpstreamError;

/// Outbound HTTP client shared by all routes.
///
/// Every call is bounded by `timeout`, covering both the request and reading
/// the body. Non-2xx statuses are errors; there are no retries.
#[derive(Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    timeout: Duration,
}

impl UpstreamClient {
    pub fn new(request_timeout: Duration) -> Result<Self, UpstreamError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(request_timeout)
            .build()
            .map_err(|e| UpstreamError::Client(e.to_string()))?;
        Ok(Self {
            http,
            timeout: request_timeout,
        })
    }

    pub async fn get(&self, url: &str, headers: HeaderMap) -> Result<Bytes, UpstreamError> {
        self.send(self.http.get(url).headers(headers)).await
    }

    pub async fn get_with_query<Q>(&self, url: &str, query: &Q) -> Result<Bytes, UpstreamError>
    where
        Q: Serialize + ?Sized,
    {
        self.send(self.http.get(url).query(query)).await
    }

    pub async fn post_form<T>(&self, url: &str, form: &T) -> Result<Bytes, UpstreamError>
    where
        T: Serialize + ?Sized,
    {
        self.send(self.http.post(url).form(form)).await
    }

    async fn send(&self, request: RequestBuilder) -> Result<Bytes, UpstreamError> {
        let exchange = async {
            let response = request.send().await?.error_for_status()?;
            response.bytes().await
        };

        match timeout(self.timeout, exchange).await {
            Ok(result) => result.map_err(UpstreamError::from),
            Err(_) => Err(UpstreamError::Timeout),
        }
    }
}
