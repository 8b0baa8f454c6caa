use bytes::Bytes;
use hyper::StatusCode;
use serde_json::json;

/// A required credential is absent. Detected before any network call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{}", missing_message(.0))]
    Missing(Vec<&'static str>),
}

fn missing_message(vars: &[&str]) -> String {
    let plural = if vars.len() == 1 { "" } else { "s" };
    format!("{} environment variable{plural} not set", vars.join(", "))
}

/// Transport-level failure talking to an upstream.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("request timed out")]
    Timeout,
    #[error("connection error: {0}")]
    Connection(String),
    #[error("upstream returned HTTP {0}")]
    Status(u16),
    #[error("client error: {0}")]
    Client(String),
}

impl From<reqwest::Error> for UpstreamError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if let Some(status) = err.status() {
            Self::Status(status.as_u16())
        } else if err.is_builder() {
            Self::Client(err.to_string())
        } else {
            Self::Connection(err.to_string())
        }
    }
}

/// The upstream answered, but not in the expected shape.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("invalid usage string {raw:?}: {reason}")]
    Usage { raw: String, reason: String },
    #[error("invalid XML: {0}")]
    Xml(String),
    #[error("invalid JSON: {0}")]
    Json(String),
}

impl From<serde_json::Error> for ParseError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Terminal failure of a route handler. Always rendered as a 500.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Failed to fetch {stage}: {source}")]
    Fetch {
        stage: &'static str,
        source: UpstreamError,
    },
    #[error("Failed to parse {stage}: {source}")]
    Parse {
        stage: &'static str,
        source: ParseError,
    },
    #[error("Failed to obtain access token")]
    MissingAccessToken,
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn fetch(stage: &'static str) -> impl FnOnce(UpstreamError) -> Self {
        move |source| Self::Fetch { stage, source }
    }

    pub fn parse(stage: &'static str) -> impl FnOnce(ParseError) -> Self {
        move |source| Self::Parse { stage, source }
    }

    pub fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    pub fn to_body(&self) -> Bytes {
        error_body(&self.to_string())
    }
}

pub fn error_body(message: &str) -> Bytes {
    Bytes::from(json!({ "error": message }).to_string())
}
