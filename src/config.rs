use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use crate::errors::ConfigError;

pub const LISTEN_PORT: u16 = 5000;
pub const REQUEST_TIMEOUT_SECS: u64 = 10;
pub const CACHE_DURATION_SECS: u64 = 3600; // 1 hour
pub const DEFAULT_MANYFOLD_SCOPES: &str = "read";
pub const MANYFOLD_ACCEPT: &str = "application/vnd.manyfold.v0+json";


/// RackNerd SolusVM client API credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RackNerdConfig {
    pub base_url: String,
    pub key: String,
    pub hash: String,
}

/// Manyfold OAuth client-credentials application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManyfoldConfig {
    pub base_url: String,
    pub client_id: String,
    pub client_secret: String,
    pub scopes: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookStackConfig {
    pub base_url: String,
    pub api_token: String,
}

/// Settings resolved once at startup.
///
/// Each upstream section is validated on its own: a missing credential only
/// disables the route that needs it, so `/health` and the other upstreams keep
/// working.
#[derive(Debug, Clone)]
pub struct Settings {
    pub racknerd: Result<RackNerdConfig, ConfigError>,
    pub manyfold: Result<ManyfoldConfig, ConfigError>,
    pub bookstack: Result<BookStackConfig, ConfigError>,
    pub request_timeout: Duration,
    pub cache_ttl: Duration,
    /// Whether failed (non-2xx) responses are cached for the full TTL.
    pub cache_errors: bool,
}

impl Settings {
    /// Loads `.env` if present, then reads the process environment.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut vars = Vars {
            lookup: &lookup,
            missing: Vec::new(),
        };

        let racknerd = {
            let base_url = vars.required("RACKNERD_BASE_URL");
            let key = vars.required("RACKNERD_KEY");
            let hash = vars.required("RACKNERD_HASH");
            vars.finish().map(|()| RackNerdConfig {
                base_url: trim_base(base_url),
                key: key.unwrap_or_default(),
                hash: hash.unwrap_or_default(),
            })
        };

        let manyfold = {
            let base_url = vars.required("MANYFOLD_BASE_URL");
            let client_id = vars.required("MANYFOLD_CLIENT_ID");
            let client_secret = vars.required("MANYFOLD_CLIENT_SECRET");
            let scopes = vars
                .optional("MANYFOLD_SCOPES")
                .unwrap_or_else(|| DEFAULT_MANYFOLD_SCOPES.to_string());
            vars.finish().map(|()| ManyfoldConfig {
                base_url: trim_base(base_url),
                client_id: client_id.unwrap_or_default(),
                client_secret: client_secret.unwrap_or_default(),
                scopes,
            })
        };

        let bookstack = {
            let base_url = vars.required("BOOKSTACK_BASE_URL");
            let api_token = vars.required("BOOKSTACK_API_TOKEN");
            vars.finish().map(|()| BookStackConfig {
                base_url: trim_base(base_url),
                api_token: api_token.unwrap_or_default(),
            })
        };

        let cache_errors = vars
            .optional("CACHE_ERRORS")
            .map(|v| !matches!(v.to_ascii_lowercase().as_str(), "0" | "false" | "no" | "off"))
            .unwrap_or(true);

        Self {
            racknerd,
            manyfold,
            bookstack,
            request_timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
            cache_ttl: Duration::from_secs(CACHE_DURATION_SECS),
            cache_errors,
        }
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, LISTEN_PORT))
    }
}

struct Vars<'a, F> {
    lookup: &'a F,
    missing: Vec<&'static str>,
}

impl<F> Vars<'_, F>
where
    F: Fn(&str) -> Option<String>,
{
    fn optional(&self, name: &str) -> Option<String> {
        (self.lookup)(name)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn required(&mut self, name: &'static str) -> Option<String> {
        let value = self.optional(name);
        if value.is_none() {
            self.missing.push(name);
        }
        value
    }

    /// Closes the current section, returning the names missing from it.
    fn finish(&mut self) -> Result<(), ConfigError> {
        if self.missing.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Missing(std::mem::take(&mut self.missing)))
        }
    }
}

fn trim_base(url: Option<String>) -> String {
    url.unwrap_or_default().trim_end_matches('/').to_string()
}
