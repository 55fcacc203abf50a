//! Client configuration
//!
//! # Environment variables
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | BISTRO_API_URL | http://localhost:8080/api | REST base URL |
//! | BISTRO_WS_URL | ws://localhost:8080/ws | Live order channel |
//! | BISTRO_FRONTEND_URL | http://localhost:3000 | Public site, used in table QR codes |
//! | BISTRO_ID_SALT | (empty) | Salt for public id obfuscation |
//! | BISTRO_API_TOKEN | unset | Bearer token |
//! | BISTRO_REQUEST_TIMEOUT_SECS | 30 | REST request timeout |
//! | BISTRO_PAYMENT_CLIENT_ID | unset | Card payment provider client id |
//! | BISTRO_ASSET_UPLOAD_URL | unset | Image upload endpoint |
//! | BISTRO_ASSET_UPLOAD_PRESET | unset | Unsigned upload preset |

use reqwest::Url;

use crate::{ClientError, ClientResult};

/// `url` must parse, use one of `schemes` and name a host
fn check_url(what: &str, url: &str, schemes: &[&str]) -> ClientResult<()> {
    let parsed =
        Url::parse(url).map_err(|e| ClientError::Config(format!("{what} is invalid ({e}): {url}")))?;
    if !schemes.contains(&parsed.scheme()) {
        return Err(ClientError::Config(format!(
            "{what} must use {}: {url}",
            schemes.join("/")
        )));
    }
    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(ClientError::Config(format!("{what} has no host: {url}")));
    }
    Ok(())
}

/// Credentials for uploading product images to the asset host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetUploadConfig {
    pub url: String,
    pub preset: String,
}

/// Client configuration for connecting to the backend
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// REST base URL (e.g., "http://localhost:8080/api")
    pub base_url: String,

    /// WebSocket URL of the live order channel
    pub ws_url: String,

    /// Public frontend URL (table QR codes point here)
    pub frontend_url: String,

    /// Salt for `shared::util::obfuscate_id`
    pub id_salt: String,

    /// Bearer token for authentication
    pub token: Option<String>,

    /// Request timeout in seconds
    pub timeout: u64,

    /// Card payment provider client id
    pub payment_client_id: Option<String>,

    /// Product image upload target
    pub asset_upload: Option<AssetUploadConfig>,
}

impl ClientConfig {
    /// Create a configuration with defaults for everything but the REST URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ws_url: "ws://localhost:8080/ws".to_string(),
            frontend_url: "http://localhost:3000".to_string(),
            id_salt: String::new(),
            token: None,
            timeout: 30,
            payment_client_id: None,
            asset_upload: None,
        }
    }

    /// Load from the process environment (and `.env` if present)
    pub fn from_env() -> ClientResult<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> ClientResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mut config = Self::new(
            non_empty("BISTRO_API_URL").unwrap_or_else(|| "http://localhost:8080/api".into()),
        );
        if let Some(ws) = non_empty("BISTRO_WS_URL") {
            config.ws_url = ws;
        }
        if let Some(frontend) = non_empty("BISTRO_FRONTEND_URL") {
            config.frontend_url = frontend;
        }
        config.id_salt = lookup("BISTRO_ID_SALT").unwrap_or_default();
        config.token = non_empty("BISTRO_API_TOKEN");
        if let Some(raw) = non_empty("BISTRO_REQUEST_TIMEOUT_SECS") {
            config.timeout = raw.trim().parse().map_err(|_| {
                ClientError::Config(format!("BISTRO_REQUEST_TIMEOUT_SECS is not a number: {raw}"))
            })?;
        }
        config.payment_client_id = non_empty("BISTRO_PAYMENT_CLIENT_ID");
        config.asset_upload = match (
            non_empty("BISTRO_ASSET_UPLOAD_URL"),
            non_empty("BISTRO_ASSET_UPLOAD_PRESET"),
        ) {
            (Some(url), Some(preset)) => Some(AssetUploadConfig { url, preset }),
            (None, None) => None,
            _ => {
                return Err(ClientError::Config(
                    "BISTRO_ASSET_UPLOAD_URL and BISTRO_ASSET_UPLOAD_PRESET must be set together"
                        .to_string(),
                ));
            }
        };

        config.validate()?;
        Ok(config)
    }

    /// Check URL schemes
    pub fn validate(&self) -> ClientResult<()> {
        check_url("API URL", &self.base_url, &["http", "https"])?;
        check_url("WebSocket URL", &self.ws_url, &["ws", "wss"])?;
        if self.timeout == 0 {
            return Err(ClientError::Config("request timeout must be positive".into()));
        }
        Ok(())
    }

    /// Set the bearer token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the live channel URL
    pub fn with_ws_url(mut self, url: impl Into<String>) -> Self {
        self.ws_url = url.into();
        self
    }

    /// Set the id obfuscation salt
    pub fn with_id_salt(mut self, salt: impl Into<String>) -> Self {
        self.id_salt = salt.into();
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Create an HTTP client from this configuration
    pub fn build_http_client(&self) -> ClientResult<super::HttpClient> {
        super::HttpClient::new(self)
    }

    /// Public menu URL for a table's QR code
    pub fn table_menu_url(&self, table_id: i64) -> String {
        shared::util::table_menu_url(&self.frontend_url, &self.id_salt, table_id)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("http://localhost:8080/api")
    }
}
