//! Server configuration read from the environment.

use std::net::SocketAddr;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use gifts_assessment::domain::pagination::DEFAULT_PAGE_SIZE;
use gifts_gemini::GeminiConfig;

use crate::error::AppError;

/// Settings for one server process.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Bind host.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// Questions per quiz page.
    pub page_size: NonZeroUsize,
    /// Replacement catalog document; the embedded one is used when unset.
    pub catalog_path: Option<PathBuf>,
    /// Narrative service settings; `None` when no API key is set.
    pub gemini: Option<GeminiConfig>,
}

impl AppConfig {
    /// Reads the process environment.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads settings through `lookup`, which returns a variable's value if set.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable is set to an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = parse_or(&lookup, "PORT", 3000_u16)?;
        let page_size = parse_or(&lookup, "QUIZ_PAGE_SIZE", DEFAULT_PAGE_SIZE)?;
        let catalog_path = lookup("CATALOG_PATH")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        let model =
            lookup("GEMINI_MODEL").unwrap_or_else(|| GeminiConfig::DEFAULT_MODEL.to_string());
        let base_url =
            lookup("GEMINI_BASE_URL").unwrap_or_else(|| GeminiConfig::DEFAULT_BASE_URL.to_string());
        let timeout_secs = parse_or(
            &lookup,
            "GEMINI_TIMEOUT_SECS",
            GeminiConfig::DEFAULT_TIMEOUT.as_secs(),
        )?;
        if timeout_secs == 0 {
            return Err(AppError::Config(
                "GEMINI_TIMEOUT_SECS must be at least 1".to_string(),
            ));
        }
        let gemini = lookup("GEMINI_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .map(|api_key| GeminiConfig {
                api_key,
                model,
                base_url,
                timeout: Duration::from_secs(timeout_secs),
            });

        Ok(Self {
            host,
            port,
            page_size,
            catalog_path,
            gemini,
        })
    }

    /// The address to bind.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `host:port` is not a socket address.
    pub fn socket_addr(&self) -> Result<SocketAddr, AppError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))
    }
}

fn parse_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: T,
) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| AppError::Config(format!("{name} is invalid ({raw:?}): {e}"))),
    }
}
