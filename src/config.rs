// src/config.rs

use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use dotenvy::dotenv;

/// Placeholder values shipped in sample `.env` files. Treated as absent.
pub const PLACEHOLDER_URL: &str = "https://placeholder.supabase.co";
pub const PLACEHOLDER_KEY: &str = "placeholder-key";

const DEFAULT_BUCKET: &str = "post-images";
const DEFAULT_BIND_ADDR: SocketAddr = SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 3000);
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("BIND_ADDR is not a valid socket address: {0}")]
    BindAddr(#[from] std::net::AddrParseError),

    #[error("MAX_UPLOAD_BYTES is not a valid size: {0}")]
    UploadLimit(#[from] std::num::ParseIntError),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub supabase_url: Option<String>,
    pub supabase_anon_key: Option<String>,
    /// Storage bucket holding post images.
    pub image_bucket: String,
    pub bind_addr: SocketAddr,
    pub max_upload_bytes: usize,
    pub rust_log: String,
    pub log_dir: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();

        let supabase_url = var_with_fallback("SUPABASE_URL", "VITE_SUPABASE_URL");
        let supabase_anon_key = var_with_fallback("SUPABASE_ANON_KEY", "VITE_SUPABASE_ANON_KEY");

        let image_bucket = env::var("IMAGE_BUCKET").unwrap_or_else(|_| DEFAULT_BUCKET.to_string());

        let bind_addr = match env::var("BIND_ADDR") {
            Ok(raw) => raw.parse()?,
            Err(_) => DEFAULT_BIND_ADDR,
        };

        let max_upload_bytes = match env::var("MAX_UPLOAD_BYTES") {
            Ok(raw) => raw.parse()?,
            Err(_) => DEFAULT_MAX_UPLOAD_BYTES,
        };

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let log_dir = env::var("LOG_DIR").unwrap_or_else(|_| "logs".to_string());

        Ok(Self {
            supabase_url,
            supabase_anon_key,
            image_bucket,
            bind_addr,
            max_upload_bytes,
            rust_log,
            log_dir,
        })
    }

    /// Returns the service URL and public key, or `None` when either is
    /// missing, blank, or still set to the shipped placeholder.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        let url = self.supabase_url.as_deref().map(str::trim)?;
        let key = self.supabase_anon_key.as_deref().map(str::trim)?;

        if url.is_empty() || key.is_empty() || url == PLACEHOLDER_URL || key == PLACEHOLDER_KEY {
            return None;
        }
        Some((url, key))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            supabase_url: None,
            supabase_anon_key: None,
            image_bucket: DEFAULT_BUCKET.to_string(),
            bind_addr: DEFAULT_BIND_ADDR,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            rust_log: "info".to_string(),
            log_dir: "logs".to_string(),
        }
    }
}

fn var_with_fallback(primary: &str, fallback: &str) -> Option<String> {
    env::var(primary).or_else(|_| env::var(fallback)).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_credentials(url: Option<&str>, key: Option<&str>) -> Config {
        Config {
            supabase_url: url.map(str::to_string),
            supabase_anon_key: key.map(str::to_string),
            ..Config::default()
        }
    }

    #[test]
    fn missing_values_are_unconfigured() {
        assert!(with_credentials(None, Some("k")).credentials().is_none());
        assert!(with_credentials(Some("https://x.supabase.co"), None).credentials().is_none());
        assert!(with_credentials(Some("  "), Some("k")).credentials().is_none());
    }

    #[test]
    fn placeholders_are_unconfigured() {
        assert!(with_credentials(Some(PLACEHOLDER_URL), Some("real")).credentials().is_none());
        assert!(
            with_credentials(Some("https://x.supabase.co"), Some(PLACEHOLDER_KEY))
                .credentials()
                .is_none()
        );
    }

    #[test]
    fn default_binds_all_interfaces() {
        assert_eq!(Config::default().bind_addr.to_string(), "0.0.0.0:3000");
    }

    #[test]
    fn real_values_are_returned_trimmed() {
        let config = with_credentials(Some(" https://x.supabase.co "), Some("anon"));
        assert_eq!(config.credentials(), Some(("https://x.supabase.co", "anon")));
    }
}
