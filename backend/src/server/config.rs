//! Server settings loaded through OrthoConfig.
//!
//! Every value can come from a `RECIPES_*` environment variable, a config
//! file or a command-line flag. Missing values fall back to local
//! development defaults.

use std::net::SocketAddr;
use std::path::PathBuf;

use ortho_config::OrthoConfig;
use pagination::{DEFAULT_PAGE_SIZE, DEFAULT_PAGE_SIZE_CEILING, PagePolicy};
use serde::Deserialize;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_SESSION_KEY_FILE: &str = "/var/run/secrets/session_key";
const DEFAULT_MEDIA_ROOT: &str = "media";
const DEFAULT_MEDIA_URL: &str = "http://localhost:8080/media";
const DEFAULT_PUBLIC_BASE_URL: &str = "http://localhost:8080";

/// Errors raised while interpreting loaded settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid bind address '{value}': {source}")]
    BindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
    #[error("page size {default} must be between 1 and the ceiling {ceiling}")]
    PageSize { default: u32, ceiling: u32 },
}

/// Runtime configuration for the HTTP server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "RECIPES")]
pub struct ServerSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL; the in-memory store is used when absent.
    pub database_url: Option<String>,
    /// File holding the session signing key material.
    pub session_key_file: Option<PathBuf>,
    /// Mark session cookies `Secure`; on unless explicitly disabled.
    pub cookie_secure: Option<bool>,
    /// Allow a random session key when the key file cannot be read.
    #[ortho_config(default = false)]
    pub allow_ephemeral_session: bool,
    /// Directory recipe images are written below.
    pub media_root: Option<PathBuf>,
    /// Public URL prefix the media root is served under.
    pub media_url: Option<String>,
    /// Origin used for recipe short links.
    pub public_base_url: Option<String>,
    /// Page size when a listing request omits `limit`.
    pub page_size: Option<u32>,
    /// Largest page size a client may request.
    pub page_size_ceiling: Option<u32>,
}

impl ServerSettings {
    /// # Errors
    ///
    /// Returns [`SettingsError::BindAddr`] when the address does not parse.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|source| SettingsError::BindAddr {
            value: raw.to_owned(),
            source,
        })
    }

    pub fn cookie_secure(&self) -> bool {
        self.cookie_secure.unwrap_or(true)
    }

    pub fn session_key_file(&self) -> PathBuf {
        self.session_key_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_KEY_FILE))
    }

    pub fn media_root(&self) -> PathBuf {
        self.media_root
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_MEDIA_ROOT))
    }

    pub fn media_url(&self) -> &str {
        self.media_url.as_deref().unwrap_or(DEFAULT_MEDIA_URL)
    }

    pub fn public_base_url(&self) -> &str {
        self.public_base_url
            .as_deref()
            .unwrap_or(DEFAULT_PUBLIC_BASE_URL)
    }

    /// # Errors
    ///
    /// Returns [`SettingsError::PageSize`] when the default is zero or above
    /// the ceiling.
    pub fn page_policy(&self) -> Result<PagePolicy, SettingsError> {
        let default = self.page_size.unwrap_or(DEFAULT_PAGE_SIZE);
        let ceiling = self.page_size_ceiling.unwrap_or(DEFAULT_PAGE_SIZE_CEILING);
        if default == 0 || default > ceiling {
            return Err(SettingsError::PageSize { default, ceiling });
        }
        Ok(PagePolicy::new(default, ceiling))
    }
}

#[cfg(test)]
mod tests {
    //! Settings parsing from the environment.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 10] = [
        "RECIPES_BIND_ADDR",
        "RECIPES_DATABASE_URL",
        "RECIPES_SESSION_KEY_FILE",
        "RECIPES_COOKIE_SECURE",
        "RECIPES_ALLOW_EPHEMERAL_SESSION",
        "RECIPES_MEDIA_ROOT",
        "RECIPES_MEDIA_URL",
        "RECIPES_PUBLIC_BASE_URL",
        "RECIPES_PAGE_SIZE",
        "RECIPES_PAGE_SIZE_CEILING",
    ];

    fn load_with(overrides: &[(&str, &str)]) -> ServerSettings {
        let _guard = lock_env(VARS.map(|name| {
            let value = overrides
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value).to_owned());
            (name, value)
        }));
        ServerSettings::load_from_iter([OsString::from("recipe-backend")])
            .expect("settings should load")
    }

    #[rstest]
    fn defaults_suit_local_development() {
        let settings = load_with(&[]);
        assert_eq!(
            settings.bind_addr().expect("bind addr"),
            "0.0.0.0:8080".parse::<SocketAddr>().expect("literal")
        );
        assert!(settings.database_url.is_none());
        assert!(settings.cookie_secure());
        assert!(!settings.allow_ephemeral_session);
        assert_eq!(settings.media_root(), PathBuf::from("media"));
        assert_eq!(settings.public_base_url(), "http://localhost:8080");
        let policy = settings.page_policy().expect("policy");
        assert_eq!((policy.default_limit(), policy.ceiling()), (6, 100));
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let settings = load_with(&[
            ("RECIPES_BIND_ADDR", "127.0.0.1:9000"),
            ("RECIPES_DATABASE_URL", "postgres://localhost/recipes"),
            ("RECIPES_COOKIE_SECURE", "false"),
            ("RECIPES_MEDIA_URL", "https://cdn.example/media"),
            ("RECIPES_PAGE_SIZE", "10"),
            ("RECIPES_PAGE_SIZE_CEILING", "50"),
        ]);
        assert_eq!(
            settings.bind_addr().expect("bind addr").port(),
            9000
        );
        assert_eq!(
            settings.database_url.as_deref(),
            Some("postgres://localhost/recipes")
        );
        assert!(!settings.cookie_secure());
        assert_eq!(settings.media_url(), "https://cdn.example/media");
        let policy = settings.page_policy().expect("policy");
        assert_eq!((policy.default_limit(), policy.ceiling()), (10, 50));
    }

    #[rstest]
    #[case(None, true)]
    #[case(Some("true"), true)]
    #[case(Some("false"), false)]
    fn session_cookies_are_secure_unless_disabled(
        #[case] raw: Option<&str>,
        #[case] expected: bool,
    ) {
        let overrides: Vec<(&str, &str)> = raw
            .map(|value| ("RECIPES_COOKIE_SECURE", value))
            .into_iter()
            .collect();
        let settings = load_with(&overrides);
        assert_eq!(settings.cookie_secure(), expected);
    }

    #[rstest]
    #[case("0", "100")]
    #[case("20", "10")]
    fn inconsistent_page_sizes_are_rejected(#[case] size: &str, #[case] ceiling: &str) {
        let settings = load_with(&[
            ("RECIPES_PAGE_SIZE", size),
            ("RECIPES_PAGE_SIZE_CEILING", ceiling),
        ]);
        assert!(matches!(
            settings.page_policy(),
            Err(SettingsError::PageSize { .. })
        ));
    }

    #[rstest]
    fn malformed_bind_address_is_reported() {
        let settings = load_with(&[("RECIPES_BIND_ADDR", "localhost")]);
        assert!(matches!(
            settings.bind_addr(),
            Err(SettingsError::BindAddr { .. })
        ));
    }
}
