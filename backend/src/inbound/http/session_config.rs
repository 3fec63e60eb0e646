//! Session key loading and cookie middleware construction.
//!
//! The signing key is read from a file mounted by the deployment. Debug
//! builds, or deployments that opt in explicitly, fall back to a random key
//! so local runs work without secrets.

use std::path::{Path, PathBuf};

use actix_session::SessionMiddleware;
use actix_session::config::{CookieContentSecurity, PersistentSession};
use actix_session::storage::CookieSessionStore;
use actix_web::cookie::time::Duration;
use actix_web::cookie::{Key, SameSite};
use sha2::{Digest, Sha256};
use tracing::warn;
use zeroize::Zeroize;

/// Name of the session cookie.
pub const SESSION_COOKIE_NAME: &str = "session";
const SESSION_KEY_MIN_LEN: usize = 64;
/// `Key::derive_from` panics below this length.
const DERIVE_MIN_LEN: usize = 32;
const FINGERPRINT_BYTES: usize = 8;
const SESSION_TTL_DAYS: i64 = 14;

/// Build mode for session key validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Missing key files fall back to a random key.
    Debug,
    /// Key files are mandatory and must hold at least 64 bytes.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use recipe_backend::inbound::http::session_config::BuildMode;
    ///
    /// let mode = BuildMode::from_debug_assertions();
    /// assert_eq!(mode == BuildMode::Debug, cfg!(debug_assertions));
    /// ```
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }
}

/// Errors raised while loading the session signing key.
#[derive(thiserror::Error, Debug)]
pub enum SessionConfigError {
    /// Reading the session key file failed.
    #[error("failed to read session key at {path}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The session key file is too short for release builds.
    #[error("session key at {path} too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
}

/// Load the cookie signing key from `path`.
///
/// Key bytes are wiped from memory once the key has been derived.
///
/// # Errors
///
/// Returns [`SessionConfigError::KeyRead`] when the file cannot be read in a
/// release build without `allow_ephemeral`, and
/// [`SessionConfigError::KeyTooShort`] when a release build reads a short key.
/// Debug builds replace keys under 32 bytes with a random key.
pub fn load_session_key(
    path: &Path,
    mode: BuildMode,
    allow_ephemeral: bool,
) -> Result<Key, SessionConfigError> {
    match std::fs::read(path) {
        Ok(mut bytes) => {
            let length = bytes.len();
            if mode == BuildMode::Release && length < SESSION_KEY_MIN_LEN {
                bytes.zeroize();
                return Err(SessionConfigError::KeyTooShort {
                    path: path.to_path_buf(),
                    length,
                    min_len: SESSION_KEY_MIN_LEN,
                });
            }
            if length < DERIVE_MIN_LEN {
                bytes.zeroize();
                warn!(
                    path = %path.display(),
                    length,
                    "session key too short to derive from; using temporary key (dev only)"
                );
                return Ok(Key::generate());
            }
            let key = Key::derive_from(&bytes);
            bytes.zeroize();
            Ok(key)
        }
        Err(error) if mode == BuildMode::Debug || allow_ephemeral => {
            warn!(
                path = %path.display(),
                error = %error,
                "using temporary session key (dev only)"
            );
            Ok(Key::generate())
        }
        Err(source) => Err(SessionConfigError::KeyRead {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Truncated SHA-256 fingerprint of the key's signing half.
///
/// Lets operators tell which key is live without logging key material.
///
/// ```rust
/// use actix_web::cookie::Key;
/// use recipe_backend::inbound::http::session_config::key_fingerprint;
///
/// let fingerprint = key_fingerprint(&Key::generate());
/// assert_eq!(fingerprint.len(), 16);
/// ```
#[must_use]
pub fn key_fingerprint(key: &Key) -> String {
    let mut hasher = Sha256::new();
    hasher.update(key.signing());
    let digest = hasher.finalize();
    hex::encode(&digest[..FINGERPRINT_BYTES])
}

/// Private cookie session carrying the caller's id.
#[must_use]
pub fn session_middleware(
    key: Key,
    cookie_secure: bool,
) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name(SESSION_COOKIE_NAME.to_owned())
        .cookie_path("/".to_owned())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(SameSite::Lax)
        .session_lifecycle(
            PersistentSession::default().session_ttl(Duration::days(SESSION_TTL_DAYS)),
        )
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn key_file(len: usize) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(&vec![b'k'; len]).expect("write key");
        file
    }

    #[rstest]
    #[case(BuildMode::Debug)]
    #[case(BuildMode::Release)]
    fn reads_a_long_key(#[case] mode: BuildMode) {
        let file = key_file(64);
        let first = load_session_key(file.path(), mode, false).expect("key");
        let second = load_session_key(file.path(), mode, false).expect("key");
        assert_eq!(key_fingerprint(&first), key_fingerprint(&second));
    }

    #[rstest]
    fn release_rejects_short_keys() {
        let file = key_file(16);
        let err = load_session_key(file.path(), BuildMode::Release, false)
            .err()
            .expect("short key must fail");
        assert!(matches!(
            err,
            SessionConfigError::KeyTooShort { length: 16, .. }
        ));
    }

    #[rstest]
    fn debug_accepts_keys_below_the_release_minimum() {
        let file = key_file(40);
        let first = load_session_key(file.path(), BuildMode::Debug, false).expect("key");
        let second = load_session_key(file.path(), BuildMode::Debug, false).expect("key");
        assert_eq!(key_fingerprint(&first), key_fingerprint(&second));
    }

    #[rstest]
    #[case(0)]
    #[case(16)]
    #[case(31)]
    fn debug_replaces_keys_too_short_to_derive(#[case] len: usize) {
        let file = key_file(len);
        let first = load_session_key(file.path(), BuildMode::Debug, false).expect("key");
        let second = load_session_key(file.path(), BuildMode::Debug, false).expect("key");
        assert_ne!(key_fingerprint(&first), key_fingerprint(&second));
    }

    #[rstest]
    #[case(BuildMode::Debug, false)]
    #[case(BuildMode::Release, true)]
    fn missing_file_falls_back_when_allowed(#[case] mode: BuildMode, #[case] allow: bool) {
        let dir = tempfile::tempdir().expect("temp dir");
        let missing = dir.path().join("absent");
        assert!(load_session_key(&missing, mode, allow).is_ok());
    }

    #[rstest]
    fn release_requires_the_key_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let missing = dir.path().join("absent");
        let err = load_session_key(&missing, BuildMode::Release, false)
            .err()
            .expect("missing key must fail");
        assert!(matches!(err, SessionConfigError::KeyRead { .. }));
    }

    #[rstest]
    fn fingerprints_are_short_hex_and_distinct() {
        let first = key_fingerprint(&Key::generate());
        let second = key_fingerprint(&Key::generate());
        assert_eq!(first.len(), 16);
        assert!(first.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(first, second);
    }
}
