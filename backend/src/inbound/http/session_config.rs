//! Session cookie settings.
//!
//! The server hands over the raw session toggles from its layered
//! configuration. Debug builds fall back to permissive defaults with a
//! warning; release builds reject anything missing or malformed.

pub mod fingerprint;
mod parsing;

use std::path::PathBuf;

use actix_web::cookie::{Key, SameSite};
use tracing::warn;
use zeroize::Zeroize;

use parsing::{BoolSetting, debug_warn_or_error, parse_bool_setting, parse_same_site_value};

const SESSION_KEY_DEFAULT_PATH: &str = "/var/run/secrets/session_key";
const SESSION_KEY_MIN_LEN: usize = 64;
// `Key::derive_from` panics below 256 bits of master key.
const KEY_DERIVE_MIN_LEN: usize = 32;
pub(crate) const COOKIE_SECURE_SETTING: &str = "session_cookie_secure";
pub(crate) const SAME_SITE_SETTING: &str = "session_same_site";
pub(crate) const ALLOW_EPHEMERAL_SETTING: &str = "session_allow_ephemeral";

/// Build mode for session configuration validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds tolerate defaults and emit warnings for missing toggles.
    Debug,
    /// Release builds require explicit, valid session toggles.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use step_challenge::inbound::http::session_config::BuildMode;
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

    fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Unvalidated session toggles exactly as configured.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionToggles {
    /// Path of the cookie key file. Defaults to the mounted secret.
    pub key_file: Option<PathBuf>,
    /// `1|0|true|false|yes|no|y|n`.
    pub cookie_secure: Option<String>,
    /// `Strict|Lax|None`, case-insensitive.
    pub same_site: Option<String>,
    /// Whether a missing key file may be replaced by a random key.
    pub allow_ephemeral: Option<String>,
}

/// Validated session cookie settings.
pub struct SessionSettings {
    /// Signing and encryption key for cookie sessions.
    pub key: Key,
    /// Whether session cookies are marked `Secure`.
    pub cookie_secure: bool,
    /// Configured `SameSite` policy for session cookies.
    pub same_site: SameSite,
}

/// Errors raised while validating session configuration.
#[derive(thiserror::Error, Debug)]
pub enum SessionConfigError {
    /// A required setting is missing.
    #[error("missing required setting: {name}")]
    MissingSetting { name: &'static str },
    /// A setting is present but contains an invalid value.
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidSetting {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
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
    /// `SameSite=None` requires a secure cookie in release builds.
    #[error("session_same_site=None requires session_cookie_secure=true")]
    InsecureSameSiteNone,
    /// Release builds must not allow ephemeral session keys.
    #[error("session_allow_ephemeral must be false in release builds")]
    EphemeralNotAllowed,
}

impl SessionToggles {
    /// Validate the toggles for `mode`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use step_challenge::inbound::http::session_config::{BuildMode, SessionToggles};
    ///
    /// let toggles = SessionToggles {
    ///     key_file: Some("/nonexistent/session_key".into()),
    ///     ..SessionToggles::default()
    /// };
    /// // Debug builds fall back to a random key and secure Lax cookies.
    /// let settings = toggles.into_settings(BuildMode::Debug).expect("debug defaults");
    /// assert!(settings.cookie_secure);
    /// ```
    pub fn into_settings(self, mode: BuildMode) -> Result<SessionSettings, SessionConfigError> {
        let cookie_secure = parse_bool_setting(
            self.cookie_secure.as_deref(),
            mode,
            &BoolSetting::new(COOKIE_SECURE_SETTING, true),
        )?;
        let same_site = same_site(self.same_site, mode, cookie_secure)?;
        let allow_ephemeral = allow_ephemeral(self.allow_ephemeral.as_deref(), mode)?;
        let path = self
            .key_file
            .unwrap_or_else(|| PathBuf::from(SESSION_KEY_DEFAULT_PATH));
        let key = session_key(path, mode, allow_ephemeral)?;

        Ok(SessionSettings {
            key,
            cookie_secure,
            same_site,
        })
    }
}

fn same_site(
    value: Option<String>,
    mode: BuildMode,
    cookie_secure: bool,
) -> Result<SameSite, SessionConfigError> {
    let default_same_site = if mode.is_debug() {
        SameSite::Lax
    } else {
        SameSite::Strict
    };
    match value {
        Some(value) => parse_same_site_value(value, mode, cookie_secure, default_same_site),
        None => debug_warn_or_error(
            mode,
            default_same_site,
            SessionConfigError::MissingSetting {
                name: SAME_SITE_SETTING,
            },
            || warn!("{SAME_SITE_SETTING} not set; using default"),
        ),
    }
}

fn allow_ephemeral(value: Option<&str>, mode: BuildMode) -> Result<bool, SessionConfigError> {
    let allowed = parse_bool_setting(
        value,
        mode,
        &BoolSetting::new(ALLOW_EPHEMERAL_SETTING, false),
    )?;
    if allowed && !mode.is_debug() {
        return Err(SessionConfigError::EphemeralNotAllowed);
    }
    Ok(allowed)
}

fn session_key(
    path: PathBuf,
    mode: BuildMode,
    allow_ephemeral: bool,
) -> Result<Key, SessionConfigError> {
    match std::fs::read(&path) {
        Ok(mut bytes) => {
            let length = bytes.len();
            if mode == BuildMode::Release && length < SESSION_KEY_MIN_LEN {
                bytes.zeroize();
                return Err(SessionConfigError::KeyTooShort {
                    path,
                    length,
                    min_len: SESSION_KEY_MIN_LEN,
                });
            }
            if length < KEY_DERIVE_MIN_LEN {
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
        Err(error) if mode.is_debug() || allow_ephemeral => {
            warn!(
                path = %path.display(),
                error = %error,
                "using temporary session key (dev only)"
            );
            Ok(Key::generate())
        }
        Err(error) => Err(SessionConfigError::KeyRead {
            path,
            source: error,
        }),
    }
}
