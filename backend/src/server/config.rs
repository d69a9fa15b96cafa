//! Layered application settings and the server configuration object.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use actix_web::cookie::{Key, SameSite};
use ortho_config::OrthoConfig;
use serde::{Deserialize, Deserializer};

use step_challenge::domain::{
    AccountSettings, DEFAULT_VERIFICATION_TTL, DEFAULT_VIEW_ADMIN, DEFAULT_VIEW_TEST_USER,
    UserId, UserValidationError, ViewOverride,
};
use step_challenge::inbound::http::session_config::SessionToggles;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Settings loaded from the CLI, `STEP_CHALLENGE_*` environment variables and
/// configuration files.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "STEP_CHALLENGE")]
pub struct AppSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// Lifetime of a signup verification code in seconds.
    pub verification_ttl_secs: Option<u64>,
    /// Start with an empty store instead of the demo roster.
    #[ortho_config(default = false)]
    pub skip_demo_data: bool,
    /// Admin allowed to switch into the test user's view.
    pub view_admin: Option<String>,
    /// Test user the admin switches into.
    pub view_test_user: Option<String>,
    /// Session cookie key file.
    pub session_key_file: Option<PathBuf>,
    #[serde(default, deserialize_with = "scalar_as_text")]
    pub session_cookie_secure: Option<String>,
    #[serde(default, deserialize_with = "scalar_as_text")]
    pub session_same_site: Option<String>,
    #[serde(default, deserialize_with = "scalar_as_text")]
    pub session_allow_ephemeral: Option<String>,
}

/// A raw setting as the environment layer types it.
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Flag(bool),
    Integer(i64),
}

/// Keep session toggles textual so their parser sees `1`, `true` or `Lax`
/// whichever source supplied them.
fn scalar_as_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(
        Option::<Scalar>::deserialize(deserializer)?.map(|value| match value {
            Scalar::Text(text) => text,
            Scalar::Flag(flag) => flag.to_string(),
            Scalar::Integer(number) => number.to_string(),
        }),
    )
}

impl AppSettings {
    /// Parse the bind address, falling back to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR).parse()
    }

    pub fn account_settings(&self) -> AccountSettings {
        AccountSettings {
            verification_ttl: self
                .verification_ttl_secs
                .map_or(DEFAULT_VERIFICATION_TTL, Duration::from_secs),
        }
    }

    /// Whether the demo roster is seeded at startup. On unless skipped.
    pub fn seed_demo_data(&self) -> bool {
        !self.skip_demo_data
    }

    /// The configured admin/test-user pair.
    pub fn view_override(&self) -> Result<ViewOverride, UserValidationError> {
        let admin = UserId::new(self.view_admin.as_deref().unwrap_or(DEFAULT_VIEW_ADMIN))?;
        let test_user = UserId::new(
            self.view_test_user
                .as_deref()
                .unwrap_or(DEFAULT_VIEW_TEST_USER),
        )?;
        Ok(ViewOverride::new(admin, test_user))
    }

    /// Raw session toggles for validation against the build mode.
    pub fn session_toggles(&self) -> SessionToggles {
        SessionToggles {
            key_file: self.session_key_file.clone(),
            cookie_secure: self.session_cookie_secure.clone(),
            same_site: self.session_same_site.clone(),
            allow_ephemeral: self.session_allow_ephemeral.clone(),
        }
    }
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) account_settings: AccountSettings,
    pub(crate) view_override: ViewOverride,
    pub(crate) seed_demo_data: bool,
}

impl ServerConfig {
    /// Construct a server configuration with default account settings, the
    /// default view-override pair and demo seeding enabled.
    #[must_use]
    pub fn new(
        key: Key,
        cookie_secure: bool,
        same_site: SameSite,
        bind_addr: SocketAddr,
        view_override: ViewOverride,
    ) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            account_settings: AccountSettings::default(),
            view_override,
            seed_demo_data: true,
        }
    }

    #[must_use]
    pub fn with_account_settings(mut self, settings: AccountSettings) -> Self {
        self.account_settings = settings;
        self
    }

    #[must_use]
    pub fn with_demo_data(mut self, enabled: bool) -> Self {
        self.seed_demo_data = enabled;
        self
    }
}
