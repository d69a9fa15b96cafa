//! Value parsing for session toggles.

use actix_web::cookie::SameSite;
use tracing::warn;

use super::{BuildMode, COOKIE_SECURE_SETTING, SAME_SITE_SETTING, SessionConfigError};

const BOOL_EXPECTED: &str = "1|0|true|false|yes|no|y|n";
const SAMESITE_EXPECTED: &str = "Strict|Lax|None";

/// A boolean toggle and its debug-build fallback.
pub(super) struct BoolSetting {
    name: &'static str,
    default_value: bool,
}

impl BoolSetting {
    pub(super) const fn new(name: &'static str, default_value: bool) -> Self {
        Self {
            name,
            default_value,
        }
    }

    fn default_label(&self) -> &'static str {
        if self.default_value {
            "enabled"
        } else {
            "disabled"
        }
    }
}

pub(super) fn parse_bool_setting(
    value: Option<&str>,
    mode: BuildMode,
    setting: &BoolSetting,
) -> Result<bool, SessionConfigError> {
    let Some(raw) = value else {
        return debug_warn_or_error(
            mode,
            setting.default_value,
            SessionConfigError::MissingSetting { name: setting.name },
            || {
                warn!(
                    "{} not set; defaulting to {}",
                    setting.name,
                    setting.default_label()
                );
            },
        );
    };
    match parse_bool(raw) {
        Some(flag) => Ok(flag),
        None => debug_warn_or_error(
            mode,
            setting.default_value,
            SessionConfigError::InvalidSetting {
                name: setting.name,
                value: raw.to_owned(),
                expected: BOOL_EXPECTED,
            },
            || {
                warn!(
                    value = %raw,
                    "invalid {}; defaulting to {}",
                    setting.name,
                    setting.default_label()
                );
            },
        ),
    }
}

/// Fall back with a warning in debug builds, fail otherwise.
pub(super) fn debug_warn_or_error<T, F>(
    mode: BuildMode,
    fallback: T,
    error: SessionConfigError,
    warn_fn: F,
) -> Result<T, SessionConfigError>
where
    F: FnOnce(),
{
    if mode.is_debug() {
        warn_fn();
        Ok(fallback)
    } else {
        Err(error)
    }
}

pub(super) fn parse_same_site_value(
    value: String,
    mode: BuildMode,
    cookie_secure: bool,
    default_same_site: SameSite,
) -> Result<SameSite, SessionConfigError> {
    let normalised = value.trim().to_ascii_lowercase();
    match normalised.as_str() {
        "lax" => Ok(SameSite::Lax),
        "strict" => Ok(SameSite::Strict),
        "none" => {
            validate_same_site_none(mode, cookie_secure)?;
            Ok(SameSite::None)
        }
        _ => {
            let warning = format!("invalid {SAME_SITE_SETTING} '{value}', using default");
            debug_warn_or_error(
                mode,
                default_same_site,
                SessionConfigError::InvalidSetting {
                    name: SAME_SITE_SETTING,
                    value,
                    expected: SAMESITE_EXPECTED,
                },
                || warn!("{warning}"),
            )
        }
    }
}

fn validate_same_site_none(mode: BuildMode, cookie_secure: bool) -> Result<(), SessionConfigError> {
    if cookie_secure {
        return Ok(());
    }

    debug_warn_or_error(mode, (), SessionConfigError::InsecureSameSiteNone, || {
        warn!(
            "{SAME_SITE_SETTING}=None with {COOKIE_SECURE_SETTING}=false; \
             browsers may reject the cookie"
        );
    })
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("1", Some(true))]
    #[case(" Yes ", Some(true))]
    #[case("n", Some(false))]
    #[case("FALSE", Some(false))]
    #[case("maybe", None)]
    #[case("", None)]
    fn parses_boolean_spellings(#[case] raw: &str, #[case] expected: Option<bool>) {
        assert_eq!(parse_bool(raw), expected);
    }

    #[rstest]
    fn debug_builds_fall_back_on_garbage() {
        let flag = parse_bool_setting(
            Some("maybe"),
            BuildMode::Debug,
            &BoolSetting::new(COOKIE_SECURE_SETTING, true),
        )
        .expect("debug fallback");
        assert!(flag);
    }

    #[rstest]
    fn release_builds_reject_garbage() {
        let err = parse_bool_setting(
            Some("maybe"),
            BuildMode::Release,
            &BoolSetting::new(COOKIE_SECURE_SETTING, true),
        )
        .expect_err("release rejects");
        assert!(matches!(
            err,
            SessionConfigError::InvalidSetting { name, .. } if name == COOKIE_SECURE_SETTING
        ));
    }
}
