//! Session cookie configuration read from the environment.
//!
//! The deployment mode decides the cookie attributes: production cookies are
//! `Secure` with `SameSite=None` so a separately hosted client can send them;
//! development cookies are not secure and use `SameSite=Strict`.

use std::path::PathBuf;

use actix_web::cookie::{Key, SameSite};
use mockable::Env;
use tracing::warn;
use zeroize::Zeroize;

const SESSION_KEY_DEFAULT_PATH: &str = "/var/run/secrets/session_key";
/// Minimum key length accepted in production.
const SESSION_KEY_MIN_LEN: usize = 64;
/// `Key::derive_from` rejects anything shorter.
const SESSION_KEY_FLOOR: usize = 32;
const DEPLOYMENT_MODE_ENV: &str = "DEPLOYMENT_MODE";
const ALLOW_EPHEMERAL_ENV: &str = "SESSION_ALLOW_EPHEMERAL";
const KEY_FILE_ENV: &str = "SESSION_KEY_FILE";
const BOOL_EXPECTED: &str = "1|0|true|false|yes|no|y|n";
const MODE_EXPECTED: &str = "production|development";

/// Where the service is running.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum DeploymentMode {
    Production,
    #[default]
    Development,
}

impl DeploymentMode {
    fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

/// Session settings derived from the environment.
pub struct SessionSettings {
    /// Signing and encryption key for cookie sessions.
    pub key: Key,
    /// Whether session cookies are marked `Secure`.
    pub cookie_secure: bool,
    /// `SameSite` policy for session cookies.
    pub same_site: SameSite,
    /// Mode the settings were derived for.
    pub mode: DeploymentMode,
}

/// Errors raised while validating session configuration.
#[derive(thiserror::Error, Debug)]
pub enum SessionConfigError {
    /// A variable is present but contains an invalid value.
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
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
    /// The key file is too short for the current mode.
    #[error("session key at {path} too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
    /// Production must not run with a throwaway key.
    #[error("SESSION_ALLOW_EPHEMERAL must be 0 in production")]
    EphemeralNotAllowed,
}

/// Build session settings from the environment.
///
/// # Examples
///
/// ```rust
/// use actix_web::cookie::SameSite;
/// use mockable::MockEnv;
/// use rfood::inbound::http::session_config::{DeploymentMode, session_settings_from_env};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let key_path = std::env::temp_dir().join("rfood_session_key_example");
/// std::fs::write(&key_path, vec![b'k'; 64])?;
///
/// let key_path = key_path.to_string_lossy().into_owned();
/// let mut env = MockEnv::new();
/// env.expect_string().returning(move |name| match name {
///     "SESSION_KEY_FILE" => Some(key_path.clone()),
///     "DEPLOYMENT_MODE" => Some("production".to_owned()),
///     _ => None,
/// });
///
/// let settings = session_settings_from_env(&env)?;
/// assert_eq!(settings.mode, DeploymentMode::Production);
/// assert!(settings.cookie_secure);
/// assert_eq!(settings.same_site, SameSite::None);
/// # Ok(())
/// # }
/// ```
pub fn session_settings_from_env<E: Env>(env: &E) -> Result<SessionSettings, SessionConfigError> {
    let mode = deployment_mode_from_env(env)?;
    let allow_ephemeral = allow_ephemeral_from_env(env, mode)?;
    let key = session_key_from_env(env, mode, allow_ephemeral)?;
    let (cookie_secure, same_site) = match mode {
        DeploymentMode::Production => (true, SameSite::None),
        DeploymentMode::Development => (false, SameSite::Strict),
    };

    Ok(SessionSettings {
        key,
        cookie_secure,
        same_site,
        mode,
    })
}

fn deployment_mode_from_env<E: Env>(env: &E) -> Result<DeploymentMode, SessionConfigError> {
    let Some(value) = env.string(DEPLOYMENT_MODE_ENV) else {
        warn!("DEPLOYMENT_MODE not set; assuming development");
        return Ok(DeploymentMode::Development);
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "production" | "prod" => Ok(DeploymentMode::Production),
        "development" | "dev" => Ok(DeploymentMode::Development),
        _ => Err(SessionConfigError::InvalidEnv {
            name: DEPLOYMENT_MODE_ENV,
            value,
            expected: MODE_EXPECTED,
        }),
    }
}

fn allow_ephemeral_from_env<E: Env>(
    env: &E,
    mode: DeploymentMode,
) -> Result<bool, SessionConfigError> {
    let Some(value) = env.string(ALLOW_EPHEMERAL_ENV) else {
        return Ok(false);
    };
    match parse_bool(&value) {
        Some(true) if mode.is_production() => Err(SessionConfigError::EphemeralNotAllowed),
        Some(flag) => Ok(flag),
        None => Err(SessionConfigError::InvalidEnv {
            name: ALLOW_EPHEMERAL_ENV,
            value,
            expected: BOOL_EXPECTED,
        }),
    }
}

fn session_key_from_env<E: Env>(
    env: &E,
    mode: DeploymentMode,
    allow_ephemeral: bool,
) -> Result<Key, SessionConfigError> {
    let path = PathBuf::from(
        env.string(KEY_FILE_ENV)
            .unwrap_or_else(|| SESSION_KEY_DEFAULT_PATH.to_owned()),
    );

    match std::fs::read(&path) {
        Ok(mut bytes) => {
            let length = bytes.len();
            let min_len = if mode.is_production() {
                SESSION_KEY_MIN_LEN
            } else {
                SESSION_KEY_FLOOR
            };
            if length < min_len {
                bytes.zeroize();
                return Err(SessionConfigError::KeyTooShort {
                    path,
                    length,
                    min_len,
                });
            }
            let key = Key::derive_from(&bytes);
            bytes.zeroize();
            Ok(key)
        }
        Err(error) if !mode.is_production() || allow_ephemeral => {
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

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}
