use crate::{env_or_default, env_required, ConfigError, FromEnv};

/// Authentication configuration.
///
/// The admin registration key guards the open admin-registration endpoint.
/// It is loaded once at startup and handed to the registration handler;
/// nothing reads it from the environment at request time.
#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub admin_registration_key: String,
    /// Session lifetime in seconds
    pub session_ttl_secs: u64,
}

impl AuthConfig {
    pub fn new(admin_registration_key: impl Into<String>) -> Self {
        Self {
            admin_registration_key: admin_registration_key.into(),
            session_ttl_secs: default_session_ttl(),
        }
    }
}

fn default_session_ttl() -> u64 {
    24 * 60 * 60
}

impl FromEnv for AuthConfig {
    /// Requires ADMIN_REGISTRATION_KEY; SESSION_TTL_SECS defaults to 24h.
    fn from_env() -> Result<Self, ConfigError> {
        let session_ttl_secs = env_or_default("SESSION_TTL_SECS", "86400")
            .parse()
            .map_err(|e| ConfigError::ParseError {
                key: "SESSION_TTL_SECS".to_string(),
                details: format!("{}", e),
            })?;

        Ok(Self {
            admin_registration_key: env_required("ADMIN_REGISTRATION_KEY")?,
            session_ttl_secs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_config_from_env() {
        temp_env::with_vars(
            [
                ("ADMIN_REGISTRATION_KEY", Some("s3cret")),
                ("SESSION_TTL_SECS", Some("3600")),
            ],
            || {
                let config = AuthConfig::from_env().unwrap();
                assert_eq!(config.admin_registration_key, "s3cret");
                assert_eq!(config.session_ttl_secs, 3600);
            },
        );
    }

    #[test]
    fn test_auth_config_requires_key() {
        temp_env::with_var_unset("ADMIN_REGISTRATION_KEY", || {
            let err = AuthConfig::from_env().unwrap_err();
            assert!(err.to_string().contains("ADMIN_REGISTRATION_KEY"));
        });
    }
}
