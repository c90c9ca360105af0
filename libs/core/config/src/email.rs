use crate::{env_or_default, ConfigError, FromEnv};

/// Which email provider the app should construct at startup
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EmailBackend {
    /// In-process mock that records sends (development/tests)
    Mock,
    /// Real SMTP delivery via lettre
    Smtp,
}

/// Email sender configuration
#[derive(Clone, Debug)]
pub struct EmailConfig {
    pub backend: EmailBackend,
    pub from_email: String,
    pub from_name: String,
}

impl FromEnv for EmailConfig {
    /// EMAIL_BACKEND defaults to "mock"; anything else than "smtp" stays
    /// on the mock so a dev environment never needs an SMTP server.
    fn from_env() -> Result<Self, ConfigError> {
        let backend = if env_or_default("EMAIL_BACKEND", "mock").eq_ignore_ascii_case("smtp") {
            EmailBackend::Smtp
        } else {
            EmailBackend::Mock
        };

        Ok(Self {
            backend,
            from_email: env_or_default("EMAIL_FROM_ADDRESS", "noreply@example.com"),
            from_name: env_or_default("EMAIL_FROM_NAME", "Catalog Notifications"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_config_defaults_to_mock() {
        temp_env::with_vars(
            [
                ("EMAIL_BACKEND", None::<&str>),
                ("EMAIL_FROM_ADDRESS", None),
                ("EMAIL_FROM_NAME", None),
            ],
            || {
                let config = EmailConfig::from_env().unwrap();
                assert_eq!(config.backend, EmailBackend::Mock);
                assert_eq!(config.from_email, "noreply@example.com");
            },
        );
    }

    #[test]
    fn test_email_config_smtp_backend() {
        temp_env::with_var("EMAIL_BACKEND", Some("SMTP"), || {
            let config = EmailConfig::from_env().unwrap();
            assert_eq!(config.backend, EmailBackend::Smtp);
        });
    }
}
