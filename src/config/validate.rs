use anyhow::{Result, bail};

use super::AppConfig;

pub fn validate(cfg: &AppConfig) -> Result<()> {
    let mut errors: Vec<String> = Vec::new();

    if cfg.general.host.trim().is_empty() {
        errors.push("general.host must not be empty".to_string());
    }

    if let Some(database) = cfg.database.as_ref() {
        if database.url.trim().is_empty() {
            errors.push("database.url must not be empty".to_string());
        }

        if database.min_idle > database.max_connections {
            errors.push(format!(
                "database.min_idle ({}) must be <= database.max_connections ({})",
                database.min_idle, database.max_connections
            ));
        }
    }

    if let Some(auth) = cfg.auth.as_ref() {
        if auth.jwt_secret.trim().is_empty() {
            errors.push("auth.jwt_secret must not be empty".to_string());
        }

        if auth.access_ttl_secs == 0 {
            errors.push("auth.access_ttl_secs must be > 0".to_string());
        }

        if auth.admin_email.trim().is_empty() {
            errors.push("auth.admin_email must not be empty".to_string());
        }

        if auth.admin_password.len() < 8 {
            errors.push("auth.admin_password must be at least 8 characters".to_string());
        }
    }

    if cfg.invoicing.vat_rate_bps > 10_000 {
        errors.push("invoicing.vat_rate_bps must be <= 10000".to_string());
    }

    if errors.is_empty() {
        return Ok(());
    }

    bail!("invalid app config:\n- {}", errors.join("\n- "))
}

#[cfg(test)]
mod tests {
    use super::validate;
    use crate::config::{AppConfig, AuthConfig};

    fn auth(jwt_secret: &str, admin_password: &str) -> AuthConfig {
        AuthConfig {
            jwt_secret: jwt_secret.to_string(),
            access_ttl_secs: 3600,
            admin_email: "admin@demo.com".to_string(),
            admin_password: admin_password.to_string(),
        }
    }

    #[test]
    fn default_config_is_valid() {
        let cfg = AppConfig::default();
        validate(&cfg).expect("defaults should validate");
    }

    #[test]
    fn rejects_short_admin_password() {
        let mut cfg = AppConfig::default();
        cfg.auth = Some(auth("secret", "short"));

        let err = validate(&cfg).expect_err("short password should fail");
        assert!(err.to_string().contains("admin_password"));
    }

    #[test]
    fn rejects_blank_jwt_secret() {
        let mut cfg = AppConfig::default();
        cfg.auth = Some(auth("   ", "password123"));

        let err = validate(&cfg).expect_err("blank secret should fail");
        assert!(err.to_string().contains("jwt_secret"));
    }

    #[test]
    fn rejects_vat_rate_above_hundred_percent() {
        let mut cfg = AppConfig::default();
        cfg.invoicing.vat_rate_bps = 10_001;

        let err = validate(&cfg).expect_err("vat rate should fail");
        assert!(err.to_string().contains("vat_rate_bps"));
    }
}
