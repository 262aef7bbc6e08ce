use crate::utils::AppError;
use std::env;

const DEFAULT_ORIGINS: &[&str] = &[
    "http://localhost:5173",
    "https://health-track-186e2.web.app",
    "https://health-track-186e2.firebaseapp.com",
];

/// Process-wide configuration, read once at startup and shared read-only.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// MongoDB URI; `None` runs the service on the in-memory store
    pub database_url: Option<String>,
    pub database_name: String,
    pub token_secret: String,
    pub production: bool,
    pub cors_origins: Vec<String>,
    /// Emails granted the admin role at startup
    pub admin_emails: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|e| AppError::Config(format!("PORT '{}' is not a valid port: {}", raw, e)))?,
            None => 5000,
        };

        let token_secret = lookup("ACCESS_TOKEN_SECRET")
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AppError::Config("ACCESS_TOKEN_SECRET must be set".to_string()))?;

        let environment = lookup("APP_ENV")
            .or_else(|| lookup("NODE_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let cors_origins = match lookup("CORS_ORIGINS") {
            Some(raw) => split_list(&raw),
            None => DEFAULT_ORIGINS.iter().map(|origin| origin.to_string()).collect(),
        };

        Ok(AppConfig {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            database_url: lookup("DATABASE_URL").filter(|s| !s.is_empty()),
            database_name: lookup("DATABASE_NAME").unwrap_or_else(|| "healthTrack".to_string()),
            token_secret,
            production: environment.eq_ignore_ascii_case("production"),
            cors_origins,
            admin_emails: lookup("ADMIN_EMAILS").map(|raw| split_list(&raw)).unwrap_or_default(),
        })
    }
}

/// Comma-separated list with blanks dropped.
fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<AppConfig, AppError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[("ACCESS_TOKEN_SECRET", "s3cret")]).unwrap();

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 5000);
        assert_eq!(config.database_name, "healthTrack");
        assert!(config.database_url.is_none());
        assert!(!config.production);
        assert_eq!(config.cors_origins.len(), 3);
        assert!(config.admin_emails.is_empty());
    }

    #[test]
    fn test_admin_emails() {
        let config = config_from(&[
            ("ACCESS_TOKEN_SECRET", "s3cret"),
            ("ADMIN_EMAILS", " root@x.com,,ops@x.com "),
        ])
        .unwrap();

        assert_eq!(config.admin_emails, vec!["root@x.com", "ops@x.com"]);
    }

    #[test]
    fn test_secret_is_required() {
        assert!(matches!(config_from(&[]), Err(AppError::Config(_))));
        assert!(matches!(
            config_from(&[("ACCESS_TOKEN_SECRET", "")]),
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn test_production_and_origins() {
        let config = config_from(&[
            ("ACCESS_TOKEN_SECRET", "s3cret"),
            ("NODE_ENV", "production"),
            ("CORS_ORIGINS", "https://a.example, https://b.example,"),
            ("PORT", "8080"),
        ])
        .unwrap();

        assert!(config.production);
        assert_eq!(config.port, 8080);
        assert_eq!(config.cors_origins, vec!["https://a.example", "https://b.example"]);
    }

    #[test]
    fn test_invalid_port() {
        let result = config_from(&[("ACCESS_TOKEN_SECRET", "s3cret"), ("PORT", "http")]);
        assert!(matches!(result, Err(AppError::Config(_))));
    }
}
