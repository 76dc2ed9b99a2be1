use std::env;

/// Runtime configuration, read once at boot from the environment (and `.env`).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub redis_url: String,
    pub supabase_url: String,
    pub supabase_anon_key: String,
    /// Legacy HS256 project secret. When set, tokens are verified with it
    /// instead of the JWKS endpoint.
    pub supabase_jwt_secret: Option<String>,
    /// Lower-cased e-mails allowed into the admin API. Empty means any
    /// authenticated user.
    pub admin_emails: Vec<String>,
    pub storage_bucket: String,
    pub upload_max_mb: u64,
    pub port: u16,
    pub run_migrations: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("Invalid SUPABASE_URL format. Expected: https://PROJECT.supabase.co")]
    InvalidSupabaseUrl,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let supabase_url = required("SUPABASE_URL")?
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            redis_url: required("REDIS_URL")?,
            supabase_url,
            supabase_anon_key: required("SUPABASE_ANON_KEY")?,
            supabase_jwt_secret: env::var("SUPABASE_JWT_SECRET")
                .ok()
                .filter(|s| !s.is_empty()),
            admin_emails: parse_list(&env::var("ADMIN_EMAILS").unwrap_or_default()),
            storage_bucket: env::var("STORAGE_BUCKET")
                .unwrap_or_else(|_| "portfolio-images".to_string()),
            upload_max_mb: parse_or("UPLOAD_MAX_MB", 5),
            port: parse_or("PORT", 8080),
            run_migrations: parse_or("RUN_MIGRATIONS", false),
        })
    }

    /// The Supabase project ref, e.g. `abcd` for `https://abcd.supabase.co`.
    pub fn project_ref(&self) -> Result<&str, ConfigError> {
        self.supabase_url
            .strip_prefix("https://")
            .and_then(|s| s.strip_suffix(".supabase.co"))
            .ok_or(ConfigError::InvalidSupabaseUrl)
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name).map_err(|_| ConfigError::Missing(name))
}

fn parse_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Split a comma separated list, dropping blanks and lower-casing entries.
pub fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_list_trims_and_lowercases() {
        assert_eq!(
            parse_list(" Admin@Example.com, ,ops@example.com "),
            vec!["admin@example.com".to_string(), "ops@example.com".to_string()]
        );
        assert!(parse_list("").is_empty());
    }

    #[test]
    fn project_ref_is_extracted_from_supabase_url() {
        let config = AppConfig {
            database_url: String::new(),
            redis_url: String::new(),
            supabase_url: "https://abcd1234.supabase.co".to_string(),
            supabase_anon_key: String::new(),
            supabase_jwt_secret: None,
            admin_emails: Vec::new(),
            storage_bucket: "portfolio-images".to_string(),
            upload_max_mb: 5,
            port: 8080,
            run_migrations: false,
        };
        assert_eq!(config.project_ref().unwrap(), "abcd1234");
    }
}
