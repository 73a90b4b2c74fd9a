use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Read once at startup and passed by value to the components that need it.
#[derive(Debug, Clone)]
pub struct Config {
    pub supabase_url: String,
    /// Generation endpoint that streams the money line text back.
    pub run_url: String,
    /// Published CSV sheet holding the framework catalog.
    pub csv_url: String,
    pub api_key: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            supabase_url: require_env("SUPABASE_URL")?,
            run_url: require_env("RUNMONEYLINE_URL")?,
            csv_url: require_env("SHEET_CSV_URL")?,
            api_key: require_env("SUPABASE_ANON_KEY")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_env_reports_missing_key() {
        let err = require_env("MONEYLINES_TEST_SURELY_UNSET_VAR").unwrap_err();
        assert!(err.to_string().contains("MONEYLINES_TEST_SURELY_UNSET_VAR"));
    }
}
