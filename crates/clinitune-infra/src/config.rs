//! Configuration loader for CliniTune.
//!
//! Reads `config.toml` from the data directory (`~/.clinitune/` in production)
//! and deserializes it into [`AppConfig`]. Falls back to defaults when the
//! file is missing or malformed.

use std::path::{Path, PathBuf};

use secrecy::SecretString;

use clinitune_types::config::AppConfig;

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "CLINITUNE_DATA_DIR";

/// Environment variable holding the Gemini API key.
pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Resolve the data directory.
///
/// Priority:
/// 1. `CLINITUNE_DATA_DIR` environment variable
/// 2. `~/.clinitune`
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        return PathBuf::from(dir);
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".clinitune");
    }
    PathBuf::from(".clinitune")
}

/// SQLite URL for the database file inside `data_dir`.
pub fn database_url(data_dir: &Path) -> String {
    format!("sqlite://{}?mode=rwc", data_dir.join("clinitune.db").display())
}

/// The Gemini API key, if set and non-empty.
pub fn gemini_api_key() -> Option<SecretString> {
    std::env::var(GEMINI_API_KEY_ENV)
        .ok()
        .map(|key| key.trim().to_string())
        .filter(|key| !key.is_empty())
        .map(SecretString::from)
}

/// Load configuration from `{data_dir}/config.toml`.
///
/// - Missing file: defaults.
/// - Unreadable or unparsable file: logs a warning, then defaults.
///
/// The result is always [`clamped`](AppConfig::clamped).
pub async fn load_config(data_dir: &Path) -> AppConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return AppConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return AppConfig::default();
        }
    };

    match toml::from_str::<AppConfig>(&content) {
        Ok(config) => config.clamped(),
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            AppConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_config_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).await;
        assert_eq!(config.triage.analysis_interval, 3);
        assert_eq!(config.llm.model, "gemini-2.0-flash-exp");
    }

    #[tokio::test]
    async fn load_config_partial_toml_keeps_other_defaults() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(
            tmp.path().join("config.toml"),
            r#"
[llm]
model = "gemini-1.5-pro"

[triage]
analysis_interval = 0
"#,
        )
        .await
        .unwrap();

        let config = load_config(tmp.path()).await;
        assert_eq!(config.llm.model, "gemini-1.5-pro");
        assert_eq!(config.llm.max_output_tokens, 200);
        // zero would disable periodic analysis entirely
        assert_eq!(config.triage.analysis_interval, 1);
        assert_eq!(config.auth.session_ttl_hours, 168);
    }

    #[tokio::test]
    async fn load_config_invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(tmp.path().join("config.toml"), "this is not { valid toml !!!")
            .await
            .unwrap();

        let config = load_config(tmp.path()).await;
        assert_eq!(config.triage.analysis_window, 3);
    }

    #[test]
    fn test_database_url_points_into_data_dir() {
        let url = database_url(Path::new("/tmp/clinitune-test"));
        assert_eq!(url, "sqlite:///tmp/clinitune-test/clinitune.db?mode=rwc");
    }

    #[test]
    fn test_resolve_data_dir_from_env() {
        // SAFETY: This test is single-threaded and restores the env var immediately.
        unsafe {
            std::env::set_var(DATA_DIR_ENV, "/tmp/test-clinitune");
        }
        let dir = resolve_data_dir();
        assert_eq!(dir, PathBuf::from("/tmp/test-clinitune"));
        unsafe {
            std::env::remove_var(DATA_DIR_ENV);
        }
    }
}
