//! Config command handler

use std::str::FromStr;

use crate::application::ports::ConfigStore;
use crate::domain::config::{AppConfig, Backend, MonitorConfig};
use crate::domain::error::ConfigError;

use super::args::{is_valid_config_key, ConfigAction, VALID_CONFIG_KEYS};
use super::presenter::Presenter;

const NOT_SET: &str = "(not set)";

/// Handle config subcommand
pub async fn handle_config_command<S: ConfigStore>(
    action: ConfigAction,
    store: &S,
    presenter: &Presenter,
) -> Result<(), ConfigError> {
    match action {
        ConfigAction::Init => handle_init(store, presenter).await,
        ConfigAction::Set { key, value } => handle_set(store, presenter, &key, &value).await,
        ConfigAction::Get { key } => handle_get(store, presenter, &key).await,
        ConfigAction::List => handle_list(store, presenter).await,
        ConfigAction::Path => handle_path(store, presenter),
    }
}

async fn handle_init<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    store.init().await?;
    presenter.success(&format!(
        "Config file created at: {}",
        store.path().display()
    ));
    Ok(())
}

async fn handle_set<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
    value: &str,
) -> Result<(), ConfigError> {
    check_key(key)?;

    let mut config = store.load().await?;
    apply_value(&mut config, key, value)?;

    store.save(&config).await?;
    presenter.success(&format!("{} = {}", key, value));

    Ok(())
}

async fn handle_get<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
) -> Result<(), ConfigError> {
    check_key(key)?;

    let config = store.load().await?;
    let value = config_value(&config, key);
    presenter.output(value.as_deref().unwrap_or(NOT_SET));

    Ok(())
}

async fn handle_list<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    let config = store.load().await?;

    for key in VALID_CONFIG_KEYS {
        let value = config_value(&config, key);
        presenter.key_value(key, value.as_deref().unwrap_or(NOT_SET));
    }

    Ok(())
}

fn handle_path<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    presenter.output(&store.path().to_string_lossy());
    Ok(())
}

fn check_key(key: &str) -> Result<(), ConfigError> {
    if is_valid_config_key(key) {
        return Ok(());
    }
    Err(ConfigError::ValidationError {
        key: key.to_string(),
        message: format!("Unknown key. Valid keys: {}", VALID_CONFIG_KEYS.join(", ")),
    })
}

fn invalid(key: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError {
        key: key.to_string(),
        message: message.into(),
    }
}

/// Validate a value and store it in the config
fn apply_value(config: &mut AppConfig, key: &str, value: &str) -> Result<(), ConfigError> {
    match key {
        "formats" => config.formats = Some(parse_formats(key, value)?),
        "clipboard" => config.clipboard = Some(parse_bool_value(key, value)?),
        "selection" => config.selection = Some(parse_bool_value(key, value)?),
        "backend" => {
            let backend = Backend::from_str(value).map_err(|e| invalid(key, e.to_string()))?;
            config.backend = Some(backend.to_string());
        }
        "poll_interval_ms" => config.poll_interval_ms = Some(parse_millis(key, value)?),
        "monitor.min_interval_ms" => {
            monitor_mut(config).min_interval_ms = Some(parse_millis(key, value)?)
        }
        "monitor.max_interval_ms" => {
            monitor_mut(config).max_interval_ms = Some(parse_millis(key, value)?)
        }
        "monitor.max_retries" => {
            let retries = value
                .trim()
                .parse::<u32>()
                .map_err(|_| invalid(key, "Value must be a non-negative integer"))?;
            monitor_mut(config).max_retries = Some(retries);
        }
        _ => return Err(invalid(key, "Unknown key")),
    }
    Ok(())
}

/// Read a value from the config as display text
fn config_value(config: &AppConfig, key: &str) -> Option<String> {
    let monitor = config.monitor.as_ref();
    match key {
        "formats" => config.formats.as_ref().map(|f| f.join(",")),
        "clipboard" => config.clipboard.map(|b| b.to_string()),
        "selection" => config.selection.map(|b| b.to_string()),
        "backend" => config.backend.clone(),
        "poll_interval_ms" => config.poll_interval_ms.map(|ms| ms.to_string()),
        "monitor.min_interval_ms" => monitor
            .and_then(|m| m.min_interval_ms)
            .map(|ms| ms.to_string()),
        "monitor.max_interval_ms" => monitor
            .and_then(|m| m.max_interval_ms)
            .map(|ms| ms.to_string()),
        "monitor.max_retries" => monitor.and_then(|m| m.max_retries).map(|r| r.to_string()),
        _ => None,
    }
}

fn monitor_mut(config: &mut AppConfig) -> &mut MonitorConfig {
    config.monitor.get_or_insert_with(MonitorConfig::default)
}

fn parse_bool_value(key: &str, value: &str) -> Result<bool, ConfigError> {
    parse_bool(value).map_err(|_| invalid(key, "Value must be 'true' or 'false'"))
}

fn parse_millis(key: &str, value: &str) -> Result<u64, ConfigError> {
    match value.trim().parse::<u64>() {
        Ok(ms) if ms > 0 => Ok(ms),
        _ => Err(invalid(key, "Value must be a positive number of milliseconds")),
    }
}

/// Parse a comma separated list of MIME types
fn parse_formats(key: &str, value: &str) -> Result<Vec<String>, ConfigError> {
    let formats: Vec<String> = value
        .split(',')
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .map(str::to_string)
        .collect();

    if formats.is_empty() {
        return Err(invalid(key, "At least one format is required"));
    }
    if let Some(bad) = formats.iter().find(|f| !f.contains('/')) {
        return Err(invalid(
            key,
            format!("Invalid format '{}'. Expected a MIME type like text/plain", bad),
        ));
    }
    Ok(formats)
}

/// Parse a boolean value
fn parse_bool(value: &str) -> Result<bool, ()> {
    match value.to_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        _ => Err(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_bool_values() {
        assert_eq!(parse_bool("true"), Ok(true));
        assert_eq!(parse_bool("false"), Ok(false));
        assert_eq!(parse_bool("yes"), Ok(true));
        assert_eq!(parse_bool("no"), Ok(false));
        assert_eq!(parse_bool("1"), Ok(true));
        assert_eq!(parse_bool("0"), Ok(false));
        assert!(parse_bool("invalid").is_err());
    }

    #[test]
    fn formats_are_split_and_trimmed() {
        let formats = parse_formats("formats", "text/plain, text/html,").unwrap();
        assert_eq!(formats, vec!["text/plain", "text/html"]);
    }

    #[test]
    fn formats_must_be_mime_types() {
        assert!(parse_formats("formats", "plain").is_err());
        assert!(parse_formats("formats", " , ").is_err());
    }

    #[test]
    fn backend_is_normalized() {
        let mut config = AppConfig::empty();
        apply_value(&mut config, "backend", "X11").unwrap();
        assert_eq!(config.backend, Some("x11".to_string()));
        assert!(apply_value(&mut config, "backend", "carrier-pigeon").is_err());
    }

    #[test]
    fn monitor_keys_create_section() {
        let mut config = AppConfig::empty();
        apply_value(&mut config, "monitor.max_retries", "5").unwrap();
        apply_value(&mut config, "monitor.min_interval_ms", "20").unwrap();

        let monitor = config.monitor.as_ref().unwrap();
        assert_eq!(monitor.max_retries, Some(5));
        assert_eq!(monitor.min_interval_ms, Some(20));
        assert!(monitor.max_interval_ms.is_none());
    }

    #[test]
    fn intervals_must_be_positive() {
        let mut config = AppConfig::empty();
        assert!(apply_value(&mut config, "poll_interval_ms", "0").is_err());
        assert!(apply_value(&mut config, "monitor.max_interval_ms", "-5").is_err());
        assert!(apply_value(&mut config, "monitor.max_retries", "many").is_err());
    }

    #[test]
    fn every_key_reads_back() {
        let mut config = AppConfig::empty();
        for key in VALID_CONFIG_KEYS {
            assert!(config_value(&config, key).is_none());
        }

        config = AppConfig::defaults();
        for key in VALID_CONFIG_KEYS {
            assert!(config_value(&config, key).is_some(), "{} has no default", key);
        }
        assert_eq!(
            config_value(&config, "formats"),
            Some("text/plain,text/html".to_string())
        );
    }

    #[test]
    fn unknown_key_is_rejected() {
        let err = check_key("api_key").unwrap_err();
        assert!(err.to_string().contains("api_key"));
    }
}
