use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::path::Path;

use super::{types::Config, ConfigError};

/// Prefix for environment variable overrides, e.g. `BATCHFLOW_WORKERS__COUNT=8`
pub const ENV_PREFIX: &str = "BATCHFLOW_";

/// Environment variable naming the config file itself.
///
/// It shares [`ENV_PREFIX`] but is not a config key, so overrides skip it.
pub const CONFIG_PATH_ENV: &str = "BATCHFLOW_CONFIG";

/// Key left over once the prefix is stripped from [`CONFIG_PATH_ENV`].
const CONFIG_PATH_KEY: &str = "config";

/// Load a batch run description from file, then apply environment overrides.
///
/// Keys contain underscores (`idle_interval_secs`, `flush_every`), so nested
/// sections are separated by `__`: `BATCHFLOW_MONITOR__IDLE_INTERVAL_SECS=10`
/// overrides `[monitor] idle_interval_secs`.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    let overrides = Env::prefixed(ENV_PREFIX)
        .ignore(&[CONFIG_PATH_KEY])
        .split("__");

    let config: Config = Figment::new()
        .merge(Toml::file(path))
        .merge(overrides)
        .extract()
        .map_err(|e| ConfigError::ParseError(format!("{}: {}", path.display(), e)))?;

    tracing::debug!(
        "Loaded batch config from {}: {} -> {}",
        path.display(),
        config.input.path.display(),
        config.output.path.display()
    );

    Ok(config)
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::OutputMode;
    use figment::Jail;

    const BATCH_TOML: &str = r#"
[input]
path = "users.txt"
separator = "|"

[output]
path = "failed.txt"
mode = "overwrite"

[workers]
count = 2

[monitor]
idle_interval_secs = 12

[action]
program = "./notify-user"
args = ["--dry-run"]
"#;

    #[test]
    fn test_load_config_from_str_valid() {
        let config = load_config_from_str(BATCH_TOML).unwrap();
        assert_eq!(config.workers.count, 2);
        assert_eq!(config.output.mode, OutputMode::Overwrite);
        let action = config.action.unwrap();
        assert_eq!(action.program, "./notify-user");
        assert_eq!(action.args, vec!["--dry-run"]);
    }

    #[test]
    fn test_load_config_from_str_missing_input() {
        let toml = r#"
[output]
path = "failed.csv"
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_load_config_from_str_unknown_mode() {
        let toml = r#"
[input]
path = "users.csv"

[output]
path = "failed.csv"
mode = "rotate"
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_load_config_file_not_found() {
        let err = load_config(Path::new("/nonexistent/batchflow.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }

    #[test]
    fn test_load_config_from_file() {
        Jail::expect_with(|jail| {
            jail.create_file("batchflow.toml", BATCH_TOML)?;

            let config = load_config(Path::new("batchflow.toml")).map_err(|e| e.to_string())?;
            assert_eq!(config.input.separator, "|");
            assert_eq!(config.monitor.idle_interval_secs, 12);
            assert_eq!(config.workers.spawn_delay_ms, 1000);
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_file_values() {
        Jail::expect_with(|jail| {
            jail.create_file("batchflow.toml", BATCH_TOML)?;
            jail.set_env("BATCHFLOW_WORKERS__COUNT", "9");
            jail.set_env("BATCHFLOW_MONITOR__IDLE_INTERVAL_SECS", "30");
            jail.set_env("BATCHFLOW_OUTPUT__MODE", "append");

            let config = load_config(Path::new("batchflow.toml")).map_err(|e| e.to_string())?;
            assert_eq!(config.workers.count, 9);
            assert_eq!(config.monitor.idle_interval_secs, 30);
            assert_eq!(config.output.mode, OutputMode::Append);
            // Untouched keys keep their file values.
            assert_eq!(config.input.separator, "|");
            assert_eq!(config.output.path.to_str().unwrap(), "failed.txt");
            Ok(())
        });
    }

    #[test]
    fn test_env_fills_keys_missing_from_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "batchflow.toml",
                r#"
[input]
path = "users.csv"

[output]
path = "failed.csv"
"#,
            )?;
            jail.set_env("BATCHFLOW_OUTPUT__FLUSH_EVERY", "50");
            jail.set_env("BATCHFLOW_WORKERS__SPAWN_DELAY_MS", "0");

            let config = load_config(Path::new("batchflow.toml")).map_err(|e| e.to_string())?;
            assert_eq!(config.output.flush_every, 50);
            assert_eq!(config.workers.spawn_delay_ms, 0);
            assert_eq!(config.workers.count, 4);
            Ok(())
        });
    }

    #[test]
    fn test_config_path_variable_is_not_an_override() {
        Jail::expect_with(|jail| {
            jail.create_file("batchflow.toml", BATCH_TOML)?;
            jail.set_env(CONFIG_PATH_ENV, "batchflow.toml");

            let config = load_config(Path::new("batchflow.toml")).map_err(|e| e.to_string())?;
            assert_eq!(config.workers.count, 2);
            Ok(())
        });
    }

    #[test]
    fn test_bad_env_value_reports_parse_error() {
        Jail::expect_with(|jail| {
            jail.create_file("batchflow.toml", BATCH_TOML)?;
            jail.set_env("BATCHFLOW_WORKERS__COUNT", "many");

            let err = load_config(Path::new("batchflow.toml")).unwrap_err();
            assert!(matches!(err, ConfigError::ParseError(ref msg) if msg.contains("batchflow.toml")));
            Ok(())
        });
    }
}
