use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Worker count, idle interval and flush batch size are not 0
/// - Separator is exactly one ASCII character
/// - Input and output are different files
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.workers.count == 0 {
        return Err(ConfigError::ValidationError(
            "workers.count cannot be 0".to_string(),
        ));
    }

    if config.monitor.idle_interval_secs == 0 {
        return Err(ConfigError::ValidationError(
            "monitor.idle_interval_secs cannot be 0".to_string(),
        ));
    }

    if config.output.flush_every == 0 {
        return Err(ConfigError::ValidationError(
            "output.flush_every cannot be 0".to_string(),
        ));
    }

    if config.input.separator_byte().is_none() {
        return Err(ConfigError::ValidationError(format!(
            "input.separator must be a single ASCII character, got {:?}",
            config.input.separator
        )));
    }

    if config.input.path == config.output.path {
        return Err(ConfigError::ValidationError(format!(
            "input.path and output.path are the same file: {}",
            config.input.path.display()
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitor::MonitorConfig;
    use crate::sink::SinkConfig;
    use crate::source::SourceConfig;
    use crate::worker::WorkerConfig;

    fn valid_config() -> Config {
        Config {
            input: SourceConfig::new("in.csv"),
            output: SinkConfig::new("out.csv"),
            workers: WorkerConfig::default(),
            monitor: MonitorConfig::default(),
            action: None,
        }
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn test_validate_zero_workers_fails() {
        let mut config = valid_config();
        config.workers.count = 0;
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_validate_zero_interval_fails() {
        let mut config = valid_config();
        config.monitor.idle_interval_secs = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_zero_flush_every_fails() {
        let mut config = valid_config();
        config.output.flush_every = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_separator() {
        let mut config = valid_config();
        config.input.separator = "::".to_string();
        assert!(validate_config(&config).is_err());

        config.input.separator = String::new();
        assert!(validate_config(&config).is_err());

        config.input.separator = "é".to_string();
        assert!(validate_config(&config).is_err());

        config.input.separator = "\t".to_string();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_same_paths_fails() {
        let mut config = valid_config();
        config.output.path = config.input.path.clone();
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("same file"));
    }
}
