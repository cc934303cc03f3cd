use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Upstream URL is http(s), timeout and poll interval are positive
/// - Upgrade tolerance is not negative and row heights are positive
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    // Server validation
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if let Some(upstream) = &config.upstream {
        if !(upstream.url.starts_with("http://") || upstream.url.starts_with("https://")) {
            return Err(ConfigError::ValidationError(format!(
                "upstream.url must start with http:// or https://, got {:?}",
                upstream.url
            )));
        }
        if upstream.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "upstream.timeout_secs cannot be 0".to_string(),
            ));
        }
        if upstream.poll_interval_secs == 0 {
            return Err(ConfigError::ValidationError(
                "upstream.poll_interval_secs cannot be 0".to_string(),
            ));
        }
        if upstream.instance_id.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "upstream.instance_id cannot be empty".to_string(),
            ));
        }
    }

    if config.engine.upgrade_tolerance < 0 {
        return Err(ConfigError::ValidationError(
            "engine.upgrade_tolerance cannot be negative".to_string(),
        ));
    }

    let heights = &config.engine.row_heights;
    if heights.group_header == 0 || heights.sub_group_header == 0 || heights.leaf == 0 {
        return Err(ConfigError::ValidationError(
            "engine.row_heights entries must be greater than 0".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ServerConfig, UpstreamConfig};
    use std::net::IpAddr;

    fn upstream(url: &str) -> UpstreamConfig {
        UpstreamConfig {
            url: url.to_string(),
            api_key: None,
            instance_id: "default".to_string(),
            timeout_secs: 30,
            poll_interval_secs: 30,
        }
    }

    #[test]
    fn test_validate_valid_config() {
        let config = Config {
            upstream: Some(upstream("https://fleet.example")),
            ..Default::default()
        };
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_port_zero_fails() {
        let config = Config {
            server: ServerConfig {
                host: "0.0.0.0".parse::<IpAddr>().unwrap(),
                port: 0,
            },
            ..Default::default()
        };
        let result = validate_config(&config);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_validate_upstream_scheme() {
        let config = Config {
            upstream: Some(upstream("fleet.example:7476")),
            ..Default::default()
        };
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_validate_zero_poll_interval_fails() {
        let mut up = upstream("http://fleet.example");
        up.poll_interval_secs = 0;
        let config = Config {
            upstream: Some(up),
            ..Default::default()
        };
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_negative_tolerance_fails() {
        let mut config = Config::default();
        config.engine.upgrade_tolerance = -1;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_zero_row_height_fails() {
        let mut config = Config::default();
        config.engine.row_heights.sub_group_header = 0;
        assert!(validate_config(&config).is_err());
    }
}
