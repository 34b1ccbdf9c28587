use crate::config::types::Config;
use crate::ConfigError;
use url::Url;

/// Validates a parsed configuration
///
/// Checks that the politeness delay range is sane, retry settings are
/// usable, the base URL parses, and every session type override names a
/// known type.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.crawler.min_delay_secs < 0.0 {
        return Err(ConfigError::Validation(
            "min-delay-secs must not be negative".to_string(),
        ));
    }

    if config.crawler.max_delay_secs < config.crawler.min_delay_secs {
        return Err(ConfigError::Validation(format!(
            "max-delay-secs ({}) must be >= min-delay-secs ({})",
            config.crawler.max_delay_secs, config.crawler.min_delay_secs
        )));
    }

    if config.crawler.max_retries == 0 {
        return Err(ConfigError::Validation(
            "max-retries must be at least 1".to_string(),
        ));
    }

    if Url::parse(&config.site.base_url).is_err() {
        return Err(ConfigError::InvalidUrl(config.site.base_url.clone()));
    }

    if config.output.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database-path must not be empty".to_string(),
        ));
    }

    if config.levels.is_empty() {
        return Err(ConfigError::Validation(
            "at least one [[levels]] entry is required".to_string(),
        ));
    }

    for level in &config.levels {
        if level.total_units == 0 {
            return Err(ConfigError::Validation(format!(
                "level '{}' must have total-units >= 1",
                level.slug
            )));
        }
    }

    const KNOWN_TYPES: &[&str] = &[
        "vocabulary",
        "grammar",
        "reading",
        "listening",
        "drama",
        "quiz",
    ];

    for entry in &config.session_types {
        if !KNOWN_TYPES.contains(&entry.session_type.as_str()) {
            return Err(ConfigError::Validation(format!(
                "unknown session type '{}' for unit {} session {}",
                entry.session_type, entry.unit, entry.session
            )));
        }
    }

    Ok(())
}
