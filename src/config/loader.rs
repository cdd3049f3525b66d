//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::PushcalConfig;
use crate::config::secret_string;
use crate::domain::errors::PushcalError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into PushcalConfig
/// 4. Applies environment variable overrides (PUSHCAL_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - Environment variable substitution fails
/// - Configuration validation fails
pub fn load_config(path: impl AsRef<Path>) -> Result<PushcalConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(PushcalError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        PushcalError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: PushcalConfig = toml::from_str(&contents)
        .map_err(|e| PushcalError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config);

    config.validate().map_err(|e| {
        PushcalError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("static regex");
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    // Process line by line to skip comments
    for line in input.lines() {
        let trimmed = line.trim_start();

        if trimmed.starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.contains(&var_name.to_string()) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(PushcalError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using the PUSHCAL_* prefix
///
/// Environment variables follow the pattern: PUSHCAL_<SECTION>_<KEY>
/// For example: PUSHCAL_SOURCE_DEVICE_IDEN, PUSHCAL_CALENDAR_TIME_ZONE
fn apply_env_overrides(config: &mut PushcalConfig) {
    if let Ok(val) = std::env::var("PUSHCAL_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // Source overrides
    if let Ok(val) = std::env::var("PUSHCAL_SOURCE_BASE_URL") {
        config.source.base_url = val;
    }
    if let Ok(val) = std::env::var("PUSHCAL_SOURCE_STREAM_URL") {
        config.source.stream_url = val;
    }
    if let Ok(val) = std::env::var("PUSHCAL_SOURCE_ACCESS_TOKEN") {
        config.source.access_token = secret_string(val);
    }
    if let Ok(val) = std::env::var("PUSHCAL_SOURCE_DEVICE_IDEN") {
        config.source.device_iden = val;
    }
    if let Ok(val) = std::env::var("PUSHCAL_SOURCE_BATCH_LIMIT") {
        if let Ok(limit) = val.parse() {
            config.source.batch_limit = limit;
        }
    }

    // OCR overrides
    if let Ok(val) = std::env::var("PUSHCAL_OCR_ENDPOINT") {
        config.ocr.endpoint = val;
    }
    if let Ok(val) = std::env::var("PUSHCAL_OCR_API_KEY") {
        config.ocr.api_key = secret_string(val);
    }

    // Model overrides
    if let Ok(val) = std::env::var("PUSHCAL_MODEL_ENDPOINT") {
        config.model.endpoint = val;
    }
    if let Ok(val) = std::env::var("PUSHCAL_MODEL_NAME") {
        config.model.name = val;
    }
    if let Ok(val) = std::env::var("PUSHCAL_MODEL_API_KEY") {
        config.model.api_key = Some(secret_string(val));
    }

    // Calendar overrides
    if let Ok(val) = std::env::var("PUSHCAL_CALENDAR_CALENDAR_ID") {
        config.calendar.calendar_id = val;
    }
    if let Ok(val) = std::env::var("PUSHCAL_CALENDAR_API_TOKEN") {
        config.calendar.api_token = secret_string(val);
    }
    if let Ok(val) = std::env::var("PUSHCAL_CALENDAR_TIME_ZONE") {
        config.calendar.time_zone = val;
    }

    // Supervisor overrides
    if let Ok(val) = std::env::var("PUSHCAL_SUPERVISOR_RETRY_DELAY_MS") {
        if let Ok(delay) = val.parse() {
            config.supervisor.retry_delay_ms = delay;
        }
    }
    if let Ok(val) = std::env::var("PUSHCAL_SUPERVISOR_MAX_CONSECUTIVE_FAILURES") {
        if let Ok(max) = val.parse() {
            config.supervisor.max_consecutive_failures = max;
        }
    }
    if let Ok(val) = std::env::var("PUSHCAL_SUPERVISOR_CURSOR_PATH") {
        config.supervisor.cursor_path = val;
    }

    // Logging overrides
    if let Ok(val) = std::env::var("PUSHCAL_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("PUSHCAL_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_substitute_env_vars() {
        std::env::set_var("PUSHCAL_TEST_VAR", "test_value");
        let input = "access_token = \"${PUSHCAL_TEST_VAR}\"";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, "access_token = \"test_value\"\n");
        std::env::remove_var("PUSHCAL_TEST_VAR");
    }

    #[test]
    fn test_substitute_env_vars_missing() {
        std::env::remove_var("PUSHCAL_MISSING_VAR");
        let input = "access_token = \"${PUSHCAL_MISSING_VAR}\"";
        let result = substitute_env_vars(input);
        assert!(result.is_err());
    }

    #[test]
    fn test_substitute_env_vars_skips_comments() {
        std::env::remove_var("PUSHCAL_COMMENTED_VAR");
        let input = "# token = \"${PUSHCAL_COMMENTED_VAR}\"";
        let result = substitute_env_vars(input);
        assert!(result.is_ok());
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("nonexistent.toml");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_valid() {
        let toml_content = r#"
[source]
access_token = "o.token"
device_iden = "dev-42"

[ocr]
api_key = "ocr-key"

[model]
endpoint = "http://localhost:8080/v1/chat/completions"
name = "llama-3.1-8b-instruct"

[calendar]
calendar_id = "primary"
api_token = "cal-token"
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let result = load_config(temp_file.path());
        assert!(result.is_ok());

        let config = result.unwrap();
        assert_eq!(config.source.device_iden, "dev-42");
        assert_eq!(config.source.batch_limit, 10);
        assert_eq!(config.calendar.time_zone, "UTC");
    }
}
