//! Configuration validation.

use url::Url;

use crate::schema::Config;

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> ValidationResult {
        let mut result = ValidationResult::default();

        Self::validate_server(config, &mut result);
        Self::validate_credentials(config, &mut result);
        Self::validate_gemini(config, &mut result);
        Self::validate_bridge(config, &mut result);
        Self::validate_client(config, &mut result);

        result
    }

    fn validate_server(config: &Config, result: &mut ValidationResult) {
        if config.server.port == 0 {
            result.add_error(ValidationError::new("server.port", "Port cannot be 0"));
        }

        if config.server.host.is_empty() {
            result.add_error(ValidationError::new("server.host", "Host cannot be empty"));
        }
    }

    fn validate_credentials(config: &Config, result: &mut ValidationResult) {
        if config.credentials.is_empty() {
            result.add_warning(ValidationWarning::new(
                "credentials.api_keys",
                "No server credentials configured; requests without a caller key will fail",
            ));
        }
    }

    fn validate_gemini(config: &Config, result: &mut ValidationResult) {
        let gemini = &config.gemini;
        if gemini.model.trim().is_empty() {
            result.add_error(ValidationError::new("gemini.model", "Model cannot be empty"));
        }

        if Url::parse(&gemini.base_url).is_err() {
            result.add_error(ValidationError::new(
                "gemini.base_url",
                format!("Not a valid URL: {}", gemini.base_url),
            ));
        }

        if gemini.min_groups == 0 {
            result.add_error(ValidationError::new(
                "gemini.min_groups",
                "min_groups must be greater than 0",
            ));
        }

        if gemini.min_groups > gemini.max_groups {
            result.add_error(ValidationError::new(
                "gemini.max_groups",
                "max_groups must not be lower than min_groups",
            ));
        }
    }

    fn validate_bridge(config: &Config, result: &mut ValidationResult) {
        let bridge = &config.bridge;
        if bridge.heartbeat_interval_ms == 0 {
            result.add_error(ValidationError::new(
                "bridge.heartbeat_interval_ms",
                "Heartbeat interval must be greater than 0",
            ));
        }

        if bridge.page_source.is_empty() || bridge.extension_source.is_empty() {
            result.add_error(ValidationError::new(
                "bridge",
                "Source tags cannot be empty",
            ));
        } else if bridge.page_source == bridge.extension_source {
            result.add_error(ValidationError::new(
                "bridge.extension_source",
                "Page and extension source tags must differ",
            ));
        }
    }

    fn validate_client(config: &Config, result: &mut ValidationResult) {
        if Url::parse(&config.client.endpoint).is_err() {
            result.add_error(ValidationError::new(
                "client.endpoint",
                format!("Not a valid URL: {}", config.client.endpoint),
            ));
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
