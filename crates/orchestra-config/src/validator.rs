//! Configuration validation.

use crate::schema::{Config, ExecutorKind};

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

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
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

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> ValidationResult {
        let mut result = ValidationResult::default();

        Self::validate_server(config, &mut result);
        Self::validate_cors(config, &mut result);
        Self::validate_scheduler(config, &mut result);
        Self::validate_executor(config, &mut result);
        Self::validate_logging(config, &mut result);

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

    fn validate_cors(config: &Config, result: &mut ValidationResult) {
        if config.cors.allowed_origins.is_empty() {
            result.add_warning(ValidationWarning::new(
                "cors.allowed_origins",
                "No allowed origins, browsers will reject cross-origin requests",
            ));
        }

        for origin in &config.cors.allowed_origins {
            if origin != "*" && !origin.starts_with("http://") && !origin.starts_with("https://") {
                result.add_error(ValidationError::new(
                    "cors.allowed_origins",
                    format!("Origin '{}' must start with http:// or https://", origin),
                ));
            }
        }
    }

    fn validate_scheduler(config: &Config, result: &mut ValidationResult) {
        if config.scheduler.qa_role.trim().is_empty() {
            result.add_error(ValidationError::new(
                "scheduler.qa_role",
                "qa_role cannot be empty",
            ));
        }

        if config.scheduler.max_concurrent_tasks == Some(0) {
            result.add_error(ValidationError::new(
                "scheduler.max_concurrent_tasks",
                "max_concurrent_tasks must be greater than 0",
            ));
        }

    }

    fn validate_executor(config: &Config, result: &mut ValidationResult) {
        let executor = &config.executor;
        match executor.kind {
            ExecutorKind::Simulated => {
                if executor.bridge_url.is_some() {
                    result.add_warning(ValidationWarning::new(
                        "executor.bridge_url",
                        "bridge_url is ignored by the simulated executor",
                    ));
                }
            }
            ExecutorKind::Bridge => match &executor.bridge_url {
                None => result.add_error(ValidationError::new(
                    "executor.bridge_url",
                    "bridge_url is required for the bridge executor",
                )),
                Some(url) if !url.starts_with("http://") && !url.starts_with("https://") => {
                    result.add_error(ValidationError::new(
                        "executor.bridge_url",
                        "bridge_url must start with http:// or https://",
                    ))
                }
                Some(_) => {}
            },
        }

        if executor.timeout_seconds == 0 {
            result.add_error(ValidationError::new(
                "executor.timeout_seconds",
                "timeout_seconds must be greater than 0",
            ));
        }

        if executor.llm_model.trim().is_empty() {
            result.add_error(ValidationError::new(
                "executor.llm_model",
                "llm_model cannot be empty",
            ));
        }

        if !(0.0..=2.0).contains(&executor.temperature) {
            result.add_error(ValidationError::new(
                "executor.temperature",
                format!("temperature {} must be between 0.0 and 2.0", executor.temperature),
            ));
        }

        if !executor.fail_agents.is_empty() {
            result.add_warning(ValidationWarning::new(
                "executor.fail_agents",
                format!("Failure injection enabled for {:?}", executor.fail_agents),
            ));
        }
    }

    fn validate_logging(config: &Config, result: &mut ValidationResult) {
        let level = config.logging.level.to_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            result.add_warning(ValidationWarning::new(
                "logging.level",
                format!(
                    "'{}' is not a plain level, it will be used as a filter directive",
                    config.logging.level
                ),
            ));
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
