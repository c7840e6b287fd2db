//! Error Taxonomy
//!
//! Every error here is an expected, user-correctable condition. None of them
//! is fatal to the console process.

use thiserror::Error;

use crate::input::ValidationResult;

/// Failure to apply a raw JSON document to the value set.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DocumentError {
    /// The text is not syntactically valid JSON.
    #[error("Invalid JSON: {0}")]
    Parse(String),

    /// The JSON is valid but is not an object of key/value pairs.
    #[error("Input must be a JSON object, found {found}")]
    Schema { found: &'static str },

    /// One or more values are not numbers. Every offending key is listed.
    #[error("Values must be numbers. Invalid keys: {}", .keys.join(", "))]
    Type { keys: Vec<String> },
}

/// Failure of a single edit against the controller.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputError {
    #[error("Unknown feature '{0}'")]
    UnknownField(String),

    #[error(transparent)]
    Document(#[from] DocumentError),
}

/// Failure reaching or understanding the prediction service.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransportError {
    #[error("Prediction service did not answer within {secs} seconds")]
    Timeout { secs: u64 },

    #[error("Unable to reach prediction service at {url}: {reason}")]
    Unreachable { url: String, reason: String },

    /// Non-2xx status. `detail` is the service's own explanation when it sent one.
    #[error("{}", status_message(.status, .detail))]
    Status { status: u16, detail: Option<String> },

    #[error("Malformed response from prediction service: {0}")]
    Malformed(String),
}

fn status_message(status: &u16, detail: &Option<String>) -> String {
    match detail {
        Some(detail) => detail.clone(),
        None => format!("Prediction service returned HTTP {}", status),
    }
}

/// Reasons a submission is refused or fails.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SubmitError {
    #[error("A prediction request is already in flight")]
    Busy,

    #[error("The JSON document has unapplied changes; apply them first")]
    DocumentDirty,

    #[error("{} field(s) failed validation", .0.error_count())]
    Invalid(ValidationResult),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Configuration loading failure.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}
