//! A custom error type for the STIX importer, with its associated functions.
use thiserror::Error;

/// Custom Error type for the OpenCTI STIX2 connector
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StixError {
    // For returning multiple errors at once, e.g. during bundle validation
    #[error("Multiple errors: {0:?}")]
    MultipleErrors(Vec<StixError>),
    // Bundle shape errors
    #[error("Malformed STIX2 bundle: {0}")]
    MalformedBundle(String),
    #[error("Object of type {object_type} must have the '{property}' property set.")]
    MissingProperty {
        object_type: String,
        property: String,
    },
    // (De)serialization and JSON parsing related errors
    // `serde_json:Error`s are converted to Strings during error mapping because that Error type does not `impl Clone`
    #[error("Unexpected JSON format")]
    UnexpectedJsonFormat,
    #[error("Serialization error: {0}")]
    SerializationError(String),
    #[error("Deserialization error: {0}")]
    DeserializationError(String),
    #[error("Invalid configuration: {0}")]
    ConfigError(String),
    // Errors raised by the remote platform client
    #[error("OpenCTI platform error: {0}")]
    Platform(String),
}

/// Return a Vec of StixErrors as a single Error, unless the Vec is empty
///
/// This is useful when checking multiple possible sources of error, such as during bundle validation
pub fn return_multiple_errors(errors: Vec<StixError>) -> Result<(), StixError> {
    if errors.is_empty() {
        return Ok(());
    }
    // If there is only one Error in the Vec, return it as itself
    if errors.len() == 1 {
        return Err(errors[0].clone());
    }
    Err(StixError::MultipleErrors(errors))
}
