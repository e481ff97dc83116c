use thiserror::Error;

/// A malformed `track` call. These indicate a bug at the call site and are
/// returned before anything is sent.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Must have measurement name")]
    EmptyMeasurement,

    #[error("Fields must not be absent")]
    MissingFields,

    #[error("Empty fields are not allowed")]
    EmptyFields,

    #[error("Every field of measurement {measurement} is null")]
    NoFieldValues { measurement: String },

    #[error("Field {field} of measurement {measurement} is not a finite number")]
    NonFiniteField { measurement: String, field: String },
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("socket error: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not resolve {addr}")]
    Resolve { addr: String },

    #[error("sent {sent} of {expected} bytes")]
    ShortWrite { sent: usize, expected: usize },
}
