use thiserror::Error;

// Failures raised while normalizing a single flight
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransformError {
    #[error("Malformed money token: {0}")]
    MalformedMoneyToken(String),

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),
}

// Failures raised while turning a whole upstream document into a response
#[derive(Error, Debug)]
pub enum AvailabilityError {
    #[error("XML parse error: {0}")]
    XmlParseError(String),

    #[error("Flight #{index} could not be normalized: {source}")]
    Flight {
        index: usize,
        #[source]
        source: TransformError,
    },

    #[error("JSON serialize error: {0}")]
    JsonSerializeError(String),
}

impl AvailabilityError {
    pub fn flight(index: usize, source: TransformError) -> Self {
        AvailabilityError::Flight { index, source }
    }

    /// Position of the offending flight in the upstream document, if any.
    pub fn flight_index(&self) -> Option<usize> {
        match self {
            AvailabilityError::Flight { index, .. } => Some(*index),
            _ => None,
        }
    }
}
