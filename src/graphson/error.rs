//! GraphSON codec errors.

use thiserror::Error;

/// Result type for codec operations.
pub type GraphSONResult<T> = Result<T, GraphSONError>;

/// Boxed cause carried by [`GraphSONError::Encode`].
pub type BoxedCause = Box<dyn std::error::Error + Send + Sync + 'static>;

/// GraphSON encode/decode errors.
#[derive(Error, Debug)]
pub enum GraphSONError {
    /// No encoder is registered for the value's kind
    #[error("Unsupported type: no encoder registered for {0}")]
    UnsupportedType(String),

    /// A registered encoder failed to produce a payload
    #[error("Failed to encode {value}: {source}")]
    Encode {
        /// Description of the value that failed
        value: String,
        /// Original cause
        #[source]
        source: BoxedCause,
    },

    /// Tag field present but no decoder registered for it
    #[error("Unknown tag: {0}")]
    UnknownTag(String),

    /// Tag recognized but payload shape or content is invalid
    #[error("Malformed {tag} payload: {message}")]
    MalformedPayload {
        /// Tag being decoded
        tag: String,
        /// What was wrong
        message: String,
    },

    /// WKT text could not be parsed into a geometry
    #[error("Malformed geometry: {0}")]
    MalformedGeometry(String),

    /// Nesting exceeded the configured depth ceiling
    #[error("Nesting too deep: limit is {limit}")]
    TooDeep {
        /// Configured ceiling
        limit: usize,
    },

    /// Input was not valid JSON text
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GraphSONError {
    /// Create an unsupported type error
    pub fn unsupported(kind: impl Into<String>) -> Self {
        Self::UnsupportedType(kind.into())
    }

    /// Create an encode error wrapping a cause
    pub fn encode(value: impl Into<String>, source: impl Into<BoxedCause>) -> Self {
        Self::Encode {
            value: value.into(),
            source: source.into(),
        }
    }

    /// Create an unknown tag error
    pub fn unknown_tag(tag: impl Into<String>) -> Self {
        Self::UnknownTag(tag.into())
    }

    /// Create a malformed payload error
    pub fn malformed(tag: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedPayload {
            tag: tag.into(),
            message: message.into(),
        }
    }

    /// Create a malformed geometry error
    pub fn geometry(message: impl Into<String>) -> Self {
        Self::MalformedGeometry(message.into())
    }

    /// Whether this error was raised while encoding
    pub fn is_encode_error(&self) -> bool {
        matches!(self, Self::UnsupportedType(_) | Self::Encode { .. })
    }

    /// Whether this error was raised while decoding
    pub fn is_decode_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownTag(_)
                | Self::MalformedPayload { .. }
                | Self::MalformedGeometry(_)
                | Self::Json(_)
        )
    }

    /// Whether this is a malformed payload (geometry errors included)
    pub fn is_malformed_payload(&self) -> bool {
        matches!(self, Self::MalformedPayload { .. } | Self::MalformedGeometry(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_error_display() {
        let err = GraphSONError::unknown_tag("g:Bogus");
        assert_eq!(err.to_string(), "Unknown tag: g:Bogus");

        let err = GraphSONError::malformed("g:Int32", "expected integer");
        assert_eq!(err.to_string(), "Malformed g:Int32 payload: expected integer");

        let err = GraphSONError::TooDeep { limit: 10 };
        assert_eq!(err.to_string(), "Nesting too deep: limit is 10");
    }

    #[test]
    fn test_encode_error_keeps_cause() {
        let err = GraphSONError::encode("Instant(2020-01-01)", "sub-second precision");
        assert!(err.is_encode_error());
        assert_eq!(err.source().unwrap().to_string(), "sub-second precision");
    }

    #[test]
    fn test_classification() {
        assert!(GraphSONError::geometry("bad").is_malformed_payload());
        assert!(GraphSONError::geometry("bad").is_decode_error());
        assert!(GraphSONError::unsupported("Vertex").is_encode_error());
        assert!(!GraphSONError::unknown_tag("g:X").is_malformed_payload());
        assert!(!GraphSONError::TooDeep { limit: 1 }.is_decode_error());
    }
}
