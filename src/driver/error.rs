//! Graph Error Types
//!
//! 그래프 실행 에러 정의

use thiserror::Error;

use crate::graphson::GraphSONError;

// ============================================================================
// GraphError - 그래프 에러
// ============================================================================

/// 그래프 에러
#[derive(Error, Debug)]
pub enum GraphError {
    /// GraphSON 인코딩/디코딩 에러
    #[error("Codec error: {0}")]
    Codec(#[from] GraphSONError),

    /// 쿼리 실행 에러
    #[error("Execution error: {0}")]
    Execution(String),

    /// 설정 에러
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// 결과 형식 에러
    #[error("Invalid result: {0}")]
    InvalidResult(String),
}

impl GraphError {
    /// 실행 에러 생성
    pub fn execution(msg: impl Into<String>) -> Self {
        Self::Execution(msg.into())
    }

    /// 설정 에러 생성
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// 결과 형식 에러 생성
    pub fn invalid_result(msg: impl Into<String>) -> Self {
        Self::InvalidResult(msg.into())
    }

    /// 코덱 에러 여부
    pub fn is_codec_error(&self) -> bool {
        matches!(self, Self::Codec(_))
    }

    /// 코덱 에러 참조
    pub fn as_codec_error(&self) -> Option<&GraphSONError> {
        match self {
            Self::Codec(e) => Some(e),
            _ => None,
        }
    }
}

// ============================================================================
// Result Type
// ============================================================================

/// 그래프 결과 타입
pub type GraphResult<T> = Result<T, GraphError>;

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graph_error_creation() {
        let err = GraphError::execution("Server timeout");
        assert!(matches!(err, GraphError::Execution(_)));

        let err = GraphError::configuration("Missing graph name");
        assert!(matches!(err, GraphError::Configuration(_)));
    }

    #[test]
    fn test_graph_error_display() {
        let err = GraphError::execution("Server timeout");
        assert_eq!(err.to_string(), "Execution error: Server timeout");

        let err: GraphError = GraphSONError::unknown_tag("g:Bogus").into();
        assert_eq!(err.to_string(), "Codec error: Unknown tag: g:Bogus");
    }

    #[test]
    fn test_codec_error_access() {
        let err: GraphError = GraphSONError::TooDeep { limit: 3 }.into();
        assert!(err.is_codec_error());
        assert!(matches!(err.as_codec_error(), Some(GraphSONError::TooDeep { limit: 3 })));

        let err = GraphError::invalid_result("empty row");
        assert!(!err.is_codec_error());
        assert!(err.as_codec_error().is_none());
    }
}
