//! Graph Options
//!
//! 그래프 쿼리 실행 옵션

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::error::{GraphError, GraphResult};

/// 기본 트래버설 소스 이름
pub const DEFAULT_GRAPH_SOURCE: &str = "g";
/// 기본 쿼리 언어
pub const DEFAULT_GRAPH_LANGUAGE: &str = "gremlin-groovy";
/// 바이트코드 트래버설 쿼리 언어
pub const BYTECODE_JSON_LANGUAGE: &str = "bytecode-json";

// ============================================================================
// Consistency - 일관성 수준
// ============================================================================

/// 일관성 수준
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Consistency {
    /// ANY
    Any,
    /// ONE
    One,
    /// TWO
    Two,
    /// THREE
    Three,
    /// QUORUM
    Quorum,
    /// ALL
    All,
    /// LOCAL_QUORUM
    LocalQuorum,
    /// EACH_QUORUM
    EachQuorum,
    /// LOCAL_ONE
    LocalOne,
}

impl Consistency {
    /// 와이어 이름
    pub fn as_str(&self) -> &'static str {
        match self {
            Consistency::Any => "ANY",
            Consistency::One => "ONE",
            Consistency::Two => "TWO",
            Consistency::Three => "THREE",
            Consistency::Quorum => "QUORUM",
            Consistency::All => "ALL",
            Consistency::LocalQuorum => "LOCAL_QUORUM",
            Consistency::EachQuorum => "EACH_QUORUM",
            Consistency::LocalOne => "LOCAL_ONE",
        }
    }
}

impl fmt::Display for Consistency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// GraphOptions - 그래프 옵션
// ============================================================================

/// 그래프 쿼리 옵션
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphOptions {
    /// 그래프 이름
    pub graph_name: Option<String>,
    /// 트래버설 소스 이름
    pub graph_source: String,
    /// 쿼리 언어
    pub graph_language: String,
    /// 읽기 일관성
    pub read_consistency: Option<Consistency>,
    /// 쓰기 일관성
    pub write_consistency: Option<Consistency>,
    /// 요청 타임아웃
    pub request_timeout: Option<Duration>,
}

impl GraphOptions {
    /// 새 옵션 생성
    pub fn new() -> Self {
        Self::default()
    }

    /// 빌더 시작
    pub fn builder() -> GraphOptionsBuilder {
        GraphOptionsBuilder::new()
    }

    /// 그래프 이름 설정
    pub fn with_graph_name(mut self, name: impl Into<String>) -> Self {
        self.graph_name = Some(name.into());
        self
    }

    /// 쿼리 언어 설정
    pub fn with_graph_language(mut self, language: impl Into<String>) -> Self {
        self.graph_language = language.into();
        self
    }

    /// 옵션 검증
    pub fn validate(&self) -> GraphResult<()> {
        if self.graph_source.is_empty() {
            return Err(GraphError::configuration("graph_source must not be empty"));
        }
        if self.graph_language.is_empty() {
            return Err(GraphError::configuration("graph_language must not be empty"));
        }
        if self.request_timeout == Some(Duration::ZERO) {
            return Err(GraphError::configuration("request_timeout must be positive"));
        }
        Ok(())
    }

    /// 실행 요청에 실어 보낼 커스텀 페이로드
    pub fn as_payload(&self) -> BTreeMap<String, String> {
        let mut payload = BTreeMap::new();
        if let Some(name) = &self.graph_name {
            payload.insert("graph-name".to_string(), name.clone());
        }
        payload.insert("graph-source".to_string(), self.graph_source.clone());
        payload.insert("graph-language".to_string(), self.graph_language.clone());
        if let Some(c) = self.read_consistency {
            payload.insert("graph-read-consistency".to_string(), c.to_string());
        }
        if let Some(c) = self.write_consistency {
            payload.insert("graph-write-consistency".to_string(), c.to_string());
        }
        if let Some(timeout) = self.request_timeout {
            payload.insert("request-timeout".to_string(), timeout.as_millis().to_string());
        }
        payload
    }
}

impl Default for GraphOptions {
    fn default() -> Self {
        Self {
            graph_name: None,
            graph_source: DEFAULT_GRAPH_SOURCE.to_string(),
            graph_language: DEFAULT_GRAPH_LANGUAGE.to_string(),
            read_consistency: None,
            write_consistency: None,
            request_timeout: None,
        }
    }
}

// ============================================================================
// GraphOptionsBuilder - 그래프 옵션 빌더
// ============================================================================

/// 그래프 옵션 빌더
#[derive(Debug, Default)]
pub struct GraphOptionsBuilder {
    options: GraphOptions,
}

impl GraphOptionsBuilder {
    /// 새 빌더 생성
    pub fn new() -> Self {
        Self::default()
    }

    /// 그래프 이름 설정
    pub fn with_graph_name(mut self, name: impl Into<String>) -> Self {
        self.options.graph_name = Some(name.into());
        self
    }

    /// 트래버설 소스 설정
    pub fn with_graph_source(mut self, source: impl Into<String>) -> Self {
        self.options.graph_source = source.into();
        self
    }

    /// 쿼리 언어 설정
    pub fn with_graph_language(mut self, language: impl Into<String>) -> Self {
        self.options.graph_language = language.into();
        self
    }

    /// 읽기 일관성 설정
    pub fn with_read_consistency(mut self, consistency: Consistency) -> Self {
        self.options.read_consistency = Some(consistency);
        self
    }

    /// 쓰기 일관성 설정
    pub fn with_write_consistency(mut self, consistency: Consistency) -> Self {
        self.options.write_consistency = Some(consistency);
        self
    }

    /// 요청 타임아웃 설정
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.options.request_timeout = Some(timeout);
        self
    }

    /// 빌드
    pub fn build(self) -> GraphOptions {
        self.options
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = GraphOptions::default();
        assert_eq!(options.graph_name, None);
        assert_eq!(options.graph_source, "g");
        assert_eq!(options.graph_language, "gremlin-groovy");
    }

    #[test]
    fn test_builder() {
        let options = GraphOptions::builder()
            .with_graph_name("modern")
            .with_graph_language(BYTECODE_JSON_LANGUAGE)
            .with_read_consistency(Consistency::LocalQuorum)
            .with_write_consistency(Consistency::One)
            .with_request_timeout(Duration::from_secs(30))
            .build();

        assert_eq!(options.graph_name.as_deref(), Some("modern"));
        assert_eq!(options.graph_language, "bytecode-json");
        assert_eq!(options.read_consistency, Some(Consistency::LocalQuorum));
        assert_eq!(options.request_timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_payload() {
        let payload = GraphOptions::builder()
            .with_graph_name("modern")
            .with_read_consistency(Consistency::LocalQuorum)
            .with_request_timeout(Duration::from_millis(1500))
            .build()
            .as_payload();

        assert_eq!(payload.get("graph-name").map(String::as_str), Some("modern"));
        assert_eq!(payload.get("graph-source").map(String::as_str), Some("g"));
        assert_eq!(
            payload.get("graph-read-consistency").map(String::as_str),
            Some("LOCAL_QUORUM")
        );
        assert_eq!(payload.get("request-timeout").map(String::as_str), Some("1500"));
        assert!(!payload.contains_key("graph-write-consistency"));
    }

    #[test]
    fn test_validate() {
        assert!(GraphOptions::default().validate().is_ok());

        let options = GraphOptions::builder().with_graph_source("").build();
        assert!(matches!(options.validate(), Err(GraphError::Configuration(_))));

        let options = GraphOptions::builder()
            .with_request_timeout(Duration::ZERO)
            .build();
        assert!(matches!(options.validate(), Err(GraphError::Configuration(_))));
    }

    #[test]
    fn test_serde() {
        let options: GraphOptions = serde_json::from_str(
            r#"{"graph_name": "modern", "read_consistency": "LOCAL_ONE"}"#,
        )
        .unwrap();
        assert_eq!(options.graph_name.as_deref(), Some("modern"));
        assert_eq!(options.graph_source, "g");
        assert_eq!(options.read_consistency, Some(Consistency::LocalOne));

        let text = serde_json::to_string(&options).unwrap();
        let back: GraphOptions = serde_json::from_str(&text).unwrap();
        assert_eq!(options, back);
    }
}
