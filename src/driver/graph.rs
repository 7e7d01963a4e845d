//! DSE Graph - 트래버설 실행
//!
//! 바이트코드 트래버설을 GraphSON 쿼리로 변환해 실행기로 전달

use std::fmt;
use std::sync::Arc;

use crate::graphson::{self, Bytecode, Traverser, Value};

use super::config::{GraphOptions, BYTECODE_JSON_LANGUAGE};
use super::error::{GraphError, GraphResult};
use super::record::{graph_traversal_traverser_row_factory, RowFactory};

// ============================================================================
// GraphExecutor - 쿼리 실행기
// ============================================================================

/// 그래프 쿼리 실행기
///
/// 쿼리 문자열과 옵션을 받아 원시 GraphSON 결과 행을 반환
pub trait GraphExecutor: Send + Sync {
    /// 쿼리 실행
    fn execute_graph(&self, query: &str, options: &GraphOptions) -> GraphResult<Vec<String>>;
}

impl<E: GraphExecutor + ?Sized> GraphExecutor for Arc<E> {
    fn execute_graph(&self, query: &str, options: &GraphOptions) -> GraphResult<Vec<String>> {
        (**self).execute_graph(query, options)
    }
}

// ============================================================================
// DseGraph
// ============================================================================

/// DSE 그래프 트래버설 실행
pub struct DseGraph<E> {
    executor: Arc<E>,
    options: GraphOptions,
}

impl<E> Clone for DseGraph<E> {
    fn clone(&self) -> Self {
        Self {
            executor: Arc::clone(&self.executor),
            options: self.options.clone(),
        }
    }
}

impl<E: GraphExecutor + 'static> DseGraph<E> {
    /// 새 그래프 생성
    pub fn new(executor: E, graph_name: impl Into<String>) -> Self {
        Self {
            executor: Arc::new(executor),
            options: GraphOptions::new().with_graph_name(graph_name),
        }
    }

    /// 옵션 지정
    pub fn with_options(executor: E, options: GraphOptions) -> Self {
        Self {
            executor: Arc::new(executor),
            options,
        }
    }

    /// 옵션 참조
    pub fn options(&self) -> &GraphOptions {
        &self.options
    }

    /// 실행기 참조
    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// 바이트코드를 쿼리 문자열로 변환
    pub fn prepare_traversal_query(bytecode: &Bytecode) -> GraphResult<String> {
        graphson::write_bytecode(bytecode).map_err(|e| {
            tracing::error!(error = %e, "failed to encode traversal bytecode");
            GraphError::from(e)
        })
    }

    /// 트래버설 실행 옵션
    ///
    /// 쿼리 언어는 항상 bytecode-json
    pub fn traversal_options(&self) -> GraphOptions {
        self.options.clone().with_graph_language(BYTECODE_JSON_LANGUAGE)
    }

    /// 트래버설 실행
    pub fn execute_traversal(&self, bytecode: &Bytecode) -> GraphResult<Vec<Value>> {
        self.execute_with(bytecode, RowFactory::Value)
    }

    /// 지정한 행 팩토리로 트래버설 실행
    pub fn execute_with(&self, bytecode: &Bytecode, factory: RowFactory) -> GraphResult<Vec<Value>> {
        let query = Self::prepare_traversal_query(bytecode)?;
        let options = self.traversal_options();
        options.validate()?;
        tracing::debug!(
            graph = options.graph_name.as_deref().unwrap_or(""),
            steps = bytecode.step_instructions.len(),
            "executing traversal"
        );
        let rows = self.executor.execute_graph(&query, &options)?;
        factory.apply(&rows)
    }

    /// 트래버서 단위로 트래버설 제출
    pub fn submit(&self, bytecode: &Bytecode) -> GraphResult<Vec<Traverser>> {
        let query = Self::prepare_traversal_query(bytecode)?;
        let options = self.traversal_options();
        options.validate()?;
        let rows = self.executor.execute_graph(&query, &options)?;
        graph_traversal_traverser_row_factory(&rows)
    }

    /// 비동기 트래버설 실행
    pub async fn execute_traversal_async(&self, bytecode: Bytecode) -> GraphResult<Vec<Value>> {
        let graph = self.clone();
        tokio::task::spawn_blocking(move || graph.execute_traversal(&bytecode))
            .await
            .map_err(|e| GraphError::execution(format!("Traversal task failed: {}", e)))?
    }
}

impl<E> fmt::Display for DseGraph<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<DseGraph: graph_name='{}'>",
            self.options.graph_name.as_deref().unwrap_or("")
        )
    }
}

impl<E> fmt::Debug for DseGraph<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DseGraph")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
