//! Driver Module
//!
//! DSE Graph 트래버설 실행 계층
//!
//! - GraphOptions: 그래프 이름, 쿼리 언어, 일관성, 타임아웃
//! - GraphExecutor: 쿼리 문자열을 서버로 보내는 실행기
//! - DseGraph: 바이트코드 인코딩, 실행, 결과 행 디코딩
//!
//! # Example
//!
//! ```ignore
//! use dse_graph::driver::{DseGraph, GraphExecutor};
//! use dse_graph::graphson::Bytecode;
//!
//! let graph = DseGraph::new(executor, "modern");
//!
//! let bytecode = Bytecode::new()
//!     .with_step("V", Vec::<dse_graph::Value>::new())
//!     .with_step("values", vec!["name"]);
//!
//! for value in graph.execute_traversal(&bytecode)? {
//!     println!("{}", value);
//! }
//! ```

mod config;
mod error;
mod graph;
mod record;

// Re-exports
pub use config::{
    Consistency, GraphOptions, GraphOptionsBuilder, BYTECODE_JSON_LANGUAGE,
    DEFAULT_GRAPH_LANGUAGE, DEFAULT_GRAPH_SOURCE,
};
pub use error::{GraphError, GraphResult};
pub use graph::{DseGraph, GraphExecutor};
pub use record::{
    graph_traversal_row_factory, graph_traversal_traverser_row_factory, RowFactory, RESULT_FIELD,
};
