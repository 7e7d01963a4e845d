//! # DSE Graph
//!
//! GraphSON 2.0 codec and traversal execution helpers for DSE Graph.
//!
//! ## Features
//!
//! - **Typed values** - Integers, decimals, UUIDs, instants, durations, blobs and
//!   geometry keep their exact type across the wire
//! - **Graph records** - Vertices, edges, properties, paths and traversers
//! - **Traversal bytecode** - Source and step instructions with predicates,
//!   lambdas, bindings and enum constants as arguments
//! - **Extensible registry** - Serializers keyed by value kind or capability,
//!   deserializers keyed by `@type` tag
//!
//! ## Encoding Values
//!
//! ```rust
//! use dse_graph::{graphson, Value};
//!
//! let text = graphson::write_object(&Value::from(2147483648i64)).unwrap();
//! assert_eq!(text, r#"{"@type":"g:Int64","@value":2147483648}"#);
//!
//! let value = graphson::read_object(&text).unwrap();
//! assert_eq!(value, Value::Int64(2147483648));
//! ```
//!
//! ## Traversal Bytecode
//!
//! ```rust
//! use dse_graph::{graphson, Bytecode, Value};
//!
//! let bytecode = Bytecode::new()
//!     .with_step("V", Vec::<Value>::new())
//!     .with_step("has", vec!["person", "name", "marko"]);
//!
//! let text = graphson::write_bytecode(&bytecode).unwrap();
//! assert!(text.starts_with(r#"{"@type":"g:Bytecode""#));
//! ```
//!
//! ## Executing Traversals
//!
//! [`DseGraph`] encodes bytecode, hands the query to a [`GraphExecutor`] and
//! decodes the result rows:
//!
//! ```rust,ignore
//! use dse_graph::{DseGraph, GraphOptions};
//!
//! let graph = DseGraph::with_options(
//!     executor,
//!     GraphOptions::builder().with_graph_name("modern").build(),
//! );
//! let names = graph.execute_traversal(&bytecode)?;
//! ```
//!
//! ## Modules
//!
//! - [`graphson`] - Values, registry, encoder and decoder
//! - [`driver`] - Graph options, executor trait and row factories
//!

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod driver;
pub mod graphson;

// Re-exports for convenience
pub use graphson::{
    Binding, Bytecode, Capability, Distance, Duration, Edge, EnumConstant, EnumKind, Geo,
    GraphSONError, GraphSONReader, GraphSONResult, GraphSONWriter, Instruction, Lambda,
    LineString, Path, Point, Polygon, Predicate, Property, Registry, Search, TextDistanceP,
    Traverser, Value, ValueKind, ValueMap, Vertex, VertexProperty, P,
};

pub use driver::{
    Consistency, DseGraph, GraphError, GraphExecutor, GraphOptions, GraphOptionsBuilder,
    GraphResult, RowFactory,
};
