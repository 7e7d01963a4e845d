//! Serializer and deserializer registry.
//!
//! Encode-side lookup is by [`ValueKind`]: an exact entry wins, otherwise the
//! kind's [`Capability`] entry is used. Decode-side lookup is by tag string.
//! The shared instance from [`Registry::global`] is built once and never
//! mutated; custom sets start from [`Registry::empty`] or [`Registry::graphson2`].

use std::collections::HashMap;
use std::sync::OnceLock;

use serde_json::Value as JsonValue;

use super::decoder::{self, GraphSONReader};
use super::encoder::{self, GraphSONWriter};
use super::error::{GraphSONError, GraphSONResult};
use super::structures::EnumKind;
use super::tag;
use super::types::{Capability, Value, ValueKind};

/// Serializer: value to tagged JSON. The `usize` is the current nesting depth.
pub type EncodeFn = fn(&GraphSONWriter<'_>, &Value, usize) -> GraphSONResult<JsonValue>;

/// Deserializer: full tagged node to value. The `usize` is the current nesting depth.
pub type DecodeFn = fn(&GraphSONReader<'_>, &JsonValue, usize) -> GraphSONResult<Value>;

/// Encode-side registry key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKey {
    /// Exactly this kind
    Kind(ValueKind),
    /// Any kind with this capability
    Capability(Capability),
}

/// Lookup tables for GraphSON serializers and deserializers.
#[derive(Clone, Default)]
pub struct Registry {
    encoders: HashMap<TypeKey, EncodeFn>,
    decoders: HashMap<String, DecodeFn>,
}

static GLOBAL: OnceLock<Registry> = OnceLock::new();

impl Registry {
    /// Create a registry with no entries.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a registry with every GraphSON 2.0 and DSE type.
    pub fn graphson2() -> Self {
        let mut r = Self::empty();

        r.register_encoder(TypeKey::Kind(ValueKind::Int16), encoder::write_int16);
        r.register_encoder(TypeKey::Kind(ValueKind::Int32), encoder::write_int32);
        r.register_encoder(TypeKey::Kind(ValueKind::Int64), encoder::write_int64);
        r.register_encoder(TypeKey::Kind(ValueKind::BigInteger), encoder::write_big_integer);
        r.register_encoder(TypeKey::Kind(ValueKind::BigDecimal), encoder::write_big_decimal);
        r.register_encoder(TypeKey::Kind(ValueKind::Float), encoder::write_float);
        r.register_encoder(TypeKey::Kind(ValueKind::Double), encoder::write_double);
        r.register_encoder(TypeKey::Kind(ValueKind::Uuid), encoder::write_uuid);
        r.register_encoder(TypeKey::Kind(ValueKind::Instant), encoder::write_instant);
        r.register_encoder(TypeKey::Kind(ValueKind::Duration), encoder::write_duration);
        r.register_encoder(TypeKey::Kind(ValueKind::InetAddress), encoder::write_inet_address);
        r.register_encoder(TypeKey::Kind(ValueKind::Blob), encoder::write_blob);
        r.register_encoder(TypeKey::Kind(ValueKind::Vertex), encoder::write_vertex);
        r.register_encoder(TypeKey::Kind(ValueKind::Edge), encoder::write_edge);
        r.register_encoder(TypeKey::Kind(ValueKind::VertexProperty), encoder::write_vertex_property);
        r.register_encoder(TypeKey::Kind(ValueKind::Property), encoder::write_property);
        r.register_encoder(TypeKey::Kind(ValueKind::Path), encoder::write_path);
        r.register_encoder(TypeKey::Kind(ValueKind::Traverser), encoder::write_traverser);
        r.register_encoder(TypeKey::Kind(ValueKind::Binding), encoder::write_binding);
        r.register_encoder(TypeKey::Kind(ValueKind::Predicate), encoder::write_predicate);
        r.register_encoder(TypeKey::Kind(ValueKind::Lambda), encoder::write_lambda);
        r.register_encoder(TypeKey::Kind(ValueKind::Bytecode), encoder::write_bytecode_value);
        r.register_encoder(TypeKey::Capability(Capability::Enumeration), encoder::write_enum);
        r.register_encoder(TypeKey::Capability(Capability::Geometry), encoder::write_geometry);

        let decoders: [(&str, DecodeFn); 26] = [
            (tag::INT16, decoder::read_int16),
            (tag::INT32, decoder::read_int32),
            (tag::INT64, decoder::read_int64),
            (tag::BIG_INTEGER, decoder::read_big_integer),
            (tag::BIG_DECIMAL, decoder::read_big_decimal),
            (tag::FLOAT, decoder::read_float),
            (tag::DOUBLE, decoder::read_double),
            (tag::UUID, decoder::read_uuid),
            (tag::INSTANT, decoder::read_instant),
            (tag::DURATION, decoder::read_duration),
            (tag::INET_ADDRESS, decoder::read_inet_address),
            (tag::BLOB, decoder::read_blob),
            (tag::VERTEX, decoder::read_vertex),
            (tag::EDGE, decoder::read_edge),
            (tag::VERTEX_PROPERTY, decoder::read_vertex_property),
            (tag::PROPERTY, decoder::read_property),
            (tag::PATH, decoder::read_path),
            (tag::TRAVERSER, decoder::read_traverser),
            (tag::BINDING, decoder::read_binding),
            (tag::PREDICATE, decoder::read_predicate),
            (tag::LAMBDA, decoder::read_lambda),
            (tag::BYTECODE, decoder::read_bytecode),
            (tag::POINT, decoder::read_point),
            (tag::LINE_STRING, decoder::read_line_string),
            (tag::POLYGON, decoder::read_polygon),
            (tag::DISTANCE, decoder::read_distance),
        ];
        for (t, f) in decoders {
            r.decoders.insert(t.to_string(), f);
        }
        for kind in EnumKind::ALL {
            r.decoders.insert(
                tag::make(tag::CORE_PREFIX, kind.type_name()),
                decoder::read_enum,
            );
        }

        r
    }

    /// The shared, read-only GraphSON 2.0 registry.
    pub fn global() -> &'static Registry {
        GLOBAL.get_or_init(Registry::graphson2)
    }

    /// Register (or replace) a serializer.
    pub fn register_encoder(&mut self, key: TypeKey, f: EncodeFn) {
        self.encoders.insert(key, f);
    }

    /// Register (or replace) a deserializer for a tag.
    pub fn register_decoder(&mut self, tag_name: &str, f: DecodeFn) -> GraphSONResult<()> {
        if !tag::is_valid(tag_name) {
            return Err(GraphSONError::unknown_tag(tag_name));
        }
        self.decoders.insert(tag_name.to_string(), f);
        Ok(())
    }

    /// Find the serializer for a kind: exact entry first, then its capability.
    pub fn encoder_for(&self, kind: ValueKind) -> Option<EncodeFn> {
        self.encoders
            .get(&TypeKey::Kind(kind))
            .or_else(|| {
                kind.capability()
                    .and_then(|c| self.encoders.get(&TypeKey::Capability(c)))
            })
            .copied()
    }

    /// Find the deserializer for a tag.
    pub fn decoder_for(&self, tag_name: &str) -> Option<DecodeFn> {
        self.decoders.get(tag_name).copied()
    }

    /// Get the number of registered tags.
    pub fn decoder_count(&self) -> usize {
        self.decoders.len()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut tags: Vec<&String> = self.decoders.keys().collect();
        tags.sort();
        f.debug_struct("Registry")
            .field("encoders", &self.encoders.len())
            .field("decoders", &tags)
            .finish()
    }
}
