//! GraphSON encoder.
//!
//! [`GraphSONWriter`] walks a [`Value`] and produces the tagged JSON tree.
//! Booleans short-circuit to native JSON before any registry lookup, so they
//! never pick up a numeric tag. Values with a registered serializer are tagged;
//! null, strings, lists and maps fall back to their plain JSON form.

use std::collections::BTreeMap;

use base64::Engine;
use bigdecimal::BigDecimal;
use serde_json::{Map, Value as JsonValue};

use super::bytecode::{Bytecode, Instruction};
use super::error::{BoxedCause, GraphSONError, GraphSONResult};
use super::predicate::{Predicate, RANGE_OPERATORS};
use super::registry::Registry;
use super::structures::to_wire_symbol;
use super::tag;
use super::types::{Value, ValueKind};

/// Default nesting ceiling for both encode and decode.
pub const DEFAULT_MAX_DEPTH: usize = 100;

/// Instant wire format: whole seconds, UTC.
pub const INSTANT_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Value to GraphSON encoder.
#[derive(Debug, Clone, Copy)]
pub struct GraphSONWriter<'r> {
    registry: &'r Registry,
    max_depth: usize,
}

impl GraphSONWriter<'static> {
    /// Create a writer over the global registry.
    pub fn new() -> Self {
        Self::with_registry(Registry::global())
    }
}

impl Default for GraphSONWriter<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'r> GraphSONWriter<'r> {
    /// Create a writer over a custom registry.
    pub fn with_registry(registry: &'r Registry) -> Self {
        Self {
            registry,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Set the nesting ceiling.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Get the nesting ceiling.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Encode a value to compact GraphSON text.
    pub fn write_object(&self, value: &Value) -> GraphSONResult<String> {
        let json = self.to_json(value)?;
        Ok(serde_json::to_string(&json)?)
    }

    /// Encode a traversal program to compact GraphSON text.
    pub fn write_bytecode(&self, bytecode: &Bytecode) -> GraphSONResult<String> {
        let json = self.bytecode_to_json(bytecode, 0)?;
        tracing::debug!(
            source = bytecode.source_instructions.len(),
            step = bytecode.step_instructions.len(),
            "encoded traversal program"
        );
        Ok(serde_json::to_string(&json)?)
    }

    /// Encode a value to a JSON tree.
    pub fn to_json(&self, value: &Value) -> GraphSONResult<JsonValue> {
        self.dictify(value, 0)
    }

    /// Encode a value at the given nesting depth.
    ///
    /// Serializers call this for their children with `depth + 1`.
    pub fn dictify(&self, value: &Value, depth: usize) -> GraphSONResult<JsonValue> {
        if depth > self.max_depth {
            return Err(GraphSONError::TooDeep {
                limit: self.max_depth,
            });
        }

        if let Value::Boolean(b) = value {
            return Ok(JsonValue::Bool(*b));
        }

        if let Some(serialize) = self.registry.encoder_for(value.kind()) {
            return serialize(self, value, depth);
        }

        match value {
            Value::Null => Ok(JsonValue::Null),
            Value::String(s) => Ok(JsonValue::String(s.clone())),
            Value::List(items) => items
                .iter()
                .map(|item| self.dictify(item, depth + 1))
                .collect::<GraphSONResult<Vec<_>>>()
                .map(JsonValue::Array),
            Value::Map(map) => {
                let mut object = Map::new();
                for (k, v) in map.iter() {
                    let key = self.map_key(k, depth + 1)?;
                    if object.contains_key(&key) {
                        return Err(failure(value, format!("map keys collide as {:?}", key)));
                    }
                    object.insert(key, self.dictify(v, depth + 1)?);
                }
                Ok(JsonValue::Object(object))
            }
            other => Err(GraphSONError::unsupported(other.type_name())),
        }
    }

    /// Encode a map key. Keys that encode to a JSON string are used as-is,
    /// anything else becomes its compact GraphSON text.
    fn map_key(&self, key: &Value, depth: usize) -> GraphSONResult<String> {
        match self.dictify(key, depth)? {
            JsonValue::String(s) => Ok(s),
            other => Ok(serde_json::to_string(&other)?),
        }
    }

    fn bytecode_to_json(&self, bytecode: &Bytecode, depth: usize) -> GraphSONResult<JsonValue> {
        let mut payload = Map::new();
        if !bytecode.source_instructions.is_empty() {
            payload.insert(
                tag::SOURCE_FIELD.to_string(),
                self.instructions(&bytecode.source_instructions, depth + 1)?,
            );
        }
        if !bytecode.step_instructions.is_empty() {
            payload.insert(
                tag::STEP_FIELD.to_string(),
                self.instructions(&bytecode.step_instructions, depth + 1)?,
            );
        }
        Ok(tagged(tag::BYTECODE, JsonValue::Object(payload)))
    }

    /// Each instruction is `[operator, arg...]` with only the arguments encoded.
    fn instructions(&self, list: &[Instruction], depth: usize) -> GraphSONResult<JsonValue> {
        let mut out = Vec::with_capacity(list.len());
        for instruction in list {
            let mut entry = Vec::with_capacity(instruction.arguments.len() + 1);
            entry.push(JsonValue::String(instruction.operator.clone()));
            for arg in &instruction.arguments {
                entry.push(self.dictify(arg, depth + 1)?);
            }
            out.push(JsonValue::Array(entry));
        }
        Ok(JsonValue::Array(out))
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Build `{"@type": tag, "@value": payload}`.
pub fn tagged(type_tag: &str, payload: JsonValue) -> JsonValue {
    let mut object = Map::new();
    object.insert(tag::TYPE_KEY.to_string(), JsonValue::String(type_tag.to_string()));
    object.insert(tag::VALUE_KEY.to_string(), payload);
    JsonValue::Object(object)
}

fn failure(value: &Value, cause: impl Into<BoxedCause>) -> GraphSONError {
    GraphSONError::encode(format!("{} {}", value.type_name(), value), cause)
}

fn mismatch(value: &Value, expected: ValueKind) -> GraphSONError {
    failure(
        value,
        format!("{} serializer cannot write {}", expected, value.type_name()),
    )
}

fn float_payload(f: f64) -> JsonValue {
    if f.is_nan() {
        JsonValue::from("NaN")
    } else if f == f64::INFINITY {
        JsonValue::from("Infinity")
    } else if f == f64::NEG_INFINITY {
        JsonValue::from("-Infinity")
    } else {
        JsonValue::from(f)
    }
}

fn object<const N: usize>(fields: [(&str, JsonValue); N]) -> Map<String, JsonValue> {
    fields
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

// ============================================================================
// Serializers
// ============================================================================

/// `gx:Int16`
pub fn write_int16(_: &GraphSONWriter<'_>, value: &Value, _: usize) -> GraphSONResult<JsonValue> {
    let n = value.as_i64().ok_or_else(|| mismatch(value, ValueKind::Int16))?;
    let n = i16::try_from(n).map_err(|e| failure(value, e))?;
    Ok(tagged(tag::INT16, n.into()))
}

/// `g:Int32`
pub fn write_int32(_: &GraphSONWriter<'_>, value: &Value, _: usize) -> GraphSONResult<JsonValue> {
    let n = value.as_i64().ok_or_else(|| mismatch(value, ValueKind::Int32))?;
    let n = i32::try_from(n).map_err(|e| failure(value, e))?;
    Ok(tagged(tag::INT32, n.into()))
}

/// `g:Int64`
pub fn write_int64(_: &GraphSONWriter<'_>, value: &Value, _: usize) -> GraphSONResult<JsonValue> {
    let n = value.as_i64().ok_or_else(|| mismatch(value, ValueKind::Int64))?;
    Ok(tagged(tag::INT64, n.into()))
}

/// `g:Int64` when it fits, `gx:BigInteger` as a decimal string otherwise.
pub fn write_big_integer(
    _: &GraphSONWriter<'_>,
    value: &Value,
    _: usize,
) -> GraphSONResult<JsonValue> {
    match value {
        Value::BigInteger(b) => match i64::try_from(b) {
            Ok(n) => Ok(tagged(tag::INT64, n.into())),
            Err(_) => Ok(tagged(tag::BIG_INTEGER, JsonValue::String(b.to_string()))),
        },
        _ => Err(mismatch(value, ValueKind::BigInteger)),
    }
}

/// `gx:BigDecimal`, always a string so no precision is lost.
pub fn write_big_decimal(
    _: &GraphSONWriter<'_>,
    value: &Value,
    _: usize,
) -> GraphSONResult<JsonValue> {
    let decimal = match value {
        Value::BigDecimal(d) => d.clone(),
        Value::BigInteger(b) => BigDecimal::new(b.clone(), 0),
        other => match other.as_i64() {
            Some(n) => BigDecimal::from(n),
            None => return Err(mismatch(value, ValueKind::BigDecimal)),
        },
    };
    Ok(tagged(tag::BIG_DECIMAL, JsonValue::String(decimal.to_string())))
}

/// `g:Float`
pub fn write_float(_: &GraphSONWriter<'_>, value: &Value, _: usize) -> GraphSONResult<JsonValue> {
    let f = value.as_f64().ok_or_else(|| mismatch(value, ValueKind::Float))?;
    Ok(tagged(tag::FLOAT, float_payload(f)))
}

/// `g:Double`
pub fn write_double(_: &GraphSONWriter<'_>, value: &Value, _: usize) -> GraphSONResult<JsonValue> {
    let f = value.as_f64().ok_or_else(|| mismatch(value, ValueKind::Double))?;
    Ok(tagged(tag::DOUBLE, float_payload(f)))
}

/// `g:UUID`
pub fn write_uuid(_: &GraphSONWriter<'_>, value: &Value, _: usize) -> GraphSONResult<JsonValue> {
    match value {
        Value::Uuid(u) => Ok(tagged(tag::UUID, JsonValue::String(u.hyphenated().to_string()))),
        _ => Err(mismatch(value, ValueKind::Uuid)),
    }
}

/// `gx:Instant`; sub-second precision cannot be represented and fails.
pub fn write_instant(_: &GraphSONWriter<'_>, value: &Value, _: usize) -> GraphSONResult<JsonValue> {
    match value {
        Value::Instant(t) => {
            if t.timestamp_subsec_nanos() != 0 {
                return Err(failure(value, "instants carry whole seconds only"));
            }
            let text = t.format(INSTANT_FORMAT).to_string();
            Ok(tagged(tag::INSTANT, JsonValue::String(text)))
        }
        _ => Err(mismatch(value, ValueKind::Instant)),
    }
}

/// `gx:Duration`
pub fn write_duration(
    _: &GraphSONWriter<'_>,
    value: &Value,
    _: usize,
) -> GraphSONResult<JsonValue> {
    match value {
        Value::Duration(d) if !d.is_uniform() => Err(failure(
            value,
            "duration fields must share one sign with nanoseconds under a second",
        )),
        Value::Duration(d) => Ok(tagged(tag::DURATION, JsonValue::String(d.to_iso()))),
        _ => Err(mismatch(value, ValueKind::Duration)),
    }
}

/// `gx:InetAddress`
pub fn write_inet_address(
    _: &GraphSONWriter<'_>,
    value: &Value,
    _: usize,
) -> GraphSONResult<JsonValue> {
    match value {
        Value::InetAddress(a) => Ok(tagged(tag::INET_ADDRESS, JsonValue::String(a.to_string()))),
        _ => Err(mismatch(value, ValueKind::InetAddress)),
    }
}

/// `dse:Blob`, standard base64.
pub fn write_blob(_: &GraphSONWriter<'_>, value: &Value, _: usize) -> GraphSONResult<JsonValue> {
    match value {
        Value::Blob(bytes) => {
            let text = base64::engine::general_purpose::STANDARD.encode(bytes);
            Ok(tagged(tag::BLOB, JsonValue::String(text)))
        }
        _ => Err(mismatch(value, ValueKind::Blob)),
    }
}

/// `dse:Point`, `dse:LineString`, `dse:Polygon`, `dse:Distance` as WKT.
pub fn write_geometry(
    _: &GraphSONWriter<'_>,
    value: &Value,
    _: usize,
) -> GraphSONResult<JsonValue> {
    let (type_tag, wkt) = match value {
        Value::Point(p) => (tag::POINT, p.to_wkt()),
        Value::LineString(l) => (tag::LINE_STRING, l.to_wkt()),
        Value::Polygon(p) => (tag::POLYGON, p.to_wkt()),
        Value::Distance(d) => (tag::DISTANCE, d.to_wkt()),
        _ => return Err(mismatch(value, ValueKind::Point)),
    };
    Ok(tagged(type_tag, JsonValue::String(wkt)))
}

/// `g:Vertex`; properties are grouped by label.
pub fn write_vertex(
    writer: &GraphSONWriter<'_>,
    value: &Value,
    depth: usize,
) -> GraphSONResult<JsonValue> {
    let Value::Vertex(vertex) = value else {
        return Err(mismatch(value, ValueKind::Vertex));
    };
    let mut payload = object([
        ("id", writer.dictify(&vertex.id, depth + 1)?),
        ("label", JsonValue::String(vertex.label.clone())),
    ]);
    if !vertex.properties.is_empty() {
        let mut grouped: BTreeMap<String, Vec<JsonValue>> = BTreeMap::new();
        for property in &vertex.properties {
            let encoded = writer.dictify(&Value::VertexProperty(property.clone()), depth + 2)?;
            grouped.entry(property.label.clone()).or_default().push(encoded);
        }
        let grouped = grouped
            .into_iter()
            .map(|(label, list)| (label, JsonValue::Array(list)))
            .collect();
        payload.insert("properties".to_string(), JsonValue::Object(grouped));
    }
    Ok(tagged(tag::VERTEX, JsonValue::Object(payload)))
}

/// `g:Edge`
pub fn write_edge(
    writer: &GraphSONWriter<'_>,
    value: &Value,
    depth: usize,
) -> GraphSONResult<JsonValue> {
    let Value::Edge(edge) = value else {
        return Err(mismatch(value, ValueKind::Edge));
    };
    let mut payload = object([
        ("id", writer.dictify(&edge.id, depth + 1)?),
        ("label", JsonValue::String(edge.label.clone())),
        ("inV", writer.dictify(&edge.in_v.id, depth + 1)?),
        ("outV", writer.dictify(&edge.out_v.id, depth + 1)?),
        ("inVLabel", JsonValue::String(edge.in_v.label.clone())),
        ("outVLabel", JsonValue::String(edge.out_v.label.clone())),
    ]);
    if !edge.properties.is_empty() {
        let mut properties = Map::new();
        for property in &edge.properties {
            properties.insert(
                property.key.clone(),
                writer.dictify(&Value::Property(property.clone()), depth + 2)?,
            );
        }
        payload.insert("properties".to_string(), JsonValue::Object(properties));
    }
    Ok(tagged(tag::EDGE, JsonValue::Object(payload)))
}

/// `g:VertexProperty`; meta-properties are a plain key/value object.
pub fn write_vertex_property(
    writer: &GraphSONWriter<'_>,
    value: &Value,
    depth: usize,
) -> GraphSONResult<JsonValue> {
    let Value::VertexProperty(property) = value else {
        return Err(mismatch(value, ValueKind::VertexProperty));
    };
    let mut payload = object([
        ("id", writer.dictify(&property.id, depth + 1)?),
        ("label", JsonValue::String(property.label.clone())),
        ("value", writer.dictify(&property.value, depth + 1)?),
    ]);
    if !property.properties.is_empty() {
        let mut meta = Map::new();
        for p in &property.properties {
            meta.insert(p.key.clone(), writer.dictify(&p.value, depth + 2)?);
        }
        payload.insert("properties".to_string(), JsonValue::Object(meta));
    }
    Ok(tagged(tag::VERTEX_PROPERTY, JsonValue::Object(payload)))
}

/// `g:Property`
pub fn write_property(
    writer: &GraphSONWriter<'_>,
    value: &Value,
    depth: usize,
) -> GraphSONResult<JsonValue> {
    let Value::Property(property) = value else {
        return Err(mismatch(value, ValueKind::Property));
    };
    let payload = object([
        ("key", JsonValue::String(property.key.clone())),
        ("value", writer.dictify(&property.value, depth + 1)?),
    ]);
    Ok(tagged(tag::PROPERTY, JsonValue::Object(payload)))
}

/// `g:Path`
pub fn write_path(
    writer: &GraphSONWriter<'_>,
    value: &Value,
    depth: usize,
) -> GraphSONResult<JsonValue> {
    let Value::Path(path) = value else {
        return Err(mismatch(value, ValueKind::Path));
    };
    let labels = path
        .labels
        .iter()
        .map(|set| JsonValue::Array(set.iter().cloned().map(JsonValue::String).collect()))
        .collect();
    let objects = path
        .objects
        .iter()
        .map(|o| writer.dictify(o, depth + 2))
        .collect::<GraphSONResult<Vec<_>>>()?;
    let payload = object([
        ("labels", JsonValue::Array(labels)),
        ("objects", JsonValue::Array(objects)),
    ]);
    Ok(tagged(tag::PATH, JsonValue::Object(payload)))
}

/// `g:Traverser`
pub fn write_traverser(
    writer: &GraphSONWriter<'_>,
    value: &Value,
    depth: usize,
) -> GraphSONResult<JsonValue> {
    let Value::Traverser(traverser) = value else {
        return Err(mismatch(value, ValueKind::Traverser));
    };
    let payload = object([
        ("value", writer.dictify(&traverser.value, depth + 1)?),
        ("bulk", writer.dictify(&Value::from(traverser.bulk), depth + 1)?),
    ]);
    Ok(tagged(tag::TRAVERSER, JsonValue::Object(payload)))
}

/// `g:<EnumType>`
pub fn write_enum(_: &GraphSONWriter<'_>, value: &Value, _: usize) -> GraphSONResult<JsonValue> {
    let Value::Enum(constant) = value else {
        return Err(mismatch(value, ValueKind::Enum));
    };
    let type_tag = tag::make(tag::CORE_PREFIX, constant.kind.type_name());
    let name = to_wire_symbol(&constant.name).to_string();
    Ok(tagged(&type_tag, JsonValue::String(name)))
}

/// `g:Binding`
pub fn write_binding(
    writer: &GraphSONWriter<'_>,
    value: &Value,
    depth: usize,
) -> GraphSONResult<JsonValue> {
    let Value::Binding(binding) = value else {
        return Err(mismatch(value, ValueKind::Binding));
    };
    let payload = object([
        ("key", JsonValue::String(binding.key.clone())),
        ("value", writer.dictify(&binding.value, depth + 1)?),
    ]);
    Ok(tagged(tag::BINDING, JsonValue::Object(payload)))
}

/// `g:P`; two-operand predicates carry a two-element array.
pub fn write_predicate(
    writer: &GraphSONWriter<'_>,
    value: &Value,
    depth: usize,
) -> GraphSONResult<JsonValue> {
    let Value::Predicate(predicate) = value else {
        return Err(mismatch(value, ValueKind::Predicate));
    };
    let operand = match predicate {
        Predicate::Value(p) => match &p.other {
            Some(_) if !RANGE_OPERATORS.contains(&p.operator.as_str()) => {
                return Err(failure(
                    value,
                    format!("{} does not take a second operand", p.operator),
                ));
            }
            None if RANGE_OPERATORS.contains(&p.operator.as_str())
                && matches!(p.value.as_ref(), Value::List(items) if items.len() == 2) =>
            {
                return Err(failure(
                    value,
                    format!("{} bounds belong in two operands, not a pair list", p.operator),
                ));
            }
            None => writer.dictify(&p.value, depth + 1)?,
            Some(other) => JsonValue::Array(vec![
                writer.dictify(&p.value, depth + 2)?,
                writer.dictify(other, depth + 2)?,
            ]),
        },
        Predicate::TextDistance(p) => JsonValue::Array(vec![
            JsonValue::String(p.value.clone()),
            writer.dictify(&Value::from(p.distance), depth + 2)?,
        ]),
    };
    let payload = object([
        ("predicate", JsonValue::String(predicate.operator().to_string())),
        ("value", operand),
    ]);
    Ok(tagged(tag::PREDICATE, JsonValue::Object(payload)))
}

/// `g:Lambda`
pub fn write_lambda(_: &GraphSONWriter<'_>, value: &Value, _: usize) -> GraphSONResult<JsonValue> {
    let Value::Lambda(lambda) = value else {
        return Err(mismatch(value, ValueKind::Lambda));
    };
    let payload = object([
        ("script", JsonValue::String(lambda.script.clone())),
        ("language", JsonValue::String(lambda.language.clone())),
        ("arguments", lambda.arguments.into()),
    ]);
    Ok(tagged(tag::LAMBDA, JsonValue::Object(payload)))
}

/// `g:Bytecode` nested as an argument, e.g. an anonymous traversal.
pub fn write_bytecode_value(
    writer: &GraphSONWriter<'_>,
    value: &Value,
    depth: usize,
) -> GraphSONResult<JsonValue> {
    let Value::Bytecode(bytecode) = value else {
        return Err(mismatch(value, ValueKind::Bytecode));
    };
    writer.bytecode_to_json(bytecode, depth)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphson::duration::Duration;
    use crate::graphson::geometry::{Distance, LineString, Point, Polygon};
    use crate::graphson::predicate::{Search, P};
    use crate::graphson::structures::{
        Binding, Edge, EnumConstant, EnumKind, Lambda, Path, Property, Traverser, Vertex,
        VertexProperty,
    };
    use crate::graphson::types::ValueMap;
    use chrono::{TimeZone, Utc};
    use num_bigint::BigInt;
    use serde_json::json;
    use std::str::FromStr;

    fn encode(value: impl Into<Value>) -> JsonValue {
        GraphSONWriter::new().to_json(&value.into()).unwrap()
    }

    #[test]
    fn test_booleans_stay_native() {
        assert_eq!(encode(true), json!(true));
        assert_eq!(encode(false), json!(false));
    }

    #[test]
    fn test_untagged_values() {
        assert_eq!(encode(Value::Null), JsonValue::Null);
        assert_eq!(encode("marko"), json!("marko"));
        assert_eq!(
            encode(vec![Value::from("a"), Value::from(1i32)]),
            json!(["a", {"@type": "g:Int32", "@value": 1}])
        );
    }

    #[test]
    fn test_integer_tags() {
        assert_eq!(encode(42i64), json!({"@type": "g:Int32", "@value": 42}));
        assert_eq!(
            encode(2_147_483_648i64),
            json!({"@type": "g:Int64", "@value": 2147483648i64})
        );
        assert_eq!(encode(7i16), json!({"@type": "gx:Int16", "@value": 7}));
        assert_eq!(encode(Value::Int64(1)), json!({"@type": "g:Int64", "@value": 1}));
    }

    #[test]
    fn test_big_numbers() {
        assert_eq!(
            encode(BigInt::from(5)),
            json!({"@type": "g:Int64", "@value": 5})
        );
        let huge = BigInt::from_str("123456789012345678901234567890").unwrap();
        assert_eq!(
            encode(huge),
            json!({"@type": "gx:BigInteger", "@value": "123456789012345678901234567890"})
        );
        let decimal = BigDecimal::from_str("3.14159265358979323846").unwrap();
        assert_eq!(
            encode(decimal),
            json!({"@type": "gx:BigDecimal", "@value": "3.14159265358979323846"})
        );
    }

    #[test]
    fn test_floats() {
        assert_eq!(encode(1.5f64), json!({"@type": "g:Double", "@value": 1.5}));
        assert_eq!(encode(0.5f32), json!({"@type": "g:Float", "@value": 0.5}));
        assert_eq!(encode(f64::NAN), json!({"@type": "g:Double", "@value": "NaN"}));
        assert_eq!(
            encode(f64::NEG_INFINITY),
            json!({"@type": "g:Double", "@value": "-Infinity"})
        );
    }

    #[test]
    fn test_scalars() {
        let id = uuid::Uuid::from_str("41d2e28a-20a4-4ab0-b379-d810dede3786").unwrap();
        assert_eq!(
            encode(id),
            json!({"@type": "g:UUID", "@value": "41d2e28a-20a4-4ab0-b379-d810dede3786"})
        );

        let t = Utc.with_ymd_and_hms(2016, 12, 14, 16, 39, 19).unwrap();
        assert_eq!(
            encode(t),
            json!({"@type": "gx:Instant", "@value": "2016-12-14T16:39:19Z"})
        );

        assert_eq!(
            encode(Duration::new(0, 2, 3 * 3600, 0)),
            json!({"@type": "gx:Duration", "@value": "P2DT3H"})
        );

        let addr: std::net::IpAddr = "127.0.0.1".parse().unwrap();
        assert_eq!(
            encode(addr),
            json!({"@type": "gx:InetAddress", "@value": "127.0.0.1"})
        );

        assert_eq!(
            encode(b"hello".to_vec()),
            json!({"@type": "dse:Blob", "@value": "aGVsbG8="})
        );
    }

    #[test]
    fn test_mixed_sign_duration_fails() {
        let err = GraphSONWriter::new()
            .to_json(&Value::Duration(Duration::new(1, -2, 0, 0)))
            .unwrap_err();
        assert!(matches!(err, GraphSONError::Encode { .. }));
    }

    #[test]
    fn test_second_operand_only_for_ranges() {
        let writer = GraphSONWriter::new();
        let err = writer
            .to_json(&Value::from(P::with_other("eq", 1i32, 2i32)))
            .unwrap_err();
        assert!(matches!(err, GraphSONError::Encode { .. }));

        let err = writer
            .to_json(&Value::from(P::new("between", vec![Value::from(1i32), Value::from(5i32)])))
            .unwrap_err();
        assert!(matches!(err, GraphSONError::Encode { .. }));

        assert!(writer.to_json(&Value::from(P::with_other("between", 1i32, 5i32))).is_ok());
        assert!(writer.to_json(&Value::from(P::within(["a", "b"]))).is_ok());
    }

    #[test]
    fn test_instant_with_fraction_fails() {
        let t = Utc.timestamp_opt(1_000, 500).unwrap();
        let err = GraphSONWriter::new().to_json(&Value::Instant(t)).unwrap_err();
        assert!(matches!(err, GraphSONError::Encode { .. }));
    }

    #[test]
    fn test_geometry() {
        assert_eq!(
            encode(Point::new(1.0, 2.0)),
            json!({"@type": "dse:Point", "@value": "POINT (1 2)"})
        );
        assert_eq!(
            encode(LineString::new(vec![Point::new(1.0, 2.0), Point::new(3.0, 4.0)])),
            json!({"@type": "dse:LineString", "@value": "LINESTRING (1 2, 3 4)"})
        );
        assert_eq!(
            encode(Polygon::default()),
            json!({"@type": "dse:Polygon", "@value": "POLYGON EMPTY"})
        );
        assert_eq!(
            encode(Distance::new(1.0, 2.0, 3.0)),
            json!({"@type": "dse:Distance", "@value": "DISTANCE((1 2) 3)"})
        );
    }

    #[test]
    fn test_vertex_and_edge() {
        let vertex = Vertex::new(1i32, "person").with_properties(vec![
            VertexProperty::new(0i64, "name", "marko")
                .with_properties(vec![Property::new("since", 2009i32)]),
        ]);
        assert_eq!(
            encode(vertex),
            json!({"@type": "g:Vertex", "@value": {
                "id": {"@type": "g:Int32", "@value": 1},
                "label": "person",
                "properties": {"name": [{"@type": "g:VertexProperty", "@value": {
                    "id": {"@type": "g:Int32", "@value": 0},
                    "label": "name",
                    "value": "marko",
                    "properties": {"since": {"@type": "g:Int32", "@value": 2009}}
                }}]}
            }})
        );

        let edge = Edge::new(13i32, "develops", Vertex::new(1i32, "person"), Vertex::new(10i32, "software"))
            .with_properties(vec![Property::new("since", 2009i32)]);
        assert_eq!(
            encode(edge),
            json!({"@type": "g:Edge", "@value": {
                "id": {"@type": "g:Int32", "@value": 13},
                "label": "develops",
                "inV": {"@type": "g:Int32", "@value": 10},
                "outV": {"@type": "g:Int32", "@value": 1},
                "inVLabel": "software",
                "outVLabel": "person",
                "properties": {"since": {"@type": "g:Property", "@value": {
                    "key": "since", "value": {"@type": "g:Int32", "@value": 2009}
                }}}
            }})
        );
    }

    #[test]
    fn test_traversal_values() {
        assert_eq!(
            encode(Traverser::new("a", 3)),
            json!({"@type": "g:Traverser", "@value": {
                "value": "a", "bulk": {"@type": "g:Int32", "@value": 3}
            }})
        );
        assert_eq!(
            encode(EnumConstant::new(EnumKind::Direction, "in_")),
            json!({"@type": "g:Direction", "@value": "in"})
        );
        assert_eq!(
            encode(Binding::new("x", 1i32)),
            json!({"@type": "g:Binding", "@value": {
                "key": "x", "value": {"@type": "g:Int32", "@value": 1}
            }})
        );
        assert_eq!(
            encode(Lambda::new("it.get()", -1)),
            json!({"@type": "g:Lambda", "@value": {
                "script": "it.get()", "language": "gremlin-groovy", "arguments": -1
            }})
        );
        assert_eq!(
            encode(Path::new(vec![vec!["a".into()]], vec![Value::from("x")])),
            json!({"@type": "g:Path", "@value": {"labels": [["a"]], "objects": ["x"]}})
        );
    }

    #[test]
    fn test_predicates() {
        assert_eq!(
            encode(P::gt(5i32)),
            json!({"@type": "g:P", "@value": {
                "predicate": "gt", "value": {"@type": "g:Int32", "@value": 5}
            }})
        );
        assert_eq!(
            encode(P::between(1i32, 10i32)),
            json!({"@type": "g:P", "@value": {"predicate": "between", "value": [
                {"@type": "g:Int32", "@value": 1}, {"@type": "g:Int32", "@value": 10}
            ]}})
        );
        assert_eq!(
            encode(Search::fuzzy("marko", 1)),
            json!({"@type": "g:P", "@value": {"predicate": "fuzzy", "value": [
                "marko", {"@type": "g:Int32", "@value": 1}
            ]}})
        );
    }

    #[test]
    fn test_map_keys() {
        let mut map = ValueMap::new();
        map.insert("name", "marko");
        map.insert(1i32, true);
        assert_eq!(
            encode(map),
            json!({"name": "marko", "{\"@type\":\"g:Int32\",\"@value\":1}": true})
        );
    }

    #[test]
    fn test_colliding_map_keys() {
        let mut map = ValueMap::new();
        map.insert(1i32, "int");
        map.insert(r#"{"@type":"g:Int32","@value":1}"#, "str");
        let err = GraphSONWriter::new()
            .write_object(&Value::Map(map))
            .unwrap_err();
        assert!(matches!(err, GraphSONError::Encode { .. }));
    }

    #[test]
    fn test_bytecode_segments() {
        let writer = GraphSONWriter::new();
        let empty = writer.write_bytecode(&Bytecode::new()).unwrap();
        assert_eq!(empty, r#"{"@type":"g:Bytecode","@value":{}}"#);

        let steps = Bytecode::new().with_step("has", ["person", "name", "marko"]);
        assert_eq!(
            writer.write_bytecode(&steps).unwrap(),
            r#"{"@type":"g:Bytecode","@value":{"step":[["has","person","name","marko"]]}}"#
        );

        let sources = Bytecode::new().with_source("withSack", [1i32]);
        assert_eq!(
            writer.write_bytecode(&sources).unwrap(),
            r#"{"@type":"g:Bytecode","@value":{"source":[["withSack",{"@type":"g:Int32","@value":1}]]}}"#
        );
    }

    #[test]
    fn test_unsupported_type() {
        let registry = Registry::empty();
        let writer = GraphSONWriter::with_registry(&registry);
        let err = writer.to_json(&Value::Int32(1)).unwrap_err();
        assert!(matches!(err, GraphSONError::UnsupportedType(ref k) if k == "Int32"));
        // structural fallbacks still work without any entries
        assert_eq!(writer.to_json(&Value::from("x")).unwrap(), json!("x"));
        assert_eq!(writer.to_json(&Value::Boolean(true)).unwrap(), json!(true));
    }

    #[test]
    fn test_depth_limit() {
        let mut value = Value::from("leaf");
        for _ in 0..10 {
            value = Value::List(vec![value]);
        }
        let writer = GraphSONWriter::new().with_max_depth(5);
        assert!(matches!(
            writer.to_json(&value),
            Err(GraphSONError::TooDeep { limit: 5 })
        ));
        assert!(GraphSONWriter::new().to_json(&value).is_ok());
    }

    #[test]
    fn test_tag_stability() {
        let value = Value::from(Search::token_fuzzy("abc", 2));
        let writer = GraphSONWriter::new();
        assert_eq!(
            writer.write_object(&value).unwrap(),
            writer.write_object(&value).unwrap()
        );
    }
}
