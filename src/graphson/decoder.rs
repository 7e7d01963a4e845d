//! GraphSON decoder.
//!
//! [`GraphSONReader`] turns a JSON tree back into [`Value`]s. An object carrying
//! the `@type` field is handed to the deserializer registered for that tag,
//! and a tag with no deserializer is an error. Untagged objects, arrays and
//! scalars are decoded structurally.

use std::net::IpAddr;
use std::str::FromStr;

use base64::Engine;
use bigdecimal::BigDecimal;
use chrono::{NaiveDateTime, TimeZone, Timelike, Utc};
use num_bigint::BigInt;
use serde_json::{Map, Number, Value as JsonValue};
use uuid::Uuid;

use super::bytecode::{Bytecode, Instruction};
use super::duration::Duration;
use super::encoder::{DEFAULT_MAX_DEPTH, INSTANT_FORMAT};
use super::error::{GraphSONError, GraphSONResult};
use super::geometry::{Distance, LineString, Point, Polygon};
use super::predicate::{TextDistanceP, P, RANGE_OPERATORS, TEXT_DISTANCE_OPERATORS};
use super::registry::Registry;
use super::structures::{
    Binding, Edge, EnumConstant, EnumKind, Lambda, Path, Property, Traverser, Vertex,
    VertexProperty,
};
use super::tag;
use super::types::{Value, ValueMap};

/// GraphSON to value decoder.
#[derive(Debug, Clone, Copy)]
pub struct GraphSONReader<'r> {
    registry: &'r Registry,
    max_depth: usize,
}

impl GraphSONReader<'static> {
    /// Create a reader over the global registry.
    pub fn new() -> Self {
        Self::with_registry(Registry::global())
    }
}

impl Default for GraphSONReader<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'r> GraphSONReader<'r> {
    /// Create a reader over a custom registry.
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

    /// Decode GraphSON text.
    pub fn read_object(&self, text: &str) -> GraphSONResult<Value> {
        let json: JsonValue = serde_json::from_str(text)?;
        self.read_value(&json)
    }

    /// Decode a JSON tree.
    pub fn read_value(&self, json: &JsonValue) -> GraphSONResult<Value> {
        self.objectify(json, 0)
    }

    /// Decode a JSON node at the given nesting depth.
    ///
    /// Deserializers call this for their children with `depth + 1`.
    pub fn objectify(&self, json: &JsonValue, depth: usize) -> GraphSONResult<Value> {
        if depth > self.max_depth {
            return Err(GraphSONError::TooDeep {
                limit: self.max_depth,
            });
        }

        match json {
            JsonValue::Object(object) => match object.get(tag::TYPE_KEY) {
                Some(JsonValue::String(type_tag)) => {
                    let deserialize = self
                        .registry
                        .decoder_for(type_tag)
                        .ok_or_else(|| GraphSONError::unknown_tag(type_tag.as_str()))?;
                    deserialize(self, json, depth)
                }
                Some(other) => Err(GraphSONError::malformed(
                    tag::TYPE_KEY,
                    format!("type tag must be a string, got {}", other),
                )),
                None => self.objectify_map(object, depth),
            },
            JsonValue::Array(items) => items
                .iter()
                .map(|item| self.objectify(item, depth + 1))
                .collect::<GraphSONResult<Vec<_>>>()
                .map(Value::List),
            JsonValue::Null => Ok(Value::Null),
            JsonValue::Bool(b) => Ok(Value::Boolean(*b)),
            JsonValue::String(s) => Ok(Value::String(s.clone())),
            JsonValue::Number(n) => Ok(untagged_number(n)),
        }
    }

    fn objectify_map(
        &self,
        object: &Map<String, JsonValue>,
        depth: usize,
    ) -> GraphSONResult<Value> {
        let mut map = ValueMap::new();
        for (k, v) in object {
            map.insert(self.map_key(k, depth + 1)?, self.objectify(v, depth + 1)?);
        }
        Ok(Value::Map(map))
    }

    /// Keys written as compact tagged JSON are decoded back. Anything that
    /// does not decode cleanly stays a string key.
    fn map_key(&self, key: &str, depth: usize) -> GraphSONResult<Value> {
        if key.starts_with('{') {
            if let Ok(json @ JsonValue::Object(_)) = serde_json::from_str::<JsonValue>(key) {
                if json.get(tag::TYPE_KEY).is_some() {
                    if let Ok(value) = self.objectify(&json, depth) {
                        return Ok(value);
                    }
                }
            }
        }
        Ok(Value::String(key.to_string()))
    }
}

fn untagged_number(n: &Number) -> Value {
    if let Some(i) = n.as_i64() {
        Value::from(i)
    } else if let Some(u) = n.as_u64() {
        Value::from(u)
    } else {
        Value::Double(n.as_f64().unwrap_or(f64::NAN))
    }
}

// ============================================================================
// Payload helpers
// ============================================================================

fn tag_of(node: &JsonValue) -> &str {
    node.get(tag::TYPE_KEY)
        .and_then(JsonValue::as_str)
        .unwrap_or_default()
}

fn payload(node: &JsonValue) -> GraphSONResult<&JsonValue> {
    node.get(tag::VALUE_KEY)
        .ok_or_else(|| GraphSONError::malformed(tag_of(node), "missing @value"))
}

fn payload_str(node: &JsonValue) -> GraphSONResult<&str> {
    payload(node)?
        .as_str()
        .ok_or_else(|| GraphSONError::malformed(tag_of(node), "expected a string payload"))
}

fn payload_object(node: &JsonValue) -> GraphSONResult<&Map<String, JsonValue>> {
    payload(node)?
        .as_object()
        .ok_or_else(|| GraphSONError::malformed(tag_of(node), "expected an object payload"))
}

fn field<'a>(
    node: &JsonValue,
    object: &'a Map<String, JsonValue>,
    name: &str,
) -> GraphSONResult<&'a JsonValue> {
    object
        .get(name)
        .ok_or_else(|| GraphSONError::malformed(tag_of(node), format!("missing field {:?}", name)))
}

fn string_field(
    node: &JsonValue,
    object: &Map<String, JsonValue>,
    name: &str,
) -> GraphSONResult<String> {
    field(node, object, name)?
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| {
            GraphSONError::malformed(tag_of(node), format!("field {:?} must be a string", name))
        })
}

fn optional_string_field(
    node: &JsonValue,
    object: &Map<String, JsonValue>,
    name: &str,
    default: &str,
) -> GraphSONResult<String> {
    match object.get(name) {
        None => Ok(default.to_string()),
        Some(_) => string_field(node, object, name),
    }
}

fn integer(node: &JsonValue) -> GraphSONResult<i64> {
    let malformed = || GraphSONError::malformed(tag_of(node), "expected an integer");
    match payload(node)? {
        JsonValue::Number(n) => n.as_i64().ok_or_else(malformed),
        JsonValue::String(s) => s.trim().parse().map_err(|_| malformed()),
        _ => Err(malformed()),
    }
}

/// Exact numeric text, never routed through a float.
fn numeric_text(node: &JsonValue) -> GraphSONResult<String> {
    match payload(node)? {
        JsonValue::Number(n) => Ok(n.to_string()),
        JsonValue::String(s) => Ok(s.trim().to_string()),
        _ => Err(GraphSONError::malformed(tag_of(node), "expected a number")),
    }
}

fn floating(node: &JsonValue) -> GraphSONResult<f64> {
    match payload(node)? {
        JsonValue::Number(n) => n
            .as_f64()
            .ok_or_else(|| GraphSONError::malformed(tag_of(node), "expected a number")),
        JsonValue::String(s) => match s.as_str() {
            "NaN" => Ok(f64::NAN),
            "Infinity" => Ok(f64::INFINITY),
            "-Infinity" => Ok(f64::NEG_INFINITY),
            other => other
                .parse()
                .map_err(|_| GraphSONError::malformed(tag_of(node), "expected a number")),
        },
        _ => Err(GraphSONError::malformed(tag_of(node), "expected a number")),
    }
}

fn properties_object<'a>(
    node: &JsonValue,
    object: &'a Map<String, JsonValue>,
) -> GraphSONResult<Option<&'a Map<String, JsonValue>>> {
    match object.get("properties") {
        None | Some(JsonValue::Null) => Ok(None),
        Some(JsonValue::Object(props)) => Ok(Some(props)),
        Some(_) => Err(GraphSONError::malformed(
            tag_of(node),
            "field \"properties\" must be an object",
        )),
    }
}

// ============================================================================
// Deserializers
// ============================================================================

/// `gx:Int16`
pub fn read_int16(_: &GraphSONReader<'_>, node: &JsonValue, _: usize) -> GraphSONResult<Value> {
    let n = integer(node)?;
    i16::try_from(n)
        .map(Value::Int16)
        .map_err(|_| GraphSONError::malformed(tag::INT16, format!("{} out of range", n)))
}

/// `g:Int32`
pub fn read_int32(_: &GraphSONReader<'_>, node: &JsonValue, _: usize) -> GraphSONResult<Value> {
    let n = integer(node)?;
    i32::try_from(n)
        .map(Value::Int32)
        .map_err(|_| GraphSONError::malformed(tag::INT32, format!("{} out of range", n)))
}

/// `g:Int64`
pub fn read_int64(_: &GraphSONReader<'_>, node: &JsonValue, _: usize) -> GraphSONResult<Value> {
    integer(node).map(Value::Int64)
}

/// `gx:BigInteger`
pub fn read_big_integer(
    _: &GraphSONReader<'_>,
    node: &JsonValue,
    _: usize,
) -> GraphSONResult<Value> {
    let text = numeric_text(node)?;
    BigInt::from_str(&text)
        .map(Value::BigInteger)
        .map_err(|e| GraphSONError::malformed(tag::BIG_INTEGER, format!("{}: {:?}", e, text)))
}

/// `gx:BigDecimal`
pub fn read_big_decimal(
    _: &GraphSONReader<'_>,
    node: &JsonValue,
    _: usize,
) -> GraphSONResult<Value> {
    let text = numeric_text(node)?;
    BigDecimal::from_str(&text)
        .map(Value::BigDecimal)
        .map_err(|e| GraphSONError::malformed(tag::BIG_DECIMAL, format!("{}: {:?}", e, text)))
}

/// `g:Float`
pub fn read_float(_: &GraphSONReader<'_>, node: &JsonValue, _: usize) -> GraphSONResult<Value> {
    floating(node).map(|f| Value::Float(f as f32))
}

/// `g:Double`
pub fn read_double(_: &GraphSONReader<'_>, node: &JsonValue, _: usize) -> GraphSONResult<Value> {
    floating(node).map(Value::Double)
}

/// `g:UUID`
pub fn read_uuid(_: &GraphSONReader<'_>, node: &JsonValue, _: usize) -> GraphSONResult<Value> {
    let text = payload_str(node)?;
    Uuid::parse_str(text)
        .map(Value::Uuid)
        .map_err(|e| GraphSONError::malformed(tag::UUID, e.to_string()))
}

/// `gx:Instant`; only `YYYY-MM-DDTHH:MM:SSZ` is accepted.
pub fn read_instant(_: &GraphSONReader<'_>, node: &JsonValue, _: usize) -> GraphSONResult<Value> {
    let text = payload_str(node)?;
    let naive = NaiveDateTime::parse_from_str(text, INSTANT_FORMAT).map_err(|e| {
        GraphSONError::malformed(tag::INSTANT, format!("{}: {:?}", e, text))
    })?;
    // a leap second parses as :59 plus a full second of nanos
    if naive.nanosecond() != 0 {
        return Err(GraphSONError::malformed(
            tag::INSTANT,
            format!("leap seconds are not representable: {:?}", text),
        ));
    }
    Ok(Value::Instant(Utc.from_utc_datetime(&naive)))
}

/// `gx:Duration`
pub fn read_duration(_: &GraphSONReader<'_>, node: &JsonValue, _: usize) -> GraphSONResult<Value> {
    Duration::parse(payload_str(node)?).map(Value::Duration)
}

/// `gx:InetAddress`
pub fn read_inet_address(
    _: &GraphSONReader<'_>,
    node: &JsonValue,
    _: usize,
) -> GraphSONResult<Value> {
    let text = payload_str(node)?;
    IpAddr::from_str(text)
        .map(Value::InetAddress)
        .map_err(|e| GraphSONError::malformed(tag::INET_ADDRESS, format!("{}: {:?}", e, text)))
}

/// `dse:Blob`
pub fn read_blob(_: &GraphSONReader<'_>, node: &JsonValue, _: usize) -> GraphSONResult<Value> {
    base64::engine::general_purpose::STANDARD
        .decode(payload_str(node)?)
        .map(Value::Blob)
        .map_err(|e| GraphSONError::malformed(tag::BLOB, e.to_string()))
}

/// `dse:Point`
pub fn read_point(_: &GraphSONReader<'_>, node: &JsonValue, _: usize) -> GraphSONResult<Value> {
    Point::from_wkt(payload_str(node)?).map(Value::Point)
}

/// `dse:LineString`
pub fn read_line_string(
    _: &GraphSONReader<'_>,
    node: &JsonValue,
    _: usize,
) -> GraphSONResult<Value> {
    LineString::from_wkt(payload_str(node)?).map(Value::LineString)
}

/// `dse:Polygon`
pub fn read_polygon(_: &GraphSONReader<'_>, node: &JsonValue, _: usize) -> GraphSONResult<Value> {
    Polygon::from_wkt(payload_str(node)?).map(Value::Polygon)
}

/// `dse:Distance`
pub fn read_distance(_: &GraphSONReader<'_>, node: &JsonValue, _: usize) -> GraphSONResult<Value> {
    Distance::from_wkt(payload_str(node)?).map(Value::Distance)
}

/// `g:Vertex`; a missing label reads as `""`.
pub fn read_vertex(
    reader: &GraphSONReader<'_>,
    node: &JsonValue,
    depth: usize,
) -> GraphSONResult<Value> {
    let object = payload_object(node)?;
    let id = reader.objectify(field(node, object, "id")?, depth + 1)?;
    let label = optional_string_field(node, object, "label", "")?;

    let mut properties = Vec::new();
    if let Some(groups) = properties_object(node, object)? {
        for group in groups.values() {
            let Some(list) = group.as_array() else {
                return Err(GraphSONError::malformed(
                    tag::VERTEX,
                    "vertex properties must be grouped in arrays",
                ));
            };
            for item in list {
                match reader.objectify(item, depth + 3)? {
                    Value::VertexProperty(p) => properties.push(p),
                    other => {
                        return Err(GraphSONError::malformed(
                            tag::VERTEX,
                            format!("expected a vertex property, got {}", other.type_name()),
                        ))
                    }
                }
            }
        }
    }

    Ok(Value::Vertex(
        Vertex::new(id, label).with_properties(properties),
    ))
}

/// `g:Edge`
///
/// Endpoints are rebuilt from their raw ids with empty labels, and a missing
/// edge label reads as `"vertex"`.
pub fn read_edge(
    reader: &GraphSONReader<'_>,
    node: &JsonValue,
    depth: usize,
) -> GraphSONResult<Value> {
    let object = payload_object(node)?;
    let id = reader.objectify(field(node, object, "id")?, depth + 1)?;
    let label = optional_string_field(node, object, "label", "vertex")?;
    let out_v = reader.objectify(field(node, object, "outV")?, depth + 1)?;
    let in_v = reader.objectify(field(node, object, "inV")?, depth + 1)?;

    let mut properties = Vec::new();
    if let Some(props) = properties_object(node, object)? {
        for (key, raw) in props {
            match reader.objectify(raw, depth + 2)? {
                Value::Property(p) => properties.push(p),
                other => properties.push(Property::new(key.as_str(), other)),
            }
        }
    }

    let edge = Edge::new(id, label, Vertex::new(out_v, ""), Vertex::new(in_v, ""));
    Ok(Value::Edge(edge.with_properties(properties)))
}

/// `g:VertexProperty`
pub fn read_vertex_property(
    reader: &GraphSONReader<'_>,
    node: &JsonValue,
    depth: usize,
) -> GraphSONResult<Value> {
    let object = payload_object(node)?;
    let id = reader.objectify(field(node, object, "id")?, depth + 1)?;
    let label = string_field(node, object, "label")?;
    let value = reader.objectify(field(node, object, "value")?, depth + 1)?;

    let mut meta = Vec::new();
    if let Some(props) = properties_object(node, object)? {
        for (key, raw) in props {
            meta.push(Property::new(key.as_str(), reader.objectify(raw, depth + 2)?));
        }
    }

    Ok(Value::VertexProperty(
        VertexProperty::new(id, label, value).with_properties(meta),
    ))
}

/// `g:Property`
pub fn read_property(
    reader: &GraphSONReader<'_>,
    node: &JsonValue,
    depth: usize,
) -> GraphSONResult<Value> {
    let object = payload_object(node)?;
    let key = string_field(node, object, "key")?;
    let value = reader.objectify(field(node, object, "value")?, depth + 1)?;
    Ok(Value::Property(Property::new(key, value)))
}

/// `g:Path`
pub fn read_path(
    reader: &GraphSONReader<'_>,
    node: &JsonValue,
    depth: usize,
) -> GraphSONResult<Value> {
    let object = payload_object(node)?;
    let malformed = |msg: &str| GraphSONError::malformed(tag::PATH, msg);

    let labels = field(node, object, "labels")?
        .as_array()
        .ok_or_else(|| malformed("labels must be an array"))?
        .iter()
        .map(|set| {
            set.as_array()
                .ok_or_else(|| malformed("each label set must be an array"))?
                .iter()
                .map(|l| {
                    l.as_str()
                        .map(str::to_string)
                        .ok_or_else(|| malformed("labels must be strings"))
                })
                .collect::<GraphSONResult<Vec<_>>>()
        })
        .collect::<GraphSONResult<Vec<_>>>()?;

    let objects = field(node, object, "objects")?
        .as_array()
        .ok_or_else(|| malformed("objects must be an array"))?
        .iter()
        .map(|o| reader.objectify(o, depth + 2))
        .collect::<GraphSONResult<Vec<_>>>()?;

    Ok(Value::Path(Path::new(labels, objects)))
}

/// `g:Traverser`
pub fn read_traverser(
    reader: &GraphSONReader<'_>,
    node: &JsonValue,
    depth: usize,
) -> GraphSONResult<Value> {
    let object = payload_object(node)?;
    let value = reader.objectify(field(node, object, "value")?, depth + 1)?;
    let bulk = reader
        .objectify(field(node, object, "bulk")?, depth + 1)?
        .as_i64()
        .ok_or_else(|| GraphSONError::malformed(tag::TRAVERSER, "bulk must be an integer"))?;
    Ok(Value::Traverser(Traverser::new(value, bulk)))
}

/// `g:<EnumType>`
pub fn read_enum(_: &GraphSONReader<'_>, node: &JsonValue, _: usize) -> GraphSONResult<Value> {
    let type_tag = tag_of(node);
    let kind = tag::split(type_tag)
        .and_then(|(_, name)| EnumKind::from_type_name(name))
        .ok_or_else(|| GraphSONError::unknown_tag(type_tag))?;
    Ok(Value::Enum(EnumConstant::new(kind, payload_str(node)?)))
}

/// `g:Binding`
pub fn read_binding(
    reader: &GraphSONReader<'_>,
    node: &JsonValue,
    depth: usize,
) -> GraphSONResult<Value> {
    let object = payload_object(node)?;
    let key = string_field(node, object, "key")?;
    let value = reader.objectify(field(node, object, "value")?, depth + 1)?;
    Ok(Value::Binding(Binding::new(key, value)))
}

/// `g:P`
///
/// Text-distance operators need `[text, distance]`. Range operators with a
/// two-element array get two operands. Anything else is a single operand.
pub fn read_predicate(
    reader: &GraphSONReader<'_>,
    node: &JsonValue,
    depth: usize,
) -> GraphSONResult<Value> {
    let object = payload_object(node)?;
    let operator = string_field(node, object, "predicate")?;
    let raw = field(node, object, "value")?;

    if TEXT_DISTANCE_OPERATORS.contains(&operator.as_str()) {
        let malformed = || {
            GraphSONError::malformed(
                tag::PREDICATE,
                format!("{} expects [text, distance]", operator),
            )
        };
        let pair = raw.as_array().filter(|a| a.len() == 2).ok_or_else(malformed)?;
        let text = match reader.objectify(&pair[0], depth + 2)? {
            Value::String(s) => s,
            _ => return Err(malformed()),
        };
        let distance = reader
            .objectify(&pair[1], depth + 2)?
            .as_i64()
            .ok_or_else(malformed)?;
        return Ok(Value::from(TextDistanceP::new(operator, text, distance)));
    }

    if RANGE_OPERATORS.contains(&operator.as_str()) {
        if let Some([low, high]) = raw.as_array().map(Vec::as_slice) {
            let low = reader.objectify(low, depth + 2)?;
            let high = reader.objectify(high, depth + 2)?;
            return Ok(Value::from(P::with_other(operator, low, high)));
        }
    }

    let operand = reader.objectify(raw, depth + 1)?;
    Ok(Value::from(P::new(operator, operand)))
}

/// `g:Lambda`
pub fn read_lambda(
    reader: &GraphSONReader<'_>,
    node: &JsonValue,
    depth: usize,
) -> GraphSONResult<Value> {
    let object = payload_object(node)?;
    let script = string_field(node, object, "script")?;
    let language = string_field(node, object, "language")?;
    let arguments = match object.get("arguments") {
        None => -1,
        Some(raw) => reader
            .objectify(raw, depth + 1)?
            .as_i64()
            .and_then(|n| i32::try_from(n).ok())
            .ok_or_else(|| GraphSONError::malformed(tag::LAMBDA, "arguments must be an int"))?,
    };
    Ok(Value::Lambda(Lambda::with_language(script, language, arguments)))
}

/// `g:Bytecode`
pub fn read_bytecode(
    reader: &GraphSONReader<'_>,
    node: &JsonValue,
    depth: usize,
) -> GraphSONResult<Value> {
    let object = payload_object(node)?;
    let mut bytecode = Bytecode::new();
    if let Some(raw) = object.get(tag::SOURCE_FIELD) {
        bytecode.source_instructions = read_instructions(reader, raw, depth + 1)?;
    }
    if let Some(raw) = object.get(tag::STEP_FIELD) {
        bytecode.step_instructions = read_instructions(reader, raw, depth + 1)?;
    }
    Ok(Value::Bytecode(bytecode))
}

fn read_instructions(
    reader: &GraphSONReader<'_>,
    raw: &JsonValue,
    depth: usize,
) -> GraphSONResult<Vec<Instruction>> {
    let malformed =
        || GraphSONError::malformed(tag::BYTECODE, "instructions must be [operator, args...]");
    let list = raw.as_array().ok_or_else(malformed)?;
    let mut out = Vec::with_capacity(list.len());
    for entry in list {
        let (operator, arguments) = entry
            .as_array()
            .and_then(|e| e.split_first())
            .ok_or_else(malformed)?;
        let operator = operator.as_str().ok_or_else(malformed)?;
        let arguments = arguments
            .iter()
            .map(|a| reader.objectify(a, depth + 2))
            .collect::<GraphSONResult<Vec<_>>>()?;
        out.push(Instruction {
            operator: operator.to_string(),
            arguments,
        });
    }
    Ok(out)
}
