//! GraphSON value types.

use std::fmt;
use std::net::IpAddr;

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use num_bigint::BigInt;
use uuid::Uuid;

use super::bytecode::Bytecode;
use super::duration::Duration;
use super::geometry::{Distance, LineString, Point, Polygon};
use super::predicate::{Predicate, TextDistanceP, P};
use super::structures::{
    Binding, Edge, EnumConstant, Lambda, Path, Property, Traverser, Vertex, VertexProperty,
};

/// A value that can be written to or read from GraphSON.
///
/// Integers keep the width they were created with. Conversions from plain Rust
/// integers (`From<i64>`, `From<u64>`) choose the width by magnitude instead.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Null value
    Null,
    /// Boolean value
    Boolean(bool),
    /// 16-bit signed integer
    Int16(i16),
    /// 32-bit signed integer
    Int32(i32),
    /// 64-bit signed integer
    Int64(i64),
    /// Arbitrary-precision integer
    BigInteger(BigInt),
    /// Arbitrary-precision decimal
    BigDecimal(BigDecimal),
    /// 32-bit floating point
    Float(f32),
    /// 64-bit floating point
    Double(f64),
    /// UTF-8 string
    String(String),
    /// UUID
    Uuid(Uuid),
    /// UTC instant, whole seconds
    Instant(DateTime<Utc>),
    /// ISO-8601 duration
    Duration(Duration),
    /// IP address
    InetAddress(IpAddr),
    /// Opaque binary data
    Blob(Vec<u8>),
    /// Ordered list of values
    List(Vec<Value>),
    /// Key-unique map
    Map(ValueMap),
    /// Graph vertex
    Vertex(Vertex),
    /// Graph edge
    Edge(Edge),
    /// Vertex property
    VertexProperty(VertexProperty),
    /// Edge or meta property
    Property(Property),
    /// Traversal path
    Path(Path),
    /// Traversal result with bulk
    Traverser(Traverser),
    /// Enumeration constant
    Enum(EnumConstant),
    /// Variable binding
    Binding(Binding),
    /// Filter predicate
    Predicate(Predicate),
    /// Opaque script
    Lambda(Lambda),
    /// Nested traversal program
    Bytecode(Bytecode),
    /// Geospatial point
    Point(Point),
    /// Geospatial line string
    LineString(LineString),
    /// Geospatial polygon
    Polygon(Polygon),
    /// Geospatial circle
    Distance(Distance),
}

/// Discriminant of a [`Value`], used as the registry's encode-side key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[allow(missing_docs)]
pub enum ValueKind {
    Null,
    Boolean,
    Int16,
    Int32,
    Int64,
    BigInteger,
    BigDecimal,
    Float,
    Double,
    String,
    Uuid,
    Instant,
    Duration,
    InetAddress,
    Blob,
    List,
    Map,
    Vertex,
    Edge,
    VertexProperty,
    Property,
    Path,
    Traverser,
    Enum,
    Binding,
    Predicate,
    Lambda,
    Bytecode,
    Point,
    LineString,
    Polygon,
    Distance,
}

/// Broad family a kind belongs to; the registry falls back to these when no
/// exact kind entry exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Capability {
    /// Integral and floating numbers (never booleans)
    Number,
    /// WKT shapes
    Geometry,
    /// Enumeration constants
    Enumeration,
}

impl ValueKind {
    /// Kind name for diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            ValueKind::Null => "Null",
            ValueKind::Boolean => "Boolean",
            ValueKind::Int16 => "Int16",
            ValueKind::Int32 => "Int32",
            ValueKind::Int64 => "Int64",
            ValueKind::BigInteger => "BigInteger",
            ValueKind::BigDecimal => "BigDecimal",
            ValueKind::Float => "Float",
            ValueKind::Double => "Double",
            ValueKind::String => "String",
            ValueKind::Uuid => "UUID",
            ValueKind::Instant => "Instant",
            ValueKind::Duration => "Duration",
            ValueKind::InetAddress => "InetAddress",
            ValueKind::Blob => "Blob",
            ValueKind::List => "List",
            ValueKind::Map => "Map",
            ValueKind::Vertex => "Vertex",
            ValueKind::Edge => "Edge",
            ValueKind::VertexProperty => "VertexProperty",
            ValueKind::Property => "Property",
            ValueKind::Path => "Path",
            ValueKind::Traverser => "Traverser",
            ValueKind::Enum => "Enum",
            ValueKind::Binding => "Binding",
            ValueKind::Predicate => "Predicate",
            ValueKind::Lambda => "Lambda",
            ValueKind::Bytecode => "Bytecode",
            ValueKind::Point => "Point",
            ValueKind::LineString => "LineString",
            ValueKind::Polygon => "Polygon",
            ValueKind::Distance => "Distance",
        }
    }

    /// Capability this kind falls back to, if any.
    ///
    /// `Boolean` deliberately has none.
    pub fn capability(&self) -> Option<Capability> {
        match self {
            ValueKind::Int16
            | ValueKind::Int32
            | ValueKind::Int64
            | ValueKind::BigInteger
            | ValueKind::BigDecimal
            | ValueKind::Float
            | ValueKind::Double => Some(Capability::Number),
            ValueKind::Point | ValueKind::LineString | ValueKind::Polygon | ValueKind::Distance => {
                Some(Capability::Geometry)
            }
            ValueKind::Enum => Some(Capability::Enumeration),
            _ => None,
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Value {
    /// Get the kind discriminant.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Boolean(_) => ValueKind::Boolean,
            Value::Int16(_) => ValueKind::Int16,
            Value::Int32(_) => ValueKind::Int32,
            Value::Int64(_) => ValueKind::Int64,
            Value::BigInteger(_) => ValueKind::BigInteger,
            Value::BigDecimal(_) => ValueKind::BigDecimal,
            Value::Float(_) => ValueKind::Float,
            Value::Double(_) => ValueKind::Double,
            Value::String(_) => ValueKind::String,
            Value::Uuid(_) => ValueKind::Uuid,
            Value::Instant(_) => ValueKind::Instant,
            Value::Duration(_) => ValueKind::Duration,
            Value::InetAddress(_) => ValueKind::InetAddress,
            Value::Blob(_) => ValueKind::Blob,
            Value::List(_) => ValueKind::List,
            Value::Map(_) => ValueKind::Map,
            Value::Vertex(_) => ValueKind::Vertex,
            Value::Edge(_) => ValueKind::Edge,
            Value::VertexProperty(_) => ValueKind::VertexProperty,
            Value::Property(_) => ValueKind::Property,
            Value::Path(_) => ValueKind::Path,
            Value::Traverser(_) => ValueKind::Traverser,
            Value::Enum(_) => ValueKind::Enum,
            Value::Binding(_) => ValueKind::Binding,
            Value::Predicate(_) => ValueKind::Predicate,
            Value::Lambda(_) => ValueKind::Lambda,
            Value::Bytecode(_) => ValueKind::Bytecode,
            Value::Point(_) => ValueKind::Point,
            Value::LineString(_) => ValueKind::LineString,
            Value::Polygon(_) => ValueKind::Polygon,
            Value::Distance(_) => ValueKind::Distance,
        }
    }

    /// Get the type name for debugging.
    pub fn type_name(&self) -> &'static str {
        self.kind().name()
    }

    /// Check if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Try to get as boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get as a 64-bit integer, from any integral width that fits.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int16(i) => Some(*i as i64),
            Value::Int32(i) => Some(*i as i64),
            Value::Int64(i) => Some(*i),
            Value::BigInteger(i) => i64::try_from(i).ok(),
            _ => None,
        }
    }

    /// Try to get as float.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f as f64),
            Value::Double(f) => Some(*f),
            _ => self.as_i64().map(|i| i as f64),
        }
    }

    /// Try to get as string reference.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get as list reference.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(l) => Some(l),
            _ => None,
        }
    }

    /// Try to get as map reference.
    pub fn as_map(&self) -> Option<&ValueMap> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Try to get as vertex reference.
    pub fn as_vertex(&self) -> Option<&Vertex> {
        match self {
            Value::Vertex(v) => Some(v),
            _ => None,
        }
    }

    /// Try to get as edge reference.
    pub fn as_edge(&self) -> Option<&Edge> {
        match self {
            Value::Edge(e) => Some(e),
            _ => None,
        }
    }

    /// Try to get as traverser reference.
    pub fn as_traverser(&self) -> Option<&Traverser> {
        match self {
            Value::Traverser(t) => Some(t),
            _ => None,
        }
    }

    /// Try to get as duration.
    pub fn as_duration(&self) -> Option<Duration> {
        match self {
            Value::Duration(d) => Some(*d),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Int16(i) => write!(f, "{}", i),
            Value::Int32(i) => write!(f, "{}", i),
            Value::Int64(i) => write!(f, "{}", i),
            Value::BigInteger(i) => write!(f, "{}", i),
            Value::BigDecimal(d) => write!(f, "{}", d),
            Value::Float(fl) => write!(f, "{}", fl),
            Value::Double(fl) => write!(f, "{}", fl),
            Value::String(s) => write!(f, "\"{}\"", s),
            Value::Uuid(u) => write!(f, "{}", u),
            Value::Instant(t) => write!(f, "{}", t.to_rfc3339()),
            Value::Duration(d) => write!(f, "{}", d),
            Value::InetAddress(a) => write!(f, "{}", a),
            Value::Blob(b) => write!(f, "<{} bytes>", b.len()),
            Value::List(l) => write!(f, "[{} items]", l.len()),
            Value::Map(m) => write!(f, "{{{} entries}}", m.len()),
            Value::Vertex(v) => write!(f, "{}", v),
            Value::Edge(e) => write!(f, "{}", e),
            Value::VertexProperty(p) => write!(f, "{}", p),
            Value::Property(p) => write!(f, "{}", p),
            Value::Path(p) => write!(f, "path[{} objects]", p.len()),
            Value::Traverser(t) => write!(f, "{}x{}", t.value, t.bulk),
            Value::Enum(e) => write!(f, "{}", e),
            Value::Binding(b) => write!(f, "binding[{}={}]", b.key, b.value),
            Value::Predicate(p) => write!(f, "{}", p),
            Value::Lambda(l) => write!(f, "lambda[{}]", l.script),
            Value::Bytecode(b) => write!(
                f,
                "bytecode[{} source, {} step]",
                b.source_instructions.len(),
                b.step_instructions.len()
            ),
            Value::Point(p) => write!(f, "{}", p),
            Value::LineString(l) => write!(f, "{}", l),
            Value::Polygon(p) => write!(f, "{}", p),
            Value::Distance(d) => write!(f, "{}", d),
        }
    }
}

// ============================================================================
// ValueMap
// ============================================================================

/// A key-unique map whose keys may be any value.
///
/// Entries keep insertion order for iteration, but equality ignores order.
#[derive(Debug, Clone, Default)]
pub struct ValueMap {
    entries: Vec<(Value, Value)>,
}

impl ValueMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry, replacing and returning any previous value for the key.
    pub fn insert(&mut self, key: impl Into<Value>, value: impl Into<Value>) -> Option<Value> {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => Some(std::mem::replace(existing, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Look up a value by key.
    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Look up a value by string key.
    pub fn get_str(&self, key: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(k, _)| k.as_str() == Some(key))
            .map(|(_, v)| v)
    }

    /// Get the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&Value, &Value)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }
}

impl PartialEq for ValueMap {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl<K: Into<Value>, V: Into<Value>> FromIterator<(K, V)> for ValueMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = ValueMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl IntoIterator for ValueMap {
    type Item = (Value, Value);
    type IntoIter = std::vec::IntoIter<(Value, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

// ============================================================================
// Conversions
// ============================================================================

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
    }
}

impl From<i16> for Value {
    fn from(v: i16) -> Self {
        Value::Int16(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int32(v)
    }
}

/// Picks `Int32` when the value fits, `Int64` otherwise.
impl From<i64> for Value {
    fn from(v: i64) -> Self {
        match i32::try_from(v) {
            Ok(small) => Value::Int32(small),
            Err(_) => Value::Int64(v),
        }
    }
}

/// Picks `Int32`, `Int64` or `BigInteger` by magnitude.
impl From<u64> for Value {
    fn from(v: u64) -> Self {
        match i64::try_from(v) {
            Ok(signed) => Value::from(signed),
            Err(_) => Value::BigInteger(BigInt::from(v)),
        }
    }
}

impl From<BigInt> for Value {
    fn from(v: BigInt) -> Self {
        Value::BigInteger(v)
    }
}

impl From<BigDecimal> for Value {
    fn from(v: BigDecimal) -> Self {
        Value::BigDecimal(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<Uuid> for Value {
    fn from(v: Uuid) -> Self {
        Value::Uuid(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::Instant(v)
    }
}

impl From<IpAddr> for Value {
    fn from(v: IpAddr) -> Self {
        Value::InetAddress(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Blob(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::List(v)
    }
}

impl From<ValueMap> for Value {
    fn from(v: ValueMap) -> Self {
        Value::Map(v)
    }
}

impl From<P> for Value {
    fn from(v: P) -> Self {
        Value::Predicate(Predicate::Value(v))
    }
}

impl From<TextDistanceP> for Value {
    fn from(v: TextDistanceP) -> Self {
        Value::Predicate(Predicate::TextDistance(v))
    }
}

macro_rules! value_from_variant {
    ($($ty:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }
        )+
    };
}

value_from_variant!(
    Duration => Duration,
    Vertex => Vertex,
    Edge => Edge,
    VertexProperty => VertexProperty,
    Property => Property,
    Path => Path,
    Traverser => Traverser,
    EnumConstant => Enum,
    Binding => Binding,
    Predicate => Predicate,
    Lambda => Lambda,
    Bytecode => Bytecode,
    Point => Point,
    LineString => LineString,
    Polygon => Polygon,
    Distance => Distance,
);

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}
