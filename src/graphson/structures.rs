//! Graph records and traversal wrappers carried as GraphSON values.

use std::fmt;

use super::types::Value;

/// A graph vertex.
///
/// Equality ignores property order: properties travel grouped by label.
#[derive(Debug, Clone)]
pub struct Vertex {
    /// Vertex ID
    pub id: Box<Value>,
    /// Vertex label
    pub label: String,
    /// Vertex properties
    pub properties: Vec<VertexProperty>,
}

impl Vertex {
    /// Create a new vertex without properties.
    pub fn new(id: impl Into<Value>, label: impl Into<String>) -> Self {
        Self {
            id: Box::new(id.into()),
            label: label.into(),
            properties: Vec::new(),
        }
    }

    /// Set the properties.
    pub fn with_properties(mut self, properties: Vec<VertexProperty>) -> Self {
        self.properties = properties;
        self
    }

    /// Get all properties with the given label.
    pub fn properties_named<'a>(
        &'a self,
        label: &'a str,
    ) -> impl Iterator<Item = &'a VertexProperty> + 'a {
        self.properties.iter().filter(move |p| p.label == label)
    }
}

impl fmt::Display for Vertex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v[{}]", self.id)
    }
}

/// A graph edge.
///
/// Equality ignores property order.
#[derive(Debug, Clone)]
pub struct Edge {
    /// Edge ID
    pub id: Box<Value>,
    /// Edge label
    pub label: String,
    /// Outgoing (tail) vertex
    pub out_v: Vertex,
    /// Incoming (head) vertex
    pub in_v: Vertex,
    /// Edge properties
    pub properties: Vec<Property>,
}

impl Edge {
    /// Create a new edge without properties.
    pub fn new(id: impl Into<Value>, label: impl Into<String>, out_v: Vertex, in_v: Vertex) -> Self {
        Self {
            id: Box::new(id.into()),
            label: label.into(),
            out_v,
            in_v,
            properties: Vec::new(),
        }
    }

    /// Set the properties.
    pub fn with_properties(mut self, properties: Vec<Property>) -> Self {
        self.properties = properties;
        self
    }

    /// Look up a property value by key.
    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties
            .iter()
            .find(|p| p.key == key)
            .map(|p| p.value.as_ref())
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "e[{}][{}-{}->{}]",
            self.id, self.out_v.id, self.label, self.in_v.id
        )
    }
}

/// A property attached to a vertex, which may itself carry meta-properties.
///
/// Equality ignores meta-property order.
#[derive(Debug, Clone)]
pub struct VertexProperty {
    /// Property ID
    pub id: Box<Value>,
    /// Property label (key)
    pub label: String,
    /// Property value
    pub value: Box<Value>,
    /// Meta-properties
    pub properties: Vec<Property>,
}

impl VertexProperty {
    /// Create a new vertex property.
    pub fn new(id: impl Into<Value>, label: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            id: Box::new(id.into()),
            label: label.into(),
            value: Box::new(value.into()),
            properties: Vec::new(),
        }
    }

    /// Set the meta-properties.
    pub fn with_properties(mut self, properties: Vec<Property>) -> Self {
        self.properties = properties;
        self
    }
}

impl fmt::Display for VertexProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "vp[{}->{}]", self.label, self.value)
    }
}

impl PartialEq for Vertex {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.label == other.label
            && same_elements(&self.properties, &other.properties)
    }
}

impl PartialEq for Edge {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.label == other.label
            && self.out_v == other.out_v
            && self.in_v == other.in_v
            && same_elements(&self.properties, &other.properties)
    }
}

impl PartialEq for VertexProperty {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.label == other.label
            && self.value == other.value
            && same_elements(&self.properties, &other.properties)
    }
}

/// Multiset comparison for element types without `Hash` or `Ord`.
fn same_elements<T: PartialEq>(a: &[T], b: &[T]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut matched = vec![false; b.len()];
    a.iter().all(|x| {
        match (0..b.len()).find(|&i| !matched[i] && b[i] == *x) {
            Some(i) => {
                matched[i] = true;
                true
            }
            None => false,
        }
    })
}

/// A key/value property on an edge or a vertex property.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    /// Property key
    pub key: String,
    /// Property value
    pub value: Box<Value>,
}

impl Property {
    /// Create a new property.
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: Box::new(value.into()),
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p[{}->{}]", self.key, self.value)
    }
}

/// A traversal path: the objects visited and the step labels at each.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Path {
    /// Labels per object
    pub labels: Vec<Vec<String>>,
    /// Objects in traversal order
    pub objects: Vec<Value>,
}

impl Path {
    /// Create a new path.
    pub fn new(labels: Vec<Vec<String>>, objects: Vec<Value>) -> Self {
        Self { labels, objects }
    }

    /// Get the number of objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if the path is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

/// A traversal result: a value plus how many times it occurred.
#[derive(Debug, Clone, PartialEq)]
pub struct Traverser {
    /// Result value
    pub value: Box<Value>,
    /// Repetition count
    pub bulk: i64,
}

impl Traverser {
    /// Create a new traverser.
    pub fn new(value: impl Into<Value>, bulk: i64) -> Self {
        Self {
            value: Box::new(value.into()),
            bulk,
        }
    }
}

/// A named variable binding inside a traversal.
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    /// Variable name
    pub key: String,
    /// Bound value
    pub value: Box<Value>,
}

impl Binding {
    /// Create a new binding.
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: Box::new(value.into()),
        }
    }
}

/// Default script language for lambdas
pub const DEFAULT_LAMBDA_LANGUAGE: &str = "gremlin-groovy";

/// An opaque script argument.
///
/// The script text, language and arity are supplied by the caller as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lambda {
    /// Script text
    pub script: String,
    /// Script language
    pub language: String,
    /// Declared number of arguments (-1 when variadic)
    pub arguments: i32,
}

impl Lambda {
    /// Create a groovy lambda.
    pub fn new(script: impl Into<String>, arguments: i32) -> Self {
        Self::with_language(script, DEFAULT_LAMBDA_LANGUAGE, arguments)
    }

    /// Create a lambda in the given language.
    pub fn with_language(
        script: impl Into<String>,
        language: impl Into<String>,
        arguments: i32,
    ) -> Self {
        Self {
            script: script.into(),
            language: language.into(),
            arguments,
        }
    }
}

/// Enumeration families known to the traversal machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnumKind {
    /// Barrier
    Barrier,
    /// Cardinality
    Cardinality,
    /// Column
    Column,
    /// Direction
    Direction,
    /// Operator
    Operator,
    /// Order
    Order,
    /// Pick
    Pick,
    /// Pop
    Pop,
    /// Scope
    Scope,
    /// T (token)
    T,
}

impl EnumKind {
    /// Every enumeration family.
    pub const ALL: [EnumKind; 10] = [
        EnumKind::Barrier,
        EnumKind::Cardinality,
        EnumKind::Column,
        EnumKind::Direction,
        EnumKind::Operator,
        EnumKind::Order,
        EnumKind::Pick,
        EnumKind::Pop,
        EnumKind::Scope,
        EnumKind::T,
    ];

    /// Type name used in the wire tag.
    pub fn type_name(&self) -> &'static str {
        match self {
            EnumKind::Barrier => "Barrier",
            EnumKind::Cardinality => "Cardinality",
            EnumKind::Column => "Column",
            EnumKind::Direction => "Direction",
            EnumKind::Operator => "Operator",
            EnumKind::Order => "Order",
            EnumKind::Pick => "Pick",
            EnumKind::Pop => "Pop",
            EnumKind::Scope => "Scope",
            EnumKind::T => "T",
        }
    }

    /// Look up a family by its wire type name.
    pub fn from_type_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.type_name() == name)
    }
}

/// Names that collide with reserved words are written with a trailing underscore.
const SYMBOL_MAP: [(&str, &str); 11] = [
    ("global_", "global"),
    ("as_", "as"),
    ("in_", "in"),
    ("and_", "and"),
    ("or_", "or"),
    ("is_", "is"),
    ("not_", "not"),
    ("from_", "from"),
    ("set_", "set"),
    ("list_", "list"),
    ("all_", "all"),
];

/// Map a local constant name to its wire name.
pub fn to_wire_symbol(name: &str) -> &str {
    SYMBOL_MAP
        .iter()
        .find(|(local, _)| *local == name)
        .map(|(_, wire)| *wire)
        .unwrap_or(name)
}

/// A named enumeration constant, such as `Order.desc` or `T.label`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnumConstant {
    /// Enumeration family
    pub kind: EnumKind,
    /// Constant name as written on the wire
    pub name: String,
}

impl EnumConstant {
    /// Create a new constant; reserved-word aliases like `in_` are normalized.
    pub fn new(kind: EnumKind, name: &str) -> Self {
        Self {
            kind,
            name: to_wire_symbol(name).to_string(),
        }
    }
}

impl fmt::Display for EnumConstant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.kind.type_name(), self.name)
    }
}
