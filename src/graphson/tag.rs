//! GraphSON type tags.
//!
//! A tagged value is a JSON object with exactly two fields: the type tag under
//! [`TYPE_KEY`] and the payload under [`VALUE_KEY`]. Tags are namespaced strings
//! of the form `prefix:Name` where the prefix is 1 to 3 characters long.

/// Reserved field holding the type tag
pub const TYPE_KEY: &str = "@type";
/// Reserved field holding the payload
pub const VALUE_KEY: &str = "@value";

/// Namespace prefixes
pub const CORE_PREFIX: &str = "g";
pub const EXTENDED_PREFIX: &str = "gx";
pub const DSE_PREFIX: &str = "dse";

/// Numeric tags
pub const INT16: &str = "gx:Int16";
pub const INT32: &str = "g:Int32";
pub const INT64: &str = "g:Int64";
pub const BIG_INTEGER: &str = "gx:BigInteger";
pub const BIG_DECIMAL: &str = "gx:BigDecimal";
pub const FLOAT: &str = "g:Float";
pub const DOUBLE: &str = "g:Double";

/// Scalar tags
pub const UUID: &str = "g:UUID";
pub const INSTANT: &str = "gx:Instant";
pub const DURATION: &str = "gx:Duration";
pub const INET_ADDRESS: &str = "gx:InetAddress";
pub const BLOB: &str = "dse:Blob";

/// Graph element tags
pub const VERTEX: &str = "g:Vertex";
pub const EDGE: &str = "g:Edge";
pub const VERTEX_PROPERTY: &str = "g:VertexProperty";
pub const PROPERTY: &str = "g:Property";
pub const PATH: &str = "g:Path";

/// Traversal tags
pub const TRAVERSER: &str = "g:Traverser";
pub const BINDING: &str = "g:Binding";
pub const PREDICATE: &str = "g:P";
pub const LAMBDA: &str = "g:Lambda";
pub const BYTECODE: &str = "g:Bytecode";

/// Geospatial tags
pub const POINT: &str = "dse:Point";
pub const LINE_STRING: &str = "dse:LineString";
pub const POLYGON: &str = "dse:Polygon";
pub const DISTANCE: &str = "dse:Distance";

/// Bytecode payload fields
pub const SOURCE_FIELD: &str = "source";
pub const STEP_FIELD: &str = "step";

/// Longest namespace prefix accepted in a tag
pub const MAX_PREFIX_LEN: usize = 3;

/// Build a tag from a prefix and a type name.
pub fn make(prefix: &str, name: &str) -> String {
    format!("{}:{}", prefix, name)
}

/// Split a tag into its prefix and type name.
///
/// Returns `None` when the tag does not follow the `prefix:Name` shape.
pub fn split(tag: &str) -> Option<(&str, &str)> {
    let (prefix, name) = tag.split_once(':')?;
    if prefix.is_empty() || prefix.len() > MAX_PREFIX_LEN || name.is_empty() {
        return None;
    }
    if !prefix.chars().all(|c| c.is_ascii_alphanumeric()) || name.contains(':') {
        return None;
    }
    Some((prefix, name))
}

/// Check if a string is a well-formed tag.
pub fn is_valid(tag: &str) -> bool {
    split(tag).is_some()
}
