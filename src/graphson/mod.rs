//! GraphSON 2.0 serialization format.
//!
//! GraphSON is the JSON encoding DSE Graph uses for traversal programs and
//! results. JSON cannot tell a 32-bit integer from a 64-bit one, or a UUID from
//! a string, so typed values travel as tagged objects:
//!
//! ```json
//! {"@type": "g:Int64", "@value": 2147483648}
//! ```
//!
//! # Supported Types
//!
//! - **Numbers**: `gx:Int16`, `g:Int32`, `g:Int64`, `gx:BigInteger`,
//!   `gx:BigDecimal`, `g:Float`, `g:Double`
//! - **Scalars**: `g:UUID`, `gx:Instant`, `gx:Duration`, `gx:InetAddress`, `dse:Blob`
//! - **Graph**: `g:Vertex`, `g:Edge`, `g:VertexProperty`, `g:Property`, `g:Path`
//! - **Traversal**: `g:Traverser`, `g:Binding`, `g:P`, `g:Lambda`, `g:Bytecode`
//!   and enum constants such as `g:Order` or `g:T`
//! - **Geo**: `dse:Point`, `dse:LineString`, `dse:Polygon`, `dse:Distance`
//!
//! Null, booleans, strings, lists and maps are plain JSON.

pub mod bytecode;
pub mod decoder;
pub mod duration;
pub mod encoder;
pub mod error;
pub mod geometry;
pub mod predicate;
pub mod registry;
pub mod structures;
pub mod tag;
pub mod types;

pub use bytecode::{Bytecode, Instruction};
pub use decoder::GraphSONReader;
pub use duration::Duration;
pub use encoder::{GraphSONWriter, DEFAULT_MAX_DEPTH};
pub use error::{GraphSONError, GraphSONResult};
pub use geometry::{Distance, LineString, Point, Polygon};
pub use predicate::{Geo, Predicate, Search, TextDistanceP, P};
pub use registry::{DecodeFn, EncodeFn, Registry, TypeKey};
pub use structures::{
    Binding, Edge, EnumConstant, EnumKind, Lambda, Path, Property, Traverser, Vertex,
    VertexProperty,
};
pub use types::{Capability, Value, ValueKind, ValueMap};

/// Encode a value with the global registry.
pub fn write_object(value: &Value) -> GraphSONResult<String> {
    GraphSONWriter::new().write_object(value)
}

/// Encode a traversal program with the global registry.
pub fn write_bytecode(bytecode: &Bytecode) -> GraphSONResult<String> {
    GraphSONWriter::new().write_bytecode(bytecode)
}

/// Decode GraphSON text with the global registry.
pub fn read_object(text: &str) -> GraphSONResult<Value> {
    GraphSONReader::new().read_object(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::BigDecimal;
    use chrono::{TimeZone, Utc};
    use num_bigint::BigInt;
    use serde_json::Value as JsonValue;
    use std::str::FromStr;

    fn roundtrip(value: impl Into<Value>) -> (Value, Value) {
        let value = value.into();
        let text = write_object(&value).unwrap();
        let decoded = read_object(&text).unwrap();
        (value, decoded)
    }

    fn assert_roundtrip(value: impl Into<Value>) {
        let (value, decoded) = roundtrip(value);
        assert_eq!(value, decoded);
    }

    #[test]
    fn test_roundtrip_scalars() {
        assert_roundtrip(Value::Null);
        assert_roundtrip(true);
        assert_roundtrip(false);
        assert_roundtrip("marko");
        assert_roundtrip(uuid::Uuid::from_str("41d2e28a-20a4-4ab0-b379-d810dede3786").unwrap());
        assert_roundtrip(Utc.with_ymd_and_hms(2016, 12, 14, 16, 39, 19).unwrap());
        assert_roundtrip("::1".parse::<std::net::IpAddr>().unwrap());
        assert_roundtrip(vec![0u8, 1, 2, 254, 255]);
        assert_roundtrip(Vec::<u8>::new());
    }

    #[test]
    fn test_roundtrip_integers() {
        for v in [0i64, 42, -1, i32::MAX as i64, i32::MIN as i64, 2_147_483_648, i64::MAX, i64::MIN] {
            assert_roundtrip(v);
        }
        assert_roundtrip(-7i16);
        assert_roundtrip(Value::Int64(3));
        assert_roundtrip(BigInt::from_str("-98765432109876543210987654321").unwrap());
    }

    #[test]
    fn test_roundtrip_decimals() {
        for text in ["0", "3.14159265358979323846264338327950288", "-1e-30", "12345678901234567890.5"] {
            assert_roundtrip(BigDecimal::from_str(text).unwrap());
        }
    }

    #[test]
    fn test_roundtrip_floats() {
        for v in [0.0f64, 1.5, -2.25, 3.14159, f64::MAX, f64::MIN_POSITIVE] {
            let (_, decoded) = roundtrip(v);
            let back = decoded.as_f64().unwrap();
            assert!((back - v).abs() <= f64::EPSILON * v.abs().max(1.0));
        }
        let (_, decoded) = roundtrip(0.1f32);
        assert_eq!(decoded, Value::Float(0.1));

        let (_, decoded) = roundtrip(f64::NAN);
        assert!(matches!(decoded, Value::Double(f) if f.is_nan()));
        assert_roundtrip(f64::INFINITY);
        assert_roundtrip(f32::NEG_INFINITY);
    }

    #[test]
    fn test_roundtrip_durations() {
        let two_days_three_hours = Duration::new(0, 2, 3 * 3600, 0);
        let (_, decoded) = roundtrip(two_days_three_hours);
        assert_eq!(decoded.as_duration(), Some(two_days_three_hours));
        assert_eq!(
            decoded.as_duration().and_then(|d| d.to_chrono()),
            Some(chrono::Duration::days(2) + chrono::Duration::hours(3))
        );

        assert_roundtrip(Duration::from_months(14));
        assert_roundtrip(Duration::new(0, 0, 1, 5));
        assert_roundtrip(Duration::default());
    }

    #[test]
    fn test_roundtrip_geometry() {
        assert_roundtrip(Point::new(-92.5, 44.25));
        assert_roundtrip(LineString::new(vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0)]));
        assert_roundtrip(Polygon::new(
            vec![
                Point::new(0.0, 0.0),
                Point::new(4.0, 0.0),
                Point::new(4.0, 4.0),
                Point::new(0.0, 0.0),
            ],
            vec![vec![
                Point::new(1.0, 1.0),
                Point::new(2.0, 1.0),
                Point::new(2.0, 2.0),
                Point::new(1.0, 1.0),
            ]],
        ));
        assert_roundtrip(Distance::new(1.0, 2.0, 0.5));
    }

    #[test]
    fn test_roundtrip_graph_records() {
        let vertex = Vertex::new(1i32, "person").with_properties(vec![
            VertexProperty::new(100i64, "age", 29i32),
            VertexProperty::new(101i64, "name", "marko")
                .with_properties(vec![Property::new("acl", "public")]),
            VertexProperty::new(102i64, "name", "mark"),
        ]);
        assert_roundtrip(vertex);

        assert_roundtrip(VertexProperty::new(5i64, "name", "josh"));
        assert_roundtrip(Property::new("weight", 0.5f64));
        assert_roundtrip(Path::new(
            vec![vec!["a".to_string()], vec![], vec!["c".to_string(), "d".to_string()]],
            vec![Value::from(1i32), Value::from("two"), Value::from(3.0f64)],
        ));

        // endpoints lose their labels on the way back
        let edge = Edge::new(
            13i32,
            "develops",
            Vertex::new(1i32, "person"),
            Vertex::new(10i32, "software"),
        )
        .with_properties(vec![Property::new("since", 2009i32)]);
        let (_, decoded) = roundtrip(edge);
        let expected = Edge::new(13i32, "develops", Vertex::new(1i32, ""), Vertex::new(10i32, ""))
            .with_properties(vec![Property::new("since", 2009i32)]);
        assert_eq!(decoded, Value::Edge(expected));
    }

    #[test]
    fn test_roundtrip_unsorted_record_properties() {
        let vertex = Vertex::new(1i32, "person").with_properties(vec![
            VertexProperty::new(101i64, "name", "marko")
                .with_properties(vec![Property::new("z", 1i32), Property::new("a", 2i32)]),
            VertexProperty::new(100i64, "age", 29i32),
            VertexProperty::new(102i64, "name", "mark"),
        ]);
        assert_roundtrip(vertex);

        assert_roundtrip(
            VertexProperty::new(5i64, "name", "josh")
                .with_properties(vec![Property::new("z", 1i32), Property::new("a", 2i32)]),
        );

        let edge = Edge::new(13i32, "develops", Vertex::new(1i32, ""), Vertex::new(10i32, ""))
            .with_properties(vec![Property::new("weight", 0.5f64), Property::new("since", 2009i32)]);
        assert_roundtrip(edge);
    }

    #[test]
    fn test_roundtrip_traversal_values() {
        assert_roundtrip(Traverser::new(Vertex::new(1i32, "person"), 2));
        assert_roundtrip(Traverser::new("x", 5_000_000_000));
        assert_roundtrip(Binding::new("name", "marko"));
        assert_roundtrip(Lambda::new("it.get().value('name')", -1));
        for kind in EnumKind::ALL {
            assert_roundtrip(EnumConstant::new(kind, "x"));
        }
        assert_roundtrip(P::eq("marko"));
        assert_roundtrip(P::inside(1i32, 10i32));
        assert_roundtrip(P::outside(1i32, 10i32));
        assert_roundtrip(P::without(["a", "b"]));
        assert_roundtrip(Search::token_regex("ma.*"));
        assert_roundtrip(Search::fuzzy("marko", 1));
        assert_roundtrip(Search::token_fuzzy("marko", 2));
        assert_roundtrip(Search::phrase("marko rodriguez", 3));
        assert_roundtrip(Geo::inside(Distance::new(-92.0, 44.0, 2.0)));
    }

    #[test]
    fn test_roundtrip_containers() {
        let mut inner = ValueMap::new();
        inner.insert("items", vec![Value::from(1i32), Value::from(2i32)]);
        inner.insert(7i32, "seven");
        inner.insert(Point::new(1.0, 2.0), Value::Null);

        assert_roundtrip(vec![
            Value::Map(inner.clone()),
            Value::Map(inner),
            Value::List(Vec::new()),
        ]);
        assert_roundtrip(ValueMap::new());
    }

    #[test]
    fn test_tag_stability() {
        let values: Vec<Value> = vec![
            42i32.into(),
            2_147_483_648i64.into(),
            Duration::from_days(1).into(),
            Point::new(1.0, 2.0).into(),
            Search::fuzzy("a", 1).into(),
        ];
        for value in values {
            let first = GraphSONWriter::new().to_json(&value).unwrap();
            for _ in 0..3 {
                let again = GraphSONWriter::new().to_json(&value).unwrap();
                assert_eq!(first[tag::TYPE_KEY], again[tag::TYPE_KEY]);
                assert_eq!(first, again);
            }
        }
    }

    #[test]
    fn test_boolean_never_tagged() {
        for b in [true, false] {
            let text = write_object(&Value::Boolean(b)).unwrap();
            assert_eq!(text, b.to_string());
        }
        let text = write_object(&Value::List(vec![true.into(), 1i32.into()])).unwrap();
        assert_eq!(text, r#"[true,{"@type":"g:Int32","@value":1}]"#);
    }

    #[test]
    fn test_magnitude_based_tagging() {
        assert_eq!(
            write_object(&Value::from(2_147_483_648i64)).unwrap(),
            r#"{"@type":"g:Int64","@value":2147483648}"#
        );
        assert_eq!(
            write_object(&Value::from(42i64)).unwrap(),
            r#"{"@type":"g:Int32","@value":42}"#
        );
    }

    #[test]
    fn test_unknown_tag_rejected() {
        let err = read_object(r#"{"@type":"g:Bogus","@value":1}"#).unwrap_err();
        assert!(matches!(err, GraphSONError::UnknownTag(_)));
    }

    #[test]
    fn test_instruction_order_preserved() {
        let bytecode = Bytecode::new()
            .with_source("withSack", [1i32])
            .with_source("withBulk", [false])
            .with_step("V", Vec::<Value>::new())
            .with_step("has", ["person", "name", "marko"])
            .with_step("out", ["knows"])
            .with_step("values", ["name"]);

        let text = write_bytecode(&bytecode).unwrap();
        let json: JsonValue = serde_json::from_str(&text).unwrap();
        let payload = &json[tag::VALUE_KEY];
        assert_eq!(payload["source"].as_array().unwrap().len(), 2);
        assert_eq!(payload["step"].as_array().unwrap().len(), 4);
        let ops: Vec<&str> = payload["step"]
            .as_array()
            .unwrap()
            .iter()
            .map(|i| i[0].as_str().unwrap())
            .collect();
        assert_eq!(ops, ["V", "has", "out", "values"]);

        let decoded = read_object(&text).unwrap();
        assert_eq!(decoded, Value::Bytecode(bytecode));
    }

    #[test]
    fn test_empty_segments_omitted() {
        let only_steps = Bytecode::new().with_step("V", Vec::<Value>::new());
        let json: JsonValue = serde_json::from_str(&write_bytecode(&only_steps).unwrap()).unwrap();
        assert!(json[tag::VALUE_KEY].get("source").is_none());
        assert!(json[tag::VALUE_KEY].get("step").is_some());

        let only_sources = Bytecode::new().with_source("withComputer", Vec::<Value>::new());
        let json: JsonValue =
            serde_json::from_str(&write_bytecode(&only_sources).unwrap()).unwrap();
        assert!(json[tag::VALUE_KEY].get("step").is_none());
        assert!(json[tag::VALUE_KEY].get("source").is_some());
    }

    #[test]
    fn test_has_scenario() {
        let bytecode = Bytecode::new().with_step("has", ["person", "name", "marko"]);
        let text = write_bytecode(&bytecode).unwrap();
        assert!(!text.contains("\"source\""));

        let json: JsonValue = serde_json::from_str(&text).unwrap();
        assert_eq!(
            json[tag::VALUE_KEY]["step"],
            serde_json::json!([["has", "person", "name", "marko"]])
        );
    }

    #[test]
    fn test_nested_traversal_argument() {
        let anonymous = Bytecode::new().with_step("out", ["knows"]);
        let bytecode = Bytecode::new()
            .with_step("V", Vec::<Value>::new())
            .with_step("where", [Value::Bytecode(anonymous)])
            .with_step("order", Vec::<Value>::new())
            .with_step("by", [
                Value::from("age"),
                Value::Enum(EnumConstant::new(EnumKind::Order, "desc")),
            ]);
        let decoded = read_object(&write_bytecode(&bytecode).unwrap()).unwrap();
        assert_eq!(decoded, Value::Bytecode(bytecode));
    }

    #[test]
    fn test_encode_errors_surface() {
        let t = Utc.timestamp_opt(0, 1).unwrap();
        let nested = Value::List(vec![Value::from(1i32), Value::Instant(t)]);
        let err = write_object(&nested).unwrap_err();
        assert!(err.is_encode_error());
        assert!(err.to_string().contains("Instant"));
    }
}
