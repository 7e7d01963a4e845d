//! Filter predicates.
//!
//! Two families exist. [`P`] carries an operator with one or two plain operands
//! (`eq(1)`, `between(1, 10)`). [`TextDistanceP`] carries an operator with a text
//! operand and a mandatory distance (`fuzzy("marko", 1)`). Both encode under
//! `g:P` as `{"predicate": op, "value": operand}` where a two-operand value is a
//! two-element array.

use std::fmt;

use super::geometry::Distance;
use super::types::Value;

/// Operators that always carry a text operand and a distance.
pub const TEXT_DISTANCE_OPERATORS: [&str; 3] = ["fuzzy", "tokenFuzzy", "phrase"];

/// Operators that take two operands.
pub const RANGE_OPERATORS: [&str; 3] = ["between", "inside", "outside"];

/// A simple value predicate.
#[derive(Debug, Clone, PartialEq)]
pub struct P {
    /// Operator name
    pub operator: String,
    /// First operand
    pub value: Box<Value>,
    /// Second operand for range predicates
    pub other: Option<Box<Value>>,
}

impl P {
    /// Create a single-operand predicate.
    pub fn new(operator: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            operator: operator.into(),
            value: Box::new(value.into()),
            other: None,
        }
    }

    /// Create a two-operand predicate.
    ///
    /// Only the [`RANGE_OPERATORS`] have a two-operand wire form; the encoder
    /// rejects any other operator built this way.
    pub fn with_other(
        operator: impl Into<String>,
        value: impl Into<Value>,
        other: impl Into<Value>,
    ) -> Self {
        Self {
            operator: operator.into(),
            value: Box::new(value.into()),
            other: Some(Box::new(other.into())),
        }
    }

    /// Equal to.
    pub fn eq(value: impl Into<Value>) -> Self {
        Self::new("eq", value)
    }

    /// Not equal to.
    pub fn neq(value: impl Into<Value>) -> Self {
        Self::new("neq", value)
    }

    /// Less than.
    pub fn lt(value: impl Into<Value>) -> Self {
        Self::new("lt", value)
    }

    /// Less than or equal to.
    pub fn lte(value: impl Into<Value>) -> Self {
        Self::new("lte", value)
    }

    /// Greater than.
    pub fn gt(value: impl Into<Value>) -> Self {
        Self::new("gt", value)
    }

    /// Greater than or equal to.
    pub fn gte(value: impl Into<Value>) -> Self {
        Self::new("gte", value)
    }

    /// Strictly between the bounds.
    pub fn inside(low: impl Into<Value>, high: impl Into<Value>) -> Self {
        Self::with_other("inside", low, high)
    }

    /// Outside the bounds.
    pub fn outside(low: impl Into<Value>, high: impl Into<Value>) -> Self {
        Self::with_other("outside", low, high)
    }

    /// Within `[low, high)`.
    pub fn between(low: impl Into<Value>, high: impl Into<Value>) -> Self {
        Self::with_other("between", low, high)
    }

    /// Member of the given values.
    pub fn within<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::new("within", Value::List(values.into_iter().map(Into::into).collect()))
    }

    /// Not a member of the given values.
    pub fn without<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::new("without", Value::List(values.into_iter().map(Into::into).collect()))
    }
}

/// A text predicate with a distance (edit distance or word proximity).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextDistanceP {
    /// Operator name
    pub operator: String,
    /// Text operand
    pub value: String,
    /// Distance operand
    pub distance: i64,
}

impl TextDistanceP {
    /// Create a new text-distance predicate.
    pub fn new(operator: impl Into<String>, value: impl Into<String>, distance: i64) -> Self {
        Self {
            operator: operator.into(),
            value: value.into(),
            distance,
        }
    }
}

/// Any predicate that can appear as a step argument.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Simple value predicate
    Value(P),
    /// Text predicate with a distance
    TextDistance(TextDistanceP),
}

impl Predicate {
    /// Operator name.
    pub fn operator(&self) -> &str {
        match self {
            Predicate::Value(p) => &p.operator,
            Predicate::TextDistance(p) => &p.operator,
        }
    }
}

impl From<P> for Predicate {
    fn from(p: P) -> Self {
        Predicate::Value(p)
    }
}

impl From<TextDistanceP> for Predicate {
    fn from(p: TextDistanceP) -> Self {
        Predicate::TextDistance(p)
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Value(p) => match &p.other {
                Some(other) => write!(f, "{}({}, {})", p.operator, p.value, other),
                None => write!(f, "{}({})", p.operator, p.value),
            },
            Predicate::TextDistance(p) => write!(f, "{}({:?}, {})", p.operator, p.value, p.distance),
        }
    }
}

/// Text search predicates.
pub struct Search;

impl Search {
    /// Any token of the text equals the value.
    pub fn token(value: impl Into<String>) -> P {
        P::new("token", value.into())
    }

    /// Any token of the text starts with the value.
    pub fn token_prefix(value: impl Into<String>) -> P {
        P::new("tokenPrefix", value.into())
    }

    /// Any token of the text matches the regular expression.
    pub fn token_regex(value: impl Into<String>) -> P {
        P::new("tokenRegex", value.into())
    }

    /// The whole text starts with the value.
    pub fn prefix(value: impl Into<String>) -> P {
        P::new("prefix", value.into())
    }

    /// The whole text matches the regular expression.
    pub fn regex(value: impl Into<String>) -> P {
        P::new("regex", value.into())
    }

    /// The whole text is within an edit distance of the value.
    pub fn fuzzy(value: impl Into<String>, distance: i64) -> TextDistanceP {
        TextDistanceP::new("fuzzy", value, distance)
    }

    /// Any token is within an edit distance of the value.
    pub fn token_fuzzy(value: impl Into<String>, distance: i64) -> TextDistanceP {
        TextDistanceP::new("tokenFuzzy", value, distance)
    }

    /// The words of the value appear within the given proximity.
    pub fn phrase(value: impl Into<String>, proximity: i64) -> TextDistanceP {
        TextDistanceP::new("phrase", value, proximity)
    }
}

/// Geospatial search predicates.
pub struct Geo;

impl Geo {
    /// The geometry lies inside the circle.
    pub fn inside(value: Distance) -> P {
        P::new("inside", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fuzzy_equality() {
        assert_eq!(Search::fuzzy("a", 1), Search::fuzzy("a", 1));
        assert_ne!(Search::fuzzy("a", 1), Search::fuzzy("a", 2));
        assert_ne!(Search::fuzzy("a", 1), Search::token_fuzzy("a", 1));
        assert_ne!(Search::fuzzy("a", 1), Search::fuzzy("b", 1));
    }

    #[test]
    fn test_value_predicates() {
        assert_eq!(P::eq(1i32), P::eq(1i32));
        assert_ne!(P::eq(1i32), P::neq(1i32));

        let range = P::between(1i32, 10i32);
        assert_eq!(range.operator, "between");
        assert_eq!(range.other.as_deref(), Some(&Value::Int32(10)));

        let within = P::within(["a", "b"]);
        assert_eq!(
            *within.value,
            Value::List(vec![Value::from("a"), Value::from("b")])
        );
    }

    #[test]
    fn test_search_operators() {
        assert_eq!(Search::token("x").operator, "token");
        assert_eq!(Search::token_prefix("x").operator, "tokenPrefix");
        assert_eq!(Search::token_regex("x").operator, "tokenRegex");
        assert_eq!(Search::prefix("x").operator, "prefix");
        assert_eq!(Search::regex("x").operator, "regex");
        assert_eq!(Search::phrase("a b", 2).operator, "phrase");
    }

    #[test]
    fn test_geo_inside() {
        let p = Geo::inside(Distance::new(1.0, 2.0, 3.0));
        assert_eq!(p.operator, "inside");
        assert!(p.other.is_none());
        assert_eq!(*p.value, Value::Distance(Distance::new(1.0, 2.0, 3.0)));
    }

    #[test]
    fn test_display() {
        assert_eq!(Predicate::from(P::between(1i32, 5i32)).to_string(), "between(1, 5)");
        assert_eq!(
            Predicate::from(Search::fuzzy("marko", 1)).to_string(),
            "fuzzy(\"marko\", 1)"
        );
    }
}
