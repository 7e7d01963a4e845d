//! Geospatial shapes and their WKT text form.
//!
//! # Supported Shapes
//!
//! - **Point**: `POINT (x y)`
//! - **LineString**: `LINESTRING (x y, x y, ...)` or `LINESTRING EMPTY`
//! - **Polygon**: `POLYGON ((x y, ...), (x y, ...))` or `POLYGON EMPTY`,
//!   first ring is the exterior, the rest are holes
//! - **Distance**: `DISTANCE((x y) r)`, a circle used by geo search predicates

use std::fmt;
use std::str::FromStr;

use super::error::GraphSONError;

/// A 2D point.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    /// X coordinate (longitude)
    pub x: f64,
    /// Y coordinate (latitude)
    pub y: f64,
}

impl Point {
    /// Create a new point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Format as WKT.
    pub fn to_wkt(&self) -> String {
        format!("POINT ({} {})", self.x, self.y)
    }

    /// Parse from WKT.
    pub fn from_wkt(text: &str) -> Result<Self, GraphSONError> {
        let mut parser = WktParser::new(text);
        parser.keyword("POINT")?;
        let point = parser.coordinate_list()?;
        parser.finish()?;
        match point.as_slice() {
            [p] => Ok(*p),
            _ => Err(GraphSONError::geometry(format!(
                "POINT requires exactly one coordinate: {:?}",
                text
            ))),
        }
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

/// A sequence of connected points.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LineString {
    /// Points in order
    pub points: Vec<Point>,
}

impl LineString {
    /// Create a new line string.
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    /// Check if the line string has no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Format as WKT.
    pub fn to_wkt(&self) -> String {
        if self.points.is_empty() {
            return "LINESTRING EMPTY".to_string();
        }
        format!("LINESTRING ({})", format_ring(&self.points))
    }

    /// Parse from WKT.
    pub fn from_wkt(text: &str) -> Result<Self, GraphSONError> {
        let mut parser = WktParser::new(text);
        parser.keyword("LINESTRING")?;
        if parser.try_keyword("EMPTY") {
            parser.finish()?;
            return Ok(Self::default());
        }
        let points = parser.coordinate_list()?;
        parser.finish()?;
        Ok(Self::new(points))
    }
}

/// A polygon with an exterior ring and optional holes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Polygon {
    /// Exterior ring
    pub exterior: Vec<Point>,
    /// Interior rings (holes)
    pub interiors: Vec<Vec<Point>>,
}

impl Polygon {
    /// Create a new polygon.
    pub fn new(exterior: Vec<Point>, interiors: Vec<Vec<Point>>) -> Self {
        Self {
            exterior,
            interiors,
        }
    }

    /// Check if the polygon has no exterior ring.
    pub fn is_empty(&self) -> bool {
        self.exterior.is_empty()
    }

    /// Format as WKT.
    pub fn to_wkt(&self) -> String {
        if self.exterior.is_empty() {
            return "POLYGON EMPTY".to_string();
        }
        let rings: Vec<String> = std::iter::once(&self.exterior)
            .chain(self.interiors.iter())
            .map(|ring| format!("({})", format_ring(ring)))
            .collect();
        format!("POLYGON ({})", rings.join(", "))
    }

    /// Parse from WKT.
    pub fn from_wkt(text: &str) -> Result<Self, GraphSONError> {
        let mut parser = WktParser::new(text);
        parser.keyword("POLYGON")?;
        if parser.try_keyword("EMPTY") {
            parser.finish()?;
            return Ok(Self::default());
        }
        parser.expect('(')?;
        let mut rings = vec![parser.coordinate_list()?];
        while parser.try_char(',') {
            rings.push(parser.coordinate_list()?);
        }
        parser.expect(')')?;
        parser.finish()?;

        let exterior = rings.remove(0);
        Ok(Self::new(exterior, rings))
    }
}

/// A circle: a center point and a radius.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Distance {
    /// Center X coordinate
    pub x: f64,
    /// Center Y coordinate
    pub y: f64,
    /// Radius
    pub radius: f64,
}

impl Distance {
    /// Create a new distance.
    pub fn new(x: f64, y: f64, radius: f64) -> Self {
        Self { x, y, radius }
    }

    /// Center point.
    pub fn center(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Format as WKT-style text.
    pub fn to_wkt(&self) -> String {
        format!("DISTANCE(({} {}) {})", self.x, self.y, self.radius)
    }

    /// Parse from WKT-style text.
    pub fn from_wkt(text: &str) -> Result<Self, GraphSONError> {
        let mut parser = WktParser::new(text);
        parser.keyword("DISTANCE")?;
        parser.expect('(')?;
        let center = parser.coordinate_list()?;
        let radius = parser.number()?;
        parser.expect(')')?;
        parser.finish()?;
        match center.as_slice() {
            [p] => Ok(Self::new(p.x, p.y, radius)),
            _ => Err(GraphSONError::geometry(format!(
                "DISTANCE requires exactly one center coordinate: {:?}",
                text
            ))),
        }
    }
}

fn format_ring(points: &[Point]) -> String {
    points
        .iter()
        .map(|p| format!("{} {}", p.x, p.y))
        .collect::<Vec<_>>()
        .join(", ")
}

macro_rules! wkt_text_impls {
    ($($ty:ident),+) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(&self.to_wkt())
                }
            }

            impl FromStr for $ty {
                type Err = GraphSONError;

                fn from_str(s: &str) -> Result<Self, Self::Err> {
                    Self::from_wkt(s)
                }
            }
        )+
    };
}

wkt_text_impls!(Point, LineString, Polygon, Distance);

// ============================================================================
// WKT parser
// ============================================================================

/// Minimal cursor over WKT text.
struct WktParser<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> WktParser<'a> {
    fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    fn error(&self, expected: &str) -> GraphSONError {
        GraphSONError::geometry(format!(
            "expected {} at offset {} in {:?}",
            expected, self.pos, self.text
        ))
    }

    fn rest(&self) -> &'a str {
        &self.text[self.pos..]
    }

    fn skip_ws(&mut self) {
        let rest = self.rest();
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn try_keyword(&mut self, word: &str) -> bool {
        self.skip_ws();
        let rest = self.rest();
        let (head, tail) = match (rest.get(..word.len()), rest.get(word.len()..)) {
            (Some(head), Some(tail)) => (head, tail),
            _ => return false,
        };
        if head.eq_ignore_ascii_case(word)
            && tail.chars().next().map_or(true, |c| !c.is_ascii_alphanumeric())
        {
            self.pos += word.len();
            return true;
        }
        false
    }

    fn keyword(&mut self, word: &str) -> Result<(), GraphSONError> {
        if self.try_keyword(word) {
            Ok(())
        } else {
            Err(self.error(word))
        }
    }

    fn try_char(&mut self, c: char) -> bool {
        self.skip_ws();
        if self.rest().starts_with(c) {
            self.pos += c.len_utf8();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, c: char) -> Result<(), GraphSONError> {
        if self.try_char(c) {
            Ok(())
        } else {
            Err(self.error(&format!("'{}'", c)))
        }
    }

    /// Decimal or exponent form, plus `NaN`, `inf` and `-inf` as written by `f64` display.
    fn number(&mut self) -> Result<f64, GraphSONError> {
        self.skip_ws();
        let rest = self.rest();
        let len = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '+' | '.')))
            .unwrap_or(rest.len());
        let value = rest[..len]
            .parse::<f64>()
            .map_err(|_| self.error("number"))?;
        self.pos += len;
        Ok(value)
    }

    /// `(x y, x y, ...)`
    fn coordinate_list(&mut self) -> Result<Vec<Point>, GraphSONError> {
        self.expect('(')?;
        let mut points = Vec::new();
        loop {
            let x = self.number()?;
            let y = self.number()?;
            points.push(Point::new(x, y));
            if !self.try_char(',') {
                break;
            }
        }
        self.expect(')')?;
        Ok(points)
    }

    fn finish(&mut self) -> Result<(), GraphSONError> {
        self.skip_ws();
        if self.rest().is_empty() {
            Ok(())
        } else {
            Err(self.error("end of input"))
        }
    }
}
