//! Planar geometry types for title boundaries
//!
//! The warehouse hands geometry over as text. Three encodings are accepted:
//!
//! - PostgreSQL native: `((x1,y1),(x2,y2),...)` and `(x,y)`
//! - WKT / EWKT: `POLYGON((x1 y1, x2 y2, ...))` and `POINT(x y)`
//! - GeoJSON: `{"type":"Polygon","coordinates":[[[x,y],...]]}`
//!
//! Parsed values render back to the PostgreSQL native form, which is what the
//! target's `polygon` and `point` columns accept.

use super::errors::GeometryError;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// A 2D point (`x` is longitude, `y` is latitude)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Creates a point, rejecting non-finite coordinates
    pub fn new(x: f64, y: f64) -> Result<Self, GeometryError> {
        if !x.is_finite() {
            return Err(GeometryError::InvalidCoordinate(x.to_string()));
        }
        if !y.is_finite() {
            return Err(GeometryError::InvalidCoordinate(y.to_string()));
        }
        Ok(Self { x, y })
    }

    pub fn longitude(&self) -> f64 {
        self.x
    }

    pub fn latitude(&self) -> f64 {
        self.y
    }

    /// Parses a point from any supported encoding
    pub fn parse(input: &str) -> Result<Self, GeometryError> {
        let text = strip_srid(input.trim());

        if text.starts_with('{') {
            let coords = geojson_coordinates(text, "Point")?;
            return point_from_json(&coords);
        }

        if let Some(body) = strip_keyword(text, "POINT") {
            let inner = body
                .trim()
                .strip_prefix('(')
                .and_then(|s| s.strip_suffix(')'))
                .ok_or_else(|| unrecognized("point", input))?;
            let mut parts = inner.split_whitespace();
            let (Some(x), Some(y), None) = (parts.next(), parts.next(), parts.next()) else {
                return Err(unrecognized("point", input));
            };
            return Point::new(parse_coordinate(x)?, parse_coordinate(y)?);
        }

        let numbers = native_numbers(text)?;
        match numbers.as_slice() {
            [x, y] => Point::new(*x, *y),
            _ => Err(unrecognized("point", input)),
        }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

impl FromStr for Point {
    type Err = GeometryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// A closed polygon ring
///
/// The ring is stored without a repeated closing vertex; closure is implied.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    points: Vec<Point>,
}

impl Polygon {
    /// Builds a polygon from ring vertices
    ///
    /// A trailing vertex equal to the first one is dropped. At least three
    /// distinct vertices are required.
    pub fn new(mut points: Vec<Point>) -> Result<Self, GeometryError> {
        if points.len() > 1 && points.first() == points.last() {
            points.pop();
        }

        let mut keys: Vec<(u64, u64)> = points
            .iter()
            .map(|p| (p.x.to_bits(), p.y.to_bits()))
            .collect();
        keys.sort_unstable();
        keys.dedup();
        if keys.len() < 3 {
            return Err(GeometryError::TooFewVertices(keys.len()));
        }

        Ok(Self { points })
    }

    /// Ring vertices, without the closing vertex
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Parses a polygon from any supported encoding
    pub fn parse(input: &str) -> Result<Self, GeometryError> {
        let text = strip_srid(input.trim());

        if text.starts_with('{') {
            let coords = geojson_coordinates(text, "Polygon")?;
            let outer = coords
                .as_array()
                .and_then(|rings| rings.first())
                .and_then(Value::as_array)
                .ok_or_else(|| unrecognized("polygon", input))?;
            let points = outer
                .iter()
                .map(point_from_json)
                .collect::<Result<Vec<_>, _>>()?;
            return Polygon::new(points);
        }

        if let Some(body) = strip_keyword(text, "POLYGON") {
            let body = body.trim();
            let outer = body
                .strip_prefix('(')
                .map(str::trim_start)
                .and_then(|s| s.strip_prefix('('))
                .and_then(|s| s.split(')').next())
                .ok_or_else(|| unrecognized("polygon", input))?;
            let points = outer
                .split(',')
                .map(|pair| {
                    let mut parts = pair.split_whitespace();
                    match (parts.next(), parts.next(), parts.next()) {
                        (Some(x), Some(y), None) => {
                            Point::new(parse_coordinate(x)?, parse_coordinate(y)?)
                        }
                        _ => Err(unrecognized("polygon", input)),
                    }
                })
                .collect::<Result<Vec<_>, _>>()?;
            return Polygon::new(points);
        }

        let numbers = native_numbers(text)?;
        if numbers.is_empty() || numbers.len() % 2 != 0 {
            return Err(unrecognized("polygon", input));
        }
        let points = numbers
            .chunks_exact(2)
            .map(|pair| Point::new(pair[0], pair[1]))
            .collect::<Result<Vec<_>, _>>()?;
        Polygon::new(points)
    }
}

impl fmt::Display for Polygon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, point) in self.points.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{point}")?;
        }
        write!(f, ")")
    }
}

impl FromStr for Polygon {
    type Err = GeometryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn unrecognized(kind: &'static str, input: &str) -> GeometryError {
    let mut shown: String = input.chars().take(80).collect();
    if input.chars().count() > 80 {
        shown.push_str("...");
    }
    GeometryError::Unrecognized { kind, input: shown }
}

fn parse_coordinate(raw: &str) -> Result<f64, GeometryError> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| GeometryError::InvalidCoordinate(raw.trim().to_string()))?;
    if !value.is_finite() {
        return Err(GeometryError::InvalidCoordinate(raw.trim().to_string()));
    }
    Ok(value)
}

/// EWKT carries an `SRID=nnnn;` prefix
fn strip_srid(text: &str) -> &str {
    if text.get(..5).is_some_and(|head| head.eq_ignore_ascii_case("SRID=")) {
        if let Some((_, rest)) = text.split_once(';') {
            return rest.trim_start();
        }
    }
    text
}

fn strip_keyword<'a>(text: &'a str, keyword: &str) -> Option<&'a str> {
    let head = text.get(..keyword.len())?;
    if head.eq_ignore_ascii_case(keyword) {
        Some(&text[keyword.len()..])
    } else {
        None
    }
}

/// Flattens the PostgreSQL native forms into a list of numbers
fn native_numbers(text: &str) -> Result<Vec<f64>, GeometryError> {
    let cleaned: String = text.chars().filter(|c| *c != '(' && *c != ')').collect();
    if cleaned.trim().is_empty() {
        return Ok(Vec::new());
    }
    cleaned.split(',').map(parse_coordinate).collect()
}

fn geojson_coordinates(text: &str, expected: &'static str) -> Result<Value, GeometryError> {
    let kind = if expected == "Point" { "point" } else { "polygon" };
    let value: Value = serde_json::from_str(text).map_err(|_| unrecognized(kind, text))?;
    let actual = value.get("type").and_then(Value::as_str);
    if actual != Some(expected) {
        return Err(unrecognized(kind, text));
    }
    value
        .get("coordinates")
        .cloned()
        .ok_or_else(|| unrecognized(kind, text))
}

fn point_from_json(value: &Value) -> Result<Point, GeometryError> {
    let pair = value
        .as_array()
        .filter(|a| a.len() >= 2)
        .ok_or_else(|| GeometryError::InvalidCoordinate(value.to_string()))?;
    let x = pair[0]
        .as_f64()
        .ok_or_else(|| GeometryError::InvalidCoordinate(pair[0].to_string()))?;
    let y = pair[1]
        .as_f64()
        .ok_or_else(|| GeometryError::InvalidCoordinate(pair[1].to_string()))?;
    Point::new(x, y)
}
