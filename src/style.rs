//! Static style vocabulary: the "disabled" sentinel shared by line and
//! marker styles, dash patterns and marker glyphs.

use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{char, multispace0},
    combinator::{all_consuming, map, value},
    multi::separated_list1,
    number::complete::double,
    sequence::{delimited, separated_pair},
    IResult,
};
use serde::Serialize;

/// Canonicalize a line-style or marker attribute.
///
/// Absent, empty, whitespace-only and `none` (any case) all collapse to the
/// single disabled state `None`; anything else is returned trimmed.
pub fn enabled_token(raw: Option<&str>) -> Option<&str> {
    let token = raw?.trim();
    if token.is_empty() || token.eq_ignore_ascii_case("none") {
        None
    } else {
        Some(token)
    }
}

/// Stroke dash pattern; an empty list draws a solid stroke
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashArray(pub Vec<f64>);

impl DashArray {
    pub fn solid() -> Self {
        DashArray(Vec::new())
    }

    pub fn is_solid(&self) -> bool {
        self.0.is_empty()
    }

    /// CSS `stroke-dasharray` value
    pub fn css(&self) -> String {
        if self.is_solid() {
            return "none".to_string();
        }
        self.0
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(",")
    }
}

fn ws<'a, F, O>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    delimited(multispace0, inner, multispace0)
}

fn named_linestyle(input: &str) -> IResult<&str, DashArray> {
    alt((
        value(DashArray(vec![6.0, 6.0]), alt((tag("--"), tag("dashed")))),
        value(DashArray(vec![4.0, 4.0, 2.0, 4.0]), alt((tag("-."), tag("dashdot")))),
        value(DashArray(vec![2.0, 2.0]), alt((tag(":"), tag("dotted")))),
        value(DashArray::solid(), alt((tag("-"), tag("solid")))),
    ))(input)
}

/// `(offset, (on, off, ...))`; the offset is accepted and dropped
fn dash_tuple(input: &str) -> IResult<&str, DashArray> {
    let seq = delimited(
        ws(char('(')),
        separated_list1(ws(char(',')), ws(double)),
        ws(char(')')),
    );
    map(
        delimited(
            ws(char('(')),
            separated_pair(ws(double), ws(char(',')), seq),
            ws(char(')')),
        ),
        |(_offset, on_off)| DashArray(on_off),
    )(input)
}

/// Bare on/off list such as `5,2`
fn dash_list(input: &str) -> IResult<&str, DashArray> {
    map(separated_list1(ws(char(',')), ws(double)), DashArray)(input)
}

/// Dash pattern for an enabled line style; `None` when the style is not
/// recognised
pub fn parse_dash(linestyle: &str) -> Option<DashArray> {
    let parsed: IResult<&str, DashArray> =
        all_consuming(ws(alt((named_linestyle, dash_tuple, dash_list))))(linestyle);
    match parsed {
        Ok((_, dash)) if dash.0.iter().all(|v| v.is_finite() && *v >= 0.0) => Some(dash),
        _ => None,
    }
}

/// Marker glyphs the host symbol generator understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MarkerGlyph {
    Circle,
    Square,
    TriangleUp,
    TriangleDown,
    Diamond,
    Cross,
}

impl MarkerGlyph {
    /// Glyph for a marker code and whether the mapping is exact.
    /// Unknown markers approximate to a circle.
    pub fn for_marker(marker: &str) -> (MarkerGlyph, bool) {
        match marker {
            "o" => (MarkerGlyph::Circle, true),
            "s" => (MarkerGlyph::Square, true),
            "^" => (MarkerGlyph::TriangleUp, true),
            "v" => (MarkerGlyph::TriangleDown, true),
            "D" | "d" => (MarkerGlyph::Diamond, true),
            "+" => (MarkerGlyph::Cross, true),
            _ => (MarkerGlyph::Circle, false),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            MarkerGlyph::Circle => "circle",
            MarkerGlyph::Square => "square",
            MarkerGlyph::TriangleUp => "triangle-up",
            MarkerGlyph::TriangleDown => "triangle-down",
            MarkerGlyph::Diamond => "diamond",
            MarkerGlyph::Cross => "cross",
        }
    }
}
