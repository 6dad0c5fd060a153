//! `key=value` overrides layered on top of a [`ChartConfig`].
//!
//! ```text
//! yTickInterval=2.5
//! autoYLim=false
//! title="Reaction time (ms)"
//! barColor=#ffcc00
//! ```

use crate::config::ChartConfig;
use crate::error::{ChartError, Result};
use nom::{
    branch::alt,
    bytes::complete::{escaped_transform, is_not, tag, take_while1},
    character::complete::{char, multispace0},
    combinator::{all_consuming, consumed, map, value},
    number::complete::double,
    sequence::{delimited, separated_pair},
    IResult,
};
use serde_json::Value;

/// Right-hand side of an override.
#[derive(Debug, Clone, PartialEq)]
pub enum OverrideValue {
    /// Parsed value plus the text it was written as.
    Number(f64, String),
    Bool(bool),
    Text(String),
}

/// A single parsed `key=value` expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Override {
    pub key: String,
    pub value: OverrideValue,
}

fn ws<'a, F, O>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    delimited(multispace0, inner, multispace0)
}

fn identifier(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_ascii_alphanumeric() || c == '_')(input)
}

fn string_literal(input: &str) -> IResult<&str, String> {
    alt((
        value(String::new(), tag("\"\"")),
        delimited(
            char('"'),
            escaped_transform(
                is_not("\\\""),
                '\\',
                alt((value("\\", tag("\\")), value("\"", tag("\"")))),
            ),
            char('"'),
        ),
    ))(input)
}

fn bool_literal(input: &str) -> IResult<&str, bool> {
    alt((value(true, tag("true")), value(false, tag("false"))))(input)
}

fn bare_word(input: &str) -> IResult<&str, String> {
    map(is_not(" \t\r\n\""), str::to_string)(input)
}

fn override_value(input: &str) -> IResult<&str, OverrideValue> {
    alt((
        map(all_consuming(ws(bool_literal)), OverrideValue::Bool),
        map(all_consuming(ws(consumed(double))), |(raw, n): (&str, f64)| {
            OverrideValue::Number(n, raw.to_string())
        }),
        map(all_consuming(ws(string_literal)), OverrideValue::Text),
        map(all_consuming(ws(bare_word)), OverrideValue::Text),
    ))(input)
}

fn override_expr(input: &str) -> IResult<&str, Override> {
    map(
        separated_pair(ws(identifier), char('='), override_value),
        |(key, value)| Override { key: key.to_string(), value },
    )(input)
}

/// Parse one `key=value` expression.
pub fn parse_override(input: &str) -> Result<Override> {
    match all_consuming(override_expr)(input) {
        Ok((_, parsed)) => Ok(parsed),
        Err(e) => Err(ChartError::config(format!(
            "invalid override '{}': {:?}",
            input, e
        ))),
    }
}

/// Apply overrides in order; later expressions win.
pub fn apply_overrides(config: ChartConfig, overrides: &[Override]) -> Result<ChartConfig> {
    let mut doc = serde_json::to_value(config)?;
    let fields = doc
        .as_object_mut()
        .ok_or_else(|| ChartError::config("configuration did not serialize to an object"))?;

    for ov in overrides {
        let current = fields
            .get(&ov.key)
            .ok_or_else(|| ChartError::config(format!("unknown configuration key '{}'", ov.key)))?;

        let new_value = match (current, &ov.value) {
            // a string setting takes the override verbatim, even if it looks numeric
            (Value::String(_), OverrideValue::Number(_, raw)) => Value::String(raw.clone()),
            (Value::String(_), OverrideValue::Bool(b)) => Value::String(b.to_string()),
            (_, OverrideValue::Number(n, _)) => serde_json::Number::from_f64(*n)
                .map(Value::Number)
                .ok_or_else(|| ChartError::config(format!("'{}' must be a finite number", ov.key)))?,
            (_, OverrideValue::Bool(b)) => Value::Bool(*b),
            (_, OverrideValue::Text(s)) => Value::String(s.clone()),
        };
        log::debug!("override {} = {}", ov.key, new_value);
        fields.insert(ov.key.clone(), new_value);
    }

    serde_json::from_value(doc)
        .map_err(|e| ChartError::config(format!("invalid override value: {}", e)))
}
