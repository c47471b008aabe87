// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Decoding of raw JSON lines into [`Observation`]s.
//!
//! Each line is one self-contained object:
//!
//! ```text
//! {"geometry":{"x":-117.2,"y":32.7},"attributes":{"MMSI":"367","SOG":11.4}}
//! ```
//!
//! Both `geometry` and `attributes` are optional, other top-level keys are ignored.
//! Only a line that is not a JSON object at all is a decode error.

use dynfeed_core::{AttributeValue, DataSourceInfo, FieldType, Observation, Point};
use dynfeed_error::{FeedError, Result};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Schema-aware record decoder.
///
/// Attributes whose key is not a declared field are dropped. Retained scalars
/// are coerced to the declared field type:
///
/// | declared | JSON value           | result            |
/// |----------|----------------------|-------------------|
/// | text     | string               | `Text`            |
/// | text     | number / bool        | `Text` (rendered) |
/// | float64  | number               | `Number`          |
/// | float64  | numeric string       | `Number`          |
/// | any      | anything else        | `Null`            |
///
/// Arrays and objects are not scalars and are dropped silently.
#[derive(Debug, Clone)]
pub struct RecordParser {
    field_types: HashMap<String, FieldType>,
}

impl RecordParser {
    pub fn new(schema: &DataSourceInfo) -> Self {
        Self {
            field_types: schema
                .fields()
                .iter()
                .map(|field| (field.name.clone(), field.field_type))
                .collect(),
        }
    }

    /// Decodes one raw line.
    ///
    /// `line` is only used for diagnostics; `sequence` is stamped on the result.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::Decode`] when the line is not a JSON object.
    pub fn decode(&self, raw: &str, line: u64, sequence: u64) -> Result<Observation> {
        let value: Value = serde_json::from_str(raw.trim())
            .map_err(|error| FeedError::decode(line, error.to_string()))?;
        let Value::Object(mut record) = value else {
            return Err(FeedError::decode(line, "record is not a JSON object"));
        };

        let position = record.get("geometry").and_then(parse_point);
        let attributes = match record.remove("attributes") {
            Some(Value::Object(map)) => self.retain_scalars(map),
            _ => HashMap::new(),
        };

        Ok(Observation::new(sequence, position, attributes))
    }

    fn retain_scalars(&self, map: Map<String, Value>) -> HashMap<String, AttributeValue> {
        map.into_iter()
            .filter_map(|(key, value)| {
                let field_type = *self.field_types.get(&key)?;
                let value = coerce(value, field_type)?;
                Some((key, value))
            })
            .collect()
    }
}

fn parse_point(geometry: &Value) -> Option<Point> {
    let x = geometry.get("x")?.as_f64()?;
    let y = geometry.get("y")?.as_f64()?;
    Some(Point::new(x, y))
}

/// `None` means "not a scalar, drop the key".
fn coerce(value: Value, field_type: FieldType) -> Option<AttributeValue> {
    let coerced = match (value, field_type) {
        (Value::Array(_) | Value::Object(_), _) => return None,
        (Value::Null, _) => AttributeValue::Null,
        (Value::String(text), FieldType::Text) => AttributeValue::Text(text),
        (Value::Number(number), FieldType::Text) => AttributeValue::Text(number.to_string()),
        (Value::Bool(flag), FieldType::Text) => AttributeValue::Text(flag.to_string()),
        (Value::Number(number), FieldType::Float64) => {
            number.as_f64().map_or(AttributeValue::Null, AttributeValue::Number)
        }
        (Value::String(text), FieldType::Float64) => text
            .trim()
            .parse::<f64>()
            .map_or(AttributeValue::Null, AttributeValue::Number),
        (Value::Bool(_), FieldType::Float64) => AttributeValue::Null,
    };
    Some(coerced)
}
