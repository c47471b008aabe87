// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::{AttributeValue, Point};
use serde::Serialize;
use std::collections::HashMap;

/// One decoded observation record.
///
/// Created by the record parser from exactly one raw line and never mutated
/// afterwards; whoever receives it off the feed owns it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Observation {
    sequence: u64,
    position: Option<Point>,
    attributes: HashMap<String, AttributeValue>,
}

impl Observation {
    /// Creates an observation.
    ///
    /// `sequence` is the producer's read counter; it grows monotonically within
    /// a connect run, including across passes of a looping source.
    #[must_use]
    pub fn new(
        sequence: u64,
        position: Option<Point>,
        attributes: HashMap<String, AttributeValue>,
    ) -> Self {
        Self {
            sequence,
            position,
            attributes,
        }
    }

    #[must_use]
    pub const fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Position of the entity, `None` when the record carried no usable geometry.
    #[must_use]
    pub const fn position(&self) -> Option<Point> {
        self.position
    }

    #[must_use]
    pub const fn attributes(&self) -> &HashMap<String, AttributeValue> {
        &self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes.get(name)
    }

    /// Returns the entity key of this observation under the given id field.
    pub fn entity_id(&self, entity_id_field: &str) -> Option<String> {
        self.attribute(entity_id_field)
            .and_then(AttributeValue::to_key)
    }
}
