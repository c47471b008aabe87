// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Static schema descriptors.
//!
//! A feed hands its [`DataSourceInfo`] to the consuming layer exactly once, at load
//! time, before the first event. The field list never changes for the lifetime of
//! a source instance and always contains the entity-id field.

use crate::SpatialReference;
use core::fmt;
use dynfeed_error::{FeedError, Result};
use serde::Serialize;
use std::collections::HashSet;

/// Declared type of an attribute field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Float64,
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => f.write_str("text"),
            Self::Float64 => f.write_str("float64"),
        }
    }
}

/// One entry of the schema: name, type and advisory display length.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct FieldDescriptor {
    pub name: String,
    pub field_type: FieldType,
    /// Advisory only; values are never truncated.
    pub length: u32,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, field_type: FieldType, length: u32) -> Self {
        Self {
            name: name.into(),
            field_type,
            length,
        }
    }

    pub fn text(name: impl Into<String>, length: u32) -> Self {
        Self::new(name, FieldType::Text, length)
    }

    pub fn float64(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Float64, 8)
    }
}

/// Everything a consumer needs to know about a feed before the first event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataSourceInfo {
    entity_id_field: String,
    fields: Vec<FieldDescriptor>,
    spatial_reference: SpatialReference,
}

impl DataSourceInfo {
    /// Builds a schema in [`SpatialReference::WGS84`].
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::InvalidSchema`] when the field list is empty, contains
    /// duplicate names, or does not declare `entity_id_field`.
    pub fn new(entity_id_field: impl Into<String>, fields: Vec<FieldDescriptor>) -> Result<Self> {
        let entity_id_field = entity_id_field.into();

        if fields.is_empty() {
            return Err(FeedError::invalid_schema("field list is empty"));
        }

        let mut seen = HashSet::with_capacity(fields.len());
        for field in &fields {
            if !seen.insert(field.name.as_str()) {
                return Err(FeedError::invalid_schema(format!(
                    "field '{}' is declared twice",
                    field.name
                )));
            }
        }

        if !seen.contains(entity_id_field.as_str()) {
            return Err(FeedError::invalid_schema(format!(
                "entity id field '{entity_id_field}' is not a declared field"
            )));
        }

        Ok(Self {
            entity_id_field,
            fields,
            spatial_reference: SpatialReference::WGS84,
        })
    }

    #[must_use]
    pub fn with_spatial_reference(mut self, spatial_reference: SpatialReference) -> Self {
        self.spatial_reference = spatial_reference;
        self
    }

    pub fn entity_id_field(&self) -> &str {
        &self.entity_id_field
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub const fn spatial_reference(&self) -> SpatialReference {
        self.spatial_reference
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.name == name)
    }
}

/// Schema of the AIS vessel-track feed, keyed by `MMSI`.
///
/// Pure: every call returns an identical value.
#[must_use]
pub fn ais_vessel_schema() -> DataSourceInfo {
    let fields = vec![
        FieldDescriptor::text("MMSI", 256),
        FieldDescriptor::float64("BaseDateTime"),
        FieldDescriptor::float64("LAT"),
        FieldDescriptor::float64("LONG"),
        FieldDescriptor::float64("SOG"),
        FieldDescriptor::float64("COG"),
        FieldDescriptor::float64("Heading"),
        FieldDescriptor::text("VesselName", 256),
        FieldDescriptor::text("IMO", 256),
        FieldDescriptor::text("CallSign", 256),
        FieldDescriptor::text("VesselType", 256),
        FieldDescriptor::text("Status", 256),
        FieldDescriptor::float64("Length"),
        FieldDescriptor::float64("Width"),
        FieldDescriptor::text("Cargo", 256),
        FieldDescriptor::text("globalid", 256),
    ];

    // Constant field list, validated by the schema tests.
    DataSourceInfo {
        entity_id_field: "MMSI".to_string(),
        fields,
        spatial_reference: SpatialReference::WGS84,
    }
}
