// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// SPDX-License-Identifier: MIT OR Apache-2.0

use dynfeed_core::{ais_vessel_schema, AttributeValue, Point};
use dynfeed_error::FeedError;
use dynfeed_source::RecordParser;
use dynfeed_test_utils::{malformed_record, vessel_record};
use std::collections::HashMap;

fn parser() -> RecordParser {
    RecordParser::new(&ais_vessel_schema())
}

#[test]
fn test_record_without_geometry_has_no_position() -> anyhow::Result<()> {
    // Act
    let observation = parser().decode(r#"{"attributes":{"MMSI":"123"}}"#, 1, 0)?;

    // Assert
    let expected = HashMap::from([("MMSI".to_string(), AttributeValue::from("123"))]);
    assert_eq!(observation.position(), None);
    assert_eq!(observation.attributes(), &expected);
    Ok(())
}

#[test]
fn test_geometry_yields_position() -> anyhow::Result<()> {
    // Act
    let observation = parser().decode(
        r#"{"geometry":{"x":1.0,"y":2.0},"attributes":{"VesselName":"Foo"}}"#,
        1,
        7,
    )?;

    // Assert
    assert_eq!(observation.position(), Some(Point::new(1.0, 2.0)));
    assert_eq!(
        observation.attribute("VesselName"),
        Some(&AttributeValue::from("Foo"))
    );
    assert_eq!(observation.sequence(), 7);
    Ok(())
}

#[test]
fn test_malformed_geometry_is_treated_as_absent() -> anyhow::Result<()> {
    // Arrange
    let parser = parser();

    // Act
    let missing_y = parser.decode(r#"{"geometry":{"x":1.0}}"#, 1, 0)?;
    let text_x = parser.decode(r#"{"geometry":{"x":"1.0","y":2.0}}"#, 2, 1)?;
    let not_object = parser.decode(r#"{"geometry":[1.0,2.0]}"#, 3, 2)?;

    // Assert
    assert_eq!(missing_y.position(), None);
    assert_eq!(text_x.position(), None);
    assert_eq!(not_object.position(), None);
    Ok(())
}

#[test]
fn test_nested_and_unknown_attributes_are_dropped() -> anyhow::Result<()> {
    // Act
    let observation = parser().decode(
        r#"{"attributes":{"MMSI":"1","Status":{"code":5},"Cargo":[1,2],"Extra":"x"},"other":true}"#,
        1,
        0,
    )?;

    // Assert
    assert_eq!(observation.attributes().len(), 1);
    assert!(observation.attribute("Status").is_none());
    assert!(observation.attribute("Cargo").is_none());
    assert!(observation.attribute("Extra").is_none());
    Ok(())
}

#[test]
fn test_scalars_are_coerced_to_declared_type() -> anyhow::Result<()> {
    // Act
    let observation = parser().decode(
        r#"{"attributes":{"MMSI":367000001,"SOG":"12.5","COG":"n/a","Heading":true,"IMO":false,"Length":null}}"#,
        1,
        0,
    )?;

    // Assert
    assert_eq!(
        observation.attribute("MMSI"),
        Some(&AttributeValue::from("367000001"))
    );
    assert_eq!(observation.attribute("SOG"), Some(&AttributeValue::Number(12.5)));
    assert_eq!(observation.attribute("COG"), Some(&AttributeValue::Null));
    assert_eq!(observation.attribute("Heading"), Some(&AttributeValue::Null));
    assert_eq!(observation.attribute("IMO"), Some(&AttributeValue::from("false")));
    assert_eq!(observation.attribute("Length"), Some(&AttributeValue::Null));
    Ok(())
}

#[test]
fn test_full_vessel_record_keeps_every_schema_field() -> anyhow::Result<()> {
    // Act
    let observation = parser().decode(&vessel_record("367000001", "Foo", -117.2, 32.7), 1, 0)?;

    // Assert
    assert_eq!(observation.attributes().len(), 16);
    assert_eq!(observation.position(), Some(Point::new(-117.2, 32.7)));
    assert_eq!(observation.entity_id("MMSI"), Some("367000001".to_string()));
    Ok(())
}

#[test]
fn test_malformed_line_is_a_decode_error() {
    // Act
    let result = parser().decode(&malformed_record(), 4, 0);

    // Assert
    match result {
        Err(FeedError::Decode { line, .. }) => assert_eq!(line, 4),
        other => panic!("expected a decode error, got {other:?}"),
    }
}

#[test]
fn test_non_object_line_is_a_decode_error() {
    // Arrange
    let parser = parser();

    // Act & Assert
    for raw in ["42", "\"text\"", "[1,2]", "null"] {
        assert!(
            matches!(parser.decode(raw, 1, 0), Err(FeedError::Decode { .. })),
            "{raw} should not decode"
        );
    }
}
