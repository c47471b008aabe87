// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use serde_json::json;

/// First MMSI handed out by [`vessel_records`].
pub const FIRST_MMSI: u64 = 367_000_000;

/// A full AIS vessel record with a position.
pub fn vessel_record(mmsi: &str, name: &str, x: f64, y: f64) -> String {
    json!({
        "geometry": { "x": x, "y": y, "spatialReference": { "wkid": 4326 } },
        "attributes": {
            "MMSI": mmsi,
            "BaseDateTime": 1_672_531_200.0,
            "LAT": y,
            "LONG": x,
            "SOG": 11.4,
            "COG": 271.3,
            "Heading": 270.0,
            "VesselName": name,
            "IMO": "IMO9176187",
            "CallSign": "WDC6612",
            "VesselType": "70",
            "Status": "under way using engine",
            "Length": 182.0,
            "Width": 28.0,
            "Cargo": "70",
            "globalid": format!("{{{mmsi}}}")
        }
    })
    .to_string()
}

/// A record carrying only the entity id and no geometry.
pub fn record_without_geometry(mmsi: &str) -> String {
    json!({ "attributes": { "MMSI": mmsi } }).to_string()
}

/// A line that is not JSON at all.
pub fn malformed_record() -> String {
    "{\"geometry\": {\"x\": 1.0,".to_string()
}

/// `count` distinct vessels, MMSI `FIRST_MMSI + i`, marching east one tenth of a degree per record.
pub fn vessel_records(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| {
            let mmsi = (FIRST_MMSI + i as u64).to_string();
            vessel_record(&mmsi, &format!("VESSEL {i}"), -120.0 + i as f64 * 0.1, 33.0)
        })
        .collect()
}

/// The MMSI [`vessel_records`] gives its `index`-th record.
pub fn mmsi_at(index: usize) -> String {
    (FIRST_MMSI + index as u64).to_string()
}
