//! GeoJSON output for joined rows.
//!
//! Every row becomes a feature. Unmatched boundaries keep their geometry with
//! null data properties, so maps draw them unfilled.

use geojson::{Feature, FeatureCollection, GeoJson, Geometry, JsonObject};
use serde_json::{json, Value};

use super::join::{ChangeGeoRecord, GeoRecord, Joined};
use crate::models::RegimeCategory;

/// Features for one year's joined records.
///
/// Properties: `name`, `iso_a3`, `country`, `region`, `year`,
/// `democracy_index`, `regime`.
pub fn records_to_geojson(rows: &[GeoRecord<'_>]) -> GeoJson {
    collection(rows, |row, props| {
        let record = row.value;
        props.insert("region".into(), json!(record.map(|r| r.region.as_str())));
        props.insert("year".into(), json!(record.map(|r| r.year)));
        props.insert("democracy_index".into(), json!(record.and_then(|r| r.democracy_index)));
        props.insert("regime".into(), json!(row.regime().map(|c| c.label())));
    })
}

/// Features for joined index changes.
///
/// Properties: `name`, `iso_a3`, `country`, `region`, `start_year`,
/// `end_year`, `start`, `end`, `change`, `start_regime`, `end_regime`.
pub fn changes_to_geojson(rows: &[ChangeGeoRecord<'_>]) -> GeoJson {
    collection(rows, |row, props| {
        let change = row.value;
        let regime = |v: Option<f64>| v.map(|i| RegimeCategory::classify(i).label());
        props.insert("region".into(), json!(change.map(|c| c.region.as_str())));
        props.insert("start_year".into(), json!(change.map(|c| c.start_year)));
        props.insert("end_year".into(), json!(change.map(|c| c.end_year)));
        props.insert("start".into(), json!(change.and_then(|c| c.start)));
        props.insert("end".into(), json!(change.and_then(|c| c.end)));
        props.insert("change".into(), json!(change.and_then(|c| c.change)));
        props.insert("start_regime".into(), json!(regime(change.and_then(|c| c.start))));
        props.insert("end_regime".into(), json!(regime(change.and_then(|c| c.end))));
    })
}

fn collection<T, F>(rows: &[Joined<'_, T>], fill: F) -> GeoJson
where
    F: Fn(&Joined<'_, T>, &mut JsonObject),
{
    let features = rows
        .iter()
        .map(|row| {
            let mut props = JsonObject::new();
            props.insert("name".into(), Value::String(row.boundary.name.clone()));
            props.insert("iso_a3".into(), json!(row.boundary.iso_a3));
            let country = row.value.map(|_| row.country);
            props.insert("country".into(), json!(country));
            fill(row, &mut props);

            Feature {
                bbox: None,
                geometry: Some(Geometry::new(geojson::Value::from(&row.boundary.geometry))),
                id: None,
                properties: Some(props),
                foreign_members: None,
            }
        })
        .collect();

    GeoJson::FeatureCollection(FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    })
}
