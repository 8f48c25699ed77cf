//! Country boundary loading.
//!
//! Reads a GeoJSON FeatureCollection such as Natural Earth's
//! `ne_110m_admin_0_countries`. Each feature needs a `NAME` property and a
//! polygon or multipolygon geometry.

use geo_types::Geometry;
use geojson::{Feature, GeoJson};
use std::path::Path;

use crate::error::{GeoError, GeoResult};

/// Name properties, in order of preference.
const NAME_KEYS: [&str; 3] = ["NAME", "name", "ADMIN"];

/// ISO-3166 alpha-3 properties, in order of preference.
const ISO_KEYS: [&str; 3] = ["ISO_A3", "ADM0_A3", "iso_a3"];

/// Natural Earth's placeholder for "no code".
const NO_CODE: &str = "-99";

/// One country outline.
#[derive(Debug, Clone, PartialEq)]
pub struct CountryBoundary {
    /// Display name as written in the boundary source
    pub name: String,
    pub iso_a3: Option<String>,
    pub geometry: Geometry<f64>,
}

/// Load boundaries from a GeoJSON file.
pub fn load_boundaries(path: &Path) -> GeoResult<Vec<CountryBoundary>> {
    let content = std::fs::read_to_string(path)?;
    parse_boundaries(&content)
}

/// Parse boundaries from GeoJSON text.
pub fn parse_boundaries(content: &str) -> GeoResult<Vec<CountryBoundary>> {
    let geojson: GeoJson = content
        .parse()
        .map_err(|e: geojson::Error| GeoError::Parse(e.to_string()))?;

    let features = match geojson {
        GeoJson::FeatureCollection(fc) => fc.features,
        GeoJson::Feature(f) => vec![f],
        GeoJson::Geometry(_) => {
            return Err(GeoError::Parse("expected features, found a bare geometry".to_string()))
        }
    };

    features
        .into_iter()
        .enumerate()
        .map(|(index, feature)| to_boundary(index, feature))
        .collect()
}

fn to_boundary(index: usize, feature: Feature) -> GeoResult<CountryBoundary> {
    let name = first_string(&feature, &NAME_KEYS).ok_or(GeoError::MissingName(index))?;
    let iso_a3 = first_string(&feature, &ISO_KEYS);

    let geometry = feature.geometry.ok_or_else(|| GeoError::InvalidGeometry {
        name: name.clone(),
        message: "no geometry".to_string(),
    })?;

    let geometry = Geometry::<f64>::try_from(geometry.value).map_err(|e| GeoError::InvalidGeometry {
        name: name.clone(),
        message: e.to_string(),
    })?;

    Ok(CountryBoundary { name, iso_a3, geometry })
}

/// First key holding a non-empty string that is not the "no code" marker.
fn first_string(feature: &Feature, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| feature.property(*key))
        .filter_map(|value| value.as_str())
        .map(|s| s.trim().to_string())
        .find(|s| !s.is_empty() && s != NO_CODE)
}
