//! Geographic joins.
//!
//! - Boundaries: load country outlines from GeoJSON
//! - Alias: boundary names that differ from index names
//! - Join: left join of boundaries onto index values
//! - Export: joined rows back out as GeoJSON

pub mod alias;
pub mod boundaries;
pub mod export;
pub mod join;

pub use alias::{resolve, ANTARCTICA, COUNTRY_ALIASES};
pub use boundaries::{load_boundaries, parse_boundaries, CountryBoundary};
pub use export::{changes_to_geojson, records_to_geojson};
pub use join::{ChangeGeoRecord, GeoJoin, GeoJoiner, GeoRecord, JoinReport, Joined};
