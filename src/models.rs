use geo::{MultiLineString, MultiPolygon};
use serde::Deserialize;

/// One row of the education dataset: attainment for a single US county.
#[derive(Debug, Clone, Deserialize)]
pub struct CountyRecord {
    pub fips: u32,
    pub state: String,
    pub area_name: String,
    #[serde(rename = "bachelorsOrHigher")]
    pub bachelors_or_higher: f64,
}

/// Summary statistics over `bachelors_or_higher` across all counties.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregateStats {
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub count: usize,
}

/// A single boundary feature derived from the topology. `id` is the FIPS
/// code of the county or state; a feature without one still renders, as a
/// no-data shape.
#[derive(Debug, Clone)]
pub struct Boundary {
    pub id: Option<u32>,
    pub geometry: MultiPolygon<f64>,
}

/// All boundary features of one topology object (counties or states).
pub type BoundaryCollection = Vec<Boundary>;

/// Merged line work for the borders between distinct states only.
pub type DividerMesh = MultiLineString<f64>;

/// Everything one load produces. Built once at startup, read-only
/// afterwards; a reload replaces the whole value.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub records: Vec<CountyRecord>,
    pub counties: BoundaryCollection,
    pub states: BoundaryCollection,
    pub state_borders: DividerMesh,
}

impl Dataset {
    /// The "no data available" result the loader hands back on failure.
    pub fn empty() -> Self {
        Self {
            records: Vec::new(),
            counties: Vec::new(),
            states: Vec::new(),
            state_borders: MultiLineString(Vec::new()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn county_record_parses_wire_field_names() {
        let json = r#"{
            "fips": 1001,
            "state": "AL",
            "area_name": "Autauga County",
            "bachelorsOrHigher": 21.9
        }"#;
        let record: CountyRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.fips, 1001);
        assert_eq!(record.state, "AL");
        assert_eq!(record.area_name, "Autauga County");
        assert!((record.bachelors_or_higher - 21.9).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_dataset_reports_empty() {
        let dataset = Dataset::empty();
        assert!(dataset.is_empty());
        assert!(dataset.counties.is_empty());
        assert!(dataset.state_borders.0.is_empty());
    }
}
