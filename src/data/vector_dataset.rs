use std::{fs::File, io::BufReader, io::Read, path::Path};

use serde::Deserialize;
use thiserror::Error;

use crate::common::geodesy::GeodeticPoint;

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Unable to open vector dataset {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("Malformed vector dataset: {0}")]
    Json(#[from] serde_json::Error),
}

/// One multi-part polyline record. `parts` holds the start offset of every
/// disjoint polyline within `points`.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Record {
    #[serde(rename = "Points")]
    pub points: Vec<GeodeticPoint>,
    #[serde(rename = "Parts")]
    pub parts: Vec<usize>,
}

impl Record {
    /// Point ranges of the record's parts. The last part runs to the end of
    /// `points`; offsets past the end are clamped and out-of-order offsets give
    /// an empty part.
    pub fn part_ranges(&self) -> impl Iterator<Item = &[GeodeticPoint]> + '_ {
        let len = self.points.len();
        self.parts.iter().enumerate().map(move |(i, &start)| {
            let end = self.parts.get(i + 1).copied().unwrap_or(len).min(len);
            let start = start.min(end);
            &self.points[start..end]
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct VectorDataset {
    #[serde(rename = "Records")]
    pub records: Vec<Record>,
}

impl VectorDataset {
    pub fn from_reader(reader: impl Read) -> Result<Self, DatasetError> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| DatasetError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn point_count(&self) -> usize {
        self.records.iter().map(|record| record.points.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points(n: usize) -> Vec<GeodeticPoint> {
        (0..n)
            .map(|i| GeodeticPoint::new(i as f64, -(i as f64)))
            .collect()
    }

    #[test]
    fn read_from_json() {
        let json = r#"{
            "Records": [
                {
                    "Points": [
                        {"Longitude": 20.5, "Latitude": 49.25},
                        {"Longitude": 21.0, "Latitude": 50.0}
                    ],
                    "Parts": [0]
                }
            ]
        }"#;

        let dataset = VectorDataset::from_reader(json.as_bytes()).unwrap();

        assert_eq!(
            dataset,
            VectorDataset {
                records: vec![Record {
                    points: vec![
                        GeodeticPoint::new(20.5, 49.25),
                        GeodeticPoint::new(21.0, 50.0)
                    ],
                    parts: vec![0],
                }],
            }
        );
        assert_eq!(dataset.point_count(), 2);
    }

    #[test]
    fn malformed_json_is_an_error() {
        let read = VectorDataset::from_reader(r#"{"Records": [{"Points": 3}]}"#.as_bytes());
        assert!(matches!(read, Err(DatasetError::Json(_))));
    }

    #[test]
    fn missing_file_is_an_error() {
        let read = VectorDataset::from_path("does/not/exist.json");
        assert!(matches!(read, Err(DatasetError::Io { .. })));
    }

    #[test]
    fn last_part_runs_to_end() {
        let record = Record {
            points: points(5),
            parts: vec![0, 3],
        };
        let lengths = record.part_ranges().map(<[_]>::len).collect::<Vec<_>>();
        assert_eq!(lengths, vec![3, 2]);
    }

    #[test]
    fn malformed_offsets_are_clamped() {
        let record = Record {
            points: points(4),
            parts: vec![2, 1, 9],
        };
        let lengths = record.part_ranges().map(<[_]>::len).collect::<Vec<_>>();
        assert_eq!(lengths, vec![0, 3, 0]);
    }
}
