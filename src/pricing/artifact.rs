//! Pre-trained per-brand regression artifacts.
//!
//! An artifact is a JSON file produced by the offline training
//! pipeline. It carries its own feature schema: an ordered column list
//! with one encoding per column, a weight per column, and an
//! intercept. This module only reads artifacts; training is elsewhere.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use thiserror::Error;

pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("artifact unreadable at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("artifact at {path} is not valid JSON: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("unsupported artifact format version {0}")]
    Version(u32),
    #[error("artifact has {columns} columns but {weights} weights")]
    Shape { columns: usize, weights: usize },
    #[error("missing value for column {0:?}")]
    MissingColumn(String),
    #[error("column {column:?}: cannot parse {value:?} as a number")]
    NonNumeric { column: String, value: String },
    #[error("column {column:?}: unknown level {value:?}")]
    UnknownLevel { column: String, value: String },
}

/// How a submitted string becomes a feature value.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColumnEncoding {
    /// Parsed as f64, then standardized with the training mean/std.
    Numeric { mean: f64, std: f64 },
    /// Looked up in the level table; `fallback` covers unseen levels
    /// when the training pipeline provided one.
    Categorical {
        levels: HashMap<String, f64>,
        #[serde(default)]
        fallback: Option<f64>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub encoding: ColumnEncoding,
}

/// A serialized linear regression model for one brand.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceModel {
    pub format_version: u32,
    pub brand: String,
    pub columns: Vec<Column>,
    pub weights: Vec<f64>,
    pub intercept: f64,
}

impl PriceModel {
    /// Read an artifact from disk. Called on every prediction request;
    /// artifacts are immutable once trained, so there is no cache.
    pub fn load(path: &Path) -> Result<Self, ArtifactError> {
        let file = File::open(path).map_err(|source| ArtifactError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let model: PriceModel =
            serde_json::from_reader(BufReader::new(file)).map_err(|source| {
                ArtifactError::Parse {
                    path: path.display().to_string(),
                    source,
                }
            })?;
        model.check()?;
        Ok(model)
    }

    fn check(&self) -> Result<(), ArtifactError> {
        if self.format_version != FORMAT_VERSION {
            return Err(ArtifactError::Version(self.format_version));
        }
        if self.columns.len() != self.weights.len() {
            return Err(ArtifactError::Shape {
                columns: self.columns.len(),
                weights: self.weights.len(),
            });
        }
        Ok(())
    }

    /// Apply the model to a single feature row keyed by column name.
    pub fn predict(&self, row: &HashMap<String, String>) -> Result<f64, ArtifactError> {
        let mut acc = self.intercept;
        for (col, weight) in self.columns.iter().zip(&self.weights) {
            let raw = row
                .get(&col.name)
                .ok_or_else(|| ArtifactError::MissingColumn(col.name.clone()))?;
            let value = raw.trim();
            let x = match &col.encoding {
                ColumnEncoding::Numeric { mean, std } => {
                    let v: f64 = value.parse().map_err(|_| ArtifactError::NonNumeric {
                        column: col.name.clone(),
                        value: value.to_string(),
                    })?;
                    if *std > 0.0 {
                        (v - mean) / std
                    } else {
                        v - mean
                    }
                }
                ColumnEncoding::Categorical { levels, fallback } => levels
                    .get(value)
                    .copied()
                    .or(*fallback)
                    .ok_or_else(|| ArtifactError::UnknownLevel {
                        column: col.name.clone(),
                        value: value.to_string(),
                    })?,
            };
            acc += weight * x;
        }
        Ok(acc)
    }

    /// Names of the categorical levels a column accepts, sorted for a
    /// stable form rendering. None for numeric columns.
    pub fn levels_of(&self, col: &Column) -> Option<Vec<String>> {
        match &col.encoding {
            ColumnEncoding::Numeric { .. } => None,
            ColumnEncoding::Categorical { levels, .. } => {
                let mut names: Vec<String> = levels.keys().cloned().collect();
                names.sort_unstable();
                Some(names)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_model() -> PriceModel {
        let mut model_levels = HashMap::new();
        model_levels.insert("A1".to_string(), 1.0);
        model_levels.insert("A3".to_string(), -0.5);
        let mut trans_levels = HashMap::new();
        trans_levels.insert("Manual".to_string(), 0.0);
        trans_levels.insert("Automatic".to_string(), 1.0);
        PriceModel {
            format_version: FORMAT_VERSION,
            brand: "audi".into(),
            columns: vec![
                Column {
                    name: "model".into(),
                    encoding: ColumnEncoding::Categorical {
                        levels: model_levels,
                        fallback: None,
                    },
                },
                Column {
                    name: "year".into(),
                    encoding: ColumnEncoding::Numeric {
                        mean: 2017.0,
                        std: 2.0,
                    },
                },
                Column {
                    name: "transmission".into(),
                    encoding: ColumnEncoding::Categorical {
                        levels: trans_levels,
                        fallback: Some(0.5),
                    },
                },
            ],
            weights: vec![1000.0, 2000.0, -500.0],
            intercept: 15000.0,
        }
    }

    fn row(model: &str, year: &str, transmission: &str) -> HashMap<String, String> {
        let mut row = HashMap::new();
        row.insert("model".to_string(), model.to_string());
        row.insert("year".to_string(), year.to_string());
        row.insert("transmission".to_string(), transmission.to_string());
        row
    }

    #[test]
    fn predicts_linear_combination() {
        let m = sample_model();
        // 15000 + 1000*1.0 + 2000*((2019-2017)/2) + (-500)*0.0
        let price = m.predict(&row("A1", "2019", "Manual")).unwrap();
        assert!((price - 18000.0).abs() < 1e-9);
    }

    #[test]
    fn standardizes_numeric_columns() {
        let m = sample_model();
        let at_mean = m.predict(&row("A1", "2017", "Manual")).unwrap();
        assert!((at_mean - 16000.0).abs() < 1e-9);
    }

    #[test]
    fn categorical_fallback_covers_unseen_level() {
        let m = sample_model();
        // transmission "Semi-Auto" is unseen; fallback 0.5 applies
        let price = m.predict(&row("A1", "2017", "Semi-Auto")).unwrap();
        assert!((price - 15750.0).abs() < 1e-9);
    }

    #[test]
    fn unknown_level_without_fallback_errors() {
        let m = sample_model();
        let err = m.predict(&row("Q7", "2017", "Manual")).unwrap_err();
        assert!(matches!(err, ArtifactError::UnknownLevel { .. }));
    }

    #[test]
    fn missing_column_errors() {
        let m = sample_model();
        let mut incomplete = row("A1", "2017", "Manual");
        incomplete.remove("year");
        let err = m.predict(&incomplete).unwrap_err();
        assert!(matches!(err, ArtifactError::MissingColumn(c) if c == "year"));
    }

    #[test]
    fn non_numeric_value_errors() {
        let m = sample_model();
        let err = m.predict(&row("A1", "lots", "Manual")).unwrap_err();
        assert!(matches!(err, ArtifactError::NonNumeric { .. }));
    }

    #[test]
    fn whitespace_is_trimmed() {
        let m = sample_model();
        let price = m.predict(&row(" A1 ", " 2019 ", "Manual")).unwrap();
        assert!((price - 18000.0).abs() < 1e-9);
    }

    #[test]
    fn check_rejects_wrong_version() {
        let mut m = sample_model();
        m.format_version = 2;
        assert!(matches!(m.check(), Err(ArtifactError::Version(2))));
    }

    #[test]
    fn check_rejects_shape_mismatch() {
        let mut m = sample_model();
        m.weights.pop();
        assert!(matches!(m.check(), Err(ArtifactError::Shape { .. })));
    }

    #[test]
    fn load_reads_a_written_artifact() {
        let m = sample_model();
        let dir = std::env::temp_dir().join(format!("carvalue-test-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("price_model.json");
        std::fs::write(&path, serde_json::to_vec(&m).unwrap()).unwrap();

        let loaded = PriceModel::load(&path).unwrap();
        assert_eq!(loaded.brand, "audi");
        assert_eq!(loaded.columns.len(), 3);
        let price = loaded.predict(&row("A1", "2019", "Manual")).unwrap();
        assert!((price - 18000.0).abs() < 1e-9);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn load_errors_on_missing_file() {
        let err = PriceModel::load(Path::new("/nonexistent/price_model.json")).unwrap_err();
        assert!(matches!(err, ArtifactError::Io { .. }));
    }

    #[test]
    fn levels_are_sorted_for_rendering() {
        let m = sample_model();
        let levels = m.levels_of(&m.columns[0]).unwrap();
        assert_eq!(levels, vec!["A1".to_string(), "A3".to_string()]);
        assert!(m.levels_of(&m.columns[1]).is_none());
    }
}
