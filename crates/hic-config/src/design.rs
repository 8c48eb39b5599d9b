//! Design space: model input parameters, their ranges and the design matrix.

use std::collections::BTreeSet;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, Trim, WriterBuilder};
use hic_core::errors::{ErrorInfo, HicError};
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::serde::{from_json_slice, to_canonical_json_bytes};
use crate::workdir::{io_error, Workdir};

/// One model input parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignParameter {
    /// Identifier used in design files and downstream tables.
    pub key: String,
    /// Display label (LaTeX allowed). Falls back to `key`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Lower bound of the prior range.
    pub min: f64,
    /// Upper bound of the prior range.
    pub max: f64,
}

impl DesignParameter {
    /// Returns the display label, or the key when no label is set.
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.key)
    }

    /// Returns the `(min, max)` range.
    pub fn range(&self) -> (f64, f64) {
        (self.min, self.max)
    }

    fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Where the design matrix comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DesignSource {
    /// Matrix written directly in the project file.
    Inline {
        /// One row per design point.
        matrix: Vec<Vec<f64>>,
    },
    /// JSON matrix or headerless CSV, relative to the cache directory.
    File {
        /// Cache-relative path of the design file.
        path: PathBuf,
    },
    /// Latin hypercube over the parameter ranges.
    Lhs {
        /// Number of design points.
        points: usize,
        /// RNG seed.
        seed: u64,
    },
}

/// Parameters plus the source of their sampled design points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignSpace {
    /// Parameters in column order.
    pub parameters: Vec<DesignParameter>,
    /// Design matrix source.
    pub source: DesignSource,
}

impl DesignSpace {
    /// Parameter keys in column order.
    pub fn keys(&self) -> Vec<String> {
        self.parameters.iter().map(|param| param.key.clone()).collect()
    }

    /// Display labels in column order.
    pub fn labels(&self) -> Vec<&str> {
        self.parameters
            .iter()
            .map(DesignParameter::display_label)
            .collect()
    }

    /// `(min, max)` ranges in column order.
    pub fn ranges(&self) -> Vec<(f64, f64)> {
        self.parameters.iter().map(DesignParameter::range).collect()
    }

    /// Checks keys are present and unique and every range is non-empty.
    pub fn validate_parameters(&self) -> Result<(), HicError> {
        if self.parameters.is_empty() {
            return Err(HicError::Design(ErrorInfo::new(
                "hic_config.design_empty",
                "design declares no parameters",
            )));
        }
        let mut seen = BTreeSet::new();
        for param in &self.parameters {
            if param.key.trim().is_empty() {
                return Err(HicError::Design(ErrorInfo::new(
                    "hic_config.design_key",
                    "design parameter missing key",
                )));
            }
            if !seen.insert(param.key.as_str()) {
                return Err(HicError::Design(
                    ErrorInfo::new("hic_config.design_key", "duplicate design parameter")
                        .with_context("key", param.key.clone()),
                ));
            }
            if !(param.min.is_finite() && param.max.is_finite() && param.min < param.max) {
                return Err(HicError::Design(
                    ErrorInfo::new("hic_config.design_range", "range must satisfy min < max")
                        .with_context("key", param.key.clone())
                        .with_context("min", param.min.to_string())
                        .with_context("max", param.max.to_string()),
                ));
            }
        }
        Ok(())
    }

    /// Resolves the source into a checked design matrix.
    pub fn materialize(&self, workdir: &Workdir) -> Result<DesignMatrix, HicError> {
        self.validate_parameters()?;
        let rows = match &self.source {
            DesignSource::Inline { matrix } => matrix.clone(),
            DesignSource::File { path } => {
                let path = workdir.resolve_cached(path);
                info!(path = %path.display(), "loading design matrix");
                read_matrix_file(&path)?
            }
            DesignSource::Lhs { points, seed } => {
                debug!(points, seed, "generating latin hypercube design");
                latin_hypercube(&self.parameters, *points, *seed)?
            }
        };
        self.check_matrix(&rows)?;
        Ok(DesignMatrix {
            columns: self.keys(),
            rows,
        })
    }

    fn check_matrix(&self, rows: &[Vec<f64>]) -> Result<(), HicError> {
        if rows.is_empty() {
            return Err(HicError::Design(ErrorInfo::new(
                "hic_config.design_points",
                "design matrix has no points",
            )));
        }
        let mut outside = 0usize;
        for (idx, row) in rows.iter().enumerate() {
            if row.len() != self.parameters.len() {
                return Err(HicError::Shape(
                    ErrorInfo::new(
                        "hic_config.design_columns",
                        "design point has the wrong number of parameters",
                    )
                    .with_context("row", idx.to_string())
                    .with_context("expected", self.parameters.len().to_string())
                    .with_context("found", row.len().to_string()),
                ));
            }
            for (param, value) in self.parameters.iter().zip(row) {
                if !value.is_finite() {
                    return Err(HicError::Design(
                        ErrorInfo::new("hic_config.design_value", "design value is not finite")
                            .with_context("row", idx.to_string())
                            .with_context("key", param.key.clone()),
                    ));
                }
                if !param.contains(*value) {
                    outside += 1;
                }
            }
        }
        if outside > 0 {
            warn!(outside, "design values fall outside the declared ranges");
        }
        Ok(())
    }
}

/// Sampled design points, one row per point and one column per parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DesignMatrix {
    columns: Vec<String>,
    rows: Vec<Vec<f64>>,
}

impl DesignMatrix {
    /// Number of design points.
    pub fn n_points(&self) -> usize {
        self.rows.len()
    }

    /// Number of parameters.
    pub fn n_params(&self) -> usize {
        self.columns.len()
    }

    /// Parameter keys in column order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Design points.
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    /// Values of one parameter across all design points. `None` when the key
    /// is unknown or some row is too short to hold it.
    pub fn column(&self, key: &str) -> Option<Vec<f64>> {
        let idx = self.columns.iter().position(|column| column == key)?;
        self.rows.iter().map(|row| row.get(idx).copied()).collect()
    }

    /// Writes the matrix as headerless CSV, readable by [`DesignSource::File`].
    pub fn write_csv(&self, path: &Path) -> Result<(), HicError> {
        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .from_path(path)
            .map_err(|err| csv_error("hic_config.csv_open", path, err))?;
        for row in &self.rows {
            writer
                .write_record(row.iter().map(|value| value.to_string()))
                .map_err(|err| csv_error("hic_config.csv_write", path, err))?;
        }
        writer
            .flush()
            .map_err(|err| io_error("hic_config.csv_flush", path, err))
    }

    /// Writes the bare matrix as canonical JSON, readable by [`DesignSource::File`].
    pub fn write_json(&self, path: &Path) -> Result<(), HicError> {
        let bytes = to_canonical_json_bytes(&self.rows)?;
        fs::write(path, bytes).map_err(|err| io_error("hic_config.json_write", path, err))
    }
}

/// Latin hypercube with one sample at the centre of each of `points` strata
/// per parameter, strata shuffled independently per column.
pub fn latin_hypercube(
    params: &[DesignParameter],
    points: usize,
    seed: u64,
) -> Result<Vec<Vec<f64>>, HicError> {
    if points == 0 {
        return Err(HicError::Design(ErrorInfo::new(
            "hic_config.design_points",
            "latin hypercube needs at least one point",
        )));
    }
    let mut rows = vec![Vec::with_capacity(params.len()); points];
    let mut rng = StdRng::seed_from_u64(seed);
    let base_slots: Vec<f64> = (0..points)
        .map(|i| (i as f64 + 0.5) / points as f64)
        .collect();
    for param in params {
        let mut slots = base_slots.clone();
        slots.shuffle(&mut rng);
        for (row, frac) in rows.iter_mut().zip(&slots) {
            row.push(param.min + frac * (param.max - param.min));
        }
    }
    Ok(rows)
}

fn read_matrix_file(path: &Path) -> Result<Vec<Vec<f64>>, HicError> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => {
            let bytes = fs::read(path).map_err(|err| io_error("hic_config.design_read", path, err))?;
            from_json_slice(&bytes)
        }
        Some("csv") => read_csv_matrix(path),
        _ => Err(HicError::Design(
            ErrorInfo::new("hic_config.design_format", "unsupported design file format")
                .with_context("path", path.display().to_string())
                .with_hint("use a .json matrix or a headerless .csv"),
        )),
    }
}

fn read_csv_matrix(path: &Path) -> Result<Vec<Vec<f64>>, HicError> {
    let file = File::open(path).map_err(|err| io_error("hic_config.design_read", path, err))?;
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(file);
    let mut rows = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record.map_err(|err| csv_error("hic_config.csv_read", path, err))?;
        let row = record
            .iter()
            .map(|field| {
                field.parse::<f64>().map_err(|err| {
                    HicError::Design(
                        ErrorInfo::new("hic_config.design_value", err.to_string())
                            .with_context("path", path.display().to_string())
                            .with_context("row", idx.to_string())
                            .with_context("field", field),
                    )
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        rows.push(row);
    }
    Ok(rows)
}

fn csv_error(code: &str, path: &Path, err: csv::Error) -> HicError {
    HicError::Serde(
        ErrorInfo::new(code, err.to_string()).with_context("path", path.display().to_string()),
    )
}
