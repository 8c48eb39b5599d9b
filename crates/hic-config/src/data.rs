//! Model output, experimental data and covariance contracts.
//!
//! Both model and experimental data are nested as
//! `system -> observable -> subobservable -> block`. Keys are kept in
//! `BTreeMap`s so bins are always enumerated in the same order.

use std::collections::BTreeMap;

use hic_core::errors::{ErrorInfo, HicError};
use serde::{Deserialize, Serialize};

/// `system -> observable -> subobservable -> T`.
pub type Nested<T> = BTreeMap<String, BTreeMap<String, BTreeMap<String, T>>>;

/// Location of a block inside a [`Nested`] map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct BlockPath<'a> {
    /// System identifier key, e.g. `PbPb5020`.
    pub system: &'a str,
    /// Observable name, e.g. `R_AA`.
    pub observable: &'a str,
    /// Subobservable key, usually a centrality class such as `30-50`.
    pub subobservable: &'a str,
}

impl BlockPath<'_> {
    fn annotate(&self, info: ErrorInfo) -> ErrorInfo {
        info.with_context("system", self.system)
            .with_context("observable", self.observable)
            .with_context("subobservable", self.subobservable)
    }
}

/// Iterates over every block of a nested map in key order.
pub fn blocks<T>(nested: &Nested<T>) -> impl Iterator<Item = (BlockPath<'_>, &T)> {
    nested.iter().flat_map(|(system, observables)| {
        observables.iter().flat_map(move |(observable, subs)| {
            subs.iter().map(move |(subobservable, block)| {
                (
                    BlockPath {
                        system,
                        observable,
                        subobservable,
                    },
                    block,
                )
            })
        })
    })
}

fn lookup<'a, T>(nested: &'a Nested<T>, path: &BlockPath<'_>) -> Option<&'a T> {
    nested
        .get(path.system)?
        .get(path.observable)?
        .get(path.subobservable)
}

/// Model output for one subobservable across all design points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelBlock {
    /// `n x p` outputs, one row per design point.
    #[serde(rename = "Y")]
    pub y: Vec<Vec<f64>>,
    /// Numeric index of the `p` columns (pT for the example data).
    pub x: Vec<f64>,
}

impl ModelBlock {
    /// Checks `Y` has `design_points` rows of `x.len()` columns.
    pub fn validate(&self, design_points: usize) -> Result<(), ErrorInfo> {
        if self.y.len() != design_points {
            return Err(ErrorInfo::new(
                "hic_config.model_rows",
                "model output rows differ from the number of design points",
            )
            .with_context("expected", design_points.to_string())
            .with_context("found", self.y.len().to_string()));
        }
        if let Some((row, values)) = self
            .y
            .iter()
            .enumerate()
            .find(|(_, values)| values.len() != self.x.len())
        {
            return Err(ErrorInfo::new(
                "hic_config.model_columns",
                "model output row length differs from x",
            )
            .with_context("row", row.to_string())
            .with_context("expected", self.x.len().to_string())
            .with_context("found", values.len().to_string()));
        }
        Ok(())
    }
}

/// Model outputs keyed by system, observable and subobservable.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelOutput(pub Nested<ModelBlock>);

impl ModelOutput {
    /// Checks every block against the number of design points.
    pub fn validate(&self, design_points: usize) -> Result<(), HicError> {
        for (path, block) in blocks(&self.0) {
            block
                .validate(design_points)
                .map_err(|info| HicError::Shape(path.annotate(info)))?;
        }
        Ok(())
    }

    /// Checks every block shares one point count and returns it.
    pub fn validate_uniform(&self) -> Result<usize, HicError> {
        let points = blocks(&self.0)
            .next()
            .map(|(_, block)| block.y.len())
            .ok_or_else(|| {
                HicError::Config(ErrorInfo::new(
                    "hic_config.model_empty",
                    "model output has no blocks",
                ))
            })?;
        self.validate(points)?;
        Ok(points)
    }

    /// Iterates over every block in key order.
    pub fn blocks(&self) -> impl Iterator<Item = (BlockPath<'_>, &ModelBlock)> {
        blocks(&self.0)
    }

    /// Looks up one block.
    pub fn block(&self, path: &BlockPath<'_>) -> Option<&ModelBlock> {
        lookup(&self.0, path)
    }
}

/// Statistical and systematic uncertainties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBars {
    /// Statistical uncertainty per bin.
    pub stat: Vec<f64>,
    /// Systematic uncertainty per bin.
    pub sys: Vec<f64>,
}

/// Measured values for one subobservable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentalBlock {
    /// Measured values.
    pub y: Vec<f64>,
    /// Bin centres.
    pub x: Vec<f64>,
    /// Uncertainties on `y`.
    pub yerr: ErrorBars,
}

impl ExperimentalBlock {
    /// Number of bins.
    pub fn len(&self) -> usize {
        self.y.len()
    }

    /// Returns `true` when the block has no bins.
    pub fn is_empty(&self) -> bool {
        self.y.is_empty()
    }

    /// Checks `y`, `x`, `stat` and `sys` have the same length.
    pub fn validate(&self) -> Result<(), ErrorInfo> {
        let expected = self.y.len();
        for (name, len) in [
            ("x", self.x.len()),
            ("yerr.stat", self.yerr.stat.len()),
            ("yerr.sys", self.yerr.sys.len()),
        ] {
            if len != expected {
                return Err(ErrorInfo::new(
                    "hic_config.experiment_length",
                    "experimental arrays differ in length",
                )
                .with_context("field", name)
                .with_context("expected", expected.to_string())
                .with_context("found", len.to_string()));
            }
        }
        Ok(())
    }
}

/// Experimental data keyed by system, observable and subobservable.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExperimentalData(pub Nested<ExperimentalBlock>);

impl ExperimentalData {
    /// Checks every block is internally consistent.
    pub fn validate(&self) -> Result<(), HicError> {
        for (path, block) in blocks(&self.0) {
            block
                .validate()
                .map_err(|info| HicError::Shape(path.annotate(info)))?;
        }
        Ok(())
    }

    /// Iterates over every block in key order.
    pub fn blocks(&self) -> impl Iterator<Item = (BlockPath<'_>, &ExperimentalBlock)> {
        blocks(&self.0)
    }

    /// Total number of bins across all blocks.
    pub fn bins(&self) -> usize {
        self.blocks().map(|(_, block)| block.len()).sum()
    }

    /// Every bin as its block path and bin centre, in block order.
    pub fn bin_centres(&self) -> impl Iterator<Item = (BlockPath<'_>, f64)> {
        self.blocks()
            .flat_map(|(path, block)| block.x.iter().map(move |x| (path, *x)))
    }

    /// All measured values concatenated in block order.
    pub fn flat_y(&self) -> Vec<f64> {
        self.blocks()
            .flat_map(|(_, block)| block.y.iter().copied())
            .collect()
    }

    /// Uncorrelated covariance `diag(stat^2 + sys^2)` in block order.
    pub fn diagonal_covariance(&self) -> Covariance {
        let variances: Vec<f64> = self
            .blocks()
            .flat_map(|(_, block)| {
                block
                    .yerr
                    .stat
                    .iter()
                    .zip(&block.yerr.sys)
                    .map(|(stat, sys)| stat * stat + sys * sys)
            })
            .collect();
        let dim = variances.len();
        let mut matrix = vec![vec![0.0; dim]; dim];
        for (idx, variance) in variances.into_iter().enumerate() {
            matrix[idx][idx] = variance;
        }
        Covariance(matrix)
    }
}

/// Experimental covariance over all bins, in [`ExperimentalData::blocks`] order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Covariance(pub Vec<Vec<f64>>);

const SYMMETRY_TOLERANCE: f64 = 1e-9;

impl Covariance {
    /// Matrix dimension (number of rows).
    pub fn dim(&self) -> usize {
        self.0.len()
    }

    /// Checks the matrix is `dim x dim`, finite and symmetric.
    pub fn validate(&self, dim: usize) -> Result<(), HicError> {
        if self.dim() != dim {
            return Err(HicError::Shape(
                ErrorInfo::new(
                    "hic_config.covariance_dim",
                    "covariance dimension differs from the number of bins",
                )
                .with_context("expected", dim.to_string())
                .with_context("found", self.dim().to_string()),
            ));
        }
        for (idx, row) in self.0.iter().enumerate() {
            if row.len() != dim {
                return Err(HicError::Shape(
                    ErrorInfo::new("hic_config.covariance_square", "covariance is not square")
                        .with_context("row", idx.to_string())
                        .with_context("found", row.len().to_string()),
                ));
            }
            if row.iter().any(|value| !value.is_finite()) {
                return Err(HicError::Shape(
                    ErrorInfo::new("hic_config.covariance_value", "covariance is not finite")
                        .with_context("row", idx.to_string()),
                ));
            }
        }
        for i in 0..dim {
            for j in (i + 1)..dim {
                let (a, b) = (self.0[i][j], self.0[j][i]);
                let scale = a.abs().max(b.abs()).max(f64::MIN_POSITIVE);
                if (a - b).abs() > SYMMETRY_TOLERANCE * scale {
                    return Err(HicError::Shape(
                        ErrorInfo::new("hic_config.covariance_symmetry", "covariance is not symmetric")
                            .with_context("row", i.to_string())
                            .with_context("col", j.to_string()),
                    ));
                }
            }
        }
        Ok(())
    }
}
