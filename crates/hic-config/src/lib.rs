#![deny(missing_docs)]
//! Project configuration for heavy-ion collision emulation and calibration.
//!
//! A project is described by one YAML file holding the collision systems,
//! the design space, model outputs, experimental data and the experimental
//! covariance. [`ProjectConfig::resolve`] checks it against a [`Workdir`] and
//! returns the immutable [`ResolvedProject`] handed to downstream stages.

mod config;
mod data;
mod design;
/// Canonical hashing helpers.
mod hash;
pub mod logging;
/// Canonical JSON and YAML serde helpers.
mod serde;
mod workdir;

pub use config::{ProjectConfig, ResolvedProject};
pub use data::{
    blocks, BlockPath, Covariance, ErrorBars, ExperimentalBlock, ExperimentalData, ModelBlock,
    ModelOutput, Nested,
};
pub use design::{latin_hypercube, DesignMatrix, DesignParameter, DesignSource, DesignSpace};
pub use hash::stable_hash_string;
pub use logging::{init_logging, init_logging_at, BracketFormat};
pub use workdir::{Workdir, CACHE_DIR_NAME, WORKDIR_ENV};

pub use serde::{from_json_slice, from_yaml_str, to_canonical_json_bytes, to_yaml_string};
