//! Project configuration: the single immutable description of a calibration
//! project, loaded once at startup and passed by reference.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use hic_core::errors::{ErrorInfo, HicError};
use hic_core::{parse_system, CollisionSystem, LazyMap, ObservableId};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::data::{Covariance, ExperimentalData, ModelOutput};
use crate::design::{DesignMatrix, DesignParameter, DesignSpace};
use crate::hash::stable_hash_string;
use crate::serde::from_yaml_str;
use crate::workdir::{io_error, Workdir};

/// Project file contents as written by the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    /// Collision systems, e.g. `["PbPb5020"]`. A single system is still a list.
    pub systems: Vec<String>,
    /// Observable bin identifiers, `obs:<name>-sys:<system>-pT:<value>`.
    #[serde(default)]
    pub observables: Vec<String>,
    /// Input parameters and design matrix source.
    pub design: DesignSpace,
    /// Model output at the design points.
    pub model: ModelOutput,
    /// Model output at separate validation points.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<ModelOutput>,
    /// Measured data.
    pub experiment: ExperimentalData,
    /// Experimental covariance; the diagonal of the quoted errors when omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub covariance: Option<Covariance>,
}

impl ProjectConfig {
    /// Parses a YAML project file body.
    pub fn from_yaml_str(text: &str) -> Result<Self, HicError> {
        from_yaml_str(text)
    }

    /// Reads and parses a YAML project file.
    pub fn load(path: &Path) -> Result<Self, HicError> {
        let text = fs::read_to_string(path)
            .map_err(|err| io_error("hic_config.read_project", path, err))?;
        let config = Self::from_yaml_str(&text).map_err(|err| match err {
            HicError::Serde(info) => {
                HicError::Serde(info.with_context("path", path.display().to_string()))
            }
            other => other,
        })?;
        debug!(path = %path.display(), "project file loaded");
        Ok(config)
    }

    /// SHA-256 of the canonical JSON encoding.
    pub fn fingerprint(&self) -> Result<String, HicError> {
        stable_hash_string(self)
    }

    /// Materializes the design, validates every cross-reference and shape,
    /// and freezes the result.
    pub fn resolve(&self, workdir: &Workdir) -> Result<ResolvedProject, HicError> {
        let mut parsed = LazyMap::new(|id: &String| parse_system(id));

        if self.systems.is_empty() {
            return Err(HicError::Config(
                ErrorInfo::new("hic_config.systems_empty", "project declares no systems")
                    .with_hint("a single system is still written as a list"),
            ));
        }
        let mut systems = Vec::with_capacity(self.systems.len());
        for id in &self.systems {
            let system = parsed.get(id.clone())?;
            if systems.contains(system) {
                return Err(HicError::Config(
                    ErrorInfo::new("hic_config.systems_duplicate", "system declared twice")
                        .with_context("system", id.clone()),
                ));
            }
            systems.push(system.clone());
        }
        let declared: BTreeSet<&CollisionSystem> = systems.iter().collect();

        let mut observables = Vec::with_capacity(self.observables.len());
        for id in &self.observables {
            let observable = ObservableId::parse(id)?;
            if !declared.contains(&observable.system) {
                return Err(undeclared_system("observables", &observable.system.to_string()));
            }
            observables.push(observable);
        }

        let data_keys = self
            .model
            .0
            .keys()
            .map(|key| ("model", key))
            .chain(self.experiment.0.keys().map(|key| ("experiment", key)))
            .chain(
                self.validation
                    .iter()
                    .flat_map(|validation| validation.0.keys().map(|key| ("validation", key))),
            );
        for (section, key) in data_keys {
            let system = parsed.get(key.clone())?;
            if !declared.contains(system) {
                return Err(undeclared_system(section, key));
            }
        }

        let design = self.design.materialize(workdir)?;
        self.model.validate(design.n_points())?;
        if let Some(validation) = &self.validation {
            let points = validation.validate_uniform()?;
            debug!(points, "validation output checked");
        }

        self.experiment.validate()?;
        let bins = self.experiment.bins();
        if bins == 0 {
            return Err(HicError::Config(ErrorInfo::new(
                "hic_config.experiment_empty",
                "experimental data has no bins",
            )));
        }
        if !observables.is_empty() && observables.len() != bins {
            return Err(HicError::Shape(
                ErrorInfo::new(
                    "hic_config.observable_count",
                    "observable list differs from the number of experimental bins",
                )
                .with_context("observables", observables.len().to_string())
                .with_context("bins", bins.to_string()),
            ));
        }
        for (index, (observable, (path, x))) in
            observables.iter().zip(self.experiment.bin_centres()).enumerate()
        {
            let system = parsed.get(path.system.to_string())?;
            if observable.system != *system
                || observable.name != path.observable
                || !same_bin(observable.pt, x)
            {
                return Err(HicError::Shape(
                    ErrorInfo::new(
                        "hic_config.observable_bin",
                        "observable does not match the experimental bin at its position",
                    )
                    .with_context("index", index.to_string())
                    .with_context("observable", observable.to_string())
                    .with_context("system", path.system)
                    .with_context("name", path.observable)
                    .with_context("x", format!("{x:?}"))
                    .with_hint("list observables in system, observable, subobservable and x order"),
                ));
            }
        }
        self.check_model_coverage()?;

        let covariance = match &self.covariance {
            Some(covariance) => {
                covariance.validate(bins)?;
                covariance.clone()
            }
            None => {
                info!(bins, "no covariance given, using diagonal of stat and sys errors");
                self.experiment.diagonal_covariance()
            }
        };

        let fingerprint = self.fingerprint()?;
        info!(
            systems = systems.len(),
            parameters = design.n_params(),
            points = design.n_points(),
            bins,
            fingerprint = %&fingerprint[..12],
            "project resolved"
        );
        Ok(ResolvedProject {
            systems,
            observables,
            parameters: self.design.parameters.clone(),
            design,
            model: self.model.clone(),
            validation: self.validation.clone(),
            experiment: self.experiment.clone(),
            covariance,
            fingerprint,
        })
    }

    fn check_model_coverage(&self) -> Result<(), HicError> {
        for (path, exp) in self.experiment.blocks() {
            let model = self.model.block(&path).ok_or_else(|| {
                HicError::Config(
                    ErrorInfo::new(
                        "hic_config.model_missing",
                        "experimental block has no model output",
                    )
                    .with_context("system", path.system)
                    .with_context("observable", path.observable)
                    .with_context("subobservable", path.subobservable),
                )
            })?;
            if model.x.len() != exp.len() {
                return Err(HicError::Shape(
                    ErrorInfo::new(
                        "hic_config.model_bins",
                        "model output and experiment differ in bin count",
                    )
                    .with_context("system", path.system)
                    .with_context("observable", path.observable)
                    .with_context("subobservable", path.subobservable)
                    .with_context("model", model.x.len().to_string())
                    .with_context("experiment", exp.len().to_string()),
                ));
            }
        }
        Ok(())
    }
}

fn same_bin(pt: f64, x: f64) -> bool {
    (pt - x).abs() <= 1e-9 * pt.abs().max(x.abs()).max(1.0)
}

fn undeclared_system(section: &str, system: &str) -> HicError {
    HicError::Config(
        ErrorInfo::new("hic_config.system_undeclared", "system is not listed in `systems`")
            .with_context("section", section)
            .with_context("system", system),
    )
}

/// Validated, read-only view of a project.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedProject {
    systems: Vec<CollisionSystem>,
    observables: Vec<ObservableId>,
    parameters: Vec<DesignParameter>,
    design: DesignMatrix,
    model: ModelOutput,
    validation: Option<ModelOutput>,
    experiment: ExperimentalData,
    covariance: Covariance,
    fingerprint: String,
}

impl ResolvedProject {
    /// Parsed collision systems in declaration order.
    pub fn systems(&self) -> &[CollisionSystem] {
        &self.systems
    }

    /// Parsed observable bins in declaration order.
    pub fn observables(&self) -> &[ObservableId] {
        &self.observables
    }

    /// Design parameters in column order.
    pub fn parameters(&self) -> &[DesignParameter] {
        &self.parameters
    }

    /// Materialized design matrix.
    pub fn design(&self) -> &DesignMatrix {
        &self.design
    }

    /// Model output at the design points.
    pub fn model(&self) -> &ModelOutput {
        &self.model
    }

    /// Model output at validation points, if any.
    pub fn validation(&self) -> Option<&ModelOutput> {
        self.validation.as_ref()
    }

    /// Measured data.
    pub fn experiment(&self) -> &ExperimentalData {
        &self.experiment
    }

    /// Experimental covariance, given or estimated.
    pub fn covariance(&self) -> &Covariance {
        &self.covariance
    }

    /// Fingerprint of the project file this view was resolved from.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// Total number of experimental bins.
    pub fn bins(&self) -> usize {
        self.covariance.dim()
    }
}
