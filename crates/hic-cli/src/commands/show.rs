use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use hic_config::{to_canonical_json_bytes, to_yaml_string, ProjectConfig, ResolvedProject, Workdir};
use serde::Serialize;

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// YAML project file.
    #[arg(long)]
    pub config: PathBuf,
    /// Print YAML instead of canonical JSON.
    #[arg(long)]
    pub yaml: bool,
}

#[derive(Debug, Serialize)]
struct ParameterSummary {
    key: String,
    label: String,
    min: f64,
    max: f64,
}

#[derive(Debug, Serialize)]
struct ProjectSummary {
    fingerprint: String,
    systems: Vec<String>,
    parameters: Vec<ParameterSummary>,
    design_points: usize,
    observables: Vec<String>,
    blocks: Vec<String>,
    bins: usize,
    validation_blocks: usize,
}

pub fn run(args: &ShowArgs, workdir: &Workdir) -> Result<(), Box<dyn Error>> {
    let config = ProjectConfig::load(&args.config)?;
    let project = config.resolve(workdir)?;
    let summary = summarize(&project);
    if args.yaml {
        print!("{}", to_yaml_string(&summary)?);
    } else {
        let json = to_canonical_json_bytes(&summary)?;
        println!("{}", String::from_utf8(json)?);
    }
    Ok(())
}

fn summarize(project: &ResolvedProject) -> ProjectSummary {
    ProjectSummary {
        fingerprint: project.fingerprint().to_string(),
        systems: project.systems().iter().map(ToString::to_string).collect(),
        parameters: project
            .parameters()
            .iter()
            .map(|param| ParameterSummary {
                key: param.key.clone(),
                label: param.display_label().to_string(),
                min: param.min,
                max: param.max,
            })
            .collect(),
        design_points: project.design().n_points(),
        observables: project.observables().iter().map(ToString::to_string).collect(),
        blocks: project
            .experiment()
            .blocks()
            .map(|(path, _)| format!("{}/{}/{}", path.system, path.observable, path.subobservable))
            .collect(),
        bins: project.bins(),
        validation_blocks: project
            .validation()
            .map(|validation| validation.blocks().count())
            .unwrap_or(0),
    }
}
