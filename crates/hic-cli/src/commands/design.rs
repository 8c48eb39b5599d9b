use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use hic_config::{ProjectConfig, Workdir};
use tracing::info;

#[derive(Args, Debug)]
pub struct DesignArgs {
    /// YAML project file.
    #[arg(long)]
    pub config: PathBuf,
    /// Output CSV path relative to the cache directory; a JSON copy is
    /// written next to it.
    #[arg(long, default_value = "lhs/design.csv")]
    pub out: PathBuf,
}

pub fn run(args: &DesignArgs, workdir: &Workdir) -> Result<(), Box<dyn Error>> {
    let config = ProjectConfig::load(&args.config)?;
    let matrix = config.design.materialize(workdir)?;
    let csv_path = workdir.prepare_output(&args.out)?;
    matrix.write_csv(&csv_path)?;
    let json_path = csv_path.with_extension("json");
    matrix.write_json(&json_path)?;
    info!(
        points = matrix.n_points(),
        params = matrix.n_params(),
        csv = %csv_path.display(),
        "design matrix written"
    );
    println!("{}", csv_path.display());
    Ok(())
}
