use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use hic_config::{ProjectConfig, Workdir};

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// YAML project file.
    #[arg(long)]
    pub config: PathBuf,
}

pub fn run(args: &ValidateArgs, workdir: &Workdir) -> Result<(), Box<dyn Error>> {
    let project = ProjectConfig::load(&args.config)?.resolve(workdir)?;
    println!(
        "ok {} ({} systems, {} design points, {} bins)",
        project.fingerprint(),
        project.systems().len(),
        project.design().n_points(),
        project.bins()
    );
    Ok(())
}
