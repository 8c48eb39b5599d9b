use std::error::Error;

use clap::Args;
use hic_config::to_canonical_json_bytes;
use hic_core::{parse_system, HicError};
use serde::Serialize;

#[derive(Args, Debug)]
pub struct ParseSystemArgs {
    /// System identifiers, e.g. PbPb5020 AuAu200 pPb5020.
    #[arg(required = true)]
    pub systems: Vec<String>,
}

#[derive(Debug, Serialize)]
struct ParsedSystem {
    system: String,
    projectiles: [String; 2],
    energy_gev: u64,
}

pub fn run(args: &ParseSystemArgs) -> Result<(), Box<dyn Error>> {
    for id in &args.systems {
        let parsed = describe(id)?;
        let json = to_canonical_json_bytes(&parsed)?;
        println!("{}", String::from_utf8(json)?);
    }
    Ok(())
}

fn describe(id: &str) -> Result<ParsedSystem, HicError> {
    let system = parse_system(id)?;
    let canonical = system.to_string();
    let ((first, second), energy_gev) = system.into_parts();
    Ok(ParsedSystem {
        system: canonical,
        projectiles: [first, second],
        energy_gev,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describes_asymmetric_system() {
        let parsed = describe("pPb5020").unwrap();
        assert_eq!(parsed.projectiles, ["p".to_string(), "Pb".to_string()]);
        assert_eq!(parsed.energy_gev, 5020);
        let json = String::from_utf8(to_canonical_json_bytes(&parsed).unwrap()).unwrap();
        assert_eq!(
            json,
            r#"{"energy_gev":5020,"projectiles":["p","Pb"],"system":"pPb5020"}"#
        );
    }

    #[test]
    fn reports_match_failure() {
        assert!(describe("PbPb").unwrap_err().is_match_failure());
    }
}
