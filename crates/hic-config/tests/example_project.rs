use std::path::PathBuf;

use hic_config::{ProjectConfig, Workdir};
use tempfile::tempdir;

fn example_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../configs/pbpb5020_raa.yaml")
}

#[test]
fn shipped_example_resolves() {
    let temp = tempdir().expect("tmp dir");
    let workdir = Workdir::new(temp.path());
    workdir.ensure().expect("cache dir");

    let config = ProjectConfig::load(&example_path()).expect("load example");
    let project = config.resolve(&workdir).expect("resolve example");

    let systems: Vec<String> = project.systems().iter().map(|s| s.to_string()).collect();
    assert_eq!(systems, vec!["PbPb5020"]);
    assert_eq!(project.observables().len(), 5);
    assert_eq!(project.observables()[4].pt, 32.0);

    let keys: Vec<&str> = project.parameters().iter().map(|p| p.key.as_str()).collect();
    assert_eq!(keys, vec!["lambda_jet", "alpha_s"]);
    assert_eq!(project.design().n_points(), 24);
    assert_eq!(project.design().n_params(), 2);
    for (param, idx) in project.parameters().iter().zip(0..) {
        for row in project.design().rows() {
            assert!(row[idx] >= param.min && row[idx] <= param.max);
        }
    }

    assert_eq!(project.bins(), 5);
    assert_eq!(project.covariance(), config.covariance.as_ref().unwrap());
    assert_eq!(project.experiment().flat_y()[0], 0.457);
    assert!(project.validation().is_none());
}

#[test]
fn fingerprint_is_stable_across_loads() {
    let temp = tempdir().expect("tmp dir");
    let workdir = Workdir::new(temp.path());
    let first = ProjectConfig::load(&example_path()).unwrap();
    let second = ProjectConfig::load(&example_path()).unwrap();
    assert_eq!(first.fingerprint().unwrap(), second.fingerprint().unwrap());

    let a = first.resolve(&workdir).unwrap();
    let b = second.resolve(&workdir).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.fingerprint().len(), 64);
}

#[test]
fn missing_project_file_is_an_io_error() {
    let temp = tempdir().expect("tmp dir");
    let err = ProjectConfig::load(&temp.path().join("absent.yaml")).unwrap_err();
    assert!(matches!(err, hic_core::HicError::Io(_)));
    assert_eq!(err.info().code, "hic_config.read_project");
}
