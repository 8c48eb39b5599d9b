use std::fs;
use std::path::PathBuf;

use hic_config::{latin_hypercube, DesignParameter, DesignSource, DesignSpace, Workdir};
use hic_core::HicError;
use proptest::prelude::*;
use tempfile::tempdir;

fn params() -> Vec<DesignParameter> {
    vec![
        DesignParameter {
            key: "lambda_jet".into(),
            label: Some("$\\lambda_{jet}$".into()),
            min: 0.01,
            max: 0.3,
        },
        DesignParameter {
            key: "alpha_s".into(),
            label: None,
            min: 0.05,
            max: 0.35,
        },
    ]
}

fn space(source: DesignSource) -> DesignSpace {
    DesignSpace {
        parameters: params(),
        source,
    }
}

#[test]
fn accessors_follow_declaration_order() {
    let design = space(DesignSource::Lhs { points: 4, seed: 1 });
    assert_eq!(design.keys(), vec!["lambda_jet", "alpha_s"]);
    assert_eq!(design.labels(), vec!["$\\lambda_{jet}$", "alpha_s"]);
    assert_eq!(design.ranges(), vec![(0.01, 0.3), (0.05, 0.35)]);
}

#[test]
fn lhs_is_deterministic_per_seed() {
    let temp = tempdir().expect("tmp dir");
    let workdir = Workdir::new(temp.path());
    let a = space(DesignSource::Lhs { points: 24, seed: 7 }).materialize(&workdir).unwrap();
    let b = space(DesignSource::Lhs { points: 24, seed: 7 }).materialize(&workdir).unwrap();
    let c = space(DesignSource::Lhs { points: 24, seed: 8 }).materialize(&workdir).unwrap();
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(a.n_points(), 24);
    assert_eq!(a.columns().to_vec(), vec!["lambda_jet".to_string(), "alpha_s".to_string()]);
}

#[test]
fn zero_lhs_points_is_a_design_error() {
    let err = latin_hypercube(&params(), 0, 1).unwrap_err();
    assert!(matches!(err, HicError::Design(_)));
}

#[test]
fn inline_rows_must_have_one_value_per_parameter() {
    let temp = tempdir().expect("tmp dir");
    let design = space(DesignSource::Inline {
        matrix: vec![vec![0.1, 0.2], vec![0.1]],
    });
    let err = design.materialize(&Workdir::new(temp.path())).unwrap_err();
    assert!(matches!(err, HicError::Shape(_)));
    assert_eq!(err.info().context.get("row").map(String::as_str), Some("1"));
}

#[test]
fn empty_matrix_is_rejected() {
    let temp = tempdir().expect("tmp dir");
    let design = space(DesignSource::Inline { matrix: vec![] });
    let err = design.materialize(&Workdir::new(temp.path())).unwrap_err();
    assert_eq!(err.info().code, "hic_config.design_points");
}

#[test]
fn out_of_range_points_are_accepted() {
    let temp = tempdir().expect("tmp dir");
    let design = space(DesignSource::Inline {
        matrix: vec![vec![0.5, 0.2]],
    });
    let matrix = design.materialize(&Workdir::new(temp.path())).unwrap();
    assert_eq!(matrix.column("lambda_jet"), Some(vec![0.5]));
    assert_eq!(matrix.column("missing"), None);
}

#[test]
fn parameter_declarations_are_checked() {
    let mut inverted = space(DesignSource::Lhs { points: 2, seed: 0 });
    inverted.parameters[0].max = inverted.parameters[0].min;
    assert_eq!(
        inverted.validate_parameters().unwrap_err().info().code,
        "hic_config.design_range"
    );

    let mut duplicate = space(DesignSource::Lhs { points: 2, seed: 0 });
    duplicate.parameters[1].key = "lambda_jet".into();
    assert_eq!(
        duplicate.validate_parameters().unwrap_err().info().code,
        "hic_config.design_key"
    );

    let empty = DesignSpace {
        parameters: vec![],
        source: DesignSource::Lhs { points: 2, seed: 0 },
    };
    assert_eq!(
        empty.validate_parameters().unwrap_err().info().code,
        "hic_config.design_empty"
    );
}

#[test]
fn written_designs_load_back_from_the_cache() {
    let temp = tempdir().expect("tmp dir");
    let workdir = Workdir::new(temp.path());
    let generated = space(DesignSource::Lhs { points: 10, seed: 42 })
        .materialize(&workdir)
        .unwrap();

    let csv_path = workdir.prepare_output("lhs/design.csv").unwrap();
    generated.write_csv(&csv_path).unwrap();
    let from_csv = space(DesignSource::File {
        path: PathBuf::from("lhs/design.csv"),
    })
    .materialize(&workdir)
    .unwrap();
    assert_eq!(from_csv, generated);

    let json_path = workdir.prepare_output("lhs/design.json").unwrap();
    generated.write_json(&json_path).unwrap();
    let from_json = space(DesignSource::File {
        path: PathBuf::from("lhs/design.json"),
    })
    .materialize(&workdir)
    .unwrap();
    assert_eq!(from_json, generated);
}

#[test]
fn file_source_errors() {
    let temp = tempdir().expect("tmp dir");
    let workdir = Workdir::new(temp.path());

    let missing = space(DesignSource::File {
        path: PathBuf::from("lhs/absent.csv"),
    });
    assert!(matches!(
        missing.materialize(&workdir).unwrap_err(),
        HicError::Io(_)
    ));

    let pickle = space(DesignSource::File {
        path: PathBuf::from("lhs/design_s.p"),
    });
    assert_eq!(
        pickle.materialize(&workdir).unwrap_err().info().code,
        "hic_config.design_format"
    );

    let bad_path = workdir.prepare_output("lhs/bad.csv").unwrap();
    fs::write(&bad_path, "0.1,0.2\n0.1,abc\n").unwrap();
    let bad = space(DesignSource::File {
        path: PathBuf::from("lhs/bad.csv"),
    });
    let err = bad.materialize(&workdir).unwrap_err();
    assert_eq!(err.info().code, "hic_config.design_value");
    assert_eq!(err.info().context.get("row").map(String::as_str), Some("1"));
}

proptest! {
    #[test]
    fn lhs_places_one_point_per_stratum(points in 1usize..40, seed in any::<u64>()) {
        let params = params();
        let rows = latin_hypercube(&params, points, seed).unwrap();
        prop_assert_eq!(rows.len(), points);
        for (col, param) in params.iter().enumerate() {
            let mut strata: Vec<usize> = rows
                .iter()
                .map(|row| {
                    let frac = (row[col] - param.min) / (param.max - param.min);
                    (frac * points as f64).floor() as usize
                })
                .collect();
            strata.sort_unstable();
            prop_assert_eq!(strata, (0..points).collect::<Vec<_>>());
        }
    }
}
