use hic_core::errors::{ErrorInfo, HicError, SYSTEM_MATCH_CODE};

fn sample_info(code: &str, message: &str) -> ErrorInfo {
    ErrorInfo::new(code, message)
        .with_context("id", "1")
        .with_context("reason", "example")
}

#[test]
fn system_error_surface() {
    let err = HicError::System(sample_info(SYSTEM_MATCH_CODE, "no match"));
    assert!(err.is_match_failure());
    assert!(err.info().context.contains_key("id"));
}

#[test]
fn other_families_are_not_match_failures() {
    let errors = [
        HicError::System(sample_info("hic_core.system_energy", "overflow")),
        HicError::Observable(sample_info(SYSTEM_MATCH_CODE, "bad observable")),
        HicError::Design(sample_info("D001", "empty range")),
        HicError::Shape(sample_info("S001", "row mismatch")),
        HicError::Config(sample_info("C001", "unknown system")),
        HicError::Io(sample_info("I001", "permission denied")),
        HicError::Serde(sample_info("J001", "schema mismatch")),
    ];
    for err in &errors {
        assert!(!err.is_match_failure(), "{err}");
    }
}

#[test]
fn display_includes_context_and_hint() {
    let err = HicError::Shape(
        ErrorInfo::new("S002", "Y has wrong column count")
            .with_context("rows", "24")
            .with_context("cols", "4")
            .with_hint("match the length of x"),
    );
    assert_eq!(
        err.to_string(),
        "shape error: Y has wrong column count (code: S002) | context: [cols=4, rows=24] | hint: match the length of x"
    );
}

#[test]
fn errors_round_trip_json() {
    let err = HicError::Io(sample_info("I002", "cache dir missing").with_hint("set WORKDIR"));
    let json = serde_json::to_string(&err).expect("serialize");
    assert!(json.contains("\"family\":\"Io\""));
    let decoded: HicError = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(decoded, err);
}
