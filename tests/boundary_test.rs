use build_exporter::boundary::BoundaryWarning;
use build_exporter::ui;

// ============================================================================
// BoundaryWarning Display Tests
// ============================================================================

#[test]
fn test_boundary_warning_build_number_drift_display() {
    let warning = BoundaryWarning::BuildNumberDrift { android: 5, ios: 7 };

    let display_msg = warning.to_string();
    assert!(
        display_msg.contains("(5)") && display_msg.contains("(7)"),
        "Message should contain both build numbers, got: {}",
        display_msg
    );
    assert!(
        display_msg.ends_with("continuing from 7"),
        "Message should name the baseline, got: {}",
        display_msg
    );
}

#[test]
fn test_boundary_warning_version_regression_display() {
    let warning = BoundaryWarning::VersionRegression {
        current: "2.0.0".to_string(),
        requested: "1.9.0".to_string(),
    };

    let display_msg = warning.to_string();
    assert!(
        display_msg.contains("'1.9.0'") && display_msg.contains("'2.0.0'"),
        "Message should contain both versions, got: {}",
        display_msg
    );
}

#[test]
fn test_boundary_warning_build_number_regression_display() {
    let warning = BoundaryWarning::BuildNumberRegression {
        baseline: 12,
        requested: 3,
    };

    let display_msg = warning.to_string();
    assert!(
        display_msg.contains("3") && display_msg.contains("12"),
        "Message should contain both build numbers, got: {}",
        display_msg
    );
}

#[test]
fn test_boundary_warning_no_scenes_display() {
    let display_msg = BoundaryWarning::NoScenes.to_string();
    assert!(
        display_msg.contains("No enabled scenes"),
        "Message should explain the empty scene list, got: {}",
        display_msg
    );
}

#[test]
fn test_boundary_warning_stamp_only_display() {
    let display_msg = BoundaryWarning::StampOnly.to_string();
    assert!(
        display_msg.contains("stamping version without building"),
        "Message should explain stamp-only mode, got: {}",
        display_msg
    );
}

// ============================================================================
// BoundaryWarning Equality Tests
// ============================================================================

#[test]
fn test_boundary_warning_equality() {
    let a = BoundaryWarning::BuildNumberDrift { android: 1, ios: 2 };
    let b = BoundaryWarning::BuildNumberDrift { android: 1, ios: 2 };
    let c = BoundaryWarning::BuildNumberDrift { android: 2, ios: 1 };

    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_ne!(BoundaryWarning::NoScenes, BoundaryWarning::StampOnly);
}

// ============================================================================
// UI Display Tests
// ============================================================================

#[test]
fn test_display_boundary_warning_does_not_panic() {
    // Visual verification test - output is printed to stderr
    for warning in [
        BoundaryWarning::BuildNumberDrift { android: 5, ios: 7 },
        BoundaryWarning::NoScenes,
        BoundaryWarning::StampOnly,
    ] {
        ui::display_boundary_warning(&warning);
    }
}
