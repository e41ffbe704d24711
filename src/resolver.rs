//! Version and build-number resolution
//!
//! Resolution runs in three steps, all before anything is mutated:
//!
//! 1. [validate_persisted] gates on the persisted values. A corrupt version
//!    string or build number stops the session; nothing is "fixed forward".
//! 2. The version spec is applied to the persisted version.
//! 3. The build-number spec is applied, independently of step 2, to the
//!    baseline (the larger of the two platform build numbers).
//!
//! [StampedVersion::apply] then writes the pair back, putting the same
//! build number into both platform fields.

use crate::boundary::BoundaryWarning;
use crate::domain::{BuildNumber, BuildNumberSpec, SemanticVersion, VersionSpec};
use crate::error::{InvalidField, ValidationError};
use crate::settings::ProjectConfigStore;

pub const FIELD_BUNDLE_VERSION: &str = "bundle_version";
pub const FIELD_ANDROID_VERSION_CODE: &str = "android.version_code";
pub const FIELD_IOS_BUILD_NUMBER: &str = "ios.build_number";

/// Validated view of the persisted version fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersistedState {
    pub version: SemanticVersion,
    pub android_build_number: BuildNumber,
    pub ios_build_number: BuildNumber,
}

impl PersistedState {
    /// The build number a session continues from.
    ///
    /// Taking the larger value keeps whichever platform is ahead from
    /// silently going backwards once both fields are stamped.
    pub fn baseline(&self) -> BuildNumber {
        self.android_build_number.max(self.ios_build_number)
    }

    pub fn has_drift(&self) -> bool {
        self.android_build_number != self.ios_build_number
    }
}

/// Check the persisted version and both build numbers.
///
/// Both platform fields must be valid on their own, whichever platform is
/// active. All invalid fields are reported together.
pub fn validate_persisted<S: ProjectConfigStore + ?Sized>(
    store: &S,
) -> Result<PersistedState, ValidationError> {
    let mut fields = Vec::new();

    let raw_version = store.bundle_version();
    let version = SemanticVersion::parse(&raw_version).ok();
    if version.is_none() {
        fields.push(InvalidField {
            field: FIELD_BUNDLE_VERSION,
            value: raw_version,
        });
    }

    let raw_android = store.android_version_code();
    let android = BuildNumber::from_signed(raw_android);
    if android.is_none() {
        fields.push(InvalidField {
            field: FIELD_ANDROID_VERSION_CODE,
            value: raw_android.to_string(),
        });
    }

    let raw_ios = store.ios_build_number();
    let ios = raw_ios.parse::<BuildNumber>().ok();
    if ios.is_none() {
        fields.push(InvalidField {
            field: FIELD_IOS_BUILD_NUMBER,
            value: raw_ios,
        });
    }

    match (version, android, ios) {
        (Some(version), Some(android_build_number), Some(ios_build_number)) => {
            Ok(PersistedState {
                version,
                android_build_number,
                ios_build_number,
            })
        }
        _ => Err(ValidationError::PersistedStateInvalid { fields }),
    }
}

/// Resolve the version and build number a session will stamp.
pub fn resolve(
    state: &PersistedState,
    version_spec: &VersionSpec,
    build_number_spec: &BuildNumberSpec,
) -> Result<StampedVersion, ValidationError> {
    let version = resolve_version(&state.version, version_spec)?;
    let build_number = resolve_build_number(state.baseline(), build_number_spec)?;

    Ok(StampedVersion {
        version,
        build_number,
    })
}

fn resolve_version(
    current: &SemanticVersion,
    spec: &VersionSpec,
) -> Result<SemanticVersion, ValidationError> {
    match spec {
        VersionSpec::Unchanged => Ok(*current),
        VersionSpec::Bump(component) => {
            current
                .checked_bump(*component)
                .ok_or_else(|| ValidationError::VersionSpecInvalid {
                    value: component.to_string(),
                    reason: format!("bumping {} would overflow", current),
                })
        }
        VersionSpec::Explicit(text) => {
            SemanticVersion::parse(text).map_err(|e| ValidationError::VersionSpecInvalid {
                value: text.clone(),
                reason: e.reason.to_string(),
            })
        }
    }
}

fn resolve_build_number(
    baseline: BuildNumber,
    spec: &BuildNumberSpec,
) -> Result<BuildNumber, ValidationError> {
    match spec {
        BuildNumberSpec::Unchanged => Ok(baseline),
        BuildNumberSpec::Increment => {
            baseline
                .next()
                .ok_or_else(|| ValidationError::BuildNumberSpecInvalid {
                    value: crate::domain::spec::INCREMENT_TOKEN.to_string(),
                })
        }
        BuildNumberSpec::Explicit(text) => {
            text.parse::<BuildNumber>()
                .map_err(|_| ValidationError::BuildNumberSpecInvalid {
                    value: text.clone(),
                })
        }
    }
}

/// The version/build-number pair a session writes into the project.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StampedVersion {
    pub version: SemanticVersion,
    pub build_number: BuildNumber,
}

impl StampedVersion {
    /// Write the version string and the build number into both platform fields.
    pub fn apply<S: ProjectConfigStore + ?Sized>(&self, store: &mut S) {
        store.set_bundle_version(&self.version.to_string());
        store.set_android_version_code(i64::from(self.build_number.value()));
        store.set_ios_build_number(&self.build_number.to_string());
    }

    /// Non-fatal observations about this stamp relative to the persisted state.
    pub fn warnings(&self, state: &PersistedState) -> Vec<BoundaryWarning> {
        let mut warnings = Vec::new();

        if state.has_drift() {
            warnings.push(BoundaryWarning::BuildNumberDrift {
                android: state.android_build_number.value(),
                ios: state.ios_build_number.value(),
            });
        }
        if self.version < state.version {
            warnings.push(BoundaryWarning::VersionRegression {
                current: state.version.to_string(),
                requested: self.version.to_string(),
            });
        }
        if self.build_number < state.baseline() {
            warnings.push(BoundaryWarning::BuildNumberRegression {
                baseline: state.baseline().value(),
                requested: self.build_number.value(),
            });
        }

        warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Platform, VersionBump};
    use crate::settings::MemoryProjectStore;

    fn state(version: &str, android: u32, ios: u32) -> PersistedState {
        PersistedState {
            version: SemanticVersion::parse(version).unwrap(),
            android_build_number: BuildNumber::new(android),
            ios_build_number: BuildNumber::new(ios),
        }
    }

    fn explicit_version(text: &str) -> VersionSpec {
        VersionSpec::Explicit(text.to_string())
    }

    fn explicit_code(text: &str) -> BuildNumberSpec {
        BuildNumberSpec::Explicit(text.to_string())
    }

    #[test]
    fn test_validate_accepts_defaults() {
        let store = MemoryProjectStore::new(Platform::Android);
        let state = validate_persisted(&store).unwrap();
        assert_eq!(state.version, SemanticVersion::new(1, 0, 0));
        assert_eq!(state.baseline(), BuildNumber::new(0));
    }

    #[test]
    fn test_validate_rejects_negative_android_code() {
        let store = MemoryProjectStore::default().with_build_numbers(-1, "0");
        let err = validate_persisted(&store).unwrap_err();
        assert_eq!(
            err,
            ValidationError::PersistedStateInvalid {
                fields: vec![InvalidField {
                    field: FIELD_ANDROID_VERSION_CODE,
                    value: "-1".to_string()
                }]
            }
        );
    }

    #[test]
    fn test_validate_checks_ios_even_when_android_is_active() {
        let store = MemoryProjectStore::new(Platform::Android).with_build_numbers(3, "abc");
        assert!(matches!(
            validate_persisted(&store),
            Err(ValidationError::PersistedStateInvalid { .. })
        ));
    }

    #[test]
    fn test_validate_reports_every_invalid_field() {
        let store = MemoryProjectStore::default()
            .with_version("1.0")
            .with_build_numbers(-5, "-5");
        match validate_persisted(&store) {
            Err(ValidationError::PersistedStateInvalid { fields }) => {
                let names: Vec<_> = fields.iter().map(|f| f.field).collect();
                assert_eq!(
                    names,
                    vec![
                        FIELD_BUNDLE_VERSION,
                        FIELD_ANDROID_VERSION_CODE,
                        FIELD_IOS_BUILD_NUMBER
                    ]
                );
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_unchanged_specs_keep_current() {
        let stamp = resolve(
            &state("1.0.0", 0, 0),
            &VersionSpec::Unchanged,
            &BuildNumberSpec::Unchanged,
        )
        .unwrap();
        assert_eq!(stamp.version, SemanticVersion::new(1, 0, 0));
        assert_eq!(stamp.build_number, BuildNumber::new(0));
    }

    #[test]
    fn test_bump_keywords() {
        let s = state("1.0.0", 0, 0);
        let bump = |b| {
            resolve(&s, &VersionSpec::Bump(b), &BuildNumberSpec::Unchanged)
                .unwrap()
                .version
                .to_string()
        };
        assert_eq!(bump(VersionBump::Major), "2.0.0");
        assert_eq!(bump(VersionBump::Minor), "1.1.0");
        assert_eq!(bump(VersionBump::Patch), "1.0.1");
    }

    #[test]
    fn test_explicit_version() {
        let stamp = resolve(
            &state("1.0.0", 0, 0),
            &explicit_version("1.1.1"),
            &BuildNumberSpec::Unchanged,
        )
        .unwrap();
        assert_eq!(stamp.version.to_string(), "1.1.1");
    }

    #[test]
    fn test_explicit_version_missing_patch() {
        let err = resolve(
            &state("1.0.0", 0, 0),
            &explicit_version("1.1"),
            &BuildNumberSpec::Unchanged,
        )
        .unwrap_err();
        assert!(matches!(err, ValidationError::VersionSpecInvalid { ref value, .. } if value == "1.1"));
    }

    #[test]
    fn test_bump_overflow_is_rejected() {
        let s = state(&format!("{}.0.0", u32::MAX), 0, 0);
        assert!(matches!(
            resolve(&s, &VersionSpec::Bump(VersionBump::Major), &BuildNumberSpec::Unchanged),
            Err(ValidationError::VersionSpecInvalid { .. })
        ));
    }

    #[test]
    fn test_build_number_baseline_is_max() {
        let s = state("1.0.0", 5, 7);
        let unchanged = resolve(&s, &VersionSpec::Unchanged, &BuildNumberSpec::Unchanged).unwrap();
        assert_eq!(unchanged.build_number, BuildNumber::new(7));

        let incremented =
            resolve(&s, &VersionSpec::Unchanged, &BuildNumberSpec::Increment).unwrap();
        assert_eq!(incremented.build_number, BuildNumber::new(8));
    }

    #[test]
    fn test_explicit_build_number() {
        let stamp = resolve(
            &state("1.0.0", 0, 0),
            &VersionSpec::Unchanged,
            &explicit_code("42"),
        )
        .unwrap();
        assert_eq!(stamp.build_number, BuildNumber::new(42));
    }

    #[test]
    fn test_invalid_build_numbers() {
        for bad in ["-1", "abc", "1.5", "99999999999"] {
            let err = resolve(
                &state("1.0.0", 0, 0),
                &VersionSpec::Unchanged,
                &explicit_code(bad),
            )
            .unwrap_err();
            assert_eq!(
                err,
                ValidationError::BuildNumberSpecInvalid {
                    value: bad.to_string()
                }
            );
        }
    }

    #[test]
    fn test_specs_are_independent() {
        let stamp = resolve(
            &state("1.2.3", 4, 4),
            &VersionSpec::Bump(VersionBump::Patch),
            &BuildNumberSpec::Unchanged,
        )
        .unwrap();
        assert_eq!(stamp.version.to_string(), "1.2.4");
        assert_eq!(stamp.build_number, BuildNumber::new(4));
    }

    #[test]
    fn test_apply_writes_both_platform_fields() {
        let mut store = MemoryProjectStore::default().with_build_numbers(5, "7");
        let s = validate_persisted(&store).unwrap();
        let stamp = resolve(&s, &VersionSpec::Unchanged, &BuildNumberSpec::Increment).unwrap();
        stamp.apply(&mut store);

        assert_eq!(store.bundle_version, "1.0.0");
        assert_eq!(store.android_version_code, 8);
        assert_eq!(store.ios_build_number, "8");
    }

    #[test]
    fn test_warnings() {
        let s = state("2.0.0", 5, 7);
        let stamp = resolve(&s, &explicit_version("1.9.0"), &explicit_code("3")).unwrap();
        let warnings = stamp.warnings(&s);
        assert_eq!(warnings.len(), 3);
        assert!(warnings.contains(&BoundaryWarning::BuildNumberDrift { android: 5, ios: 7 }));
        assert!(warnings.contains(&BoundaryWarning::BuildNumberRegression {
            baseline: 7,
            requested: 3
        }));
    }

    #[test]
    fn test_no_warnings_for_plain_increment() {
        let s = state("1.0.0", 1, 1);
        let stamp = resolve(&s, &VersionSpec::Bump(VersionBump::Minor), &BuildNumberSpec::Increment)
            .unwrap();
        assert!(stamp.warnings(&s).is_empty());
    }
}
