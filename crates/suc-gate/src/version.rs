//! Kubernetes version parsing and the PSP threshold
//!
//! PodSecurityPolicy was removed in Kubernetes 1.25. The chart must ship its
//! PSP manifests on clusters older than that and must not ship them on 1.25+.
//! Both the chart builder and the status reconciler decide which side of the
//! line a cluster is on through [`is_below_threshold`].

use semver::{BuildMetadata, Version};

use suc_common::{Error, Result};

/// First Kubernetes version without PodSecurityPolicy support
pub const PSP_REMOVAL_VERSION: Version = Version::new(1, 25, 0);

/// Parse a Kubernetes version string such as `v1.26.4+rke2r1`.
///
/// Accepts an optional leading `v` and one to three numeric components
/// (`1.26` reads as `1.26.0`). Build metadata is dropped since it carries no
/// ordering meaning for Kubernetes releases.
pub fn parse_version(input: &str) -> Result<Version> {
    let trimmed = input.trim();
    let stripped = trimmed
        .strip_prefix('v')
        .or_else(|| trimmed.strip_prefix('V'))
        .unwrap_or(trimmed);
    if stripped.is_empty() {
        return Err(Error::invalid_version(input, "empty version"));
    }

    let core_end = stripped.find(['-', '+']).unwrap_or(stripped.len());
    let (core, suffix) = stripped.split_at(core_end);
    let components = core.split('.').count();
    let padded = match components {
        1 => format!("{core}.0.0{suffix}"),
        2 => format!("{core}.0{suffix}"),
        _ => stripped.to_string(),
    };

    let mut version =
        Version::parse(&padded).map_err(|e| Error::invalid_version(input, e.to_string()))?;
    version.build = BuildMetadata::EMPTY;
    Ok(version)
}

/// Returns true if `version` is strictly older than `threshold`
pub fn is_below_threshold(version: &Version, threshold: &Version) -> bool {
    version < threshold
}

/// Whether the chart should install PodSecurityPolicy manifests for `version`
pub fn psp_enabled(version: &Version, threshold: &Version) -> bool {
    is_below_threshold(version, threshold)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Version {
        parse_version(s).unwrap()
    }

    mod parsing {
        use super::*;

        #[test]
        fn plain_semver() {
            assert_eq!(v("1.26.0"), Version::new(1, 26, 0));
        }

        #[test]
        fn leading_v_and_rke2_metadata() {
            assert_eq!(v("v1.26.4+rke2r1"), Version::new(1, 26, 4));
            assert_eq!(v("v1.24.17+k3s1"), Version::new(1, 24, 17));
        }

        #[test]
        fn short_forms_are_padded() {
            assert_eq!(v("1.26"), Version::new(1, 26, 0));
            assert_eq!(v("v1"), Version::new(1, 0, 0));
            assert_eq!(v("1.25+rke2r1"), Version::new(1, 25, 0));
        }

        #[test]
        fn prerelease_is_kept() {
            let parsed = v("v1.25.0-rc1+rke2r1");
            assert_eq!(parsed.pre.as_str(), "rc1");
            assert!(parsed.build.is_empty());
        }

        #[test]
        fn surrounding_whitespace_is_ignored() {
            assert_eq!(v("  v1.27.1 "), Version::new(1, 27, 1));
        }

        #[test]
        fn malformed_input_is_invalid_version() {
            for bad in ["", "v", "latest", "1.x.0", "1.2.3.4", "1..2", "-1.2.3"] {
                match parse_version(bad) {
                    Err(Error::InvalidVersion { version, .. }) => assert_eq!(version, bad),
                    other => panic!("{bad:?} should be InvalidVersion, got {other:?}"),
                }
            }
        }
    }

    mod threshold {
        use super::*;

        #[test]
        fn older_versions_are_below() {
            assert!(is_below_threshold(&v("1.24.17"), &PSP_REMOVAL_VERSION));
            assert!(is_below_threshold(&v("v1.23.0+rke2r1"), &PSP_REMOVAL_VERSION));
        }

        #[test]
        fn threshold_itself_is_not_below() {
            assert!(!is_below_threshold(&v("1.25.0"), &PSP_REMOVAL_VERSION));
            assert!(!is_below_threshold(&v("v1.25.0+rke2r1"), &PSP_REMOVAL_VERSION));
        }

        #[test]
        fn newer_versions_are_not_below() {
            assert!(!is_below_threshold(&v("1.26.0"), &PSP_REMOVAL_VERSION));
            assert!(!is_below_threshold(&v("1.25.1"), &PSP_REMOVAL_VERSION));
        }

        #[test]
        fn prerelease_of_threshold_is_below() {
            assert!(is_below_threshold(&v("1.25.0-rc1"), &PSP_REMOVAL_VERSION));
        }

        #[test]
        fn predicate_agrees_with_ordering() {
            let samples = ["1.20.0", "1.24.99", "1.25.0-alpha", "1.25.0", "1.25.1", "2.0.0"];
            for s in samples {
                let version = v(s);
                assert_eq!(
                    is_below_threshold(&version, &PSP_REMOVAL_VERSION),
                    version < PSP_REMOVAL_VERSION
                );
                assert_eq!(
                    psp_enabled(&version, &PSP_REMOVAL_VERSION),
                    is_below_threshold(&version, &PSP_REMOVAL_VERSION)
                );
            }
        }

        #[test]
        fn threshold_is_injectable() {
            let threshold = v("1.30.0");
            assert!(is_below_threshold(&v("1.29.5"), &threshold));
            assert!(!is_below_threshold(&v("1.30.0"), &threshold));
        }
    }
}
