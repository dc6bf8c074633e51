//! Kubernetes object name derivation
//!
//! The ManagedChart name is computed when the chart is built and recomputed
//! when the generated bundle is looked up. Both sides go through
//! [`managed_chart_name`] so they can never disagree.

use md5::{Digest as _, Md5};
use sha2::Sha256;

use crate::{MANAGED_CHART_BUNDLE_PREFIX, MANAGED_CHART_NAME_MAX_LEN, SUC_CHART_NAME};

/// Names shorter than this are returned by [`safe_concat_name`] untouched
const SAFE_CONCAT_LIMIT: usize = 64;

/// Join name fragments with `-`, keeping the result under 64 characters.
///
/// Over-long names are cut at 57 characters and suffixed with the first five
/// hex digits of the SHA-256 of the full name. If the cut would end on a
/// character that is not `[a-z0-9]`, one more character is dropped and six
/// hex digits are used instead.
pub fn safe_concat_name(parts: &[&str]) -> String {
    let full = parts.join("-");
    if full.len() < SAFE_CONCAT_LIMIT {
        return full;
    }

    let digest = hex::encode(Sha256::digest(full.as_bytes()));
    let bytes = full.as_bytes();
    let c = bytes[56];
    if c.is_ascii_lowercase() || c.is_ascii_digit() {
        format!("{}-{}", truncate_bytes(&full, 57), &digest[..5])
    } else {
        format!("{}-{}", truncate_bytes(&full, 56), &digest[..6])
    }
}

/// Limit a name to `count` characters.
///
/// Names within the limit are returned as is; longer names keep their first
/// `count - 6` characters followed by `-` and five hex digits of their MD5.
pub fn limit(name: &str, count: usize) -> String {
    if name.len() <= count {
        return name.to_string();
    }
    let digest = hex::encode(Md5::digest(name.as_bytes()));
    format!(
        "{}-{}",
        truncate_bytes(name, count.saturating_sub(6)),
        &digest[..5]
    )
}

/// Name of the ManagedChart that installs the system-upgrade-controller for `cluster`
pub fn managed_chart_name(cluster: &str) -> String {
    limit(
        &safe_concat_name(&[cluster, "managed", SUC_CHART_NAME]),
        MANAGED_CHART_NAME_MAX_LEN,
    )
}

/// Name of the fleet bundle generated from the ManagedChart for `cluster`
pub fn managed_chart_bundle_name(cluster: &str) -> String {
    format!("{}{}", MANAGED_CHART_BUNDLE_PREFIX, managed_chart_name(cluster))
}

/// Byte-prefix of a Kubernetes name.
///
/// Object names are ASCII; should a multi-byte character straddle the cut,
/// back off to the previous boundary instead of panicking.
fn truncate_bytes(s: &str, len: usize) -> &str {
    let mut end = len.min(s.len());
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
