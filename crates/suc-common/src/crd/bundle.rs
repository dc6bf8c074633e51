//! Fleet Bundle (fleet.cattle.io/v1alpha1)
//!
//! Read-only view of the bundle fleet generates from a ManagedChart. The
//! summary counts tell whether the rollout finished; `spec.helm.values` holds
//! the values fleet actually deploys, which lag behind the ManagedChart.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::values::HelmValues;

/// Desired state of a fleet bundle
#[derive(CustomResource, Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[kube(
    group = "fleet.cattle.io",
    version = "v1alpha1",
    kind = "Bundle",
    namespaced,
    status = "BundleStatus"
)]
#[serde(rename_all = "camelCase")]
pub struct BundleSpec {
    /// Helm deployment options
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub helm: Option<BundleHelmOptions>,
}

/// Helm options of a bundle
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BundleHelmOptions {
    /// Values fleet renders the chart with
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<HelmValues>,
}

/// Observed state of a fleet bundle
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BundleStatus {
    /// Aggregated deployment counts across targeted clusters
    #[serde(default)]
    pub summary: BundleSummary,
}

/// Deployment counts for a bundle
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BundleSummary {
    /// Deployments that are ready
    #[serde(default)]
    pub ready: i64,

    /// Deployments expected to become ready
    #[serde(default)]
    pub desired_ready: i64,

    /// Deployments that failed to apply
    #[serde(default)]
    pub err_applied: i64,

    /// Deployments that are not ready, with the reason
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub non_ready_resources: Vec<NonReadyResource>,
}

/// A deployment that is not ready yet
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NonReadyResource {
    /// Name of the bundle deployment
    #[serde(default)]
    pub name: String,

    /// Why it is not ready
    #[serde(default)]
    pub message: String,
}

impl Bundle {
    /// Deployment summary, zeroed when fleet has not reported any status yet
    pub fn summary(&self) -> BundleSummary {
        self.status
            .as_ref()
            .map(|s| s.summary.clone())
            .unwrap_or_default()
    }

    /// Helm values fleet has recorded for this bundle, if any
    pub fn applied_values(&self) -> Option<&HelmValues> {
        self.spec.helm.as_ref()?.values.as_ref()
    }
}
