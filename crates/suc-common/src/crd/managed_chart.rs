//! ManagedChart (management.cattle.io/v3)
//!
//! A Helm chart the management cluster deploys to downstream clusters through
//! fleet. The ManagedChart controller turns each one into a fleet `Bundle`
//! named `mcc-<chart name>`.

use k8s_openapi::apimachinery::pkg::apis::meta::v1::LabelSelector;
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::values::HelmValues;

/// Desired state of a managed chart
#[derive(CustomResource, Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[kube(
    group = "management.cattle.io",
    version = "v3",
    kind = "ManagedChart",
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct ManagedChartSpec {
    /// Namespace the chart's resources are installed into downstream
    #[serde(default)]
    pub default_namespace: String,

    /// Chart repository name
    #[serde(default)]
    pub repo_name: String,

    /// Chart name within the repository
    #[serde(default)]
    pub chart: String,

    /// Chart version
    #[serde(default)]
    pub version: String,

    /// Helm values passed to the chart
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<HelmValues>,

    /// Clusters the chart is deployed to
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub targets: Vec<BundleTarget>,
}

/// A fleet deployment target
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BundleTarget {
    /// Target a single cluster by name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_name: Option<String>,

    /// Further restrict targets by cluster labels
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_selector: Option<LabelSelector>,
}
