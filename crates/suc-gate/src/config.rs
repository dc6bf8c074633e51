//! Controller configuration
//!
//! Everything here is process-wide and immutable once the controller starts.
//! The binary builds it from flags and environment variables; tests build it
//! directly.

use semver::Version;

use suc_common::{CHART_REPO_NAME, FLEET_CLUSTERS_NAMESPACE, SUC_CHART_NAME, SYSTEM_NAMESPACE};

use crate::version::PSP_REMOVAL_VERSION;

/// Chart version deployed when none is configured
pub const DEFAULT_SUC_CHART_VERSION: &str = "104.0.0+up0.7.0";

/// Settings shared by the chart builder and the status reconciler
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ControllerConfig {
    /// Chart repository name
    pub repo_name: String,
    /// Chart name
    pub chart_name: String,
    /// Chart version to deploy
    pub chart_version: String,
    /// Namespace the chart installs into on downstream clusters
    pub system_namespace: String,
    /// Namespace fleet keeps the generated bundles in
    pub bundle_namespace: String,
    /// Registry used when a cluster does not configure its own
    pub system_default_registry: String,
    /// First Kubernetes version on which the chart must not install PSPs
    pub psp_threshold: Version,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            repo_name: CHART_REPO_NAME.to_string(),
            chart_name: SUC_CHART_NAME.to_string(),
            chart_version: DEFAULT_SUC_CHART_VERSION.to_string(),
            system_namespace: SYSTEM_NAMESPACE.to_string(),
            bundle_namespace: FLEET_CLUSTERS_NAMESPACE.to_string(),
            system_default_registry: String::new(),
            psp_threshold: PSP_REMOVAL_VERSION,
        }
    }
}

impl ControllerConfig {
    /// Override the chart version
    pub fn with_chart_version(mut self, version: impl Into<String>) -> Self {
        self.chart_version = version.into();
        self
    }

    /// Override the global system default registry
    pub fn with_system_default_registry(mut self, registry: impl Into<String>) -> Self {
        self.system_default_registry = registry.into();
        self
    }

    /// Override the PSP threshold
    pub fn with_psp_threshold(mut self, threshold: Version) -> Self {
        self.psp_threshold = threshold;
        self
    }
}
