//! Desired ManagedChart for the system-upgrade-controller
//!
//! Pure construction: the same cluster and config always produce the same
//! object, so repeated server-side applies are no-ops.

use k8s_openapi::apimachinery::pkg::apis::meta::v1::{LabelSelector, LabelSelectorRequirement};
use kube::api::ObjectMeta;
use kube::ResourceExt;
use semver::Version;
use tracing::debug;

use suc_common::crd::{BundleTarget, Cluster, HelmValues, ManagedChart, ManagedChartSpec};
use suc_common::name::managed_chart_name;
use suc_common::{Error, Result, UNMANAGED_SYSTEM_AGENT_LABEL};

use crate::config::ControllerConfig;
use crate::version::{parse_version, psp_enabled};

/// Values path of the PSP toggle
pub const PSP_ENABLED_PATH: &[&str] = &["global", "cattle", "psp", "enabled"];

/// Values path of the private registry
pub const SYSTEM_DEFAULT_REGISTRY_PATH: &[&str] = &["global", "cattle", "systemDefaultRegistry"];

/// Helm values for the chart
pub fn desired_values(psp_enabled: bool, registry: &str) -> HelmValues {
    let mut values = HelmValues::new();
    values.set(SYSTEM_DEFAULT_REGISTRY_PATH, registry);
    values.set(PSP_ENABLED_PATH, psp_enabled);
    values
}

/// Registry the chart images are pulled from for `cluster`.
///
/// A registry set in the cluster's machine global config wins over the
/// controller-wide default.
pub fn resolve_registry(cluster: &Cluster, config: &ControllerConfig) -> String {
    cluster
        .spec
        .rke_config
        .as_ref()
        .and_then(|rke| rke.system_default_registry())
        .unwrap_or(config.system_default_registry.as_str())
        .to_string()
}

/// Deploy to the named cluster unless it is labeled as having an unmanaged system agent
pub fn target_for(cluster_name: &str) -> BundleTarget {
    BundleTarget {
        cluster_name: Some(cluster_name.to_string()),
        cluster_selector: Some(LabelSelector {
            match_expressions: Some(vec![LabelSelectorRequirement {
                key: UNMANAGED_SYSTEM_AGENT_LABEL.to_string(),
                operator: "DoesNotExist".to_string(),
                values: None,
            }]),
            match_labels: None,
        }),
    }
}

/// Build the ManagedChart for one cluster.
///
/// `namespace` is the namespace of the provisioning cluster; the chart lives
/// next to it.
pub fn build_managed_chart(
    cluster_name: &str,
    namespace: &str,
    version: &Version,
    registry: &str,
    config: &ControllerConfig,
) -> ManagedChart {
    let psp = psp_enabled(version, &config.psp_threshold);
    let name = managed_chart_name(cluster_name);

    debug!(
        cluster = %cluster_name,
        chart = %name,
        %version,
        psp_enabled = psp,
        "built system-upgrade-controller ManagedChart"
    );

    ManagedChart {
        metadata: ObjectMeta {
            name: Some(name),
            namespace: Some(namespace.to_string()),
            ..Default::default()
        },
        spec: ManagedChartSpec {
            default_namespace: config.system_namespace.clone(),
            repo_name: config.repo_name.clone(),
            chart: config.chart_name.clone(),
            version: config.chart_version.clone(),
            values: Some(desired_values(psp, registry)),
            targets: vec![target_for(cluster_name)],
        },
    }
}

/// Desired ManagedCharts for a provisioning cluster.
///
/// Clusters without an RKE config don't get the chart, so the result is
/// empty for them. Otherwise it holds exactly one chart.
pub fn desired_managed_charts(
    cluster: &Cluster,
    config: &ControllerConfig,
) -> Result<Vec<ManagedChart>> {
    if cluster.spec.rke_config.is_none() {
        return Ok(Vec::new());
    }

    let name = cluster.name_any();
    let namespace = cluster
        .namespace()
        .ok_or_else(|| Error::validation_for(&name, "cluster must be namespaced"))?;
    let version = parse_version(&cluster.spec.kubernetes_version)?;
    let registry = resolve_registry(cluster, config);

    Ok(vec![build_managed_chart(
        &name, &namespace, &version, &registry, config,
    )])
}
