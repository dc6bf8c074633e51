//! Common types for the system-upgrade-controller gate: CRD mirrors, conditions,
//! errors, name derivation and telemetry

#![deny(missing_docs)]

pub mod crd;
pub mod error;
pub mod name;
pub mod telemetry;

pub use error::Error;

/// Result type alias using our custom Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Namespace the system-upgrade-controller chart installs into on downstream clusters
pub const SYSTEM_NAMESPACE: &str = "cattle-system";

/// Namespace fleet places bundles for provisioned clusters in
pub const FLEET_CLUSTERS_NAMESPACE: &str = "fleet-default";

/// Chart repository the system-upgrade-controller chart is pulled from
pub const CHART_REPO_NAME: &str = "rancher-charts";

/// Name of the system-upgrade-controller chart
pub const SUC_CHART_NAME: &str = "system-upgrade-controller";

/// Label marking clusters whose system agent is not managed by us
pub const UNMANAGED_SYSTEM_AGENT_LABEL: &str = "provisioning.cattle.io/unmanaged-system-agent";

/// Prefix the ManagedChart controller adds to the bundle it generates
pub const MANAGED_CHART_BUNDLE_PREFIX: &str = "mcc-";

/// Maximum length of a ManagedChart name.
///
/// Helm release names are capped at 53 characters and the bundle gets the
/// `mcc-` prefix on top, which leaves 48 for the chart name itself.
pub const MANAGED_CHART_NAME_MAX_LEN: usize = 48;

/// Condition type reporting whether the system-upgrade-controller is ready
pub const SUC_READY_CONDITION: &str = "SystemUpgradeControllerReady";

/// Field manager used for server-side apply and status patches
pub const FIELD_MANAGER: &str = "suc-gate";
