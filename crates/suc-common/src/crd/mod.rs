//! Mirrors of the custom resources the gate reads and writes
//!
//! None of these CRDs are owned by us. The structs only carry the fields the
//! gate looks at; serde ignores everything else the API server returns.

mod bundle;
mod cluster;
mod control_plane;
mod managed_chart;
mod types;
mod values;

pub use bundle::{
    Bundle, BundleHelmOptions, BundleSpec, BundleStatus, BundleSummary, NonReadyResource,
};
pub use cluster::{Cluster, ClusterSpec, RkeConfig};
pub use control_plane::{RKEControlPlane, RKEControlPlaneSpec, RKEControlPlaneStatus};
pub use managed_chart::{BundleTarget, ManagedChart, ManagedChartSpec};
pub use types::{Condition, ConditionStatus};
pub use values::HelmValues;
