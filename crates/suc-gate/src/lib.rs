//! Readiness gate for the managed system-upgrade-controller
//!
//! Deploys the system-upgrade-controller chart to provisioned clusters with
//! PodSecurityPolicy support switched on or off according to the cluster's
//! Kubernetes version, and reports on each RKE control plane whether the
//! deployed chart is rolled out with a configuration the version can run.

#![deny(missing_docs)]

pub mod chart;
pub mod client;
pub mod config;
pub mod controller;
pub mod runner;
pub mod status;
pub mod version;

pub use chart::{build_managed_chart, desired_managed_charts};
pub use client::{FleetClient, FleetClientImpl};
pub use config::ControllerConfig;
pub use controller::{reconcile_cluster, reconcile_control_plane, Context};
pub use status::{evaluate, sync_suc_status, SucReadiness};
pub use version::{is_below_threshold, parse_version, PSP_REMOVAL_VERSION};
