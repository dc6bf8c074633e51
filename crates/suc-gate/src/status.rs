//! System-upgrade-controller readiness
//!
//! Reads back the fleet bundle generated from our ManagedChart and decides
//! whether the deployed chart is rolled out and carries a PSP setting that is
//! safe for the control plane's Kubernetes version. The answer is written as
//! the `SystemUpgradeControllerReady` condition, which the upgrade planner
//! waits on before moving a cluster across the PSP removal boundary.
//!
//! States are checked in order and the first match wins:
//!
//! | State                   | Condition | Reason                                   |
//! |-------------------------|-----------|------------------------------------------|
//! | bundle not found        | False     |                                          |
//! | rolling out, erroring   | Unknown   | `Error Encountered ...: <first message>` |
//! | rolling out             | Unknown   | `Waiting for Deployment roll out`        |
//! | values not recorded     | Unknown   | `Waiting for Upgraded Deployment`        |
//! | values missing PSP flag | Unknown   | `Waiting for Upgraded Deployment`        |
//! | PSP on, version too new | Unknown   | `Not Ready`                              |
//! | otherwise               | True      |                                          |
//!
//! The rollout check comes first: while fleet is still rolling out, the
//! recorded values may belong to resources that are about to be replaced.

use kube::ResourceExt;
use semver::Version;
use tracing::{debug, info, instrument};

use suc_common::crd::{Bundle, Condition, ConditionStatus, RKEControlPlane, RKEControlPlaneStatus};
use suc_common::name::managed_chart_bundle_name;
use suc_common::{Result, SUC_READY_CONDITION};

use crate::chart::PSP_ENABLED_PATH;
use crate::client::FleetClient;
use crate::config::ControllerConfig;
use crate::version::{is_below_threshold, parse_version};

/// Prefix of the reason reported when fleet hit errors during rollout
pub const REASON_ROLLOUT_ERROR_PREFIX: &str =
    "Error Encountered Waiting for Deployment To Roll Out";
/// Reason while fleet is still rolling out
pub const REASON_ROLLING_OUT: &str = "Waiting for Deployment roll out";
/// Reason while the rolled-out bundle does not show the expected values yet
pub const REASON_WAITING_FOR_UPGRADE: &str = "Waiting for Upgraded Deployment";
/// Reason when the deployed chart still enables PSPs on a version without them
pub const REASON_NOT_READY: &str = "Not Ready";

/// Readiness of the system-upgrade-controller deployment
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SucReadiness {
    /// The bundle does not exist yet
    NotFound,
    /// Rollout is incomplete and fleet reported an error
    RollingOutWithError {
        /// Message of the first non-ready resource
        message: String,
    },
    /// Rollout is incomplete
    RollingOut,
    /// Rolled out, but fleet has not recorded any values
    ConfigNotYetObserved,
    /// Rolled out, values recorded, but the PSP flag is missing or not a bool
    ConfigShapeUnexpected,
    /// Rolled out with PSPs enabled on a version that no longer has them
    ConfigIncompatible,
    /// Rolled out with a compatible configuration
    Ready,
}

impl SucReadiness {
    /// Status the condition takes for this state
    pub fn status(&self) -> ConditionStatus {
        match self {
            Self::NotFound => ConditionStatus::False,
            Self::Ready => ConditionStatus::True,
            Self::RollingOutWithError { .. }
            | Self::RollingOut
            | Self::ConfigNotYetObserved
            | Self::ConfigShapeUnexpected
            | Self::ConfigIncompatible => ConditionStatus::Unknown,
        }
    }

    /// Operator-facing reason, empty for the terminal states
    pub fn reason(&self) -> String {
        match self {
            Self::NotFound | Self::Ready => String::new(),
            Self::RollingOutWithError { message } => {
                format!("{REASON_ROLLOUT_ERROR_PREFIX}: {message}")
            }
            Self::RollingOut => REASON_ROLLING_OUT.to_string(),
            Self::ConfigNotYetObserved | Self::ConfigShapeUnexpected => {
                REASON_WAITING_FOR_UPGRADE.to_string()
            }
            Self::ConfigIncompatible => REASON_NOT_READY.to_string(),
        }
    }

    /// The `SystemUpgradeControllerReady` condition for this state
    pub fn to_condition(&self) -> Condition {
        Condition::new(SUC_READY_CONDITION, self.status(), self.reason())
    }
}

/// Derive readiness from a bundle snapshot.
///
/// `bundle` is `None` when the lookup came back not-found. `below_threshold`
/// is the control plane's version checked against the PSP threshold.
pub fn evaluate(bundle: Option<&Bundle>, below_threshold: bool) -> SucReadiness {
    let Some(bundle) = bundle else {
        return SucReadiness::NotFound;
    };

    let summary = bundle.summary();
    if summary.ready != summary.desired_ready {
        if summary.err_applied != 0 {
            if let Some(first) = summary.non_ready_resources.first() {
                return SucReadiness::RollingOutWithError {
                    message: first.message.clone(),
                };
            }
        }
        return SucReadiness::RollingOut;
    }

    // fleet fills in values only after the ManagedChart change has been picked up
    let Some(values) = bundle.applied_values() else {
        return SucReadiness::ConfigNotYetObserved;
    };

    let Some(psp_enabled) = values.get::<bool>(PSP_ENABLED_PATH) else {
        return SucReadiness::ConfigShapeUnexpected;
    };

    // Only PSPs left on past the threshold block. PSPs off on an older
    // version is not flagged.
    if psp_enabled && !below_threshold {
        return SucReadiness::ConfigIncompatible;
    }

    SucReadiness::Ready
}

/// Look up the bundle for `control_plane` and return `status` with the
/// readiness condition updated.
///
/// Lookup failures and unparseable versions are returned as errors and leave
/// the condition untouched.
#[instrument(skip_all, fields(control_plane = %control_plane.name_any()))]
pub async fn sync_suc_status(
    client: &dyn FleetClient,
    control_plane: &RKEControlPlane,
    status: RKEControlPlaneStatus,
    config: &ControllerConfig,
) -> Result<RKEControlPlaneStatus> {
    let version = parse_version(&control_plane.spec.kubernetes_version)?;
    let readiness = readiness_for(client, &control_plane.name_any(), &version, config).await?;

    let previous = status
        .get_condition(SUC_READY_CONDITION)
        .map(|c| (c.status, c.reason.clone()));
    let next = (readiness.status(), readiness.reason());
    if previous.as_ref() != Some(&next) {
        info!(
            %version,
            status = %next.0,
            reason = %next.1,
            "system-upgrade-controller readiness changed"
        );
    }

    Ok(status.condition(readiness.to_condition()))
}

/// Fetch the bundle for the control plane named `name` and evaluate it
pub async fn readiness_for(
    client: &dyn FleetClient,
    name: &str,
    version: &Version,
    config: &ControllerConfig,
) -> Result<SucReadiness> {
    let bundle_name = managed_chart_bundle_name(name);
    let bundle = client
        .get_bundle(&config.bundle_namespace, &bundle_name)
        .await?;
    let below = is_below_threshold(version, &config.psp_threshold);
    let readiness = evaluate(bundle.as_ref(), below);

    debug!(
        bundle = %bundle_name,
        found = bundle.is_some(),
        below_threshold = below,
        ?readiness,
        "evaluated system-upgrade-controller bundle"
    );

    Ok(readiness)
}
