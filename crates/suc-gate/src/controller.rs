//! Reconcilers for provisioning clusters and RKE control planes
//!
//! The cluster reconciler keeps the system-upgrade-controller ManagedChart in
//! line with the cluster's Kubernetes version. The control plane reconciler
//! reads back the resulting fleet bundle and maintains the readiness
//! condition. Neither writes anything the other reads, so the two run as
//! independent controllers.

use std::sync::Arc;
use std::time::Duration;

use kube::runtime::controller::Action;
use kube::{Client, ResourceExt};
use tracing::{debug, error, info, instrument, warn};

use suc_common::crd::{Cluster, ConditionStatus, RKEControlPlane};
use suc_common::{Error, SUC_READY_CONDITION};

use crate::chart::desired_managed_charts;
use crate::client::{FleetClient, FleetClientImpl};
use crate::config::ControllerConfig;
use crate::status::sync_suc_status;

/// Resync interval for clusters whose chart is applied
pub const CLUSTER_RESYNC_INTERVAL: Duration = Duration::from_secs(300);

/// Requeue interval while the controller is not ready yet
pub const PENDING_REQUEUE_INTERVAL: Duration = Duration::from_secs(10);

/// Resync interval once the controller is ready
pub const READY_REQUEUE_INTERVAL: Duration = Duration::from_secs(120);

/// Backoff after a retryable failure
pub const ERROR_REQUEUE_INTERVAL: Duration = Duration::from_secs(5);

/// Backoff after a failure that needs the object to change first
pub const INVALID_REQUEUE_INTERVAL: Duration = Duration::from_secs(60);

/// Controller context shared by both reconcilers
pub struct Context {
    /// API access (trait object for testability)
    pub client: Arc<dyn FleetClient>,
    /// Process-wide settings
    pub config: ControllerConfig,
}

impl Context {
    /// Create a context backed by a real Kubernetes client
    pub fn new(client: Client, config: ControllerConfig) -> Self {
        Self {
            client: Arc::new(FleetClientImpl::new(client)),
            config,
        }
    }

    /// Create a context with a custom client implementation
    pub fn with_client(client: Arc<dyn FleetClient>, config: ControllerConfig) -> Self {
        Self { client, config }
    }
}

/// Reconcile a provisioning cluster: apply its desired ManagedCharts
#[instrument(skip(cluster, ctx), fields(cluster = %cluster.name_any()))]
pub async fn reconcile_cluster(cluster: Arc<Cluster>, ctx: Arc<Context>) -> Result<Action, Error> {
    if cluster.metadata.deletion_timestamp.is_some() {
        // the ManagedChart is garbage collected with the cluster namespace objects
        debug!("cluster is being deleted, skipping");
        return Ok(Action::await_change());
    }

    let charts = desired_managed_charts(&cluster, &ctx.config)?;
    if charts.is_empty() {
        debug!("cluster has no RKE config, nothing to deploy");
        return Ok(Action::await_change());
    }

    for chart in &charts {
        ctx.client.apply_managed_chart(chart).await?;
        info!(chart = %chart.name_any(), "system-upgrade-controller ManagedChart applied");
    }

    Ok(Action::requeue(CLUSTER_RESYNC_INTERVAL))
}

/// Reconcile an RKE control plane: refresh the readiness condition
#[instrument(skip(control_plane, ctx), fields(control_plane = %control_plane.name_any()))]
pub async fn reconcile_control_plane(
    control_plane: Arc<RKEControlPlane>,
    ctx: Arc<Context>,
) -> Result<Action, Error> {
    if control_plane.metadata.deletion_timestamp.is_some() {
        debug!("control plane is being deleted, skipping");
        return Ok(Action::await_change());
    }

    if control_plane.namespace().is_none() {
        return Err(Error::validation_for(
            control_plane.name_any(),
            "RKEControlPlane must be namespaced",
        ));
    }

    let current = control_plane.status.clone().unwrap_or_default();
    let updated = sync_suc_status(
        ctx.client.as_ref(),
        &control_plane,
        current.clone(),
        &ctx.config,
    )
    .await?;

    if updated.conditions != current.conditions {
        ctx.client
            .patch_control_plane_status(&control_plane, &updated)
            .await?;
        debug!("control plane status patched");
    }

    let ready = updated
        .get_condition(SUC_READY_CONDITION)
        .is_some_and(|c| c.status == ConditionStatus::True);

    Ok(if ready {
        Action::requeue(READY_REQUEUE_INTERVAL)
    } else {
        Action::requeue(PENDING_REQUEUE_INTERVAL)
    })
}

/// Error policy for the cluster controller
pub fn cluster_error_policy(cluster: Arc<Cluster>, error: &Error, _ctx: Arc<Context>) -> Action {
    error!(
        ?error,
        cluster = %cluster.name_any(),
        "cluster reconciliation failed"
    );
    requeue_for(error)
}

/// Error policy for the control plane controller
pub fn control_plane_error_policy(
    control_plane: Arc<RKEControlPlane>,
    error: &Error,
    _ctx: Arc<Context>,
) -> Action {
    error!(
        ?error,
        control_plane = %control_plane.name_any(),
        "control plane reconciliation failed"
    );
    requeue_for(error)
}

fn requeue_for(error: &Error) -> Action {
    if error.is_retryable() {
        Action::requeue(ERROR_REQUEUE_INTERVAL)
    } else {
        warn!("error is not retryable, backing off until the object changes");
        Action::requeue(INVALID_REQUEUE_INTERVAL)
    }
}
