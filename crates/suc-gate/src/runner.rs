//! Controller runner - builds the controller futures the binary drives

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use futures::StreamExt;
use kube::runtime::watcher::Config as WatcherConfig;
use kube::runtime::Controller;
use kube::{Api, Client};

use suc_common::crd::{Cluster, RKEControlPlane};

use crate::config::ControllerConfig;
use crate::controller::{
    cluster_error_policy, control_plane_error_policy, reconcile_cluster, reconcile_control_plane,
    Context,
};

/// Watcher timeout (seconds) - must be less than client read_timeout (30s)
/// so the API server closes idle watches before the client gives up.
const WATCH_TIMEOUT_SECS: u32 = 25;

/// A controller future ready to be polled
pub type ControllerFuture = Pin<Box<dyn Future<Output = ()> + Send>>;

/// Build the cluster and control plane controllers sharing one context
pub fn build_controllers(client: Client, config: ControllerConfig) -> Vec<ControllerFuture> {
    let ctx = Arc::new(Context::new(client.clone(), config));
    let clusters: Api<Cluster> = Api::all(client.clone());
    let control_planes: Api<RKEControlPlane> = Api::all(client);

    tracing::info!("- provisioning Cluster controller");
    tracing::info!("- RKEControlPlane controller");

    vec![
        Box::pin(
            Controller::new(clusters, WatcherConfig::default().timeout(WATCH_TIMEOUT_SECS))
                .shutdown_on_signal()
                .run(reconcile_cluster, cluster_error_policy, ctx.clone())
                .for_each(log_reconcile_result("Cluster")),
        ),
        Box::pin(
            Controller::new(
                control_planes,
                WatcherConfig::default().timeout(WATCH_TIMEOUT_SECS),
            )
            .shutdown_on_signal()
            .run(reconcile_control_plane, control_plane_error_policy, ctx)
            .for_each(log_reconcile_result("RKEControlPlane")),
        ),
    ]
}

fn log_reconcile_result<T: std::fmt::Debug, E: std::fmt::Debug>(
    controller_name: &'static str,
) -> impl Fn(Result<T, E>) -> std::future::Ready<()> {
    move |result| {
        match result {
            Ok(action) => tracing::debug!(?action, "{} reconciliation completed", controller_name),
            Err(e) => tracing::error!(error = ?e, "{} reconciliation error", controller_name),
        }
        std::future::ready(())
    }
}
