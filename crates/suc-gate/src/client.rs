//! Kubernetes access for the gate controllers
//!
//! Everything the reconcilers read or write goes through [`FleetClient`] so
//! the reconcile logic can be tested against a mock.

use async_trait::async_trait;
use kube::api::{Api, Patch, PatchParams};
use kube::{Client, ResourceExt};
use serde_json::{json, Value};
use tracing::debug;

#[cfg(test)]
use mockall::automock;

use suc_common::crd::{Bundle, ManagedChart, RKEControlPlane, RKEControlPlaneStatus};
use suc_common::{Error, FIELD_MANAGER};

/// Trait abstracting the API calls made by the gate controllers
#[cfg_attr(test, automock)]
#[async_trait]
pub trait FleetClient: Send + Sync {
    /// Get a fleet Bundle, `None` if it does not exist
    async fn get_bundle(&self, namespace: &str, name: &str) -> Result<Option<Bundle>, Error>;

    /// Server-side apply a ManagedChart
    async fn apply_managed_chart(&self, chart: &ManagedChart) -> Result<(), Error>;

    /// Replace the conditions on an RKEControlPlane's status
    ///
    /// # Arguments
    ///
    /// * `control_plane` - The control plane as observed at the start of the pass
    /// * `status` - Status whose conditions are written
    ///
    /// The write is conditional on the observed `resourceVersion`; if the
    /// object changed since it was read the API server answers 409.
    async fn patch_control_plane_status(
        &self,
        control_plane: &RKEControlPlane,
        status: &RKEControlPlaneStatus,
    ) -> Result<(), Error>;
}

/// Merge patch writing `status.conditions`, guarded by the observed resourceVersion
pub fn conditions_patch(control_plane: &RKEControlPlane, status: &RKEControlPlaneStatus) -> Value {
    let status_patch = json!({ "conditions": status.conditions });
    match control_plane.resource_version() {
        Some(resource_version) => json!({
            "metadata": { "resourceVersion": resource_version },
            "status": status_patch,
        }),
        None => json!({ "status": status_patch }),
    }
}

/// Real Kubernetes client implementation
pub struct FleetClientImpl {
    client: Client,
}

impl FleetClientImpl {
    /// Create a new FleetClientImpl wrapping the given kube Client
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl FleetClient for FleetClientImpl {
    async fn get_bundle(&self, namespace: &str, name: &str) -> Result<Option<Bundle>, Error> {
        let api: Api<Bundle> = Api::namespaced(self.client.clone(), namespace);
        match api.get(name).await {
            Ok(bundle) => Ok(Some(bundle)),
            Err(kube::Error::Api(ae)) if ae.code == 404 => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn apply_managed_chart(&self, chart: &ManagedChart) -> Result<(), Error> {
        let name = chart.name_any();
        let namespace = chart
            .namespace()
            .ok_or_else(|| Error::validation_for(&name, "ManagedChart must be namespaced"))?;
        let api: Api<ManagedChart> = Api::namespaced(self.client.clone(), &namespace);

        api.patch(
            &name,
            &PatchParams::apply(FIELD_MANAGER).force(),
            &Patch::Apply(chart),
        )
        .await?;

        debug!(chart = %name, %namespace, "applied ManagedChart");
        Ok(())
    }

    async fn patch_control_plane_status(
        &self,
        control_plane: &RKEControlPlane,
        status: &RKEControlPlaneStatus,
    ) -> Result<(), Error> {
        let name = control_plane.name_any();
        let namespace = control_plane
            .namespace()
            .ok_or_else(|| Error::validation_for(&name, "RKEControlPlane must be namespaced"))?;
        let api: Api<RKEControlPlane> = Api::namespaced(self.client.clone(), &namespace);

        // only conditions; the rest of the status belongs to the planner
        api.patch_status(
            &name,
            &PatchParams::apply(FIELD_MANAGER),
            &Patch::Merge(&conditions_patch(control_plane, status)),
        )
        .await?;

        Ok(())
    }
}
