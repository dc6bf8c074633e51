//! RKEControlPlane (rke.cattle.io/v1)
//!
//! The control plane status carries the `SystemUpgradeControllerReady`
//! condition the upgrade planner waits on.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::types::Condition;

/// Desired state of an RKE control plane
#[derive(CustomResource, Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[kube(
    group = "rke.cattle.io",
    version = "v1",
    kind = "RKEControlPlane",
    namespaced,
    status = "RKEControlPlaneStatus"
)]
#[serde(rename_all = "camelCase")]
pub struct RKEControlPlaneSpec {
    /// Kubernetes version the control plane is being driven to
    #[serde(default)]
    pub kubernetes_version: String,

    /// Name of the provisioning cluster that owns this control plane
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_name: Option<String>,
}

/// Observed state of an RKE control plane
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RKEControlPlaneStatus {
    /// Conditions reported on the control plane
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<Condition>,

    /// Generation last acted upon
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observed_generation: Option<i64>,
}

impl RKEControlPlaneStatus {
    /// Set a condition, replacing any existing condition of the same type
    pub fn condition(mut self, condition: Condition) -> Self {
        Condition::set(&mut self.conditions, condition);
        self
    }

    /// Condition of the given type, if present
    pub fn get_condition(&self, type_: &str) -> Option<&Condition> {
        Condition::find(&self.conditions, type_)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crd::ConditionStatus;
    use serde_json::json;

    #[test]
    fn status_round_trips_conditions_from_the_api() {
        let cp: RKEControlPlane = serde_json::from_value(json!({
            "apiVersion": "rke.cattle.io/v1",
            "kind": "RKEControlPlane",
            "metadata": {"name": "prod", "namespace": "fleet-default"},
            "spec": {
                "kubernetesVersion": "v1.25.9+rke2r1",
                "clusterName": "prod",
                "agentEnvVars": []
            },
            "status": {
                "conditions": [
                    {
                        "type": "SystemUpgradeControllerReady",
                        "status": "Unknown",
                        "reason": "Waiting for Deployment roll out"
                    },
                    {"type": "Provisioned", "status": "True"}
                ],
                "observedGeneration": 4
            }
        }))
        .unwrap();

        let status = cp.status.unwrap();
        let suc = status.get_condition("SystemUpgradeControllerReady").unwrap();
        assert_eq!(suc.status, ConditionStatus::Unknown);
        assert_eq!(suc.reason, "Waiting for Deployment roll out");
        assert_eq!(status.observed_generation, Some(4));
    }

    #[test]
    fn condition_builder_preserves_other_types() {
        let status = RKEControlPlaneStatus::default()
            .condition(Condition::new("Provisioned", ConditionStatus::True, ""))
            .condition(Condition::new("SystemUpgradeControllerReady", ConditionStatus::False, ""));

        assert_eq!(status.conditions.len(), 2);
        assert!(status.get_condition("Provisioned").is_some());
    }
}
