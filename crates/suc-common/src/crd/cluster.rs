//! Provisioning Cluster (provisioning.cattle.io/v1)
//!
//! The cluster object the ManagedChart is built from. Only RKE-provisioned
//! clusters (those with an `rkeConfig`) get the system-upgrade-controller.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key in `machineGlobalConfig` that overrides the system default registry
const SYSTEM_DEFAULT_REGISTRY_KEY: &str = "system-default-registry";

/// Desired state of a provisioned cluster
#[derive(CustomResource, Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[kube(
    group = "provisioning.cattle.io",
    version = "v1",
    kind = "Cluster",
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct ClusterSpec {
    /// Kubernetes version the cluster runs (e.g. `v1.26.4+rke2r1`)
    #[serde(default)]
    pub kubernetes_version: String,

    /// RKE2/K3s configuration; absent for imported or hosted clusters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rke_config: Option<RkeConfig>,
}

/// The slice of the RKE configuration the gate reads
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RkeConfig {
    /// Config applied to every machine in the cluster
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub machine_global_config: Option<Map<String, Value>>,
}

impl RkeConfig {
    /// Private registry configured for this cluster, if any
    pub fn system_default_registry(&self) -> Option<&str> {
        self.machine_global_config
            .as_ref()?
            .get(SYSTEM_DEFAULT_REGISTRY_KEY)?
            .as_str()
            .filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_with_unknown_fields() {
        let cluster: Cluster = serde_json::from_value(json!({
            "apiVersion": "provisioning.cattle.io/v1",
            "kind": "Cluster",
            "metadata": {"name": "prod", "namespace": "fleet-default"},
            "spec": {
                "kubernetesVersion": "v1.26.4+rke2r1",
                "cloudCredentialSecretName": "cattle-global-data:cc-xyz",
                "rkeConfig": {
                    "machineGlobalConfig": {
                        "cni": "calico",
                        "system-default-registry": "reg.local"
                    },
                    "machinePools": []
                }
            }
        }))
        .unwrap();

        assert_eq!(cluster.spec.kubernetes_version, "v1.26.4+rke2r1");
        let rke = cluster.spec.rke_config.unwrap();
        assert_eq!(rke.system_default_registry(), Some("reg.local"));
    }

    #[test]
    fn registry_is_none_when_unset_empty_or_not_a_string() {
        assert_eq!(RkeConfig::default().system_default_registry(), None);

        for v in [
            json!({}),
            json!({"system-default-registry": ""}),
            json!({"system-default-registry": 5}),
        ] {
            let rke = RkeConfig {
                machine_global_config: v.as_object().cloned(),
            };
            assert_eq!(rke.system_default_registry(), None);
        }
    }

    #[test]
    fn imported_cluster_has_no_rke_config() {
        let cluster: Cluster = serde_json::from_value(json!({
            "apiVersion": "provisioning.cattle.io/v1",
            "kind": "Cluster",
            "metadata": {"name": "imported"},
            "spec": {}
        }))
        .unwrap();
        assert!(cluster.spec.rke_config.is_none());
        assert!(cluster.spec.kubernetes_version.is_empty());
    }
}
