//! Deleted mode: remove named VRFs, or everything in a fabric.

use crate::ModuleResult;

use super::super::api::VrfApi;
use super::super::config::VrfConfig;
use super::base::StateOps;

/// Handle deleted mode for VRF resources.
///
/// A config with a VRF name deletes that one VRF if it currently
/// exists; deleting a nonexistent VRF is a no-op, not an error. A
/// config with an empty name deletes every VRF in its fabric — the
/// fabric listing for that path is fetched fresh from the controller,
/// never from the cache, so a stale cached listing cannot drive the
/// deletes.
pub struct Deleted {
    ops: StateOps,
}

impl Deleted {
    pub fn new(api: VrfApi) -> Self {
        Self {
            ops: StateOps::new(api),
        }
    }

    pub async fn execute(mut self, configs: &[VrfConfig]) -> ModuleResult {
        for config in configs {
            if config.vrf_name.is_empty() {
                self.delete_all_in_fabric(&config.fabric).await;
            } else {
                self.delete_named(config).await;
            }
        }

        // Finalize with deleted-specific wording for the empty case.
        let mut result = self.ops.finalize("Updated");
        if !result.failed && result.msg == "No changes needed" {
            result.msg = "No VRFs to delete".to_string();
            result.stdout = result.msg.clone();
        }
        result
    }

    async fn delete_named(&mut self, config: &VrfConfig) {
        let Some(current) = self.ops.exists(&config.fabric, &config.vrf_name).await else {
            return;
        };
        if current.is_some() {
            self.ops.delete_vrf(&config.fabric, &config.vrf_name).await;
        }
        // Absent already: idempotent no-op.
    }

    async fn delete_all_in_fabric(&mut self, fabric: &str) {
        let listing = match self.ops.api.query_all(fabric).await {
            Ok(resp) if resp.is_success() => resp,
            Ok(resp) => {
                self.ops.errors.push(format!(
                    "Failed to list VRFs in fabric {fabric}: {}",
                    resp.message
                ));
                return;
            }
            Err(e) => {
                self.ops
                    .errors
                    .push(format!("Failed to list VRFs in fabric {fabric}: {e}"));
                return;
            }
        };

        let mut names: Vec<String> = listing
            .records()
            .iter()
            .filter_map(|record| record.get("vrfName")?.as_str().map(str::to_string))
            .collect();
        names.sort();

        for name in names {
            self.ops.delete_vrf(fabric, &name).await;
        }
    }
}
