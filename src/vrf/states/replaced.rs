//! Replaced mode: drifted resources are deleted and recreated whole.

use crate::ModuleResult;

use super::super::api::VrfApi;
use super::super::config::VrfConfig;
use super::base::{Op, StateOps};

/// Handle replaced mode for VRF resources.
///
/// Absent items are created like merged. A present-but-drifted item is
/// deleted and then recreated — a full replace, not a partial patch. If
/// the delete succeeds and the recreate fails, the resource is left
/// missing: that partial-failure state is reported as one combined
/// error for the item and no compensation is attempted.
pub struct Replaced {
    ops: StateOps,
}

impl Replaced {
    pub fn new(api: VrfApi) -> Self {
        Self {
            ops: StateOps::new(api),
        }
    }

    pub async fn execute(mut self, configs: &[VrfConfig]) -> ModuleResult {
        self.ops.populate_fabric_caches(configs).await;

        for config in configs {
            let Some(current) = self.ops.exists(&config.fabric, &config.vrf_name).await else {
                continue;
            };
            match current {
                Some(current) if StateOps::vrfs_equal(&current, config) => {
                    // Already the exact desired shape; nothing to replace.
                }
                Some(_) => {
                    self.replace_existing(config).await;
                }
                None => {
                    self.ops.apply(config, Op::Create).await;
                }
            }
        }

        self.ops.finalize("Replaced")
    }

    /// Delete then recreate one VRF.
    async fn replace_existing(&mut self, config: &VrfConfig) {
        let vrf_name = &config.vrf_name;

        match self.ops.api.delete(&config.fabric, vrf_name).await {
            Ok(resp) if resp.is_success() => {}
            Ok(resp) => {
                self.ops.errors.push(format!(
                    "Failed to delete existing VRF {vrf_name}: {}",
                    resp.message
                ));
                return;
            }
            Err(e) => {
                self.ops
                    .errors
                    .push(format!("Failed to delete existing VRF {vrf_name}: {e}"));
                return;
            }
        }

        let payload = match config.to_payload() {
            Ok(payload) => payload,
            Err(e) => {
                self.ops.errors.push(format!(
                    "Failed to create replacement VRF {vrf_name} after delete: {e}"
                ));
                return;
            }
        };
        match self.ops.api.create(&payload).await {
            Ok(resp) if resp.is_success() => {
                self.ops.updated.push(vrf_name.clone());
                self.ops.result.changed = true;
                self.ops.responses.push(resp);
            }
            Ok(resp) => {
                // Delete already happened; the VRF is gone until a
                // later run recreates it.
                self.ops.errors.push(format!(
                    "Failed to create replacement VRF {vrf_name} after delete: {}",
                    resp.message
                ));
            }
            Err(e) => {
                self.ops.errors.push(format!(
                    "Failed to create replacement VRF {vrf_name} after delete: {e}"
                ));
            }
        }
    }
}
