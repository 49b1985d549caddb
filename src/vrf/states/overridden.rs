//! Overridden mode: each referenced fabric ends up with exactly the
//! desired set.

use crate::ModuleResult;

use super::super::api::VrfApi;
use super::super::config::VrfConfig;
use super::base::{Op, StateOps};

/// Handle overridden mode for VRF resources.
///
/// Per fabric referenced by the batch: first delete every existing VRF
/// whose name is not in the desired set, then create/update the desired
/// items with merged logic. Deleting first avoids transient
/// duplicate-identifier conflicts on controllers that reject duplicate
/// VRF ids during the create phase.
pub struct Overridden {
    ops: StateOps,
}

impl Overridden {
    pub fn new(api: VrfApi) -> Self {
        Self {
            ops: StateOps::new(api),
        }
    }

    pub async fn execute(mut self, configs: &[VrfConfig]) -> ModuleResult {
        self.ops.populate_fabric_caches(configs).await;

        // Group by fabric, preserving first-appearance order.
        let mut fabrics: Vec<(String, Vec<&VrfConfig>)> = Vec::new();
        for config in configs {
            match fabrics.iter_mut().find(|(fabric, _)| *fabric == config.fabric) {
                Some((_, group)) => group.push(config),
                None => fabrics.push((config.fabric.clone(), vec![config])),
            }
        }

        for (fabric, desired) in fabrics {
            self.override_fabric(&fabric, &desired).await;
        }

        self.ops.finalize("Updated")
    }

    async fn override_fabric(&mut self, fabric: &str, desired: &[&VrfConfig]) {
        let existing = match self.ops.api.get_all_cached(fabric).await {
            Ok(existing) => existing,
            Err(e) => {
                self.ops
                    .errors
                    .push(format!("Failed to list VRFs in fabric {fabric}: {e}"));
                return;
            }
        };

        // Step 1: delete everything not desired. Sorted for a stable
        // operation order.
        let mut unwanted: Vec<&String> = existing
            .keys()
            .filter(|name| !desired.iter().any(|config| config.vrf_name == **name))
            .collect();
        unwanted.sort();
        for name in unwanted {
            let name = name.clone();
            self.ops.delete_vrf(fabric, &name).await;
        }

        // Step 2: merged logic over the desired set.
        for config in desired {
            match existing.get(&config.vrf_name) {
                Some(current) if StateOps::vrfs_equal(current, config) => {}
                Some(_) => {
                    self.ops.apply(config, Op::Update).await;
                }
                None => {
                    self.ops.apply(config, Op::Create).await;
                }
            }
        }
    }
}
