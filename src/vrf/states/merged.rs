//! Merged mode: create what's absent, update what drifted.

use crate::ModuleResult;

use super::super::api::VrfApi;
use super::super::config::VrfConfig;
use super::base::{Op, StateOps};

/// Handle merged mode for VRF resources.
///
/// For each desired item: absent → create, present-but-drifted →
/// update, present-and-equal → no-op. Never deletes anything.
pub struct Merged {
    ops: StateOps,
}

impl Merged {
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
                    // Already converged; idempotent no-op.
                }
                Some(_) => {
                    self.ops.apply(config, Op::Update).await;
                }
                None => {
                    self.ops.apply(config, Op::Create).await;
                }
            }
        }

        self.ops.finalize("Updated")
    }
}
