//! Query mode: read-only aggregation.

use crate::ModuleResult;

use super::super::api::VrfApi;
use super::super::config::VrfConfig;
use super::base::StateOps;

/// Handle query mode for VRF resources.
///
/// Never mutates and always reports `changed = false`. A config naming
/// a VRF filters the fabric listing to that one; an empty name returns
/// the whole fabric. All reads bypass the cache — the bulk endpoint is
/// the only reliable carrier of `vrfStatus`.
pub struct Query {
    ops: StateOps,
}

impl Query {
    pub fn new(api: VrfApi) -> Self {
        Self {
            ops: StateOps::new(api),
        }
    }

    pub async fn execute(mut self, configs: &[VrfConfig]) -> ModuleResult {
        for config in configs {
            let outcome = if config.vrf_name.is_empty() {
                self.ops.api.query_all(&config.fabric).await
            } else {
                self.ops.api.query(&config.fabric, &config.vrf_name).await
            };
            match outcome {
                Ok(resp) if resp.is_success() => self.ops.responses.push(resp),
                Ok(resp) => self.ops.errors.push(format!(
                    "Failed to query VRFs in fabric {}: {}",
                    config.fabric, resp.message
                )),
                Err(e) => self.ops.errors.push(format!(
                    "Failed to query VRFs in fabric {}: {e}",
                    config.fabric
                )),
            }
        }

        let total: usize = self.ops.responses.iter().map(|r| r.record_count()).sum();
        let mut result = self.ops.finalize("Updated");
        if !result.failed {
            result.msg = format!("Queried {total} VRFs");
            result.stdout = result.msg.clone();
        }
        // Query never changes state.
        result.changed = false;
        result
    }
}
