//! Query mode for attachments: read-only aggregation.

use crate::ModuleResult;

use super::super::api::VrfAttachmentApi;
use super::super::config::VrfAttachmentConfig;
use super::base::AttachOps;

/// Handle query mode for VRF attachments.
///
/// Never mutates and always reports `changed = false`. Each config
/// queries its VRF's attachment rows; results aggregate into the
/// batch response list.
pub struct Query {
    ops: AttachOps,
}

impl Query {
    pub fn new(api: VrfAttachmentApi) -> Self {
        Self {
            ops: AttachOps::new(api),
        }
    }

    pub async fn execute(mut self, configs: &[VrfAttachmentConfig]) -> ModuleResult {
        for config in configs {
            match self.ops.api.query(&config.fabric, &config.vrf_name).await {
                Ok(resp) if resp.is_success() => self.ops.responses.push(resp),
                Ok(resp) => self.ops.errors.push(format!(
                    "Failed to query VRF attachments for {} in fabric {}: {}",
                    config.vrf_name, config.fabric, resp.message
                )),
                Err(e) => self.ops.errors.push(format!(
                    "Failed to query VRF attachments for {} in fabric {}: {e}",
                    config.vrf_name, config.fabric
                )),
            }
        }

        let total = self.ops.responses.len();
        let mut result = self.ops.finalize();
        if !result.failed {
            result.msg = format!("Queried {total} VRF attachments");
            result.stdout = result.msg.clone();
        }
        // Query never changes state.
        result.changed = false;
        result
    }
}
