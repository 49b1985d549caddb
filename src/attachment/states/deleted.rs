//! Deleted mode for attachments: detach named rows, or every current
//! row when none are named.

use crate::ModuleResult;

use super::super::api::VrfAttachmentApi;
use super::super::config::VrfAttachmentConfig;
use super::base::{AttachOps, rows_from_records};

/// Handle deleted mode for VRF attachments.
///
/// A config listing switch attachments detaches exactly those rows
/// (`deployment: false`). A config with no rows queries the VRF's
/// current attachments and detaches them all; a VRF with nothing
/// attached is an idempotent no-op.
pub struct Deleted {
    ops: AttachOps,
}

impl Deleted {
    pub fn new(api: VrfAttachmentApi) -> Self {
        Self {
            ops: AttachOps::new(api),
        }
    }

    pub async fn execute(mut self, configs: &[VrfAttachmentConfig]) -> ModuleResult {
        for config in configs {
            if config.switch_attachments.is_empty() {
                self.detach_all(config).await;
            } else {
                self.ops.detach(config).await;
            }
        }

        let mut result = self.ops.finalize();
        if !result.failed && result.msg == "No changes needed" {
            result.msg = "No VRF attachments to delete".to_string();
            result.stdout = result.msg.clone();
        }
        result
    }

    async fn detach_all(&mut self, config: &VrfAttachmentConfig) {
        let Some(records) = self
            .ops
            .current_rows(&config.fabric, &config.vrf_name)
            .await
        else {
            return;
        };
        let rows = rows_from_records(&config.fabric, &config.vrf_name, &records);
        self.ops
            .detach_rows(&config.fabric, &config.vrf_name, rows)
            .await;
    }
}
