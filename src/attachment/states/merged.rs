//! Merged mode for attachments: attach every desired config.

use crate::ModuleResult;

use super::super::api::VrfAttachmentApi;
use super::super::config::VrfAttachmentConfig;
use super::base::AttachOps;

/// Handle merged mode for VRF attachments.
///
/// Issues the attach for every desired item unconditionally — the
/// attachment endpoint is idempotent on the controller side, so
/// re-attaching an identical row is a no-op there.
pub struct Merged {
    ops: AttachOps,
}

impl Merged {
    pub fn new(api: VrfAttachmentApi) -> Self {
        Self {
            ops: AttachOps::new(api),
        }
    }

    pub async fn execute(mut self, configs: &[VrfAttachmentConfig]) -> ModuleResult {
        for config in configs {
            self.ops.attach(config).await;
        }
        self.ops.finalize()
    }
}
