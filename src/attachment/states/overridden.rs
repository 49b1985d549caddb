//! Overridden mode for attachments: only the desired switches stay
//! attached.

use crate::ModuleResult;

use super::super::api::VrfAttachmentApi;
use super::super::config::VrfAttachmentConfig;
use super::base::{AttachOps, record_ip, rows_from_records};

/// Handle overridden mode for VRF attachments.
///
/// Per desired item: query the VRF's current rows, detach every row
/// whose switch is not in the desired set at all (drift on desired
/// switches is handled by the unconditional attach), then attach the
/// desired configuration. Detach runs first.
pub struct Overridden {
    ops: AttachOps,
}

impl Overridden {
    pub fn new(api: VrfAttachmentApi) -> Self {
        Self {
            ops: AttachOps::new(api),
        }
    }

    pub async fn execute(mut self, configs: &[VrfAttachmentConfig]) -> ModuleResult {
        for config in configs {
            self.override_attachments(config).await;
        }
        self.ops.finalize()
    }

    async fn override_attachments(&mut self, config: &VrfAttachmentConfig) {
        let Some(records) = self
            .ops
            .current_rows(&config.fabric, &config.vrf_name)
            .await
        else {
            return;
        };

        let unwanted: Vec<_> = records
            .iter()
            .filter(|record| {
                record_ip(record).is_some_and(|ip| {
                    !config
                        .switch_attachments
                        .iter()
                        .any(|attach| attach.ip_address == ip)
                })
            })
            .cloned()
            .collect();

        let rows = rows_from_records(&config.fabric, &config.vrf_name, &unwanted);
        if !rows.is_empty()
            && !self
                .ops
                .detach_rows(&config.fabric, &config.vrf_name, rows)
                .await
        {
            return;
        }

        self.ops.attach(config).await;
    }
}
