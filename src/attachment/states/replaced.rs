//! Replaced mode for attachments: detach drifted or unwanted rows,
//! then attach the desired set.

use crate::ModuleResult;

use super::super::api::VrfAttachmentApi;
use super::super::config::VrfAttachmentConfig;
use super::base::{AttachOps, record_ip, row_differs, rows_from_records};

/// Handle replaced mode for VRF attachments.
///
/// Per desired item: query the VRF's current rows, detach every row
/// whose switch is absent from the desired set or whose properties
/// (VLAN, deployment, extension values) drift from it, then attach the
/// desired configuration. Detach runs first so a switch changing VLANs
/// is never attached twice at once.
pub struct Replaced {
    ops: AttachOps,
}

impl Replaced {
    pub fn new(api: VrfAttachmentApi) -> Self {
        Self {
            ops: AttachOps::new(api),
        }
    }

    pub async fn execute(mut self, configs: &[VrfAttachmentConfig]) -> ModuleResult {
        for config in configs {
            self.replace(config).await;
        }
        self.ops.finalize()
    }

    async fn replace(&mut self, config: &VrfAttachmentConfig) {
        let Some(records) = self
            .ops
            .current_rows(&config.fabric, &config.vrf_name)
            .await
        else {
            return;
        };

        let unwanted: Vec<_> = records
            .iter()
            .filter(|record| match record_ip(record) {
                Some(ip) => match config
                    .switch_attachments
                    .iter()
                    .find(|attach| attach.ip_address == ip)
                {
                    Some(desired) => row_differs(record, desired),
                    None => true,
                },
                // No IP to match against; leave the row alone.
                None => false,
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
