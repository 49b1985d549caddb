//! Shared attachment reconciliation primitives.

use serde_json::{Map, Value};
use tracing::debug;

use crate::transport::ControllerResponse;
use crate::{ModuleResult, VrfError};

use super::super::api::VrfAttachmentApi;
use super::super::config::{SwitchAttachConfig, VrfAttachmentConfig};
use super::super::payload::SwitchAttachPayload;

#[derive(Clone, Copy)]
pub(crate) enum Op {
    Attach,
    Detach,
}

impl Op {
    fn verb(&self) -> &'static str {
        match self {
            Op::Attach => "attach",
            Op::Detach => "detach",
        }
    }
}

pub(crate) struct AttachOps {
    pub api: VrfAttachmentApi,
    pub result: ModuleResult,
    pub attached: Vec<String>,
    pub detached: Vec<String>,
    pub errors: Vec<String>,
    pub responses: Vec<ControllerResponse>,
}

impl AttachOps {
    pub fn new(api: VrfAttachmentApi) -> Self {
        Self {
            api,
            result: ModuleResult::new(),
            attached: Vec::new(),
            detached: Vec::new(),
            errors: Vec::new(),
            responses: Vec::new(),
        }
    }

    pub async fn attach(&mut self, config: &VrfAttachmentConfig) -> bool {
        let outcome = self.api.attach(config).await;
        self.handle_outcome(outcome, &config.vrf_name, Op::Attach)
    }

    pub async fn detach(&mut self, config: &VrfAttachmentConfig) -> bool {
        let outcome = self.api.detach(config).await;
        self.handle_outcome(outcome, &config.vrf_name, Op::Detach)
    }

    pub async fn detach_rows(
        &mut self,
        fabric: &str,
        vrf_name: &str,
        rows: Vec<SwitchAttachPayload>,
    ) -> bool {
        if rows.is_empty() {
            return true;
        }
        let outcome = self.api.detach_rows(fabric, vrf_name, rows).await;
        self.handle_outcome(outcome, vrf_name, Op::Detach)
    }

    pub fn handle_outcome(
        &mut self,
        outcome: Result<ControllerResponse, VrfError>,
        vrf_name: &str,
        op: Op,
    ) -> bool {
        match outcome {
            Ok(resp) if resp.is_success() => {
                let bucket = match op {
                    Op::Attach => &mut self.attached,
                    Op::Detach => &mut self.detached,
                };
                bucket.push(vrf_name.to_string());
                self.result.changed = true;
                self.responses.push(resp);
                true
            }
            Ok(resp) => {
                self.errors.push(format!(
                    "Failed to {} VRF {vrf_name}: {}",
                    op.verb(),
                    resp.message
                ));
                false
            }
            Err(e) => {
                self.errors
                    .push(format!("Failed to {} VRF {vrf_name}: {e}", op.verb()));
                false
            }
        }
    }

    /// The controller's current attachment rows for one VRF. A failed
    /// query is recorded against the batch and reported as `None` so
    /// the caller skips the item rather than acting on a blind guess.
    pub async fn current_rows(
        &mut self,
        fabric: &str,
        vrf_name: &str,
    ) -> Option<Vec<Map<String, Value>>> {
        match self.api.query(fabric, vrf_name).await {
            Ok(resp) if resp.is_success() => Some(resp.records()),
            Ok(resp) => {
                self.errors.push(format!(
                    "Failed to query VRF attachments for {vrf_name} in fabric {fabric}: {}",
                    resp.message
                ));
                None
            }
            Err(e) => {
                self.errors.push(format!(
                    "Failed to query VRF attachments for {vrf_name} in fabric {fabric}: {e}"
                ));
                None
            }
        }
    }

    /// Seal the batch.
    pub fn finalize(mut self) -> ModuleResult {
        if self.errors.is_empty() {
            let mut parts = Vec::new();
            if !self.detached.is_empty() {
                parts.push(format!("Detached VRFs: {}", self.detached.join(", ")));
            }
            if !self.attached.is_empty() {
                parts.push(format!("Attached VRFs: {}", self.attached.join(", ")));
            }
            if parts.is_empty() {
                parts.push("No changes needed".to_string());
            }
            self.result.msg = parts.join("; ");
            self.result.stdout = self.result.msg.clone();
        } else {
            self.result.failed = true;
            self.result.msg = self.errors.join("; ");
            self.result.stderr = self.result.msg.clone();
        }
        self.result.response = self
            .responses
            .iter()
            .filter_map(|resp| serde_json::to_value(resp).ok())
            .collect();
        self.result
    }
}

/// Build detachable payload rows from controller records. Rows without
/// a serial number can't be addressed and are skipped.
pub(crate) fn rows_from_records(
    fabric: &str,
    vrf_name: &str,
    records: &[Map<String, Value>],
) -> Vec<SwitchAttachPayload> {
    records
        .iter()
        .filter_map(|record| {
            let serial = record
                .get("serialNumber")
                .or_else(|| record.get("switchSerialNo"))
                .and_then(Value::as_str);
            let Some(serial) = serial else {
                debug!(vrf = vrf_name, "attachment record without serial, skipping");
                return None;
            };
            Some(SwitchAttachPayload {
                fabric: fabric.to_string(),
                vrf_name: vrf_name.to_string(),
                serial_number: serial.to_string(),
                vlan_id: record.get("vlanId").and_then(Value::as_u64).unwrap_or(0) as u16,
                deployment: false,
                extension_values: String::new(),
                freeform_config: String::new(),
                instance_values: String::new(),
            })
        })
        .collect()
}

/// The record's management IP, checked against desired rows.
pub(crate) fn record_ip(record: &Map<String, Value>) -> Option<&str> {
    record.get("ipAddress").and_then(Value::as_str)
}

/// Whether a current record drifts from the desired row: VLAN,
/// deployment flag, or extension values (compared canonically as JSON
/// when both sides parse).
pub(crate) fn row_differs(record: &Map<String, Value>, desired: &SwitchAttachConfig) -> bool {
    if record.get("vlanId").and_then(Value::as_u64) != Some(u64::from(desired.vlan_id)) {
        return true;
    }
    if record.get("deployment").and_then(Value::as_bool) != Some(desired.deployment) {
        return true;
    }
    let current_ext = record
        .get("extensionValues")
        .and_then(Value::as_str)
        .unwrap_or("");
    let desired_ext = desired.encoded_extension_values().unwrap_or_default();
    extension_differs(current_ext, &desired_ext)
}

fn extension_differs(current: &str, desired: &str) -> bool {
    if current == desired {
        return false;
    }
    match (
        serde_json::from_str::<Value>(current),
        serde_json::from_str::<Value>(desired),
    ) {
        (Ok(a), Ok(b)) => a != b,
        _ => true,
    }
}
