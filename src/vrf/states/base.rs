//! Shared reconciliation primitives.
//!
//! Every mode handler owns a [`StateOps`]: the API client plus the
//! batch-level accumulators (per-operation name buckets, error list, raw
//! responses). Handlers drive their per-mode algorithm through these
//! helpers and call [`StateOps::finalize`] once at the end.

use serde_json::Value;
use tracing::debug;

use crate::transport::ControllerResponse;
use crate::{ModuleResult, VrfError};

use super::super::api::VrfApi;
use super::super::config::VrfConfig;
use super::super::data::VrfData;

/// Which bucket a successful operation lands in.
#[derive(Clone, Copy)]
pub(crate) enum Op {
    Create,
    Update,
    Delete,
}

impl Op {
    fn verb(&self) -> &'static str {
        match self {
            Op::Create => "create",
            Op::Update => "update",
            Op::Delete => "delete",
        }
    }
}

pub(crate) struct StateOps {
    pub api: VrfApi,
    pub result: ModuleResult,
    pub created: Vec<String>,
    pub updated: Vec<String>,
    pub deleted: Vec<String>,
    pub errors: Vec<String>,
    pub responses: Vec<ControllerResponse>,
}

impl StateOps {
    pub fn new(api: VrfApi) -> Self {
        Self {
            api,
            result: ModuleResult::new(),
            created: Vec::new(),
            updated: Vec::new(),
            deleted: Vec::new(),
            errors: Vec::new(),
            responses: Vec::new(),
        }
    }

    /// Pre-warm the cache with one bulk fetch per distinct fabric in
    /// the batch, so N items in the same fabric cost one read call.
    ///
    /// A failed pre-warm is not an error — the per-item reads will
    /// surface any real failure themselves.
    pub async fn populate_fabric_caches(&self, configs: &[VrfConfig]) {
        let mut seen = Vec::new();
        for config in configs {
            if seen.contains(&config.fabric) {
                continue;
            }
            seen.push(config.fabric.clone());
            if let Err(e) = self.api.get_all_cached(&config.fabric).await {
                debug!(fabric = %config.fabric, error = %e, "cache pre-warm failed");
            }
        }
    }

    /// Cache-aware existence check. Errors are recorded against the
    /// batch and reported as `None` so the caller can skip the item.
    pub async fn exists(&mut self, fabric: &str, vrf_name: &str) -> Option<Option<VrfData>> {
        match self.api.exists_cached(fabric, vrf_name).await {
            Ok((_, current)) => Some(current),
            Err(e) => {
                self.errors
                    .push(format!("Failed to read VRF {vrf_name}: {e}"));
                None
            }
        }
    }

    /// Structural equality for the fields that matter for idempotence.
    ///
    /// `vrf_template_config` is compared after parsing both sides to
    /// JSON values, so key order and whitespace cannot force a spurious
    /// update. A desired `vrf_id` of `None` (controller-assigned)
    /// matches any current id.
    pub fn vrfs_equal(current: &VrfData, desired: &VrfConfig) -> bool {
        if current.vrf_name.as_deref() != Some(desired.vrf_name.as_str()) {
            return false;
        }
        if let Some(id) = desired.vrf_id {
            if current.vrf_id != Some(id) {
                return false;
            }
        }
        if current.vrf_template.as_deref() != Some(desired.vrf_template.as_str()) {
            return false;
        }
        if current.vrf_extension_template.as_deref()
            != Some(desired.vrf_extension_template.as_str())
        {
            return false;
        }

        let desired_config = match serde_json::to_value(&desired.vrf_template_config) {
            Ok(value) => value,
            Err(_) => return false,
        };
        let current_config = current
            .vrf_template_config
            .as_deref()
            .and_then(|raw| serde_json::from_str::<Value>(raw).ok());
        current_config == Some(desired_config)
    }

    /// Issue a create or update for one desired item.
    pub async fn apply(&mut self, config: &VrfConfig, op: Op) -> bool {
        let payload = match config.to_payload() {
            Ok(payload) => payload,
            Err(e) => {
                self.errors.push(format!(
                    "Failed to {} VRF {}: {e}",
                    op.verb(),
                    config.vrf_name
                ));
                return false;
            }
        };
        let outcome = match op {
            Op::Create => self.api.create(&payload).await,
            Op::Update => self.api.update(&payload).await,
            Op::Delete => unreachable!("deletes go through delete_vrf"),
        };
        self.handle_outcome(outcome, &config.vrf_name, op)
    }

    /// Issue a delete for one VRF.
    pub async fn delete_vrf(&mut self, fabric: &str, vrf_name: &str) -> bool {
        let outcome = self.api.delete(fabric, vrf_name).await;
        self.handle_outcome(outcome, vrf_name, Op::Delete)
    }

    /// Fold one operation outcome into the batch accumulators.
    pub fn handle_outcome(
        &mut self,
        outcome: Result<ControllerResponse, VrfError>,
        vrf_name: &str,
        op: Op,
    ) -> bool {
        match outcome {
            Ok(resp) if resp.is_success() => {
                let bucket = match op {
                    Op::Create => &mut self.created,
                    Op::Update => &mut self.updated,
                    Op::Delete => &mut self.deleted,
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

    /// Seal the batch: errors win, otherwise a summary of what changed.
    /// `updated_label` distinguishes "Updated" from "Replaced" in the
    /// summary.
    pub fn finalize(mut self, updated_label: &str) -> ModuleResult {
        if self.errors.is_empty() {
            let mut parts = Vec::new();
            if !self.deleted.is_empty() {
                parts.push(format!("Deleted VRFs: {}", self.deleted.join(", ")));
            }
            if !self.created.is_empty() {
                parts.push(format!("Created VRFs: {}", self.created.join(", ")));
            }
            if !self.updated.is_empty() {
                parts.push(format!(
                    "{updated_label} VRFs: {}",
                    self.updated.join(", ")
                ));
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

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn current(name: &str, id: u32, config_json: &str) -> VrfData {
        VrfData {
            vrf_name: Some(name.to_string()),
            vrf_id: Some(id),
            vrf_template: Some("Default_VRF_Universal".to_string()),
            vrf_extension_template: Some("Default_VRF_Extension_Universal".to_string()),
            vrf_template_config: Some(config_json.to_string()),
            ..VrfData::default()
        }
    }

    fn desired(name: &str, id: Option<u32>, config: Value) -> VrfConfig {
        VrfConfig {
            vrf_id: id,
            vrf_template_config: serde_json::from_value(config).unwrap(),
            ..VrfConfig::named("f1", name)
        }
    }

    #[test]
    fn equal_when_everything_matches() {
        let cur = current("blue", 50001, r#"{"vrfSegmentId": 50001, "mtu": 9216}"#);
        let des = desired("blue", Some(50001), json!({"vrfSegmentId": 50001, "mtu": 9216}));
        assert!(StateOps::vrfs_equal(&cur, &des));
    }

    #[test]
    fn key_order_in_template_config_is_cosmetic() {
        let cur = current("blue", 50001, r#"{"mtu": 9216, "vrfSegmentId": 50001}"#);
        let des = desired("blue", Some(50001), json!({"vrfSegmentId": 50001, "mtu": 9216}));
        assert!(StateOps::vrfs_equal(&cur, &des));
    }

    #[test]
    fn differing_segment_id_is_drift() {
        let cur = current("blue", 50001, r#"{"vrfSegmentId": 50001}"#);
        let des = desired("blue", Some(50001), json!({"vrfSegmentId": 99}));
        assert!(!StateOps::vrfs_equal(&cur, &des));
    }

    #[test]
    fn absent_desired_id_matches_any_current_id() {
        let cur = current("blue", 50001, r#"{}"#);
        let des = desired("blue", None, json!({}));
        assert!(StateOps::vrfs_equal(&cur, &des));
    }

    #[test]
    fn differing_id_is_drift() {
        let cur = current("blue", 50001, r#"{}"#);
        let des = desired("blue", Some(2), json!({}));
        assert!(!StateOps::vrfs_equal(&cur, &des));
    }

    #[test]
    fn unparseable_current_config_is_drift() {
        let cur = current("blue", 50001, "not json");
        let des = desired("blue", Some(50001), json!({}));
        assert!(!StateOps::vrfs_equal(&cur, &des));
    }
}
