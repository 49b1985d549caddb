//! Desired VRF attachment configuration and per-mode validation.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{ReconcileMode, Result, VrfError};

/// One desired switch attachment.
///
/// Switches are addressed by management IP; the API client resolves the
/// IP to the serial number the controller wants before sending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwitchAttachConfig {
    pub ip_address: String,
    pub vlan_id: u16,
    #[serde(default)]
    pub deployment: bool,
    /// VRF Lite extension parameters; nested objects are JSON-encoded
    /// field by field on the wire.
    #[serde(default)]
    pub extension_values: Option<Map<String, Value>>,
    #[serde(default)]
    pub freeform_config: Option<String>,
    #[serde(default)]
    pub instance_values: Option<Map<String, Value>>,
}

impl SwitchAttachConfig {
    pub fn new(ip_address: impl Into<String>, vlan_id: u16) -> Self {
        Self {
            ip_address: ip_address.into(),
            vlan_id,
            deployment: false,
            extension_values: None,
            freeform_config: None,
            instance_values: None,
        }
    }

    /// Wire form of `extension_values`: each object-valued field is
    /// JSON-encoded in place, then the whole map is JSON-encoded. Empty
    /// string when unset.
    pub fn encoded_extension_values(&self) -> Result<String> {
        let Some(values) = &self.extension_values else {
            return Ok(String::new());
        };
        if values.is_empty() {
            return Ok(String::new());
        }
        let mut encoded = Map::new();
        for (field, value) in values {
            match value {
                Value::Object(_) => {
                    encoded.insert(field.clone(), Value::String(serde_json::to_string(value)?));
                }
                other => {
                    encoded.insert(field.clone(), other.clone());
                }
            }
        }
        Ok(serde_json::to_string(&Value::Object(encoded))?)
    }

    /// Wire form of `instance_values`. Empty string when unset.
    pub fn encoded_instance_values(&self) -> Result<String> {
        match &self.instance_values {
            Some(values) if !values.is_empty() => {
                Ok(serde_json::to_string(&Value::Object(values.clone()))?)
            }
            _ => Ok(String::new()),
        }
    }
}

/// One desired VRF attachment from the caller's batch: which switches a
/// VRF should be attached to, and how.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VrfAttachmentConfig {
    pub fabric: String,
    pub vrf_name: String,
    #[serde(default)]
    pub switch_attachments: Vec<SwitchAttachConfig>,
}

impl VrfAttachmentConfig {
    pub fn new(
        fabric: impl Into<String>,
        vrf_name: impl Into<String>,
        switch_attachments: Vec<SwitchAttachConfig>,
    ) -> Self {
        Self {
            fabric: fabric.into(),
            vrf_name: vrf_name.into(),
            switch_attachments,
        }
    }

    fn validate_for(&self, mode: ReconcileMode) -> std::result::Result<(), String> {
        if self.fabric.is_empty() || self.fabric.len() > 64 {
            return Err("fabric must be 1-64 characters".into());
        }
        if self.vrf_name.is_empty() || self.vrf_name.len() > 32 {
            return Err("vrf_name must be 1-32 characters".into());
        }
        match mode {
            ReconcileMode::Merged | ReconcileMode::Replaced | ReconcileMode::Overridden => {
                if self.switch_attachments.is_empty() {
                    return Err(format!(
                        "switch_attachments must not be empty for {mode} state"
                    ));
                }
            }
            // Empty attachments mean "all current rows" for deleted;
            // query ignores them.
            ReconcileMode::Deleted | ReconcileMode::Query => {}
        }
        for (row, attach) in self.switch_attachments.iter().enumerate() {
            if attach.ip_address.is_empty() {
                return Err(format!("switch_attachments[{row}]: ip_address is required"));
            }
            if !(2..=4094).contains(&attach.vlan_id) {
                return Err(format!(
                    "switch_attachments[{row}]: vlan_id must be 2-4094"
                ));
            }
        }
        Ok(())
    }
}

/// Validate a whole attachment batch against a mode's schema. Atomic:
/// the first invalid item aborts with its index and cause.
pub fn validate_batch(mode: ReconcileMode, configs: &[VrfAttachmentConfig]) -> Result<()> {
    for (index, config) in configs.iter().enumerate() {
        config
            .validate_for(mode)
            .map_err(|reason| VrfError::Validation { index, reason })?;
    }
    Ok(())
}
