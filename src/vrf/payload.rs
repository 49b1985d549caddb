//! Wire payload for VRF create/update calls.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Result, VrfError};

use super::template::VrfTemplate;

/// The payload POSTed to the VRF endpoint.
///
/// `vrf_template_config` and `service_vrf_template` are JSON *strings*
/// on the wire (a controller quirk); [`validate`](Self::validate) checks
/// they actually parse before anything is sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VrfPayload {
    pub fabric: String,
    #[serde(rename = "vrfName")]
    pub vrf_name: String,
    #[serde(rename = "vrfId")]
    pub vrf_id: u32,
    #[serde(rename = "vrfTemplate")]
    pub vrf_template: String,
    #[serde(rename = "vrfTemplateConfig")]
    pub vrf_template_config: String,
    #[serde(rename = "vrfExtensionTemplate")]
    pub vrf_extension_template: String,
    #[serde(rename = "serviceVrfTemplate", skip_serializing_if = "Option::is_none")]
    pub service_vrf_template: Option<String>,
    pub source: Option<String>,
    pub deploy: bool,
}

impl VrfPayload {
    /// Check the payload is sendable: identity fields within controller
    /// limits, JSON-string fields valid JSON.
    pub fn validate(&self) -> Result<()> {
        if self.fabric.is_empty() || self.fabric.len() > 64 {
            return Err(VrfError::Configuration(
                "fabric must be 1-64 characters".into(),
            ));
        }
        if self.vrf_name.is_empty() || self.vrf_name.len() > 32 {
            return Err(VrfError::Configuration(
                "vrf_name must be 1-32 characters".into(),
            ));
        }
        serde_json::from_str::<Value>(&self.vrf_template_config).map_err(|e| {
            VrfError::Configuration(format!("vrfTemplateConfig must be valid JSON: {e}"))
        })?;
        if let Some(service_template) = &self.service_vrf_template {
            serde_json::from_str::<Value>(service_template).map_err(|e| {
                VrfError::Configuration(format!("serviceVrfTemplate must be valid JSON: {e}"))
            })?;
        }
        Ok(())
    }
}

impl Default for VrfPayload {
    fn default() -> Self {
        Self {
            fabric: String::new(),
            vrf_name: String::new(),
            vrf_id: 0,
            vrf_template: VrfTemplate::DefaultVrfUniversal.as_str().to_string(),
            vrf_template_config: "{}".to_string(),
            vrf_extension_template: VrfTemplate::DefaultVrfExtensionUniversal
                .as_str()
                .to_string(),
            service_vrf_template: None,
            source: None,
            deploy: true,
        }
    }
}
