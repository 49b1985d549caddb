//! Controller-observed VRF state.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A VRF as the controller last reported it.
///
/// Owned by the cache until invalidated; the reconciliation engine only
/// ever compares against it. Every field is optional because controller
/// responses vary by endpoint — notably, `vrf_status` is only reliable
/// on the bulk listing endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VrfData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fabric: Option<String>,
    #[serde(rename = "vrfName", skip_serializing_if = "Option::is_none")]
    pub vrf_name: Option<String>,
    #[serde(rename = "vrfId", skip_serializing_if = "Option::is_none")]
    pub vrf_id: Option<u32>,
    #[serde(rename = "vrfTemplate", skip_serializing_if = "Option::is_none")]
    pub vrf_template: Option<String>,
    #[serde(rename = "vrfTemplateConfig", skip_serializing_if = "Option::is_none")]
    pub vrf_template_config: Option<String>,
    #[serde(rename = "vrfExtensionTemplate", skip_serializing_if = "Option::is_none")]
    pub vrf_extension_template: Option<String>,
    #[serde(rename = "serviceVrfTemplate", skip_serializing_if = "Option::is_none")]
    pub service_vrf_template: Option<String>,
    #[serde(rename = "vrfStatus", skip_serializing_if = "Option::is_none")]
    pub vrf_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(rename = "tenantName", skip_serializing_if = "Option::is_none")]
    pub tenant_name: Option<String>,
    #[serde(rename = "hierarchicalKey", skip_serializing_if = "Option::is_none")]
    pub hierarchical_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    // Can arrive as bool, string, or null depending on controller version.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enforce: Option<Value>,
    #[serde(rename = "deploymentStatus", skip_serializing_if = "Option::is_none")]
    pub deployment_status: Option<String>,
}

impl VrfData {
    /// Parse a controller record, tolerating unknown fields.
    pub fn from_record(record: &Map<String, Value>) -> Option<Self> {
        serde_json::from_value(Value::Object(record.clone())).ok()
    }

    /// Name for logging and messages.
    pub fn display_name(&self) -> &str {
        self.vrf_name.as_deref().unwrap_or("Unknown VRF")
    }

    /// Whether the VRF is deployed, judged from `vrfStatus`.
    pub fn is_deployed(&self) -> bool {
        !matches!(self.vrf_status.as_deref(), None | Some("NA") | Some("NOT_DEPLOYED"))
    }
}
