//! VRF template names and template configuration.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{Result, VrfError};

/// VRF templates shipped with NDFC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VrfTemplate {
    DefaultVrfUniversal,
    DefaultVrfExtensionUniversal,
}

impl VrfTemplate {
    pub fn as_str(&self) -> &'static str {
        match self {
            VrfTemplate::DefaultVrfUniversal => "Default_VRF_Universal",
            VrfTemplate::DefaultVrfExtensionUniversal => "Default_VRF_Extension_Universal",
        }
    }
}

impl std::fmt::Display for VrfTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-VRF template configuration.
///
/// Templates carry many site-specific knobs; the handful every fabric
/// uses are typed, everything else rides in `extra` untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VrfTemplateConfig {
    #[serde(rename = "vrfSegmentId", skip_serializing_if = "Option::is_none")]
    pub vrf_segment_id: Option<u32>,
    #[serde(rename = "vrfVlanId", skip_serializing_if = "Option::is_none")]
    pub vrf_vlan_id: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mtu: Option<u32>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl VrfTemplateConfig {
    /// Serialize to the JSON string the controller expects in
    /// `vrfTemplateConfig`.
    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string(self).map_err(VrfError::from)
    }
}
