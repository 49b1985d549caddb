//! Wire payload for VRF attachment calls.

use serde::{Deserialize, Serialize};

use crate::{Result, VrfError};

/// One switch row in an attachment payload.
///
/// `extension_values` and `instance_values` are JSON strings on the
/// wire (empty string when unused) — the same controller quirk as the
/// VRF template config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwitchAttachPayload {
    pub fabric: String,
    #[serde(rename = "vrfName")]
    pub vrf_name: String,
    #[serde(rename = "serialNumber")]
    pub serial_number: String,
    #[serde(rename = "vlanId")]
    pub vlan_id: u16,
    pub deployment: bool,
    #[serde(rename = "extensionValues", default)]
    pub extension_values: String,
    #[serde(rename = "freeformConfig", default)]
    pub freeform_config: String,
    #[serde(rename = "instanceValues", default)]
    pub instance_values: String,
}

/// The attachment payload POSTed (as a one-element list) to the
/// attachments endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VrfAttachmentPayload {
    #[serde(rename = "vrfName")]
    pub vrf_name: String,
    #[serde(rename = "lanAttachList")]
    pub lan_attach_list: Vec<SwitchAttachPayload>,
}

impl VrfAttachmentPayload {
    pub fn validate(&self) -> Result<()> {
        if self.vrf_name.is_empty() || self.vrf_name.len() > 32 {
            return Err(VrfError::Configuration(
                "vrf_name must be 1-32 characters".into(),
            ));
        }
        if self.lan_attach_list.is_empty() {
            return Err(VrfError::Configuration(
                "lanAttachList must not be empty".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> SwitchAttachPayload {
        SwitchAttachPayload {
            fabric: "f1".into(),
            vrf_name: "blue".into(),
            serial_number: "FDO1234".into(),
            vlan_id: 2001,
            deployment: true,
            extension_values: String::new(),
            freeform_config: String::new(),
            instance_values: String::new(),
        }
    }

    #[test]
    fn serializes_with_controller_field_names() {
        let payload = VrfAttachmentPayload {
            vrf_name: "blue".into(),
            lan_attach_list: vec![row()],
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["vrfName"], "blue");
        assert_eq!(json["lanAttachList"][0]["serialNumber"], "FDO1234");
        assert_eq!(json["lanAttachList"][0]["vlanId"], 2001);
    }

    #[test]
    fn rejects_empty_attach_list() {
        let payload = VrfAttachmentPayload {
            vrf_name: "blue".into(),
            lan_attach_list: vec![],
        };
        assert!(payload.validate().is_err());
    }
}
