//! Desired VRF configuration and per-mode validation.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{ReconcileMode, Result, VrfError};

use super::payload::VrfPayload;
use super::template::{VrfTemplate, VrfTemplateConfig};

fn default_vrf_template() -> String {
    VrfTemplate::DefaultVrfUniversal.as_str().to_string()
}

fn default_extension_template() -> String {
    VrfTemplate::DefaultVrfExtensionUniversal.as_str().to_string()
}

fn default_deploy() -> bool {
    true
}

/// One desired VRF from the caller's batch.
///
/// The canonical configuration shape shared by every mode. Which fields
/// are actually mandatory varies by mode — `deleted` needs only the
/// fabric, `replaced` needs the full identity — so validation happens
/// per mode via [`validate_batch`], always before any network call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VrfConfig {
    pub fabric: String,
    #[serde(default)]
    pub vrf_name: String,
    /// Absent means the controller auto-assigns an id (merged mode).
    #[serde(default)]
    pub vrf_id: Option<u32>,
    #[serde(default = "default_vrf_template")]
    pub vrf_template: String,
    #[serde(default)]
    pub vrf_template_config: VrfTemplateConfig,
    #[serde(default = "default_extension_template")]
    pub vrf_extension_template: String,
    #[serde(default)]
    pub service_vrf_template: Option<Map<String, Value>>,
    #[serde(default = "default_deploy")]
    pub deploy: bool,
}

impl VrfConfig {
    /// Minimal config naming one VRF, as `deleted`/`query` use.
    pub fn named(fabric: impl Into<String>, vrf_name: impl Into<String>) -> Self {
        Self {
            fabric: fabric.into(),
            vrf_name: vrf_name.into(),
            vrf_id: None,
            vrf_template: default_vrf_template(),
            vrf_template_config: VrfTemplateConfig::default(),
            vrf_extension_template: default_extension_template(),
            service_vrf_template: None,
            deploy: true,
        }
    }

    /// Config addressing a whole fabric (empty VRF name).
    pub fn whole_fabric(fabric: impl Into<String>) -> Self {
        Self::named(fabric, "")
    }

    /// Convert to the wire payload. Template configurations become the
    /// JSON strings the controller expects.
    pub fn to_payload(&self) -> Result<VrfPayload> {
        let payload = VrfPayload {
            fabric: self.fabric.clone(),
            vrf_name: self.vrf_name.clone(),
            vrf_id: self.vrf_id.unwrap_or(0),
            vrf_template: self.vrf_template.clone(),
            vrf_template_config: self.vrf_template_config.to_json_string()?,
            vrf_extension_template: self.vrf_extension_template.clone(),
            service_vrf_template: self
                .service_vrf_template
                .as_ref()
                .map(serde_json::to_string)
                .transpose()?,
            source: None,
            deploy: self.deploy,
        };
        payload.validate()?;
        Ok(payload)
    }

    fn validate_for(&self, mode: ReconcileMode) -> std::result::Result<(), String> {
        if self.fabric.is_empty() || self.fabric.len() > 64 {
            return Err("fabric must be 1-64 characters".into());
        }
        if self.vrf_name.len() > 32 {
            return Err("vrf_name must be at most 32 characters".into());
        }
        match mode {
            ReconcileMode::Merged => {
                if self.vrf_name.is_empty() {
                    return Err("vrf_name is required for merged state".into());
                }
            }
            ReconcileMode::Replaced | ReconcileMode::Overridden => {
                if self.vrf_name.is_empty() {
                    return Err(format!("vrf_name is required for {mode} state"));
                }
                if self.vrf_id.is_none() {
                    return Err(format!("vrf_id is required for {mode} state"));
                }
            }
            // Empty vrf_name addresses the whole fabric.
            ReconcileMode::Deleted | ReconcileMode::Query => {}
        }
        Ok(())
    }
}

/// Validate a whole batch against a mode's schema.
///
/// Atomic: the first invalid item aborts the batch, reporting its index
/// and the failing field. Nothing is sent to the controller for a batch
/// that does not validate.
pub fn validate_batch(mode: ReconcileMode, configs: &[VrfConfig]) -> Result<()> {
    for (index, config) in configs.iter().enumerate() {
        config
            .validate_for(mode)
            .map_err(|reason| VrfError::Validation { index, reason })?;
    }
    Ok(())
}
