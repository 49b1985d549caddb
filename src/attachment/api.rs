//! Cache-aware VRF attachment client.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use serde_json::Value;
use tracing::debug;

use crate::cache::{CacheManager, CachedResourceService, ResourceKind};
use crate::transport::{ControllerResponse, Sender, Verb};
use crate::vrf::BASE_PATH;
use crate::{Result, VrfError};

use super::config::VrfAttachmentConfig;
use super::payload::{SwitchAttachPayload, VrfAttachmentPayload};

/// Fabric-wide switch inventory endpoint, used to resolve management
/// IPs to the serial numbers the attachment API wants.
pub const INVENTORY_PATH: &str =
    "/appcenter/cisco/ndfc/api/v1/lan-fabric/rest/inventory/allswitches";

/// VRF attachment API client.
///
/// Attach and detach go through the same endpoint — a detach is an
/// attachment row with `deployment: false`. Successful attaches write
/// the controller's answer through to the cache keyed by VRF name;
/// successful detaches evict it. Queries always bypass the cache.
pub struct VrfAttachmentApi {
    sender: Arc<dyn Sender>,
    cache: CachedResourceService<Value>,
    // (fabric, ip) -> serial. Lives as long as the client; switch
    // serials don't change within one batch run.
    serials: Mutex<HashMap<(String, String), String>>,
}

impl VrfAttachmentApi {
    /// Client with a fresh cache (five-minute default TTL).
    pub fn new(sender: Arc<dyn Sender>) -> Self {
        Self::with_cache_manager(sender, CacheManager::new())
    }

    /// Client with an injected cache manager.
    pub fn with_cache_manager(sender: Arc<dyn Sender>, manager: CacheManager<Value>) -> Self {
        Self {
            sender,
            cache: CachedResourceService::new(manager, ResourceKind::VrfAttachment),
            serials: Mutex::new(HashMap::new()),
        }
    }

    fn attachments_path(fabric: &str) -> String {
        format!("{BASE_PATH}/{fabric}/vrfs/attachments")
    }

    /// Resolve a switch management IP to its serial number via the
    /// fabric inventory, memoized for the life of the client.
    pub async fn resolve_serial(&self, fabric: &str, ip_address: &str) -> Result<String> {
        let memo_key = (fabric.to_string(), ip_address.to_string());
        if let Some(serial) = self
            .serials
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&memo_key)
        {
            return Ok(serial.clone());
        }

        let resp = self.sender.send(Verb::Get, INVENTORY_PATH, None).await?;
        if !resp.is_success() {
            return Err(VrfError::Controller {
                status: resp.return_code,
                message: resp.message,
            });
        }

        let mut serials = self
            .serials
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        for record in resp.records() {
            if let (Some(ip), Some(serial)) = (
                record.get("ipAddress").and_then(Value::as_str),
                record.get("serialNumber").and_then(Value::as_str),
            ) {
                serials.insert((fabric.to_string(), ip.to_string()), serial.to_string());
            }
        }
        serials.get(&memo_key).cloned().ok_or_else(|| {
            VrfError::SwitchNotFound {
                ip: ip_address.to_string(),
                fabric: fabric.to_string(),
            }
        })
    }

    /// Build the wire rows for a desired config, resolving serials.
    /// `deployment` overrides every row's flag when given (detaches
    /// force it to false).
    async fn build_rows(
        &self,
        config: &VrfAttachmentConfig,
        deployment: Option<bool>,
    ) -> Result<Vec<SwitchAttachPayload>> {
        let mut rows = Vec::with_capacity(config.switch_attachments.len());
        for attach in &config.switch_attachments {
            let serial_number = self
                .resolve_serial(&config.fabric, &attach.ip_address)
                .await?;
            rows.push(SwitchAttachPayload {
                fabric: config.fabric.clone(),
                vrf_name: config.vrf_name.clone(),
                serial_number,
                vlan_id: attach.vlan_id,
                deployment: deployment.unwrap_or(attach.deployment),
                extension_values: attach.encoded_extension_values()?,
                freeform_config: attach.freeform_config.clone().unwrap_or_default(),
                instance_values: attach.encoded_instance_values()?,
            });
        }
        Ok(rows)
    }

    /// POST an attachment payload. The controller expects a list.
    async fn post_attachment(
        &self,
        fabric: &str,
        payload: &VrfAttachmentPayload,
    ) -> Result<ControllerResponse> {
        payload.validate()?;
        let body = Value::Array(vec![serde_json::to_value(payload)?]);
        self.sender
            .send(Verb::Post, &Self::attachments_path(fabric), Some(&body))
            .await
    }

    /// Attach a VRF to the configured switches.
    pub async fn attach(&self, config: &VrfAttachmentConfig) -> Result<ControllerResponse> {
        let payload = VrfAttachmentPayload {
            vrf_name: config.vrf_name.clone(),
            lan_attach_list: self.build_rows(config, None).await?,
        };
        let resp = self.post_attachment(&config.fabric, &payload).await?;
        if resp.is_success() {
            self.cache
                .update_cache_after_create(&config.fabric, &config.vrf_name, resp.data.clone());
            debug!(fabric = %config.fabric, vrf = %config.vrf_name, "attached VRF");
        }
        Ok(resp)
    }

    /// Detach a VRF from the configured switches (`deployment: false`
    /// rows through the same endpoint).
    pub async fn detach(&self, config: &VrfAttachmentConfig) -> Result<ControllerResponse> {
        let payload = VrfAttachmentPayload {
            vrf_name: config.vrf_name.clone(),
            lan_attach_list: self.build_rows(config, Some(false)).await?,
        };
        let resp = self.post_attachment(&config.fabric, &payload).await?;
        if resp.is_success() {
            self.cache
                .remove_from_cache_after_delete(&config.fabric, &config.vrf_name);
            debug!(fabric = %config.fabric, vrf = %config.vrf_name, "detached VRF");
        }
        Ok(resp)
    }

    /// Detach pre-built rows — used when the rows come from the
    /// controller's own records rather than a desired config.
    pub async fn detach_rows(
        &self,
        fabric: &str,
        vrf_name: &str,
        mut rows: Vec<SwitchAttachPayload>,
    ) -> Result<ControllerResponse> {
        for row in &mut rows {
            row.deployment = false;
        }
        let payload = VrfAttachmentPayload {
            vrf_name: vrf_name.to_string(),
            lan_attach_list: rows,
        };
        let resp = self.post_attachment(fabric, &payload).await?;
        if resp.is_success() {
            self.cache.remove_from_cache_after_delete(fabric, vrf_name);
        }
        Ok(resp)
    }

    /// Query one VRF's attachment rows. Always bypasses the cache.
    pub async fn query(&self, fabric: &str, vrf_name: &str) -> Result<ControllerResponse> {
        let path = format!("{BASE_PATH}/{fabric}/vrfs/{vrf_name}/attachments");
        self.sender.send(Verb::Get, &path, None).await
    }

    /// Query every attachment in a fabric. Always bypasses the cache.
    pub async fn query_all(&self, fabric: &str) -> Result<ControllerResponse> {
        self.sender
            .send(Verb::Get, &Self::attachments_path(fabric), None)
            .await
    }

    /// Drop every cached attachment for `fabric`.
    pub fn invalidate_fabric_cache(&self, fabric: &str) {
        self.cache.invalidate_fabric_cache(fabric);
    }
}
