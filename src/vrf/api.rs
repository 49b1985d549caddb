//! Cache-aware VRF client.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::cache::{CacheManager, CachedResourceService, ResourceKind};
use crate::transport::{ControllerResponse, Sender, Verb};
use crate::{Result, VrfError};

use super::data::VrfData;
use super::payload::VrfPayload;

/// Root of the top-down fabric API.
pub const BASE_PATH: &str = "/appcenter/cisco/ndfc/api/v1/lan-fabric/rest/top-down/fabrics";

/// VRF API client.
///
/// Pairs a [`Sender`] with a VRF-typed cache facade and keeps the two
/// consistent: successful mutations write through (create/update) or
/// evict (delete); failures leave the cache untouched.
///
/// Single-VRF reads go through the bulk listing endpoint and filter
/// locally — the single-resource GET can omit `vrfStatus` (controller
/// quirk), so it is never used.
pub struct VrfApi {
    sender: Arc<dyn Sender>,
    cache: CachedResourceService<VrfData>,
}

impl VrfApi {
    /// Client with a fresh cache (five-minute default TTL).
    pub fn new(sender: Arc<dyn Sender>) -> Self {
        Self::with_cache_manager(sender, CacheManager::new())
    }

    /// Client with an injected cache manager — the cache's lifetime is
    /// whatever the caller gives it.
    pub fn with_cache_manager(sender: Arc<dyn Sender>, manager: CacheManager<VrfData>) -> Self {
        Self {
            sender,
            cache: CachedResourceService::new(manager, ResourceKind::Vrf),
        }
    }

    fn vrfs_path(fabric: &str) -> String {
        format!("{BASE_PATH}/{fabric}/vrfs")
    }

    /// Fetch the fabric's full VRF listing from the controller.
    ///
    /// Controller-reported failure is an error here — a failed listing
    /// must never be cached as an empty fabric.
    async fn fetch_all(&self, fabric: &str) -> Result<HashMap<String, VrfData>> {
        let resp = self
            .sender
            .send(Verb::Get, &Self::vrfs_path(fabric), None)
            .await?;
        if !resp.is_success() {
            return Err(VrfError::Controller {
                status: resp.return_code,
                message: resp.message,
            });
        }

        let mut vrfs = HashMap::new();
        for record in resp.records() {
            // Tolerate records that don't parse; the rest of the
            // listing is still useful.
            if let Some(data) = VrfData::from_record(&record) {
                if let Some(name) = data.vrf_name.clone() {
                    vrfs.insert(name, data);
                }
            }
        }
        Ok(vrfs)
    }

    /// Get one VRF, cached.
    pub async fn get_cached(&self, fabric: &str, vrf_name: &str) -> Result<Option<VrfData>> {
        self.cache
            .get_cached(
                fabric,
                vrf_name,
                || async move {
                    let all = self.fetch_all(fabric).await?;
                    Ok(all.get(vrf_name).cloned())
                },
                None,
            )
            .await
    }

    /// Get the fabric's complete VRF listing, cached.
    pub async fn get_all_cached(&self, fabric: &str) -> Result<HashMap<String, VrfData>> {
        self.cache
            .get_all_cached(fabric, || self.fetch_all(fabric), None)
            .await
    }

    /// Existence check riding the cache.
    pub async fn exists_cached(
        &self,
        fabric: &str,
        vrf_name: &str,
    ) -> Result<(bool, Option<VrfData>)> {
        self.cache
            .exists_cached(fabric, vrf_name, || async move {
                let all = self.fetch_all(fabric).await?;
                Ok(all.get(vrf_name).cloned())
            })
            .await
    }

    /// Create a VRF. On success the created state is written through to
    /// the cache.
    pub async fn create(&self, payload: &VrfPayload) -> Result<ControllerResponse> {
        payload.validate()?;
        let body = serde_json::to_value(payload)?;
        let resp = self
            .sender
            .send(Verb::Post, &Self::vrfs_path(&payload.fabric), Some(&body))
            .await?;
        if resp.is_success() {
            for (name, data) in extract_vrfs(&resp) {
                self.cache
                    .update_cache_after_create(&payload.fabric, &name, data);
            }
            debug!(fabric = %payload.fabric, vrf = %payload.vrf_name, "created VRF");
        }
        Ok(resp)
    }

    /// Update a VRF. Same call shape as create; cache write-through on
    /// success.
    pub async fn update(&self, payload: &VrfPayload) -> Result<ControllerResponse> {
        payload.validate()?;
        let body = serde_json::to_value(payload)?;
        let resp = self
            .sender
            .send(Verb::Post, &Self::vrfs_path(&payload.fabric), Some(&body))
            .await?;
        if resp.is_success() {
            for (name, data) in extract_vrfs(&resp) {
                self.cache
                    .update_cache_after_update(&payload.fabric, &name, data);
            }
            debug!(fabric = %payload.fabric, vrf = %payload.vrf_name, "updated VRF");
        }
        Ok(resp)
    }

    /// Delete a VRF. On success the cache entry is evicted.
    pub async fn delete(&self, fabric: &str, vrf_name: &str) -> Result<ControllerResponse> {
        let path = format!("{}/{vrf_name}", Self::vrfs_path(fabric));
        let resp = self.sender.send(Verb::Delete, &path, None).await?;
        if resp.is_success() {
            self.cache.remove_from_cache_after_delete(fabric, vrf_name);
            debug!(fabric, vrf = vrf_name, "deleted VRF");
        }
        Ok(resp)
    }

    /// Query the fabric's VRF listing, always bypassing the cache.
    pub async fn query_all(&self, fabric: &str) -> Result<ControllerResponse> {
        self.sender
            .send(Verb::Get, &Self::vrfs_path(fabric), None)
            .await
    }

    /// Query one VRF, always bypassing the cache.
    ///
    /// Fetches the whole listing and filters locally so `vrfStatus` is
    /// present in the answer.
    pub async fn query(&self, fabric: &str, vrf_name: &str) -> Result<ControllerResponse> {
        let all = self.query_all(fabric).await?;
        if !all.is_success() {
            return Ok(all);
        }
        let matching: Vec<_> = all
            .records()
            .into_iter()
            .filter(|record| {
                record
                    .get("vrfName")
                    .and_then(|value| value.as_str())
                    .is_some_and(|name| name == vrf_name)
            })
            .collect();
        Ok(ControllerResponse::from_records(
            matching,
            "GET",
            &format!("{}/{vrf_name}", Self::vrfs_path(fabric)),
        ))
    }

    /// Drop every cached VRF for `fabric`.
    pub fn invalidate_fabric_cache(&self, fabric: &str) {
        self.cache.invalidate_fabric_cache(fabric);
    }

}

/// Named VRF records a mutation response carries. Responses without
/// parseable records yield nothing — and cache nothing.
fn extract_vrfs(resp: &ControllerResponse) -> Vec<(String, VrfData)> {
    resp.records()
        .iter()
        .filter_map(|record| {
            let data = VrfData::from_record(record)?;
            let name = data.vrf_name.clone()?;
            Some((name, data))
        })
        .collect()
}
