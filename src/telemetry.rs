//! Telemetry metric name constants.
//!
//! Centralised metric names for ndfc-vrf operations. Consumers install
//! their own `metrics` recorder (e.g. prometheus, statsd); without a
//! recorder installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `ndfc_vrf_`. Counters end in `_total`.
//!
//! # Common labels
//!
//! - `resource` — resource kind ("vrf" | "vrf_attachment")
//! - `method` — HTTP verb of the controller request
//! - `status` — outcome: "ok" or "error"

/// Total requests issued to the controller.
///
/// Labels: `method`, `status` ("ok" | "error").
pub const REQUESTS_TOTAL: &str = "ndfc_vrf_requests_total";

/// Total retry attempts (not counting the initial request).
///
/// Labels: `method`.
pub const RETRIES_TOTAL: &str = "ndfc_vrf_retries_total";

/// Total cache hits.
///
/// Labels: `resource`.
pub const CACHE_HITS_TOTAL: &str = "ndfc_vrf_cache_hits_total";

/// Total cache misses.
///
/// Labels: `resource`.
pub const CACHE_MISSES_TOTAL: &str = "ndfc_vrf_cache_misses_total";
