//! ndfc-vrf - VRF management client for DCNM/NDFC fabric controllers
//!
//! This crate manages VRFs and their switch attachments on an NDFC
//! fabric controller: a TTL caching layer over controller state, a
//! cache-aware REST client, and a reconciliation engine that drives the
//! controller toward a desired configuration under one of five modes
//! (merged, replaced, overridden, deleted, query).
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use ndfc_vrf::transport::{HttpSender, RetryConfig, RetryingSender};
//! use ndfc_vrf::vrf::{self, VrfApi, VrfConfig};
//! use ndfc_vrf::ReconcileMode;
//!
//! #[tokio::main]
//! async fn main() -> ndfc_vrf::Result<()> {
//!     let sender = Arc::new(RetryingSender::new(
//!         Arc::new(HttpSender::new("https://ndfc.example.net")),
//!         RetryConfig::new(),
//!     ));
//!     let api = VrfApi::new(sender);
//!
//!     let desired = vec![VrfConfig::named("site-1", "blue")];
//!     let result = vrf::reconcile(api, ReconcileMode::Merged, &desired).await?;
//!
//!     println!("changed: {}, {}", result.changed, result.msg);
//!     Ok(())
//! }
//! ```
//!
//! # Caching
//!
//! Controller state is cached in-process with a five-minute default TTL
//! and passive expiry; each reconciliation batch pre-warms its fabrics
//! with one bulk read so N items cost one listing call. The cache is a
//! local accelerator — the controller stays the source of truth, and
//! mutations keep the two consistent (write-through on create/update,
//! eviction on delete).

pub mod attachment;
pub mod cache;
pub mod error;
mod reconcile;
mod result;
pub mod telemetry;
pub mod transport;
pub mod vrf;

// Re-export main types at crate root
pub use error::{Result, VrfError};
pub use reconcile::ReconcileMode;
pub use result::ModuleResult;

pub use attachment::{SwitchAttachConfig, VrfAttachmentApi, VrfAttachmentConfig};
pub use cache::{CacheKey, CacheManager, CachedResourceService, ResourceKind, TtlCache};
pub use transport::{ControllerResponse, HttpSender, RetryConfig, RetryingSender, Sender, Verb};
pub use vrf::{VrfApi, VrfConfig, VrfData, VrfPayload, VrfTemplate, VrfTemplateConfig};
