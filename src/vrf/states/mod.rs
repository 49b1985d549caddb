//! VRF state handlers — one per reconciliation mode.
//!
//! [`reconcile`] is the entry point: it validates the batch against the
//! mode's schema (aborting before any network call on the first invalid
//! item), then dispatches to the mode's handler. Handlers share the
//! primitives in [`base`]: cache pre-warm, cache-aware existence
//! checks, canonicalized equality, and batch-level accumulation.

mod base;
mod deleted;
mod merged;
mod overridden;
mod query;
mod replaced;

pub use deleted::Deleted;
pub use merged::Merged;
pub use overridden::Overridden;
pub use query::Query;
pub use replaced::Replaced;

use crate::{ModuleResult, ReconcileMode, Result};

use super::api::VrfApi;
use super::config::{VrfConfig, validate_batch};

/// Validate a desired batch and run it under `mode`.
///
/// Returns `Err` only for batch validation failures; operational
/// failures are collected per item into the [`ModuleResult`].
pub async fn reconcile(
    api: VrfApi,
    mode: ReconcileMode,
    configs: &[VrfConfig],
) -> Result<ModuleResult> {
    validate_batch(mode, configs)?;
    let result = match mode {
        ReconcileMode::Merged => Merged::new(api).execute(configs).await,
        ReconcileMode::Replaced => Replaced::new(api).execute(configs).await,
        ReconcileMode::Overridden => Overridden::new(api).execute(configs).await,
        ReconcileMode::Deleted => Deleted::new(api).execute(configs).await,
        ReconcileMode::Query => Query::new(api).execute(configs).await,
    };
    Ok(result)
}
