//! Attachment state handlers — one per reconciliation mode.

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

use super::api::VrfAttachmentApi;
use super::config::{VrfAttachmentConfig, validate_batch};

/// Validate a desired attachment batch and run it under `mode`.
///
/// Returns `Err` only for batch validation failures; operational
/// failures are collected per item into the [`ModuleResult`].
pub async fn reconcile(
    api: VrfAttachmentApi,
    mode: ReconcileMode,
    configs: &[VrfAttachmentConfig],
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
