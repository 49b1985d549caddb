//! VRF attachment management.
//!
//! Attaching a VRF binds it to switches (by management IP, resolved to
//! serial numbers against the fabric inventory); detaching is the same
//! endpoint with `deployment: false` rows. [`VrfAttachmentApi`] is the
//! cache-aware client, [`states`] the reconciliation engine over it.

pub mod api;
pub mod config;
pub mod payload;
pub mod states;

pub use api::{INVENTORY_PATH, VrfAttachmentApi};
pub use config::{SwitchAttachConfig, VrfAttachmentConfig, validate_batch};
pub use payload::{SwitchAttachPayload, VrfAttachmentPayload};
pub use states::reconcile;
