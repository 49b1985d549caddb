//! VRF resource management.
//!
//! [`VrfApi`] is the cache-aware controller client; [`states`] holds
//! the reconciliation engine over it. [`VrfConfig`] describes what a
//! VRF should look like, [`VrfData`] what the controller says it looks
//! like, and [`VrfPayload`] is the validated wire shape in between.

pub mod api;
pub mod config;
pub mod data;
pub mod payload;
pub mod states;
pub mod template;

pub use api::{BASE_PATH, VrfApi};
pub use config::{VrfConfig, validate_batch};
pub use data::VrfData;
pub use payload::VrfPayload;
pub use states::reconcile;
pub use template::{VrfTemplate, VrfTemplateConfig};
