//! Controller transport.
//!
//! The rest of the crate talks to the controller through the [`Sender`]
//! trait: one call in, one [`ControllerResponse`] envelope out. Two
//! implementations ship here:
//!
//! - [`HttpSender`] — reqwest against a base URL.
//! - [`RetryingSender`] — a decorator adding exponential-backoff retry
//!   for transient failures, honouring the non-retryable code contract
//!   ([`crate::error::NON_RETRYABLE_CODES`]).
//!
//! Timeouts and authentication belong to the HTTP client handed to
//! [`HttpSender`]; nothing above this layer knows about either.

mod response;
mod retry;
mod sender;

pub use response::ControllerResponse;
pub use retry::{RetryConfig, RetryingSender};
pub use sender::{HttpSender, Sender, Verb};
