//! HTTP adapter for the checkout backend.
//!
//! [`CheckoutApiClient`] implements the collaborator traits from
//! `checkout_core` over JSON endpoints, keeping `reqwest` out of the domain
//! crate.

mod client;
mod error;
mod response;

pub use client::CheckoutApiClient;
pub use error::{ApiError, CONNECTION_ERROR_MESSAGE};
