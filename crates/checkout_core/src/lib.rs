//! Checkout form state, validation and page flows.
//!
//! The crate is transport-agnostic: the backend is reached through the
//! collaborator traits in [`collaborators`], implemented over HTTP by the
//! `checkout_api` crate.

pub mod address;
pub mod collaborators;
pub mod config;
pub mod currency;
pub mod error;
pub mod form;
pub mod models;
pub mod order_summary;
