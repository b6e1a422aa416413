//! Networking and view-model layer for a TV show browsing app.
//!
//! - [`provider`] turns [`endpoint::Endpoint`] descriptors into HTTP calls and
//!   decodes typed results, attaching the stored bearer token.
//! - [`login`] is the login screen's view-model, publishing control content
//!   through [`observable::Observable`] slots.
//! - [`store`] is the key-value persistence the token and remembered
//!   credentials live in.
//! - [`assets`] names the images the screens use.

pub mod api;
pub mod assets;
pub mod content;
pub mod endpoint;
pub mod login;
pub mod observable;
pub mod provider;
pub mod store;
