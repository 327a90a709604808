//! QuickBites Core - Shared types library.
//!
//! This crate provides the domain types shared by the QuickBites client
//! components:
//! - `client` - The client application layer (stores, gateway, guards)
//! - `integration-tests` - End-to-end tests against a mock backend
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. Every type
//! mirrors the JSON the remote API serves: the server is the source of truth
//! for all identifiers and timestamps; the client never fabricates either.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs and the domain records (user, restaurant, menu,
//!   order, theme)

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
