//! Washline Core - Shared types library.
//!
//! This crate provides common types used across all Washline components:
//! - `web` - Public site, customer dashboard, staff and admin consoles
//! - `cli` - Command-line tools for migrations and account management
//!
//! # Architecture
//!
//! The core crate contains only types and pure decision functions - no I/O,
//! no database access, no HTTP. This keeps it lightweight and allows it to be
//! used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, emails, prices, roles, views and statuses
//! - [`policy`] - The route permission table and `is_allowed` decision

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod policy;
pub mod types;

pub use policy::{allowed_roles, is_allowed};
pub use types::*;
