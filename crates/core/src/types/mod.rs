//! Core types for Washline.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod billing;
pub mod email;
pub mod id;
pub mod price;
pub mod role;
pub mod status;
pub mod view;

pub use billing::BillingCycle;
pub use email::{Email, EmailError};
pub use id::*;
pub use price::{CurrencyCode, Price};
pub use role::{ParseRoleError, Role};
pub use status::*;
pub use view::View;
