//! Business logic services for the web service.
//!
//! # Services
//!
//! - `session` - Session store (role + display name, subscription)
//! - `auth` - Login validation, credential verifiers, landing decisions
//! - `pickups` - Pickup lifecycle and sample fallback
//! - `certifications` - Staff certification status upkeep
//! - `subscriptions` - Plan catalogue and simulated payment
//! - `validation` - Field-level form errors

pub mod auth;
pub mod certifications;
pub mod pickups;
pub mod session;
pub mod subscriptions;
pub mod validation;

pub use session::SessionStore;
pub use validation::FieldErrors;
