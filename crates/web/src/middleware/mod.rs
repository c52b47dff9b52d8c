//! HTTP middleware stack for the web service.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Session layer (tower-sessions, `PostgreSQL` or in-memory store)
//! 4. Request ID (add unique ID to each request)
//!
//! The route guard runs as an extractor on each protected handler.

pub mod guard;
pub mod request_id;
pub mod session;

pub use guard::{
    AdminConsole, Dashboard, GuardDecision, GuardRejection, OptionalSession, ProtectedView,
    RequireView, StaffConsole, evaluate,
};
pub use request_id::request_id_middleware;
pub use session::create_session_layer;
