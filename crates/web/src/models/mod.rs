//! Domain models for the web service.
//!
//! These types represent validated domain objects separate from database row
//! types and HTML form payloads.

pub mod account;
pub mod notice;
pub mod pickup;
pub mod session;
pub mod staff;
pub mod subscription;

pub use account::Account;
pub use notice::{Notice, NoticeLevel, NoticeQuery};
pub use pickup::{NewServiceRequest, ServiceRequest};
pub use session::{CurrentSession, keys as session_keys};
pub use staff::{Certification, TrainingModule};
pub use subscription::Subscription;
