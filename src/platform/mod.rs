//! The platform-client seam: client trait, send-method table, sessions.

mod client;
pub mod method;
pub mod session;

pub use client::PlatformClient;
pub use method::SendMethod;
pub use session::{Session, SessionBinding, SessionUser};
