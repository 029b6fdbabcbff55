//! Session issuance and per-request identity for the gateway.
//! Keep the public surface thin and split implementation across sub-modules.

mod provider;
mod request_context;
mod session;

pub use provider::{LoginRequest, LoginResponse, UpstreamAuthProvider};
pub use request_context::RequestContext;
pub use session::{Session, SessionId, SessionManager};
