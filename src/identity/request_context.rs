use super::session::Session;
use crate::gate::Role;

/// Per-request identity resolved once by the gate middleware and handed to
/// handlers through request extensions, instead of ambient storage the handler
/// and the gate would each have to keep in sync.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub session: Option<Session>,
    pub request_id: Option<String>,
}

impl RequestContext {
    pub fn token(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.token.as_str())
    }

    pub fn role(&self) -> Option<Role> {
        self.session.as_ref().and_then(|s| s.role)
    }
}
