use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use base64::Engine;
use parking_lot::RwLock;

use crate::gate::Role;
use crate::tprintln;

pub type SessionId = String;

/// One authenticated session. The upstream bearer token and the role live in the
/// same entry, addressed by one opaque session id, so they are created together and
/// destroyed together.
#[derive(Debug, Clone)]
pub struct Session {
    pub session_id: SessionId,
    /// Bearer token for the upstream API.
    pub token: String,
    pub role: Option<Role>,
    pub user_id: String,
    pub issued_at: Instant,
    pub expires_at: Instant,
}

fn gen_id() -> String {
    // 256-bit random id, base64url without padding
    let mut buf = [0u8; 32];
    let _ = getrandom::getrandom(&mut buf);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(buf)
}

/// Server-held session store. Owned by the application state and passed where it is
/// needed, not a process-global.
#[derive(Clone)]
pub struct SessionManager {
    ttl: Duration,
    sessions: Arc<RwLock<HashMap<SessionId, Session>>>,
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::with_ttl(Duration::from_secs(24 * 60 * 60))
    }
}

impl SessionManager {
    pub fn with_ttl(ttl: Duration) -> Self {
        Self { ttl, sessions: Arc::new(RwLock::new(HashMap::new())) }
    }

    pub fn issue(&self, token: String, role: Option<Role>, user_id: String) -> Session {
        let now = Instant::now();
        let sid = gen_id();
        let session = Session {
            session_id: sid.clone(),
            token,
            role,
            user_id,
            issued_at: now,
            expires_at: now + self.ttl,
        };
        self.sessions.write().insert(sid, session.clone());
        tprintln!(
            "session.issue user={} role={:?} ttl_secs={}",
            session.user_id,
            session.role,
            self.ttl.as_secs()
        );
        session
    }

    /// Resolve a session id; expired entries are dropped on sight.
    pub fn validate(&self, sid: &str) -> Option<Session> {
        let now = Instant::now();
        let hit = self.sessions.read().get(sid).cloned();
        match hit {
            Some(s) if s.expires_at > now => Some(s),
            Some(_) => {
                self.sessions.write().remove(sid);
                None
            }
            None => None,
        }
    }

    /// Drop the session; token and role are cleared together.
    pub fn logout(&self, sid: &str) -> bool {
        let removed = self.sessions.write().remove(sid).is_some();
        if removed {
            tprintln!("session.logout sid_len={}", sid.len());
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issue_validate_logout_round_trip() {
        let sm = SessionManager::default();
        let s = sm.issue("tok".into(), Some(Role::Partner), "u1".into());
        let got = sm.validate(&s.session_id).expect("session should resolve");
        assert_eq!(got.token, "tok");
        assert_eq!(got.role, Some(Role::Partner));
        assert!(sm.logout(&s.session_id));
        assert!(sm.validate(&s.session_id).is_none());
        assert!(!sm.logout(&s.session_id));
    }

    #[test]
    fn expired_sessions_do_not_resolve() {
        let sm = SessionManager::with_ttl(Duration::from_secs(0));
        let s = sm.issue("tok".into(), None, "u1".into());
        assert!(sm.validate(&s.session_id).is_none());
    }
}
