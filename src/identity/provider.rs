use serde::Deserialize;

use super::session::{Session, SessionManager};
use crate::error::AppError;
use crate::gate::Role;
use crate::tprintln;
use crate::upstream::ApiClient;

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct LoginResponse {
    pub session: Session,
}

/// Authenticates against the upstream API and issues a local session from the
/// login response's token and user role.
pub struct UpstreamAuthProvider {
    pub sessions: SessionManager,
}

impl UpstreamAuthProvider {
    pub fn new(sessions: SessionManager) -> Self {
        Self { sessions }
    }

    pub async fn login(&self, api: &ApiClient, req: &LoginRequest) -> Result<LoginResponse, AppError> {
        let val = api.login(&req.email, &req.password).await?;
        let Some(token) = val.get("token").and_then(|v| v.as_str()) else {
            return Err(AppError::auth("login_failed", "login response carried no token"));
        };
        // Role comes from the login response's user object; the upstream omits it
        // for plain visitors, so absent means visitor here.
        let role = val
            .get("user")
            .and_then(|u| u.get("role"))
            .and_then(|v| v.as_str())
            .and_then(Role::parse)
            .or(Some(Role::Visitor));
        let user_id = val
            .get("user")
            .and_then(|u| u.get("id"))
            .and_then(|v| v.as_str())
            .unwrap_or(req.email.as_str())
            .to_string();
        let session = self.sessions.issue(token.to_string(), role, user_id);
        tprintln!("auth.login user={} sid={}", session.user_id, session.session_id);
        Ok(LoginResponse { session })
    }
}
