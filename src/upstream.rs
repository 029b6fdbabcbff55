//! HTTP client for the upstream automation-platform API.
//!
//! Every request attaches a bearer token when the session carries one. Non-2xx
//! responses become `AppError::Upstream` with the status and body text; network
//! failures become `AppError::Transport`. Successful bodies are parsed as JSON;
//! an unparsable success body degrades to `Value::Null`, which the normalizer
//! treats as an empty list.

use std::time::Duration;

use reqwest::{Method, Url};
use serde_json::{json, Value};

use crate::error::AppError;

/// Requests abandoned by a disconnected client are bounded by this rather than a
/// per-view cancellation signal.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone)]
pub struct ApiClient {
    base: Url,
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(base: &str) -> Result<Self, AppError> {
        let base = Url::parse(base)
            .map_err(|e| AppError::internal("bad_api_url".to_string(), format!("invalid upstream URL {}: {}", base, e)))?;
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { base, client })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    async fn request(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<&Value>,
    ) -> Result<Value, AppError> {
        let url = self
            .base
            .join(path)
            .map_err(|e| AppError::internal("bad_path".to_string(), format!("{}: {}", path, e)))?;
        let mut req = self.client.request(method, url);
        if let Some(t) = token {
            req = req.bearer_auth(t);
        }
        if let Some(b) = body {
            req = req.json(b);
        }
        let resp = req.send().await?;
        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();
        if !status.is_success() {
            tracing::error!(%status, path, body = %text, "upstream request failed");
            return Err(AppError::upstream(status.as_u16(), &text));
        }
        if text.is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text).unwrap_or(Value::Null))
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> Result<Value, AppError> {
        self.request(Method::GET, path, token, None).await
    }

    pub async fn post(&self, path: &str, token: Option<&str>, body: &Value) -> Result<Value, AppError> {
        self.request(Method::POST, path, token, Some(body)).await
    }

    pub async fn put(&self, path: &str, token: Option<&str>, body: &Value) -> Result<Value, AppError> {
        self.request(Method::PUT, path, token, Some(body)).await
    }

    pub async fn delete(&self, path: &str, token: Option<&str>) -> Result<Value, AppError> {
        self.request(Method::DELETE, path, token, None).await
    }

    // --- auth ---

    pub async fn login(&self, email: &str, password: &str) -> Result<Value, AppError> {
        self.post("/auth/login", None, &json!({ "email": email, "password": password })).await
    }

    pub async fn signup(&self, token: Option<&str>, payload: &Value) -> Result<Value, AppError> {
        self.post("/auth/signup", token, payload).await
    }

    pub async fn delete_inactive_users(&self, token: Option<&str>) -> Result<Value, AppError> {
        self.post("/auth/delete-inactive", token, &json!({})).await
    }

    // --- admin lists ---

    pub async fn list_users(&self, token: Option<&str>) -> Result<Value, AppError> {
        self.get("/admin/users", token).await
    }

    pub async fn list_blogs(&self, token: Option<&str>) -> Result<Value, AppError> {
        self.get("/admin/blog", token).await
    }

    pub async fn list_engagements(&self, token: Option<&str>) -> Result<Value, AppError> {
        self.get("/admin/engagements", token).await
    }

    pub async fn list_notifications(&self, token: Option<&str>) -> Result<Value, AppError> {
        self.get("/admin/notifications/all", token).await
    }

    pub async fn list_rewards(&self, token: Option<&str>) -> Result<Value, AppError> {
        self.get("/admin/rewards/all", token).await
    }

    pub async fn list_queue(&self, token: Option<&str>) -> Result<Value, AppError> {
        self.get("/admin/queue", token).await
    }

    pub async fn list_traps(&self, token: Option<&str>) -> Result<Value, AppError> {
        self.get("/admin/traps", token).await
    }

    pub async fn bot_status(&self, token: Option<&str>) -> Result<Value, AppError> {
        self.get("/admin/bots/status", token).await
    }

    // --- admin mutations ---

    pub async fn create_blog(&self, token: Option<&str>, payload: &Value) -> Result<Value, AppError> {
        self.post("/admin/blog", token, payload).await
    }

    pub async fn update_blog(&self, token: Option<&str>, id: &str, payload: &Value) -> Result<Value, AppError> {
        self.put(&format!("/admin/blog/{}", urlencoding::encode(id)), token, payload).await
    }

    pub async fn delete_blog(&self, token: Option<&str>, id: &str) -> Result<Value, AppError> {
        self.delete(&format!("/admin/blog/{}", urlencoding::encode(id)), token).await
    }

    pub async fn publish_all_blogs(&self, token: Option<&str>) -> Result<Value, AppError> {
        self.post("/admin/blog/publish-now", token, &json!({})).await
    }

    pub async fn restart_bots(&self, token: Option<&str>) -> Result<Value, AppError> {
        self.post("/admin/cron/restart", token, &json!({})).await
    }

    pub async fn pause_bot(&self, token: Option<&str>, bot_key: &str) -> Result<Value, AppError> {
        self.post(&format!("/admin/cron/{}/pause", urlencoding::encode(bot_key)), token, &json!({})).await
    }

    // --- roles ---

    pub async fn list_roles(&self, token: Option<&str>) -> Result<Value, AppError> {
        self.get("/verify/roles", token).await
    }

    pub async fn create_role(&self, token: Option<&str>, payload: &Value) -> Result<Value, AppError> {
        self.post("/verify/roles", token, payload).await
    }

    pub async fn delete_role(&self, token: Option<&str>, id: &str) -> Result<Value, AppError> {
        self.delete(&format!("/verify/roles/{}", urlencoding::encode(id)), token).await
    }

    pub async fn assign_role(&self, token: Option<&str>, user_id: &str, role_id: &str) -> Result<Value, AppError> {
        self.post(
            &format!("/verify/roles/{}/{}", urlencoding::encode(user_id), urlencoding::encode(role_id)),
            token,
            &json!({}),
        )
        .await
    }

    // --- settings ---

    pub async fn get_settings(&self, token: Option<&str>) -> Result<Value, AppError> {
        self.get("/admin/settings", token).await
    }

    pub async fn update_settings(&self, token: Option<&str>, payload: &Value) -> Result<Value, AppError> {
        self.post("/admin/settings", token, payload).await
    }

    // --- aggregates ---

    pub async fn admin_stats(&self, token: Option<&str>) -> Result<Value, AppError> {
        self.get("/admin/stats", token).await
    }

    pub async fn engagement_stats(&self, token: Option<&str>) -> Result<Value, AppError> {
        self.get("/admin/engagement-stats", token).await
    }

    pub async fn reward_stats(&self, token: Option<&str>) -> Result<Value, AppError> {
        self.get("/admin/reward-stats", token).await
    }

    pub async fn top_users(&self, token: Option<&str>) -> Result<Value, AppError> {
        self.get("/admin/top-users", token).await
    }

    pub async fn leaderboard(&self, token: Option<&str>) -> Result<Value, AppError> {
        self.get("/leaderboard", token).await
    }

    pub async fn partner_stats(&self, token: Option<&str>) -> Result<Value, AppError> {
        self.get("/partner/stats", token).await
    }
}
