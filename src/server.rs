//!
//! dashgate HTTP server
//! --------------------
//! Axum router for the dashboard gateway.
//!
//! Responsibilities:
//! - Session management with an HttpOnly cookie resolved against the server-held
//!   session store (token and role travel together in one entry).
//! - Login/logout endpoints backed by the upstream auth API.
//! - A request-time access gate layered over every route, so redirects happen
//!   before a protected handler can issue privileged upstream fetches.
//! - One view handler per dashboard screen and one proxy handler per mutation,
//!   all delegating to the upstream client.

use std::net::SocketAddr;
use std::time::Duration;

use axum::extract::{Request, State};
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use serde_json::json;
use tracing::{error, info};

use crate::gate::{self, GateDecision};
use crate::identity::{LoginRequest, RequestContext, SessionManager, UpstreamAuthProvider};
use crate::upstream::ApiClient;

pub mod views;

const SESSION_COOKIE: &str = "dashgate_session";

/// Shared server state injected into all handlers.
#[derive(Clone)]
pub struct AppState {
    pub api: ApiClient,
    pub sessions: SessionManager,
}

/// Start the gateway with configuration from the environment.
pub async fn run() -> anyhow::Result<()> {
    let http_port: u16 = std::env::var("DASHGATE_HTTP_PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8088);
    let api_url = std::env::var("DASHGATE_API_URL").unwrap_or_else(|_| "http://localhost:5000".to_string());
    let ttl_secs: u64 = std::env::var("DASHGATE_SESSION_TTL_SECS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(86_400);
    run_with(http_port, &api_url, ttl_secs).await
}

/// Start the gateway bound to the given port, talking to the given upstream.
pub async fn run_with(http_port: u16, api_url: &str, session_ttl_secs: u64) -> anyhow::Result<()> {
    let api = ApiClient::new(api_url)?;
    let state = AppState {
        api,
        sessions: SessionManager::with_ttl(Duration::from_secs(session_ttl_secs)),
    };
    let app = router(state);

    let addr: SocketAddr = format!("0.0.0.0:{}", http_port).parse()?;
    info!("Starting dashgate on {} (upstream {})", addr, api_url);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { "dashgate ok" }))
        .route("/login", get(login_page).post(login))
        .route("/logout", post(logout))
        // admin area
        .route("/admin", get(views::admin_dashboard))
        .route("/admin/users", get(views::admin_users).post(views::admin_create_user))
        .route("/admin/users/delete-inactive", post(views::admin_delete_inactive))
        .route("/admin/blogs", get(views::admin_blogs).post(views::admin_create_blog))
        .route("/admin/blogs/publish-all", post(views::admin_publish_all_blogs))
        .route("/admin/blogs/{id}", put(views::admin_update_blog).delete(views::admin_delete_blog))
        .route("/admin/bots", get(views::admin_bots))
        .route("/admin/bots/restart", post(views::admin_restart_bots))
        .route("/admin/bots/{key}/pause", post(views::admin_pause_bot))
        .route("/admin/engagements", get(views::admin_engagements))
        .route("/admin/notifications", get(views::admin_notifications))
        .route("/admin/rewards", get(views::admin_rewards))
        .route("/admin/queue", get(views::admin_queue))
        .route("/admin/traps", get(views::admin_traps))
        .route("/admin/roles", get(views::admin_roles).post(views::admin_create_role))
        .route("/admin/roles/{id}", delete(views::admin_delete_role))
        .route("/admin/roles/{user_id}/{role_id}", post(views::admin_assign_role))
        .route("/admin/settings", get(views::admin_settings).post(views::admin_update_settings))
        .route("/admin/analytics", get(views::admin_analytics))
        .route("/admin/leaderboard", get(views::admin_leaderboard))
        // partner area
        .route("/partner/dashboard", get(views::partner_dashboard))
        .route("/partner/posts", get(views::partner_posts))
        .route("/partner/rewards", get(views::partner_rewards))
        .route("/partner/traps", get(views::partner_traps))
        // visitor area
        .route("/visitor/rewards", get(views::visitor_rewards))
        .layer(middleware::from_fn_with_state(state.clone(), access_gate))
        .with_state(state)
}

/// Request-time access gate. Resolves the session cookie, evaluates the route
/// transition table, and either redirects or injects the request context.
async fn access_gate(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let path = req.uri().path().to_string();
    let session = parse_cookie(req.headers(), SESSION_COOKIE).and_then(|sid| state.sessions.validate(&sid));
    let role = session.as_ref().and_then(|s| s.role);
    match gate::evaluate(&path, session.is_some(), role) {
        GateDecision::Allow => {
            let ctx = RequestContext {
                session,
                request_id: Some(uuid::Uuid::new_v4().to_string()),
            };
            req.extensions_mut().insert(ctx);
            next.run(req).await
        }
        GateDecision::Redirect(target) => see_other(target),
    }
}

fn see_other(target: &'static str) -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(header::LOCATION, HeaderValue::from_static(target));
    (StatusCode::SEE_OTHER, headers).into_response()
}

fn parse_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    let cookie = headers.get("cookie").or_else(|| headers.get("Cookie"))?;
    let s = cookie.to_str().ok()?;
    for part in s.split(';') {
        let p = part.trim();
        if let Some(eq) = p.find('=') {
            let (k, v) = p.split_at(eq);
            if k == name {
                return Some(v[1..].to_string());
            }
        }
    }
    None
}

fn set_session_cookie(sid: &str) -> HeaderValue {
    // Secure, HttpOnly cookie scoped to path / with SameSite=Strict
    HeaderValue::from_str(&format!("{}={}; HttpOnly; Secure; SameSite=Strict; Path=/", SESSION_COOKIE, sid)).unwrap()
}

fn clear_session_cookie() -> HeaderValue {
    HeaderValue::from_str(&format!(
        "{}=deleted; Expires=Thu, 01 Jan 1970 00:00:00 GMT; HttpOnly; Secure; SameSite=Strict; Path=/",
        SESSION_COOKIE
    ))
    .unwrap()
}

/// The gate redirects tokened sessions away before this runs, so whoever reaches
/// it needs to authenticate.
async fn login_page() -> impl IntoResponse {
    Json(json!({ "status": "ok", "login_required": true }))
}

async fn login(State(state): State<AppState>, Json(payload): Json<LoginRequest>) -> impl IntoResponse {
    let provider = UpstreamAuthProvider::new(state.sessions.clone());
    match provider.login(&state.api, &payload).await {
        Ok(resp) => {
            let mut headers = HeaderMap::new();
            headers.insert(header::SET_COOKIE, set_session_cookie(&resp.session.session_id));
            let role = resp.session.role;
            (
                StatusCode::OK,
                headers,
                Json(json!({
                    "status": "ok",
                    "role": role.map(|r| r.as_str()),
                    "redirect": gate::role_home(role),
                })),
            )
        }
        Err(e) => {
            error!("login failed: {e}");
            (
                StatusCode::UNAUTHORIZED,
                HeaderMap::new(),
                Json(json!({ "status": "unauthorized" })),
            )
        }
    }
}

async fn logout(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    if let Some(sid) = parse_cookie(&headers, SESSION_COOKIE) {
        state.sessions.logout(&sid);
    }
    let mut h = HeaderMap::new();
    h.insert(header::SET_COOKIE, clear_session_cookie());
    (StatusCode::OK, h, Json(json!({ "status": "ok" })))
}
