//! One handler per dashboard screen.
//!
//! Every view follows the same sequence: fetch from the upstream with the
//! session's token, normalize the response shape, compute any aggregates over the
//! full sequence, then paginate into a table payload. A failed fetch degrades the
//! view to a single error response; views with several independent fetches issue
//! them concurrently and fail as a unit, never rendering a partial mix.

use axum::extract::{Path, Query, State};
use axum::{Extension, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::AppError;
use crate::identity::RequestContext;
use crate::normalize::{self, Record};
use crate::server::AppState;
use crate::table::{self, format_date_safe, Column, DEFAULT_PAGE_SIZE};

const DATE_FMT: &str = "%b %e, %Y %H:%M";

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub page: Option<usize>,
}

impl PageQuery {
    fn page(&self) -> usize {
        self.page.unwrap_or(1).max(1)
    }
}

type ViewResult = Result<Json<Value>, AppError>;

fn yes_no(b: bool) -> String {
    if b { "Yes".to_string() } else { "No".to_string() }
}

// --- admin dashboard ---

pub async fn admin_dashboard(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
) -> ViewResult {
    let stats = state.api.admin_stats(ctx.token()).await?;
    Ok(Json(json!({ "status": "ok", "stats": stats })))
}

// --- users ---

fn user_columns() -> Vec<Column> {
    vec![
        Column::field("Name", "name"),
        Column::field("Email", "email"),
        Column::field("Phone", "phone"),
        Column::field("Referrer", "referrer"),
        Column::derived("Active", |r| yes_no(r.bool_field("active"))),
        Column::derived("Created", |r| format_date_safe(r.get("created_at"), DATE_FMT, "N/A")),
    ]
}

pub async fn admin_users(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Query(q): Query<PageQuery>,
) -> ViewResult {
    let raw = state.api.list_users(ctx.token()).await?;
    let users = normalize::normalize_with_ids(&raw, &["users", "data"], Some("user_id"), "user");
    let view = table::build(&users, &user_columns(), DEFAULT_PAGE_SIZE, q.page());
    Ok(Json(json!({ "status": "ok", "view": view })))
}

pub async fn admin_create_user(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Json(payload): Json<Value>,
) -> ViewResult {
    state.api.signup(ctx.token(), &payload).await?;
    Ok(Json(json!({ "status": "ok" })))
}

pub async fn admin_delete_inactive(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
) -> ViewResult {
    let resp = state.api.delete_inactive_users(ctx.token()).await?;
    let deleted = resp.get("deleted").and_then(|v| v.as_i64()).unwrap_or(0);
    Ok(Json(json!({ "status": "ok", "deleted": deleted })))
}

// --- blogs ---

fn blog_columns() -> Vec<Column> {
    vec![
        Column::field("Title", "title"),
        Column::field("Slug", "slug"),
        Column::derived("Tags", |r| match r.get("tags") {
            Some(Value::Array(tags)) => tags
                .iter()
                .filter_map(|t| t.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            _ => String::new(),
        }),
        Column::derived("Published", |r| yes_no(r.bool_field("published"))),
        Column::derived("Created", |r| format_date_safe(r.get("created_at"), DATE_FMT, "N/A")),
    ]
}

pub async fn admin_blogs(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Query(q): Query<PageQuery>,
) -> ViewResult {
    let raw = state.api.list_blogs(ctx.token()).await?;
    let blogs = normalize::normalize_with_ids(&raw, &["blogs", "data"], None, "blog");
    let view = table::build(&blogs, &blog_columns(), DEFAULT_PAGE_SIZE, q.page());
    Ok(Json(json!({ "status": "ok", "view": view })))
}

pub async fn admin_create_blog(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Json(payload): Json<Value>,
) -> ViewResult {
    state.api.create_blog(ctx.token(), &payload).await?;
    Ok(Json(json!({ "status": "ok" })))
}

pub async fn admin_update_blog(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
    Json(payload): Json<Value>,
) -> ViewResult {
    state.api.update_blog(ctx.token(), &id, &payload).await?;
    Ok(Json(json!({ "status": "ok" })))
}

pub async fn admin_delete_blog(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
) -> ViewResult {
    state.api.delete_blog(ctx.token(), &id).await?;
    Ok(Json(json!({ "status": "ok" })))
}

pub async fn admin_publish_all_blogs(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
) -> ViewResult {
    let resp = state.api.publish_all_blogs(ctx.token()).await?;
    let published = resp.get("published").and_then(|v| v.as_i64()).unwrap_or(0);
    Ok(Json(json!({ "status": "ok", "published": published })))
}

// --- bots ---

fn bot_columns() -> Vec<Column> {
    vec![
        // Keyed responses carry the platform name as the record id only.
        Column::derived("Bot Name", |r| {
            r.str_field("bot_name").map(str::to_string).unwrap_or_else(|| r.id.clone())
        }),
        Column::field("Status", "status"),
        Column::derived("Last Run", |r| {
            let v = r.get("last_run").or_else(|| r.get("lastRun"));
            format_date_safe(v, DATE_FMT, "Never")
        }),
        Column::derived("Last Error", |r| {
            let v = r.get("last_error").or_else(|| r.get("lastError"));
            match v.and_then(|v| v.as_str()) {
                Some(s) if !s.is_empty() => s.to_string(),
                _ => "None".to_string(),
            }
        }),
    ]
}

pub async fn admin_bots(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Query(q): Query<PageQuery>,
) -> ViewResult {
    let raw = state.api.bot_status(ctx.token()).await?;
    let bots = normalize::normalize_with_ids(&raw, &["bots", "data"], None, "bot");
    let view = table::build(&bots, &bot_columns(), DEFAULT_PAGE_SIZE, q.page());
    Ok(Json(json!({ "status": "ok", "view": view })))
}

pub async fn admin_restart_bots(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
) -> ViewResult {
    state.api.restart_bots(ctx.token()).await?;
    Ok(Json(json!({ "status": "ok" })))
}

pub async fn admin_pause_bot(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(key): Path<String>,
) -> ViewResult {
    state.api.pause_bot(ctx.token(), &key).await?;
    Ok(Json(json!({ "status": "ok", "paused": key })))
}

// --- engagements ---

fn engagement_columns() -> Vec<Column> {
    vec![
        Column::field("Platform", "platform"),
        Column::field("Likes", "likes"),
        Column::field("Shares", "shares"),
        Column::field("Comments", "comments"),
        Column::field("Views", "views"),
        Column::derived("Reward Triggered", |r| yes_no(r.bool_field("reward_triggered"))),
        Column::derived("Created", |r| format_date_safe(r.get("created_at"), DATE_FMT, "Invalid date")),
    ]
}

/// Sum of the four engagement counters across the whole sequence, not the page.
pub(crate) fn engagement_totals(records: &[Record]) -> Value {
    let mut likes = 0i64;
    let mut shares = 0i64;
    let mut comments = 0i64;
    let mut views = 0i64;
    for r in records {
        likes += r.i64_field("likes");
        shares += r.i64_field("shares");
        comments += r.i64_field("comments");
        views += r.i64_field("views");
    }
    json!({ "likes": likes, "shares": shares, "comments": comments, "views": views })
}

pub async fn admin_engagements(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Query(q): Query<PageQuery>,
) -> ViewResult {
    let raw = state.api.list_engagements(ctx.token()).await?;
    let engagements = normalize::normalize_with_ids(&raw, &["engagements", "data"], None, "engagement");
    let totals = engagement_totals(&engagements);
    let view = table::build(&engagements, &engagement_columns(), DEFAULT_PAGE_SIZE, q.page());
    Ok(Json(json!({ "status": "ok", "view": view, "totals": totals })))
}

// --- notifications ---

fn notification_columns() -> Vec<Column> {
    vec![
        Column::field("Type", "type"),
        Column::field("Title", "title"),
        Column::field("Message", "message"),
        Column::derived("Read", |r| yes_no(r.bool_field("read"))),
        Column::derived("Created", |r| format_date_safe(r.get("created_at"), DATE_FMT, "N/A")),
    ]
}

pub async fn admin_notifications(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Query(q): Query<PageQuery>,
) -> ViewResult {
    let raw = state.api.list_notifications(ctx.token()).await?;
    let notifications = normalize::normalize_with_ids(&raw, &["notifications", "data"], None, "notification");
    let view = table::build(&notifications, &notification_columns(), DEFAULT_PAGE_SIZE, q.page());
    Ok(Json(json!({ "status": "ok", "view": view })))
}

// --- rewards ---

fn reward_columns() -> Vec<Column> {
    vec![
        Column::field("Reward Type", "reward_type"),
        Column::field("Amount", "amount"),
        Column::field("User", "user_id"),
        Column::field("Post", "post_id"),
        Column::derived("Notified", |r| yes_no(r.bool_field("notified"))),
        Column::derived("Issued", |r| format_date_safe(r.get("issued_at"), DATE_FMT, "N/A")),
    ]
}

/// Per-type reward counts and amount totals across the whole sequence.
pub(crate) fn reward_totals(records: &[Record]) -> Value {
    let mut by_type = serde_json::Map::new();
    for r in records {
        let ty = r.str_field("reward_type").unwrap_or("unknown").to_string();
        let amount = r.i64_field("amount");
        let entry = by_type.entry(ty).or_insert_with(|| json!({ "count": 0, "total_amount": 0 }));
        if let Some(obj) = entry.as_object_mut() {
            let count = obj.get("count").and_then(|v| v.as_i64()).unwrap_or(0);
            let total = obj.get("total_amount").and_then(|v| v.as_i64()).unwrap_or(0);
            obj.insert("count".to_string(), json!(count + 1));
            obj.insert("total_amount".to_string(), json!(total + amount));
        }
    }
    Value::Object(by_type)
}

pub async fn admin_rewards(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Query(q): Query<PageQuery>,
) -> ViewResult {
    let raw = state.api.list_rewards(ctx.token()).await?;
    let rewards = normalize::normalize_with_ids(&raw, &["rewards", "data"], None, "reward");
    let totals = reward_totals(&rewards);
    let view = table::build(&rewards, &reward_columns(), DEFAULT_PAGE_SIZE, q.page());
    Ok(Json(json!({ "status": "ok", "view": view, "totals": totals })))
}

// --- post queue ---

fn queue_columns() -> Vec<Column> {
    vec![
        Column::field("Platform", "platform"),
        Column::field("Caption", "caption"),
        Column::field("Status", "status"),
        Column::field("Priority", "priority"),
        Column::field("Retries", "retries"),
        Column::derived("Scheduled", |r| format_date_safe(r.get("scheduled_at"), DATE_FMT, "Unscheduled")),
    ]
}

pub async fn admin_queue(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Query(q): Query<PageQuery>,
) -> ViewResult {
    let raw = state.api.list_queue(ctx.token()).await?;
    let posts = normalize::normalize_with_ids(&raw, &["posts", "data", "queue"], None, "post");
    let view = table::build(&posts, &queue_columns(), DEFAULT_PAGE_SIZE, q.page());
    Ok(Json(json!({ "status": "ok", "view": view })))
}

// --- traps ---

fn trap_columns() -> Vec<Column> {
    vec![
        Column::field("Name", "name"),
        Column::field("Slug", "slug"),
        Column::field("Triggers", "triggers"),
        Column::derived("Active", |r| yes_no(r.bool_field("active"))),
        Column::derived("Created", |r| format_date_safe(r.get("created_at"), DATE_FMT, "N/A")),
    ]
}

pub async fn admin_traps(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Query(q): Query<PageQuery>,
) -> ViewResult {
    let raw = state.api.list_traps(ctx.token()).await?;
    let traps = normalize::normalize_with_ids(&raw, &["traps", "data"], None, "trap");
    let view = table::build(&traps, &trap_columns(), DEFAULT_PAGE_SIZE, q.page());
    Ok(Json(json!({ "status": "ok", "view": view })))
}

// --- roles ---

fn role_columns() -> Vec<Column> {
    vec![
        Column::field("Name", "name"),
        Column::field("Description", "description"),
        Column::derived("Created", |r| format_date_safe(r.get("created_at"), DATE_FMT, "N/A")),
    ]
}

/// The roles screen needs both the role list and the user list (for assignment),
/// fetched concurrently and failing as a unit.
pub async fn admin_roles(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Query(q): Query<PageQuery>,
) -> ViewResult {
    let token = ctx.token();
    let (roles, users) = futures_util::try_join!(state.api.list_roles(token), state.api.list_users(token))?;
    let roles = normalize::normalize_with_ids(&roles, &["roles", "data"], None, "role");
    let users = normalize::normalize_with_ids(&users, &["users", "data"], Some("user_id"), "user");
    let view = table::build(&roles, &role_columns(), DEFAULT_PAGE_SIZE, q.page());
    let assignable: Vec<&str> = users.iter().map(|u| u.id.as_str()).collect();
    Ok(Json(json!({ "status": "ok", "view": view, "assignable_users": assignable })))
}

pub async fn admin_create_role(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Json(payload): Json<Value>,
) -> ViewResult {
    state.api.create_role(ctx.token(), &payload).await?;
    Ok(Json(json!({ "status": "ok" })))
}

pub async fn admin_delete_role(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
) -> ViewResult {
    state.api.delete_role(ctx.token(), &id).await?;
    Ok(Json(json!({ "status": "ok" })))
}

pub async fn admin_assign_role(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path((user_id, role_id)): Path<(String, String)>,
) -> ViewResult {
    state.api.assign_role(ctx.token(), &user_id, &role_id).await?;
    Ok(Json(json!({ "status": "ok" })))
}

// --- settings ---

fn setting_columns() -> Vec<Column> {
    vec![
        // Settings arrive keyed by setting name; the id carries the key.
        Column::derived("Key", |r| {
            r.str_field("key").map(str::to_string).unwrap_or_else(|| r.id.clone())
        }),
        Column::derived("Value", |r| r.get("value").map(table::cell_text).unwrap_or_default()),
        Column::derived("Updated", |r| format_date_safe(r.get("updated_at"), DATE_FMT, "N/A")),
    ]
}

pub async fn admin_settings(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Query(q): Query<PageQuery>,
) -> ViewResult {
    let raw = state.api.get_settings(ctx.token()).await?;
    let settings = normalize::normalize_with_ids(&raw, &["settings", "data"], Some("key"), "setting");
    let view = table::build(&settings, &setting_columns(), DEFAULT_PAGE_SIZE, q.page());
    Ok(Json(json!({ "status": "ok", "view": view })))
}

pub async fn admin_update_settings(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Json(payload): Json<Value>,
) -> ViewResult {
    state.api.update_settings(ctx.token(), &payload).await?;
    Ok(Json(json!({ "status": "ok" })))
}

// --- analytics ---

fn top_user_columns() -> Vec<Column> {
    vec![
        Column::field("User ID", "user_id"),
        Column::field("Likes", "total_likes"),
        Column::field("Shares", "total_shares"),
        Column::field("Comments", "total_comments"),
        Column::field("Views", "total_views"),
        Column::field("Total Engagement", "total_engagement"),
    ]
}

/// Three independent aggregate fetches, issued concurrently. If any one fails the
/// whole view fails with a single notice; nothing partial is rendered.
pub async fn admin_analytics(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Query(q): Query<PageQuery>,
) -> ViewResult {
    let token = ctx.token();
    let (engagement, rewards, users) = futures_util::try_join!(
        state.api.engagement_stats(token),
        state.api.reward_stats(token),
        state.api.top_users(token),
    )?;

    let engagement = normalize::normalize_with_ids(&engagement, &["data"], Some("platform"), "platform");
    let rewards = normalize::normalize_with_ids(&rewards, &["data"], Some("reward_type"), "reward");
    let top = normalize::normalize_with_ids(&users, &["data"], Some("user_id"), "user");

    let view = table::build(&top, &top_user_columns(), DEFAULT_PAGE_SIZE, q.page());
    Ok(Json(json!({
        "status": "ok",
        "engagement_by_platform": engagement,
        "rewards_by_type": rewards,
        "top_users": view,
    })))
}

// --- leaderboard ---

fn leaderboard_columns() -> Vec<Column> {
    vec![
        Column::field("Position", "position"),
        Column::derived("Name", |r| {
            r.get("user")
                .and_then(|u| u.get("name"))
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string()
        }),
        Column::field("Points", "points"),
        Column::derived("Badge", |r| {
            r.get("user")
                .and_then(|u| u.get("badge"))
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string()
        }),
        Column::derived("Week", |r| format_date_safe(r.get("week_start"), "%b %e, %Y", "N/A")),
    ]
}

pub async fn admin_leaderboard(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Query(q): Query<PageQuery>,
) -> ViewResult {
    let raw = state.api.leaderboard(ctx.token()).await?;
    let entries = normalize::normalize_with_ids(&raw, &["leaderboard", "data"], Some("user_id"), "entry");
    let view = table::build(&entries, &leaderboard_columns(), DEFAULT_PAGE_SIZE, q.page());
    Ok(Json(json!({ "status": "ok", "view": view })))
}

// --- partner area ---

fn post_performance_columns() -> Vec<Column> {
    vec![
        Column::field("Post", "post_id"),
        Column::field("Platform", "platform"),
        Column::field("Likes", "likes"),
        Column::field("Shares", "shares"),
        Column::field("Comments", "comments"),
        Column::field("Views", "views"),
    ]
}

pub async fn partner_dashboard(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Query(q): Query<PageQuery>,
) -> ViewResult {
    let stats = state.api.partner_stats(ctx.token()).await?;
    let performance = stats.get("postPerformance").cloned().unwrap_or(Value::Null);
    let rows = normalize::normalize_with_ids(&performance, &["data"], Some("post_id"), "post");
    let view = table::build(&rows, &post_performance_columns(), DEFAULT_PAGE_SIZE, q.page());
    Ok(Json(json!({
        "status": "ok",
        "stats": {
            "total_traps": stats.get("totalTraps").cloned().unwrap_or(json!(0)),
            "users_captured": stats.get("usersCaptured").cloned().unwrap_or(json!(0)),
            "scheduled_posts": stats.get("scheduledPosts").cloned().unwrap_or(json!(0)),
            "reward_points": stats.get("rewardPoints").cloned().unwrap_or(json!(0)),
        },
        "post_performance": view,
    })))
}

pub async fn partner_posts(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Query(q): Query<PageQuery>,
) -> ViewResult {
    let raw = state.api.list_queue(ctx.token()).await?;
    let posts = normalize::normalize_with_ids(&raw, &["posts", "data", "queue"], None, "post");
    let view = table::build(&posts, &queue_columns(), DEFAULT_PAGE_SIZE, q.page());
    Ok(Json(json!({ "status": "ok", "view": view })))
}

pub async fn partner_rewards(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Query(q): Query<PageQuery>,
) -> ViewResult {
    let raw = state.api.list_rewards(ctx.token()).await?;
    let rewards = normalize::normalize_with_ids(&raw, &["rewards", "data"], None, "reward");
    let totals = reward_totals(&rewards);
    let view = table::build(&rewards, &reward_columns(), DEFAULT_PAGE_SIZE, q.page());
    Ok(Json(json!({ "status": "ok", "view": view, "totals": totals })))
}

pub async fn partner_traps(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Query(q): Query<PageQuery>,
) -> ViewResult {
    let raw = state.api.list_traps(ctx.token()).await?;
    let traps = normalize::normalize_with_ids(&raw, &["traps", "data"], None, "trap");
    let view = table::build(&traps, &trap_columns(), DEFAULT_PAGE_SIZE, q.page());
    Ok(Json(json!({ "status": "ok", "view": view })))
}

// --- visitor area ---

/// Visitor rewards pairs the reward summary with the leaderboard; both fetches run
/// concurrently and the view fails as a unit.
pub async fn visitor_rewards(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Query(q): Query<PageQuery>,
) -> ViewResult {
    let token = ctx.token();
    let (rewards, board) = futures_util::try_join!(state.api.list_rewards(token), state.api.leaderboard(token))?;

    let reward_rows = normalize::normalize_with_ids(&rewards, &["rewards", "data"], None, "reward");
    let totals = reward_totals(&reward_rows);
    let entries = normalize::normalize_with_ids(&board, &["leaderboard", "data"], Some("user_id"), "entry");
    let view = table::build(&entries, &leaderboard_columns(), DEFAULT_PAGE_SIZE, q.page());

    Ok(Json(json!({
        "status": "ok",
        "rewards": { "count": reward_rows.len(), "totals": totals },
        "leaderboard": view,
    })))
}
