//! Role-based route gating.
//!
//! Token presence is the authentication signal; the role is an authorization
//! refinement on top of it. The gate is a pure function evaluated by request-time
//! middleware, before any protected handler can issue privileged upstream fetches.

use serde::{Deserialize, Serialize};

pub const ADMIN_HOME: &str = "/admin";
pub const PARTNER_HOME: &str = "/partner/dashboard";
pub const VISITOR_HOME: &str = "/visitor/rewards";
pub const LOGIN_PATH: &str = "/login";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Partner,
    Visitor,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Partner => "partner",
            Role::Visitor => "visitor",
        }
    }

    /// Unrecognized role strings are absent, not an error.
    pub fn parse(s: &str) -> Option<Role> {
        match s {
            "admin" => Some(Role::Admin),
            "partner" => Some(Role::Partner),
            "visitor" => Some(Role::Visitor),
            _ => None,
        }
    }

    pub fn home(&self) -> &'static str {
        match self {
            Role::Admin => ADMIN_HOME,
            Role::Partner => PARTNER_HOME,
            Role::Visitor => VISITOR_HOME,
        }
    }
}

/// Default landing route after login. An absent or unrecognized role falls back to
/// the login page rather than guessing an area.
pub fn role_home(role: Option<Role>) -> &'static str {
    match role {
        Some(r) => r.home(),
        None => LOGIN_PATH,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    AdminArea,
    PartnerArea,
    VisitorArea,
    LoginPage,
    /// Anything unmatched passes through.
    Public,
}

impl RouteClass {
    pub fn classify(path: &str) -> RouteClass {
        if path == "/admin" || path.starts_with("/admin/") {
            RouteClass::AdminArea
        } else if path == "/partner" || path.starts_with("/partner/") {
            RouteClass::PartnerArea
        } else if path == "/visitor" || path.starts_with("/visitor/") {
            RouteClass::VisitorArea
        } else if path == LOGIN_PATH {
            RouteClass::LoginPage
        } else {
            RouteClass::Public
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Allow,
    /// Redirect to the given path before the protected handler runs.
    Redirect(&'static str),
}

/// The access transition table, first matching rule wins.
///
/// A session with a token but no role is deliberately not restricted further
/// (flagged for product review; do not tighten without product input).
pub fn evaluate(path: &str, has_token: bool, role: Option<Role>) -> GateDecision {
    match RouteClass::classify(path) {
        RouteClass::AdminArea => match (has_token, role) {
            (false, _) => GateDecision::Redirect(LOGIN_PATH),
            (true, Some(r)) if r != Role::Admin => GateDecision::Redirect(r.home()),
            (true, _) => GateDecision::Allow,
        },
        RouteClass::PartnerArea => match (has_token, role) {
            (false, _) => GateDecision::Redirect(LOGIN_PATH),
            (true, Some(Role::Admin)) => GateDecision::Redirect(ADMIN_HOME),
            (true, Some(Role::Visitor)) => GateDecision::Redirect(VISITOR_HOME),
            (true, _) => GateDecision::Allow,
        },
        RouteClass::VisitorArea => {
            if has_token {
                GateDecision::Allow
            } else {
                GateDecision::Redirect(LOGIN_PATH)
            }
        }
        RouteClass::LoginPage => {
            if has_token {
                // Tokened sessions never see the login page; an absent or unknown
                // role lands on the least-privileged area.
                GateDecision::Redirect(match role {
                    Some(Role::Admin) => ADMIN_HOME,
                    Some(Role::Partner) => PARTNER_HOME,
                    _ => VISITOR_HOME,
                })
            } else {
                GateDecision::Allow
            }
        }
        RouteClass::Public => GateDecision::Allow,
    }
}
