//! AccessGate transition table, route classification, and role-home mapping.

use dashgate::gate::{
    evaluate, role_home, GateDecision, Role, RouteClass, ADMIN_HOME, LOGIN_PATH, PARTNER_HOME, VISITOR_HOME,
};

#[test]
fn route_classification() {
    assert_eq!(RouteClass::classify("/admin"), RouteClass::AdminArea);
    assert_eq!(RouteClass::classify("/admin/users"), RouteClass::AdminArea);
    assert_eq!(RouteClass::classify("/partner/dashboard"), RouteClass::PartnerArea);
    assert_eq!(RouteClass::classify("/visitor/rewards"), RouteClass::VisitorArea);
    assert_eq!(RouteClass::classify("/login"), RouteClass::LoginPage);
    assert_eq!(RouteClass::classify("/"), RouteClass::Public);
    // Prefix matching is per path segment, not per substring.
    assert_eq!(RouteClass::classify("/administrator"), RouteClass::Public);
    assert_eq!(RouteClass::classify("/partnership"), RouteClass::Public);
}

#[test]
fn admin_area_rules() {
    // No token: to login regardless of role.
    assert_eq!(evaluate("/admin/users", false, None), GateDecision::Redirect(LOGIN_PATH));
    assert_eq!(evaluate("/admin", false, Some(Role::Admin)), GateDecision::Redirect(LOGIN_PATH));
    // Token with a non-admin role: to that role's home.
    assert_eq!(evaluate("/admin/users", true, Some(Role::Partner)), GateDecision::Redirect(PARTNER_HOME));
    assert_eq!(evaluate("/admin/users", true, Some(Role::Visitor)), GateDecision::Redirect(VISITOR_HOME));
    // Token with admin role, or with no role at all: allowed.
    assert_eq!(evaluate("/admin/users", true, Some(Role::Admin)), GateDecision::Allow);
    assert_eq!(evaluate("/admin/users", true, None), GateDecision::Allow);
}

#[test]
fn partner_area_rules() {
    assert_eq!(evaluate("/partner/posts", false, None), GateDecision::Redirect(LOGIN_PATH));
    assert_eq!(evaluate("/partner/posts", true, Some(Role::Admin)), GateDecision::Redirect(ADMIN_HOME));
    assert_eq!(evaluate("/partner/posts", true, Some(Role::Visitor)), GateDecision::Redirect(VISITOR_HOME));
    assert_eq!(evaluate("/partner/posts", true, Some(Role::Partner)), GateDecision::Allow);
    assert_eq!(evaluate("/partner/posts", true, None), GateDecision::Allow);
}

#[test]
fn visitor_area_rules() {
    assert_eq!(evaluate("/visitor/rewards", false, None), GateDecision::Redirect(LOGIN_PATH));
    // Any tokened session may view the visitor area.
    assert_eq!(evaluate("/visitor/rewards", true, Some(Role::Admin)), GateDecision::Allow);
    assert_eq!(evaluate("/visitor/rewards", true, Some(Role::Partner)), GateDecision::Allow);
    assert_eq!(evaluate("/visitor/rewards", true, Some(Role::Visitor)), GateDecision::Allow);
    assert_eq!(evaluate("/visitor/rewards", true, None), GateDecision::Allow);
}

#[test]
fn login_page_rules() {
    assert_eq!(evaluate("/login", false, None), GateDecision::Allow);
    assert_eq!(evaluate("/login", true, Some(Role::Admin)), GateDecision::Redirect(ADMIN_HOME));
    assert_eq!(evaluate("/login", true, Some(Role::Partner)), GateDecision::Redirect(PARTNER_HOME));
    assert_eq!(evaluate("/login", true, Some(Role::Visitor)), GateDecision::Redirect(VISITOR_HOME));
    // Tokened but roleless sessions land on the least-privileged area.
    assert_eq!(evaluate("/login", true, None), GateDecision::Redirect(VISITOR_HOME));
}

#[test]
fn public_routes_pass_through() {
    assert_eq!(evaluate("/", false, None), GateDecision::Allow);
    assert_eq!(evaluate("/healthz", true, Some(Role::Admin)), GateDecision::Allow);
}

#[test]
fn role_home_mapping() {
    assert_eq!(role_home(Some(Role::Admin)), ADMIN_HOME);
    assert_eq!(role_home(Some(Role::Partner)), PARTNER_HOME);
    assert_eq!(role_home(Some(Role::Visitor)), VISITOR_HOME);
    // Absent role falls back to the login page rather than guessing an area.
    assert_eq!(role_home(None), LOGIN_PATH);
}

#[test]
fn role_parsing_is_lenient() {
    assert_eq!(Role::parse("admin"), Some(Role::Admin));
    assert_eq!(Role::parse("partner"), Some(Role::Partner));
    assert_eq!(Role::parse("visitor"), Some(Role::Visitor));
    assert_eq!(Role::parse("superuser"), None);
    assert_eq!(Role::parse(""), None);
}
