use crate::error::AppError;

#[test]
fn http_status_mapping() {
    assert_eq!(AppError::user("bad_input", "oops").http_status(), 400);
    assert_eq!(AppError::auth("auth", "no").http_status(), 401);
    assert_eq!(AppError::forbidden("forbidden", "blocked").http_status(), 403);
    assert_eq!(AppError::not_found("not_found", "missing").http_status(), 404);
    assert_eq!(AppError::upstream(500, "boom").http_status(), 502);
    assert_eq!(AppError::transport("unreachable").http_status(), 503);
    assert_eq!(AppError::internal("internal", "panic").http_status(), 500);
}

#[test]
fn upstream_status_is_kept_for_logs_not_surface() {
    // A 404 from the upstream is still a gateway-side 502; the original status and
    // body live in the error detail only.
    let e = AppError::upstream(404, "{\"error\":\"no such user\"}");
    assert_eq!(e.http_status(), 502);
    assert!(e.to_string().contains("404"));
    assert!(e.to_string().contains("no such user"));
}

#[test]
fn user_facing_masks_upstream_and_transport_detail() {
    let up = AppError::upstream(500, "stack trace with secrets");
    assert_eq!(up.user_facing(), "request failed");
    assert!(!up.user_facing().contains("secrets"));

    let tr = AppError::transport("connection refused (127.0.0.1:5000)");
    assert_eq!(tr.user_facing(), "request failed");

    // Caller-addressable errors keep their message.
    let auth = AppError::auth("login_failed", "invalid credentials");
    assert_eq!(auth.user_facing(), "invalid credentials");
}

#[test]
fn codes_round_trip() {
    assert_eq!(AppError::upstream(502, "x").code_str(), "upstream_error");
    assert_eq!(AppError::transport("x").code_str(), "transport");
    assert_eq!(AppError::user("u", "m").code_str(), "u");
    assert_eq!(AppError::user("u", "m").message(), "m");
}
