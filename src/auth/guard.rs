//! Page-level route guard.
//!
//! Every page path is classified through [`ROUTE_TABLE`]; the decision is a pure
//! function of that class and whether the request carries a live session.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tracing::debug;

use super::{cookie::read_session_token, session::SessionKeys};

pub const SIGNIN_PATH: &str = "/signin";
pub const DASHBOARD_PATH: &str = "/dashboard";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    /// Only reachable without a session (landing, sign-in, sign-up).
    PublicOnly,
    /// Only reachable with a session.
    Protected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect(&'static str),
}

/// `pattern/*` covers the prefix itself and everything below it.
pub const ROUTE_TABLE: &[(&str, RouteClass)] = &[
    ("/", RouteClass::PublicOnly),
    ("/signin", RouteClass::PublicOnly),
    ("/signup", RouteClass::PublicOnly),
    ("/dashboard/*", RouteClass::Protected),
    ("/profile/*", RouteClass::Protected),
    ("/VotingPortal/*", RouteClass::Protected),
];

fn matches(pattern: &str, path: &str) -> bool {
    match pattern.strip_suffix("/*") {
        Some(prefix) => {
            path == prefix
                || path
                    .strip_prefix(prefix)
                    .is_some_and(|rest| rest.starts_with('/'))
        }
        None => pattern == path,
    }
}

/// Class of `path`, or `None` when the guard does not cover it.
pub fn classify(path: &str) -> Option<RouteClass> {
    let path = match path.trim_end_matches('/') {
        "" => "/",
        trimmed => trimmed,
    };
    ROUTE_TABLE
        .iter()
        .find(|(pattern, _)| matches(pattern, path))
        .map(|(_, class)| *class)
}

pub fn decide(class: RouteClass, has_session: bool) -> GuardDecision {
    match (class, has_session) {
        (RouteClass::Protected, false) => GuardDecision::Redirect(SIGNIN_PATH),
        (RouteClass::PublicOnly, true) => GuardDecision::Redirect(DASHBOARD_PATH),
        _ => GuardDecision::Allow,
    }
}

pub async fn route_guard(
    State(keys): State<SessionKeys>,
    request: Request,
    next: Next,
) -> Response {
    let Some(class) = classify(request.uri().path()) else {
        return next.run(request).await;
    };

    // an expired or forged cookie counts as no session
    let has_session = read_session_token(request.headers())
        .map(|token| keys.verify(&token).is_ok())
        .unwrap_or(false);

    match decide(class, has_session) {
        GuardDecision::Allow => next.run(request).await,
        GuardDecision::Redirect(target) => {
            debug!(path = %request.uri().path(), ?class, redirect_to = target, "route guard redirect");
            Redirect::temporary(target).into_response()
        }
    }
}
