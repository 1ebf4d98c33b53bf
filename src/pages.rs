//! Placeholder page shells. The real views are rendered client-side; these routes
//! only give the route guard something to stand in front of.

use axum::{response::Html, routing::get, Router};

use crate::state::AppState;

fn shell(title: &str) -> Html<String> {
    Html(format!(
        "<!doctype html><html><head><title>{title} | SecureVote</title></head>\
         <body><div id=\"root\" data-page=\"{title}\"></div></body></html>"
    ))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { shell("Home") }))
        .route("/signin", get(|| async { shell("Sign in") }))
        .route("/signup", get(|| async { shell("Sign up") }))
        .route("/dashboard", get(|| async { shell("Dashboard") }))
        .route("/dashboard/*rest", get(|| async { shell("Dashboard") }))
        .route("/profile", get(|| async { shell("Profile") }))
        .route("/VotingPortal", get(|| async { shell("Voting portal") }))
}
