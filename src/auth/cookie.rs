use std::time::Duration;

use axum::http::{header, HeaderMap};
use cookie::{time::Duration as CookieDuration, Cookie, SameSite};

pub const SESSION_COOKIE: &str = "auth";

/// Attributes of the `auth` cookie. Issue and clear share them so the browser
/// treats both as the same cookie.
#[derive(Debug, Clone, Copy)]
pub struct SessionCookie {
    pub secure: bool,
    pub max_age: Duration,
}

impl SessionCookie {
    pub fn new(secure: bool, max_age: Duration) -> Self {
        Self { secure, max_age }
    }

    pub fn issue(&self, token: String) -> Cookie<'static> {
        self.build(token, CookieDuration::seconds(self.max_age.as_secs() as i64))
    }

    pub fn clear(&self) -> Cookie<'static> {
        self.build(String::new(), CookieDuration::ZERO)
    }

    fn build(&self, value: String, max_age: CookieDuration) -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE, value))
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure)
            .path("/")
            .max_age(max_age)
            .build()
    }
}

/// Value of the `auth` cookie, if the request carries a non-empty one.
pub fn read_session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|h| h.to_str().ok())
        .flat_map(|h| Cookie::split_parse(h))
        .filter_map(Result::ok)
        .find(|c| c.name() == SESSION_COOKIE && !c.value().is_empty())
        .map(|c| c.value().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    const DAY: Duration = Duration::from_secs(24 * 60 * 60);

    #[test]
    fn issued_cookie_has_session_attributes() {
        let set = SessionCookie::new(false, DAY).issue("tok".into()).to_string();
        assert!(set.starts_with("auth=tok"));
        assert!(set.contains("HttpOnly"));
        assert!(set.contains("SameSite=Lax"));
        assert!(set.contains("Path=/"));
        assert!(set.contains("Max-Age=86400"));
        assert!(!set.contains("Secure"));
    }

    #[test]
    fn secure_flag_follows_policy() {
        let set = SessionCookie::new(true, DAY).issue("tok".into()).to_string();
        assert!(set.contains("Secure"));
    }

    #[test]
    fn cleared_cookie_expires_immediately_with_same_attributes() {
        let set = SessionCookie::new(true, DAY).clear().to_string();
        assert!(set.starts_with("auth=;"));
        assert!(set.contains("Max-Age=0"));
        assert!(set.contains("SameSite=Lax"));
        assert!(set.contains("HttpOnly"));
        assert!(set.contains("Secure"));
    }

    #[test]
    fn reads_token_among_other_cookies() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; auth=abc.def.ghi; lang=en"),
        );
        assert_eq!(read_session_token(&headers).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn missing_or_empty_cookie_is_none() {
        let mut headers = HeaderMap::new();
        assert_eq!(read_session_token(&headers), None);
        headers.insert(header::COOKIE, HeaderValue::from_static("auth=; theme=dark"));
        assert_eq!(read_session_token(&headers), None);
    }
}
