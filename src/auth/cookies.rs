use std::time::Duration;

use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue};

use crate::auth::claims::Role;

pub const TOKEN_COOKIE: &str = "token";
/// Display-only mirror of the role for the frontend. Authorization always
/// re-derives the role from the verified token, never from this cookie.
pub const ROLE_COOKIE: &str = "role";

fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    let raw = headers.get(COOKIE)?.to_str().ok()?;
    raw.split(';')
        .filter_map(|part| part.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_string())
}

pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    cookie_value(headers, TOKEN_COOKIE)
}

fn set_cookie(
    name: &str,
    value: &str,
    max_age: Duration,
    secure: bool,
) -> anyhow::Result<HeaderValue> {
    let mut cookie = format!(
        "{}={}; Path=/; HttpOnly; Max-Age={}; SameSite=None",
        name,
        value,
        max_age.as_secs()
    );
    if secure {
        cookie.push_str("; Secure");
    }
    Ok(HeaderValue::from_str(&cookie)?)
}

fn expire_cookie(name: &str, secure: bool) -> anyhow::Result<HeaderValue> {
    let mut cookie = format!(
        "{}=deleted; Path=/; HttpOnly; Expires=Thu, 01 Jan 1970 00:00:00 GMT; Max-Age=0; SameSite=None",
        name
    );
    if secure {
        cookie.push_str("; Secure");
    }
    Ok(HeaderValue::from_str(&cookie)?)
}

/// Set-Cookie headers for a fresh session: the signed token plus the
/// display-only role mirror.
pub fn session_headers(
    token: &str,
    role: Role,
    max_age: Duration,
    secure: bool,
) -> anyhow::Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.append(SET_COOKIE, set_cookie(TOKEN_COOKIE, token, max_age, secure)?);
    headers.append(
        SET_COOKIE,
        set_cookie(ROLE_COOKIE, role.as_str(), max_age, secure)?,
    );
    Ok(headers)
}

/// Set-Cookie headers expiring both session cookies.
pub fn clear_session_headers(secure: bool) -> anyhow::Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.append(SET_COOKIE, expire_cookie(TOKEN_COOKIE, secure)?);
    headers.append(SET_COOKIE, expire_cookie(ROLE_COOKIE, secure)?);
    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_token_from_cookie_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("role=user; token=abc.def.ghi"),
        );
        assert_eq!(token_from_headers(&headers).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn missing_token_cookie_is_none() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("role=admin"));
        assert_eq!(token_from_headers(&headers), None);
        assert_eq!(token_from_headers(&HeaderMap::new()), None);
    }

    #[test]
    fn session_headers_set_both_cookies() {
        let headers =
            session_headers("tok", Role::Admin, Duration::from_secs(604_800), false).unwrap();
        let cookies: Vec<_> = headers
            .get_all(SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap().to_string())
            .collect();
        assert_eq!(cookies.len(), 2);
        assert!(cookies[0].starts_with("token=tok;"));
        assert!(cookies[0].contains("HttpOnly"));
        assert!(cookies[0].contains("Max-Age=604800"));
        assert!(cookies[0].contains("SameSite=None"));
        assert!(!cookies[0].contains("Secure"));
        assert!(cookies[1].starts_with("role=admin;"));
    }

    #[test]
    fn secure_attribute_only_in_production_mode() {
        let headers =
            session_headers("tok", Role::User, Duration::from_secs(60), true).unwrap();
        for value in headers.get_all(SET_COOKIE) {
            assert!(value.to_str().unwrap().ends_with("; Secure"));
        }
    }

    #[test]
    fn clear_headers_expire_both_cookies() {
        let headers = clear_session_headers(false).unwrap();
        let cookies: Vec<_> = headers
            .get_all(SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap().to_string())
            .collect();
        assert_eq!(cookies.len(), 2);
        assert!(cookies.iter().all(|c| c.contains("Max-Age=0")));
    }
}
