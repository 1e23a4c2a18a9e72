//! Signed session cookies.
//!
//! The cookie value is `<token>.<signature>` where the signature is the
//! hex-encoded HMAC-SHA256 of the token under the provider secret.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use super::HeaderList;

type HmacSha256 = Hmac<Sha256>;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "auth.session_token";

fn keyed_mac(secret: &str) -> HmacSha256 {
    HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC key length is valid")
}

/// Sign `token`, producing the cookie value.
pub fn sign(token: &str, secret: &str) -> String {
    let mut mac = keyed_mac(secret);
    mac.update(token.as_bytes());
    format!("{}.{}", token, hex::encode(mac.finalize().into_bytes()))
}

/// Return the token inside a signed cookie value if the signature matches.
///
/// Comparison is constant-time.
pub fn verify<'a>(value: &'a str, secret: &str) -> Option<&'a str> {
    let (token, signature) = value.rsplit_once('.')?;
    let signature = hex::decode(signature).ok()?;
    let mut mac = keyed_mac(secret);
    mac.update(token.as_bytes());
    mac.verify_slice(&signature).ok()?;
    Some(token)
}

/// Find a cookie by name across every `Cookie` header on the request.
pub fn find<'a>(headers: &'a HeaderList, name: &str) -> Option<&'a str> {
    headers
        .get_all("cookie")
        .flat_map(|header| header.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim_matches('"'))
}

/// `Set-Cookie` value for a session cookie.
///
/// `max_age` of `None` produces a browser-session cookie.
pub fn session_cookie(value: &str, max_age: Option<i64>, secure: bool) -> String {
    let mut cookie = format!("{}={}; Path=/; HttpOnly; SameSite=Lax", SESSION_COOKIE, value);
    if let Some(seconds) = max_age {
        cookie.push_str(&format!("; Max-Age={}", seconds));
    }
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// `Set-Cookie` value that removes the session cookie.
pub fn expired_cookie(secure: bool) -> String {
    session_cookie("", Some(0), secure)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn signed_value_verifies() {
        let value = sign("abc123", SECRET);
        assert_eq!(verify(&value, SECRET), Some("abc123"));
    }

    #[test]
    fn tampering_is_detected() {
        let value = sign("abc123", SECRET);
        let (_, signature) = value.split_once('.').unwrap();

        assert_eq!(verify(&format!("abc124.{}", signature), SECRET), None);
        assert_eq!(verify(&format!("abc123.{}", "00".repeat(32)), SECRET), None);
        assert_eq!(verify(&value, "other-secret"), None);
        assert_eq!(verify("abc123", SECRET), None);
        assert_eq!(verify("abc123.not-hex", SECRET), None);
    }

    #[test]
    fn finds_cookie_across_headers() {
        let headers: HeaderList = [
            ("cookie", "theme=dark; lang=en"),
            ("Cookie", "auth.session_token=tok.sig"),
        ]
        .into_iter()
        .collect();

        assert_eq!(find(&headers, SESSION_COOKIE), Some("tok.sig"));
        assert_eq!(find(&headers, "lang"), Some("en"));
        assert_eq!(find(&headers, "missing"), None);
    }

    #[test]
    fn cookie_attributes() {
        assert_eq!(
            session_cookie("v", Some(60), false),
            "auth.session_token=v; Path=/; HttpOnly; SameSite=Lax; Max-Age=60"
        );
        assert_eq!(
            session_cookie("v", None, true),
            "auth.session_token=v; Path=/; HttpOnly; SameSite=Lax; Secure"
        );
        assert!(expired_cookie(false).contains("Max-Age=0"));
    }
}
