//! Anti-forgery token lookup in the cookies the server sets

/// Cookie the backend stores the token in
pub const DEFAULT_COOKIE: &str = "csrftoken";

/// Read the token from a `Cookie` header value such as `a=1; csrftoken=xyz`.
pub fn token_from_cookie(cookie_header: &str, name: Option<&str>) -> Option<String> {
    let name = name.unwrap_or(DEFAULT_COOKIE);
    cookie_header
        .split(';')
        .map(str::trim)
        .find_map(|cookie| cookie.strip_prefix(name)?.strip_prefix('='))
        .map(|value| match urlencoding::decode(value) {
            Ok(decoded) => decoded.into_owned(),
            Err(_) => value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_from_cookie() {
        let header = "sessionid=abc; csrftoken=tok%2Ben; theme=dark";
        assert_eq!(token_from_cookie(header, None).as_deref(), Some("tok+en"));
        assert_eq!(token_from_cookie(header, Some("theme")).as_deref(), Some("dark"));
        assert_eq!(token_from_cookie(header, Some("missing")), None);
        assert_eq!(token_from_cookie("", None), None);
    }

    #[test]
    fn test_cookie_name_must_match_exactly() {
        assert_eq!(token_from_cookie("csrftokenx=1", None), None);
    }
}
