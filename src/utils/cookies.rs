use wasm_bindgen::JsCast;
use web_sys::HtmlDocument;
use crate::utils::constants::CSRF_COOKIE;

/// Buscar el valor de una cookie dentro de `document.cookie`
pub fn cookie_value(cookies: &str, name: &str) -> Option<String> {
    cookies
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| key.trim() == name)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Token CSRF de Django leído de la cookie `csrftoken`
pub fn csrf_token() -> Option<String> {
    let document = web_sys::window()?.document()?;
    let html_document = document.dyn_into::<HtmlDocument>().ok()?;
    let cookies = html_document.cookie().ok()?;
    cookie_value(&cookies, CSRF_COOKIE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_value_found_among_others() {
        let cookies = "sessionid=abc; csrftoken=XyZ123; theme=dark";
        assert_eq!(cookie_value(cookies, "csrftoken"), Some("XyZ123".to_string()));
    }

    #[test]
    fn test_cookie_value_missing_or_empty() {
        assert_eq!(cookie_value("sessionid=abc", "csrftoken"), None);
        assert_eq!(cookie_value("csrftoken=", "csrftoken"), None);
        assert_eq!(cookie_value("", "csrftoken"), None);
    }

    #[test]
    fn test_cookie_name_must_match_exactly() {
        assert_eq!(cookie_value("xcsrftoken=nope", "csrftoken"), None);
    }
}
