//! Link detection for scanned texts.

use url::Url;

/// URL a scanned text points to, if it is one.
///
/// Text not starting with `http` gets an `https://` prefix before parsing.
#[must_use]
pub fn link_target(text: &str) -> Option<Url> {
    let text = text.trim();
    if text.is_empty() || text.chars().any(char::is_whitespace) {
        return None;
    }

    let candidate = if text.starts_with("http") {
        text.to_string()
    } else {
        format!("https://{text}")
    };

    Url::parse(&candidate)
        .ok()
        .filter(|url| matches!(url.scheme(), "http" | "https"))
        .filter(|url| url.host_str().is_some_and(|host| !host.is_empty()))
}
