// address.rs
use std::fmt;

use thiserror::Error;
use url::Url;

/// Query parameter carrying the proxied target in a location link.
pub const LOCATION_PARAM: &str = "url";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AddressError {
    #[error("Invalid URL format. Please enter a valid web address.")]
    Invalid,
}

/// A validated absolute address, kept as the user-facing text it was normalized to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    text: String,
    url: Url,
}

impl Target {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn hostname(&self) -> &str {
        self.url.host_str().unwrap_or_default()
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Trims the input, assumes `https://` when no http(s) scheme is given, and validates it.
pub fn normalize(input: &str) -> Result<Target, AddressError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(AddressError::Invalid);
    }

    let text = if has_http_scheme(trimmed) {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };
    let url = Url::parse(&text).map_err(|_| AddressError::Invalid)?;
    if url.host_str().is_none_or(str::is_empty) {
        return Err(AddressError::Invalid);
    }
    Ok(Target { text, url })
}

fn has_http_scheme(text: &str) -> bool {
    ["http://", "https://"].iter().any(|scheme| {
        text.get(..scheme.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
    })
}

/// Shareable link that reopens `target` when passed back to the application.
pub fn location_link(share_base: &Url, target: &Target) -> Url {
    let mut link = share_base.clone();
    link.query_pairs_mut()
        .clear()
        .append_pair(LOCATION_PARAM, target.as_str());
    link
}

/// Extracts the target from a location link, if `text` is one.
pub fn target_from_location(text: &str) -> Option<String> {
    let link = Url::parse(text.trim()).ok()?;
    link.query_pairs()
        .find(|(key, _)| key == LOCATION_PARAM)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_error_is_cloneable() {
        let err = normalize("exa mple.com").expect_err("invalid");
        assert_eq!(err.clone(), err);
    }

    #[test]
    fn test_bare_host_gets_https_prefix() {
        let target = normalize("  example.com  ").expect("valid");
        assert_eq!(target.as_str(), "https://example.com");
        assert_eq!(target.hostname(), "example.com");
    }

    #[test]
    fn test_existing_scheme_is_kept() {
        assert_eq!(
            normalize("http://example.com/a?b=c").expect("valid").as_str(),
            "http://example.com/a?b=c"
        );
        assert_eq!(
            normalize("HTTPS://Example.com").expect("valid").as_str(),
            "HTTPS://Example.com"
        );
    }

    #[test]
    fn test_malformed_input_is_rejected() {
        for input in ["", "   ", "exa mple.com", "https://", "http://[::1"] {
            assert_eq!(normalize(input), Err(AddressError::Invalid), "{input:?}");
        }
    }

    #[test]
    fn test_location_link_round_trip() {
        let base = Url::parse("https://relayview.app/").expect("base");
        let target = normalize("example.com/search?q=a b").expect("valid");
        let link = location_link(&base, &target);
        assert_eq!(
            target_from_location(link.as_str()).as_deref(),
            Some("https://example.com/search?q=a b")
        );
        assert_eq!(target_from_location("example.com"), None);
        assert_eq!(target_from_location("https://example.com/?q=1"), None);
    }
}
