//! Scan payload resolution
//!
//! Decodes the raw text read off a badge scanner into a check-in identifier.
//! Payloads are check-in links of the form `<origin>/scan/<token>`; the last
//! path segment is the token handed to the check-in service.

use url::Url;

use crate::utils::errors::{BadgeBuddyError, Result};

/// Extract the check-in identifier from a scanned payload
pub fn resolve_identifier(payload: &str) -> Result<String> {
    let url = Url::parse(payload.trim()).map_err(|_| {
        BadgeBuddyError::Decode("payload is not a valid check-in link".to_string())
    })?;

    url.path_segments()
        .and_then(|segments| {
            segments
                .filter(|segment| !segment.is_empty())
                .last()
                .map(|segment| segment.to_string())
        })
        .ok_or_else(|| BadgeBuddyError::Decode("check-in link has no identifier".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_resolves_last_path_segment() {
        let identifier = resolve_identifier("https://example.com/scan/abc123").unwrap();
        assert_eq!(identifier, "abc123");
    }

    #[test]
    fn test_tolerates_trailing_slash() {
        let identifier = resolve_identifier("https://example.com/scan/abc123/").unwrap();
        assert_eq!(identifier, "abc123");
    }

    #[test]
    fn test_rejects_non_url_payloads() {
        assert_matches!(
            resolve_identifier("not a url"),
            Err(BadgeBuddyError::Decode(_))
        );
    }

    #[test]
    fn test_rejects_links_without_a_path() {
        assert_matches!(
            resolve_identifier("https://example.com"),
            Err(BadgeBuddyError::Decode(_))
        );
    }
}
