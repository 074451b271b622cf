//! Redirect URL matching and query extraction
//!
//! Decides whether a callback URL delivered by the host OS satisfies the
//! redirect URL a pending request expects. Pure functions: a structural
//! mismatch yields `false`, never an error.

use std::collections::HashMap;
use url::Url;

/// True when `candidate` satisfies `expected`.
///
/// Scheme, host and effective port must be equal; when `expected` carries a
/// non-trivial path, the candidate path must equal it as well. Query and
/// fragment components never affect the result. Port comparison matters for
/// loopback redirects, where `http://127.0.0.1:{port}` URLs differ only by
/// the port of the local listener.
pub fn matches(candidate: &Url, expected: &Url) -> bool {
    if candidate.scheme() != expected.scheme() {
        return false;
    }
    if candidate.host_str() != expected.host_str() {
        return false;
    }
    if candidate.port_or_known_default() != expected.port_or_known_default() {
        return false;
    }
    if constrains_path(expected) && candidate.path() != expected.path() {
        return false;
    }
    true
}

/// The query component as a name → value map; the last occurrence of a
/// duplicated name wins.
pub fn query_params(url: &Url) -> HashMap<String, String> {
    url.query_pairs()
        .map(|(name, value)| (name.into_owned(), value.into_owned()))
        .collect()
}

// "" and "/" are what the Url parser leaves when the redirect is only a
// scheme + authority, e.g. `myapp://callback` or `https://example.test`
fn constrains_path(expected: &Url) -> bool {
    !matches!(expected.path(), "" | "/")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn matches_on_scheme_and_host() {
        let expected = url("myapp://callback");

        assert!(matches(&url("myapp://callback"), &expected));
        assert!(matches(&url("myapp://callback?token=XYZ"), &expected));
        assert!(matches(&url("myapp://callback#fragment"), &expected));
    }

    #[test]
    fn rejects_scheme_mismatch() {
        let expected = url("myapp://callback");
        assert!(!matches(&url("https://other.test/callback?token=XYZ"), &expected));
        assert!(!matches(&url("otherapp://callback"), &expected));
    }

    #[test]
    fn rejects_host_mismatch() {
        let expected = url("myapp://callback");
        assert!(!matches(&url("myapp://elsewhere"), &expected));
    }

    #[test]
    fn path_is_compared_only_when_expected_constrains_it() {
        let bare = url("https://id.example.test");
        assert!(matches(&url("https://id.example.test/anything"), &bare));

        let constrained = url("http://127.0.0.1:8080/callback");
        assert!(matches(&url("http://127.0.0.1:8080/callback?token=t"), &constrained));
        assert!(!matches(&url("http://127.0.0.1:8080/other"), &constrained));
    }

    #[test]
    fn rejects_port_mismatch_on_loopback() {
        let expected = url("http://127.0.0.1:8080/callback");
        assert!(!matches(&url("http://127.0.0.1:9090/callback"), &expected));
    }

    #[test]
    fn default_ports_are_equivalent_to_explicit_ones() {
        assert!(matches(
            &url("https://id.example.test:443/cb"),
            &url("https://id.example.test/cb")
        ));
    }

    #[test]
    fn query_extraction_last_occurrence_wins() {
        let params = query_params(&url("myapp://callback?token=first&token=second&x=1"));
        assert_eq!(params.get("token").map(String::as_str), Some("second"));
        assert_eq!(params.get("x").map(String::as_str), Some("1"));
    }

    #[test]
    fn query_extraction_decodes_percent_escapes() {
        let params = query_params(&url("myapp://callback?email=a%40b.com"));
        assert_eq!(params.get("email").map(String::as_str), Some("a@b.com"));
    }
}
