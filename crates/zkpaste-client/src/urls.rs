//! User-facing URLs
//!
//! The random key rides in the fragment (`#...`), which user agents never
//! put on the wire, so the server stores ciphertext it cannot open.

use zkpaste_core::ServerEndpoint;

/// The URLs printed after a successful paste.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultUrls {
    /// `base?id#key`
    pub view: String,
    /// `base?pasteid=id&deletetoken=token`; absent for burn-after-reading
    pub delete: Option<String>,
}

/// Build the view URL and, when it makes sense, the delete URL.
pub fn compose_urls(
    endpoint: &ServerEndpoint,
    paste_id: &str,
    random_key: &str,
    delete_token: Option<&str>,
    burn_after_reading: bool,
) -> ResultUrls {
    let base = endpoint.base_url();
    let view = format!("{base}?{paste_id}#{random_key}");

    let delete = match delete_token {
        Some(token) if !burn_after_reading => {
            Some(format!("{base}?pasteid={paste_id}&deletetoken={token}"))
        }
        _ => None,
    };

    ResultUrls { view, delete }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zkpaste_core::Protocol;

    fn example_org() -> ServerEndpoint {
        ServerEndpoint::new(Protocol::Https, "example.org", 443, "/").unwrap()
    }

    #[test]
    fn test_default_https_port_omitted() {
        let urls = compose_urls(&example_org(), "abc123", "Zm9v", Some("xyz"), false);
        assert_eq!(urls.view, "https://example.org/?abc123#Zm9v");
        assert_eq!(
            urls.delete.as_deref(),
            Some("https://example.org/?pasteid=abc123&deletetoken=xyz")
        );
    }

    #[test]
    fn test_burn_after_reading_has_no_delete_url() {
        let urls = compose_urls(&example_org(), "abc123", "Zm9v", Some("xyz"), true);
        assert_eq!(urls.view, "https://example.org/?abc123#Zm9v");
        assert_eq!(urls.delete, None);
    }

    #[test]
    fn test_missing_token_has_no_delete_url() {
        let urls = compose_urls(&example_org(), "abc123", "Zm9v", None, false);
        assert_eq!(urls.delete, None);
    }

    #[test]
    fn test_custom_port_kept() {
        let ep = ServerEndpoint::new(Protocol::Http, "localhost", 8080, "/bin/").unwrap();
        let urls = compose_urls(&ep, "id", "k=", Some("t"), false);
        assert_eq!(urls.view, "http://localhost:8080/bin/?id#k=");
        assert_eq!(
            urls.delete.as_deref(),
            Some("http://localhost:8080/bin/?pasteid=id&deletetoken=t")
        );
    }

    #[test]
    fn test_default_http_port_omitted() {
        let ep = ServerEndpoint::new(Protocol::Http, "example.org", 80, "/").unwrap();
        let urls = compose_urls(&ep, "id", "k", None, true);
        assert_eq!(urls.view, "http://example.org/?id#k");
    }

    #[test]
    fn test_key_only_in_fragment() {
        let urls = compose_urls(&example_org(), "abc123", "S3cr3tK3y=", Some("xyz"), false);
        let (before_fragment, fragment) = urls.view.split_once('#').unwrap();
        assert_eq!(fragment, "S3cr3tK3y=");
        assert!(!before_fragment.contains("S3cr3tK3y"));
        assert!(!urls.delete.unwrap().contains("S3cr3tK3y"));
    }
}
