//! Host extraction helpers shared by the allow-list, the resolver and grouping

use http::Uri;
use tracing::debug;

/// Extract the authority (host plus optional port) of a URL, lowercased
///
/// Anything that does not parse as an absolute URI is assumed to already be a
/// bare host and is returned trimmed. This never fails.
///
/// # Examples
/// ```
/// use cdn_purge::host::extract_host;
///
/// assert_eq!(extract_host("https://example.com:8080/path"), "example.com:8080");
/// assert_eq!(extract_host("example.com"), "example.com");
/// assert_eq!(extract_host("https://WWW.Example.com/a"), "www.example.com");
/// ```
pub fn extract_host(url: &str) -> String {
    let trimmed = url.trim();

    match trimmed.parse::<Uri>() {
        Ok(uri) => match (uri.scheme(), uri.authority()) {
            (Some(_), Some(authority)) => strip_userinfo(authority.as_str()).to_ascii_lowercase(),
            _ => {
                debug!("url={} is not absolute, using it as a bare host", trimmed);
                trimmed.to_ascii_lowercase()
            }
        },
        Err(e) => {
            debug!(
                "Failed to parse url={} ({}), using it as a bare host",
                trimmed, e
            );
            trimmed.to_ascii_lowercase()
        }
    }
}

/// Remove a trailing `:port` from a host, keeping bracketed IPv6 literals intact
pub fn strip_port(host: &str) -> &str {
    if host.starts_with('[') {
        return match host.find(']') {
            Some(end) => &host[..=end],
            None => host,
        };
    }

    match host.rsplit_once(':') {
        Some((name, port)) if !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit()) => {
            name
        }
        _ => host,
    }
}

/// Host of a URL without scheme or port, with any trailing dot removed
///
/// This is the form used for allow-list comparison.
pub fn normalized_host(url: &str) -> String {
    let host = extract_host(url);
    strip_port(&host).trim_end_matches('.').to_string()
}

fn strip_userinfo(authority: &str) -> &str {
    match authority.rsplit_once('@') {
        Some((_, host)) => host,
        None => authority,
    }
}
