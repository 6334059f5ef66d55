//! URL validation for the fetch proxy, the GitHub proxy and the feed reader.

use url::Url;

use crate::error_handling::FetchError;

/// Validates a caller-supplied target URL.
///
/// Rejects a missing or blank value, anything that does not parse as an
/// absolute URL, and schemes other than `http`/`https`. No network call is
/// made.
///
/// # Examples
///
/// ```
/// use ginkohub_tools::security::validate_target_url;
///
/// assert!(validate_target_url(Some("https://example.com/page")).is_ok());
/// assert!(validate_target_url(Some("ftp://example.com")).is_err());
/// assert!(validate_target_url(None).is_err());
/// ```
pub fn validate_target_url(raw: Option<&str>) -> Result<Url, FetchError> {
    let raw = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(FetchError::MissingUrl)?;

    let url = Url::parse(raw).map_err(FetchError::InvalidUrl)?;
    match url.scheme() {
        "http" | "https" => {}
        scheme => {
            log::debug!("Rejected target URL with scheme '{}'", scheme);
            return Err(FetchError::UnsupportedScheme(scheme.to_string()));
        }
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(FetchError::InvalidRequest("URL has no host".to_string()));
    }

    Ok(url)
}

/// Validates a target URL and restricts it to `github.com` and its subdomains.
pub fn validate_github_url(raw: Option<&str>) -> Result<Url, FetchError> {
    let url = validate_target_url(raw)?;
    match url.host_str() {
        Some(host) if is_allowed_github_host(host) => Ok(url),
        host => Err(FetchError::HostNotAllowed(host.unwrap_or_default().to_string())),
    }
}

/// Returns true for `github.com` and any `*.github.com` host (case-insensitive).
///
/// Look-alike hosts such as `evilgithub.com` or `github.com.example.org` are
/// rejected.
pub fn is_allowed_github_host(host: &str) -> bool {
    let host = host.trim_end_matches('.').to_ascii_lowercase();
    host == "github.com" || host.ends_with(".github.com")
}
