//! Target URL validation for outbound requests.
//!
//! Every caller-supplied URL passes through here before any network call:
//! - must be present and parse as an absolute URL
//! - scheme must be `http` or `https`
//! - the GitHub-only routes additionally restrict the host

mod url_validation;

pub use url_validation::{is_allowed_github_host, validate_github_url, validate_target_url};
