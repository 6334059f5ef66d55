//! Retry classification for the general fetch proxy.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use tokio_retry::RetryIf;

use super::{fetch_once, OutboundRequest, UpstreamResponse};
use crate::error_handling::{get_retry_strategy, FetchError};

/// Determines whether a failed attempt is worth repeating.
///
/// # Transient
///
/// - timeouts and connection failures (including DNS resolution)
/// - requests aborted before a response arrived
/// - upstream 5xx responses
///
/// # Permanent
///
/// Everything else: invalid input, redirect loops, body decode errors.
pub(crate) fn is_transient(error: &FetchError) -> bool {
    match error {
        FetchError::Transport(e) => {
            !e.is_redirect() && (e.is_timeout() || e.is_connect() || e.is_request())
        }
        FetchError::UpstreamStatus(code) => (500..600).contains(code),
        _ => false,
    }
}

/// Sends `request`, retrying transient failures with 1s, 2s, 4s backoff.
///
/// An upstream that still answers 5xx after the last retry is reported as
/// [`FetchError::UpstreamStatus`].
pub async fn fetch_with_retry(
    client: &reqwest::Client,
    request: &OutboundRequest,
) -> Result<UpstreamResponse, FetchError> {
    let attempts = Arc::new(AtomicU32::new(0));

    let result = RetryIf::start(
        get_retry_strategy(),
        || {
            let attempt = attempts.fetch_add(1, Ordering::SeqCst) + 1;
            async move {
                log::debug!("Fetching {} (attempt {})", request.target, attempt);
                let response = fetch_once(client, request).await?;
                if response.status.is_server_error() {
                    return Err(FetchError::UpstreamStatus(response.status.as_u16()));
                }
                Ok(response)
            }
        },
        |error: &FetchError| {
            let retry = is_transient(error);
            if retry {
                log::warn!("Transient failure fetching {}: {}", request.target, error);
            }
            retry
        },
    )
    .await;

    if let Err(ref error) = result {
        log::warn!(
            "Giving up on {} after {} attempt(s): {}",
            request.target,
            attempts.load(Ordering::SeqCst),
            error
        );
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_5xx_is_transient() {
        assert!(is_transient(&FetchError::UpstreamStatus(503)));
        assert!(is_transient(&FetchError::UpstreamStatus(500)));
    }

    #[test]
    fn test_validation_errors_are_permanent() {
        assert!(!is_transient(&FetchError::MissingUrl));
        assert!(!is_transient(&FetchError::UnsupportedScheme("ftp".into())));
        assert!(!is_transient(&FetchError::InvalidRequest("bad".into())));
    }

    #[tokio::test]
    async fn test_connection_refused_is_transient() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let error = reqwest::Client::new()
            .get(format!("http://127.0.0.1:{}/", port))
            .send()
            .await
            .unwrap_err();
        assert!(is_transient(&FetchError::Transport(error)));
    }
}
