use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;

/// Total attempts per request, the first call included.
pub const MAX_ATTEMPTS: u32 = 3;

static RE_HTTP_STATUS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^HTTP ([1-5]\d\d)\b").unwrap());

/// Status from asanaclient's fallback `HTTP <code> <reason>` message, used
/// when the response body carried no Asana error message.
fn fallback_status(message: &str) -> Option<u16> {
    RE_HTTP_STATUS
        .captures(message)
        .and_then(|caps| caps[1].parse().ok())
}

fn is_rate_limit(message: &str) -> bool {
    let message = message.to_lowercase();
    message.contains("rate limit") || message.contains("too many requests")
}

/// Client errors other than 429 are final.
pub fn is_retryable_status(status: u16) -> bool {
    status == 429 || status >= 500
}

/// Whether a failed request may succeed on a later attempt.
///
/// asanaclient maps 404 to `NotFound` and every other error response to
/// `Api`, carrying Asana's message rather than the status code.
pub fn is_retryable(e: &asanaclient::Error) -> bool {
    use asanaclient::Error as E;
    match e {
        E::Http(err) => err
            .status()
            .is_none_or(|status| is_retryable_status(status.as_u16())),
        E::Api { message } => {
            is_rate_limit(message) || fallback_status(message).is_some_and(is_retryable_status)
        }
        E::MissingToken
        | E::InvalidToken
        | E::Parse(_)
        | E::NotFound(_)
        | E::Validation { .. }
        | E::SyncTokenExpired { .. } => false,
    }
}

/// Delay after failed attempt number `attempt` (0-based): 1s, 2s, 4s, ...
pub fn backoff(attempt: u32) -> Duration {
    Duration::from_secs(1u64 << attempt.min(6))
}

/// Retry an API call expression with exponential backoff.
///
/// Usage: `retry_api!(client.get_all(&path, &query))`
///
/// The expression is re-evaluated on each attempt. This is a macro because
/// async closures returning borrowed futures can't satisfy `Fn`.
macro_rules! retry_api {
    ($expr:expr) => {{
        let mut _attempt: u32 = 0;
        loop {
            match $expr.await {
                Ok(val) => break Ok::<_, $crate::error::Error>(val),
                Err(e) => {
                    if $crate::fetch::retry::is_retryable(&e)
                        && _attempt + 1 < $crate::fetch::retry::MAX_ATTEMPTS
                    {
                        let wait = $crate::fetch::retry::backoff(_attempt);
                        log::warn!(
                            "Asana request failed ({e}). Retrying in {}s (attempt {}/{})",
                            wait.as_secs(),
                            _attempt + 2,
                            $crate::fetch::retry::MAX_ATTEMPTS
                        );
                        tokio::time::sleep(wait).await;
                        _attempt += 1;
                    } else {
                        break Err($crate::error::Error::Api(e));
                    }
                }
            }
        }
    }};
}

pub(crate) use retry_api;
