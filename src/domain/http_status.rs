//! Human-readable labels for HTTP status codes, used in notification text.

use http::StatusCode;

/// Label used when a request never produced a response.
pub const NO_RESPONSE: &str = "No Response";

const UNKNOWN: &str = "Unknown Status";

/// Maps a numeric status to its reason phrase.
///
/// `0` stands for "no response received". Codes outside the registered set
/// fall back to a generic label instead of failing.
pub fn status_text(code: u16) -> &'static str {
    if code == 0 {
        return NO_RESPONSE;
    }
    StatusCode::from_u16(code)
        .ok()
        .and_then(|status| status.canonical_reason())
        .unwrap_or(UNKNOWN)
}

pub fn is_success(code: u16) -> bool { (200..300).contains(&code) }
