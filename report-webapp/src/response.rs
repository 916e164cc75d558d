//! Interpretation of the report endpoint's answer
//!
//! Order matters: the body is already text, the content type is checked before
//! any parsing, and success needs both a 2xx status and `"status":"success"`.

use crate::error::{excerpt, SubmitError, EXCERPT_LIMIT};
use crate::transport::RawResponse;
use crate::types::SubmissionResult;
use tracing::warn;

/// Fallback shown when the server accepts the report without a message
pub const DEFAULT_SUCCESS_MESSAGE: &str = "Report submitted successfully!";

/// A report the server accepted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accepted {
    pub message: String,
}

/// `true` when the header announces a JSON body
pub fn is_json_content_type(content_type: Option<&str>) -> bool {
    content_type.is_some_and(|ct| ct.to_ascii_lowercase().contains("application/json"))
}

pub fn interpret(raw: &RawResponse) -> Result<Accepted, SubmitError> {
    if !is_json_content_type(raw.content_type.as_deref()) {
        return Err(SubmitError::Protocol {
            content_type: raw
                .content_type
                .clone()
                .unwrap_or_else(|| "none".to_string()),
            body: excerpt(&raw.body, EXCERPT_LIMIT),
        });
    }

    let result: SubmissionResult = match serde_json::from_str(&raw.body) {
        Ok(result) => result,
        Err(e) => {
            warn!(status = raw.status, "report endpoint sent invalid JSON: {}", e);
            return Err(SubmitError::Rejected {
                status: raw.status,
                message: format!("{} (invalid JSON: {})", server_error(raw), e),
            });
        }
    };

    let message = result.message.clone().filter(|m| !m.trim().is_empty());

    if raw.is_success() && result.is_success() {
        return Ok(Accepted {
            message: message.unwrap_or_else(|| DEFAULT_SUCCESS_MESSAGE.to_string()),
        });
    }

    Err(SubmitError::Rejected {
        status: raw.status,
        message: message.unwrap_or_else(|| server_error(raw)),
    })
}

fn server_error(raw: &RawResponse) -> String {
    format!(
        "Server error: {} - {}",
        raw.status,
        excerpt(&raw.body, EXCERPT_LIMIT)
    )
}
