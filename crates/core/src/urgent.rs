//! Urgent request lifecycle: `pending -> confirmed | rejected`.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Maximum length of an urgent request message.
pub const MAX_MESSAGE_LEN: usize = 2000;

/// Text sent to the requester when an administrator confirms.
pub const CONFIRMED_MESSAGE: &str =
    "Your urgent meeting request has been confirmed. We will contact you shortly.";

/// Text sent on rejection when the administrator gave no reason.
pub const REJECTED_FALLBACK_MESSAGE: &str =
    "Your urgent meeting request could not be accommodated at this time.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UrgentStatus {
    Pending,
    Confirmed,
    Rejected,
}

impl UrgentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            UrgentStatus::Pending => "pending",
            UrgentStatus::Confirmed => "confirmed",
            UrgentStatus::Rejected => "rejected",
        }
    }

    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value {
            "pending" => Ok(UrgentStatus::Pending),
            "confirmed" => Ok(UrgentStatus::Confirmed),
            "rejected" => Ok(UrgentStatus::Rejected),
            other => Err(CoreError::Validation(format!(
                "Unknown urgent request status '{other}'"
            ))),
        }
    }
}

/// Validate a resolution: the request must be pending and the target terminal.
pub fn validate_resolution(from: UrgentStatus, to: UrgentStatus) -> Result<(), CoreError> {
    if to == UrgentStatus::Pending {
        return Err(CoreError::Validation(
            "status must be 'confirmed' or 'rejected'".to_string(),
        ));
    }
    if from != UrgentStatus::Pending {
        return Err(CoreError::Validation(format!(
            "Urgent request is already {}",
            from.as_str()
        )));
    }
    Ok(())
}

/// Trim and validate the request message.
pub fn normalize_message(message: &str) -> Result<String, CoreError> {
    let trimmed = message.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("message must not be empty".to_string()));
    }
    if trimmed.chars().count() > MAX_MESSAGE_LEN {
        return Err(CoreError::Validation(format!(
            "message must be at most {MAX_MESSAGE_LEN} characters"
        )));
    }
    Ok(trimmed.to_string())
}

/// The rejection reason to store: only for rejections, only when non-blank.
pub fn effective_reason(status: UrgentStatus, reason: Option<&str>) -> Option<String> {
    if status != UrgentStatus::Rejected {
        return None;
    }
    reason
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(str::to_string)
}

/// Notification text sent to the requester after a resolution.
pub fn resolution_message(status: UrgentStatus, reason: Option<&str>) -> String {
    match (status, reason) {
        (UrgentStatus::Rejected, Some(reason)) => {
            format!("Your urgent meeting request was rejected: {reason}")
        }
        (UrgentStatus::Rejected, None) => REJECTED_FALLBACK_MESSAGE.to_string(),
        _ => CONFIRMED_MESSAGE.to_string(),
    }
}

/// Notification text sent to administrators for a new request.
pub fn admin_alert_message(requester: &str, message: &str) -> String {
    format!("Urgent meeting request from {requester}: {message}")
}
