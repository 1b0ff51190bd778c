//! User-facing alert text for each [`ExceptionKind`]

use serde::Serialize;

use crate::error::ExceptionKind;

/// Title and message shown to the user for a failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlertInfo {
    pub title: String,
    pub message: String,
}

const GENERIC: (&str, &str) = (
    "Something Went Wrong",
    "An unexpected error occurred. Please try again.",
);

const fn entry(kind: ExceptionKind) -> (&'static str, &'static str) {
    match kind {
        ExceptionKind::NoInternet => (
            "No Internet Connection",
            "Please check your internet connection and try again.",
        ),
        ExceptionKind::HttpError => (
            "Connection Problem",
            "We couldn't reach the server. Please try again later.",
        ),
        ExceptionKind::FormatError => (
            "Unexpected Response",
            "The server sent a response we couldn't read. Please try again later.",
        ),
        ExceptionKind::Unauthorized => (
            "Session Expired",
            "Your session has expired. Please sign in again.",
        ),
        ExceptionKind::UnderMaintenance => (
            "Under Maintenance",
            "The service is undergoing maintenance. Please try again shortly.",
        ),
        ExceptionKind::Timeout => (
            "Request Timed Out",
            "The server took too long to respond. Please try again.",
        ),
        ExceptionKind::Unspecified => GENERIC,
    }
}

/// Look up the alert for a kind; `None` yields the generic pair
pub fn lookup(kind: Option<ExceptionKind>) -> AlertInfo {
    let (title, message) = kind.map_or(GENERIC, entry);
    AlertInfo {
        title: title.to_owned(),
        message: message.to_owned(),
    }
}
