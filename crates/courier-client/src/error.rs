use std::fmt;

use crate::alert::AlertInfo;

/// Client-specific result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Status code recorded when a failure never produced an HTTP response
pub const UNKNOWN_STATUS: u16 = 404;

/// Closed set of failure categories a caller can render an alert for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExceptionKind {
    /// The device is offline or the host could not be reached
    NoInternet,
    /// The HTTP exchange itself failed
    HttpError,
    /// The response could not be decoded
    FormatError,
    Unauthorized,
    UnderMaintenance,
    /// The call exceeded its deadline
    Timeout,
    Unspecified,
}

impl ExceptionKind {
    /// Every kind, in declaration order
    pub const ALL: [Self; 7] = [
        Self::NoInternet,
        Self::HttpError,
        Self::FormatError,
        Self::Unauthorized,
        Self::UnderMaintenance,
        Self::Timeout,
        Self::Unspecified,
    ];

    /// Fixed alert text for this kind
    pub fn alert(self) -> AlertInfo {
        crate::alert::lookup(Some(self))
    }

    const fn as_str(self) -> &'static str {
        match self {
            Self::NoInternet => "no_internet",
            Self::HttpError => "http_error",
            Self::FormatError => "format_error",
            Self::Unauthorized => "unauthorized",
            Self::UnderMaintenance => "under_maintenance",
            Self::Timeout => "timeout",
            Self::Unspecified => "unspecified",
        }
    }
}

impl fmt::Display for ExceptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error surfaced to callers of the dispatcher
///
/// Carries enough context to render an alert, while the raw status code and
/// body stay available for callers that need them.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {}", .message.as_deref().unwrap_or("no details"))]
pub struct AppError {
    pub kind: ExceptionKind,
    /// Underlying detail, or a user-facing override set via [`Self::with_message`]
    pub message: Option<String>,
    /// Overrides the table title when set
    pub title: Option<String>,
    /// HTTP status, or [`UNKNOWN_STATUS`] when no response was received
    pub status_code: u16,
    pub response_body: String,
    /// Whether `message` replaces the table message in [`Self::alert`]
    pub message_is_user_facing: bool,
}

impl AppError {
    pub const fn new(kind: ExceptionKind) -> Self {
        Self {
            kind,
            message: None,
            title: None,
            status_code: UNKNOWN_STATUS,
            response_body: String::new(),
            message_is_user_facing: false,
        }
    }

    /// Set a message meant for the user, shown by [`Self::alert`]
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self.message_is_user_facing = true;
        self
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_status(mut self, status_code: u16) -> Self {
        self.status_code = status_code;
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.response_body = body.into();
        self
    }

    /// Offline before or during the call
    pub fn no_internet(message: Option<String>) -> Self {
        Self {
            message,
            ..Self::new(ExceptionKind::NoInternet)
        }
    }

    pub fn http(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::new(ExceptionKind::HttpError)
        }
    }

    /// Undecodable response, with the offending fragment when known
    pub fn format(fragment: Option<String>) -> Self {
        Self {
            message: fragment,
            ..Self::new(ExceptionKind::FormatError)
        }
    }

    /// Deadline exceeded
    ///
    /// Always carries the fixed timeout title and message, never the
    /// transport's own wording.
    pub fn timeout() -> Self {
        let alert = ExceptionKind::Timeout.alert();
        Self::new(ExceptionKind::Timeout)
            .with_title(alert.title)
            .with_message(alert.message)
    }

    /// Map a non-success HTTP status to an error a caller can alert on
    pub fn from_status(status_code: u16, body: impl Into<String>) -> Self {
        let kind = match status_code {
            401 | 403 => ExceptionKind::Unauthorized,
            503 => ExceptionKind::UnderMaintenance,
            _ => ExceptionKind::HttpError,
        };

        Self::new(kind).with_status(status_code).with_body(body)
    }

    /// Title and message to show the user
    ///
    /// An explicit title, or a message set through [`Self::with_message`],
    /// wins over the taxonomy table. Transport detail never reaches the alert.
    pub fn alert(&self) -> AlertInfo {
        let fallback = self.kind.alert();
        let message = match &self.message {
            Some(message) if self.message_is_user_facing => message.clone(),
            _ => fallback.message,
        };

        AlertInfo {
            title: self.title.clone().unwrap_or(fallback.title),
            message,
        }
    }
}

/// Failures reported by a [`crate::Transport`]
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Socket-level failure: DNS, refused connection, reset
    #[error("connection failed: {0}")]
    Connect(String),

    /// The transport's own deadline elapsed
    #[error("transport timed out: {0}")]
    TimedOut(String),

    /// Response bytes could not be decoded
    #[error("malformed response: {message}")]
    Malformed {
        message: String,
        /// Excerpt of the input around the point of failure
        fragment: Option<String>,
    },

    /// Any other failure of the HTTP exchange
    #[error("protocol error: {0}")]
    Protocol(String),

    /// The transport could not be constructed
    #[error("invalid transport configuration: {0}")]
    Build(String),

    /// Already classified upstream; passed to the caller unchanged
    #[error(transparent)]
    App(#[from] AppError),
}

impl From<TransportError> for AppError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Connect(message) => Self::no_internet(Some(message)),
            TransportError::TimedOut(_) => Self::timeout(),
            TransportError::Malformed { message, fragment } => Self::format(Some(fragment.unwrap_or(message))),
            TransportError::Protocol(message) | TransportError::Build(message) => Self::http(message),
            TransportError::App(app) => app,
        }
    }
}

/// Excerpt of `source` around a 1-based `line`/`column` position
///
/// Used to point at the part of a response body that failed to decode.
pub fn source_fragment(source: &str, line: usize, column: usize) -> Option<String> {
    const RADIUS: usize = 24;

    let text = source.lines().nth(line.checked_sub(1)?)?;
    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() {
        return None;
    }

    let center = column.saturating_sub(1).min(chars.len() - 1);
    let start = center.saturating_sub(RADIUS);
    let end = (center + RADIUS).min(chars.len());

    Some(chars[start..end].iter().collect())
}
