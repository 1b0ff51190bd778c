use bytes::Bytes;
use indexmap::IndexMap;
use serde::de::DeserializeOwned;

use crate::error::{AppError, Result, source_fragment};
use crate::transport::TransportResponse;

/// A file that could not be read while assembling a multipart request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedFile {
    pub field_key: String,
    pub path: String,
    pub reason: String,
}

/// Response returned to the caller of [`crate::Dispatcher::execute`]
///
/// Non-success statuses are returned as-is; use [`Self::error_for_status`]
/// to turn them into an [`AppError`].
#[derive(Debug, Clone)]
pub struct Response {
    status: u16,
    headers: IndexMap<String, String>,
    body: Bytes,
    failed_files: Vec<FailedFile>,
}

impl Response {
    pub(crate) fn new(response: TransportResponse, failed_files: Vec<FailedFile>) -> Self {
        Self {
            status: response.status,
            headers: response.headers,
            body: response.body,
            failed_files,
        }
    }

    pub const fn status(&self) -> u16 {
        self.status
    }

    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Response headers, lower-cased names
    pub const fn headers(&self) -> &IndexMap<String, String> {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    pub const fn body(&self) -> &Bytes {
        &self.body
    }

    /// Body decoded as UTF-8, with invalid sequences replaced
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Files skipped during multipart assembly; empty for single-part calls
    pub fn failed_files(&self) -> &[FailedFile] {
        &self.failed_files
    }

    /// Deserialize the body as JSON
    ///
    /// # Errors
    ///
    /// Returns a `FormatError` whose message is the part of the body that
    /// failed to parse
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(|e| {
            let text = self.text();
            let fragment = source_fragment(&text, e.line(), e.column()).unwrap_or_else(|| e.to_string());
            AppError::format(Some(fragment))
                .with_status(self.status)
                .with_body(text)
        })
    }

    /// Convert a non-success status into an error
    ///
    /// # Errors
    ///
    /// Returns the status-mapped [`AppError`] when the status is not 2xx
    pub fn error_for_status(self) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(AppError::from_status(self.status, self.text()))
        }
    }
}
