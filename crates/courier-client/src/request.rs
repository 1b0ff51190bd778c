//! Caller-supplied description of a single call

use courier_config::RequestDefaults;
pub use courier_config::Method;
use indexmap::IndexMap;
use serde_json::{Map, Value};

/// One multipart form field holding zero or more files
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileGroup {
    pub field_key: String,
    pub file_paths: Vec<String>,
}

impl FileGroup {
    pub fn new<I, P>(field_key: impl Into<String>, file_paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        Self {
            field_key: field_key.into(),
            file_paths: file_paths.into_iter().map(Into::into).collect(),
        }
    }
}

/// Everything the dispatcher needs to perform one call
///
/// No validation happens here: a malformed URL only surfaces when the
/// request is dispatched.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    pub method: Method,
    pub url: String,
    /// JSON body for POST/PUT, or form fields for multipart calls
    pub parameters: Option<Map<String, Value>>,
    pub headers: Option<IndexMap<String, String>>,
    /// Non-empty selects the multipart path
    pub files: Vec<FileGroup>,
    /// Label used in log output
    pub service_name: String,
    pub timeout_seconds: u64,
}

impl Default for RequestDescriptor {
    fn default() -> Self {
        Self::from_defaults(String::new(), &RequestDefaults::default())
    }
}

impl RequestDescriptor {
    /// Descriptor with the built-in defaults (POST, 90 s)
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Descriptor whose method and timeout come from configuration
    pub fn from_defaults(url: impl Into<String>, defaults: &RequestDefaults) -> Self {
        Self {
            method: defaults.method,
            url: url.into(),
            parameters: None,
            headers: None,
            files: Vec::new(),
            service_name: String::new(),
            timeout_seconds: defaults.timeout_seconds,
        }
    }

    #[must_use]
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    #[must_use]
    pub fn with_parameters(mut self, parameters: Map<String, Value>) -> Self {
        self.parameters = Some(parameters);
        self
    }

    /// Add a single parameter, creating the map if needed
    #[must_use]
    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.parameters
            .get_or_insert_with(Map::new)
            .insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .get_or_insert_with(IndexMap::new)
            .insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_file_group(mut self, group: FileGroup) -> Self {
        self.files.push(group);
        self
    }

    #[must_use]
    pub fn with_service_name(mut self, service_name: impl Into<String>) -> Self {
        self.service_name = service_name.into();
        self
    }

    #[must_use]
    pub fn with_timeout_seconds(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }

    /// Whether this call goes out as a multipart form
    pub fn is_multipart(&self) -> bool {
        !self.files.is_empty()
    }
}
