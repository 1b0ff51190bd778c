//! The HTTP seam the dispatcher sends through

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use courier_config::{HttpConfig, Method};
use indexmap::IndexMap;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};

use crate::error::TransportError;
use crate::files::LoadedFile;

/// Request body handed to a transport
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Empty,
    /// Pre-encoded JSON text
    Json(String),
    Multipart(MultipartForm),
}

/// Text fields and file attachments of a multipart request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultipartForm {
    pub fields: Vec<(String, String)>,
    pub files: Vec<FilePart>,
}

/// A file attached under a form field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    pub field_key: String,
    pub file: LoadedFile,
}

/// Fully assembled request
#[derive(Debug, Clone, PartialEq)]
pub struct TransportRequest {
    pub method: Method,
    pub url: String,
    pub headers: IndexMap<String, String>,
    pub body: Body,
}

/// Raw response from a transport
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    /// Lower-cased header names; repeated headers are joined with `, `
    pub headers: IndexMap<String, String>,
    pub body: Bytes,
}

/// Sends one assembled request and returns the raw response
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError>;
}

/// [`Transport`] backed by a shared `reqwest::Client`
#[derive(Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
}

impl fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpTransport").finish_non_exhaustive()
    }
}

impl HttpTransport {
    /// Build a transport from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if a default header is invalid or the TLS backend
    /// cannot be initialized
    pub fn new(config: &HttpConfig) -> Result<Self, TransportError> {
        let mut default_headers = HeaderMap::new();
        for (name, value) in &config.default_headers {
            let (name, value) = parse_header(name, value).map_err(TransportError::Build)?;
            default_headers.insert(name, value);
        }

        let mut builder = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .default_headers(default_headers);

        if let Some(secs) = config.connect_timeout_seconds {
            builder = builder.connect_timeout(Duration::from_secs(secs));
        }

        let http = builder
            .build()
            .map_err(|e| TransportError::Build(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { http })
    }

    /// Wrap an existing client
    pub const fn from_client(http: reqwest::Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        let TransportRequest {
            method,
            url,
            headers,
            body,
        } = request;

        let multipart = matches!(body, Body::Multipart(_));
        let mut builder = self.http.request(to_reqwest_method(method), url.as_str());

        for (name, value) in &headers {
            // The multipart encoder owns the content type and its boundary
            if multipart && name.eq_ignore_ascii_case(CONTENT_TYPE.as_str()) {
                continue;
            }
            let (name, value) = parse_header(name, value).map_err(TransportError::Protocol)?;
            builder = builder.header(name, value);
        }

        builder = match body {
            Body::Empty => builder,
            Body::Json(json) => {
                let has_content_type = headers.keys().any(|k| k.eq_ignore_ascii_case(CONTENT_TYPE.as_str()));
                let builder = if has_content_type {
                    builder
                } else {
                    builder.header(CONTENT_TYPE, "application/json")
                };
                builder.body(json)
            }
            Body::Multipart(form) => builder.multipart(to_reqwest_form(form)?),
        };

        let response = builder.send().await.map_err(classify)?;

        let status = response.status().as_u16();
        let headers = collect_headers(response.headers());
        let body = response.bytes().await.map_err(classify)?;

        Ok(TransportResponse { status, headers, body })
    }
}

const fn to_reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Delete => reqwest::Method::DELETE,
    }
}

fn to_reqwest_form(form: MultipartForm) -> Result<reqwest::multipart::Form, TransportError> {
    let mut out = reqwest::multipart::Form::new();

    for (key, value) in form.fields {
        out = out.text(key, value);
    }

    for FilePart { field_key, file } in form.files {
        let part = reqwest::multipart::Part::bytes(file.bytes.to_vec())
            .file_name(file.file_name)
            .mime_str(&file.content_type)
            .map_err(|e| TransportError::Protocol(format!("invalid mime type: {e}")))?;
        out = out.part(field_key, part);
    }

    Ok(out)
}

fn parse_header(name: &str, value: &str) -> Result<(HeaderName, HeaderValue), String> {
    let header_name = HeaderName::try_from(name).map_err(|e| format!("invalid header name `{name}`: {e}"))?;
    let header_value = HeaderValue::try_from(value).map_err(|e| format!("invalid value for header `{name}`: {e}"))?;
    Ok((header_name, header_value))
}

fn collect_headers(headers: &HeaderMap) -> IndexMap<String, String> {
    let mut out: IndexMap<String, String> = IndexMap::new();

    for (name, value) in headers {
        let value = String::from_utf8_lossy(value.as_bytes());
        out.entry(name.as_str().to_owned())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(&value);
            })
            .or_insert_with(|| value.into_owned());
    }

    out
}

/// Sort a `reqwest` failure into the transport taxonomy
fn classify(err: reqwest::Error) -> TransportError {
    let message = err.to_string();

    if err.is_timeout() {
        TransportError::TimedOut(message)
    } else if err.is_connect() {
        TransportError::Connect(message)
    } else if err.is_decode() {
        TransportError::Malformed {
            message,
            fragment: None,
        }
    } else {
        TransportError::Protocol(message)
    }
}
