//! Single entry point for issuing calls

use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use courier_config::{Config, LogMode};
use futures::future::join_all;
use serde_json::{Map, Value};

use crate::connectivity::{AlwaysOnline, Connectivity, TcpProbe};
use crate::error::{AppError, Result};
use crate::files::{FileReader, FsReader};
use crate::request::RequestDescriptor;
use crate::response::{FailedFile, Response};
use crate::transport::{Body, FilePart, HttpTransport, MultipartForm, Transport, TransportRequest};

/// Checks connectivity, sends the described request under its deadline,
/// and maps every failure to an [`AppError`]
///
/// Holds no per-call state, so one instance can serve concurrent calls.
#[derive(Clone)]
pub struct Dispatcher {
    connectivity: Arc<dyn Connectivity>,
    transport: Arc<dyn Transport>,
    files: Arc<dyn FileReader>,
    log_mode: LogMode,
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("log_mode", &self.log_mode)
            .finish_non_exhaustive()
    }
}

impl Dispatcher {
    /// Dispatcher over `transport` that assumes the network is reachable
    /// and reads attachments from the local filesystem
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            connectivity: Arc::new(AlwaysOnline),
            transport,
            files: Arc::new(FsReader),
            log_mode: LogMode::from_build(),
        }
    }

    /// Build the production dispatcher described by `config`
    ///
    /// # Errors
    ///
    /// Returns an `HttpError` if the HTTP client cannot be built
    pub fn from_config(config: &Config) -> Result<Self> {
        let transport = HttpTransport::new(&config.http)?;

        let connectivity: Arc<dyn Connectivity> = if config.connectivity.enabled {
            Arc::new(TcpProbe::from_config(&config.connectivity))
        } else {
            Arc::new(AlwaysOnline)
        };

        Ok(Self::new(Arc::new(transport))
            .with_connectivity(connectivity)
            .with_log_mode(config.logging.mode))
    }

    #[must_use]
    pub fn with_connectivity(mut self, connectivity: Arc<dyn Connectivity>) -> Self {
        self.connectivity = connectivity;
        self
    }

    #[must_use]
    pub fn with_file_reader(mut self, files: Arc<dyn FileReader>) -> Self {
        self.files = files;
        self
    }

    #[must_use]
    pub fn with_log_mode(mut self, log_mode: LogMode) -> Self {
        self.log_mode = log_mode;
        self
    }

    /// Perform the call described by `descriptor`
    ///
    /// Makes exactly one attempt. Files that fail to read are skipped and
    /// reported through [`Response::failed_files`].
    ///
    /// # Errors
    ///
    /// - `NoInternet` when the connectivity check fails or the connection
    ///   cannot be established
    /// - `Timeout` when the call outlives `timeout_seconds`
    /// - `HttpError` or `FormatError` for transport and decoding failures
    /// - any `AppError` raised by a collaborator, unchanged
    pub async fn execute(&self, descriptor: &RequestDescriptor) -> Result<Response> {
        self.log_request(descriptor);

        if !self.connectivity.is_online().await {
            return Err(AppError::no_internet(None));
        }

        let deadline = Duration::from_secs(descriptor.timeout_seconds);
        let call = async {
            if descriptor.is_multipart() {
                self.multipart_call(descriptor).await
            } else {
                self.single_part_call(descriptor).await
            }
        };

        let response = tokio::time::timeout(deadline, call)
            .await
            .map_err(|_| AppError::timeout())??;

        self.log_response(descriptor, &response);

        Ok(response)
    }

    async fn single_part_call(&self, descriptor: &RequestDescriptor) -> Result<Response> {
        let body = match &descriptor.parameters {
            Some(parameters) if descriptor.method.carries_body() => {
                let json = serde_json::to_string(parameters).map_err(|e| AppError::format(Some(e.to_string())))?;
                Body::Json(json)
            }
            _ => Body::Empty,
        };

        let request = TransportRequest {
            method: descriptor.method,
            url: descriptor.url.clone(),
            headers: descriptor.headers.clone().unwrap_or_default(),
            body,
        };

        let response = self.transport.send(request).await?;
        Ok(Response::new(response, Vec::new()))
    }

    async fn multipart_call(&self, descriptor: &RequestDescriptor) -> Result<Response> {
        let fields = descriptor
            .parameters
            .as_ref()
            .map(form_fields)
            .unwrap_or_default();

        let (files, failed_files) = self.read_files(descriptor).await;

        if !failed_files.is_empty() {
            tracing::warn!(
                service = %descriptor.service_name,
                failed = failed_files.len(),
                attached = files.len(),
                "sending multipart request without unreadable files"
            );
        }

        let request = TransportRequest {
            method: descriptor.method,
            url: descriptor.url.clone(),
            headers: descriptor.headers.clone().unwrap_or_default(),
            body: Body::Multipart(MultipartForm { fields, files }),
        };

        let response = self.transport.send(request).await?;
        Ok(Response::new(response, failed_files))
    }

    /// Read every attachment concurrently, isolating per-file failures
    async fn read_files(&self, descriptor: &RequestDescriptor) -> (Vec<FilePart>, Vec<FailedFile>) {
        let reads = descriptor.files.iter().flat_map(move |group| {
            group.file_paths.iter().map(move |path| async move {
                match self.files.read(Path::new(path)).await {
                    Ok(file) => Ok(FilePart {
                        field_key: group.field_key.clone(),
                        file,
                    }),
                    Err(e) => {
                        tracing::warn!(
                            service = %descriptor.service_name,
                            field = %group.field_key,
                            path = %path,
                            error = %e,
                            "failed to read attachment"
                        );
                        Err(FailedFile {
                            field_key: group.field_key.clone(),
                            path: path.clone(),
                            reason: e.to_string(),
                        })
                    }
                }
            })
        });

        let mut files = Vec::new();
        let mut failed = Vec::new();

        for outcome in join_all(reads).await {
            match outcome {
                Ok(part) => files.push(part),
                Err(failure) => failed.push(failure),
            }
        }

        (files, failed)
    }

    fn log_request(&self, descriptor: &RequestDescriptor) {
        if !self.log_mode.is_debug() {
            return;
        }

        tracing::info!(
            service = %descriptor.service_name,
            method = %descriptor.method,
            url = %descriptor.url,
            multipart = descriptor.is_multipart(),
            parameters = ?descriptor.parameters,
            "dispatching request"
        );
    }

    fn log_response(&self, descriptor: &RequestDescriptor, response: &Response) {
        if !self.log_mode.is_debug() || response.status() < 300 {
            return;
        }

        tracing::warn!(
            service = %descriptor.service_name,
            status = response.status(),
            body = %response.text(),
            "request returned unsuccessful status"
        );
    }
}

/// Scalar parameters as multipart text fields
///
/// Strings are sent verbatim, numbers and booleans as their JSON text.
/// Nulls are dropped; arrays and objects are sent as JSON text.
fn form_fields(parameters: &Map<String, Value>) -> Vec<(String, String)> {
    parameters
        .iter()
        .filter_map(|(key, value)| {
            let text = match value {
                Value::Null => return None,
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            Some((key.clone(), text))
        })
        .collect()
}
