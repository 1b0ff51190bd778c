#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

//! Client-side dispatch layer over an HTTP transport
//!
//! Issues GET/POST/PUT/DELETE and multipart upload requests behind a
//! connectivity check and a per-call deadline, and reduces every failure
//! to an [`AppError`] a caller can turn into an alert

pub mod alert;
pub mod connectivity;
mod dispatcher;
pub mod error;
pub mod files;
pub mod request;
mod response;
pub mod transport;

pub use alert::AlertInfo;
pub use connectivity::{AlwaysOnline, Connectivity, TcpProbe};
pub use dispatcher::Dispatcher;
pub use error::{AppError, ExceptionKind, Result, TransportError};
pub use files::{FileReader, FsReader, LoadedFile};
pub use request::{FileGroup, Method, RequestDescriptor};
pub use response::{FailedFile, Response};
pub use transport::{Body, FilePart, HttpTransport, MultipartForm, Transport, TransportRequest, TransportResponse};
