//! Error taxonomy for ingestion and polling.
//!
//! Each error that can reach the UI collaborator maps to a stable [`ErrorCode`].
//! `DownloadOrParse` collapses fetch and parse failures into one user-facing
//! code while keeping the cause around for logs.

use std::fmt;

use thiserror::Error;

use crate::model::ErrorCode;

#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("url is required")]
    EmptyUrl,
    #[error("invalid url format")]
    MalformedUrl,
    #[error("url is already tracked")]
    DuplicateUrl,
}

impl ValidationError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ValidationError::EmptyUrl => ErrorCode::UrlIsRequired,
            ValidationError::MalformedUrl => ErrorCode::InvalidUrlFormat,
            ValidationError::DuplicateUrl => ErrorCode::UrlIsDuplicate,
        }
    }
}

/// Every validation failure found for one candidate. Never empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    pub(crate) fn from_vec(errors: Vec<ValidationError>) -> Option<Self> {
        if errors.is_empty() { None } else { Some(ValidationErrors(errors)) }
    }

    pub fn single(err: ValidationError) -> Self { ValidationErrors(vec![err]) }

    pub fn errors(&self) -> &[ValidationError] { &self.0 }

    #[cfg(test)]
    pub fn contains(&self, err: &ValidationError) -> bool { self.0.contains(err) }

    pub fn codes(&self) -> Vec<ErrorCode> { self.0.iter().map(ValidationError::code).collect() }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|e| e.to_string()).collect();
        f.write_str(&parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Transport-level failures. Only `Network` counts as a connectivity problem.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),
    #[error("proxy responded with HTTP {0}")]
    Status(u16),
    #[error("upstream responded with HTTP {0}")]
    UpstreamStatus(u16),
    #[error("unreadable proxy response: {0}")]
    Body(String),
    #[error("proxy response has no contents")]
    MissingContents,
}

impl FetchError {
    pub fn is_network(&self) -> bool { matches!(self, FetchError::Network(_)) }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_connect() || e.is_timeout() || e.is_request() {
            FetchError::Network(e.to_string())
        } else if let Some(status) = e.status() {
            FetchError::Status(status.as_u16())
        } else {
            FetchError::Body(e.to_string())
        }
    }
}

#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum ParseError {
    #[error("malformed XML: {0}")]
    Malformed(String),
    #[error("document is not an RSS feed")]
    NotRss,
    #[error("missing required element <{0}>")]
    MissingField(&'static str),
}

/// Cause behind a `urlDownloadError`.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum DownloadError {
    #[error(transparent)]
    Fetch(FetchError),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Outcome of a failed user-initiated ingestion; stored as `last_error`.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum OperationError {
    #[error("{0}")]
    Validation(#[from] ValidationErrors),
    #[error(transparent)]
    Network(FetchError),
    #[error(transparent)]
    DownloadOrParse(#[from] DownloadError),
}

impl OperationError {
    /// Primary code for single-message UIs.
    pub fn code(&self) -> ErrorCode {
        match self {
            OperationError::Validation(errs) => errs.errors()[0].code(),
            OperationError::Network(_) => ErrorCode::NetworkError,
            OperationError::DownloadOrParse(_) => ErrorCode::UrlDownloadError,
        }
    }

    pub fn codes(&self) -> Vec<ErrorCode> {
        match self {
            OperationError::Validation(errs) => errs.codes(),
            other => vec![other.code()],
        }
    }
}

impl From<FetchError> for OperationError {
    fn from(e: FetchError) -> Self {
        if e.is_network() { OperationError::Network(e) } else { OperationError::DownloadOrParse(DownloadError::Fetch(e)) }
    }
}

impl From<ParseError> for OperationError {
    fn from(e: ParseError) -> Self { OperationError::DownloadOrParse(DownloadError::Parse(e)) }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PollError {
    #[error("polling loop is already running")]
    AlreadyRunning,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid proxy endpoint {0:?}: {1}")]
    ProxyEndpoint(String, url::ParseError),
    #[error("invalid value {value:?} for {key}")]
    Number { key: &'static str, value: String },
}
