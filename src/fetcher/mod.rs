//! Snapshot fetcher contract and adapters.
//!
//! The engine never talks to the HR source directly. It asks a
//! [`SnapshotFetcher`] for the workforce as of a reference date; how that
//! snapshot is obtained (and retried) is the fetcher's business.
//!
//! Two adapters are provided:
//! - [`ODataSnapshotFetcher`] builds SAP OData queries with filter pushdown,
//!   obtains access from a [`CredentialProvider`], sends the request through a
//!   [`SnapshotTransport`] and decodes the response.
//! - [`InMemorySnapshotFetcher`] serves pre-loaded snapshots and filters them
//!   client-side.

mod in_memory;
mod odata;

use std::fmt;

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

use crate::error::EngineResult;
use crate::models::{EmployeeSnapshotRecord, RotationFilter};

pub use in_memory::InMemorySnapshotFetcher;
pub use odata::{
    ODataEmployeeRow, ODataRequest, ODataSnapshotFetcher, build_filter_expression,
    parse_odata_payload,
};

/// Source of employee snapshots addressed by reference date.
///
/// Implementations must honour the filter semantics of [`RotationFilter`]
/// (OR within a field, AND across fields), either by pushing the filter down
/// to the source or by filtering client-side.
#[async_trait]
pub trait SnapshotFetcher: Send + Sync {
    /// Returns the workforce as of `reference_date`, restricted by `filter`.
    async fn fetch(
        &self,
        reference_date: NaiveDate,
        filter: &RotationFilter,
    ) -> EngineResult<Vec<EmployeeSnapshotRecord>>;
}

/// Access credentials for the HR source.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// The account name.
    pub username: String,
    secret: String,
}

impl Credentials {
    /// Creates credentials from an account name and secret.
    pub fn new(username: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            secret: secret.into(),
        }
    }

    /// Returns the secret.
    pub fn secret(&self) -> &str {
        &self.secret
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Supplies valid credentials to a fetcher.
///
/// Session handling and secret storage live behind this trait.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Returns credentials for the next request.
    ///
    /// Should fail with `Unauthorized` if no usable credentials exist.
    async fn credentials(&self) -> EngineResult<Credentials>;
}

/// A provider that always hands out the same credentials.
#[derive(Debug, Clone)]
pub struct StaticCredentials(Credentials);

impl StaticCredentials {
    /// Wraps a fixed set of credentials.
    pub fn new(credentials: Credentials) -> Self {
        Self(credentials)
    }
}

#[async_trait]
impl CredentialProvider for StaticCredentials {
    async fn credentials(&self) -> EngineResult<Credentials> {
        Ok(self.0.clone())
    }
}

/// A raw HTTP answer from the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// The HTTP status code.
    pub status: u16,
    /// The response body.
    pub body: String,
}

/// Errors raised by a transport before any HTTP status is available.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The server could not be reached.
    #[error("connection error: {0}")]
    Connection(String),
    /// The server did not answer in time.
    #[error("request timed out")]
    Timeout,
}

/// Executes GET requests against the HR source.
///
/// This is the HTTP client seam: authentication headers, TLS and
/// query-string encoding are the transport's job.
#[async_trait]
pub trait SnapshotTransport: Send + Sync {
    /// Sends a GET request authenticated with `credentials`.
    async fn get(
        &self,
        request: &ODataRequest,
        credentials: &Credentials,
    ) -> Result<TransportResponse, TransportError>;
}
