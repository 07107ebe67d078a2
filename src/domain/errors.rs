//! Domain error types
//!
//! This module defines the error hierarchy for titlesync.
//! All errors are domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main titlesync error type
///
/// This is the primary error type used throughout the application.
/// It wraps specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum TitleSyncError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Warehouse (source) errors
    #[error("Warehouse error: {0}")]
    Warehouse(#[from] WarehouseError),

    /// Target sink errors
    #[error("Sink error: {0}")]
    Sink(#[from] SinkError),

    /// Geometry coercion errors
    #[error("Geometry error: {0}")]
    Geometry(#[from] GeometryError),

    /// A field required by the target row is absent from the record
    #[error("Missing field '{field}' for record {record_id}")]
    MissingField {
        record_id: String,
        field: &'static str,
    },

    /// Network/connection errors
    #[error("Connection error: {0}")]
    Connection(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

impl TitleSyncError {
    /// Stable diagnostic code for operator-facing reports
    ///
    /// Sink statement failures carry the server's SQLSTATE when one was
    /// supplied; everything else maps to a category name.
    pub fn code(&self) -> String {
        match self {
            TitleSyncError::Configuration(_) => "CONFIGURATION".to_string(),
            TitleSyncError::Warehouse(_) => "WAREHOUSE".to_string(),
            TitleSyncError::Sink(e) => e.code(),
            TitleSyncError::Geometry(_) => "GEOMETRY".to_string(),
            TitleSyncError::MissingField { .. } => "MISSING_FIELD".to_string(),
            TitleSyncError::Connection(_) => "CONNECTION".to_string(),
            TitleSyncError::Validation(_) => "VALIDATION".to_string(),
            TitleSyncError::Serialization(_) => "SERIALIZATION".to_string(),
            TitleSyncError::Io(_) => "IO".to_string(),
            TitleSyncError::Other(_) => "UNKNOWN".to_string(),
        }
    }
}

/// Warehouse-specific errors
///
/// Errors that occur while extracting records from the analytical warehouse.
/// These errors don't expose third-party HTTP client types.
#[derive(Debug, Error)]
pub enum WarehouseError {
    /// Failed to connect to the warehouse
    #[error("Failed to connect to warehouse: {0}")]
    ConnectionFailed(String),

    /// Authentication failed
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Statement was rejected or failed during execution
    #[error("Statement failed: {code} - {message}")]
    StatementFailed { code: String, message: String },

    /// Statement did not complete in time
    #[error("Statement timeout: {0}")]
    Timeout(String),

    /// Invalid response from server
    #[error("Invalid response from warehouse: {0}")]
    InvalidResponse(String),

    /// A row could not be decoded into a source record
    #[error("Invalid row {row}: {message}")]
    InvalidRow { row: usize, message: String },
}

/// Target sink errors
///
/// Errors raised by the relational store that receives the records.
#[derive(Debug, Error)]
pub enum SinkError {
    /// Failed to establish the connection
    #[error("Failed to connect to target database: {0}")]
    ConnectionFailed(String),

    /// A statement failed
    #[error("Statement failed{}: {message}", .sqlstate.as_deref().map(|c| format!(" ({c})")).unwrap_or_default())]
    StatementFailed {
        sqlstate: Option<String>,
        message: String,
    },

    /// Transaction control (BEGIN/COMMIT/ROLLBACK) failed
    #[error("Transaction {operation} failed: {message}")]
    TransactionFailed {
        operation: &'static str,
        message: String,
    },

    /// The sink was used after it was closed
    #[error("Sink is closed")]
    Closed,
}

impl SinkError {
    /// SQLSTATE if available, otherwise a category name
    pub fn code(&self) -> String {
        match self {
            SinkError::ConnectionFailed(_) => "CONNECTION".to_string(),
            SinkError::StatementFailed {
                sqlstate: Some(code),
                ..
            } => code.clone(),
            SinkError::StatementFailed { sqlstate: None, .. } => "SINK".to_string(),
            SinkError::TransactionFailed { .. } => "TRANSACTION".to_string(),
            SinkError::Closed => "SINK_CLOSED".to_string(),
        }
    }
}

/// Geometry coercion errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    /// Text could not be parsed in any supported encoding
    #[error("Unrecognized {kind} encoding: {input}")]
    Unrecognized { kind: &'static str, input: String },

    /// A coordinate was not a finite number
    #[error("Invalid coordinate '{0}'")]
    InvalidCoordinate(String),

    /// Polygon ring has too few distinct vertices
    #[error("Polygon ring needs at least 3 distinct vertices, got {0}")]
    TooFewVertices(usize),
}

// Conversion from std::io::Error
impl From<std::io::Error> for TitleSyncError {
    fn from(err: std::io::Error) -> Self {
        TitleSyncError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for TitleSyncError {
    fn from(err: serde_json::Error) -> Self {
        TitleSyncError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for TitleSyncError {
    fn from(err: toml::de::Error) -> Self {
        TitleSyncError::Configuration(format!("TOML parse error: {err}"))
    }
}
