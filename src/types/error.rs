//! Error types for the Freight Dispatch Engine
//!
//! This module defines all error types that can occur while dispatching a
//! shipment or while loading shipments and carriers from disk.
//!
//! # Error Categories
//!
//! - **Dispatch Errors**: Invalid shipment, no match, booking rejected, transaction failed
//! - **Internal Errors**: Unexpected failures inside a dispatch stage
//! - **I/O Errors**: File not found, permission denied, malformed CSV, etc.
//!
//! Dispatch errors never escape `DispatchEngine::dispatch`; they are turned into a
//! failed `DispatchOutcome` carrying the error's [`DispatchError::reason`].

use thiserror::Error;

/// Outcome reason for a shipment that failed validation
pub const REASON_INVALID_SHIPMENT: &str = "invalid shipment data";
/// Outcome reason when no carrier passes the matching filter
pub const REASON_NO_CARRIERS: &str = "no suitable carriers found";
/// Outcome reason when the selected carrier declines the booking
pub const REASON_BOOKING_FAILED: &str = "carrier booking failed";
/// Outcome reason when the simulated payment fails
pub const REASON_TRANSACTION_FAILED: &str = "transaction processing failed";
/// Outcome reason for anything unexpected
pub const REASON_INTERNAL: &str = "internal dispatch service error";

/// Main error type for the dispatch engine
///
/// Each variant includes relevant context to help diagnose the failure. All
/// dispatch variants are terminal for the attempt that produced them; nothing is
/// retried internally.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DispatchError {
    /// A shipment or carrier is missing a required field or holds an invalid value
    #[error("Invalid {field}: {message}")]
    InvalidInput {
        /// Name of the offending field
        field: String,
        /// Description of the problem
        message: String,
    },

    /// No carrier in the registry is compatible with the shipment
    #[error("No suitable carriers for shipment {shipment_id}")]
    NoMatch {
        /// The shipment that could not be matched
        shipment_id: String,
    },

    /// The selected carrier declined the booking
    #[error("Carrier {carrier_id} rejected the booking")]
    BookingRejected {
        /// The carrier that declined
        carrier_id: String,
    },

    /// The simulated payment gateway declined the transaction
    #[error("Transaction failed: {reason}")]
    TransactionFailed {
        /// Reason reported by the gateway
        reason: String,
    },

    /// Unexpected failure inside a dispatch stage
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the failure
        message: String,
    },

    /// Carrier id already present in the registry
    #[error("Duplicate carrier id {id}")]
    DuplicateCarrier {
        /// The duplicated id
        id: String,
    },

    /// I/O error occurred while reading or writing files
    #[error("I/O error: {message}")]
    Io {
        /// Description of the I/O error
        message: String,
    },

    /// CSV parsing error occurred
    ///
    /// This is a recoverable error - the malformed record is skipped
    /// and processing continues with the next record.
    #[error("CSV parse error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    Parse {
        /// Line number where the error occurred (if available)
        line: Option<u64>,
        /// Description of the parsing error
        message: String,
    },
}

impl From<std::io::Error> for DispatchError {
    fn from(error: std::io::Error) -> Self {
        DispatchError::Io {
            message: error.to_string(),
        }
    }
}

impl From<csv::Error> for DispatchError {
    fn from(error: csv::Error) -> Self {
        let line = error.position().map(|pos| pos.line());

        DispatchError::Parse {
            line,
            message: error.to_string(),
        }
    }
}

impl DispatchError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: &str, message: impl Into<String>) -> Self {
        DispatchError::InvalidInput {
            field: field.to_string(),
            message: message.into(),
        }
    }

    /// Create a NoMatch error
    pub fn no_match(shipment_id: &str) -> Self {
        DispatchError::NoMatch {
            shipment_id: shipment_id.to_string(),
        }
    }

    /// Create a BookingRejected error
    pub fn booking_rejected(carrier_id: &str) -> Self {
        DispatchError::BookingRejected {
            carrier_id: carrier_id.to_string(),
        }
    }

    /// Create a TransactionFailed error
    pub fn transaction_failed(reason: impl Into<String>) -> Self {
        DispatchError::TransactionFailed {
            reason: reason.into(),
        }
    }

    /// Create an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        DispatchError::Internal {
            message: message.into(),
        }
    }

    /// The `error_reason` reported on a failed `DispatchOutcome`
    ///
    /// Registry and I/O variants never come out of a dispatch pass, so they map
    /// to the generic internal reason.
    pub fn reason(&self) -> &'static str {
        match self {
            DispatchError::InvalidInput { .. } => REASON_INVALID_SHIPMENT,
            DispatchError::NoMatch { .. } => REASON_NO_CARRIERS,
            DispatchError::BookingRejected { .. } => REASON_BOOKING_FAILED,
            DispatchError::TransactionFailed { .. } => REASON_TRANSACTION_FAILED,
            DispatchError::Internal { .. }
            | DispatchError::DuplicateCarrier { .. }
            | DispatchError::Io { .. }
            | DispatchError::Parse { .. } => REASON_INTERNAL,
        }
    }

    /// Short machine-readable kind, used for stats and log fields
    pub fn kind(&self) -> &'static str {
        match self {
            DispatchError::InvalidInput { .. } => "invalid_input",
            DispatchError::NoMatch { .. } => "no_match",
            DispatchError::BookingRejected { .. } => "booking_rejected",
            DispatchError::TransactionFailed { .. } => "transaction_failed",
            DispatchError::Internal { .. } => "internal",
            DispatchError::DuplicateCarrier { .. } => "duplicate_carrier",
            DispatchError::Io { .. } => "io",
            DispatchError::Parse { .. } => "parse",
        }
    }
}
