//! Freight Dispatch Engine Library
//! # Overview
//!
//! This library matches freight shipments to carriers, scores the candidates,
//! negotiates a rate and books the winner through a simulated payment gateway.
//! Shipments are read from CSV and dispatched either sequentially or in
//! concurrent batches.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (Carrier, Shipment, DispatchOutcome, DispatchError)
//! - [`cli`] - CLI arguments parsing
//! - [`core`] - Business logic components:
//!   - [`core::registry`] - Thread-safe carrier registry
//!   - [`core::matching`] - Equipment, coverage and auto-booking filter
//!   - [`core::scoring`] - Candidate scoring and selection
//!   - [`core::negotiation`] - Final rate negotiation
//!   - [`core::transaction`] - Simulated payment gateway
//!   - [`core::engine`] - Dispatch orchestration
//! - [`io`] - CSV input and report output
//! - [`strategy`] - Sequential and concurrent batch processing pipelines
//!
//! # Dispatch Outcomes
//!
//! Every shipment produces exactly one outcome. A successful outcome names the
//! booked carrier, the final rate and the booking and transaction ids. A failed
//! outcome carries one of these reasons:
//!
//! - **invalid shipment data**: a required field is missing or out of range
//! - **no suitable carriers found**: no carrier matched equipment, coverage and auto-booking
//! - **carrier booking failed**: the selected carrier declined
//! - **transaction processing failed**: the payment was declined
//! - **internal dispatch service error**: an unexpected fault inside the engine

pub mod cli;
pub mod core;
pub mod io;
pub mod strategy;
pub mod types;

pub use core::{CarrierRegistry, DispatchConfig, DispatchEngine, RandomSource, SeededRandom};
pub use io::{write_report_csv, write_report_json, DispatchReport};
pub use types::{
    Carrier, CarrierId, DispatchError, DispatchOutcome, DispatchStage, Shipment, ShipmentId,
};
