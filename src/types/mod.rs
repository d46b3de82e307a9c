//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `carrier`: Carrier records and registry inputs
//! - `shipment`: Shipment requests and their validation
//! - `outcome`: Dispatch outcomes and stages
//! - `error`: Error types for the dispatch engine

pub mod carrier;
pub mod error;
pub mod outcome;
pub mod shipment;

pub use carrier::{Carrier, CarrierId, CarrierUpdate, NewCarrier, MAX_RATING};
pub use error::DispatchError;
pub use outcome::{DispatchOutcome, DispatchStage};
pub use shipment::{Shipment, ShipmentId};
