//! Persisted entity records.
//!
//! # Responsibility
//! - Define the record shapes stored in each collection.
//! - Keep field names identical to the persisted document layout.
//!
//! # Invariants
//! - Every record is keyed in its collection by its own id field.
//! - Hotels satisfy `available_rooms + reservation_ids.len() == total_rooms`
//!   after every committed operation.

pub mod customer;
pub mod hotel;
pub mod reservation;
