//! Reservation record and status lifecycle.
//!
//! # Invariants
//! - Status only moves `active -> cancelled`; there is no way back.
//! - `customer_id` and `hotel_id` are references, never owned records.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Lifecycle state of a reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    /// Holds a room at its hotel.
    #[default]
    Active,
    /// Terminal. The room hold has been given up.
    Cancelled,
}

impl ReservationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Cancelled => "cancelled",
        }
    }
}

impl Display for ReservationStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Booking of one room at one hotel for one customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    pub reservation_id: String,
    pub customer_id: String,
    pub hotel_id: String,
    /// Opaque date text, never parsed.
    pub check_in: String,
    /// Opaque date text, never parsed.
    pub check_out: String,
    /// Documents written without a status load as active.
    #[serde(default)]
    pub status: ReservationStatus,
}

impl Reservation {
    /// Creates an active reservation.
    pub fn new(
        reservation_id: impl Into<String>,
        customer_id: impl Into<String>,
        hotel_id: impl Into<String>,
        check_in: impl Into<String>,
        check_out: impl Into<String>,
    ) -> Self {
        Self {
            reservation_id: reservation_id.into(),
            customer_id: customer_id.into(),
            hotel_id: hotel_id.into(),
            check_in: check_in.into(),
            check_out: check_out.into(),
            status: ReservationStatus::Active,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == ReservationStatus::Active
    }

    /// Moves the reservation to `cancelled`.
    ///
    /// Returns `false` when it was already cancelled.
    pub fn cancel(&mut self) -> bool {
        if !self.is_active() {
            return false;
        }
        self.status = ReservationStatus::Cancelled;
        true
    }
}
