//! Hotel record and room-availability bookkeeping.
//!
//! # Responsibility
//! - Define the persisted hotel shape.
//! - Provide the only mutations that touch room counts, so repository code
//!   cannot move `available_rooms` without touching `reservation_ids`.
//!
//! # Invariants
//! - `available_rooms + reservation_ids.len() == total_rooms` is preserved by
//!   every helper here when it held beforehand.
//! - `available_rooms` never goes below zero.

use serde::{Deserialize, Serialize};

/// Hotel with a fixed room count and the reservations currently holding rooms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StoredHotel")]
pub struct Hotel {
    pub hotel_id: String,
    pub name: String,
    pub location: String,
    pub total_rooms: u32,
    pub available_rooms: u32,
    /// Serialized as `reservations`. Order of booking; duplicates possible.
    #[serde(rename = "reservations")]
    pub reservation_ids: Vec<String>,
}

/// Load-side shape tolerating documents written without the derived fields.
#[derive(Deserialize)]
struct StoredHotel {
    hotel_id: String,
    name: String,
    location: String,
    total_rooms: u32,
    #[serde(default)]
    available_rooms: Option<u32>,
    #[serde(default)]
    reservations: Vec<String>,
}

impl From<StoredHotel> for Hotel {
    fn from(stored: StoredHotel) -> Self {
        Self {
            available_rooms: stored.available_rooms.unwrap_or(stored.total_rooms),
            hotel_id: stored.hotel_id,
            name: stored.name,
            location: stored.location,
            total_rooms: stored.total_rooms,
            reservation_ids: stored.reservations,
        }
    }
}

/// Returned by [`Hotel::resize`] when held rooms exceed the requested total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoomsInUse {
    pub requested: u32,
    pub held: usize,
}

impl Hotel {
    /// Creates a hotel with every room available and no reservations.
    pub fn new(
        hotel_id: impl Into<String>,
        name: impl Into<String>,
        location: impl Into<String>,
        total_rooms: u32,
    ) -> Self {
        Self {
            hotel_id: hotel_id.into(),
            name: name.into(),
            location: location.into(),
            total_rooms,
            available_rooms: total_rooms,
            reservation_ids: Vec::new(),
        }
    }

    /// Number of rooms held by linked reservations.
    pub fn held_rooms(&self) -> usize {
        self.reservation_ids.len()
    }

    /// Whether the availability counter agrees with the linked reservations.
    pub fn is_consistent(&self) -> bool {
        u64::from(self.available_rooms) + self.held_rooms() as u64 == u64::from(self.total_rooms)
    }

    pub fn has_vacancy(&self) -> bool {
        self.available_rooms > 0
    }

    /// Takes one room for `reservation_id`.
    ///
    /// Returns `false` without mutating when no room is available. The same
    /// id may be linked more than once.
    pub fn take_room(&mut self, reservation_id: impl Into<String>) -> bool {
        if !self.has_vacancy() {
            return false;
        }
        self.available_rooms -= 1;
        self.reservation_ids.push(reservation_id.into());
        true
    }

    /// Releases the first room held by `reservation_id`.
    ///
    /// Returns `false` without mutating when the id is not linked.
    pub fn release_room(&mut self, reservation_id: &str) -> bool {
        let Some(index) = self
            .reservation_ids
            .iter()
            .position(|linked| linked == reservation_id)
        else {
            return false;
        };
        self.reservation_ids.remove(index);
        self.available_rooms = self.available_rooms.saturating_add(1);
        true
    }

    /// Changes the room count and recomputes availability from held rooms.
    pub fn resize(&mut self, total_rooms: u32) -> Result<(), RoomsInUse> {
        let held = self.held_rooms();
        let Some(available) = usize::try_from(total_rooms)
            .ok()
            .and_then(|total| total.checked_sub(held))
        else {
            return Err(RoomsInUse {
                requested: total_rooms,
                held,
            });
        };
        self.total_rooms = total_rooms;
        // `available <= total_rooms`, so it fits in u32.
        self.available_rooms = u32::try_from(available).unwrap_or(total_rooms);
        Ok(())
    }
}
