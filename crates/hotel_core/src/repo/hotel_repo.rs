//! Hotel repository and room-availability operations.
//!
//! # Responsibility
//! - CRUD over the `hotels` collection.
//! - `reserve_room` / `cancel_room`, the only writers of room counts.
//!
//! # Invariants
//! - A committed hotel satisfies
//!   `available_rooms + reservation_ids.len() == total_rooms`.
//! - `reserve_room` is not idempotent: booking the same reservation id twice
//!   links it twice and takes two rooms.
//! - This module never depends on reservation records.

use crate::model::hotel::Hotel;
use crate::repo::{
    count_value, rejected, text_value, warn_skipped_field, EntityKind, FieldUpdate, RepoError,
    RepoResult, SkipReason,
};
use crate::storage::{Collection, RecordStore};
use log::{debug, warn};

/// Collection key for hotel records.
pub const HOTELS_KEY: &str = "hotels";

const KIND: EntityKind = EntityKind::Hotel;

/// Hotel CRUD and room bookkeeping backed by any record store.
#[derive(Debug, Clone)]
pub struct HotelRepository<S: RecordStore> {
    store: S,
}

impl<S: RecordStore> HotelRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Persists a new hotel with every room available.
    ///
    /// # Errors
    /// - `AlreadyExists` when `hotel_id` is taken.
    pub fn create(
        &self,
        hotel_id: impl Into<String>,
        name: impl Into<String>,
        location: impl Into<String>,
        total_rooms: u32,
    ) -> RepoResult<Hotel> {
        let hotel = Hotel::new(hotel_id, name, location, total_rooms);
        let mut hotels = self.load();
        if hotels.contains_key(&hotel.hotel_id) {
            return Err(rejected(
                "hotel_create",
                RepoError::already_exists(KIND, &hotel.hotel_id),
            ));
        }

        hotels.insert(hotel.hotel_id.clone(), hotel.clone());
        self.store.save(HOTELS_KEY, &hotels);
        debug!(
            "event=hotel_create module=repo status=ok hotel_id={} total_rooms={}",
            hotel.hotel_id, hotel.total_rooms
        );
        Ok(hotel)
    }

    /// Removes a hotel. Linked reservations are not cascaded.
    pub fn delete(&self, hotel_id: &str) -> RepoResult<()> {
        let mut hotels = self.load();
        let Some(removed) = hotels.remove(hotel_id) else {
            return Err(rejected("hotel_delete", RepoError::not_found(KIND, hotel_id)));
        };

        self.store.save(HOTELS_KEY, &hotels);
        debug!(
            "event=hotel_delete module=repo status=ok hotel_id={hotel_id} linked_reservations={}",
            removed.held_rooms()
        );
        Ok(())
    }

    pub fn get(&self, hotel_id: &str) -> RepoResult<Hotel> {
        self.load()
            .remove(hotel_id)
            .ok_or_else(|| rejected("hotel_get", RepoError::not_found(KIND, hotel_id)))
    }

    /// Applies editable field changes (`name`, `location`, `total_rooms`).
    ///
    /// A new `total_rooms` recomputes `available_rooms` from the linked
    /// reservations. Unknown fields, unusable values and totals below the
    /// number of held rooms are skipped with a warning; the update still
    /// succeeds.
    pub fn update<'a, I>(&self, hotel_id: &str, fields: I) -> RepoResult<Hotel>
    where
        I: IntoIterator<Item = FieldUpdate<'a>>,
    {
        let mut hotels = self.load();
        let Some(hotel) = hotels.get_mut(hotel_id) else {
            return Err(rejected("hotel_update", RepoError::not_found(KIND, hotel_id)));
        };

        for (field, value) in fields {
            match field {
                "name" | "location" => {
                    let Some(text) = text_value(&value) else {
                        warn_skipped_field(KIND, hotel_id, field, SkipReason::InvalidValue);
                        continue;
                    };
                    if field == "name" {
                        hotel.name = text;
                    } else {
                        hotel.location = text;
                    }
                }
                "total_rooms" => {
                    let Some(total_rooms) = count_value(&value) else {
                        warn_skipped_field(KIND, hotel_id, field, SkipReason::InvalidValue);
                        continue;
                    };
                    if hotel.resize(total_rooms).is_err() {
                        warn_skipped_field(KIND, hotel_id, field, SkipReason::RoomsInUse);
                    }
                }
                _ => warn_skipped_field(KIND, hotel_id, field, SkipReason::UnknownField),
            }
        }

        let updated = hotel.clone();
        self.store.save(HOTELS_KEY, &hotels);
        debug!("event=hotel_update module=repo status=ok hotel_id={hotel_id}");
        Ok(updated)
    }

    /// Takes one room at `hotel_id` for `reservation_id`.
    ///
    /// # Errors
    /// - `NotFound` when the hotel does not exist.
    /// - `NoAvailability` when `available_rooms == 0`; nothing is written.
    pub fn reserve_room(&self, hotel_id: &str, reservation_id: &str) -> RepoResult<Hotel> {
        const EVENT: &str = "hotel_reserve_room";

        let mut hotels = self.load();
        let Some(hotel) = hotels.get_mut(hotel_id) else {
            return Err(rejected(EVENT, RepoError::not_found(KIND, hotel_id)));
        };
        warn_if_inconsistent(EVENT, hotel);
        if !hotel.take_room(reservation_id) {
            return Err(rejected(
                EVENT,
                RepoError::NoAvailability(hotel_id.to_string()),
            ));
        }

        let updated = hotel.clone();
        self.store.save(HOTELS_KEY, &hotels);
        debug!(
            "event={EVENT} module=repo status=ok hotel_id={hotel_id} reservation_id={reservation_id} available_rooms={}",
            updated.available_rooms
        );
        Ok(updated)
    }

    /// Gives back the room held by `reservation_id` at `hotel_id`.
    ///
    /// # Errors
    /// - `NotFound` when the hotel does not exist.
    /// - `NotLinked` when the reservation holds no room there.
    pub fn cancel_room(&self, hotel_id: &str, reservation_id: &str) -> RepoResult<Hotel> {
        const EVENT: &str = "hotel_cancel_room";

        let mut hotels = self.load();
        let Some(hotel) = hotels.get_mut(hotel_id) else {
            return Err(rejected(EVENT, RepoError::not_found(KIND, hotel_id)));
        };
        warn_if_inconsistent(EVENT, hotel);
        if !hotel.release_room(reservation_id) {
            return Err(rejected(
                EVENT,
                RepoError::NotLinked {
                    hotel_id: hotel_id.to_string(),
                    reservation_id: reservation_id.to_string(),
                },
            ));
        }

        let updated = hotel.clone();
        self.store.save(HOTELS_KEY, &hotels);
        debug!(
            "event={EVENT} module=repo status=ok hotel_id={hotel_id} reservation_id={reservation_id} available_rooms={}",
            updated.available_rooms
        );
        Ok(updated)
    }

    fn load(&self) -> Collection<Hotel> {
        self.store.load(HOTELS_KEY)
    }
}

/// External edits can break the counters; report it but keep operating.
fn warn_if_inconsistent(event: &str, hotel: &Hotel) {
    if !hotel.is_consistent() {
        warn!(
            "event={event} module=repo status=inconsistent hotel_id={} total_rooms={} available_rooms={} linked_reservations={}",
            hotel.hotel_id,
            hotel.total_rooms,
            hotel.available_rooms,
            hotel.held_rooms()
        );
    }
}
