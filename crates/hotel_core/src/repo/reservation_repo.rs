//! Reservation repository.
//!
//! # Responsibility
//! - Create, read and cancel reservations.
//! - Drive the hotel repository so room counts follow reservation state.
//!
//! # Invariants
//! - A reservation is written only after its hotel room was taken; if
//!   `reserve_room` fails nothing is written and the same error is returned.
//! - `cancel` always flips an active reservation to cancelled, even when
//!   giving the room back fails (that failure is only logged).
//! - Hotel and reservation commits are separate; there is no rollback
//!   between them.
//! - Reservations are never deleted.

use crate::model::reservation::Reservation;
use crate::repo::hotel_repo::HotelRepository;
use crate::repo::{rejected, EntityKind, RepoError, RepoResult};
use crate::storage::{Collection, RecordStore};
use log::{debug, warn};

/// Collection key for reservation records.
pub const RESERVATIONS_KEY: &str = "reservations";

const KIND: EntityKind = EntityKind::Reservation;

/// Reservation lifecycle orchestrated against a hotel repository.
#[derive(Debug, Clone)]
pub struct ReservationRepository<S: RecordStore> {
    store: S,
    hotels: HotelRepository<S>,
}

impl<S: RecordStore + Clone> ReservationRepository<S> {
    /// Builds the repository and its hotel collaborator over one store.
    pub fn new(store: S) -> Self {
        Self::with_hotels(store.clone(), HotelRepository::new(store))
    }
}

impl<S: RecordStore> ReservationRepository<S> {
    pub fn with_hotels(store: S, hotels: HotelRepository<S>) -> Self {
        Self { store, hotels }
    }

    /// Hotel repository used for room bookkeeping.
    pub fn hotels(&self) -> &HotelRepository<S> {
        &self.hotels
    }

    /// Takes a room at `hotel_id` and records an active reservation.
    ///
    /// `customer_id` is stored as given; customer existence is not checked.
    ///
    /// # Errors
    /// - `AlreadyExists` when `reservation_id` is taken.
    /// - `NotFound` / `NoAvailability` from the hotel; no reservation is
    ///   written in that case.
    pub fn create(
        &self,
        reservation_id: impl Into<String>,
        customer_id: impl Into<String>,
        hotel_id: impl Into<String>,
        check_in: impl Into<String>,
        check_out: impl Into<String>,
    ) -> RepoResult<Reservation> {
        let reservation =
            Reservation::new(reservation_id, customer_id, hotel_id, check_in, check_out);
        let id = reservation.reservation_id.as_str();

        let mut reservations = self.load();
        if reservations.contains_key(id) {
            return Err(rejected(
                "reservation_create",
                RepoError::already_exists(KIND, id),
            ));
        }

        // Error was already logged by the hotel repository.
        self.hotels.reserve_room(&reservation.hotel_id, id)?;

        reservations.insert(id.to_string(), reservation.clone());
        self.store.save(RESERVATIONS_KEY, &reservations);
        debug!(
            "event=reservation_create module=repo status=ok reservation_id={id} hotel_id={} customer_id={} reservation_status={}",
            reservation.hotel_id, reservation.customer_id, reservation.status
        );
        Ok(reservation)
    }

    pub fn get(&self, reservation_id: &str) -> RepoResult<Reservation> {
        self.load().remove(reservation_id).ok_or_else(|| {
            rejected(
                "reservation_get",
                RepoError::not_found(KIND, reservation_id),
            )
        })
    }

    /// Cancels an active reservation and gives its room back.
    ///
    /// # Errors
    /// - `NotFound` when the reservation does not exist.
    /// - `AlreadyCancelled` when it is already cancelled; the hotel is not
    ///   touched again.
    pub fn cancel(&self, reservation_id: &str) -> RepoResult<Reservation> {
        let mut reservations = self.load();
        let Some(reservation) = reservations.get_mut(reservation_id) else {
            return Err(rejected(
                "reservation_cancel",
                RepoError::not_found(KIND, reservation_id),
            ));
        };
        // Flipped in memory only; persisted by the save below.
        if !reservation.cancel() {
            return Err(rejected(
                "reservation_cancel",
                RepoError::AlreadyCancelled(reservation_id.to_string()),
            ));
        }

        if let Err(err) = self
            .hotels
            .cancel_room(&reservation.hotel_id, reservation_id)
        {
            warn!(
                "event=reservation_cancel module=repo status=degraded reservation_id={reservation_id} hotel_id={} error_code={} error={err}",
                reservation.hotel_id,
                err.code()
            );
        }

        let cancelled = reservation.clone();
        self.store.save(RESERVATIONS_KEY, &reservations);
        debug!(
            "event=reservation_cancel module=repo status=ok reservation_id={reservation_id} reservation_status={}",
            cancelled.status
        );
        Ok(cancelled)
    }

    fn load(&self) -> Collection<Reservation> {
        self.store.load(RESERVATIONS_KEY)
    }
}
