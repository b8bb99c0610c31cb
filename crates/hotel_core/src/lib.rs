//! Persistence and consistency core for the hotel reservation record store.
//! This crate is the single source of truth for the room-availability rule.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod storage;

pub use config::{StorageBackend, StorageConfig, UnknownBackend};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::customer::Customer;
pub use model::hotel::{Hotel, RoomsInUse};
pub use model::reservation::{Reservation, ReservationStatus};
pub use repo::customer_repo::{CustomerRepository, CUSTOMERS_KEY};
pub use repo::hotel_repo::{HotelRepository, HOTELS_KEY};
pub use repo::reservation_repo::{ReservationRepository, RESERVATIONS_KEY};
pub use repo::{EntityKind, FieldUpdate, RepoError, RepoResult};
pub use storage::{
    Collection, JsonFileStore, RecordStore, SqliteRecordStore, StorageError, StorageResult,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
