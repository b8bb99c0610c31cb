//! Entity repositories over the storage gateway.
//!
//! # Responsibility
//! - Provide create/get/update/delete per entity type.
//! - Own the cross-entity room-availability rule (hotel + reservation).
//!
//! # Invariants
//! - Every operation is one load-mutate-save cycle; nothing is cached.
//! - Repository APIs return semantic errors only. Storage failures are
//!   absorbed by the gateway and never reach callers.
//! - Unknown or unusable fields in `update` are skipped with a warning and
//!   never fail the operation.

use log::{info, warn};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod customer_repo;
pub mod hotel_repo;
pub mod reservation_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// One requested field change for `update` operations: name and new value.
pub type FieldUpdate<'a> = (&'a str, Value);

/// Entity type named in repository errors and log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Hotel,
    Customer,
    Reservation,
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hotel => "hotel",
            Self::Customer => "customer",
            Self::Reservation => "reservation",
        }
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Entity-level failure returned by every repository operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoError {
    NotFound {
        kind: EntityKind,
        id: String,
    },
    AlreadyExists {
        kind: EntityKind,
        id: String,
    },
    /// Reservation is already in its terminal state.
    AlreadyCancelled(String),
    /// Hotel has no room left to hand out.
    NoAvailability(String),
    /// Reservation id is not linked to the hotel.
    NotLinked {
        hotel_id: String,
        reservation_id: String,
    },
}

impl RepoError {
    pub(crate) fn not_found(kind: EntityKind, id: &str) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    pub(crate) fn already_exists(kind: EntityKind, id: &str) -> Self {
        Self::AlreadyExists {
            kind,
            id: id.to_string(),
        }
    }

    /// Stable machine-readable code used in log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::AlreadyExists { .. } => "already_exists",
            Self::AlreadyCancelled(_) => "already_cancelled",
            Self::NoAvailability(_) => "no_availability",
            Self::NotLinked { .. } => "not_linked",
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { kind, id } => write!(f, "{kind} '{id}' not found"),
            Self::AlreadyExists { kind, id } => write!(f, "{kind} '{id}' already exists"),
            Self::AlreadyCancelled(id) => write!(f, "reservation '{id}' already cancelled"),
            Self::NoAvailability(hotel_id) => {
                write!(f, "no available rooms in hotel '{hotel_id}'")
            }
            Self::NotLinked {
                hotel_id,
                reservation_id,
            } => write!(
                f,
                "reservation '{reservation_id}' is not linked to hotel '{hotel_id}'"
            ),
        }
    }
}

impl Error for RepoError {}

/// Logs a rejected operation and hands the error back for returning.
pub(crate) fn rejected(event: &str, err: RepoError) -> RepoError {
    info!(
        "event={event} module=repo status=rejected error_code={} error={err}",
        err.code()
    );
    err
}

/// Why an `update` field was not applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SkipReason {
    UnknownField,
    InvalidValue,
    RoomsInUse,
}

impl SkipReason {
    fn as_str(self) -> &'static str {
        match self {
            Self::UnknownField => "unknown_field",
            Self::InvalidValue => "invalid_value",
            Self::RoomsInUse => "rooms_in_use",
        }
    }
}

pub(crate) fn warn_skipped_field(kind: EntityKind, id: &str, field: &str, reason: SkipReason) {
    warn!(
        "event={kind}_update module=repo status=skipped {kind}_id={id} field={field} reason={}",
        reason.as_str()
    );
}

/// Text form of an update value; strings and numbers only.
pub(crate) fn text_value(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

/// Room-count form of an update value; non-negative integers or numeric text.
pub(crate) fn count_value(value: &Value) -> Option<u32> {
    match value {
        Value::Number(number) => number.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{count_value, text_value, EntityKind, RepoError};
    use serde_json::json;

    #[test]
    fn messages_are_human_readable() {
        let err = RepoError::not_found(EntityKind::Hotel, "H9");
        assert_eq!(err.to_string(), "hotel 'H9' not found");
        assert_eq!(err.code(), "not_found");

        let err = RepoError::NotLinked {
            hotel_id: "H1".to_string(),
            reservation_id: "R1".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "reservation 'R1' is not linked to hotel 'H1'"
        );
    }

    #[test]
    fn text_value_accepts_strings_and_numbers_only() {
        assert_eq!(text_value(&json!("555-0100")), Some("555-0100".to_string()));
        assert_eq!(text_value(&json!(5550100)), Some("5550100".to_string()));
        assert_eq!(text_value(&json!(null)), None);
        assert_eq!(text_value(&json!(["a"])), None);
    }

    #[test]
    fn count_value_rejects_negative_and_fractional_counts() {
        assert_eq!(count_value(&json!(12)), Some(12));
        assert_eq!(count_value(&json!(" 7 ")), Some(7));
        assert_eq!(count_value(&json!(-1)), None);
        assert_eq!(count_value(&json!(2.5)), None);
        assert_eq!(count_value(&json!("many")), None);
    }
}
