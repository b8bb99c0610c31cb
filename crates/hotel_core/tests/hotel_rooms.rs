use hotel_core::{
    Collection, EntityKind, HotelRepository, JsonFileStore, RecordStore, RepoError, HOTELS_KEY,
};
use serde_json::json;
use std::fs;
use tempfile::TempDir;

fn repo() -> (TempDir, HotelRepository<JsonFileStore>) {
    let dir = tempfile::tempdir().unwrap();
    let repo = HotelRepository::new(JsonFileStore::new(dir.path()));
    (dir, repo)
}

#[test]
fn create_initializes_full_availability() {
    let (_dir, repo) = repo();

    let hotel = repo.create("H1", "Grand Inn", "NYC", 50).unwrap();
    assert_eq!(hotel.total_rooms, 50);
    assert_eq!(hotel.available_rooms, 50);
    assert!(hotel.reservation_ids.is_empty());
    assert_eq!(repo.get("H1").unwrap(), hotel);
}

#[test]
fn create_duplicate_returns_already_exists() {
    let (_dir, repo) = repo();
    repo.create("H1", "Grand Inn", "NYC", 50).unwrap();

    let err = repo.create("H1", "Other", "LA", 10).unwrap_err();
    assert!(matches!(err, RepoError::AlreadyExists { kind: EntityKind::Hotel, .. }));
    assert_eq!(repo.get("H1").unwrap().location, "NYC");
}

#[test]
fn delete_and_get_missing() {
    let (_dir, repo) = repo();
    repo.create("H2", "Sea View", "Miami", 20).unwrap();

    repo.delete("H2").unwrap();
    assert!(matches!(repo.get("H2"), Err(RepoError::NotFound { .. })));
    assert!(matches!(repo.delete("H2"), Err(RepoError::NotFound { .. })));
}

#[test]
fn update_renames_and_relocates() {
    let (_dir, repo) = repo();
    repo.create("H4", "Old Name", "Chicago", 30).unwrap();

    let updated = repo
        .update(
            "H4",
            [("name", json!("New Name")), ("location", json!("Detroit"))],
        )
        .unwrap();
    assert_eq!(updated.name, "New Name");
    assert_eq!(updated.location, "Detroit");
    assert_eq!(repo.get("H4").unwrap(), updated);
}

#[test]
fn update_missing_hotel_returns_not_found() {
    let (_dir, repo) = repo();

    let err = repo.update("GHOST", [("name", json!("X"))]).unwrap_err();
    assert_eq!(err.to_string(), "hotel 'GHOST' not found");
}

#[test]
fn update_with_unknown_field_succeeds_and_does_not_store_it() {
    let (dir, repo) = repo();
    repo.create("H5", "Inn", "Austin", 10).unwrap();

    let updated = repo.update("H5", [("color", json!("blue"))]).unwrap();
    assert_eq!(updated.name, "Inn");

    let raw: Collection<serde_json::Value> = JsonFileStore::new(dir.path()).load(HOTELS_KEY);
    assert!(raw["H5"].get("color").is_none());
}

#[test]
fn update_total_rooms_recomputes_availability() {
    let (_dir, repo) = repo();
    repo.create("H1", "Inn", "Austin", 3).unwrap();
    repo.reserve_room("H1", "RES1").unwrap();

    let grown = repo.update("H1", [("total_rooms", json!(6))]).unwrap();
    assert_eq!(grown.total_rooms, 6);
    assert_eq!(grown.available_rooms, 5);

    let shrunk = repo.update("H1", [("total_rooms", json!("1"))]).unwrap();
    assert_eq!(shrunk.total_rooms, 1);
    assert_eq!(shrunk.available_rooms, 0);
    assert!(shrunk.is_consistent());
}

#[test]
fn update_total_rooms_below_held_rooms_is_skipped() {
    let (_dir, repo) = repo();
    repo.create("H1", "Inn", "Austin", 3).unwrap();
    repo.reserve_room("H1", "RES1").unwrap();
    repo.reserve_room("H1", "RES2").unwrap();

    let updated = repo
        .update(
            "H1",
            [
                ("total_rooms", json!(1)),
                ("total_rooms", json!(-4)),
                ("name", json!("Still Renamed")),
            ],
        )
        .unwrap();
    assert_eq!(updated.total_rooms, 3);
    assert_eq!(updated.available_rooms, 1);
    assert_eq!(updated.name, "Still Renamed");
}

#[test]
fn reserve_room_decrements_and_links() {
    let (_dir, repo) = repo();
    repo.create("R1", "Tiny Hotel", "Boston", 2).unwrap();

    let hotel = repo.reserve_room("R1", "RES001").unwrap();
    assert_eq!(hotel.available_rooms, 1);
    assert_eq!(hotel.reservation_ids, vec!["RES001".to_string()]);
    assert_eq!(repo.get("R1").unwrap(), hotel);
}

#[test]
fn reserve_room_fails_exactly_when_no_rooms_left() {
    let (_dir, repo) = repo();
    repo.create("R1", "Tiny Hotel", "Boston", 2).unwrap();
    repo.reserve_room("R1", "RES001").unwrap();
    repo.reserve_room("R1", "RES002").unwrap();

    let err = repo.reserve_room("R1", "RES003").unwrap_err();
    assert_eq!(err, RepoError::NoAvailability("R1".to_string()));

    let hotel = repo.get("R1").unwrap();
    assert_eq!(hotel.available_rooms, 0);
    assert_eq!(hotel.reservation_ids.len(), 2);
}

#[test]
fn reserve_room_on_zero_room_hotel_fails() {
    let (_dir, repo) = repo();
    repo.create("H0", "Closed", "Nowhere", 0).unwrap();

    assert!(matches!(
        repo.reserve_room("H0", "RES1"),
        Err(RepoError::NoAvailability(_))
    ));
}

#[test]
fn reserve_room_is_not_idempotent() {
    let (_dir, repo) = repo();
    repo.create("R1", "Tiny Hotel", "Boston", 3).unwrap();

    repo.reserve_room("R1", "RES001").unwrap();
    let hotel = repo.reserve_room("R1", "RES001").unwrap();
    assert_eq!(hotel.available_rooms, 1);
    assert_eq!(
        hotel.reservation_ids,
        vec!["RES001".to_string(), "RES001".to_string()]
    );
}

#[test]
fn cancel_room_restores_availability() {
    let (_dir, repo) = repo();
    repo.create("R1", "Tiny Hotel", "Boston", 2).unwrap();
    repo.reserve_room("R1", "RES001").unwrap();

    let hotel = repo.cancel_room("R1", "RES001").unwrap();
    assert_eq!(hotel.available_rooms, 2);
    assert!(hotel.reservation_ids.is_empty());
}

#[test]
fn cancel_room_not_linked_changes_nothing() {
    let (_dir, repo) = repo();
    repo.create("R1", "Tiny Hotel", "Boston", 2).unwrap();
    repo.reserve_room("R1", "RES001").unwrap();

    let err = repo.cancel_room("R1", "GHOST_RES").unwrap_err();
    assert_eq!(
        err,
        RepoError::NotLinked {
            hotel_id: "R1".to_string(),
            reservation_id: "GHOST_RES".to_string(),
        }
    );
    assert_eq!(repo.get("R1").unwrap().available_rooms, 1);
}

#[test]
fn room_operations_on_missing_hotel_return_not_found() {
    let (_dir, repo) = repo();

    assert!(matches!(
        repo.reserve_room("GHOST", "RES001"),
        Err(RepoError::NotFound { kind: EntityKind::Hotel, .. })
    ));
    assert!(matches!(
        repo.cancel_room("GHOST", "RES001"),
        Err(RepoError::NotFound { kind: EntityKind::Hotel, .. })
    ));
}

#[test]
fn availability_invariant_holds_across_mixed_sequence() {
    let (_dir, repo) = repo();
    repo.create("H1", "Busy", "Paris", 3).unwrap();

    let steps: &[(bool, &str)] = &[
        (true, "A"),
        (true, "B"),
        (false, "A"),
        (true, "C"),
        (true, "D"),
        (true, "E"),
        (false, "Z"),
        (false, "C"),
        (false, "C"),
        (true, "F"),
    ];

    for &(reserve, id) in steps {
        let result = if reserve {
            repo.reserve_room("H1", id)
        } else {
            repo.cancel_room("H1", id)
        };
        let hotel = repo.get("H1").unwrap();
        assert!(
            hotel.is_consistent(),
            "invariant broken after {reserve}/{id}: {hotel:?}"
        );
        if let Ok(returned) = result {
            assert_eq!(returned, hotel);
        }
    }

    let hotel = repo.get("H1").unwrap();
    assert_eq!(hotel.reservation_ids, vec!["B", "D", "F"]);
    assert_eq!(hotel.available_rooms, 0);
}

#[test]
fn legacy_document_without_derived_fields_loads_with_defaults() {
    let (dir, repo) = repo();
    fs::write(
        dir.path().join("hotels.json"),
        r#"{"H6": {"hotel_id": "H6", "name": "Beach Resort", "location": "Cancun", "total_rooms": 100}}"#,
    )
    .unwrap();

    let hotel = repo.get("H6").unwrap();
    assert_eq!(hotel.available_rooms, 100);
    assert!(hotel.reservation_ids.is_empty());
}
