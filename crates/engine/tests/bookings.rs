use chrono::NaiveDate;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};
use uuid::Uuid;

use engine::{
    BookingPatch, BookingStatus, BudgetCategory, BudgetLinePatch, Engine, EngineError, NewBooking,
    NewWedding, WeddingPatch,
};
use migration::MigratorTrait;

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let backend = db.get_database_backend();
    for username in ["alice", "bob", "carol"] {
        db.execute(Statement::from_sql_and_values(
            backend,
            "INSERT INTO users (username, password) VALUES (?, ?)",
            vec![username.into(), "password".into()],
        ))
        .await
        .unwrap();
    }
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

async fn new_wedding(engine: &Engine, user: &str) -> String {
    engine
        .new_wedding(
            user,
            NewWedding {
                bride_name: "Priya".to_string(),
                groom_name: "Rahul".to_string(),
                wedding_date: NaiveDate::from_ymd_opt(2027, 2, 14).unwrap(),
                venue: Some("Rambagh Palace".to_string()),
                city: Some("Jaipur".to_string()),
                total_budget_minor: 2_000_000,
                notes: None,
            },
        )
        .await
        .unwrap()
}

fn booking_input(service_type: &str, total_minor: i64) -> NewBooking {
    NewBooking {
        vendor_id: None,
        vendor_name: Some("Lens & Light".to_string()),
        contact_person: Some("Asha".to_string()),
        email: None,
        phone: None,
        address: None,
        service_type: service_type.to_string(),
        event_date: NaiveDate::from_ymd_opt(2027, 2, 14).unwrap(),
        status: None,
        total_amount_minor: total_minor,
        advance_paid_minor: 0,
        notes: None,
    }
}

#[tokio::test]
async fn new_booking_defaults_to_pending() {
    let (engine, _db) = engine_with_db().await;
    new_wedding(&engine, "alice").await;

    let id = engine
        .new_booking(None, "alice", booking_input("photography", 50_000))
        .await
        .unwrap();

    let booking = engine.booking(id, "alice").await.unwrap();
    assert_eq!(booking.status, BookingStatus::Pending);
    assert_eq!(booking.remaining_amount_minor(), 50_000);
}

#[tokio::test]
async fn bookings_are_hidden_from_other_accounts() {
    let (engine, _db) = engine_with_db().await;
    new_wedding(&engine, "alice").await;

    let id = engine
        .new_booking(None, "alice", booking_input("photography", 50_000))
        .await
        .unwrap();

    let err = engine.booking(id, "carol").await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
    let err = engine
        .update_booking(id, "carol", BookingPatch::default())
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}

#[tokio::test]
async fn linked_vendor_can_read_the_booking() {
    let (engine, _db) = engine_with_db().await;
    new_wedding(&engine, "alice").await;
    let vendor_id = engine
        .new_vendor("bob", "Marigold Decor", "decorator", None)
        .await
        .unwrap();

    let id = engine
        .new_booking(
            None,
            "alice",
            NewBooking {
                vendor_id: Some(vendor_id),
                ..booking_input("decorator", 40_000)
            },
        )
        .await
        .unwrap();

    let booking = engine.booking(id, "bob").await.unwrap();
    assert_eq!(booking.vendor_id, Some(vendor_id));

    let listed = engine.vendor_bookings("bob").await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, id);
}

#[tokio::test]
async fn vendor_status_update_rejects_other_statuses_and_strangers() {
    let (engine, _db) = engine_with_db().await;
    new_wedding(&engine, "alice").await;
    let vendor_id = engine
        .new_vendor("bob", "Marigold Decor", "decorator", None)
        .await
        .unwrap();
    engine
        .new_vendor("carol", "Beat Drop DJs", "dj", None)
        .await
        .unwrap();

    let id = engine
        .new_booking(
            None,
            "alice",
            NewBooking {
                vendor_id: Some(vendor_id),
                ..booking_input("decorator", 40_000)
            },
        )
        .await
        .unwrap();

    let err = engine
        .update_booking_status(id, "bob", BookingStatus::Pending)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidStatus(_)));

    // A vendor not linked to the booking gets "not found", not "forbidden".
    let err = engine
        .update_booking_status(id, "carol", BookingStatus::Confirmed)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}

#[tokio::test]
async fn payments_must_be_non_negative() {
    let (engine, _db) = engine_with_db().await;
    new_wedding(&engine, "alice").await;

    let id = engine
        .new_booking(None, "alice", booking_input("caterer", 30_000))
        .await
        .unwrap();

    let err = engine
        .update_payment(id, "alice", Some(-5), None)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));

    let booking = engine
        .update_payment(id, "alice", Some(10_000), Some(5_000))
        .await
        .unwrap();
    assert_eq!(booking.remaining_amount_minor(), 15_000);
}

#[tokio::test]
async fn new_booking_requires_a_known_vendor_and_valid_amounts() {
    let (engine, _db) = engine_with_db().await;
    new_wedding(&engine, "alice").await;

    let err = engine
        .new_booking(
            None,
            "alice",
            NewBooking {
                vendor_id: Some(Uuid::new_v4()),
                ..booking_input("decorator", 40_000)
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));

    let err = engine
        .new_booking(None, "alice", booking_input("decorator", -1))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));

    let err = engine
        .new_booking(None, "alice", booking_input("   ", 100))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidName(_)));
}

#[tokio::test]
async fn bookings_list_newest_first_and_delete_removes() {
    let (engine, _db) = engine_with_db().await;
    new_wedding(&engine, "alice").await;

    let first = engine
        .new_booking(None, "alice", booking_input("venue", 100_000))
        .await
        .unwrap();
    let second = engine
        .new_booking(None, "alice", booking_input("dj", 10_000))
        .await
        .unwrap();

    let listed = engine.list_bookings(None, "alice").await.unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id, second);

    engine.delete_booking(first, "alice").await.unwrap();
    let listed = engine.list_bookings(None, "alice").await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, second);
}

#[tokio::test]
async fn one_budget_line_per_category() {
    let (engine, _db) = engine_with_db().await;
    new_wedding(&engine, "alice").await;

    engine
        .add_budget_line(None, "alice", BudgetCategory::Venue, 100_000, 0, None)
        .await
        .unwrap();
    let err = engine
        .add_budget_line(None, "alice", BudgetCategory::Venue, 50_000, 0, None)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::ExistingKey(_)));
}

#[tokio::test]
async fn moving_a_line_onto_a_taken_category_is_a_conflict() {
    let (engine, _db) = engine_with_db().await;
    new_wedding(&engine, "alice").await;

    let venue = engine
        .add_budget_line(None, "alice", BudgetCategory::Venue, 100_000, 0, None)
        .await
        .unwrap();
    engine
        .add_budget_line(None, "alice", BudgetCategory::Catering, 60_000, 0, None)
        .await
        .unwrap();

    let err = engine
        .update_budget_line(
            venue,
            "alice",
            BudgetLinePatch {
                category: Some(BudgetCategory::Catering),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::ExistingKey(_)));

    // Moving onto a free category works.
    let moved = engine
        .update_budget_line(
            venue,
            "alice",
            BudgetLinePatch {
                category: Some(BudgetCategory::Decoration),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(moved.category, BudgetCategory::Decoration);
}

#[tokio::test]
async fn wedding_resolution_prefers_explicit_id_and_falls_back_to_newest() {
    let (engine, _db) = engine_with_db().await;
    let first = new_wedding(&engine, "alice").await;
    let second = new_wedding(&engine, "alice").await;

    // No id: the most recently created wedding wins.
    let resolved = engine.wedding(None, "alice").await.unwrap();
    assert_eq!(resolved.id, second);

    let resolved = engine.wedding(Some(&first), "alice").await.unwrap();
    assert_eq!(resolved.id, first);

    // Another couple's id reads as absent.
    let err = engine.wedding(Some(&first), "carol").await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}

#[tokio::test]
async fn wedding_update_patches_only_given_fields() {
    let (engine, _db) = engine_with_db().await;
    let id = new_wedding(&engine, "alice").await;

    let updated = engine
        .update_wedding(
            &id,
            "alice",
            WeddingPatch {
                total_budget_minor: Some(3_000_000),
                city: Some("Udaipur".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.total_budget_minor, 3_000_000);
    assert_eq!(updated.city.as_deref(), Some("Udaipur"));
    assert_eq!(updated.bride_name, "Priya");
    assert_eq!(updated.venue.as_deref(), Some("Rambagh Palace"));
}

#[tokio::test]
async fn unknown_accounts_cannot_create_weddings_or_vendor_profiles() {
    let (engine, _db) = engine_with_db().await;

    let err = engine
        .new_wedding(
            "mallory",
            NewWedding {
                bride_name: "Priya".to_string(),
                groom_name: "Rahul".to_string(),
                wedding_date: NaiveDate::from_ymd_opt(2027, 2, 14).unwrap(),
                venue: None,
                city: None,
                total_budget_minor: 1_000_000,
                notes: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));

    let err = engine
        .new_vendor("mallory", "Marigold Decor", "decorator", None)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}

#[tokio::test]
async fn empty_patches_leave_records_untouched() {
    let (engine, _db) = engine_with_db().await;
    let wedding_id = new_wedding(&engine, "alice").await;
    let booking_id = engine
        .new_booking(None, "alice", booking_input("photography", 50_000))
        .await
        .unwrap();
    let line_id = engine
        .add_budget_line(None, "alice", BudgetCategory::Venue, 100_000, 0, None)
        .await
        .unwrap();

    let booking = engine
        .update_booking(booking_id, "alice", BookingPatch::default())
        .await
        .unwrap();
    assert_eq!(booking.status, BookingStatus::Pending);
    assert_eq!(booking.total_amount_minor, 50_000);
    assert_eq!(booking.vendor_name.as_deref(), Some("Lens & Light"));

    let booking = engine
        .update_payment(booking_id, "alice", None, None)
        .await
        .unwrap();
    assert_eq!(booking.remaining_amount_minor(), 50_000);

    let wedding = engine
        .update_wedding(&wedding_id, "alice", WeddingPatch::default())
        .await
        .unwrap();
    assert_eq!(wedding.bride_name, "Priya");
    assert_eq!(wedding.total_budget_minor, 2_000_000);

    let line = engine
        .update_budget_line(line_id, "alice", BudgetLinePatch::default())
        .await
        .unwrap();
    assert_eq!(line.category, BudgetCategory::Venue);
    assert_eq!(line.estimated_cost_minor, 100_000);
}
