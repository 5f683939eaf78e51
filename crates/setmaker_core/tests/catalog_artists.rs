use chrono::{Duration, TimeZone, Utc};
use rusqlite::Connection;
use setmaker_core::db::open_db_in_memory;
use setmaker_core::{
    CatalogService, Clock, DomainEvent, ErrorKind, FixedClock, MessageId, Notifier, PublishError,
    Repository, SqliteArtistRepository, SqliteEventLog, SqliteSongRepository,
};
use std::cell::RefCell;
use std::error::Error;
use uuid::Uuid;

#[derive(Default)]
struct RecordingNotifier {
    events: RefCell<Vec<DomainEvent>>,
}

impl Notifier for RecordingNotifier {
    fn publish(&self, event: &DomainEvent) -> Result<MessageId, PublishError> {
        self.events.borrow_mut().push(event.clone());
        Ok(MessageId::new(format!("msg-{}", self.events.borrow().len())))
    }
}

struct FailingNotifier;

impl Notifier for FailingNotifier {
    fn publish(&self, _event: &DomainEvent) -> Result<MessageId, PublishError> {
        Err(PublishError::Transport("bus unavailable".to_string()))
    }
}

fn catalog<'c, N: Notifier>(
    conn: &'c Connection,
    notifier: N,
    clock: &'c FixedClock,
) -> CatalogService<SqliteArtistRepository<'c>, SqliteSongRepository<'c>, N, &'c FixedClock> {
    CatalogService::with_clock(
        SqliteArtistRepository::try_new(conn).unwrap(),
        SqliteSongRepository::try_new(conn).unwrap(),
        notifier,
        clock,
    )
}

fn clock() -> FixedClock {
    FixedClock::new(Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap())
}

fn stored_artist_count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM artists;", [], |row| row.get(0))
        .unwrap()
}

#[test]
fn create_artist_persists_then_publishes_once() {
    let conn = open_db_in_memory().unwrap();
    let clock = clock();
    let events = SqliteEventLog::new(&conn, "create-artist");
    let service = catalog(&conn, &events, &clock);

    let created = service.create_artist("  Test Artist ", "https://img/1.png").unwrap();
    assert!(created.notification.is_published());
    assert_eq!(created.artist.name, "Test Artist");
    assert_eq!(created.artist.metadata.created_at, clock.now());
    assert_eq!(
        created.artist.metadata.created_at,
        created.artist.metadata.updated_at
    );

    let loaded = service.get_artist(&created.artist.id.to_string()).unwrap();
    assert_eq!(loaded, created.artist);

    let published = events.list_events(10).unwrap();
    assert_eq!(published.len(), 1);
    assert_eq!(
        published[0].event,
        DomainEvent::ArtistCreated {
            id: created.artist.id,
            name: "Test Artist".to_string(),
        }
    );
}

#[test]
fn failing_notifier_does_not_fail_or_undo_create() {
    let conn = open_db_in_memory().unwrap();
    let clock = clock();
    let service = catalog(&conn, FailingNotifier, &clock);

    let created = service.create_artist("Quiet Artist", "").unwrap();
    assert!(!created.notification.is_published());

    let loaded = service.get_artist(&created.artist.id.to_string()).unwrap();
    assert_eq!(loaded.name, "Quiet Artist");
}

#[test]
fn invalid_fields_are_rejected_before_persistence() {
    let conn = open_db_in_memory().unwrap();
    let clock = clock();
    let notifier = RecordingNotifier::default();
    let service = catalog(&conn, &notifier, &clock);

    let blank = service.create_artist("   ", "").unwrap_err();
    assert_eq!(blank.kind(), ErrorKind::InvalidArgument);

    let long_name = "x".repeat(257);
    let too_long = service.create_artist(&long_name, "").unwrap_err();
    assert_eq!(too_long.kind(), ErrorKind::InvalidArgument);

    assert_eq!(stored_artist_count(&conn), 0);
    assert!(notifier.events.borrow().is_empty());
}

#[test]
fn get_artist_distinguishes_bad_id_from_missing_artist() {
    let conn = open_db_in_memory().unwrap();
    let clock = clock();
    let service = catalog(&conn, RecordingNotifier::default(), &clock);

    let bad = service.get_artist("not-a-uuid").unwrap_err();
    assert_eq!(bad.kind(), ErrorKind::InvalidArgument);
    assert_eq!(bad.kind().status_code(), 3);

    let missing = service.get_artist(&Uuid::new_v4().to_string()).unwrap_err();
    assert_eq!(missing.kind(), ErrorKind::NotFound);
    assert_eq!(missing.kind().status_code(), 5);
}

#[test]
fn update_artist_preserves_identity_and_creation_time() {
    let conn = open_db_in_memory().unwrap();
    let clock = clock();
    let service = catalog(&conn, RecordingNotifier::default(), &clock);

    let created = service.create_artist("Before", "a.png").unwrap().artist;
    let id = created.id.to_string();

    clock.advance(Duration::minutes(5));
    let updated = service.update_artist(&id, "After", "b.png").unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.name, "After");
    assert_eq!(updated.image, "b.png");
    assert_eq!(updated.metadata.created_at, created.metadata.created_at);
    assert_eq!(
        updated.metadata.updated_at,
        created.metadata.created_at + Duration::minutes(5)
    );

    clock.advance(Duration::hours(-1));
    let rewound = service.update_artist(&id, "Again", "").unwrap();
    assert_eq!(rewound.metadata.updated_at, updated.metadata.updated_at);
    assert_eq!(service.get_artist(&id).unwrap(), rewound);
}

#[test]
fn update_missing_artist_is_not_found_and_creates_nothing() {
    let conn = open_db_in_memory().unwrap();
    let clock = clock();
    let service = catalog(&conn, RecordingNotifier::default(), &clock);

    let err = service
        .update_artist(&Uuid::new_v4().to_string(), "Ghost", "")
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(stored_artist_count(&conn), 0);
}

#[test]
fn delete_artist_is_idempotent() {
    let conn = open_db_in_memory().unwrap();
    let clock = clock();
    let service = catalog(&conn, RecordingNotifier::default(), &clock);

    let id = service.create_artist("Short Lived", "").unwrap().artist.id.to_string();
    service.delete_artist(&id).unwrap();
    service.delete_artist(&id).unwrap();
    service.delete_artist(&Uuid::new_v4().to_string()).unwrap();

    let err = service.get_artist(&id).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let bad = service.delete_artist("nope").unwrap_err();
    assert_eq!(bad.kind(), ErrorKind::InvalidArgument);
}

#[test]
fn store_failure_surfaces_as_internal_without_details() {
    let conn = open_db_in_memory().unwrap();
    let clock = clock();
    let notifier = RecordingNotifier::default();
    let service = catalog(&conn, &notifier, &clock);

    conn.execute_batch("DROP TABLE artists;").unwrap();

    let err = service.create_artist("Doomed", "").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Internal);
    assert!(err.kind().is_retryable());
    assert_eq!(err.kind().status_code(), 13);
    assert!(!err.to_string().contains("no such table"));
    assert!(err.source().is_some());
    assert!(notifier.events.borrow().is_empty());

    let list_err = service.list_artists(10, "").unwrap_err();
    assert_eq!(list_err.kind(), ErrorKind::Internal);
}

#[test]
fn created_artist_is_visible_to_the_repository() {
    let conn = open_db_in_memory().unwrap();
    let clock = clock();
    let service = catalog(&conn, RecordingNotifier::default(), &clock);

    let created = service.create_artist("Direct", "").unwrap().artist;
    let repo = SqliteArtistRepository::try_new(&conn).unwrap();
    assert_eq!(repo.get(created.id).unwrap(), created);
}
