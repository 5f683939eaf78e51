use chrono::{TimeZone, Utc};
use setmaker_core::db::open_db_in_memory;
use setmaker_core::model::artist::ArtistFields;
use setmaker_core::model::song::SongFields;
use setmaker_core::repo::document_repo::RepoError;
use setmaker_core::{
    Artist, ContinuationKey, Repository, Song, SongQueries, SqliteArtistRepository,
    SqliteSongRepository,
};
use uuid::Uuid;

fn artist(name: &str) -> Artist {
    let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    Artist::create(ArtistFields::parse(name, "").unwrap(), now)
}

fn song(title: &str, artist_id: Uuid) -> Song {
    let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    Song::create(
        SongFields::parse(title, artist_id, "C", "major").unwrap(),
        now,
    )
}

#[test]
fn put_overwrites_whole_document() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteArtistRepository::try_new(&conn).unwrap();

    let mut stored = artist("Draft");
    repo.put(&stored).unwrap();
    stored.name = "Final".to_string();
    stored.image = "cover.png".to_string();
    repo.put(&stored).unwrap();

    assert_eq!(repo.get(stored.id).unwrap(), stored);
    let page = repo.scan(10, None).unwrap();
    assert_eq!(page.count, 1);
    assert_eq!(page.last_evaluated_key, None);
}

#[test]
fn get_missing_and_delete_missing() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteArtistRepository::try_new(&conn).unwrap();
    let id = Uuid::new_v4();

    assert!(matches!(
        repo.get(id),
        Err(RepoError::NotFound { kind: "artist", id: missing }) if missing == id
    ));
    repo.delete(id).unwrap();
}

#[test]
fn scan_keys_carry_primary_key_and_table() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteArtistRepository::try_new(&conn).unwrap();
    for name in ["a", "b", "c"] {
        repo.put(&artist(name)).unwrap();
    }

    let first = repo.scan(2, None).unwrap();
    let key = first.last_evaluated_key.clone().unwrap();
    assert_eq!(key.len(), 2);
    assert_eq!(key.get("Id"), Some(first.items[1].id.to_string().as_str()));
    assert_eq!(key.get("Table"), Some("artists"));

    let rest = repo.scan(2, Some(&key)).unwrap();
    assert_eq!(rest.count, 1);
    assert!(rest.items[0].id > first.items[1].id);
    assert_eq!(rest.last_evaluated_key, None);
}

#[test]
fn index_query_keys_carry_index_attribute() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSongRepository::try_new(&conn).unwrap();
    let owner = Uuid::new_v4();
    for title in ["one", "two", "three"] {
        repo.put(&song(title, owner)).unwrap();
    }
    repo.put(&song("elsewhere", Uuid::new_v4())).unwrap();

    let first = repo.query_by_artist(owner, 2, None).unwrap();
    assert_eq!(first.count, 2);
    let key = first.last_evaluated_key.clone().unwrap();
    assert_eq!(key.get("ArtistId"), Some(owner.to_string().as_str()));

    let rest = repo.query_by_artist(owner, 2, Some(&key)).unwrap();
    assert_eq!(rest.count, 1);
    assert!(rest.items.iter().all(|item| item.artist_id == owner));
}

#[test]
fn start_keys_of_wrong_shape_are_rejected() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSongRepository::try_new(&conn).unwrap();
    let owner = Uuid::new_v4();

    let extra = ContinuationKey::new()
        .with("Id", Uuid::new_v4().to_string())
        .with("Table", "songs")
        .with("Other", "x");
    assert!(matches!(
        repo.scan(5, Some(&extra)),
        Err(RepoError::InvalidStartKey(_))
    ));

    let not_uuid = ContinuationKey::new()
        .with("Id", "seven")
        .with("Table", "songs");
    assert!(matches!(
        repo.scan(5, Some(&not_uuid)),
        Err(RepoError::InvalidStartKey(_))
    ));

    assert!(matches!(
        repo.query_by_index("Title-index", "x", 5, None),
        Err(RepoError::UnknownIndex { .. })
    ));

    let scan_key = ContinuationKey::new()
        .with("Id", Uuid::new_v4().to_string())
        .with("Table", "songs");
    assert!(matches!(
        repo.query_by_artist(owner, 5, Some(&scan_key)),
        Err(RepoError::InvalidStartKey(_))
    ));

    let untagged = ContinuationKey::new().with("Id", Uuid::new_v4().to_string());
    assert!(matches!(
        repo.scan(5, Some(&untagged)),
        Err(RepoError::InvalidStartKey(_))
    ));
}

#[test]
fn start_key_from_another_table_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let artists = SqliteArtistRepository::try_new(&conn).unwrap();
    let songs = SqliteSongRepository::try_new(&conn).unwrap();
    let owner = artist("Owner");
    artists.put(&owner).unwrap();
    for title in ["one", "two"] {
        songs.put(&song(title, owner.id)).unwrap();
    }

    let song_key = songs.scan(1, None).unwrap().last_evaluated_key.unwrap();
    assert_eq!(song_key.get("Table"), Some("songs"));
    assert!(matches!(
        artists.scan(10, Some(&song_key)),
        Err(RepoError::InvalidStartKey(_))
    ));
}

#[test]
fn zero_page_size_reads_one_row_and_keeps_the_key() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSongRepository::try_new(&conn).unwrap();
    let owner = Uuid::new_v4();
    for title in ["one", "two"] {
        repo.put(&song(title, owner)).unwrap();
    }

    let scanned = repo.scan(0, None).unwrap();
    assert_eq!(scanned.count, 1);
    assert!(scanned.last_evaluated_key.is_some());

    let queried = repo.query_by_artist(owner, 0, None).unwrap();
    assert_eq!(queried.count, 1);
    assert!(queried.last_evaluated_key.is_some());
}

#[test]
fn corrupted_body_is_invalid_data() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteArtistRepository::try_new(&conn).unwrap();
    let stored = artist("Real");
    repo.put(&stored).unwrap();

    let other_id = Uuid::new_v4().to_string();
    conn.execute(
        "INSERT INTO artists (id, body) SELECT ?1, body FROM artists WHERE id = ?2;",
        [other_id.as_str(), stored.id.to_string().as_str()],
    )
    .unwrap();

    let err = repo.get(Uuid::parse_str(&other_id).unwrap()).unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
}

#[test]
fn try_new_requires_table() {
    let conn = open_db_in_memory().unwrap();
    conn.execute_batch("DROP TABLE songs;").unwrap();

    assert!(matches!(
        SqliteSongRepository::try_new(&conn),
        Err(RepoError::MissingRequiredTable("songs"))
    ));
}
