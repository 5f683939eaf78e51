//! CLI smoke entry point.
//!
//! # Responsibility
//! - Wire `setmaker_core` against the configured database and run one
//!   create/list flow.
//! - Keep output as deterministic `key=value` lines for quick sanity checks.

use log::error;
use setmaker_core::{
    init_logging, open_db_at, CatalogService, CoreConfig, SongDraft, SqliteArtistRepository,
    SqliteEventLog, SqliteSongRepository,
};
use std::error::Error;
use std::process::ExitCode;

fn main() -> ExitCode {
    // A missing .env file is normal; only the environment is required.
    let _ = dotenvy::dotenv();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=cli_run module=cli status=error error={err}");
            eprintln!("setmaker_cli error={err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let config = CoreConfig::from_env()?;
    init_logging(&config.log)?;

    let conn = open_db_at(config.db_path.as_deref())?;
    let artists = SqliteArtistRepository::try_new(&conn)?;
    let songs = SqliteSongRepository::try_new(&conn)?;
    let events = SqliteEventLog::new(&conn, config.event_topic.clone());
    let service = CatalogService::new(artists, songs, &events).with_page_limits(config.page_limits);

    println!("setmaker_core version={}", setmaker_core::core_version());

    let created = service.create_artist("Smoke Probe", "")?;
    println!("artist_id={}", created.artist.id);
    println!("notified={}", created.notification.is_published());

    let song = service.create_song(&SongDraft::new(
        "Probe Song",
        created.artist.id.to_string(),
        "A",
        "minor",
    ))?;
    println!("song_id={}", song.id);

    let page = service.list_songs_by_artist(0, "", &created.artist.id.to_string())?;
    println!("artist_song_count={}", page.count);

    let mut total = 0u32;
    let mut cursor = String::new();
    loop {
        let page = service.list_artists(0, &cursor)?;
        total += page.count;
        if page.is_last() {
            break;
        }
        cursor = page.cursor;
    }
    println!("artist_total={total}");
    println!("event_log_size={}", events.list_events(u32::MAX)?.len());

    Ok(())
}
