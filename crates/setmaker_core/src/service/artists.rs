//! Artist use-cases.

use crate::clock::Clock;
use crate::logging::sanitize_message;
use crate::model::artist::{Artist, ArtistFields};
use crate::model::song::Song;
use crate::notify::{DomainEvent, MessageId, Notifier, PublishError};
use crate::pagination::Page;
use crate::repo::document_repo::Repository;
use crate::service::catalog::CatalogService;
use crate::service::error::{parse_id, ServiceError, ServiceResult};
use log::{info, warn};

const LOGGED_NAME_CHARS: usize = 64;

/// What happened to the post-create notification.
#[derive(Debug)]
pub enum NotificationOutcome {
    Published(MessageId),
    /// Publish failed; the artist is persisted regardless.
    Failed(PublishError),
}

impl NotificationOutcome {
    pub fn is_published(&self) -> bool {
        matches!(self, Self::Published(_))
    }
}

/// Result of `create_artist`.
#[derive(Debug)]
pub struct ArtistCreation {
    pub artist: Artist,
    pub notification: NotificationOutcome,
}

impl<A, S, N, C> CatalogService<A, S, N, C>
where
    A: Repository<Artist>,
    S: Repository<Song>,
    N: Notifier,
    C: Clock,
{
    /// Creates an artist, then publishes `ArtistCreated` once.
    ///
    /// A publish failure is logged and reported through
    /// `ArtistCreation::notification`; it never fails the call.
    pub fn create_artist(&self, name: &str, image: &str) -> ServiceResult<ArtistCreation> {
        let fields = ArtistFields::parse(name, image)?;
        let artist = Artist::create(fields, self.clock.now());
        self.artists
            .put(&artist)
            .map_err(|err| ServiceError::from_repo("artist_create", err))?;
        info!(
            "event=artist_create module=service status=ok id={} name={}",
            artist.id,
            sanitize_message(&artist.name, LOGGED_NAME_CHARS)
        );

        let event = DomainEvent::ArtistCreated {
            id: artist.id,
            name: artist.name.clone(),
        };
        let notification = match self.notifier.publish(&event) {
            Ok(message_id) => {
                info!(
                    "event=artist_notify module=service status=ok id={} message_id={}",
                    artist.id, message_id
                );
                NotificationOutcome::Published(message_id)
            }
            Err(err) => {
                warn!(
                    "event=artist_notify module=service status=error id={} error={}",
                    artist.id, err
                );
                NotificationOutcome::Failed(err)
            }
        };

        Ok(ArtistCreation {
            artist,
            notification,
        })
    }

    pub fn get_artist(&self, id: &str) -> ServiceResult<Artist> {
        let id = parse_id("id", id)?;
        self.require_artist("artist_get", id)
    }

    /// Overwrites name and image, keeping id and creation time.
    pub fn update_artist(&self, id: &str, name: &str, image: &str) -> ServiceResult<Artist> {
        let id = parse_id("id", id)?;
        let fields = ArtistFields::parse(name, image)?;

        let mut artist = self.require_artist("artist_update", id)?;
        artist.apply_update(fields, self.clock.now());
        self.artists
            .put(&artist)
            .map_err(|err| ServiceError::from_repo("artist_update", err))?;
        info!(
            "event=artist_update module=service status=ok id={} name={}",
            artist.id,
            sanitize_message(&artist.name, LOGGED_NAME_CHARS)
        );
        Ok(artist)
    }

    /// Removes an artist. Missing ids succeed; songs are left in place.
    pub fn delete_artist(&self, id: &str) -> ServiceResult<()> {
        let id = parse_id("id", id)?;
        self.artists
            .delete(id)
            .map_err(|err| ServiceError::from_repo("artist_delete", err))?;
        info!("event=artist_delete module=service status=ok id={}", id);
        Ok(())
    }

    pub fn list_artists(&self, page_size: u32, cursor: &str) -> ServiceResult<Page<Artist>> {
        self.list_page("artist_list", page_size, cursor, |size, start| {
            self.artists.scan(size, start)
        })
    }
}
