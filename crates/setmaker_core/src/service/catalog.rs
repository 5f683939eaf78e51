//! Catalog orchestration service.
//!
//! # Responsibility
//! - Compose artist/song repositories, the notifier and the clock into
//!   use-case level APIs.
//! - Translate opaque cursors to store continuation keys and back.
//!
//! # Invariants
//! - All validation happens before any store mutation.
//! - The service holds no mutable state; calls are independent.

use crate::clock::{Clock, SystemClock};
use crate::model::artist::{Artist, ArtistId};
use crate::model::song::Song;
use crate::notify::Notifier;
use crate::pagination::{decode_cursor, encode_cursor, ContinuationKey, Page, PageLimits};
use crate::repo::document_repo::{RepoPage, RepoResult, Repository};
use crate::service::error::{ServiceError, ServiceResult};
use log::debug;

/// Catalog service facade over repository and notifier implementations.
pub struct CatalogService<A, S, N, C = SystemClock> {
    pub(crate) artists: A,
    pub(crate) songs: S,
    pub(crate) notifier: N,
    pub(crate) clock: C,
    limits: PageLimits,
}

impl<A, S, N> CatalogService<A, S, N, SystemClock>
where
    A: Repository<Artist>,
    S: Repository<Song>,
    N: Notifier,
{
    /// Creates a service stamping metadata with wall-clock time.
    pub fn new(artists: A, songs: S, notifier: N) -> Self {
        Self::with_clock(artists, songs, notifier, SystemClock)
    }
}

impl<A, S, N, C> CatalogService<A, S, N, C>
where
    A: Repository<Artist>,
    S: Repository<Song>,
    N: Notifier,
    C: Clock,
{
    pub fn with_clock(artists: A, songs: S, notifier: N, clock: C) -> Self {
        Self {
            artists,
            songs,
            notifier,
            clock,
            limits: PageLimits::default(),
        }
    }

    /// Replaces the default/maximum page sizes.
    pub fn with_page_limits(mut self, limits: PageLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn page_limits(&self) -> PageLimits {
        self.limits
    }

    /// Fetches an artist for reference checks.
    pub(crate) fn require_artist(
        &self,
        operation: &'static str,
        artist_id: ArtistId,
    ) -> ServiceResult<Artist> {
        self.artists
            .get(artist_id)
            .map_err(|err| ServiceError::from_repo(operation, err))
    }

    /// Runs one listing round: cursor decode, store read, cursor re-encode.
    pub(crate) fn list_page<D>(
        &self,
        operation: &'static str,
        page_size: u32,
        cursor: &str,
        fetch: impl FnOnce(u32, Option<&ContinuationKey>) -> RepoResult<RepoPage<D>>,
    ) -> ServiceResult<Page<D>> {
        let start = decode_cursor(cursor).map_err(ServiceError::MalformedCursor)?;
        let page_size = self.limits.normalize(page_size);

        let page = fetch(page_size, start.as_ref())
            .map_err(|err| ServiceError::from_repo(operation, err))?;
        let next = encode_cursor(page.last_evaluated_key.as_ref())
            .map_err(ServiceError::CursorEncode)?;

        debug!(
            "event={} module=service status=ok page_size={} count={} has_more={}",
            operation,
            page_size,
            page.count,
            !next.is_empty()
        );
        Ok(Page {
            items: page.items,
            count: page.count,
            cursor: next,
        })
    }
}
