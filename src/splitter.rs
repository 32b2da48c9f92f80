use std::collections::HashSet;

use log::{debug, info, warn};

use crate::clients::{
    entities::{Artist, GenreBucket, Playlist, Track},
    errors::{Error, Result},
    service::PlaylistService,
};
use crate::genres::{SplitMode, build_buckets};

/// Artist ids of `tracks` without repeats, in first-seen order.
pub fn distinct_artist_ids(tracks: &[Track]) -> Vec<String> {
    let mut seen = HashSet::new();
    tracks
        .iter()
        .flat_map(|t| t.artist_ids.iter())
        .filter(|id| seen.insert(id.as_str()))
        .cloned()
        .collect()
}

/// Per-request limits of the remote API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Tracks requested per playlist page
    pub page_size: u32,
    /// Artists looked up per request
    pub artists_per_request: usize,
    /// Tracks added to a playlist per request
    pub tracks_per_add: usize,
}

impl Default for Limits {
    // Maximums accepted by the Spotify Web API
    fn default() -> Self {
        Self {
            page_size: 100,
            artists_per_request: 50,
            tracks_per_add: 100,
        }
    }
}

/// Configuration for the [`Splitter`].
pub struct Config<S> {
    /// Remote playlist service
    pub service: S,
    /// Owner of the playlists that get created
    pub user_id: String,
    /// Playlist whose tracks are split, never modified
    pub playlist_id: String,
    /// How tracks are assigned to genres
    pub mode: SplitMode,
    /// Remote per-request limits
    pub limits: Limits,
    /// Prepended to the genre to name each new playlist
    pub name_prefix: String,
    /// Build the buckets but don't create anything
    pub dry_run: bool,
}

/// Builder for [`Config`]. Only the service and the two ids are required.
pub struct ConfigBuilder<S> {
    service: S,
    user_id: String,
    playlist_id: String,
    mode: Option<SplitMode>,
    limits: Option<Limits>,
    name_prefix: Option<String>,
    dry_run: bool,
}

impl<S: PlaylistService> ConfigBuilder<S> {
    pub fn new(service: S, user_id: impl Into<String>, playlist_id: impl Into<String>) -> Self {
        Self {
            service,
            user_id: user_id.into(),
            playlist_id: playlist_id.into(),
            mode: None, // Default is every genre with no limit
            limits: None,
            name_prefix: None,
            dry_run: false,
        }
    }

    #[must_use]
    pub fn mode(mut self, mode: SplitMode) -> Self {
        self.mode = Some(mode);
        self
    }

    #[must_use]
    pub fn limits(mut self, limits: Limits) -> Self {
        self.limits = Some(limits);
        self
    }

    #[must_use]
    pub fn name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.name_prefix = Some(prefix.into());
        self
    }

    #[must_use]
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn build(self) -> Result<Config<S>> {
        if self.user_id.trim().is_empty() {
            return Err(Error::ConfigurationError("user id must not be empty".into()));
        }
        if self.playlist_id.trim().is_empty() {
            return Err(Error::ConfigurationError(
                "playlist id must not be empty".into(),
            ));
        }
        let limits = self.limits.unwrap_or_default();
        if limits.page_size == 0 || limits.artists_per_request == 0 || limits.tracks_per_add == 0 {
            return Err(Error::ConfigurationError(format!(
                "request limits must be positive, got {limits:?}"
            )));
        }
        if let Some(SplitMode::TopGenres { limit: Some(0) }) = self.mode {
            return Err(Error::ConfigurationError(
                "number of playlists to create must be at least 1".into(),
            ));
        }

        Ok(Config {
            service: self.service,
            user_id: self.user_id.trim().to_owned(),
            playlist_id: self.playlist_id.trim().to_owned(),
            mode: self.mode.unwrap_or(SplitMode::AllGenres),
            limits,
            name_prefix: self.name_prefix.unwrap_or_default(),
            dry_run: self.dry_run,
        })
    }
}

/// Outcome of one split run.
#[derive(Debug, Default)]
pub struct SplitReport {
    /// Tracks read from the source playlist
    pub tracks_read: usize,
    /// Distinct artists looked up
    pub artists_looked_up: usize,
    /// Buckets in creation order
    pub buckets: Vec<GenreBucket>,
    /// Playlists created, empty on a dry run
    pub playlists: Vec<Playlist>,
}

/// Splits one playlist into one playlist per genre.
///
/// Every remote call is awaited before the next one starts. Running it twice
/// creates the playlists twice.
pub struct Splitter<S> {
    config: Config<S>,
}

impl<S: PlaylistService> Splitter<S> {
    pub fn new(config: Config<S>) -> Self {
        Splitter { config }
    }

    pub fn config(&self) -> &Config<S> {
        &self.config
    }

    pub async fn split(&self) -> Result<SplitReport> {
        info!(
            "Splitting playlist {} by genre ({:?}) ...",
            self.config.playlist_id, self.config.mode
        );

        let tracks = self.fetch_tracks().await?;
        info!("Fetched {} tracks from the source playlist", tracks.len());
        if tracks.is_empty() {
            info!("Source playlist has no tracks. Nothing to split.");
            return Ok(SplitReport::default());
        }

        let artist_ids = distinct_artist_ids(&tracks);
        let artists = self.fetch_artists(&artist_ids).await?;
        let buckets = build_buckets(&tracks, &artists, self.config.mode);
        info!("Grouped tracks into {} genres", buckets.len());

        let playlists = if self.config.dry_run {
            info!("Dry run, no playlists created");
            Vec::new()
        } else {
            self.create_playlists(&buckets).await?
        };

        Ok(SplitReport {
            tracks_read: tracks.len(),
            artists_looked_up: artist_ids.len(),
            buckets,
            playlists,
        })
    }

    /// Read the whole source playlist, page by page.
    pub async fn fetch_tracks(&self) -> Result<Vec<Track>> {
        let page_size = self.config.limits.page_size;
        let mut tracks = Vec::new();
        let mut offset = 0;

        loop {
            let page = self
                .config
                .service
                .playlist_tracks_page(&self.config.playlist_id, offset, page_size)
                .await?;
            debug!("Got {} tracks at offset {offset}", page.tracks.len());
            tracks.extend(page.tracks);

            if page.entries == 0 {
                // Nothing left to read, whatever the service says about a next page
                break;
            }
            match page.next_offset {
                Some(next) if next > offset => offset = next,
                Some(next) => {
                    // The offset has to move forward or the listing would never end
                    warn!("Service returned next offset {next} after {offset}, stopping pagination");
                    break;
                }
                None => break,
            }
        }
        Ok(tracks)
    }

    /// Look up artists in batches. Ids unknown to the service are left out.
    pub async fn fetch_artists(&self, artist_ids: &[String]) -> Result<Vec<Artist>> {
        let mut artists = Vec::with_capacity(artist_ids.len());
        for batch in artist_ids.chunks(self.config.limits.artists_per_request) {
            debug!("Looking up {} artists ...", batch.len());
            artists.extend(self.config.service.artists(batch).await?);
        }
        info!(
            "Looked up {} artists, {} known to the service",
            artist_ids.len(),
            artists.len()
        );
        Ok(artists)
    }

    /// Create one playlist per non-empty bucket and fill it in source order.
    pub async fn create_playlists(&self, buckets: &[GenreBucket]) -> Result<Vec<Playlist>> {
        let service = &self.config.service;
        let mut playlists = Vec::new();

        for bucket in buckets.iter().filter(|b| !b.track_ids.is_empty()) {
            let name = format!("{}{}", self.config.name_prefix, bucket.genre);
            let mut playlist = service
                .create_playlist(&self.config.user_id, &name)
                .await?;

            for chunk in bucket.track_ids.chunks(self.config.limits.tracks_per_add) {
                service.add_tracks(&playlist.id, chunk).await?;
            }
            playlist.track_ids.clone_from(&bucket.track_ids);
            info!(
                "Created playlist {:?} with {} tracks",
                playlist.name,
                playlist.track_ids.len()
            );
            playlists.push(playlist);
        }
        Ok(playlists)
    }
}
