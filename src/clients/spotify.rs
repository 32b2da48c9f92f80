use std::path::PathBuf;

use async_trait::async_trait;
use log::{debug, warn};

use crate::clients::{
    entities::{Artist, Playlist, Track, TrackPage},
    errors::Result,
    service::PlaylistService,
};
use rspotify::{
    AuthCodeSpotify, Config, Credentials, OAuth,
    model::{
        ArtistId, FullArtist, PlayableId, PlayableItem, PlaylistId, PlaylistItem, TrackId, UserId,
    },
    prelude::*,
    scopes,
};

// Must match one of the redirect URIs registered for the application
const DEFAULT_REDIRECT_URI: &str = "http://localhost:7777/callback";

impl From<FullArtist> for Artist {
    fn from(f: FullArtist) -> Artist {
        Artist {
            id: f.id.id().to_owned(),
            name: f.name,
            genres: f.genres,
        }
    }
}

// Episodes and local files have no catalog track id, so they can't be regrouped
fn track_from_item(item: PlaylistItem) -> Option<Track> {
    match item.track {
        Some(PlayableItem::Track(track)) => {
            let Some(id) = track.id else {
                warn!("Skipping local track {:?}: it has no Spotify id", track.name);
                return None;
            };
            Some(Track {
                id: id.id().to_owned(),
                name: track.name,
                artist_ids: track
                    .artists
                    .into_iter()
                    .filter_map(|a| a.id)
                    .map(|a| a.id().to_owned())
                    .collect(),
            })
        }
        Some(_) => {
            warn!("Skipping playlist entry that is not a track");
            None
        }
        None => {
            warn!("Skipping playlist entry that is no longer available");
            None
        }
    }
}

// Skipped entries still count towards the offset of the next page
fn next_page_offset(offset: u32, entries: u32, has_next: bool) -> Option<u32> {
    has_next.then(|| offset.saturating_add(entries))
}

pub struct SpotifyClient {
    pub spotify: AuthCodeSpotify,
}

impl SpotifyClient {
    pub fn new(spotify: AuthCodeSpotify) -> Self {
        SpotifyClient { spotify }
    }

    // Build a client for the authorization code flow. The redirect URI can be
    // overridden with RSPOTIFY_REDIRECT_URI.
    pub fn with_credentials(client_id: &str, client_secret: &str) -> Self {
        let creds = Credentials::new(client_id, client_secret);
        let redirect_uri = std::env::var("RSPOTIFY_REDIRECT_URI")
            .unwrap_or_else(|_| DEFAULT_REDIRECT_URI.to_owned());
        let oauth = OAuth {
            redirect_uri,
            scopes: scopes!(
                "playlist-read-private",
                "playlist-read-collaborative",
                "playlist-modify-public",
                "playlist-modify-private"
            ),
            ..Default::default()
        };

        let cache_path = dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from("/tmp")) // Fallback to /tmp if cache directory can't be determined
            .join(".genresplit_token_cache");

        let spotify = AuthCodeSpotify::with_config(
            creds,
            oauth,
            Config {
                token_cached: true,
                cache_path,
                ..Default::default()
            },
        );

        Self::new(spotify)
    }

    // Authorize the Spotify client via CLI prompt and OAuth flow
    // This function requires the `cli` feature enabled.
    pub async fn authorize_client(&self) -> Result<()> {
        debug!("Starting Spotify authorization ...");
        let url = self.spotify.get_authorize_url(false)?;
        self.spotify.prompt_for_token(&url).await?;
        let user = self.spotify.me().await?;
        debug!("Authenticated as user: {:?}", user.display_name);
        Ok(())
    }
}

#[async_trait]
impl PlaylistService for SpotifyClient {
    async fn playlist_tracks_page(
        &self,
        playlist_id: &str,
        offset: u32,
        limit: u32,
    ) -> Result<TrackPage> {
        let playlist_id = PlaylistId::from_id_or_uri(playlist_id)?;
        let page = self
            .spotify
            .playlist_items_manual(playlist_id, None, None, Some(limit), Some(offset))
            .await?;

        let entries = u32::try_from(page.items.len()).unwrap_or(limit);
        let next_offset = next_page_offset(page.offset, entries, page.next.is_some());
        debug!(
            "Fetched playlist page at offset {} ({entries} entries of {})",
            page.offset, page.total
        );

        Ok(TrackPage {
            tracks: page.items.into_iter().filter_map(track_from_item).collect(),
            entries,
            next_offset,
        })
    }

    async fn artists(&self, artist_ids: &[String]) -> Result<Vec<Artist>> {
        let ids = artist_ids
            .iter()
            .map(|id| ArtistId::from_id(id.as_str()))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        let artists = self.spotify.artists(ids).await?;
        Ok(artists.into_iter().map(Artist::from).collect())
    }

    async fn create_playlist(&self, user_id: &str, name: &str) -> Result<Playlist> {
        let user_id = UserId::from_id_or_uri(user_id)?;
        let created = self
            .spotify
            .user_playlist_create(user_id, name, None, None, None)
            .await?;
        Ok(Playlist {
            id: created.id.id().to_owned(),
            name: created.name,
            track_ids: Vec::new(),
        })
    }

    async fn add_tracks(&self, playlist_id: &str, track_ids: &[String]) -> Result<()> {
        let playlist_id = PlaylistId::from_id(playlist_id)?;
        let items = track_ids
            .iter()
            .map(|id| TrackId::from_id(id.as_str()).map(PlayableId::Track))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        self.spotify
            .playlist_add_items(playlist_id, items, None)
            .await?;
        Ok(())
    }
}
