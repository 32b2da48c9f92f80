use async_trait::async_trait;

use crate::clients::{
    entities::{Artist, Playlist, TrackPage},
    errors::Result,
};

/// The remote operations the genre splitter needs.
///
/// `SpotifyClient` talks to the real Web API; tests plug in an in-memory implementation.
#[async_trait]
pub trait PlaylistService: Send + Sync {
    /// Fetch up to `limit` tracks of a playlist starting at `offset`.
    async fn playlist_tracks_page(
        &self,
        playlist_id: &str,
        offset: u32,
        limit: u32,
    ) -> Result<TrackPage>;

    /// Look up several artists in one request.
    ///
    /// Artists unknown to the service are left out of the result.
    async fn artists(&self, artist_ids: &[String]) -> Result<Vec<Artist>>;

    /// Create an empty playlist owned by `user_id`.
    async fn create_playlist(&self, user_id: &str, name: &str) -> Result<Playlist>;

    /// Append tracks to a playlist in one request.
    async fn add_tracks(&self, playlist_id: &str, track_ids: &[String]) -> Result<()>;
}
