/// Data entities for tracks, artists, playlists and genre buckets
pub mod entities;
/// Error types and result aliases
pub mod errors;
/// Remote playlist service abstraction
pub mod service;
/// Spotify API client
pub mod spotify;

pub use service::PlaylistService;
pub use spotify::SpotifyClient;
