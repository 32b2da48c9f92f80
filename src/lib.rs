//! Genresplit - Split a Spotify playlist into one playlist per genre
//!
//! This library fetches the tracks of a playlist, looks up the genre tags of
//! their artists and creates a new playlist for every genre it finds.

/// Client modules for interacting with the remote playlist service
pub mod clients;
/// Grouping of tracks into genre buckets
pub mod genres;
/// The end-to-end split workflow
pub mod splitter;
