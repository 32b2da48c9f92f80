#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artist {
    pub id: String,
    pub name: String,
    pub genres: Vec<String>, // may be empty, the service does not tag every artist
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub id: String,
    pub name: String,
    pub artist_ids: Vec<String>,
}

/// One page of a playlist listing.
#[derive(Debug, Default)]
pub struct TrackPage {
    pub tracks: Vec<Track>,
    /// Entries the service returned on this page, skipped ones included
    pub entries: u32,
    /// Offset of the following page, `None` once the service reports no further page
    pub next_offset: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    pub track_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenreBucket {
    pub genre: String,
    pub track_ids: Vec<String>,
}
