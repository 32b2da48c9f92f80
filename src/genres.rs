use std::collections::{HashMap, HashSet};

use crate::clients::entities::{Artist, GenreBucket, Track};

/// Bucket for tracks whose artists carry no genre tags.
///
/// A tag from the service spelled the same way is ignored like a blank one,
/// so this bucket only ever holds tracks without a real genre.
pub const UNKNOWN_GENRE: &str = "unknown";

/// How tracks are assigned to genre buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitMode {
    /// Every distinct genre of any of the track's artists gets the track.
    AllGenres,
    /// Each track goes to its single representative genre.
    ///
    /// With a `limit`, only that many genres (the ones holding the most
    /// tracks) keep a bucket. Tracks of the dropped genres fall back to
    /// their next kept candidate, or to [`UNKNOWN_GENRE`].
    TopGenres { limit: Option<usize> },
}

// Buckets in the order their genre was first assigned
#[derive(Default)]
struct Buckets {
    buckets: Vec<GenreBucket>,
    index: HashMap<String, usize>,
    assigned: HashSet<(usize, String)>,
}

impl Buckets {
    fn assign(&mut self, genre: &str, track_id: &str) {
        let idx = if let Some(&idx) = self.index.get(genre) {
            idx
        } else {
            self.buckets.push(GenreBucket {
                genre: genre.to_owned(),
                track_ids: Vec::new(),
            });
            let idx = self.buckets.len() - 1;
            self.index.insert(genre.to_owned(), idx);
            idx
        };

        // A track listed twice in the source playlist is added once
        if self.assigned.insert((idx, track_id.to_owned())) {
            self.buckets[idx].track_ids.push(track_id.to_owned());
        }
    }

    fn into_vec(self) -> Vec<GenreBucket> {
        self.buckets
    }
}

fn is_placeholder(genre: &str) -> bool {
    let genre = genre.trim();
    genre.is_empty() || genre.eq_ignore_ascii_case(UNKNOWN_GENRE)
}

// Genres of a track's artists with the number of artists carrying each, in first-seen order
fn genre_counts<'a>(track: &Track, artists: &HashMap<&str, &'a Artist>) -> Vec<(&'a str, usize)> {
    let mut counts: Vec<(&'a str, usize)> = Vec::new();
    let mut seen_artists = HashSet::new();

    for artist in track
        .artist_ids
        .iter()
        .filter(|id| seen_artists.insert(id.as_str()))
        .filter_map(|id| artists.get(id.as_str()).copied())
    {
        let mut seen_genres = HashSet::new();
        for genre in artist.genres.iter().map(String::as_str) {
            if is_placeholder(genre) || !seen_genres.insert(genre) {
                continue;
            }
            match counts.iter_mut().find(|(g, _)| *g == genre) {
                Some((_, n)) => *n += 1,
                None => counts.push((genre, 1)),
            }
        }
    }
    counts
}

/// Candidate genres of a track, best first.
///
/// Genres shared by more of the track's artists rank higher. Ties go to the
/// shorter label, which tends to be the broad genre rather than a sub-genre
/// ("rock" over "modern alternative rock"), then to the genre seen first.
pub fn ranked_genres<'a>(track: &Track, artists: &HashMap<&str, &'a Artist>) -> Vec<&'a str> {
    let mut counts = genre_counts(track, artists);
    // sort_by is stable, equal keys keep first-seen order
    counts.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.len().cmp(&b.0.len())));
    counts.into_iter().map(|(genre, _)| genre).collect()
}

// The `limit` representative genres holding the most tracks, ties by discovery order
fn most_popular<'a>(ranked: &[Vec<&'a str>], limit: usize) -> HashSet<&'a str> {
    let mut counts: Vec<(&'a str, usize)> = Vec::new();
    for top in ranked.iter().filter_map(|candidates| candidates.first()) {
        match counts.iter_mut().find(|(g, _)| *g == *top) {
            Some((_, n)) => *n += 1,
            None => counts.push((*top, 1)),
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
        .into_iter()
        .take(limit)
        .map(|(genre, _)| genre)
        .collect()
}

/// Group tracks into genre buckets.
///
/// Buckets come back in genre discovery order and keep the source order of
/// their tracks. Tracks without any genre go to [`UNKNOWN_GENRE`]; artists
/// missing from `artists` count as having no genres.
pub fn build_buckets(tracks: &[Track], artists: &[Artist], mode: SplitMode) -> Vec<GenreBucket> {
    let by_id: HashMap<&str, &Artist> = artists.iter().map(|a| (a.id.as_str(), a)).collect();
    let mut buckets = Buckets::default();

    match mode {
        SplitMode::AllGenres => {
            for track in tracks {
                let genres = genre_counts(track, &by_id);
                if genres.is_empty() {
                    buckets.assign(UNKNOWN_GENRE, &track.id);
                }
                for (genre, _) in genres {
                    buckets.assign(genre, &track.id);
                }
            }
        }
        SplitMode::TopGenres { limit } => {
            let ranked: Vec<Vec<&str>> = tracks.iter().map(|t| ranked_genres(t, &by_id)).collect();
            let kept = limit.map(|n| most_popular(&ranked, n));

            for (track, candidates) in tracks.iter().zip(&ranked) {
                let genre = candidates
                    .iter()
                    .copied()
                    .find(|g| kept.as_ref().is_none_or(|kept| kept.contains(g)))
                    .unwrap_or(UNKNOWN_GENRE);
                buckets.assign(genre, &track.id);
            }
        }
    }

    buckets.into_vec()
}
