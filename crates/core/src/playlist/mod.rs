use serde::{Deserialize, Serialize};

use crate::{PlayerError, Result};

/// A named, playable media reference.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Track {
    pub name: String,
    /// Opaque locator handed to the media host when the track is activated.
    pub source: String,
}

impl Track {
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
        }
    }
}

/// Fixed, non-empty, ordered track list with circular navigation.
#[derive(Debug, Clone)]
pub struct Playlist {
    tracks: Vec<Track>,
}

impl Playlist {
    /// Builds a playlist. The list is immutable afterwards.
    pub fn new(tracks: Vec<Track>) -> Result<Self> {
        if tracks.is_empty() {
            return Err(PlayerError::EmptyPlaylist);
        }
        Ok(Self { tracks })
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Always false for a constructed playlist.
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    /// Resolves `index` or reports it as a missing track.
    pub fn track(&self, index: usize) -> Result<&Track> {
        self.get(index).ok_or(PlayerError::MissingTrack(index))
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Index after `index`, wrapping from the last track to the first.
    pub fn next_index(&self, index: usize) -> usize {
        (index + 1) % self.len()
    }

    /// Index before `index`, wrapping from the first track to the last.
    pub fn previous_index(&self, index: usize) -> usize {
        (index + self.len() - 1) % self.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn playlist(len: usize) -> Playlist {
        Playlist::new(
            (0..len)
                .map(|i| Track::new(format!("track{i}"), format!("music/{i}.mp3")))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn rejects_empty_lists() {
        assert!(matches!(
            Playlist::new(Vec::new()),
            Err(PlayerError::EmptyPlaylist)
        ));
    }

    #[test]
    fn next_wraps_back_to_start_after_len_steps() {
        for len in 1..=6 {
            let list = playlist(len);
            for start in 0..len {
                let mut index = start;
                for _ in 0..len {
                    index = list.next_index(index);
                }
                assert_eq!(index, start, "len {len} start {start}");
            }
        }
    }

    #[test]
    fn previous_inverts_next() {
        let list = playlist(5);
        for i in 0..5 {
            assert_eq!(list.previous_index(list.next_index(i)), i);
            assert_eq!(list.next_index(list.previous_index(i)), i);
        }
        assert_eq!(list.previous_index(0), 4);
        assert_eq!(list.next_index(4), 0);
    }

    #[test]
    fn single_track_wraps_to_itself() {
        let list = playlist(1);
        assert_eq!(list.next_index(0), 0);
        assert_eq!(list.previous_index(0), 0);
    }

    #[test]
    fn reports_missing_indices() {
        let list = playlist(2);
        assert_eq!(list.track(1).unwrap().name, "track1");
        assert!(matches!(list.track(2), Err(PlayerError::MissingTrack(2))));
    }
}
