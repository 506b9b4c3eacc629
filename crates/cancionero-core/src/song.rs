use serde::{Deserialize, Serialize};

/// Identifier a song keeps for its whole life in the index.
pub type SongId = u32;

/// One row of `songs/index.json` as served.  `file` names the body resource
/// under `songs/`; the text itself is fetched separately.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub id: SongId,
    /// Display ordinal — the number shown in front of the title.
    pub number: u32,
    pub title: String,
    pub file: String,
}

/// A fully loaded song.  Immutable once the catalog is assembled.
#[derive(Debug, Clone, PartialEq)]
pub struct Song {
    pub id: SongId,
    pub number: u32,
    pub title: String,
    /// Body resource name, kept for logging and reloads.
    pub file: String,
    /// Song text, BOM-stripped and trimmed.  Empty when the body resource
    /// could not be fetched.
    pub body: String,
}

impl Song {
    pub fn from_entry(entry: IndexEntry, body: String) -> Self {
        Self {
            id: entry.id,
            number: entry.number,
            title: entry.title,
            file: entry.file,
            body,
        }
    }

    /// Row label for the list pane.
    pub fn list_label(&self, show_numbers: bool) -> String {
        if show_numbers {
            format!("{}. {}", self.number, self.title)
        } else {
            self.title.clone()
        }
    }
}

/// Ids that appear more than once, in first-appearance order.  The catalog
/// tolerates duplicates; lookups resolve to the first matching entry.
pub fn duplicate_ids(songs: &[Song]) -> Vec<SongId> {
    let mut seen = Vec::new();
    let mut dups = Vec::new();
    for song in songs {
        if seen.contains(&song.id) {
            if !dups.contains(&song.id) {
                dups.push(song.id);
            }
        } else {
            seen.push(song.id);
        }
    }
    dups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn song(id: SongId, title: &str) -> Song {
        Song {
            id,
            number: id,
            title: title.to_string(),
            file: format!("{:03}.txt", id),
            body: String::new(),
        }
    }

    #[test]
    fn test_index_entry_parse() {
        let json = r#"{ "id": 7, "number": 7, "title": "Pescador de hombres", "file": "007_pescador-de-hombres.txt" }"#;
        let entry: IndexEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.id, 7);
        assert_eq!(entry.number, 7);
        assert_eq!(entry.title, "Pescador de hombres");
        assert_eq!(entry.file, "007_pescador-de-hombres.txt");
    }

    #[test]
    fn test_index_entry_missing_field_is_error() {
        let json = r#"{ "id": 7, "title": "Sin archivo" }"#;
        assert!(serde_json::from_str::<IndexEntry>(json).is_err());
    }

    #[test]
    fn test_list_label() {
        let s = song(12, "Alma misionera");
        assert_eq!(s.list_label(true), "12. Alma misionera");
        assert_eq!(s.list_label(false), "Alma misionera");
    }

    #[test]
    fn test_duplicate_ids() {
        let songs = vec![song(1, "a"), song(2, "b"), song(1, "c"), song(1, "d"), song(3, "e")];
        assert_eq!(duplicate_ids(&songs), vec![1]);
        assert!(duplicate_ids(&songs[..2]).is_empty());
    }
}
