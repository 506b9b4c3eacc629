//! Query normalization and catalog filtering.  Matching is a plain substring
//! test over normalized text; no tokenization, no ranking.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::song::Song;

/// Fold text for matching: trim, lowercase, then NFD-decompose and drop the
/// combining marks so "Canción" and "CANCION" compare equal.  Idempotent.
pub fn normalize(s: &str) -> String {
    s.trim()
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect()
}

/// Substring test against `normalize(title) + "\n" + normalize(body)`.
/// `needle` must already be normalized.  The newline seam keeps a query from
/// matching across the title/body boundary.
pub fn song_matches(song: &Song, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    let haystack = format!("{}\n{}", normalize(&song.title), normalize(&song.body));
    haystack.contains(needle)
}

/// Indices of the songs matching `raw_query`, in catalog order.  An empty
/// (post-trim) query selects the whole catalog.
pub fn filter_catalog(songs: &[Song], raw_query: &str) -> Vec<usize> {
    let needle = normalize(raw_query);
    if needle.is_empty() {
        return (0..songs.len()).collect();
    }
    songs
        .iter()
        .enumerate()
        .filter(|(_, song)| song_matches(song, &needle))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn song(id: u32, title: &str, body: &str) -> Song {
        Song {
            id,
            number: id,
            title: title.to_string(),
            file: String::new(),
            body: body.to_string(),
        }
    }

    #[test]
    fn test_normalize_case_and_accents() {
        assert_eq!(normalize("CANCIÓN"), normalize("cancion"));
        assert_eq!(normalize("Qué"), "que");
        assert_eq!(normalize("ALELUYA"), "aleluya");
        assert_eq!(normalize("  María  "), "maria");
        assert_eq!(normalize("ñandú"), "nandu");
    }

    #[test]
    fn test_normalize_idempotent() {
        for s in ["CANCIÓN", "  Señor, ten piedad  ", "already plain", ""] {
            let once = normalize(s);
            assert_eq!(normalize(&once), once);
        }
    }

    #[test]
    fn test_empty_query_selects_all_in_order() {
        let songs = vec![song(1, "b", ""), song(2, "a", ""), song(3, "c", "")];
        assert_eq!(filter_catalog(&songs, ""), vec![0, 1, 2]);
        assert_eq!(filter_catalog(&songs, "   "), vec![0, 1, 2]);
    }

    #[test]
    fn test_substring_over_title_and_body() {
        let songs = vec![
            song(1, "Amazing Grace", "how sweet the sound"),
            song(2, "How Great", "then sings my soul"),
        ];
        assert_eq!(filter_catalog(&songs, "great"), vec![1]);
        assert_eq!(filter_catalog(&songs, "sound"), vec![0]);
        // "how" appears in a body and in a title
        assert_eq!(filter_catalog(&songs, "how"), vec![0, 1]);
        assert!(filter_catalog(&songs, "zzz_no_such_text").is_empty());
    }

    #[test]
    fn test_accent_insensitive_match() {
        let songs = vec![song(1, "Canción del misionero", "tú, señor, me has mirado")];
        assert_eq!(filter_catalog(&songs, "cancion"), vec![0]);
        assert_eq!(filter_catalog(&songs, "CANCIÓN"), vec![0]);
        assert_eq!(filter_catalog(&songs, "senor"), vec![0]);
        assert_eq!(filter_catalog(&songs, "SEÑOR"), vec![0]);
    }

    #[test]
    fn test_no_match_across_title_body_seam() {
        let songs = vec![song(1, "fin", "alma")];
        // last word of the title + first word of the body, joined by a space
        assert!(filter_catalog(&songs, "fin alma").is_empty());
        assert_eq!(filter_catalog(&songs, "fin"), vec![0]);
        assert_eq!(filter_catalog(&songs, "alma"), vec![0]);
    }

    #[test]
    fn test_no_false_positives_or_negatives() {
        let songs = vec![
            song(1, "Pescador de hombres", "tú has venido a la orilla"),
            song(2, "Alma misionera", "señor, toma mi vida nueva"),
            song(3, "Aleluya", ""),
        ];
        let matched = filter_catalog(&songs, "señor");
        let needle = normalize("señor");
        for (i, s) in songs.iter().enumerate() {
            assert_eq!(matched.contains(&i), song_matches(s, &needle));
        }
    }
}
