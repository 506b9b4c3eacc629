//! HTTP catalog loader.  One GET for `songs/index.json`, then one GET per
//! body resource, all in flight at once and joined before the catalog is
//! handed out.  Index failures are fatal; body failures degrade that song to
//! an empty body.

use anyhow::Context;
use futures_util::future::join_all;
use tracing::{debug, info, warn};

use crate::error::{LoadError, Result};
use crate::song::{duplicate_ids, IndexEntry, Song};

pub const INDEX_PATH: &str = "songs/index.json";

/// The resources are static files behind ordinary caches; ask every hop for a
/// fresh copy so an edited song shows up on the next load.
const CACHE_BYPASS: (&str, &str) = ("Cache-Control", "no-store");

pub struct CatalogClient {
    client: reqwest::Client,
    base_url: String,
}

impl CatalogClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Fetch the index, then every body concurrently.  The returned catalog
    /// preserves index order no matter how the fetches complete.
    pub async fn load(&self) -> Result<Vec<Song>> {
        let index = self.fetch_index().await?;
        info!("index lists {} songs", index.len());

        let bodies = join_all(index.iter().map(|entry| self.fetch_body(entry))).await;
        let songs: Vec<Song> = index
            .into_iter()
            .zip(bodies)
            .map(|(entry, body)| Song::from_entry(entry, body))
            .collect();

        for id in duplicate_ids(&songs) {
            warn!("index repeats song id {}; the first entry wins", id);
        }
        Ok(songs)
    }

    async fn fetch_index(&self) -> Result<Vec<IndexEntry>> {
        let url = self.url(INDEX_PATH);
        debug!("fetching index: {}", url);

        let response = self
            .client
            .get(&url)
            .header(CACHE_BYPASS.0, CACHE_BYPASS.1)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(LoadError::IndexStatus(response.status()));
        }

        let text = response.text().await?;
        let index: Vec<IndexEntry> = serde_json::from_str(&text)?;
        Ok(index)
    }

    /// Never fails: a body that cannot be fetched becomes the empty string,
    /// logged and forgotten.
    async fn fetch_body(&self, entry: &IndexEntry) -> String {
        match self.try_fetch_body(entry).await {
            Ok(text) => text,
            Err(e) => {
                warn!(
                    "body fetch failed for song {} ({}): {:#}",
                    entry.id, entry.file, e
                );
                String::new()
            }
        }
    }

    async fn try_fetch_body(&self, entry: &IndexEntry) -> anyhow::Result<String> {
        let url = self.url(&format!("songs/{}", entry.file));
        let response = self
            .client
            .get(&url)
            .header(CACHE_BYPASS.0, CACHE_BYPASS.1)
            .send()
            .await
            .context("request failed")?;

        if !response.status().is_success() {
            anyhow::bail!("HTTP {}", response.status());
        }

        let raw = response.text().await.context("reading body text")?;
        Ok(clean_body(&raw))
    }
}

/// Strip a UTF-8 BOM if present, then surrounding whitespace.  Song files
/// come from assorted editors and some carry both.
fn clean_body(raw: &str) -> String {
    raw.strip_prefix('\u{feff}').unwrap_or(raw).trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_body_strips_bom_and_whitespace() {
        assert_eq!(clean_body("\u{feff}Hola\n"), "Hola");
        assert_eq!(clean_body("  dos líneas\nsegunda  \n\n"), "dos líneas\nsegunda");
        assert_eq!(clean_body("sin bom"), "sin bom");
        assert_eq!(clean_body("\u{feff}"), "");
        assert_eq!(clean_body(""), "");
    }

    #[test]
    fn test_clean_body_keeps_interior_blank_lines() {
        let raw = "\u{feff}Estrofa 1\n\nEstrofa 2\n";
        assert_eq!(clean_body(raw), "Estrofa 1\n\nEstrofa 2");
    }

    #[test]
    fn test_url_joining_tolerates_trailing_slash() {
        let a = CatalogClient::new("http://127.0.0.1:8000/");
        let b = CatalogClient::new("http://127.0.0.1:8000");
        assert_eq!(a.url(INDEX_PATH), "http://127.0.0.1:8000/songs/index.json");
        assert_eq!(a.url(INDEX_PATH), b.url(INDEX_PATH));
    }

    #[test]
    fn test_index_array_parse() {
        let json = r#"[
            { "id": 1, "number": 1, "title": "Alpha", "file": "a.txt" },
            { "id": 2, "number": 2, "title": "Beta", "file": "b.txt" }
        ]"#;
        let index: Vec<IndexEntry> = serde_json::from_str(json).unwrap();
        assert_eq!(index.len(), 2);
        assert_eq!(index[0].title, "Alpha");
        assert_eq!(index[1].file, "b.txt");
    }
}
