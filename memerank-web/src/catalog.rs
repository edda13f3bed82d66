//! Meme catalog
//!
//! Loads the ratable images from a directory once at startup. The set of
//! memes is fixed for the process lifetime; the only mutation afterwards is
//! appending scores, which happens from concurrent requests and is guarded
//! by a single RwLock over the score lists.

use memerank_common::{Error, Result};
use std::path::Path;
use tokio::sync::RwLock;

/// Upper bound on catalog size, to keep rating sessions short
pub const MAX_MEMES: usize = 10;

/// Recognized image file extensions (matched case-insensitively)
const IMAGE_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "gif"];

/// Immutable identity of one meme
#[derive(Debug, Clone)]
pub struct MemeInfo {
    /// Display name, derived from the file stem. Unique within the catalog.
    pub name: String,
    /// File name within the meme directory, used as the served URL segment
    pub file_name: String,
}

/// The process-wide meme catalog
///
/// `scores[i]` accumulates every rating given to `memes[i]` across all
/// users, in submission order.
#[derive(Debug)]
pub struct Catalog {
    memes: Vec<MemeInfo>,
    scores: RwLock<Vec<Vec<u8>>>,
}

impl Catalog {
    /// Scan `dir` for image files and build the catalog.
    ///
    /// Entries are sorted by file name so catalog order (and leaderboard
    /// tie-breaking) does not depend on directory iteration order, then
    /// truncated to [`MAX_MEMES`].
    ///
    /// Fails with `Error::NotFound` if the directory is missing or contains
    /// no recognized image files. Callers treat that as startup-fatal.
    pub fn load(dir: &Path) -> Result<Self> {
        if !dir.is_dir() {
            return Err(Error::NotFound(format!(
                "meme directory does not exist: {}",
                dir.display()
            )));
        }

        let mut memes = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
                continue;
            };
            if !IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()) {
                continue;
            }
            let (Some(file_name), Some(stem)) = (
                path.file_name().and_then(|n| n.to_str()),
                path.file_stem().and_then(|s| s.to_str()),
            ) else {
                continue;
            };
            memes.push(MemeInfo {
                name: stem.to_string(),
                file_name: file_name.to_string(),
            });
        }

        if memes.is_empty() {
            return Err(Error::NotFound(format!(
                "no image files found in meme directory: {}",
                dir.display()
            )));
        }

        memes.sort_by(|a, b| a.file_name.cmp(&b.file_name));
        memes.truncate(MAX_MEMES);

        let scores = RwLock::new(vec![Vec::new(); memes.len()]);
        Ok(Self { memes, scores })
    }

    /// Number of memes in the catalog (fixed after load)
    pub fn len(&self) -> usize {
        self.memes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.memes.is_empty()
    }

    /// Meme identity at a catalog index
    pub fn get(&self, index: usize) -> Option<&MemeInfo> {
        self.memes.get(index)
    }

    /// Memes in catalog order
    pub fn memes(&self) -> &[MemeInfo] {
        &self.memes
    }

    /// Append one score to a meme's score list
    pub async fn push_score(&self, index: usize, rating: u8) {
        let mut scores = self.scores.write().await;
        if let Some(list) = scores.get_mut(index) {
            list.push(rating);
        }
    }

    /// Per-meme average score, in catalog order. Unrated memes average 0.0.
    pub async fn averages(&self) -> Vec<f64> {
        let scores = self.scores.read().await;
        scores
            .iter()
            .map(|list| {
                if list.is_empty() {
                    0.0
                } else {
                    list.iter().map(|&s| s as f64).sum::<f64>() / list.len() as f64
                }
            })
            .collect()
    }

    /// Number of scores recorded for a meme
    pub async fn score_count(&self, index: usize) -> usize {
        self.scores.read().await.get(index).map_or(0, Vec::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_files(dir: &Path, names: &[&str]) {
        for name in names {
            std::fs::write(dir.join(name), b"not really an image").unwrap();
        }
    }

    #[test]
    fn test_load_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        write_files(
            dir.path(),
            &["zebra.png", "apple.jpg", "notes.txt", "cat.GIF", "readme"],
        );

        let catalog = Catalog::load(dir.path()).unwrap();

        // Non-images skipped, extensions matched case-insensitively,
        // entries ordered by file name
        let names: Vec<&str> = catalog.memes().iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["apple", "cat", "zebra"]);
    }

    #[test]
    fn test_load_truncates_to_max() {
        let dir = tempfile::tempdir().unwrap();
        let names: Vec<String> = (0..15).map(|i| format!("meme{:02}.png", i)).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        write_files(dir.path(), &refs);

        let catalog = Catalog::load(dir.path()).unwrap();
        assert_eq!(catalog.len(), MAX_MEMES);
        assert_eq!(catalog.get(0).unwrap().name, "meme00");
    }

    #[test]
    fn test_load_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");

        let err = Catalog::load(&missing).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_load_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        write_files(dir.path(), &["notes.txt"]);

        let err = Catalog::load(dir.path()).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn test_scores_accumulate() {
        let dir = tempfile::tempdir().unwrap();
        write_files(dir.path(), &["a.png", "b.png"]);
        let catalog = Catalog::load(dir.path()).unwrap();

        catalog.push_score(0, 2).await;
        catalog.push_score(0, 4).await;

        assert_eq!(catalog.score_count(0).await, 2);
        assert_eq!(catalog.score_count(1).await, 0);
        assert_eq!(catalog.averages().await, vec![3.0, 0.0]);
    }
}
