//! Directory-backed gallery sink
//!
//! Writes every card's asset bytes into an output directory and
//! regenerates a markdown index on each layout recompute, so the gallery
//! is browsable while the crawl is still running.

use crate::render::traits::{RenderCard, RenderError, RenderResult, RenderSink};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// A card already written to disk
#[derive(Debug, Clone)]
struct SavedCard {
    filename: String,
    title: String,
    article_url: String,
    media_url: String,
}

#[derive(Debug, Default)]
struct GalleryState {
    saved: Vec<SavedCard>,
    seq: usize,
}

/// Rendering sink that writes assets into a directory with a markdown
/// gallery index
pub struct GalleryDirSink {
    directory: PathBuf,
    index_filename: String,
    state: Mutex<GalleryState>,
}

impl GalleryDirSink {
    /// Creates the sink, creating the output directory if needed
    pub fn new(directory: impl Into<PathBuf>, index_filename: impl Into<String>) -> RenderResult<Self> {
        let directory = directory.into();
        fs::create_dir_all(&directory)?;
        Ok(Self {
            directory,
            index_filename: index_filename.into(),
            state: Mutex::new(GalleryState::default()),
        })
    }

    /// Number of cards written so far
    pub fn card_count(&self) -> usize {
        self.lock().map(|state| state.saved.len()).unwrap_or(0)
    }

    fn lock(&self) -> RenderResult<std::sync::MutexGuard<'_, GalleryState>> {
        self.state
            .lock()
            .map_err(|_| RenderError::Write("gallery state poisoned".to_string()))
    }

    fn index_path(&self) -> PathBuf {
        self.directory.join(&self.index_filename)
    }
}

impl RenderSink for GalleryDirSink {
    fn append(&self, cards: &[RenderCard]) -> RenderResult<()> {
        let mut state = self.lock()?;
        for card in cards {
            state.seq += 1;
            let filename = format!("{:04}.{}", state.seq, file_extension(card));
            fs::write(self.directory.join(&filename), &card.bytes)?;
            state.saved.push(SavedCard {
                filename,
                title: card.title.clone(),
                article_url: card.article_url.clone(),
                media_url: card.media_url.clone(),
            });
        }
        Ok(())
    }

    fn relayout(&self) -> RenderResult<()> {
        let state = self.lock()?;
        fs::write(self.index_path(), format_index(&state.saved))?;
        Ok(())
    }

    fn set_progress(&self, completed: usize, total: usize) -> RenderResult<()> {
        tracing::info!("Progress: {}/{} media items", completed, total);
        Ok(())
    }

    fn clear(&self) -> RenderResult<()> {
        let mut state = self.lock()?;
        for card in &state.saved {
            let path = self.directory.join(&card.filename);
            if path.exists() {
                fs::remove_file(path)?;
            }
        }
        state.saved.clear();
        state.seq = 0;

        let index = self.index_path();
        if index.exists() {
            fs::remove_file(index)?;
        }
        Ok(())
    }
}

/// Picks a file extension for a card, preferring the served content type
/// over whatever the URL path suggests
fn file_extension(card: &RenderCard) -> &'static str {
    if let Some(content_type) = &card.content_type {
        let essence = content_type.split(';').next().unwrap_or("").trim();
        match essence {
            "image/jpeg" => return "jpg",
            "image/png" => return "png",
            "image/gif" => return "gif",
            "image/webp" => return "webp",
            "video/mp4" => return "mp4",
            "video/webm" => return "webm",
            _ => {}
        }
    }
    extension_from_url(&card.media_url).unwrap_or("bin")
}

fn extension_from_url(url: &str) -> Option<&'static str> {
    let path = url.split(['?', '#']).next()?;
    let ext = Path::new(path).extension()?.to_str()?;
    match ext.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => Some("jpg"),
        "png" => Some("png"),
        "gif" => Some("gif"),
        "webp" => Some("webp"),
        "mp4" => Some("mp4"),
        "webm" => Some("webm"),
        _ => None,
    }
}

/// Formats the markdown gallery index, grouping cards by article
fn format_index(saved: &[SavedCard]) -> String {
    let mut md = String::new();
    md.push_str("# Gallery\n\n");

    let mut current_article: Option<&str> = None;
    for card in saved {
        if current_article != Some(card.article_url.as_str()) {
            current_article = Some(card.article_url.as_str());
            let title = if card.title.is_empty() {
                &card.article_url
            } else {
                &card.title
            };
            md.push_str(&format!("## [{}]({})\n\n", title, card.article_url));
        }
        md.push_str(&format!(
            "- ![{}]({}) ([source]({}))\n",
            card.filename, card.filename, card.media_url
        ));
    }

    md
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(title: &str, article: &str, media: &str, content_type: Option<&str>) -> RenderCard {
        RenderCard {
            ordinal: 0,
            title: title.to_string(),
            article_url: article.to_string(),
            media_url: media.to_string(),
            bytes: vec![1, 2, 3],
            content_type: content_type.map(|s| s.to_string()),
        }
    }

    #[test]
    fn test_append_writes_files() {
        let dir = tempfile::tempdir().unwrap();
        let sink = GalleryDirSink::new(dir.path(), "index.md").unwrap();

        sink.append(&[
            card("A", "https://x/a", "https://x/viewimage.php?id=1&no=2", Some("image/jpeg")),
            card("B", "https://x/b", "https://x/b.png", None),
        ])
        .unwrap();

        assert_eq!(sink.card_count(), 2);
        assert!(dir.path().join("0001.jpg").exists());
        assert!(dir.path().join("0002.png").exists());
    }

    #[test]
    fn test_relayout_writes_index() {
        let dir = tempfile::tempdir().unwrap();
        let sink = GalleryDirSink::new(dir.path(), "index.md").unwrap();

        sink.append(&[card("Hello", "https://x/a", "https://x/1.jpg", None)])
            .unwrap();
        sink.relayout().unwrap();

        let index = fs::read_to_string(dir.path().join("index.md")).unwrap();
        assert!(index.contains("# Gallery"));
        assert!(index.contains("[Hello](https://x/a)"));
        assert!(index.contains("0001.jpg"));
    }

    #[test]
    fn test_clear_removes_written_files() {
        let dir = tempfile::tempdir().unwrap();
        let sink = GalleryDirSink::new(dir.path(), "index.md").unwrap();

        sink.append(&[card("A", "https://x/a", "https://x/1.jpg", None)])
            .unwrap();
        sink.relayout().unwrap();
        sink.clear().unwrap();

        assert_eq!(sink.card_count(), 0);
        assert!(!dir.path().join("0001.jpg").exists());
        assert!(!dir.path().join("index.md").exists());
    }

    #[test]
    fn test_file_extension_prefers_content_type() {
        let c = card("t", "a", "https://x/file.png", Some("image/webp; charset=binary"));
        assert_eq!(file_extension(&c), "webp");

        let c = card("t", "a", "https://x/file.png?query=1", None);
        assert_eq!(file_extension(&c), "png");

        let c = card("t", "a", "https://x/viewimage.php?id=1&no=2", None);
        assert_eq!(file_extension(&c), "bin");
    }

    #[test]
    fn test_format_index_groups_by_article() {
        let saved = vec![
            SavedCard {
                filename: "0001.jpg".to_string(),
                title: "First".to_string(),
                article_url: "https://x/a".to_string(),
                media_url: "https://x/1.jpg".to_string(),
            },
            SavedCard {
                filename: "0002.jpg".to_string(),
                title: "First".to_string(),
                article_url: "https://x/a".to_string(),
                media_url: "https://x/2.jpg".to_string(),
            },
            SavedCard {
                filename: "0003.jpg".to_string(),
                title: "Second".to_string(),
                article_url: "https://x/b".to_string(),
                media_url: "https://x/3.jpg".to_string(),
            },
        ];

        let md = format_index(&saved);
        assert_eq!(md.matches("## ").count(), 2);
        assert_eq!(md.matches("- !").count(), 3);
    }
}
