//! Rendering sink trait and associated types

use thiserror::Error;

/// Errors that can occur inside a rendering sink
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Failed to write render output: {0}")]
    Write(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for rendering sink operations
pub type RenderResult<T> = Result<T, RenderError>;

/// One renderable unit: a retrieved media asset together with the article
/// it belongs to
#[derive(Debug, Clone)]
pub struct RenderCard {
    /// Ordinal of the owning article in the crawl result
    pub ordinal: usize,

    /// Owning article's title
    pub title: String,

    /// Owning article's detail-page URL
    pub article_url: String,

    /// The resolved media URL the asset came from
    pub media_url: String,

    /// Raw asset bytes
    pub bytes: Vec<u8>,

    /// Content-Type the asset was served with, if any
    pub content_type: Option<String>,
}

/// Trait for rendering sinks
///
/// The aggregator delivers cards in the batch order it produces them.
/// Implementations must be thread-safe; all methods take `&self`.
pub trait RenderSink: Send + Sync {
    /// Receives one produced batch of cards
    fn append(&self, cards: &[RenderCard]) -> RenderResult<()>;

    /// Requests a layout recompute after a batch was appended
    fn relayout(&self) -> RenderResult<()>;

    /// Reports progress: `completed` settled units out of `total`
    fn set_progress(&self, completed: usize, total: usize) -> RenderResult<()>;

    /// Discards everything rendered so far
    fn clear(&self) -> RenderResult<()>;
}
