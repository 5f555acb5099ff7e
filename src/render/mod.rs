//! Rendering sink interface and the bundled gallery-directory sink
//!
//! The aggregator streams batches of produced cards to a [`RenderSink`];
//! what "rendering" means is up to the sink. The bundled implementation
//! writes assets into a directory and maintains a markdown gallery index.

mod gallery;
mod traits;

pub use gallery::GalleryDirSink;
pub use traits::{RenderCard, RenderError, RenderResult, RenderSink};
