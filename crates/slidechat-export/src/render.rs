use crate::error::ExportError;
use crate::format::ExportFormat;
use crate::layout::SlidePlan;
use crate::styles::DeckStyles;

/// Draws laid-out slides into one file format.
///
/// Rendering is CPU-bound and synchronous; the pipeline runs it on the
/// blocking pool.
pub trait DeckRenderer: Send + Sync {
    fn format(&self) -> ExportFormat;

    fn render(&self, slides: &[SlidePlan], styles: &DeckStyles) -> Result<Vec<u8>, ExportError>;
}
