//! Export orchestration: layout → render → deliver, with progress.
//!
//! The requested format is tried first. If it is the secondary format and
//! rendering fails, the deck is rendered again in the primary format and
//! the completion message says so. No other failure has a fallback: the
//! pipeline emits a terminal `error` event and returns the error. The
//! document is only read.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use slidechat_core::models::slide::SlideDocument;
use tracing::{debug, info, warn};
use ts_rs::TS;

use crate::error::ExportError;
use crate::format::{ExportFormat, ExportMode};
use crate::layout::{SlidePlan, plan_slide};
use crate::pdf::PdfRenderer;
use crate::pptx::PptxRenderer;
use crate::preview::PreviewRegistry;
use crate::progress::ExportProgress;
use crate::render::DeckRenderer;
use crate::styles::DeckStyles;

pub const DEFAULT_RENDER_TIMEOUT: Duration = Duration::from_secs(30);

const DEFAULT_FILE_STEM: &str = "presentation";
const MAX_FILE_STEM_CHARS: usize = 60;

/// What an export produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[serde(tag = "mode", rename_all = "snake_case")]
#[ts(export)]
pub enum ExportHandle {
    Preview {
        url: String,
        format: ExportFormat,
        /// The requested format failed and the primary format was used.
        fell_back: bool,
    },
    Download {
        #[ts(type = "string")]
        path: PathBuf,
        format: ExportFormat,
        fell_back: bool,
    },
}

impl ExportHandle {
    pub fn format(&self) -> ExportFormat {
        match self {
            ExportHandle::Preview { format, .. } | ExportHandle::Download { format, .. } => *format,
        }
    }

    pub fn fell_back(&self) -> bool {
        match self {
            ExportHandle::Preview { fell_back, .. } | ExportHandle::Download { fell_back, .. } => {
                *fell_back
            }
        }
    }
}

pub struct ExportPipeline {
    pptx: Arc<dyn DeckRenderer>,
    pdf: Arc<dyn DeckRenderer>,
    styles: DeckStyles,
    previews: Arc<PreviewRegistry>,
    downloads_dir: PathBuf,
    render_timeout: Duration,
}

impl ExportPipeline {
    pub fn new(downloads_dir: impl Into<PathBuf>) -> Self {
        Self {
            pptx: Arc::new(PptxRenderer),
            pdf: Arc::new(PdfRenderer),
            styles: DeckStyles::default(),
            previews: Arc::new(PreviewRegistry::new()),
            downloads_dir: downloads_dir.into(),
            render_timeout: DEFAULT_RENDER_TIMEOUT,
        }
    }

    /// Replace the renderer for the format it reports.
    pub fn with_renderer(mut self, renderer: Arc<dyn DeckRenderer>) -> Self {
        match renderer.format() {
            ExportFormat::Pptx => self.pptx = renderer,
            ExportFormat::Pdf => self.pdf = renderer,
        }
        self
    }

    pub fn with_styles(mut self, styles: DeckStyles) -> Self {
        self.styles = styles;
        self
    }

    pub fn with_render_timeout(mut self, timeout: Duration) -> Self {
        self.render_timeout = timeout;
        self
    }

    pub fn previews(&self) -> &Arc<PreviewRegistry> {
        &self.previews
    }

    pub fn downloads_dir(&self) -> &Path {
        &self.downloads_dir
    }

    fn renderer(&self, format: ExportFormat) -> Arc<dyn DeckRenderer> {
        match format {
            ExportFormat::Pptx => Arc::clone(&self.pptx),
            ExportFormat::Pdf => Arc::clone(&self.pdf),
        }
    }

    /// Render `document` and deliver it according to `mode`, reporting each
    /// stage through `on_progress`.
    pub async fn export_document<F>(
        &self,
        document: &SlideDocument,
        mode: ExportMode,
        format: ExportFormat,
        mut on_progress: F,
    ) -> Result<ExportHandle, ExportError>
    where
        F: FnMut(ExportProgress) + Send,
    {
        let mut emit = |event: ExportProgress| {
            debug!(stage = ?event.stage, percent = event.percent, "export progress");
            on_progress(event);
        };

        emit(ExportProgress::initializing());

        match self.run(document, mode, format, &mut emit).await {
            Ok((handle, message)) => {
                info!(
                    ?mode,
                    format = handle.format().label(),
                    fell_back = handle.fell_back(),
                    slides = document.len(),
                    "export complete"
                );
                emit(ExportProgress::complete(message));
                Ok(handle)
            }
            Err(e) => {
                warn!(?mode, ?format, error = %e, "export failed");
                emit(ExportProgress::error(format!("Export failed: {e}")));
                Err(e)
            }
        }
    }

    async fn run(
        &self,
        document: &SlideDocument,
        mode: ExportMode,
        format: ExportFormat,
        emit: &mut (impl FnMut(ExportProgress) + Send),
    ) -> Result<(ExportHandle, String), ExportError> {
        if document.is_empty() {
            return Err(ExportError::EmptyDocument);
        }

        let total = document.len();
        let mut plans = Vec::with_capacity(total);
        for (index, slide) in document.iter().enumerate() {
            plans.push(plan_slide(slide, index, total, &self.styles));
            emit(ExportProgress::creating_slide(index, total));
        }
        let plans = Arc::new(plans);

        emit(ExportProgress::finalizing());

        let (bytes, used) = match self.render(format, Arc::clone(&plans)).await {
            Ok(bytes) => (bytes, format),
            Err(e) if !format.is_primary() => {
                warn!(
                    requested = format.label(),
                    fallback = ExportFormat::PRIMARY.label(),
                    error = %e,
                    "secondary format failed, falling back"
                );
                let bytes = self.render(ExportFormat::PRIMARY, plans).await?;
                (bytes, ExportFormat::PRIMARY)
            }
            Err(e) => return Err(e),
        };
        let fell_back = used != format;

        let (handle, delivered) = match mode {
            ExportMode::Preview => {
                let url = self.previews.register(used, bytes);
                let handle = ExportHandle::Preview {
                    url,
                    format: used,
                    fell_back,
                };
                (handle, "Preview ready".to_string())
            }
            ExportMode::Download => {
                let stem = file_stem(document);
                let path = self.write_download(&stem, used, &bytes).await?;
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                let handle = ExportHandle::Download {
                    path,
                    format: used,
                    fell_back,
                };
                (handle, format!("Saved {name}"))
            }
        };

        let message = if fell_back {
            format!(
                "{} export is unavailable, so the presentation was exported as {} instead. {delivered}.",
                format.label(),
                used.label()
            )
        } else {
            format!("Presentation exported as {}. {delivered}.", used.label())
        };

        Ok((handle, message))
    }

    /// Run one renderer on the blocking pool, bounded by the render timeout.
    async fn render(
        &self,
        format: ExportFormat,
        plans: Arc<Vec<SlidePlan>>,
    ) -> Result<Vec<u8>, ExportError> {
        let renderer = self.renderer(format);
        let styles = self.styles.clone();
        let task = tokio::task::spawn_blocking(move || renderer.render(&plans, &styles));

        match tokio::time::timeout(self.render_timeout, task).await {
            Ok(Ok(result)) => result,
            Ok(Err(join)) => Err(ExportError::Task(join.to_string())),
            Err(_) => Err(ExportError::Timeout(self.render_timeout.as_secs())),
        }
    }

    /// Write under the downloads directory without overwriting: a taken
    /// name gets a `-1`, `-2`, ... suffix.
    async fn write_download(
        &self,
        stem: &str,
        format: ExportFormat,
        bytes: &[u8],
    ) -> Result<PathBuf, ExportError> {
        tokio::fs::create_dir_all(&self.downloads_dir).await?;

        let ext = format.extension();
        let mut path = self.downloads_dir.join(format!("{stem}.{ext}"));
        let mut n = 1;
        while tokio::fs::try_exists(&path).await? {
            path = self.downloads_dir.join(format!("{stem}-{n}.{ext}"));
            n += 1;
        }

        tokio::fs::write(&path, bytes).await?;
        info!(path = %path.display(), bytes = bytes.len(), "export written");
        Ok(path)
    }
}

/// File name stem from the first slide title: ASCII letters, digits, `-`
/// and `_` kept, whitespace runs turned into `_`, everything else dropped.
pub fn file_stem(document: &SlideDocument) -> String {
    let Some(first) = document.slides().first() else {
        return DEFAULT_FILE_STEM.to_string();
    };

    let mut stem = String::new();
    for word in first.title.split_whitespace() {
        let cleaned: String = word
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
            .collect();
        if cleaned.is_empty() {
            continue;
        }
        if !stem.is_empty() {
            stem.push('_');
        }
        stem.push_str(&cleaned);
    }

    let stem: String = stem.chars().take(MAX_FILE_STEM_CHARS).collect();
    let stem = stem.trim_matches(|c| c == '_' || c == '-');
    if stem.is_empty() {
        DEFAULT_FILE_STEM.to_string()
    } else {
        stem.to_string()
    }
}
