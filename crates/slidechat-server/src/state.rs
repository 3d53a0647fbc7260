use std::sync::Arc;

use slidechat_export::pipeline::ExportPipeline;
use slidechat_genai::error::GenaiError;
use slidechat_genai::gemini::{GeminiClient, GeminiConfig};
use slidechat_genai::generate::SlideGenerator;
use slidechat_storage::backend::FileBackend;
use slidechat_storage::sessions::SessionStore;
use tokio::sync::Mutex;

use crate::config::{self, SlidechatConfig};

/// Shared application state, injected into all route handlers via Axum state.
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionStore>,
    /// `None` when generation is not configured.
    pub generator: Option<Arc<SlideGenerator>>,
    /// Why `generator` is `None`; shown as the assistant's reply.
    pub setup_error: Option<String>,
    pub export: Arc<ExportPipeline>,
    /// Held for a whole chat turn so turns never interleave.
    pub turns: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(
        sessions: Arc<SessionStore>,
        generator: Result<SlideGenerator, GenaiError>,
        export: ExportPipeline,
    ) -> Self {
        let (generator, setup_error) = match generator {
            Ok(g) => (Some(Arc::new(g)), None),
            Err(e) => {
                tracing::warn!(error = %e, "slide generation unavailable");
                (None, Some(e.user_message()))
            }
        };

        Self {
            sessions,
            generator,
            setup_error,
            export: Arc::new(export),
            turns: Arc::new(Mutex::new(())),
        }
    }

    /// Wire up the production services described by `config`.
    ///
    /// A missing API key only disables generation; everything else still
    /// starts.
    pub async fn from_config(
        config: &SlidechatConfig,
        env: impl Fn(&str) -> Option<String>,
    ) -> eyre::Result<Self> {
        tokio::fs::create_dir_all(&config.data_dir).await?;
        let backend = FileBackend::new(config.data_dir.clone());
        let sessions = SessionStore::open(Arc::new(backend)).await;

        let generator = config::api_key(env).and_then(|key| {
            let mut gemini = GeminiConfig::new(key);
            gemini.models = config.models.clone();
            let client = GeminiClient::new(gemini)?;
            Ok(SlideGenerator::new(Arc::new(client))?.with_timeout(config.generation_timeout()))
        });

        let export = ExportPipeline::new(config.downloads_dir.clone())
            .with_render_timeout(config.render_timeout());

        Ok(Self::new(Arc::new(sessions), generator, export))
    }
}
