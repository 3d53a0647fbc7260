#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use slidechat_export::pipeline::ExportPipeline;
use slidechat_genai::client::TextGenerator;
use slidechat_genai::error::GenaiError;
use slidechat_genai::generate::SlideGenerator;
use slidechat_server::state::AppState;
use slidechat_storage::backend::MemoryBackend;
use slidechat_storage::sessions::SessionStore;
use tempfile::TempDir;

/// Replays queued answers in order and records every prompt.
#[derive(Default)]
pub struct ScriptedModel {
    answers: Mutex<VecDeque<Result<String, String>>>,
    pub prompts: Mutex<Vec<String>>,
    /// How long each answer takes.
    latency: Duration,
}

impl ScriptedModel {
    pub fn answering(answers: &[Result<&str, &str>]) -> Arc<Self> {
        let model = Self::default();
        model.answers.lock().unwrap().extend(
            answers
                .iter()
                .copied()
                .map(|a| a.map(str::to_string).map_err(str::to_string)),
        );
        Arc::new(model)
    }

    pub fn answering_after(latency: Duration, answers: &[Result<&str, &str>]) -> Arc<Self> {
        let mut model = Arc::into_inner(Self::answering(answers)).unwrap();
        model.latency = latency;
        Arc::new(model)
    }

    pub fn prompt(&self, n: usize) -> String {
        self.prompts.lock().unwrap()[n].clone()
    }
}

#[async_trait]
impl TextGenerator for ScriptedModel {
    async fn generate(&self, prompt: &str) -> Result<String, GenaiError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        match self.answers.lock().unwrap().pop_front() {
            Some(Ok(text)) => Ok(text),
            Some(Err(detail)) => Err(GenaiError::Generation(detail)),
            None => Err(GenaiError::Generation("script exhausted".to_string())),
        }
    }
}

pub struct Harness {
    pub state: AppState,
    pub backend: Arc<MemoryBackend>,
    pub downloads: TempDir,
}

pub async fn harness(model: Option<Arc<ScriptedModel>>) -> Harness {
    let backend = Arc::new(MemoryBackend::new());
    let sessions = Arc::new(SessionStore::open(backend.clone()).await);

    let generator = match model {
        Some(model) => SlideGenerator::new(model),
        None => Err(GenaiError::Config(
            "Slide generation is not set up: no API key was found.".to_string(),
        )),
    };

    let downloads = tempfile::tempdir().unwrap();
    let export = ExportPipeline::new(downloads.path());

    Harness {
        state: AppState::new(sessions, generator, export),
        backend,
        downloads,
    }
}

pub fn deck_json(titles: &[&str]) -> String {
    let slides: Vec<serde_json::Value> = titles
        .iter()
        .enumerate()
        .map(|(i, t)| {
            let layout = if i == 0 { "TITLE" } else { "TITLE_CONTENT" };
            serde_json::json!({ "title": t, "content": [format!("about {t}")], "layout": layout })
        })
        .collect();
    format!("```json\n{}\n```", serde_json::json!({ "slides": slides }))
}
