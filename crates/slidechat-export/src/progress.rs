//! Staged export progress.
//!
//! A successful export reports, in order: `initializing` (10), one
//! `creating_slides` per slide (30–80), `finalizing` (90) and
//! `complete` (100). Percentages never decrease along that path. Any
//! failure ends the stream with a single `error` event at 0.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ExportStage {
    Initializing,
    CreatingSlides,
    Finalizing,
    Complete,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ExportProgress {
    pub stage: ExportStage,
    pub percent: u8,
    pub message: String,
    /// 1-based; `creating_slides` only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub current_slide: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub total_slides: Option<usize>,
}

impl ExportProgress {
    fn at(stage: ExportStage, percent: u8, message: impl Into<String>) -> Self {
        Self {
            stage,
            percent,
            message: message.into(),
            current_slide: None,
            total_slides: None,
        }
    }

    pub fn initializing() -> Self {
        Self::at(ExportStage::Initializing, 10, "Preparing presentation...")
    }

    /// Slide `index` (0-based) of `total` has been laid out.
    pub fn creating_slide(index: usize, total: usize) -> Self {
        Self {
            current_slide: Some(index + 1),
            total_slides: Some(total),
            ..Self::at(
                ExportStage::CreatingSlides,
                slide_percent(index, total),
                format!("Creating slide {} of {}...", index + 1, total),
            )
        }
    }

    pub fn finalizing() -> Self {
        Self::at(ExportStage::Finalizing, 90, "Finalizing file...")
    }

    pub fn complete(message: impl Into<String>) -> Self {
        Self::at(ExportStage::Complete, 100, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::at(ExportStage::Error, 0, message)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.stage, ExportStage::Complete | ExportStage::Error)
    }
}

/// `30 + 50·(i+1)/n`, so the last slide lands on 80.
pub fn slide_percent(index: usize, total: usize) -> u8 {
    if total == 0 {
        return 30;
    }
    let done = (index + 1).min(total);
    (30 + 50 * done / total) as u8
}
