use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Output file format. PPTX is primary; PDF is secondary and falls back to
/// PPTX when it cannot be produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum ExportFormat {
    Pptx,
    Pdf,
}

impl ExportFormat {
    pub const PRIMARY: ExportFormat = ExportFormat::Pptx;

    pub fn is_primary(self) -> bool {
        self == Self::PRIMARY
    }

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Pptx => "pptx",
            ExportFormat::Pdf => "pdf",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Pptx => {
                "application/vnd.openxmlformats-officedocument.presentationml.presentation"
            }
            ExportFormat::Pdf => "application/pdf",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ExportFormat::Pptx => "PPTX",
            ExportFormat::Pdf => "PDF",
        }
    }
}

/// Where the rendered artifact goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum ExportMode {
    /// Kept in memory behind a transient URL.
    Preview,
    /// Written to the downloads directory.
    Download,
}
