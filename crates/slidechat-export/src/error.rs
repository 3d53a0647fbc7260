use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("the presentation has no slides")]
    EmptyDocument,

    #[error("PPTX generation failed: {0}")]
    Pptx(String),

    #[error("PDF generation failed: {0}")]
    Pdf(String),

    #[error("rendering timed out after {0}s")]
    Timeout(u64),

    #[error("render task failed: {0}")]
    Task(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<zip::result::ZipError> for ExportError {
    fn from(e: zip::result::ZipError) -> Self {
        ExportError::Pptx(e.to_string())
    }
}

impl From<printpdf::Error> for ExportError {
    fn from(e: printpdf::Error) -> Self {
        ExportError::Pdf(e.to_string())
    }
}
