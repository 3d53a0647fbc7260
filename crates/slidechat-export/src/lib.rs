//! slidechat-export
//!
//! Slide document → PPTX (primary) or PDF (secondary), with staged
//! progress reporting and transient previews.

pub mod error;
pub mod format;
pub mod layout;
pub mod pdf;
pub mod pipeline;
pub mod pptx;
pub mod preview;
pub mod progress;
pub mod render;
pub mod styles;
