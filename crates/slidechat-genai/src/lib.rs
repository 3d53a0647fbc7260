//! slidechat-genai
//!
//! Text-generation client and the prompt → slide document pipeline.

pub mod client;
pub mod error;
pub mod extract;
pub mod gemini;
pub mod generate;
pub mod prompt;
