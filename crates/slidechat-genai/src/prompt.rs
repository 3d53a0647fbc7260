//! Instruction payload for slide generation.
//!
//! The model sees one prompt per turn: a fixed task description, the
//! previous deck (if any) for revision, and the user's request. The model
//! has no memory between calls, so the prior document is always sent whole.

use slidechat_core::models::slide::SlideDocument;
use tera::{Context, Tera};

use crate::error::GenaiError;

const TEMPLATE_NAME: &str = "slides_prompt";

const TEMPLATE: &str = "\
You are an assistant that designs presentation slide decks.

Respond with a single JSON object and nothing else, in exactly this shape:
{{ schema_example }}

Rules:
- \"layout\" must be one of: TITLE, TITLE_CONTENT, SECTION_HEADER.
- Use TITLE for the opening slide, SECTION_HEADER to introduce a new part, \
TITLE_CONTENT for everything else.
- Produce between {{ min_slides }} and {{ max_slides }} slides unless the user \
asks for a specific number.
- Keep bullet points short; at most six per slide.
{% if prior_slides %}
Here is the current presentation. Revise it according to the user's request \
and return the complete updated presentation, including unchanged slides:
{{ prior_slides }}
{% else %}
Create a new presentation from scratch for the user's request.
{% endif %}
User request: {{ prompt }}
";

const SCHEMA_EXAMPLE: &str = r#"{"slides": [{"title": "string", "content": ["string"], "layout": "TITLE_CONTENT"}]}"#;

const MIN_SLIDES: usize = 3;
const MAX_SLIDES: usize = 8;

pub struct PromptBuilder {
    tera: Tera,
}

impl PromptBuilder {
    pub fn new() -> Result<Self, GenaiError> {
        let mut tera = Tera::default();
        tera.add_raw_template(TEMPLATE_NAME, TEMPLATE)?;
        Ok(Self { tera })
    }

    /// Render the instruction payload. An empty `prior` asks for a fresh
    /// deck; otherwise the prior deck is embedded for revision.
    pub fn build(&self, prompt: &str, prior: &SlideDocument) -> Result<String, GenaiError> {
        let mut context = Context::new();
        context.insert("schema_example", SCHEMA_EXAMPLE);
        context.insert("min_slides", &MIN_SLIDES);
        context.insert("max_slides", &MAX_SLIDES);
        context.insert("prompt", prompt.trim());

        // An empty string is falsy in the template.
        let prior_slides = if prior.is_empty() {
            String::new()
        } else {
            let wrapped = serde_json::json!({ "slides": prior });
            serde_json::to_string_pretty(&wrapped).map_err(|e| GenaiError::Prompt(e.to_string()))?
        };
        context.insert("prior_slides", &prior_slides);

        Ok(self.tera.render(TEMPLATE_NAME, &context)?)
    }
}

/// One-shot convenience over [`PromptBuilder`].
pub fn build_prompt(prompt: &str, prior: &SlideDocument) -> Result<String, GenaiError> {
    PromptBuilder::new()?.build(prompt, prior)
}
