//! Structural validation of untyped slide documents.
//!
//! Model output arrives as arbitrary JSON. These checks run before
//! deserialization so a wrong shape is rejected with a precise message
//! instead of propagating partial data into the document model.

use serde_json::Value;

use crate::error::CoreError;

/// Check that `document` is an array of slides, each with a string `title`,
/// a `content` array of strings, and a string `layout`.
///
/// The layout value itself is not checked against the known variants.
pub fn validate(document: &Value) -> Result<(), CoreError> {
    let slides = document
        .as_array()
        .ok_or_else(|| CoreError::Schema("document is not an array".to_string()))?;

    for (index, slide) in slides.iter().enumerate() {
        validate_slide(index, slide)?;
    }

    Ok(())
}

fn validate_slide(index: usize, slide: &Value) -> Result<(), CoreError> {
    let fields = slide
        .as_object()
        .ok_or_else(|| CoreError::Schema(format!("slide {index} is not an object")))?;

    match fields.get("title") {
        Some(Value::String(_)) => {}
        Some(_) => {
            return Err(CoreError::Schema(format!(
                "slide {index}: title is not a string"
            )));
        }
        None => return Err(CoreError::Schema(format!("slide {index}: missing title"))),
    }

    let content = fields
        .get("content")
        .ok_or_else(|| CoreError::Schema(format!("slide {index}: missing content")))?
        .as_array()
        .ok_or_else(|| CoreError::Schema(format!("slide {index}: content is not an array")))?;

    if let Some(pos) = content.iter().position(|line| !line.is_string()) {
        return Err(CoreError::Schema(format!(
            "slide {index}: content line {pos} is not a string"
        )));
    }

    match fields.get("layout") {
        Some(Value::String(_)) => Ok(()),
        Some(_) => Err(CoreError::Schema(format!(
            "slide {index}: layout is not a string"
        ))),
        None => Err(CoreError::Schema(format!("slide {index}: missing layout"))),
    }
}
