use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;
use crate::validate;

/// Per-slide rendering mode.
///
/// Model output is untrusted, so any layout string is accepted and kept
/// verbatim in [`Layout::Other`]. Renderers treat `Other` the same as
/// [`Layout::TitleContent`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Layout {
    Title,
    #[default]
    TitleContent,
    SectionHeader,
    Other(String),
}

impl Layout {
    pub fn as_str(&self) -> &str {
        match self {
            Layout::Title => "TITLE",
            Layout::TitleContent => "TITLE_CONTENT",
            Layout::SectionHeader => "SECTION_HEADER",
            Layout::Other(raw) => raw,
        }
    }

    /// Whether this is one of the three recognized variants.
    pub fn is_known(&self) -> bool {
        !matches!(self, Layout::Other(_))
    }
}

impl From<String> for Layout {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "TITLE" => Layout::Title,
            "TITLE_CONTENT" => Layout::TitleContent,
            "SECTION_HEADER" => Layout::SectionHeader,
            _ => Layout::Other(raw),
        }
    }
}

impl From<&str> for Layout {
    fn from(raw: &str) -> Self {
        Layout::from(raw.to_string())
    }
}

impl From<Layout> for String {
    fn from(layout: Layout) -> Self {
        match layout {
            Layout::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One presentation page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Slide {
    pub title: String,
    /// Bullet lines, in display order.
    pub content: Vec<String>,
    #[ts(type = "string")]
    pub layout: Layout,
}

impl Slide {
    pub fn new(title: impl Into<String>, content: Vec<String>, layout: Layout) -> Self {
        Self {
            title: title.into(),
            content,
            layout,
        }
    }
}

/// An ordered sequence of slides. Insertion order is visual order.
///
/// A generation turn replaces the whole document; there is no merge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SlideDocument(pub Vec<Slide>);

impl SlideDocument {
    pub fn new(slides: Vec<Slide>) -> Self {
        Self(slides)
    }

    /// Validate an untyped JSON array against the slide schema, then
    /// deserialize it.
    pub fn from_value(value: serde_json::Value) -> Result<Self, CoreError> {
        validate::validate(&value)?;
        Ok(serde_json::from_value(value)?)
    }

    pub fn slides(&self) -> &[Slide] {
        &self.0
    }

    pub fn slide_mut(&mut self, index: usize) -> Option<&mut Slide> {
        self.0.get_mut(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Slide> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<Slide>> for SlideDocument {
    fn from(slides: Vec<Slide>) -> Self {
        Self(slides)
    }
}

impl<'a> IntoIterator for &'a SlideDocument {
    type Item = &'a Slide;
    type IntoIter = std::slice::Iter<'a, Slide>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
