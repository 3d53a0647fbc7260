use serde::{Deserialize, Serialize};

/// Deck-wide styling shared by every renderer.
///
/// Geometry is in inches on a 16:9 page, font sizes in points and colours
/// as `RRGGBB` hex without a leading `#`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeckStyles {
    pub page_width_in: f64,
    pub page_height_in: f64,

    /// Font for titles (e.g. "Arial", "Calibri").
    pub heading_font: String,

    /// Font for bullets, captions and labels.
    pub body_font: String,

    /// Title of a `TITLE` slide.
    pub title_size: f64,

    /// Subtitle of a `TITLE` slide.
    pub subtitle_size: f64,

    /// Title of a `SECTION_HEADER` slide.
    pub section_size: f64,

    /// Caption of a `SECTION_HEADER` slide.
    pub caption_size: f64,

    /// Title of a content slide.
    pub heading_size: f64,

    pub bullet_size: f64,

    /// Slide-number label.
    pub label_size: f64,

    pub text_color: String,
    pub muted_color: String,

    /// Section header background.
    pub accent_color: String,

    /// Text drawn on the accent background.
    pub accent_text_color: String,
}

impl Default for DeckStyles {
    fn default() -> Self {
        Self {
            page_width_in: 10.0,
            page_height_in: 5.625,
            heading_font: "Arial".to_string(),
            body_font: "Arial".to_string(),
            title_size: 40.0,
            subtitle_size: 20.0,
            section_size: 36.0,
            caption_size: 18.0,
            heading_size: 28.0,
            bullet_size: 18.0,
            label_size: 10.0,
            text_color: "1F2937".to_string(),
            muted_color: "6B7280".to_string(),
            accent_color: "2563EB".to_string(),
            accent_text_color: "FFFFFF".to_string(),
        }
    }
}

/// Parse `RRGGBB` into unit-range RGB components. Malformed input yields
/// black.
pub fn hex_to_rgb(hex: &str) -> (f32, f32, f32) {
    let hex = hex.trim_start_matches('#');
    let channel = |range: std::ops::Range<usize>| {
        hex.get(range)
            .and_then(|c| u8::from_str_radix(c, 16).ok())
            .map_or(0.0, |v| f32::from(v) / 255.0)
    };
    if hex.len() != 6 {
        return (0.0, 0.0, 0.0);
    }
    (channel(0..2), channel(2..4), channel(4..6))
}
