//! Per-slide layout rules.
//!
//! [`plan_slide`] turns one slide into positioned text boxes. It is a pure
//! function of the slide, its position in the deck and the deck styles,
//! so every renderer draws the same deck.
//!
//! | layout            | drawn as                                              |
//! |-------------------|-------------------------------------------------------|
//! | `TITLE`           | centered title, first line as centered subtitle       |
//! | `SECTION_HEADER`  | accent background, centered bold title, first line as caption |
//! | anything else     | top-left title, one bullet row per line, `n / total` label |

use serde::Serialize;
use slidechat_core::models::slide::{Layout, Slide};

use crate::styles::DeckStyles;

const MARGIN_IN: f64 = 0.5;
const HEADING_TOP_IN: f64 = 0.3;
const HEADING_HEIGHT_IN: f64 = 0.8;
const BULLETS_TOP_IN: f64 = 1.3;
const BULLET_ROW_IN: f64 = 0.5;
const LABEL_WIDTH_IN: f64 = 1.2;
const LABEL_HEIGHT_IN: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    Left,
    Center,
    Right,
}

/// A single-paragraph text box. Geometry in inches from the top-left
/// corner of the page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextBox {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    pub text: String,
    pub font: String,
    /// Points.
    pub size: f64,
    pub bold: bool,
    pub color: String,
    pub align: Align,
    pub bullet: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlidePlan {
    /// 1-based position in the deck.
    pub number: usize,
    /// Solid page fill, if any.
    pub background: Option<String>,
    pub boxes: Vec<TextBox>,
}

/// Lay out slide `index` (0-based) of a `total`-slide deck.
pub fn plan_slide(slide: &Slide, index: usize, total: usize, styles: &DeckStyles) -> SlidePlan {
    let boxes = match &slide.layout {
        Layout::Title => title_boxes(slide, styles),
        Layout::SectionHeader => section_boxes(slide, styles),
        Layout::TitleContent | Layout::Other(_) => content_boxes(slide, index, total, styles),
    };

    let background = match slide.layout {
        Layout::SectionHeader => Some(styles.accent_color.clone()),
        _ => None,
    };

    SlidePlan {
        number: index + 1,
        background,
        boxes,
    }
}

/// Lay out every slide of a deck.
pub fn plan_deck(slides: &[Slide], styles: &DeckStyles) -> Vec<SlidePlan> {
    slides
        .iter()
        .enumerate()
        .map(|(i, s)| plan_slide(s, i, slides.len(), styles))
        .collect()
}

fn title_boxes(slide: &Slide, styles: &DeckStyles) -> Vec<TextBox> {
    let width = styles.page_width_in - 2.0 * MARGIN_IN;
    let mut boxes = vec![TextBox {
        x: MARGIN_IN,
        y: styles.page_height_in * 0.30,
        w: width,
        h: 1.2,
        text: slide.title.clone(),
        font: styles.heading_font.clone(),
        size: styles.title_size,
        bold: true,
        color: styles.text_color.clone(),
        align: Align::Center,
        bullet: false,
    }];

    if let Some(subtitle) = slide.content.first() {
        boxes.push(TextBox {
            x: MARGIN_IN,
            y: styles.page_height_in * 0.30 + 1.3,
            w: width,
            h: 0.7,
            text: subtitle.clone(),
            font: styles.body_font.clone(),
            size: styles.subtitle_size,
            bold: false,
            color: styles.muted_color.clone(),
            align: Align::Center,
            bullet: false,
        });
    }

    boxes
}

fn section_boxes(slide: &Slide, styles: &DeckStyles) -> Vec<TextBox> {
    let width = styles.page_width_in - 2.0 * MARGIN_IN;
    let mut boxes = vec![TextBox {
        x: MARGIN_IN,
        y: styles.page_height_in * 0.35,
        w: width,
        h: 1.1,
        text: slide.title.clone(),
        font: styles.heading_font.clone(),
        size: styles.section_size,
        bold: true,
        color: styles.accent_text_color.clone(),
        align: Align::Center,
        bullet: false,
    }];

    if let Some(caption) = slide.content.first() {
        boxes.push(TextBox {
            x: MARGIN_IN,
            y: styles.page_height_in * 0.35 + 1.2,
            w: width,
            h: 0.6,
            text: caption.clone(),
            font: styles.body_font.clone(),
            size: styles.caption_size,
            bold: false,
            color: styles.accent_text_color.clone(),
            align: Align::Center,
            bullet: false,
        });
    }

    boxes
}

fn content_boxes(slide: &Slide, index: usize, total: usize, styles: &DeckStyles) -> Vec<TextBox> {
    let width = styles.page_width_in - 2.0 * MARGIN_IN;
    let mut boxes = Vec::with_capacity(slide.content.len() + 2);

    boxes.push(TextBox {
        x: MARGIN_IN,
        y: HEADING_TOP_IN,
        w: width,
        h: HEADING_HEIGHT_IN,
        text: slide.title.clone(),
        font: styles.heading_font.clone(),
        size: styles.heading_size,
        bold: true,
        color: styles.text_color.clone(),
        align: Align::Left,
        bullet: false,
    });

    // Rows shrink to keep long lists above the label.
    let available = styles.page_height_in - BULLETS_TOP_IN - MARGIN_IN - LABEL_HEIGHT_IN;
    let row = match slide.content.len() {
        0 => BULLET_ROW_IN,
        n => BULLET_ROW_IN.min(available / n as f64),
    };

    for (i, line) in slide.content.iter().enumerate() {
        boxes.push(TextBox {
            x: MARGIN_IN,
            y: BULLETS_TOP_IN + row * i as f64,
            w: width,
            h: row,
            text: line.clone(),
            font: styles.body_font.clone(),
            size: styles.bullet_size,
            bold: false,
            color: styles.text_color.clone(),
            align: Align::Left,
            bullet: true,
        });
    }

    boxes.push(TextBox {
        x: styles.page_width_in - MARGIN_IN - LABEL_WIDTH_IN,
        y: styles.page_height_in - MARGIN_IN + 0.1,
        w: LABEL_WIDTH_IN,
        h: LABEL_HEIGHT_IN,
        text: format!("{} / {}", index + 1, total),
        font: styles.body_font.clone(),
        size: styles.label_size,
        bold: false,
        color: styles.muted_color.clone(),
        align: Align::Right,
        bullet: false,
    });

    boxes
}
