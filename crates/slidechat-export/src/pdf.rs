//! PDF writer: one landscape page per slide.
//!
//! Uses the built-in Helvetica faces, so no font files are embedded and
//! the deck's configured fonts are not honoured. Text is not wrapped, and
//! centering uses an average glyph width rather than real metrics.

use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Mm, PdfDocument, PdfLayerReference, Rect, Rgb,
};
use tracing::debug;

use crate::error::ExportError;
use crate::format::ExportFormat;
use crate::layout::{Align, SlidePlan, TextBox};
use crate::render::DeckRenderer;
use crate::styles::{DeckStyles, hex_to_rgb};

const MM_PER_INCH: f64 = 25.4;
const POINTS_PER_INCH: f64 = 72.0;

/// Average Helvetica advance width as a fraction of the font size.
const AVG_GLYPH_WIDTH: f64 = 0.5;

const BULLET_INDENT_IN: f64 = 0.3;

#[derive(Debug, Default, Clone, Copy)]
pub struct PdfRenderer;

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

impl DeckRenderer for PdfRenderer {
    fn format(&self) -> ExportFormat {
        ExportFormat::Pdf
    }

    fn render(&self, slides: &[SlidePlan], styles: &DeckStyles) -> Result<Vec<u8>, ExportError> {
        let Some((first, rest)) = slides.split_first() else {
            return Err(ExportError::EmptyDocument);
        };

        let width = mm(styles.page_width_in);
        let height = mm(styles.page_height_in);

        let (doc, page, layer) = PdfDocument::new("Presentation", width, height, "Slide 1");
        let fonts = Fonts {
            regular: doc.add_builtin_font(BuiltinFont::Helvetica)?,
            bold: doc.add_builtin_font(BuiltinFont::HelveticaBold)?,
        };

        draw_slide(&doc.get_page(page).get_layer(layer), first, styles, &fonts);

        for plan in rest {
            let (page, layer) = doc.add_page(width, height, format!("Slide {}", plan.number));
            draw_slide(&doc.get_page(page).get_layer(layer), plan, styles, &fonts);
        }

        let bytes = doc.save_to_bytes()?;
        debug!(slides = slides.len(), bytes = bytes.len(), "pdf document written");
        Ok(bytes)
    }
}

fn mm(inches: f64) -> Mm {
    Mm((inches * MM_PER_INCH) as f32)
}

fn color(hex: &str) -> Color {
    let (r, g, b) = hex_to_rgb(hex);
    Color::Rgb(Rgb::new(r, g, b, None))
}

fn draw_slide(layer: &PdfLayerReference, plan: &SlidePlan, styles: &DeckStyles, fonts: &Fonts) {
    if let Some(fill) = &plan.background {
        layer.set_fill_color(color(fill));
        layer.add_rect(Rect::new(
            Mm(0.0),
            Mm(0.0),
            mm(styles.page_width_in),
            mm(styles.page_height_in),
        ));
    }

    for text_box in &plan.boxes {
        draw_text(layer, text_box, styles.page_height_in, fonts);
    }
}

fn draw_text(layer: &PdfLayerReference, tb: &TextBox, page_height_in: f64, fonts: &Fonts) {
    let font = if tb.bold { &fonts.bold } else { &fonts.regular };
    let text = if tb.bullet {
        format!("- {}", tb.text)
    } else {
        tb.text.clone()
    };

    let text_width_in = text.chars().count() as f64 * tb.size * AVG_GLYPH_WIDTH / POINTS_PER_INCH;
    let x_in = match tb.align {
        Align::Left if tb.bullet => tb.x + BULLET_INDENT_IN,
        Align::Left => tb.x,
        Align::Center => tb.x + ((tb.w - text_width_in) / 2.0).max(0.0),
        Align::Right => tb.x + (tb.w - text_width_in).max(0.0),
    };

    // Baseline measured from the top of the page, then flipped: PDF origin
    // is the bottom-left corner.
    let size_in = tb.size / POINTS_PER_INCH;
    let baseline_from_top = if tb.bullet {
        tb.y + size_in
    } else {
        tb.y + tb.h / 2.0 + size_in * 0.35
    };
    let y_in = page_height_in - baseline_from_top;

    layer.set_fill_color(color(&tb.color));
    layer.use_text(text, tb.size as f32, mm(x_in), mm(y_in), font);
}
